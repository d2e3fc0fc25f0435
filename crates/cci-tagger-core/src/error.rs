use thiserror::Error;

/// Structural failures only. Data-quality problems (unknown terms, bad
/// filenames, missing DRS facets) are recorded in result types, not raised.
#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("unknown facet: {0}")]
    UnknownFacet(String),

    #[error("config: {0}")]
    Config(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}
