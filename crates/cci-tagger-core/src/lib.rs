//! Core facet-resolution and DRS-id pipeline for the CCI tagger.
//!
//! Everything in this crate is pure, synchronous logic. The vocabulary
//! service, the data-file attribute reader and the dataset configuration
//! store come in through the port traits in [`ports`] — implemented by
//! `cci-tagger-sparql` and the command-line client.

pub mod concept;
pub mod config;
pub mod drs;
pub mod error;
pub mod extract;
pub mod facet;
pub mod ports;
pub mod processor;
pub mod resolver;
pub mod vocab;

#[cfg(test)]
pub(crate) mod testing;

pub use concept::Concept;
pub use config::DatasetConfig;
pub use drs::{DrsIdResult, MissingFacet, Severity};
pub use error::TaggerError;
pub use facet::{Facet, LabelSource};
pub use ports::{AttributeExtractor, Broader, DatasetConfigStore, VocabularyService};
pub use processor::{DatasetReport, DatasetTagger, TaggedFile};
pub use resolver::{FacetResolver, FileResolution, ResolvedFacetBag};
pub use vocab::VocabularyIndex;

pub type Result<T> = std::result::Result<T, TaggerError>;
