//! DRS dataset-id assembly: collapse the per-facet labels, clean them up
//! and join them in the fixed facet order under the `esacci` prefix.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{error, warn};

use crate::facet::{Facet, DATA_EXTENSIONS, DRS_FACETS, EXCLUDE_REALISATION};

pub const DRS_PREFIX: &str = "esacci";

/// Grouping key for files whose DRS id could not be generated.
pub const UNKNOWN_DRS: &str = "UNKNOWN_DRS";

/// How serious a missing DRS facet is for a given file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The file is actual data; the id should have been derivable.
    Error,
    /// Ancillary file, a gap is expected.
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFacet {
    pub facet: Facet,
    pub severity: Severity,
}

/// The id (when every facet was present) plus any gaps found on the way.
#[derive(Debug, Clone, Default)]
pub struct DrsIdResult {
    pub id: Option<String>,
    pub missing: Vec<MissingFacet>,
}

/// Collapse each facet's label list to a single display label. More than
/// one label collapses to the facet's `multi-` sentinel; the platform facet
/// also collapses when a programme or group stood in for its platforms.
pub fn collapse_labels(
    labels: &BTreeMap<Facet, Vec<String>>,
    multi_platform: bool,
) -> BTreeMap<Facet, String> {
    let mut collapsed = BTreeMap::new();
    for (facet, facet_labels) in labels {
        let Some(first) = facet_labels.first() else {
            continue;
        };
        let many = facet_labels.len() > 1 || (*facet == Facet::Platform && multi_platform);
        let label = match (many, facet.multi_label()) {
            (true, Some(sentinel)) => sentinel.to_string(),
            _ => first.clone(),
        };
        collapsed.insert(*facet, label);
    }
    collapsed
}

/// Assemble the DRS id for one file from its collapsed labels.
///
/// Every facet must be present; a gap is logged at a severity that depends
/// on the file extension and suppresses the id. A dataset realisation of
/// `EXCLUDE` suppresses the id silently.
pub fn generate_ds_id(
    dataset_id: &str,
    labels: &BTreeMap<Facet, String>,
    filepath: &Path,
    realisation: &str,
) -> DrsIdResult {
    if realisation == EXCLUDE_REALISATION {
        return DrsIdResult::default();
    }

    let severity = if has_data_extension(filepath) {
        Severity::Error
    } else {
        Severity::Warning
    };

    let mut result = DrsIdResult::default();
    let mut segments = vec![DRS_PREFIX.to_string()];

    for facet in DRS_FACETS {
        let label = labels.get(&facet).map(String::as_str).unwrap_or("");
        if label.is_empty() {
            match severity {
                Severity::Error => error!(
                    dataset = dataset_id,
                    file = %filepath.display(),
                    facet = %facet,
                    "missing DRS facet"
                ),
                Severity::Warning => warn!(
                    dataset = dataset_id,
                    file = %filepath.display(),
                    facet = %facet,
                    "missing DRS facet"
                ),
            }
            result.missing.push(MissingFacet { facet, severity });
            continue;
        }

        let mut clean = label.replace(['.', ' ', '/'], "-");
        if facet == Facet::Frequency {
            clean = clean.replace("month", "mon").replace("year", "yr");
        }
        segments.push(clean);
    }

    if result.missing.is_empty() {
        segments.push(realisation.to_string());
        result.id = Some(segments.join("."));
    }
    result
}

/// Whether the file is actual data rather than documentation or sidecars.
pub fn has_data_extension(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    DATA_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}
