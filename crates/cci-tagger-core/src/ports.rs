//! Port traits for the external collaborators. The core depends only on
//! these; concrete wire and file formats live outside the crate.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::concept::Concept;
use crate::config::DatasetConfig;
use crate::facet::Facet;
use crate::Result;

/// A broader (parent) concept in the vocabulary hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broader {
    pub label: String,
    pub uri: String,
}

/// SKOS vocabulary lookups. One scheme URI per facet. Transport failures are
/// structural and propagate as errors; the hierarchy walk treats a concept
/// with no broader term as `None`.
pub trait VocabularyService {
    /// Preferred labels of every concept in a scheme, keyed by lowercase label.
    fn concepts_in_scheme(&self, scheme: &str) -> Result<BTreeMap<String, Concept>>;

    /// Alternate labels of every concept in a scheme, keyed by lowercase label.
    fn alt_concepts_in_scheme(&self, scheme: &str) -> Result<BTreeMap<String, Concept>>;

    /// The broader concept of `uri`, or `None` at the top of the hierarchy.
    fn broader(&self, uri: &str) -> Result<Option<Broader>>;
}

/// Reads raw facet values from a data file's internal metadata. Restricted
/// to the allowed global attributes plus `product_version`; a file that
/// cannot be read contributes an empty map, not an error.
pub trait AttributeExtractor {
    fn read_attributes(&self, path: &Path) -> Result<BTreeMap<Facet, String>>;
}

/// Per-dataset configuration lookup. Implementations load lazily on first
/// access to a dataset id and cache for the process lifetime.
pub trait DatasetConfigStore {
    /// Map a file or dataset path to its dataset identifier.
    fn dataset_id(&self, path: &Path) -> String;

    /// The configuration for a dataset id (memoized).
    fn config(&self, dataset_id: &str) -> Result<Arc<DatasetConfig>>;
}
