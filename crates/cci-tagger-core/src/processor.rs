//! Per-dataset orchestration: run every file through extraction and
//! resolution, accumulate the dataset-level facet URIs, and group files by
//! their DRS id.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::DatasetConfig;
use crate::drs::{collapse_labels, generate_ds_id, UNKNOWN_DRS};
use crate::facet::Facet;
use crate::ports::AttributeExtractor;
use crate::resolver::FacetResolver;
use crate::vocab::VocabularyIndex;
use crate::Result;

/// Outcome of tagging a single file.
#[derive(Debug, Clone)]
pub struct TaggedFile {
    pub path: PathBuf,
    pub drs_id: Option<String>,
    /// Collapsed display label per facet.
    pub labels: BTreeMap<Facet, String>,
    /// Every resolved concept URI per facet.
    pub uris: BTreeMap<Facet, BTreeSet<String>>,
}

/// Aggregated result for one dataset, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub dataset_id: String,
    /// DRS id → files carrying it. Files without an id group under a
    /// dataset-specific `UNKNOWN_DRS` key.
    pub drs: BTreeMap<String, Vec<String>>,
    /// Union of the resolved URIs across every file.
    pub facets: BTreeMap<Facet, BTreeSet<String>>,
    /// `facet: term` pairs no file could resolve.
    pub not_found: BTreeSet<String>,
}

/// Tags the files of one dataset against a shared vocabulary index.
pub struct DatasetTagger<'a> {
    id: String,
    index: &'a VocabularyIndex,
    config: Arc<DatasetConfig>,
    file_map: BTreeMap<String, Vec<String>>,
    dataset_uris: BTreeMap<Facet, BTreeSet<String>>,
    not_found: BTreeSet<String>,
}

impl<'a> DatasetTagger<'a> {
    pub fn new(id: impl Into<String>, index: &'a VocabularyIndex, config: Arc<DatasetConfig>) -> Self {
        Self {
            id: id.into(),
            index,
            config,
            file_map: BTreeMap::new(),
            dataset_uris: BTreeMap::new(),
            not_found: BTreeSet::new(),
        }
    }

    pub fn dataset_id(&self) -> &str {
        &self.id
    }

    /// Resolve one file and fold its results into the dataset totals.
    pub fn tag_file(
        &mut self,
        path: &Path,
        extractor: &dyn AttributeExtractor,
    ) -> Result<TaggedFile> {
        let attrs = extractor.read_attributes(path)?;
        let resolver = FacetResolver::new(self.index, &self.config, &self.id);
        let resolution = resolver.resolve_file(path, &attrs)?;

        let labels = self.index.labels_for_bag(&resolution.bag);
        let collapsed = collapse_labels(&labels, resolution.bag.multi_platform);
        let drs = generate_ds_id(&self.id, &collapsed, path, &self.config.realisation);

        for (facet, uris) in &resolution.bag.uris {
            self.dataset_uris
                .entry(*facet)
                .or_default()
                .extend(uris.iter().cloned());
        }
        self.not_found.extend(resolution.not_found);

        let key = match &drs.id {
            Some(id) => id.clone(),
            None => format!("{UNKNOWN_DRS} - {}", self.id),
        };
        self.file_map
            .entry(key)
            .or_default()
            .push(path.to_string_lossy().into_owned());

        debug!(dataset = self.id, file = %path.display(), drs = ?drs.id, "tagged file");

        Ok(TaggedFile {
            path: path.to_path_buf(),
            drs_id: drs.id,
            labels: collapsed,
            uris: resolution.bag.uris,
        })
    }

    /// Tag a batch of files. Unreadable files already surface as empty
    /// attribute maps, so a hard error here is structural and stops the run.
    pub fn process_files(
        &mut self,
        paths: &[PathBuf],
        extractor: &dyn AttributeExtractor,
    ) -> Result<()> {
        for path in paths {
            self.tag_file(path, extractor)?;
        }
        Ok(())
    }

    /// URIs resolved so far, across every processed file.
    pub fn facet_uris(&self) -> &BTreeMap<Facet, BTreeSet<String>> {
        &self.dataset_uris
    }

    pub fn not_found(&self) -> &BTreeSet<String> {
        &self.not_found
    }

    pub fn into_report(self) -> DatasetReport {
        DatasetReport {
            dataset_id: self.id,
            drs: self.file_map,
            facets: self.dataset_uris,
            not_found: self.not_found,
        }
    }
}
