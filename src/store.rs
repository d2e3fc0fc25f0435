//! JSON-backed dataset configuration store. A directory of `*.json` files,
//! each declaring one or more dataset paths plus the defaults, mappings,
//! overrides and realisations that apply to them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use cci_tagger_core::config::{one_or_many_map, DatasetConfig};
use cci_tagger_core::{DatasetConfigStore, Facet, Result, TaggerError};

/// One configuration file. Every section is optional; an empty file still
/// declares its datasets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    datasets: Vec<String>,

    #[serde(deserialize_with = "one_or_many_map")]
    defaults: BTreeMap<Facet, Vec<String>>,

    mappings: BTreeMap<Facet, BTreeMap<String, String>>,

    #[serde(deserialize_with = "one_or_many_map")]
    overrides: BTreeMap<Facet, Vec<String>>,

    merged_attributes: BTreeMap<String, String>,

    /// Realisation per dataset path; datasets not listed default to `r1`.
    realisations: BTreeMap<String, String>,
}

/// Loads every configuration file under a directory once, then answers
/// dataset lookups from memory.
#[derive(Debug)]
pub struct JsonDatasetStore {
    files: Vec<ConfigFile>,
    cache: Mutex<BTreeMap<String, Arc<DatasetConfig>>>,
}

impl JsonDatasetStore {
    pub fn load(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        let entries = std::fs::read_dir(dir).map_err(|err| {
            TaggerError::Config(format!("config directory {}: {err}", dir.display()))
        })?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let file: ConfigFile = serde_json::from_str(&text).map_err(|err| {
                TaggerError::Config(format!("{}: {err}", path.display()))
            })?;
            debug!(file = %path.display(), datasets = file.datasets.len(), "loaded config");
            files.push(file);
        }

        Ok(Self {
            files,
            cache: Mutex::new(BTreeMap::new()),
        })
    }

    /// Every dataset path declared across the loaded files, sorted.
    pub fn datasets(&self) -> Vec<String> {
        let mut datasets: Vec<String> = self
            .files
            .iter()
            .flat_map(|file| file.datasets.iter().cloned())
            .collect();
        datasets.sort();
        datasets.dedup();
        datasets
    }

    fn build_config(&self, dataset_id: &str) -> DatasetConfig {
        let mut config = DatasetConfig::default();
        for file in &self.files {
            if !file
                .datasets
                .iter()
                .any(|declared| dataset_id.starts_with(declared.as_str()))
            {
                continue;
            }
            for (facet, values) in &file.defaults {
                config.defaults.insert(*facet, values.clone());
            }
            for (facet, map) in &file.mappings {
                config
                    .mappings
                    .entry(*facet)
                    .or_default()
                    .extend(map.clone());
            }
            for (facet, values) in &file.overrides {
                config.overrides.insert(*facet, values.clone());
            }
            config
                .merged_attributes
                .extend(file.merged_attributes.clone());
            if let Some(realisation) = file.realisations.get(dataset_id) {
                config.realisation = realisation.clone();
            }
        }
        config
    }
}

impl DatasetConfigStore for JsonDatasetStore {
    /// The longest declared dataset path that prefixes the file path; a path
    /// outside every declared dataset is its own dataset id.
    fn dataset_id(&self, path: &Path) -> String {
        let path_str = path.to_string_lossy();
        self.files
            .iter()
            .flat_map(|file| file.datasets.iter())
            .filter(|declared| path_str.starts_with(declared.as_str()))
            .max_by_key(|declared| declared.len())
            .cloned()
            .unwrap_or_else(|| path_str.into_owned())
    }

    fn config(&self, dataset_id: &str) -> Result<Arc<DatasetConfig>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| anyhow::anyhow!("config cache poisoned"))?;
        if let Some(config) = cache.get(dataset_id) {
            return Ok(Arc::clone(config));
        }
        let config = Arc::new(self.build_config(dataset_id));
        cache.insert(dataset_id.to_string(), Arc::clone(&config));
        Ok(config)
    }
}
