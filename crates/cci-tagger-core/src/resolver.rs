//! The per-file resolution pipeline: raw values from defaults, the file
//! name and the file's own metadata are overlaid in a fixed order, rewritten
//! through the dataset mappings, and resolved against the vocabulary index
//! into concept URIs.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::warn;

use crate::config::DatasetConfig;
use crate::extract::{expand_multi_values, parse_filename, split_attribute};
use crate::facet::{
    Facet, ALLOWED_GLOBAL_ATTRS, FILENAME_FACETS, LEVEL_2_FREQUENCY,
};
use crate::vocab::VocabularyIndex;
use crate::Result;

/// The resolved concept URIs of one file, grouped by facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFacetBag {
    pub uris: BTreeMap<Facet, BTreeSet<String>>,
    /// Set when a platform term named a whole programme or group, so the
    /// display label must collapse to `multi-platform` even if only one URI
    /// was recorded.
    pub multi_platform: bool,
}

impl ResolvedFacetBag {
    pub fn insert(&mut self, facet: Facet, uri: impl Into<String>) {
        self.uris.entry(facet).or_default().insert(uri.into());
    }

    pub fn get(&self, facet: Facet) -> Option<&BTreeSet<String>> {
        self.uris.get(&facet)
    }
}

/// Outcome of resolving one file.
#[derive(Debug, Clone, Default)]
pub struct FileResolution {
    pub bag: ResolvedFacetBag,
    /// `facet: term` pairs that matched nothing in the vocabulary.
    pub not_found: BTreeSet<String>,
    /// The file name matched neither recognized grammar.
    pub format_error: bool,
}

/// Resolves raw file values into vocabulary URIs for one dataset.
pub struct FacetResolver<'a> {
    index: &'a VocabularyIndex,
    config: &'a DatasetConfig,
    dataset_id: &'a str,
}

impl<'a> FacetResolver<'a> {
    pub fn new(index: &'a VocabularyIndex, config: &'a DatasetConfig, dataset_id: &'a str) -> Self {
        Self {
            index,
            config,
            dataset_id,
        }
    }

    /// Run the full pipeline for one file. `attrs` holds the raw global
    /// attributes read from the file itself.
    pub fn resolve_file(
        &self,
        path: &Path,
        attrs: &BTreeMap<Facet, String>,
    ) -> Result<FileResolution> {
        let mut resolution = FileResolution::default();

        // Defaults seed the working set; later sources replace per facet.
        let mut working: BTreeMap<Facet, Vec<String>> = self.config.defaults.clone();

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match parse_filename(&filename) {
            Some(values) => {
                for (facet, value) in values {
                    working.insert(facet, vec![value]);
                }
            }
            None => {
                warn!(dataset = self.dataset_id, file = %filename, "unrecognized file name format");
                resolution.format_error = true;
            }
        }

        // Metadata read from the file replaces defaults for the attributes
        // we accept; a default standing in for a missing attribute flows
        // through the same rewrite, split and expansion steps as a file
        // value. Whole-attribute rewrites happen before splitting.
        for facet in ALLOWED_GLOBAL_ATTRS {
            let raws: Vec<String> = match attrs.get(&facet) {
                Some(raw) => vec![raw.clone()],
                None => match self.config.defaults.get(&facet) {
                    Some(values) => values.clone(),
                    None => continue,
                },
            };
            let mut terms = Vec::new();
            for raw in &raws {
                let raw = self.config.merged_attribute(raw);
                let mut split = split_attribute(facet, raw);
                if facet == Facet::Platform {
                    split = expand_multi_values(split);
                }
                terms.append(&mut split);
            }
            working.insert(facet, terms);
        }
        if let Some(version) = attrs.get(&Facet::ProductVersion) {
            working.insert(Facet::ProductVersion, vec![version.clone()]);
        }

        // Dataset term mappings rewrite individual values. Product versions
        // carry no vocabulary and stay verbatim.
        for (facet, terms) in working.iter_mut() {
            if *facet == Facet::ProductVersion {
                continue;
            }
            for term in terms.iter_mut() {
                *term = self.config.get_mapping(*facet, term);
            }
        }

        // Overrides replace whole facets after mapping; their values are
        // trusted as-is apart from case folding for the lookup.
        for (facet, values) in &self.config.overrides {
            let values = values
                .iter()
                .map(|value| {
                    let value = value.trim();
                    if *facet == Facet::ProductVersion {
                        value.to_string()
                    } else {
                        value.to_lowercase()
                    }
                })
                .collect();
            working.insert(*facet, values);
        }

        // Filename-derived facets resolve one term each; a processing-level
        // hit also records its broader level.
        for facet in FILENAME_FACETS {
            let Some(terms) = working.get(&facet) else {
                continue;
            };
            for term in terms {
                match self.index.resolve(facet, term)? {
                    Some(concept) => {
                        resolution.bag.insert(facet, concept.uri.clone());
                        if facet == Facet::ProcessingLevel {
                            if let Some(broader) =
                                self.index.broader_processing_level(&concept.uri)
                            {
                                resolution
                                    .bag
                                    .insert(Facet::BroaderProcessingLevel, broader);
                            }
                        }
                    }
                    None => self.record_not_found(&mut resolution, facet, term),
                }
            }
        }

        // Attribute facets may hold several terms each.
        for facet in ALLOWED_GLOBAL_ATTRS {
            if facet == Facet::Frequency && self.is_level_2(&working) {
                // Level 2 data is orbital; the stated frequency is ignored.
                resolution.bag.insert(Facet::Frequency, LEVEL_2_FREQUENCY);
                continue;
            }
            let Some(terms) = working.get(&facet) else {
                continue;
            };
            for term in terms {
                if term.eq_ignore_ascii_case("n/a") || term.is_empty() {
                    continue;
                }
                if facet == Facet::Platform {
                    self.resolve_platform(&mut resolution, term)?;
                } else {
                    match self.index.resolve(facet, term)? {
                        Some(concept) => resolution.bag.insert(facet, concept.uri.clone()),
                        None => self.record_not_found(&mut resolution, facet, term),
                    }
                }
            }
        }

        // Product versions have no vocabulary; the trimmed value is final.
        if let Some(terms) = working.get(&Facet::ProductVersion) {
            if let Some(version) = terms.first() {
                let version = version.trim();
                if !version.is_empty() {
                    resolution.bag.insert(Facet::ProductVersion, version);
                }
            }
        }

        Ok(resolution)
    }

    /// A platform term may be a platform, a programme name or a group name.
    /// Platform hits are broadened with their programme and group URIs;
    /// programme and group hits stand in for every platform under them.
    fn resolve_platform(&self, resolution: &mut FileResolution, term: &str) -> Result<()> {
        if let Some(concept) = self.index.resolve(Facet::Platform, term)? {
            let uri = concept.uri.clone();
            resolution.bag.insert(Facet::Platform, uri.clone());
            self.broaden_platform(resolution, &uri)?;
            return Ok(());
        }

        if self.index.programme_labels().contains(&term.to_lowercase()) {
            if let Some(concept) = self.index.resolve(Facet::PlatformProgramme, term)? {
                resolution.bag.insert(Facet::Platform, concept.uri.clone());
                resolution
                    .bag
                    .insert(Facet::PlatformProgramme, concept.uri.clone());
                resolution.bag.multi_platform = true;
                return Ok(());
            }
        }

        if self.index.group_labels().contains(&term.to_lowercase()) {
            if let Some(concept) = self.index.resolve(Facet::PlatformGroup, term)? {
                resolution.bag.insert(Facet::Platform, concept.uri.clone());
                resolution
                    .bag
                    .insert(Facet::PlatformGroup, concept.uri.clone());
                resolution.bag.multi_platform = true;
                return Ok(());
            }
        }

        self.record_not_found(resolution, Facet::Platform, term);
        Ok(())
    }

    /// Record the programme and group above a resolved platform, both in the
    /// platform set itself and in their own facets.
    fn broaden_platform(&self, resolution: &mut FileResolution, platform_uri: &str) -> Result<()> {
        let Some(programme_label) = self.index.platforms_programme(platform_uri) else {
            return Ok(());
        };
        let Some(programme) = self
            .index
            .resolve(Facet::PlatformProgramme, programme_label)?
        else {
            return Ok(());
        };
        let programme_uri = programme.uri.clone();
        resolution.bag.insert(Facet::Platform, programme_uri.clone());
        resolution
            .bag
            .insert(Facet::PlatformProgramme, programme_uri.clone());

        if let Some(group_label) = self.index.programmes_group(&programme_uri) {
            if let Some(group) = self.index.resolve(Facet::PlatformGroup, group_label)? {
                resolution.bag.insert(Facet::Platform, group.uri.clone());
                resolution
                    .bag
                    .insert(Facet::PlatformGroup, group.uri.clone());
            }
        }
        Ok(())
    }

    /// Any processing-level term containing a `2` marks the file as Level 2.
    /// Terms are already mapped by the time this runs.
    fn is_level_2(&self, working: &BTreeMap<Facet, Vec<String>>) -> bool {
        working
            .get(&Facet::ProcessingLevel)
            .map(|terms| terms.iter().any(|term| term.contains('2')))
            .unwrap_or(false)
    }

    fn record_not_found(&self, resolution: &mut FileResolution, facet: Facet, term: &str) {
        warn!(
            dataset = self.dataset_id,
            facet = %facet,
            term,
            "term not found in vocabulary"
        );
        resolution.not_found.insert(format!("{facet}: {term}"));
    }
}
