//! Per-dataset configuration: defaults, term mappings, hard overrides,
//! merged-attribute rewrites and the realisation label.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::facet::Facet;

/// Configuration for one dataset. Values are applied by the resolver in a
/// fixed order: defaults seed the working set, mappings rewrite individual
/// terms, overrides replace whole facets unconditionally.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Facet values assumed when a file supplies nothing.
    #[serde(deserialize_with = "one_or_many_map")]
    pub defaults: BTreeMap<Facet, Vec<String>>,

    /// Per-facet raw-term → vocabulary-term rewrites, matched case-insensitively.
    pub mappings: BTreeMap<Facet, BTreeMap<String, String>>,

    /// Facet values applied last, replacing whatever the file supplied.
    #[serde(deserialize_with = "one_or_many_map")]
    pub overrides: BTreeMap<Facet, Vec<String>>,

    /// Whole-attribute rewrites applied before splitting, for values like
    /// `MODIS(Aqua,Terra)` that compress several terms into one string.
    pub merged_attributes: BTreeMap<String, String>,

    /// DRS disambiguator suffix. `EXCLUDE` suppresses id generation.
    pub realisation: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            defaults: BTreeMap::new(),
            mappings: BTreeMap::new(),
            overrides: BTreeMap::new(),
            merged_attributes: BTreeMap::new(),
            realisation: "r1".to_string(),
        }
    }
}

impl DatasetConfig {
    /// Lowercase and trim a term, then look it up in this dataset's mapping
    /// for the facet. Keys match case-insensitively; an unmatched term passes
    /// through lowercased.
    pub fn get_mapping(&self, facet: Facet, term: &str) -> String {
        let term = term.trim().to_lowercase();

        if let Some(facet_map) = self.mappings.get(&facet) {
            for (key, mapped) in facet_map {
                if term == key.to_lowercase() {
                    return mapped.to_lowercase();
                }
            }
        }

        term
    }

    /// Rewrite a whole raw attribute string, or return it unchanged.
    pub fn merged_attribute<'a>(&'a self, raw: &'a str) -> &'a str {
        match self.merged_attributes.get(raw) {
            Some(replacement) => replacement,
            None => raw,
        }
    }

    pub fn is_excluded(&self) -> bool {
        self.realisation == crate::facet::EXCLUDE_REALISATION
    }
}

/// Config JSON allows both `"ecv": "fire"` and `"platform": ["ERS-1", "ERS-2"]`.
pub fn one_or_many_map<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<Facet, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let raw: BTreeMap<Facet, OneOrMany> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(facet, value)| {
            let values = match value {
                OneOrMany::One(s) => vec![s],
                OneOrMany::Many(v) => v,
            };
            (facet, values)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_platform_mapping() -> DatasetConfig {
        let mut mappings = BTreeMap::new();
        let mut platform = BTreeMap::new();
        platform.insert("ERS2".to_string(), "ERS-2".to_string());
        mappings.insert(Facet::Platform, platform);
        DatasetConfig {
            mappings,
            ..DatasetConfig::default()
        }
    }

    #[test]
    fn get_mapping_is_case_insensitive() {
        let config = config_with_platform_mapping();
        assert_eq!(config.get_mapping(Facet::Platform, "ERS2"), "ers-2");
        assert_eq!(config.get_mapping(Facet::Platform, "ers2"), "ers-2");
    }

    #[test]
    fn get_mapping_passes_unmatched_terms_through_lowercased() {
        let config = config_with_platform_mapping();
        assert_eq!(config.get_mapping(Facet::Platform, " ENVISAT "), "envisat");
        assert_eq!(config.get_mapping(Facet::Sensor, "SIRAL"), "siral");
    }

    #[test]
    fn merged_attribute_rewrites_exact_matches_only() {
        let mut config = DatasetConfig::default();
        config
            .merged_attributes
            .insert("MODIS(Aqua,Terra)".to_string(), "Aqua,Terra".to_string());
        assert_eq!(config.merged_attribute("MODIS(Aqua,Terra)"), "Aqua,Terra");
        assert_eq!(config.merged_attribute("MODIS"), "MODIS");
    }

    #[test]
    fn deserializes_scalar_and_list_values() {
        let config: DatasetConfig = serde_json::from_str(
            r#"{
                "defaults": {"ecv": "sea ice", "platform": ["ERS-1", "ERS-2"]},
                "mappings": {"sensor": {"AMSR-E": "AMSRE"}},
                "overrides": {"institution": "DTU Space"},
                "realisation": "r2"
            }"#,
        )
        .unwrap();

        assert_eq!(config.defaults[&Facet::Ecv], vec!["sea ice"]);
        assert_eq!(config.defaults[&Facet::Platform], vec!["ERS-1", "ERS-2"]);
        assert_eq!(config.overrides[&Facet::Institution], vec!["DTU Space"]);
        assert_eq!(config.realisation, "r2");
    }

    #[test]
    fn realisation_defaults_to_r1() {
        let config: DatasetConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.realisation, "r1");
        assert!(!config.is_excluded());
    }

    #[test]
    fn exclude_sentinel() {
        let config: DatasetConfig =
            serde_json::from_str(r#"{"realisation": "EXCLUDE"}"#).unwrap();
        assert!(config.is_excluded());
    }
}
