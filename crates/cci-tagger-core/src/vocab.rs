//! An in-memory index over the SKOS vocabulary: label→concept maps per
//! facet, URI→label reverse maps, and the two fixed-depth hierarchies
//! (platform → programme → group, processing level → broader level).
//!
//! Built once per run from a [`VocabularyService`]; every lookup after that
//! is a map probe.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::concept::Concept;
use crate::error::TaggerError;
use crate::facet::{Facet, LabelSource, SCHEME_FACETS};
use crate::ports::VocabularyService;
use crate::resolver::ResolvedFacetBag;
use crate::Result;

pub struct VocabularyIndex {
    /// Preferred labels, keyed by lowercase label.
    pref: BTreeMap<Facet, BTreeMap<String, Concept>>,
    /// Alternate labels, keyed by lowercase label.
    alt: BTreeMap<Facet, BTreeMap<String, Concept>>,
    /// URI → preferred label (original case).
    pref_by_uri: BTreeMap<Facet, BTreeMap<String, String>>,
    /// URI → alternate label (original case).
    alt_by_uri: BTreeMap<Facet, BTreeMap<String, String>>,
    /// Platform URI → programme label.
    platform_programme: BTreeMap<String, String>,
    /// Programme URI → group label.
    programme_group: BTreeMap<String, String>,
    /// Processing-level URI → broader level URI.
    proc_level_broader: BTreeMap<String, String>,
    /// Lowercased programme labels, for membership tests on raw terms.
    programme_labels: BTreeSet<String>,
    /// Lowercased group labels.
    group_labels: BTreeSet<String>,
}

impl VocabularyIndex {
    /// Fetch every facet scheme and walk the two hierarchies.
    pub fn build(service: &dyn VocabularyService, vocab_url: &str) -> Result<Self> {
        let mut pref: BTreeMap<Facet, BTreeMap<String, Concept>> = BTreeMap::new();
        let mut alt: BTreeMap<Facet, BTreeMap<String, Concept>> = BTreeMap::new();

        for (facet, slug) in SCHEME_FACETS {
            let scheme = format!("{vocab_url}/{slug}");
            let concepts = service.concepts_in_scheme(&scheme)?;
            debug!(facet = %facet, scheme = %scheme, count = concepts.len(), "loaded scheme");
            pref.insert(facet, concepts);
            alt.insert(facet, service.alt_concepts_in_scheme(&scheme)?);
        }

        // Platform hierarchy: each platform has at most one programme, each
        // programme at most one group.
        let mut platform_programme = BTreeMap::new();
        let mut programme_group = BTreeMap::new();
        let platforms = pref.get(&Facet::Platform).cloned().unwrap_or_default();
        for concept in platforms.values() {
            let Some(programme) = service.broader(&concept.uri)? else {
                continue;
            };
            if programme.label.is_empty() {
                continue;
            }
            platform_programme.insert(concept.uri.clone(), programme.label.clone());
            if let Some(group) = service.broader(&programme.uri)? {
                if !group.label.is_empty() {
                    programme_group.insert(programme.uri.clone(), group.label);
                }
            }
        }

        // Processing-level hierarchy is a single hop.
        let mut proc_level_broader = BTreeMap::new();
        let levels = pref
            .get(&Facet::ProcessingLevel)
            .cloned()
            .unwrap_or_default();
        for concept in levels.values() {
            if let Some(broader) = service.broader(&concept.uri)? {
                proc_level_broader.insert(concept.uri.clone(), broader.uri);
            }
        }

        // The broader levels have no scheme of their own; they are the
        // distinct broader targets, displayed by their processing-level
        // alternate labels.
        let proc_alt_by_uri: BTreeMap<&str, &str> = alt
            .get(&Facet::ProcessingLevel)
            .map(|m| {
                m.values()
                    .map(|c| (c.uri.as_str(), c.label.as_str()))
                    .collect()
            })
            .unwrap_or_default();
        let mut broader_pref = BTreeMap::new();
        for uri in proc_level_broader.values().collect::<BTreeSet<_>>() {
            if let Some(label) = proc_alt_by_uri.get(uri.as_str()) {
                broader_pref.insert(label.to_lowercase(), Concept::new(*label, uri.clone()));
            }
        }
        pref.insert(Facet::BroaderProcessingLevel, broader_pref);
        alt.insert(Facet::BroaderProcessingLevel, BTreeMap::new());

        let pref_by_uri = reverse(&pref);
        let alt_by_uri = reverse(&alt);
        let programme_labels = platform_programme
            .values()
            .map(|l| l.to_lowercase())
            .collect();
        let group_labels = programme_group.values().map(|l| l.to_lowercase()).collect();

        Ok(Self {
            pref,
            alt,
            pref_by_uri,
            alt_by_uri,
            platform_programme,
            programme_group,
            proc_level_broader,
            programme_labels,
            group_labels,
        })
    }

    /// Preferred label→concept map for a facet.
    pub fn labels(&self, facet: Facet) -> Result<&BTreeMap<String, Concept>> {
        self.pref
            .get(&facet)
            .ok_or_else(|| TaggerError::UnknownFacet(facet.to_string()))
    }

    /// Alternate label→concept map for a facet.
    pub fn alt_labels(&self, facet: Facet) -> Result<&BTreeMap<String, Concept>> {
        self.alt
            .get(&facet)
            .ok_or_else(|| TaggerError::UnknownFacet(facet.to_string()))
    }

    /// Look a term up in the facet's preferred labels, then its alternates.
    /// Matching is case-insensitive.
    pub fn resolve(&self, facet: Facet, term: &str) -> Result<Option<&Concept>> {
        let key = term.to_lowercase();
        if let Some(concept) = self.labels(facet)?.get(&key) {
            return Ok(Some(concept));
        }
        Ok(self.alt_labels(facet)?.get(&key))
    }

    /// The broader level above a processing-level URI, if any.
    pub fn broader_processing_level(&self, uri: &str) -> Option<&str> {
        self.proc_level_broader.get(uri).map(String::as_str)
    }

    /// The programme label above a platform URI, if any.
    pub fn platforms_programme(&self, uri: &str) -> Option<&str> {
        self.platform_programme.get(uri).map(String::as_str)
    }

    /// The group label above a programme URI, if any.
    pub fn programmes_group(&self, uri: &str) -> Option<&str> {
        self.programme_group.get(uri).map(String::as_str)
    }

    /// Lowercased programme labels.
    pub fn programme_labels(&self) -> &BTreeSet<String> {
        &self.programme_labels
    }

    /// Lowercased group labels.
    pub fn group_labels(&self) -> &BTreeSet<String> {
        &self.group_labels
    }

    /// The display label for a resolved URI, picked from the facet's label
    /// space. Facets without a vocabulary store the label directly, so the
    /// stored value comes back as-is.
    pub fn label_from_uri(&self, facet: Facet, uri: &str) -> Option<String> {
        match facet.label_source() {
            LabelSource::Preferred => self.pref_by_uri.get(&facet)?.get(uri).cloned(),
            LabelSource::Alternate => self.alt_by_uri.get(&facet)?.get(uri).cloned(),
            LabelSource::PlatformComposite => {
                // A platform-facet URI may be a platform, a group (from
                // broadening) or a programme.
                for space in [
                    Facet::Platform,
                    Facet::PlatformGroup,
                    Facet::PlatformProgramme,
                ] {
                    if let Some(label) = self.pref_by_uri.get(&space).and_then(|m| m.get(uri)) {
                        return Some(label.clone());
                    }
                }
                Some(uri.to_string())
            }
            LabelSource::None => Some(uri.to_string()),
        }
    }

    /// Display labels for every facet in a resolved bag.
    pub fn labels_for_bag(&self, bag: &ResolvedFacetBag) -> BTreeMap<Facet, Vec<String>> {
        let mut labels = BTreeMap::new();
        for (facet, uris) in &bag.uris {
            let facet_labels: Vec<String> = uris
                .iter()
                .filter_map(|uri| self.label_from_uri(*facet, uri))
                .collect();
            labels.insert(*facet, facet_labels);
        }
        labels
    }
}

fn reverse(
    maps: &BTreeMap<Facet, BTreeMap<String, Concept>>,
) -> BTreeMap<Facet, BTreeMap<String, String>> {
    maps.iter()
        .map(|(facet, concepts)| {
            let by_uri = concepts
                .values()
                .map(|c| (c.uri.clone(), c.label.clone()))
                .collect();
            (*facet, by_uri)
        })
        .collect()
}
