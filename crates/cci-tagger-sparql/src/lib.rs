//! SPARQL-backed implementation of the vocabulary service: three fixed
//! query shapes against a triple store's `/sparql` endpoint, results in the
//! standard SPARQL JSON format.

use std::collections::BTreeMap;

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use cci_tagger_core::ports::{Broader, VocabularyService};
use cci_tagger_core::{Concept, Result};

const PREFIXES: &str = "\
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
";

/// Vocabulary lookups over a SPARQL endpoint at `http://{host}/sparql`.
pub struct SparqlVocabService {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl SparqlVocabService {
    pub fn new(host: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: format!("http://{host}/sparql"),
        }
    }

    fn query(&self, sparql: &str) -> Result<SparqlResults> {
        debug!(endpoint = %self.endpoint, "sparql query");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", sparql), ("output", "json")])
            .header(reqwest::header::ACCEPT, "application/sparql-results+json")
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .with_context(|| format!("sparql query against {}", self.endpoint))?;

        let results: SparqlResults = response
            .json()
            .with_context(|| format!("sparql result parse from {}", self.endpoint))?;
        Ok(results)
    }
}

impl VocabularyService for SparqlVocabService {
    fn concepts_in_scheme(&self, scheme: &str) -> Result<BTreeMap<String, Concept>> {
        let sparql = format!(
            "{PREFIXES}\
SELECT ?concept ?label WHERE {{
  ?concept skos:inScheme <{scheme}> .
  ?concept skos:prefLabel ?label
}}"
        );
        Ok(concepts_from_bindings(&self.query(&sparql)?))
    }

    fn alt_concepts_in_scheme(&self, scheme: &str) -> Result<BTreeMap<String, Concept>> {
        let sparql = format!(
            "{PREFIXES}\
SELECT ?concept ?label WHERE {{
  ?concept skos:inScheme <{scheme}> .
  ?concept skos:altLabel ?label
}}"
        );
        Ok(concepts_from_bindings(&self.query(&sparql)?))
    }

    fn broader(&self, uri: &str) -> Result<Option<Broader>> {
        let sparql = format!(
            "{PREFIXES}\
SELECT ?concept ?label WHERE {{
  ?concept skos:narrower <{uri}> .
  ?concept skos:prefLabel ?label
}}"
        );
        let results = self.query(&sparql)?;
        Ok(results.results.bindings.into_iter().next().and_then(|b| {
            Some(Broader {
                label: b.label?.value,
                uri: b.concept?.value,
            })
        }))
    }
}

// ── SPARQL JSON results format ──

#[derive(Debug, Deserialize)]
pub struct SparqlResults {
    pub results: Bindings,
}

#[derive(Debug, Deserialize)]
pub struct Bindings {
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
pub struct Binding {
    pub concept: Option<Term>,
    pub label: Option<Term>,
}

#[derive(Debug, Deserialize)]
pub struct Term {
    pub value: String,
}

/// Collect `?concept ?label` rows into a lowercase-label keyed map.
fn concepts_from_bindings(results: &SparqlResults) -> BTreeMap<String, Concept> {
    let mut concepts = BTreeMap::new();
    for binding in &results.results.bindings {
        let (Some(concept), Some(label)) = (&binding.concept, &binding.label) else {
            continue;
        };
        concepts.insert(
            label.value.to_lowercase(),
            Concept::new(label.value.clone(), concept.value.clone()),
        );
    }
    concepts
}
