//! File metadata extraction. Data files ship with a `<name>.json` sidecar
//! holding their global attributes; reading straight out of the binary
//! formats is left to the archive's own tooling.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use cci_tagger_core::facet::ALLOWED_GLOBAL_ATTRS;
use cci_tagger_core::{AttributeExtractor, Facet, Result};

/// Reads global attributes from JSON sidecar files. A file without a
/// sidecar, or with one that does not parse, contributes no attributes.
#[derive(Debug, Default)]
pub struct SidecarExtractor;

impl SidecarExtractor {
    fn sidecar_path(path: &Path) -> std::path::PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".json");
        std::path::PathBuf::from(name)
    }
}

impl AttributeExtractor for SidecarExtractor {
    fn read_attributes(&self, path: &Path) -> Result<BTreeMap<Facet, String>> {
        let sidecar = Self::sidecar_path(path);
        let Ok(text) = std::fs::read_to_string(&sidecar) else {
            debug!(file = %path.display(), "no metadata sidecar");
            return Ok(BTreeMap::new());
        };
        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => {
                debug!(file = %sidecar.display(), error = %err, "unreadable sidecar");
                return Ok(BTreeMap::new());
            }
        };

        let Some(object) = value.as_object() else {
            return Ok(BTreeMap::new());
        };

        let mut attrs = BTreeMap::new();
        for facet in ALLOWED_GLOBAL_ATTRS
            .into_iter()
            .chain([Facet::ProductVersion])
        {
            if let Some(value) = object.get(facet.as_str()) {
                if let Some(text) = stringify(value) {
                    attrs.insert(facet, text);
                }
            }
        }
        Ok(attrs)
    }
}

/// Attribute values come as strings, numbers or lists of either.
fn stringify(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(stringify).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(","))
            }
        }
        _ => None,
    }
}
