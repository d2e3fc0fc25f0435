//! Raw-value extraction: the two dash-delimited filename grammars,
//! attribute splitting, and angle-bracket multi-value expansion.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::facet::Facet;

const ESACCI: &str = "ESACCI";

/// `ERS-<1,2>` style compressed multi-values.
static MULTI_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.*-)<(.*)>.*").unwrap());

/// Generic attribute separator.
static ATTR_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[;,]").unwrap());

/// Extract the filename-derived facets from a file name.
///
/// Two grammars are recognized, both `-` delimited:
///
/// Form 1:
///   `<Date>[<Time>]-ESACCI-<ProcessingLevel>_<Ecv>-<DataType>-<ProductString>[-...]-fv<Version>.nc`
/// Form 2:
///   `ESACCI-<Ecv>-<ProcessingLevel>-<DataType>-<ProductString>[-<Segregator>]-<Date>[<Time>]-fv<Version>.nc`
///
/// `None` means the name matched neither grammar; the caller logs the format
/// error and carries on with an empty overlay.
pub fn parse_filename(name: &str) -> Option<BTreeMap<Facet, String>> {
    let segments: Vec<&str> = name.split('-').collect();

    if segments.len() < 5 {
        return None;
    }

    if segments[1] == ESACCI {
        from_form1(&segments)
    } else if segments[0] == ESACCI {
        Some(from_form2(&segments))
    } else {
        None
    }
}

fn from_form1(segments: &[&str]) -> Option<BTreeMap<Facet, String>> {
    // Segment 2 is <ProcessingLevel>_<Ecv>; no underscore means the name
    // does not actually follow the grammar.
    let (level, ecv) = segments[2].split_once('_')?;

    let mut values = BTreeMap::new();
    values.insert(Facet::ProcessingLevel, level.to_string());
    values.insert(Facet::Ecv, ecv.to_string());
    values.insert(Facet::DataType, segments[3].to_string());
    values.insert(Facet::ProductString, segments[4].to_string());
    Some(values)
}

fn from_form2(segments: &[&str]) -> BTreeMap<Facet, String> {
    // Everything between the data type and the indicative date belongs to
    // the product string, so an additional segregator folds into it.
    let end = segments.len().saturating_sub(2).max(5);
    let product = segments[4..end].join("-");

    let mut values = BTreeMap::new();
    values.insert(Facet::ProcessingLevel, segments[2].to_string());
    values.insert(Facet::Ecv, segments[1].to_string());
    values.insert(Facet::DataType, segments[3].to_string());
    values.insert(Facet::ProductString, product);
    values
}

/// Split a raw metadata attribute into individual terms.
///
/// Platform values containing `<` use `", "` as the separator so the
/// angle-bracket shorthand survives the split; everything else splits on
/// `;` or `,`.
pub fn split_attribute(facet: Facet, raw: &str) -> Vec<String> {
    if facet == Facet::Platform && raw.contains('<') {
        raw.split(", ").map(str::to_string).collect()
    } else {
        ATTR_SEPARATOR.split(raw).map(str::to_string).collect()
    }
}

/// Expand angle-bracket compressed segments: `ERS-<1,2>` becomes
/// `ERS-1`, `ERS-2`. Segments without the shorthand pass through.
pub fn expand_multi_values(segments: Vec<String>) -> Vec<String> {
    let mut expanded = Vec::with_capacity(segments.len());

    for segment in segments {
        match MULTI_VALUE.captures(&segment) {
            Some(captures) => {
                let stem = &captures[1];
                for value in captures[2].split(',') {
                    expanded.push(format!("{stem}{value}"));
                }
            }
            None => expanded.push(segment),
        }
    }

    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form2_extracts_the_seaice_example() {
        let values =
            parse_filename("ESACCI-SEAICE-L2P-SITHICK-SIRAL_CRYOSAT2-NH-20160101-fv2.0.nc")
                .unwrap();
        assert_eq!(values[&Facet::ProcessingLevel], "L2P");
        assert_eq!(values[&Facet::Ecv], "SEAICE");
        assert_eq!(values[&Facet::DataType], "SITHICK");
        assert_eq!(values[&Facet::ProductString], "SIRAL_CRYOSAT2-NH");
    }

    #[test]
    fn form2_without_segregator() {
        let values =
            parse_filename("ESACCI-SEALEVEL-L4-MSLA-MERGED-19930115000000-fv02.nc").unwrap();
        assert_eq!(values[&Facet::ProductString], "MERGED");
        assert_eq!(values[&Facet::Ecv], "SEALEVEL");
    }

    #[test]
    fn form1_splits_level_and_ecv_on_underscore() {
        let values =
            parse_filename("20100101-ESACCI-L3C_CLOUD-CLD_PRODUCTS-AVHRR_NOAA-fv2.0.nc").unwrap();
        assert_eq!(values[&Facet::ProcessingLevel], "L3C");
        assert_eq!(values[&Facet::Ecv], "CLOUD");
        assert_eq!(values[&Facet::DataType], "CLD_PRODUCTS");
        assert_eq!(values[&Facet::ProductString], "AVHRR_NOAA");
    }

    #[test]
    fn form1_without_underscore_is_a_format_error() {
        assert!(parse_filename("20100101-ESACCI-L3C-CLD-AVHRR-fv2.0.nc").is_none());
    }

    #[test]
    fn too_few_segments_is_a_format_error() {
        assert!(parse_filename("ESACCI-CLOUD-fv2.0.nc").is_none());
        assert!(parse_filename("random_file.nc").is_none());
    }

    #[test]
    fn unrecognized_prefix_is_a_format_error() {
        assert!(parse_filename("OTHER-CLOUD-L3C-CLD-AVHRR-20100101-fv2.0.nc").is_none());
    }

    #[test]
    fn expand_multi_values_expands_the_shorthand() {
        let expanded = expand_multi_values(vec!["ERS-<1,2>".to_string()]);
        assert_eq!(expanded, vec!["ERS-1".to_string(), "ERS-2".to_string()]);
    }

    #[test]
    fn expand_multi_values_passes_plain_segments_through() {
        let expanded =
            expand_multi_values(vec!["ENVISAT".to_string(), "ERS-<1,2>".to_string()]);
        assert_eq!(expanded, vec!["ENVISAT", "ERS-1", "ERS-2"]);
    }

    #[test]
    fn split_attribute_on_commas_and_semicolons() {
        assert_eq!(
            split_attribute(Facet::Sensor, "GOME;SCIAMACHY,OMI"),
            vec!["GOME", "SCIAMACHY", "OMI"]
        );
    }

    #[test]
    fn platform_with_angle_brackets_splits_on_comma_space() {
        assert_eq!(
            split_attribute(Facet::Platform, "ERS-<1,2>, ENVISAT"),
            vec!["ERS-<1,2>", "ENVISAT"]
        );
    }

    #[test]
    fn platform_without_angle_brackets_uses_the_generic_separator() {
        assert_eq!(
            split_attribute(Facet::Platform, "ERS-1,ENVISAT"),
            vec!["ERS-1", "ENVISAT"]
        );
    }
}
