//! The closed set of metadata facets and the fixed orderings derived from it.

use serde::{Deserialize, Serialize};

/// One recognized metadata category.
///
/// The wire name of [`Facet::Frequency`] is `time_coverage_resolution` — the
/// global attribute it is read from in the data files.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    BroaderProcessingLevel,
    DataType,
    Ecv,
    #[serde(rename = "time_coverage_resolution", alias = "frequency")]
    Frequency,
    Institution,
    Platform,
    PlatformProgramme,
    PlatformGroup,
    ProcessingLevel,
    ProductString,
    ProductVersion,
    Sensor,
}

impl Facet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BroaderProcessingLevel => "broader_processing_level",
            Self::DataType => "data_type",
            Self::Ecv => "ecv",
            Self::Frequency => "time_coverage_resolution",
            Self::Institution => "institution",
            Self::Platform => "platform",
            Self::PlatformProgramme => "platform_programme",
            Self::PlatformGroup => "platform_group",
            Self::ProcessingLevel => "processing_level",
            Self::ProductString => "product_string",
            Self::ProductVersion => "product_version",
            Self::Sensor => "sensor",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "broader_processing_level" => Some(Self::BroaderProcessingLevel),
            "data_type" => Some(Self::DataType),
            "ecv" => Some(Self::Ecv),
            "time_coverage_resolution" | "frequency" => Some(Self::Frequency),
            "institution" => Some(Self::Institution),
            "platform" => Some(Self::Platform),
            "platform_programme" => Some(Self::PlatformProgramme),
            "platform_group" => Some(Self::PlatformGroup),
            "processing_level" => Some(Self::ProcessingLevel),
            "product_string" => Some(Self::ProductString),
            "product_version" => Some(Self::ProductVersion),
            "sensor" => Some(Self::Sensor),
            _ => None,
        }
    }

    /// The collapsed display label used when a multi-valued facet resolves
    /// to more than one concept. `None` for single-valued facets.
    pub fn multi_label(&self) -> Option<&'static str> {
        match self {
            Self::Frequency => Some("multi-frequency"),
            Self::Institution => Some("multi-institution"),
            Self::Platform => Some("multi-platform"),
            Self::Sensor => Some("multi-sensor"),
            _ => None,
        }
    }

    /// Which label space supplies the display label for a resolved URI.
    pub fn label_source(&self) -> LabelSource {
        match self {
            Self::BroaderProcessingLevel => LabelSource::Preferred,
            Self::DataType => LabelSource::Alternate,
            Self::Ecv => LabelSource::Alternate,
            Self::Frequency => LabelSource::Preferred,
            Self::Institution => LabelSource::Preferred,
            Self::Platform => LabelSource::PlatformComposite,
            Self::PlatformProgramme => LabelSource::Preferred,
            Self::PlatformGroup => LabelSource::Preferred,
            Self::ProcessingLevel => LabelSource::Alternate,
            Self::ProductString => LabelSource::Preferred,
            Self::ProductVersion => LabelSource::None,
            Self::Sensor => LabelSource::Preferred,
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed set of label-source strategies, switched on directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    /// Preferred-label space.
    Preferred,
    /// Alternate-label space.
    Alternate,
    /// Platform URIs may live in the platform, group or programme space;
    /// each is tried in that order.
    PlatformComposite,
    /// No vocabulary exists; the stored value is already the label.
    None,
}

/// The eight facets of a DRS id, in assembly order.
pub const DRS_FACETS: [Facet; 8] = [
    Facet::Ecv,
    Facet::Frequency,
    Facet::ProcessingLevel,
    Facet::DataType,
    Facet::Sensor,
    Facet::Platform,
    Facet::ProductString,
    Facet::ProductVersion,
];

/// Global attributes read from the data files themselves.
pub const ALLOWED_GLOBAL_ATTRS: [Facet; 4] = [
    Facet::Frequency,
    Facet::Institution,
    Facet::Platform,
    Facet::Sensor,
];

/// Facets that hold at most one concept per file.
pub const SINGLE_VALUE_FACETS: [Facet; 5] = [
    Facet::BroaderProcessingLevel,
    Facet::DataType,
    Facet::Ecv,
    Facet::ProcessingLevel,
    Facet::ProductString,
];

/// Facets parsed out of the file name.
pub const FILENAME_FACETS: [Facet; 4] = [
    Facet::ProcessingLevel,
    Facet::Ecv,
    Facet::DataType,
    Facet::ProductString,
];

/// Facets reported to the catalogue tagging output.
pub const MOLES_FACETS: [Facet; 9] = [
    Facet::BroaderProcessingLevel,
    Facet::DataType,
    Facet::Ecv,
    Facet::ProcessingLevel,
    Facet::ProductString,
    Facet::Frequency,
    Facet::Institution,
    Facet::Platform,
    Facet::Sensor,
];

/// Vocabulary scheme slug per facet, appended to the base vocabulary URL.
pub const SCHEME_FACETS: [(Facet, &str); 10] = [
    (Facet::DataType, "dataType"),
    (Facet::Ecv, "ecv"),
    (Facet::Frequency, "freq"),
    (Facet::Platform, "platform"),
    (Facet::PlatformProgramme, "platformProg"),
    (Facet::PlatformGroup, "platformGrp"),
    (Facet::ProcessingLevel, "procLev"),
    (Facet::Sensor, "sensor"),
    (Facet::Institution, "org"),
    (Facet::ProductString, "product"),
];

/// Level 2 data is pinned to the satellite-orbit frequency concept.
pub const LEVEL_2_FREQUENCY: &str =
    "http://vocab.ceda.ac.uk/collection/cci/freq/freq_sat_orb";

/// Realisation sentinel that suppresses DRS id generation for a dataset.
pub const EXCLUDE_REALISATION: &str = "EXCLUDE";

/// Extensions of actual data files; a missing DRS facet on one of these is
/// an error rather than a warning.
pub const DATA_EXTENSIONS: [&str; 4] = [".nc", ".prj", ".shp", ".shx"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_from_str_round_trip() {
        for facet in [
            Facet::BroaderProcessingLevel,
            Facet::DataType,
            Facet::Ecv,
            Facet::Frequency,
            Facet::Institution,
            Facet::Platform,
            Facet::PlatformProgramme,
            Facet::PlatformGroup,
            Facet::ProcessingLevel,
            Facet::ProductString,
            Facet::ProductVersion,
            Facet::Sensor,
        ] {
            assert_eq!(Facet::from_str(facet.as_str()), Some(facet));
        }
    }

    #[test]
    fn frequency_wire_name_is_the_attribute_name() {
        assert_eq!(Facet::Frequency.as_str(), "time_coverage_resolution");
        assert_eq!(Facet::from_str("frequency"), Some(Facet::Frequency));
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Facet::Frequency).unwrap();
        assert_eq!(json, "\"time_coverage_resolution\"");
        let back: Facet = serde_json::from_str("\"frequency\"").unwrap();
        assert_eq!(back, Facet::Frequency);
    }

    #[test]
    fn multi_labels_cover_exactly_the_multi_valued_facets() {
        assert_eq!(Facet::Platform.multi_label(), Some("multi-platform"));
        assert_eq!(Facet::Sensor.multi_label(), Some("multi-sensor"));
        assert_eq!(Facet::Frequency.multi_label(), Some("multi-frequency"));
        assert_eq!(Facet::Institution.multi_label(), Some("multi-institution"));
        assert_eq!(Facet::Ecv.multi_label(), None);
        assert_eq!(Facet::ProductVersion.multi_label(), None);
    }

    #[test]
    fn label_source_table() {
        assert_eq!(Facet::Ecv.label_source(), LabelSource::Alternate);
        assert_eq!(Facet::Sensor.label_source(), LabelSource::Preferred);
        assert_eq!(Facet::Platform.label_source(), LabelSource::PlatformComposite);
        assert_eq!(Facet::ProductVersion.label_source(), LabelSource::None);
    }

    #[test]
    fn drs_order_is_fixed() {
        assert_eq!(DRS_FACETS[0], Facet::Ecv);
        assert_eq!(DRS_FACETS[7], Facet::ProductVersion);
    }
}
