//! In-memory vocabulary fixture shared by the unit tests.

use std::collections::BTreeMap;

use crate::concept::Concept;
use crate::facet::LEVEL_2_FREQUENCY;
use crate::ports::{Broader, VocabularyService};
use crate::vocab::VocabularyIndex;
use crate::Result;

pub(crate) const VOCAB_URL: &str = "http://vocab.test/scheme/cci";

pub(crate) const ECV_SEAICE: &str = "http://vocab.test/collection/cci/ecv/ecv_seaice";
pub(crate) const ECV_CLOUD: &str = "http://vocab.test/collection/cci/ecv/ecv_cloud";
pub(crate) const PROC_L2P: &str = "http://vocab.test/collection/cci/procLev/proc_l2p";
pub(crate) const PROC_L2: &str = "http://vocab.test/collection/cci/procLev/proc_l2";
pub(crate) const PROC_L3C: &str = "http://vocab.test/collection/cci/procLev/proc_l3c";
pub(crate) const PROC_L3: &str = "http://vocab.test/collection/cci/procLev/proc_l3";
pub(crate) const PROC_L4: &str = "http://vocab.test/collection/cci/procLev/proc_l4";
pub(crate) const FREQ_DAY: &str = "http://vocab.test/collection/cci/freq/freq_day";
pub(crate) const PLAT_ERS1: &str = "http://vocab.test/collection/cci/platform/plat_ers1";
pub(crate) const PLAT_ERS2: &str = "http://vocab.test/collection/cci/platform/plat_ers2";
pub(crate) const PLAT_ENVISAT: &str = "http://vocab.test/collection/cci/platform/plat_envisat";
pub(crate) const PLAT_CRYOSAT2: &str = "http://vocab.test/collection/cci/platform/plat_cryosat2";
pub(crate) const PROG_ERS: &str = "http://vocab.test/collection/cci/platformProg/prog_ers";
pub(crate) const GRP_ESA: &str = "http://vocab.test/collection/cci/platformGrp/grp_esa";
pub(crate) const SENS_SIRAL: &str = "http://vocab.test/collection/cci/sensor/sens_siral";
pub(crate) const SENS_ATSR2: &str = "http://vocab.test/collection/cci/sensor/sens_atsr2";
pub(crate) const ORG_DTU: &str = "http://vocab.test/collection/cci/org/org_dtu";
pub(crate) const DT_SITHICK: &str = "http://vocab.test/collection/cci/dataType/dt_sithick";
pub(crate) const PROD_SIRAL: &str = "http://vocab.test/collection/cci/product/prod_siral";
pub(crate) const PROD_MERGED: &str = "http://vocab.test/collection/cci/product/prod_merged";

#[derive(Default)]
pub(crate) struct MockVocab {
    pref: BTreeMap<String, BTreeMap<String, Concept>>,
    alt: BTreeMap<String, BTreeMap<String, Concept>>,
    broader: BTreeMap<String, Broader>,
}

impl MockVocab {
    fn pref(&mut self, slug: &str, pairs: &[(&str, &str)]) {
        let scheme = format!("{VOCAB_URL}/{slug}");
        let map = self.pref.entry(scheme).or_default();
        for (label, uri) in pairs {
            map.insert(label.to_lowercase(), Concept::new(*label, *uri));
        }
    }

    fn alt(&mut self, slug: &str, pairs: &[(&str, &str)]) {
        let scheme = format!("{VOCAB_URL}/{slug}");
        let map = self.alt.entry(scheme).or_default();
        for (label, uri) in pairs {
            map.insert(label.to_lowercase(), Concept::new(*label, *uri));
        }
    }

    fn add_broader(&mut self, uri: &str, label: &str, broader_uri: &str) {
        self.broader.insert(
            uri.to_string(),
            Broader {
                label: label.to_string(),
                uri: broader_uri.to_string(),
            },
        );
    }
}

impl VocabularyService for MockVocab {
    fn concepts_in_scheme(&self, scheme: &str) -> Result<BTreeMap<String, Concept>> {
        Ok(self.pref.get(scheme).cloned().unwrap_or_default())
    }

    fn alt_concepts_in_scheme(&self, scheme: &str) -> Result<BTreeMap<String, Concept>> {
        Ok(self.alt.get(scheme).cloned().unwrap_or_default())
    }

    fn broader(&self, uri: &str) -> Result<Option<Broader>> {
        Ok(self.broader.get(uri).cloned())
    }
}

/// A small but complete vocabulary: two ECVs, the level hierarchy, the ERS
/// programme under the ESA group, and enough concepts for the sea-ice
/// end-to-end scenario.
pub(crate) fn fixture_service() -> MockVocab {
    let mut vocab = MockVocab::default();

    vocab.pref("ecv", &[("sea ice", ECV_SEAICE), ("cloud", ECV_CLOUD)]);
    vocab.alt("ecv", &[("SEAICE", ECV_SEAICE), ("CLOUD", ECV_CLOUD)]);

    vocab.pref(
        "procLev",
        &[
            ("level 2 pre-processed", PROC_L2P),
            ("level 2", PROC_L2),
            ("level 3 collated", PROC_L3C),
            ("level 3", PROC_L3),
            ("level 4", PROC_L4),
        ],
    );
    vocab.alt(
        "procLev",
        &[
            ("L2P", PROC_L2P),
            ("L2", PROC_L2),
            ("L3C", PROC_L3C),
            ("L3", PROC_L3),
            ("L4", PROC_L4),
        ],
    );
    vocab.add_broader(PROC_L2P, "level 2", PROC_L2);
    vocab.add_broader(PROC_L3C, "level 3", PROC_L3);

    vocab.pref(
        "freq",
        &[
            ("day", FREQ_DAY),
            ("satellite-orbit-frequency", LEVEL_2_FREQUENCY),
        ],
    );
    vocab.alt("freq", &[("daily", FREQ_DAY)]);

    vocab.pref(
        "platform",
        &[
            ("ERS-1", PLAT_ERS1),
            ("ERS-2", PLAT_ERS2),
            ("ENVISAT", PLAT_ENVISAT),
            ("CryoSat-2", PLAT_CRYOSAT2),
        ],
    );
    vocab.add_broader(PLAT_ERS1, "ERS", PROG_ERS);
    vocab.add_broader(PLAT_ERS2, "ERS", PROG_ERS);
    vocab.add_broader(PROG_ERS, "ESA", GRP_ESA);

    vocab.pref("platformProg", &[("ERS", PROG_ERS)]);
    vocab.pref("platformGrp", &[("ESA", GRP_ESA)]);

    vocab.pref("sensor", &[("SIRAL", SENS_SIRAL), ("ATSR-2", SENS_ATSR2)]);
    vocab.alt("sensor", &[("ATSR2", SENS_ATSR2)]);

    vocab.pref("org", &[("DTU Space", ORG_DTU)]);

    vocab.pref("dataType", &[("sea ice thickness", DT_SITHICK)]);
    vocab.alt("dataType", &[("SITHICK", DT_SITHICK)]);

    vocab.pref(
        "product",
        &[("SIRAL_CRYOSAT2-NH", PROD_SIRAL), ("MERGED", PROD_MERGED)],
    );

    vocab
}

pub(crate) fn fixture_index() -> VocabularyIndex {
    VocabularyIndex::build(&fixture_service(), VOCAB_URL).unwrap()
}
