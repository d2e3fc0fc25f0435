//! Run outputs: one DRS JSON report per dataset, plus a CSV of catalogue
//! tag rows across the whole run.

use std::path::Path;

use anyhow::Context;

use cci_tagger_core::facet::MOLES_FACETS;
use cci_tagger_core::processor::DatasetReport;
use cci_tagger_core::Result;

/// Write a dataset's report as pretty-printed JSON into `dir`, named after
/// the dataset id with path separators flattened.
pub fn write_drs_json(dir: &Path, report: &DatasetReport) -> Result<std::path::PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    let name = format!("{}.json", report.dataset_id.trim_matches('/').replace('/', "_"));
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(report).context("serializing dataset report")?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// `(dataset, facet, uri)` rows for the catalogue, restricted to the facets
/// the catalogue ingests.
pub fn moles_rows(report: &DatasetReport) -> Vec<(String, String, String)> {
    let mut rows = Vec::new();
    for facet in MOLES_FACETS {
        let Some(uris) = report.facets.get(&facet) else {
            continue;
        };
        for uri in uris {
            rows.push((
                report.dataset_id.clone(),
                facet.to_string(),
                uri.clone(),
            ));
        }
    }
    rows
}

/// Write the catalogue rows of every report into one CSV file.
pub fn write_moles_csv(path: &Path, reports: &[DatasetReport]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer
        .write_record(["dataset", "facet", "uri"])
        .context("writing csv header")?;
    for report in reports {
        for (dataset, facet, uri) in moles_rows(report) {
            writer
                .write_record([dataset, facet, uri])
                .context("writing csv row")?;
        }
    }
    writer.flush().context("flushing csv")?;
    Ok(())
}
