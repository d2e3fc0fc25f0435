//! Command-line client: tag a file, a dataset directory, or every dataset
//! the configuration store declares, then write the DRS reports and the
//! catalogue CSV.

mod handlers;
mod reports;
mod store;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::bail;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use cci_tagger_core::drs::has_data_extension;
use cci_tagger_core::processor::DatasetReport;
use cci_tagger_core::{DatasetConfigStore, DatasetTagger, VocabularyIndex};
use cci_tagger_sparql::SparqlVocabService;

use crate::handlers::SidecarExtractor;
use crate::store::JsonDatasetStore;

#[derive(Debug, Parser)]
#[command(
    name = "cci_tag",
    about = "Tag CCI data files with controlled-vocabulary facets and DRS ids",
    group = clap::ArgGroup::new("input").required(true).multiple(false)
)]
struct Cli {
    /// Tag every file under one dataset directory.
    #[arg(short, long, group = "input")]
    dataset: Option<PathBuf>,

    /// Tag a single file and print the result.
    #[arg(short, long, group = "input")]
    file: Option<PathBuf>,

    /// Tag every dataset declared in the configuration store.
    #[arg(short, long, group = "input")]
    json_datasets: bool,

    /// Stop after this many files per dataset.
    #[arg(long)]
    file_count: Option<usize>,

    /// Directory holding the dataset configuration JSON files.
    #[arg(long, default_value = "datasets")]
    json_store: PathBuf,

    /// Host of the vocabulary server.
    #[arg(long, default_value = "vocab.ceda.ac.uk")]
    vocab_host: String,

    /// Output directory for the DRS reports and the catalogue CSV.
    #[arg(short, long, default_value = "cci_tagger_output")]
    output: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let started = Instant::now();

    let store = JsonDatasetStore::load(&cli.json_store)?;
    let service = SparqlVocabService::new(&cli.vocab_host);
    let vocab_url = format!("http://{}/scheme/cci", cli.vocab_host);
    info!(host = %cli.vocab_host, "loading vocabulary");
    let index = VocabularyIndex::build(&service, &vocab_url)?;

    if let Some(file) = &cli.file {
        tag_single_file(&index, &store, file)?;
        info!(elapsed = ?started.elapsed(), "done");
        return Ok(());
    }

    let datasets = if cli.json_datasets {
        store.datasets()
    } else if let Some(dataset) = &cli.dataset {
        vec![dataset.to_string_lossy().into_owned()]
    } else {
        bail!("nothing to tag");
    };

    let extractor = SidecarExtractor;
    let mut reports: Vec<DatasetReport> = Vec::new();

    for dataset in datasets {
        let files = collect_dataset_files(Path::new(&dataset), cli.file_count);
        info!(dataset, files = files.len(), "tagging dataset");

        let config = store.config(&dataset)?;
        let mut tagger = DatasetTagger::new(&dataset, &index, config);
        tagger.process_files(&files, &extractor)?;

        let report = tagger.into_report();
        let written = reports::write_drs_json(&cli.output, &report)?;
        info!(report = %written.display(), "wrote dataset report");
        reports.push(report);
    }

    reports::write_moles_csv(&cli.output.join("moles_tags.csv"), &reports)?;

    let mut not_found: Vec<&String> = reports.iter().flat_map(|r| &r.not_found).collect();
    not_found.sort();
    not_found.dedup();
    if !not_found.is_empty() {
        println!("terms not found in the vocabulary:");
        for term in not_found {
            println!("  {term}");
        }
    }

    info!(
        datasets = reports.len(),
        elapsed = ?started.elapsed(),
        "done"
    );
    Ok(())
}

fn tag_single_file(
    index: &VocabularyIndex,
    store: &JsonDatasetStore,
    file: &std::path::Path,
) -> anyhow::Result<()> {
    let dataset = store.dataset_id(file);
    let config = store.config(&dataset)?;
    let mut tagger = DatasetTagger::new(&dataset, index, config);
    let tagged = tagger.tag_file(file, &SidecarExtractor)?;

    let labels: serde_json::Map<String, serde_json::Value> = tagged
        .labels
        .iter()
        .map(|(facet, label)| (facet.to_string(), serde_json::Value::from(label.clone())))
        .collect();
    let out = serde_json::json!({
        "file": file.display().to_string(),
        "dataset": dataset,
        "drs_id": tagged.drs_id,
        "labels": labels,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Every file under the dataset, metadata sidecars excluded: ancillary
/// files are tagged too, so their missing facets surface as warnings. With
/// a file limit only `.nc` files count, matching a quick-look run.
fn collect_dataset_files(root: &Path, file_count: Option<usize>) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| !is_metadata_sidecar(path))
        .collect();
    files.sort();
    if let Some(limit) = file_count {
        files.retain(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("nc"))
        });
        files.truncate(limit);
    }
    files
}

/// `<data file>.json` companions hold the data file's attributes and are
/// not taggable themselves.
fn is_metadata_sidecar(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
        && path
            .file_stem()
            .is_some_and(|stem| has_data_extension(Path::new(stem)))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
