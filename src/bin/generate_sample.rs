//! Write the synthetic grocery dataset to disk.
//!
//! Usage: `generate_sample [OUTPUT] [CONFIG]`
//!
//! `OUTPUT` defaults to `sample_data.parquet`; a `.csv` extension writes CSV.
//! `CONFIG` is an optional dashboard JSON config whose `sample` section sets
//! the seed and table size.

use std::path::PathBuf;

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;

use grocery_analytics::config::DashboardConfig;
use grocery_analytics::data::{export, synthetic};
use grocery_analytics::Dataset;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args_os().skip(1);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data.parquet"));
    let config = match args.next() {
        Some(path) => DashboardConfig::from_json_file(&PathBuf::from(path))?,
        None => DashboardConfig::default(),
    };

    let dataset = synthetic::generate_with(&config.sample);

    if log::log_enabled!(log::Level::Debug) {
        let head = Dataset::new(dataset.records().iter().take(5).cloned().collect());
        let batch = export::to_record_batch(&head).context("building preview batch")?;
        log::debug!("preview:\n{}", pretty_format_batches(&[batch])?);
    }

    export::write_file(&dataset, &output)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "Wrote {} records (seed {}) to {}",
        dataset.len(),
        config.sample.seed,
        output.display()
    );
    Ok(())
}
