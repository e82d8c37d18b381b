use std::fs::{File, write};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::ProgressBar;
use log::warn;

use aiv::core::models::PdiRow;
use aiv::{AivConfig, Session};
use aiv::ingest::HttpFetcher;

use super::cli::DEFAULT_OUT;

/// Config from `--config`, or the defaults.
pub fn load_config(matches: &ArgMatches) -> Result<AivConfig> {
    match matches.get_one::<String>("config") {
        Some(path) => AivConfig::try_from(Path::new(path))
            .with_context(|| format!("Could not load config file {}", path)),
        None => Ok(AivConfig::default()),
    }
}

fn write_pdi_table(path: &Path, rows: &[PdiRow]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "source\ttarget\tpublished\tconfidence\treferences\tmi")?;
    for row in rows {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            row.source,
            row.target,
            row.published,
            row.confidence.as_deref().unwrap_or("-"),
            row.references.join("|"),
            row.mi_annotations.join("|")
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn run_query(matches: &ArgMatches) -> Result<()> {
    let genes: Vec<String> = matches
        .get_many::<String>("genes")
        .context("At least one gene is required")?
        .cloned()
        .collect();

    let mut config = load_config(matches)?;
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.layout.seed = Some(*seed);
    }
    if matches.get_flag("no-exchange-feeds") {
        config.endpoints.exchange_feeds = false;
    }

    let default_out = DEFAULT_OUT.to_string();
    let output = PathBuf::from(matches.get_one::<String>("output").unwrap_or(&default_out));

    let fetcher = Arc::new(HttpFetcher::new(config.endpoints.timeout())?);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let bar = ProgressBar::new_spinner();
    bar.set_message(format!("Querying {}", genes.join(", ")));
    bar.enable_steady_tick(Duration::from_millis(100));

    let mut session = Session::new(config);
    let report = runtime.block_on(aiv::run_query(&mut session, fetcher, &genes));
    bar.finish_and_clear();
    let report = report?;

    for failure in &report.failures {
        warn!("{} failed: {}", failure.source, failure.message);
    }

    let document = session.export_document();
    write(&output, document.to_json()?)
        .with_context(|| format!("Could not write {}", output.display()))?;

    if let Some(path) = matches.get_one::<String>("pdi-table") {
        write_pdi_table(Path::new(path), &session.pdi_table())?;
    }

    println!(
        "{} nodes, {} edges ({} new, {} merged, {} protein-DNA) in {} bands; {} sources failed",
        session.engine().node_count(),
        session.engine().edge_count(),
        report.created,
        report.merged,
        report.pdi,
        report.bands.len(),
        report.failures.len()
    );
    println!("Graph written to {}", output.display());

    Ok(())
}
