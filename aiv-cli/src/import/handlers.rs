use std::fs::{read_to_string, write};

use anyhow::{Context, Result};
use clap::ArgMatches;

use aiv::{ImportKind, Session};

use crate::query::handlers::load_config;

pub fn run_import(matches: &ArgMatches) -> Result<()> {
    let path = matches
        .get_one::<String>("document")
        .context("A graph document is required")?;
    let json = read_to_string(path).with_context(|| format!("Could not read {}", path))?;

    let mut session = Session::new(load_config(matches)?);
    let kind = session.import_document(&json)?;

    let origin = match kind {
        ImportKind::Native => "aiv document, restored as saved",
        ImportKind::External => "external document, re-banded and laid out",
    };
    println!(
        "{}: {} nodes, {} edges ({})",
        path,
        session.engine().node_count(),
        session.engine().edge_count(),
        origin
    );
    for band in session.bands() {
        println!("  {:<24} {} nodes", band.locality, band.node_count);
    }

    if let Some(output) = matches.get_one::<String>("output") {
        write(output, session.export_document().to_json()?)
            .with_context(|| format!("Could not write {}", output))?;
    }

    Ok(())
}
