mod import;
mod query;

use anyhow::Result;
use clap::{ArgAction, Command, arg};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "aiv";
    pub const BIN_NAME: &str = "aiv";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Merge Arabidopsis interaction data from several sources into one graph, banded by subcellular localization.")
        .subcommand_required(true)
        .arg(
            arg!(-v --verbose "More logging (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(query::cli::create_query_cli())
        .subcommand(import::cli::create_import_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    env_logger::Builder::new()
        .filter_level(match matches.get_count("verbose") {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    match matches.subcommand() {
        //
        // QUERY
        //
        Some((query::cli::QUERY_CMD, matches)) => {
            query::handlers::run_query(matches)?;
        }

        //
        // IMPORT
        //
        Some((import::cli::IMPORT_CMD, matches)) => {
            import::handlers::run_import(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_is_valid() {
        build_parser().debug_assert();
    }

    #[test]
    fn test_query_arguments() {
        let matches = build_parser()
            .try_get_matches_from(["aiv", "-vv", "query", "AT1G01010", "AT2G30000", "--seed", "3"])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, query::cli::QUERY_CMD);
        assert_eq!(sub.get_many::<String>("genes").unwrap().count(), 2);
        assert_eq!(sub.get_one::<u64>("seed"), Some(&3));
        assert!(!sub.get_flag("no-exchange-feeds"));
    }
}
