use clap::{Arg, ArgAction, Command, arg};

pub const QUERY_CMD: &str = "query";
pub const DEFAULT_OUT: &str = "aiv-graph.json";

pub fn create_query_cli() -> Command {
    Command::new(QUERY_CMD)
        .about("Fetch, merge and lay out the interaction graph of one or more genes.")
        .arg(
            Arg::new("genes")
                .required(true)
                .num_args(1..)
                .help("AGI loci to query, e.g. AT1G01010"),
        )
        .arg(arg!(--config <config> "TOML configuration file"))
        .arg(arg!(--output <output> "Where to write the graph document").short('o'))
        .arg(arg!(--"pdi-table" <path> "Also write the protein-DNA interaction table (TSV)"))
        .arg(
            arg!(--seed <seed> "Seed for a reproducible layout")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            arg!(--"no-exchange-feeds" "Only query the primary interactions API")
                .action(ArgAction::SetTrue),
        )
}
