use clap::{Arg, Command, arg};

pub const IMPORT_CMD: &str = "import";

pub fn create_import_cli() -> Command {
    Command::new(IMPORT_CMD)
        .about("Load a graph document; documents from other tools are banded and laid out again.")
        .arg(Arg::new("document").required(true))
        .arg(arg!(--config <config> "TOML configuration file"))
        .arg(arg!(--output <output> "Write the restored graph document here").short('o'))
}
