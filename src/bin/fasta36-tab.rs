//! Command-line interface for the `fasta36-tabular` crate.
//!
//! The conversion command lives in `src/bin/fasta36-tab/convert_cmd.rs`.
//!
use clap::Parser;
use anyhow::Result;

#[derive(Debug, Parser)]
#[command(
    name = "fasta36-tab",
    version = env!("CARGO_PKG_VERSION"),
    about = "Parse the \"-m 0\" output of the FASTA36 tools into a table similar to \"-m 8\", including the aligned pattern and sequences"
)]
struct Cli {
    #[command(flatten)]
    convert: convert_cmd::ConvertCmd,
}

#[path = "fasta36-tab/convert_cmd.rs"] mod convert_cmd;

fn main() -> Result<()> {
    // RUST_LOG overrides the default level
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
    let cli = Cli::parse();
    convert_cmd::run(cli.convert)
}
