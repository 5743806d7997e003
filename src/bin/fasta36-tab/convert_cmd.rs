//! The conversion command: `-m 0` report in, table out.
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Args;
use fasta36_tabular::*;

/// Options for the conversion.
#[derive(Debug, Args)]
pub struct ConvertCmd {
    /// Path to the input alignment file (FASTA36 "-m 0" report).
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,
    /// Path to the output tabular file.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

pub fn run(cmd: ConvertCmd) -> Result<()> {
    log::info!("inpath  : {}", cmd.input.display());
    log::info!("outpath : {}", cmd.output.display());

    let reader = BufReader::new(File::open(&cmd.input).with_context(|| format!("open alignment: {}", cmd.input.display()))?);
    let writer = BufWriter::new(File::create(&cmd.output).with_context(|| format!("create {}", cmd.output.display()))?);
    let summary = convert(reader, writer, &ConvertOptions::default())
        .with_context(|| format!("convert {}", cmd.input.display()))?;

    log::info!("{} lines read, {} alignments written, {} incomplete records dropped",
        summary.lines, summary.records, summary.dropped);
    Ok(())
}
