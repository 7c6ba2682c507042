//! srcpack - flatten a project's source files into one text artifact
//!
//! srcpack provides:
//! - Packing from a repository URL, a local zip archive, or a folder
//! - Language-tag based selection with usefulness and content heuristics
//! - Optional transforms: notebook conversion, comment stripping, PDF text
//! - One uniform record format, ready for an LLM context window

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

mod cli;
mod core;
mod sink;
mod source;
mod transform;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let level = if cli.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();

    cli::run(cli)
}
