//! # QX Builder CLI
//!
//! Binary entry point for the `qx-builder` command-line tool. It parses the
//! command line with `clap`, sets up logging, and dispatches to the command
//! implementations, which are thin wrappers over the `qx_builder` library.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
