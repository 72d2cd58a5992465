//! `erc7656` CLI tool for ERC-7656 service deployments

use clap::Parser;
use erc7656_cli::{Cli, Error};

fn main() -> Result<(), Error> {
    Cli::parse().run().inspect_err(|e| eprintln!("{e}"))
}
