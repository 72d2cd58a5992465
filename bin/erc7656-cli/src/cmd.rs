use clap::{Parser, Subcommand};

use crate::common::{CliError, LogArgs};

/// Main command line for the erc7656 CLI tool
#[derive(Parser, Debug)]
#[command(name = "erc7656", infer_subcommands = true, version)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub cmd: MainCmd,

    /// Logging configuration
    #[command(flatten)]
    pub log: LogArgs,
}

/// Main command enumeration for the erc7656 CLI tool
#[derive(Subcommand, Debug)]
pub enum MainCmd {
    /// Compute the address of a service
    Compute(crate::compute::ComputeCmd),
    /// Print the creation code of a service
    CreationCode(crate::compute::CreationCodeCmd),
    /// Print the installed image of a service
    Image(crate::compute::ImageCmd),
    /// Decode the key embedded in a service image
    Decode(crate::decode::Cmd),
    /// Deploy a service on an in-memory chain
    Simulate(crate::simulate::Cmd),
}

/// Error types for the main command system
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Command error
    #[error("{0}")]
    Cli(#[from] CliError),
}

impl Cli {
    /// Execute the selected command
    pub fn run(&self) -> Result<(), Error> {
        self.log.init()?;
        self.cmd.run()
    }
}

impl MainCmd {
    /// Execute the main command
    pub fn run(&self) -> Result<(), Error> {
        match self {
            Self::Compute(cmd) => cmd.run()?,
            Self::CreationCode(cmd) => cmd.run()?,
            Self::Image(cmd) => cmd.run()?,
            Self::Decode(cmd) => cmd.run()?,
            Self::Simulate(cmd) => cmd.run()?,
        }
        Ok(())
    }
}
