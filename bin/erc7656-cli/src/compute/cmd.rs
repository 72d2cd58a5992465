use clap::Parser;
use tracing::info;

use crate::common::{FactoryArgs, KeyArgs, Result};

/// Print the deterministic address of a service
#[derive(Parser, Debug)]
pub struct ComputeCmd {
    /// Service key
    #[command(flatten)]
    pub key_args: KeyArgs,

    /// Factory configuration
    #[command(flatten)]
    pub factory_args: FactoryArgs,
}

impl ComputeCmd {
    /// Execute the compute command
    pub fn run(&self) -> Result<()> {
        let key = self.key_args.key()?;
        let factory = self.factory_args.factory();
        let address = factory.compute(&key);
        info!(factory = %factory.address(), address = %address, "Computed service address");
        println!("{address}");
        Ok(())
    }
}

/// Print the creation code of a service
#[derive(Parser, Debug)]
pub struct CreationCodeCmd {
    /// Service key
    #[command(flatten)]
    pub key_args: KeyArgs,
}

impl CreationCodeCmd {
    /// Execute the creation-code command
    pub fn run(&self) -> Result<()> {
        let key = self.key_args.key()?;
        println!("{}", erc7656::creation_code(&key));
        Ok(())
    }
}

/// Print the code a service runs with once deployed
#[derive(Parser, Debug)]
pub struct ImageCmd {
    /// Service key
    #[command(flatten)]
    pub key_args: KeyArgs,
}

impl ImageCmd {
    /// Execute the image command
    pub fn run(&self) -> Result<()> {
        let key = self.key_args.key()?;
        println!("{}", erc7656::installed_image(&key));
        Ok(())
    }
}
