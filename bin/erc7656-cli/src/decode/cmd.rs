use alloy_primitives::Address;
use clap::Parser;
use erc7656::{decode_context, DeploymentKey};
use serde::Serialize;
use tracing::debug;

use crate::common::{load_hex, CliError, FactoryArgs, Result};

/// Decode the key embedded in a service image
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Service image as hex string (positional argument)
    #[arg(value_name = "CODE")]
    pub code: Option<String>,

    /// File containing the service image. If '-' is specified, it is read from stdin
    #[arg(long = "code.file", visible_aliases = ["codefile"])]
    pub code_file: Option<String>,

    /// Factory configuration
    #[command(flatten)]
    pub factory_args: FactoryArgs,
}

/// The decoded key and the address the factory computes for it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeOutput {
    /// The decoded key
    #[serde(flatten)]
    pub key: DeploymentKey,
    /// The address of the service for `key` under the configured factory
    pub computed_address: Address,
}

impl Cmd {
    /// Execute the decode command
    pub fn run(&self) -> Result<()> {
        let output = self.decode()?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Decode the configured image.
    pub fn decode(&self) -> Result<DecodeOutput> {
        let code = load_hex(self.code.as_deref(), self.code_file.as_deref())?
            .ok_or_else(|| CliError::InvalidInput("no service image given".to_string()))?;
        debug!(len = code.len(), "Decoding service image");

        let key = decode_context(&code)?;
        let computed_address = self.factory_args.factory().compute(&key);
        Ok(DecodeOutput { key, computed_address })
    }
}
