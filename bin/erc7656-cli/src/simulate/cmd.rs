use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolEvent;
use clap::Parser;
use erc7656::{
    contracts::IERC7656Factory, parse_address, CodeReader, EvmHost, KeyError, LinkedService,
    DEFAULT_SENDER,
};
use serde::Serialize;
use tracing::info;

use crate::common::{FactoryArgs, KeyArgs, Result};

/// Deploy a service through the factory on a fresh in-memory chain
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Service key
    #[command(flatten)]
    pub key_args: KeyArgs,

    /// Factory configuration
    #[command(flatten)]
    pub factory_args: FactoryArgs,

    /// The account sending the deployment transaction
    #[arg(long = "sender", default_value_t = DEFAULT_SENDER, value_parser = parse_sender)]
    pub sender: Address,
}

/// Outcome of a simulated deployment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateOutput {
    /// The deployed service
    pub address: Address,
    /// The code installed at `address`
    pub image: Bytes,
    /// Number of `Created` events emitted over both calls
    pub created_events: usize,
    /// Whether the second `create` left the chain untouched
    pub second_call_noop: bool,
    /// Whether the key read back from the image matches the input
    pub round_trip: bool,
}

impl Cmd {
    /// Execute the simulate command
    pub fn run(&self) -> Result<()> {
        let output = self.simulate()?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Deploys the configured key twice and reports what happened.
    pub fn simulate(&self) -> Result<SimulateOutput> {
        let key = self.key_args.key()?;
        let factory = self.factory_args.factory();
        let mut host = EvmHost::with_create2_proxy(factory.address()).with_sender(self.sender);

        let address = factory.create(&mut host, &key)?;
        let logs_after_first = host.logs().len();
        let again = factory.create(&mut host, &key)?;
        let second_call_noop = again == address && host.logs().len() == logs_after_first;

        let service = LinkedService::load(&mut host, address)?;
        let image = host.code_at(address)?;
        let created_events = host
            .logs()
            .iter()
            .filter(|log| log.address == factory.address())
            .filter(|log| log.topics().first() == Some(&IERC7656Factory::Created::SIGNATURE_HASH))
            .count();

        info!(address = %address, created_events, "Simulated deployment");
        Ok(SimulateOutput {
            address,
            image,
            created_events,
            second_call_noop,
            round_trip: *service.key() == key,
        })
    }
}

fn parse_sender(s: &str) -> std::result::Result<Address, KeyError> {
    parse_address("sender", s)
}
