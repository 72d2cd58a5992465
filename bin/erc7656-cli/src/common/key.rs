use alloy_primitives::{Address, B256};
use clap::Parser;
use erc7656::{
    constants::CANONICAL_FACTORY_ADDRESS, parse_address, parse_fixed, parse_u256, DeploymentKey,
    KeyError, Mode, ServiceFactory,
};

use super::Result;

/// The six parameters of a service.
///
/// Hex values accept an optional `0x` prefix and are left-padded to the width of their field;
/// values wider than their field are rejected.
#[derive(Debug, Clone, Parser)]
pub struct KeyArgs {
    /// The implementation every call to the service is forwarded to
    #[arg(long = "implementation", visible_aliases = ["impl"])]
    pub implementation: String,

    /// The salt (up to 32 bytes of hex)
    #[arg(long = "salt", default_value = "0x00")]
    pub salt: String,

    /// The chain id of the linked identity (decimal or 0x-prefixed hex)
    #[arg(long = "chain-id", default_value = "1")]
    pub chain_id: String,

    /// The mode: `linked-id`, `no-linked-id`, or the 12-byte wire value
    #[arg(long = "mode", default_value = "linked-id")]
    pub mode: String,

    /// The token contract, or the account under `no-linked-id`
    #[arg(long = "linked-contract")]
    pub linked_contract: String,

    /// The token id (decimal or 0x-prefixed hex)
    #[arg(long = "linked-id", default_value = "0")]
    pub linked_id: String,
}

impl KeyArgs {
    /// Parses the arguments into a key.
    pub fn key(&self) -> Result<DeploymentKey> {
        Ok(DeploymentKey {
            implementation: parse_address("implementation", &self.implementation)?,
            salt: B256::from(parse_fixed::<32>("salt", &self.salt)?),
            chain_id: parse_u256("chainId", &self.chain_id)?,
            mode: self.mode.parse::<Mode>()?,
            linked_contract: parse_address("linkedContract", &self.linked_contract)?,
            linked_id: parse_u256("linkedId", &self.linked_id)?,
        })
    }
}

/// The factory deploying the service.
#[derive(Debug, Clone, Parser)]
pub struct FactoryArgs {
    /// The factory address, i.e. the CREATE2 deployer
    #[arg(
        long = "factory",
        env = "ERC7656_FACTORY",
        default_value_t = CANONICAL_FACTORY_ADDRESS,
        value_parser = parse_factory,
    )]
    pub factory: Address,
}

impl FactoryArgs {
    /// Returns the configured factory.
    pub const fn factory(&self) -> ServiceFactory {
        ServiceFactory::new(self.factory)
    }
}

fn parse_factory(s: &str) -> std::result::Result<Address, KeyError> {
    parse_address("factory", s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, U256};

    #[derive(Debug, Parser)]
    struct TestCmd {
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        factory: FactoryArgs,
    }

    #[test]
    fn test_key_from_args() {
        let cmd = TestCmd::try_parse_from([
            "test",
            "--implementation",
            "0x0B306BF915C4d645ff596e518fAf3F9669b97016",
            "--salt",
            "0xaabbccddaabbccddaabbccddaabbccddaabbccddaabbccddaabbccddaabbccdd",
            "--chain-id",
            "31337",
            "--mode",
            "no-linked-id",
            "--linked-contract",
            "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512",
        ])
        .unwrap();
        let key = cmd.key.key().unwrap();
        assert_eq!(key.chain_id, U256::from(31337));
        assert_eq!(key.mode, Mode::NoLinkedId);
        assert_eq!(key.linked_id, U256::ZERO);
        assert_eq!(
            cmd.factory.factory().compute(&key),
            address!("0xff445343e83f3ecbceb4683de9e3d128013be2d3")
        );
    }

    #[test]
    fn test_short_values_are_left_padded() {
        let cmd = TestCmd::try_parse_from([
            "test",
            "--implementation",
            "0x01",
            "--salt",
            "0x02",
            "--linked-contract",
            "0x03",
            "--factory",
            "0x04",
        ])
        .unwrap();
        let key = cmd.key.key().unwrap();
        assert_eq!(key.implementation, Address::with_last_byte(1));
        assert_eq!(key.salt, B256::with_last_byte(2));
        assert_eq!(key.mode, Mode::LinkedId);
        assert_eq!(cmd.factory.factory, Address::with_last_byte(4));
    }

    #[test]
    fn test_over_wide_values_are_rejected() {
        let cmd = TestCmd::try_parse_from([
            "test",
            "--implementation",
            "0x010B306BF915C4d645ff596e518fAf3F9669b97016",
            "--linked-contract",
            "0x03",
        ])
        .unwrap();
        assert!(cmd.key.key().is_err());

        assert!(TestCmd::try_parse_from([
            "test",
            "--implementation",
            "0x01",
            "--linked-contract",
            "0x03",
            "--factory",
            "0x017656f0fB4Ca6973cf99D910B36705a2dEDA97eA1",
        ])
        .is_err());
    }
}
