//! CREATE2 address derivation.

use alloy_primitives::{keccak256, Address, B256};

use crate::constants::CREATE2_PREFIX;

/// Computes the EIP-1014 CREATE2 address:
/// `keccak256(0xff ‖ deployer ‖ salt ‖ creation_code_hash)[12..]`.
pub fn compute_address(deployer: Address, salt: B256, creation_code_hash: B256) -> Address {
    let mut preimage = [0u8; 85];
    preimage[0] = CREATE2_PREFIX;
    preimage[1..21].copy_from_slice(deployer.as_slice());
    preimage[21..53].copy_from_slice(salt.as_slice());
    preimage[53..85].copy_from_slice(creation_code_hash.as_slice());
    Address::from_word(keccak256(preimage))
}
