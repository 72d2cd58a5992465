//! Reference keys and the addresses the canonical factory computes for them.

use alloy_primitives::{address, b256, Address, B256, U256};

use crate::{DeploymentKey, Mode};

/// Implementation of the reference key.
pub const REFERENCE_IMPLEMENTATION: Address =
    address!("0x0B306BF915C4d645ff596e518fAf3F9669b97016");

/// Salt of the reference key.
pub const REFERENCE_SALT: B256 =
    b256!("0xaabbccddaabbccddaabbccddaabbccddaabbccddaabbccddaabbccddaabbccdd");

/// Chain id of the reference key.
pub const REFERENCE_CHAIN_ID: u64 = 31337;

/// Linked contract of the reference key.
pub const REFERENCE_LINKED_CONTRACT: Address =
    address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");

/// Addresses computed by the canonical factory for `reference_key(mode, linked_id)`.
pub const REFERENCE_ADDRESSES: [(Mode, u64, Address); 4] = [
    (Mode::NoLinkedId, 0, address!("0xff445343e83f3ecbceb4683de9e3d128013be2d3")),
    (Mode::LinkedId, 1, address!("0xe523e70bf419a829dee2ff453476bf36fa523dda")),
    (Mode::LinkedId, 0, address!("0x820bde944bbf3ac83695162699086309492c4882")),
    (Mode::NoLinkedId, 1234, address!("0x4fbc91972c24ac07df984e4e2a3a7ab830da5d87")),
];

/// The reference key with the given mode and linked id.
pub const fn reference_key(mode: Mode, linked_id: U256) -> DeploymentKey {
    DeploymentKey {
        implementation: REFERENCE_IMPLEMENTATION,
        salt: REFERENCE_SALT,
        chain_id: U256::from_limbs([REFERENCE_CHAIN_ID, 0, 0, 0]),
        mode,
        linked_contract: REFERENCE_LINKED_CONTRACT,
        linked_id,
    }
}
