//! Property tests for address computation and image layout.

use alloy_primitives::{keccak256, Address, B256, U256};
use erc7656::{
    compute_address, constants::SALT_OFFSET, creation_code, decode_context, encode_context,
    installed_image, DeploymentKey, Mode, ServiceFactory,
};
use proptest::prelude::*;

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::LinkedId), Just(Mode::NoLinkedId)]
}

prop_compose! {
    fn arb_key()(
        implementation in any::<[u8; 20]>(),
        salt in any::<[u8; 32]>(),
        chain_id in any::<[u8; 32]>(),
        mode in arb_mode(),
        linked_contract in any::<[u8; 20]>(),
        linked_id in any::<[u8; 32]>(),
    ) -> DeploymentKey {
        DeploymentKey {
            implementation: Address::from(implementation),
            salt: B256::from(salt),
            chain_id: U256::from_be_bytes(chain_id),
            mode,
            linked_contract: Address::from(linked_contract),
            linked_id: U256::from_be_bytes(linked_id),
        }
    }
}

/// Returns `key` with exactly one field changed.
fn perturb(mut key: DeploymentKey, field: usize, byte: usize) -> DeploymentKey {
    let flip = U256::from(1u8) << (8 * (byte % 32));
    match field {
        0 => key.implementation.0[byte % 20] ^= 1,
        1 => key.salt.0[byte % 32] ^= 1,
        2 => key.chain_id ^= flip,
        3 => {
            key.mode = match key.mode {
                Mode::LinkedId => Mode::NoLinkedId,
                Mode::NoLinkedId => Mode::LinkedId,
            }
        }
        4 => key.linked_contract.0[byte % 20] ^= 1,
        _ => key.linked_id ^= flip,
    }
    key
}

proptest! {
    #[test]
    fn compute_is_deterministic(key in arb_key(), factory in any::<[u8; 20]>()) {
        let factory = ServiceFactory::new(Address::from(factory));
        let address = factory.compute(&key);
        prop_assert_eq!(address, factory.compute(&key));
        prop_assert_eq!(
            address,
            compute_address(factory.address(), key.salt, keccak256(creation_code(&key)))
        );
    }

    #[test]
    fn every_field_changes_the_address(key in arb_key(), field in 0usize..6, byte in 0usize..32) {
        let factory = ServiceFactory::default();
        let other = perturb(key, field, byte);
        prop_assert_ne!(other, key);
        prop_assert_ne!(factory.compute(&other), factory.compute(&key));
    }

    #[test]
    fn image_round_trips(key in arb_key()) {
        let image = installed_image(&key);
        prop_assert_eq!(&image[SALT_OFFSET..], &encode_context(&key)[..]);
        prop_assert_eq!(decode_context(&image), Ok(key));
    }
}
