//! Solidity interfaces of the ERC-7656 factory and of the linked services it deploys.
//!
//! The bindings are generated with [`alloy_sol_types::sol`], so call data, return data, events
//! and revert payloads are encoded exactly as the on-chain contracts expect. The interface ids
//! follow ERC-165: the XOR of every function selector declared by the interface.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]
#![deny(unused_must_use)]

pub use alloy_primitives;
use alloy_primitives::FixedBytes;
use alloy_sol_types::{sol, SolCall};

sol! {
    /// ERC-165 interface detection.
    interface IERC165 {
        /// Returns true if the contract implements `interfaceId`.
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
    }

    /// The ERC-7656 factory: deploys services linked to a token or an account.
    interface IERC7656Factory {
        /// Emitted once, when the service for a given key is first deployed.
        event Created(
            address contractAddress,
            address indexed implementation,
            bytes32 salt,
            uint256 chainId,
            bytes12 mode,
            address indexed linkedContract,
            uint256 indexed linkedId
        );

        /// The deployment primitive did not produce the expected service.
        error CreationFailed();

        /// A call argument does not fit its field.
        error InvalidKey();

        /// Deploys the service for the given key, or returns it if it already exists.
        function create(
            address implementation,
            bytes32 salt,
            uint256 chainId,
            bytes12 mode,
            address linkedContract,
            uint256 linkedId
        ) external returns (address);

        /// Returns the deterministic address of the service for the given key.
        function compute(
            address implementation,
            bytes32 salt,
            uint256 chainId,
            bytes12 mode,
            address linkedContract,
            uint256 linkedId
        ) external view returns (address service);
    }

    /// Accessor every linked service exposes.
    interface IERC7656Service {
        /// Returns the binding embedded in the service bytecode.
        function linkedData()
            external
            view
            returns (uint256 chainId, bytes12 mode, address linkedContract, uint256 linkedId);
    }

    /// The subset of ERC-721 used to resolve the holder of a linked token.
    interface IERC721 {
        /// Returns the current owner of `tokenId`.
        function ownerOf(uint256 tokenId) external view returns (address owner);
    }

    /// The subset of ERC-6551 accounts used to authorize callers on behalf of an account.
    interface IERC6551Account {
        /// Returns the magic value `0x523e3260` if `signer` may act for the account.
        function isValidSigner(address signer, bytes context) external view returns (bytes4 magicValue);
    }
}

/// The value returned by `isValidSigner` when the signer is accepted.
pub const VALID_SIGNER_MAGIC: FixedBytes<4> =
    FixedBytes(<IERC6551Account::isValidSignerCall as SolCall>::SELECTOR);

/// ERC-165 interface id of [`IERC165`].
pub const IERC165_INTERFACE_ID: FixedBytes<4> =
    interface_id(&[<IERC165::supportsInterfaceCall as SolCall>::SELECTOR]);

/// ERC-165 interface id of [`IERC7656Factory`].
pub const IERC7656_FACTORY_INTERFACE_ID: FixedBytes<4> = interface_id(&[
    <IERC7656Factory::createCall as SolCall>::SELECTOR,
    <IERC7656Factory::computeCall as SolCall>::SELECTOR,
]);

/// ERC-165 interface id of [`IERC7656Service`].
pub const IERC7656_SERVICE_INTERFACE_ID: FixedBytes<4> =
    interface_id(&[<IERC7656Service::linkedDataCall as SolCall>::SELECTOR]);

/// The id ERC-165 reserves as "no interface". Never supported.
pub const INVALID_INTERFACE_ID: FixedBytes<4> = FixedBytes([0xff; 4]);

/// Computes an ERC-165 interface id from the selectors of its functions.
pub const fn interface_id(selectors: &[[u8; 4]]) -> FixedBytes<4> {
    let mut id = [0u8; 4];
    let mut i = 0;
    while i < selectors.len() {
        let selector = selectors[i];
        id[0] ^= selector[0];
        id[1] ^= selector[1];
        id[2] ^= selector[2];
        id[3] ^= selector[3];
        i += 1;
    }
    FixedBytes(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{fixed_bytes, hex};
    use alloy_sol_types::SolEvent;

    #[test]
    fn test_interface_ids() {
        assert_eq!(IERC165_INTERFACE_ID, fixed_bytes!("01ffc9a7"));
        assert_eq!(IERC7656_FACTORY_INTERFACE_ID, fixed_bytes!("9e23230a"));
        assert_eq!(IERC7656_SERVICE_INTERFACE_ID, fixed_bytes!("7e110a1d"));
    }

    #[test]
    fn test_valid_signer_magic() {
        assert_eq!(VALID_SIGNER_MAGIC, fixed_bytes!("523e3260"));
    }

    #[test]
    fn test_owner_of_selector() {
        assert_eq!(<IERC721::ownerOfCall as SolCall>::SELECTOR, hex!("6352211e"));
    }

    #[test]
    fn test_created_event_signature() {
        assert_eq!(
            IERC7656Factory::Created::SIGNATURE,
            "Created(address,address,bytes32,uint256,bytes12,address,uint256)"
        );
    }
}
