//! Constants of the ERC-7656 service layout.
//!
//! Every deployed service is an ERC-1167 minimal forwarder followed by an immutable, flat record
//! of the deployment key. The offsets below are the wire format: indexers and the services
//! themselves rely on them to find each field without calling into the service.

use alloy_primitives::{address, Address, FixedBytes};

/// The canonical address of the ERC-7656 factory. It is the CREATE2 deployer identity of every
/// service the canonical factory computes.
pub const CANONICAL_FACTORY_ADDRESS: Address =
    address!("0x7656f0fB4Ca6973cf99D910B36705a2dEDA97eA1");

/// The discriminator byte prepended to CREATE2 address preimages (EIP-1014).
pub const CREATE2_PREFIX: u8 = 0xff;

/// The ERC-1167 forwarder header, followed by the 20-byte implementation address.
pub const FORWARDER_HEADER: [u8; 10] = [0x36, 0x3d, 0x3d, 0x37, 0x3d, 0x3d, 0x3d, 0x36, 0x3d, 0x73];

/// The ERC-1167 forwarder footer: delegate, then bubble up the return data or the revert.
pub const FORWARDER_FOOTER: [u8; 15] =
    [0x5a, 0xf4, 0x3d, 0x82, 0x80, 0x3e, 0x90, 0x3d, 0x91, 0x60, 0x2b, 0x57, 0xfd, 0x5b, 0xf3];

/// Width of the salt field.
pub const SALT_LEN: usize = 32;
/// Width of the chain id field.
pub const CHAIN_ID_LEN: usize = 32;
/// Width of the mode field.
pub const MODE_LEN: usize = 12;
/// Width of an address field.
pub const ADDRESS_LEN: usize = 20;
/// Width of the linked id field.
pub const LINKED_ID_LEN: usize = 32;

/// Offset of the implementation address in the installed image.
pub const IMPLEMENTATION_OFFSET: usize = FORWARDER_HEADER.len();
/// Length of the executable forwarder, i.e. the offset of the embedded context.
pub const FORWARDER_LEN: usize = IMPLEMENTATION_OFFSET + ADDRESS_LEN + FORWARDER_FOOTER.len();
/// Offset of the salt.
pub const SALT_OFFSET: usize = FORWARDER_LEN;
/// Offset of the chain id.
pub const CHAIN_ID_OFFSET: usize = SALT_OFFSET + SALT_LEN;
/// Offset of the mode.
pub const MODE_OFFSET: usize = CHAIN_ID_OFFSET + CHAIN_ID_LEN;
/// Offset of the linked contract.
pub const LINKED_CONTRACT_OFFSET: usize = MODE_OFFSET + MODE_LEN;
/// Offset of the linked id.
pub const LINKED_ID_OFFSET: usize = LINKED_CONTRACT_OFFSET + ADDRESS_LEN;
/// Length of the embedded context (`salt ‖ chainId ‖ mode ‖ linkedContract ‖ linkedId`).
pub const CONTEXT_LEN: usize = SALT_LEN + CHAIN_ID_LEN + MODE_LEN + ADDRESS_LEN + LINKED_ID_LEN;
/// Total length of an installed service image.
pub const IMAGE_LEN: usize = FORWARDER_LEN + CONTEXT_LEN;

/// The self-deploy prologue of the creation code. It copies the `IMAGE_LEN` bytes that follow it
/// into memory and returns them as the runtime code:
///
/// ```text
/// RETURNDATASIZE PUSH1 IMAGE_LEN DUP1 PUSH1 10 RETURNDATASIZE CODECOPY DUP2 RETURN
/// ```
pub const CREATION_PROLOGUE: [u8; 10] =
    [0x3d, 0x60, IMAGE_LEN as u8, 0x80, 0x60, 0x0a, 0x3d, 0x39, 0x81, 0xf3];

/// Total length of the creation code.
pub const CREATION_CODE_LEN: usize = CREATION_PROLOGUE.len() + IMAGE_LEN;

/// Wire value of [`Mode::LinkedId`](crate::Mode::LinkedId).
pub const MODE_LINKED_ID: FixedBytes<MODE_LEN> = FixedBytes([0; MODE_LEN]);

/// Wire value of [`Mode::NoLinkedId`](crate::Mode::NoLinkedId).
pub const MODE_NO_LINKED_ID: FixedBytes<MODE_LEN> =
    FixedBytes([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);

/// Runtime code of the universal CREATE2 proxy (Nick's deterministic deployment proxy).
///
/// Call data is `salt ‖ creation_code`; the proxy runs `CREATE2` with the call value and returns
/// the 20-byte address of the new contract, or reverts if the creation failed.
pub const CREATE2_PROXY_CODE: [u8; 69] = alloy_primitives::hex!(
    "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe03601600081602082378035828234f58015156039578182fd5b8082525050506014600cf3"
);

const _: () = assert!(IMAGE_LEN == 173);
const _: () = assert!(IMAGE_LEN <= u8::MAX as usize);
const _: () = assert!(FORWARDER_LEN == 45);
const _: () = assert!(LINKED_ID_OFFSET + LINKED_ID_LEN == IMAGE_LEN);
