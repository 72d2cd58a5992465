//! Bytecode of the mock contracts services are linked to and forward to.

use alloy_primitives::{Bytes, U256};
use revm::bytecode::opcode::{ADDRESS, CALLDATALOAD, EQ, EXTCODECOPY, MUL, SLOAD};

use crate::{
    constants::{CONTEXT_LEN, SALT_OFFSET},
    contracts::VALID_SIGNER_MAGIC,
    test_utils::{right_pad_bytes, OpcodeBuilder},
};

/// An ERC-721 stand-in whose `ownerOf(tokenId)` returns storage slot `tokenId`.
///
/// Any call is treated as `ownerOf`; set owners with
/// [`MemoryDatabase::set_account_storage`](crate::MemoryDatabase::set_account_storage).
pub fn owner_registry_code() -> Bytes {
    OpcodeBuilder::default()
        .push_number(4u8)
        .append(CALLDATALOAD)
        .append(SLOAD)
        .return_top_word()
        .build()
}

/// An ERC-6551 account stand-in that accepts exactly the signer stored in slot 0.
///
/// `isValidSigner(signer, context)` returns the magic value for that signer and zero otherwise.
pub fn signer_account_code() -> Bytes {
    OpcodeBuilder::default()
        .push_number(4u8)
        .append(CALLDATALOAD)
        .push_number(0u8)
        .append(SLOAD)
        .append(EQ)
        .push_bytes(right_pad_bytes(VALID_SIGNER_MAGIC, 32))
        .append(MUL)
        .return_top_word()
        .build()
}

/// An implementation that returns the context tail of the code at `ADDRESS`.
///
/// Reached through a service, `ADDRESS` is the service itself, so the call returns the 128 bytes
/// embedded after its forwarder.
pub fn context_echo_code() -> Bytes {
    OpcodeBuilder::default()
        .push_number(CONTEXT_LEN as u8)
        .push_number(SALT_OFFSET as u8)
        .push_number(0u8)
        .append(ADDRESS)
        .append(EXTCODECOPY)
        .return_memory(0, CONTEXT_LEN as u8)
        .build()
}

/// Storage value for an address, as written by the mock contracts' `SLOAD`s.
pub fn address_slot_value(address: alloy_primitives::Address) -> U256 {
    U256::from_be_bytes(address.into_word().0)
}
