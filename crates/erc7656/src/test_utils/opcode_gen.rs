//! This module provides utility functions to generate EVM bytecode.

use alloy_primitives::{Address, Bytes, U256};
use revm::bytecode::opcode::{MSTORE, PUSH0, RETURN, REVERT};

use crate::test_utils::right_pad_bytes;

/// A builder for assembling EVM bytecode.
#[derive(Debug, Default)]
pub struct OpcodeBuilder {
    code: Vec<u8>,
}

impl OpcodeBuilder {
    /// Build the bytecode.
    pub fn build(self) -> Bytes {
        self.code.into()
    }

    /// Get the length of the bytecode.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Check if the bytecode is empty.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Append a single opcode or byte.
    pub fn append(mut self, opcode: u8) -> Self {
        self.code.push(opcode);
        self
    }

    /// Append a series of opcodes or bytes.
    pub fn append_many(mut self, items: impl IntoIterator<Item = u8>) -> Self {
        self.code.extend(items);
        self
    }

    /// Append a PUSH opcode and the bytes to push. An empty slice is `PUSH0`.
    pub fn push_bytes(mut self, bytes: impl AsRef<[u8]>) -> Self {
        let bytes: &[u8] = bytes.as_ref();
        assert!(bytes.len() <= 32);
        self.code.push(PUSH0 + bytes.len() as u8);
        self.code.extend_from_slice(bytes);
        self
    }

    /// Append a PUSH opcode and the number to push, using the width of its type.
    pub fn push_number<T: Into<u128> + Copy>(self, number: T) -> Self {
        let num = number.into();
        let bytes = match core::mem::size_of::<T>() {
            1 => (num as u8).to_be_bytes().to_vec(),
            2 => (num as u16).to_be_bytes().to_vec(),
            4 => (num as u32).to_be_bytes().to_vec(),
            8 => (num as u64).to_be_bytes().to_vec(),
            16 => num.to_be_bytes().to_vec(),
            _ => panic!("Unsupported integer size"),
        };
        self.push_bytes(bytes)
    }

    /// Append a PUSH opcode and the address to push.
    pub fn push_address(self, address: Address) -> Self {
        self.push_bytes(address)
    }

    /// Append a PUSH opcode and the u256 value to push.
    pub fn push_u256(self, value: U256) -> Self {
        self.push_bytes(value.to_be_bytes::<32>())
    }

    /// Append a series of MSTORE opcodes to store the given bytes at the given offset.
    pub fn mstore(self, offset: u8, bytes: impl AsRef<[u8]>) -> Self {
        let padded_bytes = right_pad_bytes(bytes, 32);
        let mut this = self;
        for (i, chunk) in padded_bytes.chunks(32).enumerate() {
            this = this.push_bytes(chunk).push_number(offset + (i * 32) as u8).append(MSTORE);
        }
        this
    }

    /// Store the word on top of the stack at memory offset 0 and return it.
    pub fn return_top_word(self) -> Self {
        self.push_number(0u8).append(MSTORE).return_memory(0, 32)
    }

    /// Append a RETURN of `len` bytes of memory starting at `offset`.
    pub fn return_memory(self, offset: u8, len: u8) -> Self {
        self.push_number(len).push_number(offset).append(RETURN)
    }

    /// Append a RETURN opcode with the given return data.
    pub fn return_with_data(self, data: impl AsRef<[u8]>) -> Self {
        let data_len = data.as_ref().len() as u8;
        self.mstore(0, data).return_memory(0, data_len)
    }

    /// Append a REVERT opcode with empty return data.
    pub fn revert(self) -> Self {
        self.push_number(0u8).push_number(0u8).append(REVERT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;
    use revm::bytecode::opcode::{CALLDATALOAD, SLOAD};

    #[test]
    fn test_owner_registry_shape() {
        let code = OpcodeBuilder::default()
            .push_number(4u8)
            .append(CALLDATALOAD)
            .append(SLOAD)
            .return_top_word()
            .build();
        assert_eq!(code, Bytes::from_static(&hex!("600435546000526020" "6000f3")));
    }

    #[test]
    fn test_push_bytes() {
        let builder = OpcodeBuilder::default().push_bytes([0u8; 0]).push_bytes([0xaa, 0xbb]);
        assert_eq!(builder.len(), 4);
        assert_eq!(builder.build(), Bytes::from_static(&hex!("5f61aabb")));
    }
}
