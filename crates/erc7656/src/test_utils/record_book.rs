//! An in-memory [`LinkedContractReader`] for tests that do not need an EVM.

use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, U256};

use crate::LinkedContractReader;

/// Errors raised by [`RecordBook`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordBookError {
    /// `ownerOf` on a token that was never minted.
    #[error("token {token_id} of {collection} does not exist")]
    UnknownToken {
        /// The token contract.
        collection: Address,
        /// The token id.
        token_id: U256,
    },
}

/// An in-memory [`LinkedContractReader`] with token holders and account signers.
#[derive(Debug, Default, Clone)]
pub struct RecordBook {
    tokens: HashMap<(Address, U256), Address>,
    signers: HashMap<Address, HashSet<Address>>,
    owner_reads: usize,
}

impl RecordBook {
    /// Sets the holder of `token_id` on `collection`.
    pub fn set_token(&mut self, collection: Address, token_id: U256, holder: Address) {
        self.tokens.insert((collection, token_id), holder);
    }

    /// Sets the holder of `token_id` on `collection`.
    pub fn token(mut self, collection: Address, token_id: U256, holder: Address) -> Self {
        self.set_token(collection, token_id, holder);
        self
    }

    /// Lets `signer` act for `account`.
    pub fn set_signer(&mut self, account: Address, signer: Address) {
        self.signers.entry(account).or_default().insert(signer);
    }

    /// Lets `signer` act for `account`.
    pub fn signer(mut self, account: Address, signer: Address) -> Self {
        self.set_signer(account, signer);
        self
    }

    /// Number of `ownerOf` reads so far.
    pub const fn owner_reads(&self) -> usize {
        self.owner_reads
    }
}

impl LinkedContractReader for RecordBook {
    type Error = RecordBookError;

    fn owner_of(&mut self, collection: Address, token_id: U256) -> Result<Address, Self::Error> {
        self.owner_reads += 1;
        self.tokens
            .get(&(collection, token_id))
            .copied()
            .ok_or(RecordBookError::UnknownToken { collection, token_id })
    }

    fn is_valid_signer(&mut self, account: Address, signer: Address) -> Result<bool, Self::Error> {
        Ok(self.signers.get(&account).is_some_and(|signers| signers.contains(&signer)))
    }
}
