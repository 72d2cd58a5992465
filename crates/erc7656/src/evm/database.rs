//! An in-memory chain state backing [`EvmHost`](crate::EvmHost).

use core::convert::Infallible;

use alloy_primitives::{Address, Bytes, B256};
use delegate::delegate;
use revm::{
    database::{AccountState, CacheDB, DbAccount, EmptyDB},
    primitives::{StorageKey, StorageValue, KECCAK_EMPTY},
    state::{AccountInfo, Bytecode, EvmState},
    Database,
};

use crate::CodeReader;

/// An in-memory chain state.
#[derive(Debug, Default, Clone, derive_more::Deref, derive_more::DerefMut)]
pub struct MemoryDatabase {
    #[deref]
    #[deref_mut]
    db: CacheDB<EmptyDB>,
}

impl MemoryDatabase {
    fn account_mut(&mut self, address: Address) -> &mut DbAccount {
        match self.db.load_account(address) {
            Ok(account) => account,
            Err(never) => match never {},
        }
    }

    /// Installs `code` at `address`.
    pub fn set_account_code(&mut self, address: Address, code: Bytes) {
        let bytecode = Bytecode::new_legacy(code);
        let code_hash = bytecode.hash_slow();
        let account = self.account_mut(address);
        account.info.code = Some(bytecode);
        account.info.code_hash = code_hash;
        account.account_state = AccountState::None;
    }

    /// Installs `code` at `address`.
    pub fn account_code(mut self, address: Address, code: Bytes) -> Self {
        self.set_account_code(address, code);
        self
    }

    /// Writes a storage slot of `address`.
    pub fn set_account_storage(&mut self, address: Address, slot: StorageKey, value: StorageValue) {
        let account = self.account_mut(address);
        account.storage.insert(slot, value);
        account.account_state = AccountState::None;
    }

    /// Writes a storage slot of `address`.
    pub fn account_storage(mut self, address: Address, slot: StorageKey, value: StorageValue) -> Self {
        self.set_account_storage(address, slot, value);
        self
    }

    /// Returns the nonce of `address`, zero for an unknown account.
    pub fn nonce(&mut self, address: Address) -> u64 {
        self.basic_infallible(address).map_or(0, |info| info.nonce)
    }

    fn basic_infallible(&mut self, address: Address) -> Option<AccountInfo> {
        match self.db.basic(address) {
            Ok(info) => info,
            Err(never) => match never {},
        }
    }
}

impl CodeReader for MemoryDatabase {
    type Error = Infallible;

    fn code_at(&mut self, address: Address) -> Result<Bytes, Self::Error> {
        let Some(info) = self.basic_infallible(address) else {
            return Ok(Bytes::new());
        };
        if let Some(code) = info.code {
            return Ok(code.original_bytes());
        }
        if info.code_hash == KECCAK_EMPTY || info.code_hash.is_zero() {
            return Ok(Bytes::new());
        }
        Ok(self.db.code_by_hash(info.code_hash)?.original_bytes())
    }
}

impl revm::Database for MemoryDatabase {
    type Error = Infallible;

    delegate! {
        to self.db {
            fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error>;
            fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytecode, Self::Error>;
            fn storage(&mut self, address: Address, index: StorageKey) -> Result<StorageValue, Self::Error>;
            fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error>;
        }
    }
}

impl revm::DatabaseCommit for MemoryDatabase {
    delegate! {
        to self.db {
            fn commit(&mut self, changes: EvmState);
        }
    }
}
