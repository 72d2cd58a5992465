//! An in-memory EVM host for deploying and exercising services.
//!
//! The host installs the universal CREATE2 proxy at the factory address and routes
//! [`DeploymentHost::stage_create2`] through it, so the address of a staged service is assigned by
//! the EVM itself and not by [`compute_address`](crate::compute_address).

use alloy_primitives::{address, Address, Bytes, Log, TxKind, B256, U256};
use alloy_sol_types::SolCall;
use erc7656_contracts::{IERC6551Account, IERC721, VALID_SIGNER_MAGIC};
use revm::{
    context::{
        result::{ExecutionResult, Output},
        TxEnv,
    },
    state::EvmState,
    Context, DatabaseCommit, ExecuteEvm, MainBuilder, MainContext,
};
use tracing::{debug, trace};

use crate::{
    constants::CREATE2_PROXY_CODE, CodeReader, DeploymentHost, LinkedContractReader,
    StagedDeployment,
};

mod database;
pub use database::*;

/// The sender of host transactions unless configured otherwise.
pub const DEFAULT_SENDER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Gas limit of host transactions.
pub const HOST_GAS_LIMIT: u64 = 5_000_000;

/// Errors raised by [`EvmHost`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvmHostError {
    /// The call reverted.
    #[error("execution reverted: {output}")]
    Reverted {
        /// The revert data.
        output: Bytes,
    },
    /// The call halted.
    #[error("execution halted: {reason}")]
    Halted {
        /// The halt reason.
        reason: String,
    },
    /// The transaction was rejected before execution.
    #[error("invalid transaction: {0}")]
    Transaction(String),
    /// The CREATE2 proxy did not return an address.
    #[error("CREATE2 proxy returned {0} instead of an address")]
    MissingAddress(Bytes),
    /// A call returned data that does not decode as the expected type.
    #[error("malformed return data: {0}")]
    MalformedOutput(Bytes),
}

/// A [`DeploymentHost`] backed by revm over a [`MemoryDatabase`].
#[derive(Debug)]
pub struct EvmHost {
    db: MemoryDatabase,
    sender: Address,
    logs: Vec<Log>,
}

impl Default for EvmHost {
    fn default() -> Self {
        Self::new(MemoryDatabase::default())
    }
}

impl EvmHost {
    /// Creates a host over `db`, sending transactions from [`DEFAULT_SENDER`].
    pub fn new(db: MemoryDatabase) -> Self {
        Self { db, sender: DEFAULT_SENDER, logs: Vec::new() }
    }

    /// Creates an empty chain with the CREATE2 proxy installed at `factory`.
    pub fn with_create2_proxy(factory: Address) -> Self {
        let mut host = Self::new(MemoryDatabase::default());
        host.install_create2_proxy(factory);
        host
    }

    /// Installs the CREATE2 proxy at `factory` unless it is already there.
    pub fn install_create2_proxy(&mut self, factory: Address) {
        let installed = match self.db.code_at(factory) {
            Ok(code) => code,
            Err(never) => match never {},
        };
        if installed.as_ref() == CREATE2_PROXY_CODE.as_slice() {
            return;
        }
        debug!(factory = %factory, "Installing CREATE2 proxy");
        self.db.set_account_code(factory, Bytes::from_static(&CREATE2_PROXY_CODE));
    }

    /// Sets the sender of host transactions.
    pub fn with_sender(mut self, sender: Address) -> Self {
        self.sender = sender;
        self
    }

    /// Returns the sender of host transactions.
    pub const fn sender(&self) -> Address {
        self.sender
    }

    /// Returns the logs emitted through [`DeploymentHost::emit`], in order.
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// Returns the underlying state.
    pub const fn db(&self) -> &MemoryDatabase {
        &self.db
    }

    /// Returns the underlying state, for direct writes.
    pub const fn db_mut(&mut self) -> &mut MemoryDatabase {
        &mut self.db
    }

    /// Executes a call without committing its state changes and returns its output.
    pub fn call(&mut self, to: Address, data: Bytes) -> Result<Bytes, EvmHostError> {
        self.execute(to, data).map(|(output, _)| output)
    }

    fn execute(&mut self, to: Address, data: Bytes) -> Result<(Bytes, EvmState), EvmHostError> {
        let caller = self.sender;
        let tx = TxEnv {
            caller,
            kind: TxKind::Call(to),
            data,
            gas_limit: HOST_GAS_LIMIT,
            gas_price: 0,
            nonce: self.db.nonce(caller),
            ..Default::default()
        };
        trace!(to = %to, "Executing host transaction");

        let mut evm = Context::mainnet().with_db(&mut self.db).build_mainnet();
        let outcome =
            evm.transact(tx).map_err(|err| EvmHostError::Transaction(err.to_string()))?;

        match outcome.result {
            ExecutionResult::Success {
                output: Output::Call(output) | Output::Create(output, _), ..
            } => Ok((output, outcome.state)),
            ExecutionResult::Revert { output, .. } => Err(EvmHostError::Reverted { output }),
            ExecutionResult::Halt { reason, .. } => {
                Err(EvmHostError::Halted { reason: format!("{reason:?}") })
            }
        }
    }
}

impl CodeReader for EvmHost {
    type Error = EvmHostError;

    fn code_at(&mut self, address: Address) -> Result<Bytes, Self::Error> {
        match self.db.code_at(address) {
            Ok(code) => Ok(code),
            Err(never) => match never {},
        }
    }
}

impl DeploymentHost for EvmHost {
    type Changes = EvmState;

    fn stage_create2(
        &mut self,
        deployer: Address,
        salt: B256,
        creation_code: Bytes,
    ) -> Result<StagedDeployment<EvmState>, EvmHostError> {
        let mut calldata = Vec::with_capacity(32 + creation_code.len());
        calldata.extend_from_slice(salt.as_slice());
        calldata.extend_from_slice(&creation_code);

        let (output, changes) = self.execute(deployer, calldata.into())?;
        if output.len() != 20 {
            return Err(EvmHostError::MissingAddress(output));
        }
        let address = Address::from_slice(&output);
        let image = changes
            .get(&address)
            .and_then(|account| account.info.code.as_ref())
            .map(|code| code.original_bytes())
            .unwrap_or_default();
        debug!(address = %address, image_len = image.len(), "Staged CREATE2");

        Ok(StagedDeployment { address, image, changes })
    }

    fn commit(&mut self, changes: EvmState) {
        self.db.commit(changes);
    }

    fn emit(&mut self, log: Log) {
        self.logs.push(log);
    }
}

impl LinkedContractReader for EvmHost {
    type Error = EvmHostError;

    fn owner_of(&mut self, collection: Address, token_id: U256) -> Result<Address, Self::Error> {
        let output =
            self.call(collection, IERC721::ownerOfCall { tokenId: token_id }.abi_encode().into())?;
        let word = output.get(..32).ok_or_else(|| EvmHostError::MalformedOutput(output.clone()))?;
        if word[..12].iter().any(|b| *b != 0) {
            return Err(EvmHostError::MalformedOutput(output));
        }
        Ok(Address::from_slice(&word[12..]))
    }

    fn is_valid_signer(&mut self, account: Address, signer: Address) -> Result<bool, Self::Error> {
        let call = IERC6551Account::isValidSignerCall { signer, context: Bytes::new() };
        let output = self.call(account, call.abi_encode().into())?;
        // an account without code answers nothing
        if output.is_empty() {
            return Ok(false);
        }
        // a single bytes4 word, left-aligned with clean padding
        if output.len() != 32 || output[4..].iter().any(|b| *b != 0) {
            return Err(EvmHostError::MalformedOutput(output));
        }
        Ok(output[..4] == VALID_SIGNER_MAGIC[..])
    }
}
