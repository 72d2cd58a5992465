//! The seam between the factory and the chain state it deploys into.

use alloy_primitives::{Address, Bytes, Log, B256};
use auto_impl::auto_impl;

/// Read access to deployed code.
#[auto_impl(&mut, Box)]
pub trait CodeReader {
    /// The error type of the underlying state.
    type Error: core::error::Error;

    /// Returns the code installed at `address`, empty if there is none.
    fn code_at(&mut self, address: Address) -> Result<Bytes, Self::Error>;
}

/// The deployment primitive: a CREATE2 executed on behalf of a deployer, whose state changes are
/// staged for inspection before being committed.
pub trait DeploymentHost: CodeReader {
    /// State changes produced by a staged deployment.
    type Changes;

    /// Runs CREATE2 as `deployer` with `salt` and `creation_code` without committing the result.
    fn stage_create2(
        &mut self,
        deployer: Address,
        salt: B256,
        creation_code: Bytes,
    ) -> Result<StagedDeployment<Self::Changes>, Self::Error>;

    /// Applies the changes of a staged deployment.
    fn commit(&mut self, changes: Self::Changes);

    /// Records a log emitted by the factory.
    fn emit(&mut self, log: Log);
}

/// The outcome of [`DeploymentHost::stage_create2`].
#[derive(Debug, Clone)]
pub struct StagedDeployment<C> {
    /// The address reported by the deployment primitive.
    pub address: Address,
    /// The code the primitive would install at `address`.
    pub image: Bytes,
    /// The state changes to commit.
    pub changes: C,
}
