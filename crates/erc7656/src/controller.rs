//! Resolution of the party that controls a service.

use alloy_primitives::{Address, U256};
use auto_impl::auto_impl;

use crate::{DeploymentKey, Mode};

/// Read access to the contracts a service is linked to.
#[auto_impl(&mut, Box)]
pub trait LinkedContractReader {
    /// The error type of the underlying state.
    type Error: core::error::Error;

    /// Returns the current holder of `token_id` on `collection` (`ownerOf`).
    fn owner_of(&mut self, collection: Address, token_id: U256) -> Result<Address, Self::Error>;

    /// Returns true if `account` accepts `signer` (`isValidSigner(signer, "")` returning the
    /// ERC-6551 magic value).
    fn is_valid_signer(&mut self, account: Address, signer: Address) -> Result<bool, Self::Error>;
}

/// The party that controls a service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Controller {
    /// The current holder of the linked token.
    Holder(Address),
    /// The linked account, with its own access control.
    Account(Address),
}

impl Controller {
    /// Returns the controlling address.
    pub const fn owner(&self) -> Address {
        match self {
            Self::Holder(address) | Self::Account(address) => *address,
        }
    }
}

/// Errors raised while resolving or checking a controller.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError<E> {
    /// The linked contract could not be read.
    #[error("failed to read linked contract: {0}")]
    Reader(#[source] E),
    /// The caller may not act for the controller.
    #[error("{caller} is not authorized by {controller:?}")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
        /// The resolved controller.
        controller: Controller,
    },
}

/// Resolves the controller of the service for `key`.
///
/// Under [`Mode::LinkedId`] the holder is read on every call, so it follows token transfers.
/// Under [`Mode::NoLinkedId`] the linked contract itself is the controller and `linked_id` is
/// never read.
pub fn resolve_controller<R: LinkedContractReader>(
    key: &DeploymentKey,
    reader: &mut R,
) -> Result<Controller, ControllerError<R::Error>> {
    match key.mode {
        Mode::LinkedId => reader
            .owner_of(key.linked_contract, key.linked_id)
            .map(Controller::Holder)
            .map_err(ControllerError::Reader),
        Mode::NoLinkedId => Ok(Controller::Account(key.linked_contract)),
    }
}

/// Checks that `caller` may act for the service for `key`, returning the controller.
pub fn authorize<R: LinkedContractReader>(
    key: &DeploymentKey,
    caller: Address,
    reader: &mut R,
) -> Result<Controller, ControllerError<R::Error>> {
    let controller = resolve_controller(key, reader)?;
    let authorized = match controller {
        Controller::Holder(holder) => caller == holder,
        Controller::Account(account) => {
            caller == account ||
                reader.is_valid_signer(account, caller).map_err(ControllerError::Reader)?
        }
    };
    if authorized {
        Ok(controller)
    } else {
        Err(ControllerError::Unauthorized { caller, controller })
    }
}
