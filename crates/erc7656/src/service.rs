//! Read-only view of a deployed service, derived from its own code.

use alloy_primitives::{Address, FixedBytes, B256, U256};
use erc7656_contracts::{IERC165_INTERFACE_ID, IERC7656_SERVICE_INTERFACE_ID, INVALID_INTERFACE_ID};
use serde::{Deserialize, Serialize};

use crate::{
    decode_context, resolve_controller, CodeReader, ContextError, Controller, ControllerError,
    DeploymentKey, LinkedContractReader, Mode,
};

/// The binding returned by `linkedData()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedData {
    /// The chain the linked identity lives on.
    pub chain_id: U256,
    /// How the controller is resolved.
    pub mode: Mode,
    /// The token contract or the linked account.
    pub linked_contract: Address,
    /// The token id.
    pub linked_id: U256,
}

/// Errors raised while loading a [`LinkedService`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError<E> {
    /// No code is installed at the address.
    #[error("no service deployed at {0}")]
    NotDeployed(Address),
    /// The code reader failed.
    #[error("failed to read service code: {0}")]
    Reader(#[source] E),
    /// The installed code is not a service image.
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// A deployed service, viewed through the key embedded in its code.
///
/// Every accessor is derived from the image; none of them reads storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkedService {
    address: Address,
    key: DeploymentKey,
}

impl LinkedService {
    /// Loads the service deployed at `address`.
    pub fn load<R: CodeReader>(
        reader: &mut R,
        address: Address,
    ) -> Result<Self, ServiceError<R::Error>> {
        let code = reader.code_at(address).map_err(ServiceError::Reader)?;
        if code.is_empty() {
            return Err(ServiceError::NotDeployed(address));
        }
        Ok(Self::from_image(address, &code)?)
    }

    /// Builds the view from an image read elsewhere.
    pub fn from_image(address: Address, image: &[u8]) -> Result<Self, ContextError> {
        decode_context(image).map(|key| Self { address, key })
    }

    /// The service address.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The full deployment key.
    pub const fn key(&self) -> &DeploymentKey {
        &self.key
    }

    /// The contract every call is forwarded to.
    pub const fn implementation(&self) -> Address {
        self.key.implementation
    }

    /// The salt.
    pub const fn salt(&self) -> B256 {
        self.key.salt
    }

    /// The chain id.
    pub const fn chain_id(&self) -> U256 {
        self.key.chain_id
    }

    /// The mode.
    pub const fn mode(&self) -> Mode {
        self.key.mode
    }

    /// The linked contract or account.
    pub const fn linked_contract(&self) -> Address {
        self.key.linked_contract
    }

    /// The linked token id, as embedded.
    pub const fn linked_id(&self) -> U256 {
        self.key.linked_id
    }

    /// Returns `(chainId, mode, linkedContract, linkedId)`.
    pub const fn linked_data(&self) -> LinkedData {
        LinkedData {
            chain_id: self.key.chain_id,
            mode: self.key.mode,
            linked_contract: self.key.linked_contract,
            linked_id: self.key.linked_id,
        }
    }

    /// Returns the current controller of the service.
    pub fn owner<R: LinkedContractReader>(
        &self,
        reader: &mut R,
    ) -> Result<Controller, ControllerError<R::Error>> {
        resolve_controller(&self.key, reader)
    }

    /// Returns true for ERC-165 and the service interface.
    pub fn supports_interface(&self, interface_id: FixedBytes<4>) -> bool {
        interface_id != INVALID_INTERFACE_ID &&
            (interface_id == IERC165_INTERFACE_ID || interface_id == IERC7656_SERVICE_INTERFACE_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{installed_image, test_utils::reference_key, ServiceFactory};
    use alloy_primitives::fixed_bytes;

    #[test]
    fn test_accessors_come_from_the_image() {
        let key = reference_key(Mode::NoLinkedId, U256::from(1234));
        let address = ServiceFactory::default().compute(&key);
        let service = LinkedService::from_image(address, &installed_image(&key)).unwrap();

        assert_eq!(service.address(), address);
        assert_eq!(service.key(), &key);
        assert_eq!(service.salt(), key.salt);
        assert_eq!(service.implementation(), key.implementation);
        assert_eq!(service.linked_id(), U256::from(1234));
        assert_eq!(
            service.linked_data(),
            LinkedData {
                chain_id: U256::from(31337),
                mode: Mode::NoLinkedId,
                linked_contract: key.linked_contract,
                linked_id: U256::from(1234),
            }
        );
    }

    #[test]
    fn test_service_interfaces() {
        let key = reference_key(Mode::LinkedId, U256::from(1));
        let service = LinkedService::from_image(Address::ZERO, &installed_image(&key)).unwrap();
        assert!(service.supports_interface(fixed_bytes!("7e110a1d")));
        assert!(service.supports_interface(fixed_bytes!("01ffc9a7")));
        assert!(!service.supports_interface(fixed_bytes!("9e23230a")));
        assert!(!service.supports_interface(fixed_bytes!("ffffffff")));
    }
}
