//! The ERC-7656 factory: idempotent deployment and address lookup of linked services.

use alloy_primitives::{keccak256, Address, Bytes, FixedBytes, Log, B256};
use alloy_sol_types::{SolCall, SolError, SolEvent};
use erc7656_contracts::{
    IERC165, IERC165_INTERFACE_ID, IERC7656Factory, IERC7656_FACTORY_INTERFACE_ID,
    INVALID_INTERFACE_ID,
};
use tracing::{debug, info, warn};

use crate::{
    compute_address, constants::CANONICAL_FACTORY_ADDRESS, creation_code, installed_image,
    DeploymentHost, DeploymentKey, KeyError,
};

/// Errors raised by [`ServiceFactory::create`].
#[derive(Debug, thiserror::Error)]
pub enum FactoryError<E> {
    /// The deployment primitive failed. Never retried.
    #[error("deployment primitive failed: {0}")]
    Host(#[source] E),
    /// The deployment primitive succeeded but installed no code.
    #[error("no service was created at {expected}")]
    NoServiceCreated {
        /// The computed service address.
        expected: Address,
    },
    /// The deployment primitive created a contract at an unexpected address.
    #[error("service created at {actual}, expected {expected}")]
    AddressMismatch {
        /// The computed service address.
        expected: Address,
        /// The address reported by the primitive.
        actual: Address,
    },
    /// The deployment primitive installed code that is not the expected service image.
    #[error("unexpected code installed at {address}")]
    ImageMismatch {
        /// The service address.
        address: Address,
    },
    /// The call arguments do not form a valid key.
    #[error(transparent)]
    Key(#[from] KeyError),
}

impl<E> FactoryError<E> {
    /// Encodes the error as the revert data the on-chain factory returns.
    pub fn revert_data(&self) -> Bytes {
        match self {
            Self::Key(_) => IERC7656Factory::InvalidKey {}.abi_encode().into(),
            Self::Host(_)
            | Self::NoServiceCreated { .. }
            | Self::AddressMismatch { .. }
            | Self::ImageMismatch { .. } => IERC7656Factory::CreationFailed {}.abi_encode().into(),
        }
    }
}

/// A call to the factory, decoded from call data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryCall {
    /// `create(address,bytes32,uint256,bytes12,address,uint256)`.
    Create(DeploymentKey),
    /// `compute(address,bytes32,uint256,bytes12,address,uint256)`.
    Compute(DeploymentKey),
    /// `supportsInterface(bytes4)`.
    SupportsInterface(FixedBytes<4>),
}

impl FactoryCall {
    /// Decodes call data, rejecting unknown selectors, wrong lengths and dirty padding.
    pub fn decode(calldata: &[u8]) -> Result<Self, KeyError> {
        let (selector, args) = calldata
            .split_first_chunk::<4>()
            .ok_or(KeyError::MalformedCall("missing selector"))?;

        if *selector == IERC7656Factory::createCall::SELECTOR {
            Ok(Self::Create(decode_key(args)?))
        } else if *selector == IERC7656Factory::computeCall::SELECTOR {
            Ok(Self::Compute(decode_key(args)?))
        } else if *selector == IERC165::supportsInterfaceCall::SELECTOR {
            let word: &[u8; 32] = args
                .try_into()
                .map_err(|_| KeyError::MalformedCall("supportsInterface takes one word"))?;
            if word[4..].iter().any(|b| *b != 0) {
                return Err(KeyError::FieldOverflow { field: "interfaceId", width: 4 });
            }
            Ok(Self::SupportsInterface(FixedBytes::from_slice(&word[..4])))
        } else {
            Err(KeyError::MalformedCall("unknown selector"))
        }
    }
}

fn decode_key(args: &[u8]) -> Result<DeploymentKey, KeyError> {
    if args.len() != 6 * 32 {
        return Err(KeyError::MalformedCall("expected six words"));
    }
    let mut words = [B256::ZERO; 6];
    for (word, chunk) in words.iter_mut().zip(args.chunks_exact(32)) {
        *word = B256::from_slice(chunk);
    }
    DeploymentKey::from_words(&words)
}

/// The factory that deploys and locates linked services.
///
/// The factory address is the CREATE2 deployer identity: the same key yields different services
/// under different factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceFactory {
    address: Address,
}

impl Default for ServiceFactory {
    fn default() -> Self {
        Self::new(CANONICAL_FACTORY_ADDRESS)
    }
}

impl ServiceFactory {
    /// Creates a factory deploying from `address`.
    pub const fn new(address: Address) -> Self {
        Self { address }
    }

    /// Returns the factory address.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the address of the service for `key`. Pure.
    pub fn compute(&self, key: &DeploymentKey) -> Address {
        self.computed_address(key.salt, &creation_code(key))
    }

    /// Returns the address CREATE2 assigns to `creation_code` deployed by this factory.
    pub fn computed_address(&self, salt: B256, creation_code: &[u8]) -> Address {
        compute_address(self.address, salt, keccak256(creation_code))
    }

    /// Returns the creation code of the service for `key`.
    pub fn creation_code(&self, key: &DeploymentKey) -> Bytes {
        creation_code(key)
    }

    /// Returns the code the service for `key` runs with.
    pub fn installed_image(&self, key: &DeploymentKey) -> Bytes {
        installed_image(key)
    }

    /// Returns true for ERC-165 and the factory interface.
    pub fn supports_interface(&self, interface_id: FixedBytes<4>) -> bool {
        interface_id != INVALID_INTERFACE_ID &&
            (interface_id == IERC165_INTERFACE_ID ||
                interface_id == IERC7656_FACTORY_INTERFACE_ID)
    }

    /// Deploys the service for `key`, or returns its address if it is already deployed.
    ///
    /// The staged deployment is verified against the computed address and image before it is
    /// committed; on any failure nothing is committed and no event is emitted.
    pub fn create<H: DeploymentHost>(
        &self,
        host: &mut H,
        key: &DeploymentKey,
    ) -> Result<Address, FactoryError<H::Error>> {
        let code = creation_code(key);
        let expected = self.computed_address(key.salt, &code);

        let existing = host.code_at(expected).map_err(FactoryError::Host)?;
        if !existing.is_empty() {
            debug!(address = %expected, "Service already deployed");
            return Ok(expected);
        }

        debug!(address = %expected, implementation = %key.implementation, "Staging service");
        let staged =
            host.stage_create2(self.address, key.salt, code).map_err(FactoryError::Host)?;

        if staged.image.is_empty() {
            warn!(address = %expected, "Deployment installed no code");
            return Err(FactoryError::NoServiceCreated { expected });
        }
        if staged.address != expected {
            warn!(expected = %expected, actual = %staged.address, "Service address mismatch");
            return Err(FactoryError::AddressMismatch { expected, actual: staged.address });
        }
        if staged.image != installed_image(key) {
            warn!(address = %expected, "Service image mismatch");
            return Err(FactoryError::ImageMismatch { address: expected });
        }

        host.commit(staged.changes);
        host.emit(self.created_log(expected, key));
        info!(
            address = %expected,
            implementation = %key.implementation,
            mode = %key.mode,
            linked_contract = %key.linked_contract,
            linked_id = %key.linked_id,
            "Service created"
        );
        Ok(expected)
    }

    /// Executes ABI-encoded call data against the factory and returns the ABI-encoded output.
    ///
    /// Use [`FactoryError::revert_data`] to turn a failure into revert data.
    pub fn handle_call<H: DeploymentHost>(
        &self,
        host: &mut H,
        calldata: &[u8],
    ) -> Result<Bytes, FactoryError<H::Error>> {
        let output = match FactoryCall::decode(calldata)? {
            FactoryCall::Create(key) => self.create(host, &key)?.into_word(),
            FactoryCall::Compute(key) => self.compute(&key).into_word(),
            FactoryCall::SupportsInterface(id) => {
                B256::with_last_byte(self.supports_interface(id).into())
            }
        };
        Ok(Bytes::copy_from_slice(output.as_slice()))
    }

    fn created_log(&self, service: Address, key: &DeploymentKey) -> Log {
        let event = IERC7656Factory::Created {
            contractAddress: service,
            implementation: key.implementation,
            salt: key.salt,
            chainId: key.chain_id,
            mode: key.mode.to_bytes(),
            linkedContract: key.linked_contract,
            linkedId: key.linked_id,
        };
        Log { address: self.address, data: event.encode_log_data() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{reference_key, REFERENCE_ADDRESSES},
        Mode,
    };
    use alloy_primitives::{fixed_bytes, hex, U256};

    #[test]
    fn test_reference_addresses() {
        let factory = ServiceFactory::default();
        for (mode, linked_id, expected) in REFERENCE_ADDRESSES {
            let key = reference_key(mode, U256::from(linked_id));
            assert_eq!(factory.compute(&key), expected, "{mode} {linked_id}");
        }
    }

    #[test]
    fn test_factory_address_is_the_deployer() {
        let key = reference_key(Mode::LinkedId, U256::from(1));
        let other = ServiceFactory::new(Address::repeat_byte(0x42));
        assert_ne!(other.compute(&key), ServiceFactory::default().compute(&key));
        assert_eq!(
            other.compute(&key),
            other.address().create2(key.salt, keccak256(other.creation_code(&key)))
        );
    }

    #[test]
    fn test_supports_interface() {
        let factory = ServiceFactory::default();
        assert!(factory.supports_interface(fixed_bytes!("01ffc9a7")));
        assert!(factory.supports_interface(fixed_bytes!("9e23230a")));
        assert!(!factory.supports_interface(fixed_bytes!("7e110a1d")));
        assert!(!factory.supports_interface(INVALID_INTERFACE_ID));
    }

    #[test]
    fn test_decode_compute_call() {
        let key = reference_key(Mode::NoLinkedId, U256::from(1234));
        let calldata = IERC7656Factory::computeCall {
            implementation: key.implementation,
            salt: key.salt,
            chainId: key.chain_id,
            mode: key.mode.to_bytes(),
            linkedContract: key.linked_contract,
            linkedId: key.linked_id,
        }
        .abi_encode();
        assert_eq!(FactoryCall::decode(&calldata), Ok(FactoryCall::Compute(key)));

        assert_eq!(
            FactoryCall::decode(&calldata[..calldata.len() - 1]),
            Err(KeyError::MalformedCall("expected six words"))
        );
        assert_eq!(FactoryCall::decode(&hex!("0102")), Err(KeyError::MalformedCall("missing selector")));
        assert_eq!(
            FactoryCall::decode(&hex!("deadbeef")),
            Err(KeyError::MalformedCall("unknown selector"))
        );
    }

    #[test]
    fn test_decode_rejects_unknown_mode_word() {
        let key = reference_key(Mode::LinkedId, U256::from(1));
        let mut calldata = IERC7656Factory::createCall {
            implementation: key.implementation,
            salt: key.salt,
            chainId: key.chain_id,
            mode: fixed_bytes!("000000000000000000000002"),
            linkedContract: key.linked_contract,
            linkedId: key.linked_id,
        }
        .abi_encode();
        assert!(matches!(FactoryCall::decode(&calldata), Err(KeyError::UnknownMode(_))));

        // dirty upper bytes of linkedContract
        calldata[4 + 3 * 32 + 11] = 0;
        calldata[4 + 4 * 32] = 1;
        assert_eq!(
            FactoryCall::decode(&calldata),
            Err(KeyError::FieldOverflow { field: "linkedContract", width: 20 })
        );
    }

    #[test]
    fn test_revert_data() {
        let err: FactoryError<core::convert::Infallible> =
            FactoryError::Key(KeyError::MalformedCall("unknown selector"));
        assert_eq!(&err.revert_data()[..], &IERC7656Factory::InvalidKey::SELECTOR[..]);
        let err: FactoryError<core::convert::Infallible> =
            FactoryError::ImageMismatch { address: Address::ZERO };
        assert_eq!(&err.revert_data()[..], &IERC7656Factory::CreationFailed::SELECTOR[..]);
    }
}
