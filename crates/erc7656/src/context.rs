//! Recovery of the deployment key from a service's own code.

use alloy_primitives::{Address, FixedBytes, B256, U256};

use crate::{
    constants::{
        ADDRESS_LEN, CHAIN_ID_OFFSET, IMAGE_LEN, IMPLEMENTATION_OFFSET, LINKED_CONTRACT_OFFSET,
        LINKED_ID_OFFSET, MODE_LEN, MODE_OFFSET, SALT_OFFSET,
    },
    CodeReader, DeploymentKey, Mode,
};

/// Errors raised while decoding a service image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The code is not a service image. Services are never mutated, so this is an integrity
    /// failure.
    #[error("image is {actual} bytes long, expected {}", IMAGE_LEN)]
    LengthMismatch {
        /// The length of the code that was read.
        actual: usize,
    },
    /// The embedded mode is not a known mode.
    #[error("unknown mode {0}")]
    UnknownMode(FixedBytes<MODE_LEN>),
    /// No code is installed at the address.
    #[error("no service deployed at {0}")]
    NotDeployed(Address),
}

/// Errors raised by [`decode_context_at`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeAtError<E> {
    /// The code reader failed.
    #[error(transparent)]
    Reader(E),
    /// The code could not be decoded.
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// Decodes the deployment key from an installed service image.
///
/// The image must be exactly [`IMAGE_LEN`] bytes; fields are read at fixed offsets.
pub fn decode_context(image: &[u8]) -> Result<DeploymentKey, ContextError> {
    if image.len() != IMAGE_LEN {
        return Err(ContextError::LengthMismatch { actual: image.len() });
    }

    let mode = FixedBytes::<MODE_LEN>::from_slice(&image[MODE_OFFSET..LINKED_CONTRACT_OFFSET]);
    let mode = Mode::try_from(mode).map_err(|_| ContextError::UnknownMode(mode))?;

    Ok(DeploymentKey {
        implementation: Address::from_slice(
            &image[IMPLEMENTATION_OFFSET..IMPLEMENTATION_OFFSET + ADDRESS_LEN],
        ),
        salt: B256::from_slice(&image[SALT_OFFSET..CHAIN_ID_OFFSET]),
        chain_id: U256::from_be_slice(&image[CHAIN_ID_OFFSET..MODE_OFFSET]),
        mode,
        linked_contract: Address::from_slice(&image[LINKED_CONTRACT_OFFSET..LINKED_ID_OFFSET]),
        linked_id: U256::from_be_slice(&image[LINKED_ID_OFFSET..IMAGE_LEN]),
    })
}

/// Reads the code at `address` and decodes it.
///
/// An address without code reports [`ContextError::NotDeployed`], which is distinct from a
/// malformed image.
pub fn decode_context_at<R: CodeReader>(
    reader: &mut R,
    address: Address,
) -> Result<DeploymentKey, DecodeAtError<R::Error>> {
    let code = reader.code_at(address).map_err(DecodeAtError::Reader)?;
    if code.is_empty() {
        return Err(ContextError::NotDeployed(address).into());
    }
    Ok(decode_context(&code)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{installed_image, test_utils::reference_key};

    #[test]
    fn test_decode_reference_image() {
        for (mode, id) in [(Mode::NoLinkedId, 0u64), (Mode::LinkedId, 1), (Mode::LinkedId, 0)] {
            let key = reference_key(mode, U256::from(id));
            assert_eq!(decode_context(&installed_image(&key)), Ok(key));
        }
    }

    #[test]
    fn test_length_mismatch() {
        let key = reference_key(Mode::LinkedId, U256::from(1));
        let image = installed_image(&key);
        assert_eq!(
            decode_context(&image[..IMAGE_LEN - 1]),
            Err(ContextError::LengthMismatch { actual: IMAGE_LEN - 1 })
        );
        let mut longer = image.to_vec();
        longer.push(0);
        assert_eq!(
            decode_context(&longer),
            Err(ContextError::LengthMismatch { actual: IMAGE_LEN + 1 })
        );
    }

    #[test]
    fn test_unknown_mode() {
        let key = reference_key(Mode::LinkedId, U256::from(1));
        let mut image = installed_image(&key).to_vec();
        image[MODE_OFFSET] = 0x80;
        assert!(matches!(decode_context(&image), Err(ContextError::UnknownMode(_))));
    }
}
