//! The deployment key: the six parameters a service is derived from.

use core::{fmt, str::FromStr};

use alloy_primitives::{hex, Address, FixedBytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::constants::{ADDRESS_LEN, MODE_LEN, MODE_LINKED_ID, MODE_NO_LINKED_ID};

/// How a service is linked to its controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// The service is linked to `linkedId` on `linkedContract`; the token holder controls it.
    LinkedId,
    /// The service is linked to the account `linkedContract`; `linkedId` is ignored.
    NoLinkedId,
}

impl Mode {
    /// Returns the 12-byte wire value of the mode.
    pub const fn to_bytes(self) -> FixedBytes<MODE_LEN> {
        match self {
            Self::LinkedId => MODE_LINKED_ID,
            Self::NoLinkedId => MODE_NO_LINKED_ID,
        }
    }
}

impl From<Mode> for FixedBytes<MODE_LEN> {
    fn from(mode: Mode) -> Self {
        mode.to_bytes()
    }
}

impl TryFrom<FixedBytes<MODE_LEN>> for Mode {
    type Error = KeyError;

    fn try_from(value: FixedBytes<MODE_LEN>) -> Result<Self, Self::Error> {
        if value == MODE_LINKED_ID {
            Ok(Self::LinkedId)
        } else if value == MODE_NO_LINKED_ID {
            Ok(Self::NoLinkedId)
        } else {
            Err(KeyError::UnknownMode(value))
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkedId => f.write_str("linked-id"),
            Self::NoLinkedId => f.write_str("no-linked-id"),
        }
    }
}

impl FromStr for Mode {
    type Err = KeyError;

    /// Accepts `linked-id`, `no-linked-id`, or a hex wire value of at most 12 bytes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linked-id" | "LINKED_ID" => Ok(Self::LinkedId),
            "no-linked-id" | "NO_LINKED_ID" => Ok(Self::NoLinkedId),
            _ => Self::try_from(parse_fixed::<MODE_LEN>("mode", s)?),
        }
    }
}

/// Errors raised while building a [`DeploymentKey`] from untyped input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// The 12-byte mode is neither `LINKED_ID` nor `NO_LINKED_ID`.
    #[error("unknown mode {0}")]
    UnknownMode(FixedBytes<MODE_LEN>),
    /// A value does not fit in the width of its field.
    #[error("{field} does not fit in {width} bytes")]
    FieldOverflow {
        /// The field name.
        field: &'static str,
        /// The width of the field in bytes.
        width: usize,
    },
    /// A value is not valid hex or decimal.
    #[error("{field} is not a valid number: {reason}")]
    InvalidNumber {
        /// The field name.
        field: &'static str,
        /// Why parsing failed.
        reason: String,
    },
    /// Call data does not have the shape of the expected call.
    #[error("malformed call: {0}")]
    MalformedCall(&'static str),
}

/// The six parameters that determine a service.
///
/// Every field is embedded in the service image, so two keys differing in any single field
/// produce different images and therefore different addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentKey {
    /// The contract the service forwards every call to.
    pub implementation: Address,
    /// Caller-chosen salt, also used as the CREATE2 salt.
    pub salt: B256,
    /// The chain the linked identity lives on.
    pub chain_id: U256,
    /// How the controller is resolved.
    pub mode: Mode,
    /// The token contract, or the account under [`Mode::NoLinkedId`].
    pub linked_contract: Address,
    /// The token id. Embedded under both modes but only consulted under [`Mode::LinkedId`].
    pub linked_id: U256,
}

impl DeploymentKey {
    /// Creates a key linked to `linked_id` on `linked_contract`.
    pub const fn linked_id(
        implementation: Address,
        salt: B256,
        chain_id: U256,
        linked_contract: Address,
        linked_id: U256,
    ) -> Self {
        Self { implementation, salt, chain_id, mode: Mode::LinkedId, linked_contract, linked_id }
    }

    /// Creates a key linked to the account `linked_contract`, with a zero `linked_id`.
    pub const fn no_linked_id(
        implementation: Address,
        salt: B256,
        chain_id: U256,
        linked_contract: Address,
    ) -> Self {
        Self {
            implementation,
            salt,
            chain_id,
            mode: Mode::NoLinkedId,
            linked_contract,
            linked_id: U256::ZERO,
        }
    }

    /// Builds a key from six 32-byte ABI words, in declaration order.
    ///
    /// Addresses must have their upper 12 bytes clear and the mode must have its lower 20 bytes
    /// clear (`bytes12` is left-aligned in its word).
    pub fn from_words(words: &[B256; 6]) -> Result<Self, KeyError> {
        Ok(Self {
            implementation: address_from_word("implementation", &words[0])?,
            salt: words[1],
            chain_id: U256::from_be_bytes(words[2].0),
            mode: mode_from_word(&words[3])?,
            linked_contract: address_from_word("linkedContract", &words[4])?,
            linked_id: U256::from_be_bytes(words[5].0),
        })
    }

    /// Returns the controlling token id, or `None` under [`Mode::NoLinkedId`].
    pub const fn controlling_id(&self) -> Option<U256> {
        match self.mode {
            Mode::LinkedId => Some(self.linked_id),
            Mode::NoLinkedId => None,
        }
    }
}

fn address_from_word(field: &'static str, word: &B256) -> Result<Address, KeyError> {
    let (pad, addr) = word.split_at(32 - ADDRESS_LEN);
    if pad.iter().any(|b| *b != 0) {
        return Err(KeyError::FieldOverflow { field, width: ADDRESS_LEN });
    }
    Ok(Address::from_slice(addr))
}

fn mode_from_word(word: &B256) -> Result<Mode, KeyError> {
    let (mode, pad) = word.split_at(MODE_LEN);
    if pad.iter().any(|b| *b != 0) {
        return Err(KeyError::FieldOverflow { field: "mode", width: MODE_LEN });
    }
    Mode::try_from(FixedBytes::<MODE_LEN>::from_slice(mode))
}

/// Parses a hex string of at most `N` bytes, left-padded to `N` bytes.
///
/// An optional `0x` prefix is accepted, as is an odd number of digits.
pub fn parse_fixed<const N: usize>(field: &'static str, s: &str) -> Result<FixedBytes<N>, KeyError> {
    let s = s.trim();
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    let digits = digits.trim_start_matches('0');
    if digits.len() > 2 * N {
        return Err(KeyError::FieldOverflow { field, width: N });
    }
    let padded = format!("{digits:0>width$}", width = 2 * N);
    let bytes = hex::decode(padded)
        .map_err(|err| KeyError::InvalidNumber { field, reason: err.to_string() })?;
    Ok(FixedBytes::from_slice(&bytes))
}

/// Parses an address field, left-padding short values and rejecting over-wide ones.
pub fn parse_address(field: &'static str, s: &str) -> Result<Address, KeyError> {
    parse_fixed::<ADDRESS_LEN>(field, s).map(Address::from)
}

/// Parses a 32-byte scalar given in hex (`0x` prefix) or decimal.
pub fn parse_u256(field: &'static str, s: &str) -> Result<U256, KeyError> {
    let s = s.trim();
    if s.starts_with("0x") || s.starts_with("0X") {
        return parse_fixed::<32>(field, s).map(|word| U256::from_be_bytes(word.0));
    }
    U256::from_str_radix(s, 10).map_err(|err| match err {
        alloy_primitives::ruint::ParseError::BaseConvertError(
            alloy_primitives::ruint::BaseConvertError::Overflow,
        ) => KeyError::FieldOverflow { field, width: 32 },
        err => KeyError::InvalidNumber { field, reason: err.to_string() },
    })
}
