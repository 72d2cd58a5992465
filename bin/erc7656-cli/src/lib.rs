//! Command-line tooling for ERC-7656 services.
//!
//! Precomputes service addresses and code, decodes deployed images, and simulates deployments
//! through the factory on an in-memory EVM.

mod cmd;
pub use cmd::*;

/// Shared argument parsing, hex loading, errors and logging
pub mod common;
/// Address, creation code and image precomputation
pub mod compute;
/// Image decoding
pub mod decode;
/// In-memory deployment simulation
pub mod simulate;
