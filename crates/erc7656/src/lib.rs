//! Deterministic deployment of ERC-7656 services.
//!
//! A service is a minimal forwarder whose own bytecode carries the identity it is linked to: a
//! token (`linkedContract`, `linkedId`) or a standalone account. The address of a service is a
//! pure function of that identity, so it can be computed off-chain before anything is deployed,
//! and the identity can be recovered from the deployed code without reading storage.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod address;
pub use address::*;

mod bytecode;
pub use bytecode::*;

mod context;
pub use context::*;

mod controller;
pub use controller::*;

mod evm;
pub use evm::*;

mod factory;
pub use factory::*;

mod host;
pub use host::*;

mod key;
pub use key::*;

mod service;
pub use service::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use erc7656_contracts as contracts;
