//! Simulated deployment against an in-memory EVM.

mod cmd;

pub use cmd::*;
