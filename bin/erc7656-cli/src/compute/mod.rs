//! Offline precomputation of service addresses, creation code and images.

mod cmd;

pub use cmd::*;
