//! Decoding of service images.

mod cmd;

pub use cmd::*;
