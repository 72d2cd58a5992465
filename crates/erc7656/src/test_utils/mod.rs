//! Test utilities for ERC-7656 services.

mod bytes;
mod contracts;
mod opcode_gen;
mod record_book;
mod vectors;

pub use bytes::*;
pub use contracts::*;
pub use opcode_gen::*;
pub use record_book::*;
pub use vectors::*;
