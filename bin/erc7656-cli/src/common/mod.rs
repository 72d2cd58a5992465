mod error;
mod hex;
mod key;
mod logging;

pub use error::*;
pub use hex::*;
pub use key::*;
pub use logging::*;
