//! Hex loading utilities for erc7656

use std::{fs, io::Read};

use alloy_primitives::{hex, Bytes};

use super::{CliError, Result};

/// Load hex-encoded bytes from an argument or a file. If the file is a dash (-), read from stdin.
/// Priority: arg > file. Returns `None` if neither is provided.
pub fn load_hex(arg: Option<&str>, file: Option<&str>) -> Result<Option<Bytes>> {
    let hex_string = if let Some(arg) = arg {
        arg.to_string()
    } else if let Some(file) = file {
        if file == "-" {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            fs::read_to_string(file)?
        }
    } else {
        return Ok(None);
    };

    decode_hex(&hex_string).map(|bytes| Some(Bytes::from(bytes)))
}

/// Decode hex string, handling optional 0x prefix
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    let hex_str = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);

    if hex_str.len() % 2 != 0 {
        return Err(CliError::InvalidInput(format!(
            "Invalid hex string length: {} (must be even)",
            hex_str.len()
        )));
    }

    Ok(hex::decode(hex_str)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex() {
        assert_eq!(decode_hex(" 0x3d60ad\n").unwrap(), vec![0x3d, 0x60, 0xad]);
        assert_eq!(decode_hex("3D60AD").unwrap(), vec![0x3d, 0x60, 0xad]);
        assert!(decode_hex("").unwrap().is_empty());
        assert!(matches!(decode_hex("0xabc"), Err(CliError::InvalidInput(_))));
        assert!(matches!(decode_hex("0xzz"), Err(CliError::InvalidHex(_))));
    }

    #[test]
    fn test_load_hex_prefers_arg() {
        let loaded = load_hex(Some("0x01"), Some("/nonexistent")).unwrap();
        assert_eq!(loaded, Some(Bytes::from_static(&[1])));
        assert_eq!(load_hex(None, None).unwrap(), None);
        assert!(matches!(load_hex(None, Some("/nonexistent/code.hex")), Err(CliError::FileRead(_))));
    }
}
