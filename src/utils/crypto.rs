use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use ring::digest::{Context, SHA256};

use crate::error::{BlockchainError, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock time in whole seconds since the epoch, rounded to the nearest second.
pub fn current_timestamp() -> Result<i64> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BlockchainError::Clock(format!("System time error: {e}")))?
        .as_millis();

    let seconds = (millis + 500) / 1000;
    i64::try_from(seconds).map_err(|_| BlockchainError::Clock("Timestamp overflow".to_string()))
}

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex_encode(&sha256_digest(data))
}

pub fn hex_encode(data: &[u8]) -> String {
    HEXLOWER.encode(data)
}

/// Number of leading zero bits in the binary expansion of a hex string.
///
/// Returns `None` when the input is not valid hex.
pub fn leading_zero_bits(hex: &str) -> Option<u32> {
    let bytes = HEXLOWER_PERMISSIVE.decode(hex.as_bytes()).ok()?;
    let mut zeros = 0;
    for byte in bytes {
        if byte == 0 {
            zeros += 8;
        } else {
            zeros += byte.leading_zeros();
            break;
        }
    }
    Some(zeros)
}
