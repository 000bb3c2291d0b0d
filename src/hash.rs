//! Primitive hash engine: SHA-256, HMAC-SHA256 and hash-to-float conversion.
//!
//! Every outcome in the crate is derived through these functions, so their byte
//! layout is fixed. `hash_to_unit_float` reads the first 13 hex characters of
//! the digest's hex form (52 bits) and divides by `2^52 - 1`.

use crate::errors::{FairResult, FairnessError};
use hmac::{Hmac, Mac};
use rand::RngCore;
use rand_core::OsRng;
use sha2::{Digest, Sha256};

pub type HmacSha256 = Hmac<Sha256>;

/// Number of hex characters consumed per unit float (52 bits).
pub const UNIT_FLOAT_HEX_LEN: usize = 13;

/// Divisor for the 52-bit prefix. Must stay exactly `0xFFFFFFFFFFFFF`.
pub const UNIT_FLOAT_DIVISOR: u64 = 0xF_FFFF_FFFF_FFFF;

pub fn sha256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// Lowercase hex SHA-256, used for the "verify this hash yourself" flow.
pub fn sha256_hex(input: &[u8]) -> String {
    hex::encode(sha256(input))
}

pub fn hmac_sha256(key: &[u8], message: &[u8]) -> FairResult<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| FairnessError::MalformedInput(format!("HMAC key rejected: {}", e)))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().into())
}

/// Convert a hex digest into a float in `[0, 1]` using its first 52 bits.
pub fn hash_to_unit_float(hex_digest: &str) -> FairResult<f64> {
    hex_slice_to_unit_float(hex_digest, 0)
}

/// Same conversion as [`hash_to_unit_float`], starting at hex character `offset`.
///
/// The integer is parsed from the hex text and the division happens last, so
/// the result is identical on any platform with IEEE-754 doubles.
pub fn hex_slice_to_unit_float(hex_digest: &str, offset: usize) -> FairResult<f64> {
    let end = offset + UNIT_FLOAT_HEX_LEN;
    let slice = hex_digest.get(offset..end).ok_or_else(|| {
        FairnessError::MalformedInput(format!(
            "digest has {} hex chars, need {}",
            hex_digest.len(),
            end
        ))
    })?;
    let value = u64::from_str_radix(slice, 16)
        .map_err(|e| FairnessError::MalformedInput(format!("invalid hex '{}': {}", slice, e)))?;

    // Both operands are below 2^53, so the conversions are exact.
    Ok(value as f64 / UNIT_FLOAT_DIVISOR as f64)
}

/// `n` bytes from the operating system CSPRNG.
pub fn generate_seed_bytes(n: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; n];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Decode a lowercase or uppercase hex string into exactly `N` bytes.
pub fn decode_fixed_hex<const N: usize>(field: &str, input: &str) -> FairResult<[u8; N]> {
    let bytes = hex::decode(input.trim())
        .map_err(|e| FairnessError::MalformedInput(format!("{} is not valid hex: {}", field, e)))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        FairnessError::MalformedInput(format!("{} must be {} bytes, got {}", field, N, len))
    })
}
