//! Timing-safe helpers for credential checks

use sha2::{Digest, Sha256};
use subtle::{Choice, ConstantTimeEq};

/// Compares two byte strings in time that depends only on the length of
/// the longer one.
///
/// The shorter input is treated as zero-padded, and the lengths are
/// compared separately, so `"abc"` never equals `"abc\0"`.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len = a.len().max(b.len());

    let mut equal = Choice::from(1);
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        equal &= x.ct_eq(&y);
    }
    equal &= (a.len() as u64).ct_eq(&(b.len() as u64));

    equal.into()
}

/// SHA-256 of a token, used as its key in lookup tables so that hashing and
/// probing never branch on the raw token bytes.
pub fn token_digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}
