//! Key hashing
//!
//! The polynomial hash every key is routed by. The multiplier 65599 and the
//! left-to-right recurrence `h = byte + 65599 * h` match the classic sdbm
//! function, so page placement agrees with legacy `.dir`/`.pag` files.

/// Multiplier of the hash recurrence.
pub const HASH_MULTIPLIER: u32 = 65599;

/// Hash a byte string.
///
/// `hash(b"") == 0`, `hash(b"a") == 97`, `hash(b"ab") == 97 * 65599 + 98`.
/// Arithmetic wraps modulo 2^32.
pub fn hash(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |h, &b| {
        (b as u32).wrapping_add(h.wrapping_mul(HASH_MULTIPLIER))
    })
}
