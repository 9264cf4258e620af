//! Tests for the key hash
//!
//! These tests verify:
//! - The exact recurrence and multiplier
//! - Wrapping on long inputs

use hashdbm::hash;
use hashdbm::hash::HASH_MULTIPLIER;

#[test]
fn test_hash_known_values() {
    assert_eq!(hash(b""), 0);
    assert_eq!(hash(b"a"), 97);
    assert_eq!(hash(b"ab"), 97 * 65599 + 98);
}

#[test]
fn test_hash_matches_recurrence() {
    let key = b"the quick brown fox jumps over the lazy dog";

    let mut expected: u32 = 0;
    for &b in key.iter() {
        expected = (b as u32).wrapping_add(expected.wrapping_mul(HASH_MULTIPLIER));
    }

    assert_eq!(hash(key), expected);
}

#[test]
fn test_hash_is_order_sensitive() {
    assert_ne!(hash(b"ab"), hash(b"ba"));
}

#[test]
fn test_hash_long_input_wraps() {
    let key = vec![0xFFu8; 4096];
    // Must not panic on overflow and must be stable.
    assert_eq!(hash(&key), hash(&key));
}
