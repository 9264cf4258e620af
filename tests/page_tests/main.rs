//! Tests for the page record engine and the key hash

mod hash_tests;
mod pair_tests;
