//! Tests for the dynamic hashing directory
