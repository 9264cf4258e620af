//! Tests for pair operations on a page
//!
//! These tests verify:
//! - Fit checks at the exact boundary
//! - Insert, lookup and existence checks
//! - Deletion compaction (first, middle and last pair)
//! - n-th key access for iteration
//! - Typed failure when a pair does not fit

use hashdbm::page::Page;
use hashdbm::{DbmError, PBLKSIZ};

// =============================================================================
// Helper Functions
// =============================================================================

fn page_with(pairs: &[(&[u8], &[u8])]) -> Page {
    let mut page = Page::new();
    for (key, value) in pairs {
        page.insert(key, value).unwrap();
    }
    page
}

// =============================================================================
// Basic Tests
// =============================================================================

#[test]
fn test_empty_page() {
    let page = Page::new();

    assert!(page.is_empty());
    assert_eq!(page.entry_count(), 0);
    assert_eq!(page.free_space(), PBLKSIZ - 2);
    assert_eq!(page.get(b"anything"), None);
    assert_eq!(page.nth_key(1), None);
    assert!(page.validate());
}

#[test]
fn test_insert_lookup_remove_scenario() {
    let mut page = Page::new();

    page.insert(b"abc", b"123").unwrap();
    assert!(page.validate());
    page.insert(b"de", b"f").unwrap();
    assert!(page.validate());

    assert_eq!(page.get(b"abc"), Some(&b"123"[..]));

    assert!(page.remove(b"abc"));
    assert!(page.validate());

    assert_eq!(page.get(b"abc"), None);
    assert_eq!(page.get(b"de"), Some(&b"f"[..]));
    assert!(page.validate());
}

#[test]
fn test_insert_layout_packs_from_tail() {
    let page = page_with(&[(b"abc", b"123")]);
    let bytes = page.as_bytes();

    assert_eq!(&bytes[0..2], &2u16.to_le_bytes());
    assert_eq!(&bytes[2..4], &((PBLKSIZ - 3) as u16).to_le_bytes());
    assert_eq!(&bytes[4..6], &((PBLKSIZ - 6) as u16).to_le_bytes());
    assert_eq!(&bytes[PBLKSIZ - 6..], b"123abc");
}

#[test]
fn test_exists() {
    let page = page_with(&[(b"alpha", b"1"), (b"beta", b"2")]);

    assert!(page.contains(b"alpha"));
    assert!(page.contains(b"beta"));
    assert!(!page.contains(b"gamma"));
    assert!(!page.contains(b"alph"));
}

#[test]
fn test_lookup_distinguishes_prefixes() {
    let page = page_with(&[(b"key", b"short"), (b"key_long", b"long")]);

    assert_eq!(page.get(b"key"), Some(&b"short"[..]));
    assert_eq!(page.get(b"key_long"), Some(&b"long"[..]));
    assert_eq!(page.get(b"ke"), None);
}

#[test]
fn test_empty_key_and_value() {
    let page = page_with(&[(b"", b"empty key"), (b"empty value", b"")]);

    assert_eq!(page.get(b""), Some(&b"empty key"[..]));
    assert_eq!(page.get(b"empty value"), Some(&b""[..]));
    assert!(page.validate());
}

#[test]
fn test_duplicate_keys_return_first() {
    let page = page_with(&[(b"dup", b"first"), (b"dup", b"second")]);

    assert_eq!(page.pair_count(), 2);
    assert_eq!(page.get(b"dup"), Some(&b"first"[..]));
}

// =============================================================================
// Fit Tests
// =============================================================================

#[test]
fn test_fits_boundary_on_empty_page() {
    let page = Page::new();

    // 1022 free bytes, 4 of them for the two offsets.
    assert!(page.fits(1000, 18));
    assert!(!page.fits(1000, 19));
}

#[test]
fn test_fill_page_until_full() {
    let mut page = Page::new();
    let mut inserted = 0;

    loop {
        let key = format!("key{:04}", inserted);
        if !page.fits(key.len(), 20) {
            break;
        }
        page.insert(key.as_bytes(), &[b'v'; 20]).unwrap();
        inserted += 1;
    }

    // 7 + 20 + 4 = 31 bytes per pair, 1022 free
    assert_eq!(inserted, 32);
    assert!(page.free_space() < 31);
    assert!(page.validate());

    for i in 0..inserted {
        let key = format!("key{:04}", i);
        assert_eq!(page.get(key.as_bytes()), Some(&[b'v'; 20][..]));
    }
}

#[test]
fn test_insert_without_room_fails_and_leaves_page_unchanged() {
    let mut page = page_with(&[(b"big", &[7u8; 1000])]);
    let before = page.clone();

    let result = page.insert(b"another", &[1u8; 20]);

    match result {
        Err(DbmError::PageFull { need, free }) => {
            assert_eq!(need, 7 + 20 + 4);
            assert_eq!(free, before.free_space());
        }
        other => panic!("Expected PageFull, got {:?}", other),
    }
    assert_eq!(page, before);
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove_missing_key() {
    let mut page = page_with(&[(b"a", b"1")]);

    assert!(!page.remove(b"b"));
    assert_eq!(page.pair_count(), 1);
}

#[test]
fn test_remove_from_empty_page() {
    let mut page = Page::new();
    assert!(!page.remove(b"a"));
    assert!(page.is_empty());
}

#[test]
fn test_remove_last_pair() {
    let mut page = page_with(&[(b"a", b"1"), (b"b", b"22"), (b"c", b"333")]);
    let free_before = page.free_space();

    assert!(page.remove(b"c"));

    assert_eq!(page.pair_count(), 2);
    assert_eq!(page.free_space(), free_before + 1 + 3 + 4);
    assert_eq!(page.get(b"a"), Some(&b"1"[..]));
    assert_eq!(page.get(b"b"), Some(&b"22"[..]));
    assert!(page.validate());
}

#[test]
fn test_remove_first_pair_compacts() {
    let mut page = page_with(&[(b"first", b"value one"), (b"second", b"2"), (b"third", b"three")]);

    assert!(page.remove(b"first"));

    assert!(page.validate());
    assert_eq!(page.get(b"first"), None);
    assert_eq!(page.get(b"second"), Some(&b"2"[..]));
    assert_eq!(page.get(b"third"), Some(&b"three"[..]));
    assert_eq!(page.nth_key(1), Some(&b"second"[..]));
    assert_eq!(page.nth_key(2), Some(&b"third"[..]));
}

#[test]
fn test_remove_middle_pair_compacts() {
    let mut page = page_with(&[(b"k1", b"v1"), (b"k2", b"a much longer value"), (b"k3", b"v3"), (b"k4", b"")]);

    assert!(page.remove(b"k2"));

    assert!(page.validate());
    assert_eq!(page.pair_count(), 3);
    assert_eq!(page.get(b"k1"), Some(&b"v1"[..]));
    assert_eq!(page.get(b"k3"), Some(&b"v3"[..]));
    assert_eq!(page.get(b"k4"), Some(&b""[..]));
}

#[test]
fn test_remove_reclaims_space_for_reuse() {
    let mut page = page_with(&[(b"a", &[1u8; 500]), (b"b", &[2u8; 500])]);
    assert!(!page.fits(1, 500));

    assert!(page.remove(b"a"));
    assert!(page.fits(1, 500));

    page.insert(b"c", &[3u8; 500]).unwrap();
    assert_eq!(page.get(b"b"), Some(&[2u8; 500][..]));
    assert_eq!(page.get(b"c"), Some(&[3u8; 500][..]));
    assert!(page.validate());
}

#[test]
fn test_overwrite_with_different_length() {
    let mut page = page_with(&[(b"x", b"1"), (b"key", b"short"), (b"y", b"2")]);

    assert!(page.remove(b"key"));
    page.insert(b"key", b"a considerably longer value").unwrap();

    assert!(page.validate());
    assert_eq!(page.get(b"key"), Some(&b"a considerably longer value"[..]));
    assert_eq!(page.get(b"x"), Some(&b"1"[..]));
    assert_eq!(page.get(b"y"), Some(&b"2"[..]));
}

// =============================================================================
// nth_key Tests
// =============================================================================

#[test]
fn test_nth_key_in_physical_order() {
    let page = page_with(&[(b"zebra", b"1"), (b"apple", b"2"), (b"mango", b"3")]);

    assert_eq!(page.nth_key(0), None);
    assert_eq!(page.nth_key(1), Some(&b"zebra"[..]));
    assert_eq!(page.nth_key(2), Some(&b"apple"[..]));
    assert_eq!(page.nth_key(3), Some(&b"mango"[..]));
    assert_eq!(page.nth_key(4), None);
}

#[test]
fn test_pairs_iterator() {
    let page = page_with(&[(b"a", b"1"), (b"bb", b"22")]);

    let pairs: Vec<_> = page.pairs().collect();

    assert_eq!(pairs, vec![(&b"a"[..], &b"1"[..]), (&b"bb"[..], &b"22"[..])]);
    assert_eq!(page.pairs().len(), 2);
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_load_round_trips_bytes() {
    let page = page_with(&[(b"k", b"v"), (b"key2", b"value2")]);

    let loaded = Page::load(page.as_bytes(), 3).unwrap();

    assert_eq!(loaded, page);
}

#[test]
fn test_load_zero_block_is_empty_page() {
    let loaded = Page::load(&[0u8; PBLKSIZ], 0).unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn test_load_rejects_corrupt_bytes() {
    let mut bytes = [0u8; PBLKSIZ];
    bytes[0] = 3; // odd entry count

    let result = Page::load(&bytes, 9);

    assert!(matches!(result, Err(DbmError::CorruptPage { page: 9 })));
}
