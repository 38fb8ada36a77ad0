use std::fs;
use std::io::Read;

use btreeidx_core::block::BLOCK_SIZE;
use btreeidx_core::{BTreeIndex, Index, IndexError};

#[test]
fn create_produces_a_single_block_file_with_correct_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idx");

    let index = Index::create(&path).unwrap();
    index.close().unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), BLOCK_SIZE);
    assert_eq!(&bytes[0..8], b"4337PRJ3");
    assert_eq!(&bytes[8..16], &0u64.to_be_bytes()[..]);
    assert_eq!(&bytes[16..24], &1u64.to_be_bytes()[..]);
    assert!(bytes[24..].iter().all(|&b| b == 0));
}

#[test]
fn closing_and_reopening_preserves_search_results() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idx");

    let mut index = Index::create(&path).unwrap();
    for k in 1..=30u64 {
        index.insert(k, k * 10).unwrap();
    }
    index.close().unwrap();

    let mut reopened = Index::open(&path).unwrap();
    for k in 1..=30u64 {
        assert_eq!(reopened.search(k).unwrap(), Some(k * 10));
    }
    assert_eq!(reopened.search(31).unwrap(), None);
}

#[test]
fn opening_a_file_with_corrupted_magic_is_invalid_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idx");

    let mut bytes = vec![0u8; BLOCK_SIZE];
    bytes[0..8].copy_from_slice(b"XXXXXXXX");
    fs::write(&path, &bytes).unwrap();

    let err = Index::open(&path).unwrap_err();
    assert!(matches!(err, IndexError::InvalidHeader));
}

#[test]
fn empty_round_trip_search_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idx");

    Index::create(&path).unwrap().close().unwrap();
    let mut index = Index::open(&path).unwrap();
    assert_eq!(index.search(42).unwrap(), None);
}

#[test]
fn inserting_same_pair_twice_leaves_state_identical_to_one_insert() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idx");

    let mut index = Index::create(&path).unwrap();
    index.insert(10, 100).unwrap();
    let after_first = fs::read(&path).unwrap();

    let err = index.insert(10, 999).unwrap_err();
    assert!(matches!(err, IndexError::DuplicateKey { key: 10 }));

    index.close().unwrap();
    let after_second = fs::read(&path).unwrap();
    assert_eq!(after_first, after_second);
}

#[test]
fn reopen_keeps_working_over_a_split_tree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idx");

    let mut index = Index::create(&path).unwrap();
    for k in 1..=500u64 {
        index.insert(k, k + 1000).unwrap();
    }
    let expected = index.traverse_inorder().unwrap();
    index.close().unwrap();

    let mut reopened = Index::open(&path).unwrap();
    let actual = reopened.traverse_inorder().unwrap();
    assert_eq!(actual, expected);

    for k in 1..=500u64 {
        assert_eq!(reopened.search(k).unwrap(), Some(k + 1000));
    }
}

#[test]
fn in_memory_device_works_without_touching_the_filesystem() {
    use std::io::Cursor;

    let mut index =
        BTreeIndex::create_with_device(Cursor::new(vec![0u8; BLOCK_SIZE])).unwrap();
    index.insert(1, 2).unwrap();
    assert_eq!(index.search(1).unwrap(), Some(2));
}

#[test]
fn read_node_fails_on_truncated_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idx");

    let mut index = Index::create(&path).unwrap();
    index.insert(1, 2).unwrap();
    index.close().unwrap();

    // Truncate the file to just the header block, corrupting node block 1.
    let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(BLOCK_SIZE as u64).unwrap();
    drop(file);

    let mut reopened = Index::open(&path).unwrap();
    let err = reopened.search(1).unwrap_err();
    assert!(matches!(err, IndexError::ShortRead { block_id: 1 }));
}

// Exercises the same shape as the header write: block zero stays 512
// bytes even once higher block ids exist, i.e. the header is never moved.
#[test]
fn header_block_is_always_block_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idx");

    let mut index = Index::create(&path).unwrap();
    for k in 1..=25u64 {
        index.insert(k, k).unwrap();
    }
    index.close().unwrap();

    let mut file = fs::File::open(&path).unwrap();
    let mut header = [0u8; 8];
    file.read_exact(&mut header).unwrap();
    assert_eq!(&header, b"4337PRJ3");
}
