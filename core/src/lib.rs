//! A persistent, disk-resident B-tree index mapping `u64` keys to `u64`
//! values, stored as a flat file of 512-byte blocks (block 0 is the
//! header, every other block holds exactly one node).

pub mod block;
pub mod btree;
pub mod error;
pub mod index_file;
pub mod node;

use std::fs::File;
use std::io::{Read, Seek, Write};

pub use block::BLOCK_SIZE;
pub use error::{IndexError, Result};
pub use index_file::IndexFile;
pub use node::Node;

/// The public B-tree index facade: the index file plus the search/insert/
/// traversal operations the engine exposes to a surrounding shell.
#[derive(Debug)]
pub struct BTreeIndex<D> {
    file: IndexFile<D>,
}

impl<D> BTreeIndex<D>
where
    D: Read + Write + Seek,
{
    pub fn create_with_device(device: D) -> Result<Self> {
        Ok(Self {
            file: IndexFile::create_with_device(device)?,
        })
    }

    pub fn open_with_device(device: D) -> Result<Self> {
        Ok(Self {
            file: IndexFile::open_with_device(device)?,
        })
    }

    /// Return the value for `key`, or `None` if it was never inserted.
    pub fn search(&mut self, key: u64) -> Result<Option<u64>> {
        btree::search(&mut self.file, key)
    }

    /// Insert `(key, value)`. Fails with [`IndexError::DuplicateKey`] and
    /// leaves the tree unchanged if `key` is already present.
    pub fn insert(&mut self, key: u64, value: u64) -> Result<()> {
        btree::insert(&mut self.file, key, value)
    }

    /// Materialize every `(key, value)` pair, sorted by key ascending.
    pub fn traverse_inorder(&mut self) -> Result<Vec<(u64, u64)>> {
        btree::traverse_inorder(&mut self.file)
    }

    pub fn is_empty(&self) -> bool {
        self.file.is_empty()
    }
}

/// Production alias: a B-tree index backed by a real OS file handle.
pub type Index = BTreeIndex<File>;

impl BTreeIndex<File> {
    pub fn create<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Ok(Self {
            file: IndexFile::create(path)?,
        })
    }

    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Ok(Self {
            file: IndexFile::open(path)?,
        })
    }

    pub fn close(self) -> Result<()> {
        self.file.close()
    }
}
