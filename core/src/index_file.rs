use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::block::{Block, Header, BLOCK_SIZE};
use crate::error::{IndexError, Result};
use crate::node::Node;

/// Owns the open file handle and the in-memory copy of the header.
///
/// No node cache is kept: every [`IndexFile::read_node`] is a fresh seek
/// and read, and every mutation a whole-block [`IndexFile::write_node`].
/// The device is generic so the engine can be exercised against an
/// in-memory `Cursor` in tests without touching the filesystem.
#[derive(Debug)]
pub struct IndexFile<D> {
    device: D,
    header: Header,
    path: Option<PathBuf>,
}

impl<D> IndexFile<D>
where
    D: Read + Write + Seek,
{
    /// Format `device` as a fresh, empty index: write the header with
    /// `root_id = 0`, `next_block_id = 1`.
    pub fn create_with_device(mut device: D) -> Result<Self> {
        let header = Header::default();
        header.sync(&mut device, 0)?;

        Ok(Self {
            device,
            header,
            path: None,
        })
    }

    /// Read the header from an already-populated `device`, failing if the
    /// leading bytes are not the expected magic tag.
    pub fn open_with_device(mut device: D) -> Result<Self> {
        let bytes = crate::block::load_block(&mut device, 0)?;
        if !Header::is_valid(&bytes) {
            return Err(IndexError::InvalidHeader);
        }
        let header = Header::load(bytes);

        debug!(
            "opened index: root_id={}, next_block_id={}",
            header.root_id, header.next_block_id
        );

        Ok(Self {
            device,
            header,
            path: None,
        })
    }

    pub fn root_id(&self) -> u64 {
        self.header.root_id
    }

    pub fn set_root_id(&mut self, root_id: u64) {
        self.header.root_id = root_id;
    }

    pub fn is_empty(&self) -> bool {
        self.header.root_id == 0
    }

    /// Seek to `id * BLOCK_SIZE`, read 512 bytes, decode.
    pub fn read_node(&mut self, block_id: u64) -> Result<Node> {
        trace!("read_node({block_id})");
        Node::load_block(&mut self.device, block_id)
    }

    /// Seek to `node.block_id * BLOCK_SIZE`, write the encoded block.
    pub fn write_node(&mut self, node: &Node) -> Result<()> {
        trace!("write_node({})", node.block_id);
        node.sync(&mut self.device, node.block_id)
    }

    /// Construct an in-memory node with the next free block id, bump the
    /// counter, and rewrite the header. The caller still has to write the
    /// node's block once it has been populated: until then, the block on
    /// disk may hold stale or absent bytes.
    pub fn allocate_node(&mut self, parent_id: u64) -> Result<Node> {
        let block_id = self.header.next_block_id;
        self.header.next_block_id += 1;
        self.sync_header()?;

        debug!("allocated block {block_id}");
        Ok(Node::new(block_id, parent_id))
    }

    /// Rewrite block 0 from the current `root_id` / `next_block_id`.
    pub fn sync_header(&mut self) -> Result<()> {
        self.header.sync(&mut self.device, 0)
    }
}

/// Production alias: an index file backed by a real OS file handle.
impl IndexFile<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.as_ref())?;

        debug!("creating index file at {}", path.as_ref().display());
        let mut index = Self::create_with_device(file)?;
        index.path = Some(path.as_ref().to_path_buf());
        Ok(index)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path.as_ref())?;

        debug!("opening index file at {}", path.as_ref().display());
        let mut index = Self::open_with_device(file)?;
        index.path = Some(path.as_ref().to_path_buf());
        Ok(index)
    }

    /// Close the underlying handle. The file is also closed on drop; this
    /// makes the moment explicit and surfaces any flush error.
    pub fn close(mut self) -> Result<()> {
        self.device.flush()?;
        if let Some(path) = &self.path {
            debug!("closed index file at {}", path.display());
        }
        Ok(())
    }
}
