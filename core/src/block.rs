use std::fmt::Debug;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::error::{IndexError, Result};

pub const BLOCK_SIZE: usize = 512;

/// Literal magic tag stamped into bytes 0..8 of block 0.
pub const MAGIC: [u8; 8] = *b"4337PRJ3";

pub(crate) fn load_block<D>(device: &mut D, block_id: u64) -> Result<[u8; BLOCK_SIZE]>
where
    D: Read + Write + Seek,
{
    let mut buf = [0; BLOCK_SIZE];
    device.seek(SeekFrom::Start(block_id * BLOCK_SIZE as u64))?;

    let mut read = 0;
    while read < BLOCK_SIZE {
        match device.read(&mut buf[read..])? {
            0 => return Err(IndexError::ShortRead { block_id }),
            n => read += n,
        }
    }

    Ok(buf)
}

pub(crate) fn save_block<D>(device: &mut D, block_id: u64, buf: [u8; BLOCK_SIZE]) -> Result<()>
where
    D: Read + Write + Seek,
{
    device.seek(SeekFrom::Start(block_id * BLOCK_SIZE as u64))?;
    device.write_all(&buf)?;
    Ok(())
}

/// A fixed-size, 512-byte serializable region of the index file.
pub trait Block: Default + Debug {
    /// Load from a whole 512-byte buffer.
    fn load(bytes: [u8; BLOCK_SIZE]) -> Self;
    /// Dump into a whole 512-byte buffer, zero-filling any unused tail.
    fn dump(&self) -> [u8; BLOCK_SIZE];

    /// Read this block from `block_id` on `device`.
    fn load_block<D>(device: &mut D, block_id: u64) -> Result<Self>
    where
        D: Read + Write + Seek,
    {
        Ok(Self::load(load_block(device, block_id)?))
    }

    /// Write this block at `block_id` on `device`.
    fn sync<D>(&self, device: &mut D, block_id: u64) -> Result<()>
    where
        D: Read + Write + Seek,
    {
        save_block(device, block_id, self.dump())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Block 0: the file header.
///
/// |Start|End|Description|
/// |-----|---|-----------|
/// |0    |8  |Magic tag `4337PRJ3`|
/// |8    |16 |Root block id|
/// |16   |24 |Next-free block id|
/// |24   |512|Reserved, zero|
pub struct Header {
    pub root_id: u64,
    pub next_block_id: u64,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            root_id: 0,
            next_block_id: 1,
        }
    }
}

impl Block for Header {
    fn load(bytes: [u8; BLOCK_SIZE]) -> Self {
        Self {
            root_id: u64::from_be_bytes(bytes[8..16].try_into().unwrap()),
            next_block_id: u64::from_be_bytes(bytes[16..24].try_into().unwrap()),
        }
    }
    fn dump(&self) -> [u8; BLOCK_SIZE] {
        let mut bytes = [0; BLOCK_SIZE];
        bytes[0..8].copy_from_slice(&MAGIC);
        bytes[8..16].copy_from_slice(&self.root_id.to_be_bytes());
        bytes[16..24].copy_from_slice(&self.next_block_id.to_be_bytes());
        bytes
    }
}

impl Header {
    pub(crate) fn is_valid(bytes: &[u8; BLOCK_SIZE]) -> bool {
        bytes[0..8] == MAGIC
    }
}
