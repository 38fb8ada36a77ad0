use crate::block::{Block, BLOCK_SIZE};

/// Minimal degree of the tree: every non-root node carries between
/// `T - 1` and `2T - 1` keys.
pub const T: usize = 10;
pub const MAX_KEYS: usize = 2 * T - 1;
pub const MAX_CHILDREN: usize = 2 * T;

const KEYS_START: usize = 24;
const VALUES_START: usize = KEYS_START + MAX_KEYS * 8;
const CHILDREN_START: usize = VALUES_START + MAX_KEYS * 8;

/// A B-tree node, occupying one block with id >= 1.
///
/// |Start|End|Description|
/// |-----|---|-----------|
/// |0    |8  |Own block id|
/// |8    |16 |Parent block id (0 if root)|
/// |16   |24 |Key count `n`|
/// |24   |176|19 keys|
/// |176  |328|19 values|
/// |328  |488|20 child block ids|
/// |488  |512|Reserved, zero|
#[derive(Debug, Clone)]
pub struct Node {
    pub block_id: u64,
    pub parent_id: u64,
    pub n: usize,
    pub keys: [u64; MAX_KEYS],
    pub values: [u64; MAX_KEYS],
    pub children: [u64; MAX_CHILDREN],
}

impl Default for Node {
    fn default() -> Self {
        Self {
            block_id: 0,
            parent_id: 0,
            n: 0,
            keys: [0; MAX_KEYS],
            values: [0; MAX_KEYS],
            children: [0; MAX_CHILDREN],
        }
    }
}

impl Block for Node {
    fn load(bytes: [u8; BLOCK_SIZE]) -> Self {
        let mut node = Self {
            block_id: u64::from_be_bytes(bytes[0..8].try_into().unwrap()),
            parent_id: u64::from_be_bytes(bytes[8..16].try_into().unwrap()),
            n: u64::from_be_bytes(bytes[16..24].try_into().unwrap()) as usize,
            ..Self::default()
        };

        for i in 0..MAX_KEYS {
            node.keys[i] =
                u64::from_be_bytes(bytes[KEYS_START + i * 8..KEYS_START + i * 8 + 8].try_into().unwrap());
            node.values[i] = u64::from_be_bytes(
                bytes[VALUES_START + i * 8..VALUES_START + i * 8 + 8]
                    .try_into()
                    .unwrap(),
            );
        }
        for i in 0..MAX_CHILDREN {
            node.children[i] = u64::from_be_bytes(
                bytes[CHILDREN_START + i * 8..CHILDREN_START + i * 8 + 8]
                    .try_into()
                    .unwrap(),
            );
        }

        node
    }

    fn dump(&self) -> [u8; BLOCK_SIZE] {
        let mut bytes = [0; BLOCK_SIZE];

        bytes[0..8].copy_from_slice(&self.block_id.to_be_bytes());
        bytes[8..16].copy_from_slice(&self.parent_id.to_be_bytes());
        bytes[16..24].copy_from_slice(&(self.n as u64).to_be_bytes());

        for i in 0..MAX_KEYS {
            bytes[KEYS_START + i * 8..KEYS_START + i * 8 + 8]
                .copy_from_slice(&self.keys[i].to_be_bytes());
            bytes[VALUES_START + i * 8..VALUES_START + i * 8 + 8]
                .copy_from_slice(&self.values[i].to_be_bytes());
        }
        for i in 0..MAX_CHILDREN {
            bytes[CHILDREN_START + i * 8..CHILDREN_START + i * 8 + 8]
                .copy_from_slice(&self.children[i].to_be_bytes());
        }

        bytes
    }
}

impl Node {
    pub fn new(block_id: u64, parent_id: u64) -> Self {
        Self {
            block_id,
            parent_id,
            ..Self::default()
        }
    }

    /// A node is a leaf iff all child slots are zero. This is not a stored
    /// flag: new leaves are born all-zero, and split keeps the left half
    /// all-zero past its live children, so the invariant holds by
    /// construction rather than upkeep.
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(|&c| c == 0)
    }

    pub fn is_full(&self) -> bool {
        self.n == MAX_KEYS
    }

    /// Smallest `i` with `keys[i] >= key`, or `n` if no such key exists.
    pub fn search_slot(&self, key: u64) -> usize {
        self.keys[..self.n].partition_point(|&k| k < key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encode_decode() {
        let mut node = Node::new(7, 3);
        node.n = 2;
        node.keys[0] = 10;
        node.keys[1] = 20;
        node.values[0] = 100;
        node.values[1] = 200;
        node.children[0] = 11;
        node.children[1] = 12;
        node.children[2] = 13;

        let bytes = node.dump();
        let decoded = Node::load(bytes);

        assert_eq!(decoded.block_id, 7);
        assert_eq!(decoded.parent_id, 3);
        assert_eq!(decoded.n, 2);
        assert_eq!(decoded.keys, node.keys);
        assert_eq!(decoded.values, node.values);
        assert_eq!(decoded.children, node.children);
    }

    #[test]
    fn leaf_detection_is_all_zero_children() {
        let leaf = Node::new(1, 0);
        assert!(leaf.is_leaf());

        let mut internal = Node::new(2, 0);
        internal.children[0] = 5;
        assert!(!internal.is_leaf());
    }

    #[test]
    fn dump_zero_fills_reserved_tail() {
        let node = Node::new(1, 0);
        let bytes = node.dump();
        assert!(bytes[488..512].iter().all(|&b| b == 0));
    }
}
