use bytes::Bytes;

use crate::crc::CrcType;

/// Well-known BPv7 block type codes.
pub const BLOCK_TYPE_PAYLOAD: u64 = 1;
pub const BLOCK_TYPE_PREVIOUS_NODE: u64 = 6;
pub const BLOCK_TYPE_BUNDLE_AGE: u64 = 7;
pub const BLOCK_TYPE_HOP_COUNT: u64 = 10;

/// Returns a human-readable name for a block type code.
pub fn block_type_name(block_type: u64) -> &'static str {
    match block_type {
        BLOCK_TYPE_PAYLOAD => "PAYLOAD",
        BLOCK_TYPE_PREVIOUS_NODE => "PREVIOUS_NODE",
        BLOCK_TYPE_BUNDLE_AGE => "BUNDLE_AGE",
        BLOCK_TYPE_HOP_COUNT => "HOP_COUNT",
        _ => "EXTENSION",
    }
}

/// One block of a decoded bundle, as handed over by the bundle codec.
///
/// Immutable once built: the verifier only reads blocks, it never rewrites
/// them. `data` holds the canonical bytes the block's checksum covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    block_number: u64,
    block_type: u64,
    crc_type: CrcType,
    crc_provided: u32,
    data: Bytes,
}

impl Block {
    pub fn new(
        block_number: u64,
        block_type: u64,
        crc_type: CrcType,
        crc_provided: u32,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            block_number,
            block_type,
            crc_type,
            crc_provided,
            data: data.into(),
        }
    }

    /// Unique number of this block within its bundle.
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn block_type(&self) -> u64 {
        self.block_type
    }

    pub fn crc_type(&self) -> CrcType {
        self.crc_type
    }

    /// The checksum value embedded in the block on the wire.
    pub fn crc_provided(&self) -> u32 {
        self.crc_provided
    }

    /// The canonical bytes covered by the block's checksum.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Recompute the checksum over the canonical bytes.
    pub fn calculate_crc(&self) -> u32 {
        self.crc_type.digest(&self.data)
    }
}

/// An ordered sequence of blocks decoded from one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bundle {
    blocks: Vec<Block>,
}

impl Bundle {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl<'a> IntoIterator for &'a Bundle {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
