use crate::block::{Block, Bundle};
use crate::crc::CrcType;

/// Outcome of recomputing one block's checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrcStatus {
    /// Stored and recomputed values agree.
    Valid { value: u32 },
    /// Stored and recomputed values differ.
    Mismatch { provided: u32, computed: u32 },
    /// The block carries no checksum.
    Unprotected,
}

/// Per-block verification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockReport {
    pub block_number: u64,
    pub block_type: u64,
    pub status: CrcStatus,
}

impl BlockReport {
    /// True unless the block's checksum failed to match.
    pub fn is_ok(&self) -> bool {
        !matches!(self.status, CrcStatus::Mismatch { .. })
    }
}

/// Recompute every block's checksum and compare it to the stored value.
///
/// A read-only diagnostic pass: mismatches are reported and logged, never
/// fatal, and verification continues over the remaining blocks. Blocks are
/// not modified.
pub fn verify_bundle(bundle: &Bundle) -> Vec<BlockReport> {
    bundle.into_iter().map(verify_block).collect()
}

fn verify_block(block: &Block) -> BlockReport {
    let status = if block.crc_type() == CrcType::None {
        CrcStatus::Unprotected
    } else {
        let provided = block.crc_provided();
        let computed = block.calculate_crc();
        if provided == computed {
            CrcStatus::Valid { value: computed }
        } else {
            tracing::warn!(
                block_number = block.block_number(),
                provided = %hex::encode(provided.to_be_bytes()),
                computed = %hex::encode(computed.to_be_bytes()),
                "block checksum does not match its contents"
            );
            CrcStatus::Mismatch { provided, computed }
        }
    };

    BlockReport {
        block_number: block.block_number(),
        block_type: block.block_type(),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BLOCK_TYPE_PAYLOAD;

    fn protected_block(number: u64, data: &'static [u8]) -> Block {
        Block::new(
            number,
            BLOCK_TYPE_PAYLOAD,
            CrcType::Crc16,
            CrcType::Crc16.digest(data),
            data,
        )
    }

    #[test]
    fn corrupted_block_is_reported_and_neighbours_pass() {
        let corrupted = Block::new(
            2,
            BLOCK_TYPE_PAYLOAD,
            CrcType::Crc16,
            CrcType::Crc16.digest(b"two") ^ 0x0101,
            &b"two"[..],
        );
        let bundle = Bundle::new(vec![
            protected_block(1, b"one"),
            corrupted,
            protected_block(3, b"three"),
        ]);

        let reports = verify_bundle(&bundle);
        assert_eq!(reports.len(), 3);
        assert!(reports[0].is_ok());
        assert!(matches!(
            reports[1].status,
            CrcStatus::Mismatch { provided, computed }
                if provided != computed && computed == CrcType::Crc16.digest(b"two")
        ));
        assert!(reports[2].is_ok());
    }

    #[test]
    fn verification_does_not_alter_blocks() {
        let bundle = Bundle::new(vec![protected_block(1, b"one"), protected_block(2, b"two")]);
        let before = bundle.clone();

        let _ = verify_bundle(&bundle);
        assert_eq!(bundle, before);
    }

    #[test]
    fn unprotected_blocks_are_flagged_not_failed() {
        let bundle = Bundle::new(vec![Block::new(
            0,
            BLOCK_TYPE_PAYLOAD,
            CrcType::None,
            0,
            &b"data"[..],
        )]);

        let reports = verify_bundle(&bundle);
        assert_eq!(reports[0].status, CrcStatus::Unprotected);
        assert!(reports[0].is_ok());
    }

    #[test]
    fn crc32_blocks_verify() {
        let block = Block::new(
            1,
            BLOCK_TYPE_PAYLOAD,
            CrcType::Crc32c,
            CrcType::Crc32c.digest(b"wide"),
            &b"wide"[..],
        );

        let reports = verify_bundle(&Bundle::new(vec![block]));
        assert!(matches!(reports[0].status, CrcStatus::Valid { .. }));
    }

    #[test]
    fn reports_preserve_bundle_order() {
        let bundle = Bundle::new(vec![
            protected_block(5, b"a"),
            protected_block(1, b"b"),
            protected_block(9, b"c"),
        ]);

        let numbers: Vec<u64> = verify_bundle(&bundle)
            .iter()
            .map(|r| r.block_number)
            .collect();
        assert_eq!(numbers, [5, 1, 9]);
    }
}
