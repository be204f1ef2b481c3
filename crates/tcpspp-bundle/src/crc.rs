use crc::Crc;

const CRC16_X25: Crc<u16> = Crc::<u16>::new(&crc::CRC_16_IBM_SDLC);
const CRC32_CASTAGNOLI: Crc<u32> = Crc::<u32>::new(&crc::CRC_32_ISCSI);

/// Checksum scheme protecting a bundle block.
///
/// BPv7 blocks select one of three schemes: no checksum, CRC-16/X.25, or
/// CRC-32C (Castagnoli).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrcType {
    None,
    Crc16,
    Crc32c,
}

impl CrcType {
    /// Width of the stored checksum in bytes.
    pub fn width_bytes(self) -> usize {
        match self {
            CrcType::None => 0,
            CrcType::Crc16 => 2,
            CrcType::Crc32c => 4,
        }
    }

    /// Digest `data` under this scheme. Widened to `u32` so both CRC
    /// widths share one representation; [`CrcType::None`] digests to 0.
    pub fn digest(self, data: &[u8]) -> u32 {
        match self {
            CrcType::None => 0,
            CrcType::Crc16 => u32::from(CRC16_X25.checksum(data)),
            CrcType::Crc32c => CRC32_CASTAGNOLI.checksum(data),
        }
    }
}

impl std::fmt::Display for CrcType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CrcType::None => "none",
            CrcType::Crc16 => "crc16",
            CrcType::Crc32c => "crc32c",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Standard check values for the reference input "123456789".
    #[test]
    fn crc16_x25_check_value() {
        assert_eq!(CrcType::Crc16.digest(b"123456789"), 0x906E);
    }

    #[test]
    fn crc32_castagnoli_check_value() {
        assert_eq!(CrcType::Crc32c.digest(b"123456789"), 0xE306_9283);
    }

    #[test]
    fn none_digests_to_zero() {
        assert_eq!(CrcType::None.digest(b"anything"), 0);
        assert_eq!(CrcType::None.width_bytes(), 0);
    }

    #[test]
    fn digest_is_byte_sensitive() {
        let base = CrcType::Crc16.digest(b"hello world");
        assert_eq!(CrcType::Crc16.digest(b"hello world"), base);
        assert_ne!(CrcType::Crc16.digest(b"hello worle"), base);
    }
}
