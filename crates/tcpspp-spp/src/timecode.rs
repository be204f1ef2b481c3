use bytes::{BufMut, BytesMut};

use crate::error::{Result, SppError};

/// Wire width of the secondary-header time code.
pub const TIMECODE_SIZE: usize = 6;

/// CCSDS unsegmented time code carried in the SPP secondary header.
///
/// A fixed-width big-endian value: 4 octets of coarse time followed by
/// 2 octets of fine time. It is a payload field, not a timing mechanism;
/// no clock is consulted anywhere in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timecode {
    pub coarse: u32,
    pub fine: u16,
}

impl Timecode {
    pub fn new(coarse: u32, fine: u16) -> Self {
        Self { coarse, fine }
    }

    /// Append the fixed-width encoding. No dynamic length.
    pub fn encode_into(&self, dst: &mut BytesMut) {
        dst.reserve(TIMECODE_SIZE);
        dst.put_u32(self.coarse);
        dst.put_u16(self.fine);
    }

    /// Decode from the start of `raw`.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() < TIMECODE_SIZE {
            return Err(SppError::Truncated {
                what: "secondary-header time code",
                needed: TIMECODE_SIZE,
                got: raw.len(),
            });
        }
        Ok(Self {
            coarse: u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]),
            fine: u16::from_be_bytes([raw[4], raw[5]]),
        })
    }
}
