use bytes::{BufMut, Bytes, BytesMut};
use crc::Crc;

use crate::error::{Result, SppError};
use crate::header::{PrimaryHeader, HEADER_SIZE};
use crate::timecode::{Timecode, TIMECODE_SIZE};

/// Wire width of the optional CRC trailer.
pub const CRC_SIZE: usize = 2;

/// Largest data field the 16-bit length word can declare (value + 1).
pub const MAX_DATA_FIELD: usize = u16::MAX as usize + 1;

/// CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF), the packet error control
/// code from the SPP standard. Both ends of the link must use this exact
/// variant; a different polynomial or init value desynchronizes peers that
/// otherwise look correct.
const FRAME_CRC: Crc<u16> = Crc::<u16>::new(&crc::CRC_16_IBM_3740);

/// Checksum over a frame's preceding bytes, as carried in the CRC trailer.
pub fn frame_crc(data: &[u8]) -> u16 {
    FRAME_CRC.checksum(data)
}

/// One SPP frame: primary header, optional time code, payload, and an
/// optional CRC trailer.
///
/// The wire format does not self-describe whether a trailer is present;
/// `has_crc` (and the time-code flag on decode) come from the link
/// configuration agreed out-of-band by both peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub header: PrimaryHeader,
    pub timecode: Option<Timecode>,
    /// Opaque bundle bytes, produced and consumed by the bundle codec.
    pub payload: Bytes,
    pub has_crc: bool,
    /// The trailer value observed by [`decode_packet`]. [`encode_packet`]
    /// recomputes the trailer and never reads this field.
    pub crc: Option<u16>,
}

impl Packet {
    /// Assemble a packet around `payload`, deriving the header's
    /// `data_length` and `has_secondary_header` fields from the parts.
    ///
    /// When `has_crc` is set, the 2 trailer bytes count toward the declared
    /// data length.
    pub fn build(
        header: PrimaryHeader,
        timecode: Option<Timecode>,
        payload: impl Into<Bytes>,
        has_crc: bool,
    ) -> Result<Self> {
        let mut packet = Packet {
            header,
            timecode,
            payload: payload.into(),
            has_crc,
            crc: None,
        };
        packet.header.data_length = declared_length(&packet)?;
        packet.header.has_secondary_header = packet.timecode.is_some();
        Ok(packet)
    }

    /// Total serialized length: `6 + data_length + 1`.
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.data_field_len()
    }

    fn data_field_len(&self) -> usize {
        self.timecode.map_or(0, |_| TIMECODE_SIZE)
            + self.payload.len()
            + if self.has_crc { CRC_SIZE } else { 0 }
    }
}

fn declared_length(packet: &Packet) -> Result<u16> {
    let len = packet.data_field_len();
    if len == 0 {
        return Err(SppError::EmptyDataField);
    }
    if len > MAX_DATA_FIELD {
        return Err(SppError::PacketTooLarge {
            size: len,
            max: MAX_DATA_FIELD,
        });
    }
    Ok((len - 1) as u16)
}

/// Serialize one frame: header, optional time code, payload, and (when
/// `has_crc`) a big-endian CRC-16 over every preceding byte of the frame.
///
/// The length word is derived from the final total, so the trailer's own
/// size is included in the declared data length before the CRC is appended.
pub fn encode_packet(packet: &Packet, dst: &mut BytesMut) -> Result<()> {
    let mut header = packet.header;
    header.data_length = declared_length(packet)?;
    header.has_secondary_header = packet.timecode.is_some();

    dst.reserve(packet.wire_size());
    let start = dst.len();
    header.encode_into(dst)?;
    if let Some(timecode) = &packet.timecode {
        timecode.encode_into(dst);
    }
    dst.put_slice(&packet.payload);
    if packet.has_crc {
        let crc = frame_crc(&dst[start..]);
        dst.put_u16(crc);
    }
    Ok(())
}

/// Parse one frame from the start of `raw`, returning the packet and the
/// number of bytes consumed.
///
/// `timecode_used` and `has_crc` are caller-supplied: the secondary header
/// is split off only when the flag is set AND the header's
/// `has_secondary_header` bit is set; the 2-byte trailer only when
/// `has_crc`. The remainder is the payload.
///
/// A mismatched trailer is a non-fatal diagnostic: both values are logged
/// and the packet is returned, leaving any enforcement to the caller.
pub fn decode_packet(raw: &[u8], timecode_used: bool, has_crc: bool) -> Result<(Packet, usize)> {
    let (header, _) = PrimaryHeader::decode(raw)?;

    let total = HEADER_SIZE + usize::from(header.data_length) + 1;
    if raw.len() < total {
        return Err(SppError::Truncated {
            what: "packet data field",
            needed: total,
            got: raw.len(),
        });
    }

    let mut rest = &raw[HEADER_SIZE..total];

    let timecode = if timecode_used && header.has_secondary_header {
        let timecode = Timecode::decode(rest)?;
        rest = &rest[TIMECODE_SIZE..];
        Some(timecode)
    } else {
        None
    };

    let crc = if has_crc {
        if rest.len() < CRC_SIZE {
            return Err(SppError::Truncated {
                what: "crc trailer",
                needed: CRC_SIZE,
                got: rest.len(),
            });
        }
        let (payload, trailer) = rest.split_at(rest.len() - CRC_SIZE);
        let provided = u16::from_be_bytes([trailer[0], trailer[1]]);
        let computed = frame_crc(&raw[..total - CRC_SIZE]);
        if provided != computed {
            tracing::warn!(
                provided = %hex::encode(provided.to_be_bytes()),
                computed = %hex::encode(computed.to_be_bytes()),
                "crc trailer does not match frame contents"
            );
        }
        rest = payload;
        Some(provided)
    } else {
        None
    };

    let packet = Packet {
        header,
        timecode,
        payload: Bytes::copy_from_slice(rest),
        has_crc,
        crc,
    };
    Ok((packet, total))
}
