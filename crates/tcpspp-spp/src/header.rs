use bytes::{BufMut, BytesMut};

use crate::error::{Result, SppError};

/// The SPP primary header is always exactly 6 bytes.
pub const HEADER_SIZE: usize = 6;

const VERSION_MAX: u8 = 0x07;
const APID_MAX: u16 = 0x07FF;
const SEQUENCE_COUNT_MAX: u16 = 0x3FFF;

/// Packet type bit: telemetry (0) or telecommand (1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacketType {
    #[default]
    Telemetry,
    Telecommand,
}

impl PacketType {
    fn from_bit(bit: u16) -> Self {
        if bit == 0 {
            PacketType::Telemetry
        } else {
            PacketType::Telecommand
        }
    }

    fn bit(self) -> u16 {
        match self {
            PacketType::Telemetry => 0,
            PacketType::Telecommand => 1,
        }
    }
}

/// Segmentation state of the packet within a higher-level data unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceFlags {
    Continuation,
    First,
    Last,
    /// A complete, unsegmented data unit.
    #[default]
    Unsegmented,
}

impl SequenceFlags {
    fn from_bits(bits: u16) -> Self {
        match bits & 0b11 {
            0 => SequenceFlags::Continuation,
            1 => SequenceFlags::First,
            2 => SequenceFlags::Last,
            _ => SequenceFlags::Unsegmented,
        }
    }

    fn bits(self) -> u16 {
        match self {
            SequenceFlags::Continuation => 0,
            SequenceFlags::First => 1,
            SequenceFlags::Last => 2,
            SequenceFlags::Unsegmented => 3,
        }
    }
}

/// The fixed 6-byte SPP primary header.
///
/// Wire layout, three big-endian 16-bit words:
/// ```text
/// word 0: version(3) | packet_type(1) | has_secondary_header(1) | apid(11)
/// word 1: sequence_flags(2) | sequence_count(14)
/// word 2: data_length(16)
/// ```
///
/// `data_length` is the CCSDS packet-data-length field: one fewer than the
/// number of bytes following the primary header (secondary header + payload
/// + CRC trailer). A header therefore always declares at least 1 data byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrimaryHeader {
    pub version: u8,
    pub packet_type: PacketType,
    pub has_secondary_header: bool,
    pub apid: u16,
    pub sequence_flags: SequenceFlags,
    pub sequence_count: u16,
    pub data_length: u16,
}

impl PrimaryHeader {
    /// Serialize into exactly [`HEADER_SIZE`] bytes.
    ///
    /// Field values wider than their wire bit width are rejected rather than
    /// silently masked.
    pub fn encode_into(&self, dst: &mut BytesMut) -> Result<()> {
        if self.version > VERSION_MAX {
            return Err(SppError::FieldOutOfRange {
                field: "version",
                value: u32::from(self.version),
                max: u32::from(VERSION_MAX),
            });
        }
        if self.apid > APID_MAX {
            return Err(SppError::FieldOutOfRange {
                field: "apid",
                value: u32::from(self.apid),
                max: u32::from(APID_MAX),
            });
        }
        if self.sequence_count > SEQUENCE_COUNT_MAX {
            return Err(SppError::FieldOutOfRange {
                field: "sequence_count",
                value: u32::from(self.sequence_count),
                max: u32::from(SEQUENCE_COUNT_MAX),
            });
        }

        dst.reserve(HEADER_SIZE);
        dst.put_u16(
            u16::from(self.version) << 13
                | self.packet_type.bit() << 12
                | u16::from(self.has_secondary_header) << 11
                | self.apid,
        );
        dst.put_u16(self.sequence_flags.bits() << 14 | self.sequence_count);
        dst.put_u16(self.data_length);
        Ok(())
    }

    /// Full decode of the primary header. Always consumes exactly
    /// [`HEADER_SIZE`] bytes.
    pub fn decode(raw: &[u8]) -> Result<(Self, usize)> {
        if raw.len() < HEADER_SIZE {
            return Err(SppError::Truncated {
                what: "primary header",
                needed: HEADER_SIZE,
                got: raw.len(),
            });
        }

        let word0 = u16::from_be_bytes([raw[0], raw[1]]);
        let word1 = u16::from_be_bytes([raw[2], raw[3]]);
        let word2 = u16::from_be_bytes([raw[4], raw[5]]);

        let header = PrimaryHeader {
            version: (word0 >> 13) as u8,
            packet_type: PacketType::from_bit(word0 >> 12 & 0b1),
            has_secondary_header: word0 >> 11 & 0b1 != 0,
            apid: word0 & APID_MAX,
            sequence_flags: SequenceFlags::from_bits(word1 >> 14),
            sequence_count: word1 & SEQUENCE_COUNT_MAX,
            data_length: word2,
        };
        Ok((header, HEADER_SIZE))
    }
}

/// Extract just the length word and the secondary-header flag from the first
/// 6 bytes of a frame.
///
/// This is the partial parse the stream framer runs before the rest of the
/// frame has arrived: `data_length + 1` more bytes complete the frame.
pub fn preparse_data_length(raw: &[u8]) -> Result<(u16, bool)> {
    if raw.len() < HEADER_SIZE {
        return Err(SppError::Truncated {
            what: "primary header",
            needed: HEADER_SIZE,
            got: raw.len(),
        });
    }
    let has_secondary_header = raw[0] & 0x08 != 0;
    let data_length = u16::from_be_bytes([raw[4], raw[5]]);
    Ok((data_length, has_secondary_header))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn encode(header: &PrimaryHeader) -> BytesMut {
        let mut buf = BytesMut::new();
        header.encode_into(&mut buf).unwrap();
        buf
    }

    #[test]
    fn known_wire_layout() {
        let header = PrimaryHeader {
            version: 0,
            packet_type: PacketType::Telemetry,
            has_secondary_header: true,
            apid: 100,
            sequence_flags: SequenceFlags::Unsegmented,
            sequence_count: 0,
            data_length: 7,
        };

        let buf = encode(&header);
        assert_eq!(buf.as_ref(), &[0x08, 0x64, 0xC0, 0x00, 0x00, 0x07]);
    }

    #[test]
    fn decode_consumes_exactly_six_bytes() {
        let mut buf = encode(&PrimaryHeader::default());
        buf.extend_from_slice(&[0xAA; 4]);

        let (_, consumed) = PrimaryHeader::decode(&buf).unwrap();
        assert_eq!(consumed, HEADER_SIZE);
    }

    #[test]
    fn preparse_matches_known_header() {
        let buf = encode(&PrimaryHeader {
            has_secondary_header: true,
            data_length: 0x1234,
            ..PrimaryHeader::default()
        });

        let (data_length, has_secondary) = preparse_data_length(&buf).unwrap();
        assert_eq!(data_length, 0x1234);
        assert!(has_secondary);
    }

    #[test]
    fn short_buffers_are_rejected() {
        let err = PrimaryHeader::decode(&[0u8; 5]).unwrap_err();
        assert!(matches!(
            err,
            SppError::Truncated {
                needed: HEADER_SIZE,
                got: 5,
                ..
            }
        ));

        let err = preparse_data_length(&[0u8; 3]).unwrap_err();
        assert!(matches!(err, SppError::Truncated { got: 3, .. }));
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let mut buf = BytesMut::new();

        let header = PrimaryHeader {
            version: 8,
            ..PrimaryHeader::default()
        };
        assert!(matches!(
            header.encode_into(&mut buf).unwrap_err(),
            SppError::FieldOutOfRange {
                field: "version",
                ..
            }
        ));

        let header = PrimaryHeader {
            apid: 0x0800,
            ..PrimaryHeader::default()
        };
        assert!(matches!(
            header.encode_into(&mut buf).unwrap_err(),
            SppError::FieldOutOfRange { field: "apid", .. }
        ));

        let header = PrimaryHeader {
            sequence_count: 0x4000,
            ..PrimaryHeader::default()
        };
        assert!(matches!(
            header.encode_into(&mut buf).unwrap_err(),
            SppError::FieldOutOfRange {
                field: "sequence_count",
                ..
            }
        ));
    }

    proptest! {
        #[test]
        fn encode_decode_equivalence(header in header_strategy()) {
            let buf = encode(&header);
            prop_assert_eq!(buf.len(), HEADER_SIZE);

            let (decoded, consumed) = PrimaryHeader::decode(&buf).unwrap();
            prop_assert_eq!(consumed, HEADER_SIZE);
            prop_assert_eq!(decoded, header);
        }

        #[test]
        fn preparse_agrees_with_full_decode(header in header_strategy()) {
            let buf = encode(&header);

            let (data_length, has_secondary) = preparse_data_length(&buf).unwrap();
            let (decoded, _) = PrimaryHeader::decode(&buf).unwrap();

            prop_assert_eq!(data_length, decoded.data_length);
            prop_assert_eq!(has_secondary, decoded.has_secondary_header);
        }

        #[test]
        fn decode_encode_equivalence(raw in any::<[u8; 6]>()) {
            let (header, _) = PrimaryHeader::decode(&raw).unwrap();
            let buf = encode(&header);
            prop_assert_eq!(buf.as_ref(), &raw);
        }

        #[test]
        fn preparse_agrees_on_arbitrary_bytes(raw in any::<[u8; 6]>()) {
            let (data_length, has_secondary) = preparse_data_length(&raw).unwrap();
            let (decoded, _) = PrimaryHeader::decode(&raw).unwrap();

            prop_assert_eq!(data_length, decoded.data_length);
            prop_assert_eq!(has_secondary, decoded.has_secondary_header);
        }
    }

    prop_compose! {
        fn header_strategy()(
            version in 0u8..=7,
            packet_type in prop_oneof![
                Just(PacketType::Telemetry),
                Just(PacketType::Telecommand),
            ],
            has_secondary_header in any::<bool>(),
            apid in 0u16..=APID_MAX,
            sequence_flags in prop_oneof![
                Just(SequenceFlags::Continuation),
                Just(SequenceFlags::First),
                Just(SequenceFlags::Last),
                Just(SequenceFlags::Unsegmented),
            ],
            sequence_count in 0u16..=SEQUENCE_COUNT_MAX,
            data_length in any::<u16>(),
        ) -> PrimaryHeader {
            PrimaryHeader {
                version,
                packet_type,
                has_secondary_header,
                apid,
                sequence_flags,
                sequence_count,
                data_length,
            }
        }
    }
}
