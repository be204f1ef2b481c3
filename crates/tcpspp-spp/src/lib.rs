//! CCSDS Space Packet Protocol framing for the tcpspp convergence layer.
//!
//! Every bundle handed to the link is wrapped in one SPP frame:
//! - A fixed 6-byte big-endian primary header
//! - An optional secondary header carrying an unsegmented time code
//! - The opaque bundle payload
//! - An optional big-endian CRC-16 trailer over all preceding bytes
//!
//! The header's length word declares one fewer than the number of bytes
//! following the primary header, so a frame is reassembled from a stream
//! with two exact-length reads: header first, declared remainder second.
//! Whether a time code or CRC trailer is present is not self-described on
//! the wire; both flags come from the link configuration agreed
//! out-of-band.

pub mod error;
pub mod header;
pub mod packet;
pub mod reader;
pub mod timecode;
pub mod writer;

pub use error::{Result, SppError};
pub use header::{
    preparse_data_length, PacketType, PrimaryHeader, SequenceFlags, HEADER_SIZE,
};
pub use packet::{decode_packet, encode_packet, frame_crc, Packet, CRC_SIZE, MAX_DATA_FIELD};
pub use reader::PacketReader;
pub use timecode::{Timecode, TIMECODE_SIZE};
pub use writer::PacketWriter;
