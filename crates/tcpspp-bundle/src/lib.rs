//! Read-only bundle block model and CRC verification.
//!
//! The bundle-protocol codecs themselves live outside this workspace: an
//! external serializer turns endpoints and application data into the byte
//! payload carried inside an SPP frame, and an external decoder splits a
//! received payload back into blocks. This crate models what that decoder
//! hands over, an ordered and immutable sequence of [`Block`]s, and runs
//! the diagnostic checksum pass across them.

pub mod block;
pub mod crc;
pub mod verify;
pub mod version;

pub use block::{block_type_name, Block, Bundle};
pub use crc::CrcType;
pub use verify::{verify_bundle, BlockReport, CrcStatus};
pub use version::{BundleVersion, UnknownVersion};
