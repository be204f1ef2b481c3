use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::error::{Result, SppError};
use crate::header::{preparse_data_length, HEADER_SIZE};
use crate::packet::{decode_packet, Packet};

/// Reassembles complete SPP frames from any `Read` stream.
///
/// A frame is collected with two exact-length reads: the fixed 6-byte
/// primary header, then the `data_length + 1` bytes it declares. Nothing
/// past the frame is consumed, so unrelated bytes following it stay in the
/// stream for the next call.
pub struct PacketReader<T> {
    inner: T,
    timecode_used: bool,
    has_crc: bool,
}

impl<T: Read> PacketReader<T> {
    /// Create a reader with the link's out-of-band frame flags.
    pub fn new(inner: T, timecode_used: bool, has_crc: bool) -> Self {
        Self {
            inner,
            timecode_used,
            has_crc,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(SppError::EndOfStream)` when the stream closes before
    /// the frame is complete.
    pub fn read_packet(&mut self) -> Result<Packet> {
        let mut frame = BytesMut::zeroed(HEADER_SIZE);
        self.read_exact(&mut frame)?;

        let (data_length, _) = preparse_data_length(&frame)?;
        let remainder = usize::from(data_length) + 1;

        frame.resize(HEADER_SIZE + remainder, 0);
        self.read_exact(&mut frame[HEADER_SIZE..])?;
        tracing::debug!(frame = %hex::encode(&frame), "received frame");

        let (packet, _) = decode_packet(&frame, self.timecode_used, self.has_crc)?;
        Ok(packet)
    }

    /// Collect exactly `buf.len()` bytes.
    ///
    /// A zero-length read means the peer closed the stream; it terminates
    /// the loop as [`SppError::EndOfStream`] instead of being retried.
    /// Retrying on a closed connection yields zero-length reads forever.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => return Err(SppError::EndOfStream),
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(SppError::Io(err)),
            }
        }
        Ok(())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
