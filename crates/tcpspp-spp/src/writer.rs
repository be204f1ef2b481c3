use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::error::{Result, SppError};
use crate::packet::{encode_packet, Packet};

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;

/// Serializes SPP frames onto any `Write` stream.
pub struct PacketWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> PacketWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode and write one complete frame (blocking).
    pub fn send(&mut self, packet: &Packet) -> Result<()> {
        self.buf.clear();
        encode_packet(packet, &mut self.buf)?;
        tracing::debug!(frame = %hex::encode(&self.buf), "sending frame");

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(SppError::EndOfStream),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(SppError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(SppError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::header::PrimaryHeader;
    use crate::packet::decode_packet;
    use crate::timecode::Timecode;

    fn sample_packet() -> Packet {
        let header = PrimaryHeader {
            has_secondary_header: true,
            apid: 42,
            ..PrimaryHeader::default()
        };
        Packet::build(header, Some(Timecode::new(1, 2)), &b"payload"[..], true).unwrap()
    }

    #[test]
    fn written_bytes_decode() {
        let mut writer = PacketWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(&sample_packet()).unwrap();

        let wire = writer.into_inner().into_inner();
        let (decoded, consumed) = decode_packet(&wire, true, true).unwrap();

        assert_eq!(consumed, wire.len());
        assert_eq!(decoded.payload.as_ref(), b"payload");
        assert_eq!(decoded.timecode, Some(Timecode::new(1, 2)));
    }

    #[test]
    fn consecutive_sends_reuse_the_buffer() {
        let mut writer = PacketWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(&sample_packet()).unwrap();
        writer.send(&sample_packet()).unwrap();

        let wire = writer.into_inner().into_inner();
        let (_, first) = decode_packet(&wire, true, true).unwrap();
        let (second, rest) = decode_packet(&wire[first..], true, true).unwrap();

        assert_eq!(first + rest, wire.len());
        assert_eq!(second.payload.as_ref(), b"payload");
    }

    #[test]
    fn zero_length_write_is_end_of_stream() {
        struct ZeroWriter;

        impl Write for ZeroWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = PacketWriter::new(ZeroWriter);
        let err = writer.send(&sample_packet()).unwrap_err();
        assert!(matches!(err, SppError::EndOfStream));
    }

    #[test]
    fn interrupted_write_and_flush_retry() {
        let mut writer = PacketWriter::new(InterruptedWriteThenFlush {
            wrote_once: false,
            flush_interrupted: false,
            data: Vec::new(),
        });
        writer.send(&sample_packet()).unwrap();

        let inner = writer.into_inner();
        let (decoded, _) = decode_packet(&inner.data, true, true).unwrap();
        assert_eq!(decoded.payload.as_ref(), b"payload");
    }

    struct InterruptedWriteThenFlush {
        wrote_once: bool,
        flush_interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_interrupted {
                self.flush_interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            Ok(())
        }
    }

    #[test]
    fn short_writes_are_resumed() {
        let mut writer = PacketWriter::new(OneByteWriter { data: Vec::new() });
        writer.send(&sample_packet()).unwrap();

        let inner = writer.into_inner();
        let (decoded, _) = decode_packet(&inner.data, true, true).unwrap();
        assert_eq!(decoded.payload.as_ref(), b"payload");
    }

    struct OneByteWriter {
        data: Vec<u8>,
    }

    impl Write for OneByteWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if buf.is_empty() {
                return Ok(0);
            }
            self.data.push(buf[0]);
            Ok(1)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
