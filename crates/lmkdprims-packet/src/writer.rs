use std::io::{ErrorKind, Write};

use tracing::debug;

use crate::error::{PacketError, Result};
use crate::message::LmkdMessage;
use crate::packet::{check_len, CtrlPacket};

/// Writes control packets to a message-preserving stream.
pub struct PacketWriter<T> {
    inner: T,
}

impl<T: Write> PacketWriter<T> {
    /// Create a new packet writer.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Send the first `len` bytes of an encoded packet (blocking).
    ///
    /// `len` is the value returned by the encoder.
    pub fn send(&mut self, packet: &CtrlPacket, len: usize) -> Result<()> {
        check_len(len)?;

        let bytes = &packet.as_bytes()[..len];
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.inner.write(&bytes[offset..]) {
                Ok(0) => return Err(PacketError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(PacketError::Io(err)),
            }
        }

        debug!(command = packet.raw_command(), len, "sent control packet");
        self.flush()
    }

    /// Encode and send a message, returning the number of bytes sent.
    pub fn send_message(&mut self, message: &LmkdMessage) -> Result<usize> {
        let mut packet = CtrlPacket::new();
        let len = message.encode(&mut packet)?;
        self.send(&packet, len)?;
        Ok(len)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(PacketError::Io(err)),
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
