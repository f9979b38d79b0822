use std::io::{ErrorKind, Read};

use tracing::{debug, warn};

use crate::error::{PacketError, Result};
use crate::message::{LmkdMessage, Role};
use crate::packet::{CtrlPacket, PacketConfig, ReceivedPacket, WORD_SIZE};

/// Reads control packets from a message-preserving stream.
///
/// Each `read` on the inner stream must return exactly one packet, as a
/// `SOCK_SEQPACKET` socket does. Byte streams without message boundaries
/// need their own framing in front of this reader.
pub struct PacketReader<T> {
    inner: T,
    config: PacketConfig,
}

impl<T: Read> PacketReader<T> {
    /// Create a new packet reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, PacketConfig::default())
    }

    /// Create a new packet reader with explicit configuration.
    pub fn with_config(inner: T, config: PacketConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next packet (blocking).
    ///
    /// Returns `Err(PacketError::ConnectionClosed)` when EOF is reached.
    pub fn read_packet(&mut self) -> Result<ReceivedPacket> {
        let mut packet = CtrlPacket::new();
        let len = loop {
            match self.inner.read(packet.as_mut_bytes()) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(PacketError::Io(err)),
            }
        };

        if len == 0 {
            return Err(PacketError::ConnectionClosed);
        }
        if len % WORD_SIZE != 0 {
            warn!(len, "discarding packet with partial word");
            return Err(PacketError::InvalidPacketLength(len));
        }

        debug!(
            command = packet.raw_command(),
            len, "received control packet"
        );
        ReceivedPacket::from_packet(packet, len)
    }

    /// Read and decode the next message, as seen by `role`.
    pub fn read_message(&mut self, role: Role) -> Result<LmkdMessage> {
        let received = self.read_packet()?;
        LmkdMessage::decode_received(&received, role, &self.config)
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

    /// Current packet reader configuration.
    pub fn config(&self) -> &PacketConfig {
        &self.config
    }
}
