use bytes::{Buf, BufMut};

use crate::command::LmkCommand;
use crate::error::{PacketError, Result};

/// Max number of targets in an LMK_TARGET command.
pub const MAX_TARGETS: usize = 6;

/// Size of one packet word in bytes.
pub const WORD_SIZE: usize = std::mem::size_of::<i32>();

/// Packet capacity in words: the command plus MAX_TARGETS minfree/score pairs,
/// the longest payload of any command.
pub const CTRL_PACKET_MAX_WORDS: usize = MAX_TARGETS * 2 + 1;

/// Packet capacity in bytes.
pub const CTRL_PACKET_MAX_SIZE: usize = CTRL_PACKET_MAX_WORDS * WORD_SIZE;

/// Size of the work buffer lmkd uses for its own reads.
pub const BUF_MAX: usize = 4096;

/// Number of fields in one LMK_PROCPRIO record.
pub const PROCPRIO_FIELD_COUNT: usize = 4;

/// Size of one LMK_PROCPRIO record in bytes.
pub const PROCPRIO_SIZE: usize = PROCPRIO_FIELD_COUNT * WORD_SIZE;

/// Max number of records in an LMK_PROCS_PRIO command.
pub const PROCS_PRIO_MAX_RECORD_COUNT: usize = CTRL_PACKET_MAX_SIZE / PROCPRIO_SIZE;

/// An lmkd control packet: the command word followed by its payload.
///
/// The buffer holds the wire image, so every word is big-endian regardless of
/// host byte order. Only the leading bytes reported by the encoder are
/// meaningful; trailing words are left as they were.
///
/// ```text
/// ┌───────────┬──────────┬──────────┬─────┬───────────┐
/// │ word 0    │ word 1   │ word 2   │ ... │ word 12   │
/// │ command   │ payload  │ payload  │     │ payload   │
/// │ (i32 BE)  │ (i32 BE) │ (i32 BE) │     │ (i32 BE)  │
/// └───────────┴──────────┴──────────┴─────┴───────────┘
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CtrlPacket {
    bytes: [u8; CTRL_PACKET_MAX_SIZE],
}

impl CtrlPacket {
    /// Create a zeroed packet.
    pub fn new() -> Self {
        Self {
            bytes: [0; CTRL_PACKET_MAX_SIZE],
        }
    }

    /// Command word converted from network order, without validation.
    ///
    /// Callers must range-check the value before dispatching on it; see
    /// [`CtrlPacket::command`] for the checked read.
    pub fn raw_command(&self) -> i32 {
        self.word(0)
    }

    /// Command word as a known [`LmkCommand`].
    pub fn command(&self) -> Result<LmkCommand> {
        LmkCommand::try_from(self.raw_command())
    }

    /// Read word `idx` in host order.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= CTRL_PACKET_MAX_WORDS`.
    pub fn word(&self, idx: usize) -> i32 {
        let mut src = &self.bytes[idx * WORD_SIZE..(idx + 1) * WORD_SIZE];
        src.get_i32()
    }

    /// Write word `idx` from host order.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= CTRL_PACKET_MAX_WORDS`.
    pub fn set_word(&mut self, idx: usize, value: i32) {
        let mut dst = &mut self.bytes[idx * WORD_SIZE..(idx + 1) * WORD_SIZE];
        dst.put_i32(value);
    }

    /// The full wire buffer.
    pub fn as_bytes(&self) -> &[u8; CTRL_PACKET_MAX_SIZE] {
        &self.bytes
    }

    /// The full wire buffer, for filling from a read.
    pub fn as_mut_bytes(&mut self) -> &mut [u8; CTRL_PACKET_MAX_SIZE] {
        &mut self.bytes
    }
}

impl Default for CtrlPacket {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CtrlPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let words: Vec<i32> = (0..CTRL_PACKET_MAX_WORDS).map(|i| self.word(i)).collect();
        f.debug_struct("CtrlPacket").field("words", &words).finish()
    }
}

/// Sequential word writer over a packet, starting with the command word.
#[derive(Debug)]
pub(crate) struct WordCursor<'a> {
    packet: &'a mut CtrlPacket,
    idx: usize,
}

impl<'a> WordCursor<'a> {
    /// Start a fixed-shape packet. Fixed payloads always fit.
    pub(crate) fn new(packet: &'a mut CtrlPacket, command: LmkCommand) -> Self {
        packet.set_word(0, command.as_raw());
        Self { packet, idx: 1 }
    }

    /// Start a packet after checking that `payload_words` fit behind the command.
    pub(crate) fn with_payload(
        packet: &'a mut CtrlPacket,
        command: LmkCommand,
        payload_words: usize,
    ) -> Result<Self> {
        let needed = payload_words + 1;
        if needed > CTRL_PACKET_MAX_WORDS {
            return Err(PacketError::CapacityExceeded {
                needed,
                capacity: CTRL_PACKET_MAX_WORDS,
            });
        }
        Ok(Self::new(packet, command))
    }

    pub(crate) fn put(&mut self, value: i32) {
        self.packet.set_word(self.idx, value);
        self.idx += 1;
    }

    /// Bytes written so far, command included.
    pub(crate) fn finish(self) -> usize {
        self.idx * WORD_SIZE
    }
}

/// A packet as received from the wire, with its meaningful length.
///
/// The length always covers the command word plus whole payload words and
/// never exceeds [`CTRL_PACKET_MAX_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceivedPacket {
    packet: CtrlPacket,
    len: usize,
}

impl ReceivedPacket {
    /// Copy a received message into a packet.
    ///
    /// The message must hold the command word and a whole number of payload
    /// words, and fit the packet capacity.
    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        check_len(bytes.len())?;
        let mut packet = CtrlPacket::new();
        packet.as_mut_bytes()[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            packet,
            len: bytes.len(),
        })
    }

    /// Wrap a filled packet whose first `len` bytes are meaningful, such as
    /// the output of an encoder.
    pub fn from_packet(packet: CtrlPacket, len: usize) -> Result<Self> {
        check_len(len)?;
        Ok(Self { packet, len })
    }

    pub fn packet(&self) -> &CtrlPacket {
        &self.packet
    }

    /// Meaningful length in bytes, command word included.
    pub fn wire_len(&self) -> usize {
        self.len
    }

    /// Number of payload words, the command word excluded.
    pub fn field_count(&self) -> usize {
        self.len / WORD_SIZE - 1
    }

    /// The meaningful bytes of the packet.
    pub fn as_bytes(&self) -> &[u8] {
        &self.packet.as_bytes()[..self.len]
    }
}

/// Accepts lengths of one to [`CTRL_PACKET_MAX_WORDS`] whole words.
pub(crate) fn check_len(len: usize) -> Result<()> {
    if len < WORD_SIZE || len > CTRL_PACKET_MAX_SIZE || len % WORD_SIZE != 0 {
        return Err(PacketError::InvalidPacketLength(len));
    }
    Ok(())
}

/// How strictly received field counts are checked against the command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validation {
    /// Every command's field count must match its payload shape.
    #[default]
    Strict,
    /// Only LMK_PROCS_PRIO is checked; extra or missing words are trusted
    /// to the caller, as lmkd itself does.
    Lenient,
}

/// Configuration for message decoding.
#[derive(Debug, Clone, Default)]
pub struct PacketConfig {
    /// Field count validation mode. Default: strict.
    pub validation: Validation,
}
