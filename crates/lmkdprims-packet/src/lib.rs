//! Control packet codec for the low-memory-killer daemon (lmkd) protocol.
//!
//! Every packet is a fixed-capacity array of 32-bit big-endian words:
//! - Word 0 is the command ([`LmkCommand`])
//! - The remaining words are the command's payload
//!
//! Encoders return the number of meaningful bytes, which is exactly what goes
//! on the wire. The receiver derives the payload field count from the received
//! length and hands it to the decoder, which is how shorter packets from older
//! senders stay readable.

pub mod codec;
pub mod command;
pub mod error;
pub mod message;
pub mod packet;
pub mod reader;
pub mod records;
pub mod writer;

pub use command::LmkCommand;
pub use error::{PacketError, Result};
pub use message::{LmkdMessage, Role};
pub use packet::{
    CtrlPacket, PacketConfig, ReceivedPacket, Validation, BUF_MAX, CTRL_PACKET_MAX_SIZE,
    CTRL_PACKET_MAX_WORDS, MAX_TARGETS, PROCPRIO_FIELD_COUNT, PROCPRIO_SIZE,
    PROCS_PRIO_MAX_RECORD_COUNT, WORD_SIZE,
};
pub use reader::PacketReader;
pub use records::{
    AsyncEventType, BootCompletedReply, GetKillCount, GetKillCountReply, LmkTarget, ProcKill,
    ProcPrio, ProcRemove, ProcType, ProcsPrio, Subscribe, TargetList, UpdatePropsReply,
};
pub use writer::PacketWriter;
