use crate::command::LmkCommand;
use crate::message::Role;

/// Errors that can occur during control packet encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// Word 0 of the packet is not a known command.
    #[error("unknown lmkd command {0}")]
    UnknownCommand(i32),

    /// The received field count does not match the payload shape of the command.
    #[error("invalid field count {field_count} for {command}")]
    InvalidFieldCount {
        command: LmkCommand,
        field_count: usize,
    },

    /// The command is never sent to this side of the connection.
    #[error("unexpected {command} received by {role}")]
    UnexpectedCommand { command: LmkCommand, role: Role },

    /// A process-type payload field holds an unrecognized value.
    #[error("unknown process type {0}")]
    UnknownProcType(i32),

    /// An event-type payload field holds an unrecognized value.
    #[error("unknown async event type {0}")]
    UnknownEventType(i32),

    /// The records do not fit into a control packet.
    #[error("packet capacity exceeded ({needed} words, max {capacity})")]
    CapacityExceeded { needed: usize, capacity: usize },

    /// The received byte length is not a whole number of words.
    #[error("invalid packet length ({0} bytes)")]
    InvalidPacketLength(usize),

    /// An I/O error occurred while reading or writing packets.
    #[error("packet I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a packet was received.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, PacketError>;
