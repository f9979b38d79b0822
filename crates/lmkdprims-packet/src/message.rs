//! Typed messages with request/reply direction made explicit.

use std::fmt;
use std::ops::RangeInclusive;

use tracing::trace;

use crate::command::LmkCommand;
use crate::error::{PacketError, Result};
use crate::packet::{CtrlPacket, PacketConfig, ReceivedPacket, Validation};
use crate::records::{
    BootCompletedReply, GetKillCount, GetKillCountReply, ProcKill, ProcPrio, ProcRemove,
    ProcsPrio, Subscribe, TargetList, UpdatePropsReply,
};

/// Which side of the lmkd connection is decoding.
///
/// Replies share the discriminant of their request, so the receiving role is
/// what tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// lmkd itself, receiving requests and notifications from clients.
    Server,
    /// A client, receiving replies and unsolicited events from lmkd.
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Server => f.write_str("server"),
            Role::Client => f.write_str("client"),
        }
    }
}

/// A decoded control message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "payload", rename_all = "snake_case")
)]
pub enum LmkdMessage {
    Target(TargetList),
    ProcPrio(ProcPrio),
    ProcRemove(ProcRemove),
    ProcPurge,
    GetKillCount(GetKillCount),
    GetKillCountReply(GetKillCountReply),
    Subscribe(Subscribe),
    ProcKill(ProcKill),
    UpdateProps,
    UpdatePropsReply(UpdatePropsReply),
    StatKillOccurred,
    StartMonitoring,
    BootCompleted,
    BootCompletedReply(BootCompletedReply),
    ProcsPrio(ProcsPrio),
}

impl LmkdMessage {
    /// The wire discriminant of this message.
    pub fn command(&self) -> LmkCommand {
        match self {
            LmkdMessage::Target(_) => LmkCommand::Target,
            LmkdMessage::ProcPrio(_) => LmkCommand::ProcPrio,
            LmkdMessage::ProcRemove(_) => LmkCommand::ProcRemove,
            LmkdMessage::ProcPurge => LmkCommand::ProcPurge,
            LmkdMessage::GetKillCount(_) | LmkdMessage::GetKillCountReply(_) => {
                LmkCommand::GetKillCnt
            }
            LmkdMessage::Subscribe(_) => LmkCommand::Subscribe,
            LmkdMessage::ProcKill(_) => LmkCommand::ProcKill,
            LmkdMessage::UpdateProps | LmkdMessage::UpdatePropsReply(_) => {
                LmkCommand::UpdateProps
            }
            LmkdMessage::StatKillOccurred => LmkCommand::StatKillOccurred,
            LmkdMessage::StartMonitoring => LmkCommand::StartMonitoring,
            LmkdMessage::BootCompleted | LmkdMessage::BootCompletedReply(_) => {
                LmkCommand::BootCompleted
            }
            LmkdMessage::ProcsPrio(_) => LmkCommand::ProcsPrio,
        }
    }

    /// The role that receives this message.
    pub fn receiver(&self) -> Role {
        match self {
            LmkdMessage::GetKillCountReply(_)
            | LmkdMessage::UpdatePropsReply(_)
            | LmkdMessage::BootCompletedReply(_)
            | LmkdMessage::ProcKill(_)
            | LmkdMessage::StatKillOccurred => Role::Client,
            _ => Role::Server,
        }
    }

    /// Encode into `packet`, returning the number of bytes to send.
    pub fn encode(&self, packet: &mut CtrlPacket) -> Result<usize> {
        let len = match self {
            LmkdMessage::Target(targets) => packet.set_target(targets.as_slice())?,
            LmkdMessage::ProcPrio(params) => packet.set_procprio(params),
            LmkdMessage::ProcRemove(params) => packet.set_procremove(params),
            LmkdMessage::ProcPurge => packet.set_procpurge(),
            LmkdMessage::GetKillCount(params) => packet.set_getkillcnt(params),
            LmkdMessage::GetKillCountReply(reply) => packet.set_getkillcnt_reply(reply.count),
            LmkdMessage::Subscribe(params) => packet.set_subscribe(params.evt_type),
            LmkdMessage::ProcKill(params) => packet.set_prockill(params.pid, params.uid),
            LmkdMessage::UpdateProps => packet.set_update_props(),
            LmkdMessage::UpdatePropsReply(reply) => packet.set_update_props_reply(reply.result),
            LmkdMessage::StatKillOccurred => packet.set_stat_kill_occurred(),
            LmkdMessage::StartMonitoring => packet.set_start_monitoring(),
            LmkdMessage::BootCompleted => packet.set_boot_completed(),
            LmkdMessage::BootCompletedReply(reply) => {
                packet.set_boot_completed_reply(reply.result)
            }
            LmkdMessage::ProcsPrio(procs) => packet.set_procs_prio(procs.as_slice())?,
        };
        Ok(len)
    }

    /// Decode a packet carrying `field_count` payload words, as seen by `role`.
    pub fn decode(
        packet: &CtrlPacket,
        field_count: usize,
        role: Role,
        config: &PacketConfig,
    ) -> Result<Self> {
        let command = packet.command()?;
        trace!(%command, field_count, %role, "decoding control packet");

        let fields = FieldCheck {
            command,
            field_count,
            validation: config.validation,
        };

        match (role, command) {
            (Role::Server, LmkCommand::Target) => {
                Ok(LmkdMessage::Target(packet.get_targets(field_count)?))
            }
            (Role::Server, LmkCommand::ProcPrio) => {
                fields.require(3..=4)?;
                Ok(LmkdMessage::ProcPrio(packet.get_procprio(field_count)?))
            }
            (Role::Server, LmkCommand::ProcRemove) => {
                fields.require(1..=1)?;
                Ok(LmkdMessage::ProcRemove(packet.get_procremove()))
            }
            (Role::Server, LmkCommand::ProcPurge) => {
                fields.require(0..=0)?;
                Ok(LmkdMessage::ProcPurge)
            }
            (Role::Server, LmkCommand::GetKillCnt) => {
                fields.require(2..=2)?;
                Ok(LmkdMessage::GetKillCount(packet.get_getkillcnt()))
            }
            (Role::Server, LmkCommand::Subscribe) => {
                fields.require(1..=1)?;
                Ok(LmkdMessage::Subscribe(packet.get_subscribe()?))
            }
            (Role::Server, LmkCommand::UpdateProps) => {
                fields.require(0..=0)?;
                Ok(LmkdMessage::UpdateProps)
            }
            (Role::Server, LmkCommand::StartMonitoring) => {
                fields.require(0..=0)?;
                Ok(LmkdMessage::StartMonitoring)
            }
            (Role::Server, LmkCommand::BootCompleted) => {
                fields.require(0..=0)?;
                Ok(LmkdMessage::BootCompleted)
            }
            (Role::Server, LmkCommand::ProcsPrio) => {
                Ok(LmkdMessage::ProcsPrio(packet.get_procs_prio(field_count)?))
            }
            (Role::Client, LmkCommand::GetKillCnt) => {
                fields.require(1..=1)?;
                Ok(LmkdMessage::GetKillCountReply(packet.get_getkillcnt_reply()))
            }
            (Role::Client, LmkCommand::ProcKill) => {
                fields.require(2..=2)?;
                Ok(LmkdMessage::ProcKill(packet.get_prockill()))
            }
            (Role::Client, LmkCommand::UpdateProps) => {
                fields.require(1..=1)?;
                Ok(LmkdMessage::UpdatePropsReply(packet.get_update_props_reply()))
            }
            // Any trailing words belong to the statistics body.
            (Role::Client, LmkCommand::StatKillOccurred) => Ok(LmkdMessage::StatKillOccurred),
            (Role::Client, LmkCommand::BootCompleted) => {
                fields.require(1..=1)?;
                Ok(LmkdMessage::BootCompletedReply(
                    packet.get_boot_completed_reply(),
                ))
            }
            (role, command) => Err(PacketError::UnexpectedCommand { command, role }),
        }
    }

    /// Decode a received packet, as seen by `role`.
    pub fn decode_received(
        received: &ReceivedPacket,
        role: Role,
        config: &PacketConfig,
    ) -> Result<Self> {
        Self::decode(received.packet(), received.field_count(), role, config)
    }
}

struct FieldCheck {
    command: LmkCommand,
    field_count: usize,
    validation: Validation,
}

impl FieldCheck {
    fn require(&self, allowed: RangeInclusive<usize>) -> Result<()> {
        if self.validation == Validation::Lenient || allowed.contains(&self.field_count) {
            return Ok(());
        }
        Err(PacketError::InvalidFieldCount {
            command: self.command,
            field_count: self.field_count,
        })
    }
}
