//! Command discriminants carried in word 0 of every control packet.

use std::fmt;

use crate::error::PacketError;

/// Supported lmkd commands.
///
/// Replies reuse the discriminant of their request; which one a packet is
/// depends on the side of the connection that receives it.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum LmkCommand {
    /// Associate minfree with oom_adj_score.
    Target = 0,
    /// Register a process and set its oom_adj_score.
    ProcPrio = 1,
    /// Unregister a process.
    ProcRemove = 2,
    /// Purge all registered processes.
    ProcPurge = 3,
    /// Get number of kills.
    GetKillCnt = 4,
    /// Subscribe for asynchronous events.
    Subscribe = 5,
    /// Unsolicited message to subscribed clients on process kills.
    ProcKill = 6,
    /// Reinit properties.
    UpdateProps = 7,
    /// Unsolicited message to subscribed clients for kill statistics.
    StatKillOccurred = 8,
    /// Start PSI monitoring if it was skipped earlier.
    StartMonitoring = 9,
    /// Boot has completed.
    BootCompleted = 10,
    /// Register several processes at once.
    ProcsPrio = 11,
}

impl LmkCommand {
    /// Every command, in discriminant order.
    pub const ALL: [LmkCommand; 12] = [
        LmkCommand::Target,
        LmkCommand::ProcPrio,
        LmkCommand::ProcRemove,
        LmkCommand::ProcPurge,
        LmkCommand::GetKillCnt,
        LmkCommand::Subscribe,
        LmkCommand::ProcKill,
        LmkCommand::UpdateProps,
        LmkCommand::StatKillOccurred,
        LmkCommand::StartMonitoring,
        LmkCommand::BootCompleted,
        LmkCommand::ProcsPrio,
    ];

    /// Wire value of the discriminant (host order).
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Protocol name, e.g. `LMK_PROCPRIO`.
    pub fn name(self) -> &'static str {
        match self {
            LmkCommand::Target => "LMK_TARGET",
            LmkCommand::ProcPrio => "LMK_PROCPRIO",
            LmkCommand::ProcRemove => "LMK_PROCREMOVE",
            LmkCommand::ProcPurge => "LMK_PROCPURGE",
            LmkCommand::GetKillCnt => "LMK_GETKILLCNT",
            LmkCommand::Subscribe => "LMK_SUBSCRIBE",
            LmkCommand::ProcKill => "LMK_PROCKILL",
            LmkCommand::UpdateProps => "LMK_UPDATE_PROPS",
            LmkCommand::StatKillOccurred => "LMK_STAT_KILL_OCCURRED",
            LmkCommand::StartMonitoring => "LMK_START_MONITORING",
            LmkCommand::BootCompleted => "LMK_BOOT_COMPLETED",
            LmkCommand::ProcsPrio => "LMK_PROCS_PRIO",
        }
    }
}

impl TryFrom<i32> for LmkCommand {
    type Error = PacketError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        usize::try_from(raw)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(PacketError::UnknownCommand(raw))
    }
}

impl fmt::Display for LmkCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
