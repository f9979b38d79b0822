//! Typed payload records for each command.

use crate::command::LmkCommand;
use crate::error::{PacketError, Result};
use crate::packet::{
    CTRL_PACKET_MAX_WORDS, MAX_TARGETS, PROCPRIO_FIELD_COUNT, PROCS_PRIO_MAX_RECORD_COUNT,
};

/// LMK_TARGET entry: a minfree threshold and the oom score it applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LmkTarget {
    pub minfree: i32,
    pub oom_adj_score: i32,
}

impl LmkTarget {
    pub fn new(minfree: i32, oom_adj_score: i32) -> Self {
        Self {
            minfree,
            oom_adj_score,
        }
    }
}

/// Process types for [`ProcPrio::ptype`].
#[repr(i32)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ProcType {
    /// Also assumed when a sender predates the type field.
    #[default]
    App = 0,
    Service = 1,
}

impl TryFrom<i32> for ProcType {
    type Error = PacketError;

    fn try_from(raw: i32) -> Result<Self> {
        match raw {
            0 => Ok(ProcType::App),
            1 => Ok(ProcType::Service),
            other => Err(PacketError::UnknownProcType(other)),
        }
    }
}

/// LMK_PROCPRIO payload, also one record of LMK_PROCS_PRIO.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcPrio {
    pub pid: i32,
    pub uid: u32,
    pub oomadj: i32,
    pub ptype: ProcType,
}

/// LMK_PROCREMOVE payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcRemove {
    pub pid: i32,
}

/// LMK_GETKILLCNT request payload: the oom score range to count kills in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetKillCount {
    pub min_oomadj: i32,
    pub max_oomadj: i32,
}

/// LMK_GETKILLCNT reply payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GetKillCountReply {
    pub count: i32,
}

/// Types of asynchronous events sent from lmkd to its clients.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AsyncEventType {
    Kill = 0,
    Stat = 1,
}

impl TryFrom<i32> for AsyncEventType {
    type Error = PacketError;

    fn try_from(raw: i32) -> Result<Self> {
        match raw {
            0 => Ok(AsyncEventType::Kill),
            1 => Ok(AsyncEventType::Stat),
            other => Err(PacketError::UnknownEventType(other)),
        }
    }
}

/// LMK_SUBSCRIBE payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subscribe {
    pub evt_type: AsyncEventType,
}

/// LMK_PROCKILL unsolicited payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcKill {
    pub pid: i32,
    pub uid: u32,
}

/// LMK_UPDATE_PROPS reply payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdatePropsReply {
    pub result: i32,
}

/// LMK_BOOT_COMPLETED reply payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BootCompletedReply {
    pub result: i32,
}

/// Up to [`MAX_TARGETS`] target entries, stored inline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(into = "Vec<LmkTarget>", try_from = "Vec<LmkTarget>")
)]
pub struct TargetList {
    entries: [LmkTarget; MAX_TARGETS],
    len: usize,
}

impl TargetList {
    /// Copy entries from a slice, failing if there are more than [`MAX_TARGETS`].
    pub fn from_slice(targets: &[LmkTarget]) -> Result<Self> {
        if targets.len() > MAX_TARGETS {
            return Err(PacketError::CapacityExceeded {
                needed: targets.len() * 2 + 1,
                capacity: MAX_TARGETS * 2 + 1,
            });
        }
        let mut list = Self::default();
        list.entries[..targets.len()].copy_from_slice(targets);
        list.len = targets.len();
        Ok(list)
    }

    pub fn as_slice(&self) -> &[LmkTarget] {
        &self.entries[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LmkTarget> {
        self.as_slice().iter()
    }

    pub(crate) fn push(&mut self, target: LmkTarget) {
        self.entries[self.len] = target;
        self.len += 1;
    }
}

impl From<TargetList> for Vec<LmkTarget> {
    fn from(list: TargetList) -> Self {
        list.as_slice().to_vec()
    }
}

impl TryFrom<Vec<LmkTarget>> for TargetList {
    type Error = PacketError;

    fn try_from(targets: Vec<LmkTarget>) -> Result<Self> {
        Self::from_slice(&targets)
    }
}

/// LMK_PROCS_PRIO payload: one to [`PROCS_PRIO_MAX_RECORD_COUNT`] records, stored inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(into = "Vec<ProcPrio>", try_from = "Vec<ProcPrio>")
)]
pub struct ProcsPrio {
    procs: [ProcPrio; PROCS_PRIO_MAX_RECORD_COUNT],
    len: usize,
}

impl ProcsPrio {
    /// Copy records from a slice.
    ///
    /// An empty slice has no wire form and fails with
    /// [`PacketError::InvalidFieldCount`]; more records than a packet holds
    /// fail with [`PacketError::CapacityExceeded`].
    pub fn from_slice(procs: &[ProcPrio]) -> Result<Self> {
        if procs.is_empty() {
            return Err(PacketError::InvalidFieldCount {
                command: LmkCommand::ProcsPrio,
                field_count: 0,
            });
        }
        if procs.len() > PROCS_PRIO_MAX_RECORD_COUNT {
            return Err(PacketError::CapacityExceeded {
                needed: procs.len() * PROCPRIO_FIELD_COUNT + 1,
                capacity: CTRL_PACKET_MAX_WORDS,
            });
        }
        let mut list = Self::empty();
        list.procs[..procs.len()].copy_from_slice(procs);
        list.len = procs.len();
        Ok(list)
    }

    pub fn as_slice(&self) -> &[ProcPrio] {
        &self.procs[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcPrio> {
        self.as_slice().iter()
    }

    /// Start an empty list for decoding; callers push at least one record.
    pub(crate) fn empty() -> Self {
        Self {
            procs: [ProcPrio::default(); PROCS_PRIO_MAX_RECORD_COUNT],
            len: 0,
        }
    }

    pub(crate) fn push(&mut self, proc_prio: ProcPrio) {
        self.procs[self.len] = proc_prio;
        self.len += 1;
    }
}

impl From<ProcsPrio> for Vec<ProcPrio> {
    fn from(list: ProcsPrio) -> Self {
        list.as_slice().to_vec()
    }
}

impl TryFrom<Vec<ProcPrio>> for ProcsPrio {
    type Error = PacketError;

    fn try_from(procs: Vec<ProcPrio>) -> Result<Self> {
        Self::from_slice(&procs)
    }
}
