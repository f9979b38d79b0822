//! Per-command packet encoders (`set_*`) and decoders (`get_*`).
//!
//! Encoders write the command word and payload and return the number of
//! meaningful bytes, which is exactly what must be sent. Decoders read a
//! payload back; apart from the field counts they are given, they trust the
//! caller to pass a packet of the matching command. [`crate::LmkdMessage`]
//! does that dispatch with validation.

use crate::command::LmkCommand;
use crate::error::{PacketError, Result};
use crate::packet::{
    CtrlPacket, WordCursor, MAX_TARGETS, PROCPRIO_FIELD_COUNT, PROCS_PRIO_MAX_RECORD_COUNT,
};
use crate::records::{
    AsyncEventType, BootCompletedReply, GetKillCount, GetKillCountReply, LmkTarget, ProcKill,
    ProcPrio, ProcRemove, ProcType, ProcsPrio, Subscribe, TargetList, UpdatePropsReply,
};

impl CtrlPacket {
    /// Prepare an LMK_TARGET packet.
    ///
    /// Fails with [`PacketError::CapacityExceeded`] for more than
    /// [`MAX_TARGETS`] entries.
    pub fn set_target(&mut self, targets: &[LmkTarget]) -> Result<usize> {
        let mut cursor = WordCursor::with_payload(self, LmkCommand::Target, targets.len() * 2)?;
        for target in targets {
            cursor.put(target.minfree);
            cursor.put(target.oom_adj_score);
        }
        Ok(cursor.finish())
    }

    /// Read the `target_idx`-th LMK_TARGET entry.
    ///
    /// # Panics
    ///
    /// Panics if `target_idx >= MAX_TARGETS`.
    pub fn get_target(&self, target_idx: usize) -> LmkTarget {
        LmkTarget {
            minfree: self.word(target_idx * 2 + 1),
            oom_adj_score: self.word(target_idx * 2 + 2),
        }
    }

    /// Read every LMK_TARGET entry given the received field count.
    pub fn get_targets(&self, field_count: usize) -> Result<TargetList> {
        if field_count % 2 != 0 || field_count / 2 > MAX_TARGETS {
            return Err(PacketError::InvalidFieldCount {
                command: LmkCommand::Target,
                field_count,
            });
        }
        let mut list = TargetList::default();
        for idx in 0..field_count / 2 {
            list.push(self.get_target(idx));
        }
        Ok(list)
    }

    /// Prepare an LMK_PROCPRIO packet.
    pub fn set_procprio(&mut self, params: &ProcPrio) -> usize {
        let mut cursor = WordCursor::new(self, LmkCommand::ProcPrio);
        put_procprio(&mut cursor, params);
        cursor.finish()
    }

    /// Read an LMK_PROCPRIO payload.
    ///
    /// Senders predating the process type send three fields; the type is then
    /// [`ProcType::App`].
    pub fn get_procprio(&self, field_count: usize) -> Result<ProcPrio> {
        let ptype = if field_count > 3 {
            ProcType::try_from(self.word(4))?
        } else {
            ProcType::App
        };
        Ok(ProcPrio {
            pid: self.word(1),
            uid: self.word(2) as u32,
            oomadj: self.word(3),
            ptype,
        })
    }

    /// Prepare an LMK_PROCREMOVE packet.
    pub fn set_procremove(&mut self, params: &ProcRemove) -> usize {
        let mut cursor = WordCursor::new(self, LmkCommand::ProcRemove);
        cursor.put(params.pid);
        cursor.finish()
    }

    /// Read an LMK_PROCREMOVE payload.
    pub fn get_procremove(&self) -> ProcRemove {
        ProcRemove { pid: self.word(1) }
    }

    /// Prepare an LMK_PROCPURGE packet.
    pub fn set_procpurge(&mut self) -> usize {
        WordCursor::new(self, LmkCommand::ProcPurge).finish()
    }

    /// Prepare an LMK_GETKILLCNT request packet.
    pub fn set_getkillcnt(&mut self, params: &GetKillCount) -> usize {
        let mut cursor = WordCursor::new(self, LmkCommand::GetKillCnt);
        cursor.put(params.min_oomadj);
        cursor.put(params.max_oomadj);
        cursor.finish()
    }

    /// Read an LMK_GETKILLCNT request payload.
    pub fn get_getkillcnt(&self) -> GetKillCount {
        GetKillCount {
            min_oomadj: self.word(1),
            max_oomadj: self.word(2),
        }
    }

    /// Prepare an LMK_GETKILLCNT reply packet.
    pub fn set_getkillcnt_reply(&mut self, kill_cnt: i32) -> usize {
        let mut cursor = WordCursor::new(self, LmkCommand::GetKillCnt);
        cursor.put(kill_cnt);
        cursor.finish()
    }

    /// Read an LMK_GETKILLCNT reply payload.
    pub fn get_getkillcnt_reply(&self) -> GetKillCountReply {
        GetKillCountReply {
            count: self.word(1),
        }
    }

    /// Prepare an LMK_SUBSCRIBE packet.
    pub fn set_subscribe(&mut self, evt_type: AsyncEventType) -> usize {
        let mut cursor = WordCursor::new(self, LmkCommand::Subscribe);
        cursor.put(evt_type as i32);
        cursor.finish()
    }

    /// Read an LMK_SUBSCRIBE payload.
    pub fn get_subscribe(&self) -> Result<Subscribe> {
        Ok(Subscribe {
            evt_type: AsyncEventType::try_from(self.word(1))?,
        })
    }

    /// Prepare an unsolicited LMK_PROCKILL packet.
    pub fn set_prockill(&mut self, pid: i32, uid: u32) -> usize {
        let mut cursor = WordCursor::new(self, LmkCommand::ProcKill);
        cursor.put(pid);
        cursor.put(uid as i32);
        cursor.finish()
    }

    /// Read an LMK_PROCKILL payload.
    pub fn get_prockill(&self) -> ProcKill {
        ProcKill {
            pid: self.word(1),
            uid: self.word(2) as u32,
        }
    }

    /// Prepare an LMK_UPDATE_PROPS request packet.
    pub fn set_update_props(&mut self) -> usize {
        WordCursor::new(self, LmkCommand::UpdateProps).finish()
    }

    /// Prepare an LMK_UPDATE_PROPS reply packet.
    pub fn set_update_props_reply(&mut self, result: i32) -> usize {
        let mut cursor = WordCursor::new(self, LmkCommand::UpdateProps);
        cursor.put(result);
        cursor.finish()
    }

    /// Read an LMK_UPDATE_PROPS reply payload.
    pub fn get_update_props_reply(&self) -> UpdatePropsReply {
        UpdatePropsReply {
            result: self.word(1),
        }
    }

    /// Prepare an LMK_STAT_KILL_OCCURRED notification header.
    ///
    /// Kill statistics themselves travel in the larger statistics packet, not
    /// in a control packet.
    pub fn set_stat_kill_occurred(&mut self) -> usize {
        WordCursor::new(self, LmkCommand::StatKillOccurred).finish()
    }

    /// Prepare an LMK_START_MONITORING packet.
    pub fn set_start_monitoring(&mut self) -> usize {
        WordCursor::new(self, LmkCommand::StartMonitoring).finish()
    }

    /// Prepare an LMK_BOOT_COMPLETED notification packet.
    pub fn set_boot_completed(&mut self) -> usize {
        WordCursor::new(self, LmkCommand::BootCompleted).finish()
    }

    /// Prepare an LMK_BOOT_COMPLETED reply packet.
    pub fn set_boot_completed_reply(&mut self, result: i32) -> usize {
        let mut cursor = WordCursor::new(self, LmkCommand::BootCompleted);
        cursor.put(result);
        cursor.finish()
    }

    /// Read an LMK_BOOT_COMPLETED reply payload.
    pub fn get_boot_completed_reply(&self) -> BootCompletedReply {
        BootCompletedReply {
            result: self.word(1),
        }
    }

    /// Prepare an LMK_PROCS_PRIO packet.
    ///
    /// Fails with [`PacketError::InvalidFieldCount`] for an empty slice and
    /// with [`PacketError::CapacityExceeded`] for more than
    /// [`PROCS_PRIO_MAX_RECORD_COUNT`] records.
    pub fn set_procs_prio(&mut self, procs: &[ProcPrio]) -> Result<usize> {
        if procs.is_empty() {
            return Err(PacketError::InvalidFieldCount {
                command: LmkCommand::ProcsPrio,
                field_count: 0,
            });
        }
        let mut cursor = WordCursor::with_payload(
            self,
            LmkCommand::ProcsPrio,
            procs.len() * PROCPRIO_FIELD_COUNT,
        )?;
        for params in procs {
            put_procprio(&mut cursor, params);
        }
        Ok(cursor.finish())
    }

    /// Read an LMK_PROCS_PRIO payload.
    ///
    /// The field count must cover at least one record and be a whole number
    /// of records; otherwise [`PacketError::InvalidFieldCount`] is returned.
    pub fn get_procs_prio(&self, field_count: usize) -> Result<ProcsPrio> {
        let procs_count = field_count / PROCPRIO_FIELD_COUNT;
        if field_count < PROCPRIO_FIELD_COUNT
            || field_count % PROCPRIO_FIELD_COUNT != 0
            || procs_count > PROCS_PRIO_MAX_RECORD_COUNT
        {
            return Err(PacketError::InvalidFieldCount {
                command: LmkCommand::ProcsPrio,
                field_count,
            });
        }

        let mut procs = ProcsPrio::empty();
        // Word 0 is the command.
        let mut idx = 1;
        for _ in 0..procs_count {
            procs.push(ProcPrio {
                pid: self.word(idx),
                uid: self.word(idx + 1) as u32,
                oomadj: self.word(idx + 2),
                ptype: ProcType::try_from(self.word(idx + 3))?,
            });
            idx += PROCPRIO_FIELD_COUNT;
        }
        Ok(procs)
    }
}

fn put_procprio(cursor: &mut WordCursor<'_>, params: &ProcPrio) {
    cursor.put(params.pid);
    cursor.put(params.uid as i32);
    cursor.put(params.oomadj);
    cursor.put(params.ptype as i32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{CTRL_PACKET_MAX_SIZE, WORD_SIZE};

    fn service(pid: i32) -> ProcPrio {
        ProcPrio {
            pid,
            uid: 10_000 + pid as u32,
            oomadj: 900,
            ptype: ProcType::Service,
        }
    }

    #[test]
    fn target_scenario() {
        let mut packet = CtrlPacket::new();
        let len = packet
            .set_target(&[LmkTarget::new(18432, 0), LmkTarget::new(23040, 100)])
            .unwrap();

        assert_eq!(len, 20);
        let words: Vec<i32> = (0..5).map(|i| packet.word(i)).collect();
        assert_eq!(words, vec![0, 18432, 0, 23040, 100]);
        assert_eq!(packet.get_target(1), LmkTarget::new(23040, 100));
    }

    #[test]
    fn target_capacity_boundary() {
        let mut packet = CtrlPacket::new();
        let targets = [LmkTarget::new(1024, 0); MAX_TARGETS];
        assert_eq!(packet.set_target(&targets).unwrap(), 4 * 13);
        assert_eq!(packet.get_targets(12).unwrap().as_slice(), &targets);

        let too_many = [LmkTarget::new(1024, 0); MAX_TARGETS + 1];
        assert!(matches!(
            packet.set_target(&too_many),
            Err(PacketError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn empty_target_list() {
        let mut packet = CtrlPacket::new();
        assert_eq!(packet.set_target(&[]).unwrap(), WORD_SIZE);
        assert!(packet.get_targets(0).unwrap().is_empty());
    }

    #[test]
    fn targets_reject_odd_or_oversized_counts() {
        let packet = CtrlPacket::new();
        for field_count in [1, 3, 13, 14] {
            assert!(matches!(
                packet.get_targets(field_count),
                Err(PacketError::InvalidFieldCount {
                    command: LmkCommand::Target,
                    ..
                })
            ));
        }
    }

    #[test]
    fn procprio_scenario() {
        let mut packet = CtrlPacket::new();
        let params = ProcPrio {
            pid: 1234,
            uid: 10001,
            oomadj: 900,
            ptype: ProcType::Service,
        };

        assert_eq!(packet.set_procprio(&params), 20);
        assert_eq!(packet.get_procprio(4).unwrap(), params);
    }

    #[test]
    fn procprio_without_type_defaults_to_app() {
        let mut packet = CtrlPacket::new();
        packet.set_procprio(&service(77));
        // Garbage beyond the third field must not matter.
        packet.set_word(4, 0x7fff_ffff);

        let decoded = packet.get_procprio(3).unwrap();
        assert_eq!(decoded.ptype, ProcType::App);
        assert_eq!(decoded.pid, 77);
        assert_eq!(decoded.oomadj, 900);
    }

    #[test]
    fn procprio_unknown_type_is_rejected() {
        let mut packet = CtrlPacket::new();
        packet.set_procprio(&service(1));
        packet.set_word(4, 5);
        assert!(matches!(
            packet.get_procprio(4),
            Err(PacketError::UnknownProcType(5))
        ));
    }

    #[test]
    fn procs_prio_field_counts() {
        let mut packet = CtrlPacket::new();
        let procs = [service(1), service(2), service(3)];
        assert_eq!(packet.set_procs_prio(&procs).unwrap(), CTRL_PACKET_MAX_SIZE);

        for (field_count, records) in [(4, 1), (8, 2), (12, 3)] {
            let decoded = packet.get_procs_prio(field_count).unwrap();
            assert_eq!(decoded.len(), records);
            assert_eq!(decoded.as_slice(), &procs[..records]);
        }

        for field_count in [0, 3, 5, 16] {
            assert!(matches!(
                packet.get_procs_prio(field_count),
                Err(PacketError::InvalidFieldCount {
                    command: LmkCommand::ProcsPrio,
                    ..
                })
            ));
        }
    }

    #[test]
    fn procs_prio_without_records_is_rejected() {
        let mut packet = CtrlPacket::new();
        assert!(matches!(
            packet.set_procs_prio(&[]),
            Err(PacketError::InvalidFieldCount {
                command: LmkCommand::ProcsPrio,
                field_count: 0
            })
        ));
    }

    #[test]
    fn procs_prio_over_capacity() {
        let mut packet = CtrlPacket::new();
        let procs = [service(1); 4];
        assert!(matches!(
            packet.set_procs_prio(&procs),
            Err(PacketError::CapacityExceeded {
                needed: 17,
                capacity: 13
            })
        ));
    }

    #[test]
    fn fixed_shape_lengths() {
        let mut packet = CtrlPacket::new();
        assert_eq!(packet.set_procremove(&ProcRemove { pid: 5 }), 8);
        assert_eq!(packet.set_procpurge(), 4);
        assert_eq!(
            packet.set_getkillcnt(&GetKillCount {
                min_oomadj: 0,
                max_oomadj: 1000
            }),
            12
        );
        assert_eq!(packet.set_getkillcnt_reply(3), 8);
        assert_eq!(packet.set_subscribe(AsyncEventType::Kill), 8);
        assert_eq!(packet.set_prockill(1, 2), 12);
        assert_eq!(packet.set_update_props(), 4);
        assert_eq!(packet.set_update_props_reply(0), 8);
        assert_eq!(packet.set_stat_kill_occurred(), 4);
        assert_eq!(packet.set_start_monitoring(), 4);
        assert_eq!(packet.set_boot_completed(), 4);
        assert_eq!(packet.set_boot_completed_reply(-1), 8);
    }

    #[test]
    fn reply_payloads() {
        let mut packet = CtrlPacket::new();

        packet.set_getkillcnt_reply(42);
        assert_eq!(packet.command().unwrap(), LmkCommand::GetKillCnt);
        assert_eq!(packet.get_getkillcnt_reply().count, 42);

        packet.set_update_props_reply(-1);
        assert_eq!(packet.command().unwrap(), LmkCommand::UpdateProps);
        assert_eq!(packet.get_update_props_reply().result, -1);

        packet.set_boot_completed_reply(1);
        assert_eq!(packet.command().unwrap(), LmkCommand::BootCompleted);
        assert_eq!(packet.get_boot_completed_reply().result, 1);
    }

    #[test]
    fn boundary_ids_survive() {
        let mut packet = CtrlPacket::new();
        packet.set_prockill(i32::MAX, u32::MAX);
        assert_eq!(
            packet.get_prockill(),
            ProcKill {
                pid: i32::MAX,
                uid: u32::MAX
            }
        );
        assert_eq!(&packet.as_bytes()[8..12], &[0xFF; 4]);

        packet.set_getkillcnt(&GetKillCount {
            min_oomadj: -1000,
            max_oomadj: 1000,
        });
        assert_eq!(packet.get_getkillcnt().min_oomadj, -1000);
    }

    #[test]
    fn subscribe_event_types() {
        let mut packet = CtrlPacket::new();
        packet.set_subscribe(AsyncEventType::Stat);
        assert_eq!(packet.get_subscribe().unwrap().evt_type, AsyncEventType::Stat);

        packet.set_word(1, 2);
        assert!(matches!(
            packet.get_subscribe(),
            Err(PacketError::UnknownEventType(2))
        ));
    }
}
