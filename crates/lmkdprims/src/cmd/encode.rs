use lmkdprims_packet::{
    BootCompletedReply, CtrlPacket, GetKillCount, GetKillCountReply, LmkdMessage, ProcKill,
    ProcPrio, ProcRemove, ProcsPrio, ReceivedPacket, Subscribe, TargetList, UpdatePropsReply,
};
use tracing::debug;

use crate::cmd::{EncodeArgs, EncodeKind};
use crate::exit::{packet_error, CliResult, SUCCESS};
use crate::output::{print_packet, OutputFormat, PacketOutput};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let message = build_message(args.packet)?;

    let mut packet = CtrlPacket::new();
    let len = message
        .encode(&mut packet)
        .map_err(|err| packet_error("encode failed", err))?;
    debug!(command = %message.command(), len, "encoded packet");

    let received =
        ReceivedPacket::from_packet(packet, len).map_err(|err| packet_error("encode failed", err))?;
    print_packet(&PacketOutput::new(&received), format, received.as_bytes());
    Ok(SUCCESS)
}

fn build_message(kind: EncodeKind) -> CliResult<LmkdMessage> {
    let message = match kind {
        EncodeKind::Target { entries } => LmkdMessage::Target(
            TargetList::from_slice(&entries)
                .map_err(|err| packet_error("too many targets", err))?,
        ),
        EncodeKind::Procprio {
            pid,
            uid,
            oomadj,
            ptype,
        } => LmkdMessage::ProcPrio(ProcPrio {
            pid,
            uid,
            oomadj,
            ptype: ptype.into(),
        }),
        EncodeKind::ProcsPrio { procs } => LmkdMessage::ProcsPrio(
            ProcsPrio::from_slice(&procs).map_err(|err| packet_error("too many records", err))?,
        ),
        EncodeKind::Procremove { pid } => LmkdMessage::ProcRemove(ProcRemove { pid }),
        EncodeKind::Procpurge => LmkdMessage::ProcPurge,
        EncodeKind::Getkillcnt { min, max } => LmkdMessage::GetKillCount(GetKillCount {
            min_oomadj: min,
            max_oomadj: max,
        }),
        EncodeKind::GetkillcntReply { count } => {
            LmkdMessage::GetKillCountReply(GetKillCountReply { count })
        }
        EncodeKind::Subscribe { event } => LmkdMessage::Subscribe(Subscribe {
            evt_type: event.into(),
        }),
        EncodeKind::Prockill { pid, uid } => LmkdMessage::ProcKill(ProcKill { pid, uid }),
        EncodeKind::UpdateProps => LmkdMessage::UpdateProps,
        EncodeKind::UpdatePropsReply { result } => {
            LmkdMessage::UpdatePropsReply(UpdatePropsReply { result })
        }
        EncodeKind::StatKillOccurred => LmkdMessage::StatKillOccurred,
        EncodeKind::StartMonitoring => LmkdMessage::StartMonitoring,
        EncodeKind::BootCompleted => LmkdMessage::BootCompleted,
        EncodeKind::BootCompletedReply { result } => {
            LmkdMessage::BootCompletedReply(BootCompletedReply { result })
        }
    };
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{EventArg, ProcTypeArg};
    use crate::exit::USAGE;
    use lmkdprims_packet::{AsyncEventType, LmkTarget, ProcType};

    #[test]
    fn builds_typed_messages() {
        let message = build_message(EncodeKind::Procprio {
            pid: 1234,
            uid: 10001,
            oomadj: 900,
            ptype: ProcTypeArg::Service,
        })
        .unwrap();
        assert_eq!(
            message,
            LmkdMessage::ProcPrio(ProcPrio {
                pid: 1234,
                uid: 10001,
                oomadj: 900,
                ptype: ProcType::Service,
            })
        );

        let message = build_message(EncodeKind::Subscribe {
            event: EventArg::Stat,
        })
        .unwrap();
        assert_eq!(
            message,
            LmkdMessage::Subscribe(Subscribe {
                evt_type: AsyncEventType::Stat
            })
        );
    }

    #[test]
    fn too_many_targets_is_usage_error() {
        let err = build_message(EncodeKind::Target {
            entries: vec![LmkTarget::new(1, 1); 7],
        })
        .unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn too_many_procs_is_usage_error() {
        let err = build_message(EncodeKind::ProcsPrio {
            procs: vec![ProcPrio::default(); 4],
        })
        .unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
