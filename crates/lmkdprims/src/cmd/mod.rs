use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use lmkdprims_packet::{AsyncEventType, LmkTarget, ProcPrio, ProcType, Role};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod limits;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a control packet from arguments.
    Encode(EncodeArgs),
    /// Decode a captured control packet.
    Decode(DecodeArgs),
    /// Print protocol limits.
    Limits,
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Limits => limits::run(format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(subcommand)]
    pub packet: EncodeKind,
}

#[derive(Subcommand, Debug)]
pub enum EncodeKind {
    /// LMK_TARGET: minfree thresholds and their oom scores.
    Target {
        /// Entry as MINFREE:SCORE (repeatable, up to 6).
        #[arg(long = "entry", value_parser = parse_target, required = true)]
        entries: Vec<LmkTarget>,
    },
    /// LMK_PROCPRIO: register a process.
    Procprio {
        #[arg(long, allow_hyphen_values = true)]
        pid: i32,
        #[arg(long)]
        uid: u32,
        #[arg(long, allow_hyphen_values = true)]
        oomadj: i32,
        #[arg(long, value_enum, default_value = "app")]
        ptype: ProcTypeArg,
    },
    /// LMK_PROCS_PRIO: register several processes.
    ProcsPrio {
        /// Record as PID:UID:OOMADJ[:app|service] (repeatable, up to 3).
        #[arg(long = "proc", value_parser = parse_proc, required = true)]
        procs: Vec<ProcPrio>,
    },
    /// LMK_PROCREMOVE: unregister a process.
    Procremove {
        #[arg(long, allow_hyphen_values = true)]
        pid: i32,
    },
    /// LMK_PROCPURGE: unregister all processes.
    Procpurge,
    /// LMK_GETKILLCNT request.
    Getkillcnt {
        #[arg(long, allow_hyphen_values = true)]
        min: i32,
        #[arg(long, allow_hyphen_values = true)]
        max: i32,
    },
    /// LMK_GETKILLCNT reply.
    GetkillcntReply {
        #[arg(long, allow_hyphen_values = true)]
        count: i32,
    },
    /// LMK_SUBSCRIBE: subscribe to asynchronous events.
    Subscribe {
        #[arg(long, value_enum)]
        event: EventArg,
    },
    /// LMK_PROCKILL unsolicited event.
    Prockill {
        #[arg(long, allow_hyphen_values = true)]
        pid: i32,
        #[arg(long)]
        uid: u32,
    },
    /// LMK_UPDATE_PROPS request.
    UpdateProps,
    /// LMK_UPDATE_PROPS reply.
    UpdatePropsReply {
        #[arg(long, allow_hyphen_values = true)]
        result: i32,
    },
    /// LMK_STAT_KILL_OCCURRED notification header.
    StatKillOccurred,
    /// LMK_START_MONITORING.
    StartMonitoring,
    /// LMK_BOOT_COMPLETED notification.
    BootCompleted,
    /// LMK_BOOT_COMPLETED reply.
    BootCompletedReply {
        #[arg(long, allow_hyphen_values = true)]
        result: i32,
    },
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Packet bytes as hex (whitespace ignored).
    #[arg(conflicts_with = "file", required_unless_present = "file")]
    pub hex: Option<String>,
    /// Read raw packet bytes from a file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Side of the connection that received the packet.
    #[arg(long, value_enum, default_value = "server")]
    pub role: RoleArg,
    /// Only check field counts where lmkd itself does.
    #[arg(long)]
    pub lenient: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ProcTypeArg {
    App,
    Service,
}

impl From<ProcTypeArg> for ProcType {
    fn from(arg: ProcTypeArg) -> Self {
        match arg {
            ProcTypeArg::App => ProcType::App,
            ProcTypeArg::Service => ProcType::Service,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum EventArg {
    Kill,
    Stat,
}

impl From<EventArg> for AsyncEventType {
    fn from(arg: EventArg) -> Self {
        match arg {
            EventArg::Kill => AsyncEventType::Kill,
            EventArg::Stat => AsyncEventType::Stat,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum RoleArg {
    Server,
    Client,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Server => Role::Server,
            RoleArg::Client => Role::Client,
        }
    }
}

fn parse_target(input: &str) -> Result<LmkTarget, String> {
    let (minfree, score) = input
        .split_once(':')
        .ok_or_else(|| format!("expected MINFREE:SCORE, got {input}"))?;
    Ok(LmkTarget::new(
        parse_int(minfree, "minfree")?,
        parse_int(score, "score")?,
    ))
}

fn parse_proc(input: &str) -> Result<ProcPrio, String> {
    let parts: Vec<&str> = input.split(':').collect();
    let (pid, uid, oomadj, ptype) = match parts.as_slice() {
        [pid, uid, oomadj] => (pid, uid, oomadj, ProcType::App),
        [pid, uid, oomadj, ptype] => {
            let ptype = ProcTypeArg::from_str(ptype, true)
                .map_err(|_| format!("unknown process type: {ptype}"))?;
            (pid, uid, oomadj, ProcType::from(ptype))
        }
        _ => return Err(format!("expected PID:UID:OOMADJ[:TYPE], got {input}")),
    };
    Ok(ProcPrio {
        pid: parse_int(pid, "pid")?,
        uid: uid
            .trim()
            .parse()
            .map_err(|_| format!("invalid uid: {uid}"))?,
        oomadj: parse_int(oomadj, "oomadj")?,
        ptype,
    })
}

fn parse_int(value: &str, name: &str) -> Result<i32, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("invalid {name}: {value}"))
}
