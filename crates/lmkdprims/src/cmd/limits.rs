use lmkdprims_packet::{
    LmkCommand, BUF_MAX, CTRL_PACKET_MAX_SIZE, CTRL_PACKET_MAX_WORDS, MAX_TARGETS,
    PROCPRIO_FIELD_COUNT, PROCS_PRIO_MAX_RECORD_COUNT,
};
use serde::Serialize;

use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct CommandInfo {
    id: i32,
    name: &'static str,
}

#[derive(Serialize)]
struct LimitsOutput {
    max_targets: usize,
    packet_max_words: usize,
    packet_max_size: usize,
    procprio_field_count: usize,
    procs_prio_max_records: usize,
    buf_max: usize,
    commands: Vec<CommandInfo>,
}

pub fn run(format: OutputFormat) -> CliResult<i32> {
    let out = LimitsOutput {
        max_targets: MAX_TARGETS,
        packet_max_words: CTRL_PACKET_MAX_WORDS,
        packet_max_size: CTRL_PACKET_MAX_SIZE,
        procprio_field_count: PROCPRIO_FIELD_COUNT,
        procs_prio_max_records: PROCS_PRIO_MAX_RECORD_COUNT,
        buf_max: BUF_MAX,
        commands: LmkCommand::ALL
            .iter()
            .map(|cmd| CommandInfo {
                id: cmd.as_raw(),
                name: cmd.name(),
            })
            .collect(),
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty | OutputFormat::Raw => {
            println!("Protocol limits:");
            println!("  Max targets:          {}", out.max_targets);
            println!(
                "  Packet capacity:      {} words / {} bytes",
                out.packet_max_words, out.packet_max_size
            );
            println!("  PROCPRIO fields:      {}", out.procprio_field_count);
            println!("  PROCS_PRIO records:   {}", out.procs_prio_max_records);
            println!("  Work buffer:          {} bytes", out.buf_max);
            println!("Commands:");
            for cmd in &out.commands {
                println!("  {:>2}  {}", cmd.id, cmd.name);
            }
        }
    }

    Ok(SUCCESS)
}
