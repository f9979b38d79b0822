use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use lmkdprims_packet::{LmkdMessage, ReceivedPacket, Role, WORD_SIZE};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// An encoded packet: command, meaningful length and wire bytes.
#[derive(Serialize)]
pub struct PacketOutput {
    pub command: &'static str,
    pub length: usize,
    pub field_count: usize,
    pub words: Vec<i32>,
    pub hex: String,
}

impl PacketOutput {
    pub fn new(received: &ReceivedPacket) -> Self {
        let bytes = received.as_bytes();
        Self {
            command: received
                .packet()
                .command()
                .map(|cmd| cmd.name())
                .unwrap_or("UNKNOWN"),
            length: received.wire_len(),
            field_count: received.field_count(),
            words: (0..received.wire_len() / WORD_SIZE)
                .map(|idx| received.packet().word(idx))
                .collect(),
            hex: hex::encode(bytes),
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    #[serde(flatten)]
    packet: &'a PacketOutput,
    role: String,
    message: &'a LmkdMessage,
}

pub fn print_packet(out: &PacketOutput, format: OutputFormat, raw: &[u8]) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "LENGTH", "FIELDS", "HEX"])
                .add_row(vec![
                    out.command.to_string(),
                    out.length.to_string(),
                    out.field_count.to_string(),
                    out.hex.clone(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "command={} len={} fields={} words={:?}",
                out.command, out.length, out.field_count, out.words
            );
        }
        OutputFormat::Raw => print_raw(raw),
    }
}

pub fn print_message(out: &PacketOutput, role: Role, message: &LmkdMessage, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                packet: out,
                role: role.to_string(),
                message,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "ROLE", "FIELDS", "MESSAGE"])
                .add_row(vec![
                    out.command.to_string(),
                    role.to_string(),
                    out.field_count.to_string(),
                    message_summary(message),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            println!("{} ({role}): {}", out.command, message_summary(message));
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn message_summary(message: &LmkdMessage) -> String {
    serde_json::to_string(message).unwrap_or_else(|_| format!("{message:?}"))
}
