use std::fs;

use lmkdprims_packet::{LmkdMessage, PacketConfig, ReceivedPacket, Role, Validation};
use tracing::debug;

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, packet_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_message, OutputFormat, PacketOutput};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = resolve_bytes(&args)?;
    let received =
        ReceivedPacket::from_wire(&bytes).map_err(|err| packet_error("decode failed", err))?;

    let role = Role::from(args.role);
    let config = PacketConfig {
        validation: if args.lenient {
            Validation::Lenient
        } else {
            Validation::Strict
        },
    };
    debug!(len = received.wire_len(), %role, ?config, "decoding packet");

    let message = LmkdMessage::decode_received(&received, role, &config)
        .map_err(|err| packet_error("decode failed", err))?;

    print_message(&PacketOutput::new(&received), role, &message, format);
    Ok(SUCCESS)
}

fn resolve_bytes(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    match &args.hex {
        Some(input) => parse_hex(input),
        None => Err(CliError::new(USAGE, "packet hex or --file is required")),
    }
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: String = input
        .trim()
        .trim_start_matches("0x")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    hex::decode(&digits).map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex: {err}")))
}
