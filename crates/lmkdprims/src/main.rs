mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "lmkdctl", version, about = "lmkd control packet tool")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Log every codec event (packet reads, writes and decodes) at trace level.
    #[arg(long, env = "LMKDCTL_TRACE_CODEC", global = true)]
    trace_codec: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level, cli.trace_codec);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::debug!(code = err.code, "command failed");
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{EncodeKind, RoleArg};

    #[test]
    fn parses_encode_target() {
        let cli = Cli::try_parse_from([
            "lmkdctl",
            "encode",
            "target",
            "--entry",
            "18432:0",
            "--entry",
            "23040:100",
        ])
        .expect("target args should parse");

        match cli.command {
            Command::Encode(args) => match args.packet {
                EncodeKind::Target { entries } => assert_eq!(entries.len(), 2),
                other => panic!("unexpected packet kind: {other:?}"),
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_negative_oomadj() {
        let cli = Cli::try_parse_from([
            "lmkdctl", "encode", "procprio", "--pid", "1", "--uid", "1000", "--oomadj", "-900",
        ])
        .expect("negative oomadj should parse");

        assert!(matches!(
            cli.command,
            Command::Encode(args) if matches!(args.packet, EncodeKind::Procprio { oomadj: -900, .. })
        ));
    }

    #[test]
    fn parses_decode_with_role() {
        let cli = Cli::try_parse_from([
            "lmkdctl", "--format", "json", "decode", "0000000400000003", "--role", "client",
        ])
        .expect("decode args should parse");

        match cli.command {
            Command::Decode(args) => {
                assert!(matches!(args.role, RoleArg::Client));
                assert_eq!(args.hex.as_deref(), Some("0000000400000003"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_decode_inputs() {
        let err = Cli::try_parse_from([
            "lmkdctl",
            "decode",
            "00000003",
            "--file",
            "/tmp/packet.bin",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn requires_target_entries() {
        let err = Cli::try_parse_from(["lmkdctl", "encode", "target"])
            .expect_err("target without entries should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
