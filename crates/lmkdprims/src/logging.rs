use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

/// Codec events (`trace!` per decoded message, `debug!` per packet read or
/// written) are emitted under this target.
const CODEC_TARGET: &str = "lmkdprims_packet";

/// Log line format on stderr.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Per-target filter: `level` everywhere, and every codec event when
/// `trace_codec` is set regardless of `level`.
fn log_filter(level: LogLevel, trace_codec: bool) -> Targets {
    let codec_level = if trace_codec {
        LevelFilter::TRACE
    } else {
        LevelFilter::from(level)
    };
    Targets::new()
        .with_default(LevelFilter::from(level))
        .with_target(CODEC_TARGET, codec_level)
}

/// Install the stderr subscriber. Stdout stays reserved for packet output.
pub fn init_logging(format: LogFormat, level: LogLevel, trace_codec: bool) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(trace_codec);
    let registry = tracing_subscriber::registry().with(log_filter(level, trace_codec));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = match format {
        LogFormat::Text => registry.with(layer).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };
}
