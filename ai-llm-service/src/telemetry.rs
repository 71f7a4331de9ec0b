use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Log targets owned by this workspace.
pub const WORKSPACE_TARGETS: [&str; 5] = [
    "ai_llm_service",
    "rag_store",
    "ticket_agent",
    "api",
    "ticket_search",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Where formatted events are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogSink {
    Stdout,
    /// Keeps stdout free for a line-oriented protocol.
    Stderr,
}

/// Builds a level directive for one workspace target, e.g. `rag_store=debug`.
pub fn level_directive(target: &str, level: Level) -> Option<Directive> {
    format!("{target}={}", level.as_str().to_lowercase())
        .parse()
        .ok()
}

/// EnvFilter from `RUST_LOG` or `default`, with `level` applied to every
/// workspace target.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    if std::env::var_os("RUST_LOG").is_some() {
        return base;
    }
    WORKSPACE_TARGETS
        .iter()
        .filter_map(|t| level_directive(t, level))
        .fold(base, |f, d| f.add_directive(d))
}

/// Installs the global subscriber.
///
/// - RFC3339 UTC timestamps
/// - compact single-line format with target and `file:line`
/// - span close events for instrumented calls
/// - ANSI colors only when the sink is a terminal
pub fn init(filter: EnvFilter, sink: LogSink) -> Result<(), TryInitError> {
    let (writer, use_ansi) = match sink {
        LogSink::Stdout => (BoxMakeWriter::new(io::stdout), io::stdout().is_terminal()),
        LogSink::Stderr => (BoxMakeWriter::new(io::stderr), io::stderr().is_terminal()),
    };

    let format = fmt::format()
        .compact()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_source_location(true);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(format);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
}
