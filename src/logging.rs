//! Diagnostic line sinks for replication runs
//!
//! The engine never prints. Everything a user should see about a run (pattern
//! errors, skipped files, overwrite notices) is appended as a plain line to a
//! [`LogSink`] supplied by the host.

use log::Level;

/// Target used for records emitted by [`LogForwarder`].
pub const RUN_TARGET: &str = "confclone::run";

/// Destination for the diagnostic lines of one replication run.
pub trait LogSink {
    /// Append one line of diagnostic text.
    fn line(&mut self, line: &str);
}

/// Collects lines in memory, mostly useful in tests and for reports.
impl LogSink for Vec<String> {
    fn line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Discards every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl LogSink for NullLog {
    fn line(&mut self, _line: &str) {}
}

/// Forwards lines to the `log` facade at a fixed level.
#[derive(Debug, Clone, Copy)]
pub struct LogForwarder {
    level: Level,
}

impl LogForwarder {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for LogForwarder {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl LogSink for LogForwarder {
    fn line(&mut self, line: &str) {
        log::log!(target: RUN_TARGET, self.level, "{}", line);
    }
}

/// Install `env_logger` for the binary.
///
/// `level` is one of `error`, `warn`, `info`, `debug`, `trace` (case-insensitive).
/// An unknown level falls back to `info`. `RUST_LOG`, when set, takes
/// precedence so individual modules can still be tuned.
pub fn init(level: &str) {
    let filter = level
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info);

    let mut builder = env_logger::Builder::new();
    builder.filter_level(filter).format_target(false);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    // A second initialization (tests calling into the CLI) is harmless.
    let _ = builder.try_init();
}
