//! Console logger for the replay tool.
//!
//! Log lines go to stderr so that stdout carries only output frames. Each entry has the
//! level, the time since the logger was installed, the target and the message:
//!
//! ```text
//! INFO [1s 230ms] hubshot_assist::cargo - Switching from three-cargo to all-cargo mode
//! ```

use std::{
    io::Write,
    sync::OnceLock,
    time::{Duration, Instant},
};

use humantime::{FormattedDuration, format_duration};
use log::{LevelFilter, Metadata, Record, SetLoggerError};

struct ReplayLogger {
    start: Instant,
}

impl ReplayLogger {
    /// Time since the logger was installed, truncated to whole milliseconds.
    fn uptime(&self) -> FormattedDuration {
        let elapsed = self.start.elapsed();
        format_duration(Duration::from_millis(elapsed.as_millis() as u64))
    }
}

impl log::Log for ReplayLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let mut stderr = std::io::stderr().lock();
            _ = writeln!(
                stderr,
                "{} [{}] {} - {}",
                record.level(),
                self.uptime(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<ReplayLogger> = OnceLock::new();

/// Installs the console logger, recording messages at `level` and above.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger has already been set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| ReplayLogger {
        start: Instant::now(),
    });
    log::set_logger(logger).map(|()| log::set_max_level(level))
}
