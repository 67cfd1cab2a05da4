//! Log file setup
//!
//! env_logger is piped into the append-only log file. Each line carries a
//! local `YYYY-MM-DD HH:MM:SS` timestamp.

use chrono::{DateTime, Local};
use log::Level;
use std::fs;
use std::io::Write;
use std::path::Path;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render one log line
pub fn format_line(at: DateTime<Local>, level: Level, message: &str) -> String {
    let timestamp = at.format(TIMESTAMP_FORMAT);
    match level {
        Level::Info => format!("{} - {}", timestamp, message),
        other => format!("{} - [{}] {}", timestamp, other, message),
    }
}

/// Route `log` records into `log_file`.
///
/// `RUST_LOG` wins over `default_level`.
pub fn init(log_file: &Path, default_level: &str) -> std::io::Result<()> {
    let target = Box::new(fs::OpenOptions::new().create(true).append(true).open(log_file)?);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .format(|buf, record| {
            writeln!(buf, "{}", format_line(Local::now(), record.level(), &record.args().to_string()))
        })
        .init();

    log::debug!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_info_line_is_timestamp_then_message() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_line(at, Level::Info, "Docker installed"), "2024-03-09 07:05:01 - Docker installed");
    }

    #[test]
    fn test_other_levels_are_tagged() {
        let at = Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            format_line(at, Level::Warn, "probe failed"),
            "2024-12-31 23:59:59 - [WARN] probe failed"
        );
    }
}
