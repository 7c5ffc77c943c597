//! `[logging]` section: filter level and the optional JSON log file

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{self, RollingFileAppender};

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// How often the log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// One file, never rolled
    Never,
}

impl From<String> for LogRotation {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl LogRotation {
    /// Unknown values fall back to daily
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" | "none" => Self::Never,
            _ => Self::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }

    pub fn appender(&self, dir: &Path, prefix: &str) -> RollingFileAppender {
        match self {
            Self::Hourly => rolling::hourly(dir, prefix),
            Self::Daily => rolling::daily(dir, prefix),
            Self::Never => rolling::never(dir, prefix),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error
    pub level: String,
    /// Also write JSON lines to `file_dir`
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// "avicola" gives files like "avicola.2025-01-15"
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "avicola".to_string(),
        }
    }
}

/// `[logging]` as written in the config file; every key optional
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<PathBuf>,
    pub file_rotation: Option<LogRotation>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Fill gaps in the file section from the defaults. An unknown level
    /// becomes `info`.
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let FileLogging {
            level,
            file_enabled,
            file_dir,
            file_rotation,
            file_prefix,
        } = file.unwrap_or_default();
        let defaults = Self::default();

        let level = level
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| LEVELS.contains(&l.as_str()))
            .unwrap_or(defaults.level);

        Self {
            level,
            file_enabled: file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file_dir.unwrap_or(defaults.file_dir),
            file_rotation: file_rotation.unwrap_or(defaults.file_rotation),
            file_prefix: file_prefix
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(defaults.file_prefix),
        }
    }

    /// EnvFilter directive used when RUST_LOG is unset
    pub fn filter_directive(&self) -> String {
        format!("avicola={}", self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_parse_is_lenient() {
        assert_eq!(LogRotation::parse("Hourly"), LogRotation::Hourly);
        assert_eq!(LogRotation::parse("none"), LogRotation::Never);
        assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let config = LoggingConfig::from_file(Some(FileLogging {
            level: Some("LOUD".into()),
            ..Default::default()
        }));
        assert_eq!(config.level, "info");
        assert_eq!(config.filter_directive(), "avicola=info");

        let config = LoggingConfig::from_file(Some(FileLogging {
            level: Some(" Debug ".into()),
            file_rotation: Some(LogRotation::Never),
            ..Default::default()
        }));
        assert_eq!(config.level, "debug");
        assert_eq!(config.file_rotation, LogRotation::Never);
    }
}
