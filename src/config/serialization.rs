//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize the persistable part of the config as a commented template
    pub fn to_toml(&self) -> String {
        format!(
            r#"# avicola configuration
#
# Environment variables override these values:
#   AVICOLA_API_URL, AVICOLA_TIMEOUT, AVICOLA_THEME
# Runtime flags (env only): AVICOLA_NO_TUI=1, AVICOLA_DEMO=1

# Farm backend base URL
api_url = "{api_url}"

# Request timeout in seconds (0 = none)
request_timeout_secs = {timeout}

# Theme: dark, light
theme = "{theme}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# JSON file logging (in addition to the activity panel or stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            api_url = escape(&self.api_url),
            timeout = self.request_timeout_secs,
            theme = escape(&self.theme),
            log_level = escape(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = escape(&self.logging.file_dir.display().to_string()),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = escape(&self.logging.file_prefix),
        )
    }
}

/// Escape a value for a TOML basic string
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
