// Startup module - banner and backend summary
//
// Printed before the TUI takes over the screen (or ahead of the headless
// report), then echoed into the activity log so it stays visible in the TUI.

use crate::config::{Config, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
}

/// One line of the startup checklist
pub struct ModuleStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub description: &'static str,
}

fn module_status(config: &Config) -> Vec<ModuleStatus> {
    vec![
        ModuleStatus {
            name: "flocks",
            enabled: true,
            description: "Bird lot registry",
        },
        ModuleStatus {
            name: "feed",
            enabled: true,
            description: "Inventory and consumption",
        },
        ModuleStatus {
            name: "sales",
            enabled: true,
            description: "Local sales ledger",
        },
        ModuleStatus {
            name: "tui",
            enabled: config.enable_tui,
            description: "Terminal interface",
        },
        ModuleStatus {
            name: "file-log",
            enabled: config.logging.file_enabled,
            description: "JSON log files",
        },
    ]
}

/// Where requests go, as shown to the user
fn backend_label(config: &Config) -> String {
    if config.demo_mode {
        "in-memory demo backend".to_string()
    } else {
        config.api_url.clone()
    }
}

/// Print the startup banner to stderr (stdout is reserved for the report)
pub fn print_startup(config: &Config) {
    use colors::*;

    eprintln!();
    eprintln!("  {BOLD}{CYAN}avicola{RESET} {DIM}v{VERSION}{RESET}");
    eprintln!("  {DIM}Poultry farm records{RESET}");
    eprintln!();

    if let Some(path) = Config::config_path() {
        if path.exists() {
            eprintln!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            eprintln!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    eprintln!();

    for module in module_status(config) {
        let (icon, style) = if module.enabled {
            (format!("{GREEN}✓{RESET}"), "")
        } else {
            (format!("{DIM}○{RESET}"), DIM)
        };
        eprintln!(
            "    {icon} {style}{:<10}{RESET} {DIM}{}{RESET}",
            module.name, module.description
        );
    }
    eprintln!();

    eprintln!("  {CYAN}▸{RESET} Backend {BOLD}{}{RESET}", backend_label(config));
    if config.demo_mode {
        eprintln!("  {YELLOW}▸{RESET} {YELLOW}Demo mode active{RESET} {DIM}(nothing is sent){RESET}");
    }
    eprintln!();
}

/// Same information, for the activity panel
pub fn log_startup(config: &Config) {
    tracing::info!("avicola v{}", VERSION);
    for module in module_status(config) {
        let icon = if module.enabled { "✓" } else { "○" };
        tracing::debug!("  {} {} - {}", icon, module.name, module.description);
    }
    tracing::info!(
        backend = %backend_label(config),
        timeout_secs = config.request_timeout_secs,
        "Backend configured"
    );
    if config.demo_mode {
        tracing::info!("Demo mode active (in-memory backend)");
    }
}
