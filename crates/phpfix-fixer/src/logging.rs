//! Debug logging for fixer runs
//!
//! Records configuration, the fixers chosen for each file and every
//! rewrite they perform. Nothing is written until `init_logger` is called.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global logger instance
static LOGGER: Mutex<Option<FixerLogger>> = Mutex::new(None);

/// Logger for fixer runs
pub struct FixerLogger {
    file: File,
    path: PathBuf,
}

impl FixerLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self {
            file,
            path: log_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a log message
    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }

    /// Log a section header
    pub fn section(&mut self, title: &str) {
        let separator = "=".repeat(60);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }
}

/// Initialize the global logger
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        std::env::temp_dir().join(format!("phpfix-{}.log", timestamp))
    });

    let logger = FixerLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
}

/// Stop logging and close the log file
pub fn shutdown_logger() {
    if let Ok(mut guard) = LOGGER.lock() {
        *guard = None;
    }
}

/// Log a message to the global logger
pub fn log(message: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(message);
        }
    }
}

/// Log a section header
pub fn section(title: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.section(title);
        }
    }
}

/// Check if logging is enabled
pub fn is_enabled() -> bool {
    if let Ok(guard) = LOGGER.lock() {
        guard.is_some()
    } else {
        false
    }
}

/// Log configuration loading
pub fn log_config_load(path: &Path) {
    section("CONFIGURATION LOADING");
    log(&format!("Loading config from: {}", path.display()));
}

/// Log summary of a parsed configuration
pub fn log_config_summary(enabled_rules: usize, disabled_rules: usize, risky_allowed: bool) {
    section("CONFIGURATION SUMMARY");
    log(&format!("Enabled rules: {}", enabled_rules));
    log(&format!("Disabled rules: {}", disabled_rules));
    log(&format!("Risky allowed: {}", risky_allowed));
}

/// Log options applied to a fixer
pub fn log_fixer_configured(fixer: &str, options: &[String]) {
    log(&format!("[{}] configured: {}", fixer, options.join(", ")));
}

/// Log a fixer that was not run and why
pub fn log_fixer_skipped(fixer: &str, reason: &str) {
    log(&format!("[{}] skipped: {}", fixer, reason));
}

/// Log the outcome of one fixer run
pub fn log_fixer_result(fixer: &str, changed: bool) {
    if changed {
        log(&format!("[{}] changed the file", fixer));
    } else {
        log(&format!("[{}] no changes", fixer));
    }
}

/// Log a single rewrite performed by a fixer
pub fn log_rewrite(fixer: &str, from: &str, to: &str) {
    log(&format!("[{}] {} -> {}", fixer, from, to));
}
