use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::fs;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging options for the embedded UI host process.
///
/// Thread ids are always recorded: the whole point of the log is being able
/// to tell the engine thread from the UI thread when a run misbehaves.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Directory for rotated log files (e.g., "logs")
    pub log_dir: Utf8PathBuf,

    /// Prefix for log files (e.g., "embedui")
    pub log_prefix: String,

    /// Use debug level instead of info
    pub debug_mode: bool,

    /// Also log to the console with ANSI colors
    pub console_output: bool,
}

impl LogOptions {
    pub fn new(log_dir: impl Into<Utf8PathBuf>, log_prefix: impl Into<String>) -> Self {
        Self {
            log_dir: log_dir.into(),
            log_prefix: log_prefix.into(),
            debug_mode: false,
            console_output: false,
        }
    }

    pub fn with_debug(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    pub fn with_console(mut self, console_output: bool) -> Self {
        self.console_output = console_output;
        self
    }
}

/// Setup logging with a daily-rotating file appender and optional console
/// output.
///
/// # Returns
/// A guard that must be held for the duration of the program to keep the
/// non-blocking file writer flushing.
pub fn setup_logging(options: &LogOptions) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    if !options.log_dir.exists() {
        fs::create_dir_all(&options.log_dir)
            .with_context(|| format!("Failed to create log directory: {}", options.log_dir))?;
    }

    let file_appender = rolling::daily(&options.log_dir, &options.log_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = if options.debug_mode {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true);

    if options.console_output {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_thread_names(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    }

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}",
        options.log_dir,
        options.log_prefix,
        options.debug_mode,
        options.console_output
    );

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_options_builder() {
        let options = LogOptions::new("logs", "embedui")
            .with_debug(true)
            .with_console(true);

        assert_eq!(options.log_dir, Utf8PathBuf::from("logs"));
        assert!(options.debug_mode);
        assert!(options.console_output);
    }

    #[test]
    #[allow(unused_variables)]
    fn test_setup_logging_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = Utf8PathBuf::try_from(temp_dir.path().join("logs")).unwrap();

        // Setup can fail if another test already installed the global
        // subscriber, but the directory must exist either way.
        let options = LogOptions::new(log_dir.clone(), "test");
        let result = setup_logging(&options);

        assert!(log_dir.exists());
    }
}
