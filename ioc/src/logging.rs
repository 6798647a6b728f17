//! Tools for logging
//!
//! The container reports registration, startup phases and failures through
//! [`tracing`]. This module installs a [`tracing_subscriber`] that prints those records.
//! Applications with their own subscriber don't need it.

use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering}
    }
};
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    filter::LevelFilter,
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

static CONFIGURED: AtomicBool = AtomicBool::new(false);

/// Represents a logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level of the records to print, unless `RUST_LOG` is set
    ///
    /// Default: `INFO`
    level: Level,

    /// Specifies whether console records are printed as JSON
    ///
    /// Default: `false`
    json: bool,

    /// Specifies whether records are printed to stdout
    ///
    /// Default: `true`
    output_console: bool,

    /// A file to append JSON records to
    ///
    /// Default: `None`
    output_file: Option<PathBuf>,

    /// Specifies whether records include the source file and line
    ///
    /// Default: `true`
    caller: bool,

    /// Specifies whether console records use the multi-line development format
    ///
    /// Default: `false`
    development: bool,
}

impl Default for LoggingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            output_console: true,
            output_file: None,
            caller: true,
            development: false,
        }
    }
}

impl LoggingConfig {
    /// Creates a default logging configuration
    ///
    /// Defaults:
    /// - level: `INFO`
    /// - json: `false`
    /// - output_console: `true`
    /// - output_file: `None`
    /// - caller: `true`
    /// - development: `false`
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for local debugging:
    /// `DEBUG` level in the development format
    pub fn debug() -> Self {
        Self::default()
            .with_level(Level::DEBUG)
            .with_development()
    }

    /// Sets the minimum level of the records to print
    ///
    /// Default: `INFO`
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Prints console records as JSON
    ///
    /// Default: `false`
    pub fn with_json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Disables the console output
    ///
    /// Default: the console output is enabled
    pub fn without_console(mut self) -> Self {
        self.output_console = false;
        self
    }

    /// Appends JSON records to a file, creating it and its directory if needed
    ///
    /// Default: `None`
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Omits the source file and line from records
    ///
    /// Default: records include them
    pub fn without_caller(mut self) -> Self {
        self.caller = false;
        self
    }

    /// Uses the multi-line development format for console records
    ///
    /// Default: `false`
    pub fn with_development(mut self) -> Self {
        self.development = true;
        self
    }

    /// Minimum level of the records to print
    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Returns the log file path, if any
    #[inline]
    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    fn console_layer(&self) -> BoxedLayer {
        let layer = fmt::layer()
            .with_writer(io::stdout)
            .with_file(self.caller)
            .with_line_number(self.caller);
        if self.json {
            layer.json().boxed()
        } else if self.development {
            layer.pretty().boxed()
        } else {
            layer.boxed()
        }
    }

    fn file_layer(&self, path: &Path) -> io::Result<BoxedLayer> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let layer = fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .with_file(self.caller)
            .with_line_number(self.caller);
        Ok(layer.boxed())
    }
}

/// Installs the global logging subscriber.
///
/// Only the first call per process has an effect, later calls return `Ok(())`
/// without changing anything. If another subscriber has already been installed
/// by the application, it is kept.
///
/// # Example
/// ```no_run
/// use ioc::logging::{configure_logging, LoggingConfig};
///
/// configure_logging(LoggingConfig::new()
///     .with_json()
///     .with_file("./logs/ioc.log"))?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn configure_logging(config: LoggingConfig) -> io::Result<()> {
    if CONFIGURED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let layers = match build_layers(&config) {
        Ok(layers) => layers,
        Err(err) => {
            CONFIGURED.store(false, Ordering::SeqCst);
            return Err(err);
        }
    };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.level).into())
        .from_env_lossy();

    if tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .is_ok() {
        tracing::info!(
            level = %config.level,
            json = config.json,
            console = config.output_console,
            file = config.output_file.is_some(),
            development = config.development,
            "logging configured"
        );
    }
    Ok(())
}

/// Installs the global logging subscriber with [`LoggingConfig::debug`]
#[inline]
pub fn enable_debug_logging() -> io::Result<()> {
    configure_logging(LoggingConfig::debug())
}

fn build_layers(config: &LoggingConfig) -> io::Result<Vec<BoxedLayer>> {
    let mut layers = Vec::with_capacity(2);
    if config.output_console {
        layers.push(config.console_layer());
    }
    if let Some(path) = &config.output_file {
        layers.push(config.file_layer(path)?);
    }
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_creates_default_config() {
        let config = LoggingConfig::new();

        assert_eq!(config.level(), Level::INFO);
        assert!(config.output_console);
        assert!(config.caller);
        assert!(!config.json);
        assert!(!config.development);
        assert!(config.output_file().is_none());
    }

    #[test]
    fn it_creates_debug_config() {
        let config = LoggingConfig::debug();

        assert_eq!(config.level(), Level::DEBUG);
        assert!(config.development);
    }

    #[test]
    fn it_builds_config() {
        let config = LoggingConfig::new()
            .with_level(Level::WARN)
            .with_json()
            .without_console()
            .without_caller()
            .with_file("logs/ioc.log");

        assert_eq!(config.level(), Level::WARN);
        assert!(config.json);
        assert!(!config.output_console);
        assert!(!config.caller);
        assert_eq!(config.output_file(), Some(Path::new("logs/ioc.log")));
    }

    #[test]
    fn it_builds_no_layers_without_outputs() {
        let config = LoggingConfig::new().without_console();

        assert!(build_layers(&config).unwrap().is_empty());
    }

    #[test]
    fn it_fails_on_unwritable_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig::new()
            .without_console()
            .with_file(dir.path());

        assert!(build_layers(&config).is_err());
    }
}
