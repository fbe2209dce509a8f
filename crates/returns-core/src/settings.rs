use clap::Parser;
use std::path::PathBuf;

use crate::formatting::OutputFormat;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Returning-visitor statistics per browser from analytics CSV exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "browser-returns",
    about = "Returning-visitor statistics per browser from analytics CSV exports",
    version
)]
pub struct Settings {
    /// Directory scanned recursively for .csv files
    #[arg(long, default_value = "data", env = "BROWSER_RETURNS_DATA_DIR")]
    pub data_dir: PathBuf,

    /// JSON file with the ordered list of browser buckets
    #[arg(long)]
    pub buckets: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply flag overrides.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list, so tests
    /// can avoid spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::apply_overrides(Settings::parse_from(args))
    }

    /// `--debug` overrides the log level.
    fn apply_overrides(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The requested report format.
    pub fn output_format(&self) -> OutputFormat {
        match self.format.as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
