//! Command-line interface for the saltgraph utility
//!
//! Scans a SaltStack state tree and reports the roles, role dependencies,
//! pillar dependencies, systemd units and includes of every whole state.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

use crate::colorizer::colorize_report;
use saltgraph::core::logging::init_logging;
use saltgraph::orchestrator::{OutputMode, RenderOutcome, Visualizer};
use saltgraph::render::GraphvizBackend;
use saltgraph::{ExtractionConfig, ReportConfig};

/// Saltgraph - Visualize SaltStack state dependencies
#[derive(Parser, Debug)]
#[command(name = "saltgraph")]
#[command(about = "Visualize roles, pillars, systemd units and includes of SaltStack states")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    /// Root directory of the SaltStack states
    #[arg(value_name = "SALT_PATH")]
    pub salt_path: PathBuf,

    /// Output file (graphical mode uses it as the image base name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report pillar dependencies (default)
    #[arg(short = 'p', long, conflicts_with = "no_pillars")]
    pub pillars: bool,

    /// Do not report pillar dependencies
    #[arg(long)]
    pub no_pillars: bool,

    /// Report role dependencies (default)
    #[arg(short = 'r', long, conflicts_with = "no_roles")]
    pub roles: bool,

    /// Do not report role dependencies
    #[arg(long)]
    pub no_roles: bool,

    /// Do not report systemd units
    #[arg(long)]
    pub no_systemd: bool,

    /// Render a Graphviz image instead of the text report
    #[arg(short, long, conflicts_with = "json")]
    pub graphical: bool,

    /// Graphviz output format
    #[arg(short, long, default_value = "svg")]
    pub format: String,

    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,

    /// When to use colors in output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Entry-point file that marks a whole state
    #[arg(long, default_value = "init.sls")]
    pub entry_file: String,

    /// Extension of state definition files
    #[arg(long, default_value = "sls")]
    pub extension: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig::new(!self.no_pillars, !self.no_roles, !self.no_systemd)
    }

    pub fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig::default()
            .with_entry_file(self.entry_file.as_str())
            .with_extension(self.extension.as_str())
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.graphical {
            OutputMode::Graphical
        } else if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        }
    }
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
#[derive(Default)]
pub struct SaltgraphApp;

impl SaltgraphApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let level = if cli.verbose && cli.log_level == LogLevel::Info {
            LogLevel::Debug
        } else {
            cli.log_level
        };
        let log_level_str = std::env::var("SALTGRAPH_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(level.as_str().to_string()));
        let log_format_str = std::env::var("SALTGRAPH_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Saltgraph v{}", env!("CARGO_PKG_VERSION"));
        }

        let visualizer = Visualizer::with_config(&cli.extraction_config())?;
        let model = visualizer.build(&cli.salt_path)?;

        let mode = cli.output_mode();
        let backend = GraphvizBackend::new(cli.format.as_str());
        let outcome = visualizer.render(
            &model,
            mode,
            cli.report_config(),
            &backend,
            cli.output.as_deref(),
        )?;

        match outcome {
            RenderOutcome::Image(path) => {
                info!("Graphical visualization saved to {}", path.display());
                Ok(())
            }
            RenderOutcome::Document(document) => {
                // A graphical fallback is a text report; keep it out of the image path
                let destination = match mode {
                    OutputMode::Graphical => None,
                    _ => cli.output.as_ref(),
                };
                let document =
                    if mode != OutputMode::Json && self.should_colorize(destination, cli.color) {
                        colorize_report(&document)
                    } else {
                        document
                    };
                self.write_output(destination, &document)
            }
        }
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: Option<&PathBuf>, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var_os("NO_COLOR").is_some() {
                    return false;
                }
                match output {
                    None => crossterm::tty::IsTty::is_tty(&io::stdout()),
                    Some(_) => false,
                }
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<&PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) => {
                fs::write(path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
                info!("Output written to {}", path.display());
            }
            None => {
                let mut stdout = io::stdout().lock();
                if content.is_empty() || content.ends_with('\n') {
                    write!(stdout, "{}", content)?;
                } else {
                    writeln!(stdout, "{}", content)?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}
