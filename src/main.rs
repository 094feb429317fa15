use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_report::config::{Preset, ReportConfig};
use league_report::pipeline;

#[derive(Parser)]
#[command(name = "league-report")]
#[command(about = "Leaderboards and qualification from four-player match logs")]
#[command(version)]
struct Cli {
    /// Match log to read (stdin when omitted)
    input: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only count matches whose tag contains this text
    #[arg(long)]
    tag: Option<String>,

    /// Matches required for the windowed leaderboards
    #[arg(long)]
    min_matches: Option<usize>,

    /// Maximum number of qualified players
    #[arg(long)]
    max_qualified: Option<usize>,

    /// Leaderboard preset
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

impl Cli {
    fn report_config(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ReportConfig::default(),
        };

        if let Some(tag) = &self.tag {
            config.tag_filter = tag.clone();
        }
        if let Some(n) = self.min_matches {
            config.min_matches = n;
        }
        if let Some(n) = self.max_qualified {
            config.max_qualified = n;
        }
        if let Some(preset) = self.preset {
            config.preset = preset;
            // An explicit preset on the command line wins over a file's list.
            config.leaderboards = None;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn open_input(&self) -> Result<Box<dyn BufRead>> {
        match &self.input {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            None => Ok(Box::new(io::stdin().lock())),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the report.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }

    tracing::info!("Starting league-report v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.report_config()?;
    let input = cli.open_input()?;
    let report = pipeline::run(config, input).context("Failed to build report")?;

    let rendered = match cli.format {
        Format::Markdown => report.to_markdown(),
        Format::Json => {
            let mut json = report.to_json().context("Failed to serialize report")?;
            json.push('\n');
            json
        }
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("Failed to write report")?;
    stdout.flush().context("Failed to write report")?;

    Ok(())
}
