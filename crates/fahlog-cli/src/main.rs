use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use fahlog::{FormatConfig, FormatRevision, ResolveOptions, ScienceLogParser};
use fahlog_batch::{BatchOptions, ExportFormat, DEFAULT_FILENAME};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fahlog")]
#[command(about = "Folding@home Core22 science.log tools", long_about = None)]
struct Cli {
    /// Log format revision to parse
    #[arg(long, global = true, value_enum, conflicts_with = "config")]
    revision: Option<Revision>,

    /// TOML file with `[format]` and `[resolve]` tables
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a science log and emit it as JSON
    Parse {
        /// Path to the science.log file
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Print on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Show the platform and device a run used
    Device {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    /// Parse every RUN*/CLONE*/results*/<filename> below a project directory
    Batch {
        #[arg(value_name = "DIR")]
        root: PathBuf,

        #[arg(long, default_value = DEFAULT_FILENAME)]
        filename: String,

        /// Worker threads (0 = one per core)
        #[arg(long, default_value_t = 0)]
        threads: usize,

        /// Write rows here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Revision {
    Current,
    Legacy,
}

impl From<Revision> for FormatRevision {
    fn from(revision: Revision) -> Self {
        match revision {
            Revision::Current => FormatRevision::Current,
            Revision::Legacy => FormatRevision::Legacy,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => ExportFormat::Csv,
            Format::Json => ExportFormat::Json,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    format: FormatConfig,
    resolve: ResolveOptions,
}

impl Settings {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        match (&cli.config, cli.revision) {
            (Some(path), _) => Self::load(path),
            (None, Some(revision)) => Ok(Self {
                format: FormatRevision::from(revision).config(),
                ..Self::default()
            }),
            (None, None) => Ok(Self::default()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli)?;
    log::debug!("format settings: {:?}", settings);

    match &cli.command {
        Commands::Parse { path, compact } => {
            let log = ScienceLogParser::with_config(settings.format).parse_file(path)?;
            if *compact {
                println!("{}", serde_json::to_string(&log)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&log)?);
            }
        }
        Commands::Device { path } => {
            let log = ScienceLogParser::with_config(settings.format).parse_file(path)?;
            let active = log
                .active_hardware_with(&settings.resolve)
                .with_context(|| format!("cannot resolve active device of {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&active)?);
        }
        Commands::Batch {
            root,
            filename,
            threads,
            output,
            format,
        } => {
            let options = BatchOptions {
                threads: *threads,
                format: settings.format,
                resolve: settings.resolve,
            };
            let report = fahlog_batch::parse_directory(root, filename, &options)?;
            match output {
                Some(path) => {
                    fahlog_batch::export_to_path(&report.rows, (*format).into(), path)?
                }
                None => {
                    fahlog_batch::write_rows(&report.rows, (*format).into(), io::stdout().lock())?
                }
            }
            log::info!(
                "{} rows written, {} files failed",
                report.rows.len(),
                report.failures.len()
            );
        }
    }
    Ok(())
}
