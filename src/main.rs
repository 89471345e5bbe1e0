//! clipegg - Clipboard egg command-line tool
//!
//! Entry point for the `clipegg` binary.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use clipegg::clipboard::{self, file::write_bundle};
use clipegg::config::Config;
use clipegg::{encode, try_decode, Egg, EggOptions, MemoryClipboard};

/// Command-line arguments for clipegg
#[derive(Parser, Debug)]
#[command(name = "clipegg")]
#[command(version, about = "Clipboard egg protocol tool", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, env = "CLIPEGG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Write logs to file (in addition to stderr)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// clipegg subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an egg and print its clipboard bundle
    Encode {
        /// Resource the egg points at
        #[arg(long)]
        uri: String,

        /// Display text
        #[arg(long)]
        label: String,

        /// Egg type (defaults to "unknown")
        #[arg(long = "type")]
        kind: Option<String>,

        /// Thumbnail URL
        #[arg(long)]
        thumb: Option<String>,

        /// Metadata as a JSON object
        #[arg(long)]
        meta: Option<String>,

        /// Write the bundle to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Read a clipboard bundle and print the egg it carries
    Decode {
        /// Bundle file (stdin when absent)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Load configuration before logging so [logging] applies; report afterwards
    let (config, load_error) = load_config(args.config.clone());
    let config = config.with_overrides(args.log_format.clone(), args.pretty);
    config.validate()?;

    let _guard = init_logging(&args, &config)?;

    if let Some(e) = load_error {
        warn!("Failed to load config: {:#}, using defaults", e);
    }
    debug!("Config: {:?}", config);

    match args.command {
        Command::Encode {
            uri,
            label,
            kind,
            thumb,
            meta,
            out,
        } => {
            let mut options = EggOptions::new();
            if let Some(kind) = kind {
                options = options.with_type(kind);
            }
            if let Some(thumb) = thumb {
                options = options.with_thumb(thumb);
            }
            if let Some(meta) = meta {
                let meta: Map<String, Value> =
                    serde_json::from_str(&meta).context("--meta must be a JSON object")?;
                options = options.with_meta(meta);
            }

            let egg = Egg::new(uri, label, options);
            info!("Encoded egg for {}", egg.uri);
            let bundle = encode(&egg);

            match out {
                Some(path) => {
                    let file = File::create(&path)
                        .context(format!("Failed to create {}", path.display()))?;
                    write_bundle(&bundle, file, config.output.pretty)?;
                }
                None => write_bundle(&bundle, io::stdout().lock(), config.output.pretty)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Decode { input } => {
            let clipboard = read_input(input, config.clipboard.max_size)?;
            debug!("Bundle carries {} formats", clipboard.len());

            match try_decode(&clipboard) {
                Ok(Some(egg)) => {
                    let mut stdout = io::stdout().lock();
                    if config.output.pretty {
                        serde_json::to_writer_pretty(&mut stdout, &egg)?;
                    } else {
                        serde_json::to_writer(&mut stdout, &egg)?;
                    }
                    writeln!(stdout)?;
                    Ok(ExitCode::SUCCESS)
                }
                Ok(None) => {
                    eprintln!("clipegg: no egg in bundle");
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => {
                    eprintln!("clipegg: {}", e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

/// Load the config file, falling back to defaults
///
/// A missing default file is not an error. Anything else that goes wrong is
/// returned alongside the defaults so it can be logged once logging is up.
fn load_config(path: Option<PathBuf>) -> (Config, Option<anyhow::Error>) {
    let path = match path {
        Some(path) => path,
        None => match Config::default_path() {
            Some(path) if path.exists() => path,
            _ => return (Config::default_config(), None),
        },
    };

    match Config::load(&path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default_config(), Some(e)),
    }
}

fn read_input(input: Option<PathBuf>, max_size: usize) -> Result<MemoryClipboard> {
    let clipboard = match input {
        Some(path) => clipboard::read_bundle(&path, max_size)
            .context(format!("Failed to read bundle: {}", path.display()))?,
        None => clipboard::read_bundle_from(io::stdin().lock(), max_size)
            .context("Failed to read bundle from stdin")?,
    };
    Ok(clipboard)
}

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

fn format_layer<W>(format: &str, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        "json" => layer.json().boxed(),
        "compact" => layer.compact().boxed(),
        _ => layer.pretty().boxed(),
    }
}

fn init_logging(args: &Args, config: &Config) -> Result<Option<WorkerGuard>> {
    let log_level = match args.verbose {
        0 => config.logging.level.to_lowercase(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "clipegg={level},clipegg_core={level},warn",
            level = log_level
        ))
    });

    let format = config.logging.format.as_str();

    // stdout carries bundles and eggs, so logs always go to stderr
    let mut layers = vec![format_layer(format, io::stderr, true)];

    let log_file = args
        .log_file
        .clone()
        .or_else(|| config.logging.log_dir.as_ref().map(|dir| dir.join("clipegg.log")));

    let guard = match &log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .context(format!("Invalid log file path: {}", path.display()))?;
            std::fs::create_dir_all(&dir)
                .context(format!("Failed to create log directory: {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(format_layer(format, writer, false));
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .init();

    if let Some(path) = &log_file {
        info!("Logging to file: {}", path.display());
    }

    Ok(guard)
}
