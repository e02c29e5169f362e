use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use log::{LevelFilter, debug, info};
use thiserror::Error;

use flowfit::{AssembleOptions, DetectedShape, DiagramError, LayoutConfig, Viewport};

#[derive(Parser)]
#[command(
    name = "flowfit",
    about = "Turn a flowchart into a render-ready graph, placing nodes where shape detection found them"
)]
struct Cli {
    /// Flowchart source file (reads from stdin if not provided)
    file: Option<PathBuf>,

    /// JSON array of detected shapes ({"id", "boundingBox", "colorName"})
    #[arg(long, short = 's')]
    shapes: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 1200.0, value_parser = positive)]
    width: f64,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 800.0, value_parser = positive)]
    height: f64,

    /// Match ratio at or above which detected positions are used
    #[arg(long, default_value_t = flowfit::layout::DEFAULT_PRESET_THRESHOLD)]
    threshold: f64,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid shapes file {path}: {source}")]
    Shapes {
        path: String,
        source: serde_json::Error,
    },

    #[error("could not parse diagram: {0}")]
    Diagram(#[from] DiagramError),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

fn positive(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("must be a positive number, got {s}"))
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    match run(&cli) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let source = match &cli.file {
        Some(path) => read_file(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::Read {
                    path: "stdin".to_string(),
                    source,
                })?;
            buf
        }
    };

    let shapes: Vec<DetectedShape> = match &cli.shapes {
        Some(path) => {
            let text = read_file(path)?;
            serde_json::from_str(&text).map_err(|source| CliError::Shapes {
                path: path.display().to_string(),
                source,
            })?
        }
        None => Vec::new(),
    };
    debug!(shapes_len = shapes.len(); "Loaded detected shapes");

    let options = AssembleOptions {
        layout: LayoutConfig {
            preset_threshold: cli.threshold,
        },
    };
    let viewport = Viewport {
        width: cli.width,
        height: cli.height,
    };
    let graph = flowfit::assemble_with(&options, &source, &shapes, viewport)?;
    info!(nodes_len = graph.nodes.len(), edges_len = graph.edges.len(); "Assembled graph");

    match cli.format {
        Format::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&graph)?)),
        Format::Text => Ok(flowfit::report::render(&graph)),
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}
