//! outpdf CLI - document outline extraction from PDF span dumps

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use outpdf::{
    ExtractOptions, HeadingClassifier, LinearModel, OutlineEngine, SpanDocument, TextSpan,
};

#[derive(Parser)]
#[command(name = "outpdf")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract structured outlines from PDF span dumps", long_about = None)]
struct Cli {
    /// Input span dump (JSON produced by the PDF parsing adapter)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Model artifact path
    #[arg(long, env = "OUTPDF_MODEL", value_name = "FILE", global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract outlines from one or more span dumps
    Extract {
        /// Input span dumps
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (single input) or directory (multiple inputs);
        /// stdout if not specified
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Confidence floor for heading predictions
        #[arg(long, default_value = "0.5")]
        floor: f32,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,

        /// Print extraction statistics
        #[arg(long)]
        stats: bool,

        /// Disable parallel classification
        #[arg(long)]
        sequential: bool,
    },

    /// Validate a model artifact and report its schema
    CheckModel {
        /// Model artifact to validate
        #[arg(value_name = "FILE")]
        artifact: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let model = cli.model.clone();

    let result = match cli.command {
        Some(Commands::Extract {
            inputs,
            output,
            floor,
            pretty,
            stats,
            sequential,
        }) => cmd_extract(
            &inputs,
            output.as_deref(),
            model.as_deref(),
            floor,
            pretty,
            stats,
            sequential,
        ),
        Some(Commands::CheckModel { artifact }) => cmd_check_model(&artifact),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_extract(
                    std::slice::from_ref(&input),
                    None,
                    model.as_deref(),
                    0.5,
                    true,
                    false,
                    false,
                )
            } else {
                println!("{}", "Usage: outpdf <FILE>".yellow());
                println!("       outpdf --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Load the configured model, falling back to the built-in baseline.
///
/// A missing or invalid artifact is fatal here: the tool refuses to run
/// rather than silently degrade.
fn load_classifier(
    model: Option<&Path>,
) -> Result<Arc<dyn HeadingClassifier>, Box<dyn std::error::Error>> {
    match model {
        Some(path) => {
            let model = LinearModel::from_path(path)
                .map_err(|e| format!("cannot load model from {}: {}", path.display(), e))?;
            Ok(Arc::new(model))
        }
        None => {
            log::debug!("no model configured, using built-in baseline");
            Ok(Arc::new(LinearModel::baseline()))
        }
    }
}

/// Read a span dump: either a `SpanDocument` envelope or a bare span array.
fn read_span_dump(path: &Path) -> Result<SpanDocument, Box<dyn std::error::Error>> {
    let data = fs::read_to_string(path)?;
    if let Ok(document) = serde_json::from_str::<SpanDocument>(&data) {
        return Ok(document);
    }
    let spans: Vec<TextSpan> = serde_json::from_str(&data)
        .map_err(|e| format!("{} is not a span dump: {}", path.display(), e))?;
    Ok(SpanDocument::from_spans(spans))
}

#[allow(clippy::too_many_arguments)]
fn cmd_extract(
    inputs: &[PathBuf],
    output: Option<&Path>,
    model: Option<&Path>,
    floor: f32,
    pretty: bool,
    stats: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let classifier = load_classifier(model)?;

    let mut options = ExtractOptions::new().with_confidence_floor(floor);
    if sequential {
        options = options.sequential();
    }
    let engine = OutlineEngine::with_options(classifier, options);

    let batch = inputs.len() > 1;
    if batch {
        if let Some(dir) = output {
            fs::create_dir_all(dir)?;
        }
    }

    let pb = if batch {
        let pb = ProgressBar::new(inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    for input in inputs {
        if let Some(pb) = &pb {
            pb.set_message(input.display().to_string());
        }

        let document = read_span_dump(input)?;
        let result = engine.extract(&document);

        let json = if pretty {
            result.outline.to_json_pretty()?
        } else {
            result.outline.to_json()?
        };

        match (batch, output) {
            (true, Some(dir)) => {
                let name = outline_file_name(input);
                fs::write(dir.join(&name), &json)?;
            }
            (true, None) => {
                let name = outline_file_name(input);
                fs::write(input.with_file_name(&name), &json)?;
            }
            (false, Some(file)) => fs::write(file, &json)?,
            (false, None) => println!("{json}"),
        }

        if stats {
            let s = &result.stats;
            eprintln!(
                "{} {}: {} entries from {} spans",
                "✓".green(),
                input.display(),
                s.entry_count,
                s.span_count
            );
            eprintln!(
                "  body: {}  floored: {}  deduplicated: {}  dropped: {}",
                s.body_count,
                s.floored_count,
                s.deduplicated,
                s.dropped_malformed + s.dropped_empty
            );
        }

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    Ok(())
}

fn outline_file_name(input: &Path) -> String {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    format!("{stem}.outline.json")
}

fn cmd_check_model(artifact: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match LinearModel::from_path(artifact) {
        Ok(model) => {
            let summary = model.to_artifact();
            println!("{} {}", "✓".green().bold(), artifact.display());
            println!("  classes:  {}", summary.classes.join(", "));
            println!("  features: {}", summary.schema.join(", "));
            Ok(())
        }
        Err(e) => Err(format!("{}: {}", artifact.display(), e).into()),
    }
}

fn cmd_version() {
    println!(
        "{} {}",
        "outpdf".green().bold(),
        env!("CARGO_PKG_VERSION")
    );
}
