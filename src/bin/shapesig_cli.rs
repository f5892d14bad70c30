//! ShapeSig CLI - Shape Inspection Tool
//!
//! Commands: signature, compare, describe, dedup
//! Outputs JSON to stdout, logs to stderr (RUST_LOG)
//! Returns non-zero on invalid input or unequal shapes

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use shapesig_core::{
    DynamicRecord, ExtractOptions, ShapeError, ShapeSignature, TypeCache, ENGINE_VERSION,
};

#[derive(Parser)]
#[command(name = "shapesig-cli")]
#[command(about = "ShapeSig CLI - structural signatures for dynamic records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to an ExtractOptions JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the signature of a record
    Signature {
        /// JSON object
        #[arg(short, long)]
        payload: String,
    },

    /// Compare the signatures of two records
    Compare {
        #[arg(short, long)]
        left: String,

        #[arg(short, long)]
        right: String,
    },

    /// Render a record the way diagnostics print it
    Describe {
        #[arg(short, long)]
        payload: String,
    },

    /// Group a JSON array of records by shape
    Dedup {
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let options = match &cli.config {
        Some(path) => match ExtractOptions::load(path) {
            Ok(o) => o,
            Err(e) => return fail(&format!("Failed to load config: {}", e)),
        },
        None => ExtractOptions::default(),
    };

    match run(cli.command, &options) {
        Ok(code) => code,
        Err(e) => fail(&e.to_string()),
    }
}

fn run(command: Commands, options: &ExtractOptions) -> Result<ExitCode, ShapeError> {
    match command {
        Commands::Signature { payload } => {
            let signature = ShapeSignature::from_json_with(&parse(&payload)?, options)?;
            let output = serde_json::json!({
                "engine_version": ENGINE_VERSION,
                "signature": signature,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Compare { left, right } => {
            let l = ShapeSignature::from_json_with(&parse(&left)?, options)?;
            let r = ShapeSignature::from_json_with(&parse(&right)?, options)?;
            let equal = l == r;
            let output = serde_json::json!({
                "equal": equal,
                "hash_equal": l.hash_value() == r.hash_value(),
                "left": l.to_string(),
                "right": r.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            if equal {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(2))
            }
        }

        Commands::Describe { payload } => {
            let record = DynamicRecord::from_json_with(&parse(&payload)?, options)?;
            println!("{}", record.describe());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Dedup { file } => {
            let content = fs::read_to_string(&file)?;
            let items = match parse(&content)? {
                Value::Array(items) => items,
                _ => return Err(ShapeError::invalid("dedup input must be a JSON array")),
            };

            // Each distinct shape gets a group id; the cache hands the same id back on a hit.
            let cache: TypeCache<usize> = TypeCache::new();
            let mut groups: Vec<(ShapeSignature, Vec<usize>)> = Vec::new();
            for (index, item) in items.iter().enumerate() {
                let signature = ShapeSignature::from_json_with(item, options)?;
                let next = groups.len();
                let group = *cache.get_or_insert_with(&signature, |_| next);
                if group == next {
                    groups.push((signature, Vec::new()));
                }
                groups[group].1.push(index);
            }

            let shapes: Vec<_> = groups
                .iter()
                .map(|(signature, members)| serde_json::json!({
                    "shape": signature.to_string(),
                    "fingerprint": signature.fingerprint(),
                    "members": members,
                }))
                .collect();
            let output = serde_json::json!({
                "records": items.len(),
                "shapes": shapes,
                "stats": cache.stats(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn parse(payload: &str) -> Result<Value, ShapeError> {
    serde_json::from_str(payload)
        .map_err(|e| ShapeError::invalid(format!("Invalid payload: {}", e)))
}

fn fail(message: &str) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": message,
    });
    println!("{}", output);
    ExitCode::FAILURE
}
