//! IconForge CLI - Bridge interface for the design-tool plugin
//!
//! Commands: formats, validate, generate
//! Outputs JSON to stdout, logs to stderr (RUST_LOG)
//! Returns non-zero on validation or generation failure

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use iconforge_core::{
    formats::{Format, FormatRegistry},
    ExportData, ExportPipeline,
};

#[derive(Parser)]
#[command(name = "iconforge-cli")]
#[command(about = "IconForge CLI - template-driven icon and color export")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory of custom format JSON files
    #[arg(short, long, default_value = "formats")]
    formats_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// List available formats
    Formats,

    /// Validate a format's template
    Validate {
        /// Format ID
        #[arg(short, long, conflicts_with = "template_file")]
        format: Option<String>,

        /// Template file to check as an ad-hoc format
        #[arg(short, long)]
        template_file: Option<PathBuf>,
    },

    /// Generate an export file
    Generate {
        /// JSON payload (ExportData)
        #[arg(short, long, conflicts_with = "input")]
        payload: Option<String>,

        /// File containing the JSON payload
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Format ID, overriding the payload's selected format
        #[arg(long)]
        format: Option<String>,

        /// Write the file into this directory instead of printing it
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Treat payload icons as raw frames: filter by the frame prefix and de-duplicate
        #[arg(long)]
        frames: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load formats
    let registry = match FormatRegistry::load_from_dir(&cli.formats_dir) {
        Ok(r) => r,
        Err(e) => {
            print_json(&serde_json::json!({"success": false, "error": format!("Failed to load formats: {}", e)}));
            return ExitCode::FAILURE;
        }
    };

    let pipeline = ExportPipeline::new(registry);

    match cli.command {
        Commands::Formats => {
            let formats: Vec<_> = pipeline
                .list_formats()
                .iter()
                .map(|f| serde_json::json!({
                    "id": f.id,
                    "name": f.name,
                    "extension": f.extension,
                    "custom": f.custom,
                }))
                .collect();

            print_json(&formats);
            ExitCode::SUCCESS
        }

        Commands::Validate { format, template_file } => {
            let format = match resolve_format(&pipeline, format, template_file.as_deref()) {
                Ok(f) => f,
                Err(e) => {
                    print_json(&serde_json::json!({"valid": false, "error": e}));
                    return ExitCode::FAILURE;
                }
            };

            let result = pipeline.validate_format(&format);
            print_json(&result);
            if result.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2) // Validation failure
            }
        }

        Commands::Generate { payload, input, format, out, frames } => {
            let data = match read_payload(payload, input.as_deref()) {
                Ok(d) if frames => ExportData::from_frames(d.settings, d.document_name, d.icons, d.colors),
                Ok(d) => d,
                Err(e) => {
                    print_json(&serde_json::json!({"success": false, "error": format!("Invalid payload: {}", e)}));
                    return ExitCode::FAILURE;
                }
            };

            let result = match format {
                Some(id) => match pipeline.get_format(&id) {
                    Some(f) => pipeline.generate_with(&data, f),
                    None => Err(iconforge_core::GenerateError::FormatNotFound(id)),
                },
                None => pipeline.generate(&data),
            };

            match result {
                Ok(file) => match out {
                    Some(dir) => {
                        let path = dir.join(&file.file_name);
                        if let Err(e) = fs::create_dir_all(&dir).and_then(|_| fs::write(&path, &file.file_text)) {
                            print_json(&serde_json::json!({"success": false, "error": e.to_string()}));
                            return ExitCode::FAILURE;
                        }
                        print_json(&serde_json::json!({"success": true, "path": path}));
                        ExitCode::SUCCESS
                    }
                    None => {
                        print_json(&serde_json::json!({"success": true, "file": file}));
                        ExitCode::SUCCESS
                    }
                },
                Err(e) => {
                    print_json(&serde_json::json!({"success": false, "error": e.to_string()}));
                    ExitCode::from(2) // Generation failure
                }
            }
        }
    }
}

fn resolve_format(
    pipeline: &ExportPipeline,
    id: Option<String>,
    template_file: Option<&Path>,
) -> Result<Format, String> {
    match (id, template_file) {
        (Some(id), _) => pipeline
            .get_format(&id)
            .cloned()
            .ok_or_else(|| format!("Format not found: {}", id)),
        (None, Some(path)) => {
            let template = fs::read_to_string(path).map_err(|e| e.to_string())?;
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("txt");
            Ok(Format::custom(path.display().to_string(), extension, template))
        }
        (None, None) => Err("Pass --format or --template-file".to_string()),
    }
}

fn read_payload(payload: Option<String>, input: Option<&Path>) -> Result<ExportData, String> {
    let raw = match (payload, input) {
        (Some(p), _) => p,
        (None, Some(path)) => fs::read_to_string(path).map_err(|e| e.to_string())?,
        (None, None) => return Err("Pass --payload or --input".to_string()),
    };
    serde_json::from_str(&raw).map_err(|e| e.to_string())
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => println!(r#"{{"success": false, "error": "{}"}}"#, e),
    }
}
