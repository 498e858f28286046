//! Despiece entrypoint: beam detailing and drawing assembly from the
//! command line. Reads typed JSON, writes typed JSON; persistence, HTTP
//! and binary export formats live outside this workspace.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use core_detailing::compute_detailing;
use core_drawing::{BeamDrawingMetadata, DrawingRenderRequest, build_payload, render_document};
use core_model::DetailingInput;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Beam rebar detailing per NSR-10 with vector drawing assembly.
#[derive(Parser, Debug)]
#[command(name = "despiece", version, about = "Despiece de vigas NSR-10")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the detailing result for a beam input file.
    Detail {
        /// Beam input (JSON).
        input: PathBuf,
        /// Result destination; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Compute detailing and assemble the drawing document.
    Draw {
        /// Beam input (JSON).
        input: PathBuf,
        /// Drawing template key.
        #[arg(long, default_value = "beam/default")]
        template: String,
        /// Plot scale.
        #[arg(long, default_value_t = 50.0)]
        scale: f64,
        /// Locale override (defaults to the template locale).
        #[arg(long)]
        locale: Option<String>,
        /// Project name for the title block.
        #[arg(long, default_value = "Proyecto")]
        project: String,
        /// Beam label for the title block.
        #[arg(long, default_value = "VIGA")]
        beam_label: String,
        /// Document destination; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Print the catalog presets (f'c, fy, hooks, stock lengths, marks).
    Presets,
    /// List the known drawing templates.
    Templates,
}

fn read_input(path: &Path) -> Result<DetailingInput> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("no se pudo leer {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("entrada de viga inválida en {}", path.display()))
}

fn write_output<T: serde::Serialize>(
    value: &T,
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("no se pudo escribir {}", path.display()))?;
            info!(path = %path.display(), "resultado escrito");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Detail {
            input,
            output,
            pretty,
        } => {
            let beam = read_input(&input)?;
            let results = compute_detailing(&beam)?;
            write_output(&results, output.as_deref(), pretty)?;
        }
        Command::Draw {
            input,
            template,
            scale,
            locale,
            project,
            beam_label,
            output,
            pretty,
        } => {
            let beam = read_input(&input)?;
            let results = compute_detailing(&beam)?;
            let metadata = BeamDrawingMetadata::from_input(&beam, &project, &beam_label);
            let payload = build_payload(&beam, Some(results), metadata)?;
            let request = DrawingRenderRequest {
                template,
                scale,
                locale,
            };
            let document = render_document(&payload, &request);
            write_output(&document, output.as_deref(), pretty)?;
        }
        Command::Presets => {
            write_output(&core_tables::presets(), None, true)?;
        }
        Command::Templates => {
            let listing: Vec<serde_json::Value> = core_templates::list_templates()
                .into_iter()
                .map(|template| {
                    serde_json::json!({
                        "key": template.key,
                        "locale": template.locale,
                        "metadata": template.metadata,
                        "cover_cm_override": template.cover_cm_override,
                    })
                })
                .collect();
            write_output(&listing, None, true)?;
        }
    }
    Ok(())
}
