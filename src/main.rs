use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use render_workflow_rs::text::DEFAULT_FONT_FAMILY;
use render_workflow_rs::{export, ImageFormat, RenderOptions, Workflow};

#[derive(Parser)]
#[command(author, version, about = "Render workflow JSON to PNG or JPEG flowcharts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(name = "draw_workflow")]
    DrawWorkflow {
        #[arg(long)]
        input: PathBuf,
        /// Defaults to workflow-<type>-<epoch millis>.<ext> in the current directory.
        #[arg(long)]
        output: Option<PathBuf>,
        /// png or jpeg; taken from the output extension when omitted.
        #[arg(long)]
        format: Option<ImageFormat>,
        #[arg(long)]
        legend: bool,
        #[arg(long)]
        summary: bool,
        #[arg(long, default_value = DEFAULT_FONT_FAMILY)]
        font_family: String,
    },
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    match cli.command {
        Command::DrawWorkflow {
            input,
            output,
            format,
            legend,
            summary,
            font_family,
        } => {
            let options = RenderOptions {
                font_family,
                legend,
                summary,
            };
            draw_workflow(&input, output.as_deref(), format, &options)
        }
    }
}

/// Log level comes from `RUST_LOG`, defaulting to `info`.
fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow!("Failed to create env filter: {e}"))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize tracing: {e}"))?;
    Ok(())
}

fn draw_workflow(
    input: &Path,
    output: Option<&Path>,
    format: Option<ImageFormat>,
    options: &RenderOptions,
) -> Result<()> {
    let file = fs::File::open(input).with_context(|| format!("Failed to read {:?}", input))?;
    let workflow = Workflow::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse workflow {:?}", input))?;

    let format = format
        .or_else(|| output.and_then(format_from_extension))
        .unwrap_or_default();

    let download = export::download(Some(&workflow), format, options, Utc::now())
        .context("Failed to render workflow")?;
    let Some(download) = download else {
        tracing::warn!(input = %input.display(), "workflow has no nodes, nothing written");
        return Ok(());
    };

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&download.file_name));
    fs::write(&output, &download.bytes)
        .with_context(|| format!("Failed to write {:?}", output))?;
    tracing::info!(
        output = %output.display(),
        format = %download.format,
        bytes = download.bytes.len(),
        nodes = workflow.workflow_nodes.len(),
        "wrote workflow diagram"
    );
    Ok(())
}

fn format_from_extension(path: &Path) -> Option<ImageFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
}
