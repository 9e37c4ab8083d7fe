use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use scan_pivot::render::{render_failure_html, render_html, render_terminal};
use scan_pivot::report::{load_report_from_path, InputShape, ScanReport};
use scan_pivot::server::{self, AppState, PivotResponse, FAILURE_MESSAGE};
use scan_pivot::PivotTableBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Html,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Shape {
    Auto,
    Bare,
    Envelope,
}

impl From<Shape> for InputShape {
    fn from(s: Shape) -> Self {
        match s {
            Shape::Auto => InputShape::Auto,
            Shape::Bare => InputShape::Bare,
            Shape::Envelope => InputShape::Envelope,
        }
    }
}

/// scan-pivot — Render port-scan results as per-port pivot tables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "scan-pivot",
    version,
    about = "Render port-scan results as per-port pivot tables.",
    long_about = None
)]
struct Cli {
    /// Scan result JSON file. Reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Keep protocol names title-cased (`Tcp`) instead of upper-casing abbreviations.
    #[arg(long = "plain-names", default_value_t = false)]
    plain_names: bool,

    /// Text for hosts without an entry in a row's direction.
    #[arg(long, default_value = "-")]
    placeholder: String,

    /// Top-level layout of the input: `{"host", "ports"}` envelope, bare port mapping, or detect.
    #[arg(long, value_enum, default_value_t = Shape::Auto)]
    shape: Shape,

    /// Omit the host metadata block.
    #[arg(long = "no-host-info", default_value_t = false)]
    no_host_info: bool,

    /// Write output to this path instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Start the embedded HTTP server instead of rendering once.
    #[arg(long = "serve-ui", default_value_t = false)]
    serve_ui: bool,

    /// Address for the HTTP server.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Directory of static UI files served by the HTTP server.
    #[arg(long = "ui-dir", default_value = "ui")]
    ui_dir: PathBuf,

    /// Debug logging.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "scan_pivot=debug" } else { "scan_pivot=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let builder = PivotTableBuilder::new()
        .abbreviations(!cli.plain_names)
        .placeholder(cli.placeholder.clone());

    if cli.serve_ui {
        let state = AppState::new(builder, !cli.no_host_info).shape(cli.shape.into());
        tokio::select! {
            res = server::spawn_server(&cli.bind, state, cli.ui_dir.clone()) => res?,
            _ = tokio::signal::ctrl_c() => info!("shutting down"),
        }
        return Ok(());
    }

    let report = match read_report(&cli) {
        Ok(r) => r,
        Err(e) => {
            // The HTML panel still gets a body to show.
            if cli.format == Format::Html {
                emit(&cli, &render_failure_html(FAILURE_MESSAGE))?;
            }
            return Err(e);
        }
    };

    let tables = builder.build(&report.ports);
    debug!(tables = tables.len(), "built tables");
    let host_info = !cli.no_host_info;

    let rendered = match cli.format {
        Format::Table => render_terminal(&tables, host_info.then_some(report.host.as_slice())),
        Format::Html => render_html(&tables, host_info.then_some(report.host.as_slice())),
        Format::Json => serde_json::to_string_pretty(&PivotResponse::new(report, tables, host_info))?,
    };

    emit(&cli, &rendered)
}

fn read_report(cli: &Cli) -> Result<ScanReport> {
    let shape = InputShape::from(cli.shape);
    match cli.input.as_deref() {
        Some(path) => load_report_from_path(path, shape),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read scan result from stdin")?;
            ScanReport::from_json_str_as(&buf, shape)
                .context("failed to parse scan result from stdin")
        }
    }
}

fn emit(cli: &Cli, rendered: &str) -> Result<()> {
    match cli.output.as_deref() {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            info!("wrote output to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
