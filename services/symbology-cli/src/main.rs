//! Command-line front end for map symbology.
//!
//! Builds legends from renderer JSON or from a map service, matches features
//! against renderers, resolves zoom levels and draws placeholder icons.
//! Results are printed to stdout as JSON or SVG.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use symbology::{
    generate_placeholder_symbology, graphic_icon, graphic_symbol, resolve_zoom_level,
    JoinPolicy, LegendResponse, Lod, Renderer, SymbologyService,
};
use symbology_common::web_mercator_lods;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "symbology")]
#[command(about = "Map renderer symbology and legend tool")]
struct Args {
    /// Configuration file (YAML)
    #[arg(long, env = "SYMBOLOGY_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw the legend of a renderer JSON file
    Legend {
        /// Renderer JSON file
        renderer: PathBuf,

        /// Layer id reported in the output
        #[arg(long, default_value = "0")]
        layer: u32,

        /// Also write each icon as a PNG into this directory
        #[arg(long)]
        png_dir: Option<PathBuf>,

        /// PNG edge length in pixels
        #[arg(long, default_value = "64")]
        png_size: u32,
    },

    /// Fetch a map service legend and rebuild it with local icons
    ServerLegend {
        /// Map service URL, e.g. https://host/arcgis/rest/services/Name/MapServer
        url: String,

        /// Only this sub-layer (default: merge all)
        #[arg(long)]
        layer: Option<u32>,
    },

    /// Resolve the icon and symbol for a feature
    Match {
        /// Renderer JSON file
        renderer: PathBuf,

        /// Feature attributes as a JSON object
        #[arg(long)]
        attributes: String,

        /// Fail if any legend icon cannot be drawn
        #[arg(long)]
        abort_on_failure: bool,
    },

    /// Resolve a scale to a zoom level index
    Zoom {
        /// Target scale denominator (0 = no limit)
        target: f64,

        /// Comma-separated scales, most zoomed out first (default: Web Mercator)
        #[arg(long, value_delimiter = ',')]
        scales: Vec<f64>,
    },

    /// Draw an initial-letter placeholder icon
    Placeholder {
        name: String,

        /// Background color (#RRGGBB or a CSS name)
        #[arg(long)]
        color: Option<String>,
    },

    /// Wrap an externally rendered legend image
    Wms {
        name: String,

        /// Image URL or data: URI
        #[arg(long)]
        image: Option<String>,
    },
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries command output
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn read_renderer(path: &Path) -> Result<Renderer> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read renderer file: {}", path.display()))?;
    let renderer = Renderer::from_json(&content)
        .with_context(|| format!("Failed to parse renderer file: {}", path.display()))?;
    renderer
        .validate()
        .with_context(|| format!("Invalid renderer: {}", path.display()))?;
    Ok(renderer)
}

fn write_pngs(legend: &LegendResponse, dir: &Path, size: u32) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    for layer in &legend.layers {
        for (idx, entry) in layer.legend.iter().enumerate() {
            let path = dir.join(format!("layer{}_{:03}.png", layer.layer_id, idx));
            let png = entry.icon.to_png(size)?;
            std::fs::write(&path, png)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }
    info!(dir = %dir.display(), "Wrote legend PNGs");
    Ok(())
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;

    let config = CliConfig::load_or_default(args.config.as_deref())?;
    let service =
        SymbologyService::from_http(&config.http)?.with_join_policy(config.enhance.join_policy);

    match args.command {
        Command::Legend {
            renderer,
            layer,
            png_dir,
            png_size,
        } => {
            let renderer = read_renderer(&renderer)?;
            let legend = service.renderer_legend(&renderer, layer).await?;
            if let Some(dir) = png_dir {
                write_pngs(&legend, &dir, png_size)?;
            }
            print_json(&legend)?;
        }

        Command::ServerLegend { url, layer } => {
            let legend = service.server_legend(&url, layer).await?;
            print_json(&legend)?;
        }

        Command::Match {
            renderer,
            attributes,
            abort_on_failure,
        } => {
            let renderer = read_renderer(&renderer)?;
            let attributes: Value =
                serde_json::from_str(&attributes).context("Attributes must be JSON")?;
            if !attributes.is_object() {
                bail!("Attributes must be a JSON object");
            }

            let service = if abort_on_failure {
                service.with_join_policy(JoinPolicy::Abort)
            } else {
                service
            };
            let enhanced = service.enhance(&renderer).await?;

            print_json(&json!({
                "symbol": graphic_symbol(&attributes, &enhanced),
                "icon": graphic_icon(&attributes, &enhanced).to_svg(),
            }))?;
        }

        Command::Zoom { target, scales } => {
            let lods: Vec<Lod> = if scales.is_empty() {
                web_mercator_lods()
            } else {
                scales.into_iter().map(Lod::new).collect()
            };
            let index = resolve_zoom_level(&lods, target);
            print_json(&json!({
                "index": index,
                "scale": lods.get(index).map(|l| l.scale),
            }))?;
        }

        Command::Placeholder { name, color } => {
            let color = color.or(config.placeholder.color);
            let entry = generate_placeholder_symbology(&name, color.as_deref());
            println!("{}", entry.icon.to_svg());
        }

        Command::Wms { name, image } => {
            let entry = service.wms_symbology(&name, image.as_deref()).await;
            println!("{}", entry.icon.to_svg());
        }
    }

    Ok(())
}
