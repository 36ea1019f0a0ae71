use std::path::{Path, PathBuf};

use anyhow::Context;
use catalog::LayerCatalog;
use clap::{Parser, Subcommand};
use layers::{HeadlessMap, paint_layer, vector_source};
use report::ReportClient;
use runtime::{Viewer, ViewerConfig, ViewerEvent};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless driver for the map viewer state engine")]
struct Args {
    /// Viewer config (JSON); every field is optional
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Layer catalog (JSON array of layer descriptors); built-in when omitted
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Base URL substituted for `{tiles}` in catalog templates
    #[arg(long, env = "VIEWER_TILES_URL", global = true)]
    tiles_url: Option<String>,

    /// Report card endpoint
    #[arg(long, env = "VIEWER_REPORT_URL", global = true)]
    report_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scripted session against a headless map and print the final state
    Replay {
        /// JSON array of viewer events
        #[arg(long)]
        session: PathBuf,

        /// Fetch requested report cards from the report endpoint
        #[arg(long)]
        fetch_reports: bool,
    },

    /// Print the resolved layer catalog with tile URLs expanded
    Catalog,

    /// Fetch one report card and print its non-empty fields
    Report {
        #[arg(long)]
        archive: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    match args.command {
        Command::Replay {
            session,
            fetch_reports,
        } => {
            let catalog = load_catalog(args.catalog.as_deref())?;
            replay(&config, catalog, &session, fetch_reports).await
        }
        Command::Catalog => {
            let catalog = load_catalog(args.catalog.as_deref())?;
            let resolved: Vec<_> = catalog
                .layers()
                .iter()
                .map(|d| {
                    json!({
                        "descriptor": d,
                        "source": vector_source(d, &config.tiles_base_url),
                        "layer": paint_layer(d),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&resolved)?);
            Ok(())
        }
        Command::Report { archive } => {
            let client = ReportClient::new(config.report_endpoint.clone());
            let card = client
                .fetch(&archive)
                .await
                .with_context(|| format!("fetching report {archive} from {}", client.endpoint()))?;
            for (field, value) in card.non_empty_fields() {
                println!("{field}: {value}");
            }
            Ok(())
        }
    }
}

fn resolve_config(args: &Args) -> anyhow::Result<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(url) = &args.tiles_url {
        config.tiles_base_url = url.clone();
    }
    if let Some(url) = &args.report_url {
        config.report_endpoint = url.clone();
    }
    Ok(config)
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<LayerCatalog> {
    let Some(path) = path else {
        return Ok(LayerCatalog::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    LayerCatalog::from_json_str(&raw).with_context(|| format!("loading catalog {}", path.display()))
}

async fn replay(
    config: &ViewerConfig,
    catalog: LayerCatalog,
    session: &Path,
    fetch_reports: bool,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(session)
        .with_context(|| format!("reading session {}", session.display()))?;
    let events = ViewerEvent::session_from_json_str(&raw)
        .with_context(|| format!("parsing session {}", session.display()))?;
    info!(events = events.len(), "replaying session");

    let mut viewer = Viewer::new(config, catalog, HeadlessMap::new());
    let client = ReportClient::new(config.report_endpoint.clone());

    for event in events {
        if matches!(event, ViewerEvent::MapLoaded) {
            viewer.map_mut().set_loaded(true);
        }
        viewer.dispatch(event);

        let requests = viewer.take_report_requests();
        if fetch_reports {
            for archive in requests {
                let result = client.fetch(&archive).await;
                viewer.apply_report_fetch(archive, result);
            }
        }
    }

    let out = json!({
        "viewer": viewer.summary(),
        "map": viewer.map(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
