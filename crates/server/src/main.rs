//! Pokedex Server
//!
//! Presentation adapter around one feed: serves the consumer contract over
//! HTTP, or browses the catalog straight to the terminal.

mod api;

use anyhow::Context;
use axum::{routing::get, Json, Router};
use clap::{Parser, Subcommand};
use pokedex_core::config::TransportConfig;
use pokedex_core::feed::{Feed, FeedEvent};
use pokedex_core::models::Pokemon;
use pokedex_core::transport::HttpTransport;
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc};
use tokio::{
    net::TcpListener,
    sync::{broadcast, mpsc},
};
use tracing_subscriber::EnvFilter;

/// Application state
pub struct AppState {
    pub feed: Arc<Feed>,
    pub event_tx: broadcast::Sender<FeedEvent>,
}

pub type SharedState = Arc<AppState>;

#[derive(Parser, Clone)]
#[command(author, version, about = "Pokedex - infinite species catalog feed")]
struct Args {
    /// Catalog root (overrides POKEDEX_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Serve the feed over HTTP (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Print records page by page
    Browse {
        /// Maximum number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: usize,
    },
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Resolve transport configuration: defaults, then env, then flags
fn transport_config(base_url: Option<String>) -> anyhow::Result<TransportConfig> {
    let mut config = TransportConfig::from_env().context("Failed to read transport config")?;
    if let Some(url) = base_url {
        config = config.with_base_url(url);
    }
    Ok(config)
}

/// One terminal line per record
fn browse_line(pokemon: &Pokemon) -> String {
    format!(
        "#{:<5} {:<16} {}",
        pokemon.id,
        pokemon.display_name(),
        pokemon.type_names().join("/")
    )
}

async fn browse(config: TransportConfig, pages: usize) -> anyhow::Result<()> {
    let feed = Feed::new(Arc::new(HttpTransport::new(config)?));

    let mut printed = 0;
    for page in 0..pages {
        let issued = if page == 0 {
            feed.activate().await
        } else {
            feed.request_next_page().await
        };
        if !issued {
            break;
        }

        let view = feed.snapshot().await;
        for pokemon in &view.collection[printed..] {
            println!("{}", browse_line(pokemon));
        }
        printed = view.collection.len();

        if let Some(error) = view.error {
            anyhow::bail!(error);
        }
        if !view.has_more {
            println!("-- end of catalog ({} records)", printed);
            break;
        }
    }

    Ok(())
}

async fn serve(config: TransportConfig, port: u16) -> anyhow::Result<()> {
    let (event_tx, _) = broadcast::channel::<FeedEvent>(100);
    let (event_mpsc_tx, mut event_mpsc_rx) = mpsc::channel::<FeedEvent>(100);

    let transport = HttpTransport::new(config)?;
    let feed = Arc::new(Feed::new(Arc::new(transport)).with_event_channel(event_mpsc_tx));

    // Bridge events to broadcast
    let broadcast_tx = event_tx.clone();
    tokio::spawn(async move {
        while let Some(event) = event_mpsc_rx.recv().await {
            let _ = broadcast_tx.send(event);
        }
    });

    // Initial load on activation
    let initial = Arc::clone(&feed);
    tokio::spawn(async move {
        initial.activate().await;
    });

    let state: SharedState = Arc::new(AppState { feed, event_tx });

    let app = Router::new()
        .nest("/api/v1/feed", api::feed::feed_routes())
        .nest("/api/v1/pokemon", api::feed::pokemon_routes())
        .route("/health", get(health))
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("Pokedex server running at http://{}", addr);
    tracing::info!("  Feed:    /api/v1/feed, /next, /retry, /events");
    tracing::info!("  Pokemon: /api/v1/pokemon/:id");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = transport_config(args.base_url)?;

    match args.command {
        Some(CliCommand::Browse { pages }) => browse(config, pages).await,
        Some(CliCommand::Serve { port }) => serve(config, port).await,
        None => serve(config, 8080).await,
    }
}
