//! # Feed API
//!
//! The feed's consumer contract over HTTP: snapshot, next-page and retry
//! triggers, lifecycle events, and single-record lookup.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
    routing::{get, post},
    Router,
};
use futures::stream::{self, Stream};
use serde::Serialize;
use std::convert::Infallible;

use pokedex_core::feed::FeedSnapshot;
use pokedex_core::models::{Pokemon, PokemonId};

use crate::SharedState;

/// Result of a next-page or retry trigger
#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    /// Whether a page load was actually issued
    pub issued: bool,
    pub snapshot: FeedSnapshot,
}

/// Flattened record for detail views
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PokemonDetail {
    pub id: PokemonId,
    pub name: String,
    pub image_url: Option<String>,
    pub height_m: f64,
    pub weight_kg: f64,
    pub types: Vec<String>,
    pub stats: Vec<StatView>,
    pub abilities: Vec<AbilityView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatView {
    pub name: String,
    pub base: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AbilityView {
    pub name: String,
    pub hidden: bool,
}

impl From<&Pokemon> for PokemonDetail {
    fn from(p: &Pokemon) -> Self {
        Self {
            id: p.id,
            name: p.display_name(),
            image_url: p.artwork_url().map(str::to_string),
            height_m: p.height_m(),
            weight_kg: p.weight_kg(),
            types: p.type_names().into_iter().map(str::to_string).collect(),
            stats: p
                .stats
                .iter()
                .map(|s| StatView {
                    name: s.stat.name.clone(),
                    base: s.base_stat,
                })
                .collect(),
            abilities: p
                .abilities
                .iter()
                .map(|a| AbilityView {
                    name: a.ability.name.clone(),
                    hidden: a.is_hidden,
                })
                .collect(),
        }
    }
}

pub fn feed_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_snapshot))
        .route("/next", post(next_page))
        .route("/retry", post(retry))
        .route("/events", get(events))
}

pub fn pokemon_routes() -> Router<SharedState> {
    Router::new().route("/:id", get(get_pokemon))
}

/// Current feed state
async fn get_snapshot(State(state): State<SharedState>) -> Json<FeedSnapshot> {
    Json(state.feed.snapshot().await)
}

/// Load the next page if allowed; responds once the load settles
async fn next_page(State(state): State<SharedState>) -> Json<TriggerResponse> {
    let issued = state.feed.request_next_page().await;
    Json(TriggerResponse {
        issued,
        snapshot: state.feed.snapshot().await,
    })
}

/// Re-attempt the last failed load
async fn retry(State(state): State<SharedState>) -> Json<TriggerResponse> {
    let issued = state.feed.retry().await;
    Json(TriggerResponse {
        issued,
        snapshot: state.feed.snapshot().await,
    })
}

/// One loaded record
async fn get_pokemon(State(state): State<SharedState>, Path(id): Path<PokemonId>) -> Response {
    match state.feed.get(id).await {
        Some(pokemon) => Json(PokemonDetail::from(&pokemon)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            format!("Pokemon #{} is not loaded", id),
        )
            .into_response(),
    }
}

/// SSE endpoint for feed events with heartbeat
async fn events(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_tx.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        let timeout = tokio::time::timeout(std::time::Duration::from_secs(15), rx.recv()).await;

        match timeout {
            Ok(Ok(event)) => {
                let json = serde_json::to_string(&event).unwrap_or_default();
                Some((Ok(Event::default().data(json)), rx))
            }
            // Lagged receivers skip ahead
            Ok(Err(tokio::sync::broadcast::error::RecvError::Lagged(n))) => {
                Some((Ok(Event::default().comment(format!("lagged {}", n))), rx))
            }
            Ok(Err(_)) => None,
            Err(_) => Some((Ok(Event::default().comment("heartbeat")), rx)),
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
