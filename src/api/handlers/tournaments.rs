use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::handlers::AppState;
use crate::api::models::MapTournament;
use crate::domain::TournamentRecord;
use crate::filter::TournamentFilters;

/// All tournaments with coordinates, shaped for map display.
pub async fn get_tournaments(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // The full projection is needed here: the map payload (categories,
    // per-event details) is rebuilt from the raw column.
    let records = state.store.load(&TournamentFilters::default(), false);

    let map_data: Vec<MapTournament> = records
        .iter()
        .filter_map(|record| parse_raw(record))
        .filter_map(|raw| MapTournament::from_raw(&raw))
        .collect();

    info!("Returning {} tournaments", map_data.len());
    Json(map_data).into_response()
}

/// Full raw payload for one tournament (debugging aid).
pub async fn get_tournament_detail(
    State(state): State<Arc<AppState>>,
    Path(tournament_id): Path<String>,
) -> impl IntoResponse {
    let records = state.store.load(&TournamentFilters::default(), false);

    let Some(record) = records.iter().find(|record| record.id == tournament_id) else {
        return (
            StatusCode::NOT_FOUND,
            format!("Tournament {tournament_id} not found"),
        )
            .into_response();
    };

    match parse_raw(record) {
        Some(raw) => {
            info!("Returning full data for tournament: {}", record.name);
            Json(raw).into_response()
        }
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Stored payload is not valid JSON".to_string(),
        )
            .into_response(),
    }
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

fn parse_raw(record: &TournamentRecord) -> Option<Value> {
    match serde_json::from_str(&record.raw) {
        Ok(value) => Some(value),
        Err(e) => {
            error!("Corrupt raw payload for tournament {}: {e}", record.id);
            None
        }
    }
}
