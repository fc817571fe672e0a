//! HTTP-API fuer die Raum-Verwaltung
//!
//! Kleine Axum-API neben dem Signaling-Protokoll: Raeume anlegen und
//! deren Existenz pruefen. Die Beitritts-Entscheidung selbst trifft
//! weiterhin das Signaling beim join-room.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::Duration;
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use luftpost_core::RaumId;
use luftpost_db::{RaumRepository, SqliteDb};

/// Axum-State fuer die Raum-API
#[derive(Clone)]
pub struct HttpState {
    pub db: Arc<SqliteDb>,
    /// Basis-URL fuer Transfer-Links, ohne abschliessenden Slash
    pub public_base_url: String,
    pub raum_lebensdauer: Duration,
}

/// Antwort auf POST /rooms
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaumErstelltAntwort {
    pub room_id: RaumId,
    pub link: String,
    pub expires_at: String,
}

/// Baut die HTTP-Anwendung mit allen Routen und Layern
pub fn app(state: HttpState) -> Router {
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/:id", get(get_room))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Startet den HTTP-Server auf der gegebenen Adresse
pub async fn starten(state: HttpState, bind_addr: String) -> anyhow::Result<()> {
    let app = app(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(adresse = %bind_addr, "HTTP-API gestartet");
    axum::serve(listener, app).await?;
    Ok(())
}

/// POST /rooms – Legt einen neuen Raum an
async fn create_room(State(state): State<HttpState>) -> Response {
    match state.db.erstellen(state.raum_lebensdauer).await {
        Ok(raum) => {
            tracing::info!(raum = %raum.id, "Raum angelegt");
            let antwort = RaumErstelltAntwort {
                room_id: raum.id,
                link: transfer_link(&state.public_base_url, raum.id),
                expires_at: raum.expires_at.to_rfc3339(),
            };
            (StatusCode::CREATED, Json(antwort)).into_response()
        }
        Err(e) => {
            tracing::error!(fehler = %e, "Raum konnte nicht angelegt werden");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Raum konnte nicht angelegt werden" })),
            )
                .into_response()
        }
    }
}

/// GET /rooms/:id – Prueft ob ein Raum existiert und beitretbar ist
async fn get_room(State(state): State<HttpState>, Path(id): Path<String>) -> Response {
    // Unparsebare IDs verhalten sich wie unbekannte Raeume
    let raum_id = match RaumId::from_str(&id) {
        Ok(id) => id,
        Err(_) => return Json(json!({ "exists": false })).into_response(),
    };

    match state.db.finden_aktiv(raum_id).await {
        Ok(raum) => Json(json!({ "exists": raum.is_some() })).into_response(),
        Err(e) => {
            tracing::error!(raum = %raum_id, fehler = %e, "Raum-Abfrage fehlgeschlagen");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Raum-Abfrage fehlgeschlagen" })),
            )
                .into_response()
        }
    }
}

/// GET /health – Health-Check-Endpunkt
async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Baut den Transfer-Link fuer einen Raum
fn transfer_link(base_url: &str, raum: RaumId) -> String {
    format!("{}/transfer/{}", base_url.trim_end_matches('/'), raum.0)
}
