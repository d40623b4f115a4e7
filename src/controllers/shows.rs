use axum::{
    body::Body,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::error::RejectionReason;
use crate::models::Show;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shows/{id}", get(show_detail))
        .route("/shows/{id}/seats", get(get_show_seats))
}

// GET /api/shows/{id}
async fn show_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let show = sqlx::query_as::<_, Show>(
        "SELECT id, movie_id, starts_at, hall_number, total_seats, ticket_price
         FROM shows
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("show_detail sql error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to retrieve show".to_string(),
        )
    })?
    .ok_or((StatusCode::NOT_FOUND, "Show not found".to_string()))?;

    Ok((StatusCode::OK, Json(json!({ "success": true, "data": show }))))
}

#[derive(Debug, Serialize)]
struct SeatStatus {
    row: char,
    number: i32,
    booked: bool,
}

// GET /api/shows/{id}/seats
//
// Stale-tolerant seat map for display. Admission decisions never read this;
// they take a fresh ledger scan under the show lock.
async fn get_show_seats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, RejectionReason> {
    let cache_key = format!("seats:{}", id);

    if let Some(cached_json) = state.seat_cache.get(&cache_key) {
        return Ok(Response::builder()
            .header("Content-Type", "application/json")
            .header("X-Cache", "HIT")
            .body(Body::from(cached_json))
            .unwrap());
    }

    let availability = state.bookings.availability(id).await?;

    let seats: Vec<SeatStatus> = availability
        .layout
        .seats()
        .map(|seat| SeatStatus {
            booked: availability.occupied.contains(&seat.key()),
            row: seat.row,
            number: seat.number,
        })
        .collect();

    let body = json!({ "success": true, "data": seats });
    let json_str = serde_json::to_string(&body).unwrap_or_else(|_| "{}".to_string());
    state.seat_cache.set(
        cache_key,
        json_str.clone(),
        Duration::from_secs(state.config.booking.seat_cache_ttl_secs),
    );

    Ok(Response::builder()
        .header("Content-Type", "application/json")
        .header("X-Cache", "MISS")
        .body(Body::from(json_str))
        .unwrap())
}
