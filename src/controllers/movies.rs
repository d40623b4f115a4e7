use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::models::{Movie, Show};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/{id}", get(movie_detail))
}

// GET /api/movies
async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let movies = sqlx::query_as::<_, Movie>(
        "SELECT id, title, description, duration_minutes, genre, image_url
         FROM movies
         ORDER BY title",
    )
    .fetch_all(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("list_movies sql error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to retrieve movies".to_string(),
        )
    })?;

    Ok((StatusCode::OK, Json(json!({ "success": true, "data": movies }))))
}

// GET /api/movies/{id}
async fn movie_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let movie = sqlx::query_as::<_, Movie>(
        "SELECT id, title, description, duration_minutes, genre, image_url
         FROM movies
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("movie_detail sql error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to retrieve movie".to_string(),
        )
    })?
    .ok_or((StatusCode::NOT_FOUND, "Movie not found".to_string()))?;

    let shows = sqlx::query_as::<_, Show>(
        "SELECT id, movie_id, starts_at, hall_number, total_seats, ticket_price
         FROM shows
         WHERE movie_id = $1
         ORDER BY starts_at",
    )
    .bind(id)
    .fetch_all(&state.db.pool)
    .await
    .map_err(|e| {
        tracing::error!("movie_detail shows sql error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to retrieve shows".to_string(),
        )
    })?;

    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "data": { "movie": movie, "shows": shows } })),
    ))
}
