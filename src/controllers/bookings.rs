use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::error::RejectionReason;
use crate::models::Seat;
use crate::services::booking::BookingRequest;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings/{id}", get(get_booking))
}

// POST /api/bookings
#[derive(Debug, Deserialize, Validate)]
struct CreateBookingRequest {
    show_id: i64,
    #[validate(length(min = 1, message = "customer_name is required"))]
    customer_name: String,
    #[validate(email(message = "email must be a valid address"))]
    email: String,
    seats: Vec<Seat>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, RejectionReason> {
    req.validate()
        .map_err(|e| RejectionReason::InvalidRequest(e.to_string()))?;

    let show_id = req.show_id;
    let confirmation = state
        .bookings
        .submit(BookingRequest {
            show_id,
            customer_name: req.customer_name,
            email: req.email,
            seats: req.seats,
        })
        .await?;

    // The cached seat map is stale the moment a booking lands.
    state.seat_cache.invalidate(&format!("seats:{}", show_id));

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": {
                "booking_id": confirmation.booking_id,
                "total_amount": confirmation.total_amount,
            }
        })),
    ))
}

// GET /api/bookings/{id}
async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let booking = state
        .store
        .get_booking(id)
        .await
        .map_err(|e| {
            tracing::error!("get_booking store error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve booking".to_string(),
            )
        })?
        .ok_or((StatusCode::NOT_FOUND, "Booking not found".to_string()))?;

    Ok((StatusCode::OK, Json(json!({ "success": true, "data": booking }))))
}
