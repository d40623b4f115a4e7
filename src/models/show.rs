use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::seat::SeatLayout;

/// A single screening of a movie. Immutable for booking purposes: capacity
/// and price do not change once the show is open for booking.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Show {
    pub id: i64,
    pub movie_id: i64,
    pub starts_at: DateTime<Utc>,
    pub hall_number: i32,
    pub total_seats: i32,
    pub ticket_price: f64,
}

impl Show {
    pub fn layout(&self) -> SeatLayout {
        SeatLayout::for_capacity(self.total_seats)
    }
}
