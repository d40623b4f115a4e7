//! Seat ledger contracts and implementations.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Booking, Seat, Show};

/// Ledger failure surfaced to the admission pipeline.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The (show, seat) uniqueness backstop fired during persistence. The
    /// per-show admission lock makes this unreachable in normal operation.
    #[error("seat already booked for this show")]
    DuplicateSeat,
}

/// A booking as submitted for persistence. Written whole or not at all;
/// partial seat assignment is never persisted.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub show_id: i64,
    pub customer_name: String,
    pub email: String,
    pub seats: Vec<Seat>,
    pub total_amount: f64,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// Durable record of shows and seat occupancy.
///
/// Confirmed bookings written through this trait form the ledger the
/// admission pipeline reads under the show lock; reads taken anywhere else
/// are advisory.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn get_show(&self, show_id: i64) -> Result<Option<Show>, StoreError>;

    async fn create_booking(&self, booking: &NewBooking) -> Result<i64, StoreError>;

    async fn list_confirmed_bookings(&self, show_id: i64) -> Result<Vec<Booking>, StoreError>;

    async fn get_booking(&self, booking_id: i64) -> Result<Option<Booking>, StoreError>;

    /// Deletes unconfirmed bookings created before `cutoff`, reclaiming
    /// their seats. Returns the number of bookings removed.
    async fn delete_stale_unconfirmed(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;
}
