use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::seat::Seat;

/// A confirmed or provisional purchase of seats for one show.
///
/// Bookings are created whole by the admission pipeline and never mutated
/// afterwards; the expiry sweep deletes unconfirmed ones past their grace
/// window. The seat sets of all confirmed bookings for a show are pairwise
/// disjoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub show_id: i64,
    pub customer_name: String,
    pub email: String,
    pub seats: Vec<Seat>,
    pub total_amount: f64,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}
