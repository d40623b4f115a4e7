use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{BookingStore, NewBooking, StoreError};
use crate::models::{Booking, Seat, Show};

/// In-process seat ledger.
///
/// Backs the test suite and any deployment that can live without durability.
/// Enforces the same (show, seat) uniqueness backstop as the relational
/// schema.
pub struct MemoryStore {
    shows: RwLock<HashMap<i64, Show>>,
    bookings: RwLock<HashMap<i64, Booking>>,
    next_booking_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            shows: RwLock::new(HashMap::new()),
            bookings: RwLock::new(HashMap::new()),
            next_booking_id: AtomicI64::new(1),
        }
    }

    pub fn insert_show(&self, show: Show) {
        self.shows.write().insert(show.id, show);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn get_show(&self, show_id: i64) -> Result<Option<Show>, StoreError> {
        Ok(self.shows.read().get(&show_id).cloned())
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<i64, StoreError> {
        let mut bookings = self.bookings.write();

        // Uniqueness backstop: every persisted seat row counts, confirmed or
        // not, matching the unique index in the relational schema.
        let taken: HashSet<String> = bookings
            .values()
            .filter(|b| b.show_id == booking.show_id)
            .flat_map(|b| b.seats.iter().map(Seat::key))
            .collect();
        if booking.seats.iter().any(|s| taken.contains(&s.key())) {
            return Err(StoreError::DuplicateSeat);
        }

        let id = self.next_booking_id.fetch_add(1, Ordering::Relaxed);
        bookings.insert(
            id,
            Booking {
                id,
                show_id: booking.show_id,
                customer_name: booking.customer_name.clone(),
                email: booking.email.clone(),
                seats: booking.seats.clone(),
                total_amount: booking.total_amount,
                confirmed: booking.confirmed,
                created_at: booking.created_at,
            },
        );
        Ok(id)
    }

    async fn list_confirmed_bookings(&self, show_id: i64) -> Result<Vec<Booking>, StoreError> {
        let mut out: Vec<Booking> = self
            .bookings
            .read()
            .values()
            .filter(|b| b.show_id == show_id && b.confirmed)
            .cloned()
            .collect();
        out.sort_by_key(|b| b.id);
        Ok(out)
    }

    async fn get_booking(&self, booking_id: i64) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings.read().get(&booking_id).cloned())
    }

    async fn delete_stale_unconfirmed(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut bookings = self.bookings.write();
        let before = bookings.len();
        bookings.retain(|_, b| b.confirmed || b.created_at >= cutoff);
        Ok((before - bookings.len()) as u64)
    }
}
