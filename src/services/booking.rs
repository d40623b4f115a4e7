use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use super::locks::ShowLocks;
use crate::error::RejectionReason;
use crate::models::{Seat, SeatLayout};
use crate::store::{BookingStore, NewBooking, StoreError};

/// A booking attempt as handed to the admission pipeline.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub show_id: i64,
    pub customer_name: String,
    pub email: String,
    pub seats: Vec<Seat>,
}

/// Successful admission verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingConfirmation {
    pub booking_id: i64,
    pub total_amount: f64,
}

/// Advisory snapshot of a show's seat occupancy, for display only.
#[derive(Debug, Clone)]
pub struct ShowAvailability {
    pub layout: SeatLayout,
    pub occupied: HashSet<String>,
}

/// Arbitrates contention over a show's seats.
///
/// All confirmed bookings are written through [`submit`](Self::submit), which
/// serializes the check-then-commit sequence per show. Admissions for
/// different shows run in parallel. Reads taken anywhere else, including
/// [`availability`](Self::availability), are stale-tolerant and must never
/// feed an admission decision.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    locks: Arc<ShowLocks>,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self {
            store,
            locks: Arc::new(ShowLocks::new()),
        }
    }

    /// The lock registry, exposed for instrumentation.
    pub fn locks(&self) -> &ShowLocks {
        &self.locks
    }

    /// Submits a booking and waits for a definitive verdict.
    ///
    /// When several requests race for an overlapping seat set, whichever
    /// acquires the show's lock first wins; the rest observe the seats as
    /// occupied and are rejected. There is no priority and no retry.
    pub async fn submit(
        &self,
        request: BookingRequest,
    ) -> Result<BookingConfirmation, RejectionReason> {
        // Cheap validation runs before any lock or ledger read.
        validate(&request)?;

        let lock = self.locks.lock_for(request.show_id);
        let _guard = lock.lock().await;
        self.admit(&request).await
    }

    /// The check-then-commit critical section. Caller holds the show's lock.
    async fn admit(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, RejectionReason> {
        let show = self
            .store
            .get_show(request.show_id)
            .await?
            .ok_or(RejectionReason::ShowNotFound(request.show_id))?;

        let layout = show.layout();
        if let Some(seat) = request.seats.iter().find(|s| !layout.contains(s)) {
            return Err(RejectionReason::InvalidRequest(format!(
                "seat {} is outside the hall layout",
                seat
            )));
        }

        // Fresh occupancy read under the lock. A cached view here is exactly
        // the staleness this lock exists to rule out.
        let occupied = self.occupied_seats(request.show_id).await?;

        let conflicting: Vec<String> = request
            .seats
            .iter()
            .map(Seat::key)
            .filter(|key| occupied.contains(key))
            .collect();
        if !conflicting.is_empty() {
            return Err(RejectionReason::SeatsUnavailable { conflicting });
        }

        let total_amount = request.seats.len() as f64 * show.ticket_price;
        let record = NewBooking {
            show_id: request.show_id,
            customer_name: request.customer_name.clone(),
            email: request.email.clone(),
            seats: request.seats.clone(),
            total_amount,
            confirmed: true,
            created_at: chrono::Utc::now(),
        };

        let booking_id = match self.store.create_booking(&record).await {
            Ok(id) => id,
            // The uniqueness backstop fired: contention, not infrastructure.
            Err(StoreError::DuplicateSeat) => {
                return Err(RejectionReason::SeatsUnavailable {
                    conflicting: request.seats.iter().map(Seat::key).collect(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            "Booking {} confirmed for show {} ({} seats, total {:.2})",
            booking_id,
            request.show_id,
            request.seats.len(),
            total_amount
        );
        Ok(BookingConfirmation {
            booking_id,
            total_amount,
        })
    }

    /// Occupied seat keys for a show: the union over its confirmed bookings.
    async fn occupied_seats(&self, show_id: i64) -> Result<HashSet<String>, StoreError> {
        let bookings = self.store.list_confirmed_bookings(show_id).await?;
        Ok(bookings
            .iter()
            .flat_map(|b| b.seats.iter().map(Seat::key))
            .collect())
    }

    /// Occupancy snapshot for seat-map rendering. Taken without the show
    /// lock; display readers tolerate staleness.
    pub async fn availability(&self, show_id: i64) -> Result<ShowAvailability, RejectionReason> {
        let show = self
            .store
            .get_show(show_id)
            .await?
            .ok_or(RejectionReason::ShowNotFound(show_id))?;
        let occupied = self.occupied_seats(show_id).await?;
        Ok(ShowAvailability {
            layout: show.layout(),
            occupied,
        })
    }
}

/// Preconditions checked before acquiring any exclusivity.
fn validate(request: &BookingRequest) -> Result<(), RejectionReason> {
    if request.customer_name.trim().is_empty() {
        return Err(RejectionReason::InvalidRequest(
            "customer_name is required".to_string(),
        ));
    }
    if request.email.trim().is_empty() {
        return Err(RejectionReason::InvalidRequest(
            "email is required".to_string(),
        ));
    }
    if request.seats.is_empty() {
        return Err(RejectionReason::InvalidRequest(
            "no seats selected".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(request.seats.len());
    for seat in &request.seats {
        if !seen.insert(seat.key()) {
            return Err(RejectionReason::InvalidRequest(format!(
                "seat {} listed more than once",
                seat
            )));
        }
    }
    Ok(())
}
