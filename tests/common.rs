#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;

use cinema_booking::models::{Seat, Show};
use cinema_booking::services::booking::{BookingRequest, BookingService};
use cinema_booking::store::memory::MemoryStore;

pub const TICKET_PRICE: f64 = 10.0;

pub fn seat(row: char, number: i32) -> Seat {
    Seat::new(row, number)
}

pub fn test_show(id: i64) -> Show {
    Show {
        id,
        movie_id: 1,
        starts_at: Utc::now() + Duration::hours(24),
        hall_number: 1,
        total_seats: 100,
        ticket_price: TICKET_PRICE,
    }
}

/// Service over a fresh in-memory ledger holding one capacity-100 show.
pub fn service_with_show(show_id: i64) -> (BookingService, Arc<MemoryStore>) {
    service_with_shows(&[show_id])
}

pub fn service_with_shows(show_ids: &[i64]) -> (BookingService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    for &id in show_ids {
        store.insert_show(test_show(id));
    }
    (BookingService::new(store.clone()), store)
}

pub fn request(show_id: i64, seats: Vec<Seat>) -> BookingRequest {
    BookingRequest {
        show_id,
        customer_name: Name().fake(),
        email: SafeEmail().fake(),
        seats,
    }
}
