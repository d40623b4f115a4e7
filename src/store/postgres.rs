use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use super::{BookingStore, NewBooking, StoreError};
use crate::models::{Booking, Seat, Show};

/// Postgres-backed seat ledger.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Groups joined booking/seat rows back into bookings, in id order.
fn group_booking_rows(rows: Vec<sqlx::postgres::PgRow>) -> Vec<Booking> {
    let mut map: BTreeMap<i64, Booking> = BTreeMap::new();
    for row in rows {
        let bid: i64 = row.get("bid");
        let entry = map.entry(bid).or_insert_with(|| Booking {
            id: bid,
            show_id: row.get("show_id"),
            customer_name: row.get("customer_name"),
            email: row.get("email"),
            seats: Vec::new(),
            total_amount: row.get("total_amount"),
            confirmed: row.get("confirmed"),
            created_at: row.get("created_at"),
        });
        let seat_row: Option<String> = row.try_get("seat_row").ok().flatten();
        let seat_number: Option<i32> = row.try_get("seat_number").ok().flatten();
        if let (Some(r), Some(n)) = (seat_row, seat_number) {
            if let Some(label) = r.chars().next() {
                entry.seats.push(Seat::new(label, n));
            }
        }
    }
    map.into_values().collect()
}

#[async_trait]
impl BookingStore for PostgresStore {
    async fn get_show(&self, show_id: i64) -> Result<Option<Show>, StoreError> {
        let show = sqlx::query_as::<_, Show>(
            "SELECT id, movie_id, starts_at, hall_number, total_seats, ticket_price
             FROM shows WHERE id = $1",
        )
        .bind(show_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(show)
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let booking_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO bookings (show_id, customer_name, email, total_amount, confirmed, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(booking.show_id)
        .bind(&booking.customer_name)
        .bind(&booking.email)
        .bind(booking.total_amount)
        .bind(booking.confirmed)
        .bind(booking.created_at)
        .fetch_one(&mut *tx)
        .await?;

        for seat in &booking.seats {
            let inserted = sqlx::query(
                "INSERT INTO booking_seats (booking_id, show_id, seat_row, seat_number)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(booking_id)
            .bind(booking.show_id)
            .bind(seat.row.to_string())
            .bind(seat.number)
            .execute(&mut *tx)
            .await;

            if let Err(e) = inserted {
                let _ = tx.rollback().await;
                return Err(if is_unique_violation(&e) {
                    StoreError::DuplicateSeat
                } else {
                    StoreError::Database(e)
                });
            }
        }

        tx.commit().await?;
        Ok(booking_id)
    }

    async fn list_confirmed_bookings(&self, show_id: i64) -> Result<Vec<Booking>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT b.id AS bid, b.show_id, b.customer_name, b.email,
                   b.total_amount, b.confirmed, b.created_at,
                   s.seat_row, s.seat_number
            FROM bookings b
            LEFT JOIN booking_seats s ON s.booking_id = b.id
            WHERE b.show_id = $1 AND b.confirmed = true
            ORDER BY b.id, s.seat_row, s.seat_number
            "#,
        )
        .bind(show_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_booking_rows(rows))
    }

    async fn get_booking(&self, booking_id: i64) -> Result<Option<Booking>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT b.id AS bid, b.show_id, b.customer_name, b.email,
                   b.total_amount, b.confirmed, b.created_at,
                   s.seat_row, s.seat_number
            FROM bookings b
            LEFT JOIN booking_seats s ON s.booking_id = b.id
            WHERE b.id = $1
            ORDER BY s.seat_row, s.seat_number
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_booking_rows(rows).into_iter().next())
    }

    async fn delete_stale_unconfirmed(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let result =
            sqlx::query("DELETE FROM bookings WHERE confirmed = false AND created_at < $1")
                .bind(cutoff)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
