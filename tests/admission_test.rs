mod common;

use std::collections::HashSet;

use futures::future::join_all;
use tokio::time::{timeout, Duration};

use cinema_booking::error::RejectionReason;
use cinema_booking::models::{Seat, SeatLayout};
use cinema_booking::store::BookingStore;

use common::{request, seat, service_with_show, service_with_shows, TICKET_PRICE};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_for_same_seat_confirm_exactly_once() {
    let (service, store) = service_with_show(1);

    // Five concurrent requests, all asking for seat B10 alone.
    let attempts = (0..5).map(|_| {
        let service = service.clone();
        tokio::spawn(async move { service.submit(request(1, vec![seat('B', 10)])).await })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|r| r.expect("booking task panicked"))
        .collect();

    let confirmed = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(confirmed, 1, "exactly one request may win seat B10");

    for result in &results {
        if let Err(reason) = result {
            assert!(
                matches!(reason, RejectionReason::SeatsUnavailable { .. }),
                "losers must see SeatsUnavailable, got: {reason}"
            );
        }
    }

    // The ledger holds B10 exactly once.
    let bookings = store.list_confirmed_bookings(1).await.unwrap();
    let b10_count = bookings
        .iter()
        .flat_map(|b| b.seats.iter())
        .filter(|s| s.key() == "B10")
        .count();
    assert_eq!(b10_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn confirmed_seat_sets_stay_pairwise_disjoint() {
    let (service, store) = service_with_show(1);

    // Overlapping windows of three seats each: request i shares a seat with
    // requests i-1 and i+1, so plenty of contention on the boundaries.
    let all_seats: Vec<Seat> = SeatLayout::for_capacity(100).seats().collect();
    let attempts = (0..20usize).map(|i| {
        let service = service.clone();
        let seats = all_seats[i * 2..i * 2 + 3].to_vec();
        tokio::spawn(async move { service.submit(request(1, seats)).await })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|r| r.expect("booking task panicked"))
        .collect();

    for result in &results {
        if let Err(reason) = result {
            assert!(matches!(reason, RejectionReason::SeatsUnavailable { .. }));
        }
    }

    let bookings = store.list_confirmed_bookings(1).await.unwrap();
    assert_eq!(
        bookings.len(),
        results.iter().filter(|r| r.is_ok()).count(),
        "every confirmation corresponds to one ledger booking"
    );

    let all_booked: Vec<String> = bookings
        .iter()
        .flat_map(|b| b.seats.iter().map(Seat::key))
        .collect();
    let unique: HashSet<&String> = all_booked.iter().collect();
    assert_eq!(
        unique.len(),
        all_booked.len(),
        "no seat may appear in two confirmed bookings"
    );
}

#[tokio::test]
async fn booking_amount_is_seat_count_times_ticket_price() {
    let (service, store) = service_with_show(1);

    let confirmation = service
        .submit(request(1, vec![seat('A', 1), seat('A', 2)]))
        .await
        .unwrap();
    assert_eq!(confirmation.total_amount, 2.0 * TICKET_PRICE);

    let booking = store
        .get_booking(confirmation.booking_id)
        .await
        .unwrap()
        .unwrap();
    assert!(booking.confirmed);
    assert_eq!(booking.seats.len(), 2);
    assert_eq!(booking.total_amount, 20.0);
}

#[tokio::test]
async fn rejected_request_rejects_the_same_way_again() {
    let (service, _store) = service_with_show(1);

    service
        .submit(request(1, vec![seat('A', 1), seat('A', 2)]))
        .await
        .unwrap();

    let attempt = || request(1, vec![seat('A', 2), seat('A', 3)]);

    let first = service.submit(attempt()).await.unwrap_err();
    let second = service.submit(attempt()).await.unwrap_err();
    for reason in [first, second] {
        match reason {
            RejectionReason::SeatsUnavailable { conflicting } => {
                assert_eq!(conflicting, vec!["A2".to_string()]);
            }
            other => panic!("expected SeatsUnavailable, got: {other}"),
        }
    }
}

#[tokio::test]
async fn empty_seat_list_never_touches_the_lock_registry() {
    let (service, _store) = service_with_show(1);

    let reason = service.submit(request(1, vec![])).await.unwrap_err();
    assert!(matches!(reason, RejectionReason::InvalidRequest(_)));
    assert_eq!(service.locks().acquisitions(), 0);
    assert!(service.locks().is_empty());
}

#[tokio::test]
async fn duplicate_seats_in_one_request_are_rejected() {
    let (service, store) = service_with_show(1);

    let reason = service
        .submit(request(1, vec![seat('B', 1), seat('B', 1)]))
        .await
        .unwrap_err();
    assert!(matches!(reason, RejectionReason::InvalidRequest(_)));
    assert_eq!(service.locks().acquisitions(), 0);
    assert!(store.list_confirmed_bookings(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_customer_name_is_rejected() {
    let (service, _store) = service_with_show(1);

    let mut req = request(1, vec![seat('C', 4)]);
    req.customer_name = "   ".to_string();

    let reason = service.submit(req).await.unwrap_err();
    assert!(matches!(reason, RejectionReason::InvalidRequest(_)));
    assert_eq!(service.locks().acquisitions(), 0);
}

#[tokio::test]
async fn unknown_show_is_rejected() {
    let (service, _store) = service_with_show(1);

    let reason = service
        .submit(request(99, vec![seat('A', 1)]))
        .await
        .unwrap_err();
    assert!(matches!(reason, RejectionReason::ShowNotFound(99)));
}

#[tokio::test]
async fn seat_outside_the_hall_layout_is_rejected() {
    let (service, _store) = service_with_show(1);

    // Row A of a capacity-100 hall has 13 seats.
    for bad in [seat('A', 14), seat('Z', 1), seat('A', 0)] {
        let reason = service.submit(request(1, vec![bad])).await.unwrap_err();
        assert!(matches!(reason, RejectionReason::InvalidRequest(_)));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn admissions_for_different_shows_do_not_block_each_other() {
    let (service, _store) = service_with_shows(&[1, 2]);

    // Park on show 1's lock, then book show 2. The second show must not wait.
    let lock = service.locks().lock_for(1);
    let _guard = lock.lock().await;

    let verdict = timeout(
        Duration::from_secs(1),
        service.submit(request(2, vec![seat('A', 1)])),
    )
    .await
    .expect("show 2 admission must not wait on show 1's lock");
    assert!(verdict.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn admissions_for_the_same_show_are_serialized() {
    let (service, _store) = service_with_show(1);

    let lock = service.locks().lock_for(1);
    let guard = lock.lock().await;

    // While the show lock is held, an admission for that show cannot finish.
    let blocked = timeout(
        Duration::from_millis(200),
        service.submit(request(1, vec![seat('A', 1)])),
    )
    .await;
    assert!(blocked.is_err(), "admission must queue behind the show lock");

    drop(guard);
    let verdict = service.submit(request(1, vec![seat('A', 1)])).await;
    assert!(verdict.is_ok());
}
