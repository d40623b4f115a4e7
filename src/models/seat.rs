use std::fmt;

use serde::{Deserialize, Serialize};

/// Row labels for the fixed eight-row hall layout. Single uppercase letters
/// only: seat keys concatenate row and number, so a digit in a row label
/// would make "A1" + seat 0 collide with "A" + seat 10.
pub const ROW_LABELS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// A (row, number) pair. Seats are not stored as entities; a show's layout
/// is derived on demand from its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seat {
    pub row: char,
    pub number: i32,
}

impl Seat {
    pub fn new(row: char, number: i32) -> Self {
        Self { row, number }
    }

    /// Key used by string-keyed occupancy maps, e.g. "B10".
    pub fn key(&self) -> String {
        format!("{}{}", self.row, self.number)
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.number)
    }
}

/// Partition of a show's capacity into rows.
#[derive(Debug, Clone)]
pub struct SeatLayout {
    rows: Vec<SeatRow>,
}

#[derive(Debug, Clone, Copy)]
pub struct SeatRow {
    pub label: char,
    pub seats: i32,
}

impl SeatLayout {
    /// Spreads `total_seats` across the eight rows: capacity/8 per row, with
    /// the remainder going one extra seat per row starting from row A
    /// (capacity 100 gives 13,13,13,13,12,12,12,12).
    pub fn for_capacity(total_seats: i32) -> Self {
        let base = total_seats / ROW_LABELS.len() as i32;
        let extra = total_seats % ROW_LABELS.len() as i32;
        let rows = ROW_LABELS
            .iter()
            .enumerate()
            .map(|(i, &label)| SeatRow {
                label,
                seats: base + if (i as i32) < extra { 1 } else { 0 },
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[SeatRow] {
        &self.rows
    }

    pub fn capacity(&self) -> i32 {
        self.rows.iter().map(|r| r.seats).sum()
    }

    pub fn contains(&self, seat: &Seat) -> bool {
        self.rows
            .iter()
            .any(|r| r.label == seat.row && seat.number >= 1 && seat.number <= r.seats)
    }

    /// All seats in row-major order, for seat-map rendering.
    pub fn seats(&self) -> impl Iterator<Item = Seat> + '_ {
        self.rows
            .iter()
            .flat_map(|r| (1..=r.seats).map(move |n| Seat::new(r.label, n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn capacity_100_spreads_remainder_across_front_rows() {
        let layout = SeatLayout::for_capacity(100);
        let sizes: Vec<i32> = layout.rows().iter().map(|r| r.seats).collect();
        assert_eq!(sizes, vec![13, 13, 13, 13, 12, 12, 12, 12]);
        assert_eq!(layout.capacity(), 100);
    }

    #[test]
    fn seat_keys_concatenate_row_and_number() {
        assert_eq!(Seat::new('B', 10).key(), "B10");
        assert_eq!(Seat::new('H', 1).to_string(), "H1");
    }

    #[test]
    fn layout_membership() {
        let layout = SeatLayout::for_capacity(100);
        assert!(layout.contains(&Seat::new('A', 13)));
        assert!(!layout.contains(&Seat::new('A', 14)));
        assert!(layout.contains(&Seat::new('E', 12)));
        assert!(!layout.contains(&Seat::new('E', 13)));
        assert!(!layout.contains(&Seat::new('Z', 1)));
        assert!(!layout.contains(&Seat::new('A', 0)));
    }

    proptest! {
        #[test]
        fn layout_accounts_for_every_seat_exactly_once(capacity in 1i32..=400) {
            let layout = SeatLayout::for_capacity(capacity);
            prop_assert_eq!(layout.capacity(), capacity);

            let keys: HashSet<String> = layout.seats().map(|s| s.key()).collect();
            prop_assert_eq!(keys.len() as i32, capacity);
        }
    }
}
