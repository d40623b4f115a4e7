pub mod booking;
pub mod movie;
pub mod seat;
pub mod show;

pub use booking::Booking;
pub use movie::Movie;
pub use seat::{Seat, SeatLayout};
pub use show::Show;
