//! Database models for rooms, reservations, rates and service capacity.

pub mod daily_rate;
pub mod reservation;
pub mod room;
pub mod service;

pub use daily_rate::DailyRate;
pub use reservation::{NewReservation, Reservation, ReservationStatus};
pub use room::Room;
pub use service::{ServiceCapacity, ServiceType};
