//! Booking engine: room availability, stay pricing, reservations and
//! daily service capacity.

pub mod calculators;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod store;

#[cfg(test)]
pub(crate) mod memory;

// Re-export commonly used items
pub use calculators::{round_money, StayRange};
pub use routes::router;
pub use services::{calculate_price, check_availability, AvailabilityResult, StayQuote};
pub use store::{BookingStore, PgStore};
