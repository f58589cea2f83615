//! Routes outside the booking API

pub mod health;
