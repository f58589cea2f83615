//! Daily capacity for bookable services (excursions, transfers, laundry, mini-market)

use std::fmt;
use std::str::FromStr;

use sqlx::FromRow;

/// Parsed with [`FromStr`], which also accepts the legacy camelCase spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceType {
    Excursion,
    AirportTransfer,
    Laundry,
    Minimarket,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Excursion => "excursion",
            ServiceType::AirportTransfer => "airport_transfer",
            ServiceType::Laundry => "laundry",
            ServiceType::Minimarket => "minimarket",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "excursion" => Ok(ServiceType::Excursion),
            "airport_transfer" | "airportTransfer" | "transfer" => Ok(ServiceType::AirportTransfer),
            "laundry" => Ok(ServiceType::Laundry),
            "minimarket" | "miniMarket" | "mini_market" => Ok(ServiceType::Minimarket),
            other => Err(format!("Unknown service type: {}", other)),
        }
    }
}

/// ServiceCapacity from `service_capacity`
#[derive(Debug, Clone, FromRow)]
pub struct ServiceCapacity {
    pub service_type: String,
    pub max_per_day: i32,
    pub enabled: bool,
}
