//! Core booking calculation functions.
//!
//! Pure functions for date-range and pricing math - no database access.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::models::DailyRate;

/// Round money to `places` decimal places, halves away from zero.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use guesthouse_booking::booking::round_money;
///
/// assert_eq!(round_money(dec!(2.345), 2), dec!(2.35));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Two half-open intervals `[a_start, a_end)` and `[b_start, b_end)` intersect
/// iff `a_start < b_end && b_start < a_end`.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Longest stay accepted for a booking, a quote or a rate window.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// A stay of one or more nights: `[check_in, check_out)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    /// Returns `None` unless `check_in < check_out` and the stay is at most
    /// [`MAX_STAY_NIGHTS`] long.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Option<Self> {
        let nights = (check_out - check_in).num_days();
        (1..=MAX_STAY_NIGHTS).contains(&nights).then_some(Self {
            check_in,
            check_out,
        })
    }

    /// Wrap dates read back from storage without re-validating them.
    pub(crate) fn from_stored(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            check_in,
            check_out,
        }
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Whole calendar days between check-in and check-out.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Every occupied night, checkout excluded.
    pub fn night_dates(&self) -> impl Iterator<Item = NaiveDate> {
        let check_out = self.check_out;
        self.check_in.iter_days().take_while(move |d| *d < check_out)
    }

    pub fn contains_night(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date < self.check_out
    }

    pub fn overlaps(&self, other: &StayRange) -> bool {
        ranges_overlap(self.check_in, self.check_out, other.check_in, other.check_out)
    }
}

/// Parse a calendar date from `YYYY-MM-DD` or a timestamp, dropping the time of day.
///
/// Years outside `1..=9999` are rejected.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let date = if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        date
    } else if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        ts.date_naive()
    } else {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()?
            .date()
    };
    (1..=9999).contains(&date.year()).then_some(date)
}

/// Parse both ends of a stay. `None` if either date is malformed or the range is empty.
pub fn parse_stay(check_in: &str, check_out: &str) -> Option<StayRange> {
    StayRange::new(parse_calendar_date(check_in)?, parse_calendar_date(check_out)?)
}

/// Price charged for one night of a stay.
#[derive(Debug, Clone, PartialEq)]
pub struct NightlyCharge {
    pub date: NaiveDate,
    pub amount: Decimal,
    /// True when a daily rate replaced the base price.
    pub overridden: bool,
}

/// Build the date -> override price lookup for a stay.
///
/// Rates falling outside `[check_in, check_out)` are dropped even if the
/// caller passed them in.
pub fn build_rate_lookup(rates: &[DailyRate], stay: &StayRange) -> HashMap<NaiveDate, Decimal> {
    rates
        .iter()
        .filter(|r| stay.contains_night(r.rate_date))
        .map(|r| (r.rate_date, r.price))
        .collect()
}

/// Price every night of the stay from the base price and the override lookup.
pub fn price_nights(
    stay: &StayRange,
    base_price: Decimal,
    overrides: &HashMap<NaiveDate, Decimal>,
) -> Vec<NightlyCharge> {
    stay.night_dates()
        .map(|date| match overrides.get(&date) {
            Some(price) => NightlyCharge {
                date,
                amount: *price,
                overridden: true,
            },
            None => NightlyCharge {
                date,
                amount: base_price,
                overridden: false,
            },
        })
        .collect()
}

/// Sum of nightly charges, rounded to cents.
pub fn stay_total(nights: &[NightlyCharge]) -> Decimal {
    round_money(nights.iter().map(|n| n.amount).sum(), 2)
}

/// Whether one more booking fits under a daily service cap.
///
/// A disabled cap never blocks.
pub fn capacity_available(enabled: bool, current: i64, max_per_day: i32) -> bool {
    !enabled || current < i64::from(max_per_day)
}
