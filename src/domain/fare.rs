//! Fare constants
//!
//! Rates are fixed at build time and are not read from configuration.

/// Hourly rate for a CAR spot
pub const CAR_RATE_PER_HOUR: f64 = 1.5;

/// Hourly rate for a BIKE spot
pub const BIKE_RATE_PER_HOUR: f64 = 1.0;

/// Multiplier applied to the fare of a recurring customer (5% off)
pub const DISCOUNT: f64 = 0.95;

/// Stays up to and including this many hours are free
pub const FREE_PARKING_HOURS: f64 = 0.5;

/// Milliseconds in one hour
pub const MS_PER_HOUR: f64 = 3_600_000.0;
