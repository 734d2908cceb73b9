//! Fare calculation for closed tickets
//!
//! Price is proportional to the stay, with a free first half hour and a 5%
//! discount for recurring customers:
//! - duration <= 0.5h: free
//! - otherwise: hours * hourly rate of the spot category
//! - discount: price * 0.95

use crate::domain::error::{ParkingError, Result};
use crate::domain::fare::{
    BIKE_RATE_PER_HOUR, CAR_RATE_PER_HOUR, DISCOUNT, FREE_PARKING_HOURS, MS_PER_HOUR,
};
use crate::domain::types::{ParkingType, Ticket};
use tracing::debug;

/// Computes and stores the price of a ticket being closed
#[derive(Debug, Default, Clone, Copy)]
pub struct FareCalculator;

impl FareCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Calculate the fare without discount
    pub fn calculate_fare(&self, ticket: &mut Ticket) -> Result<()> {
        self.calculate_fare_with_discount(ticket, false)
    }

    /// Calculate the fare and write it to `ticket.price`.
    ///
    /// The ticket is left untouched when an error is returned.
    pub fn calculate_fare_with_discount(&self, ticket: &mut Ticket, discount: bool) -> Result<()> {
        let out_time = match ticket.out_time {
            Some(out) if out >= ticket.in_time => out,
            out_time => {
                return Err(ParkingError::InvalidTimeRange { in_time: ticket.in_time, out_time });
            }
        };

        let parking_type = ticket
            .parking_spot
            .as_ref()
            .and_then(|spot| spot.parking_type.as_ref())
            .ok_or(ParkingError::InvalidCategory)?;

        let duration_ms = (out_time - ticket.in_time).num_milliseconds();
        let hours = duration_ms as f64 / MS_PER_HOUR;

        if hours <= FREE_PARKING_HOURS {
            debug!(reg = %ticket.vehicle_reg_number, hours = %hours, "fare_free_window");
            ticket.price = 0.0;
            return Ok(());
        }

        let rate = match parking_type {
            ParkingType::Car => CAR_RATE_PER_HOUR,
            ParkingType::Bike => BIKE_RATE_PER_HOUR,
            ParkingType::Unknown(code) => {
                return Err(ParkingError::UnsupportedCategory(code.clone()));
            }
        };

        let mut price = hours * rate;
        if discount {
            price *= DISCOUNT;
        }

        debug!(
            reg = %ticket.vehicle_reg_number,
            parking_type = %parking_type,
            hours = %hours,
            discount = %discount,
            price = %price,
            "fare_calculated"
        );

        ticket.price = price;
        Ok(())
    }
}
