//! Storage interfaces for parking spots and tickets
//!
//! The vehicle flow talks to persistence only through these traits so any
//! backend (or a test double) can be plugged in.

use crate::domain::error::StorageError;
use crate::domain::types::{ParkingSpot, ParkingType, SpotId, Ticket, TicketId};

/// Spot storage
pub trait SpotStore: Send + Sync {
    /// Lowest-numbered free spot of the given category, `None` when full
    fn next_available_slot(&self, parking_type: &ParkingType) -> Result<Option<SpotId>, StorageError>;

    /// Persist the spot's availability flag
    fn update_parking(&self, spot: &ParkingSpot) -> Result<(), StorageError>;
}

/// Ticket storage
pub trait TicketStore: Send + Sync {
    /// Persist a new ticket, returning the id storage assigned to it
    fn save_ticket(&self, ticket: &Ticket) -> Result<TicketId, StorageError>;

    /// Open ticket for a registration, `None` once it has been closed
    fn get_ticket(&self, vehicle_reg_number: &str) -> Result<Option<Ticket>, StorageError>;

    /// Persist out time and price of an existing ticket
    fn update_ticket(&self, ticket: &Ticket) -> Result<(), StorageError>;

    /// Number of tickets ever recorded for a registration, open or closed
    fn count_tickets(&self, vehicle_reg_number: &str) -> Result<u32, StorageError>;
}

impl<T: SpotStore + ?Sized> SpotStore for std::sync::Arc<T> {
    fn next_available_slot(&self, parking_type: &ParkingType) -> Result<Option<SpotId>, StorageError> {
        (**self).next_available_slot(parking_type)
    }

    fn update_parking(&self, spot: &ParkingSpot) -> Result<(), StorageError> {
        (**self).update_parking(spot)
    }
}

impl<T: TicketStore + ?Sized> TicketStore for std::sync::Arc<T> {
    fn save_ticket(&self, ticket: &Ticket) -> Result<TicketId, StorageError> {
        (**self).save_ticket(ticket)
    }

    fn get_ticket(&self, vehicle_reg_number: &str) -> Result<Option<Ticket>, StorageError> {
        (**self).get_ticket(vehicle_reg_number)
    }

    fn update_ticket(&self, ticket: &Ticket) -> Result<(), StorageError> {
        (**self).update_ticket(ticket)
    }

    fn count_tickets(&self, vehicle_reg_number: &str) -> Result<u32, StorageError> {
        (**self).count_tickets(vehicle_reg_number)
    }
}
