//! Domain models - core parking types, fare constants and errors
//!
//! This module contains the canonical data types used throughout the system:
//! - `ParkingSpot` - a numbered spot and its availability
//! - `Ticket` - a vehicle's stay, open until it leaves
//! - `ParkingType` - CAR / BIKE spot category
//! - `ParkingError` - conditions that abort a vehicle sequence

pub mod clock;
pub mod error;
pub mod fare;
pub mod types;

// Re-export commonly used types at module level
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{InputError, ParkingError, StorageError};
pub use types::{ParkingSpot, ParkingType, SpotId, Ticket, TicketId};
