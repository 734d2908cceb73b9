//! Services - business logic
//!
//! This module contains the core business logic services:
//! - `fare_calculator` - Prices a closed ticket
//! - `spot_allocator` - Finds a free spot for a vehicle category
//! - `loyalty` - Recurring customer detection
//! - `parking_service` - Incoming/exiting vehicle orchestration

pub mod fare_calculator;
pub mod loyalty;
pub mod parking_service;
pub mod spot_allocator;

// Re-export commonly used types
pub use fare_calculator::FareCalculator;
pub use parking_service::{ExitingOutcome, IncomingOutcome, ParkingService};
pub use spot_allocator::SpotAllocator;
