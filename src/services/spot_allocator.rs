//! Spot allocation - turns a menu selection into a free spot

use crate::domain::error::{ParkingError, Result};
use crate::domain::types::{ParkingSpot, ParkingType};
use crate::io::storage::SpotStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Finds the next free spot for a requested vehicle category
pub struct SpotAllocator {
    spots: Arc<dyn SpotStore>,
}

impl SpotAllocator {
    pub fn new(spots: Arc<dyn SpotStore>) -> Self {
        Self { spots }
    }

    /// Allocate a spot for selection 1 (CAR) or 2 (BIKE).
    ///
    /// The returned spot is still marked available; occupying it is up to
    /// the caller.
    pub fn next_parking_spot(&self, selection: i32) -> Result<ParkingSpot> {
        let parking_type =
            ParkingType::from_selection(selection).ok_or(ParkingError::InvalidSelection(selection))?;

        match self.spots.next_available_slot(&parking_type)? {
            Some(id) => {
                debug!(spot_id = %id, parking_type = %parking_type, "spot_allocated");
                Ok(ParkingSpot::new(id, parking_type, true))
            }
            None => {
                warn!(parking_type = %parking_type, "garage_full");
                Err(ParkingError::NoAvailableSpot(parking_type))
            }
        }
    }
}
