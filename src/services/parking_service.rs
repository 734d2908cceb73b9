//! Vehicle flow orchestration
//!
//! Drives the two sequences of the garage:
//! - incoming: allocate a spot, occupy it, open a ticket
//! - exiting: close the ticket with its fare, then release the spot
//!
//! Storage write failures halt the sequence and are reported as an outcome
//! rather than an error. Nothing already written is rolled back.

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::error::{ParkingError, Result, StorageError};
use crate::domain::types::{ParkingSpot, Ticket};
use crate::infra::metrics::Metrics;
use crate::io::input::InputSource;
use crate::io::storage::{SpotStore, TicketStore};
use crate::services::fare_calculator::FareCalculator;
use crate::services::loyalty::{has_prior_visit, VisitStage};
use crate::services::spot_allocator::SpotAllocator;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const REGISTRATION_PROMPT: &str =
    "Please type the vehicle registration number and press enter key";
pub const VEHICLE_TYPE_PROMPT: &str = "Please select vehicle type from menu\n1 CAR\n2 BIKE";

/// Result of an incoming sequence that got as far as touching storage
#[derive(Debug)]
pub enum IncomingOutcome {
    /// Spot occupied and ticket saved
    Parked {
        ticket: Ticket,
        /// The vehicle has visited before and will get the discount on exit
        recurring: bool,
    },
    /// Marking the spot occupied failed; no ticket was created
    SpotNotReserved { spot: ParkingSpot, error: StorageError },
    /// The spot is occupied but the ticket could not be saved
    TicketNotSaved { ticket: Ticket, error: StorageError },
}

/// Result of an exiting sequence that got as far as touching storage
#[derive(Debug)]
pub enum ExitingOutcome {
    /// Ticket closed and spot released
    Released { ticket: Ticket, discounted: bool },
    /// The closed ticket could not be persisted; the spot stays occupied
    TicketNotUpdated { ticket: Ticket, error: StorageError },
    /// Ticket closed but the spot could not be marked available
    SpotNotReleased { ticket: Ticket, error: StorageError },
}

/// Runs incoming and exiting sequences against the injected collaborators
pub struct ParkingService {
    input: Arc<dyn InputSource>,
    spots: Arc<dyn SpotStore>,
    tickets: Arc<dyn TicketStore>,
    allocator: SpotAllocator,
    fare_calculator: FareCalculator,
    clock: Arc<dyn Clock>,
    metrics: Arc<Metrics>,
}

impl ParkingService {
    pub fn new(
        input: Arc<dyn InputSource>,
        spots: Arc<dyn SpotStore>,
        tickets: Arc<dyn TicketStore>,
    ) -> Self {
        Self {
            input,
            allocator: SpotAllocator::new(spots.clone()),
            spots,
            tickets,
            fare_calculator: FareCalculator::new(),
            clock: Arc::new(SystemClock),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Replace the wall clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Share a metrics collector with the caller
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Read the vehicle type and return a free spot for it
    pub fn next_parking_spot_if_available(&self) -> Result<ParkingSpot> {
        self.input.prompt(VEHICLE_TYPE_PROMPT);
        let selection = self.input.read_selection()?;
        self.allocator.next_parking_spot(selection)
    }

    /// Park an arriving vehicle: (none) -> open ticket + occupied spot
    pub fn process_incoming_vehicle(&self) -> Result<IncomingOutcome> {
        self.incoming().inspect_err(|e| self.reject("incoming", e))
    }

    /// Release a leaving vehicle: open ticket -> closed ticket + free spot
    pub fn process_exiting_vehicle(&self) -> Result<ExitingOutcome> {
        self.exiting().inspect_err(|e| self.reject("exiting", e))
    }

    fn incoming(&self) -> Result<IncomingOutcome> {
        let reg = self.read_registration()?;
        let mut spot = self.next_parking_spot_if_available()?;
        let recurring = has_prior_visit(self.tickets.as_ref(), &reg, VisitStage::Arriving)?;

        spot.available = false;
        if let Err(error) = self.spots.update_parking(&spot) {
            error!(reg = %reg, spot_id = %spot.id, error = %error, "spot_reserve_failed");
            self.metrics.record_storage_failure();
            return Ok(IncomingOutcome::SpotNotReserved { spot, error });
        }

        let mut ticket = Ticket::open(spot, &reg, self.clock.now());
        match self.tickets.save_ticket(&ticket) {
            Ok(id) => {
                ticket.id = Some(id);
                self.metrics.record_parked();
                info!(
                    ticket_id = %id,
                    reg = %reg,
                    spot_id = ?ticket.spot_id(),
                    in_time = %ticket.in_time,
                    recurring = %recurring,
                    "vehicle_parked"
                );
                Ok(IncomingOutcome::Parked { ticket, recurring })
            }
            Err(error) => {
                // The spot stays occupied; nothing frees it automatically
                error!(
                    reg = %reg,
                    spot_id = ?ticket.spot_id(),
                    error = %error,
                    "ticket_save_failed"
                );
                self.metrics.record_storage_failure();
                Ok(IncomingOutcome::TicketNotSaved { ticket, error })
            }
        }
    }

    fn exiting(&self) -> Result<ExitingOutcome> {
        let reg = self.read_registration()?;
        // A closed ticket is terminal; its spot may already belong to someone else
        let mut ticket = self
            .tickets
            .get_ticket(&reg)?
            .filter(Ticket::is_open)
            .ok_or_else(|| ParkingError::NoOpenTicket(reg.clone()))?;
        let discounted = has_prior_visit(self.tickets.as_ref(), &reg, VisitStage::Departing)?;

        ticket.out_time = Some(self.clock.now());
        self.fare_calculator.calculate_fare_with_discount(&mut ticket, discounted)?;

        if let Err(error) = self.tickets.update_ticket(&ticket) {
            error!(
                reg = %reg,
                ticket_id = ?ticket.id,
                error = %error,
                "ticket_update_failed"
            );
            self.metrics.record_storage_failure();
            return Ok(ExitingOutcome::TicketNotUpdated { ticket, error });
        }

        if let Some(spot) = ticket.parking_spot.as_mut() {
            spot.available = true;
            if let Err(error) = self.spots.update_parking(spot) {
                error!(reg = %reg, spot_id = %spot.id, error = %error, "spot_release_failed");
                self.metrics.record_storage_failure();
                return Ok(ExitingOutcome::SpotNotReleased { ticket, error });
            }
        }

        self.metrics.record_exit(ticket.price, discounted);
        info!(
            ticket_id = ?ticket.id,
            reg = %reg,
            spot_id = ?ticket.spot_id(),
            price = %ticket.price,
            discounted = %discounted,
            "vehicle_exited"
        );
        Ok(ExitingOutcome::Released { ticket, discounted })
    }

    fn read_registration(&self) -> Result<String> {
        self.input.prompt(REGISTRATION_PROMPT);
        Ok(self.input.read_vehicle_registration_number()?)
    }

    fn reject(&self, sequence: &str, e: &ParkingError) {
        warn!(sequence = %sequence, error = %e, "sequence_rejected");
        self.metrics.record_rejected();
    }
}
