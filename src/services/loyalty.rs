//! Recurring customer detection
//!
//! A vehicle is a recurring customer when its registration already has a
//! ticket history. On arrival nothing has been saved for the current visit
//! yet; on departure the visit's own ticket is already counted, so it is
//! excluded.

use crate::domain::error::StorageError;
use crate::io::storage::TicketStore;
use tracing::debug;

/// Which point of the visit the check is made at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitStage {
    /// Before the current visit's ticket is saved
    Arriving,
    /// The current visit's ticket is already on record
    Departing,
}

impl VisitStage {
    /// Tickets on record that belong to the visit being processed
    #[inline]
    fn own_tickets(self) -> u32 {
        match self {
            VisitStage::Arriving => 0,
            VisitStage::Departing => 1,
        }
    }
}

/// True if the registration has at least one ticket besides the current visit
pub fn has_prior_visit(
    tickets: &dyn TicketStore,
    vehicle_reg_number: &str,
    stage: VisitStage,
) -> Result<bool, StorageError> {
    let count = tickets.count_tickets(vehicle_reg_number)?;
    let recurring = count > stage.own_tickets();

    debug!(
        reg = %vehicle_reg_number,
        tickets = %count,
        stage = ?stage,
        recurring = %recurring,
        "prior_visit_checked"
    );

    Ok(recurring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Ticket, TicketId};

    /// Ticket store that only knows how many tickets a registration has
    struct Counted(u32);

    impl TicketStore for Counted {
        fn save_ticket(&self, _ticket: &Ticket) -> Result<TicketId, StorageError> {
            Ok(TicketId(1))
        }

        fn get_ticket(&self, _reg: &str) -> Result<Option<Ticket>, StorageError> {
            Ok(None)
        }

        fn update_ticket(&self, _ticket: &Ticket) -> Result<(), StorageError> {
            Ok(())
        }

        fn count_tickets(&self, _reg: &str) -> Result<u32, StorageError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_arriving_first_visit() {
        assert!(!has_prior_visit(&Counted(0), "ABC", VisitStage::Arriving).unwrap());
    }

    #[test]
    fn test_arriving_with_history() {
        assert!(has_prior_visit(&Counted(1), "ABC", VisitStage::Arriving).unwrap());
        assert!(has_prior_visit(&Counted(5), "ABC", VisitStage::Arriving).unwrap());
    }

    #[test]
    fn test_departing_only_own_ticket() {
        assert!(!has_prior_visit(&Counted(1), "ABC", VisitStage::Departing).unwrap());
        assert!(!has_prior_visit(&Counted(0), "ABC", VisitStage::Departing).unwrap());
    }

    #[test]
    fn test_departing_with_history() {
        assert!(has_prior_visit(&Counted(2), "ABC", VisitStage::Departing).unwrap());
    }
}
