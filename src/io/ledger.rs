//! Ticket ledger - appends closed tickets to a file
//!
//! Tickets are written in JSONL format (one JSON object per line) every time
//! a closed ticket is successfully updated in the wrapped store.

use crate::domain::error::StorageError;
use crate::domain::types::{Ticket, TicketId};
use crate::io::storage::TicketStore;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Ticket store decorator that records closed tickets to a JSONL file
pub struct LedgerTicketStore<S> {
    inner: S,
    file_path: PathBuf,
}

impl<S: TicketStore> LedgerTicketStore<S> {
    pub fn new(inner: S, file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        info!(file_path = %file_path.display(), "ledger_initialized");
        Self { inner, file_path }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Write a closed ticket to the ledger
    /// Returns true if successful, false otherwise
    pub fn record(&self, ticket: &Ticket) -> bool {
        let result = ticket
            .to_json()
            .map_err(StorageError::from)
            .and_then(|json| self.append_line(&json).map_err(StorageError::from));

        match result {
            Ok(()) => {
                info!(
                    ticket_id = ?ticket.id,
                    reg = %ticket.vehicle_reg_number,
                    price = %ticket.price,
                    "ticket_recorded"
                );
                true
            }
            Err(e) => {
                error!(
                    ticket_id = ?ticket.id,
                    error = %e,
                    "ticket_record_failed"
                );
                false
            }
        }
    }

    /// Append a line to the ledger file
    fn append_line(&self, line: &str) -> std::io::Result<()> {
        let path = self.file_path.as_path();

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        writeln!(file, "{}", line)?;
        debug!(file = %path.display(), bytes = %line.len(), "ledger_written");

        Ok(())
    }
}

impl<S: TicketStore> TicketStore for LedgerTicketStore<S> {
    fn save_ticket(&self, ticket: &Ticket) -> Result<TicketId, StorageError> {
        self.inner.save_ticket(ticket)
    }

    fn get_ticket(&self, vehicle_reg_number: &str) -> Result<Option<Ticket>, StorageError> {
        self.inner.get_ticket(vehicle_reg_number)
    }

    fn update_ticket(&self, ticket: &Ticket) -> Result<(), StorageError> {
        self.inner.update_ticket(ticket)?;
        if !ticket.is_open() {
            // A lost ledger line must not undo a committed update
            self.record(ticket);
        }
        Ok(())
    }

    fn count_tickets(&self, vehicle_reg_number: &str) -> Result<u32, StorageError> {
        self.inner.count_tickets(vehicle_reg_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ParkingSpot, ParkingType, SpotId};
    use crate::io::memory::MemoryStore;
    use chrono::{Duration, Utc};
    use std::fs;
    use tempfile::tempdir;

    fn closed_ticket(store: &impl TicketStore, reg: &str) -> Ticket {
        let now = Utc::now();
        let spot = ParkingSpot::new(SpotId(1), ParkingType::Car, false);
        let id = store.save_ticket(&Ticket::open(spot, reg, now - Duration::hours(2))).unwrap();
        let mut ticket = store.get_ticket(reg).unwrap().unwrap();
        assert_eq!(ticket.id, Some(id));
        ticket.out_time = Some(now);
        ticket.price = 3.0;
        ticket
    }

    #[test]
    fn test_update_closed_ticket_writes_line() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tickets.jsonl");
        let ledger = LedgerTicketStore::new(MemoryStore::with_layout(1, 0), &file_path);

        let ticket = closed_ticket(&ledger, "ABC");
        ledger.update_ticket(&ticket).unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert!(content.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed["reg"], "ABC");
        assert_eq!(parsed["price"], 3.0);
        assert_eq!(parsed["id"], 1);
    }

    #[test]
    fn test_open_ticket_not_recorded() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tickets.jsonl");
        let ledger = LedgerTicketStore::new(MemoryStore::with_layout(1, 0), &file_path);

        let spot = ParkingSpot::new(SpotId(1), ParkingType::Car, false);
        ledger.save_ticket(&Ticket::open(spot, "ABC", Utc::now())).unwrap();
        let ticket = ledger.get_ticket("ABC").unwrap().unwrap();
        ledger.update_ticket(&ticket).unwrap();

        assert!(!file_path.exists());
    }

    #[test]
    fn test_failed_update_not_recorded() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tickets.jsonl");
        let ledger = LedgerTicketStore::new(MemoryStore::with_layout(1, 0), &file_path);

        let mut ticket =
            Ticket::open(ParkingSpot::new(SpotId(1), ParkingType::Car, false), "ABC", Utc::now());
        ticket.out_time = Some(Utc::now());

        assert!(ledger.update_ticket(&ticket).is_err());
        assert!(!file_path.exists());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let nested_path = dir.path().join("nested").join("dir").join("tickets.jsonl");
        let ledger = LedgerTicketStore::new(MemoryStore::with_layout(1, 0), &nested_path);

        let ticket = closed_ticket(&ledger, "ABC");
        ledger.update_ticket(&ticket).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_append_mode() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tickets.jsonl");
        fs::write(&file_path, "{\"existing\":\"data\"}\n").unwrap();

        let ledger = LedgerTicketStore::new(MemoryStore::with_layout(1, 0), &file_path);
        let ticket = closed_ticket(&ledger, "ABC");
        ledger.update_ticket(&ticket).unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("existing"));
        assert!(lines[1].contains("ABC"));
    }

    #[test]
    fn test_ledger_failure_does_not_fail_update() {
        let dir = tempdir().unwrap();
        // A directory in place of the file makes the append fail
        let file_path = dir.path().join("tickets.jsonl");
        fs::create_dir(&file_path).unwrap();

        let ledger = LedgerTicketStore::new(MemoryStore::with_layout(1, 0), &file_path);
        let ticket = closed_ticket(&ledger, "ABC");

        assert!(ledger.update_ticket(&ticket).is_ok());
        assert!(!ledger.record(&ticket));
        assert_eq!(ledger.inner().tickets_for("ABC")[0].price, 3.0);
    }
}
