//! In-memory garage store
//!
//! Holds both the spot table and the ticket table. Spots are seeded once
//! from the garage layout; tickets get sequential ids on save.

use crate::domain::error::StorageError;
use crate::domain::types::{ParkingSpot, ParkingType, SpotId, Ticket, TicketId};
use crate::io::storage::{SpotStore, TicketStore};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tracing::debug;

/// Garage state guarded by a single lock
#[derive(Default)]
struct Tables {
    /// Spots ordered by number so the first free one is found first
    spots: BTreeMap<SpotId, ParkingSpot>,
    tickets: Vec<Ticket>,
    /// Ticket indices by registration for history lookups
    by_reg: FxHashMap<String, Vec<usize>>,
    next_ticket_id: u64,
}

/// Spot and ticket storage kept in process memory
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { tables: Mutex::new(Tables { next_ticket_id: 1, ..Default::default() }) }
    }

    /// Create a garage with `car_spots` CAR spots numbered from 1,
    /// followed by `bike_spots` BIKE spots
    pub fn with_layout(car_spots: u32, bike_spots: u32) -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.lock();
            for n in 1..=car_spots {
                let id = SpotId(n);
                tables.spots.insert(id, ParkingSpot::new(id, ParkingType::Car, true));
            }
            // Bike numbers that would overflow past u32::MAX are not seeded
            for number in (1..=bike_spots).map_while(|n| car_spots.checked_add(n)) {
                let id = SpotId(number);
                tables.spots.insert(id, ParkingSpot::new(id, ParkingType::Bike, true));
            }
        }
        debug!(car_spots = %car_spots, bike_spots = %bike_spots, "garage_seeded");
        store
    }

    /// Add or replace a spot
    pub fn insert_spot(&self, spot: ParkingSpot) {
        self.tables.lock().spots.insert(spot.id, spot);
    }

    /// Current state of a spot
    pub fn spot(&self, id: SpotId) -> Option<ParkingSpot> {
        self.tables.lock().spots.get(&id).cloned()
    }

    /// All tickets recorded for a registration, oldest first
    pub fn tickets_for(&self, vehicle_reg_number: &str) -> Vec<Ticket> {
        let tables = self.tables.lock();
        tables
            .by_reg
            .get(vehicle_reg_number)
            .map(|indices| indices.iter().map(|&i| tables.tickets[i].clone()).collect())
            .unwrap_or_default()
    }

    /// Number of free spots per category (car, bike)
    pub fn free_spots(&self) -> (usize, usize) {
        let tables = self.tables.lock();
        let free = |t: ParkingType| {
            tables
                .spots
                .values()
                .filter(|s| s.available && s.parking_type.as_ref() == Some(&t))
                .count()
        };
        (free(ParkingType::Car), free(ParkingType::Bike))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SpotStore for MemoryStore {
    fn next_available_slot(&self, parking_type: &ParkingType) -> Result<Option<SpotId>, StorageError> {
        let tables = self.tables.lock();
        Ok(tables
            .spots
            .values()
            .find(|s| s.available && s.parking_type.as_ref() == Some(parking_type))
            .map(|s| s.id))
    }

    fn update_parking(&self, spot: &ParkingSpot) -> Result<(), StorageError> {
        let mut tables = self.tables.lock();
        let stored = tables.spots.get_mut(&spot.id).ok_or(StorageError::UnknownSpot(spot.id.0))?;
        stored.available = spot.available;
        debug!(spot_id = %spot.id, available = %spot.available, "spot_updated");
        Ok(())
    }
}

impl TicketStore for MemoryStore {
    fn save_ticket(&self, ticket: &Ticket) -> Result<TicketId, StorageError> {
        let mut tables = self.tables.lock();
        let id = TicketId(tables.next_ticket_id);
        tables.next_ticket_id += 1;

        let mut stored = ticket.clone();
        stored.id = Some(id);
        let index = tables.tickets.len();
        tables.tickets.push(stored);
        tables.by_reg.entry(ticket.vehicle_reg_number.clone()).or_default().push(index);

        debug!(ticket_id = %id, reg = %ticket.vehicle_reg_number, "ticket_saved");
        Ok(id)
    }

    fn get_ticket(&self, vehicle_reg_number: &str) -> Result<Option<Ticket>, StorageError> {
        let tables = self.tables.lock();
        let Some(indices) = tables.by_reg.get(vehicle_reg_number) else {
            return Ok(None);
        };

        // Closed tickets are history only
        Ok(indices.iter().rev().map(|&i| &tables.tickets[i]).find(|t| t.is_open()).cloned())
    }

    fn update_ticket(&self, ticket: &Ticket) -> Result<(), StorageError> {
        let id = ticket.id.ok_or(StorageError::UnsavedTicket)?;
        let mut tables = self.tables.lock();
        let stored = tables
            .tickets
            .iter_mut()
            .find(|t| t.id == Some(id))
            .ok_or(StorageError::UnknownTicket(id.0))?;

        stored.price = ticket.price;
        stored.out_time = ticket.out_time;
        debug!(ticket_id = %id, price = %ticket.price, "ticket_updated");
        Ok(())
    }

    fn count_tickets(&self, vehicle_reg_number: &str) -> Result<u32, StorageError> {
        let tables = self.tables.lock();
        Ok(tables.by_reg.get(vehicle_reg_number).map_or(0, |v| v.len() as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_layout_numbers_cars_then_bikes() {
        let store = MemoryStore::with_layout(2, 2);

        assert_eq!(store.spot(SpotId(1)).unwrap().parking_type, Some(ParkingType::Car));
        assert_eq!(store.spot(SpotId(2)).unwrap().parking_type, Some(ParkingType::Car));
        assert_eq!(store.spot(SpotId(3)).unwrap().parking_type, Some(ParkingType::Bike));
        assert_eq!(store.spot(SpotId(4)).unwrap().parking_type, Some(ParkingType::Bike));
        assert!(store.spot(SpotId(5)).is_none());
        assert_eq!(store.free_spots(), (2, 2));
    }

    #[test]
    fn test_next_available_slot_lowest_free() {
        let store = MemoryStore::with_layout(3, 1);

        assert_eq!(store.next_available_slot(&ParkingType::Car).unwrap(), Some(SpotId(1)));

        store.update_parking(&ParkingSpot::new(SpotId(1), ParkingType::Car, false)).unwrap();
        assert_eq!(store.next_available_slot(&ParkingType::Car).unwrap(), Some(SpotId(2)));
        assert_eq!(store.next_available_slot(&ParkingType::Bike).unwrap(), Some(SpotId(4)));
    }

    #[test]
    fn test_next_available_slot_full() {
        let store = MemoryStore::with_layout(1, 0);
        store.update_parking(&ParkingSpot::new(SpotId(1), ParkingType::Car, false)).unwrap();

        assert_eq!(store.next_available_slot(&ParkingType::Car).unwrap(), None);
        assert_eq!(store.next_available_slot(&ParkingType::Bike).unwrap(), None);
    }

    #[test]
    fn test_update_unknown_spot() {
        let store = MemoryStore::with_layout(1, 0);
        let result = store.update_parking(&ParkingSpot::new(SpotId(9), ParkingType::Car, false));
        assert!(matches!(result, Err(StorageError::UnknownSpot(9))));
    }

    #[test]
    fn test_save_assigns_sequential_ids() {
        let store = MemoryStore::with_layout(2, 0);
        let spot = ParkingSpot::new(SpotId(1), ParkingType::Car, false);

        let first = store.save_ticket(&Ticket::open(spot.clone(), "A", Utc::now())).unwrap();
        let second = store.save_ticket(&Ticket::open(spot, "B", Utc::now())).unwrap();

        assert_eq!(first, TicketId(1));
        assert_eq!(second, TicketId(2));
        assert_eq!(store.get_ticket("A").unwrap().unwrap().id, Some(TicketId(1)));
    }

    #[test]
    fn test_get_ticket_prefers_open() {
        let store = MemoryStore::with_layout(2, 0);
        let spot = ParkingSpot::new(SpotId(1), ParkingType::Car, false);
        let now = Utc::now();

        let mut old = Ticket::open(spot.clone(), "ABC", now - Duration::hours(5));
        old.out_time = Some(now - Duration::hours(4));
        store.save_ticket(&old).unwrap();
        let open_id = store.save_ticket(&Ticket::open(spot, "ABC", now)).unwrap();

        let ticket = store.get_ticket("ABC").unwrap().unwrap();
        assert_eq!(ticket.id, Some(open_id));
        assert!(ticket.is_open());
        assert_eq!(store.count_tickets("ABC").unwrap(), 2);
    }

    #[test]
    fn test_get_ticket_ignores_closed() {
        let store = MemoryStore::with_layout(1, 0);
        let spot = ParkingSpot::new(SpotId(1), ParkingType::Car, false);
        let now = Utc::now();

        let id = store.save_ticket(&Ticket::open(spot, "ABC", now - Duration::hours(1))).unwrap();
        let mut ticket = store.get_ticket("ABC").unwrap().unwrap();
        ticket.out_time = Some(now);
        ticket.price = 1.5;
        store.update_ticket(&ticket).unwrap();

        assert!(store.get_ticket("ABC").unwrap().is_none());
        let history = store.tickets_for("ABC");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, Some(id));
        assert_eq!(history[0].out_time, Some(now));
        assert_eq!(history[0].price, 1.5);
    }


    #[test]
    fn test_unknown_registration() {
        let store = MemoryStore::with_layout(1, 1);
        assert!(store.get_ticket("NOPE").unwrap().is_none());
        assert_eq!(store.count_tickets("NOPE").unwrap(), 0);
        assert!(store.tickets_for("NOPE").is_empty());
    }

    #[test]
    fn test_update_unsaved_ticket() {
        let store = MemoryStore::with_layout(1, 0);
        let ticket = Ticket::open(ParkingSpot::new(SpotId(1), ParkingType::Car, false), "A", Utc::now());
        assert!(matches!(store.update_ticket(&ticket), Err(StorageError::UnsavedTicket)));
    }
}
