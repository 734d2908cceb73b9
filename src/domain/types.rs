//! Shared types for the parking system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Newtype wrapper for parking spot numbers to provide type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SpotId(pub u32);

impl std::fmt::Display for SpotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype wrapper for ticket IDs assigned by ticket storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TicketId(pub u64);

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vehicle category a spot is built for
///
/// Storage may hand back a category this build does not price; it is kept
/// verbatim in `Unknown` so the fare calculator can reject it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParkingType {
    Car,
    Bike,
    Unknown(String),
}

impl std::str::FromStr for ParkingType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_code(s))
    }
}

impl ParkingType {
    /// Parse a stored category code, keeping unrecognised codes as `Unknown`
    pub fn from_code(code: &str) -> Self {
        match code {
            "CAR" => ParkingType::Car,
            "BIKE" => ParkingType::Bike,
            other => ParkingType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ParkingType::Car => "CAR",
            ParkingType::Bike => "BIKE",
            ParkingType::Unknown(s) => s,
        }
    }

    /// Map a menu selection code to a category (1 = CAR, 2 = BIKE)
    pub fn from_selection(selection: i32) -> Option<Self> {
        match selection {
            1 => Some(ParkingType::Car),
            2 => Some(ParkingType::Bike),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParkingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ParkingType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ParkingType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ParkingType::from_code(&raw))
    }
}

/// A numbered parking spot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingSpot {
    pub id: SpotId,
    #[serde(rename = "type")]
    pub parking_type: Option<ParkingType>,
    pub available: bool,
}

impl ParkingSpot {
    #[inline]
    pub fn new(id: SpotId, parking_type: ParkingType, available: bool) -> Self {
        Self { id, parking_type: Some(parking_type), available }
    }
}

/// A parking ticket
///
/// Open from creation (`out_time` unset, price 0) until the vehicle leaves,
/// then closed with `out_time` and `price` filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Assigned by ticket storage on save
    pub id: Option<TicketId>,
    #[serde(rename = "spot")]
    pub parking_spot: Option<ParkingSpot>,
    #[serde(rename = "reg")]
    pub vehicle_reg_number: String,
    #[serde(rename = "in")]
    pub in_time: DateTime<Utc>,
    #[serde(rename = "out")]
    pub out_time: Option<DateTime<Utc>>,
    pub price: f64,
}

impl Ticket {
    /// Create an open ticket for a vehicle parked in `spot` at `in_time`.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use parking_system::domain::types::{ParkingSpot, ParkingType, SpotId, Ticket};
    ///
    /// let spot = ParkingSpot::new(SpotId(1), ParkingType::Car, false);
    /// let ticket = Ticket::open(spot, "ABC-123", Utc::now());
    /// assert!(ticket.is_open());
    /// assert_eq!(ticket.price, 0.0);
    /// ```
    pub fn open(spot: ParkingSpot, vehicle_reg_number: &str, in_time: DateTime<Utc>) -> Self {
        Self {
            id: None,
            parking_spot: Some(spot),
            vehicle_reg_number: vehicle_reg_number.to_string(),
            in_time,
            out_time: None,
            price: 0.0,
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.out_time.is_none()
    }

    pub fn spot_id(&self) -> Option<SpotId> {
        self.parking_spot.as_ref().map(|spot| spot.id)
    }

    /// Serialize to a single JSON line
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parking_type_from_str() {
        assert_eq!("CAR".parse::<ParkingType>().unwrap(), ParkingType::Car);
        assert_eq!("BIKE".parse::<ParkingType>().unwrap(), ParkingType::Bike);
        assert!(matches!(
            "TRUCK".parse::<ParkingType>().unwrap(),
            ParkingType::Unknown(_)
        ));
    }

    #[test]
    fn test_parking_type_from_selection() {
        assert_eq!(ParkingType::from_selection(1), Some(ParkingType::Car));
        assert_eq!(ParkingType::from_selection(2), Some(ParkingType::Bike));
        assert_eq!(ParkingType::from_selection(0), None);
        assert_eq!(ParkingType::from_selection(3), None);
        assert_eq!(ParkingType::from_selection(-1), None);
    }

    #[test]
    fn test_open_ticket() {
        let in_time = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let spot = ParkingSpot::new(SpotId(4), ParkingType::Bike, false);

        let ticket = Ticket::open(spot, "XY-99", in_time);

        assert!(ticket.id.is_none());
        assert!(ticket.is_open());
        assert_eq!(ticket.spot_id(), Some(SpotId(4)));
        assert_eq!(ticket.vehicle_reg_number, "XY-99");
        assert_eq!(ticket.in_time, in_time);
        assert_eq!(ticket.price, 0.0);
    }

    #[test]
    fn test_ticket_json_short_keys() {
        let in_time = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut ticket =
            Ticket::open(ParkingSpot::new(SpotId(1), ParkingType::Car, true), "ABC", in_time);
        ticket.id = Some(TicketId(7));
        ticket.out_time = Some(in_time + chrono::Duration::hours(2));
        ticket.price = 3.0;

        let json = ticket.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["id"], 7);
        assert_eq!(parsed["reg"], "ABC");
        assert_eq!(parsed["spot"]["type"], "CAR");
        assert_eq!(parsed["price"], 3.0);

        let back: Ticket = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ticket);
    }

    #[test]
    fn test_unknown_type_survives_deserialize() {
        let spot: ParkingSpot =
            serde_json::from_str(r#"{"id":9,"type":"TRUCK","available":true}"#).unwrap();
        assert_eq!(spot.parking_type, Some(ParkingType::Unknown("TRUCK".to_string())));
    }
}
