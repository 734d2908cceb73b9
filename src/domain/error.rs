//! Error types for the parking system

use crate::domain::types::ParkingType;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures reported by spot or ticket storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("parking spot {0} does not exist")]
    UnknownSpot(u32),

    #[error("ticket {0} does not exist")]
    UnknownTicket(u64),

    #[error("ticket has no id; save it before updating")]
    UnsavedTicket,

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failures reading operator input
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input stream closed")]
    Closed,

    #[error("vehicle registration number must not be empty")]
    EmptyRegistration,

    #[error("input IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort an incoming or exiting sequence
#[derive(Debug, Error)]
pub enum ParkingError {
    #[error("entered input is invalid: selection {0}")]
    InvalidSelection(i32),

    #[error("no free {0} spot: parking slots might be full")]
    NoAvailableSpot(ParkingType),

    #[error("out time provided is incorrect: in={in_time}, out={out_time:?}")]
    InvalidTimeRange {
        in_time: DateTime<Utc>,
        out_time: Option<DateTime<Utc>>,
    },

    #[error("the parking type is not set")]
    InvalidCategory,

    #[error("unknown parking type: {0}")]
    UnsupportedCategory(String),

    #[error("no ticket on record for vehicle {0}")]
    NoOpenTicket(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Input(#[from] InputError),
}

pub type Result<T> = std::result::Result<T, ParkingError>;
