use crate::checktime::TimeError;
use crate::directory::DirectoryError;
use crate::model::RoomId;

/// One variant per user-visible failure; messages are stable so UI layers
/// never parse free text.
#[derive(Debug)]
pub enum EngineError {
    RoomNotFound(RoomId),
    CustomerNotFound(String),
    UnderMaintenance(RoomId),
    /// Pre-flight conflict: an active reservation already covers part of
    /// the requested range.
    Unavailable(RoomId),
    /// End not strictly after start.
    EmptyStay,
    /// Start and end fall on the same calendar date.
    NoNights,
    LimitExceeded(&'static str),
    Time(TimeError),
    /// Write-time race: another request booked the room between validation
    /// and persistence.
    Conflict(RoomId),
    Store(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::RoomNotFound(id) => write!(f, "room {id} not found"),
            EngineError::CustomerNotFound(id_number) => {
                write!(f, "customer with id number '{id_number}' not found; create the customer first")
            }
            EngineError::UnderMaintenance(id) => {
                write!(f, "room {id} is under maintenance")
            }
            EngineError::Unavailable(id) => {
                write!(f, "room {id} is not available for the requested date range")
            }
            EngineError::EmptyStay => write!(f, "end date must be after the start date"),
            EngineError::NoNights => write!(f, "reservation must span at least one night"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Time(e) => write!(f, "{e}"),
            EngineError::Conflict(id) => {
                write!(f, "room {id} was booked concurrently; the requested range is no longer free")
            }
            EngineError::Store(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<TimeError> for EngineError {
    fn from(e: TimeError) -> Self {
        EngineError::Time(e)
    }
}

impl From<DirectoryError> for EngineError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::Conflict { room_id, .. } => EngineError::Conflict(room_id),
            DirectoryError::RoomNotFound(id) => EngineError::RoomNotFound(id),
            other => EngineError::Store(other.to_string()),
        }
    }
}
