use chrono::{DateTime, Utc};
use ulid::Ulid;

use crate::limits::MAX_STAY_NIGHTS;
use crate::model::{Reservation, Room, Span};

use super::EngineError;

/// Validate a candidate stay range before any overlap scan. A zero or
/// negative range is a validation error, never merely "unavailable".
pub(crate) fn validate_stay(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Span, EngineError> {
    if end <= start {
        return Err(EngineError::EmptyStay);
    }
    let span = Span::new(start, end);
    if span.nights() > MAX_STAY_NIGHTS {
        return Err(EngineError::LimitExceeded("stay too long"));
    }
    Ok(span)
}

/// First active reservation overlapping `span`. `exclude` skips the
/// reservation being edited so a room never conflicts with itself.
pub(crate) fn conflicting<'a>(
    room: &'a Room,
    span: &Span,
    exclude: Option<Ulid>,
) -> Option<&'a Reservation> {
    room.overlapping(span)
        .find(|r| r.status.is_active() && exclude != Some(r.id))
}

pub(crate) fn check_no_conflict(
    room: &Room,
    span: &Span,
    exclude: Option<Ulid>,
) -> Result<(), EngineError> {
    match conflicting(room, span, exclude) {
        Some(_) => Err(EngineError::Unavailable(room.id)),
        None => Ok(()),
    }
}

/// True iff the room can take `[start, end)` given its current active
/// reservations.
pub fn is_room_available(
    room: &Room,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<Ulid>,
) -> Result<bool, EngineError> {
    let span = validate_stay(start, end)?;
    Ok(conflicting(room, &span, exclude).is_none())
}
