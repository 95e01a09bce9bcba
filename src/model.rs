use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Room and customer identifiers are assigned by the surrounding CRUD layer.
pub type RoomId = i64;
pub type CustomerId = i64;

/// Half-open interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Span {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Containment rule `start <= t < end`: a stay occupies its first
    /// instant and has released the room by its last.
    pub fn contains_instant(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    /// Whole calendar nights between the date parts of the endpoints.
    /// Time-of-day is deliberately ignored: pricing is per night, not per
    /// elapsed hour.
    pub fn nights(&self) -> i64 {
        (self.end.date_naive() - self.start.date_naive()).num_days()
    }
}

/// Reservation lifecycle. Only Pending and CheckedIn count toward occupancy
/// and conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Pending,
    #[serde(rename = "Checked-in")]
    CheckedIn,
    #[serde(rename = "Checked-out")]
    CheckedOut,
    Cancelled,
}

impl ReservationStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::CheckedIn)
    }

    /// Allowed lifecycle moves: Pending → CheckedIn | Cancelled,
    /// CheckedIn → CheckedOut. Everything else is rejected.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, CheckedIn) | (Pending, Cancelled) | (CheckedIn, CheckedOut)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Ulid,
    pub room_id: RoomId,
    pub customer_id: CustomerId,
    pub span: Span,
    pub status: ReservationStatus,
    pub guests: u32,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceIssue {
    pub id: Ulid,
    pub room_id: RoomId,
    pub description: String,
    pub reported_at: DateTime<Utc>,
    pub estimated_completion: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    /// External identity number the booking flow looks customers up by.
    pub id_number: String,
    pub full_name: String,
}

/// A room snapshot. The engine never mutates one; it reads the snapshot and
/// returns derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Unique across the property.
    pub room_number: u32,
    pub room_type: String,
    pub floor: i32,
    pub price_per_night: Decimal,
    /// Managed independently of maintenance issues; the flag alone drives
    /// status computation.
    pub on_maintenance: bool,
    pub amenities: Vec<String>,
    pub maintenance_issues: Vec<MaintenanceIssue>,
    /// All reservations on the room, sorted by `span.start`.
    pub reservations: Vec<Reservation>,
}

impl Room {
    pub fn new(
        id: RoomId,
        room_number: u32,
        room_type: impl Into<String>,
        floor: i32,
        price_per_night: Decimal,
    ) -> Self {
        Self {
            id,
            room_number,
            room_type: room_type.into(),
            floor,
            price_per_night,
            on_maintenance: false,
            amenities: Vec::new(),
            maintenance_issues: Vec::new(),
            reservations: Vec::new(),
        }
    }

    /// Insert a reservation maintaining sort order by span.start.
    pub fn insert_reservation(&mut self, reservation: Reservation) {
        let pos = self
            .reservations
            .binary_search_by_key(&reservation.span.start, |r| r.span.start)
            .unwrap_or_else(|e| e);
        self.reservations.insert(pos, reservation);
    }

    pub fn remove_reservation(&mut self, id: Ulid) -> Option<Reservation> {
        if let Some(pos) = self.reservations.iter().position(|r| r.id == id) {
            Some(self.reservations.remove(pos))
        } else {
            None
        }
    }

    /// Return only reservations whose span overlaps the query window.
    /// Uses binary search to skip reservations starting at or after `query.end`.
    pub fn overlapping(&self, query: &Span) -> impl Iterator<Item = &Reservation> {
        // Everything at index >= right_bound starts at or after query.end → can't overlap.
        let right_bound = self
            .reservations
            .partition_point(|r| r.span.start < query.end);
        self.reservations[..right_bound]
            .iter()
            .filter(move |r| r.span.end > query.start)
    }

    /// Reservations whose span contains the instant `t`.
    pub fn covering(&self, t: DateTime<Utc>) -> impl Iterator<Item = &Reservation> {
        // Everything at index >= bound starts after t → can't contain it.
        let bound = self.reservations.partition_point(|r| r.span.start <= t);
        self.reservations[..bound]
            .iter()
            .filter(move |r| r.span.contains_instant(t))
    }
}

/// Room status at an instant. The occupied variants keep the pending /
/// checked-in distinction; presentation layers that don't care collapse
/// them via [`RoomStatus::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    Maintenance,
    OccupiedConfirmed,
    OccupiedPending,
    Available,
}

impl RoomStatus {
    /// Collapsed display label: both occupied variants render as "Occupied".
    pub fn label(&self) -> &'static str {
        match self {
            RoomStatus::Maintenance => "Maintenance",
            RoomStatus::OccupiedConfirmed | RoomStatus::OccupiedPending => "Occupied",
            RoomStatus::Available => "Available",
        }
    }
}

// ── Engine request / view types ──────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReservation {
    pub customer_id_number: String,
    pub room_id: RoomId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub guests: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateReservationResponse {
    pub id: Ulid,
    pub price: Decimal,
}

/// Filters for the room listing query. `available_from`/`available_to`
/// restrict the listing to rooms free for the whole half-open range.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomQuery {
    pub room_type: Option<String>,
    pub floor: Option<i32>,
    pub on_maintenance: Option<bool>,
    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,
    /// Raw status-check input; resolved per the default check-time rules.
    pub check: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomStatusView {
    pub room_id: RoomId,
    pub room_number: u32,
    pub room_type: String,
    pub floor: i32,
    pub price_per_night: Decimal,
    pub on_maintenance: bool,
    pub amenities: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub maintenance_issues: Vec<MaintenanceIssue>,
    pub status: RoomStatus,
    /// The canonical instant the status was evaluated at.
    pub checked_at: DateTime<Utc>,
}
