use chrono::{DateTime, Utc};

use crate::model::{ReservationStatus, Room, RoomStatus};

/// Room status at `at`, strict precedence: the maintenance flag overrides
/// any reservation, then the first active reservation containing the
/// instant, then Available. Pure function of the snapshot.
pub fn status_at(room: &Room, at: DateTime<Utc>) -> RoomStatus {
    if room.on_maintenance {
        return RoomStatus::Maintenance;
    }
    // The no-overlap invariant means at most one active reservation can
    // contain the instant.
    match room.covering(at).find(|r| r.status.is_active()) {
        Some(r) if r.status == ReservationStatus::CheckedIn => RoomStatus::OccupiedConfirmed,
        Some(_) => RoomStatus::OccupiedPending,
        None => RoomStatus::Available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Reservation, Span};
    use rust_decimal::Decimal;
    use ulid::Ulid;

    fn dt(s: &str) -> DateTime<Utc> {
        s.parse().expect("test timestamp")
    }

    fn room_with(reservations: Vec<(&str, &str, ReservationStatus)>) -> Room {
        let mut room = Room::new(1, 101, "Standard", 1, Decimal::new(15000, 2));
        for (start, end, status) in reservations {
            room.insert_reservation(Reservation {
                id: Ulid::new(),
                room_id: room.id,
                customer_id: 7,
                span: Span::new(dt(start), dt(end)),
                status,
                guests: 2,
                price: Decimal::ZERO,
            });
        }
        room
    }

    #[test]
    fn maintenance_overrides_everything() {
        let mut room = room_with(vec![(
            "2025-06-01T00:00:00Z",
            "2025-06-05T00:00:00Z",
            ReservationStatus::CheckedIn,
        )]);
        room.on_maintenance = true;
        // Mid-stay, yet maintenance wins.
        assert_eq!(
            status_at(&room, dt("2025-06-02T12:00:00Z")),
            RoomStatus::Maintenance
        );
    }

    #[test]
    fn checked_in_is_occupied_confirmed() {
        let room = room_with(vec![(
            "2025-06-01T00:00:00Z",
            "2025-06-05T00:00:00Z",
            ReservationStatus::CheckedIn,
        )]);
        assert_eq!(
            status_at(&room, dt("2025-06-02T12:00:00Z")),
            RoomStatus::OccupiedConfirmed
        );
    }

    #[test]
    fn pending_is_occupied_pending() {
        let room = room_with(vec![(
            "2025-06-01T00:00:00Z",
            "2025-06-05T00:00:00Z",
            ReservationStatus::Pending,
        )]);
        let status = status_at(&room, dt("2025-06-02T12:00:00Z"));
        assert_eq!(status, RoomStatus::OccupiedPending);
        assert_eq!(status.label(), "Occupied");
    }

    #[test]
    fn interval_boundaries() {
        let room = room_with(vec![(
            "2025-06-01T00:00:00Z",
            "2025-06-05T00:00:00Z",
            ReservationStatus::Pending,
        )]);
        // Start inclusive.
        assert_eq!(
            status_at(&room, dt("2025-06-01T00:00:00Z")),
            RoomStatus::OccupiedPending
        );
        // End exclusive: the room is free the instant the stay ends.
        assert_eq!(
            status_at(&room, dt("2025-06-05T00:00:00Z")),
            RoomStatus::Available
        );
    }

    #[test]
    fn inactive_reservations_do_not_occupy() {
        let room = room_with(vec![
            (
                "2025-06-01T00:00:00Z",
                "2025-06-05T00:00:00Z",
                ReservationStatus::Cancelled,
            ),
            (
                "2025-06-01T00:00:00Z",
                "2025-06-05T00:00:00Z",
                ReservationStatus::CheckedOut,
            ),
        ]);
        assert_eq!(
            status_at(&room, dt("2025-06-02T12:00:00Z")),
            RoomStatus::Available
        );
    }

    #[test]
    fn empty_room_is_available() {
        let room = room_with(vec![]);
        assert_eq!(
            status_at(&room, dt("2025-06-02T12:00:00Z")),
            RoomStatus::Available
        );
    }
}
