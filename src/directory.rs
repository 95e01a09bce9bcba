//! Data-access collaborator boundary.
//!
//! The engine only ever sees this trait; persistence and querying live
//! behind it. [`InMemoryDirectory`] is the reference implementation used in
//! tests and standalone deployments; a production system substitutes its
//! own store behind the same trait.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;
use ulid::Ulid;

use crate::model::{
    Customer, CustomerId, MaintenanceIssue, Reservation, ReservationStatus, Room, RoomId,
};

pub type SharedRoom = Arc<RwLock<Room>>;

#[derive(Debug)]
pub enum DirectoryError {
    /// Write-time no-overlap violation: another reservation committed first.
    Conflict { room_id: RoomId, existing: Ulid },
    RoomNotFound(RoomId),
    ReservationNotFound(Ulid),
    DuplicateRoomNumber(u32),
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryError::Conflict { room_id, existing } => {
                write!(f, "room {room_id}: range already taken by reservation {existing}")
            }
            DirectoryError::RoomNotFound(id) => write!(f, "room {id} not found"),
            DirectoryError::ReservationNotFound(id) => write!(f, "reservation {id} not found"),
            DirectoryError::DuplicateRoomNumber(n) => write!(f, "room number {n} already in use"),
            DirectoryError::InvalidTransition { from, to } => {
                write!(f, "reservation cannot move from {from:?} to {to:?}")
            }
        }
    }
}

impl std::error::Error for DirectoryError {}

#[async_trait]
pub trait Directory: Send + Sync {
    /// Full room snapshot, all reservations included.
    async fn room_by_id(&self, id: RoomId) -> Result<Option<Room>, DirectoryError>;

    /// Room snapshot carrying only Pending/Checked-in reservations, the
    /// shape every occupancy and conflict computation wants.
    async fn room_with_active_reservations(
        &self,
        id: RoomId,
    ) -> Result<Option<Room>, DirectoryError>;

    /// All rooms, each with only its active reservations.
    async fn rooms_with_active_reservations(&self) -> Result<Vec<Room>, DirectoryError>;

    async fn customer_by_id_number(
        &self,
        id_number: &str,
    ) -> Result<Option<Customer>, DirectoryError>;

    /// Persist a new reservation. The no-overlap invariant is re-validated
    /// under the store's own lock; a violation is a [`DirectoryError::Conflict`],
    /// distinct from a pre-flight validation failure.
    async fn add_reservation(
        &self,
        reservation: Reservation,
    ) -> Result<Reservation, DirectoryError>;

    /// Drive a reservation through its lifecycle. Illegal moves are rejected.
    async fn set_reservation_status(
        &self,
        id: Ulid,
        status: ReservationStatus,
    ) -> Result<Reservation, DirectoryError>;

    /// Set or clear a room's maintenance flag. Independent of issue records.
    async fn set_maintenance(&self, room_id: RoomId, on: bool) -> Result<(), DirectoryError>;

    /// Record a maintenance issue. Never touches the maintenance flag.
    async fn add_maintenance_issue(
        &self,
        issue: MaintenanceIssue,
    ) -> Result<(), DirectoryError>;
}

pub struct InMemoryDirectory {
    rooms: DashMap<RoomId, SharedRoom>,
    rooms_by_number: DashMap<u32, RoomId>,
    customers: DashMap<CustomerId, Customer>,
    customers_by_id_number: DashMap<String, CustomerId>,
    /// Reverse lookup: reservation id → room id.
    reservation_to_room: DashMap<Ulid, RoomId>,
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            rooms_by_number: DashMap::new(),
            customers: DashMap::new(),
            customers_by_id_number: DashMap::new(),
            reservation_to_room: DashMap::new(),
        }
    }

    pub fn add_room(&self, room: Room) -> Result<(), DirectoryError> {
        if self.rooms_by_number.contains_key(&room.room_number) {
            return Err(DirectoryError::DuplicateRoomNumber(room.room_number));
        }
        self.rooms_by_number.insert(room.room_number, room.id);
        for r in &room.reservations {
            self.reservation_to_room.insert(r.id, room.id);
        }
        self.rooms.insert(room.id, Arc::new(RwLock::new(room)));
        Ok(())
    }

    pub fn add_customer(&self, customer: Customer) {
        self.customers_by_id_number
            .insert(customer.id_number.clone(), customer.id);
        self.customers.insert(customer.id, customer);
    }

    fn room(&self, id: RoomId) -> Option<SharedRoom> {
        self.rooms.get(&id).map(|e| e.value().clone())
    }
}

/// Clone of a room with inactive reservations dropped. Sort order survives
/// because filtering preserves it.
fn active_snapshot(room: &Room) -> Room {
    let mut snapshot = room.clone();
    snapshot.reservations.retain(|r| r.status.is_active());
    snapshot
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn room_by_id(&self, id: RoomId) -> Result<Option<Room>, DirectoryError> {
        match self.room(id) {
            Some(rs) => Ok(Some(rs.read().await.clone())),
            None => Ok(None),
        }
    }

    async fn room_with_active_reservations(
        &self,
        id: RoomId,
    ) -> Result<Option<Room>, DirectoryError> {
        match self.room(id) {
            Some(rs) => Ok(Some(active_snapshot(&*rs.read().await))),
            None => Ok(None),
        }
    }

    async fn rooms_with_active_reservations(&self) -> Result<Vec<Room>, DirectoryError> {
        let shared: Vec<SharedRoom> = self.rooms.iter().map(|e| e.value().clone()).collect();
        let mut out = Vec::with_capacity(shared.len());
        for rs in shared {
            out.push(active_snapshot(&*rs.read().await));
        }
        Ok(out)
    }

    async fn customer_by_id_number(
        &self,
        id_number: &str,
    ) -> Result<Option<Customer>, DirectoryError> {
        let id = match self.customers_by_id_number.get(id_number) {
            Some(entry) => *entry.value(),
            None => return Ok(None),
        };
        Ok(self.customers.get(&id).map(|e| e.value().clone()))
    }

    async fn add_reservation(
        &self,
        reservation: Reservation,
    ) -> Result<Reservation, DirectoryError> {
        let rs = self
            .room(reservation.room_id)
            .ok_or(DirectoryError::RoomNotFound(reservation.room_id))?;
        let mut guard = rs.write().await;

        // Compare-and-commit: the invariant is re-checked under the room's
        // write lock, so two racing writers cannot both slip through.
        if let Some(existing) = guard
            .overlapping(&reservation.span)
            .find(|r| r.status.is_active())
        {
            return Err(DirectoryError::Conflict {
                room_id: guard.id,
                existing: existing.id,
            });
        }

        guard.insert_reservation(reservation.clone());
        self.reservation_to_room.insert(reservation.id, guard.id);
        Ok(reservation)
    }

    async fn set_reservation_status(
        &self,
        id: Ulid,
        status: ReservationStatus,
    ) -> Result<Reservation, DirectoryError> {
        let room_id = self
            .reservation_to_room
            .get(&id)
            .map(|e| *e.value())
            .ok_or(DirectoryError::ReservationNotFound(id))?;
        let rs = self
            .room(room_id)
            .ok_or(DirectoryError::RoomNotFound(room_id))?;
        let mut guard = rs.write().await;
        let reservation = guard
            .reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DirectoryError::ReservationNotFound(id))?;
        if !reservation.status.can_transition_to(status) {
            return Err(DirectoryError::InvalidTransition {
                from: reservation.status,
                to: status,
            });
        }
        reservation.status = status;
        Ok(reservation.clone())
    }

    async fn set_maintenance(&self, room_id: RoomId, on: bool) -> Result<(), DirectoryError> {
        let rs = self
            .room(room_id)
            .ok_or(DirectoryError::RoomNotFound(room_id))?;
        rs.write().await.on_maintenance = on;
        Ok(())
    }

    async fn add_maintenance_issue(
        &self,
        issue: MaintenanceIssue,
    ) -> Result<(), DirectoryError> {
        let rs = self
            .room(issue.room_id)
            .ok_or(DirectoryError::RoomNotFound(issue.room_id))?;
        // Record only. The maintenance flag is managed independently.
        rs.write().await.maintenance_issues.push(issue);
        Ok(())
    }
}
