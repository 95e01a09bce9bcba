pub mod conflict;
mod error;
pub mod pricing;
pub mod status;

pub use error::EngineError;
pub use pricing::quote;
pub use status::status_at;

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};
use ulid::Ulid;

use crate::checktime::{self, Clock};
use crate::directory::Directory;
use crate::limits::{MAX_GUESTS, MAX_ID_NUMBER_LEN};
use crate::model::*;
use crate::observability;

/// Sequences the availability, conflict and pricing primitives over the
/// data-access collaborator. Owns no entity state of its own.
pub struct Engine {
    directory: Arc<dyn Directory>,
    clock: Arc<dyn Clock>,
    /// Per-room creation serialization: two racing requests for the same
    /// room validate-and-commit one after the other, never interleaved.
    room_locks: DashMap<RoomId, Arc<Mutex<()>>>,
}

impl Engine {
    pub fn new(directory: Arc<dyn Directory>, clock: Arc<dyn Clock>) -> Self {
        Self {
            directory,
            clock,
            room_locks: DashMap::new(),
        }
    }

    fn room_lock(&self, id: RoomId) -> Arc<Mutex<()>> {
        self.room_locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // ── Command path ─────────────────────────────────────────

    /// Create a reservation. Every gate fails fast; nothing is written on
    /// any failure, and nothing is retried here.
    pub async fn create_reservation(
        &self,
        req: CreateReservation,
    ) -> Result<CreateReservationResponse, EngineError> {
        let room_id = req.room_id;
        let started = Instant::now();
        let result = self.create_reservation_inner(req).await;
        metrics::histogram!(observability::CREATE_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        match &result {
            Ok(resp) => {
                metrics::counter!(observability::RESERVATIONS_CREATED_TOTAL).increment(1);
                info!(room_id, reservation = %resp.id, price = %resp.price, "reservation created");
            }
            Err(e) => {
                metrics::counter!(
                    observability::RESERVATIONS_REJECTED_TOTAL,
                    "reason" => observability::rejection_label(e)
                )
                .increment(1);
                if matches!(e, EngineError::Conflict(_)) {
                    metrics::counter!(observability::RESERVATION_CONFLICTS_TOTAL).increment(1);
                }
                debug!(room_id, error = %e, "reservation rejected");
            }
        }
        result
    }

    async fn create_reservation_inner(
        &self,
        req: CreateReservation,
    ) -> Result<CreateReservationResponse, EngineError> {
        if req.guests == 0 {
            return Err(EngineError::LimitExceeded("at least one guest required"));
        }
        if req.guests > MAX_GUESTS {
            return Err(EngineError::LimitExceeded("too many guests"));
        }
        if req.customer_id_number.len() > MAX_ID_NUMBER_LEN {
            return Err(EngineError::LimitExceeded("customer id number too long"));
        }

        let lock = self.room_lock(req.room_id);
        let _serial = lock.lock().await;

        let customer = self
            .directory
            .customer_by_id_number(&req.customer_id_number)
            .await?
            .ok_or_else(|| EngineError::CustomerNotFound(req.customer_id_number.clone()))?;

        let room = self
            .directory
            .room_with_active_reservations(req.room_id)
            .await?
            .ok_or(EngineError::RoomNotFound(req.room_id))?;

        if room.on_maintenance {
            return Err(EngineError::UnderMaintenance(room.id));
        }

        let span = conflict::validate_stay(req.start, req.end)?;
        conflict::check_no_conflict(&room, &span, None)?;

        let price = pricing::quote(room.price_per_night, &span)?;

        let reservation = Reservation {
            id: Ulid::new(),
            room_id: room.id,
            customer_id: customer.id,
            span,
            status: ReservationStatus::Pending,
            guests: req.guests,
            price,
        };
        // The directory re-validates at write time; a concurrent winner
        // surfaces here as EngineError::Conflict.
        let stored = self.directory.add_reservation(reservation).await?;

        Ok(CreateReservationResponse {
            id: stored.id,
            price: stored.price,
        })
    }

    // ── Query path ───────────────────────────────────────────

    /// Status of one room, evaluated at the resolved check instant. The
    /// snapshot's maintenance issues ride along for detail views.
    pub async fn room_status(
        &self,
        room_id: RoomId,
        raw_check: Option<&str>,
    ) -> Result<RoomStatusView, EngineError> {
        let at = checktime::resolve_check_instant(raw_check, self.clock.now_utc())?;
        let room = self
            .directory
            .room_with_active_reservations(room_id)
            .await?
            .ok_or(EngineError::RoomNotFound(room_id))?;
        metrics::counter!(observability::STATUS_QUERIES_TOTAL).increment(1);
        Ok(view_of(&room, at, true))
    }

    /// List rooms with computed status, ordered by room number. Optional
    /// filters: room type, floor, maintenance flag, and an availability
    /// range (rooms free for the whole `[from, to)` and not on maintenance).
    pub async fn list_rooms(&self, query: RoomQuery) -> Result<Vec<RoomStatusView>, EngineError> {
        let at = checktime::resolve_check_instant(query.check.as_deref(), self.clock.now_utc())?;
        // The range filter only applies when both endpoints are present.
        let range = match (query.available_from, query.available_to) {
            (Some(from), Some(to)) => Some(conflict::validate_stay(from, to)?),
            _ => None,
        };

        let mut rooms = self.directory.rooms_with_active_reservations().await?;
        rooms.sort_by_key(|r| r.room_number);

        let mut out = Vec::new();
        for room in &rooms {
            if let Some(t) = &query.room_type
                && room.room_type != *t
            {
                continue;
            }
            if let Some(floor) = query.floor
                && room.floor != floor
            {
                continue;
            }
            if let Some(on) = query.on_maintenance
                && room.on_maintenance != on
            {
                continue;
            }
            if let Some(span) = &range
                && (room.on_maintenance || conflict::conflicting(room, span, None).is_some())
            {
                continue;
            }
            out.push(view_of(room, at, false));
        }
        metrics::counter!(observability::STATUS_QUERIES_TOTAL).increment(out.len() as u64);
        Ok(out)
    }

    /// Can the room take `[start, end)`? `exclude` supports edit validation
    /// without self-conflict.
    pub async fn is_room_available(
        &self,
        room_id: RoomId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<Ulid>,
    ) -> Result<bool, EngineError> {
        let room = self
            .directory
            .room_with_active_reservations(room_id)
            .await?
            .ok_or(EngineError::RoomNotFound(room_id))?;
        conflict::is_room_available(&room, start, end, exclude)
    }
}

fn view_of(room: &Room, at: DateTime<Utc>, include_issues: bool) -> RoomStatusView {
    RoomStatusView {
        room_id: room.id,
        room_number: room.room_number,
        room_type: room.room_type.clone(),
        floor: room.floor,
        price_per_night: room.price_per_night,
        on_maintenance: room.on_maintenance,
        amenities: room.amenities.clone(),
        maintenance_issues: if include_issues {
            room.maintenance_issues.clone()
        } else {
            Vec::new()
        },
        status: status::status_at(room, at),
        checked_at: at,
    }
}
