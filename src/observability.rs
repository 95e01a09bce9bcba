use std::net::SocketAddr;

use crate::engine::EngineError;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: room status evaluations served.
pub const STATUS_QUERIES_TOTAL: &str = "innkeep_status_queries_total";

/// Counter: reservations created.
pub const RESERVATIONS_CREATED_TOTAL: &str = "innkeep_reservations_created_total";

/// Counter: reservation requests rejected. Labels: reason.
pub const RESERVATIONS_REJECTED_TOTAL: &str = "innkeep_reservations_rejected_total";

/// Counter: write-time conflicts (lost races), a subset of rejections.
pub const RESERVATION_CONFLICTS_TOTAL: &str = "innkeep_reservation_conflicts_total";

/// Histogram: end-to-end reservation creation latency in seconds.
pub const CREATE_DURATION_SECONDS: &str = "innkeep_create_duration_seconds";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Plain fmt subscriber for embedders that don't install their own.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt::try_init();
}

/// Map a rejection to a short, bounded label for the rejection counter.
pub fn rejection_label(err: &EngineError) -> &'static str {
    match err {
        EngineError::RoomNotFound(_) => "room_not_found",
        EngineError::CustomerNotFound(_) => "customer_not_found",
        EngineError::UnderMaintenance(_) => "maintenance",
        EngineError::Unavailable(_) => "unavailable",
        EngineError::EmptyStay => "empty_stay",
        EngineError::NoNights => "no_nights",
        EngineError::LimitExceeded(_) => "limit",
        EngineError::Time(_) => "bad_timestamp",
        EngineError::Conflict(_) => "conflict",
        EngineError::Store(_) => "store",
    }
}
