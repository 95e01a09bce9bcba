//! Room availability and reservation-conflict engine for hotel operations.
//!
//! The surrounding CRUD, transport and UI layers are external collaborators;
//! this crate owns the pieces with real invariants: room status at an
//! instant, no-overlap validation over half-open stay intervals, per-night
//! pricing, and the creation workflow that sequences them: see
//! [`engine::Engine`] and the [`directory::Directory`] boundary.

pub mod checktime;
pub mod directory;
pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
