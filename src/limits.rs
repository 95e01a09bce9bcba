//! Input bounds enforced at the workflow gates.

/// Longest stay a single reservation may cover.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Upper bound on guests per reservation.
pub const MAX_GUESTS: u32 = 12;

/// Upper bound on the external customer identity number length.
pub const MAX_ID_NUMBER_LEN: usize = 32;
