
/// Types shared by every signal: satellites, per-symbol synchronization records, SV block tables
pub mod common;

/// Broadcast ephemeris records and the Keplerian orbit solver
pub mod ephemeris;

/// Decoded navigation messages and the typed ports used to publish them
pub mod nav_message;

/// Signal-independent streaming telemetry decoder
pub mod telemetry_decode;

pub mod gps_l1_ca;
pub mod gps_l5;

pub mod channel_status;
