//! Hanke records, contact reconciliation, and traffic disruption classification
//! for planned street and public-space works.

pub mod config;
pub mod disruption;
pub mod error;
pub mod hanke;
pub mod telemetry;
