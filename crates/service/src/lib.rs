//! Service layer for the attendance tracker.
//! - `records` holds the in-memory record store and enforces every invariant.
//! - `storage` persists the whole store as one JSON snapshot.
//! - `attendance_service` is the shared, lock-protected entry point used by
//!   the HTTP layer; it commits one snapshot per successful mutation.

pub mod errors;
pub mod records;
pub mod storage;
pub mod attendance_service;
pub mod export;
#[cfg(test)]
pub mod test_support;

pub use attendance_service::AttendanceService;
pub use errors::{ServiceError, ServiceResult};
pub use records::RecordStore;
