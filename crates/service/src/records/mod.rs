//! In-memory record store.
//!
//! Holds the student and course mappings and enforces the uniqueness,
//! existence and enrollment rules. Everything here is synchronous and
//! free of I/O; persistence and locking live in `AttendanceService`.

mod store;

pub use store::{NamedRef, RecordStore};
