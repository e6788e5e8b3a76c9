//! Domain records persisted by the attendance service.
//!
//! Plain serde types plus the validation helpers shared by the record store
//! and the presentation layer. No I/O happens here.

pub mod errors;
pub mod attendance;
pub mod student;
pub mod course;
pub mod summary;

pub use attendance::{AttendanceKey, AttendanceStatus};
pub use course::Course;
pub use student::Student;
pub use summary::AttendanceSummary;
