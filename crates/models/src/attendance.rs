use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Separator between date and course id in the persisted key form.
pub const KEY_SEPARATOR: char = '_';

/// Attendance status. Wire values are case-sensitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [Self::Present, Self::Absent, Self::Late, Self::Excused];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Late => "Late",
            Self::Excused => "Excused",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                ModelError::Validation(
                    "Status must be 'Present', 'Absent', 'Late', or 'Excused'.".into(),
                )
            })
    }
}

/// Key of one attendance entry: the day, optionally scoped to a course.
///
/// The date is free-form text as entered. On disk the key is written as
/// `DATE` or `DATE_COURSEID`; reading it back needs the set of known course
/// ids, see [`AttendanceKey::decode`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AttendanceKey {
    pub date: String,
    pub course_id: Option<String>,
}

impl AttendanceKey {
    pub fn new(date: impl Into<String>, course_id: Option<&str>) -> Self {
        Self { date: date.into(), course_id: course_id.map(str::to_string) }
    }

    /// Course-agnostic key.
    pub fn bare(date: impl Into<String>) -> Self {
        Self { date: date.into(), course_id: None }
    }

    pub fn is_for_course(&self, course_id: &str) -> bool {
        self.course_id.as_deref() == Some(course_id)
    }

    /// Split a persisted key at the last `_` whose suffix is a known course
    /// id. Anything else is a bare date, underscores included.
    pub fn decode(raw: &str, is_course: impl Fn(&str) -> bool) -> Self {
        raw.rmatch_indices(KEY_SEPARATOR)
            .map(|(i, sep)| (&raw[..i], &raw[i + sep.len()..]))
            .find(|(_, course_id)| !course_id.is_empty() && is_course(course_id))
            .map(|(date, course_id)| Self::new(date, Some(course_id)))
            .unwrap_or_else(|| Self::bare(raw))
    }
}

impl fmt::Display for AttendanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.date)?;
        if let Some(course_id) = &self.course_id {
            write!(f, "{KEY_SEPARATOR}{course_id}")?;
        }
        Ok(())
    }
}

/// Unresolved form: the whole string is taken as the date until
/// [`Student::resolve_attendance_keys`](crate::Student::resolve_attendance_keys)
/// runs against the known course ids.
impl From<String> for AttendanceKey {
    fn from(raw: String) -> Self {
        Self::bare(raw)
    }
}

impl From<AttendanceKey> for String {
    fn from(key: AttendanceKey) -> Self {
        key.to_string()
    }
}
