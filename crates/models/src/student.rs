use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attendance::{AttendanceKey, AttendanceStatus};
use crate::errors::ModelError;

/// A student record as stored under `records.<id>`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    /// Empty when not provided.
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub attendance: BTreeMap<AttendanceKey, AttendanceStatus>,
    /// Enrolled course ids in enrollment order, without duplicates.
    #[serde(default)]
    pub courses: Vec<String>,
}

impl Student {
    pub fn new(name: &str, email: &str) -> Self {
        Self { name: name.to_string(), email: email.to_string(), ..Default::default() }
    }

    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.courses.iter().any(|c| c == course_id)
    }

    /// Re-split keys read from disk now that the course ids are known.
    pub fn resolve_attendance_keys(&mut self, is_course: impl Fn(&str) -> bool) {
        let entries = std::mem::take(&mut self.attendance);
        self.attendance = entries
            .into_iter()
            .map(|(key, status)| (AttendanceKey::decode(&key.to_string(), &is_course), status))
            .collect();
    }
}

/// Non-empty identifier, kept exactly as given.
pub fn validate_id<'a>(id: &'a str, what: &str) -> Result<&'a str, ModelError> {
    if id.is_empty() {
        return Err(ModelError::Validation(format!("{what} ID and name cannot be empty.")));
    }
    Ok(id)
}

pub fn validate_name<'a>(name: &'a str, what: &str) -> Result<&'a str, ModelError> {
    if name.is_empty() {
        return Err(ModelError::Validation(format!("{what} ID and name cannot be empty.")));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_fields_default() {
        let s: Student = serde_json::from_str(r#"{"name":"Ana"}"#).unwrap();
        assert_eq!(s.name, "Ana");
        assert_eq!(s.email, "");
        assert!(s.attendance.is_empty());
        assert!(s.courses.is_empty());
    }

    #[test]
    fn only_empty_identifiers_fail_validation() {
        assert!(validate_id("", "Student").is_err());
        assert!(validate_name("", "Student").is_err());
        assert_eq!(validate_id(" S1 ", "Student").unwrap(), " S1 ");
    }

    #[test]
    fn legacy_keys_resolve_against_known_courses() {
        let raw = r#"{"name":"Ana","attendance":{"2024-01-10_C1":"Present","10/01/2024":"Late","wk_2_C9":"Absent"}}"#;
        let mut s: Student = serde_json::from_str(raw).unwrap();
        s.resolve_attendance_keys(|c| c == "C1");

        assert_eq!(s.attendance[&AttendanceKey::new("2024-01-10", Some("C1"))], AttendanceStatus::Present);
        assert_eq!(s.attendance[&AttendanceKey::bare("10/01/2024")], AttendanceStatus::Late);
        assert_eq!(s.attendance[&AttendanceKey::bare("wk_2_C9")], AttendanceStatus::Absent);
        assert_eq!(
            serde_json::to_value(&s.attendance).unwrap(),
            serde_json::json!({"2024-01-10_C1": "Present", "10/01/2024": "Late", "wk_2_C9": "Absent"})
        );
    }
}
