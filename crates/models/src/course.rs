use serde::{Deserialize, Serialize};

/// A course record as stored under `courses.<id>`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    #[serde(default)]
    pub instructor: String,
    /// Reserved for timetable data; kept verbatim across load/save.
    #[serde(default)]
    pub schedule: Vec<serde_json::Value>,
}

impl Course {
    pub fn new(name: &str, instructor: &str) -> Self {
        Self { name: name.to_string(), instructor: instructor.to_string(), schedule: Vec::new() }
    }

    /// Name lowercased with spaces replaced, used in export file names.
    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace(' ', "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_survives_round_trip() {
        let raw = r#"{"name":"Math","instructor":"","schedule":[{"day":"Mon"}]}"#;
        let c: Course = serde_json::from_str(raw).unwrap();
        assert!(c.instructor.is_empty());
        assert_eq!(serde_json::to_string(&c).unwrap(), raw);
    }

    #[test]
    fn slug_lowercases_and_replaces_spaces() {
        assert_eq!(Course::new("Intro To Rust", "").slug(), "intro_to_rust");
    }
}
