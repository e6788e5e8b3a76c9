use serde::{Deserialize, Serialize};

use crate::attendance::AttendanceStatus;

/// Per-student attendance counts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub name: String,
    pub total_days: usize,
    pub present_days: usize,
    pub absent_days: usize,
    pub late_days: usize,
    pub excused_days: usize,
    /// `present / total * 100`, exactly `0.0` when there are no entries.
    pub attendance_percentage: f64,
}

impl AttendanceSummary {
    pub fn tally<'a, I>(name: &str, statuses: I) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceStatus>,
    {
        let mut summary = Self { name: name.to_string(), ..Default::default() };
        for status in statuses {
            summary.total_days += 1;
            match status {
                AttendanceStatus::Present => summary.present_days += 1,
                AttendanceStatus::Absent => summary.absent_days += 1,
                AttendanceStatus::Late => summary.late_days += 1,
                AttendanceStatus::Excused => summary.excused_days += 1,
            }
        }
        summary.attendance_percentage = if summary.total_days == 0 {
            0.0
        } else {
            summary.present_days as f64 / summary.total_days as f64 * 100.0
        };
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tally_has_zero_percentage() {
        let s = AttendanceSummary::tally("Ana", []);
        assert_eq!(s.total_days, 0);
        assert_eq!(s.attendance_percentage, 0.0);
        assert!(!s.attendance_percentage.is_nan());
    }

    #[test]
    fn counts_each_status() {
        use AttendanceStatus::*;
        let s = AttendanceSummary::tally("Ana", &[Present, Present, Late, Absent, Excused]);
        assert_eq!((s.total_days, s.present_days, s.absent_days, s.late_days, s.excused_days), (5, 2, 1, 1, 1));
        assert!((s.attendance_percentage - 40.0).abs() < f64::EPSILON);
    }
}
