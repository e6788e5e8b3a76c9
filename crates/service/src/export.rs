//! CSV export of the attendance summary.

use std::borrow::Cow;

use chrono::NaiveDate;

use crate::records::RecordStore;

const HEADER_ALL: [&str; 10] = [
    "Student ID", "Name", "Email", "Courses", "Total Days", "Present", "Absent", "Late", "Excused", "Attendance %",
];
const HEADER_COURSE: [&str; 9] =
    ["Student ID", "Name", "Email", "Total Days", "Present", "Absent", "Late", "Excused", "Attendance %"];

/// Rendered CSV plus the suggested download name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

/// Build the summary CSV, for every student or for one course's enrollees.
pub fn export_csv(store: &RecordStore, course_id: Option<&str>, today: NaiveDate) -> CsvExport {
    let course_id = course_id.filter(|c| !c.is_empty());
    let mut body = String::new();

    match course_id {
        Some(_) => write_row(&mut body, HEADER_COURSE),
        None => write_row(&mut body, HEADER_ALL),
    }

    for (student_id, summary) in store.get_summary(course_id) {
        let Some(student) = store.student(&student_id) else { continue };
        let counts = [
            summary.total_days.to_string(),
            summary.present_days.to_string(),
            summary.absent_days.to_string(),
            summary.late_days.to_string(),
            summary.excused_days.to_string(),
            format!("{:.2}%", summary.attendance_percentage),
        ];
        let mut row = vec![student_id.clone(), student.name.clone(), student.email.clone()];
        if course_id.is_none() {
            let names: Vec<&str> = student
                .courses
                .iter()
                .filter_map(|c| store.course(c).map(|course| course.name.as_str()))
                .collect();
            row.push(names.join(", "));
        }
        row.extend(counts);
        write_row(&mut body, row.iter().map(String::as_str));
    }

    let label = course_id
        .and_then(|c| store.course(c))
        .map(|course| course.slug())
        .unwrap_or_else(|| "all_courses".to_string());
    let filename = format!("attendance_{label}_{}.csv", today.format("%Y%m%d"));

    CsvExport { filename, body }
}

fn write_row<'a, I>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = &'a str>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape(field));
    }
    out.push_str("\r\n");
}

/// Quote fields containing a delimiter, quote or line break.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn populated() -> RecordStore {
        let mut store = RecordStore::new();
        store.add_student("S1", "Ana", "ana@example.com").unwrap();
        store.add_student("S2", "Bo, Jr.", "").unwrap();
        store.add_course("C1", "Linear Algebra", "").unwrap();
        store.add_course("C2", "Art", "").unwrap();
        store.enroll_student("S1", "C1").unwrap();
        store.enroll_student("S1", "C2").unwrap();
        store.mark_attendance("S1", "2024-01-10", "Present", Some("C1")).unwrap();
        store.mark_attendance("S1", "2024-01-11", "Absent", Some("C1")).unwrap();
        store.mark_attendance("S1", "2024-01-12", "Late", None).unwrap();
        store
    }

    #[test]
    fn unfiltered_export_lists_every_student_with_course_names() {
        let export = export_csv(&populated(), None, today());
        assert_eq!(export.filename, "attendance_all_courses_20240305.csv");

        let lines: Vec<&str> = export.body.split("\r\n").collect();
        assert_eq!(
            lines[0],
            "Student ID,Name,Email,Courses,Total Days,Present,Absent,Late,Excused,Attendance %"
        );
        assert_eq!(lines[1], "S1,Ana,ana@example.com,\"Linear Algebra, Art\",3,1,1,1,0,33.33%");
        assert_eq!(lines[2], "S2,\"Bo, Jr.\",,,0,0,0,0,0,0.00%");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn course_export_drops_courses_column_and_filters() {
        let export = export_csv(&populated(), Some("C1"), today());
        assert_eq!(export.filename, "attendance_linear_algebra_20240305.csv");

        let lines: Vec<&str> = export.body.lines().collect();
        assert_eq!(lines[0], "Student ID,Name,Email,Total Days,Present,Absent,Late,Excused,Attendance %");
        assert_eq!(lines[1], "S1,Ana,ana@example.com,2,1,1,0,0,50.00%");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn unknown_course_exports_header_only() {
        let export = export_csv(&populated(), Some("C9"), today());
        assert_eq!(export.filename, "attendance_all_courses_20240305.csv");
        assert_eq!(export.body.lines().count(), 1);
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(escape(r#"say "hi""#), r#""say ""hi""""#);
        assert_eq!(escape("plain"), "plain");
    }
}
