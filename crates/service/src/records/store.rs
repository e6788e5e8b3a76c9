use std::collections::BTreeMap;

use models::student::{validate_id, validate_name};
use models::{AttendanceKey, AttendanceStatus, AttendanceSummary, Course, Student};
use serde::Serialize;

use crate::errors::{ServiceError, ServiceResult};
use crate::storage::RecordsDocument;

/// `(id, name)` pair used when listing enrollments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

/// Students and courses keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordStore {
    doc: RecordsDocument,
}

/// An empty course id means "not course-scoped".
fn course_filter(course_id: Option<&str>) -> Option<&str> {
    course_id.filter(|c| !c.is_empty())
}

/// Loaded documents carry attendance keys in their on-disk string form;
/// they are split into date and course here, once the course ids are known.
impl From<RecordsDocument> for RecordStore {
    fn from(mut doc: RecordsDocument) -> Self {
        let courses = &doc.courses;
        for student in doc.records.values_mut() {
            student.resolve_attendance_keys(|c| courses.contains_key(c));
        }
        Self { doc }
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state in its persisted shape.
    pub fn document(&self) -> &RecordsDocument {
        &self.doc
    }

    fn student_ref(&self, id: &str) -> ServiceResult<&Student> {
        self.doc.records.get(id).ok_or_else(|| ServiceError::student_not_found(id))
    }

    fn course_ref(&self, id: &str) -> ServiceResult<&Course> {
        self.doc.courses.get(id).ok_or_else(|| ServiceError::course_not_found(id))
    }

    fn student_mut(&mut self, id: &str) -> ServiceResult<&mut Student> {
        self.doc.records.get_mut(id).ok_or_else(|| ServiceError::student_not_found(id))
    }

    pub fn add_student(&mut self, id: &str, name: &str, email: &str) -> ServiceResult<String> {
        let id = validate_id(id, "Student")?;
        let name = validate_name(name, "Student")?;
        if self.doc.records.contains_key(id) {
            return Err(ServiceError::AlreadyExists(format!("Student ID {id} already exists.")));
        }
        self.doc.records.insert(id.to_string(), Student::new(name, email));
        Ok(format!("Student {name} added successfully."))
    }

    /// Record a status for a day that has none yet. Re-marking is rejected;
    /// use [`RecordStore::edit_attendance`] to change a recorded status.
    pub fn mark_attendance(
        &mut self,
        student_id: &str,
        date: &str,
        status: &str,
        course_id: Option<&str>,
    ) -> ServiceResult<String> {
        let course_id = course_filter(course_id);
        let student = self.student_ref(student_id)?;

        if let Some(course_id) = course_id {
            self.course_ref(course_id)?;
            if !student.is_enrolled(course_id) {
                return Err(ServiceError::NotEnrolled(format!(
                    "Student {} is not enrolled in course {course_id}.",
                    student.name
                )));
            }
        }

        let key = AttendanceKey::new(date, course_id);
        if student.attendance.contains_key(&key) {
            return Err(ServiceError::AlreadyExists(format!(
                "Attendance for {} on {} is already recorded.",
                student.name, key.date
            )));
        }
        let status: AttendanceStatus = status.parse()?;

        let student = self.student_mut(student_id)?;
        let message = format!("Attendance marked for {} on {} as {status}.", student.name, key.date);
        student.attendance.insert(key, status);
        Ok(message)
    }

    /// Overwrite a status recorded earlier by `mark_attendance`.
    pub fn edit_attendance(
        &mut self,
        student_id: &str,
        date: &str,
        status: &str,
        course_id: Option<&str>,
    ) -> ServiceResult<String> {
        let course_id = course_filter(course_id);
        let student = self.student_mut(student_id)?;
        let key = AttendanceKey::new(date, course_id);

        if !student.attendance.contains_key(&key) {
            return Err(ServiceError::NotFound(format!(
                "No attendance record found for {} on {}.",
                student.name, key.date
            )));
        }
        let status: AttendanceStatus = status.parse()?;

        let message = format!("Attendance updated for {} on {} as {status}.", student.name, key.date);
        student.attendance.insert(key, status);
        Ok(message)
    }

    /// All entries of a student, or only one course's entries re-keyed to bare dates.
    pub fn get_attendance(
        &self,
        student_id: &str,
        course_id: Option<&str>,
    ) -> ServiceResult<BTreeMap<AttendanceKey, AttendanceStatus>> {
        let student = self.student_ref(student_id)?;
        let entries = match course_filter(course_id) {
            Some(course_id) => student
                .attendance
                .iter()
                .filter(|(key, _)| key.is_for_course(course_id))
                .map(|(key, status)| (AttendanceKey::bare(key.date.clone()), *status))
                .collect(),
            None => student.attendance.clone(),
        };
        Ok(entries)
    }

    /// Per-student counts. With a course, students not enrolled in it are
    /// skipped and only that course's entries are counted.
    pub fn get_summary(&self, course_id: Option<&str>) -> BTreeMap<String, AttendanceSummary> {
        let course_id = course_filter(course_id);
        self.doc
            .records
            .iter()
            .filter(|(_, student)| course_id.map_or(true, |c| student.is_enrolled(c)))
            .map(|(id, student)| {
                let statuses = student
                    .attendance
                    .iter()
                    .filter(|(key, _)| course_id.map_or(true, |c| key.is_for_course(c)))
                    .map(|(_, status)| status);
                (id.clone(), AttendanceSummary::tally(&student.name, statuses))
            })
            .collect()
    }

    pub fn add_course(&mut self, id: &str, name: &str, instructor: &str) -> ServiceResult<String> {
        let id = validate_id(id, "Course")?;
        let name = validate_name(name, "Course")?;
        if self.doc.courses.contains_key(id) {
            return Err(ServiceError::AlreadyExists(format!("Course ID {id} already exists.")));
        }
        self.doc.courses.insert(id.to_string(), Course::new(name, instructor));
        Ok(format!("Course {name} added successfully."))
    }

    pub fn enroll_student(&mut self, student_id: &str, course_id: &str) -> ServiceResult<String> {
        self.student_ref(student_id)?;
        let course_name = self.course_ref(course_id)?.name.clone();

        let student = self.student_mut(student_id)?;
        if student.is_enrolled(course_id) {
            return Err(ServiceError::AlreadyExists(format!(
                "Student {} is already enrolled in {course_name}.",
                student.name
            )));
        }
        student.courses.push(course_id.to_string());
        Ok(format!("Student {} enrolled in {course_name}.", student.name))
    }

    /// Drop an enrollment. Course-scoped attendance stays stored and shows up
    /// again if the student re-enrolls.
    pub fn unenroll_student(&mut self, student_id: &str, course_id: &str) -> ServiceResult<String> {
        self.student_ref(student_id)?;
        let course_name = self.course_ref(course_id)?.name.clone();

        let student = self.student_mut(student_id)?;
        let Some(pos) = student.courses.iter().position(|c| c == course_id) else {
            return Err(ServiceError::NotEnrolled(format!(
                "Student {} is not enrolled in {course_name}.",
                student.name
            )));
        };
        student.courses.remove(pos);
        Ok(format!("Student {} unenrolled from {course_name}.", student.name))
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.doc.records.get(id)
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.doc.courses.get(id)
    }

    pub fn students(&self) -> impl Iterator<Item = (&String, &Student)> {
        self.doc.records.iter()
    }

    pub fn courses(&self) -> impl Iterator<Item = (&String, &Course)> {
        self.doc.courses.iter()
    }

    /// Courses a student is enrolled in, in enrollment order. Ids that no
    /// longer resolve to a course are skipped.
    pub fn enrolled_courses(&self, student_id: &str) -> ServiceResult<Vec<NamedRef>> {
        let student = self.student_ref(student_id)?;
        Ok(student
            .courses
            .iter()
            .filter_map(|id| {
                self.doc.courses.get(id).map(|c| NamedRef { id: id.clone(), name: c.name.clone() })
            })
            .collect())
    }

    pub fn enrolled_students(&self, course_id: &str) -> ServiceResult<Vec<NamedRef>> {
        self.course_ref(course_id)?;
        Ok(self
            .doc
            .records
            .iter()
            .filter(|(_, s)| s.is_enrolled(course_id))
            .map(|(id, s)| NamedRef { id: id.clone(), name: s.name.clone() })
            .collect())
    }

    /// `(students, courses)`
    pub fn counts(&self) -> (usize, usize) {
        (self.doc.records.len(), self.doc.courses.len())
    }
}
