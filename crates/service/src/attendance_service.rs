use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use models::{AttendanceKey, AttendanceStatus, AttendanceSummary, Course, Student};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::errors::ServiceResult;
use crate::export::{self, CsvExport};
use crate::records::{NamedRef, RecordStore};
use crate::storage::SnapshotStore;

/// Shared entry point over the record store.
///
/// One instance is built at startup and handed to the HTTP layer. Each
/// mutation holds the write lock across validation, the in-memory change and
/// the snapshot save. A failed save rolls memory back and is returned to the
/// caller.
pub struct AttendanceService {
    records: RwLock<RecordStore>,
    snapshots: Arc<dyn SnapshotStore>,
}

impl AttendanceService {
    /// Load the last snapshot and wrap it.
    pub async fn load(snapshots: Arc<dyn SnapshotStore>) -> ServiceResult<Arc<Self>> {
        let document = snapshots.load().await?;
        let records = RecordStore::from(document);
        let (students, courses) = records.counts();
        info!(students, courses, "record store loaded");
        Ok(Arc::new(Self { records: RwLock::new(records), snapshots }))
    }

    async fn mutate<T, F>(&self, op: &'static str, f: F) -> ServiceResult<T>
    where
        F: FnOnce(&mut RecordStore) -> ServiceResult<T>,
    {
        let mut records = self.records.write().await;
        let before = records.clone();
        let out = match f(&mut *records) {
            Ok(out) => out,
            Err(e) => {
                warn!(op, kind = e.kind(), error = %e, "mutation rejected");
                return Err(e);
            }
        };
        if let Err(e) = self.snapshots.save(records.document()).await {
            *records = before;
            error!(op, error = %e, "snapshot save failed; in-memory change rolled back");
            return Err(e);
        }
        info!(op, "mutation committed");
        Ok(out)
    }

    pub async fn add_student(&self, id: &str, name: &str, email: &str) -> ServiceResult<String> {
        self.mutate("add_student", |r| r.add_student(id, name, email)).await
    }

    pub async fn mark_attendance(
        &self,
        student_id: &str,
        date: &str,
        status: &str,
        course_id: Option<&str>,
    ) -> ServiceResult<String> {
        self.mutate("mark_attendance", |r| r.mark_attendance(student_id, date, status, course_id)).await
    }

    pub async fn edit_attendance(
        &self,
        student_id: &str,
        date: &str,
        status: &str,
        course_id: Option<&str>,
    ) -> ServiceResult<String> {
        self.mutate("edit_attendance", |r| r.edit_attendance(student_id, date, status, course_id)).await
    }

    pub async fn add_course(&self, id: &str, name: &str, instructor: &str) -> ServiceResult<String> {
        self.mutate("add_course", |r| r.add_course(id, name, instructor)).await
    }

    pub async fn enroll_student(&self, student_id: &str, course_id: &str) -> ServiceResult<String> {
        self.mutate("enroll_student", |r| r.enroll_student(student_id, course_id)).await
    }

    pub async fn unenroll_student(&self, student_id: &str, course_id: &str) -> ServiceResult<String> {
        self.mutate("unenroll_student", |r| r.unenroll_student(student_id, course_id)).await
    }

    pub async fn get_attendance(
        &self,
        student_id: &str,
        course_id: Option<&str>,
    ) -> ServiceResult<BTreeMap<AttendanceKey, AttendanceStatus>> {
        self.records.read().await.get_attendance(student_id, course_id)
    }

    pub async fn get_summary(&self, course_id: Option<&str>) -> BTreeMap<String, AttendanceSummary> {
        self.records.read().await.get_summary(course_id)
    }

    pub async fn student(&self, id: &str) -> Option<Student> {
        self.records.read().await.student(id).cloned()
    }

    pub async fn course(&self, id: &str) -> Option<Course> {
        self.records.read().await.course(id).cloned()
    }

    pub async fn students(&self) -> Vec<(String, Student)> {
        self.records.read().await.students().map(|(id, s)| (id.clone(), s.clone())).collect()
    }

    pub async fn courses(&self) -> Vec<(String, Course)> {
        self.records.read().await.courses().map(|(id, c)| (id.clone(), c.clone())).collect()
    }

    pub async fn enrolled_courses(&self, student_id: &str) -> ServiceResult<Vec<NamedRef>> {
        self.records.read().await.enrolled_courses(student_id)
    }

    pub async fn enrolled_students(&self, course_id: &str) -> ServiceResult<Vec<NamedRef>> {
        self.records.read().await.enrolled_students(course_id)
    }

    /// `(students, courses)`
    pub async fn counts(&self) -> (usize, usize) {
        self.records.read().await.counts()
    }

    pub async fn export_csv(&self, course_id: Option<&str>, today: NaiveDate) -> CsvExport {
        export::export_csv(&*self.records.read().await, course_id, today)
    }
}
