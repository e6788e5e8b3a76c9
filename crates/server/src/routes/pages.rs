//! Server-rendered HTML pages.
//!
//! Form posts render their result page directly with a banner instead of
//! redirecting, so a rejected submission keeps what the user typed.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use minijinja::context;
use models::{AttendanceStatus, Student};
use serde::{Deserialize, Serialize};
use service::{ServiceError, ServiceResult};

use crate::errors::{status_for, PageError};
use crate::state::AppState;
use crate::views::Flash;

type PageResult = Result<Response, PageError>;

#[derive(Serialize)]
struct StudentRow {
    id: String,
    name: String,
    email: String,
    course_count: usize,
}

#[derive(Serialize)]
struct CourseRow {
    id: String,
    name: String,
    instructor: String,
}

#[derive(Serialize)]
struct AttendanceRow {
    date: String,
    course_id: Option<String>,
    course_name: Option<String>,
    status: AttendanceStatus,
}

#[derive(Serialize)]
struct SummaryRow {
    id: String,
    name: String,
    total_days: usize,
    present_days: usize,
    absent_days: usize,
    late_days: usize,
    excused_days: usize,
    percentage: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AddStudentForm {
    pub student_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AddCourseForm {
    pub course_id: String,
    pub name: String,
    pub instructor: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AttendanceForm {
    pub student_id: String,
    pub date: String,
    pub status: String,
    pub course_id: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EditAttendanceForm {
    pub date: String,
    pub status: String,
    pub course_id: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EnrollForm {
    pub student_id: String,
    pub course_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseQuery {
    pub course_id: Option<String>,
}

fn statuses() -> [&'static str; 4] {
    AttendanceStatus::ALL.map(|s| s.as_str())
}

fn outcome(result: &ServiceResult<String>) -> (StatusCode, Flash) {
    match result {
        Ok(msg) => (StatusCode::OK, Flash::success(msg.as_str())),
        Err(e) => (status_for(e), Flash::danger(e.to_string())),
    }
}

async fn student_rows(state: &AppState) -> Vec<StudentRow> {
    state
        .service
        .students()
        .await
        .into_iter()
        .map(|(id, s)| StudentRow { id, course_count: s.courses.len(), name: s.name, email: s.email })
        .collect()
}

async fn course_rows(state: &AppState) -> Vec<CourseRow> {
    state
        .service
        .courses()
        .await
        .into_iter()
        .map(|(id, c)| CourseRow { id, name: c.name, instructor: c.instructor })
        .collect()
}

async fn attendance_rows(state: &AppState, student: &Student) -> Vec<AttendanceRow> {
    let names: HashMap<String, String> =
        state.service.courses().await.into_iter().map(|(id, c)| (id, c.name)).collect();
    student
        .attendance
        .iter()
        .map(|(key, status)| AttendanceRow {
            date: key.date.clone(),
            course_name: key.course_id.as_ref().and_then(|c| names.get(c).cloned()),
            course_id: key.course_id.clone(),
            status: *status,
        })
        .collect()
}

async fn render_students(state: &AppState, status: StatusCode, flash: Option<Flash>) -> PageResult {
    let students = student_rows(state).await;
    state.views.page(status, "students.html", context! { flash, students })
}

async fn render_courses(state: &AppState, status: StatusCode, flash: Option<Flash>) -> PageResult {
    let courses = course_rows(state).await;
    state.views.page(status, "courses.html", context! { flash, courses })
}

async fn render_student_details(
    state: &AppState,
    student_id: &str,
    status: StatusCode,
    flash: Option<Flash>,
) -> PageResult {
    let Some(student) = state.service.student(student_id).await else {
        let msg = ServiceError::student_not_found(student_id).to_string();
        return render_students(state, StatusCode::NOT_FOUND, Some(Flash::danger(msg))).await;
    };
    let enrolled_courses = state.service.enrolled_courses(student_id).await.unwrap_or_default();
    let attendance = attendance_rows(state, &student).await;
    state.views.page(
        status,
        "student_details.html",
        context! { flash, student_id, student, enrolled_courses, attendance },
    )
}

pub async fn index(State(state): State<AppState>) -> PageResult {
    let (student_count, course_count) = state.service.counts().await;
    state.views.page(StatusCode::OK, "index.html", context! { student_count, course_count })
}

pub async fn students(State(state): State<AppState>) -> PageResult {
    render_students(&state, StatusCode::OK, None).await
}

pub async fn add_student_form(State(state): State<AppState>) -> PageResult {
    state.views.page(StatusCode::OK, "add_student.html", context! { form => AddStudentForm::default() })
}

pub async fn add_student(State(state): State<AppState>, Form(form): Form<AddStudentForm>) -> PageResult {
    match state.service.add_student(&form.student_id, &form.name, &form.email).await {
        Ok(msg) => render_students(&state, StatusCode::OK, Some(Flash::success(msg))).await,
        Err(e) => state.views.page(
            status_for(&e),
            "add_student.html",
            context! { flash => Flash::danger(e.to_string()), form },
        ),
    }
}

pub async fn student_details(State(state): State<AppState>, Path(student_id): Path<String>) -> PageResult {
    render_student_details(&state, &student_id, StatusCode::OK, None).await
}

pub async fn courses(State(state): State<AppState>) -> PageResult {
    render_courses(&state, StatusCode::OK, None).await
}

pub async fn add_course_form(State(state): State<AppState>) -> PageResult {
    state.views.page(StatusCode::OK, "add_course.html", context! { form => AddCourseForm::default() })
}

pub async fn add_course(State(state): State<AppState>, Form(form): Form<AddCourseForm>) -> PageResult {
    match state.service.add_course(&form.course_id, &form.name, &form.instructor).await {
        Ok(msg) => render_courses(&state, StatusCode::OK, Some(Flash::success(msg))).await,
        Err(e) => state.views.page(
            status_for(&e),
            "add_course.html",
            context! { flash => Flash::danger(e.to_string()), form },
        ),
    }
}

pub async fn course_details(State(state): State<AppState>, Path(course_id): Path<String>) -> PageResult {
    let Some(course) = state.service.course(&course_id).await else {
        let msg = ServiceError::course_not_found(&course_id).to_string();
        return render_courses(&state, StatusCode::NOT_FOUND, Some(Flash::danger(msg))).await;
    };
    let enrolled_students = state.service.enrolled_students(&course_id).await.unwrap_or_default();
    state.views.page(StatusCode::OK, "course_details.html", context! { course_id, course, enrolled_students })
}

async fn render_mark(
    state: &AppState,
    status: StatusCode,
    flash: Option<Flash>,
    form: &AttendanceForm,
) -> PageResult {
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    let students = student_rows(state).await;
    let courses = course_rows(state).await;
    state.views.page(
        status,
        "mark_attendance.html",
        context! { flash, form, students, courses, today, statuses => statuses() },
    )
}

pub async fn mark_attendance_form(State(state): State<AppState>) -> PageResult {
    render_mark(&state, StatusCode::OK, None, &AttendanceForm::default()).await
}

pub async fn mark_attendance(State(state): State<AppState>, Form(form): Form<AttendanceForm>) -> PageResult {
    let result = state
        .service
        .mark_attendance(&form.student_id, &form.date, &form.status, Some(&form.course_id))
        .await;
    let (status, flash) = outcome(&result);
    render_mark(&state, status, Some(flash), &form).await
}

async fn render_edit(
    state: &AppState,
    student_id: &str,
    status: StatusCode,
    flash: Option<Flash>,
    form: &EditAttendanceForm,
) -> PageResult {
    let Some(student) = state.service.student(student_id).await else {
        let msg = ServiceError::student_not_found(student_id).to_string();
        return render_students(state, StatusCode::NOT_FOUND, Some(Flash::danger(msg))).await;
    };
    let attendance = attendance_rows(state, &student).await;
    let courses = course_rows(state).await;
    state.views.page(
        status,
        "edit_attendance.html",
        context! { flash, form, student_id, student, attendance, courses, statuses => statuses() },
    )
}

pub async fn edit_attendance_form(State(state): State<AppState>, Path(student_id): Path<String>) -> PageResult {
    render_edit(&state, &student_id, StatusCode::OK, None, &EditAttendanceForm::default()).await
}

pub async fn edit_attendance(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Form(form): Form<EditAttendanceForm>,
) -> PageResult {
    match state
        .service
        .edit_attendance(&student_id, &form.date, &form.status, Some(&form.course_id))
        .await
    {
        Ok(msg) => render_student_details(&state, &student_id, StatusCode::OK, Some(Flash::success(msg))).await,
        Err(e) => render_edit(&state, &student_id, status_for(&e), Some(Flash::danger(e.to_string())), &form).await,
    }
}

async fn render_enroll(state: &AppState, status: StatusCode, flash: Option<Flash>, form: &EnrollForm) -> PageResult {
    let students = student_rows(state).await;
    let courses = course_rows(state).await;
    state.views.page(status, "enroll.html", context! { flash, form, students, courses })
}

pub async fn enroll_form(State(state): State<AppState>) -> PageResult {
    render_enroll(&state, StatusCode::OK, None, &EnrollForm::default()).await
}

pub async fn enroll(State(state): State<AppState>, Form(form): Form<EnrollForm>) -> PageResult {
    match state.service.enroll_student(&form.student_id, &form.course_id).await {
        Ok(msg) => {
            render_student_details(&state, &form.student_id, StatusCode::OK, Some(Flash::success(msg))).await
        }
        Err(e) => render_enroll(&state, status_for(&e), Some(Flash::danger(e.to_string())), &form).await,
    }
}

pub async fn unenroll(
    State(state): State<AppState>,
    Path((student_id, course_id)): Path<(String, String)>,
) -> PageResult {
    let result = state.service.unenroll_student(&student_id, &course_id).await;
    let (status, flash) = outcome(&result);
    render_student_details(&state, &student_id, status, Some(flash)).await
}

pub async fn summary(State(state): State<AppState>, Query(query): Query<CourseQuery>) -> PageResult {
    let selected_course = query.course_id.filter(|c| !c.is_empty());
    let rows: Vec<SummaryRow> = state
        .service
        .get_summary(selected_course.as_deref())
        .await
        .into_iter()
        .map(|(id, s)| SummaryRow {
            id,
            percentage: format!("{:.2}", s.attendance_percentage),
            name: s.name,
            total_days: s.total_days,
            present_days: s.present_days,
            absent_days: s.absent_days,
            late_days: s.late_days,
            excused_days: s.excused_days,
        })
        .collect();
    let courses = course_rows(&state).await;
    state.views.page(StatusCode::OK, "summary.html", context! { rows, courses, selected_course })
}
