//! JSON API over the same operations as the HTML pages.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::{AttendanceKey, AttendanceStatus, AttendanceSummary, Course, Student};
use serde::{Deserialize, Serialize};
use service::records::NamedRef;
use service::ServiceError;

use crate::errors::JsonApiError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, JsonApiError>;

#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
    pub message: String,
}

fn ack(message: String) -> Json<Ack> {
    Json(Ack { ok: true, message })
}

#[derive(Debug, Serialize)]
pub struct StudentView {
    pub id: String,
    #[serde(flatten)]
    pub student: Student,
}

#[derive(Debug, Serialize)]
pub struct CourseView {
    pub id: String,
    #[serde(flatten)]
    pub course: Course,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrolled_students: Option<Vec<NamedRef>>,
}

#[derive(Debug, Deserialize)]
pub struct NewStudent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct NewCourse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub instructor: String,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceInput {
    pub student_id: String,
    pub date: String,
    pub status: String,
    #[serde(default)]
    pub course_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollmentInput {
    pub student_id: String,
    pub course_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseFilter {
    pub course_id: Option<String>,
}

pub async fn list_students(State(state): State<AppState>) -> Json<Vec<StudentView>> {
    let students = state.service.students().await;
    Json(students.into_iter().map(|(id, student)| StudentView { id, student }).collect())
}

pub async fn add_student(
    State(state): State<AppState>,
    Json(input): Json<NewStudent>,
) -> Result<(StatusCode, Json<Ack>), JsonApiError> {
    let msg = state.service.add_student(&input.id, &input.name, &input.email).await?;
    Ok((StatusCode::CREATED, ack(msg)))
}

pub async fn get_student(State(state): State<AppState>, Path(student_id): Path<String>) -> ApiResult<StudentView> {
    let student = state
        .service
        .student(&student_id)
        .await
        .ok_or_else(|| ServiceError::student_not_found(&student_id))?;
    Ok(Json(StudentView { id: student_id, student }))
}

pub async fn get_attendance(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Query(filter): Query<CourseFilter>,
) -> ApiResult<BTreeMap<AttendanceKey, AttendanceStatus>> {
    let attendance = state.service.get_attendance(&student_id, filter.course_id.as_deref()).await?;
    Ok(Json(attendance))
}

pub async fn list_courses(State(state): State<AppState>) -> Json<Vec<CourseView>> {
    let courses = state.service.courses().await;
    Json(
        courses
            .into_iter()
            .map(|(id, course)| CourseView { id, course, enrolled_students: None })
            .collect(),
    )
}

pub async fn add_course(
    State(state): State<AppState>,
    Json(input): Json<NewCourse>,
) -> Result<(StatusCode, Json<Ack>), JsonApiError> {
    let msg = state.service.add_course(&input.id, &input.name, &input.instructor).await?;
    Ok((StatusCode::CREATED, ack(msg)))
}

pub async fn get_course(State(state): State<AppState>, Path(course_id): Path<String>) -> ApiResult<CourseView> {
    let course = state
        .service
        .course(&course_id)
        .await
        .ok_or_else(|| ServiceError::course_not_found(&course_id))?;
    let enrolled = state.service.enrolled_students(&course_id).await?;
    Ok(Json(CourseView { id: course_id, course, enrolled_students: Some(enrolled) }))
}

pub async fn mark_attendance(State(state): State<AppState>, Json(input): Json<AttendanceInput>) -> ApiResult<Ack> {
    let msg = state
        .service
        .mark_attendance(&input.student_id, &input.date, &input.status, input.course_id.as_deref())
        .await?;
    Ok(ack(msg))
}

pub async fn edit_attendance(State(state): State<AppState>, Json(input): Json<AttendanceInput>) -> ApiResult<Ack> {
    let msg = state
        .service
        .edit_attendance(&input.student_id, &input.date, &input.status, input.course_id.as_deref())
        .await?;
    Ok(ack(msg))
}

pub async fn enroll(State(state): State<AppState>, Json(input): Json<EnrollmentInput>) -> ApiResult<Ack> {
    let msg = state.service.enroll_student(&input.student_id, &input.course_id).await?;
    Ok(ack(msg))
}

pub async fn unenroll(
    State(state): State<AppState>,
    Path((student_id, course_id)): Path<(String, String)>,
) -> ApiResult<Ack> {
    let msg = state.service.unenroll_student(&student_id, &course_id).await?;
    Ok(ack(msg))
}

pub async fn summary(
    State(state): State<AppState>,
    Query(filter): Query<CourseFilter>,
) -> Json<BTreeMap<String, AttendanceSummary>> {
    Json(state.service.get_summary(filter.course_id.as_deref()).await)
}
