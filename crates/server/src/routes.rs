use axum::{
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub mod api;
pub mod export;
pub mod pages;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: HTML pages, CSV export and the JSON API.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let pages = Router::new()
        .route("/", get(pages::index))
        .route("/students", get(pages::students))
        .route("/students/add", get(pages::add_student_form).post(pages::add_student))
        .route("/student/:student_id", get(pages::student_details))
        .route("/courses", get(pages::courses))
        .route("/courses/add", get(pages::add_course_form).post(pages::add_course))
        .route("/courses/:course_id", get(pages::course_details))
        .route("/attendance", get(pages::mark_attendance_form).post(pages::mark_attendance))
        .route(
            "/attendance/edit/:student_id",
            get(pages::edit_attendance_form).post(pages::edit_attendance),
        )
        .route("/enroll", get(pages::enroll_form).post(pages::enroll))
        .route("/unenroll/:student_id/:course_id", post(pages::unenroll))
        .route("/summary", get(pages::summary))
        .route("/export", get(export::export_csv));

    // JSON API，与页面共用同一个 AttendanceService
    let api = Router::new()
        .route("/api/students", get(api::list_students).post(api::add_student))
        .route("/api/students/:student_id", get(api::get_student))
        .route("/api/students/:student_id/attendance", get(api::get_attendance))
        .route("/api/courses", get(api::list_courses).post(api::add_course))
        .route("/api/courses/:course_id", get(api::get_course))
        .route("/api/attendance", post(api::mark_attendance).put(api::edit_attendance))
        .route("/api/enrollments", post(api::enroll))
        .route("/api/enrollments/:student_id/:course_id", axum::routing::delete(api::unenroll))
        .route("/api/summary", get(api::summary));

    Router::new()
        .route("/health", get(health))
        .merge(pages)
        .merge(api)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        // 每次请求创建 span，日志级别为 INFO
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                        // 失败（5xx 等）时以 ERROR 记录
                        .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
                )
                .layer(cors),
        )
}
