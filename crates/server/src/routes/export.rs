use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::routes::pages::CourseQuery;
use crate::state::AppState;

/// Course names may carry characters a header value cannot.
fn header_safe(filename: &str) -> String {
    filename
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') { c } else { '_' })
        .collect()
}

pub async fn export_csv(State(state): State<AppState>, Query(query): Query<CourseQuery>) -> Response {
    let today = chrono::Local::now().date_naive();
    let export = state.service.export_csv(query.course_id.as_deref(), today).await;
    let filename = header_safe(&export.filename);
    info!(%filename, bytes = export.body.len(), "csv export");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        export.body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::header_safe;

    #[test]
    fn header_safe_replaces_non_ascii() {
        assert_eq!(header_safe("attendance_math_20240101.csv"), "attendance_math_20240101.csv");
        assert_eq!(header_safe("attendance_álgebra\"_1.csv"), "attendance__lgebra__1.csv");
    }
}
