//! Server-side HTML rendering.
//!
//! Templates are embedded at compile time and rendered with minijinja.
//! Names end in `.html`, which turns on HTML auto-escaping.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use minijinja::Environment;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::errors::PageError;

const TEMPLATES: [(&str, &str); 13] = [
    ("layout.html", include_str!("../templates/layout.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("students.html", include_str!("../templates/students.html")),
    ("add_student.html", include_str!("../templates/add_student.html")),
    ("courses.html", include_str!("../templates/courses.html")),
    ("add_course.html", include_str!("../templates/add_course.html")),
    ("mark_attendance.html", include_str!("../templates/mark_attendance.html")),
    ("edit_attendance.html", include_str!("../templates/edit_attendance.html")),
    ("student_details.html", include_str!("../templates/student_details.html")),
    ("course_details.html", include_str!("../templates/course_details.html")),
    ("enroll.html", include_str!("../templates/enroll.html")),
    ("summary.html", include_str!("../templates/summary.html")),
    ("attendance_table.html", include_str!("../templates/attendance_table.html")),
];

/// Everything outside the RFC 3986 unreserved set, `/` and `&` included.
const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// `{{ id|url_segment }}`: one path segment or query value.
fn url_segment(value: String) -> String {
    utf8_percent_encode(&value, URL_COMPONENT).to_string()
}

/// One-shot banner shown above the page content.
#[derive(Clone, Debug, Serialize)]
pub struct Flash {
    pub kind: &'static str,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: "success", message: message.into() }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self { kind: "danger", message: message.into() }
    }
}

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_filter("url_segment", url_segment);
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, PageError> {
        Ok(self.env.get_template(name)?.render(ctx)?)
    }

    /// Render and wrap into a response with the given status.
    pub fn page<S: Serialize>(&self, status: StatusCode, name: &str, ctx: S) -> Result<Response, PageError> {
        Ok((status, Html(self.render(name, ctx)?)).into_response())
    }
}
