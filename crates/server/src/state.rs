use std::sync::Arc;

use service::AttendanceService;

use crate::views::Views;

/// Router state: the one attendance service plus compiled templates.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AttendanceService>,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(service: Arc<AttendanceService>) -> Result<Self, minijinja::Error> {
        Ok(Self { service, views: Arc::new(Views::new()?) })
    }
}
