pub mod auth;
pub mod dashboard;
pub mod exercises;
pub mod health;
pub mod records;
pub mod stats;

use askama::Template;
use axum::response::Html;

use crate::error::{AppError, Result};

pub(crate) fn render<T: Template>(template: &T) -> Result<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(e.to_string()))
}
