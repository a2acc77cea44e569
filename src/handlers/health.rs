use axum::{extract::State, Json};
use serde::Serialize;

use crate::schema::SchemaInfo;
use crate::version::GIT_VERSION;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    git_version: &'static str,
    /// False when serving a catalog created before categories existed
    categorized_catalog: bool,
}

pub async fn health_check(State(schema): State<SchemaInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        git_version: GIT_VERSION,
        categorized_catalog: schema.exercises_has_category,
    })
}
