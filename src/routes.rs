use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::handlers::{auth, dashboard, exercises, health, records, stats};
use crate::session::SessionKey;
use crate::store::WorkoutStore;

pub fn create_router(store: &WorkoutStore, session_key: SessionKey) -> Router {
    let auth_state = auth::AuthState {
        accounts: store.accounts.clone(),
    };
    let dashboard_state = dashboard::DashboardState {
        accounts: store.accounts.clone(),
        exercises: store.exercises.clone(),
        records: store.records.clone(),
        stats: store.stats.clone(),
    };

    Router::new()
        .route("/health", get(health::health_check))
        .with_state(store.schema())
        // Auth routes
        .route(
            "/auth/login",
            get(auth::login_page).post(auth::login_submit),
        )
        .route(
            "/auth/register",
            get(auth::register_page).post(auth::register_submit),
        )
        .route("/auth/logout", post(auth::logout))
        .with_state(auth_state)
        // Dashboard and the forms it posts
        .route("/", get(dashboard::index))
        .route("/records", post(records::create))
        .route("/records/{id}/delete", post(records::delete))
        .route("/exercises", post(exercises::create))
        .route("/exercises/{id}/delete", post(exercises::delete))
        // JSON
        .route("/api/trends", get(stats::trends))
        .route("/api/personal-bests", get(stats::personal_bests))
        .with_state(dashboard_state)
        .layer(Extension(session_key))
}
