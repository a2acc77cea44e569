use axum::{extract::State, Json};

use super::dashboard::DashboardState;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::PersonalBest;
use crate::repositories::TrendSeries;

/// Per-exercise daily average weight, oldest day first.
pub async fn trends(
    State(state): State<DashboardState>,
    auth_user: AuthUser,
) -> Result<Json<TrendSeries>> {
    Ok(Json(state.stats.trend_series(auth_user.id).await?))
}

/// Heaviest weight per exercise, heaviest first.
pub async fn personal_bests(
    State(state): State<DashboardState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<PersonalBest>>> {
    Ok(Json(state.stats.personal_best_list(auth_user.id).await?))
}
