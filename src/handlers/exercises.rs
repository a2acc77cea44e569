use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};

use super::dashboard::{render_dashboard, DashboardQuery, DashboardState};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CreateExercise, ExerciseId, ExerciseKey};

pub async fn create(
    State(state): State<DashboardState>,
    auth_user: AuthUser,
    Form(form): Form<CreateExercise>,
) -> Result<Response> {
    match state.exercises.add(&form.name, form.category()).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(AppError::MalformedInput(msg)) => {
            let page =
                render_dashboard(&state, auth_user, &DashboardQuery::default(), Some(msg)).await?;
            Ok(page.into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn delete(
    State(state): State<DashboardState>,
    _auth_user: AuthUser,
    Path(id): Path<ExerciseId>,
) -> Result<Redirect> {
    state.exercises.delete(ExerciseKey::Id(id)).await?;
    Ok(Redirect::to("/"))
}
