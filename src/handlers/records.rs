use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};

use super::dashboard::{render_dashboard, DashboardQuery, DashboardState};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CreateSetRecord, SetRecordId};

pub async fn create(
    State(state): State<DashboardState>,
    auth_user: AuthUser,
    Form(form): Form<CreateSetRecord>,
) -> Result<Response> {
    let today = chrono::Local::now().date_naive();
    let result = async {
        let record = form.into_record(today)?;
        state.records.add(auth_user.id, record).await
    }
    .await;

    match result {
        Ok(id) => {
            tracing::info!(record_id = %id, account_id = %auth_user.id, "Saved set record");
            Ok(Redirect::to("/").into_response())
        }
        Err(AppError::MalformedInput(msg)) | Err(AppError::NotFound(msg)) => {
            tracing::debug!("Rejected set record: {}", msg);
            let page = render_dashboard(
                &state,
                auth_user,
                &DashboardQuery::default(),
                Some(format!("Could not save record: {msg}")),
            )
            .await?;
            Ok(page.into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn delete(
    State(state): State<DashboardState>,
    auth_user: AuthUser,
    Path(id): Path<SetRecordId>,
) -> Result<Redirect> {
    state.records.delete(auth_user.id, id).await?;
    tracing::info!(record_id = %id, account_id = %auth_user.id, "Deleted set record");
    Ok(Redirect::to("/"))
}
