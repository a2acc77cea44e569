use askama::Template;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::SignedCookieJar;

use super::render;
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, OptionalAuthUser};
use crate::models::{CreateAccount, LoginCredentials};
use crate::repositories::AccountRepository;
use crate::session::SessionKey;

#[derive(Clone)]
pub struct AuthState {
    pub accounts: AccountRepository,
}

// Templates
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    error: Option<String>,
}

// Handlers
pub async fn login_page(OptionalAuthUser(auth_user): OptionalAuthUser) -> Result<Response> {
    if auth_user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(render(&LoginTemplate { error: None })?.into_response())
}

pub async fn login_submit(
    State(state): State<AuthState>,
    Extension(key): Extension<SessionKey>,
    headers: HeaderMap,
    Form(credentials): Form<LoginCredentials>,
) -> Result<Response> {
    let jar = SignedCookieJar::from_headers(&headers, key.0);

    match state
        .accounts
        .authenticate(&credentials.username, &credentials.password)
        .await
    {
        Ok(id) => {
            tracing::info!(account_id = %id, "Signed in");
            let jar = AuthUser::login(jar, id, &credentials.username);
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(AppError::InvalidCredentials) => {
            let template = LoginTemplate {
                error: Some(AppError::InvalidCredentials.to_string()),
            };
            Ok((jar, render(&template)?).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn register_page(OptionalAuthUser(auth_user): OptionalAuthUser) -> Result<Response> {
    if auth_user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(render(&RegisterTemplate { error: None })?.into_response())
}

pub async fn register_submit(
    State(state): State<AuthState>,
    Extension(key): Extension<SessionKey>,
    headers: HeaderMap,
    Form(form): Form<CreateAccount>,
) -> Result<Response> {
    let jar = SignedCookieJar::from_headers(&headers, key.0);

    let error = match state.accounts.register(&form.username, &form.password).await {
        Ok(id) => {
            let jar = AuthUser::login(jar, id, &form.username);
            return Ok((jar, Redirect::to("/")).into_response());
        }
        Err(AppError::DuplicateUsername) => "That username is already taken".to_string(),
        Err(AppError::MalformedInput(msg)) => msg,
        Err(e) => return Err(e),
    };

    let template = RegisterTemplate { error: Some(error) };
    Ok((jar, render(&template)?).into_response())
}

pub async fn logout(Extension(key): Extension<SessionKey>, headers: HeaderMap) -> Response {
    let jar = SignedCookieJar::from_headers(&headers, key.0);
    let jar = AuthUser::logout(jar);
    (jar, Redirect::to("/auth/login")).into_response()
}
