use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::models::AccountId;
use crate::session::{
    create_session_cookie, remove_session_cookie, SessionKey, SESSION_COOKIE_NAME,
};

/// The signed-in account, handed to every handler that needs one. The store
/// itself never knows who is signed in.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: AccountId,
    pub username: String,
}

impl AuthUser {
    pub fn login(jar: SignedCookieJar, id: AccountId, username: &str) -> SignedCookieJar {
        jar.add(create_session_cookie(format!("{id}:{username}")))
    }

    pub fn logout(jar: SignedCookieJar) -> SignedCookieJar {
        jar.remove(remove_session_cookie())
    }

    pub fn from_jar(jar: &SignedCookieJar) -> Option<Self> {
        let cookie = jar.get(SESSION_COOKIE_NAME)?;
        let (id, username) = cookie.value().split_once(':')?;
        Some(Self {
            id: id.parse().ok()?,
            username: username.to_string(),
        })
    }

    fn from_parts(parts: &Parts) -> Option<Self> {
        let key = parts.extensions.get::<SessionKey>()?;
        let jar = SignedCookieJar::from_headers(&parts.headers, key.0.clone());
        Self::from_jar(&jar)
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        AuthUser::from_parts(parts).ok_or(AuthRedirect)
    }
}

pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/auth/login").into_response()
    }
}

// Optional auth - doesn't redirect, just returns None if not logged in
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(AuthUser::from_parts(parts)))
    }
}
