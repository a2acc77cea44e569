use axum_extra::extract::cookie::{Cookie, Key, SameSite};

pub const SESSION_COOKIE_NAME: &str = "session";

/// Signs the session cookie. Generated at startup, so restarting the server
/// signs everyone out.
#[derive(Clone)]
pub struct SessionKey(pub Key);

impl SessionKey {
    pub fn generate() -> Self {
        Self(Key::generate())
    }
}

pub fn create_session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(7))
        .build()
}

pub fn remove_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}
