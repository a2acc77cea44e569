#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    response::IntoResponse,
    Router,
};
use axum_extra::extract::cookie::SignedCookieJar;
use http_body_util::BodyExt;
use tower::ServiceExt;

use setlog::db::create_memory_pool;
use setlog::middleware::AuthUser;
use setlog::models::AccountId;
use setlog::session::SessionKey;
use setlog::store::WorkoutStore;

pub struct TestApp {
    pub router: Router,
    pub store: WorkoutStore,
    pub session_key: SessionKey,
}

pub fn setup_test_store() -> WorkoutStore {
    let pool = create_memory_pool().expect("Failed to create test database");
    WorkoutStore::from_pool(pool).expect("Failed to create schema")
}

pub fn create_test_app() -> TestApp {
    let store = setup_test_store();
    let session_key = SessionKey::generate();
    let router = setlog::routes::create_router(&store, session_key.clone());
    TestApp {
        router,
        store,
        session_key,
    }
}

impl TestApp {
    /// Register an account and return a Cookie header value signed in as it.
    pub async fn sign_in(&self, username: &str) -> (AccountId, String) {
        let id = self
            .store
            .accounts
            .register(username, "password123")
            .await
            .unwrap();
        (id, self.signed_cookie(id, username))
    }

    /// Cookie header value for a session, whether or not the account exists.
    pub fn signed_cookie(&self, id: AccountId, username: &str) -> String {
        let jar = AuthUser::login(SignedCookieJar::new(self.session_key.0.clone()), id, username);
        let response = jar.into_response();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        extract_cookie_header(set_cookie)
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }
}

pub fn extract_cookie_header(set_cookie: &str) -> String {
    // Just the name=value part, for use in a Cookie header
    set_cookie.split(';').next().unwrap_or("").to_string()
}

pub async fn body_string(response: Response<Body>) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).to_string()
}
