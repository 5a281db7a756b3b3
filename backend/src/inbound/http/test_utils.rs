//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_http::Request;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::json;
use std::sync::Arc;

use crate::domain::{AccountService, AttributeService, RecipeService};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;

pub const TEST_PASSWORD: &str = "correct horse";

/// Session middleware with a fresh key and a non-`Secure` `session` cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Handler state backed by a fresh in-memory store.
pub fn memory_state() -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    let accounts = Arc::new(AccountService::new(store.clone()));
    let attributes = Arc::new(AttributeService::new(store.clone()));
    let recipes = Arc::new(RecipeService::new(store.clone(), store));
    HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        profile: accounts.clone(),
        login: accounts,
        attributes: attributes.clone(),
        attributes_query: attributes,
        recipes: recipes.clone(),
        recipes_query: recipes,
    })
}

/// App exposing the full `/api/v1` surface over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(configure))
}

/// Register `email` with a fixed password, log in and return the cookie.
pub async fn register_and_login<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let created = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "email": email, "password": TEST_PASSWORD, "name": "Cook" }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED, "registration succeeds");

    let login = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": TEST_PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK, "login succeeds");
    session_cookie(&login)
}
