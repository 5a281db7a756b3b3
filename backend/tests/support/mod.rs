//! Shared harness for HTTP integration tests.
//!
//! Builds the `/api/v1` surface over a fresh in-memory store using only the
//! crate's public API, so each test sees an isolated set of accounts.
#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use recipe_backend::domain::{AccountService, AttributeService, RecipeService};
use recipe_backend::inbound::http::configure;
use recipe_backend::inbound::http::state::{HttpState, HttpStatePorts};
use recipe_backend::outbound::memory::InMemoryStore;
use serde_json::{Value, json};

pub const PASSWORD: &str = "open sesame";

fn memory_state() -> HttpState {
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

/// The API mounted under `/api/v1` with cookie sessions.
pub fn api() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let sessions = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(memory_state()))
        .wrap(sessions)
        .service(web::scope("/api/v1").configure(configure))
}

/// Issue `request` and decode the body, `Value::Null` when empty.
pub async fn send<S>(app: &S, request: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(app, request).await;
    let status = response.status();
    let body = test::read_body(response).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

/// Register `email`, sign in and return the session cookie.
pub async fn sign_up<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "email": email, "password": PASSWORD, "name": "Cook" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");

    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("login sets a session cookie")
}

/// POST `body` to `path` as the cookie's owner.
pub async fn post<S>(
    app: &S,
    cookie: &Cookie<'static>,
    path: &str,
    body: Value,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(
        app,
        test::TestRequest::post()
            .uri(path)
            .cookie(cookie.clone())
            .set_json(body)
            .to_request(),
    )
    .await
}

/// GET `path` as the cookie's owner.
pub async fn get<S>(app: &S, cookie: &Cookie<'static>, path: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(
        app,
        test::TestRequest::get()
            .uri(path)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await
}

/// Create a tag or ingredient and return its id.
pub async fn attribute<S>(app: &S, cookie: &Cookie<'static>, resource: &str, name: &str) -> i64
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = post(
        app,
        cookie,
        &format!("/api/v1/{resource}"),
        json!({ "name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create {resource} failed: {body}");
    body["id"].as_i64().expect("attribute id")
}

/// Create a recipe and return its list representation.
pub async fn recipe<S>(app: &S, cookie: &Cookie<'static>, body: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, created) = post(app, cookie, "/api/v1/recipes", body).await;
    assert_eq!(status, StatusCode::CREATED, "create recipe failed: {created}");
    created
}

/// Names from a `[{id, name}]` array, in response order.
pub fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|item| item["name"].as_str().expect("name").to_owned())
        .collect()
}
