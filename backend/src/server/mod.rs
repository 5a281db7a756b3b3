//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::time::Duration;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};

use recipe_backend::Trace;
use recipe_backend::inbound::http::configure;
use recipe_backend::inbound::http::health::{self, HealthState};
use recipe_backend::inbound::http::session_config::SessionSettings;
use state_builders::build_http_state;

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Encrypted, HTTP-only cookie sessions expiring after two hours.
fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_http_only(true)
        .cookie_secure(settings.cookie_secure)
        .cookie_same_site(settings.same_site)
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)))
        .build()
}

/// Swagger UI and the raw document, served only by debug builds.
#[cfg(debug_assertions)]
fn docs(cfg: &mut web::ServiceConfig) {
    use recipe_backend::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    cfg.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
}

#[cfg(not(debug_assertions))]
fn docs(_cfg: &mut web::ServiceConfig) {}

/// Bind the HTTP server and mark the service ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let ServerConfig {
        session, bind_addr, ..
    } = config;

    let probes = health_state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(probes.clone())
            .app_data(http_state.clone())
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session_middleware(&session))
                    .configure(configure),
            )
            .service(health::ready)
            .service(health::live)
            .configure(docs)
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
