//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;
#[cfg(feature = "metrics")]
pub(crate) use metrics::request_metrics;
#[cfg(feature = "metrics")]
use metrics::OptionalMetrics;
pub(crate) use state_builders::build_ports;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use landlord_backend::Trace;
#[cfg(debug_assertions)]
use landlord_backend::doc::ApiDoc;
use landlord_backend::inbound::http::account::{
    account_page, change_password, delete_account, unlink_provider,
};
use landlord_backend::inbound::http::accounts::{login, login_page, logout, signup, signup_page};
use landlord_backend::inbound::http::contact;
use landlord_backend::inbound::http::error::form_error_handler;
use landlord_backend::inbound::http::health::{HealthState, live, ready};
use landlord_backend::inbound::http::password_reset::{
    forgot_page, redeem_reset, request_reset, reset_page,
};
use landlord_backend::inbound::http::session_config::SessionSettings;
use landlord_backend::inbound::http::state::HttpState;
use landlord_backend::inbound::http::views::home;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE_NAME: &str = "session";
const SESSION_TTL_DAYS: i64 = 14;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
}

fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name(SESSION_COOKIE_NAME.into())
        .cookie_path("/".into())
        .cookie_secure(settings.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(settings.same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::days(SESSION_TTL_DAYS)),
        )
        .build()
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
    } = deps;
    let contact_form_enabled = http_state.options.contact_form_enabled;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::FormConfig::default().error_handler(form_error_handler))
        .wrap(session_middleware(&session))
        .wrap(Trace)
        .service(home)
        .service(login_page)
        .service(login)
        .service(logout)
        .service(signup_page)
        .service(signup)
        .service(account_page)
        .service(change_password)
        .service(delete_account)
        .service(unlink_provider)
        .service(forgot_page)
        .service(request_reset)
        .service(reset_page)
        .service(redeem_reset)
        .configure(|cfg| contact::configure(cfg, contact_form_enabled))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the Actix HTTP server.
///
/// Actix's own signal handling is disabled: Ctrl-C marks the health state
/// draining, then stops the server gracefully.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(http_state);
    let ServerConfig {
        session,
        bind_addr,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = OptionalMetrics::new(prometheus);

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            session: session.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .disable_signals()
    .bind(bind_addr)?
    .run();

    let handle = server.handle();
    let drain_state = health_state.clone();
    actix_web::rt::spawn(async move {
        if let Err(error) = actix_web::rt::signal::ctrl_c().await {
            warn!(%error, "failed to listen for shutdown signal");
            return;
        }
        info!("shutdown requested; draining");
        drain_state.mark_draining();
        handle.stop(true).await;
    });

    info!(%bind_addr, "listening");
    Ok(server)
}

