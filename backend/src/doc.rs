//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every page and form handler of the inbound layer,
//! the view models they return and the session cookie security scheme. The
//! document backs Swagger UI in debug builds and is exported by the
//! `openapi-dump` binary.

use crate::domain::{Error, ErrorCode, FlashKind, FlashMessage, LandlordProfile};
use crate::inbound::http::account::{AccountView, PasswordChangeForm};
use crate::inbound::http::accounts::{LoginForm, SignupForm};
use crate::inbound::http::contact::{ContactForm, ContactView};
use crate::inbound::http::health::{Lifecycle, ProbeView};
use crate::inbound::http::password_reset::{ForgotForm, ResetForm};
use crate::inbound::http::views::{HomeView, PageView};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /login, POST /signup or POST /reset/{token}.",
            ))),
        );
    }
}

/// OpenAPI document for the landlord site.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Landlord accounts API",
        description = "Sign-in, signup, password reset and account management for apartment landlords.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::views::home,
        crate::inbound::http::accounts::login_page,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::signup_page,
        crate::inbound::http::accounts::signup,
        crate::inbound::http::account::account_page,
        crate::inbound::http::account::change_password,
        crate::inbound::http::account::delete_account,
        crate::inbound::http::account::unlink_provider,
        crate::inbound::http::password_reset::forgot_page,
        crate::inbound::http::password_reset::request_reset,
        crate::inbound::http::password_reset::reset_page,
        crate::inbound::http::password_reset::redeem_reset,
        crate::inbound::http::contact::contact_page,
        crate::inbound::http::contact::submit_contact,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        FlashKind,
        FlashMessage,
        LandlordProfile,
        PageView,
        HomeView,
        AccountView,
        ContactView,
        ProbeView,
        Lifecycle,
        LoginForm,
        SignupForm,
        PasswordChangeForm,
        ForgotForm,
        ResetForm,
        ContactForm,
    )),
    tags(
        (name = "pages", description = "Home and contact pages"),
        (name = "accounts", description = "Sign-in, sign-out and signup"),
        (name = "account", description = "The signed-in landlord's own account"),
        (name = "password-reset", description = "Forgotten-password tokens"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
