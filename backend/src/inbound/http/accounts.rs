//! Sign-in, sign-out and signup handlers.
//!
//! ```text
//! GET  /login
//! POST /login   email=..&password=..
//! GET  /logout
//! GET  /signup
//! POST /signup  email=..&password=..&confirmPassword=..
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::{AuthError, SignupError};
use crate::domain::{Error, FlashKind, LoginCredentials, SignupRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{PageView, redirect, render_page, store_and_redirect};

pub(crate) const INVALID_LOGIN_MESSAGE: &str = "Invalid email or password.";
pub(crate) const EMAIL_TAKEN_MESSAGE: &str =
    "Account with that email address already exists. If that email is yours, try signing in.";

/// Login form body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginForm {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Signup form body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login page; signed-in landlords go home.
#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login view", body = PageView),
        (status = 302, description = "Already signed in")
    ),
    tags = ["accounts"],
    operation_id = "loginPage",
    security([])
)]
#[get("/login")]
pub async fn login_page(session: SessionContext) -> ApiResult<HttpResponse> {
    if session.identity()?.is_some() {
        return Ok(redirect("/"));
    }
    render_page(&session, "Login")
}

/// Authenticate and bind the landlord to the session.
///
/// Redirects to the page that required sign-in, or home.
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Signed in, or back to the form with error messages"),
        (status = 503, description = "Credential store unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let current = session.load()?;
    let credentials = match LoginCredentials::try_from_parts(&form.email, &form.password) {
        Ok(credentials) => credentials,
        Err(errors) => {
            return store_and_redirect(&session, &current.with_validation_errors(&errors), "/login");
        }
    };

    match state.accounts.sign_in(current.clone(), &credentials).await {
        Ok(next) => {
            let (next, destination) = next.take_return_to();
            session.store_after_login(&next)?;
            Ok(redirect(destination.as_deref().unwrap_or("/")))
        }
        Err(AuthError::InvalidCredentials) => {
            info!("rejected sign-in attempt");
            let next = current.with_flash(FlashKind::Errors, INVALID_LOGIN_MESSAGE);
            store_and_redirect(&session, &next, "/login")
        }
        Err(AuthError::Unexpected(error)) => Err(error),
    }
}

/// End the session. Safe to call when signed out.
#[utoipa::path(
    get,
    path = "/logout",
    responses((status = 302, description = "Signed out")),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[get("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    let next = session.load()?.logout();
    store_and_redirect(&session, &next, "/")
}

/// Signup page; signed-in landlords go home.
#[utoipa::path(
    get,
    path = "/signup",
    responses(
        (status = 200, description = "Signup view", body = PageView),
        (status = 302, description = "Already signed in")
    ),
    tags = ["accounts"],
    operation_id = "signupPage",
    security([])
)]
#[get("/signup")]
pub async fn signup_page(session: SessionContext) -> ApiResult<HttpResponse> {
    if session.identity()?.is_some() {
        return Ok(redirect("/"));
    }
    render_page(&session, "Create Account")
}

/// Register a landlord and sign them in.
#[utoipa::path(
    post,
    path = "/signup",
    request_body(content = SignupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Account created, or back to the form with error messages"),
        (status = 503, description = "Credential store unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<SignupForm>,
) -> ApiResult<HttpResponse> {
    let current = session.load()?;
    let request =
        match SignupRequest::try_from_parts(&form.email, &form.password, &form.confirm_password) {
            Ok(request) => request,
            Err(errors) => {
                return store_and_redirect(
                    &session,
                    &current.with_validation_errors(&errors),
                    "/signup",
                );
            }
        };

    match state.accounts.signup(current.clone(), &request).await {
        Ok(next) => {
            session.store_after_login(&next)?;
            Ok(redirect("/"))
        }
        Err(SignupError::EmailTaken) => {
            let next = current.with_flash(FlashKind::Errors, EMAIL_TAKEN_MESSAGE);
            store_and_redirect(&session, &next, "/signup")
        }
        Err(SignupError::Unexpected(error)) => Err(error),
    }
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
