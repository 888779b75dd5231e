//! Forgotten-password handlers.
//!
//! ```text
//! GET  /forgot
//! POST /forgot          email=..
//! GET  /reset/{token}
//! POST /reset/{token}   password=..&confirm=..
//! ```
//!
//! How a new token reaches the landlord depends on [`ResetHandoff`]: by
//! default the link goes out through the notification port and the page
//! shows the same message whether or not the account exists.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::domain::ports::{ResetError, ResetRequestError};
use crate::domain::{
    EmailAddress, Error, FlashKind, NewPassword, ResetLink, ResetToken, SessionState,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, ResetHandoff};
use crate::inbound::http::views::{PageView, redirect, render_page, store_and_redirect};

pub(crate) const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub(crate) const UNKNOWN_ACCOUNT_MESSAGE: &str = "Account with that email address does not exist.";
pub(crate) const TOKEN_INVALID_MESSAGE: &str = "Password reset token is invalid or has expired.";

pub(crate) fn reset_link_sent_message(email: &EmailAddress) -> String {
    format!("If an account exists for {email}, an e-mail has been sent with further instructions.")
}

/// Forgot-password form body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ForgotForm {
    #[schema(example = "ada@example.com")]
    pub email: String,
}

/// Reset form body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ResetForm {
    pub password: String,
    pub confirm: String,
}

fn token_rejected(session: &SessionContext, current: SessionState) -> ApiResult<HttpResponse> {
    let next = current.with_flash(FlashKind::Errors, TOKEN_INVALID_MESSAGE);
    store_and_redirect(session, &next, "/forgot")
}

/// Forgot-password page; signed-in landlords go home.
#[utoipa::path(
    get,
    path = "/forgot",
    responses(
        (status = 200, description = "Forgot-password view", body = PageView),
        (status = 302, description = "Already signed in")
    ),
    tags = ["password-reset"],
    operation_id = "forgotPage",
    security([])
)]
#[get("/forgot")]
pub async fn forgot_page(session: SessionContext) -> ApiResult<HttpResponse> {
    if session.identity()?.is_some() {
        return Ok(redirect("/"));
    }
    render_page(&session, "Forgot Password")
}

/// Issue a reset token and hand it off.
#[utoipa::path(
    post,
    path = "/forgot",
    request_body(content = ForgotForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Back to the form with a status message, or on to the reset form"),
        (status = 503, description = "Credential store unavailable", body = Error)
    ),
    tags = ["password-reset"],
    operation_id = "requestReset",
    security([])
)]
#[post("/forgot")]
pub async fn request_reset(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<ForgotForm>,
) -> ApiResult<HttpResponse> {
    let current = session.load()?;
    let Ok(email) = EmailAddress::parse(&form.email) else {
        let next = current.with_flash(FlashKind::Errors, INVALID_EMAIL_MESSAGE);
        return store_and_redirect(&session, &next, "/forgot");
    };

    let issued = state.password_reset.request_reset(&email).await;
    match (state.options.reset_handoff, issued) {
        (ResetHandoff::Notify, Ok(token)) => {
            let link = ResetLink::for_token(&state.options.public_base_url, &token);
            match state.password_reset.deliver_reset_link(&email, &link).await {
                Ok(()) => info!("password reset link handed to notifier"),
                Err(error) => warn!(%error, "password reset link not delivered"),
            }
            let next = current.with_flash(FlashKind::Info, reset_link_sent_message(&email));
            store_and_redirect(&session, &next, "/forgot")
        }
        (ResetHandoff::Notify, Err(ResetRequestError::AccountNotFound)) => {
            debug!("password reset requested for unknown email");
            let next = current.with_flash(FlashKind::Info, reset_link_sent_message(&email));
            store_and_redirect(&session, &next, "/forgot")
        }
        (ResetHandoff::Direct, Ok(token)) => Ok(redirect(&format!("/reset/{}", token.as_str()))),
        (ResetHandoff::Direct, Err(ResetRequestError::AccountNotFound)) => {
            let next = current.with_flash(FlashKind::Errors, UNKNOWN_ACCOUNT_MESSAGE);
            store_and_redirect(&session, &next, "/forgot")
        }
        (_, Err(ResetRequestError::Unexpected(error))) => Err(error),
    }
}

/// Reset form, shown only while the token is redeemable.
#[utoipa::path(
    get,
    path = "/reset/{token}",
    params(("token" = String, Path, description = "Reset token from the issued link")),
    responses(
        (status = 200, description = "Reset view", body = PageView),
        (status = 302, description = "Token invalid or expired, or already signed in"),
        (status = 503, description = "Credential store unavailable", body = Error)
    ),
    tags = ["password-reset"],
    operation_id = "resetPage",
    security([])
)]
#[get("/reset/{token}")]
pub async fn reset_page(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let current = session.load()?;
    if current.is_authenticated() {
        return Ok(redirect("/"));
    }
    let Ok(token) = ResetToken::parse(&path) else {
        return token_rejected(&session, current);
    };

    match state.password_reset.verify_reset_token(&token).await {
        Ok(()) => render_page(&session, "Password Reset"),
        Err(ResetError::TokenInvalidOrExpired) => token_rejected(&session, current),
        Err(ResetError::Unexpected(error)) => Err(error),
    }
}

/// Redeem the token, set the new password and sign the landlord in.
///
/// An invalid form leaves the token untouched.
#[utoipa::path(
    post,
    path = "/reset/{token}",
    params(("token" = String, Path, description = "Reset token from the issued link")),
    request_body(content = ResetForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Signed in with the new password, or back to a form"),
        (status = 503, description = "Credential store unavailable", body = Error)
    ),
    tags = ["password-reset"],
    operation_id = "redeemReset",
    security([])
)]
#[post("/reset/{token}")]
pub async fn redeem_reset(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<ResetForm>,
) -> ApiResult<HttpResponse> {
    let current = session.load()?;
    let back = format!("/reset/{}", path.as_str());
    let password = match NewPassword::try_from_parts(&form.password, &form.confirm, "confirm") {
        Ok(password) => password,
        Err(errors) => {
            return store_and_redirect(&session, &current.with_validation_errors(&errors), &back);
        }
    };
    let Ok(token) = ResetToken::parse(&path) else {
        return token_rejected(&session, current);
    };

    match state
        .password_reset
        .redeem_reset(current.clone(), &token, &password)
        .await
    {
        Ok(next) => {
            session.store_after_login(&next)?;
            Ok(redirect("/"))
        }
        Err(ResetError::TokenInvalidOrExpired) => token_rejected(&session, current),
        Err(ResetError::Unexpected(error)) => Err(error),
    }
}

#[cfg(test)]
#[path = "password_reset_tests.rs"]
mod tests;
