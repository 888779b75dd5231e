//! Handlers for the signed-in landlord's own account.
//!
//! ```text
//! GET  /account
//! POST /account/password           password=..&confirmPassword=..
//! POST /account/delete
//! GET  /account/unlink/{provider}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::ports::{AccountError, AccountOverview, DeletionError};
use crate::domain::{Error, FlashKind, FlashMessage, LandlordProfile, NewPassword, SessionState};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{drain_flash, redirect, store_and_redirect};

const ACCOUNT_PATH: &str = "/account";
pub(crate) const ACCOUNT_MISSING_MESSAGE: &str = "Your account no longer exists.";
pub(crate) const DELETION_INCOMPLETE_MESSAGE: &str =
    "We could not finish deleting your account. The deletion will be completed automatically.";

/// Account page content.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    #[schema(example = "Landlord's Account Page")]
    pub title: String,
    pub flash: Vec<FlashMessage>,
    pub email: String,
    /// Numbers of the apartments this landlord lists.
    pub listings: Vec<i32>,
    /// Names of linked login providers.
    pub linked_providers: Vec<String>,
    pub profile: LandlordProfile,
    pub gravatar_url: String,
}

impl AccountView {
    fn new(overview: AccountOverview, flash: Vec<FlashMessage>) -> Self {
        Self {
            title: "Landlord's Account Page".to_owned(),
            flash,
            email: overview.email,
            listings: overview
                .apartment_numbers
                .iter()
                .map(|number| number.value())
                .collect(),
            linked_providers: overview.linked_providers,
            profile: overview.profile,
            gravatar_url: overview.gravatar_url,
        }
    }
}

/// Password change form body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeForm {
    pub password: String,
    pub confirm_password: String,
}

fn sign_in_required(
    session: &SessionContext,
    current: SessionState,
    return_to: &str,
) -> ApiResult<HttpResponse> {
    store_and_redirect(session, &current.remember_return_to(return_to), "/login")
}

fn account_gone(session: &SessionContext, current: SessionState) -> ApiResult<HttpResponse> {
    let next = current
        .logout()
        .with_flash(FlashKind::Errors, ACCOUNT_MISSING_MESSAGE);
    store_and_redirect(session, &next, "/")
}

/// Account page. Anonymous visitors are sent to sign in and returned here.
#[utoipa::path(
    get,
    path = "/account",
    responses(
        (status = 200, description = "Account view", body = AccountView),
        (status = 302, description = "Sign-in required"),
        (status = 503, description = "Credential store unavailable", body = Error)
    ),
    tags = ["account"],
    operation_id = "accountPage"
)]
#[get("/account")]
pub async fn account_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let current = session.load()?;
    let Some(identity) = current.identity().cloned() else {
        return sign_in_required(&session, current, ACCOUNT_PATH);
    };

    match state.accounts.account_overview(&identity).await {
        Ok(overview) => {
            let (_, flash) = drain_flash(&session)?;
            Ok(HttpResponse::Ok().json(AccountView::new(overview, flash)))
        }
        Err(AccountError::NotSignedIn) => sign_in_required(&session, current, ACCOUNT_PATH),
        Err(AccountError::AccountMissing) => account_gone(&session, current),
        Err(AccountError::Unexpected(error)) => Err(error),
    }
}

/// Replace the signed-in landlord's password.
#[utoipa::path(
    post,
    path = "/account/password",
    request_body(content = PasswordChangeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Back to the account page with a status message"),
        (status = 503, description = "Credential store unavailable", body = Error)
    ),
    tags = ["account"],
    operation_id = "changePassword"
)]
#[post("/account/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<PasswordChangeForm>,
) -> ApiResult<HttpResponse> {
    let current = session.load()?;
    if !current.is_authenticated() {
        return sign_in_required(&session, current, ACCOUNT_PATH);
    }
    let password = match NewPassword::try_from_parts(
        &form.password,
        &form.confirm_password,
        "confirmPassword",
    ) {
        Ok(password) => password,
        Err(errors) => {
            return store_and_redirect(
                &session,
                &current.with_validation_errors(&errors),
                ACCOUNT_PATH,
            );
        }
    };

    match state.accounts.change_password(current.clone(), &password).await {
        Ok(next) => store_and_redirect(&session, &next, ACCOUNT_PATH),
        Err(AccountError::NotSignedIn) => sign_in_required(&session, current, ACCOUNT_PATH),
        Err(AccountError::AccountMissing) => account_gone(&session, current),
        Err(AccountError::Unexpected(error)) => Err(error),
    }
}

/// Delete the account with its apartments and bookings, then sign out.
#[utoipa::path(
    post,
    path = "/account/delete",
    responses(
        (status = 302, description = "Signed out after deletion, or sent to sign in"),
        (status = 503, description = "Store unavailable before anything changed", body = Error)
    ),
    tags = ["account"],
    operation_id = "deleteAccount"
)]
#[post("/account/delete")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let current = session.load()?;
    match state.deletion.delete_account(current.clone()).await {
        Ok(next) => store_and_redirect(&session, &next, "/"),
        Err(DeletionError::NotSignedIn) => sign_in_required(&session, current, ACCOUNT_PATH),
        Err(DeletionError::PartialFailure { step, source }) => {
            error!(%step, error = %source, "account deletion left incomplete");
            let next = current
                .logout()
                .with_flash(FlashKind::Errors, DELETION_INCOMPLETE_MESSAGE);
            store_and_redirect(&session, &next, "/")
        }
        Err(DeletionError::Unexpected(error)) => Err(error),
    }
}

/// Remove a linked login provider. Unlinking an absent provider succeeds.
#[utoipa::path(
    get,
    path = "/account/unlink/{provider}",
    params(("provider" = String, Path, description = "Provider name, for example `facebook`")),
    responses(
        (status = 302, description = "Back to the account page"),
        (status = 503, description = "Credential store unavailable", body = Error)
    ),
    tags = ["account"],
    operation_id = "unlinkProvider"
)]
#[get("/account/unlink/{provider}")]
pub async fn unlink_provider(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let provider = path.into_inner();
    let current = session.load()?;
    if !current.is_authenticated() {
        let return_to = format!("{ACCOUNT_PATH}/unlink/{provider}");
        return sign_in_required(&session, current, &return_to);
    }

    match state.accounts.unlink_provider(current.clone(), &provider).await {
        Ok(next) => store_and_redirect(&session, &next, ACCOUNT_PATH),
        Err(AccountError::NotSignedIn) => Ok(redirect("/login")),
        Err(AccountError::AccountMissing) => account_gone(&session, current),
        Err(AccountError::Unexpected(error)) => Err(error),
    }
}

#[cfg(test)]
#[path = "account_tests.rs"]
mod tests;
