//! Contact page.
//!
//! ```text
//! GET  /contact
//! POST /contact   name=..&email=..&message=..
//! ```
//!
//! The POST route exists only when submissions are switched on; otherwise
//! the page renders with `submissionsEnabled: false` and the form has
//! nowhere to go.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ContactMessage, Error, FlashMessage};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{drain_flash, store_and_redirect};

const CONTACT_PATH: &str = "/contact";

/// Contact page content.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    #[schema(example = "Contact The Developer")]
    pub title: String,
    pub flash: Vec<FlashMessage>,
    /// Whether `POST /contact` accepts messages.
    pub submissions_enabled: bool,
}

/// Contact form body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ContactForm {
    #[schema(example = "Ada")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub message: String,
}

/// Register the contact routes, with the submission route only when enabled.
pub fn configure(cfg: &mut web::ServiceConfig, submissions_enabled: bool) {
    cfg.service(contact_page);
    if submissions_enabled {
        cfg.service(submit_contact);
    }
}

#[utoipa::path(
    get,
    path = "/contact",
    responses((status = 200, description = "Contact view", body = ContactView)),
    tags = ["pages"],
    operation_id = "contactPage",
    security([])
)]
#[get("/contact")]
pub async fn contact_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ContactView>> {
    let (_, flash) = drain_flash(&session)?;
    Ok(web::Json(ContactView {
        title: "Contact The Developer".to_owned(),
        flash,
        submissions_enabled: state.options.contact_form_enabled,
    }))
}

/// Forward a message to the site operator.
#[utoipa::path(
    post,
    path = "/contact",
    request_body(content = ContactForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Back to the contact page with a status message"),
        (status = 404, description = "Submissions are switched off"),
        (status = 503, description = "Mail channel unavailable", body = Error)
    ),
    tags = ["pages"],
    operation_id = "submitContact",
    security([])
)]
#[post("/contact")]
pub async fn submit_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<ContactForm>,
) -> ApiResult<HttpResponse> {
    let current = session.load()?;
    let message = match ContactMessage::try_from_parts(&form.name, &form.email, &form.message) {
        Ok(message) => message,
        Err(errors) => {
            return store_and_redirect(
                &session,
                &current.with_validation_errors(&errors),
                CONTACT_PATH,
            );
        }
    };
    let next = state.contact.submit(current, &message).await?;
    store_and_redirect(&session, &next, CONTACT_PATH)
}
