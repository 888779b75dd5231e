//! JSON view models that stand in for rendered pages.
//!
//! Every view carries the page `title` and the flash messages drained from
//! the session while rendering, so a message is shown exactly once.

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{FlashMessage, SessionState};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;

/// Page with no content beyond its title and pending messages.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageView {
    #[schema(example = "Login")]
    pub title: String,
    pub flash: Vec<FlashMessage>,
}

/// Home page.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    #[schema(example = "Home")]
    pub title: String,
    pub flash: Vec<FlashMessage>,
    /// Email of the signed-in landlord, if any.
    pub signed_in_as: Option<String>,
}

/// Drain pending flash messages and store the remaining session.
pub(crate) fn drain_flash(session: &SessionContext) -> ApiResult<(SessionState, Vec<FlashMessage>)> {
    let (state, flash) = session.load()?.take_flash();
    if !flash.is_empty() {
        session.store(&state)?;
    }
    Ok((state, flash))
}

/// Render a plain page, consuming pending flash messages.
pub(crate) fn render_page(session: &SessionContext, title: &str) -> ApiResult<HttpResponse> {
    let (_, flash) = drain_flash(session)?;
    Ok(HttpResponse::Ok().json(PageView {
        title: title.to_owned(),
        flash,
    }))
}

/// `302 Found` pointing at `path`.
pub(crate) fn redirect(path: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, path))
        .finish()
}

/// Store `state` and redirect to `path`.
pub(crate) fn store_and_redirect(
    session: &SessionContext,
    state: &SessionState,
    path: &str,
) -> ApiResult<HttpResponse> {
    session.store(state)?;
    Ok(redirect(path))
}

/// Home page, naming the signed-in landlord when there is one.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Home view", body = HomeView)),
    tags = ["pages"],
    operation_id = "home",
    security([])
)]
#[get("/")]
pub async fn home(session: SessionContext) -> ApiResult<web::Json<HomeView>> {
    let (state, flash) = drain_flash(&session)?;
    Ok(web::Json(HomeView {
        title: "Home".to_owned(),
        flash,
        signed_in_as: state.identity().map(|identity| identity.email.to_string()),
    }))
}
