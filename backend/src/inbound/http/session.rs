//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Handlers load the domain [`SessionState`] from the cookie, pass it through
//! a driving port, and store whatever state the port returns.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, LandlordIdentity, SessionState};

pub(crate) const SESSION_STATE_KEY: &str = "landlord_session";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Read the session state, falling back to an anonymous session when the
    /// cookie holds nothing usable.
    pub fn load(&self) -> Result<SessionState, Error> {
        match self.0.get::<SessionState>(SESSION_STATE_KEY) {
            Ok(Some(state)) => Ok(state),
            Ok(None) => Ok(SessionState::anonymous()),
            Err(error) => {
                warn!(%error, "unreadable session state; starting anonymous session");
                self.0.remove(SESSION_STATE_KEY);
                Ok(SessionState::anonymous())
            }
        }
    }

    /// Persist `state` into the session cookie.
    pub fn store(&self, state: &SessionState) -> Result<(), Error> {
        self.0
            .insert(SESSION_STATE_KEY, state)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Persist a state that has just gained an identity, rotating the session
    /// key first so a pre-login cookie cannot ride along.
    pub fn store_after_login(&self, state: &SessionState) -> Result<(), Error> {
        self.0.renew();
        self.store(state)
    }

    /// Signed-in identity, if any.
    pub fn identity(&self) -> Result<Option<LandlordIdentity>, Error> {
        Ok(self.load()?.identity().cloned())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailAddress, FlashKind, LandlordId};
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    fn identity() -> LandlordIdentity {
        LandlordIdentity {
            id: LandlordId::random(),
            email: EmailAddress::parse("ada@example.com").expect("fixture email"),
        }
    }

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_session_middleware())
            .route(
                "/set",
                web::get().to(|session: SessionContext| async move {
                    let state = session
                        .load()?
                        .login(identity())
                        .with_flash(FlashKind::Success, "welcome");
                    session.store_after_login(&state)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/get",
                web::get().to(|session: SessionContext| async move {
                    let state = session.load()?;
                    let email = state
                        .identity()
                        .map(|identity| identity.email.to_string())
                        .unwrap_or_default();
                    Ok::<_, Error>(HttpResponse::Ok().body(email))
                }),
            )
            .route(
                "/tamper",
                web::get().to(|session: actix_session::Session| async move {
                    session
                        .insert(SESSION_STATE_KEY, "not a session state")
                        .map_err(|err| Error::internal(err.to_string()))?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
    }

    #[actix_web::test]
    async fn round_trips_session_state() {
        let app = test::init_service(session_test_app()).await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res);

        let get_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, "ada@example.com");
    }

    #[actix_web::test]
    async fn missing_cookie_is_anonymous() {
        let app = test::init_service(session_test_app()).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/get").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(test::read_body(res).await.is_empty());
    }

    #[actix_web::test]
    async fn unreadable_state_is_anonymous() {
        let app = test::init_service(session_test_app()).await;
        let tamper_res =
            test::call_service(&app, test::TestRequest::get().uri("/tamper").to_request()).await;
        let cookie = session_cookie(&tamper_res);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(test::read_body(res).await.is_empty());
    }
}
