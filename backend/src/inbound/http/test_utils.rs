//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::header;

use crate::domain::{
    AccountDeletionService, ContactService, Landlord, LandlordAccountService,
    PasswordResetService,
};
use crate::inbound::http::state::{HttpOptions, HttpState, HttpStatePorts};
use crate::test_support::{
    InMemoryStore, MutableClock, PlaintextHasher, RecordingNotifier, fixtures,
};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// `Location` header of a redirect.
pub fn location<B>(res: &ServiceResponse<B>) -> String {
    res.headers()
        .get(header::LOCATION)
        .expect("redirect has a location")
        .to_str()
        .expect("location is ascii")
        .to_owned()
}

/// Real domain services over in-memory adapters.
pub struct TestHarness {
    pub store: Arc<InMemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<MutableClock>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            clock: Arc::new(MutableClock::fixed()),
        }
    }

    /// Seed a landlord whose password verifies with the plaintext hasher.
    pub fn seed_landlord(&self, email: &str, password: &str) -> Landlord {
        let landlord = fixtures::landlord(email, password);
        self.store.insert_landlord(landlord.clone());
        landlord
    }

    pub fn state(&self, options: HttpOptions) -> HttpState {
        let hasher = Arc::new(PlaintextHasher);
        HttpState::new(
            HttpStatePorts {
                accounts: Arc::new(LandlordAccountService::new(
                    self.store.clone(),
                    hasher.clone(),
                )),
                password_reset: Arc::new(PasswordResetService::new(
                    self.store.clone(),
                    hasher,
                    self.notifier.clone(),
                    self.clock.clone(),
                )),
                deletion: Arc::new(AccountDeletionService::new(
                    self.store.clone(),
                    self.store.clone(),
                    self.store.clone(),
                    self.clock.clone(),
                )),
                contact: Arc::new(ContactService::new(self.notifier.clone())),
            },
            options,
        )
    }
}
