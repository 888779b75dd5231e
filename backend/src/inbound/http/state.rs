//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountDeletion, ContactInbox, LandlordAccounts, PasswordReset};

/// How `POST /forgot` hands a freshly issued reset token to the landlord.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ResetHandoff {
    /// Deliver the link through the notification port and show a neutral
    /// message whether or not the account exists.
    #[default]
    Notify,
    /// Redirect the browser straight to the reset form.
    Direct,
}

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn LandlordAccounts>,
    pub password_reset: Arc<dyn PasswordReset>,
    pub deletion: Arc<dyn AccountDeletion>,
    pub contact: Arc<dyn ContactInbox>,
}

/// Behaviour switches chosen at startup.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub reset_handoff: ResetHandoff,
    /// Absolute origin used to build reset links, without a trailing slash.
    pub public_base_url: String,
    pub contact_form_enabled: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            reset_handoff: ResetHandoff::Notify,
            public_base_url: "http://localhost:3000".to_owned(),
            contact_form_enabled: false,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn LandlordAccounts>,
    pub password_reset: Arc<dyn PasswordReset>,
    pub deletion: Arc<dyn AccountDeletion>,
    pub contact: Arc<dyn ContactInbox>,
    pub options: HttpOptions,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    pub fn new(ports: HttpStatePorts, options: HttpOptions) -> Self {
        let HttpStatePorts {
            accounts,
            password_reset,
            deletion,
            contact,
        } = ports;
        Self {
            accounts,
            password_reset,
            deletion,
            contact,
            options,
        }
    }
}
