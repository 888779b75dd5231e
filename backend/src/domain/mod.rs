//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed landlord, apartment and session values used
//! by the HTTP and persistence layers, and the services that implement the
//! driving ports. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Landlord and its value types: the credential record.
//! - SessionState: identity and flash messages for one browser session.
//! - Services implementing the ports in [`ports`].

pub mod account_deletion_service;
pub mod account_service;
pub mod apartment;
pub mod auth;
pub mod contact_service;
pub mod error;
pub mod landlord;
pub mod password_reset_service;
pub mod ports;
pub mod reset_token;
pub mod session;
mod store_errors;
pub mod trace_id;

pub use self::account_deletion_service::AccountDeletionService;
pub use self::account_service::LandlordAccountService;
pub use self::apartment::{Apartment, ApartmentNumber, Booking, MonthlyPrices};
pub use self::auth::{
    ContactMessage, FieldError, LoginCredentials, NewPassword, PASSWORD_MIN_CHARS, SignupRequest,
    ValidationErrors,
};
pub use self::contact_service::ContactService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::landlord::{
    EmailAddress, EmailValidationError, Landlord, LandlordId, LandlordIdentity, LandlordProfile,
    LinkedProvider, PasswordHash, PasswordResetWindow,
};
pub use self::password_reset_service::PasswordResetService;
pub use self::reset_token::{
    RESET_TOKEN_BYTES, ResetLink, ResetToken, ResetTokenFormatError, TokenDigest, reset_token_ttl,
};
pub use self::session::{FlashKind, FlashMessage, SessionState};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use landlord_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
