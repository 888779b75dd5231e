//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hasher, notifications) are implemented by
//! outbound adapters. Driving ports (accounts, reset, deletion, contact) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_deletion;
mod apartment_repository;
mod booking_repository;
mod contact_inbox;
mod credential_hasher;
mod landlord_accounts;
mod landlord_repository;
mod notification_port;
mod password_reset;

#[cfg(test)]
pub use account_deletion::MockAccountDeletion;
pub use account_deletion::{
    AccountDeletion, DeletionError, DeletionReport, DeletionStep, ResumeSummary,
};
#[cfg(test)]
pub use apartment_repository::MockApartmentRepository;
pub use apartment_repository::{ApartmentRepository, ApartmentRepositoryError};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, BookingRepositoryError};
#[cfg(test)]
pub use contact_inbox::MockContactInbox;
pub use contact_inbox::ContactInbox;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use landlord_accounts::MockLandlordAccounts;
pub use landlord_accounts::{
    AccountError, AccountOverview, AuthError, LandlordAccounts, SignupError,
};
#[cfg(test)]
pub use landlord_repository::MockLandlordRepository;
pub use landlord_repository::{LandlordRepository, LandlordRepositoryError};
#[cfg(test)]
pub use notification_port::MockNotificationPort;
pub use notification_port::{NotificationError, NotificationPort};
#[cfg(test)]
pub use password_reset::MockPasswordReset;
pub use password_reset::{PasswordReset, ResetError, ResetRequestError};
