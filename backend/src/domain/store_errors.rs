//! Translation of driven-port failures into domain [`Error`] values.
//!
//! Connection failures surface as `service_unavailable`; everything else is
//! an internal error. Services attach their own context on top.

use super::Error;
use super::ports::{
    ApartmentRepositoryError, BookingRepositoryError, CredentialHasherError,
    LandlordRepositoryError, NotificationError,
};

pub(crate) fn landlord_store_error(error: LandlordRepositoryError) -> Error {
    match error {
        LandlordRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("landlord repository unavailable: {message}"))
        }
        LandlordRepositoryError::Query { message } => {
            Error::internal(format!("landlord repository error: {message}"))
        }
        LandlordRepositoryError::DuplicateEmail { email } => {
            Error::conflict(format!("landlord email already registered: {email}"))
        }
    }
}

pub(crate) fn apartment_store_error(error: ApartmentRepositoryError) -> Error {
    match error {
        ApartmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("apartment repository unavailable: {message}"))
        }
        ApartmentRepositoryError::Query { message } => {
            Error::internal(format!("apartment repository error: {message}"))
        }
    }
}

pub(crate) fn booking_store_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking repository unavailable: {message}"))
        }
        BookingRepositoryError::Query { message } => {
            Error::internal(format!("booking repository error: {message}"))
        }
    }
}

pub(crate) fn hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(error.to_string())
}

pub(crate) fn notification_error(error: NotificationError) -> Error {
    match error {
        NotificationError::Delivery { message } => {
            Error::service_unavailable(format!("notification delivery failed: {message}"))
        }
    }
}
