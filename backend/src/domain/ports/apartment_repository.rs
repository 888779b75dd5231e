//! Port abstraction for apartment listing persistence.
use async_trait::async_trait;

use crate::domain::{Apartment, EmailAddress};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by apartment repository adapters.
    pub enum ApartmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "apartment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "apartment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApartmentRepository: Send + Sync {
    /// Listings whose `landlord_email` matches, ordered by apartment number.
    async fn list_by_landlord(
        &self,
        landlord_email: &EmailAddress,
    ) -> Result<Vec<Apartment>, ApartmentRepositoryError>;

    /// Delete every listing owned by `landlord_email`, returning the count.
    async fn delete_by_landlord(
        &self,
        landlord_email: &EmailAddress,
    ) -> Result<usize, ApartmentRepositoryError>;
}
