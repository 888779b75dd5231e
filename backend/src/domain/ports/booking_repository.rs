//! Port abstraction for apartment booking persistence.
use async_trait::async_trait;

use crate::domain::ApartmentNumber;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "booking repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Delete every booking referencing `apartment`, returning the count.
    async fn delete_by_apartment(
        &self,
        apartment: ApartmentNumber,
    ) -> Result<usize, BookingRepositoryError>;
}
