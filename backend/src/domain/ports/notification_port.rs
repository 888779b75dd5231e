//! Outbound notifications to landlords and the site operator.
//!
//! Delivery itself lives outside the service. The production adapter logs
//! each notification; tests use a recording double.

use async_trait::async_trait;

use crate::domain::{ContactMessage, EmailAddress, ResetLink};

use super::define_port_error;

define_port_error! {
    /// Failures raised by notification adapters.
    pub enum NotificationError {
        /// The message could not be handed to the delivery channel.
        Delivery { message: String } => "notification delivery failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Send a password reset link to the account owner.
    async fn send_reset_link(
        &self,
        recipient: &EmailAddress,
        link: &ResetLink,
    ) -> Result<(), NotificationError>;

    /// Confirm to the account owner that their password changed.
    async fn send_password_changed(&self, recipient: &EmailAddress)
    -> Result<(), NotificationError>;

    /// Forward a contact form submission to the site operator.
    async fn send_contact_message(&self, message: &ContactMessage)
    -> Result<(), NotificationError>;
}
