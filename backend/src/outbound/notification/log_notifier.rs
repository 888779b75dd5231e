//! Notification adapter that writes each message to the structured log.
//!
//! Outbound mail is not wired up; operators read reset links and contact
//! messages from the log stream. Reset links are logged at `info` under the
//! `landlord_backend::notifications` target so they can be routed separately.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{NotificationError, NotificationPort};
use crate::domain::{ContactMessage, EmailAddress, ResetLink};

const TARGET: &str = "landlord_backend::notifications";

/// [`NotificationPort`] that logs instead of delivering.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    operator_address: Option<String>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address contact messages are addressed to in the log record.
    #[must_use]
    pub fn with_operator_address(mut self, address: impl Into<String>) -> Self {
        self.operator_address = Some(address.into());
        self
    }
}

#[async_trait]
impl NotificationPort for LogNotifier {
    async fn send_reset_link(
        &self,
        recipient: &EmailAddress,
        link: &ResetLink,
    ) -> Result<(), NotificationError> {
        info!(
            target: TARGET,
            to = %recipient,
            link = link.as_str(),
            "password reset link issued"
        );
        Ok(())
    }

    async fn send_password_changed(
        &self,
        recipient: &EmailAddress,
    ) -> Result<(), NotificationError> {
        info!(target: TARGET, to = %recipient, "password change confirmed");
        Ok(())
    }

    async fn send_contact_message(
        &self,
        message: &ContactMessage,
    ) -> Result<(), NotificationError> {
        info!(
            target: TARGET,
            to = self.operator_address.as_deref().unwrap_or("operator"),
            from = %message.email,
            name = %message.name,
            body = %message.body,
            "contact message received"
        );
        Ok(())
    }
}
