//! Contact form submissions.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{ContactInbox, NotificationPort};
use crate::domain::store_errors::notification_error;
use crate::domain::{ContactMessage, Error, FlashKind, SessionState};

pub(crate) const CONTACT_SENT_MESSAGE: &str = "Email has been sent successfully!";

/// Forwards contact messages through the notification port.
#[derive(Clone)]
pub struct ContactService<N> {
    notifier: Arc<N>,
}

impl<N> ContactService<N> {
    pub fn new(notifier: Arc<N>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl<N> ContactInbox for ContactService<N>
where
    N: NotificationPort,
{
    async fn submit(
        &self,
        session: SessionState,
        message: &ContactMessage,
    ) -> Result<SessionState, Error> {
        self.notifier
            .send_contact_message(message)
            .await
            .map_err(notification_error)?;
        info!(from = %message.email, "contact message forwarded");
        Ok(session.with_flash(FlashKind::Success, CONTACT_SENT_MESSAGE))
    }
}
