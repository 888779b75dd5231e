//! Driving port for contact form submissions.
use async_trait::async_trait;

use crate::domain::{ContactMessage, Error, SessionState};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactInbox: Send + Sync {
    /// Forward a message to the site operator and flash a confirmation.
    async fn submit(
        &self,
        session: SessionState,
        message: &ContactMessage,
    ) -> Result<SessionState, Error>;
}
