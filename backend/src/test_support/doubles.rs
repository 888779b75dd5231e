//! Hasher and notifier doubles that record what the services asked for.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    CredentialHasher, CredentialHasherError, NotificationError, NotificationPort,
};
use crate::domain::{ContactMessage, EmailAddress, PasswordHash, ResetLink};

/// Reversible "hash" so tests can assert which password was stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextHasher;

impl PlaintextHasher {
    pub const PREFIX: &'static str = "plain$";

    /// Encoded form the hasher produces for `plaintext`.
    pub fn encode(plaintext: &str) -> PasswordHash {
        PasswordHash::from_encoded(format!("{}{plaintext}", Self::PREFIX))
    }
}

#[async_trait]
impl CredentialHasher for PlaintextHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, CredentialHasherError> {
        Ok(Self::encode(plaintext))
    }

    async fn verify(
        &self,
        plaintext: &str,
        hash: &PasswordHash,
    ) -> Result<bool, CredentialHasherError> {
        let Some(stored) = hash.as_str().strip_prefix(Self::PREFIX) else {
            return Err(CredentialHasherError::malformed_hash("missing test prefix"));
        };
        Ok(stored == plaintext)
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentNotification {
    ResetLink { to: String, link: String },
    PasswordChanged { to: String },
    Contact { from: String, name: String, body: String },
}

/// Notifier that stores every message and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
    failing: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later delivery fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap_or_else(PoisonError::into_inner) = failing;
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.lock_sent().clone()
    }

    /// Most recent reset link, if one was sent.
    pub fn last_reset_link(&self) -> Option<String> {
        self.lock_sent().iter().rev().find_map(|sent| match sent {
            SentNotification::ResetLink { link, .. } => Some(link.clone()),
            _ => None,
        })
    }

    fn lock_sent(&self) -> MutexGuard<'_, Vec<SentNotification>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, notification: SentNotification) -> Result<(), NotificationError> {
        if *self.failing.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(NotificationError::delivery("recording notifier set to fail"));
        }
        self.lock_sent().push(notification);
        Ok(())
    }
}

#[async_trait]
impl NotificationPort for RecordingNotifier {
    async fn send_reset_link(
        &self,
        recipient: &EmailAddress,
        link: &ResetLink,
    ) -> Result<(), NotificationError> {
        self.record(SentNotification::ResetLink {
            to: recipient.to_string(),
            link: link.as_str().to_owned(),
        })
    }

    async fn send_password_changed(
        &self,
        recipient: &EmailAddress,
    ) -> Result<(), NotificationError> {
        self.record(SentNotification::PasswordChanged {
            to: recipient.to_string(),
        })
    }

    async fn send_contact_message(
        &self,
        message: &ContactMessage,
    ) -> Result<(), NotificationError> {
        self.record(SentNotification::Contact {
            from: message.email.to_string(),
            name: message.name.clone(),
            body: message.body.clone(),
        })
    }
}
