//! Driving port for cascading account deletion.
//!
//! Deletion is a forward-only pipeline: mark the credential as pending,
//! remove each apartment's bookings, remove the apartments, then remove the
//! credential last. A failure stops the pipeline and leaves the marker set so
//! the cascade can be resumed.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{ApartmentNumber, Error, LandlordId, SessionState};

/// Pipeline step at which a cascade stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionStep {
    ListApartments,
    DeleteBookings { apartment: ApartmentNumber },
    DeleteApartments,
    DeleteCredential,
}

impl fmt::Display for DeletionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListApartments => f.write_str("listing apartments"),
            Self::DeleteBookings { apartment } => {
                write!(f, "deleting bookings for apartment {apartment}")
            }
            Self::DeleteApartments => f.write_str("deleting apartments"),
            Self::DeleteCredential => f.write_str("deleting the account record"),
        }
    }
}

/// Deletion failures.
#[derive(Debug, thiserror::Error)]
pub enum DeletionError {
    /// The session carries no identity.
    #[error("sign in required")]
    NotSignedIn,
    /// A step after the marker was written failed; earlier steps stand.
    #[error("account deletion stopped while {step}: {source}")]
    PartialFailure {
        step: DeletionStep,
        #[source]
        source: Error,
    },
    /// Nothing was changed: the marker itself could not be written.
    #[error(transparent)]
    Unexpected(#[from] Error),
}

/// What one completed cascade removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub apartments_deleted: usize,
    pub bookings_deleted: usize,
}

/// Outcome of re-running interrupted cascades.
#[derive(Debug, Default)]
pub struct ResumeSummary {
    pub completed: Vec<LandlordId>,
    pub failed: Vec<(LandlordId, DeletionError)>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountDeletion: Send + Sync {
    /// Delete the signed-in landlord with all listings and bookings, then
    /// log the session out.
    async fn delete_account(&self, session: SessionState) -> Result<SessionState, DeletionError>;

    /// Re-run the cascade for every credential left with a deletion marker.
    async fn resume_pending_deletions(&self) -> Result<ResumeSummary, Error>;
}
