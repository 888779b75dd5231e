//! In-memory landlord, apartment and booking store with failure injection.
//!
//! One value implements all three repository ports over shared state, so a
//! test can seed listings, run a cascade and inspect what remains.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    ApartmentRepository, ApartmentRepositoryError, BookingRepository, BookingRepositoryError,
    LandlordRepository, LandlordRepositoryError,
};
use crate::domain::{
    Apartment, ApartmentNumber, Booking, EmailAddress, Landlord, LandlordId, PasswordHash,
    PasswordResetWindow, TokenDigest,
};

/// Store operation that can be told to fail with a connection error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreFailure {
    FindLandlord,
    MarkDeletion,
    ListApartments,
    DeleteBookings,
    DeleteApartments,
    DeleteLandlord,
}

#[derive(Debug, Default)]
struct StoreState {
    landlords: Vec<Landlord>,
    apartments: Vec<Apartment>,
    bookings: Vec<Booking>,
    failures: HashSet<StoreFailure>,
}

impl StoreState {
    fn landlord_mut(&mut self, id: &LandlordId) -> Option<&mut Landlord> {
        self.landlords.iter_mut().find(|landlord| landlord.id == *id)
    }

    fn active_reset_mut(
        &mut self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
    ) -> Option<&mut Landlord> {
        self.landlords.iter_mut().find(|landlord| {
            landlord.deletion_requested_at.is_none()
                && landlord
                    .password_reset
                    .as_ref()
                    .is_some_and(|window| window.token_digest == *digest && window.is_open_at(now))
        })
    }
}

/// Shared in-memory implementation of the persistence ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_landlord(&self, landlord: Landlord) {
        self.lock().landlords.push(landlord);
    }

    pub fn insert_apartment(&self, apartment: Apartment) {
        self.lock().apartments.push(apartment);
    }

    pub fn insert_booking(&self, booking: Booking) {
        self.lock().bookings.push(booking);
    }

    pub fn landlord(&self, id: &LandlordId) -> Option<Landlord> {
        self.lock()
            .landlords
            .iter()
            .find(|landlord| landlord.id == *id)
            .cloned()
    }

    pub fn landlord_by_email(&self, email: &str) -> Option<Landlord> {
        self.lock()
            .landlords
            .iter()
            .find(|landlord| landlord.email.as_ref() == email)
            .cloned()
    }

    pub fn apartments(&self) -> Vec<Apartment> {
        self.lock().apartments.clone()
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.lock().bookings.clone()
    }

    /// Make `operation` fail until [`InMemoryStore::clear_failures`].
    pub fn fail_on(&self, operation: StoreFailure) {
        self.lock().failures.insert(operation);
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    fn should_fail(&self, operation: StoreFailure) -> bool {
        self.lock().failures.contains(&operation)
    }
}

fn injected(operation: StoreFailure) -> String {
    format!("injected failure at {operation:?}")
}

#[async_trait]
impl LandlordRepository for InMemoryStore {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Landlord>, LandlordRepositoryError> {
        if self.should_fail(StoreFailure::FindLandlord) {
            return Err(LandlordRepositoryError::connection(injected(
                StoreFailure::FindLandlord,
            )));
        }
        Ok(self.landlord_by_email(email.as_ref()))
    }

    async fn find_by_id(
        &self,
        id: &LandlordId,
    ) -> Result<Option<Landlord>, LandlordRepositoryError> {
        if self.should_fail(StoreFailure::FindLandlord) {
            return Err(LandlordRepositoryError::connection(injected(
                StoreFailure::FindLandlord,
            )));
        }
        Ok(self.landlord(id))
    }

    async fn insert(&self, landlord: &Landlord) -> Result<(), LandlordRepositoryError> {
        let mut state = self.lock();
        if state
            .landlords
            .iter()
            .any(|existing| existing.email == landlord.email)
        {
            return Err(LandlordRepositoryError::duplicate_email(
                landlord.email.to_string(),
            ));
        }
        state.landlords.push(landlord.clone());
        Ok(())
    }

    async fn update_password(
        &self,
        id: &LandlordId,
        password_hash: &PasswordHash,
    ) -> Result<bool, LandlordRepositoryError> {
        Ok(match self.lock().landlord_mut(id) {
            Some(landlord) => {
                landlord.password_hash = password_hash.clone();
                true
            }
            None => false,
        })
    }

    async fn set_password_reset(
        &self,
        id: &LandlordId,
        window: &PasswordResetWindow,
    ) -> Result<(), LandlordRepositoryError> {
        if let Some(landlord) = self.lock().landlord_mut(id) {
            landlord.password_reset = Some(window.clone());
        }
        Ok(())
    }

    async fn find_by_active_reset(
        &self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<Landlord>, LandlordRepositoryError> {
        Ok(self
            .lock()
            .active_reset_mut(digest, now)
            .map(|landlord| landlord.clone()))
    }

    async fn redeem_password_reset(
        &self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
        password_hash: &PasswordHash,
    ) -> Result<Option<Landlord>, LandlordRepositoryError> {
        let mut state = self.lock();
        Ok(state.active_reset_mut(digest, now).map(|landlord| {
            landlord.password_hash = password_hash.clone();
            landlord.password_reset = None;
            landlord.clone()
        }))
    }

    async fn remove_provider(
        &self,
        id: &LandlordId,
        kind: &str,
    ) -> Result<bool, LandlordRepositoryError> {
        Ok(match self.lock().landlord_mut(id) {
            Some(landlord) => {
                let before = landlord.linked_providers.len();
                landlord
                    .linked_providers
                    .retain(|provider| provider.kind != kind);
                landlord.linked_providers.len() != before
            }
            None => false,
        })
    }

    async fn mark_deletion_requested(
        &self,
        id: &LandlordId,
        requested_at: DateTime<Utc>,
    ) -> Result<(), LandlordRepositoryError> {
        if self.should_fail(StoreFailure::MarkDeletion) {
            return Err(LandlordRepositoryError::connection(injected(
                StoreFailure::MarkDeletion,
            )));
        }
        if let Some(landlord) = self.lock().landlord_mut(id) {
            landlord.deletion_requested_at = Some(requested_at);
        }
        Ok(())
    }

    async fn list_pending_deletions(&self) -> Result<Vec<Landlord>, LandlordRepositoryError> {
        Ok(self
            .lock()
            .landlords
            .iter()
            .filter(|landlord| landlord.is_pending_deletion())
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &LandlordId) -> Result<(), LandlordRepositoryError> {
        if self.should_fail(StoreFailure::DeleteLandlord) {
            return Err(LandlordRepositoryError::connection(injected(
                StoreFailure::DeleteLandlord,
            )));
        }
        self.lock().landlords.retain(|landlord| landlord.id != *id);
        Ok(())
    }
}

#[async_trait]
impl ApartmentRepository for InMemoryStore {
    async fn list_by_landlord(
        &self,
        landlord_email: &EmailAddress,
    ) -> Result<Vec<Apartment>, ApartmentRepositoryError> {
        if self.should_fail(StoreFailure::ListApartments) {
            return Err(ApartmentRepositoryError::connection(injected(
                StoreFailure::ListApartments,
            )));
        }
        let mut owned: Vec<Apartment> = self
            .lock()
            .apartments
            .iter()
            .filter(|apartment| apartment.landlord_email == *landlord_email)
            .cloned()
            .collect();
        owned.sort_by_key(|apartment| apartment.number);
        Ok(owned)
    }

    async fn delete_by_landlord(
        &self,
        landlord_email: &EmailAddress,
    ) -> Result<usize, ApartmentRepositoryError> {
        if self.should_fail(StoreFailure::DeleteApartments) {
            return Err(ApartmentRepositoryError::connection(injected(
                StoreFailure::DeleteApartments,
            )));
        }
        let mut state = self.lock();
        let before = state.apartments.len();
        state
            .apartments
            .retain(|apartment| apartment.landlord_email != *landlord_email);
        Ok(before - state.apartments.len())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn delete_by_apartment(
        &self,
        apartment: ApartmentNumber,
    ) -> Result<usize, BookingRepositoryError> {
        if self.should_fail(StoreFailure::DeleteBookings) {
            return Err(BookingRepositoryError::connection(injected(
                StoreFailure::DeleteBookings,
            )));
        }
        let mut state = self.lock();
        let before = state.bookings.len();
        state
            .bookings
            .retain(|booking| booking.apartment_number != apartment);
        Ok(before - state.bookings.len())
    }
}
