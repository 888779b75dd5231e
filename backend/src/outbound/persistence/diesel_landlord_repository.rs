//! PostgreSQL-backed `LandlordRepository` implementation using Diesel ORM.
//!
//! Token redemption is a single `UPDATE ... WHERE digest = $1 AND expires > $2
//! RETURNING *`, so of two concurrent redemptions only one can match a row.
//! Accounts marked for deletion never match a reset token.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{LandlordRepository, LandlordRepositoryError};
use crate::domain::{
    EmailAddress, Landlord, LandlordId, PasswordHash, PasswordResetWindow, TokenDigest,
};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::{
    LandlordRow, NewLandlordRow, RowConversionError, decode_providers, encode_providers,
};
use super::pool::{DbPool, PoolError};
use super::schema::landlords;

/// Diesel-backed implementation of the `LandlordRepository` port.
#[derive(Clone)]
pub struct DieselLandlordRepository {
    pool: DbPool,
}

impl DieselLandlordRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LandlordRepositoryError {
    LandlordRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    operation: &str,
) -> LandlordRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => LandlordRepositoryError::connection(message),
        DieselFailure::UniqueViolation { constraint } => LandlordRepositoryError::query(format!(
            "unique constraint violated: {}",
            constraint.as_deref().unwrap_or("unknown")
        )),
        DieselFailure::Query(message) => LandlordRepositoryError::query(message),
    }
}

fn map_row_error(error: RowConversionError) -> LandlordRepositoryError {
    LandlordRepositoryError::query(format!("corrupted landlord row: {error}"))
}

fn into_landlord(row: Option<LandlordRow>) -> Result<Option<Landlord>, LandlordRepositoryError> {
    row.map(LandlordRow::into_domain)
        .transpose()
        .map_err(map_row_error)
}

/// Errors raised inside the provider-unlink transaction.
enum UnlinkFailure {
    Diesel(diesel::result::Error),
    Row(RowConversionError),
}

impl From<diesel::result::Error> for UnlinkFailure {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

#[async_trait]
impl LandlordRepository for DieselLandlordRepository {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Landlord>, LandlordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = landlords::table
            .filter(landlords::email.eq(email.as_ref()))
            .select(LandlordRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find landlord by email"))?;
        into_landlord(row)
    }

    async fn find_by_id(
        &self,
        id: &LandlordId,
    ) -> Result<Option<Landlord>, LandlordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = landlords::table
            .find(*id.as_uuid())
            .select(LandlordRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find landlord by id"))?;
        into_landlord(row)
    }

    async fn insert(&self, landlord: &Landlord) -> Result<(), LandlordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewLandlordRow::from_domain(landlord);
        diesel::insert_into(landlords::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| match classify_diesel_error(err, "insert landlord") {
                DieselFailure::UniqueViolation { .. } => {
                    LandlordRepositoryError::duplicate_email(landlord.email.as_ref())
                }
                DieselFailure::Connection(message) => LandlordRepositoryError::connection(message),
                DieselFailure::Query(message) => LandlordRepositoryError::query(message),
            })?;
        Ok(())
    }

    async fn update_password(
        &self,
        id: &LandlordId,
        password_hash: &PasswordHash,
    ) -> Result<bool, LandlordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(landlords::table.find(*id.as_uuid()))
            .set((
                landlords::password_hash.eq(password_hash.as_str()),
                landlords::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "update password"))?;
        Ok(updated > 0)
    }

    async fn set_password_reset(
        &self,
        id: &LandlordId,
        window: &PasswordResetWindow,
    ) -> Result<(), LandlordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(landlords::table.find(*id.as_uuid()))
            .set((
                landlords::reset_token_digest.eq(Some(window.token_digest.as_str())),
                landlords::reset_expires_at.eq(Some(window.expires_at)),
                landlords::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "set password reset"))?;
        Ok(())
    }

    async fn find_by_active_reset(
        &self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<Landlord>, LandlordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = landlords::table
            .filter(landlords::reset_token_digest.eq(digest.as_str()))
            .filter(landlords::reset_expires_at.gt(now))
            .filter(landlords::deletion_requested_at.is_null())
            .select(LandlordRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "find active reset"))?;
        into_landlord(row)
    }

    async fn redeem_password_reset(
        &self,
        digest: &TokenDigest,
        now: DateTime<Utc>,
        password_hash: &PasswordHash,
    ) -> Result<Option<Landlord>, LandlordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(
            landlords::table
                .filter(landlords::reset_token_digest.eq(digest.as_str()))
                .filter(landlords::reset_expires_at.gt(now))
                .filter(landlords::deletion_requested_at.is_null()),
        )
        .set((
            landlords::password_hash.eq(password_hash.as_str()),
            landlords::reset_token_digest.eq(None::<String>),
            landlords::reset_expires_at.eq(None::<DateTime<Utc>>),
            landlords::updated_at.eq(diesel::dsl::now),
        ))
        .returning(LandlordRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|err| map_diesel_error(err, "redeem password reset"))?;
        into_landlord(row)
    }

    async fn remove_provider(
        &self,
        id: &LandlordId,
        kind: &str,
    ) -> Result<bool, LandlordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let landlord_id = *id.as_uuid();
        let kind = kind.to_owned();

        // Lock the row so a concurrent link cannot be lost between read and write.
        let result: Result<bool, UnlinkFailure> = conn
            .transaction(|conn| {
                async move {
                    let stored: Option<serde_json::Value> = landlords::table
                        .find(landlord_id)
                        .select(landlords::linked_providers)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(stored) = stored else {
                        return Ok(false);
                    };

                    let mut providers = decode_providers(stored).map_err(UnlinkFailure::Row)?;
                    let before = providers.len();
                    providers.retain(|provider| provider.kind != kind);
                    if providers.len() == before {
                        return Ok(false);
                    }

                    diesel::update(landlords::table.find(landlord_id))
                        .set((
                            landlords::linked_providers.eq(encode_providers(&providers)),
                            landlords::updated_at.eq(diesel::dsl::now),
                        ))
                        .execute(conn)
                        .await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await;

        result.map_err(|failure| match failure {
            UnlinkFailure::Diesel(err) => map_diesel_error(err, "remove provider"),
            UnlinkFailure::Row(err) => map_row_error(err),
        })
    }

    async fn mark_deletion_requested(
        &self,
        id: &LandlordId,
        requested_at: DateTime<Utc>,
    ) -> Result<(), LandlordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(landlords::table.find(*id.as_uuid()))
            .set((
                landlords::deletion_requested_at.eq(Some(requested_at)),
                landlords::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "mark deletion requested"))?;
        Ok(())
    }

    async fn list_pending_deletions(&self) -> Result<Vec<Landlord>, LandlordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LandlordRow> = landlords::table
            .filter(landlords::deletion_requested_at.is_not_null())
            .order(landlords::deletion_requested_at.asc())
            .select(LandlordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list pending deletions"))?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(map_row_error))
            .collect()
    }

    async fn delete(&self, id: &LandlordId) -> Result<(), LandlordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(landlords::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "delete landlord"))?;
        Ok(())
    }
}
