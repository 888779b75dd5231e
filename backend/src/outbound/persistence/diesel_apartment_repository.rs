//! PostgreSQL-backed apartment and booking repositories.
//!
//! Both adapters are thin: listings are read and deleted by owner email and
//! bookings are deleted by apartment number. Deleting nothing is success.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    ApartmentRepository, ApartmentRepositoryError, BookingRepository, BookingRepositoryError,
};
use crate::domain::{Apartment, ApartmentNumber, EmailAddress};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error, pool_error_message};
use super::models::ApartmentRow;
use super::pool::DbPool;
use super::schema::{apartment_bookings, apartments};

/// Diesel-backed implementation of the `ApartmentRepository` port.
#[derive(Clone)]
pub struct DieselApartmentRepository {
    pool: DbPool,
}

impl DieselApartmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_apartment_error(error: diesel::result::Error, operation: &str) -> ApartmentRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => ApartmentRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            ApartmentRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => ApartmentRepositoryError::query(message),
    }
}

#[async_trait]
impl ApartmentRepository for DieselApartmentRepository {
    async fn list_by_landlord(
        &self,
        landlord_email: &EmailAddress,
    ) -> Result<Vec<Apartment>, ApartmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ApartmentRepositoryError::connection(pool_error_message(err)))?;
        let rows: Vec<ApartmentRow> = apartments::table
            .filter(apartments::landlord_email.eq(landlord_email.as_ref()))
            .order(apartments::number.asc())
            .select(ApartmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_apartment_error(err, "list apartments by landlord"))?;
        rows.into_iter()
            .map(|row| {
                row.into_domain().map_err(|err| {
                    ApartmentRepositoryError::query(format!("corrupted apartment row: {err}"))
                })
            })
            .collect()
    }

    async fn delete_by_landlord(
        &self,
        landlord_email: &EmailAddress,
    ) -> Result<usize, ApartmentRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ApartmentRepositoryError::connection(pool_error_message(err)))?;
        diesel::delete(
            apartments::table.filter(apartments::landlord_email.eq(landlord_email.as_ref())),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_apartment_error(err, "delete apartments by landlord"))
    }
}

/// Diesel-backed implementation of the `BookingRepository` port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_booking_error(error: diesel::result::Error, operation: &str) -> BookingRepositoryError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => BookingRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            BookingRepositoryError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => BookingRepositoryError::query(message),
    }
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn delete_by_apartment(
        &self,
        apartment: ApartmentNumber,
    ) -> Result<usize, BookingRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| BookingRepositoryError::connection(pool_error_message(err)))?;
        diesel::delete(
            apartment_bookings::table
                .filter(apartment_bookings::apartment_number.eq(apartment.value())),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_booking_error(err, "delete bookings by apartment"))
    }
}
