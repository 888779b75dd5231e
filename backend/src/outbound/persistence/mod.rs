//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the landlord, apartment and booking
//! repository ports backed by PostgreSQL via `diesel-async` with `bb8`
//! connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories translate between Diesel rows and domain
//!   types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: Diesel and pool failures map onto each port's error
//!   enum; raw database messages are only logged.
//!
//! # Example
//!
//! ```ignore
//! use landlord_backend::outbound::persistence::{DbPool, DieselLandlordRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new(database_url)).await?;
//! let landlords = DieselLandlordRepository::new(pool.clone());
//! ```

mod diesel_apartment_repository;
mod diesel_basic_error_mapping;
mod diesel_landlord_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_apartment_repository::{DieselApartmentRepository, DieselBookingRepository};
pub use diesel_landlord_repository::DieselLandlordRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
