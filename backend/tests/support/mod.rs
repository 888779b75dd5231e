//! Shared helpers for the embedded PostgreSQL integration suites.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! cluster bootstrap, template provisioning and skip handling live here
//! instead of being repeated in every suite.

pub mod cluster;
pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster::shared_cluster_handle;
pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::provision_template_database;

use postgres::{Client, NoTls};

/// Render a `postgres` error with its SQLSTATE and message.
///
/// `postgres::Error`'s `Display` collapses server errors to `db error`, which
/// hides the constraint that failed.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

/// Open a plain client for seeding rows the adapters never write.
pub fn raw_client(url: &str) -> Result<Client, String> {
    Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))
}
