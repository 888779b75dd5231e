//! HTTP inbound adapter.
//!
//! Handlers translate form posts and page requests into calls on the driving
//! ports held in [`state::HttpState`]. Pages are JSON view models carrying a
//! title and the flash messages drained from the session; actions answer with
//! `302 Found` redirects.

pub mod account;
pub mod accounts;
pub mod contact;
pub mod error;
pub mod health;
pub mod password_reset;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod views;

pub use error::ApiResult;
