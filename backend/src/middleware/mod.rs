//! Request middleware.
//!
//! Purpose: Request lifecycle concerns that wrap every handler. Sessions come
//! from `actix-session`; this module adds per-request trace identifiers.

pub mod trace;

pub use trace::Trace;
