//! Core data models for the pet store API.
//!
//! Entities map to SQLite rows via `sqlx::FromRow` and serialize as JSON via
//! `serde`. Request types deserialize leniently: missing fields take their
//! defaults so the service layer decides what is required.

pub mod bucket;
pub mod pet;
pub mod seller;
pub mod user;
