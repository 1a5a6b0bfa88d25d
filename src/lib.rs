//! Pet store management API: sellers and their pets in SQLite, with per-user
//! favorites and cart buckets in MongoDB.
//!
//! Requests flow router → handler → service → repository. Services hold all
//! business rules and depend on repositories only through the traits in
//! [`repositories`], so tests can swap in the in-memory implementations.

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod shutdown;
pub mod state;
