//! Domain models and API DTOs.
//!
//! `token` and `join` hold the domain types the service layer works with;
//! `api` holds the serialized shapes exposed over HTTP.

pub mod api;
pub mod join;
pub mod token;
