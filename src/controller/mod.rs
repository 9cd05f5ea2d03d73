//! HTTP request handlers.
//!
//! Controllers validate input, convert between DTOs and domain types, and
//! delegate to the service layer. The settings and auth pages render minimal
//! HTML; the join and member endpoints speak JSON and are documented via
//! utoipa.

pub mod auth;
pub mod join;
pub mod member;
pub mod settings;
