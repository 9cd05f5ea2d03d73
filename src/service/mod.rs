//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and the data (store) layer. Services are responsible for:
//!
//! - **OAuth2 flow** (`oauth`): authorization URL, code exchange, token refresh
//! - **Discord REST** (`member`): identity resolution and guild-member-add calls
//! - **Token lifecycle** (`token`): valid-on-demand access tokens, lazy refresh, eviction
//! - **Bulk orchestration** (`join`): settle-all fan-out over every stored member

pub mod join;
pub mod member;
pub mod oauth;
pub mod token;

#[cfg(test)]
mod test;
