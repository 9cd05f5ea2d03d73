use time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Initializes the tracing subscriber.
///
/// Respects `RUST_LOG` when set and defaults to `info` otherwise.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Builds the HTTP client used for all Discord requests.
///
/// Redirects are disabled: the Discord endpoints never redirect, and
/// following redirects from an external service is an SSRF hazard.
///
/// # Returns
/// - `Ok(reqwest::Client)` - Configured client
/// - `Err(AppError)` - TLS backend initialization failed
pub fn setup_http_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(client)
}

/// Builds the session layer backing the OAuth CSRF state round-trip.
///
/// Sessions are in-memory and short-lived; they only carry the CSRF token
/// between `/login` and `/callback`. Cookies are not marked secure so the
/// flow also works on plain-HTTP local deployments.
pub fn setup_session_layer() -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30)))
}
