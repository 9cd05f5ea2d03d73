use thiserror::Error;

/// Internal issues with the token store indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum StoreError {
    /// Attempt to store a record with an empty access token.
    ///
    /// A record without an access token is invalid by definition and the store
    /// refuses it rather than caching a credential that can never work.
    /// Results in a 500 Internal Server Error with a generic message returned
    /// to client.
    #[error("Refusing to store a token record with an empty access token")]
    EmptyAccessToken,
}
