use thiserror::Error;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for KeyId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Handle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandleError {
    #[error("Handle too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Handle too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Handle contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for ContactAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Invalid contact address format: {0}")]
    InvalidFormat(String),
}

/// Error for KeyLabel validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyLabelError {
    #[error("Key label must not be empty")]
    Empty,

    #[error("Key label too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for all credential operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid account ID: {0}")]
    InvalidAccountId(#[from] AccountIdError),

    #[error("Invalid key ID: {0}")]
    InvalidKeyId(#[from] KeyIdError),

    #[error("Invalid handle: {0}")]
    InvalidHandle(#[from] HandleError),

    #[error("Invalid contact address: {0}")]
    InvalidContact(#[from] ContactError),

    #[error("Invalid key label: {0}")]
    InvalidKeyLabel(#[from] KeyLabelError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    // Input-shape errors, rejected before any storage access
    #[error("Malformed API key")]
    MalformedKey,

    // Domain-level errors
    #[error("Handle already taken: {0}")]
    HandleTaken(String),

    #[error("Contact address already registered: {0}")]
    ContactTaken(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("API key not found: {0}")]
    KeyNotFound(String),

    // Authentication outcomes; the HTTP layer collapses these into a single
    // opaque response so callers cannot probe for valid handles or keys
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unknown or revoked API key")]
    UnknownOrRevokedKey,

    #[error("API key expired")]
    KeyExpired,

    #[error("Account is inactive")]
    AccountInactive,

    // Infrastructure errors
    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Unknown(err.to_string())
    }
}
