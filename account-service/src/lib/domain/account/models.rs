use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AccountIdError;
use crate::account::errors::ContactError;
use crate::account::errors::HandleError;
use crate::account::errors::KeyIdError;
use crate::account::errors::KeyLabelError;

/// Account aggregate entity.
///
/// Represents a registered tenant account
#[derive(Clone)]
pub struct Account {
    pub id: AccountId,
    pub handle: Handle,
    pub contact_address: ContactAddress,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for Account {
    // password_hash must never end up in logs, so Debug redacts it
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("handle", &self.handle)
            .field("contact_address", &self.contact_address)
            .field("password_hash", &"<redacted>")
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    ///
    /// # Returns
    /// AccountId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Arguments
    /// * `s` - UUID string to parse
    ///
    /// # Returns
    /// Parsed AccountId
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Issued key unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId(pub Uuid);

impl KeyId {
    /// Generate a new random key ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a key ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, KeyIdError> {
        Uuid::parse_str(s)
            .map(KeyId)
            .map_err(|e| KeyIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Handle value type
///
/// Ensures the account handle is 3-50 characters and contains only
/// alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle(String);

impl Handle {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 50;

    /// Create a new valid handle.
    ///
    /// Validates length and character constraints.
    ///
    /// # Arguments
    /// * `handle` - Raw handle string
    ///
    /// # Returns
    /// Validated Handle value object
    ///
    /// # Errors
    /// * `TooShort` - Handle shorter than 3 characters
    /// * `TooLong` - Handle longer than 50 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(handle: String) -> Result<Self, HandleError> {
        let handle = Self::with_valid_length(handle)?;
        let handle = Self::with_valid_chars(handle)?;
        Ok(Self(handle))
    }

    fn with_valid_length(handle: String) -> Result<String, HandleError> {
        let length = handle.len();
        if length < Self::MIN_LENGTH {
            Err(HandleError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(HandleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(handle)
        }
    }

    fn with_valid_chars(handle: String) -> Result<String, HandleError> {
        if handle
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(handle)
        } else {
            Err(HandleError::InvalidCharacters)
        }
    }

    /// Get handle as string slice.
    ///
    /// # Returns
    /// Handle string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Contact address type
///
/// Validates the address using an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactAddress(String);

impl ContactAddress {
    /// Create a new validated contact address.
    ///
    /// # Arguments
    /// * `address` - Raw address string
    ///
    /// # Returns
    /// Validated ContactAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Address does not conform to RFC 5322
    pub fn new(address: String) -> Result<Self, ContactError> {
        email_address::EmailAddress::from_str(&address)
            .map(|_| ContactAddress(address))
            .map_err(|e| ContactError::InvalidFormat(e.to_string()))
    }

    /// Get address as string slice.
    ///
    /// # Returns
    /// Address string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Key label value type
///
/// Human-readable display label attached to an issued key, 1-100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLabel(String);

impl KeyLabel {
    const MAX_LENGTH: usize = 100;

    /// Create a new valid key label.
    ///
    /// # Errors
    /// * `Empty` - Label is empty or whitespace only
    /// * `TooLong` - Label longer than 100 characters
    pub fn new(label: String) -> Result<Self, KeyLabelError> {
        if label.trim().is_empty() {
            return Err(KeyLabelError::Empty);
        }
        if label.len() > Self::MAX_LENGTH {
            return Err(KeyLabelError::TooLong {
                max: Self::MAX_LENGTH,
                actual: label.len(),
            });
        }
        Ok(Self(label))
    }

    /// Get label as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Issued API key entity.
///
/// Holds everything the service retains about a key. The plaintext secret is
/// not here: it is returned once at issuance and only its lookup hash is kept.
#[derive(Clone)]
pub struct IssuedKey {
    pub id: KeyId,
    pub account_id: AccountId,
    pub label: KeyLabel,
    pub lookup_hash: String,
    pub display_prefix: String,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl IssuedKey {
    /// Whether the key's expiry, if any, has passed.
    ///
    /// Expiry is evaluated at validation time; expired keys keep their
    /// stored state untouched.
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            Utc::now() > expires_at
        } else {
            false
        }
    }
}

impl fmt::Debug for IssuedKey {
    // lookup_hash stays out of logs: it is derived from the secret
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedKey")
            .field("id", &self.id)
            .field("account_id", &self.account_id)
            .field("label", &self.label)
            .field("lookup_hash", &"<redacted>")
            .field("display_prefix", &self.display_prefix)
            .field("last_used_at", &self.last_used_at)
            .field("expires_at", &self.expires_at)
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Command to register a new account with domain types
pub struct RegisterCommand {
    pub handle: Handle,
    pub contact_address: ContactAddress,
    pub password: String,
}

impl fmt::Debug for RegisterCommand {
    // The command carries the plaintext password on its way to the hasher
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("handle", &self.handle)
            .field("contact_address", &self.contact_address)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `handle` - Validated handle
    /// * `contact_address` - Validated contact address
    /// * `password` - Plain text password (will be hashed by service)
    ///
    /// # Returns
    /// RegisterCommand with validated fields
    pub fn new(handle: Handle, contact_address: ContactAddress, password: String) -> Self {
        Self {
            handle,
            contact_address,
            password,
        }
    }
}

/// Command to issue a new API key for an account
#[derive(Debug)]
pub struct IssueKeyCommand {
    pub label: KeyLabel,
    pub expires_at: Option<DateTime<Utc>>,
}

impl IssueKeyCommand {
    pub fn new(label: KeyLabel, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { label, expires_at }
    }
}

/// A freshly issued key paired with its plaintext secret.
///
/// The secret exists only in this value, on its way back to the caller.
#[derive(Clone)]
pub struct IssuedCredential {
    pub key: IssuedKey,
    pub plain_key: String,
}

impl fmt::Debug for IssuedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedCredential")
            .field("key", &self.key)
            .field("plain_key", &"<redacted>")
            .finish()
    }
}
