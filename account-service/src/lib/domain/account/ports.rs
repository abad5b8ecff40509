use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AuthError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::ContactAddress;
use crate::domain::account::models::Handle;
use crate::domain::account::models::IssueKeyCommand;
use crate::domain::account::models::IssuedCredential;
use crate::domain::account::models::IssuedKey;
use crate::domain::account::models::KeyId;
use crate::domain::account::models::RegisterCommand;

/// Port for credential domain service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account with validated credentials.
    ///
    /// The password is hashed before anything is persisted; the plaintext is
    /// never stored. Uniqueness of handle and contact address is enforced
    /// atomically by the store, not by a prior lookup.
    ///
    /// # Arguments
    /// * `command` - Validated command containing handle, contact address, and password
    ///
    /// # Returns
    /// Created account entity
    ///
    /// # Errors
    /// * `HandleTaken` - Handle is already taken
    /// * `ContactTaken` - Contact address is already registered
    /// * `Password` - Password was rejected or hashing failed
    /// * `StoreUnavailable` - Credential store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Account, AuthError>;

    /// Authenticate with handle and password, issuing a fresh API key.
    ///
    /// Unknown handle, inactive account, and wrong password are deliberately
    /// indistinguishable in the result.
    ///
    /// # Arguments
    /// * `handle` - Account handle
    /// * `password` - Plaintext password to verify
    ///
    /// # Returns
    /// The account and a freshly issued credential carrying the one-time
    /// plaintext key
    ///
    /// # Errors
    /// * `InvalidCredentials` - Handle unknown, account inactive, or password wrong
    /// * `StoreUnavailable` - Credential store operation failed
    async fn login(
        &self,
        handle: &Handle,
        password: &str,
    ) -> Result<(Account, IssuedCredential), AuthError>;

    /// Resolve a presented API key to its owning account.
    ///
    /// Malformed candidates are rejected without touching the store. On
    /// success the key's last-used timestamp is updated in the background;
    /// that update never delays or fails the validation itself.
    ///
    /// # Arguments
    /// * `presented_key` - Plaintext key as presented by the caller
    ///
    /// # Returns
    /// The account owning the key
    ///
    /// # Errors
    /// * `MalformedKey` - Candidate does not have the shape of an issued key
    /// * `UnknownOrRevokedKey` - No active key matches
    /// * `KeyExpired` - Key matched but its expiry has passed
    /// * `AccountInactive` - Owning account is deactivated
    /// * `AccountNotFound` - Key matched but its owner is gone
    /// * `StoreUnavailable` - Credential store operation failed
    async fn validate_key(&self, presented_key: &str) -> Result<Account, AuthError>;

    /// Issue a new API key for an account.
    ///
    /// # Arguments
    /// * `account_id` - Owning account ID
    /// * `command` - Validated command with label and optional expiry
    ///
    /// # Returns
    /// Freshly issued credential; the plaintext key inside is shown exactly
    /// once and cannot be retrieved again
    ///
    /// # Errors
    /// * `AccountNotFound` - Account does not exist
    /// * `StoreUnavailable` - Credential store operation failed
    async fn issue_key(
        &self,
        account_id: &AccountId,
        command: IssueKeyCommand,
    ) -> Result<IssuedCredential, AuthError>;

    /// List all keys owned by an account, newest first.
    ///
    /// Returned entities carry metadata only; plaintext secrets are gone and
    /// lookup hashes never leave the service layer.
    ///
    /// # Arguments
    /// * `account_id` - Owning account ID
    ///
    /// # Returns
    /// Vector of issued keys, active and revoked
    ///
    /// # Errors
    /// * `StoreUnavailable` - Credential store operation failed
    async fn list_keys(&self, account_id: &AccountId) -> Result<Vec<IssuedKey>, AuthError>;

    /// Revoke a key owned by an account.
    ///
    /// Revocation is permanent and idempotent: revoking an already revoked
    /// key succeeds. A key belonging to another account is reported as not
    /// found, never as forbidden.
    ///
    /// # Arguments
    /// * `account_id` - Requesting account ID
    /// * `key_id` - Key to revoke
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `KeyNotFound` - Key does not exist or belongs to another account
    /// * `StoreUnavailable` - Credential store operation failed
    async fn revoke_key(&self, account_id: &AccountId, key_id: &KeyId) -> Result<(), AuthError>;
}

/// Persistence operations for accounts and issued keys.
///
/// The service consumes this interface; it never sees SQL or locks. Adapters
/// must enforce handle and contact-address uniqueness atomically at insert.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Arguments
    /// * `account` - Account entity to create
    ///
    /// # Returns
    /// Created account entity
    ///
    /// # Errors
    /// * `HandleTaken` - Handle is already taken
    /// * `ContactTaken` - Contact address is already registered
    /// * `StoreUnavailable` - Store operation failed
    async fn insert_account(&self, account: Account) -> Result<Account, AuthError>;

    /// Retrieve an account by identifier.
    ///
    /// # Arguments
    /// * `id` - Account ID
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, AuthError>;

    /// Retrieve an account by handle.
    ///
    /// # Arguments
    /// * `handle` - Handle to search for
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_account_by_handle(&self, handle: &Handle)
        -> Result<Option<Account>, AuthError>;

    /// Retrieve an account by contact address.
    ///
    /// # Arguments
    /// * `address` - Contact address to search for
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_account_by_contact(
        &self,
        address: &ContactAddress,
    ) -> Result<Option<Account>, AuthError>;

    /// Persist a new issued key.
    ///
    /// # Arguments
    /// * `key` - Key entity to create (lookup hash and metadata, no secret)
    ///
    /// # Returns
    /// Created key entity
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn insert_key(&self, key: IssuedKey) -> Result<IssuedKey, AuthError>;

    /// Retrieve the active key matching a lookup hash.
    ///
    /// Revoked keys are filtered here; expiry is the service's concern.
    ///
    /// # Arguments
    /// * `lookup_hash` - Deterministic digest of the presented key
    ///
    /// # Returns
    /// Optional key entity (None if no active key matches)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_active_key_by_lookup_hash(
        &self,
        lookup_hash: &str,
    ) -> Result<Option<IssuedKey>, AuthError>;

    /// Retrieve all keys owned by an account, newest first.
    ///
    /// # Arguments
    /// * `account_id` - Owning account ID
    ///
    /// # Returns
    /// Vector of issued keys, active and revoked
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn list_keys_by_owner(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<IssuedKey>, AuthError>;

    /// Record when a key was last used for authentication.
    ///
    /// # Arguments
    /// * `key_id` - Key to update
    /// * `used_at` - Timestamp of the authenticated request
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn update_key_last_used(
        &self,
        key_id: &KeyId,
        used_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;

    /// Mark a key revoked, scoped to its owner.
    ///
    /// # Arguments
    /// * `key_id` - Key to revoke
    /// * `account_id` - Requesting account ID, used as an ownership filter
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `KeyNotFound` - Key does not exist or belongs to another account
    /// * `StoreUnavailable` - Store operation failed
    async fn revoke_key(&self, key_id: &KeyId, account_id: &AccountId) -> Result<(), AuthError>;
}
