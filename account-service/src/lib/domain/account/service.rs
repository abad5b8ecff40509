use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AuthError;
use crate::account::ports::AuthServicePort;
use crate::account::ports::CredentialStore;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::Handle;
use crate::domain::account::models::IssueKeyCommand;
use crate::domain::account::models::IssuedCredential;
use crate::domain::account::models::IssuedKey;
use crate::domain::account::models::KeyId;
use crate::domain::account::models::KeyLabel;
use crate::domain::account::models::RegisterCommand;

/// Domain service implementation for credential operations.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    password_hasher: auth::PasswordHasher,
    key_generator: auth::KeyGenerator,
}

impl<S> AuthService<S>
where
    S: CredentialStore,
{
    /// Create a new credential service with an injected store.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    ///
    /// # Returns
    /// Configured credential service instance
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            password_hasher: auth::PasswordHasher::new(),
            key_generator: auth::KeyGenerator::new(),
        }
    }

    /// Generate fresh key material and persist its stored half.
    ///
    /// The plaintext secret only travels back to the caller inside the
    /// returned credential; the store sees the lookup hash and display
    /// prefix.
    async fn mint_key(
        &self,
        account_id: AccountId,
        label: KeyLabel,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<IssuedCredential, AuthError> {
        let material = self.key_generator.generate();

        let key = IssuedKey {
            id: KeyId::new(),
            account_id,
            label,
            lookup_hash: material.lookup_hash,
            display_prefix: material.display_prefix,
            last_used_at: None,
            expires_at,
            is_active: true,
            created_at: Utc::now(),
        };

        let stored_key = self.store.insert_key(key).await?;

        Ok(IssuedCredential {
            key: stored_key,
            plain_key: material.secret,
        })
    }
}

#[async_trait]
impl<S> AuthServicePort for AuthService<S>
where
    S: CredentialStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<Account, AuthError> {
        // Hash password using auth library; the plaintext goes no further
        let password_hash = self.password_hasher.hash(&command.password)?;

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            handle: command.handle,
            contact_address: command.contact_address,
            password_hash,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        // Uniqueness is the store's job: a single insert either succeeds or
        // reports which constraint was violated
        self.store.insert_account(account).await
    }

    async fn login(
        &self,
        handle: &Handle,
        password: &str,
    ) -> Result<(Account, IssuedCredential), AuthError> {
        // Unknown handle, inactive account, and wrong password all collapse
        // into InvalidCredentials
        let account = match self.store.find_account_by_handle(handle).await? {
            Some(account) => account,
            None => return Err(AuthError::InvalidCredentials),
        };

        if !account.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        let password_matches = self
            .password_hasher
            .verify(password, &account.password_hash)?;
        if !password_matches {
            return Err(AuthError::InvalidCredentials);
        }

        let label = KeyLabel::new(format!(
            "Login {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S")
        ))?;
        let credential = self.mint_key(account.id, label, None).await?;

        Ok((account, credential))
    }

    async fn validate_key(&self, presented_key: &str) -> Result<Account, AuthError> {
        // Shape check first: junk input never reaches the store
        if !self.key_generator.validate_format(presented_key) {
            return Err(AuthError::MalformedKey);
        }

        let lookup_hash = self.key_generator.lookup_hash(presented_key);

        let key = match self
            .store
            .find_active_key_by_lookup_hash(&lookup_hash)
            .await?
        {
            Some(key) => key,
            None => return Err(AuthError::UnknownOrRevokedKey),
        };

        // Expiry is evaluated here, not in the store; an expired key keeps
        // its stored state untouched
        if key.is_expired() {
            return Err(AuthError::KeyExpired);
        }

        let account = match self.store.find_account_by_id(&key.account_id).await? {
            Some(account) => account,
            None => return Err(AuthError::AccountNotFound(key.account_id.to_string())),
        };

        if !account.is_active {
            return Err(AuthError::AccountInactive);
        }

        // Record usage out of band: an authenticated request never waits on
        // or fails because of this bookkeeping write
        let store = Arc::clone(&self.store);
        let key_id = key.id;
        tokio::spawn(async move {
            if let Err(e) = store.update_key_last_used(&key_id, Utc::now()).await {
                tracing::debug!("Failed to record usage for key {}: {}", key_id, e);
            }
        });

        Ok(account)
    }

    async fn issue_key(
        &self,
        account_id: &AccountId,
        command: IssueKeyCommand,
    ) -> Result<IssuedCredential, AuthError> {
        let account = match self.store.find_account_by_id(account_id).await? {
            Some(account) => account,
            None => return Err(AuthError::AccountNotFound(account_id.to_string())),
        };

        self.mint_key(account.id, command.label, command.expires_at)
            .await
    }

    async fn list_keys(&self, account_id: &AccountId) -> Result<Vec<IssuedKey>, AuthError> {
        self.store.list_keys_by_owner(account_id).await
    }

    async fn revoke_key(&self, account_id: &AccountId, key_id: &KeyId) -> Result<(), AuthError> {
        self.store.revoke_key(key_id, account_id).await
    }
}
