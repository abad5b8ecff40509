use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AuthError;
use crate::account::ports::CredentialStore;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::ContactAddress;
use crate::domain::account::models::Handle;
use crate::domain::account::models::IssuedKey;
use crate::domain::account::models::KeyId;

/// In-memory credential store.
///
/// Backs the integration test suite and local development. Uniqueness checks
/// and the matching insert happen under one lock acquisition, mirroring the
/// constraint-level atomicity of the database adapter.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<Uuid, Account>,
    keys: HashMap<Uuid, IssuedKey>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, AuthError> {
        self.inner
            .lock()
            .map_err(|_| AuthError::StoreUnavailable("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn insert_account(&self, account: Account) -> Result<Account, AuthError> {
        let mut inner = self.lock()?;

        if inner.accounts.values().any(|a| a.handle == account.handle) {
            return Err(AuthError::HandleTaken(account.handle.as_str().to_string()));
        }
        if inner
            .accounts
            .values()
            .any(|a| a.contact_address == account.contact_address)
        {
            return Err(AuthError::ContactTaken(
                account.contact_address.as_str().to_string(),
            ));
        }

        inner.accounts.insert(account.id.0, account.clone());
        Ok(account)
    }

    async fn find_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, AuthError> {
        let inner = self.lock()?;
        Ok(inner.accounts.get(&id.0).cloned())
    }

    async fn find_account_by_handle(
        &self,
        handle: &Handle,
    ) -> Result<Option<Account>, AuthError> {
        let inner = self.lock()?;
        Ok(inner
            .accounts
            .values()
            .find(|a| &a.handle == handle)
            .cloned())
    }

    async fn find_account_by_contact(
        &self,
        address: &ContactAddress,
    ) -> Result<Option<Account>, AuthError> {
        let inner = self.lock()?;
        Ok(inner
            .accounts
            .values()
            .find(|a| &a.contact_address == address)
            .cloned())
    }

    async fn insert_key(&self, key: IssuedKey) -> Result<IssuedKey, AuthError> {
        let mut inner = self.lock()?;
        inner.keys.insert(key.id.0, key.clone());
        Ok(key)
    }

    async fn find_active_key_by_lookup_hash(
        &self,
        lookup_hash: &str,
    ) -> Result<Option<IssuedKey>, AuthError> {
        let inner = self.lock()?;
        Ok(inner
            .keys
            .values()
            .find(|k| k.is_active && k.lookup_hash == lookup_hash)
            .cloned())
    }

    async fn list_keys_by_owner(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<IssuedKey>, AuthError> {
        let inner = self.lock()?;
        let mut keys: Vec<IssuedKey> = inner
            .keys
            .values()
            .filter(|k| k.account_id == *account_id)
            .cloned()
            .collect();
        keys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(keys)
    }

    async fn update_key_last_used(
        &self,
        key_id: &KeyId,
        used_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let mut inner = self.lock()?;
        if let Some(key) = inner.keys.get_mut(&key_id.0) {
            key.last_used_at = Some(used_at);
        }
        Ok(())
    }

    async fn revoke_key(&self, key_id: &KeyId, account_id: &AccountId) -> Result<(), AuthError> {
        let mut inner = self.lock()?;
        match inner.keys.get_mut(&key_id.0) {
            Some(key) if key.account_id == *account_id => {
                key.is_active = false;
                Ok(())
            }
            _ => Err(AuthError::KeyNotFound(key_id.to_string())),
        }
    }
}
