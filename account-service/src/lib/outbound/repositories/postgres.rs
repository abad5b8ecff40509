use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::errors::AuthError;
use crate::account::ports::CredentialStore;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::ContactAddress;
use crate::domain::account::models::Handle;
use crate::domain::account::models::IssuedKey;
use crate::domain::account::models::KeyId;
use crate::domain::account::models::KeyLabel;

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    handle: String,
    contact_address: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct KeyRow {
    id: Uuid,
    account_id: Uuid,
    label: String,
    lookup_hash: String,
    display_prefix: String,
    last_used_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn insert_account(&self, account: Account) -> Result<Account, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, handle, contact_address, password_hash, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id.0)
        .bind(account.handle.as_str())
        .bind(account.contact_address.as_str())
        .bind(&account.password_hash)
        .bind(account.is_active)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Uniqueness lives in the schema; map the violated constraint
            // back to the domain error
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("accounts_handle_key") {
                        return AuthError::HandleTaken(account.handle.as_str().to_string());
                    }
                    if db_err.constraint() == Some("accounts_contact_address_key") {
                        return AuthError::ContactTaken(
                            account.contact_address.as_str().to_string(),
                        );
                    }
                }
            }
            AuthError::StoreUnavailable(e.to_string())
        })?;

        Ok(account)
    }

    async fn find_account_by_id(&self, id: &AccountId) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, handle, contact_address, password_hash, is_active, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Account {
                id: AccountId(r.id),
                handle: Handle::new(r.handle)?,
                contact_address: ContactAddress::new(r.contact_address)?,
                password_hash: r.password_hash,
                is_active: r.is_active,
                created_at: r.created_at,
                updated_at: r.updated_at,
            })),
            None => Ok(None),
        }
    }

    async fn find_account_by_handle(
        &self,
        handle: &Handle,
    ) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, handle, contact_address, password_hash, is_active, created_at, updated_at
            FROM accounts
            WHERE handle = $1
            "#,
        )
        .bind(handle.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Account {
                id: AccountId(r.id),
                handle: Handle::new(r.handle)?,
                contact_address: ContactAddress::new(r.contact_address)?,
                password_hash: r.password_hash,
                is_active: r.is_active,
                created_at: r.created_at,
                updated_at: r.updated_at,
            })),
            None => Ok(None),
        }
    }

    async fn find_account_by_contact(
        &self,
        address: &ContactAddress,
    ) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, handle, contact_address, password_hash, is_active, created_at, updated_at
            FROM accounts
            WHERE contact_address = $1
            "#,
        )
        .bind(address.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Account {
                id: AccountId(r.id),
                handle: Handle::new(r.handle)?,
                contact_address: ContactAddress::new(r.contact_address)?,
                password_hash: r.password_hash,
                is_active: r.is_active,
                created_at: r.created_at,
                updated_at: r.updated_at,
            })),
            None => Ok(None),
        }
    }

    async fn insert_key(&self, key: IssuedKey) -> Result<IssuedKey, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO issued_keys (id, account_id, label, lookup_hash, display_prefix,
                                     last_used_at, expires_at, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(key.id.0)
        .bind(key.account_id.0)
        .bind(key.label.as_str())
        .bind(&key.lookup_hash)
        .bind(&key.display_prefix)
        .bind(key.last_used_at)
        .bind(key.expires_at)
        .bind(key.is_active)
        .bind(key.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        Ok(key)
    }

    async fn find_active_key_by_lookup_hash(
        &self,
        lookup_hash: &str,
    ) -> Result<Option<IssuedKey>, AuthError> {
        let row = sqlx::query_as::<_, KeyRow>(
            r#"
            SELECT id, account_id, label, lookup_hash, display_prefix,
                   last_used_at, expires_at, is_active, created_at
            FROM issued_keys
            WHERE lookup_hash = $1 AND is_active = TRUE
            "#,
        )
        .bind(lookup_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(IssuedKey {
                id: KeyId(r.id),
                account_id: AccountId(r.account_id),
                label: KeyLabel::new(r.label)?,
                lookup_hash: r.lookup_hash,
                display_prefix: r.display_prefix,
                last_used_at: r.last_used_at,
                expires_at: r.expires_at,
                is_active: r.is_active,
                created_at: r.created_at,
            })),
            None => Ok(None),
        }
    }

    async fn list_keys_by_owner(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<IssuedKey>, AuthError> {
        let rows = sqlx::query_as::<_, KeyRow>(
            r#"
            SELECT id, account_id, label, lookup_hash, display_prefix,
                   last_used_at, expires_at, is_active, created_at
            FROM issued_keys
            WHERE account_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(account_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        rows.into_iter()
            .map(|r| {
                Ok(IssuedKey {
                    id: KeyId(r.id),
                    account_id: AccountId(r.account_id),
                    label: KeyLabel::new(r.label)?,
                    lookup_hash: r.lookup_hash,
                    display_prefix: r.display_prefix,
                    last_used_at: r.last_used_at,
                    expires_at: r.expires_at,
                    is_active: r.is_active,
                    created_at: r.created_at,
                })
            })
            .collect()
    }

    async fn update_key_last_used(
        &self,
        key_id: &KeyId,
        used_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        // Best effort by contract: a missing row is not an error here
        sqlx::query(
            r#"
            UPDATE issued_keys
            SET last_used_at = $2
            WHERE id = $1
            "#,
        )
        .bind(key_id.0)
        .bind(used_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        Ok(())
    }

    async fn revoke_key(&self, key_id: &KeyId, account_id: &AccountId) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE issued_keys
            SET is_active = FALSE
            WHERE id = $1 AND account_id = $2
            "#,
        )
        .bind(key_id.0)
        .bind(account_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        // Ownership is part of the WHERE clause: another account's key looks
        // exactly like a missing one
        if result.rows_affected() == 0 {
            return Err(AuthError::KeyNotFound(key_id.to_string()));
        }

        Ok(())
    }
}
