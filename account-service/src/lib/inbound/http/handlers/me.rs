use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::Account;
use crate::inbound::http::middleware::Principal;

/// Return the account resolved by the authentication middleware.
pub async fn me(
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        (&principal.account).into(),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub id: String,
    pub handle: String,
    pub contact_address: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for MeResponseData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            handle: account.handle.as_str().to_string(),
            contact_address: account.contact_address.as_str().to_string(),
            is_active: account.is_active,
            created_at: account.created_at,
        }
    }
}
