use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::ContactError;
use crate::account::errors::HandleError;
use crate::domain::account::models::Account;
use crate::domain::account::models::ContactAddress;
use crate::domain::account::models::Handle;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

const MIN_PASSWORD_BYTES: usize = 8;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::CREATED, account.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    handle: String,
    contact_address: String,
    password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("handle", &self.handle)
            .field("contact_address", &self.contact_address)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid handle: {0}")]
    Handle(#[from] HandleError),

    #[error("Invalid contact address: {0}")]
    Contact(#[from] ContactError),

    #[error("Password too short: minimum {min} bytes")]
    PasswordTooShort { min: usize },
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let handle = Handle::new(self.handle)?;
        let contact_address = ContactAddress::new(self.contact_address)?;
        if self.password.len() < MIN_PASSWORD_BYTES {
            return Err(ParseRegisterRequestError::PasswordTooShort {
                min: MIN_PASSWORD_BYTES,
            });
        }
        Ok(RegisterCommand::new(handle, contact_address, self.password))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub id: String,
    pub handle: String,
    pub contact_address: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for RegisterResponseData {
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
