use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::account::models::KeyId;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::Principal;
use crate::inbound::http::router::AppState;

/// Revoke one of the authenticated account's keys.
///
/// Revoking an already revoked key succeeds; a key owned by a different
/// account comes back as 404, indistinguishable from one that never existed.
pub async fn revoke_key(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(key_id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let key_id = KeyId::from_string(&key_id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid key ID: {}", e)))?;

    state
        .auth_service
        .revoke_key(&principal.account.id, &key_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
