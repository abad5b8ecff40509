use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use thiserror::Error;

use crate::account::errors::AuthError;
use crate::domain::account::models::Account;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiResponseBody;
use crate::inbound::http::router::AppState;

/// Extension type carrying the authenticated account through request handling
#[derive(Debug, Clone)]
pub struct Principal {
    pub account: Account,
}

/// Why a request was rejected. Diagnostics only: every variant produces the
/// same HTTP response, so callers cannot tell a missing header from a revoked
/// key or probe for valid key material.
#[derive(Debug, Error)]
enum CredentialRejection {
    #[error("missing Authorization header")]
    MissingCredential,

    #[error("Authorization header is not of the form 'Bearer <key>'")]
    MalformedCredential,

    #[error("{0}")]
    Rejected(AuthError),
}

/// Middleware that validates bearer API keys and attaches the Principal to
/// request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let account = match authorize(&state, req.headers()).await {
        Ok(account) => account,
        Err(rejection) => {
            tracing::warn!(reason = %rejection, "Rejected request credential");
            return Err(unauthorized());
        }
    };

    req.extensions_mut().insert(Principal { account });

    Ok(next.run(req).await)
}

// Takes the headers rather than the whole request so the future stays `Send`:
// the request body is not `Sync`, and this borrow lives across the await.
async fn authorize(
    state: &AppState,
    headers: &http::HeaderMap,
) -> Result<Account, CredentialRejection> {
    let presented_key = extract_bearer_key(headers)?;

    state
        .auth_service
        .validate_key(presented_key)
        .await
        .map_err(CredentialRejection::Rejected)
}

fn extract_bearer_key(headers: &http::HeaderMap) -> Result<&str, CredentialRejection> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .ok_or(CredentialRejection::MissingCredential)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| CredentialRejection::MalformedCredential)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(key) => Ok(key),
        None => Err(CredentialRejection::MalformedCredential),
    }
}

/// The one response every rejected request receives, byte-identical across
/// all rejection reasons.
fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponseBody::new_error(
            StatusCode::UNAUTHORIZED,
            "Invalid credentials".to_string(),
        )),
    )
        .into_response()
}
