//! Admin bearer-token extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use eventdeck_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Requires `Authorization: Bearer <ADMIN_TOKEN>`. Rejects with 401
/// otherwise, and always when no admin token is configured.
///
/// ```ignore
/// async fn admin_only(_admin: RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let expected = state.config.admin_token.as_deref().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Admin access is disabled".into()))
        })?;

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        if !tokens_match(token, expected) {
            tracing::warn!("Rejected admin request with wrong token");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid admin token".into(),
            )));
        }

        Ok(RequireAdmin)
    }
}

/// Compare without short-circuiting on the first differing byte.
fn tokens_match(given: &str, expected: &str) -> bool {
    given.len() == expected.len()
        && given
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match("s3cret", "s3cret"));
        assert!(!tokens_match("s3cret", "s3cres"));
        assert!(!tokens_match("s3cret", "s3cret-longer"));
        assert!(!tokens_match("", "s3cret"));
    }
}
