use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::db::user_repo;

pub const TOKEN_COOKIE: &str = "globe_token";

/// Resolves the caller from a bearer token or the `globe_token` cookie and
/// stores the `User` in request extensions.
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = extract_token(request.headers()).ok_or_else(ApiError::unauthorized)?;
    let user = state
        .with_conn(move |conn| user_repo::find_by_token(conn, &token))
        .await?
        .ok_or_else(|| {
            tracing::debug!("rejected unknown api token");
            ApiError::unauthorized()
        })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
