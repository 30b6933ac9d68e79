use axum::{
    Extension, Router,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::{dao::models::UserEntity, error::AppError, services::auth_service, state::SharedState};

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod docs;
pub mod employee;
pub mod health;
pub mod leaves;
pub mod stats;
pub mod tl;
pub mod websocket;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api = Router::new()
        .merge(auth::router(state.clone()))
        .merge(stats::router())
        .merge(tl::router(state.clone()))
        .merge(admin::router(state.clone()))
        .merge(bookings::router(state.clone()))
        .merge(leaves::router(state.clone()))
        .merge(employee::router(state.clone()));

    let root = health::router()
        .merge(websocket::router())
        .nest("/api", api);

    let docs_router = docs::router(state.clone());
    root.merge(docs_router).with_state(state)
}

/// Middleware resolving the `Authorization: Bearer` header into the stored
/// user and stashing it in the request extensions.
pub(crate) async fn require_user(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let user = auth_service::authenticate(&state, token).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Middleware rejecting non-admin callers. Must run after [`require_user`].
pub(crate) async fn require_admin(
    Extension(user): Extension<UserEntity>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    auth_service::require_admin(&user)?;
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_extraction_requires_the_scheme_prefix() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "token123".parse().unwrap());
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Bearer token123".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "token123");
    }
}
