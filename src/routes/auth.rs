use axum::{
    Extension, Json, Router,
    extract::State,
    middleware,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dao::models::UserEntity,
    dto::auth::{LoginRequest, LoginResponse, RegisterEmployeeRequest, UserView},
    error::AppError,
    services::auth_service,
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
/// Exchange email and password for a bearer token.
pub async fn login(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(auth_service::login(&state, payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/auth/register/employee",
    tag = "auth",
    request_body = RegisterEmployeeRequest,
    responses(
        (status = 200, description = "Account created", body = LoginResponse),
        (status = 404, description = "Team not found"),
        (status = 409, description = "Email already registered"),
    )
)]
/// Self-register an employee account on an existing team.
pub async fn register_employee(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<RegisterEmployeeRequest>>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(auth_service::register_employee(&state, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "The authenticated user", body = UserView),
        (status = 401, description = "Missing or invalid token"),
    )
)]
/// The account behind the presented bearer token.
pub async fn me(Extension(user): Extension<UserEntity>) -> Json<UserView> {
    Json(user.into())
}

/// Configure the authentication routes subtree.
pub fn router(state: SharedState) -> Router<SharedState> {
    let protected = Router::new()
        .route("/auth/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, super::require_user));

    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register/employee", post(register_employee))
        .merge(protected)
}
