//! Token issuing/verification, login and account creation.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dao::models::{AgentEntity, Role, TeamEntity, UserEntity},
    dto::auth::{CreateTlRequest, LoginRequest, LoginResponse, RegisterEmployeeRequest, UserView},
    error::ServiceError,
    services::{leaderboard_service, team_service::DEFAULT_ACTIVATION_TARGET},
    state::SharedState,
};

/// Token lifetime.
const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    exp: i64,
}

/// Sign a bearer token for `user_id`, valid for 24 hours.
pub fn issue_token(state: &SharedState, user_id: Uuid) -> Result<String, ServiceError> {
    let claims = Claims {
        sub: user_id,
        exp: OffsetDateTime::now_utc().unix_timestamp() + TOKEN_TTL_SECONDS,
    };
    let key = EncodingKey::from_secret(state.config().jwt_secret().as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|err| ServiceError::InvalidInput(format!("failed to sign token: {err}")))
}

/// Verify a bearer token and extract the user id it was issued for.
///
/// Returns `None` for malformed, forged or expired tokens.
pub fn verify_token(state: &SharedState, token: &str) -> Option<Uuid> {
    let key = DecodingKey::from_secret(state.config().jwt_secret().as_bytes());
    match decode::<Claims>(token, &key, &Validation::default()) {
        Ok(data) => Some(data.claims.sub),
        Err(err) => {
            debug!(error = %err, "token verification failed");
            None
        }
    }
}

/// Resolve a token into the stored user it belongs to.
pub async fn authenticate(state: &SharedState, token: &str) -> Result<UserEntity, ServiceError> {
    let user_id = verify_token(state, token)
        .ok_or_else(|| ServiceError::Unauthenticated("invalid or expired token".into()))?;

    let store = state.require_sales_store().await?;
    store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ServiceError::Unauthenticated("token subject no longer exists".into()))
}

/// Fail unless `user` is an admin.
pub fn require_admin(user: &UserEntity) -> Result<(), ServiceError> {
    if user.role == Role::Admin {
        Ok(())
    } else {
        Err(ServiceError::Forbidden("admin role required".into()))
    }
}

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ServiceError::InvalidInput(format!("failed to hash password: {err}")))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Check credentials and issue a token.
pub async fn login(
    state: &SharedState,
    request: LoginRequest,
) -> Result<LoginResponse, ServiceError> {
    let store = state.require_sales_store().await?;
    let user = store
        .find_user_by_email(request.email.to_lowercase())
        .await?
        .filter(|user| verify_password(&request.password, &user.password_hash))
        .ok_or_else(|| ServiceError::Unauthenticated("invalid credentials".into()))?;

    let token = issue_token(state, user.id)?;
    info!(user = %user.id, "user logged in");
    Ok(LoginResponse {
        token,
        user: user.into(),
    })
}

/// Self-registration: create an employee account on an existing team and
/// create (or link) its agent record.
pub async fn register_employee(
    state: &SharedState,
    request: RegisterEmployeeRequest,
) -> Result<LoginResponse, ServiceError> {
    let store = state.require_sales_store().await?;
    let email = request.email.to_lowercase();

    if store.find_user_by_email(email.clone()).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "an account already exists for `{email}`"
        )));
    }
    let mut team = store
        .find_team(request.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{}` not found", request.team_id)))?;

    let user = UserEntity {
        id: Uuid::new_v4(),
        name: request.name.clone(),
        email: email.clone(),
        password_hash: hash_password(&request.password)?,
        role: Role::Employee,
        team_id: Some(team.id),
        avatar_url: request.photo_url.clone(),
        contact_number: None,
        job_role: None,
    };
    store.save_user(user.clone()).await?;

    // Link an agent that a TL pre-created with this email, otherwise create
    // a fresh one on the team roster.
    let existing = store
        .list_agents_by_team(team.id)
        .await?
        .into_iter()
        .find(|agent| agent.email.as_deref() == Some(email.as_str()));
    match existing {
        Some(mut agent) => {
            agent.user_id = Some(user.id);
            store.save_agent(agent).await?;
        }
        None => {
            let agent = AgentEntity {
                id: Uuid::new_v4(),
                name: request.name,
                photo_url: request.photo_url.unwrap_or_default(),
                team_id: Some(team.id),
                activation_target: DEFAULT_ACTIVATION_TARGET,
                activations: 0,
                submissions: 0,
                today_submissions: 0,
                points: 0,
                last_submission_reset: std::time::SystemTime::now(),
                user_id: Some(user.id),
                email: Some(email),
            };
            team.agents.push(agent.id);
            store.save_agent(agent).await?;
            store.save_team(team).await?;
        }
    }

    leaderboard_service::recompute_and_broadcast(state).await;

    let token = issue_token(state, user.id)?;
    info!(user = %user.id, "employee registered");
    Ok(LoginResponse {
        token,
        user: user.into(),
    })
}

/// Admin operation: create a team-leader account together with its team.
pub async fn create_tl(
    state: &SharedState,
    request: CreateTlRequest,
) -> Result<UserView, ServiceError> {
    let store = state.require_sales_store().await?;
    let email = request.email.to_lowercase();

    if store.find_user_by_email(email.clone()).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "an account already exists for `{email}`"
        )));
    }

    let tl_id = Uuid::new_v4();
    let team = TeamEntity {
        id: Uuid::new_v4(),
        name: request.team_name,
        tl_id,
        agents: Vec::new(),
        avg_activation: 0,
        total_activations: 0,
        total_submissions: 0,
        total_points: 0,
        celebration_audio_url: None,
    };
    let user = UserEntity {
        id: tl_id,
        name: request.name,
        email,
        password_hash: hash_password(&request.password)?,
        role: Role::Tl,
        team_id: Some(team.id),
        avatar_url: None,
        contact_number: None,
        job_role: None,
    };

    store.save_team(team.clone()).await?;
    store.save_user(user.clone()).await?;
    info!(user = %user.id, team = %team.id, "team leader created");
    Ok(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, dao::sales_store::memory::MemorySalesStore, state::AppState};
    use std::sync::Arc;

    #[tokio::test]
    async fn token_round_trip_returns_the_same_user_id() {
        let state = AppState::new(AppConfig::default());
        let user_id = Uuid::new_v4();

        let token = issue_token(&state, user_id).unwrap();
        assert_eq!(verify_token(&state, &token), Some(user_id));
    }

    #[tokio::test]
    async fn garbage_tokens_do_not_verify() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(verify_token(&state, "not-a-token"), None);
        assert_eq!(verify_token(&state, ""), None);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let state = AppState::new(AppConfig::default());
        let store = MemorySalesStore::new();
        state.install_sales_store(Arc::new(store.clone())).await;

        let user = UserEntity {
            id: Uuid::new_v4(),
            name: "Dana".into(),
            email: "dana@example.com".into(),
            password_hash: hash_password("correct horse").unwrap(),
            role: Role::Tl,
            team_id: None,
            avatar_url: None,
            contact_number: None,
            job_role: None,
        };
        use crate::dao::sales_store::SalesStore;
        store.save_user(user).await.unwrap();

        let ok = login(
            &state,
            LoginRequest {
                email: "Dana@Example.com".into(),
                password: "correct horse".into(),
            },
        )
        .await;
        assert!(ok.is_ok());

        let bad = login(
            &state,
            LoginRequest {
                email: "dana@example.com".into(),
                password: "wrong".into(),
            },
        )
        .await;
        assert!(matches!(bad, Err(ServiceError::Unauthenticated(_))));
    }
}
