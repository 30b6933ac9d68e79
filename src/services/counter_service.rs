//! Counter mutations: the write path behind `tl:updateCounters` and its REST
//! mirror.

use std::time::SystemTime;

use tracing::info;

use crate::{
    dao::{
        models::{AgentEntity, Role, UserEntity},
        sales_store::SalesStore,
    },
    dto::{
        format_system_time,
        leaderboard::CelebrationEvent,
        tl::IncrementResponse,
        ws::CounterMutation,
    },
    error::ServiceError,
    services::{leaderboard_service, ws_events},
    state::SharedState,
};

/// Apply a clamped counter delta on behalf of `actor`.
///
/// Enforces the per-actor mutation budget, delta validation and team
/// ownership before touching storage. Returns the updated agent together
/// with the celebration event when the delta included a positive submission
/// count.
pub async fn apply_delta(
    state: &SharedState,
    actor: &UserEntity,
    mutation: CounterMutation,
) -> Result<(AgentEntity, Option<CelebrationEvent>), ServiceError> {
    if !state.rate_limiter().check(actor.id) {
        return Err(ServiceError::RateLimited);
    }
    crate::dto::validation::validate_delta(&mutation.delta)
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let store = state.require_sales_store().await?;
    let agent = store
        .find_agent(mutation.agent_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("agent `{}` not found", mutation.agent_id)))?;
    authorize_agent_mutation(store.as_ref(), actor, &agent).await?;

    let updated = store
        .apply_agent_delta(mutation.agent_id, mutation.delta.clone())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("agent `{}` not found", mutation.agent_id)))?;

    let celebration = if mutation.delta.submissions.is_some_and(|d| d > 0) {
        let audio = match updated.team_id {
            Some(team_id) => store
                .find_team(team_id)
                .await?
                .and_then(|team| team.celebration_audio_url),
            None => None,
        };
        Some(CelebrationEvent {
            agent_id: updated.id,
            agent_name: updated.name.clone(),
            photo_url: updated.photo_url.clone(),
            team_id: updated.team_id,
            new_activation_count: updated.today_submissions,
            timestamp: format_system_time(SystemTime::now()),
            celebration_audio_url: audio,
        })
    } else {
        None
    };

    info!(
        actor = %actor.id,
        agent = %updated.id,
        celebration = celebration.is_some(),
        "counter delta applied"
    );
    Ok((updated, celebration))
}

/// [`apply_delta`] followed by the fan-out: the refreshed leaderboard goes
/// out first so the celebration overlay lands on up-to-date numbers.
pub async fn apply_delta_and_broadcast(
    state: &SharedState,
    actor: &UserEntity,
    mutation: CounterMutation,
) -> Result<IncrementResponse, ServiceError> {
    let (agent, celebration) = apply_delta(state, actor, mutation).await?;

    leaderboard_service::recompute_and_broadcast(state).await;
    if let Some(event) = celebration.clone() {
        ws_events::broadcast_celebration(state, event);
    }

    Ok(IncrementResponse {
        agent: agent.into(),
        celebration,
    })
}

/// Replace an agent's activation goal, then refresh the board.
pub async fn set_target(
    state: &SharedState,
    actor: &UserEntity,
    agent_id: uuid::Uuid,
    activation_target: i64,
) -> Result<AgentEntity, ServiceError> {
    let store = state.require_sales_store().await?;
    let mut agent = store
        .find_agent(agent_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("agent `{agent_id}` not found")))?;
    authorize_agent_mutation(store.as_ref(), actor, &agent).await?;

    agent.activation_target = activation_target;
    store.save_agent(agent.clone()).await?;

    leaderboard_service::recompute_and_broadcast(state).await;
    Ok(agent)
}

/// Admins may touch any agent; a TL only agents on their own team.
async fn authorize_agent_mutation(
    store: &dyn SalesStore,
    actor: &UserEntity,
    agent: &AgentEntity,
) -> Result<(), ServiceError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Tl => {
            let team = store.find_team_by_tl(actor.id).await?;
            match (team, agent.team_id) {
                (Some(team), Some(agent_team)) if team.id == agent_team => Ok(()),
                _ => Err(ServiceError::Forbidden(
                    "agent does not belong to your team".into(),
                )),
            }
        }
        Role::Employee => Err(ServiceError::Forbidden(
            "employees cannot mutate counters".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            models::{AgentDelta, TeamEntity},
            sales_store::memory::MemorySalesStore,
        },
        state::AppState,
    };
    use std::sync::Arc;
    use uuid::Uuid;

    async fn state_with_store() -> (SharedState, MemorySalesStore) {
        let state = AppState::new(AppConfig::default());
        let store = MemorySalesStore::new();
        state.install_sales_store(Arc::new(store.clone())).await;
        (state, store)
    }

    fn user(role: Role) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            name: "actor".into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: String::new(),
            role,
            team_id: None,
            avatar_url: None,
            contact_number: None,
            job_role: None,
        }
    }

    fn team_for(tl_id: Uuid) -> TeamEntity {
        TeamEntity {
            id: Uuid::new_v4(),
            name: "Team".into(),
            tl_id,
            agents: Vec::new(),
            avg_activation: 0,
            total_activations: 0,
            total_submissions: 0,
            total_points: 0,
            celebration_audio_url: Some("https://cdn.example.com/horn.mp3".into()),
        }
    }

    fn agent_on(team_id: Uuid) -> AgentEntity {
        AgentEntity {
            id: Uuid::new_v4(),
            name: "Sam".into(),
            photo_url: "https://cdn.example.com/sam.png".into(),
            team_id: Some(team_id),
            activation_target: 10,
            activations: 8,
            submissions: 3,
            today_submissions: 1,
            points: 0,
            last_submission_reset: SystemTime::UNIX_EPOCH,
            user_id: None,
            email: None,
        }
    }

    fn mutation(agent_id: Uuid, delta: AgentDelta) -> CounterMutation {
        CounterMutation { agent_id, delta }
    }

    #[tokio::test]
    async fn positive_submission_delta_updates_both_counters_and_celebrates() {
        let (state, store) = state_with_store().await;
        let admin = user(Role::Admin);
        let team = team_for(Uuid::new_v4());
        let agent = agent_on(team.id);
        store.save_team(team).await.unwrap();
        store.save_agent(agent.clone()).await.unwrap();

        let delta = AgentDelta {
            submissions: Some(2),
            activations: None,
            points: None,
        };
        let (updated, celebration) = apply_delta(&state, &admin, mutation(agent.id, delta))
            .await
            .unwrap();

        assert_eq!(updated.submissions, 5);
        assert_eq!(updated.today_submissions, 3);
        let event = celebration.unwrap();
        assert_eq!(event.new_activation_count, 3);
        assert_eq!(event.agent_id, agent.id);
        assert_eq!(
            event.celebration_audio_url.as_deref(),
            Some("https://cdn.example.com/horn.mp3")
        );
    }

    #[tokio::test]
    async fn non_submission_deltas_do_not_celebrate() {
        let (state, store) = state_with_store().await;
        let admin = user(Role::Admin);
        let agent = agent_on(Uuid::new_v4());
        store.save_agent(agent.clone()).await.unwrap();

        let delta = AgentDelta {
            submissions: None,
            activations: Some(1),
            points: Some(5),
        };
        let (updated, celebration) = apply_delta(&state, &admin, mutation(agent.id, delta))
            .await
            .unwrap();
        assert_eq!(updated.activations, 9);
        assert!(celebration.is_none());

        let negative = AgentDelta {
            submissions: Some(-1),
            activations: None,
            points: None,
        };
        let (_, celebration) = apply_delta(&state, &admin, mutation(agent.id, negative))
            .await
            .unwrap();
        assert!(celebration.is_none());
    }

    #[tokio::test]
    async fn tl_can_only_touch_their_own_team() {
        let (state, store) = state_with_store().await;
        let tl = user(Role::Tl);
        let own_team = team_for(tl.id);
        let other_team = team_for(Uuid::new_v4());
        let own_agent = agent_on(own_team.id);
        let other_agent = agent_on(other_team.id);
        store.save_team(own_team).await.unwrap();
        store.save_team(other_team).await.unwrap();
        store.save_agent(own_agent.clone()).await.unwrap();
        store.save_agent(other_agent.clone()).await.unwrap();

        let delta = AgentDelta {
            submissions: None,
            activations: Some(1),
            points: None,
        };
        assert!(
            apply_delta(&state, &tl, mutation(own_agent.id, delta.clone()))
                .await
                .is_ok()
        );
        let denied = apply_delta(&state, &tl, mutation(other_agent.id, delta)).await;
        assert!(matches!(denied, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn employees_are_rejected() {
        let (state, store) = state_with_store().await;
        let employee = user(Role::Employee);
        let agent = agent_on(Uuid::new_v4());
        store.save_agent(agent.clone()).await.unwrap();

        let delta = AgentDelta {
            submissions: Some(1),
            activations: None,
            points: None,
        };
        let denied = apply_delta(&state, &employee, mutation(agent.id, delta)).await;
        assert!(matches!(denied, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn empty_delta_is_invalid_input() {
        let (state, store) = state_with_store().await;
        let admin = user(Role::Admin);
        let agent = agent_on(Uuid::new_v4());
        store.save_agent(agent.clone()).await.unwrap();

        let empty = AgentDelta {
            submissions: None,
            activations: None,
            points: None,
        };
        let rejected = apply_delta(&state, &admin, mutation(agent.id, empty)).await;
        assert!(matches!(rejected, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn unknown_agent_is_not_found() {
        let (state, _store) = state_with_store().await;
        let admin = user(Role::Admin);

        let delta = AgentDelta {
            submissions: Some(1),
            activations: None,
            points: None,
        };
        let missing = apply_delta(&state, &admin, mutation(Uuid::new_v4(), delta)).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn eleventh_mutation_in_a_second_is_rate_limited() {
        let (state, store) = state_with_store().await;
        let admin = user(Role::Admin);
        let agent = agent_on(Uuid::new_v4());
        store.save_agent(agent.clone()).await.unwrap();

        let delta = AgentDelta {
            submissions: None,
            activations: Some(1),
            points: None,
        };
        for _ in 0..10 {
            apply_delta(&state, &admin, mutation(agent.id, delta.clone()))
                .await
                .unwrap();
        }
        let throttled = apply_delta(&state, &admin, mutation(agent.id, delta)).await;
        assert!(matches!(throttled, Err(ServiceError::RateLimited)));
    }

    #[tokio::test]
    async fn set_target_replaces_the_goal() {
        let (state, store) = state_with_store().await;
        let admin = user(Role::Admin);
        let agent = agent_on(Uuid::new_v4());
        store.save_agent(agent.clone()).await.unwrap();

        let updated = set_target(&state, &admin, agent.id, 25).await.unwrap();
        assert_eq!(updated.activation_target, 25);
        let stored = store.find_agent(agent.id).await.unwrap().unwrap();
        assert_eq!(stored.activation_target, 25);
    }
}
