//! Leaderboard aggregation: ranked team standings and top performers.

use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::{AgentEntity, SystemSettingsEntity, TeamEntity, UserEntity},
    dto::leaderboard::{
        AgentStanding, LeaderboardSnapshot, TeamStanding, TopStatEntry, TopStats,
    },
    error::ServiceError,
    services::ws_events,
    state::SharedState,
};

/// Placeholder shown in the top-stats panel when no agents exist yet.
const EMPTY_TOP_STAT_NAME: &str = "No agents";

/// Compute the full snapshot from live data and write refreshed aggregates
/// back into the team cache fields (best effort).
pub async fn compute(state: &SharedState) -> Result<LeaderboardSnapshot, ServiceError> {
    let store = state.require_sales_store().await?;

    let teams = store.list_teams().await?;
    let agents = store.list_agents().await?;
    let users = store.list_users().await?;
    let settings = store.settings().await?;

    let (snapshot, refreshed) = compute_standings(teams, &agents, &users, &settings);

    // Cache refresh is cosmetic; a failed write must not block the broadcast.
    for team in refreshed {
        if let Err(err) = store.save_team(team).await {
            warn!(error = %err, "failed to write back team aggregates");
        }
    }

    Ok(snapshot)
}

/// Recompute and push `leaderboard:update`; failures are logged, never
/// propagated to the mutation that triggered the refresh.
pub async fn recompute_and_broadcast(state: &SharedState) {
    match compute(state).await {
        Ok(snapshot) => ws_events::broadcast_leaderboard(state, snapshot),
        Err(err) => warn!(error = %err, "leaderboard recomputation failed"),
    }
}

/// Pure ranking pass over already-loaded entities.
///
/// Returns the snapshot plus the teams whose cached aggregates went stale
/// and need a write-back. Sorting is stable throughout, so equal scores keep
/// their stored encounter order.
pub fn compute_standings(
    teams: Vec<TeamEntity>,
    agents: &[AgentEntity],
    users: &[UserEntity],
    settings: &SystemSettingsEntity,
) -> (LeaderboardSnapshot, Vec<TeamEntity>) {
    let users_by_id: HashMap<Uuid, &UserEntity> =
        users.iter().map(|user| (user.id, user)).collect();

    let visible: Vec<TeamEntity> = if settings.featured_team_ids.is_empty() {
        teams
    } else {
        teams
            .into_iter()
            .filter(|team| settings.featured_team_ids.contains(&team.id))
            .collect()
    };

    let mut refreshed = Vec::new();
    let mut standings: Vec<TeamStanding> = visible
        .into_iter()
        .map(|team| {
            let mut members: Vec<AgentStanding> = agents
                .iter()
                .filter(|agent| agent.team_id == Some(team.id))
                .cloned()
                .map(AgentStanding::from)
                .collect();
            members.sort_by(|a, b| b.activation_percent.cmp(&a.activation_percent));

            let total_activations: i64 = members.iter().map(|m| m.activations).sum();
            let total_submissions: i64 = members.iter().map(|m| m.submissions).sum();
            let total_points: i64 = members.iter().map(|m| m.points).sum();
            let avg_activation = if members.is_empty() {
                0
            } else {
                let sum: i64 = members.iter().map(|m| m.activation_percent).sum();
                (sum as f64 / members.len() as f64).round() as i64
            };

            let stale = team.avg_activation != avg_activation
                || team.total_activations != total_activations
                || team.total_submissions != total_submissions
                || team.total_points != total_points;
            if stale {
                refreshed.push(TeamEntity {
                    avg_activation,
                    total_activations,
                    total_submissions,
                    total_points,
                    ..team.clone()
                });
            }

            let tl = users_by_id.get(&team.tl_id);
            TeamStanding {
                team_id: team.id,
                name: team.name,
                rank: 0,
                tl_name: tl.map(|user| user.name.clone()),
                tl_avatar_url: tl.and_then(|user| user.avatar_url.clone()),
                avg_activation,
                total_activations,
                total_submissions,
                total_points,
                celebration_audio_url: team.celebration_audio_url,
                agents: members,
            }
        })
        .collect();

    standings.sort_by(|a, b| b.avg_activation.cmp(&a.avg_activation));
    for (index, standing) in standings.iter_mut().enumerate() {
        standing.rank = index + 1;
    }

    let snapshot = LeaderboardSnapshot {
        teams: standings,
        top_stats: top_stats(agents),
    };
    (snapshot, refreshed)
}

/// Best monthly activations, best of today's submissions, and the counter
/// totals across all agents, ignoring the featured filter. First-encountered
/// agent wins ties.
pub fn top_stats(agents: &[AgentEntity]) -> TopStats {
    let placeholder = || TopStatEntry {
        name: EMPTY_TOP_STAT_NAME.to_owned(),
        photo_url: String::new(),
        value: 0,
    };

    let mut top_agent_month: Option<TopStatEntry> = None;
    let mut top_agent_today: Option<TopStatEntry> = None;
    let mut total_activations = 0;
    let mut total_submissions = 0;
    let mut total_today_submissions = 0;

    for agent in agents {
        total_activations += agent.activations;
        total_submissions += agent.submissions;
        total_today_submissions += agent.today_submissions;

        if top_agent_month
            .as_ref()
            .is_none_or(|best| agent.activations > best.value)
        {
            top_agent_month = Some(TopStatEntry {
                name: agent.name.clone(),
                photo_url: agent.photo_url.clone(),
                value: agent.activations,
            });
        }
        if top_agent_today
            .as_ref()
            .is_none_or(|best| agent.today_submissions > best.value)
        {
            top_agent_today = Some(TopStatEntry {
                name: agent.name.clone(),
                photo_url: agent.photo_url.clone(),
                value: agent.today_submissions,
            });
        }
    }

    TopStats {
        top_agent_month: top_agent_month.unwrap_or_else(placeholder),
        top_agent_today: top_agent_today.unwrap_or_else(placeholder),
        total_activations,
        total_submissions,
        total_today_submissions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn agent(name: &str, team_id: Uuid, activations: i64, target: i64) -> AgentEntity {
        AgentEntity {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            photo_url: String::new(),
            team_id: Some(team_id),
            activation_target: target,
            activations,
            submissions: 0,
            today_submissions: 0,
            points: 0,
            last_submission_reset: SystemTime::UNIX_EPOCH,
            user_id: None,
            email: None,
        }
    }

    fn team(name: &str) -> TeamEntity {
        TeamEntity {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            tl_id: Uuid::new_v4(),
            agents: Vec::new(),
            avg_activation: 0,
            total_activations: 0,
            total_submissions: 0,
            total_points: 0,
            celebration_audio_url: None,
        }
    }

    fn settings(featured: Vec<Uuid>) -> SystemSettingsEntity {
        SystemSettingsEntity {
            id: Uuid::new_v4(),
            notification_sound_url: None,
            featured_team_ids: featured,
        }
    }

    #[test]
    fn teams_rank_by_rounded_average_activation() {
        let alpha = team("Alpha");
        let beta = team("Beta");
        let agents = vec![
            // Alpha: 50% and 75% -> mean 62.5 -> 63
            agent("a1", alpha.id, 5, 10),
            agent("a2", alpha.id, 3, 4),
            // Beta: 60% -> 60
            agent("b1", beta.id, 6, 10),
        ];

        let (snapshot, _) =
            compute_standings(vec![alpha, beta], &agents, &[], &settings(Vec::new()));
        assert_eq!(snapshot.teams[0].name, "Alpha");
        assert_eq!(snapshot.teams[0].avg_activation, 63);
        assert_eq!(snapshot.teams[0].rank, 1);
        assert_eq!(snapshot.teams[1].name, "Beta");
        assert_eq!(snapshot.teams[1].rank, 2);
    }

    #[test]
    fn ranking_is_idempotent_without_counter_changes() {
        let alpha = team("Alpha");
        let beta = team("Beta");
        let agents = vec![agent("a1", alpha.id, 5, 10), agent("b1", beta.id, 5, 10)];
        let teams = vec![alpha, beta];

        let (first, _) = compute_standings(teams.clone(), &agents, &[], &settings(Vec::new()));
        let (second, _) = compute_standings(teams, &agents, &[], &settings(Vec::new()));
        let order =
            |snapshot: &LeaderboardSnapshot| -> Vec<Uuid> {
                snapshot.teams.iter().map(|t| t.team_id).collect()
            };
        assert_eq!(order(&first), order(&second));
    }

    #[test]
    fn equal_teams_keep_stored_order() {
        let first = team("First");
        let second = team("Second");
        let agents = vec![agent("x", first.id, 5, 10), agent("y", second.id, 5, 10)];

        let (snapshot, _) = compute_standings(
            vec![first.clone(), second],
            &agents,
            &[],
            &settings(Vec::new()),
        );
        assert_eq!(snapshot.teams[0].team_id, first.id);
    }

    #[test]
    fn featured_filter_hides_other_teams_but_not_top_stats() {
        let shown = team("Shown");
        let hidden = team("Hidden");
        let agents = vec![
            agent("visible", shown.id, 1, 10),
            agent("invisible", hidden.id, 9, 10),
        ];

        let (snapshot, _) = compute_standings(
            vec![shown.clone(), hidden],
            &agents,
            &[],
            &settings(vec![shown.id]),
        );
        assert_eq!(snapshot.teams.len(), 1);
        assert_eq!(snapshot.teams[0].team_id, shown.id);
        // Top stats still scan every agent.
        assert_eq!(snapshot.top_stats.top_agent_month.name, "invisible");
    }

    #[test]
    fn stale_aggregates_are_queued_for_write_back() {
        let subject = team("Subject");
        let agents = vec![agent("a", subject.id, 5, 10)];

        let (_, refreshed) =
            compute_standings(vec![subject.clone()], &agents, &[], &settings(Vec::new()));
        assert_eq!(refreshed.len(), 1);
        assert_eq!(refreshed[0].id, subject.id);
        assert_eq!(refreshed[0].avg_activation, 50);
        assert_eq!(refreshed[0].total_activations, 5);

        // A second pass over the refreshed entity is a no-op.
        let (_, refreshed_again) =
            compute_standings(refreshed, &agents, &[], &settings(Vec::new()));
        assert!(refreshed_again.is_empty());
    }

    #[test]
    fn top_stats_first_encounter_wins_ties_and_empty_state_is_placeholder() {
        assert_eq!(top_stats(&[]).top_agent_month.name, "No agents");
        assert_eq!(top_stats(&[]).top_agent_today.value, 0);
        assert_eq!(top_stats(&[]).total_today_submissions, 0);

        let team_id = Uuid::new_v4();
        let mut first = agent("first", team_id, 7, 10);
        first.today_submissions = 3;
        let mut tied = agent("tied", team_id, 7, 10);
        tied.today_submissions = 3;

        let stats = top_stats(&[first, tied]);
        assert_eq!(stats.top_agent_month.name, "first");
        assert_eq!(stats.top_agent_today.name, "first");
        assert_eq!(stats.top_agent_month.value, 7);
    }

    #[test]
    fn top_agent_of_today_ranks_by_todays_submissions() {
        let team_id = Uuid::new_v4();
        let mut hot_today = agent("hot_today", team_id, 1, 10);
        hot_today.submissions = 1;
        hot_today.today_submissions = 5;
        hot_today.photo_url = "https://cdn.example.com/hot.png".into();
        let mut grinder = agent("monthly_grinder", team_id, 10, 10);
        grinder.submissions = 10;
        grinder.today_submissions = 0;

        // A big month must not win the today slot over a big day.
        let stats = top_stats(&[grinder, hot_today]);
        assert_eq!(stats.top_agent_today.name, "hot_today");
        assert_eq!(stats.top_agent_today.value, 5);
        assert_eq!(
            stats.top_agent_today.photo_url,
            "https://cdn.example.com/hot.png"
        );
        assert_eq!(stats.top_agent_month.name, "monthly_grinder");
        assert_eq!(stats.top_agent_month.value, 10);
    }

    #[test]
    fn top_stats_totals_sum_every_agent() {
        let team_id = Uuid::new_v4();
        let mut a = agent("a", team_id, 4, 10);
        a.submissions = 6;
        a.today_submissions = 2;
        let mut b = agent("b", team_id, 3, 10);
        b.submissions = 1;
        b.today_submissions = 5;

        let stats = top_stats(&[a, b]);
        assert_eq!(stats.total_activations, 7);
        assert_eq!(stats.total_submissions, 7);
        assert_eq!(stats.total_today_submissions, 7);
    }

    #[test]
    fn zero_target_means_zero_percent() {
        let team_id = Uuid::new_v4();
        let standing = AgentStanding::from(agent("z", team_id, 5, 0));
        assert_eq!(standing.activation_percent, 0);
    }
}
