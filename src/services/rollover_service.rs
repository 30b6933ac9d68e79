//! Daily and monthly counter rollovers, driven at local midnight.

use std::time::{Duration, SystemTime};

use time::{OffsetDateTime, UtcOffset};
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    dao::{models::AgentHistoryEntity, sales_store::SalesStore},
    error::ServiceError,
    services::leaderboard_service,
    state::SharedState,
};

/// Wall-clock fallback when the local offset cannot be determined.
fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Background loop: one pass at startup to catch up after downtime, then one
/// pass at every local midnight. A pass that lands inside a storage outage
/// waits for the degraded flag to clear rather than skipping the day.
pub async fn run(state: SharedState) {
    info!("rollover scheduler started");

    let mut storage_ready = state.degraded_watcher();
    loop {
        if storage_ready.wait_for(|degraded| !*degraded).await.is_err() {
            return;
        }
        run_pass(&state).await;

        let now = OffsetDateTime::now_utc().to_offset(local_offset());
        sleep(until_next_midnight(now)).await;
    }
}

async fn run_pass(state: &SharedState) {
    let Some(store) = state.sales_store().await else {
        warn!("storage unavailable; rollover pass skipped");
        return;
    };

    let now = OffsetDateTime::now_utc().to_offset(local_offset());
    match rollover_pass(store.as_ref(), now).await {
        Ok(0) => {}
        Ok(changed) => {
            info!(changed, "rollover pass applied");
            leaderboard_service::recompute_and_broadcast(state).await;
        }
        Err(err) => error!(error = %err, "rollover pass failed"),
    }
}

/// Apply pending rollovers to every agent whose last reset predates `now`'s
/// calendar date. Returns the number of agents changed.
///
/// A date change within the same month resets `today_submissions`. A month
/// change additionally archives the month's figures and zeroes the monthly
/// counters; `points` and the activation target are kept.
pub async fn rollover_pass(
    store: &dyn SalesStore,
    now: OffsetDateTime,
) -> Result<usize, ServiceError> {
    let agents = store.list_agents().await?;
    let mut changed = 0;

    for mut agent in agents {
        let last = OffsetDateTime::from(agent.last_submission_reset).to_offset(now.offset());
        if last.date() >= now.date() {
            continue;
        }

        let month_turned = (last.year(), last.month()) != (now.year(), now.month());
        if month_turned {
            let entry = AgentHistoryEntity {
                id: Uuid::new_v4(),
                agent_id: agent.id,
                month: last.month().to_string(),
                year: last.year(),
                activations: agent.activations,
                submissions: agent.submissions,
                points: agent.points,
                created_at: SystemTime::now(),
            };
            if let Err(err) = store.save_history(entry).await {
                // Skip the reset too, so the figures are archived on the
                // next pass instead of being lost.
                warn!(agent = %agent.id, error = %err, "history archive failed; agent skipped");
                continue;
            }
            agent.activations = 0;
            agent.submissions = 0;
        }
        agent.today_submissions = 0;
        agent.last_submission_reset = now.into();

        match store.save_agent(agent.clone()).await {
            Ok(()) => changed += 1,
            Err(err) => warn!(agent = %agent.id, error = %err, "rollover save failed"),
        }
    }

    Ok(changed)
}

/// Time remaining until the next local midnight after `now`.
fn until_next_midnight(now: OffsetDateTime) -> Duration {
    let next = now
        .date()
        .next_day()
        .map(|day| day.midnight().assume_offset(now.offset()))
        .unwrap_or_else(|| now + time::Duration::days(1));
    let remaining = next - now;
    Duration::from_secs(remaining.whole_seconds().max(1) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::{models::AgentEntity, sales_store::memory::MemorySalesStore};
    use time::macros::datetime;

    fn agent_reset_at(reset: OffsetDateTime) -> AgentEntity {
        AgentEntity {
            id: Uuid::new_v4(),
            name: "Sam".into(),
            photo_url: String::new(),
            team_id: None,
            activation_target: 20,
            activations: 7,
            submissions: 12,
            today_submissions: 4,
            points: 30,
            last_submission_reset: reset.into(),
            user_id: None,
            email: None,
        }
    }

    #[tokio::test]
    async fn same_day_pass_changes_nothing() {
        let store = MemorySalesStore::new();
        let now = datetime!(2026-03-10 09:00 UTC);
        let agent = agent_reset_at(datetime!(2026-03-10 00:00 UTC));
        store.save_agent(agent.clone()).await.unwrap();

        assert_eq!(rollover_pass(&store, now).await.unwrap(), 0);
        let stored = store.find_agent(agent.id).await.unwrap().unwrap();
        assert_eq!(stored.today_submissions, 4);
    }

    #[tokio::test]
    async fn day_change_resets_only_today_submissions() {
        let store = MemorySalesStore::new();
        let now = datetime!(2026-03-11 00:05 UTC);
        let agent = agent_reset_at(datetime!(2026-03-10 00:00 UTC));
        store.save_agent(agent.clone()).await.unwrap();

        assert_eq!(rollover_pass(&store, now).await.unwrap(), 1);
        let stored = store.find_agent(agent.id).await.unwrap().unwrap();
        assert_eq!(stored.today_submissions, 0);
        assert_eq!(stored.submissions, 12);
        assert_eq!(stored.activations, 7);
        assert_eq!(stored.points, 30);
        assert!(store.list_history_by_agent(agent.id).await.unwrap().is_empty());

        // Re-running on the same day is a no-op.
        assert_eq!(rollover_pass(&store, now).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn month_change_archives_and_zeroes_monthly_counters() {
        let store = MemorySalesStore::new();
        let now = datetime!(2026-04-01 00:05 UTC);
        let agent = agent_reset_at(datetime!(2026-03-31 00:00 UTC));
        store.save_agent(agent.clone()).await.unwrap();

        assert_eq!(rollover_pass(&store, now).await.unwrap(), 1);

        let stored = store.find_agent(agent.id).await.unwrap().unwrap();
        assert_eq!(stored.activations, 0);
        assert_eq!(stored.submissions, 0);
        assert_eq!(stored.today_submissions, 0);
        // Points and the goal survive the month turn.
        assert_eq!(stored.points, 30);
        assert_eq!(stored.activation_target, 20);

        let history = store.list_history_by_agent(agent.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].month, "March");
        assert_eq!(history[0].year, 2026);
        assert_eq!(history[0].activations, 7);
        assert_eq!(history[0].submissions, 12);
        assert_eq!(history[0].points, 30);
    }

    #[tokio::test]
    async fn catch_up_after_long_downtime_archives_the_old_month_once() {
        let store = MemorySalesStore::new();
        let agent = agent_reset_at(datetime!(2026-01-15 00:00 UTC));
        store.save_agent(agent.clone()).await.unwrap();

        let now = datetime!(2026-03-02 08:00 UTC);
        assert_eq!(rollover_pass(&store, now).await.unwrap(), 1);
        assert_eq!(rollover_pass(&store, now).await.unwrap(), 0);

        let history = store.list_history_by_agent(agent.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].month, "January");
        assert_eq!(history[0].year, 2026);
    }

    #[test]
    fn midnight_distance_is_positive_and_at_most_a_day() {
        let now = datetime!(2026-03-10 23:59:30 UTC);
        let remaining = until_next_midnight(now);
        assert_eq!(remaining, Duration::from_secs(30));

        let start_of_day = datetime!(2026-03-10 00:00 UTC);
        assert_eq!(
            until_next_midnight(start_of_day),
            Duration::from_secs(24 * 60 * 60)
        );
    }
}
