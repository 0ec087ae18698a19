//! Periodic sync job: directory groups onto the gateway, plus the API key
//! expiration sweep.
//!
//! One tokio task, one `tokio::time::interval`, cancelled through a
//! [`CancellationToken`] on shutdown. Each run is spawned off the loop so
//! ticks keep firing; an `AtomicBool` guard skips a tick that fires while
//! the previous run is still in flight, so runs never overlap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use apimgr_gateway::types::{Consumer, ConsumerGroup};

use crate::directory::DirectoryProvider;
use crate::keys;
use crate::state::AppState;

/// Run the periodic sync loop until the token is cancelled.
pub async fn run(
    state: AppState,
    directory: Arc<dyn DirectoryProvider>,
    cancel: CancellationToken,
) {
    let period = Duration::from_secs(state.config.sync_interval_secs);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval fires immediately; consume it so
    // startup is not treated as a sync run.
    ticker.tick().await;

    let in_flight = Arc::new(AtomicBool::new(false));
    tracing::info!(period_secs = period.as_secs(), "Background sync job started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Background sync job stopping");
                break;
            }
            _ = ticker.tick() => {
                if in_flight.swap(true, Ordering::SeqCst) {
                    tracing::warn!("Previous sync run still in flight, skipping this tick");
                    continue;
                }
                let state = state.clone();
                let directory = Arc::clone(&directory);
                let in_flight = Arc::clone(&in_flight);
                tokio::spawn(async move {
                    run_once(&state, directory.as_ref()).await;
                    in_flight.store(false, Ordering::SeqCst);
                });
            }
        }
    }
}

/// One sync run. The two sub-tasks are independent; only the group sync
/// outcome drives the reported status.
pub async fn run_once(state: &AppState, directory: &dyn DirectoryProvider) {
    state.sync_status.mark_syncing().await;

    let groups_ok = match sync_directory_groups(state, directory).await {
        Ok(count) => {
            tracing::info!(groups = count, "Directory group sync finished");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Directory group sync failed");
            false
        }
    };

    if let Err(e) = keys::check_and_rotate(state).await {
        tracing::error!(error = %e, "API key expiration sweep failed");
    }

    state.sync_status.mark_finished(groups_ok).await;
}

/// Mirror every directory group onto the gateway as a consumer group and
/// attach its members as consumers. Existing consumers keep their plugins;
/// only the group membership is updated.
async fn sync_directory_groups(
    state: &AppState,
    directory: &dyn DirectoryProvider,
) -> anyhow::Result<usize> {
    let groups = directory.list_groups().await?;

    for group in &groups {
        let group_id = group.name.to_lowercase();
        state
            .gateway
            .put_consumer_group(
                &group_id,
                &ConsumerGroup {
                    id: Some(group_id.clone()),
                    desc: Some(format!("Directory group {}", group.name)),
                    plugins: None,
                },
            )
            .await?;

        for member in &group.members {
            let mut consumer = state
                .gateway
                .get_consumer(member)
                .await?
                .unwrap_or_else(|| Consumer {
                    username: member.clone(),
                    ..Default::default()
                });
            consumer.group_id = Some(group_id.clone());
            state.gateway.put_consumer(member, &consumer).await?;
        }
    }

    Ok(groups.len())
}
