use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::time;
use tracing::{error, info, warn};

use crate::{
    configuration::{AppState, State},
    dao::SnapshotLoad,
    error::Error,
    handler::{
        delivery::send_in_chunks,
        report::format_report,
        spikes::{detect_spikes, filter_snapshot},
    },
    model::Snapshot,
};

/// One full check: fetch feed, diff against the prior snapshot, deliver the
/// report, rotate the snapshot.
///
/// Rotation is unconditional once the fetch succeeded: a failed delivery is
/// logged and surfaced to the caller, but today's feed still becomes the new
/// baseline. Losing a day of history is worse than a missed message.
pub async fn run_tvl_check(state: &State) -> Result<(), Error> {
    info!("running TVL check");

    let today = time::timeout(
        Duration::from_secs(state.config.timeout),
        state.feed.fetch_protocols(),
    )
    .await
    .map_err(|_| Error::FeedFetchError(String::from("feed fetch timed out")))??;

    let prior = load_prior(state).await;

    let spikes = detect_spikes(&today, &prior);
    info!(
        "{} protocols in feed, {} spikes over threshold",
        today.len(),
        spikes.len()
    );

    let report = format_report(&spikes, Utc::now(), state.config.check_hour);
    let delivery = send_in_chunks(
        state.transport.as_ref(),
        &report,
        state.config.max_chunk_len,
    )
    .await;

    if let Err(e) = &delivery {
        error!("report delivery failed: {}", e);
    }

    let snapshot = filter_snapshot(&today);
    state.store.save(&snapshot).await?;
    info!("rotated snapshot with {} entries", snapshot.len());

    delivery
}

async fn load_prior(state: &State) -> Snapshot {
    match state.store.load().await {
        Ok(SnapshotLoad::Found(snapshot)) => snapshot,
        Ok(SnapshotLoad::NotFound) => {
            info!("no prior snapshot, starting from an empty baseline");
            Snapshot::new()
        },
        Err(e) => {
            warn!("prior snapshot load failed, treating as empty: {}", e);
            Snapshot::new()
        },
    }
}

/// Daily check loop, first tick aligned to the configured UTC hour. A failed
/// run is logged and the loop keeps going.
pub async fn tvl_check_task(app_state: AppState<State>) -> Result<(), Error> {
    let delay = seconds_until_check(Utc::now(), app_state.config.check_hour);
    info!("next TVL check in {} seconds", delay);

    tokio::spawn(async move {
        time::sleep(Duration::from_secs(delay)).await;

        let mut interval =
            time::interval(Duration::from_secs(24 * 60 * 60));
        loop {
            interval.tick().await;
            if let Err(error) = run_tvl_check(&app_state).await {
                error!("Task error {}", error);
            };
        }
    })
    .await?
}

fn seconds_until_check(now: DateTime<Utc>, check_hour: u32) -> u64 {
    let today = now.date_naive();
    let mut next = today
        .and_hms_opt(check_hour, 0, 0)
        .unwrap_or_else(|| today.and_hms_opt(0, 0, 0).unwrap_or_default())
        .and_utc();

    if next <= now {
        next += ChronoDuration::days(1);
    }

    (next - now).num_seconds().max(0) as u64
}
