use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::delivery::DeliverySink;
use crate::feed::FeedFetcher;
use crate::subscription::Subscription;
use crate::sync::reconcile::{reconcile, Reconciled};

/// Counters for one run, logged once it finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Subscriptions whose interval had elapsed.
    pub due: usize,
    /// Subscriptions skipped because their interval had not elapsed.
    pub not_due: usize,
    /// Due subscriptions whose feed could not be fetched.
    pub fetch_failures: usize,
    pub delivered: usize,
    pub failed_deliveries: usize,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Every subscription, in input order, with updated checkpoints.
    pub subscriptions: Vec<Subscription>,
    pub stats: RunStats,
}

enum SyncResult {
    NotDue,
    FetchFailed,
    Reconciled(Reconciled),
}

/// Checks every due subscription and returns the updated list.
///
/// All subscriptions are processed concurrently and the function returns only
/// once every one of them has finished. Each task works on its own copy and
/// hands it back; the list is then rebuilt by index, so subscriptions that were
/// not due or whose fetch failed come back exactly as they went in. Nothing
/// here is fatal: failures are logged and reflected in the checkpoints.
pub async fn run<F, S>(
    subscriptions: &[Subscription],
    fetcher: &F,
    sink: &S,
    now: DateTime<Utc>,
) -> RunReport
where
    F: FeedFetcher,
    S: DeliverySink,
{
    let tasks = subscriptions
        .iter()
        .map(|subscription| sync_one(subscription, fetcher, sink, now));
    let results = join_all(tasks).await;

    let mut stats = RunStats::default();
    let updated = subscriptions
        .iter()
        .zip(results)
        .map(|(original, result)| match result {
            SyncResult::NotDue => {
                stats.not_due += 1;
                original.clone()
            }
            SyncResult::FetchFailed => {
                stats.due += 1;
                stats.fetch_failures += 1;
                original.clone()
            }
            SyncResult::Reconciled(reconciled) => {
                stats.due += 1;
                stats.delivered += reconciled.delivered();
                stats.failed_deliveries += reconciled.failed();
                reconciled.subscription
            }
        })
        .collect();

    tracing::info!(
        subscriptions = subscriptions.len(),
        due = stats.due,
        fetch_failures = stats.fetch_failures,
        delivered = stats.delivered,
        failed_deliveries = stats.failed_deliveries,
        "Run complete"
    );

    RunReport {
        subscriptions: updated,
        stats,
    }
}

async fn sync_one<F, S>(
    subscription: &Subscription,
    fetcher: &F,
    sink: &S,
    now: DateTime<Utc>,
) -> SyncResult
where
    F: FeedFetcher,
    S: DeliverySink,
{
    if !subscription.is_due(now) {
        tracing::debug!(
            source = %subscription.source,
            next_check = ?subscription.next_check(),
            "Not due yet"
        );
        return SyncResult::NotDue;
    }

    let feed = match fetcher.fetch(&subscription.source).await {
        Ok(feed) => feed,
        Err(e) => {
            tracing::warn!(
                source = %subscription.source,
                error = %e,
                "Error fetching feed, will retry next run"
            );
            return SyncResult::FetchFailed;
        }
    };

    SyncResult::Reconciled(reconcile(subscription, feed, sink, now).await)
}
