use chrono::{DateTime, Utc};

use crate::delivery::{DeliverySink, Embed};
use crate::feed::{Entry, FetchedFeed};
use crate::subscription::Subscription;
use crate::util::{parse_color_or_default, redacted_host};

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(String),
}

/// Updated subscription plus what happened to each entry that was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub subscription: Subscription,
    /// `(entry id, outcome)` in delivery order. Skipped entries are not listed.
    pub deliveries: Vec<(String, DeliveryOutcome)>,
}

impl Reconciled {
    pub fn delivered(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|(_, o)| *o == DeliveryOutcome::Delivered)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.deliveries.len() - self.delivered()
    }
}

/// Puts entries oldest first.
///
/// Feeds list entries newest first, so the list is reversed, then stably
/// sorted by publish time for feeds that are not strictly ordered. Entries
/// sharing a timestamp keep their reversed document order.
pub fn chronological(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.reverse();
    entries.sort_by_key(|e| e.published);
    entries
}

/// Delivers what is due from `feed` and returns the next checkpoint.
///
/// An entry is sent when it was published after `last_checked`, or when its
/// id is in the error backlog from an earlier run. Everything else has already
/// been delivered and is skipped. A failed delivery puts the id (back) into the
/// backlog; a failure never stops later entries. `last_checked` becomes `now`,
/// the time the run started, once every entry has been processed.
///
/// A subscription that is not due yet is returned unchanged.
pub async fn reconcile<S: DeliverySink>(
    subscription: &Subscription,
    feed: FetchedFeed,
    sink: &S,
    now: DateTime<Utc>,
) -> Reconciled {
    let mut updated = subscription.clone();
    let mut deliveries = Vec::new();

    if !subscription.is_due(now) {
        return Reconciled {
            subscription: updated,
            deliveries,
        };
    }

    let color = parse_color_or_default(&subscription.color);
    let hook = redacted_host(&subscription.destination);

    for entry in chronological(feed.entries) {
        // Judged against the working backlog, so a repeated id sees what its
        // earlier occurrence left behind.
        let was_errored = updated.error_backlog.remove(&entry.id);

        let is_new = entry.published > subscription.last_checked;
        if !is_new && !was_errored {
            tracing::debug!(source = %subscription.source, entry = %entry.id, "Skipping entry");
            continue;
        }

        let embed = Embed::for_entry(&entry, &feed.title, color);
        let outcome = match sink.deliver(&subscription.destination, &embed).await {
            Ok(response) if response.is_accepted() => DeliveryOutcome::Delivered,
            Ok(response) => DeliveryOutcome::Failed(format!("webhook responded {}", response)),
            Err(e) => DeliveryOutcome::Failed(e.to_string()),
        };

        match &outcome {
            DeliveryOutcome::Delivered => {
                tracing::info!(
                    source = %subscription.source,
                    entry = %entry.id,
                    retry = was_errored,
                    "Sent webhook"
                );
            }
            DeliveryOutcome::Failed(reason) => {
                tracing::warn!(
                    source = %subscription.source,
                    hook = %hook,
                    entry = %entry.id,
                    error = %reason,
                    "Webhook delivery failed, will retry next run"
                );
                updated.error_backlog.insert(entry.id.clone());
            }
        }
        deliveries.push((entry.id, outcome));
    }

    updated.last_checked = now;

    Reconciled {
        subscription: updated,
        deliveries,
    }
}
