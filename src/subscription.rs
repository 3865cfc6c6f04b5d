//! Per-feed subscription record and its checkpoint bookkeeping.
use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::util::redacted_host;

/// One configured feed-to-webhook binding.
///
/// `source`, `destination`, `color` and `interval` come from the user and are
/// never changed by a run. `last_checked` and `error_backlog` are the checkpoint
/// and are only rewritten by [`crate::sync::reconcile`].
///
/// Legacy key names (`target`, `webhook_url`, `last_accessed`, `errors`) are
/// accepted on load; saves always write the current names.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Feed URL.
    #[serde(alias = "target")]
    pub source: String,

    /// Webhook URL. Carries a token, so it is redacted in `Debug` output.
    #[serde(alias = "webhook_url")]
    pub destination: String,

    /// Embed color as a hex string (`"#ff8800"`).
    #[serde(default)]
    pub color: String,

    /// Minutes between checks.
    pub interval: u64,

    /// Start time of the last run that processed this subscription.
    #[serde(default = "never_checked", alias = "last_accessed")]
    pub last_checked: DateTime<Utc>,

    /// Entry ids whose delivery failed and must be retried when seen again.
    #[serde(default, alias = "errors")]
    pub error_backlog: BTreeSet<String>,
}

fn never_checked() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl Subscription {
    /// Creates a subscription that has never been checked.
    pub fn new(source: impl Into<String>, destination: impl Into<String>, interval: u64) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            color: String::new(),
            interval,
            last_checked: never_checked(),
            error_backlog: BTreeSet::new(),
        }
    }

    /// The earliest time at which this subscription becomes due again.
    ///
    /// `None` when the interval is too large to represent, which means never.
    pub fn next_check(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.interval)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .and_then(|interval| self.last_checked.checked_add_signed(interval))
    }

    /// True iff `now >= last_checked + interval`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_check().is_some_and(|next| now >= next)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hook = redacted_host(&self.destination);
        f.debug_struct("Subscription")
            .field("source", &self.source)
            .field("destination", &format_args!("{}/[REDACTED]", hook))
            .field("color", &self.color)
            .field("interval", &self.interval)
            .field("last_checked", &self.last_checked)
            .field("error_backlog", &self.error_backlog)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_due_exactly_at_interval() {
        let mut sub = Subscription::new("https://a.example/feed", "https://hook.example/x", 60);
        sub.last_checked = at(10, 0);

        assert!(!sub.is_due(at(10, 59)));
        assert!(sub.is_due(at(11, 0)));
        assert!(sub.is_due(at(12, 30)));
    }

    #[test]
    fn test_zero_interval_always_due() {
        let mut sub = Subscription::new("https://a.example/feed", "https://hook.example/x", 0);
        sub.last_checked = at(10, 0);
        assert!(sub.is_due(at(10, 0)));
    }

    #[test]
    fn test_never_checked_is_due() {
        let sub = Subscription::new("https://a.example/feed", "https://hook.example/x", 1440);
        assert!(sub.is_due(at(0, 0)));
    }

    #[test]
    fn test_huge_interval_never_due() {
        let sub = Subscription::new("https://a.example/feed", "https://hook.example/x", u64::MAX);
        assert_eq!(sub.next_check(), None);
        assert!(!sub.is_due(at(0, 0)));
    }

    #[test]
    fn test_debug_redacts_destination() {
        let sub = Subscription::new(
            "https://a.example/feed",
            "https://discord.com/api/webhooks/1/super-secret-token",
            5,
        );
        let debug_output = format!("{:?}", sub);
        assert!(!debug_output.contains("super-secret-token"));
        assert!(debug_output.contains("discord.com/[REDACTED]"));
        assert!(debug_output.contains("https://a.example/feed"));
    }
}
