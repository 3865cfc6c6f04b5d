use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::feed::Entry;
use crate::util::unescape_html;

/// Embed type tag for a generic rich embed.
pub const EMBED_TYPE_RICH: &str = "rich";

/// A Discord-style webhook embed. Empty strings and a zero color are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "is_zero")]
    pub color: u32,
    pub footer: Footer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footer {
    pub text: String,
}

/// Request body sent to the webhook.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub embeds: &'a [Embed],
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl Embed {
    /// Announces one feed entry: unescaped title linking to the entry, its
    /// publish time, and the feed's title as footer.
    pub fn for_entry(entry: &Entry, feed_title: &str, color: u32) -> Self {
        Self {
            title: unescape_html(&entry.title).into_owned(),
            kind: EMBED_TYPE_RICH.to_owned(),
            description: String::new(),
            url: entry.link.clone(),
            timestamp: entry.published,
            color,
            footer: Footer {
                text: feed_title.to_owned(),
            },
        }
    }
}
