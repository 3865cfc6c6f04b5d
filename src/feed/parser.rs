use chrono::{DateTime, Utc};
use feed_rs::parser;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    Feed(#[from] parser::ParseFeedError),
    /// Entries are only comparable against a checkpoint if they carry a time.
    #[error("Entry {id:?} has no publish or update timestamp")]
    MissingTimestamp { id: String },
}

/// One feed entry, as handed to the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub link: String,
    pub published: DateTime<Utc>,
}

/// A parsed feed: its display title and entries in document order
/// (newest first for practically every publisher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFeed {
    pub title: String,
    pub entries: Vec<Entry>,
}

/// Parses RSS or Atom bytes.
///
/// Every entry must have a `published` time; Atom entries that only carry
/// `updated` use that instead. A single entry without either fails the whole
/// feed, so the subscription's checkpoint stays where it was.
pub fn parse_feed(bytes: &[u8]) -> Result<FetchedFeed, ParseError> {
    let feed = parser::parse(bytes)?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let published = entry
                .published
                .or(entry.updated)
                .ok_or_else(|| ParseError::MissingTimestamp {
                    id: entry.id.clone(),
                })?;
            Ok(Entry {
                link: entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_default(),
                title: entry.title.map(|t| t.content).unwrap_or_default(),
                id: entry.id,
                published,
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    Ok(FetchedFeed {
        title: feed.title.map(|t| t.content).unwrap_or_default(),
        entries,
    })
}
