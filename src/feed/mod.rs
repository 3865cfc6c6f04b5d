//! Feed retrieval: HTTP fetching and RSS/Atom parsing.
//!
//! - [`parser`] - turns feed bytes into [`FetchedFeed`] using the `feed-rs` crate
//! - [`fetcher`] - the [`FeedFetcher`] seam and its HTTP implementation
//!
//! # Example
//!
//! ```ignore
//! use feedhook::feed::{FeedFetcher, HttpFetcher, DEFAULT_FETCH_TIMEOUT};
//!
//! let fetcher = HttpFetcher::new(reqwest::Client::new(), DEFAULT_FETCH_TIMEOUT);
//! let feed = fetcher.fetch("https://blog.example.com/feed.xml").await?;
//! ```

mod fetcher;
mod parser;

pub use fetcher::{FeedFetcher, FetchError, HttpFetcher, DEFAULT_FETCH_TIMEOUT};
pub use parser::{parse_feed, Entry, FetchedFeed, ParseError};
