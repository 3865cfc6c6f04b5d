//! Polls RSS/Atom feeds on a per-subscription schedule and forwards new
//! entries to webhooks as embeds.
//!
//! A run loads every [`Subscription`] from the [`Config`] file, checks the due
//! ones concurrently ([`sync::run`]), and writes the updated checkpoints back.
//! Entries whose delivery fails are remembered in the subscription's error
//! backlog and retried on the next run.

pub mod config;
pub mod delivery;
pub mod feed;
pub mod subscription;
pub mod sync;
pub mod util;

pub use config::{Config, ConfigError};
pub use subscription::Subscription;
