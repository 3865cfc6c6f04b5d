//! Outbound delivery of feed entries as webhook embeds.

mod embed;
mod webhook;

pub use embed::{Embed, Footer, WebhookPayload, EMBED_TYPE_RICH};
pub use webhook::{DeliveryError, DeliveryResponse, DeliverySink, WebhookSink};
