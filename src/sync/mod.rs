//! Per-subscription reconciliation and the run that drives it.
//!
//! - [`reconcile`] decides which entries of one fetched feed are delivered and
//!   computes the subscription's next checkpoint and error backlog.
//! - [`run`] fans out over all subscriptions, fetching and reconciling the due
//!   ones concurrently, and fans back in to a complete updated list.

mod reconcile;
mod run;

pub use reconcile::{chronological, reconcile, DeliveryOutcome, Reconciled};
pub use run::{run, RunReport, RunStats};
