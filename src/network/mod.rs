//! Network layer - polling and command dispatch against the warm-up API
//!
//! The Network actor receives refresh/dispatch commands and sends back
//! results. The Poller drives the refresh cadence.

pub mod actor;
pub mod api;
pub mod client;
pub mod poller;
pub mod sync;

#[cfg(test)]
pub(crate) mod fake;

pub use actor::NetworkActor;
pub use api::WarmupApi;
pub use client::ApiClient;
pub use poller::{PollTick, Poller, PollerHandle};
