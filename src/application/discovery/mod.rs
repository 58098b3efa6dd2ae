//! # Discovery Module
//!
//! Connects to every configured tool server with a bounded, flat retry budget
//! and aggregates the listed tools into one [`ToolRegistry`].
//!
//! Servers are processed sequentially so log ordering is deterministic. A
//! server that exhausts its retries is skipped; discovery itself never fails.
//!
//! [`ToolRegistry`]: crate::application::tooling::ToolRegistry

mod builder;
mod connector;
pub mod retry;
pub mod startup;
pub mod types;

pub use builder::{DiscoveryReport, ToolRegistryBuilder};
pub use connector::{ConnectedServer, ServerConnector};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use startup::run_startup_discovery;
pub use types::{
    AttemptOutcome, ConnectionAttempt, DiscoveredServer, DiscoveryError, DiscoverySummary,
    LoadStatus,
};
