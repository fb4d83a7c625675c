//! The discovery core of `hostsweep`.
//!
//! * [`executor`]: bounded concurrency shared by every network operation of a run.
//! * [`strategy`]: the strategy contract and the six discovery techniques.
//! * [`discovery`]: the orchestrator that fans out to the strategies.
//! * [`confirm`]: the forward-confirmed reverse DNS pass.
//! * [`report`]: grouping, deduplication and output formatting.

pub mod confirm;
pub mod discovery;
pub mod executor;
pub mod report;
pub mod strategy;

pub use discovery::DiscoveryService;
pub use executor::Executor;
pub use strategy::Strategy;
