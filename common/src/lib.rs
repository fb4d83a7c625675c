//! Shared building blocks for `hostsweep`.
//!
//! Everything a discovery run needs before any packet leaves the machine lives here:
//! the immutable run [`config::Config`], the [`error::SweepError`] kinds, the
//! [`record::Record`] produced by every strategy, the target set builder in
//! [`network::target`] and the [`dns::Resolver`] seam used by the DNS-backed strategies.

pub mod config;
pub mod dns;
pub mod error;
pub mod network;
pub mod record;
pub mod utils;

pub use error::SweepError;
