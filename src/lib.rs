//! Read-only overview of a Redis deployment reachable through one logical
//! connection.
//!
//! Every fan-out operation queries all endpoints and merges their answers:
//! keys are concatenated, configuration is merged last-write-wins, INFO is
//! kept per section per endpoint, and replicas are read from each primary's
//! replication section.

pub mod adapter;
pub mod aggregator;
pub mod backend;
pub mod connection;
pub mod error;
pub mod info;
pub mod replication;
pub mod server;
