//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain logic over external collaborators:
//! - Entitlements (premium status reads and mutations)
//! - Usage ledger (windowed usage accounting)
//! - Metrics (observability counters)
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod config;
pub mod entitlements;
pub mod ledger;
pub mod metrics;
pub mod ports;
