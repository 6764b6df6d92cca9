//! Domain layer - pure quota and entitlement logic with no external dependencies.
//!
//! This layer contains the core concepts and invariants of the freemium model:
//! - Usage events and rolling-window counting
//! - Premium entitlement records and their expiry rules
//! - The quota decision returned to callers
//!
//! All types in this layer are pure and easily testable.

pub mod premium;
pub mod usage;
