//! Derivations computed from the task and notification stores.
//!
//! # Responsibility
//! - Insert tag-deduplicated reminder notifications.
//! - Compute profile statistics (streak, completion ratios).
//!
//! # Invariants
//! - All day comparisons use local date identity (see `calendar`).
//! - Reminder rules are idempotent per calendar day.

pub mod reminders;
pub mod stats;
pub mod streak;
