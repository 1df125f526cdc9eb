//! In-memory record stores owned by the application session.
//!
//! # Responsibility
//! - Hold ordered task and notification collections.
//! - Apply CRUD operations with silent no-op semantics for unknown ids.
//!
//! # Invariants
//! - New records are prepended (most-recent-first).
//! - Mutators return `true` only when the collection actually changed, so
//!   callers can skip re-derivation and persistence.

pub mod notification_store;
pub mod task_store;
