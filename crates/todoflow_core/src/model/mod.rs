//! Domain records persisted by the todo session.
//!
//! # Responsibility
//! - Define the task and notification record shapes shared by stores,
//!   derivation rules and persistence.
//! - Keep the JSON wire shape identical to what the app already stores.
//!
//! # Invariants
//! - Record ids are opaque strings and unique within their store.
//! - `created_at` is Unix epoch milliseconds.

pub mod notification;
pub mod task;

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Generates a fresh record id for newly created tasks and notifications.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns current wall-clock time in epoch milliseconds.
///
/// Clamps to `0` when the system clock reports a pre-epoch time.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
