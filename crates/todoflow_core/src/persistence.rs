//! Best-effort JSON persistence of store contents.
//!
//! # Responsibility
//! - Load and save whole record collections as JSON arrays under fixed keys.
//! - Store the onboarding-completed flag.
//! - Run fire-and-forget saves on detached worker threads.
//!
//! # Invariants
//! - No failure escapes this module: every outcome is a `BestEffort` whose
//!   `value` is usable, with the failure reason kept alongside and logged.
//! - Saves overwrite the key with the full collection.
//! - Each save of a key takes a generation number when it is requested. A
//!   write never lands after a newer generation of the same key, so the most
//!   recently requested snapshot wins even when detached saves overlap.
//!   Generations are shared by clones of one `Persistence`.
//! - Logs carry keys, counts and error text only, never record contents.

use crate::storage::{KvStorage, StorageError};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

/// Storage key of the persisted task array.
pub const TASKS_STORAGE_KEY: &str = "tasks_state_v1";
/// Storage key of the persisted notification array.
pub const NOTIFICATIONS_STORAGE_KEY: &str = "notifs_state_v1";
/// Storage key of the onboarding flag.
pub const ONBOARDING_STORAGE_KEY: &str = "onboardingCompleted";

const ONBOARDING_DONE_VALUE: &str = "true";
const SAVE_THREAD_NAME: &str = "todoflow-save";

/// Why a load or save fell back to its default.
#[derive(Debug)]
pub enum PersistError {
    Storage(StorageError),
    /// Stored text is not valid JSON, or could not be serialized.
    Json(serde_json::Error),
    /// Stored JSON parsed, but is not an array.
    NotAnArray,
    /// Detached save worker could not be started or did not finish.
    Worker(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid JSON: {err}"),
            Self::NotAnArray => write!(f, "persisted value is not a JSON array"),
            Self::Worker(message) => write!(f, "save worker failed: {message}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::NotAnArray | Self::Worker(_) => None,
        }
    }
}

impl From<StorageError> for PersistError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Outcome that always resolves to a usable value.
#[derive(Debug)]
pub struct BestEffort<T> {
    pub value: T,
    /// Swallowed failure, if any.
    pub failure: Option<PersistError>,
}

impl<T> BestEffort<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            failure: None,
        }
    }

    fn fallback(value: T, failure: PersistError) -> Self {
        Self {
            value,
            failure: Some(failure),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Handle of one detached save.
///
/// Dropping it leaves the write running; `join` waits for it.
#[derive(Debug)]
pub struct SaveHandle {
    state: SaveState,
}

#[derive(Debug)]
enum SaveState {
    Pending(JoinHandle<BestEffort<()>>),
    Done(BestEffort<()>),
}

impl SaveHandle {
    fn done(outcome: BestEffort<()>) -> Self {
        Self {
            state: SaveState::Done(outcome),
        }
    }

    /// Returns whether the write has completed.
    pub fn is_finished(&self) -> bool {
        match &self.state {
            SaveState::Pending(handle) => handle.is_finished(),
            SaveState::Done(_) => true,
        }
    }

    /// Blocks until the write completes and returns its outcome.
    pub fn join(self) -> BestEffort<()> {
        match self.state {
            SaveState::Done(outcome) => outcome,
            SaveState::Pending(handle) => handle.join().unwrap_or_else(|_| {
                BestEffort::fallback((), PersistError::Worker("save worker panicked".into()))
            }),
        }
    }
}

/// Per-key write ordering state.
#[derive(Default)]
struct KeySlot {
    issued: AtomicU64,
    /// Newest generation that reached storage. Held across the write.
    written: Mutex<u64>,
}

#[derive(Default)]
struct SaveOrder {
    slots: Mutex<HashMap<String, Arc<KeySlot>>>,
}

impl SaveOrder {
    /// Issues the next generation for `key`.
    fn ticket(&self, key: &str) -> SaveTicket {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.to_string()).or_default())
        };
        let generation = slot.issued.fetch_add(1, Ordering::SeqCst) + 1;
        SaveTicket { slot, generation }
    }
}

struct SaveTicket {
    slot: Arc<KeySlot>,
    generation: u64,
}

/// JSON bridge between record stores and a `KvStorage` backend.
#[derive(Clone)]
pub struct Persistence {
    storage: Arc<dyn KvStorage>,
    order: Arc<SaveOrder>,
}

impl Persistence {
    pub fn new(storage: Arc<dyn KvStorage>) -> Self {
        Self {
            storage,
            order: Arc::new(SaveOrder::default()),
        }
    }

    /// Loads a record array from `key`.
    ///
    /// # Contract
    /// - Absent key: `None`, no failure.
    /// - Storage error, invalid JSON, non-array JSON or records that do not
    ///   match `T`: `None` with the failure recorded.
    pub fn load_items<T: DeserializeOwned>(&self, key: &str) -> BestEffort<Option<Vec<T>>> {
        match self.try_load_items(key) {
            Ok(items) => {
                info!(
                    "event=store_load module=persistence status=ok key={key} found={} items={}",
                    items.is_some(),
                    items.as_ref().map_or(0, Vec::len)
                );
                BestEffort::ok(items)
            }
            Err(err) => {
                warn!(
                    "event=store_load module=persistence status=fallback key={key} error={err}"
                );
                BestEffort::fallback(None, err)
            }
        }
    }

    /// Serializes `items` and writes them under `key` on the calling thread.
    pub fn save_items<T: Serialize>(&self, key: &str, items: &[T]) -> BestEffort<()> {
        match serde_json::to_string(items) {
            Ok(json) => {
                let ticket = self.order.ticket(key);
                write_in_order(self.storage.as_ref(), key, &json, &ticket)
            }
            Err(err) => save_failed(key, err.into()),
        }
    }

    /// Snapshots `items` now and writes them on a detached worker thread.
    ///
    /// The caller may drop the returned handle. If a later save of the same
    /// key lands first, this one is skipped and still reports success.
    pub fn spawn_save<T: Serialize>(&self, key: &str, items: &[T]) -> SaveHandle {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(err) => return SaveHandle::done(save_failed(key, err.into())),
        };

        let ticket = self.order.ticket(key);
        let storage = Arc::clone(&self.storage);
        let worker_key = key.to_string();
        let spawned = std::thread::Builder::new()
            .name(SAVE_THREAD_NAME.to_string())
            .spawn(move || write_in_order(storage.as_ref(), &worker_key, &json, &ticket));

        match spawned {
            Ok(handle) => SaveHandle {
                state: SaveState::Pending(handle),
            },
            Err(err) => SaveHandle::done(save_failed(key, PersistError::Worker(err.to_string()))),
        }
    }

    /// Returns whether onboarding was completed on this device.
    ///
    /// Only the exact stored value `"true"` counts; read failures count as
    /// not completed.
    pub fn onboarding_completed(&self) -> BestEffort<bool> {
        match self.storage.get(ONBOARDING_STORAGE_KEY) {
            Ok(value) => BestEffort::ok(value.as_deref() == Some(ONBOARDING_DONE_VALUE)),
            Err(err) => {
                warn!(
                    "event=onboarding_load module=persistence status=fallback key={ONBOARDING_STORAGE_KEY} error={err}"
                );
                BestEffort::fallback(false, err.into())
            }
        }
    }

    /// Records onboarding as completed.
    pub fn complete_onboarding(&self) -> BestEffort<()> {
        write_json(
            self.storage.as_ref(),
            ONBOARDING_STORAGE_KEY,
            ONBOARDING_DONE_VALUE,
        )
    }

    fn try_load_items<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<T>>, PersistError> {
        let Some(raw) = self.storage.get(key)? else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(&raw)?;
        if !value.is_array() {
            return Err(PersistError::NotAnArray);
        }
        let items = serde_json::from_value(value)?;
        Ok(Some(items))
    }
}

fn write_in_order(
    storage: &dyn KvStorage,
    key: &str,
    json: &str,
    ticket: &SaveTicket,
) -> BestEffort<()> {
    let mut written = ticket
        .slot
        .written
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if *written >= ticket.generation {
        debug!(
            "event=store_save module=persistence status=superseded key={key} generation={} written={}",
            ticket.generation, *written
        );
        return BestEffort::ok(());
    }
    let outcome = write_json(storage, key, json);
    if outcome.is_ok() {
        *written = ticket.generation;
    }
    outcome
}

fn write_json(storage: &dyn KvStorage, key: &str, json: &str) -> BestEffort<()> {
    match storage.set(key, json) {
        Ok(()) => {
            info!(
                "event=store_save module=persistence status=ok key={key} bytes={}",
                json.len()
            );
            BestEffort::ok(())
        }
        Err(err) => save_failed(key, err.into()),
    }
}

fn save_failed(key: &str, err: PersistError) -> BestEffort<()> {
    warn!("event=store_save module=persistence status=skipped key={key} error={err}");
    BestEffort::fallback((), err)
}

#[cfg(test)]
mod tests {
    use super::{write_in_order, BestEffort, PersistError, SaveHandle, SaveOrder};
    use crate::storage::{KvStorage, SqliteKvStorage};

    #[test]
    fn completed_handle_reports_finished() {
        let handle = SaveHandle::done(BestEffort::fallback((), PersistError::NotAnArray));
        assert!(handle.is_finished());
        assert!(matches!(
            handle.join().failure,
            Some(PersistError::NotAnArray)
        ));
    }

    #[test]
    fn older_generation_never_overwrites_newer_one() {
        let storage = SqliteKvStorage::open_in_memory().unwrap();
        let order = SaveOrder::default();
        let older = order.ticket("tasks_state_v1");
        let newer = order.ticket("tasks_state_v1");
        assert!(newer.generation > older.generation);

        assert!(write_in_order(&storage, "tasks_state_v1", "[2]", &newer).is_ok());
        let skipped = write_in_order(&storage, "tasks_state_v1", "[1]", &older);
        assert!(skipped.is_ok());
        assert_eq!(
            storage.get("tasks_state_v1").unwrap().as_deref(),
            Some("[2]")
        );
    }

    #[test]
    fn generations_are_counted_per_key() {
        let order = SaveOrder::default();
        assert_eq!(order.ticket("tasks_state_v1").generation, 1);
        assert_eq!(order.ticket("notifs_state_v1").generation, 1);
        assert_eq!(order.ticket("tasks_state_v1").generation, 2);
    }
}
