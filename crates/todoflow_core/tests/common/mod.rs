#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, TimeZone};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use todoflow_core::{FixedClock, KvStorage, StorageError, StorageResult};

/// In-memory storage with switchable failures and a write counter.
#[derive(Default)]
pub struct ScriptedStorage {
    values: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
    slow_first_write: Mutex<Option<(String, Duration)>>,
}

impl ScriptedStorage {
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        storage
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delays the next write of `key` by `delay`; later writes run at full speed.
    pub fn slow_first_write(&self, key: &str, delay: Duration) {
        *self.slow_first_write.lock().unwrap() = Some((key.to_string(), delay));
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

impl KvStorage for ScriptedStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("scripted read failure".into()));
        }
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("scripted write failure".into()));
        }
        let delay = {
            let mut slow = self.slow_first_write.lock().unwrap();
            let matches_key = matches!(slow.as_ref(), Some((slow_key, _)) if slow_key == key);
            if matches_key {
                slow.take().map(|(_, delay)| delay)
            } else {
                None
            }
        };
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, hour: u32) -> DateTime<FixedOffset> {
    utc().with_ymd_and_hms(y, m, d, hour, 0, 0).unwrap()
}

pub fn clock_at(y: i32, m: u32, d: u32, hour: u32) -> FixedClock {
    FixedClock::new(at(y, m, d, hour))
}
