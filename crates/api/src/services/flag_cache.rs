//! In-process evaluation cache.
//!
//! Maps flag key to the last-known flag snapshot so the serving path avoids
//! a store round-trip per evaluation. Consistency contract: populated fully
//! at startup, refreshed per key after every successful mutation,
//! read-through on miss. No TTL and no background refresh; the window
//! between store commit and cache refresh is accepted, and evaluators may
//! see the pre-update snapshot during it.

use domain::models::Flag;
use std::collections::HashMap;
use std::sync::RwLock;

/// Concurrent flag-key → snapshot mapping.
///
/// Writers are administrative mutations; readers are the evaluation path.
/// Guards are never held across await points. A poisoned lock is recovered
/// rather than propagated, so evaluation reads never panic.
#[derive(Debug, Default)]
pub struct FlagCache {
    inner: RwLock<HashMap<String, Flag>>,
}

impl FlagCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full load at startup from the store.
    pub fn warm(&self, flags: Vec<Flag>) {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.clear();
        for flag in flags {
            map.insert(flag.key.clone(), flag);
        }
    }

    /// Snapshot read for evaluation.
    pub fn get(&self, key: &str) -> Option<Flag> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Read-through population on evaluation miss.
    pub fn insert(&self, flag: Flag) {
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(flag.key.clone(), flag);
    }

    /// Overwrites or removes the entry for `key` after a mutation, based on
    /// what the store re-read returned.
    pub fn refresh(&self, key: &str, flag: Option<Flag>) {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        match flag {
            Some(flag) => {
                map.insert(flag.key.clone(), flag);
            }
            None => {
                map.remove(key);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
