// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The operation list and its persistence.
//!
//! The whole list lives in one key-value slot as a JSON array and is
//! overwritten after every mutation. Writes go through a single background
//! worker so they land in mutation order and a stale snapshot never
//! overwrites a newer one.

use crate::error::PersistenceError;
use crate::models::{Operation, OperationType};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use uuid::Uuid;

pub const OPERATIONS_KEY: &str = "operations";

/// A flat key-value persistence slot.
pub trait KvBackend {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

impl<T: KvBackend + ?Sized> KvBackend for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }
}

/// In-memory backend. Clones share the same map, so a test can keep a handle
/// and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let kv = Self::new();
        if let Ok(mut slots) = kv.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
        kv
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }
}

impl KvBackend for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let slots = self
            .slots
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads the persisted list, surfacing what went wrong.
pub fn try_load(backend: &dyn KvBackend) -> Result<Vec<Operation>, PersistenceError> {
    match backend.get(OPERATIONS_KEY)? {
        Some(blob) => Ok(serde_json::from_str(&blob)?),
        None => Ok(Vec::new()),
    }
}

/// Reads the persisted list. Missing or unreadable data is an empty history.
pub fn load(backend: &dyn KvBackend) -> Vec<Operation> {
    match try_load(backend) {
        Ok(ops) => {
            log::debug!("Loaded {} operations", ops.len());
            ops
        }
        Err(e) => {
            log::warn!("Could not load operations, starting with an empty list: {}", e);
            Vec::new()
        }
    }
}

/// Overwrites the slot with the full list. Returns `false` on failure.
pub fn save(backend: &dyn KvBackend, operations: &[Operation]) -> bool {
    let res = serde_json::to_string(operations)
        .map_err(PersistenceError::from)
        .and_then(|blob| backend.set(OPERATIONS_KEY, &blob));
    match res {
        Ok(()) => true,
        Err(e) => {
            log::error!("Failed to save {} operations: {}", operations.len(), e);
            false
        }
    }
}

/// Single background writer fed with full-list snapshots.
pub struct SaveQueue<B> {
    tx: Option<Sender<Vec<Operation>>>,
    worker: Option<JoinHandle<B>>,
}

impl<B: KvBackend + Send + 'static> SaveQueue<B> {
    pub fn spawn(backend: B) -> Self {
        let (tx, rx) = mpsc::channel::<Vec<Operation>>();
        let worker = thread::spawn(move || {
            while let Ok(mut latest) = rx.recv() {
                // Older queued snapshots are superseded by the newest one.
                while let Ok(newer) = rx.try_recv() {
                    latest = newer;
                }
                save(&backend, &latest);
            }
            backend
        });
        SaveQueue {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    pub fn submit(&self, operations: Vec<Operation>) {
        let sent = match &self.tx {
            Some(tx) => tx.send(operations).is_ok(),
            None => false,
        };
        if !sent {
            log::error!("Save worker is not running; operations were not persisted");
        }
    }

    /// Waits for every submitted snapshot to be written and hands the
    /// backend back.
    pub fn finish(mut self) -> Option<B> {
        self.shutdown()
    }
}

impl<B> SaveQueue<B> {
    fn shutdown(&mut self) -> Option<B> {
        drop(self.tx.take());
        let worker = self.worker.take()?;
        match worker.join() {
            Ok(backend) => Some(backend),
            Err(_) => {
                log::error!("Save worker panicked; last snapshot may be lost");
                None
            }
        }
    }
}

impl<B> Drop for SaveQueue<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The authoritative operation list, mirrored to a [`KvBackend`].
pub struct OperationStore<B: KvBackend + Send + 'static> {
    operations: Vec<Operation>,
    saves: SaveQueue<B>,
}

impl<B: KvBackend + Send + 'static> OperationStore<B> {
    pub fn open(backend: B) -> Self {
        let operations = load(&backend);
        OperationStore {
            operations,
            saves: SaveQueue::spawn(backend),
        }
    }

    /// Operations in insertion order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn get(&self, id: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.id == id)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn add(&mut self, amount_in_base: Decimal, category: &str, kind: OperationType) -> Operation {
        let op = Operation {
            id: self.fresh_id(),
            amount: amount_in_base,
            category: category.to_string(),
            r#type: kind,
        };
        self.operations.push(op.clone());
        self.persist();
        op
    }

    /// Removes the operation with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.operations.len();
        self.operations.retain(|op| op.id != id);
        let removed = self.operations.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Flushes pending saves and returns the backend.
    pub fn close(self) -> Option<B> {
        self.saves.finish()
    }

    fn persist(&self) {
        self.saves.submit(self.operations.clone());
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
