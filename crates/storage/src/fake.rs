// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake persistence backend for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::error::StorageError;
use crate::operation::Operation;
use crate::persistence::{MemoryPersistence, Persistence};
use crate::state::Collections;
use std::io;
use std::sync::{Arc, Condvar, Mutex};

/// Handle for a commit held in flight by [`FakePersistence::hold_next_commit`]
#[derive(Clone, Default)]
pub struct CommitGate {
    entered: Arc<(Mutex<bool>, Condvar)>,
    released: Arc<(Mutex<bool>, Condvar)>,
}

impl CommitGate {
    /// Block until the held commit has started
    pub fn wait_entered(&self) {
        let (lock, cvar) = &*self.entered;
        let mut entered = lock.lock().unwrap_or_else(|e| e.into_inner());
        while !*entered {
            entered = cvar.wait(entered).unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Let the held commit proceed
    pub fn release(&self) {
        let (lock, cvar) = &*self.released;
        *lock.lock().unwrap_or_else(|e| e.into_inner()) = true;
        cvar.notify_all();
    }

    fn enter_and_wait(&self) {
        {
            let (lock, cvar) = &*self.entered;
            *lock.lock().unwrap_or_else(|e| e.into_inner()) = true;
            cvar.notify_all();
        }
        let (lock, cvar) = &*self.released;
        let mut released = lock.lock().unwrap_or_else(|e| e.into_inner());
        while !*released {
            released = cvar.wait(released).unwrap_or_else(|e| e.into_inner());
        }
    }
}

#[derive(Default)]
struct FakeState {
    inner: MemoryPersistence,
    failures: Vec<io::ErrorKind>,
    fail_reads: bool,
    gate: Option<CommitGate>,
    attempts: u64,
    committed: Vec<Vec<Operation>>,
}

/// In-memory persistence with failure injection.
///
/// Clones share state, so a test can keep a handle while the store owns
/// another.
#[derive(Clone, Default)]
pub struct FakePersistence {
    state: Arc<Mutex<FakeState>>,
}

impl FakePersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing collections
    pub fn with_collections(collections: Collections) -> Self {
        let fake = Self::default();
        fake.lock().inner = MemoryPersistence::with_collections(collections);
        fake
    }

    /// Fail the next `count` commits with the given I/O error kind
    pub fn fail_next_commits(&self, count: usize, kind: io::ErrorKind) {
        self.lock().failures.extend(std::iter::repeat_n(kind, count));
    }

    /// Make every read fail until reset
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Block the next commit until the returned gate is released
    pub fn hold_next_commit(&self) -> CommitGate {
        let gate = CommitGate::default();
        self.lock().gate = Some(gate.clone());
        gate
    }

    /// Number of commit calls, including failed ones
    pub fn commit_attempts(&self) -> u64 {
        self.lock().attempts
    }

    /// Batches that were applied
    pub fn committed_batches(&self) -> Vec<Vec<Operation>> {
        self.lock().committed.clone()
    }

    /// Copy of the current collections
    pub fn snapshot(&self) -> Collections {
        let state = self.lock();
        state.inner.read(Collections::clone).unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Persistence for FakePersistence {
    fn read<R>(&self, f: impl FnOnce(&Collections) -> R) -> Result<R, StorageError> {
        let state = self.lock();
        if state.fail_reads {
            return Err(StorageError::Io(io::Error::other("injected read failure")));
        }
        state.inner.read(f)
    }

    fn commit(&mut self, operations: Vec<Operation>) -> Result<(), StorageError> {
        // Take the gate without holding the lock while blocked
        let gate = {
            let mut state = self.lock();
            state.attempts += 1;
            state.gate.take()
        };
        if let Some(gate) = gate {
            gate.enter_and_wait();
        }

        let mut state = self.lock();
        if !state.failures.is_empty() {
            let kind = state.failures.remove(0);
            return Err(StorageError::Io(io::Error::new(kind, "injected commit failure")));
        }
        state.committed.push(operations.clone());
        state.inner.commit(operations)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
