//! The username registry: who is online right now.
//!
//! # Thread Safety
//!
//! Backed by a sharded `DashMap`, so lookups for unrelated names never contend
//! on a single lock. Shard guards are dropped before any method returns; no
//! guard is ever held across an `.await` or while sending to a session.

use crate::config::DuplicatePolicy;
use crate::error::RegistryError;
use crate::state::session::{SessionHandle, SessionId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

/// Concurrent mapping from username to session handle.
#[derive(Debug, Default)]
pub struct Registry {
    sessions: DashMap<String, SessionHandle>,
    policy: DuplicatePolicy,
}

impl Registry {
    /// Create an empty registry with the given duplicate-name policy.
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            sessions: DashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Insert unconditionally, returning the handle that was displaced.
    pub fn register(&self, name: &str, handle: SessionHandle) -> Option<SessionHandle> {
        self.sessions.insert(name.to_string(), handle)
    }

    /// Claim `name` for `handle` according to the configured policy.
    ///
    /// The check and insert happen under one shard lock, so two concurrent
    /// claims for the same name are strictly ordered. An entry whose session
    /// is already closing is treated as vacant. On success, returns the live
    /// handle that was displaced (only possible under `Replace` and `Kick`).
    pub fn claim(
        &self,
        name: &str,
        handle: SessionHandle,
    ) -> Result<Option<SessionHandle>, RegistryError> {
        match self.sessions.entry(name.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(handle);
                Ok(None)
            }
            Entry::Occupied(mut slot) => {
                if slot.get().is_closed() {
                    debug!(user = %name, "Reclaiming name from a closing session");
                    slot.insert(handle);
                    return Ok(None);
                }
                match self.policy {
                    DuplicatePolicy::Reject => Err(RegistryError::NameInUse(name.to_string())),
                    DuplicatePolicy::Replace | DuplicatePolicy::Kick => Ok(Some(slot.insert(handle))),
                }
            }
        }
    }

    /// Look up the session currently registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<SessionHandle> {
        self.sessions.get(name).map(|entry| entry.value().clone())
    }

    /// Remove `name`. Removing an absent name is a no-op.
    pub fn remove(&self, name: &str) -> Option<SessionHandle> {
        self.sessions.remove(name).map(|(_, handle)| handle)
    }

    /// Remove `name` only if it still belongs to session `id`.
    ///
    /// Returns whether an entry was removed. A session that was displaced by a
    /// newer registration gets `false` and leaves its successor in place.
    pub fn release(&self, name: &str, id: SessionId) -> bool {
        self.sessions
            .remove_if(name, |_, handle| handle.id() == id)
            .is_some()
    }

    /// Whether `name` currently maps to session `id`.
    pub fn is_current(&self, name: &str, id: SessionId) -> bool {
        self.sessions
            .get(name)
            .is_some_and(|entry| entry.value().id() == id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sessions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Snapshot of the registered names, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }
}
