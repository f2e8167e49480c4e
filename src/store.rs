//! Revocable in-memory object references.
//!
//! The browser original leaned on `URL.createObjectURL` / `revokeObjectURL`
//! for previews and downloads, with cleanup scattered across removal handlers
//! and an unmount hook. Here the same mechanism is a first-class registry the
//! session owns: [`ObjectStore::register`] hands out an [`ObjectRef`],
//! [`ObjectStore::revoke`] releases it, and [`ObjectStore::live_count`] makes
//! the leak invariants observable in tests.
//!
//! Revoking a reference twice is a tolerated no-op, never an error — the
//! session guards against double release, but a stale reference held by the
//! presentation layer must not be able to poison the store.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// A handle to a registered byte buffer.
///
/// Copyable and cheap; holding an `ObjectRef` does not keep the bytes alive —
/// only the registration in the [`ObjectStore`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(u64);

/// A registered byte buffer with its MIME type.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Arc<Vec<u8>>,
    pub mime: &'static str,
}

/// Registry of live temporary references.
#[derive(Debug, Default)]
pub struct ObjectStore {
    entries: HashMap<u64, StoredObject>,
    next_id: u64,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a byte buffer and return a revocable reference to it.
    pub fn register(&mut self, bytes: Arc<Vec<u8>>, mime: &'static str) -> ObjectRef {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(id, StoredObject { bytes, mime });
        ObjectRef(id)
    }

    /// Release a reference. Returns `true` if it was live; revoking an
    /// already-revoked reference is a no-op.
    pub fn revoke(&mut self, reference: ObjectRef) -> bool {
        let released = self.entries.remove(&reference.0).is_some();
        if !released {
            warn!(id = reference.0, "revoke of an already-released reference");
        }
        released
    }

    /// Look up a live reference. `None` once revoked.
    pub fn resolve(&self, reference: ObjectRef) -> Option<&StoredObject> {
        self.entries.get(&reference.0)
    }

    /// Number of currently live references.
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }
}
