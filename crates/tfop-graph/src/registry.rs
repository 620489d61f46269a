//! Handle issuance and classification.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tfop_core::HandleKind;
use tfop_core::constants::NULL_HANDLE;

/// Issues opaque handles from a single counter and remembers their kind.
///
/// Handles are never reused, so a retired handle stays unresolvable and a handle
/// of one kind never resolves as another.
#[derive(Debug)]
pub struct HandleRegistry {
    next: AtomicU64,
    live: DashMap<u64, HandleKind>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(NULL_HANDLE + 1),
            live: DashMap::new(),
        }
    }

    /// Issue a fresh handle of the given kind.
    pub fn issue(&self, kind: HandleKind) -> u64 {
        let handle = self.next.fetch_add(1, Ordering::Relaxed);
        self.live.insert(handle, kind);
        handle
    }

    /// Kind of a live handle; `None` for zero, unknown, or retired handles.
    pub fn kind_of(&self, handle: u64) -> Option<HandleKind> {
        if handle == NULL_HANDLE {
            return None;
        }
        self.live.get(&handle).map(|entry| *entry.value())
    }

    /// Retire a handle. Returns whether it was live.
    pub fn retire(&self, handle: u64) -> bool {
        self.live.remove(&handle).is_some()
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
