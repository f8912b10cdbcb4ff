//! Round-robin target selection.

use std::net::SocketAddr;

/// Rotates through an ordered, non-empty set of target addresses.
///
/// Owned and mutated by a single serve loop, so no synchronization is
/// involved. Over `len` consecutive selections every target is returned
/// exactly once in the original order; the sequence then repeats.
#[derive(Debug)]
pub struct TargetRotor {
    targets: Vec<SocketAddr>,
    cursor: usize,
}

impl TargetRotor {
    /// Create a rotor over the given targets.
    ///
    /// # Panics
    ///
    /// Panics if `targets` is empty. An empty target set is a construction
    /// bug, not a runtime condition.
    pub fn new(targets: Vec<SocketAddr>) -> Self {
        assert!(!targets.is_empty(), "target set must be non-empty");
        Self { targets, cursor: 0 }
    }

    /// Number of targets in the rotation.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Always false: construction rejects an empty target set.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Select the next target in strict round-robin order.
    ///
    /// A single-target set always returns that target without touching the
    /// cursor. The cursor wraps with modulo arithmetic so it can never sit
    /// outside `[0, len)`.
    pub fn select_next(&mut self) -> SocketAddr {
        if self.targets.len() == 1 {
            return self.targets[0];
        }
        let target = self.targets[self.cursor];
        self.cursor = (self.cursor + 1) % self.targets.len();
        target
    }
}
