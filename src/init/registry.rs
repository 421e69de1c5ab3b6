/*!
 * Initializer Registry
 *
 * Append-only list of initializer callbacks. Every lifecycle phase runs the
 * whole list in registration order; teardown phases use the same order as
 * setup phases, not the reverse.
 */

use super::Phase;
use parking_lot::RwLock;

/// A registered initializer.
///
/// Callbacks are plain function pointers: registration happens during process
/// setup and nodes are never removed.
#[derive(Clone, Copy)]
struct InitNode {
    callback: fn(Phase),
}

/// Ordered collection of initializer callbacks.
pub struct InitializerRegistry {
    nodes: RwLock<Vec<InitNode>>,
}

impl InitializerRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: RwLock::new(Vec::new()),
        }
    }

    /// Append a callback to the list.
    ///
    /// Intended for setup time. Appending concurrently with a phase run is
    /// safe but the new callback only participates in runs that start after
    /// the append.
    pub fn register(&self, callback: fn(Phase)) {
        self.nodes.write().push(InitNode { callback });
    }

    /// Invoke every registered callback with `phase`, in registration order.
    ///
    /// The list is snapshotted before the first invocation, so a callback may
    /// itself register without deadlocking; the addition is seen by later
    /// runs only.
    pub fn run_phase(&self, phase: Phase) {
        let nodes = self.nodes.read().clone();
        log::debug!("Running {} initializer(s) for {:?}", nodes.len(), phase);
        for node in &nodes {
            (node.callback)(phase);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }
}

impl Default for InitializerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: InitializerRegistry = InitializerRegistry::new();

/// Append `callback` to the process-global initializer list.
///
/// Call during process setup, before the first runtime instance is created.
/// Nodes are never removed; the list survives full teardown so a later
/// re-initialization replays the same callbacks.
pub fn register_initializer(callback: fn(Phase)) {
    GLOBAL.register(callback);
}

/// Run `phase` over the process-global list.
pub(crate) fn run_phase(phase: Phase) {
    GLOBAL.run_phase(phase);
}
