/*!
 * Global Initializers
 *
 * Callbacks that hook the four lifecycle phases. The runtime core does not
 * interpret what they do; it only guarantees ordering: one global setup run
 * before any per-thread setup, one global teardown run after every per-thread
 * teardown, and registration order preserved within every run.
 */

mod phase;
mod registry;

pub use phase::Phase;
pub use registry::{register_initializer, InitializerRegistry};

pub(crate) use registry::run_phase;
