/*!
 * Core Module
 * Shared types, diagnostics, and synchronization primitives
 */

pub mod errors;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use errors::{fatal, RuntimeError};
pub use types::{InstanceId, ThreadId};
