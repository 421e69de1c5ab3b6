/*!
 * Core Types
 * Common types used across the runtime host
 */

/// Platform thread identity.
///
/// Values come from the platform layer and stay stable for the lifetime of a
/// thread. An instance records the id of the thread that created it and
/// keeps it even while suspended or running elsewhere.
pub type ThreadId = u64;

/// Monotonic identity assigned to each runtime instance at creation.
///
/// Used only for diagnostics and cross-thread inspection snapshots; the
/// lifecycle protocol itself identifies instances by pointer.
pub type InstanceId = u64;
