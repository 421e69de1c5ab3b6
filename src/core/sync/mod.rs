/*!
 * Synchronization Primitives
 *
 * Two small primitives back the lifecycle protocol:
 * - `SpinLock`: test-and-set lock for registry mutation and lock-held
 *   enumeration, where hold times are a few pointer writes
 * - `ReadyEvent`: re-armable gate ordering one-time global initialization
 *   before every per-thread initialization
 */

mod event;
mod spinlock;

pub use event::ReadyEvent;
pub use spinlock::{SpinLock, SpinLockGuard};
