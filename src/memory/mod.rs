/*!
 * Memory Subsystem
 *
 * Seam between the lifecycle core and the memory/GC engine. The core only
 * moves opaque handles: one granted at instance creation, exchanged wholesale
 * on suspend, lent out on resume, and surrendered at destruction.
 */

mod handle;
mod recording;
mod subsystem;

pub use handle::MemoryHandle;
pub use recording::RecordingMemory;
pub use subsystem::{set_memory_subsystem, MemorySubsystem, NullMemory};

pub(crate) use subsystem::subsystem;
