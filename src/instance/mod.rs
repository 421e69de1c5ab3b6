/*!
 * Runtime Instance
 *
 * The instance state block, its execution status machine, and the lifecycle
 * operations that move instances through create, suspend, resume, and
 * destroy.
 */

mod instance;
pub(crate) mod lifecycle;
pub(crate) mod status;

pub use instance::{InstanceInfo, InterruptHandler, RuntimeHandle, RuntimeInstance};
pub use lifecycle::{alive_count, create, destroy, resume, suspend};
pub use status::ExecutionStatus;
