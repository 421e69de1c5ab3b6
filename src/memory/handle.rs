/*!
 * Memory Handle
 */

use std::any::Any;
use std::fmt;

/// Opaque token a memory subsystem associates with one runtime instance.
///
/// The lifecycle core moves handles between instances and the subsystem but
/// never inspects them; only the subsystem that granted a handle knows what
/// is inside.
pub struct MemoryHandle(Box<dyn Any + Send>);

impl MemoryHandle {
    #[must_use]
    pub fn new<T: Any + Send>(token: T) -> Self {
        Self(Box::new(token))
    }

    /// Borrow the token as its concrete type. Subsystem-side only.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Recover the token, consuming the handle. Subsystem-side only.
    #[must_use]
    pub fn into_inner<T: Any>(self) -> Option<T> {
        self.0.downcast::<T>().ok().map(|boxed| *boxed)
    }
}

impl fmt::Debug for MemoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MemoryHandle(<opaque>)")
    }
}
