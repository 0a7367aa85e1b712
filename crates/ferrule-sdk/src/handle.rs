//! ControlHandle — shared ownership of a control object instance
//!
//! The handle is the unit of ownership the boundary hands out. Cloning it is
//! what extends the owning instance's lifetime: a live sequence view holds a
//! clone, so the owner provably outlives every view derived from it.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{HostError, HostResult};
use crate::field::{AnyControl, Control};

/// Counted, lock-guarded handle to one control object instance.
#[derive(Clone)]
pub struct ControlHandle {
    inner: Arc<RwLock<dyn AnyControl>>,
}

impl ControlHandle {
    /// Wrap a control object in a fresh handle
    pub fn new<C: Control>(control: C) -> Self {
        Self {
            inner: Arc::new(RwLock::new(control)),
        }
    }

    /// Class name of the held instance
    pub fn class_name(&self) -> &'static str {
        self.inner.read().class_name()
    }

    /// Whether two handles refer to the same instance
    pub fn ptr_eq(&self, other: &ControlHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Run a closure against the concrete control object.
    ///
    /// Fails with a type mismatch if the handle holds a different class.
    pub fn with<C: Control, R>(&self, f: impl FnOnce(&C) -> R) -> HostResult<R> {
        let guard = self.inner.read();
        let control = guard
            .as_any()
            .downcast_ref::<C>()
            .ok_or_else(|| HostError::TypeMismatch {
                expected: C::CLASS_NAME.to_string(),
                got: guard.class_name().to_string(),
            })?;
        Ok(f(control))
    }

    /// Run a mutating closure against the concrete control object.
    pub fn with_mut<C: Control, R>(&self, f: impl FnOnce(&mut C) -> R) -> HostResult<R> {
        let mut guard = self.inner.write();
        let class = guard.class_name();
        let control = guard
            .as_any_mut()
            .downcast_mut::<C>()
            .ok_or_else(|| HostError::TypeMismatch {
                expected: C::CLASS_NAME.to_string(),
                got: class.to_string(),
            })?;
        Ok(f(control))
    }

    /// Clone the held instance out by value
    pub fn snapshot<C: Control>(&self) -> HostResult<C> {
        self.with(|c: &C| c.clone())
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, dyn AnyControl> {
        self.inner.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, dyn AnyControl> {
        self.inner.write()
    }
}

impl std::fmt::Debug for ControlHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ControlHandle({})", self.class_name())
    }
}
