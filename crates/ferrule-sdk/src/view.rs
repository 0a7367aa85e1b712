//! SeqView — live, aliasing view over a sequence field
//!
//! A host-side read of a sequence field never copies the sequence out.
//! It yields a `SeqView` holding a clone of the owning [`ControlHandle`]
//! plus a projection from the erased control object to the field's storage,
//! so every indexed operation forwards to the owner. `cfg.list.append(x)`
//! therefore mutates `cfg`, and a second view over the same owner observes
//! the edit immediately.

use crate::error::{HostError, HostResult};
use crate::field::{AnyControl, HostField, SeqElem};
use crate::handle::ControlHandle;
use crate::value::HostValue;

// ============================================================================
// HostSeq — erased sequence operations
// ============================================================================

/// Object-safe operations on one sequence field's storage.
///
/// Implemented for `Vec<T>` for every [`SeqElem`]; the projection inside a
/// [`SeqView`] returns this surface so the view itself stays untyped.
pub trait HostSeq: Send + Sync {
    /// Current element count
    fn len(&self) -> usize;

    /// Element at `index`; out-of-range when `index >= len()`
    fn get(&self, index: usize) -> HostResult<HostValue>;

    /// Overwrite element at `index`; same out-of-range rule, exact
    /// element-type matching
    fn set(&mut self, index: usize, value: HostValue) -> HostResult<()>;

    /// Push one element at the end
    fn append(&mut self, value: HostValue) -> HostResult<()>;

    /// `[a, b, c]` rendering of the current contents; `[]` when empty
    fn render(&self) -> String;
}

impl<T: SeqElem> HostSeq for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> HostResult<HostValue> {
        self.as_slice()
            .get(index)
            .map(HostField::to_host)
            .ok_or(HostError::IndexOutOfRange {
                index,
                len: Vec::len(self),
            })
    }

    fn set(&mut self, index: usize, value: HostValue) -> HostResult<()> {
        let len = Vec::len(self);
        let slot = self
            .get_mut(index)
            .ok_or(HostError::IndexOutOfRange { index, len })?;
        *slot = T::from_host(value)?;
        Ok(())
    }

    fn append(&mut self, value: HostValue) -> HostResult<()> {
        self.push(T::from_host(value)?);
        Ok(())
    }

    fn render(&self) -> String {
        let mut out = String::from("[");
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&item.to_string());
        }
        out.push(']');
        out
    }
}

// ============================================================================
// SeqView
// ============================================================================

/// Projection from an erased control object to one sequence field's storage.
/// Generated per field by `#[derive(Control)]`; the only failure mode is a
/// class downcast breach, which is unreachable through the binding layer.
pub type SeqProjection =
    for<'a> fn(&'a mut (dyn AnyControl + 'static)) -> HostResult<&'a mut dyn HostSeq>;

/// Live view over a mutable sequence field of one control object instance.
///
/// The view's identity is (owner handle, field projection) — never a copy of
/// the sequence. Holding the cloned handle is the ownership-extension
/// contract: the owner stays alive at least as long as any view over it, so
/// a dangling view cannot be constructed. Dropping a view never mutates or
/// frees the owner, and any number of views may coexist over one owner.
#[derive(Clone)]
pub struct SeqView {
    owner: ControlHandle,
    field: &'static str,
    project: SeqProjection,
}

impl SeqView {
    /// Bind a view to `field` of the instance behind `owner`
    pub fn new(owner: ControlHandle, field: &'static str, project: SeqProjection) -> Self {
        Self {
            owner,
            field,
            project,
        }
    }

    fn with_seq<R>(&self, f: impl FnOnce(&mut dyn HostSeq) -> HostResult<R>) -> HostResult<R> {
        let mut guard = self.owner.write();
        let seq = (self.project)(&mut *guard)?;
        f(seq)
    }

    /// Current element count
    pub fn len(&self) -> HostResult<usize> {
        self.with_seq(|seq| Ok(seq.len()))
    }

    /// Check if the sequence is empty
    pub fn is_empty(&self) -> HostResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> HostResult<HostValue> {
        self.with_seq(|seq| seq.get(index))
    }

    /// Overwrite element at `index`; the mutation is immediately visible
    /// through the owner and through every other view over it
    pub fn set(&self, index: usize, value: HostValue) -> HostResult<()> {
        self.with_seq(|seq| seq.set(index, value))
    }

    /// Grow the sequence by one element at the end; existing indices stay
    /// valid
    pub fn append(&self, value: HostValue) -> HostResult<()> {
        self.with_seq(|seq| seq.append(value))
    }

    /// Human-readable rendering of the current contents
    pub fn render(&self) -> HostResult<String> {
        self.with_seq(|seq| Ok(seq.render()))
    }

    /// By-value snapshot of the current contents
    pub fn to_vec(&self) -> HostResult<Vec<HostValue>> {
        self.with_seq(|seq| (0..seq.len()).map(|i| seq.get(i)).collect())
    }

    /// Name of the viewed field
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Handle of the owning instance
    pub fn owner(&self) -> &ControlHandle {
        &self.owner
    }
}
