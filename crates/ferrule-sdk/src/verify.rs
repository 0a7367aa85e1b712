//! Verification harness — pure expected-vs-actual field comparison
//!
//! Used to confirm round-trips after a value has crossed the boundary, been
//! mutated, and been read back. No mutation, no side effects.

use crate::bind::BindingRegistry;
use crate::error::{HostError, HostResult};
use crate::handle::ControlHandle;
use crate::value::HostValue;

/// Compare a control object's observed field values against expectations.
///
/// Each expectation is a `(path, value)` pair. A path is a field name,
/// optionally descending one nesting level with a dot (`"a.p"` reads field
/// `p` of the nested control in field `a`). Sequence fields compare by
/// current contents, so a live view matches a by-value sequence.
///
/// Returns `Ok(false)` on the first mismatch; errors only on unknown
/// classes/fields or a class/handle mismatch.
pub fn fields_match(
    registry: &BindingRegistry,
    class: &str,
    handle: &ControlHandle,
    expected: &[(&str, HostValue)],
) -> HostResult<bool> {
    let binding = registry
        .get(class)
        .ok_or_else(|| HostError::UnknownClass(class.to_string()))?;
    let obj = binding.bind(handle.clone())?;

    for (path, want) in expected {
        let got = match path.split_once('.') {
            None => obj.get(path)?,
            Some((outer, inner)) => {
                let nested = obj.object(outer)?;
                let nested_binding = registry
                    .get(nested.class_name())
                    .ok_or_else(|| HostError::UnknownClass(nested.class_name().to_string()))?;
                nested_binding.bind(nested)?.get(inner)?
            }
        };
        if !got.observed_eq(want) {
            return Ok(false);
        }
    }
    Ok(true)
}
