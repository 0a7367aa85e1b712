//! Ferrule SDK — control-field reflection and host-boundary binding
//!
//! A native configuration type declares typed, documented fields once; each
//! field automatically gets type-level metadata (doc string, type
//! descriptor, and — for nested fields — the defining module) and a safe
//! boundary surface for a dynamically-typed host environment. Sequence
//! fields cross the boundary as live views: edits made through the exposed
//! handle land on the owning object.
//!
//! # Example
//!
//! ```ignore
//! use ferrule_sdk::{BindingRegistry, HostValue};
//! use ferrule_derive::Control;
//!
//! #[derive(Control, Clone, Default)]
//! struct ServerControl {
//!     /// worker thread count
//!     workers: i32,
//!     /// listen addresses
//!     listen: Vec<String>,
//! }
//!
//! let mut registry = BindingRegistry::new();
//! registry.register::<ServerControl>()?;
//!
//! let cfg = registry.instantiate("ServerControl")?;
//! cfg.seq("listen")?.append(HostValue::str("0.0.0.0:8080"))?;
//! assert_eq!(cfg.seq("listen")?.len()?, 1);
//! ```

#![warn(missing_docs)]

pub mod bind;
pub mod error;
pub mod field;
pub mod handle;
pub mod value;
pub mod verify;
pub mod view;

pub use bind::{
    BindingRegistry, BoundObject, ClassBinding, FieldBinding, FieldGetter, FieldSetter,
};
pub use error::{HostError, HostResult};
pub use field::{
    descriptor_of, AnyControl, Control, FieldDescriptor, FieldKind, HostField, SeqElem,
};
pub use handle::ControlHandle;
pub use value::HostValue;
pub use verify::fields_match;
pub use view::{HostSeq, SeqProjection, SeqView};

// Support items for code generated by `#[derive(Control)]`; not public API.
#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
