//! Field declaration model — descriptors, conversion traits, control trait
//!
//! A control type declares its fields once (normally through
//! `#[derive(Control)]` from `ferrule-derive`); each declared field gets one
//! [`FieldDescriptor`] in a type-level table shared by every instance. The
//! descriptor carries the documentation string, a stable [`FieldKind`] type
//! descriptor, and — for nested control fields only — the identifier of the
//! module that defines the nested type.

use std::any::Any;
use std::fmt;

use crate::error::{HostError, HostResult};
use crate::value::HostValue;

// ============================================================================
// FieldKind
// ============================================================================

/// Stable type descriptor of a declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Boolean field
    Bool,
    /// 32-bit integer field
    Int,
    /// 64-bit integer field
    Int64,
    /// Double-precision float field
    Double,
    /// String field
    Str,
    /// Variable-length sequence of scalar or string elements
    Seq(Box<FieldKind>),
    /// Nested control object, identified by its class name
    Nested(&'static str),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Int => write!(f, "int"),
            FieldKind::Int64 => write!(f, "int64"),
            FieldKind::Double => write!(f, "double"),
            FieldKind::Str => write!(f, "string"),
            FieldKind::Seq(elem) => write!(f, "sequence<{}>", elem),
            FieldKind::Nested(name) => write!(f, "{}", name),
        }
    }
}

// ============================================================================
// FieldDescriptor
// ============================================================================

/// Type-level metadata for one declared field.
///
/// Created once per field at declaration time and shared by all instances of
/// the owning type; immutable thereafter. `module` is `Some` only for nested
/// control fields, so a metadata consumer can resolve the nested type's own
/// descriptor table without hard-coding every nested type.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    doc: &'static str,
    kind: FieldKind,
    module: Option<&'static str>,
}

impl FieldDescriptor {
    /// Descriptor for a scalar, string, or sequence field
    pub fn scalar(name: &'static str, doc: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            doc,
            kind,
            module: None,
        }
    }

    /// Descriptor for a nested control field, recording the defining module
    pub fn nested(
        name: &'static str,
        doc: &'static str,
        kind: FieldKind,
        module: &'static str,
    ) -> Self {
        Self {
            name,
            doc,
            kind,
            module: Some(module),
        }
    }

    /// Field name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Documentation string, fixed at declaration
    pub fn doc(&self) -> &'static str {
        self.doc
    }

    /// Type descriptor
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Defining module of the nested type; `None` for non-nested fields
    pub fn module(&self) -> Option<&'static str> {
        self.module
    }
}

// ============================================================================
// Control
// ============================================================================

/// A native control type with declared, documented, typed fields.
///
/// Normally implemented via `#[derive(Control)]`. Construction applies each
/// field's independent default through the type's `Default` impl; a custom
/// `Default` is the place for non-trivial default expressions.
pub trait Control: Default + Clone + Send + Sync + 'static {
    /// Class name exposed to the host
    const CLASS_NAME: &'static str;

    /// Identifier of the namespace/module that defines this type
    const MODULE: &'static str;

    /// Type-level descriptor table, one entry per declared field,
    /// in declaration order
    fn descriptors() -> &'static [FieldDescriptor];

    /// Boundary binding: default constructor plus per-field accessors
    fn binding() -> crate::bind::ClassBinding;
}

/// Look up one field's descriptor on a control type.
pub fn descriptor_of<C: Control>(field: &str) -> Option<&'static FieldDescriptor> {
    C::descriptors().iter().find(|d| d.name() == field)
}

// ============================================================================
// AnyControl (type erasure)
// ============================================================================

/// Object-safe erasure of [`Control`], so one handle type can hold any
/// control object. Blanket-implemented; never implement by hand.
pub trait AnyControl: Any + Send + Sync {
    /// Upcast for downcasting to the concrete control type
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Class name of the concrete type
    fn class_name(&self) -> &'static str;
}

impl<C: Control> AnyControl for C {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn class_name(&self) -> &'static str {
        C::CLASS_NAME
    }
}

// ============================================================================
// HostField — per-field conversion
// ============================================================================

/// Conversion between one field's native storage and [`HostValue`].
///
/// Implemented for every supported field shape: scalars, `String`,
/// `Vec<impl SeqElem>`, and (via the derive) nested control types.
/// Conversions are exact — no numeric coercion across variants.
pub trait HostField: Sized {
    /// Type descriptor for this field shape
    fn kind() -> FieldKind;

    /// Convert native storage to a boundary value
    fn to_host(&self) -> HostValue;

    /// Convert a boundary value back, failing on any variant mismatch
    fn from_host(value: HostValue) -> HostResult<Self>;
}

fn mismatch<T>(expected: FieldKind, got: &HostValue) -> HostResult<T> {
    Err(HostError::TypeMismatch {
        expected: expected.to_string(),
        got: got.type_name().to_string(),
    })
}

impl HostField for bool {
    fn kind() -> FieldKind {
        FieldKind::Bool
    }

    fn to_host(&self) -> HostValue {
        HostValue::Bool(*self)
    }

    fn from_host(value: HostValue) -> HostResult<Self> {
        match value {
            HostValue::Bool(b) => Ok(b),
            other => mismatch(Self::kind(), &other),
        }
    }
}

impl HostField for i32 {
    fn kind() -> FieldKind {
        FieldKind::Int
    }

    fn to_host(&self) -> HostValue {
        HostValue::Int(*self)
    }

    fn from_host(value: HostValue) -> HostResult<Self> {
        match value {
            HostValue::Int(i) => Ok(i),
            other => mismatch(Self::kind(), &other),
        }
    }
}

impl HostField for i64 {
    fn kind() -> FieldKind {
        FieldKind::Int64
    }

    fn to_host(&self) -> HostValue {
        HostValue::Int64(*self)
    }

    fn from_host(value: HostValue) -> HostResult<Self> {
        match value {
            HostValue::Int64(i) => Ok(i),
            other => mismatch(Self::kind(), &other),
        }
    }
}

impl HostField for f64 {
    fn kind() -> FieldKind {
        FieldKind::Double
    }

    fn to_host(&self) -> HostValue {
        HostValue::Double(*self)
    }

    fn from_host(value: HostValue) -> HostResult<Self> {
        match value {
            HostValue::Double(d) => Ok(d),
            other => mismatch(Self::kind(), &other),
        }
    }
}

impl HostField for String {
    fn kind() -> FieldKind {
        FieldKind::Str
    }

    fn to_host(&self) -> HostValue {
        HostValue::Str(self.clone())
    }

    fn from_host(value: HostValue) -> HostResult<Self> {
        match value {
            HostValue::Str(s) => Ok(s),
            other => mismatch(Self::kind(), &other),
        }
    }
}

/// Marker for types usable as sequence elements: scalars and strings only.
/// Sequences of sequences and sequences of control objects are not field
/// shapes this layer supports.
pub trait SeqElem: HostField + Clone + fmt::Display + Send + Sync + 'static {}

impl SeqElem for bool {}
impl SeqElem for i32 {}
impl SeqElem for i64 {}
impl SeqElem for f64 {}
impl SeqElem for String {}

impl<T: SeqElem> HostField for Vec<T> {
    fn kind() -> FieldKind {
        FieldKind::Seq(Box::new(T::kind()))
    }

    fn to_host(&self) -> HostValue {
        HostValue::Seq(self.iter().map(HostField::to_host).collect())
    }

    /// Whole-sequence assignment: accepts a by-value sequence, or a live
    /// view (from any owner), which is materialized first.
    fn from_host(value: HostValue) -> HostResult<Self> {
        let items = match value {
            HostValue::Seq(items) => items,
            HostValue::View(view) => view.to_vec()?,
            other => return mismatch(Self::kind(), &other),
        };
        items.into_iter().map(T::from_host).collect()
    }
}
