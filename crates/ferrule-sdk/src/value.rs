//! HostValue — dynamically-typed boundary value
//!
//! Every value crossing between a native control object and the host
//! environment travels as a `HostValue`. Scalars and strings are carried by
//! value; a sequence field read produces a [`SeqView`] handle that aliases
//! the owner's storage, and a nested control field read produces a snapshot
//! [`ControlHandle`].

use std::fmt;

use crate::handle::ControlHandle;
use crate::view::SeqView;

/// Dynamically-typed value crossing the host boundary.
#[derive(Clone)]
pub enum HostValue {
    /// Absent value
    Null,
    /// Boolean
    Bool(bool),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Int64(i64),
    /// Double-precision float
    Double(f64),
    /// Owned string
    Str(String),
    /// By-value sequence (whole-sequence assignment, snapshots)
    Seq(Vec<HostValue>),
    /// Live view over a sequence field of a control object
    View(SeqView),
    /// Handle to a control object instance
    Object(ControlHandle),
}

impl HostValue {
    /// Create a string value
    pub fn str(s: impl Into<String>) -> Self {
        HostValue::Str(s.into())
    }

    /// Check if this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, HostValue::Null)
    }

    /// Get as boolean if this is a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HostValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i32 if this is an int
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            HostValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as i64 if this is an int64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HostValue::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a double
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HostValue::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string slice if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the live view if this is a sequence-field read result
    pub fn as_view(&self) -> Option<&SeqView> {
        match self {
            HostValue::View(v) => Some(v),
            _ => None,
        }
    }

    /// Get the object handle if this is a control object
    pub fn as_object(&self) -> Option<&ControlHandle> {
        match self {
            HostValue::Object(h) => Some(h),
            _ => None,
        }
    }

    /// Get the variant name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Null => "null",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Int64(_) => "int64",
            HostValue::Double(_) => "double",
            HostValue::Str(_) => "string",
            HostValue::Seq(_) => "sequence",
            HostValue::View(_) => "sequence view",
            HostValue::Object(_) => "object",
        }
    }

    /// Structural equality as observed through the boundary.
    ///
    /// A live view compares equal to a by-value sequence (or another view)
    /// with the same current contents. Object handles compare by identity;
    /// per-field comparison of nested objects goes through
    /// [`crate::verify::fields_match`], which descends via the class binding.
    pub fn observed_eq(&self, other: &HostValue) -> bool {
        use HostValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Int64(a), Int64(b)) => a == b,
            (Double(a), Double(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Seq(a), Seq(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.observed_eq(y))
            }
            (View(v), other) | (other, View(v)) => match v.to_vec() {
                Ok(items) => Seq(items).observed_eq(other),
                Err(_) => false,
            },
            (Object(a), Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Default for HostValue {
    fn default() -> Self {
        HostValue::Null
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Null => write!(f, "null"),
            HostValue::Bool(b) => write!(f, "{}", b),
            HostValue::Int(i) => write!(f, "{}", i),
            HostValue::Int64(i) => write!(f, "{}", i),
            HostValue::Double(d) => write!(f, "{}", d),
            HostValue::Str(s) => write!(f, "{}", s),
            HostValue::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            HostValue::View(v) => match v.render() {
                Ok(s) => write!(f, "{}", s),
                Err(_) => write!(f, "<detached view>"),
            },
            HostValue::Object(h) => write!(f, "<{}>", h.class_name()),
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Null => write!(f, "HostValue::Null"),
            HostValue::Bool(b) => write!(f, "HostValue::Bool({})", b),
            HostValue::Int(i) => write!(f, "HostValue::Int({})", i),
            HostValue::Int64(i) => write!(f, "HostValue::Int64({})", i),
            HostValue::Double(d) => write!(f, "HostValue::Double({})", d),
            HostValue::Str(s) => write!(f, "HostValue::Str({:?})", s),
            HostValue::Seq(items) => f.debug_tuple("HostValue::Seq").field(items).finish(),
            HostValue::View(v) => write!(f, "HostValue::View({} of {})", v.field(), v.owner().class_name()),
            HostValue::Object(h) => write!(f, "HostValue::Object({})", h.class_name()),
        }
    }
}
