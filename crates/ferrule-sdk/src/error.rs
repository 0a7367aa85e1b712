//! Error types for the host-boundary surface

/// Result type for boundary calls
pub type HostResult<T> = Result<T, HostError>;

/// Boundary error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// Indexed access past the end of a sequence
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Sequence length at the time of the call
        len: usize,
    },

    /// Type mismatch during conversion
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Field name not declared on the class
    #[error("unknown field '{field}' on class '{class}'")]
    UnknownField {
        /// Class name
        class: String,
        /// Requested field name
        field: String,
    },

    /// Class name not present in the registry
    #[error("unknown class '{0}'")]
    UnknownClass(String),

    /// Class name registered twice
    #[error("class '{0}' is already registered")]
    DuplicateClass(String),

    /// Internal invariant breach (bad downcast through an erased handle)
    #[error("{0}")]
    Internal(String),
}

impl From<String> for HostError {
    fn from(s: String) -> Self {
        HostError::Internal(s)
    }
}

impl From<&str> for HostError {
    fn from(s: &str) -> Self {
        HostError::Internal(s.to_string())
    }
}
