//! Boundary exposure — class bindings and the host-visible registry
//!
//! For each control type the binding records a default constructor, one
//! getter/setter pair per field, and the type-level metadata table. The
//! registry is the host environment's view of the registered classes:
//! construct by name, then get/set fields and query metadata through the
//! bound object.

use rustc_hash::FxHashMap;

use crate::error::{HostError, HostResult};
use crate::field::{Control, FieldDescriptor, FieldKind};
use crate::handle::ControlHandle;
use crate::value::HostValue;
use crate::view::SeqView;

/// Field read accessor registered for the host side.
///
/// For scalar/string fields this converts the storage out by value; for
/// nested fields it snapshots; for sequence fields it returns a fresh
/// [`SeqView`] bound to the instance.
pub type FieldGetter = fn(&ControlHandle) -> HostResult<HostValue>;

/// Field write accessor registered for the host side.
///
/// Scalar/string writes pass through to storage; nested writes replace the
/// whole nested value; sequence writes replace the whole sequence by value.
pub type FieldSetter = fn(&ControlHandle, HostValue) -> HostResult<()>;

// ============================================================================
// FieldBinding / ClassBinding
// ============================================================================

/// One field's boundary binding: its descriptor plus accessors.
#[derive(Debug)]
pub struct FieldBinding {
    descriptor: &'static FieldDescriptor,
    getter: FieldGetter,
    setter: FieldSetter,
}

impl FieldBinding {
    /// Type-level metadata for the field
    pub fn descriptor(&self) -> &'static FieldDescriptor {
        self.descriptor
    }
}

/// Boundary binding for one control type.
///
/// Built once per type (by `#[derive(Control)]`, or by hand for explicit
/// per-field registration) and registered with a [`BindingRegistry`]. All
/// metadata queries here are type-level: they answer identically for every
/// instance and every repeated call.
#[derive(Debug)]
pub struct ClassBinding {
    name: &'static str,
    module: &'static str,
    construct: fn() -> ControlHandle,
    fields: Vec<FieldBinding>,
}

impl ClassBinding {
    /// Start a binding for `name`, defined in `module`, with the given
    /// default constructor
    pub fn new(name: &'static str, module: &'static str, construct: fn() -> ControlHandle) -> Self {
        Self {
            name,
            module,
            construct,
            fields: Vec::new(),
        }
    }

    /// Register one field's accessors, in declaration order
    pub fn push_field(
        &mut self,
        descriptor: &'static FieldDescriptor,
        getter: FieldGetter,
        setter: FieldSetter,
    ) {
        self.fields.push(FieldBinding {
            descriptor,
            getter,
            setter,
        });
    }

    /// Class name exposed to the host
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Module that defines the class
    pub fn module(&self) -> &'static str {
        self.module
    }

    /// Field bindings in declaration order
    pub fn fields(&self) -> &[FieldBinding] {
        &self.fields
    }

    /// Declared field names, in declaration order
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.descriptor.name()).collect()
    }

    /// Look up one field's binding
    fn field(&self, name: &str) -> HostResult<&FieldBinding> {
        self.fields
            .iter()
            .find(|f| f.descriptor.name() == name)
            .ok_or_else(|| HostError::UnknownField {
                class: self.name.to_string(),
                field: name.to_string(),
            })
    }

    /// Look up one field's descriptor
    pub fn descriptor(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.descriptor.name() == name)
            .map(|f| f.descriptor)
    }

    /// Documentation string for `field`
    pub fn field_doc(&self, name: &str) -> HostResult<&'static str> {
        Ok(self.field(name)?.descriptor.doc())
    }

    /// Type descriptor for `field`
    pub fn field_kind(&self, name: &str) -> HostResult<&FieldKind> {
        Ok(self.field(name)?.descriptor.kind())
    }

    /// Defining module of `field`'s nested type; `None` for non-nested
    /// fields
    pub fn field_module(&self, name: &str) -> HostResult<Option<&'static str>> {
        Ok(self.field(name)?.descriptor.module())
    }

    /// Construct a default instance
    pub fn construct(&self) -> ControlHandle {
        (self.construct)()
    }

    /// Construct a default instance wrapped as a bound object
    pub fn instantiate(&self) -> BoundObject<'_> {
        BoundObject {
            handle: self.construct(),
            binding: self,
        }
    }

    /// Wrap an existing instance of this class
    pub fn bind(&self, handle: ControlHandle) -> HostResult<BoundObject<'_>> {
        if handle.class_name() != self.name {
            return Err(HostError::TypeMismatch {
                expected: self.name.to_string(),
                got: handle.class_name().to_string(),
            });
        }
        Ok(BoundObject {
            handle,
            binding: self,
        })
    }
}

// ============================================================================
// BoundObject
// ============================================================================

/// A control object instance paired with its class binding — the handle the
/// host environment actually manipulates.
#[derive(Debug)]
pub struct BoundObject<'a> {
    handle: ControlHandle,
    binding: &'a ClassBinding,
}

impl<'a> BoundObject<'a> {
    /// Read a field. Scalars and strings come out by value, nested fields
    /// as snapshots, sequence fields as live views.
    pub fn get(&self, field: &str) -> HostResult<HostValue> {
        (self.binding.field(field)?.getter)(&self.handle)
    }

    /// Write a field
    pub fn set(&self, field: &str, value: HostValue) -> HostResult<()> {
        (self.binding.field(field)?.setter)(&self.handle, value)
    }

    /// Read a field as bool
    pub fn get_bool(&self, field: &str) -> HostResult<bool> {
        let value = self.get(field)?;
        value.as_bool().ok_or_else(|| HostError::TypeMismatch {
            expected: "bool".to_string(),
            got: value.type_name().to_string(),
        })
    }

    /// Read a field as i32
    pub fn get_i32(&self, field: &str) -> HostResult<i32> {
        let value = self.get(field)?;
        value.as_i32().ok_or_else(|| HostError::TypeMismatch {
            expected: "int".to_string(),
            got: value.type_name().to_string(),
        })
    }

    /// Read a field as i64
    pub fn get_i64(&self, field: &str) -> HostResult<i64> {
        let value = self.get(field)?;
        value.as_i64().ok_or_else(|| HostError::TypeMismatch {
            expected: "int64".to_string(),
            got: value.type_name().to_string(),
        })
    }

    /// Read a field as f64
    pub fn get_f64(&self, field: &str) -> HostResult<f64> {
        let value = self.get(field)?;
        value.as_f64().ok_or_else(|| HostError::TypeMismatch {
            expected: "double".to_string(),
            got: value.type_name().to_string(),
        })
    }

    /// Read a field as an owned string
    pub fn get_string(&self, field: &str) -> HostResult<String> {
        let value = self.get(field)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| HostError::TypeMismatch {
                expected: "string".to_string(),
                got: value.type_name().to_string(),
            })
    }

    /// Read a sequence field as a live view
    pub fn seq(&self, field: &str) -> HostResult<SeqView> {
        let value = self.get(field)?;
        match value {
            HostValue::View(view) => Ok(view),
            other => Err(HostError::TypeMismatch {
                expected: "sequence view".to_string(),
                got: other.type_name().to_string(),
            }),
        }
    }

    /// Read a nested field as a snapshot handle
    pub fn object(&self, field: &str) -> HostResult<ControlHandle> {
        let value = self.get(field)?;
        match value {
            HostValue::Object(handle) => Ok(handle),
            other => Err(HostError::TypeMismatch {
                expected: "object".to_string(),
                got: other.type_name().to_string(),
            }),
        }
    }

    /// Class name
    pub fn class_name(&self) -> &'static str {
        self.binding.name()
    }

    /// The class binding (metadata queries)
    pub fn binding(&self) -> &'a ClassBinding {
        self.binding
    }

    /// The underlying instance handle
    pub fn handle(&self) -> &ControlHandle {
        &self.handle
    }
}

// ============================================================================
// BindingRegistry
// ============================================================================

/// Registry of class bindings — the host environment's class table.
pub struct BindingRegistry {
    bindings: Vec<ClassBinding>,
    name_to_id: FxHashMap<&'static str, usize>,
}

impl BindingRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            name_to_id: FxHashMap::default(),
        }
    }

    /// Register a control type, exposing its constructor, accessors, and
    /// metadata queries to the host
    pub fn register<C: Control>(&mut self) -> HostResult<usize> {
        self.register_binding(C::binding())
    }

    /// Register a hand-built binding
    pub fn register_binding(&mut self, binding: ClassBinding) -> HostResult<usize> {
        if self.name_to_id.contains_key(binding.name()) {
            return Err(HostError::DuplicateClass(binding.name().to_string()));
        }
        let id = self.bindings.len();
        self.name_to_id.insert(binding.name(), id);
        self.bindings.push(binding);
        Ok(id)
    }

    /// Get a binding by class name
    pub fn get(&self, name: &str) -> Option<&ClassBinding> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.bindings.get(*id))
    }

    /// Get a binding by registration id
    pub fn get_by_id(&self, id: usize) -> Option<&ClassBinding> {
        self.bindings.get(id)
    }

    /// Construct a default instance of a registered class
    pub fn instantiate(&self, name: &str) -> HostResult<BoundObject<'_>> {
        let binding = self
            .get(name)
            .ok_or_else(|| HostError::UnknownClass(name.to_string()))?;
        Ok(binding.instantiate())
    }

    /// Iterate over all bindings with their ids
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ClassBinding)> {
        self.bindings.iter().enumerate()
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
