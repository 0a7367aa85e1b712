//! End-to-end boundary tests: declared control types, registered bindings,
//! live sequence views, nested metadata, and the verification harness.

use ferrule_derive::Control;
use ferrule_sdk::{
    descriptor_of, fields_match, BindingRegistry, Control as _, HostError, HostValue,
};

#[derive(Control, Clone)]
#[control(module = "fixtures")]
struct InnerControl {
    /// a double field
    p: f64,
    /// a 64-bit integer field
    q: i64,
}

impl Default for InnerControl {
    fn default() -> Self {
        Self {
            p: 2.0,
            q: 1i64 << 33,
        }
    }
}

#[derive(Control, Clone)]
#[control(module = "fixtures")]
struct OuterControl {
    /// a nested control field
    #[control(nested)]
    a: InnerControl,
    /// a integer field
    b: i32,
}

impl Default for OuterControl {
    fn default() -> Self {
        let mut a = InnerControl::default();
        a.q += 1;
        Self { a, b: 0 }
    }
}

#[derive(Control, Clone)]
#[control(module = "fixtures")]
struct SampleControl {
    /// an integer field
    foo: i32,
    /// a list of strings field
    bar: Vec<String>,
}

impl Default for SampleControl {
    fn default() -> Self {
        Self {
            foo: 1,
            bar: Vec::new(),
        }
    }
}

fn registry() -> BindingRegistry {
    let mut registry = BindingRegistry::new();
    registry.register::<InnerControl>().unwrap();
    registry.register::<OuterControl>().unwrap();
    registry.register::<SampleControl>().unwrap();
    registry
}

#[test]
fn descriptor_table_is_type_level() {
    // The table is built once and shared: repeated calls return the same
    // storage, independent of any instance.
    assert_eq!(
        InnerControl::descriptors().as_ptr(),
        InnerControl::descriptors().as_ptr()
    );

    let registry = registry();
    let binding = registry.get("InnerControl").unwrap();
    assert_eq!(binding.field_doc("p").unwrap(), "a double field");
    assert_eq!(binding.field_doc("q").unwrap(), "a 64-bit integer field");
    assert_eq!(binding.field_kind("p").unwrap().to_string(), "double");
    assert_eq!(binding.field_kind("q").unwrap().to_string(), "int64");

    // A freshly built binding answers identically.
    let fresh = InnerControl::binding();
    assert_eq!(fresh.field_doc("p").unwrap(), "a double field");
    assert_eq!(fresh.field_kind("p").unwrap().to_string(), "double");
}

#[test]
fn nested_field_reports_defining_module() {
    let registry = registry();
    let binding = registry.get("OuterControl").unwrap();

    assert_eq!(binding.field_module("a").unwrap(), Some("fixtures"));
    assert_eq!(binding.field_kind("a").unwrap().to_string(), "InnerControl");
    // Scalar fields carry no module.
    assert_eq!(binding.field_module("b").unwrap(), None);

    // Stable regardless of how many instances exist.
    let _one = registry.instantiate("OuterControl").unwrap();
    let _two = registry.instantiate("OuterControl").unwrap();
    assert_eq!(binding.field_module("a").unwrap(), Some("fixtures"));

    // The module identifier resolves the nested type's own descriptor set.
    let nested = registry.get("InnerControl").unwrap();
    assert_eq!(nested.module(), "fixtures");
    assert_eq!(nested.field_names(), vec!["p", "q"]);
}

#[test]
fn descriptor_lookup_without_registry() {
    let d = descriptor_of::<SampleControl>("bar").unwrap();
    assert_eq!(d.doc(), "a list of strings field");
    assert_eq!(d.kind().to_string(), "sequence<string>");
    assert!(descriptor_of::<SampleControl>("baz").is_none());
}

#[test]
fn constructor_applies_field_defaults() {
    let registry = registry();
    let obj = registry.instantiate("SampleControl").unwrap();
    assert_eq!(obj.get_i32("foo").unwrap(), 1);
    assert_eq!(obj.seq("bar").unwrap().len().unwrap(), 0);
}

#[test]
fn outer_construction_mutates_nested_default() {
    // Outer's constructor default-constructs Inner{p: 2.0, q: 1<<33} and
    // then increments q by exactly 1; p must read back unchanged.
    let registry = registry();
    let obj = registry.instantiate("OuterControl").unwrap();

    let ok = fields_match(
        &registry,
        "OuterControl",
        obj.handle(),
        &[
            ("a.p", HostValue::Double(2.0)),
            ("a.q", HostValue::Int64((1i64 << 33) + 1)),
            ("b", HostValue::Int(0)),
        ],
    )
    .unwrap();
    assert!(ok);
}

#[test]
fn sequence_append_and_reread() {
    let registry = registry();
    let obj = registry.instantiate("SampleControl").unwrap();

    let view = obj.seq("bar").unwrap();
    assert_eq!(view.len().unwrap(), 0);
    view.append(HostValue::str("x")).unwrap();
    view.append(HostValue::str("y")).unwrap();

    assert_eq!(view.len().unwrap(), 2);
    assert_eq!(view.get(0).unwrap().as_str(), Some("x"));
    assert_eq!(view.get(1).unwrap().as_str(), Some("y"));
    assert_eq!(view.render().unwrap(), "[x, y]");

    // Reading the field again yields a new view that reflects both appends.
    let fresh = obj.seq("bar").unwrap();
    assert_eq!(fresh.len().unwrap(), 2);
    assert_eq!(fresh.get(0).unwrap().as_str(), Some("x"));
    assert_eq!(fresh.get(1).unwrap().as_str(), Some("y"));
}

#[test]
fn sequence_set_then_get_across_views() {
    let registry = registry();
    let obj = registry.instantiate("SampleControl").unwrap();

    let view = obj.seq("bar").unwrap();
    view.append(HostValue::str("a")).unwrap();
    view.append(HostValue::str("b")).unwrap();

    view.set(1, HostValue::str("c")).unwrap();
    assert_eq!(view.get(1).unwrap().as_str(), Some("c"));
    // Same answer through a newly obtained view.
    assert_eq!(obj.seq("bar").unwrap().get(1).unwrap().as_str(), Some("c"));
    // Prior index unaffected.
    assert_eq!(view.get(0).unwrap().as_str(), Some("a"));
}

#[test]
fn sequence_out_of_range() {
    let registry = registry();
    let obj = registry.instantiate("SampleControl").unwrap();
    let view = obj.seq("bar").unwrap();

    // No index is valid on an empty sequence.
    assert_eq!(
        view.get(0).unwrap_err(),
        HostError::IndexOutOfRange { index: 0, len: 0 }
    );

    view.append(HostValue::str("only")).unwrap();
    assert_eq!(
        view.get(1).unwrap_err(),
        HostError::IndexOutOfRange { index: 1, len: 1 }
    );
    assert_eq!(
        view.set(5, HostValue::str("nope")).unwrap_err(),
        HostError::IndexOutOfRange { index: 5, len: 1 }
    );
    // Failed writes leave the storage untouched.
    assert_eq!(view.render().unwrap(), "[only]");
}

#[test]
fn sequence_element_type_is_enforced() {
    let registry = registry();
    let obj = registry.instantiate("SampleControl").unwrap();
    let view = obj.seq("bar").unwrap();
    view.append(HostValue::str("s")).unwrap();

    // A double is not a string element, on write or append.
    assert!(matches!(
        view.set(0, HostValue::Double(1.0)).unwrap_err(),
        HostError::TypeMismatch { .. }
    ));
    assert!(matches!(
        view.append(HostValue::Int(2)).unwrap_err(),
        HostError::TypeMismatch { .. }
    ));
}

#[test]
fn whole_sequence_replacement() {
    let registry = registry();
    let obj = registry.instantiate("SampleControl").unwrap();

    obj.set(
        "bar",
        HostValue::Seq(vec![HostValue::str("p"), HostValue::str("q")]),
    )
    .unwrap();
    assert_eq!(obj.seq("bar").unwrap().render().unwrap(), "[p, q]");

    // Assigning another object's live view copies its current contents.
    let other = registry.instantiate("SampleControl").unwrap();
    other.set("bar", obj.get("bar").unwrap()).unwrap();
    obj.seq("bar").unwrap().set(0, HostValue::str("r")).unwrap();
    assert_eq!(other.seq("bar").unwrap().render().unwrap(), "[p, q]");
    assert_eq!(obj.seq("bar").unwrap().render().unwrap(), "[r, q]");
}

#[test]
fn view_keeps_owner_alive_after_bound_object_drops() {
    let registry = registry();
    let view = {
        let obj = registry.instantiate("SampleControl").unwrap();
        obj.seq("bar").unwrap()
    };
    // The bound object is gone; the view still reaches the storage.
    view.append(HostValue::str("alive")).unwrap();
    assert_eq!(view.render().unwrap(), "[alive]");
}

#[test]
fn nested_read_is_a_snapshot() {
    let registry = registry();
    let obj = registry.instantiate("OuterControl").unwrap();

    let snapshot = obj.object("a").unwrap();
    let inner_binding = registry.get("InnerControl").unwrap();
    let snap_obj = inner_binding.bind(snapshot).unwrap();
    snap_obj.set("p", HostValue::Double(9.0)).unwrap();

    // Mutating the snapshot does not touch the outer object's storage.
    let ok = fields_match(
        &registry,
        "OuterControl",
        obj.handle(),
        &[("a.p", HostValue::Double(2.0))],
    )
    .unwrap();
    assert!(ok);
}

#[test]
fn nested_write_replaces_by_value() {
    let registry = registry();
    let obj = registry.instantiate("OuterControl").unwrap();

    let replacement = InnerControl { p: 5.0, q: 7 };
    obj.set(
        "a",
        ferrule_sdk::HostField::to_host(&replacement),
    )
    .unwrap();

    let ok = fields_match(
        &registry,
        "OuterControl",
        obj.handle(),
        &[
            ("a.p", HostValue::Double(5.0)),
            ("a.q", HostValue::Int64(7)),
        ],
    )
    .unwrap();
    assert!(ok);
}

#[test]
fn scalar_passthrough_and_type_checking() {
    let registry = registry();
    let obj = registry.instantiate("OuterControl").unwrap();

    obj.set("b", HostValue::Int(41)).unwrap();
    assert_eq!(obj.get_i32("b").unwrap(), 41);

    assert!(matches!(
        obj.set("b", HostValue::Int64(41)).unwrap_err(),
        HostError::TypeMismatch { .. }
    ));
    assert_eq!(
        obj.get("missing").unwrap_err(),
        HostError::UnknownField {
            class: "OuterControl".to_string(),
            field: "missing".to_string(),
        }
    );
}

#[test]
fn harness_matches_default_sample() {
    let registry = registry();
    let obj = registry.instantiate("SampleControl").unwrap();

    let ok = fields_match(
        &registry,
        "SampleControl",
        obj.handle(),
        &[
            ("foo", HostValue::Int(1)),
            ("bar", HostValue::Seq(vec![])),
        ],
    )
    .unwrap();
    assert!(ok);

    obj.seq("bar").unwrap().append(HostValue::str("z")).unwrap();
    let ok = fields_match(
        &registry,
        "SampleControl",
        obj.handle(),
        &[("bar", HostValue::Seq(vec![]))],
    )
    .unwrap();
    assert!(!ok);
}

#[test]
fn registry_enumerates_classes() {
    let registry = registry();
    assert_eq!(registry.len(), 3);
    let names: Vec<_> = registry.iter().map(|(_, b)| b.name()).collect();
    assert_eq!(names, vec!["InnerControl", "OuterControl", "SampleControl"]);
}
