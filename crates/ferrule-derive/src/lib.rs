// ferrule-derive: derive macro for declaring control fields
//
// Provides #[derive(Control)], the declarative field-registration facility:
// one struct declaration produces the per-field descriptor table (doc
// string, type descriptor, defining module for nested fields) plus the
// boundary accessor bindings, with no runtime reflection.
//
// Example:
// ```
// use ferrule_derive::Control;
//
// #[derive(Control, Clone, Default)]
// struct ServerControl {
//     /// worker thread count
//     workers: i32,
//     /// listen addresses
//     listen: Vec<String>,
// }
// ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod control;

/// Derives the `Control` and `HostField` implementations for a
/// configuration struct.
///
/// Every field must be one of: a scalar (`bool`, `i32`, `i64`, `f64`), a
/// `String`, a sequence of those (`Vec<...>`), or another control type
/// marked `#[control(nested)]`. Every field needs a doc comment (or
/// `#[control(doc = "...")]`); the doc string becomes queryable type-level
/// metadata.
///
/// Attributes:
/// - `#[control(module = "...")]` on the struct overrides the module
///   identifier (defaults to `module_path!()` at the declaration site).
/// - `#[control(nested)]` on a field marks it as a nested control object;
///   its descriptor additionally records the nested type's defining module.
/// - `#[control(doc = "...")]` on a field overrides the doc comment.
///
/// The struct must also implement `Default` (construction applies per-field
/// defaults through it) and `Clone`.
///
/// # Example
///
/// ```ignore
/// #[derive(Control, Clone)]
/// struct OuterControl {
///     /// a nested control field
///     #[control(nested)]
///     a: InnerControl,
///     /// an integer field
///     b: i32,
/// }
///
/// impl Default for OuterControl {
///     fn default() -> Self {
///         let mut a = InnerControl::default();
///         a.q += 1;
///         Self { a, b: 0 }
///     }
/// }
/// ```
#[proc_macro_derive(Control, attributes(control))]
pub fn derive_control(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    control::expand_control(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
