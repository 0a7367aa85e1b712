// #[derive(Control)] implementation
//
// Generates the per-field descriptor table, the boundary accessor fns, and
// the Control/HostField impls for a configuration struct.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Result};

/// Shape of a declared control field, as seen by codegen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldShape {
    /// Scalar or string: direct passthrough accessors
    Plain,
    /// `Vec<scalar|String>`: getter yields a live view, setter replaces by
    /// value
    Sequence,
    /// Another control type: snapshot accessors plus a module descriptor
    Nested,
}

struct ControlField {
    ident: syn::Ident,
    ty: syn::Type,
    doc: String,
    shape: FieldShape,
}

const SCALARS: &[&str] = &["bool", "i32", "i64", "f64", "String"];

/// Expands `#[derive(Control)]`.
///
/// Input: a named-field struct declaration.
/// Output: a `const _` scope containing the lazily-built descriptor table,
/// one getter/setter fn per field (plus a projection fn per sequence
/// field), and the `Control` and `HostField` impls.
///
/// Example expansion for a sequence field `listen: Vec<String>`:
/// ```ignore
/// fn __control_project_listen<'a>(
///     control: &'a mut (dyn AnyControl + 'static),
/// ) -> HostResult<&'a mut dyn HostSeq> {
///     let control = control
///         .as_any_mut()
///         .downcast_mut::<ServerControl>()
///         .ok_or_else(|| HostError::Internal(...))?;
///     Ok(&mut control.listen)
/// }
///
/// fn __control_get_listen(handle: &ControlHandle) -> HostResult<HostValue> {
///     Ok(HostValue::View(SeqView::new(
///         handle.clone(),
///         "listen",
///         __control_project_listen,
///     )))
/// }
/// ```
pub(crate) fn expand_control(input: DeriveInput) -> Result<TokenStream> {
    let struct_ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "generic control types are not supported",
        ));
    }

    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Control can only be derived for structs",
            ));
        }
    };

    let named = match &data.fields {
        Fields::Named(named) => &named.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Control requires a struct with named fields",
            ));
        }
    };

    let module_expr = match struct_module(&input.attrs)? {
        Some(lit) => quote! { #lit },
        None => quote! { ::core::module_path!() },
    };

    let fields = named
        .iter()
        .map(parse_field)
        .collect::<Result<Vec<_>>>()?;

    let class_name = struct_ident.to_string();

    let mut entries = Vec::new();
    let mut accessors = Vec::new();
    let mut pushes = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let ControlField {
            ident, ty, doc, shape,
        } = field;
        let name = ident.to_string();

        entries.push(match shape {
            FieldShape::Nested => quote! {
                ::ferrule_sdk::FieldDescriptor::nested(
                    #name,
                    #doc,
                    <#ty as ::ferrule_sdk::HostField>::kind(),
                    <#ty as ::ferrule_sdk::Control>::MODULE,
                )
            },
            _ => quote! {
                ::ferrule_sdk::FieldDescriptor::scalar(
                    #name,
                    #doc,
                    <#ty as ::ferrule_sdk::HostField>::kind(),
                )
            },
        });

        let get_fn = format_ident!("__control_get_{}", ident);
        let set_fn = format_ident!("__control_set_{}", ident);

        let getter = match shape {
            FieldShape::Sequence => {
                let proj_fn = format_ident!("__control_project_{}", ident);
                quote! {
                    fn #proj_fn<'a>(
                        control: &'a mut (dyn ::ferrule_sdk::AnyControl + 'static),
                    ) -> ::ferrule_sdk::HostResult<&'a mut dyn ::ferrule_sdk::HostSeq> {
                        let control = control
                            .as_any_mut()
                            .downcast_mut::<#struct_ident>()
                            .ok_or_else(|| ::ferrule_sdk::HostError::Internal(
                                ::std::format!(
                                    "projection of `{}` applied to foreign class",
                                    #name,
                                ),
                            ))?;
                        ::core::result::Result::Ok(&mut control.#ident)
                    }

                    fn #get_fn(
                        handle: &::ferrule_sdk::ControlHandle,
                    ) -> ::ferrule_sdk::HostResult<::ferrule_sdk::HostValue> {
                        ::core::result::Result::Ok(::ferrule_sdk::HostValue::View(
                            ::ferrule_sdk::SeqView::new(handle.clone(), #name, #proj_fn),
                        ))
                    }
                }
            }
            _ => quote! {
                fn #get_fn(
                    handle: &::ferrule_sdk::ControlHandle,
                ) -> ::ferrule_sdk::HostResult<::ferrule_sdk::HostValue> {
                    handle.with(|control: &#struct_ident| {
                        ::ferrule_sdk::HostField::to_host(&control.#ident)
                    })
                }
            },
        };

        accessors.push(quote! {
            #getter

            fn #set_fn(
                handle: &::ferrule_sdk::ControlHandle,
                value: ::ferrule_sdk::HostValue,
            ) -> ::ferrule_sdk::HostResult<()> {
                let value = <#ty as ::ferrule_sdk::HostField>::from_host(value)?;
                handle.with_mut(|control: &mut #struct_ident| control.#ident = value)
            }
        });

        pushes.push(quote! {
            binding.push_field(
                &<#struct_ident as ::ferrule_sdk::Control>::descriptors()[#index],
                #get_fn,
                #set_fn,
            );
        });
    }

    let expanded = quote! {
        const _: () = {
            static __CONTROL_FIELDS: ::ferrule_sdk::__private::Lazy<
                ::std::vec::Vec<::ferrule_sdk::FieldDescriptor>,
            > = ::ferrule_sdk::__private::Lazy::new(|| ::std::vec![#(#entries),*]);

            #(#accessors)*

            impl ::ferrule_sdk::Control for #struct_ident {
                const CLASS_NAME: &'static str = #class_name;
                const MODULE: &'static str = #module_expr;

                fn descriptors() -> &'static [::ferrule_sdk::FieldDescriptor] {
                    __CONTROL_FIELDS.as_slice()
                }

                fn binding() -> ::ferrule_sdk::ClassBinding {
                    let mut binding = ::ferrule_sdk::ClassBinding::new(
                        Self::CLASS_NAME,
                        Self::MODULE,
                        || ::ferrule_sdk::ControlHandle::new(
                            <#struct_ident as ::core::default::Default>::default(),
                        ),
                    );
                    #(#pushes)*
                    binding
                }
            }

            impl ::ferrule_sdk::HostField for #struct_ident {
                fn kind() -> ::ferrule_sdk::FieldKind {
                    ::ferrule_sdk::FieldKind::Nested(
                        <Self as ::ferrule_sdk::Control>::CLASS_NAME,
                    )
                }

                fn to_host(&self) -> ::ferrule_sdk::HostValue {
                    ::ferrule_sdk::HostValue::Object(::ferrule_sdk::ControlHandle::new(
                        ::core::clone::Clone::clone(self),
                    ))
                }

                fn from_host(
                    value: ::ferrule_sdk::HostValue,
                ) -> ::ferrule_sdk::HostResult<Self> {
                    match value {
                        ::ferrule_sdk::HostValue::Object(handle) => {
                            handle.snapshot::<Self>()
                        }
                        other => ::core::result::Result::Err(
                            ::ferrule_sdk::HostError::TypeMismatch {
                                expected: <Self as ::ferrule_sdk::Control>::CLASS_NAME
                                    .to_string(),
                                got: other.type_name().to_string(),
                            },
                        ),
                    }
                }
            }
        };
    };

    Ok(expanded)
}

/// Extract `#[control(module = "...")]` from the struct attributes.
fn struct_module(attrs: &[syn::Attribute]) -> Result<Option<syn::LitStr>> {
    let mut module = None;
    for attr in attrs {
        if !attr.path().is_ident("control") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("module") {
                module = Some(meta.value()?.parse::<syn::LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("expected `module = \"...\"` on the struct"))
            }
        })?;
    }
    Ok(module)
}

fn parse_field(field: &syn::Field) -> Result<ControlField> {
    // Unwrap is safe: the caller only passes Fields::Named.
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "control fields must be named"))?;

    let mut nested = false;
    let mut doc_override = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("control") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("nested") {
                nested = true;
                Ok(())
            } else if meta.path.is_ident("doc") {
                doc_override = Some(meta.value()?.parse::<syn::LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("expected `nested` or `doc = \"...\"` on a field"))
            }
        })?;
    }

    let doc = doc_override.or_else(|| doc_comment(&field.attrs)).ok_or_else(|| {
        syn::Error::new_spanned(
            field,
            format!(
                "control field `{}` has no documentation; add a doc comment or #[control(doc = \"...\")]",
                ident
            ),
        )
    })?;

    let shape = if nested {
        FieldShape::Nested
    } else {
        classify(&field.ty)?
    };

    Ok(ControlField {
        ident,
        ty: field.ty.clone(),
        doc,
        shape,
    })
}

/// Collect a field's doc comment lines into one string.
pub(crate) fn doc_comment(attrs: &[syn::Attribute]) -> Option<String> {
    let mut lines = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let syn::Meta::NameValue(nv) = &attr.meta {
            if let syn::Expr::Lit(expr) = &nv.value {
                if let syn::Lit::Str(lit) = &expr.lit {
                    lines.push(lit.value().trim().to_string());
                }
            }
        }
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Classify a non-nested field type: scalar/string or sequence.
pub(crate) fn classify(ty: &syn::Type) -> Result<FieldShape> {
    let segment = leaf_segment(ty)?;
    let name = segment.ident.to_string();

    if SCALARS.contains(&name.as_str()) {
        if !segment.arguments.is_empty() {
            return Err(unsupported(ty));
        }
        return Ok(FieldShape::Plain);
    }

    if name == "Vec" {
        let elem = vec_element(segment).ok_or_else(|| unsupported(ty))?;
        let elem_segment = leaf_segment(elem)?;
        if SCALARS.contains(&elem_segment.ident.to_string().as_str()) {
            return Ok(FieldShape::Sequence);
        }
        return Err(syn::Error::new_spanned(
            elem,
            "sequence elements must be scalars (bool, i32, i64, f64) or String",
        ));
    }

    Err(unsupported(ty))
}

fn leaf_segment(ty: &syn::Type) -> Result<&syn::PathSegment> {
    match ty {
        syn::Type::Path(tp) if tp.qself.is_none() => {
            tp.path.segments.last().ok_or_else(|| unsupported(ty))
        }
        _ => Err(unsupported(ty)),
    }
}

fn vec_element(segment: &syn::PathSegment) -> Option<&syn::Type> {
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            syn::GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    }
}

fn unsupported(ty: &syn::Type) -> syn::Error {
    syn::Error::new_spanned(
        ty,
        "unsupported control field type: expected a scalar (bool, i32, i64, f64), \
         String, Vec of those, or a nested control marked #[control(nested)]",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse::Parser;
    use syn::parse_quote;

    #[test]
    fn test_classify_scalars() {
        let ty: syn::Type = parse_quote!(i32);
        assert_eq!(classify(&ty).unwrap(), FieldShape::Plain);
        let ty: syn::Type = parse_quote!(f64);
        assert_eq!(classify(&ty).unwrap(), FieldShape::Plain);
        let ty: syn::Type = parse_quote!(String);
        assert_eq!(classify(&ty).unwrap(), FieldShape::Plain);
    }

    #[test]
    fn test_classify_sequences() {
        let ty: syn::Type = parse_quote!(Vec<String>);
        assert_eq!(classify(&ty).unwrap(), FieldShape::Sequence);
        let ty: syn::Type = parse_quote!(Vec<i64>);
        assert_eq!(classify(&ty).unwrap(), FieldShape::Sequence);
    }

    #[test]
    fn test_classify_rejects_unknown_types() {
        let ty: syn::Type = parse_quote!(std::collections::HashMap<String, i32>);
        assert!(classify(&ty).is_err());
        let ty: syn::Type = parse_quote!(Vec<Vec<i32>>);
        assert!(classify(&ty).is_err());
        let ty: syn::Type = parse_quote!(&'static str);
        assert!(classify(&ty).is_err());
    }

    #[test]
    fn test_doc_comment_joining() {
        let field: syn::Field = syn::Field::parse_named
            .parse2(quote! {
                /// first line
                /// second line
                x: i32
            })
            .unwrap();
        assert_eq!(
            doc_comment(&field.attrs).unwrap(),
            "first line\nsecond line"
        );
    }

    #[test]
    fn test_expand_simple_struct() {
        let input: DeriveInput = parse_quote! {
            struct SampleControl {
                /// an integer field
                foo: i32,
                /// a list of strings field
                bar: Vec<String>,
            }
        };
        let tokens = expand_control(input).unwrap().to_string();
        assert!(tokens.contains("impl :: ferrule_sdk :: Control for SampleControl"));
        assert!(tokens.contains("__control_project_bar"));
        assert!(tokens.contains("\"an integer field\""));
    }

    #[test]
    fn test_expand_requires_docs() {
        let input: DeriveInput = parse_quote! {
            struct Undocumented {
                foo: i32,
            }
        };
        let err = expand_control(input).unwrap_err();
        assert!(err.to_string().contains("no documentation"));
    }

    #[test]
    fn test_expand_rejects_generics() {
        let input: DeriveInput = parse_quote! {
            struct Generic<T> {
                /// field
                foo: T,
            }
        };
        assert!(expand_control(input).is_err());
    }

    #[test]
    fn test_expand_rejects_enums() {
        let input: DeriveInput = parse_quote! {
            enum NotAControl {
                A,
            }
        };
        assert!(expand_control(input).is_err());
    }

    #[test]
    fn test_nested_field_records_module() {
        let input: DeriveInput = parse_quote! {
            struct OuterControl {
                /// a nested control field
                #[control(nested)]
                a: InnerControl,
                /// a integer field
                b: i32,
            }
        };
        let tokens = expand_control(input).unwrap().to_string();
        assert!(tokens.contains("FieldDescriptor :: nested"));
        assert!(tokens.contains("InnerControl as :: ferrule_sdk :: Control > :: MODULE"));
    }

    #[test]
    fn test_module_override() {
        let input: DeriveInput = parse_quote! {
            #[control(module = "fixtures")]
            struct Named {
                /// field
                x: i32,
            }
        };
        let tokens = expand_control(input).unwrap().to_string();
        assert!(tokens.contains("\"fixtures\""));
    }
}
