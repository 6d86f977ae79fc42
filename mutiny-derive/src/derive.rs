//! Derive macro implementation for the Payload trait
//!
//! The generated code builds a constant table of field descriptors, one per
//! named field, and implements `mutiny::Payload` by walking that table.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse::Parser;
use syn::{
    Attribute, Data, DeriveInput, Error, Field, Fields, Lit, Meta, MetaNameValue, Result, Type,
    parse_macro_input,
};

/// Main entry point for the Payload derive macro
pub fn derive_payload_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_payload_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// How a field takes part in generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Candidates,
    Plain,
}

/// Options collected from `#[mutiny(...)]` on a field
#[derive(Debug, Default, PartialEq)]
struct FieldOptions {
    skip: bool,
    kind: Option<FieldKind>,
    rename: Option<String>,
}

/// Generate the Payload implementation for the given input
fn generate_payload_impl(input: &DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Payload derive does not support generic parameters",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields_named) => fields_named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(Error::new_spanned(
                    input,
                    "Payload derive requires named fields",
                ));
            }
        },
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Payload derive is not supported for enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Payload derive is not supported for unions",
            ));
        }
    };

    let mut accessors = Vec::new();
    let mut descriptors = Vec::new();
    let mut seen_names: Vec<String> = Vec::new();

    for field in fields {
        let options = parse_field_options(field)?;
        if options.skip {
            continue;
        }

        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "expected a named field"))?;
        let field_name = options
            .rename
            .clone()
            .unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_string());
        if seen_names.contains(&field_name) {
            return Err(Error::new_spanned(
                field,
                format!("duplicate payload field name `{}`", field_name),
            ));
        }
        seen_names.push(field_name.clone());

        let kind = options.kind.unwrap_or_else(|| detect_kind(&field.ty));

        let read_fn = format_ident!("__mutiny_read_{}", ident);
        let (read_body, mut_entry) = match kind {
            FieldKind::Candidates => {
                let mut_fn = format_ident!("__mutiny_candidates_{}", ident);
                accessors.push(quote! {
                    fn #mut_fn(payload: &mut #name) -> &mut mutiny::CandidateSet {
                        &mut payload.#ident
                    }
                });
                (
                    quote! { mutiny::FieldRef::Candidates(&payload.#ident) },
                    quote! { ::core::option::Option::Some(#mut_fn) },
                )
            }
            FieldKind::Plain => (
                quote! { mutiny::FieldRef::plain(&payload.#ident) },
                quote! { ::core::option::Option::None },
            ),
        };

        accessors.push(quote! {
            fn #read_fn(payload: &#name) -> mutiny::FieldRef<'_> {
                #read_body
            }
        });
        descriptors.push(quote! {
            mutiny::FieldDescriptor {
                name: #field_name,
                read: #read_fn,
                candidates_mut: #mut_entry,
            }
        });
    }

    Ok(quote! {
        #[allow(non_snake_case)]
        const _: () = {
            #(#accessors)*

            const DESCRIPTORS: &[mutiny::FieldDescriptor<#name>] = &[
                #(#descriptors,)*
            ];

            impl mutiny::Payload for #name {
                fn fields(
                    &self,
                ) -> ::std::vec::Vec<(::std::borrow::Cow<'_, str>, mutiny::FieldRef<'_>)> {
                    mutiny::walk_descriptors(DESCRIPTORS, self)
                }

                fn candidate_set_mut(
                    &mut self,
                    name: &str,
                ) -> ::core::result::Result<&mut mutiny::CandidateSet, mutiny::FixtureError> {
                    mutiny::find_candidate_set(DESCRIPTORS, self, name)
                }
            }
        };
    })
}

/// A field is a candidate field when its type path ends in `CandidateSet`
fn detect_kind(ty: &Type) -> FieldKind {
    if let Type::Path(type_path) = ty
        && type_path.qself.is_none()
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == "CandidateSet"
        && segment.arguments.is_empty()
    {
        return FieldKind::Candidates;
    }
    FieldKind::Plain
}

/// Parse every `#[mutiny(...)]` attribute on a field
fn parse_field_options(field: &Field) -> Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in &field.attrs {
        if attr.path().is_ident("mutiny") {
            parse_mutiny_attribute(attr, &mut options)?;
        }
    }
    Ok(options)
}

/// Parse a single #[mutiny(...)] attribute
fn parse_mutiny_attribute(attr: &Attribute, options: &mut FieldOptions) -> Result<()> {
    let Meta::List(list) = &attr.meta else {
        return Err(Error::new_spanned(attr, "mutiny attribute must be a list"));
    };

    let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
    let parsed = parser.parse2(list.tokens.clone())?;

    for meta in parsed {
        match &meta {
            Meta::Path(path) if path.is_ident("skip") => options.skip = true,
            Meta::Path(path) if path.is_ident("plain") => {
                set_kind(options, FieldKind::Plain, &meta)?
            }
            Meta::Path(path) if path.is_ident("candidates") => {
                set_kind(options, FieldKind::Candidates, &meta)?
            }
            Meta::NameValue(MetaNameValue { path, value, .. }) if path.is_ident("rename") => {
                options.rename = Some(parse_string_literal(value)?);
            }
            _ => {
                return Err(Error::new_spanned(
                    &meta,
                    "Unsupported mutiny attribute, expected `skip`, `plain`, `candidates` or `rename = \"...\"`",
                ));
            }
        }
    }

    Ok(())
}

fn set_kind(options: &mut FieldOptions, kind: FieldKind, meta: &Meta) -> Result<()> {
    match options.kind {
        Some(existing) if existing != kind => Err(Error::new_spanned(
            meta,
            "`plain` and `candidates` cannot both be set",
        )),
        _ => {
            options.kind = Some(kind);
            Ok(())
        }
    }
}

fn parse_string_literal(value: &syn::Expr) -> Result<String> {
    if let syn::Expr::Lit(syn::ExprLit {
        lit: Lit::Str(lit_str),
        ..
    }) = value
    {
        let text = lit_str.value();
        if !text.is_empty() {
            return Ok(text);
        }
    }

    Err(Error::new_spanned(
        value,
        "rename must be a non-empty string literal",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_detect_kind() {
        assert_eq!(detect_kind(&parse_quote!(CandidateSet)), FieldKind::Candidates);
        assert_eq!(
            detect_kind(&parse_quote!(mutiny::CandidateSet)),
            FieldKind::Candidates
        );
        assert_eq!(detect_kind(&parse_quote!(String)), FieldKind::Plain);
        assert_eq!(detect_kind(&parse_quote!(Vec<CandidateSet>)), FieldKind::Plain);
        assert_eq!(detect_kind(&parse_quote!(&'static str)), FieldKind::Plain);
    }

    #[test]
    fn test_parse_field_options() {
        let field: Field = parse_quote! {
            #[mutiny(plain, rename = "BankAccount")]
            bank_account: CandidateSet
        };
        let options = parse_field_options(&field).unwrap();
        assert_eq!(options.kind, Some(FieldKind::Plain));
        assert_eq!(options.rename.as_deref(), Some("BankAccount"));
        assert!(!options.skip);

        let field: Field = parse_quote! {
            #[mutiny(skip)]
            internal: u32
        };
        assert!(parse_field_options(&field).unwrap().skip);
    }

    #[test]
    fn test_conflicting_and_unknown_options() {
        let field: Field = parse_quote! {
            #[mutiny(plain, candidates)]
            value: CandidateSet
        };
        assert!(parse_field_options(&field).is_err());

        let field: Field = parse_quote! {
            #[mutiny(flatten)]
            value: CandidateSet
        };
        assert!(parse_field_options(&field).is_err());

        let field: Field = parse_quote! {
            #[mutiny(rename = "")]
            value: CandidateSet
        };
        assert!(parse_field_options(&field).is_err());
    }

    #[test]
    fn test_rejects_unsupported_inputs() {
        let generic: DeriveInput = parse_quote! {
            struct Wrapper<T> { inner: T }
        };
        assert!(generate_payload_impl(&generic).is_err());

        let tuple: DeriveInput = parse_quote! {
            struct Pair(CandidateSet, CandidateSet);
        };
        assert!(generate_payload_impl(&tuple).is_err());

        let enumeration: DeriveInput = parse_quote! {
            enum Choice { A, B }
        };
        assert!(generate_payload_impl(&enumeration).is_err());
    }

    #[test]
    fn test_rejects_duplicate_field_names() {
        let renamed: DeriveInput = parse_quote! {
            struct Dup {
                #[mutiny(rename = "a")]
                x: CandidateSet,
                a: CandidateSet,
            }
        };
        let err = generate_payload_impl(&renamed).unwrap_err();
        assert!(err.to_string().contains("duplicate payload field name `a`"));

        let raw: DeriveInput = parse_quote! {
            struct Keyword {
                r#type: CandidateSet,
                #[mutiny(rename = "type")]
                kind: CandidateSet,
            }
        };
        assert!(generate_payload_impl(&raw).is_err());

        let skipped: DeriveInput = parse_quote! {
            struct Skipped {
                #[mutiny(rename = "a")]
                x: CandidateSet,
                #[mutiny(skip)]
                a: CandidateSet,
            }
        };
        assert!(generate_payload_impl(&skipped).is_ok());
    }

    #[test]
    fn test_generated_descriptor_table() {
        let input: DeriveInput = parse_quote! {
            struct Withdrawal {
                country_code: CandidateSet,
                #[mutiny(rename = "Amount")]
                amount: u64,
                #[mutiny(skip)]
                internal: bool,
            }
        };

        let tokens = generate_payload_impl(&input).unwrap().to_string();
        assert!(tokens.contains("__mutiny_read_country_code"));
        assert!(tokens.contains("__mutiny_candidates_country_code"));
        assert!(tokens.contains("\"Amount\""));
        assert!(!tokens.contains("__mutiny_candidates_amount"));
        assert!(!tokens.contains("internal"));
    }
}
