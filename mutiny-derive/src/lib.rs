//! Derive macros for the Mutiny fixture generator
//!
//! This crate provides the `Payload` derive, which describes a struct's
//! fields to Mutiny through a statically built descriptor table.

use proc_macro::TokenStream;

mod derive;

/// Derive macro for implementing the `Payload` trait
///
/// Every named field becomes a payload field, in declaration order. Fields
/// whose type is `CandidateSet` are candidate fields and can be switched with
/// `Payload::select`; any other field is a plain field contributing exactly
/// one value, serialized through `serde::Serialize`.
///
/// # Basic Usage
///
/// ```rust
/// use mutiny::{CandidateSet, Payload};
///
/// #[derive(Clone, Payload)]
/// struct Withdrawal {
///     country_code: CandidateSet,
///     currency: CandidateSet,
///     version: u32,
/// }
/// ```
///
/// # Supported Attributes
///
/// - `#[mutiny(skip)]`: leave the field out of the payload
/// - `#[mutiny(rename = "Name")]`: use a different structural name
/// - `#[mutiny(candidates)]`: treat the field as a candidate set, for type
///   aliases the derive cannot recognise
/// - `#[mutiny(plain)]`: treat the field as a plain value
///
/// Generic structs, tuple structs, enums and unions are rejected.
#[proc_macro_derive(Payload, attributes(mutiny))]
pub fn derive_payload(input: TokenStream) -> TokenStream {
    derive::derive_payload_impl(input)
}
