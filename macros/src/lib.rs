//! Derive macros for the storefront state engine
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Implements `storefront_core::Action` for an action enum
//!
//! # Example
//!
//! ```ignore
//! use storefront_macros::Action;
//!
//! #[derive(Action, Clone, Debug, PartialEq)]
//! enum GroupAction {
//!     #[intent("[Organization Hierarchies] Load Groups")]
//!     LoadGroups,
//!
//!     #[success("[Organization Hierarchies API] Load Groups Success")]
//!     LoadGroupsSuccess { groups: Vec<Group> },
//!
//!     #[failure("[Organization Hierarchies API] Load Groups Fail")]
//!     LoadGroupsFail { error: HttpError },
//! }
//!
//! assert_eq!(GroupAction::LoadGroups.action_type(), "[Organization Hierarchies] Load Groups");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use std::collections::HashSet;
use syn::{Data, DeriveInput, Fields, LitStr, Variant, parse_macro_input};

const CLASSES: [&str; 4] = ["intent", "success", "failure", "event"];

/// How one variant participates in the generated impl
enum Role {
    /// Variant with its own type string and class
    Own { class: &'static str, type_name: LitStr },
    /// Single-field tuple variant wrapping another action enum
    Nested,
}

/// Derive macro for action enums
///
/// Implements `storefront_core::action::Action` and adds two inherent items:
/// - `ACTION_TYPES` - the type strings declared directly on this enum
/// - `action_types()` - those plus the type strings of nested enums
///
/// # Attributes
///
/// Every variant carries exactly one of:
///
/// - `#[intent("...")]` - starts an asynchronous request
/// - `#[success("...")]` - resolves a request
/// - `#[failure("...")]` - fails a request; the variant needs an `error: HttpError` field
/// - `#[event("...")]` - a synchronous state change
/// - `#[nested]` - a one-field tuple variant wrapping another action enum
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A variant has no class attribute or more than one
/// - A failure variant has no named `error` field
/// - Two variants declare the same type string
///
/// # Example
///
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// enum AppAction {
///     #[nested]
///     Account(AccountAction),
///
///     #[nested]
///     Basket(BasketAction),
/// }
///
/// let all = AppAction::action_types();
/// ```
#[proc_macro_derive(Action, attributes(intent, success, failure, event, nested))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_action(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(error) => error.to_compile_error().into(),
    }
}

fn expand_action(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Action)] can only be used on enums",
        ));
    };

    let mut seen = HashSet::new();
    let mut type_arms = Vec::new();
    let mut class_arms = Vec::new();
    let mut error_arms = Vec::new();
    let mut own_types = Vec::new();
    let mut nested_types = Vec::new();

    for variant in &data_enum.variants {
        let ident = &variant.ident;
        match variant_role(variant)? {
            Role::Own { class, type_name } => {
                if !seen.insert(type_name.value()) {
                    return Err(syn::Error::new_spanned(
                        &type_name,
                        format!("duplicate action type \"{}\"", type_name.value()),
                    ));
                }
                let pattern = wildcard_pattern(variant);
                let class_ident = class_variant(class);
                type_arms.push(quote! { #pattern => #type_name, });
                class_arms.push(quote! {
                    #pattern => ::storefront_core::action::ActionClass::#class_ident,
                });
                if class == "failure" {
                    error_arms.push(failure_error_arm(variant)?);
                }
                own_types.push(type_name);
            },
            Role::Nested => {
                let inner = nested_type(variant)?;
                type_arms.push(quote! {
                    Self::#ident(inner) => ::storefront_core::action::Action::action_type(inner),
                });
                class_arms.push(quote! {
                    Self::#ident(inner) => ::storefront_core::action::Action::class(inner),
                });
                error_arms.push(quote! {
                    Self::#ident(inner) => ::storefront_core::action::Action::error(inner),
                });
                nested_types.push(inner);
            },
        }
    }

    Ok(quote! {
        impl #impl_generics ::storefront_core::action::Action for #name #ty_generics #where_clause {
            fn action_type(&self) -> &'static str {
                match self {
                    #(#type_arms)*
                }
            }

            fn class(&self) -> ::storefront_core::action::ActionClass {
                match self {
                    #(#class_arms)*
                }
            }

            #[allow(unreachable_patterns)]
            fn error(&self) -> ::std::option::Option<&::storefront_core::error::HttpError> {
                match self {
                    #(#error_arms)*
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl #impl_generics #name #ty_generics #where_clause {
            /// Action type strings declared directly on this enum
            pub const ACTION_TYPES: &'static [&'static str] = &[#(#own_types),*];

            /// Every action type string reachable through this enum
            #[must_use]
            pub fn action_types() -> ::std::vec::Vec<&'static str> {
                let mut types = ::std::vec::Vec::from(Self::ACTION_TYPES);
                #(types.extend(<#nested_types>::action_types());)*
                types
            }
        }
    })
}

fn variant_role(variant: &Variant) -> syn::Result<Role> {
    let mut role = None;

    for attr in &variant.attrs {
        let found = if attr.path().is_ident("nested") {
            Role::Nested
        } else if let Some(class) = CLASSES.iter().copied().find(|class| attr.path().is_ident(class)) {
            Role::Own {
                class,
                type_name: attr.parse_args::<LitStr>()?,
            }
        } else {
            continue;
        };

        if role.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "a variant takes exactly one of #[intent], #[success], #[failure], #[event] or #[nested]",
            ));
        }
        role = Some(found);
    }

    role.ok_or_else(|| {
        syn::Error::new_spanned(
            variant,
            "missing action class: add #[intent(\"...\")], #[success(\"...\")], #[failure(\"...\")], #[event(\"...\")] or #[nested]",
        )
    })
}

fn class_variant(class: &str) -> syn::Ident {
    let name = match class {
        "intent" => "Intent",
        "success" => "Success",
        "failure" => "Failure",
        _ => "Event",
    };
    syn::Ident::new(name, proc_macro2::Span::call_site())
}

fn wildcard_pattern(variant: &Variant) -> TokenStream2 {
    let ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

fn failure_error_arm(variant: &Variant) -> syn::Result<TokenStream2> {
    let ident = &variant.ident;
    let has_error_field = matches!(
        &variant.fields,
        Fields::Named(fields) if fields.named.iter().any(|field| {
            field.ident.as_ref().is_some_and(|name| name == "error")
        })
    );

    if !has_error_field {
        return Err(syn::Error::new_spanned(
            variant,
            "#[failure] variants need a named `error: HttpError` field",
        ));
    }

    Ok(quote! {
        Self::#ident { error, .. } => ::std::option::Option::Some(error),
    })
}

fn nested_type(variant: &Variant) -> syn::Result<&syn::Type> {
    match &variant.fields {
        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => match fields.unnamed.first() {
            Some(field) => Ok(&field.ty),
            None => Err(syn::Error::new_spanned(variant, "#[nested] variant has no field")),
        },
        _ => Err(syn::Error::new_spanned(
            variant,
            "#[nested] variants must wrap exactly one action enum, e.g. `Basket(BasketAction)`",
        )),
    }
}
