//! Procedural macros for tui-primitives

use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    generics: syn::Generics,
    data: darling::ast::Data<ActionVariant, ()>,

    /// Path to the crate exporting `Action` (defaults to `::tui_primitives`)
    #[darling(default, rename = "crate")]
    krate: Option<syn::Path>,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,

    /// Category this variant belongs to
    #[darling(default)]
    category: Option<String>,
}

/// Derive macro for the Action trait
///
/// Generates a `name()` method that returns the variant name as a static string.
///
/// When at least one variant carries `#[action(category = "...")]`, an
/// `ActionCategory` implementation is generated as well; variants without the
/// attribute report `None`.
///
/// Generic enums are supported; the usual `Action` bounds must hold for the
/// instantiated type.
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// enum MenuAction {
///     #[action(category = "visibility")]
///     OpenMenu,
///     #[action(category = "search")]
///     Search(char),
///     Tick,
/// }
///
/// assert_eq!(MenuAction::OpenMenu.name(), "OpenMenu");
/// assert_eq!(MenuAction::Search('a').category(), Some("search"));
/// assert_eq!(MenuAction::Tick.category(), None);
/// ```
///
/// Inside `tui-primitives-core` itself the path is overridden with
/// `#[action(crate = "crate")]`.
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;
    let krate = opts
        .krate
        .clone()
        .unwrap_or_else(|| syn::parse_quote!(::tui_primitives));
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let name_arms = variants.iter().map(|v| {
        let variant_name = &v.ident;
        let variant_str = variant_name.to_string();
        quote! { Self::#variant_name { .. } => #variant_str }
    });

    let mut expanded = quote! {
        impl #impl_generics #krate::Action for #name #ty_generics #where_clause {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }
        }
    };

    if variants.iter().any(|v| v.category.is_some()) {
        let category_arms = variants.iter().map(|v| {
            let variant_name = &v.ident;
            let category = match &v.category {
                Some(c) => quote! { ::core::option::Option::Some(#c) },
                None => quote! { ::core::option::Option::None },
            };
            quote! { Self::#variant_name { .. } => #category }
        });

        expanded = quote! {
            #expanded

            impl #impl_generics #krate::ActionCategory for #name #ty_generics #where_clause {
                fn category(&self) -> ::core::option::Option<&'static str> {
                    match self {
                        #(#category_arms),*
                    }
                }
            }
        };
    }

    TokenStream::from(expanded)
}
