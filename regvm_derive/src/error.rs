//! Derive macro for error types.
//!
//! Generates `std::fmt::Display` and `std::error::Error` implementations from
//! an `#[error("...")]` message on every enum variant (or on the struct).
//!
//! # Usage
//!
//! ```ignore
//! use regvm_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum MachineError {
//!     #[error("unknown opcode `{opcode}`")]
//!     UnknownOpcode { opcode: String },
//!
//!     #[error("line {0}: {1}")]
//!     Parse(usize, String),
//!
//!     #[error("division by zero while updating `{register}`")]
//!     DivisionByZero { register: String, line: Option<usize> },
//! }
//! ```
//!
//! Only fields referenced by the message are handed to `write!`, so a variant
//! may carry extra data (like `line` above) that the message does not render.
//! Tuple fields are referenced positionally (`{0}`, `{1:?}`).

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, parse_macro_input};

pub fn derive_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let arms = match &input.data {
        Data::Enum(data) => data
            .variants
            .iter()
            .map(|variant| {
                let ident = &variant.ident;
                let message = message(&variant.attrs, ident, "variant")?;
                Ok(display_arm(quote!(Self::#ident), &variant.fields, &message))
            })
            .collect::<syn::Result<Vec<_>>>()?,
        Data::Struct(data) => {
            let message = message(&input.attrs, name, "type")?;
            vec![display_arm(quote!(Self), &data.fields, &message)]
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Error derive does not support unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    #(#arms)*
                }
            }
        }

        impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {}
    })
}

/// Builds one `match` arm binding only the fields the message refers to.
fn display_arm(path: TokenStream2, fields: &Fields, message: &LitStr) -> TokenStream2 {
    let referenced = placeholder_names(&message.value());

    match fields {
        Fields::Unit => quote! {
            #path => write!(f, #message),
        },
        Fields::Named(named) => {
            let used: Vec<&Ident> = named
                .named
                .iter()
                .filter_map(|field| field.ident.as_ref())
                .filter(|ident| referenced.iter().any(|r| *ident == r))
                .collect();
            quote! {
                #path { #(#used,)* .. } => write!(f, #message #(, #used = #used)*),
            }
        }
        Fields::Unnamed(unnamed) => {
            let mut patterns = Vec::with_capacity(unnamed.unnamed.len());
            let mut used = Vec::new();
            for index in 0..unnamed.unnamed.len() {
                if referenced.iter().any(|r| *r == index.to_string()) {
                    let ident = format_ident!("f{}", index);
                    patterns.push(quote!(#ident));
                    used.push(ident);
                } else {
                    patterns.push(quote!(_));
                }
            }
            let renamed = rewrite_placeholders(&message.value(), |name| {
                name.bytes()
                    .all(|b| b.is_ascii_digit())
                    .then(|| format!("f{name}"))
            });
            let renamed = LitStr::new(&renamed, message.span());
            quote! {
                #path(#(#patterns),*) => write!(f, #renamed #(, #used = #used)*),
            }
        }
    }
}

/// Extracts the message from an `#[error("...")]` attribute.
fn message(attrs: &[Attribute], target: &Ident, what: &str) -> syn::Result<LitStr> {
    let attr = attrs
        .iter()
        .find(|attr| attr.path().is_ident("error"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                target,
                format!(
                    "missing #[error(\"...\")] attribute on {what} `{target}`; every error must declare a display message"
                ),
            )
        })?;

    attr.parse_args::<LitStr>().map_err(|_| {
        syn::Error::new_spanned(
            &attr.meta,
            "invalid #[error] attribute; expected a string literal like #[error(\"no register `{name}`\")]",
        )
    })
}

/// Names used by `{name}` / `{name:spec}` placeholders, in first-use order.
fn placeholder_names(format: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    rewrite_placeholders(format, |name| {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        None
    });
    names
}

/// Walks the placeholders of a format string, letting `rename` replace the
/// argument name of each one. Escaped braces are copied unchanged.
fn rewrite_placeholders(format: &str, mut rename: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(format.len());
    let mut rest = format;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..2]);
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        let end = tail[1..].find(['}', ':']).map_or(tail.len(), |i| i + 1);
        let name = &tail[1..end];
        out.push('{');
        match (!name.is_empty()).then(|| rename(name)).flatten() {
            Some(renamed) => out.push_str(&renamed),
            None => out.push_str(name),
        }
        rest = &tail[end..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_named_placeholders_once() {
        assert_eq!(
            placeholder_names("no {kind} register `{name}` ({kind:?})"),
            vec!["kind".to_string(), "name".to_string()]
        );
    }

    #[test]
    fn escaped_braces_are_not_placeholders() {
        assert!(placeholder_names("literal {{braces}} only").is_empty());
        assert_eq!(
            rewrite_placeholders("{{x}} {0}", |_| Some("y".into())),
            "{{x}} {y}"
        );
    }

    #[test]
    fn positional_placeholders_are_renamed() {
        let renamed = rewrite_placeholders("line {0}: {1:?}", |name| Some(format!("f{name}")));
        assert_eq!(renamed, "line {f0}: {f1:?}");
    }
}
