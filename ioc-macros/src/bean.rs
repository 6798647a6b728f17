//! Macros for bean metadata

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, LitStr, Member, Meta};

pub(crate) mod attr;

use attr::{BeanArgs, InjectArgs};

/// Expands a derive-macro for Bean
pub(super) fn expand_bean(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "Bean can only be derived for structs"));
    };

    let options = bean_args(&input.attrs)?;

    let mut fields = Vec::new();
    for (index, field) in data.fields.iter().enumerate() {
        let Some(args) = inject_args(&field.attrs)? else {
            continue;
        };
        if options.opaque {
            let span = match &field.ident {
                Some(ident) => ident.span(),
                None => syn::spanned::Spanned::span(&field.ty),
            };
            return Err(syn::Error::new(span, "opaque beans can't have injected fields"));
        }

        let member = match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(index.into()),
        };
        let field_name = match &field.ident {
            Some(ident) => LitStr::new(&ident.to_string(), ident.span()),
            None => LitStr::new(&index.to_string(), proc_macro2::Span::call_site()),
        };
        let named = args.name.map(|name| quote! { .named(#name) });
        let optional = args.optional.then(|| quote! { .optional() });

        fields.push(quote! {
            descriptor
                .field(#field_name, |bean: &Self| &bean.#member)
                #named
                #optional;
        });
    }

    let provides = options.provides.iter().map(|capability| quote! {
        descriptor.provides::<#capability, _>(
            |bean: ::std::sync::Arc<Self>| -> ::std::sync::Arc<#capability> { bean }
        );
    });
    let post_construct = options.post_construct.then(|| quote! { descriptor.post_construct(); });
    let opaque = options.opaque.then(|| quote! { descriptor.opaque(); });

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::ioc::Bean for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn describe(descriptor: &mut ::ioc::Descriptor<Self>) {
                #(#provides)*
                #post_construct
                #opaque
                #(#fields)*
            }
        }
    })
}

/// Collects the options of all `#[bean(...)]` attributes
fn bean_args(attrs: &[Attribute]) -> syn::Result<BeanArgs> {
    let mut options = BeanArgs::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("bean")) {
        options.merge(attr.parse_args()?);
    }
    Ok(options)
}

/// Reads the `#[inject]` marker of a field, if any
fn inject_args(attrs: &[Attribute]) -> syn::Result<Option<InjectArgs>> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("inject")) else {
        return Ok(None);
    };
    match &attr.meta {
        Meta::Path(_) => Ok(Some(InjectArgs::default())),
        Meta::List(_) => attr.parse_args().map(Some),
        Meta::NameValue(meta) => {
            let syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(name), .. }) = &meta.value else {
                return Err(syn::Error::new_spanned(&meta.value, "expected a bean name"));
            };
            Ok(Some(InjectArgs { name: Some(name.clone()), optional: false }))
        }
    }
}
