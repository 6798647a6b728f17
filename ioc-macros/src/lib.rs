//! Proc-Macros for the ioc container
//! 

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod bean;

/// Implements the `Bean` trait, building its metadata table from attributes.
///
/// Field markers:
/// - `#[inject]`: resolves the dependency by the field's capability
/// - `#[inject("name")]` or `#[inject(name = "name")]`: resolves the bean with this name
/// - `#[inject(optional)]` or `#[inject(optional = true)]`: leaves the field empty if it can't be resolved
///
/// Injected fields must be of type `Inject<C>`.
///
/// Type options:
/// - `#[bean(provides(dyn A, dyn B))]`: the bean can be resolved as `dyn A` and `dyn B`
/// - `#[bean(post_construct)]`: calls `PostConstruct::post_construct` after injection
/// - `#[bean(opaque)]`: a plain value without injectable fields
///
/// # Example
/// ```ignore
/// use ioc::{Bean, Inject};
///
/// trait ProductRepository: Send + Sync {}
/// trait QuotaService: Send + Sync {}
/// trait ProductService: Send + Sync {}
///
/// #[derive(Default, Bean)]
/// #[bean(provides(dyn ProductService), post_construct)]
/// struct ProductServiceImpl {
///     #[inject("productRepository")]
///     repo: Inject<dyn ProductRepository>,
///     #[inject(optional)]
///     quota: Inject<dyn QuotaService>,
/// }
///
/// // This expands to:
/// // impl ioc::Bean for ProductServiceImpl {
/// //     fn describe(descriptor: &mut ioc::Descriptor<Self>) {
/// //         descriptor.provides::<dyn ProductService, _>(|bean| bean);
/// //         descriptor.post_construct();
/// //         descriptor.field("repo", |bean| &bean.repo).named("productRepository");
/// //         descriptor.field("quota", |bean| &bean.quota).optional();
/// //     }
/// // }
/// ```
#[proc_macro_derive(Bean, attributes(inject, bean))]
pub fn derive_bean(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    bean::expand_bean(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
