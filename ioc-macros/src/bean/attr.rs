//! Attribute helpers for `#[inject(...)]` and `#[bean(...)]`

use syn::{
    parenthesized,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    Ident, LitBool, LitStr, Result, Token, Type,
};

/// Represents the arguments of an `#[inject(...)]` field marker.
///
/// Accepts, in any combination:
/// - A string literal with the bean name (e.g. `"productRepository"`)
/// - `name = "productRepository"`
/// - `optional` or `optional = true`
#[derive(Default)]
pub(crate) struct InjectArgs {
    /// Explicit bean name
    pub(crate) name: Option<LitStr>,

    /// Whether the dependency may be missing
    pub(crate) optional: bool,
}

impl Parse for InjectArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = InjectArgs::default();
        while !input.is_empty() {
            if input.peek(LitStr) {
                args.set_name(input.parse()?)?;
            } else {
                let key: Ident = input.parse()?;
                match key.to_string().as_str() {
                    "name" => {
                        input.parse::<Token![=]>()?;
                        args.set_name(input.parse()?)?;
                    }
                    "optional" => {
                        args.optional = if input.peek(Token![=]) {
                            input.parse::<Token![=]>()?;
                            input.parse::<LitBool>()?.value
                        } else {
                            true
                        };
                    }
                    _ => return Err(syn::Error::new(key.span(), "expected a bean name, `name` or `optional`")),
                }
            }
            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }
        Ok(args)
    }
}

impl InjectArgs {
    fn set_name(&mut self, name: LitStr) -> Result<()> {
        if self.name.is_some() {
            return Err(syn::Error::new(name.span(), "bean name is specified more than once"));
        }
        self.name = Some(name);
        Ok(())
    }
}

/// Represents the arguments of `#[bean(...)]` type options.
///
/// Accepts:
/// - `provides(dyn A, dyn B)`
/// - `post_construct`
/// - `opaque`
#[derive(Default)]
pub(crate) struct BeanArgs {
    /// Capabilities the bean can be viewed as
    pub(crate) provides: Vec<Type>,

    /// Whether the bean has a post-construct hook
    pub(crate) post_construct: bool,

    /// Whether the bean is a plain value
    pub(crate) opaque: bool,
}

impl Parse for BeanArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = BeanArgs::default();
        while !input.is_empty() {
            let key: Ident = input.parse()?;
            match key.to_string().as_str() {
                "provides" => {
                    let content;
                    parenthesized!(content in input);
                    let types = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                    args.provides.extend(types);
                }
                "post_construct" => args.post_construct = true,
                "opaque" => args.opaque = true,
                _ => return Err(syn::Error::new(key.span(), "expected `provides`, `post_construct` or `opaque`")),
            }
            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }
        Ok(args)
    }
}

impl BeanArgs {
    /// Merges options of several `#[bean(...)]` attributes
    pub(crate) fn merge(&mut self, other: BeanArgs) {
        self.provides.extend(other.provides);
        self.post_construct |= other.post_construct;
        self.opaque |= other.opaque;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::ToTokens;
    use syn::parse_str;

    #[test]
    fn it_parses_empty_inject() {
        let parsed: InjectArgs = parse_str("").unwrap();
        assert!(parsed.name.is_none());
        assert!(!parsed.optional);
    }

    #[test]
    fn it_parses_literal_name() {
        let parsed: InjectArgs = parse_str("\"productRepository\"").unwrap();
        assert_eq!(parsed.name.unwrap().value(), "productRepository");
    }

    #[test]
    fn it_parses_named_and_optional() {
        let parsed: InjectArgs = parse_str("name = \"quotaService\", optional").unwrap();
        assert_eq!(parsed.name.unwrap().value(), "quotaService");
        assert!(parsed.optional);
    }

    #[test]
    fn it_parses_optional_flag_value() {
        let parsed: InjectArgs = parse_str("optional = false").unwrap();
        assert!(!parsed.optional);

        let parsed: InjectArgs = parse_str("optional = true").unwrap();
        assert!(parsed.optional);
    }

    #[test]
    fn it_fails_on_duplicate_name() {
        let parsed: Result<InjectArgs> = parse_str("\"a\", name = \"b\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn it_fails_on_unknown_inject_key() {
        let parsed: Result<InjectArgs> = parse_str("lazy");
        assert!(parsed.is_err());
    }

    #[test]
    fn it_parses_bean_options() {
        let parsed: BeanArgs = parse_str("provides(dyn Repo, dyn Cache), post_construct").unwrap();
        let provides = parsed.provides
            .iter()
            .map(|ty| ty.to_token_stream().to_string())
            .collect::<Vec<_>>();
        assert_eq!(provides, ["dyn Repo", "dyn Cache"]);
        assert!(parsed.post_construct);
        assert!(!parsed.opaque);
    }

    #[test]
    fn it_merges_bean_options() {
        let mut first: BeanArgs = parse_str("provides(dyn Repo)").unwrap();
        let second: BeanArgs = parse_str("opaque").unwrap();

        first.merge(second);

        assert_eq!(first.provides.len(), 1);
        assert!(first.opaque);
    }

    #[test]
    fn it_fails_on_unknown_bean_option() {
        let parsed: Result<BeanArgs> = parse_str("scope");
        assert!(parsed.is_err());
    }
}
