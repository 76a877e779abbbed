use fxhash::FxHashSet;
use syn::{Attribute, GenericArgument, PathArguments, PathSegment, Type};

/// Names of the traits already listed in `#[derive(...)]`, by last path segment.
pub fn derived_trait_names(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in attrs {
        if !attr.path().is_ident("derive") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(seg) = meta.path.segments.last() {
                traits.insert(seg.ident.to_string());
            }
            Ok(())
        });
    }

    traits
}

pub fn last_segment(ty: &Type) -> Option<&PathSegment> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    path.path.segments.last()
}

/// `T` for a type spelled `Option<T>`.
pub fn option_inner(ty: &Type) -> Option<&Type> {
    let segment = last_segment(ty).filter(|seg| seg.ident == "Option")?;
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

pub fn is_named(ty: &Type, name: &str) -> bool {
    last_segment(ty).is_some_and(|seg| seg.ident == name && seg.arguments.is_none())
}

pub fn is_option_string(ty: &Type) -> bool {
    option_inner(ty).is_some_and(|inner| is_named(inner, "String"))
}

/// Matches `Option<Cow<'static, str>>`.
pub fn is_context_type(ty: &Type) -> bool {
    let Some(cow) = option_inner(ty).and_then(last_segment).filter(|seg| seg.ident == "Cow")
    else {
        return false;
    };
    let PathArguments::AngleBracketed(args) = &cow.arguments else {
        return false;
    };
    let mut args = args.args.iter();
    let Some(GenericArgument::Lifetime(lt)) = args.next() else {
        return false;
    };
    let Some(GenericArgument::Type(target)) = args.next() else {
        return false;
    };
    lt.ident == "static" && is_named(target, "str") && args.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn recognizes_option_string() {
        assert!(is_option_string(&parse_quote!(Option<String>)));
        assert!(is_option_string(&parse_quote!(std::option::Option<std::string::String>)));
        assert!(!is_option_string(&parse_quote!(String)));
        assert!(!is_option_string(&parse_quote!(Option<u32>)));
        assert!(!is_option_string(&parse_quote!(Option<Vec<String>>)));
    }

    #[test]
    fn recognizes_context_type() {
        assert!(is_context_type(&parse_quote!(Option<Cow<'static, str>>)));
        assert!(is_context_type(&parse_quote!(Option<std::borrow::Cow<'static, str>>)));
        assert!(!is_context_type(&parse_quote!(Option<Cow<'a, str>>)));
        assert!(!is_context_type(&parse_quote!(Option<String>)));
        assert!(!is_context_type(&parse_quote!(Cow<'static, str>)));
    }

    #[test]
    fn collects_derives_by_last_segment() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[derive(Debug, ::serde::Serialize)]),
            parse_quote!(#[serde(default)]),
        ];
        let traits = derived_trait_names(&attrs);
        assert!(traits.contains("Debug"));
        assert!(traits.contains("Serialize"));
        assert_eq!(traits.len(), 2);
    }
}
