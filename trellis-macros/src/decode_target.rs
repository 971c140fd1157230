use syn::{GenericArgument, PathArguments, Type};

const WRAPPERS: &[&str] = &["Option", "Vec", "VecDeque", "Box", "Arc"];

/// Type of the related entity: the field type without `Option`, `Vec`, `Box`, `Arc` wrappers.
pub(crate) fn decode_target(ty: &Type) -> Type {
    let Type::Path(path) = ty else {
        return ty.clone();
    };
    let Some(last) = path.path.segments.last() else {
        return ty.clone();
    };
    if !WRAPPERS.iter().any(|w| last.ident == *w) {
        return ty.clone();
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return ty.clone();
    };
    let mut types = args.args.iter().filter_map(|a| match a {
        GenericArgument::Type(t) => Some(t),
        _ => None,
    });
    match (types.next(), types.next()) {
        (Some(inner), None) => decode_target(inner),
        _ => ty.clone(),
    }
}
