use crate::decode_target::decode_target;
use quote::ToTokens;
use syn::{Field, Ident, ItemStruct, LitStr, Path, Type, parse::ParseBuffer};

pub(crate) struct ChildMetadata {
    pub(crate) target: Type,
    pub(crate) relation: Option<Ident>,
    pub(crate) name: Option<String>,
}

pub(crate) struct MemberMetadata {
    pub(crate) name: String,
    /// Column name, when the member is the primary key.
    pub(crate) primary_key: Option<String>,
    pub(crate) child: Option<ChildMetadata>,
    pub(crate) markers: Vec<Path>,
}

const RELATIONS: &[&str] = &["one_to_one", "one_to_many", "many_to_one"];

/// Returns `None` for fields that are neither primary key nor relation.
pub(crate) fn decode_member(field: &Field, item: &ItemStruct) -> Option<MemberMetadata> {
    let Some(ident) = &field.ident else {
        panic!(
            "Entity `{}` must have named fields to derive its metadata",
            item.ident
        );
    };
    let name = ident.to_string();
    let mut primary_key = false;
    let mut child = false;
    let mut declared_name: Option<String> = None;
    let mut relation: Option<Ident> = None;
    let mut target: Option<Type> = None;
    let mut markers = Vec::new();
    for attr in &field.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("trellis") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!(
                "Error while parsing `trellis`, use it like: `#[trellis(attribute = value, ...)]`"
            );
        };
        let _ = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("primary_key") {
                let Err(..) = arg.value() else {
                    panic!(
                        "Error while parsing `primary_key`, use it like: `#[trellis(primary_key)]`"
                    );
                };
                primary_key = true;
            } else if arg.path.is_ident("child") {
                let Err(..) = arg.value() else {
                    panic!("Error while parsing `child`, use it like: `#[trellis(child)]`");
                };
                child = true;
            } else if arg.path.is_ident("name") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!(
                        "Error while parsing `name`, use it like: `#[trellis(name = \"MyColumn\")]`"
                    );
                };
                declared_name = Some(v.value());
            } else if arg.path.is_ident("relation") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<Ident>) else {
                    panic!(
                        "Error while parsing `relation`, use it like: `#[trellis(child, relation = one_to_many)]`"
                    );
                };
                if !RELATIONS.contains(&v.to_string().as_str()) {
                    panic!(
                        "Unknown relation `{}`, expected one of: {}",
                        v,
                        RELATIONS.join(", ")
                    );
                }
                relation = Some(v);
            } else if arg.path.is_ident("target") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<Type>) else {
                    panic!(
                        "Error while parsing `target`, use it like: `#[trellis(child, target = MyEntity)]`"
                    );
                };
                target = Some(v);
            } else if arg.path.is_ident("markers") {
                let Ok(..) = arg.parse_nested_meta(|marker| {
                    markers.push(marker.path.clone());
                    Ok(())
                }) else {
                    panic!(
                        "Error while parsing `markers`, use it like: `#[trellis(markers(Lazy, Audited))]`"
                    );
                };
            } else {
                panic!(
                    "Unknown attribute `{}` inside trellis macro",
                    arg.path.to_token_stream().to_string()
                );
            }
            Ok(())
        });
    }
    if primary_key && child {
        panic!("Field `{}` cannot be both `primary_key` and `child`", name);
    }
    if !child && (relation.is_some() || target.is_some()) {
        panic!(
            "Field `{}` specifies `relation` or `target` but it is not marked as `child`",
            name
        );
    }
    if !primary_key && !child {
        return None;
    }
    let mut column = name.clone();
    if column.starts_with('_') {
        column.remove(0);
    }
    Some(MemberMetadata {
        primary_key: primary_key.then(|| declared_name.clone().unwrap_or(column)),
        child: child.then(|| ChildMetadata {
            target: target.unwrap_or_else(|| decode_target(&field.ty)),
            relation,
            name: declared_name,
        }),
        name,
        markers,
    })
}
