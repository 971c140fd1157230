use crate::decode_member::{MemberMetadata, decode_member};
use convert_case::{Case, Casing};
use quote::ToTokens;
use syn::{ItemStruct, LitStr, parse::ParseBuffer};

pub(crate) struct EntityMetadata {
    pub(crate) item: ItemStruct,
    pub(crate) table: String,
    pub(crate) from_row: bool,
    pub(crate) members: Vec<MemberMetadata>,
}

pub(crate) fn decode_entity(item: ItemStruct) -> EntityMetadata {
    let mut table = item.ident.to_string().to_case(Case::Snake);
    let mut from_row = false;
    if table.starts_with('_') {
        table.remove(0);
    }
    for attr in &item.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("trellis") {
            let Ok(list) = meta.require_list() else {
                panic!(
                    "Error while parsing `trellis`, use it like: `#[trellis(attribute = value, ..)]`"
                );
            };
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("table") {
                    let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!(
                            "Error while parsing `table`, use it like: `#[trellis(table = \"my_table\")]`"
                        );
                    };
                    table = value.value();
                } else if arg.path.is_ident("from_row") {
                    let Err(..) = arg.value() else {
                        panic!("Error while parsing `from_row`, use it like: `#[trellis(from_row)]`");
                    };
                    from_row = true;
                } else {
                    panic!(
                        "Unknown attribute `{}` inside trellis macro",
                        arg.path.to_token_stream().to_string()
                    );
                }
                Ok(())
            });
        }
    }
    let members: Vec<_> = item
        .fields
        .iter()
        .filter_map(|f| decode_member(f, &item))
        .collect();
    if members.iter().filter(|m| m.primary_key.is_some()).count() > 1 {
        panic!(
            "Entity `{}` declares more than one primary key, Trellis supports a single identity column",
            item.ident
        );
    }
    EntityMetadata {
        item,
        table,
        from_row,
        members,
    }
}
