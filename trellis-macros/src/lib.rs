mod decode_entity;
mod decode_member;
mod decode_target;

use decode_entity::decode_entity;
use decode_member::MemberMetadata;
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Ident, ItemStruct, parse_macro_input};

#[proc_macro_derive(Entity, attributes(trellis))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let metadata = decode_entity(item);
    let item = &metadata.item;
    let name = &item.ident;
    let owner = name.to_string();
    let table = &metadata.table;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let primary_key = metadata
        .members
        .iter()
        .filter_map(|m| m.primary_key.as_ref().map(|column| (m, column)))
        .map(|(m, column)| {
            let member = encode_member(&owner, m);
            quote!(.with_primary_key(#member, #column))
        });
    let relations = metadata.members.iter().filter_map(|m| {
        let child = m.child.as_ref()?;
        let member = encode_member(&owner, m);
        let target = &child.target;
        let relation = child.relation.as_ref().map(|r| {
            let variant = match r.to_string().as_str() {
                "one_to_many" => "OneToMany",
                "many_to_one" => "ManyToOne",
                _ => "OneToOne",
            };
            let variant = Ident::new(variant, Span::call_site());
            quote!(.with_relation(::trellis::RelationType::#variant))
        });
        let declared_name = child.name.as_ref().map(|n| quote!(.with_name(#n)));
        Some(quote! {
            .with_relation(
                ::trellis::RelationMetadata::new(#member, ::trellis::EntityType::of::<#target>())
                    #relation
                    #declared_name
            )
        })
    });
    let row_factory = metadata
        .from_row
        .then(|| quote!(.with_row_factory::<Self>()));
    quote! {
        impl #impl_generics ::trellis::Entity for #name #ty_generics #where_clause {
            fn entity_metadata() -> ::trellis::EntityMetadata {
                ::trellis::EntityMetadata::new(::trellis::EntityType::of::<Self>(), #table)
                    #(#primary_key)*
                    #(#relations)*
                    #row_factory
            }
        }
    }
    .into()
}

fn encode_member(owner: &str, member: &MemberMetadata) -> TokenStream2 {
    let name = &member.name;
    let markers = member.markers.iter();
    quote! {
        ::trellis::Member::field(#owner, #name)
            #(.with_marker(::trellis::Marker::of::<#markers>()))*
    }
}
