mod common;

#[cfg(test)]
mod tests {
    use crate::common::{child_names, init_logs};
    use indoc::indoc;
    use std::collections::HashSet;
    use trellis::{
        CacheDescriptor, DescriptorTreeBuilder, Entity, EntityId, EntityType, Node, RelationType,
        Value,
    };

    pub struct Lazy;

    #[derive(Entity)]
    #[trellis(table = "Orders")]
    #[allow(dead_code)]
    struct Order {
        #[trellis(primary_key, name = "OrderId")]
        id: i32,
        #[trellis(child, relation = one_to_many)]
        details: Vec<Detail>,
        #[trellis(child, name = "DeliveryId", markers(Lazy))]
        delivery: Option<Box<Delivery>>,
        note: String,
    }

    #[derive(Entity)]
    #[trellis(table = "Details")]
    #[allow(dead_code)]
    struct Detail {
        #[trellis(primary_key, name = "DetailId")]
        id: i32,
        #[trellis(child)]
        option: Option<ProductOption>,
    }

    #[derive(Entity)]
    #[trellis(table = "Options")]
    #[allow(dead_code)]
    struct ProductOption {
        #[trellis(primary_key, name = "OptionId")]
        id: i32,
    }

    #[derive(Entity)]
    #[trellis(table = "Deliveries")]
    #[allow(dead_code)]
    struct Delivery {
        #[trellis(primary_key, name = "DeliveryId")]
        id: i32,
    }

    #[derive(Entity, Debug, PartialEq)]
    struct Currency {
        #[trellis(primary_key, name = "CurrencyId")]
        id: i32,
        code: &'static str,
    }

    impl EntityId for Currency {
        fn entity_id(&self) -> Value {
            self.id.into()
        }
    }

    fn currencies() -> CacheDescriptor {
        CacheDescriptor::for_entities(
            "CurrencyId",
            [
                Currency { id: 1, code: "EUR" },
                Currency { id: 2, code: "USD" },
            ],
        )
        .expect("Currency ids are distinct")
    }

    #[test]
    fn declared_fields() {
        init_logs();
        let tree = DescriptorTreeBuilder::declared()
            .build_for::<Order>()
            .expect("The tree of Order should build");

        assert_eq!(tree.value().name(), "OrderId");
        assert_eq!(child_names(&tree), ["DetailId", "DeliveryId"]);
        let detail = &tree.children()[0];
        assert_eq!(child_names(detail), ["OptionId"]);
        assert!(detail.children()[0].is_leaf());
        assert!(tree.children()[1].is_leaf());

        let detail = detail.value().as_query().unwrap();
        assert_eq!(detail.entity_type(), Detail::entity_type());
        assert_eq!(detail.relation(), Some(RelationType::OneToMany));
        assert_eq!(detail.member().unwrap().name, "details");
        assert_eq!(detail.table_name(), "Details");
        let delivery = tree.children()[1].value().as_query().unwrap();
        assert_eq!(delivery.relation(), Some(RelationType::OneToOne));
        assert_eq!(delivery.member().unwrap().name, "delivery");
        assert_eq!(delivery.entity_type(), EntityType::of::<Delivery>());
    }

    #[test]
    fn default_table_name() {
        let metadata = Currency::entity_metadata();
        assert_eq!(metadata.table_name, "currency");
        assert_eq!(metadata.primary_key.unwrap().column, "CurrencyId");
        assert!(metadata.relations.is_empty());
    }

    #[test]
    fn deterministic_order() {
        let builder = DescriptorTreeBuilder::declared();
        let first = builder.build_for::<Order>().unwrap().to_string_as_tree();
        let second = builder.build_for::<Order>().unwrap().to_string_as_tree();
        assert_eq!(first, second);
        assert_eq!(
            first,
            indoc! {"
                OrderId: Order as a0
                    DetailId: Detail as a1 (one-to-many)
                        OptionId: ProductOption as a3 (one-to-one)
                    DeliveryId: Delivery as a2 (one-to-one)
            "}
        );
    }

    #[test]
    fn aliases_are_unique() {
        let tree = DescriptorTreeBuilder::declared()
            .with_alias_prefix("t")
            .build_for::<Order>()
            .unwrap();
        let aliases: Vec<_> = tree
            .iter()
            .filter_map(|n| n.value().as_query())
            .map(|d| d.table_alias().to_owned())
            .collect();
        assert_eq!(aliases.len(), 4);
        assert_eq!(aliases.iter().collect::<HashSet<_>>().len(), 4);
        assert!(aliases.iter().all(|a| a.starts_with('t')));
    }

    #[test]
    fn stop_descent_keeps_grafted() {
        init_logs();
        let tree = DescriptorTreeBuilder::declared()
            .build_for_with::<Order, _>(|node, builder| {
                if builder.entity_type().is::<Detail>() {
                    node.add_child(Node::new(currencies().into()));
                    return false;
                }
                true
            })
            .unwrap();
        let detail = &tree.children()[0];
        assert_eq!(child_names(detail), ["CurrencyId"]);
        assert!(detail.children()[0].is_leaf());
        assert!(tree.find(|n| n.value().name() == "OptionId").is_none());
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn stop_descent_at_root() {
        let tree = DescriptorTreeBuilder::declared()
            .build_for_with::<Order, _>(|_, builder| !builder.is_root())
            .unwrap();
        assert!(tree.is_leaf());
        assert!(tree.value().is_query_capable());
    }

    #[test]
    fn cache_replacement_keeps_grafted_children() {
        let tree = DescriptorTreeBuilder::declared()
            .build_for_with::<Order, _>(|node, builder| {
                if builder.name() == "DeliveryId" {
                    node.add_child(Node::new(currencies().into()));
                    node.set_value(
                        CacheDescriptor::for_key(builder.entity_type(), "DeliveryId", Vec::new())
                            .unwrap()
                            .into(),
                    );
                }
                true
            })
            .unwrap();
        let delivery = &tree.children()[1];
        assert!(!delivery.value().is_query_capable());
        assert_eq!(child_names(delivery), ["CurrencyId"]);
    }

    #[test]
    fn cached_entities_lookup() {
        let cache = currencies();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.name(), "CurrencyId");
        assert_eq!(cache.entity_type(), Currency::entity_type());
        assert_eq!(
            cache.get_as::<Currency>(&Value::Int32(2)),
            Some(&Currency { id: 2, code: "USD" })
        );
        assert!(cache.get(&Value::Int32(3)).is_none());
        assert!(cache.get(&Value::Int64(2)).is_none());
        let renamed = cache.clone().with_name("Currency");
        assert_eq!(renamed.name(), "Currency");
        assert_eq!(renamed.primary_key_column(), "CurrencyId");
    }

    #[test]
    fn cached_descriptor_has_no_member() {
        let node: Node<trellis::EntityDescriptor> = Node::new(currencies().into());
        assert!(node.value().member().is_none());
        assert_eq!(node.value().primary_key_column(), "CurrencyId");
        assert!(node.value().as_cache().is_some());
        assert!(node.value().as_query().is_none());
    }
}
