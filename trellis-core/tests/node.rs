#[cfg(test)]
mod tests {
    use indoc::indoc;
    use trellis_core::Node;

    fn sample() -> Node<&'static str> {
        Node::with_children(
            "root",
            [
                Node::with_children("a", [Node::new("a1"), Node::new("a2")]),
                Node::new("b"),
                Node::with_children("c", [Node::with_children("c1", [Node::new("c11")])]),
            ],
        )
    }

    #[test]
    fn shape() {
        let tree = sample();
        assert_eq!(*tree.value(), "root");
        assert_eq!(tree.len(), 8);
        assert!(!tree.is_leaf());
        assert!(tree.children()[1].is_leaf());
        assert_eq!(
            tree.children().iter().map(|c| *c.value()).collect::<Vec<_>>(),
            ["a", "b", "c"]
        );
    }

    #[test]
    fn mutation() {
        let mut tree = Node::new(1);
        tree.add_child(Node::new(2)).add_child(Node::new(3));
        tree.add_child(Node::new(4));
        assert_eq!(tree.len(), 4);
        *tree.value_mut() += 10;
        assert_eq!(tree.set_value(0), 11);
        let removed = tree.remove_child(0).expect("The child exists");
        assert_eq!(*removed.value(), 2);
        assert_eq!(removed.len(), 2);
        assert!(tree.remove_child(5).is_none());
        tree.children_mut().push(Node::new(5));
        assert_eq!(
            tree.iter().map(|n| *n.value()).collect::<Vec<_>>(),
            [0, 4, 5]
        );
        assert_eq!(tree.into_value(), 0);
    }

    #[test]
    fn pre_order() {
        let tree = sample();
        let mut visited = Vec::new();
        tree.traverse(|n| visited.push(*n.value()));
        assert_eq!(visited, ["root", "a", "a1", "a2", "b", "c", "c1", "c11"]);
        assert_eq!(
            tree.iter().map(|n| *n.value()).collect::<Vec<_>>(),
            visited
        );
        assert_eq!((&tree).into_iter().count(), 8);

        let mut depths = Vec::new();
        tree.traverse_with_depth(|n, depth| depths.push((*n.value(), depth)));
        assert_eq!(depths[0], ("root", 0));
        assert_eq!(depths[2], ("a1", 2));
        assert_eq!(depths[7], ("c11", 3));
    }

    #[test]
    fn find() {
        let tree = sample();
        assert_eq!(
            tree.find(|n| n.value().starts_with('c')).map(|n| *n.value()),
            Some("c")
        );
        assert!(tree.find(|n| *n.value() == "z").is_none());
        let leaves: Vec<_> = tree
            .find_all(|n| n.is_leaf())
            .into_iter()
            .map(|n| *n.value())
            .collect();
        assert_eq!(leaves, ["a1", "a2", "b", "c11"]);
    }

    #[test]
    fn map() {
        let tree = sample();
        let lengths = tree.map(|v| v.len());
        assert_eq!(lengths.len(), tree.len());
        assert_eq!(*lengths.value(), 4);
        assert_eq!(*lengths.children()[2].children()[0].children()[0].value(), 3);
        assert_eq!(lengths.map(|v| v.to_string()).to_string_as_tree(), indoc! {"
            4
                1
                    2
                    2
                1
                1
                    2
                        3
        "});
    }

    #[test]
    fn rendering() {
        let tree = sample();
        let expected = indoc! {"
            root
                a
                    a1
                    a2
                b
                c
                    c1
                        c11
        "};
        assert_eq!(tree.to_string_as_tree(), expected);
        assert_eq!(tree.to_string(), expected);
        assert_eq!(Node::new("alone").to_string_as_tree(), "alone\n");
        assert_eq!(Node::new("alone").len(), 1);
        assert!(Node::new("alone").is_leaf());
    }

    #[test]
    fn equality() {
        let tree = sample();
        let mut other = tree.clone();
        assert_eq!(tree, other);
        other.children_mut()[1].add_child(Node::new("b1"));
        assert_ne!(tree, other);
    }
}
