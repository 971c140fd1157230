mod common;

#[cfg(test)]
mod tests {
    use crate::common::init_logs;
    use std::sync::Arc;
    use trellis::{
        CacheDescriptor, DescriptorBuilder, DescriptorTreeBuilder, Entity, EntityDescriptor,
        EntityType, EntityTypeMatcher, Marker, MarkerNodeMatcher, Member, Node, NodeMatcher,
        QueryHandle,
    };

    struct TargetAnn;
    struct TargetAnn2;
    struct Unrelated;

    struct Child;

    fn node(member: Member) -> Node<EntityDescriptor> {
        let descriptor = DescriptorBuilder::new(EntityType::opaque::<Child>(), "Children", "test")
            .with_member(Arc::new(member))
            .build(&QueryHandle::detached());
        Node::new(descriptor.into())
    }

    #[test]
    fn match_field() {
        let matcher = MarkerNodeMatcher::new([Marker::of::<TargetAnn>()]);
        let member = Member::field("AnnotatedField", "child").with_marker(Marker::of::<TargetAnn>());
        assert!(matcher.matches(&node(member)));
    }

    #[test]
    fn match_setter() {
        let matcher = MarkerNodeMatcher::new([Marker::of::<TargetAnn>()]);
        let member =
            Member::setter("AnnotatedSetter", "set_child").with_marker(Marker::of::<TargetAnn>());
        assert!(matcher.matches(&node(member)));
    }

    #[test]
    fn no_match_field() {
        let matcher = MarkerNodeMatcher::new([Marker::of::<TargetAnn>()]);
        assert!(!matcher.matches(&node(Member::field("NotAnnotatedField", "child"))));
    }

    #[test]
    fn no_match_setter() {
        let matcher = MarkerNodeMatcher::new([Marker::of::<TargetAnn>()]);
        assert!(!matcher.matches(&node(Member::setter("NotAnnotatedSetter", "set_child"))));
    }

    #[test]
    fn match_any_of_two_markers() {
        let matcher =
            MarkerNodeMatcher::new([Marker::of::<TargetAnn>(), Marker::of::<TargetAnn2>()]);
        let first = Member::field("DoubleAnnotated", "child").with_marker(Marker::of::<TargetAnn>());
        let second =
            Member::field("DoubleAnnotated", "child2").with_marker(Marker::of::<TargetAnn2>());
        let both = Member::field("DoubleAnnotated", "child3")
            .with_marker(Marker::of::<TargetAnn2>())
            .with_marker(Marker::of::<TargetAnn>());
        assert!(matcher.matches(&node(first)));
        assert!(matcher.matches(&node(second)));
        assert!(matcher.matches(&node(both)));
    }

    #[test]
    fn no_match_unrelated_marker() {
        let matcher =
            MarkerNodeMatcher::new([Marker::of::<TargetAnn>(), Marker::of::<TargetAnn2>()]);
        let member = Member::field("Other", "child").with_marker(Marker::of::<Unrelated>());
        assert!(!matcher.matches(&node(member)));
    }

    #[test]
    fn no_match_without_member() {
        let matcher = MarkerNodeMatcher::new([Marker::of::<TargetAnn>()]);
        let root = DescriptorBuilder::new(EntityType::opaque::<Child>(), "Children", "ChildId")
            .build(&QueryHandle::detached());
        assert!(!matcher.matches(&Node::new(root.into())));
        let cached = CacheDescriptor::for_key(EntityType::opaque::<Child>(), "ChildId", Vec::new())
            .unwrap();
        assert!(!matcher.matches(&Node::new(cached.into())));
    }

    pub struct Lazy;
    pub struct Audited;

    #[derive(Entity)]
    #[trellis(table = "Documents")]
    #[allow(dead_code)]
    struct Document {
        #[trellis(primary_key, name = "DocumentId")]
        id: i64,
        #[trellis(child, name = "ContentId", markers(Lazy))]
        content: Option<Content>,
        #[trellis(child, name = "AuthorId", markers(Audited))]
        author: Author,
        #[trellis(child, relation = one_to_many)]
        revisions: Vec<Revision>,
    }

    #[derive(Entity)]
    #[allow(dead_code)]
    struct Content {
        #[trellis(primary_key)]
        content_id: i64,
    }

    #[derive(Entity)]
    #[allow(dead_code)]
    struct Author {
        #[trellis(primary_key)]
        author_id: i64,
    }

    #[derive(Entity)]
    #[allow(dead_code)]
    struct Revision {
        #[trellis(primary_key)]
        revision_id: i64,
        #[trellis(child, name = "RevisionContentId", markers(Lazy, Audited))]
        content: Option<Content>,
    }

    #[test]
    fn match_in_built_tree() {
        init_logs();
        let tree = DescriptorTreeBuilder::declared()
            .build_for::<Document>()
            .expect("The tree of Document should build");

        let lazy = MarkerNodeMatcher::new([Marker::of::<Lazy>()]);
        let names: Vec<_> = tree
            .find_all(|n| lazy.matches(n))
            .into_iter()
            .map(|n| n.value().name())
            .collect();
        assert_eq!(names, ["ContentId", "RevisionContentId"]);

        let audited = MarkerNodeMatcher::new([Marker::of::<Audited>()]);
        assert_eq!(tree.find_all(|n| audited.matches(n)).len(), 2);
        assert!(!lazy.matches(&tree));

        let contents = EntityTypeMatcher(Content::entity_type());
        assert_eq!(tree.find_all(|n| contents.matches(n)).len(), 2);
        let closure = |n: &Node<EntityDescriptor>| n.value().name() == "revision_id";
        assert!(tree.find(|n| closure.matches(n)).is_some());
    }
}
