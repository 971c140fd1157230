use crate::{EntityDescriptor, EntityType, Marker, Node};

/// Predicate over the nodes of a descriptor tree.
pub trait NodeMatcher {
    fn matches(&self, node: &Node<EntityDescriptor>) -> bool;
}

impl<F> NodeMatcher for F
where
    F: Fn(&Node<EntityDescriptor>) -> bool,
{
    fn matches(&self, node: &Node<EntityDescriptor>) -> bool {
        self(node)
    }
}

/// Matches the nodes whose member carries at least one of the configured markers.
///
/// Only the markers declared on the member itself are inspected. Nodes without member (the root,
/// cache descriptors) never match.
#[derive(Debug, Clone)]
pub struct MarkerNodeMatcher {
    markers: Vec<Marker>,
}

impl MarkerNodeMatcher {
    pub fn new(markers: impl IntoIterator<Item = Marker>) -> Self {
        Self {
            markers: markers.into_iter().collect(),
        }
    }
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

impl NodeMatcher for MarkerNodeMatcher {
    fn matches(&self, node: &Node<EntityDescriptor>) -> bool {
        let Some(member) = node.value().member() else {
            return false;
        };
        self.markers.iter().any(|m| member.has_marker(m))
    }
}

/// Matches the nodes describing a given type.
#[derive(Debug, Clone, Copy)]
pub struct EntityTypeMatcher(pub EntityType);

impl NodeMatcher for EntityTypeMatcher {
    fn matches(&self, node: &Node<EntityDescriptor>) -> bool {
        node.value().entity_type() == self.0
    }
}
