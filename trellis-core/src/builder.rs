use crate::{
    DeclaredMetadata, DescriptorBuilder, DescriptorError, Entity, EntityDescriptor,
    EntityMetadata, EntityType, MetadataSource, Node, QueryHandle, RelationPath,
};
use std::{
    any::TypeId,
    borrow::Cow,
    collections::{HashMap, HashSet},
    sync::{Arc, PoisonError, RwLock},
};

/// Hook invoked on every node while the tree is being built.
///
/// It receives the node (already holding its descriptor) and the builder the descriptor was
/// created from. It may graft children or replace the value of the node. The returned flag tells
/// whether the declared relations of the node must be discovered: `false` stops the descent, the
/// grafted children stay in any case.
pub trait TreeCallback {
    fn customize(&mut self, node: &mut Node<EntityDescriptor>, builder: &DescriptorBuilder)
    -> bool;
}

impl<F> TreeCallback for F
where
    F: FnMut(&mut Node<EntityDescriptor>, &DescriptorBuilder) -> bool,
{
    fn customize(
        &mut self,
        node: &mut Node<EntityDescriptor>,
        builder: &DescriptorBuilder,
    ) -> bool {
        self(node, builder)
    }
}

/// Callback that leaves every node untouched.
pub fn continue_always(_node: &mut Node<EntityDescriptor>, _builder: &DescriptorBuilder) -> bool {
    true
}

/// Per call state, lives on the stack of `build_with`.
struct BuildState {
    path: Vec<EntityType>,
    next_alias: usize,
}

/// Builds the tree of entity descriptors of a root type.
///
/// The only state shared between calls is the memoized metadata, a builder can therefore serve
/// concurrent builds.
pub struct DescriptorTreeBuilder<S: MetadataSource = DeclaredMetadata> {
    source: S,
    handle: QueryHandle,
    alias_prefix: Cow<'static, str>,
    alias_separator: Cow<'static, str>,
    resolved: RwLock<HashMap<TypeId, Arc<EntityMetadata>>>,
}

impl DescriptorTreeBuilder<DeclaredMetadata> {
    /// Builder reading the metadata the types declare themselves.
    pub fn declared() -> Self {
        Self::new(DeclaredMetadata)
    }
}

impl Default for DescriptorTreeBuilder<DeclaredMetadata> {
    fn default() -> Self {
        Self::declared()
    }
}

impl<S: MetadataSource> DescriptorTreeBuilder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            handle: QueryHandle::detached(),
            alias_prefix: Cow::Borrowed("a"),
            alias_separator: Cow::Borrowed("_"),
            resolved: Default::default(),
        }
    }
    /// Handle stored into the row mapper of every query descriptor.
    pub fn with_query_handle(mut self, handle: QueryHandle) -> Self {
        self.handle = handle;
        self
    }
    /// Table aliases are `{prefix}{n}`, `a0`, `a1`... by default.
    pub fn with_alias_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.alias_prefix = prefix.into();
        self
    }
    /// Separator between table alias and column name in the row labels.
    ///
    /// Must not be empty: `a1` would otherwise claim the columns of `a10`, the build fails with
    /// [`DescriptorError::InvalidConfiguration`].
    pub fn with_alias_separator(mut self, separator: impl Into<Cow<'static, str>>) -> Self {
        self.alias_separator = separator.into();
        self
    }
    pub fn query_handle(&self) -> &QueryHandle {
        &self.handle
    }
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Metadata of `entity`, memoized.
    pub fn metadata(&self, entity: &EntityType) -> Result<Arc<EntityMetadata>, DescriptorError> {
        if let Some(metadata) = self
            .resolved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&entity.id())
        {
            return Ok(metadata.clone());
        }
        let Some(metadata) = self.source.entity_metadata(entity) else {
            log::warn!("No metadata source knows `{}`", entity.name());
            return Err(DescriptorError::MissingPrimaryKey { entity: *entity });
        };
        let metadata = Arc::new(metadata);
        Ok(self
            .resolved
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(entity.id())
            .or_insert(metadata)
            .clone())
    }
    /// Forgets the memoized metadata.
    pub fn clear_cache(&self) {
        self.resolved
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn build(&self, root: EntityType) -> Result<Node<EntityDescriptor>, DescriptorError> {
        self.build_with(root, continue_always)
    }
    pub fn build_for<E: Entity>(&self) -> Result<Node<EntityDescriptor>, DescriptorError> {
        self.build(E::entity_type())
    }
    pub fn build_for_with<E, F>(&self, callback: F) -> Result<Node<EntityDescriptor>, DescriptorError>
    where
        E: Entity,
        F: FnMut(&mut Node<EntityDescriptor>, &DescriptorBuilder) -> bool,
    {
        self.build_with(E::entity_type(), callback)
    }

    /// Builds the tree of `root`, invoking `callback` on every node.
    ///
    /// Either the whole tree is returned or the first error met.
    pub fn build_with<F>(
        &self,
        root: EntityType,
        callback: F,
    ) -> Result<Node<EntityDescriptor>, DescriptorError>
    where
        F: FnMut(&mut Node<EntityDescriptor>, &DescriptorBuilder) -> bool,
    {
        self.build_visiting(root, callback)
    }

    /// Same as [`build_with`](Self::build_with) for callbacks implemented as types.
    pub fn build_visiting<C: TreeCallback>(
        &self,
        root: EntityType,
        mut callback: C,
    ) -> Result<Node<EntityDescriptor>, DescriptorError> {
        log::debug!("Building the descriptor tree of `{}`", root);
        let mut state = BuildState {
            path: Vec::new(),
            next_alias: 0,
        };
        let result = self
            .check_alias_separator()
            .and_then(|_| self.metadata(&root))
            .and_then(|metadata| self.node_builder(&metadata, &mut state, 0))
            .and_then(|builder| {
                let mut node = Node::new(builder.build(&self.handle).into());
                self.expand(&mut node, &builder, &mut state, &mut callback)?;
                Ok(node)
            });
        match &result {
            Ok(tree) => {
                log::debug!(
                    "Descriptor tree of `{}` built with {} nodes",
                    root,
                    tree.len()
                );
                log::trace!("Descriptor tree of `{}`:\n{}", root, tree);
            }
            Err(e) => log::error!("Cannot build the descriptor tree of `{}`: {}", root, e),
        }
        result
    }

    fn check_alias_separator(&self) -> Result<(), DescriptorError> {
        if self.alias_separator.is_empty() {
            return Err(DescriptorError::InvalidConfiguration(format!(
                "the alias separator is empty, the columns of `{0}1` and `{0}10` would be ambiguous",
                self.alias_prefix
            )));
        }
        Ok(())
    }

    fn node_builder(
        &self,
        metadata: &EntityMetadata,
        state: &mut BuildState,
        depth: usize,
    ) -> Result<DescriptorBuilder, DescriptorError> {
        let builder = DescriptorBuilder::from_metadata(metadata)?
            .with_table_alias(format!("{}{}", self.alias_prefix, state.next_alias))
            .with_alias_separator(self.alias_separator.clone())
            .with_depth(depth);
        state.next_alias += 1;
        Ok(builder)
    }

    fn expand<C: TreeCallback>(
        &self,
        node: &mut Node<EntityDescriptor>,
        builder: &DescriptorBuilder,
        state: &mut BuildState,
        callback: &mut C,
    ) -> Result<(), DescriptorError> {
        let descend = callback.customize(node, builder);
        let entity = match node.value() {
            EntityDescriptor::Query(descriptor) => descriptor.entity_type(),
            EntityDescriptor::Cache(descriptor) => {
                if builder.is_root() {
                    return Err(DescriptorError::InvalidConfiguration(format!(
                        "the root of the tree must be queryable, the callback replaced it with the cache of `{}`",
                        descriptor.entity_type()
                    )));
                }
                log::trace!(
                    "`{}` is backed by a cache, its relations are not discovered",
                    descriptor.name()
                );
                return Ok(());
            }
        };
        if !descend {
            log::trace!("Descent stopped at `{}`", node.value().name());
            return Ok(());
        }
        let metadata = self.metadata(&entity)?;
        state.path.push(entity);
        let first = node.children().len();
        let mut names = HashSet::with_capacity(metadata.relations.len());
        let mut builders = Vec::with_capacity(metadata.relations.len());
        for relation in &metadata.relations {
            if state.path.contains(&relation.target) {
                let mut path = state.path.clone();
                path.push(relation.target);
                return Err(DescriptorError::CyclicRelation {
                    path: RelationPath(path),
                });
            }
            let target = self.metadata(&relation.target)?;
            let mut child = self
                .node_builder(&target, state, builder.depth() + 1)?
                .with_relation(relation.relation)
                .with_member(relation.member.clone());
            if let Some(name) = &relation.name {
                child = child.with_name(name.clone());
            }
            if !names.insert(child.name().to_owned()) {
                return Err(DescriptorError::InvalidConfiguration(format!(
                    "`{}` declares more than one relation named `{}`, set a distinct name on `{}`",
                    entity,
                    child.name(),
                    relation.member.name
                )));
            }
            log::trace!(
                "Attaching `{}` ({}) under `{}`",
                child.name(),
                relation.target,
                node.value().name()
            );
            node.add_child(Node::new(child.build(&self.handle).into()));
            builders.push(child);
        }
        for (i, child) in builders.iter().enumerate() {
            self.expand(&mut node.children_mut()[first + i], child, state, callback)?;
        }
        state.path.pop();
        Ok(())
    }
}
