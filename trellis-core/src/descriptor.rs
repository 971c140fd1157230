use crate::{
    CacheDescriptor, DescriptorError, EntityMetadata, EntityRowMapper, EntityType, IdMapper,
    Member, PkColumnMapper, QueryHandle, RelationType, RowFactory, RowMapper,
};
use std::{
    borrow::Cow,
    fmt::{self, Debug, Display},
    sync::Arc,
};

/// Describes how one node of the tree maps to a row or to a cache entry.
#[derive(Debug, Clone)]
pub enum EntityDescriptor {
    /// Materialized from the live query result.
    Query(QueryDescriptor),
    /// Looked up in pre-materialized reference data, never joined further.
    Cache(CacheDescriptor),
}

impl EntityDescriptor {
    pub fn name(&self) -> &str {
        match self {
            EntityDescriptor::Query(v) => v.name(),
            EntityDescriptor::Cache(v) => v.name(),
        }
    }
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityDescriptor::Query(v) => v.entity_type(),
            EntityDescriptor::Cache(v) => v.entity_type(),
        }
    }
    pub fn is_query_capable(&self) -> bool {
        matches!(self, EntityDescriptor::Query(..))
    }
    pub fn primary_key_column(&self) -> &str {
        match self {
            EntityDescriptor::Query(v) => v.primary_key_column(),
            EntityDescriptor::Cache(v) => v.primary_key_column(),
        }
    }
    /// Declared member behind the descriptor, cache descriptors have none.
    pub fn member(&self) -> Option<&Member> {
        match self {
            EntityDescriptor::Query(v) => v.member(),
            EntityDescriptor::Cache(..) => None,
        }
    }
    pub fn as_query(&self) -> Option<&QueryDescriptor> {
        match self {
            EntityDescriptor::Query(v) => Some(v),
            EntityDescriptor::Cache(..) => None,
        }
    }
    pub fn as_cache(&self) -> Option<&CacheDescriptor> {
        match self {
            EntityDescriptor::Cache(v) => Some(v),
            EntityDescriptor::Query(..) => None,
        }
    }
}

impl From<QueryDescriptor> for EntityDescriptor {
    fn from(value: QueryDescriptor) -> Self {
        EntityDescriptor::Query(value)
    }
}

impl From<CacheDescriptor> for EntityDescriptor {
    fn from(value: CacheDescriptor) -> Self {
        EntityDescriptor::Cache(value)
    }
}

impl Display for EntityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityDescriptor::Query(v) => {
                write!(f, "{}: {}", v.name, v.entity)?;
                if !v.table_alias.is_empty() {
                    write!(f, " as {}", v.table_alias)?;
                }
                if let Some(relation) = v.relation {
                    write!(f, " ({})", relation)?;
                }
                Ok(())
            }
            EntityDescriptor::Cache(v) => write!(
                f,
                "{}: {} (cached, {} entries)",
                v.name(),
                v.entity_type(),
                v.len()
            ),
        }
    }
}

/// Descriptor materialized from the live query result.
#[derive(Clone)]
pub struct QueryDescriptor {
    entity: EntityType,
    table_name: Cow<'static, str>,
    table_alias: Cow<'static, str>,
    primary_key: Cow<'static, str>,
    name: Cow<'static, str>,
    relation: Option<RelationType>,
    member: Option<Arc<Member>>,
    row_mapper: Arc<dyn RowMapper>,
    id_mapper: Arc<dyn IdMapper>,
}

impl QueryDescriptor {
    pub fn entity_type(&self) -> EntityType {
        self.entity
    }
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
    pub fn table_alias(&self) -> &str {
        &self.table_alias
    }
    pub fn primary_key_column(&self) -> &str {
        &self.primary_key
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Relation to the parent node, `None` for the root.
    pub fn relation(&self) -> Option<RelationType> {
        self.relation
    }
    pub fn member(&self) -> Option<&Member> {
        self.member.as_deref()
    }
    pub fn row_mapper(&self) -> &dyn RowMapper {
        self.row_mapper.as_ref()
    }
    pub fn id_mapper(&self) -> &dyn IdMapper {
        self.id_mapper.as_ref()
    }
}

impl Debug for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDescriptor")
            .field("entity", &self.entity)
            .field("table_name", &self.table_name)
            .field("table_alias", &self.table_alias)
            .field("primary_key", &self.primary_key)
            .field("name", &self.name)
            .field("relation", &self.relation)
            .field("member", &self.member)
            .finish()
    }
}

/// Collects what is needed to create a [`QueryDescriptor`].
///
/// The tree builder hands the builder of every node to the callback, read only, so that the
/// callback can decide what to do with the node (`builder.entity_type()`, `builder.name()`,
/// `builder.is_root()`).
#[derive(Clone)]
pub struct DescriptorBuilder {
    entity: EntityType,
    table_name: Cow<'static, str>,
    table_alias: Cow<'static, str>,
    alias_separator: Cow<'static, str>,
    primary_key: Cow<'static, str>,
    name: Option<Cow<'static, str>>,
    relation: Option<RelationType>,
    member: Option<Arc<Member>>,
    depth: usize,
    row_factory: Option<RowFactory>,
    row_mapper: Option<Arc<dyn RowMapper>>,
    id_mapper: Option<Arc<dyn IdMapper>>,
}

impl DescriptorBuilder {
    pub fn new(
        entity: EntityType,
        table_name: impl Into<Cow<'static, str>>,
        primary_key: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            entity,
            table_name: table_name.into(),
            table_alias: Cow::Borrowed(""),
            alias_separator: Cow::Borrowed("_"),
            primary_key: primary_key.into(),
            name: None,
            relation: None,
            member: None,
            depth: 0,
            row_factory: None,
            row_mapper: None,
            id_mapper: None,
        }
    }
    /// Starts from resolved metadata, fails if the type declares no primary key.
    pub fn from_metadata(metadata: &EntityMetadata) -> Result<Self, DescriptorError> {
        let Some(primary_key) = &metadata.primary_key else {
            return Err(DescriptorError::MissingPrimaryKey {
                entity: metadata.entity,
            });
        };
        let mut result = Self::new(
            metadata.entity,
            metadata.table_name.clone(),
            primary_key.column.clone(),
        );
        result.row_factory = metadata.row_factory;
        Ok(result)
    }
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }
    pub fn with_relation(mut self, relation: RelationType) -> Self {
        self.relation = Some(relation);
        self
    }
    pub fn with_member(mut self, member: Arc<Member>) -> Self {
        self.member = Some(member);
        self
    }
    pub fn with_table_alias(mut self, alias: impl Into<Cow<'static, str>>) -> Self {
        self.table_alias = alias.into();
        self
    }
    pub fn with_alias_separator(mut self, separator: impl Into<Cow<'static, str>>) -> Self {
        self.alias_separator = separator.into();
        self
    }
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }
    pub fn with_row_mapper(mut self, mapper: Arc<dyn RowMapper>) -> Self {
        self.row_mapper = Some(mapper);
        self
    }
    pub fn with_id_mapper(mut self, mapper: Arc<dyn IdMapper>) -> Self {
        self.id_mapper = Some(mapper);
        self
    }
    pub fn entity_type(&self) -> EntityType {
        self.entity
    }
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
    pub fn table_alias(&self) -> &str {
        &self.table_alias
    }
    pub fn primary_key_column(&self) -> &str {
        &self.primary_key
    }
    /// Declared name, the primary key column when none was declared.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.primary_key)
    }
    pub fn relation(&self) -> Option<RelationType> {
        self.relation
    }
    pub fn member(&self) -> Option<&Member> {
        self.member.as_deref()
    }
    pub fn depth(&self) -> usize {
        self.depth
    }
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
    /// Label prefix of the columns of this node inside a row.
    pub fn column_prefix(&self) -> String {
        if self.table_alias.is_empty() {
            String::new()
        } else {
            format!("{}{}", self.table_alias, self.alias_separator)
        }
    }
    /// Creates the descriptor, the default row mapper receives `handle`.
    pub fn build(&self, handle: &QueryHandle) -> QueryDescriptor {
        let column_prefix = self.column_prefix();
        let id_mapper: Arc<dyn IdMapper> = match &self.id_mapper {
            Some(mapper) => mapper.clone(),
            None => Arc::new(PkColumnMapper {
                label: format!("{}{}", column_prefix, self.primary_key),
            }),
        };
        let row_mapper: Arc<dyn RowMapper> = match &self.row_mapper {
            Some(mapper) => mapper.clone(),
            None => Arc::new(EntityRowMapper {
                entity: self.entity,
                table_name: self.table_name.clone(),
                primary_key: self.primary_key.clone(),
                column_prefix,
                factory: self.row_factory,
                handle: handle.clone(),
            }),
        };
        QueryDescriptor {
            entity: self.entity,
            table_name: self.table_name.clone(),
            table_alias: self.table_alias.clone(),
            primary_key: self.primary_key.clone(),
            name: Cow::Owned(self.name().to_owned()),
            relation: self.relation,
            member: self.member.clone(),
            row_mapper,
            id_mapper,
        }
    }
}

impl Debug for DescriptorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorBuilder")
            .field("entity", &self.entity)
            .field("table_name", &self.table_name)
            .field("table_alias", &self.table_alias)
            .field("primary_key", &self.primary_key)
            .field("name", &self.name())
            .field("relation", &self.relation)
            .field("depth", &self.depth)
            .finish()
    }
}
