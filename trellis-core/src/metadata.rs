use crate::{Result, RowView, Value};
use std::{
    any::{Any, TypeId},
    borrow::Cow,
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
    sync::Arc,
};

/// A type that declares its own mapping metadata, usually through `#[derive(Entity)]`.
pub trait Entity: Send + Sync + 'static {
    fn entity_metadata() -> EntityMetadata
    where
        Self: Sized;
    fn entity_type() -> EntityType
    where
        Self: Sized,
    {
        EntityType::of::<Self>()
    }
}

/// Construction of an instance from the columns of its descriptor node.
pub trait FromRow: Sized {
    fn from_row(row: RowView<'_>) -> Result<Self>;
}

/// Identity of an already materialized instance.
pub trait EntityId {
    fn entity_id(&self) -> Value;
}

/// Builds a boxed instance out of a row, see [`EntityMetadata::with_row_factory`].
pub type RowFactory = fn(RowView<'_>) -> Result<Box<dyn Any + Send>>;

fn instantiate<E: FromRow + Send + 'static>(row: RowView<'_>) -> Result<Box<dyn Any + Send>> {
    Ok(Box::new(E::from_row(row)?))
}

/// Identifies a mapped type.
///
/// Equality and hashing only consider the `TypeId`.
#[derive(Clone, Copy)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
    describe: Option<fn() -> EntityMetadata>,
}

impl EntityType {
    /// Type that describes itself.
    pub fn of<E: Entity>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
            describe: Some(E::entity_metadata),
        }
    }
    /// Type whose metadata must come from a registration table.
    pub fn opaque<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            describe: None,
        }
    }
    pub fn id(&self) -> TypeId {
        self.id
    }
    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }
    /// Type name without the module path.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        let start = base.rfind("::").map_or(0, |i| i + 2);
        &self.name[start..]
    }
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
    /// Metadata declared by the type itself, if it declares any.
    pub fn declared_metadata(&self) -> Option<EntityMetadata> {
        self.describe.map(|describe| describe())
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A declared tag attached to a member, identified by a type.
///
/// ```rust,ignore
/// struct Lazy;
/// let marker = Marker::of::<Lazy>();
/// ```
#[derive(Clone, Copy)]
pub struct Marker {
    id: TypeId,
    name: &'static str,
}

impl Marker {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Marker {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Marker {}

impl Hash for Marker {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Marker({})", self.name)
    }
}

/// How a member is declared on its owner.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    #[default]
    Field,
    /// Accessor receiving the related instance (`set_x`, `add_x`).
    Setter,
}

/// The declared member (field or setter) behind a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Short name of the declaring type.
    pub owner: &'static str,
    pub name: &'static str,
    pub kind: MemberKind,
    /// Markers declared directly on this member.
    pub markers: Vec<Marker>,
}

impl Member {
    pub fn field(owner: &'static str, name: &'static str) -> Self {
        Self {
            owner,
            name,
            kind: MemberKind::Field,
            markers: Vec::new(),
        }
    }
    pub fn setter(owner: &'static str, name: &'static str) -> Self {
        Self {
            kind: MemberKind::Setter,
            ..Self::field(owner, name)
        }
    }
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }
    pub fn has_marker(&self, marker: &Marker) -> bool {
        self.markers.contains(marker)
    }
}

/// Relation of a child entity to its parent.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationType {
    #[default]
    OneToOne,
    OneToMany,
    ManyToOne,
}

impl Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelationType::OneToOne => "one-to-one",
            RelationType::OneToMany => "one-to-many",
            RelationType::ManyToOne => "many-to-one",
        })
    }
}

/// Identity declaration of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyMetadata {
    pub member: Arc<Member>,
    pub column: Cow<'static, str>,
}

/// A declared relation member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationMetadata {
    pub member: Arc<Member>,
    pub target: EntityType,
    pub relation: RelationType,
    /// Overrides the name of the child descriptor (which is otherwise the target primary key
    /// column).
    pub name: Option<Cow<'static, str>>,
}

impl RelationMetadata {
    pub fn new(member: Member, target: EntityType) -> Self {
        Self {
            member: Arc::new(member),
            target,
            relation: RelationType::default(),
            name: None,
        }
    }
    pub fn with_relation(mut self, relation: RelationType) -> Self {
        self.relation = relation;
        self
    }
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Everything the metadata source knows about one type.
#[derive(Clone)]
pub struct EntityMetadata {
    pub entity: EntityType,
    pub table_name: Cow<'static, str>,
    pub primary_key: Option<PrimaryKeyMetadata>,
    /// Relation members, in declaration order.
    pub relations: Vec<RelationMetadata>,
    pub row_factory: Option<RowFactory>,
}

impl EntityMetadata {
    pub fn new(entity: EntityType, table_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            entity,
            table_name: table_name.into(),
            primary_key: None,
            relations: Vec::new(),
            row_factory: None,
        }
    }
    pub fn with_primary_key(mut self, member: Member, column: impl Into<Cow<'static, str>>) -> Self {
        self.primary_key = Some(PrimaryKeyMetadata {
            member: Arc::new(member),
            column: column.into(),
        });
        self
    }
    pub fn with_relation(mut self, relation: RelationMetadata) -> Self {
        self.relations.push(relation);
        self
    }
    pub fn with_row_factory<E: FromRow + Send + 'static>(mut self) -> Self {
        self.row_factory = Some(instantiate::<E>);
        self
    }
}

impl Debug for EntityMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMetadata")
            .field("entity", &self.entity)
            .field("table_name", &self.table_name)
            .field("primary_key", &self.primary_key)
            .field("relations", &self.relations)
            .field("row_factory", &self.row_factory.map(|_| ".."))
            .finish()
    }
}
