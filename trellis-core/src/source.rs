use crate::{Entity, EntityMetadata, EntityType};
use std::{any::TypeId, collections::HashMap};

/// Resolves the mapping metadata of a type.
///
/// Returning `None` means the type is unknown to this source.
pub trait MetadataSource: Send + Sync {
    fn entity_metadata(&self, entity: &EntityType) -> Option<EntityMetadata>;
}

/// Metadata declared by the types themselves (see [`Entity`]).
#[derive(Default, Debug, Clone, Copy)]
pub struct DeclaredMetadata;

impl MetadataSource for DeclaredMetadata {
    fn entity_metadata(&self, entity: &EntityType) -> Option<EntityMetadata> {
        entity.declared_metadata()
    }
}

/// Registration table filled at load time.
///
/// Registered metadata takes precedence over what a type declares, unregistered types fall back
/// to their declared metadata.
#[derive(Default, Debug, Clone)]
pub struct Registry {
    entries: HashMap<TypeId, EntityMetadata>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }
    /// Registers the metadata declared by `E`.
    pub fn register<E: Entity>(&mut self) -> &mut Self {
        self.insert(E::entity_metadata())
    }
    /// Registers explicit metadata, replacing any previous entry for the same type.
    pub fn insert(&mut self, metadata: EntityMetadata) -> &mut Self {
        if let Some(previous) = self.entries.insert(metadata.entity.id(), metadata) {
            log::debug!("Metadata of `{}` was registered again", previous.entity);
        }
        self
    }
    pub fn contains(&self, entity: &EntityType) -> bool {
        self.entries.contains_key(&entity.id())
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MetadataSource for Registry {
    fn entity_metadata(&self, entity: &EntityType) -> Option<EntityMetadata> {
        self.entries
            .get(&entity.id())
            .cloned()
            .or_else(|| entity.declared_metadata())
    }
}

impl<S: MetadataSource + ?Sized> MetadataSource for &S {
    fn entity_metadata(&self, entity: &EntityType) -> Option<EntityMetadata> {
        (**self).entity_metadata(entity)
    }
}

impl<S: MetadataSource + ?Sized> MetadataSource for std::sync::Arc<S> {
    fn entity_metadata(&self, entity: &EntityType) -> Option<EntityMetadata> {
        (**self).entity_metadata(entity)
    }
}
