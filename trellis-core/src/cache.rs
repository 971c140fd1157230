use crate::{DescriptorError, Entity, EntityId, EntityType, Value};
use std::{
    any::Any,
    borrow::Cow,
    collections::HashMap,
    fmt::{self, Debug},
    sync::Arc,
};

/// Shared instance held by a cache descriptor.
pub type CachedInstance = Arc<dyn Any + Send + Sync>;

/// Descriptor backed by reference data that was already materialized.
///
/// The query layer never joins below a cache descriptor: the rows only carry the key, the
/// instance is looked up here.
#[derive(Clone)]
pub struct CacheDescriptor {
    entity: EntityType,
    primary_key: Cow<'static, str>,
    name: Cow<'static, str>,
    instances: Arc<HashMap<Value, CachedInstance>>,
}

impl CacheDescriptor {
    /// Builds a descriptor out of instances keyed by their identity.
    ///
    /// Fails with [`DescriptorError::InvalidArgument`] if a key appears twice.
    pub fn for_key<I>(
        entity: EntityType,
        primary_key: impl Into<Cow<'static, str>>,
        instances: I,
    ) -> Result<Self, DescriptorError>
    where
        I: IntoIterator<Item = (Value, CachedInstance)>,
    {
        let primary_key = primary_key.into();
        let instances = instances.into_iter();
        let mut map = HashMap::with_capacity(instances.size_hint().0);
        for (key, instance) in instances {
            if map.contains_key(&key) {
                return Err(logged!(DescriptorError::InvalidArgument(format!(
                    "duplicate key {} for `{}` in the cached instances of column `{}`",
                    key, entity, primary_key
                ))));
            }
            map.insert(key, instance);
        }
        Ok(Self {
            entity,
            name: primary_key.clone(),
            primary_key,
            instances: Arc::new(map),
        })
    }
    /// Builds a descriptor out of entities, the key of each one being its [`EntityId`].
    pub fn for_entities<E, I>(
        primary_key: impl Into<Cow<'static, str>>,
        instances: I,
    ) -> Result<Self, DescriptorError>
    where
        E: Entity + EntityId,
        I: IntoIterator<Item = E>,
    {
        Self::for_key(
            E::entity_type(),
            primary_key,
            instances
                .into_iter()
                .map(|v| (v.entity_id(), Arc::new(v) as CachedInstance)),
        )
    }
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
    pub fn entity_type(&self) -> EntityType {
        self.entity
    }
    pub fn primary_key_column(&self) -> &str {
        &self.primary_key
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn get(&self, key: &Value) -> Option<&CachedInstance> {
        self.instances.get(key)
    }
    pub fn get_as<T: Any>(&self, key: &Value) -> Option<&T> {
        self.get(key).and_then(|v| v.downcast_ref::<T>())
    }
    pub fn len(&self) -> usize {
        self.instances.len()
    }
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Debug for CacheDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheDescriptor")
            .field("entity", &self.entity)
            .field("primary_key", &self.primary_key)
            .field("name", &self.name)
            .field("instances", &self.instances.len())
            .finish()
    }
}
