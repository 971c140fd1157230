use crate::EntityType;
use std::fmt::{self, Display};
use thiserror::Error as ThisError;

/// Reasons a descriptor tree (or a cache descriptor) cannot be built.
///
/// None of them is recoverable: the whole operation is aborted and nothing is returned.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum DescriptorError {
    /// A type used as root or as relation target declares no primary key.
    #[error("entity `{entity}` declares no primary key")]
    MissingPrimaryKey { entity: EntityType },
    /// The metadata or the build callback violates a structural rule of the tree.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The declared relations lead back to a type already on the current path.
    #[error("cyclic relation: {path}")]
    CyclicRelation { path: RelationPath },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Root to node sequence of types, the last one being the type that was entered again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationPath(pub Vec<EntityType>);

impl RelationPath {
    pub fn types(&self) -> &[EntityType] {
        &self.0
    }
}

impl Display for RelationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(self.0.len() * 16);
        crate::separated_by(
            &mut out,
            self.0.iter(),
            |out, entity| out.push_str(entity.short_name()),
            " -> ",
        );
        f.write_str(&out)
    }
}
