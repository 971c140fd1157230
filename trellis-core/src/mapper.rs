use crate::{
    Context, EntityDescriptor, EntityType, Error, Node, QueryHandle, Result, RowFactory,
    RowLabeled, RowView, Value,
};
use std::{any::Any, borrow::Cow, fmt::Debug};

/// Converts the row columns of one node into an instance.
pub trait RowMapper: Send + Sync + Debug {
    /// Returns `None` when the row holds nothing for this node (for example an outer join that
    /// produced no match).
    fn map_row(
        &self,
        row: &RowLabeled,
        node: &Node<EntityDescriptor>,
    ) -> Result<Option<Box<dyn Any + Send>>>;
    /// Handle used by the instances to fetch deferred columns after materialization.
    fn query_handle(&self) -> &QueryHandle;
}

/// Extracts the identity of the node's entity from a row.
pub trait IdMapper: Send + Sync + Debug {
    fn map_id(&self, row: &RowLabeled) -> Result<Option<Value>>;
}

/// Columns of a node, produced when the entity has no row factory.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub entity: EntityType,
    pub id: Value,
    /// Column names without the alias prefix, with their values.
    pub columns: Vec<(String, Value)>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find_map(|(c, v)| if c == column { Some(v) } else { None })
    }
}

/// The row mapper the tree builder attaches to every query descriptor.
#[derive(Clone)]
pub struct EntityRowMapper {
    pub entity: EntityType,
    pub table_name: Cow<'static, str>,
    pub primary_key: Cow<'static, str>,
    pub column_prefix: String,
    pub factory: Option<RowFactory>,
    pub handle: QueryHandle,
}

impl EntityRowMapper {
    pub fn view<'a>(&'a self, row: &'a RowLabeled) -> RowView<'a> {
        RowView::new(
            row,
            &self.column_prefix,
            &self.table_name,
            &self.primary_key,
            &self.handle,
        )
    }
}

impl Debug for EntityRowMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRowMapper")
            .field("entity", &self.entity)
            .field("table_name", &self.table_name)
            .field("primary_key", &self.primary_key)
            .field("column_prefix", &self.column_prefix)
            .field("factory", &self.factory.map(|_| ".."))
            .field("handle", &self.handle)
            .finish()
    }
}

impl RowMapper for EntityRowMapper {
    fn map_row(
        &self,
        row: &RowLabeled,
        _node: &Node<EntityDescriptor>,
    ) -> Result<Option<Box<dyn Any + Send>>> {
        let view = self.view(row);
        let Some(id) = view.id() else {
            return Ok(None);
        };
        let instance: Box<dyn Any + Send> = match self.factory {
            Some(factory) => factory(view).with_context(|| {
                format!(
                    "While building `{}` with {} = {}",
                    self.entity, self.primary_key, id
                )
            })?,
            None => Box::new(Record {
                entity: self.entity,
                id: id.clone(),
                columns: view
                    .columns()
                    .map(|(c, v)| (c.to_owned(), v.clone()))
                    .collect(),
            }),
        };
        Ok(Some(instance))
    }
    fn query_handle(&self) -> &QueryHandle {
        &self.handle
    }
}

/// Reads the identity from the primary key column of the node.
#[derive(Debug, Clone)]
pub struct PkColumnMapper {
    /// Full label of the column inside the row.
    pub label: String,
}

impl IdMapper for PkColumnMapper {
    fn map_id(&self, row: &RowLabeled) -> Result<Option<Value>> {
        let Some(value) = row.get_column(&self.label) else {
            return Err(Error::msg(format!(
                "The row has no column `{}`, available columns: {}",
                self.label,
                row.names().join(", ")
            )));
        };
        Ok(if value.is_null() {
            None
        } else {
            Some(value.clone())
        })
    }
}
