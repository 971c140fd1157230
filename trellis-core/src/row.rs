use crate::{LazyLoad, LazyValue, QueryHandle, Value};
use std::{borrow::Cow, sync::Arc};

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(names: RowNames, values: Row) -> Self {
        Self {
            labels: names,
            values,
        }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values()[i])
    }
}

impl<N, V> FromIterator<(N, V)> for RowLabeled
where
    N: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let (labels, values): (Vec<String>, Vec<Value>) =
            iter.into_iter().map(|(n, v)| (n.into(), v.into())).unzip();
        Self::new(labels.into(), values.into())
    }
}

/// The columns of a row that belong to one descriptor node.
///
/// Columns are labeled `{table_alias}{separator}{column}` by the query layer, a view strips the
/// prefix so that entity code can ask for its own column names.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    row: &'a RowLabeled,
    prefix: &'a str,
    table: &'a str,
    primary_key: &'a str,
    handle: &'a QueryHandle,
}

impl<'a> RowView<'a> {
    pub fn new(
        row: &'a RowLabeled,
        prefix: &'a str,
        table: &'a str,
        primary_key: &'a str,
        handle: &'a QueryHandle,
    ) -> Self {
        Self {
            row,
            prefix,
            table,
            primary_key,
            handle,
        }
    }
    pub fn row(&self) -> &'a RowLabeled {
        self.row
    }
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.row
            .labels
            .iter()
            .position(|label| {
                label.len() == self.prefix.len() + column.len()
                    && label.starts_with(self.prefix)
                    && label.ends_with(column)
            })
            .map(|i| &self.row.values[i])
    }
    pub fn id(&self) -> Option<&'a Value> {
        self.get(self.primary_key).filter(|v| !v.is_null())
    }
    /// Iterates the columns of this view, labels without the prefix.
    pub fn columns(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        let prefix = self.prefix;
        self.row
            .labels
            .iter()
            .zip(self.row.values.iter())
            .filter_map(move |(label, value)| {
                label.strip_prefix(prefix).map(|c| (c, value))
            })
    }
    /// A deferred value for `column`, fetched later through the query handle.
    ///
    /// Fails when the row carries no identity for this node.
    pub fn lazy(&self, column: impl Into<Cow<'static, str>>) -> crate::Result<LazyValue> {
        let column = column.into();
        let Some(id) = self.id() else {
            return Err(crate::Error::msg(format!(
                "Cannot defer column `{}` of `{}`: the row has no value for primary key `{}`",
                column, self.table, self.primary_key
            )));
        };
        Ok(LazyValue::new(
            LazyLoad {
                table: self.table.to_owned().into(),
                primary_key: self.primary_key.to_owned().into(),
                column,
                id: id.clone(),
            },
            self.handle.clone(),
        ))
    }
}
