use crate::{Error, Result, Value};
use futures::{FutureExt, future::BoxFuture};
use std::{
    borrow::Cow,
    fmt::{self, Debug, Display},
    sync::Arc,
};

/// Everything needed to fetch a single deferred column of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyLoad {
    /// Table of the entity.
    pub table: Cow<'static, str>,
    /// Primary key column used to locate the row.
    pub primary_key: Cow<'static, str>,
    /// Column to fetch.
    pub column: Cow<'static, str>,
    /// Identity of the entity.
    pub id: Value,
}

impl Display for LazyLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} where {} = {}",
            self.table, self.column, self.primary_key, self.id
        )
    }
}

/// Query execution capability used to fetch columns after the row was materialized (large
/// values like blobs).
///
/// This is the only part of the query layer the descriptors know about.
pub trait LazyLoader: Send + Sync {
    fn load(&self, request: LazyLoad) -> BoxFuture<'_, Result<Value>>;
}

impl<F> LazyLoader for F
where
    F: Fn(LazyLoad) -> Result<Value> + Send + Sync,
{
    fn load(&self, request: LazyLoad) -> BoxFuture<'_, Result<Value>> {
        futures::future::ready(self(request)).boxed()
    }
}

struct Detached;

impl LazyLoader for Detached {
    fn load(&self, request: LazyLoad) -> BoxFuture<'_, Result<Value>> {
        let error = Error::msg(format!(
            "Cannot load {}: the descriptor tree was built without a query handle",
            request
        ));
        log::error!("{:#}", error);
        futures::future::ready(Err(error)).boxed()
    }
}

/// Shared handle to a [`LazyLoader`], stored into every row mapper the builder creates.
#[derive(Clone)]
pub struct QueryHandle(Arc<dyn LazyLoader>);

impl QueryHandle {
    pub fn new(loader: impl LazyLoader + 'static) -> Self {
        Self(Arc::new(loader))
    }
    /// Handle that is not connected to any query layer, every load fails.
    pub fn detached() -> Self {
        Self(Arc::new(Detached))
    }
    pub fn load(&self, request: LazyLoad) -> BoxFuture<'_, Result<Value>> {
        self.0.load(request)
    }
    /// True if both handles point to the same loader.
    pub fn same_as(&self, other: &QueryHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for QueryHandle {
    fn default() -> Self {
        Self::detached()
    }
}

impl Debug for QueryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("QueryHandle")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// A column value that is fetched on demand.
#[derive(Debug, Clone)]
pub struct LazyValue {
    request: LazyLoad,
    handle: QueryHandle,
}

impl LazyValue {
    pub fn new(request: LazyLoad, handle: QueryHandle) -> Self {
        Self { request, handle }
    }
    pub fn request(&self) -> &LazyLoad {
        &self.request
    }
    pub async fn load(&self) -> Result<Value> {
        self.handle.load(self.request.clone()).await
    }
}
