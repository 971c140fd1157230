#[macro_use]
mod util;

mod builder;
mod cache;
mod descriptor;
mod error;
mod lazy;
mod mapper;
mod matcher;
mod metadata;
mod node;
mod row;
mod source;
mod value;

pub use ::anyhow::Context;
pub use builder::*;
pub use cache::*;
pub use descriptor::*;
pub use error::*;
pub use lazy::*;
pub use mapper::*;
pub use matcher::*;
pub use metadata::*;
pub use node::*;
pub use row::*;
pub use source::*;
pub use util::*;
pub use value::*;
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
