//! Live statement metadata.
//!
//! A normalized statement is described by the database itself through
//! [`Describe`], then turned into a [`StatementMetadata`] per statement
//! kind.

mod describe;
mod extract;
mod model;
mod resolve;

pub use describe::{
    Describe, DescribeError, DescribedColumn, ParameterDescription, StatementDescription,
};
pub use extract::{extract, extract_delete, extract_insert, extract_read, extract_update};
pub use model::{BoundColumn, ColumnDescriptor, ParameterDescriptor, StatementMetadata};
