//! Typed, lazily loaded column storage for binary tables.
//!
//! Each column of a table is a separately addressable block of strongly typed
//! scalars. A [Column] is created from its schema alone and only reads its
//! block through a [FileAdapter] the first time its data is needed. It can be
//! released again at any point and reshaped by inserting or removing rows.
//!
//! The engine is written once, generic over the [Element] descriptor of each
//! supported scalar kind.

mod adapter;
mod cache;
mod column;
mod config;
mod datatype;
mod element;
mod error;
mod mutate;
mod null;
mod offset;
mod shared;
mod table;

pub use self::adapter::{ColumnId, ColumnSchema, FileAdapter, MemoryAdapter};
pub use self::column::{open_column, Column, ColumnAccess};
pub use self::config::CopyOptions;
pub use self::datatype::StoredDataType;
pub use self::element::{decode_block, encode_block, Bit, Element};
pub use self::error::ColumnError;
pub use self::null::NullPolicy;
pub use self::offset::RowLayout;
pub use self::shared::SharedColumn;
pub use self::table::{Table, TableError};
