//! Data module - archive loading, column mapping and the crash tables

mod loader;
mod schema;
mod tables;

pub use loader::ArchiveLoader;
pub use schema::ColumnMap;
pub use tables::CrashTables;
