//! Loading the OKR table from disk.

pub mod loader;
pub mod schema;

pub use loader::DataSource;
