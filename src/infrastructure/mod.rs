//! Infrastructure layer: database connection, entities, migrations and the
//! generic collection access layer.

pub mod database;

pub use database::{init_database, DatabaseConfig};
