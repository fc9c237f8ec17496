//! Database module
//!
//! SQLite connection pool and migrations for the persistent record backend.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
