//! Database connection pool and repositories.

pub mod connection;
pub mod employee;

pub use connection::{connect, get_version, test_connection};
