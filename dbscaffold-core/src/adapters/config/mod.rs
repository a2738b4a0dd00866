//! Configuration types for schema sources.
//!
//! # Security
//! These configuration structs intentionally do NOT store passwords or
//! credentials.

mod connection;

pub use connection::ConnectionConfig;
