//! typedcms - a schema-driven content store
//!
//! Content types are defined at runtime as named record schemas. Each one
//! becomes a relation in SQLite; records are validated against the schema
//! reflected from that relation and authorized against the acting user's
//! privileges and record ownership.

pub mod auth;
pub mod cli;
pub mod content;
pub mod http_server;
pub mod schema;
pub mod service;
pub mod sql;
pub mod store;
