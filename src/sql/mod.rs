//! # Statement Generation
//!
//! Turns validated content types and records into statements for the
//! store. DDL covers create/drop of content type relations; DML covers
//! single-record insert, update, select and delete.

pub mod ddl;
pub mod dml;
mod statement;

pub use ddl::{generate_create, generate_drop, generate_identity_create, IDENTITY_RELATION};
pub use dml::{
    generate_delete, generate_insert, generate_select_all, generate_select_one,
    generate_select_owner, generate_update,
};
pub use statement::{SqlValue, Statement};
pub(crate) use statement::quote_ident;
