//! # Repository Module
//!
//! One repository per record collection, each a thin struct over the shared
//! `SqlitePool`. Cross-collection writes (checkout, backup import) live in
//! their own modules so a repository never reaches into another's tables.

pub mod inventory;
pub mod product;
pub mod sale;
pub mod settings;
pub mod user;
