//! Infrastructure Layer
//!
//! Database access and repository implementations.

pub mod database;
pub mod repositories;
