//! Configuration for charmatrix
//!
//! Provides types, discovery and loading for `charmatrix.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
