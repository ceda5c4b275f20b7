//! Domain types shared across Harati Store crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; handlers map them to page models.

pub mod id;
pub mod pagination;
pub mod profile;
pub mod role;
pub mod settings;
