//! # Quill Core
//!
//! The domain layer of the Quill publishing API.
//! This crate contains pure business logic with zero infrastructure
//! dependencies: entities, the access policy engine, query scoping, slug
//! generation, tag resolution, and the resource operations that tie them
//! together over port traits.

pub mod domain;
pub mod error;
pub mod ops;
pub mod policy;
pub mod ports;
pub mod query;
pub mod slug;

pub use error::CoreError;
pub use policy::Caller;
