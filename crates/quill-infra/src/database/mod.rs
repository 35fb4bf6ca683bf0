//! Entity store backends.

mod memory;

#[cfg(feature = "postgres")]
mod connections;
#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres;

pub use memory::MemoryStore;

#[cfg(feature = "postgres")]
pub use connections::{DatabaseConfig, connect};
#[cfg(feature = "postgres")]
pub use postgres::{
    PostgresCommentStore, PostgresPostStore, PostgresTagStore, PostgresUserStore,
};

#[cfg(test)]
mod tests;
