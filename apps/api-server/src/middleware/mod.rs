//! Middleware - authentication extractors and error mapping.

pub mod auth;
pub mod error;
