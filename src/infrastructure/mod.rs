//! Infrastructure layer - External service implementations

pub mod attribute;
pub mod auth;
pub mod backend;
pub mod cache;
pub mod observability;
pub mod query;
pub mod services;
