//! Attribute service infrastructure

mod http_service;

pub use http_service::{AttributesConfig, HttpAttributeService};
