//! Backend domain - Contract of the document-search service

mod client;

pub use client::{BackendRequest, BackendResponse, SearchBackend};

#[cfg(test)]
pub use client::mock::MockSearchBackend;
