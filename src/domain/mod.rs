//! Domain layer - Core gateway logic and contracts

pub mod auth;
pub mod backend;
pub mod cache;
pub mod enrichment;
pub mod error;
pub mod processor;
pub mod query;
pub mod search;

pub use auth::{DisabledGroupTokenDecoder, GroupTokenDecoder};
pub use backend::{BackendRequest, BackendResponse, SearchBackend};
pub use cache::{fingerprint, tags, CacheEntry, Fingerprint, ResultCache};
pub use enrichment::{
    collect_attribute_options, AttributeEnricher, AttributeOptions, AttributeRecord,
    AttributeService, NoopAttributeService,
};
pub use error::DomainError;
pub use processor::{
    PassthroughProcessor, ProcessContext, ProcessorRegistry, ResultProcessor, PRODUCT_ENTITY,
};
pub use query::QueryBuilder;
pub use search::{
    Hit, RawSearchResult, RequestValidator, ResponseFormat, SearchMethod, SearchParams,
    SearchRequest,
};
