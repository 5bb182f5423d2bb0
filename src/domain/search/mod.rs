//! Search domain - Requests, validation, backend results and output formats

mod format;
mod request;
mod result;
mod validation;

pub use request::{
    RequestFormat, ResponseFormat, SearchMethod, SearchParams, SearchRequest, GROUP_ID_FIELD,
    GROUP_TOKEN_FIELD,
};
pub use result::{Aggregation, Bucket, BucketList, Hit, Hits, RawSearchResult};
pub use validation::{RequestValidator, SearchPath, ValidatedRequest, SEARCH_SUFFIX};
