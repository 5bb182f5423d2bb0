//! Cache domain - Response fingerprints, invalidation tags and the store contract

mod fingerprint;
mod repository;
mod tags;

pub use fingerprint::{fingerprint, Fingerprint, RESPONSE_KEY_PREFIX};
pub use repository::{CacheEntry, ResultCache};
pub use tags::tags;

#[cfg(test)]
pub use repository::mock::MockResultCache;
