//! Enrichment domain - Facet metadata derived from aggregation buckets

mod aggregation;
mod enricher;
mod service;

pub use aggregation::{
    attribute_code, collect_attribute_options, AttributeOptions, AGGREGATION_PREFIXES,
    OPTIONS_SUFFIX,
};
pub use enricher::AttributeEnricher;
pub use service::{AttributeOption, AttributeRecord, AttributeService, NoopAttributeService};

#[cfg(test)]
pub use service::mock::MockAttributeService;
