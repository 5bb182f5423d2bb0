//! Attribute option extraction from aggregation buckets

use std::collections::BTreeMap;

use crate::domain::search::Aggregation;

/// Prefixes the query layer puts on facet aggregation names
pub const AGGREGATION_PREFIXES: [&str; 2] = ["agg_terms_", "agg_range_"];

/// Suffix of the "all options" variant of a facet aggregation
pub const OPTIONS_SUFFIX: &str = "_options";

/// Attribute code → distinct option identifiers, in first-seen order
pub type AttributeOptions = BTreeMap<String, Vec<String>>;

/// Recovers the attribute code from an aggregation name
pub fn attribute_code(aggregation_name: &str) -> &str {
    let name = AGGREGATION_PREFIXES
        .iter()
        .find_map(|prefix| aggregation_name.strip_prefix(prefix))
        .unwrap_or(aggregation_name);

    name.strip_suffix(OPTIONS_SUFFIX).unwrap_or(name)
}

/// Merges bucket keys of every aggregation that maps to the same attribute.
///
/// Aggregations without buckets contribute nothing.
pub fn collect_attribute_options(aggregations: &BTreeMap<String, Aggregation>) -> AttributeOptions {
    let mut options = AttributeOptions::new();

    for (name, aggregation) in aggregations {
        let buckets = aggregation.bucket_list();

        if buckets.is_empty() {
            continue;
        }

        let code = attribute_code(name);

        if code.is_empty() {
            continue;
        }

        let values = options.entry(code.to_string()).or_default();

        for key in buckets.iter().filter_map(|b| b.key_string()) {
            if !values.contains(&key) {
                values.push(key);
            }
        }
    }

    options.retain(|_, values| !values.is_empty());
    options
}
