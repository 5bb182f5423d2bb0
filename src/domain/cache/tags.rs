//! Invalidation tags attached to cached responses

use std::collections::BTreeSet;

use crate::domain::search::Hit;

/// Computes the invalidation tags for a processed result set.
///
/// Returns an empty set when output caching is disabled; callers skip the
/// cache write in that case.
pub fn tags(entity_type: &str, items: &[Hit], cache_enabled: bool) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();

    if !cache_enabled {
        return tags;
    }

    tags.insert(entity_type.to_string());

    let prefix: String = entity_type
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();

    for id in items.iter().filter_map(Hit::identifier) {
        tags.insert(format!("{}{}", prefix, id));
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(source: serde_json::Value) -> Hit {
        Hit::from_source(source)
    }

    #[test]
    fn test_product_tags() {
        let items = vec![hit(json!({"id": "7"})), hit(json!({"id": "9"})), hit(json!({}))];

        let result = tags("product", &items, true);

        let expected: BTreeSet<String> = ["product", "P7", "P9"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_numeric_identifiers() {
        let items = vec![hit(json!({"id": 12})), hit(json!({"id": 12}))];

        let result = tags("category", &items, true);

        assert_eq!(result.len(), 2);
        assert!(result.contains("category"));
        assert!(result.contains("C12"));
    }

    #[test]
    fn test_disabled_cache_yields_no_tags() {
        let items = vec![hit(json!({"id": "7"}))];

        assert!(tags("product", &items, false).is_empty());
    }

    #[test]
    fn test_entity_tag_present_without_items() {
        let result = tags("cms", &[], true);

        assert_eq!(result.len(), 1);
        assert!(result.contains("cms"));
    }
}
