//! Processor dispatch by entity type

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::domain::DomainError;

use super::result_processor::{PassthroughProcessor, ResultProcessor};

/// Registry key of the fallback processor
pub const DEFAULT_PROCESSOR: &str = "default";

/// Immutable entity-type → processor map with a guaranteed default
#[derive(Debug, Clone)]
pub struct ProcessorRegistry {
    processors: HashMap<String, Arc<dyn ResultProcessor>>,
    default: Arc<dyn ResultProcessor>,
}

impl ProcessorRegistry {
    pub fn builder() -> ProcessorRegistryBuilder {
        ProcessorRegistryBuilder::default()
    }

    /// Registry with only the pass-through default
    pub fn passthrough() -> Self {
        Self {
            processors: HashMap::new(),
            default: Arc::new(PassthroughProcessor),
        }
    }

    /// Processor for an entity type, falling back to the default
    pub fn resolve(&self, entity_type: &str) -> Arc<dyn ResultProcessor> {
        match self.processors.get(entity_type) {
            Some(processor) => processor.clone(),
            None => {
                debug!(entity_type = %entity_type, "No processor registered, using default");
                self.default.clone()
            }
        }
    }

    pub fn is_registered(&self, entity_type: &str) -> bool {
        self.processors.contains_key(entity_type)
    }
}

/// Startup-time builder; `build` fails without a default processor
#[derive(Debug, Default)]
pub struct ProcessorRegistryBuilder {
    processors: HashMap<String, Arc<dyn ResultProcessor>>,
}

impl ProcessorRegistryBuilder {
    pub fn register(
        mut self,
        entity_type: impl Into<String>,
        processor: Arc<dyn ResultProcessor>,
    ) -> Self {
        self.processors.insert(entity_type.into(), processor);
        self
    }

    pub fn with_default(self, processor: Arc<dyn ResultProcessor>) -> Self {
        self.register(DEFAULT_PROCESSOR, processor)
    }

    pub fn build(mut self) -> Result<ProcessorRegistry, DomainError> {
        let default = self.processors.remove(DEFAULT_PROCESSOR).ok_or_else(|| {
            DomainError::configuration(format!(
                "Processor registry requires a '{}' processor",
                DEFAULT_PROCESSOR
            ))
        })?;

        Ok(ProcessorRegistry {
            processors: self.processors,
            default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::result_processor::mock::MockProcessor;
    use super::*;

    #[test]
    fn test_resolve_registered() {
        let registry = ProcessorRegistry::builder()
            .with_default(Arc::new(MockProcessor::new("fallback")))
            .register("product", Arc::new(MockProcessor::new("products")))
            .build()
            .unwrap();

        assert_eq!(registry.resolve("product").name(), "products");
        assert!(registry.is_registered("product"));
    }

    #[test]
    fn test_unregistered_falls_back_to_default() {
        let registry = ProcessorRegistry::builder()
            .with_default(Arc::new(MockProcessor::new("fallback")))
            .build()
            .unwrap();

        assert_eq!(registry.resolve("cms_page").name(), "fallback");
        assert_eq!(registry.resolve("").name(), "fallback");
    }

    #[test]
    fn test_missing_default_is_configuration_error() {
        let result = ProcessorRegistry::builder()
            .register("product", Arc::new(MockProcessor::new("products")))
            .build();

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_passthrough_registry() {
        let registry = ProcessorRegistry::passthrough();

        assert_eq!(registry.resolve("anything").name(), "passthrough");
    }
}
