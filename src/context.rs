//! Scan-scoped state shared by the walker and its collaborators.

use crate::config::ScanConfig;
use crate::error::Result;
use crate::extension::ValueParser;
use crate::index::{ClassIndex, Type};
use crate::naming::NamingStrategy;
use crate::registry::{CustomSchemaRegistry, SchemaRegistry};
use log::{debug, info, warn};

/// Everything one scan reads from and writes to.
///
/// A context lives exactly as long as one scan. Several roots may be scanned
/// with the same context so that their component schemas are shared.
pub struct ScanContext<'a> {
    pub index: &'a ClassIndex,
    pub config: &'a ScanConfig,
    pub parser: &'a dyn ValueParser,
    pub registry: SchemaRegistry,
    /// Global property naming strategy
    pub naming: NamingStrategy,
    /// Types whose class-level schema is being read, innermost last
    pub scan_stack: Vec<Type>,
}

impl<'a> ScanContext<'a> {
    /// Creates a context with a fresh registry.
    ///
    /// `reserved` lists component names that already exist in the output
    /// document. Schemas supplied by the configuration are registered here.
    pub fn new(
        index: &'a ClassIndex,
        config: &'a ScanConfig,
        parser: &'a dyn ValueParser,
        reserved: impl IntoIterator<Item = String>,
    ) -> Result<Self> {
        let naming = match &config.property_naming_strategy {
            Some(name) => NamingStrategy::from_config(name)?,
            None => NamingStrategy::Identity,
        };

        let mut registry = SchemaRegistry::new(config, reserved);
        registry.register_config_schemas(index, config, parser);

        debug!(
            "Scan context ready: {} classes, naming strategy {:?}",
            index.len(),
            naming
        );

        Ok(Self {
            index,
            config,
            parser,
            registry,
            naming,
            scan_stack: Vec::new(),
        })
    }

    /// Invokes the custom registry selected by the configuration, if any
    pub fn apply_custom_registry(&mut self, registries: &[&dyn CustomSchemaRegistry]) {
        let Some(selected) = &self.config.custom_schema_registry else {
            return;
        };

        match registries.iter().find(|r| r.name() == selected) {
            Some(registry) => {
                info!("Invoking custom schema registry {}", selected);
                registry.register_schemas(self.index, &mut self.registry);
            }
            None => warn!("Custom schema registry {} is not available", selected),
        }
    }

    /// Active serialization views
    pub fn views(&self) -> &'a [String] {
        &self.config.json_views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::extension::JsonValueParser;
    use crate::schema::{Schema, SchemaType};

    struct MoneyRegistry;

    impl CustomSchemaRegistry for MoneyRegistry {
        fn name(&self) -> &str {
            "money"
        }

        fn register_schemas(&self, index: &ClassIndex, registry: &mut SchemaRegistry) {
            let mut money = Schema::of_type(SchemaType::String);
            money.pattern = Some("^[0-9]+\\.[0-9]{2}$".to_string());
            registry.register_named(index, &Type::class("com.acme.Money"), &[], money, "Amount");
        }
    }

    #[test]
    fn test_custom_registry_invoked_when_named() {
        let index = ClassIndex::new(Vec::new());
        let config = ScanConfig {
            custom_schema_registry: Some("money".to_string()),
            ..ScanConfig::default()
        };
        let mut context = ScanContext::new(&index, &config, &JsonValueParser, Vec::new()).unwrap();

        context.apply_custom_registry(&[&MoneyRegistry]);

        assert!(context.registry.has_schema(&Type::class("com.acme.Money"), &[]));
        assert_eq!(
            context.registry.name_of(&Type::class("com.acme.Money"), &[]),
            Some("Amount")
        );
    }

    #[test]
    fn test_custom_registry_skipped_when_not_named() {
        let index = ClassIndex::new(Vec::new());
        let config = ScanConfig::default();
        let mut context = ScanContext::new(&index, &config, &JsonValueParser, Vec::new()).unwrap();

        context.apply_custom_registry(&[&MoneyRegistry]);

        assert!(context.registry.definitions().is_empty());
    }

    #[test]
    fn test_invalid_naming_strategy() {
        let index = ClassIndex::new(Vec::new());
        let config = ScanConfig {
            property_naming_strategy: Some("SHOUTING".to_string()),
            ..ScanConfig::default()
        };

        let result = ScanContext::new(&index, &config, &JsonValueParser, Vec::new());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
