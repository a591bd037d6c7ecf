//! The in-memory API description document.
//!
//! Scanned roots share one registry per [`OpenApiBuilder::scan`] call, so a type
//! reached from several roots is described once under `components.schemas`.

use crate::config::ScanConfig;
use crate::context::ScanContext;
use crate::error::Result;
use crate::extension::{JsonValueParser, ValueParser};
use crate::index::{ClassIndex, Type};
use crate::registry::CustomSchemaRegistry;
use crate::schema::Schema;
use crate::schema_generator;
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const OPENAPI_VERSION: &str = "3.0.3";

static JSON_VALUE_PARSER: JsonValueParser = JsonValueParser;

/// OpenAPI document builder
pub struct OpenApiBuilder<'a> {
    info: Info,
    /// Component schemas, including those present before any scan
    schemas: IndexMap<String, Schema>,
    /// Schema of each scanned root, keyed by its type signature
    roots: IndexMap<String, Schema>,
    parser: &'a dyn ValueParser,
    registries: Vec<&'a dyn CustomSchemaRegistry>,
}

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// OpenAPI Components object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Schema>,
}

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    /// Always empty; endpoints are outside the scope of a schema scan
    #[serde(default)]
    pub paths: IndexMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    /// Reference (or inline schema) of every scanned root type
    #[serde(rename = "x-schema-roots", default, skip_serializing_if = "IndexMap::is_empty")]
    pub roots: IndexMap<String, Schema>,
}

impl OpenApiDocument {
    /// Resolves a root to its component body when it was registered
    pub fn root_schema(&self, signature: &str) -> Option<&Schema> {
        let root = self.roots.get(signature)?;
        match root.ref_name() {
            Some(name) => self.components.as_ref()?.schemas.get(name),
            None => Some(root),
        }
    }
}

impl Default for OpenApiBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> OpenApiBuilder<'a> {
    /// Create a new OpenApiBuilder with default info
    pub fn new() -> Self {
        debug!("Initializing OpenApiBuilder");
        Self {
            info: Info {
                title: "Generated API".to_string(),
                version: "1.0.0".to_string(),
                description: Some("Schemas generated from class metadata".to_string()),
            },
            schemas: IndexMap::new(),
            roots: IndexMap::new(),
            parser: &JSON_VALUE_PARSER,
            registries: Vec::new(),
        }
    }

    /// Set custom info for the API
    pub fn with_info(mut self, title: String, version: String, description: Option<String>) -> Self {
        self.info = Info {
            title,
            version,
            description,
        };
        self
    }

    /// Replaces the value-parsing hook
    pub fn with_parser(mut self, parser: &'a dyn ValueParser) -> Self {
        self.parser = parser;
        self
    }

    /// Makes a custom schema registry available to the `custom-schema-registry` setting
    pub fn with_registry(mut self, registry: &'a dyn CustomSchemaRegistry) -> Self {
        self.registries.push(registry);
        self
    }

    /// Adds a component schema that exists independently of any scan.
    ///
    /// Its name is never reused for a scanned type.
    pub fn with_schema(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.schemas.insert(name.into(), schema);
        self
    }

    /// Scans every root with one shared registry and stores the resulting
    /// component schemas
    pub fn scan(&mut self, index: &ClassIndex, config: &ScanConfig, roots: &[Type]) -> Result<()> {
        let reserved: Vec<String> = self.schemas.keys().cloned().collect();
        let mut ctx = ScanContext::new(index, config, self.parser, reserved)?;
        ctx.apply_custom_registry(&self.registries);

        for root in roots {
            let schema = schema_generator::process(&mut ctx, root)?;
            debug!("Root {} resolved to {:?}", root, schema.ref_name());
            self.roots.insert(root.to_string(), schema);
        }

        let definitions = ctx.registry.into_definitions();
        info!("Scan produced {} component schemas", definitions.len());
        self.schemas.extend(definitions);
        Ok(())
    }

    /// The schema stored for a scanned root
    pub fn root(&self, ty: &Type) -> Option<&Schema> {
        self.roots.get(&ty.to_string())
    }

    pub fn build(self) -> OpenApiDocument {
        debug!(
            "Building OpenAPI document with {} schemas and {} roots",
            self.schemas.len(),
            self.roots.len()
        );

        let components = if self.schemas.is_empty() {
            None
        } else {
            Some(Components {
                schemas: self.schemas,
            })
        };

        OpenApiDocument {
            openapi: OPENAPI_VERSION.to_string(),
            info: self.info,
            paths: IndexMap::new(),
            components,
            roots: self.roots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{ClassInfo, FieldInfo};
    use crate::registry::SchemaRegistry;
    use crate::schema::SchemaType;
    use pretty_assertions::assert_eq;

    fn pet_index() -> ClassIndex {
        let mut pet = ClassInfo::new("com.acme.Pet");
        pet.fields
            .push(FieldInfo::new("name", Type::class("java.lang.String")));
        let mut owner = ClassInfo::new("com.acme.Owner");
        owner
            .fields
            .push(FieldInfo::new("pet", Type::class("com.acme.Pet")));
        ClassIndex::new(vec![pet, owner])
    }

    #[test]
    fn test_empty_document() {
        let document = OpenApiBuilder::new().build();

        assert_eq!(document.openapi, "3.0.3");
        assert!(document.paths.is_empty());
        assert!(document.components.is_none());
        assert!(document.roots.is_empty());
    }

    #[test]
    fn test_with_info() {
        let document = OpenApiBuilder::new()
            .with_info("Pets".to_string(), "2.0.0".to_string(), None)
            .build();

        assert_eq!(
            document.info,
            Info {
                title: "Pets".to_string(),
                version: "2.0.0".to_string(),
                description: None,
            }
        );
    }

    #[test]
    fn test_roots_share_components() {
        let index = pet_index();
        let mut builder = OpenApiBuilder::new();
        let roots = [Type::class("com.acme.Owner"), Type::class("com.acme.Pet")];

        builder.scan(&index, &ScanConfig::default(), &roots).unwrap();
        let document = builder.build();

        let schemas = &document.components.as_ref().unwrap().schemas;
        assert_eq!(schemas.keys().collect::<Vec<_>>(), vec!["Owner", "Pet"]);
        assert_eq!(document.roots["com.acme.Owner"], Schema::reference("Owner"));
        assert_eq!(document.roots["com.acme.Pet"], Schema::reference("Pet"));
        assert!(document.root_schema("com.acme.Pet").unwrap().is_type(SchemaType::Object));
    }

    #[test]
    fn test_existing_names_are_reserved() {
        let index = pet_index();
        let mut builder = OpenApiBuilder::new().with_schema("Pet", Schema::of_type(SchemaType::String));

        builder
            .scan(&index, &ScanConfig::default(), &[Type::class("com.acme.Pet")])
            .unwrap();
        let document = builder.build();

        let schemas = &document.components.as_ref().unwrap().schemas;
        assert_eq!(schemas["Pet"], Schema::of_type(SchemaType::String));
        assert_eq!(document.roots["com.acme.Pet"], Schema::reference("Pet1"));
    }

    #[test]
    fn test_inline_root_without_registration() {
        let index = pet_index();
        let config = ScanConfig {
            schema_references_enable: false,
            ..ScanConfig::default()
        };
        let mut builder = OpenApiBuilder::new();

        builder
            .scan(&index, &config, &[Type::class("com.acme.Pet")])
            .unwrap();
        let document = builder.build();

        assert!(document.components.is_none());
        let root = document.root_schema("com.acme.Pet").unwrap();
        assert!(root.is_type(SchemaType::Object));
        assert!(root.properties.as_ref().unwrap().contains_key("name"));
    }

    struct MoneyRegistry;

    impl CustomSchemaRegistry for MoneyRegistry {
        fn name(&self) -> &str {
            "money"
        }

        fn register_schemas(&self, index: &ClassIndex, registry: &mut SchemaRegistry) {
            let money = Type::class("com.acme.Money");
            registry.register(index, &money, &[], Schema::of_type(SchemaType::String));
        }
    }

    #[test]
    fn test_custom_registry_is_invoked() {
        let mut price = ClassInfo::new("com.acme.Price");
        price
            .fields
            .push(FieldInfo::new("amount", Type::class("com.acme.Money")));
        let index = ClassIndex::new(vec![price, ClassInfo::new("com.acme.Money")]);
        let config = ScanConfig {
            custom_schema_registry: Some("money".to_string()),
            ..ScanConfig::default()
        };
        let registry = MoneyRegistry;
        let mut builder = OpenApiBuilder::new().with_registry(&registry);

        builder
            .scan(&index, &config, &[Type::class("com.acme.Price")])
            .unwrap();
        let document = builder.build();

        let price = document.root_schema("com.acme.Price").unwrap();
        assert_eq!(
            price.properties.as_ref().unwrap()["amount"],
            Schema::reference("Money")
        );
        assert_eq!(
            document.components.unwrap().schemas["Money"],
            Schema::of_type(SchemaType::String)
        );
    }
}
