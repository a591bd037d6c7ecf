//! Converts generated documents to YAML or JSON and writes them out.

use crate::openapi_builder::OpenApiDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes an OpenAPI document to YAML.
///
/// # Example
///
/// ```
/// use openapi_schema_scanner::openapi_builder::OpenApiBuilder;
/// use openapi_schema_scanner::serializer::serialize_yaml;
///
/// let document = OpenApiBuilder::new().build();
/// let yaml = serialize_yaml(&document).unwrap();
/// assert!(yaml.contains("openapi: 3.0.3"));
/// ```
pub fn serialize_yaml(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Serializes an OpenAPI document to pretty-printed JSON
pub fn serialize_json(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
///
/// An existing file is overwritten.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi_builder::{Components, Info};
    use crate::schema::{Schema, SchemaType};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_document() -> OpenApiDocument {
        let mut pet = Schema::of_type(SchemaType::Object);
        pet.add_property("name", Schema::of_type(SchemaType::String));

        let mut roots = IndexMap::new();
        roots.insert("com.acme.Pet".to_string(), Schema::reference("Pet"));

        OpenApiDocument {
            openapi: "3.0.3".to_string(),
            info: Info {
                title: "Test API".to_string(),
                version: "1.0.0".to_string(),
                description: Some("A test API".to_string()),
            },
            paths: IndexMap::new(),
            components: Some(Components {
                schemas: IndexMap::from([("Pet".to_string(), pet)]),
            }),
            roots,
        }
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&create_test_document()).unwrap();

        assert!(yaml.contains("openapi: 3.0.3"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("components:"));
        assert!(yaml.contains("#/components/schemas/Pet"));
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize_json(&create_test_document()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["openapi"], "3.0.3");
        assert_eq!(parsed["info"]["title"], "Test API");
        assert_eq!(
            parsed["components"]["schemas"]["Pet"]["properties"]["name"]["type"],
            "string"
        );
        assert_eq!(
            parsed["x-schema-roots"]["com.acme.Pet"]["$ref"],
            "#/components/schemas/Pet"
        );
        assert!(json.lines().count() > 5);
    }

    #[test]
    fn test_yaml_round_trips() {
        let document = create_test_document();
        let yaml = serialize_yaml(&document).unwrap();

        let parsed: OpenApiDocument = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, document);
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("subdir").join("nested").join("openapi.yaml");

        write_to_file("openapi: 3.0.3", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "openapi: 3.0.3");
    }

    #[test]
    fn test_write_to_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("openapi.json");

        write_to_file("initial content", &file_path).unwrap();
        write_to_file("new content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }
}
