use crate::index::{ClassIndex, ClassInfo};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Parser for class descriptor files.
///
/// A descriptor holds one class record or a list of them, in YAML or JSON:
///
/// ```yaml
/// - name: com.acme.Pet
///   fields:
///     - name: name
///       type: java.lang.String
///       annotations:
///         - name: javax.validation.constraints.NotNull
/// ```
///
/// `.json` files are read as JSON, everything else as YAML.
pub struct DescriptorParser;

/// A successfully parsed descriptor file
#[derive(Debug)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub classes: Vec<ClassInfo>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Descriptor {
    Many(Vec<ClassInfo>),
    One(Box<ClassInfo>),
}

impl From<Descriptor> for Vec<ClassInfo> {
    fn from(descriptor: Descriptor) -> Self {
        match descriptor {
            Descriptor::Many(classes) => classes,
            Descriptor::One(class) => vec![*class],
        }
    }
}

impl DescriptorParser {
    /// Parses a single descriptor file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds no valid class record.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        let classes = Self::parse_str(&content, is_json)
            .with_context(|| format!("Failed to parse class descriptor: {}", path.display()))?;

        debug!("Parsed {} classes from {}", classes.len(), path.display());

        Ok(ParsedFile {
            path: path.to_path_buf(),
            classes,
        })
    }

    /// Parses descriptor content; an empty document holds no classes
    pub fn parse_str(content: &str, is_json: bool) -> Result<Vec<ClassInfo>> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let descriptor: Descriptor = if is_json {
            serde_json::from_str(content)?
        } else {
            serde_yaml::from_str(content)?
        };
        Ok(descriptor.into())
    }

    /// Parses multiple descriptor files, continuing even if some fail.
    ///
    /// Returns one result per input path.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| {
                Self::parse_file(path).map_err(|e| {
                    warn!("Failed to parse {}: {:#}", path.display(), e);
                    e
                })
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }

    /// Builds the class index from parsed files, skipping failed ones
    pub fn build_index(results: Vec<Result<ParsedFile>>) -> ClassIndex {
        let classes: Vec<ClassInfo> = results
            .into_iter()
            .filter_map(Result::ok)
            .flat_map(|parsed| parsed.classes)
            .collect();

        info!("Loaded {} class records", classes.len());
        ClassIndex::new(classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{ClassKind, Type};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    #[test]
    fn test_parse_single_class_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let content = r#"
name: com.acme.Pet
fields:
  - name: tags
    type: java.util.List<java.lang.String>
    annotations:
      - javax.validation.constraints.NotNull
"#;
        let file_path = create_temp_file(&temp_dir, "Pet.yaml", content);

        let parsed = DescriptorParser::parse_file(&file_path).unwrap();

        assert_eq!(parsed.path, file_path);
        assert_eq!(parsed.classes.len(), 1);
        let pet = &parsed.classes[0];
        assert_eq!(pet.name, "com.acme.Pet");
        assert_eq!(
            pet.fields[0].ty,
            Type::parameterized("java.util.List", vec![Type::class("java.lang.String")])
        );
        assert_eq!(
            pet.fields[0].annotations[0].name,
            "javax.validation.constraints.NotNull"
        );
    }

    #[test]
    fn test_parse_class_list_json() {
        let temp_dir = TempDir::new().unwrap();
        let content = r#"[
            { "name": "com.acme.Status", "kind": "enum" },
            { "name": "com.acme.Box", "type_parameters": ["T"] }
        ]"#;
        let file_path = create_temp_file(&temp_dir, "classes.json", content);

        let parsed = DescriptorParser::parse_file(&file_path).unwrap();

        assert_eq!(parsed.classes.len(), 2);
        assert_eq!(parsed.classes[0].kind, ClassKind::Enum);
    }

    #[test]
    fn test_parse_invalid_descriptor() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_temp_file(&temp_dir, "broken.yaml", "fields: [");

        let err = DescriptorParser::parse_file(&file_path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse class descriptor"));
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let err = DescriptorParser::parse_file(Path::new("/nonexistent/Pet.yaml")).unwrap_err();

        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn test_parse_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_temp_file(&temp_dir, "empty.yaml", "");

        let parsed = DescriptorParser::parse_file(&file_path).unwrap();

        assert!(parsed.classes.is_empty());
    }

    #[test]
    fn test_build_index_skips_failures() {
        let temp_dir = TempDir::new().unwrap();
        let good = create_temp_file(&temp_dir, "Pet.yaml", "name: com.acme.Pet");
        let bad = create_temp_file(&temp_dir, "Bad.yaml", "name: [");

        let results = DescriptorParser::parse_files(&[good, bad]);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);

        let index = DescriptorParser::build_index(results);
        assert!(index.get("com.acme.Pet").is_some());
    }
}
