//! The Schema Node model and its merge semantics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Prefix of every reference into the document's component schemas
pub const COMPONENTS_PREFIX: &str = "#/components/schemas/";

/// Schema type keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl SchemaType {
    /// Parses a schema type keyword in any case; `DEFAULT` and unknown values yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        let schema_type = match value.to_ascii_lowercase().as_str() {
            "object" => SchemaType::Object,
            "array" => SchemaType::Array,
            "string" => SchemaType::String,
            "number" => SchemaType::Number,
            "integer" => SchemaType::Integer,
            "boolean" => SchemaType::Boolean,
            "null" => SchemaType::Null,
            _ => return None,
        };
        Some(schema_type)
    }
}

/// `additionalProperties`: either a flag or a schema for the values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<Schema>),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    pub property_name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExternalDocs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One node of a generated schema tree.
///
/// A node either points at a registered definition through `$ref` or carries a
/// body; the walker never fills both. Unset attributes are `None` so that merges
/// can tell "absent" from "explicitly empty".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<u64>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<Vec<Value>>,
    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    /// `x-` prefixed extensions
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// One step of a path from a placed schema down to a nested node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    Property(String),
    Items,
    AdditionalProperties,
    AllOf(usize),
    AnyOf(usize),
    OneOf(usize),
    Not,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// A pointer to the component schema of the given name
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", COMPONENTS_PREFIX, name)),
            ..Self::default()
        }
    }

    pub fn is_ref(&self) -> bool {
        self.reference.is_some()
    }

    /// Keeps only the `$ref` of this node
    pub fn into_reference(self) -> Self {
        Self {
            reference: self.reference,
            ..Self::default()
        }
    }

    /// Name of the component this node points at
    pub fn ref_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .map(|r| r.strip_prefix(COMPONENTS_PREFIX).unwrap_or(r))
    }

    pub fn is_type(&self, schema_type: SchemaType) -> bool {
        self.schema_type == Some(schema_type)
    }

    pub fn add_property(&mut self, name: impl Into<String>, schema: Schema) {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), schema);
    }

    /// Adds a name to `required` once
    pub fn add_required(&mut self, name: &str) {
        let required = self.required.get_or_insert_with(Vec::new);
        if !required.iter().any(|r| r == name) {
            required.push(name.to_string());
        }
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required
            .as_ref()
            .map_or(false, |r| r.iter().any(|n| n == name))
    }

    pub fn add_all_of(&mut self, schema: Schema) {
        self.all_of.get_or_insert_with(Vec::new).push(schema);
    }

    /// Whether `additionalProperties` permits extra properties
    pub fn allows_additional_properties(&self) -> bool {
        !matches!(
            self.additional_properties,
            Some(AdditionalProperties::Allowed(false))
        )
    }

    /// Navigates to a nested node
    pub fn at_mut(&mut self, path: &[PathStep]) -> Option<&mut Schema> {
        let Some((step, rest)) = path.split_first() else {
            return Some(self);
        };
        let next = match step {
            PathStep::Property(name) => self.properties.as_mut()?.get_mut(name)?,
            PathStep::Items => self.items.as_deref_mut()?,
            PathStep::AdditionalProperties => match self.additional_properties.as_mut()? {
                AdditionalProperties::Schema(schema) => schema.as_mut(),
                AdditionalProperties::Allowed(_) => return None,
            },
            PathStep::AllOf(i) => self.all_of.as_mut()?.get_mut(*i)?,
            PathStep::AnyOf(i) => self.any_of.as_mut()?.get_mut(*i)?,
            PathStep::OneOf(i) => self.one_of.as_mut()?.get_mut(*i)?,
            PathStep::Not => self.not.as_deref_mut()?,
        };
        next.at_mut(rest)
    }

    /// Overlays `other` onto this schema.
    ///
    /// Scalars set in `other` win. Nested schemas and property maps merge
    /// recursively. Lists that differ are concatenated, string lists without
    /// duplicates.
    pub fn merge_from(&mut self, other: Schema) {
        overlay(&mut self.reference, other.reference);
        overlay(&mut self.schema_type, other.schema_type);
        overlay(&mut self.format, other.format);
        overlay(&mut self.title, other.title);
        overlay(&mut self.description, other.description);
        overlay(&mut self.pattern, other.pattern);

        if let Some(properties) = other.properties {
            let target = self.properties.get_or_insert_with(IndexMap::new);
            for (name, schema) in properties {
                match target.get_mut(&name) {
                    Some(existing) => existing.merge_from(schema),
                    None => {
                        target.insert(name, schema);
                    }
                }
            }
        }

        self.additional_properties = match (self.additional_properties.take(), other.additional_properties) {
            (Some(AdditionalProperties::Schema(mut mine)), Some(AdditionalProperties::Schema(theirs))) => {
                mine.merge_from(*theirs);
                Some(AdditionalProperties::Schema(mine))
            }
            (mine, None) => mine,
            (_, theirs) => theirs,
        };

        merge_boxed(&mut self.items, other.items);
        merge_boxed(&mut self.not, other.not);
        merge_list(&mut self.all_of, other.all_of);
        merge_list(&mut self.any_of, other.any_of);
        merge_list(&mut self.one_of, other.one_of);
        merge_list(&mut self.required, other.required);
        merge_list(&mut self.enumeration, other.enumeration);

        overlay(&mut self.minimum, other.minimum);
        overlay(&mut self.maximum, other.maximum);
        overlay(&mut self.exclusive_minimum, other.exclusive_minimum);
        overlay(&mut self.exclusive_maximum, other.exclusive_maximum);
        overlay(&mut self.multiple_of, other.multiple_of);
        overlay(&mut self.min_length, other.min_length);
        overlay(&mut self.max_length, other.max_length);
        overlay(&mut self.min_items, other.min_items);
        overlay(&mut self.max_items, other.max_items);
        overlay(&mut self.unique_items, other.unique_items);
        overlay(&mut self.min_properties, other.min_properties);
        overlay(&mut self.max_properties, other.max_properties);
        overlay(&mut self.default_value, other.default_value);
        overlay(&mut self.example, other.example);
        overlay(&mut self.nullable, other.nullable);
        overlay(&mut self.read_only, other.read_only);
        overlay(&mut self.write_only, other.write_only);
        overlay(&mut self.deprecated, other.deprecated);
        overlay(&mut self.discriminator, other.discriminator);
        overlay(&mut self.external_docs, other.external_docs);

        self.extensions.extend(other.extensions);
    }

    /// Whether this (field) schema sets anything absent from, or different
    /// than, the type schema
    pub fn overrides(&self, type_schema: &Schema) -> bool {
        let mine = attributes(self);
        let theirs = attributes(type_schema);
        mine.into_iter()
            .zip(theirs)
            .any(|(field, ty)| field.is_some() && field != ty)
    }

    /// Drops the type-derived defaults this schema shares with the type schema
    pub fn clear_matching_defaults(&mut self, type_schema: &Schema) {
        clear_if_equal(&mut self.schema_type, &type_schema.schema_type);
        clear_if_equal(&mut self.format, &type_schema.format);
        clear_if_equal(&mut self.pattern, &type_schema.pattern);
        clear_if_equal(&mut self.example, &type_schema.example);
        clear_if_equal(&mut self.external_docs, &type_schema.external_docs);
    }
}

fn overlay<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

fn clear_if_equal<T: PartialEq>(target: &mut Option<T>, other: &Option<T>) {
    if target == other {
        *target = None;
    }
}

fn merge_boxed(target: &mut Option<Box<Schema>>, value: Option<Box<Schema>>) {
    match (target.as_mut(), value) {
        (Some(mine), Some(theirs)) => mine.merge_from(*theirs),
        (None, Some(theirs)) => *target = Some(theirs),
        (_, None) => {}
    }
}

fn merge_list<T: PartialEq>(target: &mut Option<Vec<T>>, value: Option<Vec<T>>) {
    let Some(value) = value else {
        return;
    };
    if let Some(existing) = target.as_mut().filter(|e| !e.is_empty()) {
        if *existing != value {
            for item in value {
                if !existing.contains(&item) {
                    existing.push(item);
                }
            }
        }
        return;
    }
    *target = Some(value);
}

/// Every attribute that takes part in the override comparison, serialized
fn attributes(schema: &Schema) -> Vec<Option<Value>> {
    fn v<T: Serialize>(value: &Option<T>) -> Option<Value> {
        value.as_ref().and_then(|v| serde_json::to_value(v).ok())
    }

    vec![
        v(&schema.additional_properties),
        v(&schema.all_of),
        v(&schema.any_of),
        v(&schema.default_value),
        v(&schema.deprecated),
        v(&schema.description),
        v(&schema.discriminator),
        v(&schema.enumeration),
        v(&schema.example),
        v(&schema.exclusive_maximum),
        v(&schema.exclusive_minimum),
        (!schema.extensions.is_empty())
            .then(|| serde_json::to_value(&schema.extensions).ok())
            .flatten(),
        v(&schema.external_docs),
        v(&schema.format),
        v(&schema.items),
        v(&schema.maximum),
        v(&schema.max_items),
        v(&schema.max_length),
        v(&schema.max_properties),
        v(&schema.minimum),
        v(&schema.min_items),
        v(&schema.min_length),
        v(&schema.min_properties),
        v(&schema.multiple_of),
        v(&schema.not),
        v(&schema.nullable),
        v(&schema.one_of),
        v(&schema.pattern),
        v(&schema.properties),
        v(&schema.read_only),
        v(&schema.reference),
        v(&schema.required),
        v(&schema.title),
        v(&schema.schema_type),
        v(&schema.unique_items),
        v(&schema.write_only),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_serializes_openapi_shape() {
        let mut schema = Schema::of_type(SchemaType::Object);
        schema.add_property("id", Schema::of_type(SchemaType::Integer));
        schema.add_property("owner", Schema::reference("Person"));
        schema.add_required("id");
        schema.extensions.insert("x-internal".to_string(), json!(true));

        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer" },
                    "owner": { "$ref": "#/components/schemas/Person" }
                },
                "required": ["id"],
                "x-internal": true
            })
        );
    }

    #[test]
    fn test_add_required_is_idempotent() {
        let mut schema = Schema::new();
        schema.add_required("name");
        schema.add_required("name");
        assert_eq!(schema.required, Some(vec!["name".to_string()]));
    }

    #[test]
    fn test_merge_overlays_and_recurses() {
        let mut target = Schema::of_type(SchemaType::Object);
        target.description = Some("type".to_string());
        target.add_property("a", Schema::of_type(SchemaType::String));
        target.required = Some(vec!["a".to_string()]);

        let mut source = Schema::new();
        source.description = Some("field".to_string());
        let mut a = Schema::new();
        a.max_length = Some(10);
        source.add_property("a", a);
        source.add_property("b", Schema::of_type(SchemaType::Boolean));
        source.required = Some(vec!["a".to_string(), "b".to_string()]);

        target.merge_from(source);

        assert_eq!(target.description.as_deref(), Some("field"));
        assert_eq!(target.schema_type, Some(SchemaType::Object));
        let properties = target.properties.as_ref().unwrap();
        assert_eq!(properties["a"].schema_type, Some(SchemaType::String));
        assert_eq!(properties["a"].max_length, Some(10));
        assert!(properties.contains_key("b"));
        assert_eq!(
            target.required,
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_merge_keeps_identical_lists() {
        let mut target = Schema::new();
        target.all_of = Some(vec![Schema::reference("A")]);
        target.merge_from(target.clone());
        assert_eq!(target.all_of.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_overrides() {
        let type_schema = Schema::of_type(SchemaType::Object);
        let same = type_schema.clone();
        assert!(!same.overrides(&type_schema));

        let mut described = type_schema.clone();
        described.description = Some("The owner".to_string());
        assert!(described.overrides(&type_schema));

        // Attributes only present on the type never count
        let mut bare = Schema::new();
        bare.schema_type = None;
        assert!(!bare.overrides(&type_schema));
    }

    #[test]
    fn test_clear_matching_defaults() {
        let mut type_schema = Schema::of_type(SchemaType::String);
        type_schema.format = Some("uuid".to_string());
        let mut field = type_schema.clone();
        field.description = Some("id".to_string());

        field.clear_matching_defaults(&type_schema);

        assert_eq!(field.schema_type, None);
        assert_eq!(field.format, None);
        assert_eq!(field.description.as_deref(), Some("id"));
    }

    #[test]
    fn test_navigate_path() {
        let mut schema = Schema::of_type(SchemaType::Object);
        let mut list = Schema::of_type(SchemaType::Array);
        list.items = Some(Box::new(Schema::new()));
        schema.add_property("pets", list);

        let node = schema
            .at_mut(&[PathStep::Property("pets".to_string()), PathStep::Items])
            .unwrap();
        node.schema_type = Some(SchemaType::Object);

        assert_eq!(
            schema.properties.unwrap()["pets"]
                .items
                .as_ref()
                .unwrap()
                .schema_type,
            Some(SchemaType::Object)
        );
        let mut empty = Schema::new();
        assert!(empty.at_mut(&[PathStep::Items]).is_none());
    }

    #[test]
    fn test_ref_name() {
        assert_eq!(Schema::reference("Pet").ref_name(), Some("Pet"));
        assert_eq!(Schema::new().ref_name(), None);
    }
}
