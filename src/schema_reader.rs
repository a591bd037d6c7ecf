//! Reading `@Schema` annotations into Schema Nodes.
//!
//! Class-level and member-level annotations share one reader; members pass the
//! attributes derived from their type as defaults. `implementation` types are
//! introspected through the graph walker.

use crate::annotations;
use crate::classifier;
use crate::context::ScanContext;
use crate::error::Result;
use crate::index::{Annotation, ClassInfo, Type};
use crate::naming::translate_enum_constant;
use crate::schema::{AdditionalProperties, Discriminator, ExternalDocs, Schema, SchemaType, COMPONENTS_PREFIX};
use crate::schema_generator;
use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::{Number, Value};

/// Annotation values that do not describe the schema itself
const NON_DISPLAY: &[&str] = &["implementation", "name", "required"];

/// Whether a `@Schema` hides its element
pub fn is_hidden(annotation: &Annotation) -> bool {
    annotation.bool("hidden") == Some(true)
}

/// Reads a `@Schema` annotation on top of `defaults`.
///
/// Returns `None` for hidden schemas. The result may be replaced entirely by the
/// schema of the annotation's `implementation`.
pub fn read_schema(
    ctx: &mut ScanContext,
    annotation: &Annotation,
    defaults: Schema,
) -> Result<Option<Schema>> {
    if is_hidden(annotation) {
        return Ok(None);
    }

    let mut schema = defaults;

    set(&mut schema.not, read_class_schema_of(ctx, annotation, "not")?.map(Box::new));
    set(&mut schema.one_of, read_class_schemas(ctx, annotation, "oneOf", false)?);
    set(&mut schema.any_of, read_class_schemas(ctx, annotation, "anyOf", false)?);
    set(&mut schema.all_of, read_class_schemas(ctx, annotation, "allOf", true)?);
    set(&mut schema.title, owned(annotation.string("title")));
    set(&mut schema.multiple_of, decimal(annotation, "multipleOf"));
    set(&mut schema.maximum, decimal(annotation, "maximum"));
    set(&mut schema.minimum, decimal(annotation, "minimum"));
    set(&mut schema.exclusive_maximum, annotation.bool("exclusiveMaximum"));
    set(&mut schema.exclusive_minimum, annotation.bool("exclusiveMinimum"));
    set(&mut schema.max_length, count(annotation, "maxLength"));
    set(&mut schema.min_length, count(annotation, "minLength"));
    set(&mut schema.pattern, owned(annotation.string("pattern")));
    set(&mut schema.max_properties, count(annotation, "maxProperties"));
    set(&mut schema.min_properties, count(annotation, "minProperties"));
    set(&mut schema.required, annotation.strings("requiredProperties"));
    set(&mut schema.description, owned(annotation.string("description")));
    set(&mut schema.format, owned(annotation.string("format")));
    set(&mut schema.reference, annotation.string("ref").map(reference_of));
    set(&mut schema.nullable, annotation.bool("nullable"));
    set(&mut schema.read_only, annotation.bool("readOnly"));
    set(&mut schema.write_only, annotation.bool("writeOnly"));
    set(&mut schema.external_docs, external_docs(annotation));
    set(&mut schema.deprecated, annotation.bool("deprecated"));
    set(&mut schema.schema_type, annotation.string("type").and_then(SchemaType::parse));

    let schema_type = schema.schema_type;
    set(&mut schema.example, parse_attribute(ctx, annotation, "example", schema_type));
    set(&mut schema.default_value, parse_attribute(ctx, annotation, "defaultValue", schema_type));
    set(&mut schema.discriminator, discriminator(ctx, annotation)?);
    set(&mut schema.max_items, count(annotation, "maxItems"));
    set(&mut schema.min_items, count(annotation, "minItems"));
    set(&mut schema.unique_items, annotation.bool("uniqueItems"));
    schema.extensions.extend(extensions(ctx, annotation));
    set(&mut schema.properties, properties(ctx, annotation)?);

    if let Some(additional) = annotation.class_value("additionalProperties") {
        schema.additional_properties = match additional.local_name().as_str() {
            "True" => Some(AdditionalProperties::Allowed(true)),
            "False" => Some(AdditionalProperties::Allowed(false)),
            _ => read_class_schema(ctx, &additional, true)?
                .map(|s| AdditionalProperties::Schema(Box::new(s))),
        };
    }

    if let Some(values) = annotation.strings("enumeration").filter(|v| !v.is_empty()) {
        let enumeration = values
            .iter()
            .map(|v| parse_value(ctx, v, schema_type))
            .collect();
        schema.enumeration = Some(enumeration);
    }

    let Some(implementation) = annotation.class_value("implementation") else {
        return Ok(Some(schema));
    };

    let display = annotation
        .values
        .keys()
        .filter(|k| !NON_DISPLAY.contains(&k.as_str()))
        .count();
    let named = annotation.string("name").map_or(false, |n| !n.is_empty());
    let array = annotation.string("type").and_then(SchemaType::parse) == Some(SchemaType::Array);

    if display == 0 {
        // Only the implementation describes the schema
        let Some(mut implemented) = read_class_schema(ctx, &implementation, !named)? else {
            return Ok(Some(schema));
        };
        if !implemented.is_ref() {
            implemented.merge_from(schema);
        }
        Ok(Some(implemented))
    } else if display == 1 && array {
        schema.items = read_class_schema(ctx, &implementation, !named)?.map(Box::new);
        Ok(Some(schema))
    } else {
        match read_class_schema(ctx, &implementation, false)? {
            Some(implemented) if schema.is_type(SchemaType::Array) => {
                schema.items = Some(Box::new(implemented));
                Ok(Some(schema))
            }
            Some(mut implemented) => {
                implemented.merge_from(schema);
                Ok(Some(implemented))
            }
            None => Ok(Some(schema)),
        }
    }
}

/// Schema of a type named by an annotation: nested arrays, primitive
/// attributes, or the introspected class.
///
/// `None` when the class is hidden. A class being scanned further up the stack
/// only receives a placeholder reference.
pub fn read_class_schema(
    ctx: &mut ScanContext,
    ty: &Type,
    reference_supported: bool,
) -> Result<Option<Schema>> {
    match ty {
        Type::Array(component) => {
            let mut schema = Schema::of_type(SchemaType::Array);
            schema.items = read_class_schema(ctx, component, reference_supported)?.map(Box::new);
            Ok(Some(schema))
        }
        Type::Primitive(_) | Type::Void => Ok(Some(classifier::type_schema(ty))),
        _ => introspect_class(ctx, ty, reference_supported),
    }
}

fn introspect_class(
    ctx: &mut ScanContext,
    ty: &Type,
    reference_supported: bool,
) -> Result<Option<Schema>> {
    let hidden = ctx
        .index
        .class_of(ty)
        .and_then(|class| class.annotation(annotations::SCHEMA))
        .map_or(false, is_hidden);
    if hidden {
        return Ok(None);
    }

    let views = ctx.views();

    if ctx.registry.has_schema(ty, views) {
        if reference_supported {
            return ctx.registry.lookup_ref(ty, views).map(Some);
        }
        return Ok(ctx.registry.lookup_schema(ty, views)?.cloned());
    }

    if ctx.scan_stack.contains(ty) {
        debug!("{} is being scanned, using a reference", ty);
        let placeholder = ctx
            .registry
            .register_reference(ctx.index, ty, views, Schema::new());
        return Ok(Some(placeholder));
    }

    let schema = schema_generator::process(ctx, ty)?;

    if reference_supported {
        Ok(Some(schema_registration(ctx, ty, schema)))
    } else {
        Ok(Some(schema))
    }
}

/// Registers the schema when the type is eligible and not registered yet;
/// returns the reference, or the schema itself when registration did not happen
pub fn schema_registration(ctx: &mut ScanContext, ty: &Type, schema: Schema) -> Schema {
    let views = ctx.views();
    let registry = &mut ctx.registry;

    let allowed = !registry.is_disabled()
        && registry.is_registration_supported(ctx.index, ty, &schema)
        && !registry.has_schema(ty, views);

    if allowed {
        registry.register(ctx.index, ty, views, schema)
    } else if registry.has_ref(ty, views) {
        registry.try_lookup_ref(ty, views).unwrap_or(schema)
    } else {
        schema
    }
}

/// String schema listing the constants of an enum.
///
/// A class-level `@Schema` is read with the constants as defaults.
pub fn enum_to_schema(ctx: &mut ScanContext, ty: &Type) -> Result<Schema> {
    debug!("Processing enum {}", ty);

    let mut defaults = Schema::of_type(SchemaType::String);
    let Some(class) = ctx.index.class_of(ty) else {
        return Ok(defaults);
    };
    defaults.enumeration = Some(enum_constants(class));

    let Some(annotation) = class.annotation(annotations::SCHEMA) else {
        return Ok(defaults);
    };
    let schema = read_schema(ctx, annotation, defaults)?.unwrap_or_default();
    if schema.is_ref() {
        return Ok(schema.into_reference());
    }
    Ok(schema)
}

/// Constant names of an enum, honoring `@JsonProperty` and `@EnumNaming`
pub fn enum_constants(class: &ClassInfo) -> Vec<Value> {
    let strategy = class
        .annotation(annotations::JACKSON_ENUM_NAMING)
        .and_then(|naming| naming.string("value"));

    class
        .fields
        .iter()
        .filter(|f| f.enum_constant)
        .map(|constant| {
            let renamed = constant
                .annotations
                .iter()
                .find(|a| annotations::JACKSON_PROPERTY.contains(&a.name.as_str()))
                .and_then(|a| a.string("value"))
                .filter(|v| !v.is_empty());

            let name = match (renamed, strategy) {
                (Some(renamed), _) => renamed.to_string(),
                (None, Some(strategy)) => translate_enum_constant(strategy, &constant.name),
                (None, None) => constant.name.clone(),
            };
            Value::String(name)
        })
        .collect()
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn count(annotation: &Annotation, key: &str) -> Option<u64> {
    annotation.i64(key).and_then(|v| u64::try_from(v).ok())
}

fn decimal(annotation: &Annotation, key: &str) -> Option<Number> {
    let literal = annotation.literal(key)?;
    match literal.trim().parse::<Number>() {
        Ok(number) => Some(number),
        Err(_) => {
            warn!("Ignoring unparsable `{}` value `{}` of @Schema", key, literal);
            None
        }
    }
}

/// Simple names point into the document's component schemas
fn reference_of(value: &str) -> String {
    if value.contains('/') || value.contains('#') {
        value.to_string()
    } else {
        format!("{}{}", COMPONENTS_PREFIX, value)
    }
}

fn parse_value(ctx: &ScanContext, raw: &str, schema_type: Option<SchemaType>) -> Value {
    if schema_type == Some(SchemaType::String) {
        return Value::String(raw.to_string());
    }
    ctx.parser
        .parse_value(raw, schema_type)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn parse_attribute(
    ctx: &ScanContext,
    annotation: &Annotation,
    key: &str,
    schema_type: Option<SchemaType>,
) -> Option<Value> {
    match annotation.value(key)? {
        Value::String(raw) => Some(parse_value(ctx, raw, schema_type)),
        other => Some(other.clone()),
    }
}

fn read_class_schema_of(
    ctx: &mut ScanContext,
    annotation: &Annotation,
    key: &str,
) -> Result<Option<Schema>> {
    match annotation.class_value(key) {
        Some(ty) => read_class_schema(ctx, &ty, true),
        None => Ok(None),
    }
}

/// Class lists become reference lists; `allOf` drops the class being scanned
fn read_class_schemas(
    ctx: &mut ScanContext,
    annotation: &Annotation,
    key: &str,
    remove_current: bool,
) -> Result<Option<Vec<Schema>>> {
    let Some(types) = annotation.types(key) else {
        return Ok(None);
    };
    if types.iter().all(|t| *t == Type::Void) {
        return Ok(None);
    }

    let current = if remove_current {
        ctx.scan_stack.last().cloned()
    } else {
        None
    };

    let mut schemas = Vec::with_capacity(types.len());
    for ty in types.iter().filter(|t| Some(*t) != current.as_ref()) {
        if let Some(schema) = read_class_schema(ctx, ty, true)? {
            schemas.push(schema);
        }
    }
    Ok(Some(schemas))
}

fn external_docs(annotation: &Annotation) -> Option<ExternalDocs> {
    let docs = annotation.nested("externalDocs").into_iter().next()?;
    let external = ExternalDocs {
        description: owned(docs.string("description")),
        url: owned(docs.string("url")),
    };
    (external.description.is_some() || external.url.is_some()).then_some(external)
}

fn discriminator(ctx: &mut ScanContext, annotation: &Annotation) -> Result<Option<Discriminator>> {
    let property_name = annotation.string("discriminatorProperty");
    let mappings = annotation.nested("discriminatorMapping");

    if property_name.is_none() && mappings.is_empty() {
        return Ok(None);
    }

    let mut mapping = IndexMap::new();
    for entry in &mappings {
        let Some(ty) = entry.class_value("schema") else {
            continue;
        };
        let Some(reference) = read_class_schema(ctx, &ty, true)?.and_then(|s| s.reference) else {
            debug!("Discriminator mapping to {} has no schema reference", ty);
            continue;
        };
        let value = match entry.string("value") {
            Some(value) => value.to_string(),
            None => reference
                .strip_prefix(COMPONENTS_PREFIX)
                .unwrap_or(&reference)
                .to_string(),
        };
        mapping.insert(value, reference);
    }

    Ok(Some(Discriminator {
        property_name: property_name.unwrap_or_default().to_string(),
        mapping,
    }))
}

fn extensions(ctx: &ScanContext, annotation: &Annotation) -> IndexMap<String, Value> {
    annotation
        .nested("extensions")
        .iter()
        .filter_map(|extension| {
            let name = extension.string("name")?;
            let raw = extension.string("value").unwrap_or_default();
            let key = if name.starts_with("x-") {
                name.to_string()
            } else {
                format!("x-{}", name)
            };
            let value = if extension.bool("parseValue") == Some(true) {
                ctx.parser
                    .parse_value(raw, None)
                    .unwrap_or_else(|| Value::String(raw.to_string()))
            } else {
                Value::String(raw.to_string())
            };
            Some((key, value))
        })
        .collect()
}

/// `@SchemaProperty` entries, each read as a schema keyed by its name
fn properties(ctx: &mut ScanContext, annotation: &Annotation) -> Result<Option<IndexMap<String, Schema>>> {
    let nested = annotation.nested("properties");
    if nested.is_empty() {
        return Ok(None);
    }

    let mut properties = IndexMap::new();
    for property in &nested {
        let Some(name) = property.string("name") else {
            warn!("Ignoring @SchemaProperty without a name");
            continue;
        };
        if let Some(schema) = read_schema(ctx, property, Schema::new())? {
            properties.insert(name.to_string(), schema);
        }
    }
    Ok(Some(properties))
}
