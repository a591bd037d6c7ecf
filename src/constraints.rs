//! Constraint Annotators: bean validation, JSON binding and nullability rules
//! applied to a property's schema in place.
//!
//! Values already present on the schema always win; annotators only fill
//! gaps. Malformed literals are logged and skipped.

use crate::annotations::{self, Target};
use crate::index::Annotation;
use crate::property_resolver::Property;
use crate::schema::{AdditionalProperties, Schema, SchemaType};
use log::warn;
use serde_json::Number;

/// Receives the properties a constraint marks as required
pub type RequirementHandler<'h> = dyn FnMut(&Target, &str) + 'h;

const CONSTRAINT_ANNOTATIONS: &[&[&str]] = &[
    annotations::DECIMAL_MAX,
    annotations::DECIMAL_MIN,
    annotations::DIGITS,
    annotations::MAX,
    annotations::MIN,
    annotations::NEGATIVE,
    annotations::NEGATIVE_OR_ZERO,
    annotations::NOT_BLANK,
    annotations::NOT_EMPTY,
    annotations::NOT_NULL,
    annotations::POSITIVE,
    annotations::POSITIVE_OR_ZERO,
    annotations::SIZE,
    annotations::JACKSON_PROPERTY,
    annotations::JSONB_PROPERTY,
];

/// Whether the element carries anything an annotator reads
pub fn has_constraints(target: &Target) -> bool {
    target.annotations().iter().any(|a| {
        CONSTRAINT_ANNOTATIONS
            .iter()
            .any(|names| names.contains(&a.name.as_str()))
    })
}

/// Applies bean validation constraints of `target` by schema type.
///
/// Nothing happens for untyped or reference schemas.
pub fn apply_bean_validation(
    target: &Target,
    schema: &mut Schema,
    property: &str,
    handler: &mut RequirementHandler,
) {
    if schema.is_ref() {
        return;
    }
    let Some(schema_type) = schema.schema_type else {
        return;
    };

    match schema_type {
        SchemaType::String => {
            decimal_max(target, schema);
            decimal_min(target, schema);
            digits(target, schema);
            not_blank(target, schema);
            not_null(target, schema, property, handler);
            required_jackson(target, property, handler);
            size_string(target, schema);
            not_empty_string(target, schema);
        }
        SchemaType::Number | SchemaType::Integer => {
            decimal_max(target, schema);
            decimal_min(target, schema);
            digits(target, schema);
            max(target, schema);
            min(target, schema);
            negative(target, schema);
            negative_or_zero(target, schema);
            not_null(target, schema, property, handler);
            required_jackson(target, property, handler);
            positive(target, schema);
            positive_or_zero(target, schema);
        }
        SchemaType::Array => {
            not_null(target, schema, property, handler);
            required_jackson(target, property, handler);
            size_array(target, schema);
            not_empty_array(target, schema);
        }
        SchemaType::Object => {
            not_null(target, schema, property, handler);
            required_jackson(target, property, handler);
            if accepts_additional_properties(schema) {
                size_object(target, schema);
                not_empty_object(target, schema);
            }
        }
        SchemaType::Boolean => {
            not_null(target, schema, property, handler);
            required_jackson(target, property, handler);
        }
        SchemaType::Null => {}
    }
}

/// Applies `@JsonProperty(access)` and `@JsonbProperty(nillable)`
pub fn apply_json_binding(target: &Target, schema: &mut Schema) {
    if let Some(property) = target.annotation(annotations::JACKSON_PROPERTY) {
        let access = property
            .string("access")
            .map(|a| a.rsplit('.').next().unwrap_or(a));
        match access {
            Some("READ_ONLY") => fill(&mut schema.read_only, true),
            Some("WRITE_ONLY") => fill(&mut schema.write_only, true),
            _ => {}
        }
    }

    if let Some(property) = target.annotation(annotations::JSONB_PROPERTY) {
        if property.bool("nillable") == Some(true) {
            fill(&mut schema.nullable, true);
        }
    }
}

/// Flags properties the resolver found to be read-only or write-only
pub fn apply_access(property: &Property, schema: &mut Schema) {
    if property.is_read_only() {
        fill(&mut schema.read_only, true);
    }
    if property.is_write_only() {
        fill(&mut schema.write_only, true);
    }
}

/// `Optional` wrappers make a property nullable
pub fn mark_nullable(schema: &mut Schema) {
    fill(&mut schema.nullable, true);
}

fn fill<T>(slot: &mut Option<T>, value: T) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

fn accepts_additional_properties(schema: &Schema) -> bool {
    matches!(
        schema.additional_properties,
        Some(AdditionalProperties::Allowed(true)) | Some(AdditionalProperties::Schema(_))
    )
}

/// A constraint that applies to the default validation group
fn constraint<'a>(target: &Target<'a>, names: &[&str]) -> Option<&'a Annotation> {
    let annotation = target.annotation(names)?;
    let groups = annotation.strings("groups").unwrap_or_default();

    match groups.as_slice() {
        [] => Some(annotation),
        [group] if annotations::DEFAULT_GROUPS.contains(&group.as_str()) => Some(annotation),
        _ => None,
    }
}

fn parse_decimal(target: &Target, annotation: &Annotation) -> Option<Number> {
    let literal = annotation.literal("value")?;
    match literal.trim().parse::<Number>() {
        Ok(number) => Some(number),
        Err(_) => {
            warn!(
                "Ignoring unparsable @{} value `{}` on {}",
                annotation.name,
                literal,
                target.name()
            );
            None
        }
    }
}

fn size_bound(annotation: &Annotation, key: &str) -> Option<u64> {
    annotation.i64(key).and_then(|v| u64::try_from(v).ok())
}

fn decimal_max(target: &Target, schema: &mut Schema) {
    let Some(annotation) = constraint(target, annotations::DECIMAL_MAX) else {
        return;
    };
    if schema.maximum.is_some() {
        return;
    }
    if let Some(value) = parse_decimal(target, annotation) {
        schema.maximum = Some(value);
        if annotation.bool("inclusive") == Some(false) {
            fill(&mut schema.exclusive_maximum, true);
        }
    }
}

fn decimal_min(target: &Target, schema: &mut Schema) {
    let Some(annotation) = constraint(target, annotations::DECIMAL_MIN) else {
        return;
    };
    if schema.minimum.is_some() {
        return;
    }
    if let Some(value) = parse_decimal(target, annotation) {
        schema.minimum = Some(value);
        if annotation.bool("inclusive") == Some(false) {
            fill(&mut schema.exclusive_minimum, true);
        }
    }
}

fn digits(target: &Target, schema: &mut Schema) {
    let Some(annotation) = constraint(target, annotations::DIGITS) else {
        return;
    };
    if schema.pattern.is_some() {
        return;
    }

    let integer = annotation.i64("integer").unwrap_or(0);
    let fraction = annotation.i64("fraction").unwrap_or(0);

    let mut pattern = String::from("^\\d");
    if integer > 1 {
        pattern.push_str(&format!("{{1,{}}}", integer));
    }
    if fraction > 0 {
        pattern.push_str("([.]\\d");
        if fraction > 1 {
            pattern.push_str(&format!("{{1,{}}}", fraction));
        }
        pattern.push_str(")?");
    }
    pattern.push('$');

    schema.pattern = Some(pattern);
}

fn max(target: &Target, schema: &mut Schema) {
    if let Some(annotation) = constraint(target, annotations::MAX) {
        if schema.maximum.is_none() {
            schema.maximum = parse_decimal(target, annotation);
        }
    }
}

fn min(target: &Target, schema: &mut Schema) {
    if let Some(annotation) = constraint(target, annotations::MIN) {
        if schema.minimum.is_none() {
            schema.minimum = parse_decimal(target, annotation);
        }
    }
}

fn negative(target: &Target, schema: &mut Schema) {
    if constraint(target, annotations::NEGATIVE).is_some() && schema.maximum.is_none() {
        let bound = if schema.exclusive_maximum == Some(true) { 0 } else { -1 };
        schema.maximum = Some(Number::from(bound));
    }
}

fn negative_or_zero(target: &Target, schema: &mut Schema) {
    if constraint(target, annotations::NEGATIVE_OR_ZERO).is_some() && schema.maximum.is_none() {
        let bound = if schema.exclusive_maximum == Some(true) { 1 } else { 0 };
        schema.maximum = Some(Number::from(bound));
    }
}

fn positive(target: &Target, schema: &mut Schema) {
    if constraint(target, annotations::POSITIVE).is_some() && schema.minimum.is_none() {
        let bound = if schema.exclusive_minimum == Some(true) { 0 } else { 1 };
        schema.minimum = Some(Number::from(bound));
    }
}

fn positive_or_zero(target: &Target, schema: &mut Schema) {
    if constraint(target, annotations::POSITIVE_OR_ZERO).is_some() && schema.minimum.is_none() {
        let bound = if schema.exclusive_minimum == Some(true) { -1 } else { 0 };
        schema.minimum = Some(Number::from(bound));
    }
}

fn not_blank(target: &Target, schema: &mut Schema) {
    if constraint(target, annotations::NOT_BLANK).is_some() {
        fill(&mut schema.nullable, false);
        fill(&mut schema.pattern, "\\S".to_string());
    }
}

fn not_null(target: &Target, schema: &mut Schema, property: &str, handler: &mut RequirementHandler) {
    if constraint(target, annotations::NOT_NULL).is_some() {
        fill(&mut schema.nullable, false);
        handler(target, property);
    }
}

fn required_jackson(target: &Target, property: &str, handler: &mut RequirementHandler) {
    let required = target
        .annotation(annotations::JACKSON_PROPERTY)
        .and_then(|p| p.bool("required"))
        .unwrap_or(false);
    if required {
        handler(target, property);
    }
}

fn size_string(target: &Target, schema: &mut Schema) {
    if let Some(annotation) = constraint(target, annotations::SIZE) {
        if let Some(min) = size_bound(annotation, "min") {
            fill(&mut schema.min_length, min);
        }
        if let Some(max) = size_bound(annotation, "max") {
            fill(&mut schema.max_length, max);
        }
    }
}

fn size_array(target: &Target, schema: &mut Schema) {
    if let Some(annotation) = constraint(target, annotations::SIZE) {
        if let Some(min) = size_bound(annotation, "min") {
            fill(&mut schema.min_items, min);
        }
        if let Some(max) = size_bound(annotation, "max") {
            fill(&mut schema.max_items, max);
        }
    }
}

fn size_object(target: &Target, schema: &mut Schema) {
    if let Some(annotation) = constraint(target, annotations::SIZE) {
        if let Some(min) = size_bound(annotation, "min") {
            fill(&mut schema.min_properties, min);
        }
        if let Some(max) = size_bound(annotation, "max") {
            fill(&mut schema.max_properties, max);
        }
    }
}

fn not_empty_string(target: &Target, schema: &mut Schema) {
    if constraint(target, annotations::NOT_EMPTY).is_some() {
        fill(&mut schema.min_length, 1);
        fill(&mut schema.nullable, false);
    }
}

fn not_empty_array(target: &Target, schema: &mut Schema) {
    if constraint(target, annotations::NOT_EMPTY).is_some() {
        fill(&mut schema.min_items, 1);
    }
}

fn not_empty_object(target: &Target, schema: &mut Schema) {
    if constraint(target, annotations::NOT_EMPTY).is_some() {
        fill(&mut schema.min_properties, 1);
    }
}
