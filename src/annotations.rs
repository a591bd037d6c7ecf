//! Well-known annotation names and the annotation-bearing [`Target`].
//!
//! Each constant lists every accepted spelling of one annotation, so the
//! `javax.*` and `jakarta.*` namespaces are matched alike.

use crate::index::{Annotation, ClassInfo, FieldInfo, MethodInfo, Type};

macro_rules! javax_and_jakarta {
    ($suffix:literal) => {
        &[concat!("javax.", $suffix), concat!("jakarta.", $suffix)]
    };
}

pub const SCHEMA: &[&str] = &["org.eclipse.microprofile.openapi.annotations.media.Schema"];

// Jackson
pub const JACKSON_IGNORE: &[&str] = &["com.fasterxml.jackson.annotation.JsonIgnore"];
pub const JACKSON_IGNORE_PROPERTIES: &[&str] =
    &["com.fasterxml.jackson.annotation.JsonIgnoreProperties"];
pub const JACKSON_IGNORE_TYPE: &[&str] = &["com.fasterxml.jackson.annotation.JsonIgnoreType"];
pub const JACKSON_PROPERTY: &[&str] = &["com.fasterxml.jackson.annotation.JsonProperty"];
pub const JACKSON_PROPERTY_ORDER: &[&str] =
    &["com.fasterxml.jackson.annotation.JsonPropertyOrder"];
pub const JACKSON_UNWRAPPED: &[&str] = &["com.fasterxml.jackson.annotation.JsonUnwrapped"];
pub const JACKSON_VIEW: &[&str] = &["com.fasterxml.jackson.annotation.JsonView"];
pub const JACKSON_CREATOR: &[&str] = &["com.fasterxml.jackson.annotation.JsonCreator"];
pub const JACKSON_NAMING: &[&str] = &["com.fasterxml.jackson.databind.annotation.JsonNaming"];
pub const JACKSON_ENUM_NAMING: &[&str] =
    &["com.fasterxml.jackson.databind.annotation.EnumNaming"];

// JSON-B
pub const JSONB_TRANSIENT: &[&str] = javax_and_jakarta!("json.bind.annotation.JsonbTransient");
pub const JSONB_PROPERTY: &[&str] = javax_and_jakarta!("json.bind.annotation.JsonbProperty");
pub const JSONB_PROPERTY_ORDER: &[&str] =
    javax_and_jakarta!("json.bind.annotation.JsonbPropertyOrder");
pub const JSONB_CREATOR: &[&str] = javax_and_jakarta!("json.bind.annotation.JsonbCreator");

// JAXB
pub const XML_TRANSIENT: &[&str] = javax_and_jakarta!("xml.bind.annotation.XmlTransient");
pub const XML_ACCESSOR_TYPE: &[&str] = javax_and_jakarta!("xml.bind.annotation.XmlAccessorType");
pub const XML_ELEMENT: &[&str] = javax_and_jakarta!("xml.bind.annotation.XmlElement");
pub const XML_ATTRIBUTE: &[&str] = javax_and_jakarta!("xml.bind.annotation.XmlAttribute");
pub const XML_TYPE: &[&str] = javax_and_jakarta!("xml.bind.annotation.XmlType");

// Bean validation
pub const DECIMAL_MAX: &[&str] = javax_and_jakarta!("validation.constraints.DecimalMax");
pub const DECIMAL_MIN: &[&str] = javax_and_jakarta!("validation.constraints.DecimalMin");
pub const DIGITS: &[&str] = javax_and_jakarta!("validation.constraints.Digits");
pub const MAX: &[&str] = javax_and_jakarta!("validation.constraints.Max");
pub const MIN: &[&str] = javax_and_jakarta!("validation.constraints.Min");
pub const NEGATIVE: &[&str] = javax_and_jakarta!("validation.constraints.Negative");
pub const NEGATIVE_OR_ZERO: &[&str] = javax_and_jakarta!("validation.constraints.NegativeOrZero");
pub const NOT_BLANK: &[&str] = javax_and_jakarta!("validation.constraints.NotBlank");
pub const NOT_EMPTY: &[&str] = javax_and_jakarta!("validation.constraints.NotEmpty");
pub const NOT_NULL: &[&str] = javax_and_jakarta!("validation.constraints.NotNull");
pub const POSITIVE: &[&str] = javax_and_jakarta!("validation.constraints.Positive");
pub const POSITIVE_OR_ZERO: &[&str] = javax_and_jakarta!("validation.constraints.PositiveOrZero");
pub const SIZE: &[&str] = javax_and_jakarta!("validation.constraints.Size");

/// The only validation group a constraint may name and still be applied
pub const DEFAULT_GROUPS: &[&str] = javax_and_jakarta!("validation.groups.Default");

/// Annotations that name a property explicitly
pub const PROPERTY_NAMING: &[&[&str]] = &[SCHEMA, JSONB_PROPERTY, JACKSON_PROPERTY];

/// An annotation-bearing element of a class.
///
/// Members keep a reference to their declaring class, which decides class-level
/// rules such as `@JsonIgnoreProperties` and `@XmlAccessorType`.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Class(&'a ClassInfo),
    Field(&'a ClassInfo, &'a FieldInfo),
    Method(&'a ClassInfo, &'a MethodInfo),
}

impl<'a> Target<'a> {
    pub fn annotations(&self) -> &'a [Annotation] {
        match self {
            Target::Class(class) => &class.annotations,
            Target::Field(_, field) => &field.annotations,
            Target::Method(_, method) => &method.annotations,
        }
    }

    pub fn annotation(&self, names: &[&str]) -> Option<&'a Annotation> {
        self.annotations()
            .iter()
            .find(|a| names.contains(&a.name.as_str()))
    }

    pub fn has_annotation(&self, names: &[&str]) -> bool {
        self.annotation(names).is_some()
    }

    pub fn schema(&self) -> Option<&'a Annotation> {
        self.annotation(SCHEMA)
    }

    pub fn declaring_class(&self) -> &'a ClassInfo {
        match self {
            Target::Class(class) | Target::Field(class, _) | Target::Method(class, _) => class,
        }
    }

    /// Simple name of the element (class name for class targets)
    pub fn name(&self) -> &'a str {
        match self {
            Target::Class(class) => &class.name,
            Target::Field(_, field) => &field.name,
            Target::Method(_, method) => &method.name,
        }
    }

    pub fn is_public(&self) -> bool {
        match self {
            Target::Class(class) => class.modifiers.is_public(),
            Target::Field(_, field) => field.modifiers.is_public(),
            Target::Method(_, method) => method.modifiers.is_public(),
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Target::Class(..))
    }

    pub fn is_field(&self) -> bool {
        matches!(self, Target::Field(..))
    }

    pub fn is_method(&self) -> bool {
        matches!(self, Target::Method(..))
    }

    /// The type carried by the element: field type, accessor return type or the
    /// single parameter of a mutator
    pub fn value_type(&self) -> Type {
        match self {
            Target::Class(class) => class.self_type(),
            Target::Field(_, field) => field.ty.clone(),
            Target::Method(_, method) => match method.return_type {
                Type::Void => method.parameters.first().cloned().unwrap_or(Type::Void),
                ref ty => ty.clone(),
            },
        }
    }

    /// Identity of the element, used to compare targets across resolvers
    pub fn same_as(&self, other: &Target) -> bool {
        match (self, other) {
            (Target::Class(a), Target::Class(b)) => a.name == b.name,
            (Target::Field(ca, a), Target::Field(cb, b)) => ca.name == cb.name && a.name == b.name,
            (Target::Method(ca, a), Target::Method(cb, b)) => {
                ca.name == cb.name && a.name == b.name && a.parameters == b.parameters
            }
            _ => false,
        }
    }
}
