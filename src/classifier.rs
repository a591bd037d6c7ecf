//! Type Classifier: maps a type to its canonical schema type and format.

use crate::index::Type;
use crate::schema::{Schema, SchemaType};
use serde_json::Value;

const UUID_PATTERN: &str =
    "[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12}";

/// Default schema attributes of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeFormat {
    pub schema_type: SchemaType,
    pub format: Option<&'static str>,
    pub pattern: Option<&'static str>,
    pub example: Option<&'static str>,
    /// Opaque shapes are objects/arrays whose content is never described
    pub opaque: bool,
}

impl TypeFormat {
    const fn of(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            format: None,
            pattern: None,
            example: None,
            opaque: false,
        }
    }

    const fn format(mut self, format: &'static str) -> Self {
        self.format = Some(format);
        self
    }

    const fn pattern(mut self, pattern: &'static str) -> Self {
        self.pattern = Some(pattern);
        self
    }

    const fn example(mut self, example: &'static str) -> Self {
        self.example = Some(example);
        self
    }

    const fn opaque(mut self) -> Self {
        self.opaque = true;
        self
    }

    /// Whether this is an object or array shape
    pub fn is_structured(&self) -> bool {
        matches!(self.schema_type, SchemaType::Object | SchemaType::Array)
    }

    /// Number of known attributes, counting the type itself
    pub fn attribute_count(&self) -> usize {
        1 + [self.format, self.pattern, self.example]
            .iter()
            .filter(|a| a.is_some())
            .count()
    }

    /// Overwrites the type-derived attributes of a schema
    pub fn apply_to(&self, schema: &mut Schema) {
        schema.schema_type = Some(self.schema_type);
        schema.format = self.format.map(str::to_string);
        schema.pattern = self.pattern.map(str::to_string);
        schema.example = self.example.map(|e| Value::String(e.to_string()));
    }

    pub fn to_schema(&self) -> Schema {
        let mut schema = Schema::new();
        self.apply_to(&mut schema);
        schema
    }
}

const STRING: TypeFormat = TypeFormat::of(SchemaType::String);
const BINARY: TypeFormat = STRING.format("binary");
const BYTE: TypeFormat = STRING.format("byte");
const UUID: TypeFormat = STRING.format("uuid").pattern(UUID_PATTERN);
const URI: TypeFormat = STRING.format("uri");
const NUMBER: TypeFormat = TypeFormat::of(SchemaType::Number);
const DOUBLE: TypeFormat = NUMBER.format("double");
const FLOAT: TypeFormat = NUMBER.format("float");
const INTEGER: TypeFormat = TypeFormat::of(SchemaType::Integer);
const INT32: TypeFormat = INTEGER.format("int32");
const INT64: TypeFormat = INTEGER.format("int64");
const BOOLEAN: TypeFormat = TypeFormat::of(SchemaType::Boolean);
const ARRAY: TypeFormat = TypeFormat::of(SchemaType::Array);
const OBJECT: TypeFormat = TypeFormat::of(SchemaType::Object);
const ARRAY_OPAQUE: TypeFormat = ARRAY.opaque();
const OBJECT_OPAQUE: TypeFormat = OBJECT.opaque();
const DATE: TypeFormat = STRING.format("date");
const DATE_TIME: TypeFormat = STRING.format("date-time");
const DURATION: TypeFormat = STRING.format("duration").example("P1D");
const TIME: TypeFormat = STRING.format("time");
const TIME_LOCAL: TypeFormat = STRING.format("local-time");

fn lookup(name: &str) -> Option<TypeFormat> {
    let format = match name {
        "java.lang.String" | "java.lang.StringBuffer" | "java.lang.StringBuilder"
        | "java.lang.CharSequence" => STRING,
        "java.net.URI" | "java.net.URL" => URI,
        "java.util.UUID" => UUID,
        "byte" | "java.lang.Byte" | "char" | "java.lang.Character" => BYTE,
        "byte[]" | "java.io.InputStream" => BINARY,
        "java.lang.Number" | "java.math.BigDecimal" => NUMBER,
        "double" | "java.lang.Double" | "java.util.OptionalDouble" => DOUBLE,
        "float" | "java.lang.Float" => FLOAT,
        "java.math.BigInteger" | "short" | "java.lang.Short" => INTEGER,
        "int" | "java.lang.Integer" | "java.util.OptionalInt" => INT32,
        "long" | "java.lang.Long" | "java.util.OptionalLong" => INT64,
        "boolean" | "java.lang.Boolean" => BOOLEAN,
        "java.util.Date" | "java.sql.Date" | "java.time.LocalDate" => DATE,
        "java.time.LocalDateTime"
        | "java.time.ZonedDateTime"
        | "java.time.OffsetDateTime"
        | "java.time.Instant"
        | "java.util.Calendar"
        | "java.util.GregorianCalendar" => DATE_TIME,
        "java.time.Duration" | "java.time.Period" => DURATION,
        "java.time.LocalTime" => TIME_LOCAL,
        "java.time.OffsetTime" => TIME,
        "javax.json.JsonArray" | "jakarta.json.JsonArray" => ARRAY_OPAQUE,
        "javax.json.JsonObject" | "jakarta.json.JsonObject" => OBJECT_OPAQUE,
        "javax.json.JsonNumber" | "jakarta.json.JsonNumber" => NUMBER,
        "javax.json.JsonString" | "jakarta.json.JsonString" => STRING,
        _ => return None,
    };
    Some(format)
}

/// Classifies a type. Total: anything unknown is an object, arrays are arrays.
pub fn classify(ty: &Type) -> TypeFormat {
    let name = ty.name();
    lookup(&name).unwrap_or(if ty.is_array() { ARRAY } else { OBJECT })
}

/// A terminal type resolves directly to a scalar shape and is never expanded
pub fn is_terminal(ty: &Type) -> bool {
    match ty {
        Type::Void | Type::Primitive(_) => true,
        Type::TypeVariable { .. } | Type::Wildcard { .. } => false,
        other => !classify(other).is_structured(),
    }
}

/// Schema carrying only the type-derived attributes of `ty`
pub fn type_schema(ty: &Type) -> Schema {
    classify(ty).to_schema()
}
