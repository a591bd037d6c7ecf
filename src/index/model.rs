use crate::index::types::{Type, TypeParameter};
use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of an indexed class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// Declared access level of a class or member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Protected,
    #[default]
    Package,
    Private,
}

/// Modifier flags shared by classes, fields and methods
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub access: Access,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    pub transient: bool,
    pub synthetic: bool,
}

impl Modifiers {
    pub fn is_public(&self) -> bool {
        self.access == Access::Public
    }

    pub fn is_protected(&self) -> bool {
        self.access == Access::Protected
    }
}

/// An annotation instance with its explicitly given values.
///
/// Values keep their JSON shape: strings, booleans, numbers, arrays, and nested
/// annotations as objects. Class literals are written as type signatures.
/// A descriptor may also give an annotation as its bare name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnnotationRepr")]
pub struct Annotation {
    pub name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub values: IndexMap<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotationRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        values: IndexMap<String, Value>,
    },
}

impl From<AnnotationRepr> for Annotation {
    fn from(repr: AnnotationRepr) -> Self {
        match repr {
            AnnotationRepr::Name(name) => Annotation::new(name),
            AnnotationRepr::Full { name, values } => Annotation { name, values },
        }
    }
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: IndexMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(Value::as_str)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(Value::as_bool)
    }

    pub fn i64(&self, key: &str) -> Option<i64> {
        self.value(key).and_then(Value::as_i64)
    }

    /// Numeric or string value as its literal text, scale preserved
    pub fn literal(&self, key: &str) -> Option<String> {
        match self.value(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// A string-array value; a single string counts as a one-element array
    pub fn strings(&self, key: &str) -> Option<Vec<String>> {
        match self.value(key)? {
            Value::String(s) => Some(vec![s.clone()]),
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// A class-literal value (or array of them), parsed as type signatures.
    ///
    /// Invalid signatures are logged and skipped.
    pub fn types(&self, key: &str) -> Option<Vec<Type>> {
        let signatures = self.strings(key)?;
        let types = signatures
            .iter()
            .filter_map(|sig| match Type::parse(sig) {
                Ok(ty) => Some(ty),
                Err(e) => {
                    warn!("Ignoring `{}` of @{}: {}", key, self.name, e);
                    None
                }
            })
            .collect();
        Some(types)
    }

    pub fn class_value(&self, key: &str) -> Option<Type> {
        self.types(key)?.into_iter().next()
    }

    /// Nested annotation values; objects without a `name` entry are skipped
    pub fn nested(&self, key: &str) -> Vec<Annotation> {
        let items = match self.value(key) {
            Some(Value::Array(items)) => items.clone(),
            Some(obj @ Value::Object(_)) => vec![obj.clone()],
            _ => return Vec::new(),
        };
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<Annotation>(item).ok())
            .collect()
    }
}

/// A field declared by a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(flatten)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub enum_constant: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers: Modifiers::default(),
            enum_constant: false,
            annotations: Vec::new(),
        }
    }
}

fn void() -> Type {
    Type::Void
}

/// A method declared by a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    #[serde(rename = "returns", default = "void")]
    pub return_type: Type,
    #[serde(default)]
    pub parameters: Vec<Type>,
    #[serde(default)]
    pub parameter_names: Vec<String>,
    #[serde(flatten)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl MethodInfo {
    pub fn new(name: impl Into<String>, return_type: Type, parameters: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters,
            parameter_names: Vec::new(),
            modifiers: Modifiers::default(),
            type_parameters: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }
}

/// A class (or interface, enum, record) in the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(flatten)]
    pub modifiers: Modifiers,
    #[serde(rename = "extends", default)]
    pub super_type: Option<Type>,
    #[serde(rename = "implements", default)]
    pub interfaces: Vec<Type>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
    #[serde(default)]
    pub methods: Vec<MethodInfo>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            modifiers: Modifiers {
                access: Access::Public,
                ..Modifiers::default()
            },
            super_type: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    pub fn is_record(&self) -> bool {
        self.kind == ClassKind::Record
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn annotation(&self, names: &[&str]) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|a| names.contains(&a.name.as_str()))
    }

    pub fn has_annotation(&self, names: &[&str]) -> bool {
        self.annotation(names).is_some()
    }

    /// The type of this class as seen from inside: type parameters become arguments
    pub fn self_type(&self) -> Type {
        if self.type_parameters.is_empty() {
            Type::class(self.name.clone())
        } else {
            Type::parameterized(
                self.name.clone(),
                self.type_parameters.iter().map(TypeParameter::as_type).collect(),
            )
        }
    }
}
