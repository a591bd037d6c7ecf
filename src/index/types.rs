use crate::error::Error;
use crate::index::signature;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully qualified name of the root of every class hierarchy
pub const OBJECT: &str = "java.lang.Object";

/// Primitive types of the class model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    /// Parses a primitive keyword (`int`, `boolean`, ...)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let primitive = match keyword {
            "boolean" => Primitive::Boolean,
            "byte" => Primitive::Byte,
            "char" => Primitive::Char,
            "short" => Primitive::Short,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            _ => return None,
        };
        Some(primitive)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    /// Name of the wrapper class boxing this primitive
    pub fn boxed(self) -> &'static str {
        match self {
            Primitive::Boolean => "java.lang.Boolean",
            Primitive::Byte => "java.lang.Byte",
            Primitive::Char => "java.lang.Character",
            Primitive::Short => "java.lang.Short",
            Primitive::Int => "java.lang.Integer",
            Primitive::Long => "java.lang.Long",
            Primitive::Float => "java.lang.Float",
            Primitive::Double => "java.lang.Double",
        }
    }

    /// Finds the primitive boxed by the named wrapper class
    pub fn unboxed(name: &str) -> Option<Self> {
        [
            Primitive::Boolean,
            Primitive::Byte,
            Primitive::Char,
            Primitive::Short,
            Primitive::Int,
            Primitive::Long,
            Primitive::Float,
            Primitive::Double,
        ]
        .into_iter()
        .find(|p| p.boxed() == name)
    }
}

/// A type as it appears in a class signature.
///
/// Equality and hashing are structural: two types are equal when their names,
/// argument lists, type-variable identifiers with bounds, and wildcard bounds are
/// equal. Annotations never take part in identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Type {
    Void,
    Primitive(Primitive),
    Class(String),
    Array(Box<Type>),
    Parameterized {
        name: String,
        arguments: Vec<Type>,
    },
    TypeVariable {
        identifier: String,
        bounds: Vec<Type>,
    },
    Wildcard {
        extends: Option<Box<Type>>,
        super_bound: Option<Box<Type>>,
    },
}

impl Type {
    pub fn class(name: impl Into<String>) -> Self {
        Type::Class(name.into())
    }

    pub fn parameterized(name: impl Into<String>, arguments: Vec<Type>) -> Self {
        Type::Parameterized {
            name: name.into(),
            arguments,
        }
    }

    pub fn array_of(component: Type) -> Self {
        Type::Array(Box::new(component))
    }

    pub fn variable(identifier: impl Into<String>) -> Self {
        Type::TypeVariable {
            identifier: identifier.into(),
            bounds: Vec::new(),
        }
    }

    pub fn object() -> Self {
        Type::Class(OBJECT.to_string())
    }

    /// Parses a type signature such as `java.util.List<com.acme.Pet>`
    pub fn parse(signature: &str) -> Result<Self, Error> {
        signature::parse_type(signature)
    }

    /// The class name used to look this type up in an index.
    ///
    /// Type variables and wildcards are named after their (first) upper bound.
    pub fn name(&self) -> String {
        match self {
            Type::Void => "void".to_string(),
            Type::Primitive(p) => p.keyword().to_string(),
            Type::Class(name) | Type::Parameterized { name, .. } => name.clone(),
            Type::Array(component) => format!("{}[]", component.name()),
            Type::TypeVariable { bounds, .. } => bounds
                .first()
                .map(Type::name)
                .unwrap_or_else(|| OBJECT.to_string()),
            Type::Wildcard {
                extends,
                super_bound,
            } => match (extends, super_bound) {
                (Some(bound), _) => bound.name(),
                (None, Some(bound)) => bound.name(),
                (None, None) => OBJECT.to_string(),
            },
        }
    }

    /// Simple name without package or enclosing class
    pub fn local_name(&self) -> String {
        local_name(&self.name()).to_string()
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn is_parameterized(&self) -> bool {
        matches!(self, Type::Parameterized { .. })
    }

    /// Component type of an array, one dimension removed
    pub fn component(&self) -> Option<&Type> {
        match self {
            Type::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Number of array dimensions (0 for non-arrays)
    pub fn dimensions(&self) -> usize {
        match self {
            Type::Array(component) => 1 + component.dimensions(),
            _ => 0,
        }
    }

    /// Innermost component of a (possibly multi-dimensional) array
    pub fn element(&self) -> &Type {
        match self {
            Type::Array(component) => component.element(),
            other => other,
        }
    }

    pub fn arguments(&self) -> &[Type] {
        match self {
            Type::Parameterized { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// Identifier of a type variable
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Type::TypeVariable { identifier, .. } => Some(identifier),
            _ => None,
        }
    }

    /// The type without its arguments
    pub fn raw(&self) -> Type {
        match self {
            Type::Parameterized { name, .. } => Type::Class(name.clone()),
            other => other.clone(),
        }
    }
}

/// Simple name of a fully qualified class name (`a.b.Outer$Inner` -> `Inner`)
pub fn local_name(name: &str) -> &str {
    let start = name.rfind(&['.', '$'][..]).map(|i| i + 1).unwrap_or(0);
    &name[start..]
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Primitive(p) => write!(f, "{}", p.keyword()),
            Type::Class(name) => write!(f, "{}", name),
            Type::Array(component) => write!(f, "{}[]", component),
            Type::Parameterized { name, arguments } => {
                write!(f, "{}<", name)?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ">")
            }
            Type::TypeVariable { identifier, .. } => write!(f, "{}", identifier),
            Type::Wildcard {
                extends,
                super_bound,
            } => match (extends, super_bound) {
                (Some(bound), _) => write!(f, "? extends {}", bound),
                (None, Some(bound)) => write!(f, "? super {}", bound),
                (None, None) => write!(f, "?"),
            },
        }
    }
}

impl TryFrom<String> for Type {
    type Error = Error;

    fn try_from(signature: String) -> Result<Self, Self::Error> {
        Type::parse(&signature)
    }
}

impl From<Type> for String {
    fn from(ty: Type) -> Self {
        ty.to_string()
    }
}

/// A declared type parameter, e.g. `T extends java.lang.Comparable<T>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeParameter {
    pub identifier: String,
    pub bounds: Vec<Type>,
}

impl TypeParameter {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            bounds: Vec::new(),
        }
    }

    /// The type variable introduced by this declaration
    pub fn as_type(&self) -> Type {
        Type::TypeVariable {
            identifier: self.identifier.clone(),
            bounds: self.bounds.clone(),
        }
    }
}

impl TryFrom<String> for TypeParameter {
    type Error = Error;

    fn try_from(declaration: String) -> Result<Self, Self::Error> {
        signature::parse_type_parameter(&declaration)
    }
}

impl From<TypeParameter> for String {
    fn from(param: TypeParameter) -> Self {
        if param.bounds.is_empty() {
            return param.identifier;
        }
        let bounds: Vec<String> = param.bounds.iter().map(Type::to_string).collect();
        format!("{} extends {}", param.identifier, bounds.join(" & "))
    }
}
