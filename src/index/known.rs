//! Built-in knowledge about JDK types that descriptor files never carry:
//! the container hierarchy with its type parameters, and the stand-in carriers.

use crate::index::model::{Access, ClassInfo, FieldInfo};
use crate::index::types::{Type, TypeParameter};
use crate::index::bind_variables;
use log::warn;
use std::collections::HashMap;
use std::sync::OnceLock;

pub const ITERABLE: &str = "java.lang.Iterable";
pub const COLLECTION: &str = "java.util.Collection";
pub const SET: &str = "java.util.Set";
pub const MAP: &str = "java.util.Map";
pub const STREAM: &str = "java.util.stream.Stream";
pub const OPTIONAL: &str = "java.util.Optional";
pub const ENUM: &str = "java.lang.Enum";
pub const RECORD: &str = "java.lang.Record";
pub const STRING: &str = "java.lang.String";

/// `(name, type parameters, direct supertypes)`
const HIERARCHY: &[(&str, &[&str], &[&str])] = &[
    ("java.lang.Iterable", &["T"], &[]),
    ("java.util.Collection", &["E"], &["java.lang.Iterable<E>"]),
    ("java.util.List", &["E"], &["java.util.Collection<E>"]),
    ("java.util.Set", &["E"], &["java.util.Collection<E>"]),
    ("java.util.SortedSet", &["E"], &["java.util.Set<E>"]),
    ("java.util.NavigableSet", &["E"], &["java.util.SortedSet<E>"]),
    ("java.util.Queue", &["E"], &["java.util.Collection<E>"]),
    ("java.util.Deque", &["E"], &["java.util.Queue<E>"]),
    ("java.util.AbstractCollection", &["E"], &["java.util.Collection<E>"]),
    ("java.util.AbstractList", &["E"], &["java.util.AbstractCollection<E>", "java.util.List<E>"]),
    ("java.util.AbstractSet", &["E"], &["java.util.AbstractCollection<E>", "java.util.Set<E>"]),
    ("java.util.ArrayList", &["E"], &["java.util.AbstractList<E>", "java.util.List<E>"]),
    ("java.util.LinkedList", &["E"], &["java.util.AbstractList<E>", "java.util.List<E>", "java.util.Deque<E>"]),
    ("java.util.ArrayDeque", &["E"], &["java.util.AbstractCollection<E>", "java.util.Deque<E>"]),
    ("java.util.Vector", &["E"], &["java.util.AbstractList<E>", "java.util.List<E>"]),
    ("java.util.HashSet", &["E"], &["java.util.AbstractSet<E>", "java.util.Set<E>"]),
    ("java.util.LinkedHashSet", &["E"], &["java.util.HashSet<E>", "java.util.Set<E>"]),
    ("java.util.TreeSet", &["E"], &["java.util.AbstractSet<E>", "java.util.NavigableSet<E>"]),
    ("java.util.EnumSet", &["E"], &["java.util.AbstractSet<E>"]),
    ("java.util.Map", &["K", "V"], &[]),
    ("java.util.SortedMap", &["K", "V"], &["java.util.Map<K, V>"]),
    ("java.util.NavigableMap", &["K", "V"], &["java.util.SortedMap<K, V>"]),
    ("java.util.AbstractMap", &["K", "V"], &["java.util.Map<K, V>"]),
    ("java.util.HashMap", &["K", "V"], &["java.util.AbstractMap<K, V>", "java.util.Map<K, V>"]),
    ("java.util.LinkedHashMap", &["K", "V"], &["java.util.HashMap<K, V>", "java.util.Map<K, V>"]),
    ("java.util.TreeMap", &["K", "V"], &["java.util.AbstractMap<K, V>", "java.util.NavigableMap<K, V>"]),
    ("java.util.EnumMap", &["K", "V"], &["java.util.AbstractMap<K, V>"]),
    ("java.util.Hashtable", &["K", "V"], &["java.util.Map<K, V>"]),
    ("java.util.concurrent.ConcurrentMap", &["K", "V"], &["java.util.Map<K, V>"]),
    ("java.util.concurrent.ConcurrentHashMap", &["K", "V"], &["java.util.AbstractMap<K, V>", "java.util.concurrent.ConcurrentMap<K, V>"]),
    ("java.util.stream.BaseStream", &["T", "S"], &[]),
    ("java.util.stream.Stream", &["T"], &["java.util.stream.BaseStream<T, java.util.stream.Stream<T>>"]),
    ("java.util.Optional", &["T"], &[]),
    ("java.lang.Enum", &["E"], &[]),
    ("java.lang.Record", &[], &[]),
    ("java.lang.Number", &[], &[]),
    ("java.lang.CharSequence", &[], &[]),
    ("java.lang.String", &[], &["java.lang.CharSequence"]),
    ("java.lang.StringBuilder", &[], &["java.lang.CharSequence"]),
    ("java.lang.StringBuffer", &[], &["java.lang.CharSequence"]),
    ("java.math.BigDecimal", &[], &["java.lang.Number"]),
    ("java.math.BigInteger", &[], &["java.lang.Number"]),
];

/// A JDK class known without being indexed
#[derive(Debug, Clone)]
pub struct KnownClass {
    pub type_parameters: Vec<TypeParameter>,
    pub supertypes: Vec<Type>,
}

fn table() -> &'static HashMap<&'static str, KnownClass> {
    static TABLE: OnceLock<HashMap<&'static str, KnownClass>> = OnceLock::new();
    TABLE.get_or_init(|| {
        HIERARCHY
            .iter()
            .map(|(name, params, supers)| {
                let type_parameters: Vec<TypeParameter> =
                    params.iter().map(|p| TypeParameter::new(*p)).collect();
                let supertypes = supers
                    .iter()
                    .filter_map(|sig| match Type::parse(sig) {
                        Ok(ty) => Some(bind_variables(ty, &type_parameters)),
                        Err(e) => {
                            warn!("Skipping built-in supertype of {}: {}", name, e);
                            None
                        }
                    })
                    .collect();
                (
                    *name,
                    KnownClass {
                        type_parameters,
                        supertypes,
                    },
                )
            })
            .collect()
    })
}

/// Looks up a JDK class from the built-in hierarchy
pub fn lookup(name: &str) -> Option<&'static KnownClass> {
    table().get(name)
}

/// Whether the name belongs to the JDK (its members are never scanned)
pub fn is_jdk_type(name: &str) -> bool {
    name.starts_with("java.") || name.starts_with("javax.") || name.starts_with("jdk.")
}

/// Container families redirected through a stand-in carrier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Collection,
    Iterable,
    Map,
    Stream,
}

impl Container {
    pub const ALL: [Container; 4] = [
        Container::Collection,
        Container::Iterable,
        Container::Map,
        Container::Stream,
    ];

    /// The JDK interface every member of this family implements
    pub fn interface(self) -> &'static str {
        match self {
            Container::Collection => COLLECTION,
            Container::Iterable => ITERABLE,
            Container::Map => MAP,
            Container::Stream => STREAM,
        }
    }

    /// Name of the synthetic carrier class for this family
    pub fn standin(self) -> &'static str {
        match self {
            Container::Collection => "openapi.standin.CollectionStandin",
            Container::Iterable => "openapi.standin.IterableStandin",
            Container::Map => "openapi.standin.MapStandin",
            Container::Stream => "openapi.standin.StreamStandin",
        }
    }
}

/// Name of the single field every stand-in carries
pub const STANDIN_FIELD: &str = "value";

/// Builds the stand-in carrier classes added to every index.
///
/// Each carrier declares the type parameters of its container interface and a
/// single field typed as that interface, so resolving the field against a
/// concrete container type yields the container with its arguments bound.
pub fn standins() -> Vec<ClassInfo> {
    Container::ALL
        .iter()
        .filter_map(|container| {
            let known = lookup(container.interface())?;
            let mut class = ClassInfo::new(container.standin());
            class.type_parameters = known.type_parameters.clone();
            let field_type = Type::parameterized(
                container.interface(),
                known.type_parameters.iter().map(TypeParameter::as_type).collect(),
            );
            let mut field = FieldInfo::new(STANDIN_FIELD, field_type);
            field.modifiers.access = Access::Public;
            class.fields.push(field);
            Some(class)
        })
        .collect()
}
