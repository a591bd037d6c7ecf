//! The class metadata provider.
//!
//! A [`ClassIndex`] is built once from descriptor records and is read-only
//! afterwards. It answers lookups by name, ancestry queries and member
//! enumeration; JDK types that were not indexed are answered from a built-in
//! hierarchy table.

pub mod known;
pub mod model;
pub mod signature;
pub mod types;

pub use model::{Access, Annotation, ClassInfo, ClassKind, FieldInfo, MethodInfo, Modifiers};
pub use types::{local_name, Primitive, Type, TypeParameter, OBJECT};

use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::{HashMap, HashSet, VecDeque};

/// One level of a class hierarchy
#[derive(Debug, Clone)]
pub struct Ancestor<'a> {
    pub class: &'a ClassInfo,
    /// The type through which the level is reached
    pub ty: Type,
}

/// Read-only index of class metadata
#[derive(Debug, Clone, Default)]
pub struct ClassIndex {
    classes: IndexMap<String, ClassInfo>,
}

impl ClassIndex {
    /// Builds an index from class records.
    ///
    /// Bare names matching a declared type parameter are bound to type
    /// variables. The stand-in carriers are always added. When two records
    /// share a name the later one wins.
    pub fn new(classes: impl IntoIterator<Item = ClassInfo>) -> Self {
        let mut index = IndexMap::new();

        for class in classes.into_iter().chain(known::standins()) {
            if index.contains_key(&class.name) {
                warn!("Duplicate class {} in index, keeping the last one", class.name);
            }
            index.insert(class.name.clone(), bind_class(class));
        }

        debug!("Indexed {} classes", index.len());
        Self { classes: index }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.values()
    }

    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    /// The indexed class of a type. Arrays, primitives and void have none.
    pub fn class_of(&self, ty: &Type) -> Option<&ClassInfo> {
        match ty {
            Type::Void | Type::Primitive(_) | Type::Array(_) => None,
            other => self.get(&other.name()),
        }
    }

    pub fn contains(&self, ty: &Type) -> bool {
        self.class_of(ty).is_some()
    }

    /// Declared type parameters of an indexed or built-in class
    pub fn type_parameters(&self, name: &str) -> &[TypeParameter] {
        if let Some(class) = self.get(name) {
            return &class.type_parameters;
        }
        known::lookup(name)
            .map(|k| k.type_parameters.as_slice())
            .unwrap_or(&[])
    }

    /// The superclass type of a class, including the implicit supertypes of
    /// enums and records
    pub fn superclass_type(&self, class: &ClassInfo) -> Option<Type> {
        if let Some(super_type) = &class.super_type {
            return Some(super_type.clone());
        }
        match class.kind {
            ClassKind::Enum => Some(Type::parameterized(
                known::ENUM,
                vec![Type::class(class.name.clone())],
            )),
            ClassKind::Record => Some(Type::class(known::RECORD)),
            _ => None,
        }
    }

    /// Direct supertypes (superclass first, then interfaces) of a named class
    pub fn direct_supertypes(&self, name: &str) -> Vec<Type> {
        if let Some(class) = self.get(name) {
            let mut supertypes: Vec<Type> = self.superclass_type(class).into_iter().collect();
            supertypes.extend(class.interfaces.iter().cloned());
            return supertypes;
        }
        known::lookup(name)
            .map(|k| k.supertypes.clone())
            .unwrap_or_default()
    }

    /// Whether `ty` is, extends or implements the named class
    pub fn is_a(&self, ty: &Type, target: &str) -> bool {
        if matches!(ty, Type::Void | Type::Primitive(_) | Type::Array(_)) {
            return false;
        }

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([ty.name()]);

        while let Some(name) = queue.pop_front() {
            if name == target {
                return true;
            }
            if !seen.insert(name.clone()) {
                continue;
            }
            queue.extend(self.direct_supertypes(&name).iter().map(Type::name));
        }

        false
    }

    pub fn is_enum(&self, ty: &Type) -> bool {
        self.class_of(ty).map_or(false, ClassInfo::is_enum) || self.is_a(ty, known::ENUM)
    }

    /// Finds `target` among the ancestors of `ty`, with the type arguments of
    /// `ty` substituted along the way.
    ///
    /// `ArrayList<String>` sought as `java.lang.Iterable` yields
    /// `Iterable<String>`. A raw or arity-mismatched level leaves its variables
    /// unbound.
    pub fn resolve_parameterized_ancestor(&self, ty: &Type, target: &str) -> Option<Type> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([ty.clone()]);

        while let Some(current) = queue.pop_front() {
            let name = current.name();
            if name == target {
                return Some(current);
            }
            if !seen.insert(current.to_string()) {
                continue;
            }

            let bindings = self.bindings(&current);
            for supertype in self.direct_supertypes(&name) {
                queue.push_back(substitute(&supertype, &bindings));
            }
        }

        None
    }

    /// Type-variable bindings of one parameterized level
    pub fn bindings(&self, ty: &Type) -> HashMap<String, Type> {
        let arguments = ty.arguments();
        let parameters = self.type_parameters(&ty.name());

        if arguments.is_empty() {
            return HashMap::new();
        }
        if arguments.len() != parameters.len() {
            debug!(
                "Type {} has {} arguments but {} declares {} parameters",
                ty,
                arguments.len(),
                ty.name(),
                parameters.len()
            );
            return HashMap::new();
        }

        parameters
            .iter()
            .map(|p| p.identifier.clone())
            .zip(arguments.iter().cloned())
            .collect()
    }

    /// The indexed classes of a hierarchy, leaf first, following superclasses.
    ///
    /// Each level is paired with the type through which it is reached, as
    /// declared by the level below (type variables are left unresolved).
    pub fn inheritance_chain(&self, ty: &Type) -> Vec<Ancestor<'_>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(ty.clone());

        while let Some(level) = current {
            let Some(class) = self.class_of(&level) else {
                break;
            };
            if !seen.insert(class.name.as_str()) {
                warn!("Class {} extends itself", class.name);
                break;
            }
            current = class.super_type.clone();
            chain.push(Ancestor { class, ty: level });
        }

        chain
    }

    /// Every indexed interface of a class, including interfaces of interfaces
    pub fn interfaces(&self, class: &ClassInfo) -> Vec<Ancestor<'_>> {
        let mut result: Vec<Ancestor<'_>> = Vec::new();
        let mut queue: VecDeque<Type> = class.interfaces.iter().cloned().collect();

        while let Some(ty) = queue.pop_front() {
            let Some(interface) = self.class_of(&ty) else {
                continue;
            };
            if result.iter().any(|a| a.class.name == interface.name) {
                continue;
            }
            queue.extend(interface.interfaces.iter().cloned());
            result.push(Ancestor {
                class: interface,
                ty,
            });
        }

        result
    }

    /// Indexed classes (not interfaces) assignable to the named interface
    pub fn implementors(&self, interface: &str) -> Vec<&ClassInfo> {
        self.classes
            .values()
            .filter(|c| !c.is_interface() && c.name != interface)
            .filter(|c| self.is_a(&Type::class(c.name.clone()), interface))
            .collect()
    }
}

/// Replaces bound type variables; everything else is copied
pub fn substitute(ty: &Type, bindings: &HashMap<String, Type>) -> Type {
    if bindings.is_empty() {
        return ty.clone();
    }
    match ty {
        Type::TypeVariable { identifier, .. } => bindings
            .get(identifier)
            .cloned()
            .unwrap_or_else(|| ty.clone()),
        Type::Array(component) => Type::array_of(substitute(component, bindings)),
        Type::Parameterized { name, arguments } => Type::parameterized(
            name.clone(),
            arguments.iter().map(|a| substitute(a, bindings)).collect(),
        ),
        Type::Wildcard {
            extends,
            super_bound,
        } => Type::Wildcard {
            extends: extends
                .as_ref()
                .map(|b| Box::new(substitute(b, bindings))),
            super_bound: super_bound
                .as_ref()
                .map(|b| Box::new(substitute(b, bindings))),
        },
        other => other.clone(),
    }
}

/// Turns bare class names that match a declared parameter into type variables
pub fn bind_variables(ty: Type, parameters: &[TypeParameter]) -> Type {
    if parameters.is_empty() {
        return ty;
    }
    match ty {
        Type::Class(name) => match parameters.iter().find(|p| p.identifier == name) {
            Some(param) => param.as_type(),
            None => Type::Class(name),
        },
        Type::Array(component) => Type::array_of(bind_variables(*component, parameters)),
        Type::Parameterized { name, arguments } => Type::Parameterized {
            name,
            arguments: arguments
                .into_iter()
                .map(|a| bind_variables(a, parameters))
                .collect(),
        },
        Type::Wildcard {
            extends,
            super_bound,
        } => Type::Wildcard {
            extends: extends.map(|b| Box::new(bind_variables(*b, parameters))),
            super_bound: super_bound.map(|b| Box::new(bind_variables(*b, parameters))),
        },
        other => other,
    }
}

fn bind_parameters(parameters: Vec<TypeParameter>) -> Vec<TypeParameter> {
    let unbound = parameters.clone();
    parameters
        .into_iter()
        .map(|p| TypeParameter {
            identifier: p.identifier,
            bounds: p
                .bounds
                .into_iter()
                .map(|b| bind_variables(b, &unbound))
                .collect(),
        })
        .collect()
}

fn bind_class(mut class: ClassInfo) -> ClassInfo {
    class.type_parameters = bind_parameters(std::mem::take(&mut class.type_parameters));
    let params = class.type_parameters.clone();

    class.super_type = class.super_type.map(|t| bind_variables(t, &params));
    class.interfaces = std::mem::take(&mut class.interfaces)
        .into_iter()
        .map(|t| bind_variables(t, &params))
        .collect();

    for field in &mut class.fields {
        field.ty = bind_variables(field.ty.clone(), &params);
    }

    for method in &mut class.methods {
        method.type_parameters = bind_parameters(std::mem::take(&mut method.type_parameters));
        // Method parameters shadow class parameters
        let mut scope = method.type_parameters.clone();
        scope.extend(
            params
                .iter()
                .filter(|p| !method.type_parameters.iter().any(|m| m.identifier == p.identifier))
                .cloned(),
        );
        method.return_type = bind_variables(method.return_type.clone(), &scope);
        method.parameters = std::mem::take(&mut method.parameters)
            .into_iter()
            .map(|t| bind_variables(t, &scope))
            .collect();
    }

    class
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn generic_class(name: &str, params: &[&str]) -> ClassInfo {
        let mut class = ClassInfo::new(name);
        class.type_parameters = params.iter().map(|p| TypeParameter::new(*p)).collect();
        class
    }

    #[test]
    fn test_binds_type_variables() {
        let mut pair = generic_class("com.acme.Pair", &["K", "V"]);
        pair.fields
            .push(FieldInfo::new("key", Type::parse("K").unwrap()));
        pair.fields
            .push(FieldInfo::new("values", Type::parse("java.util.List<V>").unwrap()));
        pair.fields
            .push(FieldInfo::new("name", Type::parse("java.lang.String").unwrap()));

        let index = ClassIndex::new(vec![pair]);
        let pair = index.get("com.acme.Pair").unwrap();

        assert_eq!(pair.fields[0].ty, Type::variable("K"));
        assert_eq!(
            pair.fields[1].ty,
            Type::parameterized("java.util.List", vec![Type::variable("V")])
        );
        assert_eq!(pair.fields[2].ty, Type::class("java.lang.String"));
    }

    #[test]
    fn test_method_parameters_shadow_class_parameters() {
        let mut class = generic_class("com.acme.Holder", &["T"]);
        let mut method = MethodInfo::new("convert", Type::parse("T").unwrap(), vec![]);
        method.type_parameters = vec![TypeParameter {
            identifier: "T".to_string(),
            bounds: vec![Type::class("java.lang.Number")],
        }];
        class.methods.push(method);

        let index = ClassIndex::new(vec![class]);
        let method = &index.get("com.acme.Holder").unwrap().methods[0];
        assert_eq!(method.return_type.name(), "java.lang.Number");
    }

    #[test]
    fn test_is_a_through_index_and_builtins() {
        let mut list = ClassInfo::new("com.acme.PetList");
        list.super_type = Some(Type::parse("java.util.ArrayList<com.acme.Pet>").unwrap());
        let mut color = ClassInfo::new("com.acme.Color");
        color.kind = ClassKind::Enum;

        let index = ClassIndex::new(vec![list, color]);

        assert!(index.is_a(&Type::class("com.acme.PetList"), known::COLLECTION));
        assert!(index.is_a(&Type::class("com.acme.PetList"), known::ITERABLE));
        assert!(!index.is_a(&Type::class("com.acme.PetList"), known::MAP));
        assert!(index.is_a(&Type::class("java.util.TreeMap"), known::MAP));
        assert!(index.is_enum(&Type::class("com.acme.Color")));
        assert!(!index.is_a(&Type::array_of(Type::class("com.acme.Pet")), known::COLLECTION));
    }

    #[test]
    fn test_resolve_parameterized_ancestor() {
        let mut list = ClassInfo::new("com.acme.PetList");
        list.super_type = Some(Type::parse("java.util.ArrayList<com.acme.Pet>").unwrap());
        let index = ClassIndex::new(vec![list]);

        let resolved = index
            .resolve_parameterized_ancestor(&Type::class("com.acme.PetList"), known::COLLECTION)
            .unwrap();
        assert_eq!(
            resolved,
            Type::parameterized(known::COLLECTION, vec![Type::class("com.acme.Pet")])
        );

        let resolved = index
            .resolve_parameterized_ancestor(
                &Type::parse("java.util.HashMap<java.lang.String, java.lang.Long>").unwrap(),
                known::MAP,
            )
            .unwrap();
        assert_eq!(resolved.to_string(), "java.util.Map<java.lang.String, java.lang.Long>");

        let resolved = index
            .resolve_parameterized_ancestor(
                &Type::parse("java.util.stream.Stream<com.acme.Pet>").unwrap(),
                "java.util.stream.BaseStream",
            )
            .unwrap();
        assert_eq!(
            resolved.to_string(),
            "java.util.stream.BaseStream<com.acme.Pet, java.util.stream.Stream<com.acme.Pet>>"
        );
    }

    #[test]
    fn test_raw_ancestor_keeps_variables() {
        let index = ClassIndex::new(Vec::new());
        let resolved = index
            .resolve_parameterized_ancestor(&Type::class("java.util.ArrayList"), known::COLLECTION)
            .unwrap();
        assert_eq!(resolved.arguments()[0].identifier(), Some("E"));
    }

    #[test]
    fn test_implementors() {
        let animal = {
            let mut c = ClassInfo::new("com.acme.Animal");
            c.kind = ClassKind::Interface;
            c
        };
        let mut dog = ClassInfo::new("com.acme.Dog");
        dog.interfaces.push(Type::class("com.acme.Animal"));
        let mut puppy = ClassInfo::new("com.acme.Puppy");
        puppy.super_type = Some(Type::class("com.acme.Dog"));
        let cat = ClassInfo::new("com.acme.Cat");

        let index = ClassIndex::new(vec![animal, dog, puppy, cat]);
        let names: Vec<&str> = index
            .implementors("com.acme.Animal")
            .iter()
            .map(|c| c.name.as_str())
            .collect();

        assert_eq!(names, vec!["com.acme.Dog", "com.acme.Puppy"]);
    }

    #[test]
    fn test_inheritance_chain() {
        let mut base = generic_class("com.acme.Base", &["T"]);
        base.super_type = Some(Type::class("java.lang.Object"));
        let mut middle = generic_class("com.acme.Middle", &["U"]);
        middle.super_type = Some(Type::parse("com.acme.Base<U>").unwrap());
        let mut leaf = ClassInfo::new("com.acme.Leaf");
        leaf.super_type = Some(Type::parse("com.acme.Middle<java.lang.String>").unwrap());

        let index = ClassIndex::new(vec![base, middle, leaf]);
        let chain = index.inheritance_chain(&Type::class("com.acme.Leaf"));

        let names: Vec<&str> = chain.iter().map(|a| a.class.name.as_str()).collect();
        assert_eq!(names, vec!["com.acme.Leaf", "com.acme.Middle", "com.acme.Base"]);
        assert_eq!(chain[1].ty.to_string(), "com.acme.Middle<java.lang.String>");
        assert_eq!(
            chain[2].ty,
            Type::parameterized("com.acme.Base", vec![Type::variable("U")])
        );
        assert!(index.inheritance_chain(&Type::class("com.acme.Missing")).is_empty());
    }

    #[test]
    fn test_interfaces_are_recursive() {
        let mut named = ClassInfo::new("com.acme.Named");
        named.kind = ClassKind::Interface;
        let mut pet = ClassInfo::new("com.acme.PetContract");
        pet.kind = ClassKind::Interface;
        pet.interfaces.push(Type::class("com.acme.Named"));
        let mut dog = ClassInfo::new("com.acme.Dog");
        dog.interfaces.push(Type::class("com.acme.PetContract"));
        dog.interfaces.push(Type::class("java.io.Serializable"));

        let index = ClassIndex::new(vec![named, pet, dog]);
        let interfaces = index.interfaces(index.get("com.acme.Dog").unwrap());
        let names: Vec<&str> = interfaces.iter().map(|a| a.class.name.as_str()).collect();

        assert_eq!(names, vec!["com.acme.PetContract", "com.acme.Named"]);
    }

    #[test]
    fn test_standins_always_present() {
        let index = ClassIndex::new(Vec::new());
        assert_eq!(index.len(), known::Container::ALL.len());
        assert!(index.get(known::Container::Collection.standin()).is_some());
    }
}
