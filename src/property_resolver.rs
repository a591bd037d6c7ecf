//! Property Resolver: discovers the exposed properties of a class.
//!
//! Fields, accessors and mutators of a class and its ancestors are unified into
//! one [`Property`] per bean name. Every property keeps the type-variable
//! bindings in scope at its declaring level, so generic members resolve
//! against the concrete type that was scanned.

use crate::annotations::{self, Target};
use crate::config::ScanConfig;
use crate::constraints;
use crate::index::{known, Ancestor, ClassIndex, ClassInfo, FieldInfo, MethodInfo, Primitive, Type};
use crate::naming::NamingStrategy;
use crate::visibility::{self, IgnoreResolver, Visibility};
use indexmap::map::Entry;
use indexmap::IndexMap;
use log::debug;
use std::cmp::Ordering;
use std::collections::HashMap;

const PREFIX_GET: &str = "get";
const PREFIX_IS: &str = "is";
const PREFIX_SET: &str = "set";

/// Type-variable bindings of one parameterized hierarchy level
pub type Bindings = HashMap<String, Type>;

/// One exposed (or ignored) property of a class
#[derive(Debug, Clone)]
pub struct Property<'a> {
    bean_name: String,
    naming: NamingStrategy,
    /// Bindings in scope, declaring level first
    stack: Vec<Bindings>,
    leaf: Type,
    origin: Target<'a>,
    field: Option<Target<'a>>,
    read: Option<Target<'a>>,
    write: Option<Target<'a>>,
    targets: Vec<Target<'a>>,
    constraint_targets: Vec<Target<'a>>,
    prefix: Option<String>,
    suffix: Option<String>,
    ignored: bool,
    exposed: bool,
    read_only: bool,
    write_only: bool,
}

impl<'a> Property<'a> {
    fn new(
        bean_name: String,
        naming: NamingStrategy,
        stack: Vec<Bindings>,
        leaf: Type,
        origin: Target<'a>,
    ) -> Self {
        Self {
            bean_name,
            naming,
            stack,
            leaf,
            origin,
            field: None,
            read: None,
            write: None,
            targets: Vec::new(),
            constraint_targets: Vec::new(),
            prefix: None,
            suffix: None,
            ignored: false,
            exposed: false,
            read_only: false,
            write_only: false,
        }
    }

    /// The name of the bean property (`name` for `getName()`)
    pub fn bean_name(&self) -> &str {
        &self.bean_name
    }

    /// The serialized property name.
    ///
    /// `@Schema(name)`, `@JsonbProperty(value)` and `@JsonProperty(value)` of the
    /// best target win over the naming strategy.
    pub fn name(&self) -> String {
        let target = self.target();
        let explicit = [
            (annotations::SCHEMA, "name"),
            (annotations::JSONB_PROPERTY, "value"),
            (annotations::JACKSON_PROPERTY, "value"),
        ]
        .iter()
        .find_map(|(names, key)| {
            target
                .annotation(names)
                .and_then(|a| a.string(key))
                .filter(|name| !name.is_empty())
        });

        match explicit {
            Some(name) => self.wrap(name),
            None => self.naming.translate(&self.wrap(&self.bean_name)),
        }
    }

    fn wrap(&self, name: &str) -> String {
        format!(
            "{}{}{}",
            self.prefix.as_deref().unwrap_or(""),
            name,
            self.suffix.as_deref().unwrap_or("")
        )
    }

    /// The element whose annotations describe the property
    pub fn target(&self) -> Target<'a> {
        self.targets
            .iter()
            .copied()
            .min_by_key(target_rank)
            .unwrap_or(self.origin)
    }

    pub fn declaring_class(&self) -> &'a ClassInfo {
        self.target().declaring_class()
    }

    /// Declared type of the most recently attached element
    pub fn unresolved_type(&self) -> &Type {
        &self.leaf
    }

    pub fn resolve_type(&self) -> Type {
        self.resolve(&self.leaf)
    }

    /// Substitutes the type variables bound along the hierarchy.
    ///
    /// Parameterized types resolve their arguments unless one of them is a
    /// wildcard; the type itself is then resolved as a whole.
    pub fn resolve(&self, ty: &Type) -> Type {
        match ty {
            Type::Parameterized { name, arguments }
                if !arguments.iter().any(|a| matches!(a, Type::Wildcard { .. })) =>
            {
                Type::parameterized(name.clone(), arguments.iter().map(|a| self.resolve(a)).collect())
            }
            Type::Array(component) => Type::array_of(self.resolve(component)),
            other => self.resolve_variable(other),
        }
    }

    fn resolve_variable(&self, ty: &Type) -> Type {
        let mut current = resolve_wildcard(ty);
        for bindings in &self.stack {
            let bound = current.identifier().and_then(|id| bindings.get(id));
            if let Some(bound) = bound {
                current = bound.clone();
            }
        }
        current
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
            || (self.read_only && self.read.is_none())
            || (self.write_only && self.write.is_none())
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_write_only(&self) -> bool {
        self.write_only
    }

    fn is_exposed_by_default(&self) -> bool {
        !self.is_ignored() && !self.exposed
    }

    /// Elements carrying validation or JSON binding constraints
    pub fn constraint_targets(&self) -> &[Target<'a>] {
        &self.constraint_targets
    }

    pub fn field(&self) -> Option<Target<'a>> {
        self.field
    }

    pub fn read_method(&self) -> Option<Target<'a>> {
        self.read
    }

    pub fn write_method(&self) -> Option<Target<'a>> {
        self.write
    }

    fn set_field(&mut self, field: Target<'a>) {
        self.field = Some(field);
        self.targets.push(field);
    }

    fn set_read(&mut self, method: Target<'a>) {
        if let Some(old) = self.read.take() {
            self.targets.retain(|t| !t.same_as(&old));
        }
        self.leaf = method.value_type();
        self.read = Some(method);
        self.targets.push(method);
    }

    fn set_write(&mut self, method: Target<'a>) {
        if let Some(old) = self.write.take() {
            self.targets.retain(|t| !t.same_as(&old));
        }
        self.leaf = method.value_type();
        self.write = Some(method);
        self.targets.push(method);
    }

    /// Applies the visibility of one element to the property.
    ///
    /// An ignored accessor leaves the property write-only, an ignored mutator
    /// read-only, both ignore it entirely.
    fn process_visibility(
        &mut self,
        ignore: &IgnoreResolver,
        target: Target<'a>,
        reference: Option<&Target<'a>>,
        descendants: &[&'a ClassInfo],
    ) {
        if self.exposed || self.ignored {
            return;
        }

        if visibility::is_unhidden(&target) {
            self.exposed = true;
            return;
        }

        let mut decision = ignore.descendant_visibility(&self.bean_name, descendants);
        if decision == Visibility::Unset {
            decision = ignore.is_ignore(&target, &self.bean_name, reference);
        }

        match decision {
            Visibility::Exposed => self.exposed = true,
            Visibility::Ignored => match target {
                Target::Method(class, method) => {
                    if is_accessor(class, method) {
                        self.write_only = true;
                    } else {
                        self.read_only = true;
                    }
                    if self.read_only && self.write_only {
                        self.ignored = true;
                    }
                }
                _ => self.ignored = true,
            },
            Visibility::Unset => {}
        }
    }
}

/// Resolves wildcards to their upper bound
pub fn resolve_wildcard(ty: &Type) -> Type {
    match ty {
        Type::Wildcard {
            extends: Some(bound),
            ..
        } => (**bound).clone(),
        Type::Wildcard { .. } => Type::object(),
        other => other.clone(),
    }
}

/// Lower ranks win: annotated elements first, then fields, then accessors
fn target_rank(target: &Target) -> ([bool; 5], u8) {
    let missing = |names: &[&str]| !target.has_annotation(names);
    let annotations = [
        missing(annotations::SCHEMA),
        missing(annotations::JSONB_PROPERTY),
        missing(annotations::JACKSON_PROPERTY),
        missing(annotations::XML_ELEMENT),
        missing(annotations::XML_ATTRIBUTE),
    ];
    let kind = match target {
        Target::Field(..) => 0,
        Target::Method(class, method) if is_accessor(class, method) => 1,
        _ => 2,
    };
    (annotations, kind)
}

fn is_boolean(ty: &Type) -> bool {
    match ty {
        Type::Primitive(Primitive::Boolean) => true,
        Type::Class(name) => name == Primitive::Boolean.boxed(),
        _ => false,
    }
}

fn names_property(method: &MethodInfo) -> bool {
    [annotations::SCHEMA, annotations::JACKSON_PROPERTY, annotations::JSONB_PROPERTY]
        .iter()
        .any(|names| method.annotations.iter().any(|a| names.contains(&a.name.as_str())))
}

fn is_record_component(class: &ClassInfo, method: &MethodInfo) -> bool {
    class.is_record() && class.fields.iter().any(|f| !f.modifiers.is_static && f.name == method.name)
}

fn method_prefix(name: &str) -> &'static str {
    [PREFIX_GET, PREFIX_IS, PREFIX_SET]
        .into_iter()
        .find(|prefix| name.starts_with(prefix))
        .unwrap_or("")
}

/// A supplier following bean, record or annotation conventions
pub fn is_accessor(class: &ClassInfo, method: &MethodInfo) -> bool {
    if !method.parameters.is_empty() || method.return_type == Type::Void {
        return false;
    }

    match method_prefix(&method.name) {
        PREFIX_GET => true,
        PREFIX_IS if is_boolean(&method.return_type) => true,
        _ => is_record_component(class, method) || names_property(method),
    }
}

/// A one-argument void method following bean or annotation conventions
pub fn is_mutator(method: &MethodInfo) -> bool {
    if method.parameters.len() != 1 || method.return_type != Type::Void {
        return false;
    }
    method_prefix(&method.name) == PREFIX_SET || names_property(method)
}

/// Bean property name of an accessor or mutator; `None` for a bare `get()`
pub fn property_name(class: &ClassInfo, method: &MethodInfo) -> Option<String> {
    if is_record_component(class, method) {
        return Some(method.name.clone());
    }

    let prefix = method_prefix(&method.name);
    let rest = &method.name[prefix.len()..];
    if rest.is_empty() {
        return None;
    }
    if prefix.is_empty() {
        return Some(method.name.clone());
    }

    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}

/// Types are equal, counting a primitive and its wrapper as the same type
pub fn equal_types(a: &Type, b: &Type) -> bool {
    fn boxed(ty: &Type) -> Option<&str> {
        match ty {
            Type::Primitive(p) => Some(p.boxed()),
            Type::Class(name) if Primitive::unboxed(name).is_some() => Some(name.as_str()),
            _ => None,
        }
    }
    a == b || matches!((boxed(a), boxed(b)), (Some(x), Some(y)) if x == y)
}

fn accept_field(field: &FieldInfo) -> bool {
    !field.modifiers.is_static && !field.modifiers.synthetic
}

fn accept_method(method: &MethodInfo) -> bool {
    !method.modifiers.is_static && !method.is_constructor() && method.name != "getClass"
}

fn non_public_or_absent(target: Option<Target>) -> bool {
    target.map_or(true, |t| !t.is_public())
}

/// Names listed by `@JsonbPropertyOrder`, `@XmlType(propOrder)` or `@JsonPropertyOrder`
fn property_order(class: &ClassInfo) -> Vec<String> {
    let declared = if let Some(order) = class.annotation(annotations::JSONB_PROPERTY_ORDER) {
        order.strings("value")
    } else if let Some(xml_type) = class.annotation(annotations::XML_TYPE) {
        xml_type.strings("propOrder")
    } else {
        class
            .annotation(annotations::JACKSON_PROPERTY_ORDER)
            .and_then(|order| order.strings("value"))
    };
    declared.unwrap_or_default()
}

/// Record components, or the parameters of a creator constructor, in declaration order
fn creator_order(class: &ClassInfo) -> Vec<String> {
    if class.is_record() {
        return class
            .fields
            .iter()
            .filter(|f| !f.modifiers.is_static)
            .map(|f| f.name.clone())
            .collect();
    }

    class
        .methods
        .iter()
        .filter(|m| m.is_constructor())
        .find(|m| {
            m.annotations.iter().any(|a| {
                annotations::JACKSON_CREATOR.contains(&a.name.as_str())
                    || annotations::JSONB_CREATOR.contains(&a.name.as_str())
            })
        })
        .map(|m| m.parameter_names.clone())
        .unwrap_or_default()
}

/// Ancestors named by the class's `@Schema(allOf)`; their members are not scanned
fn composed_ancestors(class: &ClassInfo) -> Vec<String> {
    class
        .annotation(annotations::SCHEMA)
        .and_then(|schema| schema.types("allOf"))
        .map(|types| types.iter().map(Type::name).collect())
        .unwrap_or_default()
}

/// Discovers properties against one index and configuration
pub struct PropertyResolver<'a> {
    index: &'a ClassIndex,
    config: &'a ScanConfig,
    naming: NamingStrategy,
    ignore: IgnoreResolver<'a>,
}

impl<'a> PropertyResolver<'a> {
    pub fn new(index: &'a ClassIndex, config: &'a ScanConfig, naming: NamingStrategy) -> Self {
        Self {
            index,
            config,
            naming,
            ignore: IgnoreResolver::new(index, &config.json_views),
        }
    }

    /// All properties of `leaf` including inherited ones, ordered.
    ///
    /// `reference` is the member through which the type was reached. Types
    /// absent from the index have no properties.
    pub fn get_all_fields(
        &self,
        leaf: &Type,
        reference: Option<Target<'a>>,
    ) -> IndexMap<String, Property<'a>> {
        match self.index.class_of(leaf) {
            Some(class) => self.fields_of(class, leaf, reference, false),
            None => IndexMap::new(),
        }
    }

    /// Properties declared by the class of `leaf` itself, ignoring ancestors
    pub fn get_own_fields(
        &self,
        leaf: &Type,
        reference: Option<Target<'a>>,
    ) -> IndexMap<String, Property<'a>> {
        match self.index.class_of(leaf) {
            Some(class) => self.fields_of(class, leaf, reference, true),
            None => IndexMap::new(),
        }
    }

    /// Properties of `class` scanned as `leaf`; the class need not be the
    /// indexed class of `leaf` (stand-ins are scanned as their container)
    pub fn fields_of(
        &self,
        class: &'a ClassInfo,
        leaf: &Type,
        reference: Option<Target<'a>>,
        own_only: bool,
    ) -> IndexMap<String, Property<'a>> {
        let chain = self.chain(class, leaf);
        let composed = composed_ancestors(class);
        let mut properties: IndexMap<String, Property<'a>> = IndexMap::new();
        let mut stack: Vec<Bindings> = Vec::new();
        let mut descendants: Vec<&'a ClassInfo> = Vec::new();

        for (level, ancestor) in chain.iter().enumerate() {
            if ancestor.ty.is_parameterized() {
                stack.insert(0, self.index.bindings(&ancestor.ty));
            }

            let excluded = level > 0 && (own_only || composed.contains(&ancestor.class.name));
            if excluded || known::is_jdk_type(&ancestor.class.name) {
                debug!("Not scanning members of {} or its ancestors", ancestor.class.name);
                break;
            }

            for field in self.fields(ancestor.class) {
                self.scan_field(&mut properties, ancestor.class, field, &stack, reference.as_ref(), &descendants);
            }

            for method in self.methods(ancestor.class) {
                self.scan_method(&mut properties, ancestor.class, method, &stack, reference.as_ref(), &descendants);
            }

            for interface in self.index.interfaces(ancestor.class) {
                if known::is_jdk_type(&interface.class.name) {
                    continue;
                }
                let mut interface_stack = stack.clone();
                if interface.ty.is_parameterized() {
                    interface_stack.insert(0, self.index.bindings(&interface.ty));
                }
                for method in self.methods(interface.class) {
                    self.scan_method(
                        &mut properties,
                        interface.class,
                        method,
                        &interface_stack,
                        reference.as_ref(),
                        &descendants,
                    );
                }
            }

            descendants.push(ancestor.class);
        }

        if !self.config.private_properties_enable {
            for property in properties.values_mut() {
                if property.is_exposed_by_default()
                    && non_public_or_absent(property.field)
                    && non_public_or_absent(property.read)
                    && non_public_or_absent(property.write)
                {
                    property.ignored = true;
                }
            }
        }

        if !self.config.infer_unannotated_types {
            for property in properties.values_mut() {
                let target = property.target();
                let annotated = annotations::PROPERTY_NAMING
                    .iter()
                    .any(|names| target.has_annotation(names));
                if !annotated {
                    property.ignored = true;
                }
            }
        }

        self.ignore_one_sided_contracts(&mut properties, &chain);
        self.sorted(properties, &chain)
    }

    /// Auto-inheritance parent of a class scanned as `leaf`: an indexed,
    /// non-JDK superclass not already composed through `@Schema(allOf)`
    pub fn inherited_parent(&self, class: &ClassInfo, leaf: &Type) -> Option<Type> {
        let parent = class.super_type.as_ref()?;
        let name = parent.name();

        if known::is_jdk_type(&name) || !self.index.contains(parent) {
            return None;
        }
        if composed_ancestors(class).contains(&name) {
            return None;
        }

        Some(crate::index::substitute(parent, &self.index.bindings(leaf)))
    }

    fn chain(&self, class: &'a ClassInfo, leaf: &Type) -> Vec<Ancestor<'a>> {
        let mut chain = vec![Ancestor {
            class,
            ty: leaf.clone(),
        }];
        if let Some(parent) = &class.super_type {
            chain.extend(
                self.index
                    .inheritance_chain(parent)
                    .into_iter()
                    .filter(|a| a.class.name != class.name),
            );
        }
        chain
    }

    fn fields(&self, class: &'a ClassInfo) -> Vec<&'a FieldInfo> {
        let mut fields: Vec<&FieldInfo> = class.fields.iter().filter(|f| accept_field(f)).collect();
        if self.config.sorted_properties_enable {
            fields.sort_by(|a, b| a.name.cmp(&b.name));
        }
        fields
    }

    fn methods(&self, class: &'a ClassInfo) -> Vec<&'a MethodInfo> {
        let mut methods: Vec<&MethodInfo> = class.methods.iter().filter(|m| accept_method(m)).collect();
        if self.config.sorted_properties_enable {
            methods.sort_by(|a, b| a.name.cmp(&b.name));
        }
        methods
    }

    /// `@JsonNaming` of the declaring class, else the global strategy
    fn naming_for(&self, class: &ClassInfo) -> NamingStrategy {
        match class.annotation(annotations::JACKSON_NAMING) {
            Some(naming) => naming
                .string("value")
                .map(NamingStrategy::from_annotation)
                .unwrap_or(NamingStrategy::Identity),
            None => self.naming,
        }
    }

    fn scan_field(
        &self,
        properties: &mut IndexMap<String, Property<'a>>,
        class: &'a ClassInfo,
        field: &'a FieldInfo,
        stack: &[Bindings],
        reference: Option<&Target<'a>>,
        descendants: &[&'a ClassInfo],
    ) {
        let target = Target::Field(class, field);
        let unwrapped = target
            .annotation(annotations::JACKSON_UNWRAPPED)
            .zip(self.index.class_of(&field.ty));

        if let Some((unwrap, field_class)) = unwrapped {
            let prefix = unwrap.string("prefix").map(str::to_string);
            let suffix = unwrap.string("suffix").map(str::to_string);

            for (key, mut property) in self.fields_of(field_class, &field.ty, Some(target), false) {
                let key = format!(
                    "{}{}{}",
                    prefix.as_deref().unwrap_or(""),
                    key,
                    suffix.as_deref().unwrap_or("")
                );
                property.prefix = prefix.clone();
                property.suffix = suffix.clone();
                properties.insert(key, property);
            }
        }

        let property = match properties.entry(field.name.clone()) {
            Entry::Occupied(entry) => {
                let property = entry.into_mut();
                let inherited = field.modifiers.is_public() || field.modifiers.is_protected();
                if property.field.is_none() && inherited {
                    // Accessors lower in the chain operate on this parent field
                    property.set_field(target);
                }
                property
            }
            Entry::Vacant(entry) => {
                let mut property = Property::new(
                    field.name.clone(),
                    self.naming_for(class),
                    stack.to_vec(),
                    field.ty.clone(),
                    target,
                );
                property.set_field(target);
                entry.insert(property)
            }
        };

        if constraints::has_constraints(&target) {
            property.constraint_targets.push(target);
        }

        if unwrapped.is_some() {
            property.ignored = true;
        } else {
            property.process_visibility(&self.ignore, target, reference, descendants);
        }
    }

    fn scan_method(
        &self,
        properties: &mut IndexMap<String, Property<'a>>,
        class: &'a ClassInfo,
        method: &'a MethodInfo,
        stack: &[Bindings],
        reference: Option<&Target<'a>>,
        descendants: &[&'a ClassInfo],
    ) {
        let is_write = is_mutator(method);
        if !is_write && !is_accessor(class, method) {
            return;
        }
        let Some(bean_name) = property_name(class, method) else {
            return;
        };

        let target = Target::Method(class, method);
        let property_type = target.value_type();

        let property = match properties.entry(bean_name) {
            Entry::Occupied(entry) => {
                let property = entry.into_mut();
                if !equal_types(property.unresolved_type(), &property_type) {
                    debug!(
                        "{} of {} does not match the type of property {}",
                        method.name,
                        class.name,
                        property.bean_name
                    );
                    return;
                }
                property
            }
            Entry::Vacant(entry) => {
                let bean_name = entry.key().clone();
                entry.insert(Property::new(
                    bean_name,
                    self.naming_for(class),
                    stack.to_vec(),
                    property_type,
                    target,
                ))
            }
        };

        if is_write {
            if is_higher_priority(&target, property.write.as_ref()) {
                property.set_write(target);
            }
        } else if is_higher_priority(&target, property.read.as_ref()) {
            property.set_read(target);
        }

        if constraints::has_constraints(&target) {
            property.constraint_targets.push(target);
        }

        property.process_visibility(&self.ignore, target, reference, descendants);
    }

    /// A property backed by a single interface accessor is dropped when another
    /// implementor outside the chain declares the sibling accessor
    fn ignore_one_sided_contracts(
        &self,
        properties: &mut IndexMap<String, Property<'a>>,
        chain: &[Ancestor<'a>],
    ) {
        for property in properties.values_mut() {
            if property.field.is_some() || property.is_ignored() {
                continue;
            }
            let (only, sibling_is_mutator) = match (property.read, property.write) {
                (Some(read), None) => (read, true),
                (None, Some(write)) => (write, false),
                _ => continue,
            };

            let interface = only.declaring_class();
            if !interface.is_interface() {
                continue;
            }

            let sibling_elsewhere = self
                .index
                .implementors(&interface.name)
                .into_iter()
                .filter(|c| !chain.iter().any(|a| a.class.name == c.name))
                .any(|c| {
                    c.methods.iter().any(|m| {
                        let kind_matches = if sibling_is_mutator {
                            is_mutator(m)
                        } else {
                            is_accessor(c, m)
                        };
                        kind_matches && property_name(c, m).as_deref() == Some(property.bean_name())
                    })
                });

            if sibling_elsewhere {
                debug!(
                    "Ignoring one-sided property {} of interface {}",
                    property.bean_name, interface.name
                );
                property.ignored = true;
            }
        }
    }

    /// Explicit order first, then creator order, then declaring level
    /// (superclass first); discovery order breaks ties
    fn sorted(
        &self,
        properties: IndexMap<String, Property<'a>>,
        chain: &[Ancestor<'a>],
    ) -> IndexMap<String, Property<'a>> {
        let mut order: Vec<String> = chain.iter().rev().flat_map(|a| property_order(a.class)).collect();
        if order.is_empty() {
            if let Some(leaf) = chain.first() {
                order = creator_order(leaf.class);
            }
        }
        let classes: Vec<&str> = chain.iter().rev().map(|a| a.class.name.as_str()).collect();

        let position = |key: &str, property: &Property| {
            let name = property.name();
            order
                .iter()
                .position(|o| *o == name)
                .or_else(|| order.iter().position(|o| o == key))
        };
        let level = |property: &Property| {
            let declaring = &property.declaring_class().name;
            classes.iter().position(|c| *c == declaring.as_str())
        };

        let mut entries: Vec<(String, Property<'a>)> = properties.into_iter().collect();
        entries.sort_by(|(k1, p1), (k2, p2)| match (position(k1.as_str(), p1), position(k2.as_str(), p2)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => level(p1).cmp(&level(p2)),
        });

        entries.into_iter().collect()
    }
}

/// Interface methods replace an existing method only when strictly better ranked
fn is_higher_priority(new: &Target, old: Option<&Target>) -> bool {
    let Some(old) = old else {
        return true;
    };
    new.declaring_class().is_interface() && target_rank(new) < target_rank(old)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Access, Annotation, ClassKind, TypeParameter};
    use pretty_assertions::assert_eq;

    fn field(name: &str, ty: &str, access: Access) -> FieldInfo {
        let mut field = FieldInfo::new(name, Type::parse(ty).unwrap());
        field.modifiers.access = access;
        field
    }

    fn method(name: &str, returns: Type, params: Vec<Type>) -> MethodInfo {
        let mut method = MethodInfo::new(name, returns, params);
        method.modifiers.access = Access::Public;
        method
    }

    fn string() -> Type {
        Type::class("java.lang.String")
    }

    fn names(properties: &IndexMap<String, Property>) -> Vec<String> {
        properties
            .values()
            .filter(|p| !p.is_ignored())
            .map(Property::name)
            .collect()
    }

    fn abc_class() -> ClassInfo {
        let mut class = ClassInfo::new("com.acme.Abc");
        for name in ["c", "b", "a"] {
            class.fields.push(field(name, "int", Access::Private));
        }
        class
    }

    #[test]
    fn test_sorted_properties() {
        let index = ClassIndex::new(vec![abc_class()]);
        let config = ScanConfig::default();
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let properties = resolver.get_all_fields(&Type::class("com.acme.Abc"), None);
        assert_eq!(names(&properties), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_declaration_order_when_unsorted() {
        let index = ClassIndex::new(vec![abc_class()]);
        let config = ScanConfig {
            sorted_properties_enable: false,
            ..ScanConfig::default()
        };
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let properties = resolver.get_all_fields(&Type::class("com.acme.Abc"), None);
        assert_eq!(names(&properties), vec!["c", "b", "a"]);
    }

    fn access_class() -> ClassInfo {
        let mut class = ClassInfo::new("com.acme.Access");
        class.fields.push(field("hidden", "int", Access::Private));
        class.fields.push(field("shown", "int", Access::Public));
        class.fields.push(field("guarded", "int", Access::Protected));
        class.fields.push(field("local", "int", Access::Package));
        class
    }

    #[test]
    fn test_private_properties_disabled() {
        let index = ClassIndex::new(vec![access_class()]);
        let config = ScanConfig {
            private_properties_enable: false,
            ..ScanConfig::default()
        };
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let properties = resolver.get_all_fields(&Type::class("com.acme.Access"), None);
        assert_eq!(properties.len(), 4);
        assert_eq!(names(&properties), vec!["shown"]);
    }

    #[test]
    fn test_private_properties_enabled() {
        let index = ClassIndex::new(vec![access_class()]);
        let config = ScanConfig::default();
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let properties = resolver.get_all_fields(&Type::class("com.acme.Access"), None);
        assert_eq!(names(&properties).len(), 4);
    }

    #[test]
    fn test_accessors_join_fields() {
        let mut class = ClassInfo::new("com.acme.Pet");
        class.fields.push(field("name", "java.lang.String", Access::Private));
        class.methods.push(method("getName", string(), vec![]));
        class.methods.push(method("setName", Type::Void, vec![string()]));
        class.methods.push(method("isAlive", Type::Primitive(Primitive::Boolean), vec![]));
        // Wrong type, never joins `name`
        class.methods.push(method("setName", Type::Void, vec![Type::class("java.lang.Long")]));
        class.methods.push(method("getClass", Type::class("java.lang.Class"), vec![]));
        let index = ClassIndex::new(vec![class]);
        let config = ScanConfig {
            sorted_properties_enable: false,
            ..ScanConfig::default()
        };
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let properties = resolver.get_all_fields(&Type::class("com.acme.Pet"), None);

        assert_eq!(names(&properties), vec!["name", "alive"]);
        let name = &properties["name"];
        assert!(name.field().is_some());
        assert_eq!(name.read_method().map(|t| t.name()), Some("getName"));
        assert_eq!(
            name.write_method().map(|t| t.value_type()),
            Some(string())
        );
        // The field outranks unannotated accessors
        assert!(name.target().is_field());
    }

    #[test]
    fn test_annotated_target_and_names() {
        let mut class = ClassInfo::new("com.acme.Pet");
        class.fields.push(field("name", "java.lang.String", Access::Private));
        let mut getter = method("getName", string(), vec![]);
        getter.annotations.push(
            Annotation::new(annotations::JACKSON_PROPERTY[0]).with("value", "pet_name"),
        );
        class.methods.push(getter);
        let mut id = field("id", "long", Access::Private);
        id.annotations
            .push(Annotation::new(annotations::SCHEMA[0]).with("name", "identifier"));
        class.fields.push(id);
        let index = ClassIndex::new(vec![class]);
        let config = ScanConfig::default();
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let properties = resolver.get_all_fields(&Type::class("com.acme.Pet"), None);

        assert!(properties["name"].target().is_method());
        assert_eq!(properties["name"].name(), "pet_name");
        assert_eq!(properties["id"].name(), "identifier");
    }

    #[test]
    fn test_naming_strategies() {
        let mut class = ClassInfo::new("com.acme.Pet");
        class.fields.push(field("firstName", "java.lang.String", Access::Public));
        let mut snake = ClassInfo::new("com.acme.Owner");
        snake.annotations.push(Annotation::new(annotations::JACKSON_NAMING[0]).with(
            "value",
            "com.fasterxml.jackson.databind.PropertyNamingStrategies$SnakeCaseStrategy",
        ));
        snake.fields.push(field("lastName", "java.lang.String", Access::Public));
        let index = ClassIndex::new(vec![class, snake]);
        let config = ScanConfig::default();
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::LowerCaseWithDashes);

        let pet = resolver.get_all_fields(&Type::class("com.acme.Pet"), None);
        let owner = resolver.get_all_fields(&Type::class("com.acme.Owner"), None);

        assert_eq!(names(&pet), vec!["first-name"]);
        assert_eq!(names(&owner), vec!["last_name"]);
    }

    #[test]
    fn test_generic_resolution_across_levels() {
        let mut base = ClassInfo::new("com.acme.Base");
        base.type_parameters = vec![TypeParameter::new("T")];
        base.fields.push(field("value", "T", Access::Public));
        base.fields.push(field("values", "java.util.List<T>", Access::Public));

        let mut middle = ClassInfo::new("com.acme.Middle");
        middle.type_parameters = vec![TypeParameter::new("U")];
        middle.super_type = Some(Type::parse("com.acme.Base<U>").unwrap());

        let mut leaf = ClassInfo::new("com.acme.Leaf");
        leaf.super_type = Some(Type::parse("com.acme.Middle<java.lang.Integer>").unwrap());

        let index = ClassIndex::new(vec![base, middle, leaf]);
        let config = ScanConfig::default();
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let properties = resolver.get_all_fields(&Type::class("com.acme.Leaf"), None);

        assert_eq!(
            properties["value"].resolve_type(),
            Type::class("java.lang.Integer")
        );
        assert_eq!(
            properties["values"].resolve_type().to_string(),
            "java.util.List<java.lang.Integer>"
        );
    }

    #[test]
    fn test_parent_first_ordering() {
        let mut base = ClassInfo::new("com.acme.Base");
        base.fields.push(field("z", "int", Access::Public));
        let mut leaf = ClassInfo::new("com.acme.Leaf");
        leaf.super_type = Some(Type::class("com.acme.Base"));
        leaf.fields.push(field("a", "int", Access::Public));
        let index = ClassIndex::new(vec![base, leaf]);
        let config = ScanConfig::default();
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let all = resolver.get_all_fields(&Type::class("com.acme.Leaf"), None);
        assert_eq!(names(&all), vec!["z", "a"]);

        let own = resolver.get_own_fields(&Type::class("com.acme.Leaf"), None);
        assert_eq!(names(&own), vec!["a"]);
    }

    #[test]
    fn test_explicit_and_creator_order() {
        let mut ordered = abc_class();
        ordered.name = "com.acme.Ordered".to_string();
        ordered.annotations.push(
            Annotation::new(annotations::JACKSON_PROPERTY_ORDER[0])
                .with("value", serde_json::json!(["b"])),
        );

        let mut record = ClassInfo::new("com.acme.Point");
        record.kind = ClassKind::Record;
        record.fields.push(field("y", "int", Access::Private));
        record.fields.push(field("x", "int", Access::Private));
        record.methods.push(method("y", Type::Primitive(Primitive::Int), vec![]));
        record.methods.push(method("x", Type::Primitive(Primitive::Int), vec![]));

        let index = ClassIndex::new(vec![ordered, record]);
        let config = ScanConfig::default();
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let properties = resolver.get_all_fields(&Type::class("com.acme.Ordered"), None);
        assert_eq!(names(&properties), vec!["b", "a", "c"]);

        let point = resolver.get_all_fields(&Type::class("com.acme.Point"), None);
        assert_eq!(names(&point), vec!["y", "x"]);
        assert!(point["x"].read_method().is_some());
    }

    #[test]
    fn test_ignored_accessor_makes_property_write_only() {
        let mut class = ClassInfo::new("com.acme.Account");
        let mut getter = method("getPassword", string(), vec![]);
        getter
            .annotations
            .push(Annotation::new(annotations::JACKSON_IGNORE[0]));
        class.methods.push(getter);
        class.methods.push(method("setPassword", Type::Void, vec![string()]));
        let mut token = method("getToken", string(), vec![]);
        token
            .annotations
            .push(Annotation::new(annotations::JACKSON_IGNORE[0]));
        class.methods.push(token);
        let index = ClassIndex::new(vec![class]);
        let config = ScanConfig::default();
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let properties = resolver.get_all_fields(&Type::class("com.acme.Account"), None);

        assert!(properties["password"].is_write_only());
        assert!(!properties["password"].is_ignored());
        // Only a getter, and it is ignored
        assert!(properties["token"].is_ignored());
    }

    #[test]
    fn test_unwrapped_fields() {
        let mut address = ClassInfo::new("com.acme.Address");
        address.fields.push(field("city", "java.lang.String", Access::Public));
        let mut person = ClassInfo::new("com.acme.Person");
        let mut home = field("home", "com.acme.Address", Access::Public);
        home.annotations.push(
            Annotation::new(annotations::JACKSON_UNWRAPPED[0])
                .with("prefix", "home_"),
        );
        person.fields.push(home);
        let index = ClassIndex::new(vec![address, person]);
        let config = ScanConfig::default();
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let properties = resolver.get_all_fields(&Type::class("com.acme.Person"), None);

        assert_eq!(names(&properties), vec!["home_city"]);
        assert!(properties["home"].is_ignored());
    }

    #[test]
    fn test_interface_annotations_win() {
        let mut contract = ClassInfo::new("com.acme.Named");
        contract.kind = ClassKind::Interface;
        let mut abstract_getter = method("getName", string(), vec![]);
        abstract_getter.annotations.push(
            Annotation::new(annotations::SCHEMA[0]).with("description", "The name"),
        );
        contract.methods.push(abstract_getter);

        let mut pet = ClassInfo::new("com.acme.Pet");
        pet.interfaces.push(Type::class("com.acme.Named"));
        pet.methods.push(method("getName", string(), vec![]));

        let index = ClassIndex::new(vec![contract, pet]);
        let config = ScanConfig::default();
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let properties = resolver.get_all_fields(&Type::class("com.acme.Pet"), None);
        let target = properties["name"].target();

        assert_eq!(target.declaring_class().name, "com.acme.Named");
        assert!(target.schema().is_some());
    }

    #[test]
    fn test_one_sided_interface_contract() {
        let mut contract = ClassInfo::new("com.acme.HasCode");
        contract.kind = ClassKind::Interface;
        contract.methods.push(method("getCode", string(), vec![]));

        let mut mutable = ClassInfo::new("com.acme.MutableCode");
        mutable.interfaces.push(Type::class("com.acme.HasCode"));
        mutable.methods.push(method("getCode", string(), vec![]));
        mutable.methods.push(method("setCode", Type::Void, vec![string()]));

        let index = ClassIndex::new(vec![contract, mutable]);
        let config = ScanConfig::default();
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let properties = resolver.get_all_fields(&Type::class("com.acme.HasCode"), None);
        assert!(properties["code"].is_ignored());

        let properties = resolver.get_all_fields(&Type::class("com.acme.MutableCode"), None);
        assert!(!properties["code"].is_ignored());
    }

    #[test]
    fn test_infer_unannotated_types_disabled() {
        let mut class = ClassInfo::new("com.acme.Pet");
        class.fields.push(field("plain", "int", Access::Public));
        let mut named = field("named", "int", Access::Public);
        named
            .annotations
            .push(Annotation::new(annotations::JSONB_PROPERTY[1]));
        class.fields.push(named);
        let index = ClassIndex::new(vec![class]);
        let config = ScanConfig {
            infer_unannotated_types: false,
            ..ScanConfig::default()
        };
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let properties = resolver.get_all_fields(&Type::class("com.acme.Pet"), None);
        assert_eq!(names(&properties), vec!["named"]);
    }

    #[test]
    fn test_inherited_parent() {
        let mut base = ClassInfo::new("com.acme.Base");
        base.type_parameters = vec![TypeParameter::new("T")];
        let mut leaf = ClassInfo::new("com.acme.Leaf");
        leaf.type_parameters = vec![TypeParameter::new("X")];
        leaf.super_type = Some(Type::parse("com.acme.Base<X>").unwrap());
        let mut composed = ClassInfo::new("com.acme.Composed");
        composed.super_type = Some(Type::parse("com.acme.Base<java.lang.String>").unwrap());
        composed.annotations.push(
            Annotation::new(annotations::SCHEMA[0]).with("allOf", "com.acme.Base"),
        );
        let index = ClassIndex::new(vec![base, leaf, composed]);
        let config = ScanConfig::default();
        let resolver = PropertyResolver::new(&index, &config, NamingStrategy::Identity);

        let leaf_type = Type::parse("com.acme.Leaf<java.lang.Long>").unwrap();
        let leaf_class = index.get("com.acme.Leaf").unwrap();
        assert_eq!(
            resolver.inherited_parent(leaf_class, &leaf_type).unwrap().to_string(),
            "com.acme.Base<java.lang.Long>"
        );

        let composed_class = index.get("com.acme.Composed").unwrap();
        assert!(resolver
            .inherited_parent(composed_class, &Type::class("com.acme.Composed"))
            .is_none());
    }

    #[test]
    fn test_property_names_of_methods() {
        let class = ClassInfo::new("com.acme.Pet");
        let getter = method("getURL", string(), vec![]);
        let bare = method("get", string(), vec![]);
        assert_eq!(property_name(&class, &getter).as_deref(), Some("uRL"));
        assert_eq!(property_name(&class, &bare), None);
        assert!(equal_types(
            &Type::Primitive(Primitive::Int),
            &Type::class("java.lang.Integer")
        ));
        assert!(!equal_types(&Type::Primitive(Primitive::Int), &Type::class("java.lang.Long")));
    }
}
