//! Data Object Graph Walker.
//!
//! Expands a root type into a schema tree, depth first, using an explicit work
//! stack instead of recursion. The registry is the arena: a work item never
//! holds a schema, only the location of the node it fills, which is either a
//! path below the root node or below a registered component body. Types that
//! may be registered are reserved in the registry before they are expanded, so
//! self-referencing and mutually referencing classes resolve to `$ref`
//! pointers.
//!
//! Per work item:
//!
//! 1. A type with a registered body is rewritten to its reference and dropped.
//! 2. The class-level `@Schema` is read over the current body (enums become
//!    string schemas); an untyped body defaults to `object`.
//! 3. Eligible types are registered and the body moves into the registry.
//! 4. Object bodies are composed with their parent (auto-inheritance) and every
//!    non-ignored property is processed; nested types that need expanding are
//!    pushed as new work items.

use crate::annotations::{self, Target};
use crate::classifier;
use crate::config::AutoInheritance;
use crate::constraints;
use crate::context::ScanContext;
use crate::error::{Error, Result};
use crate::index::known::{self, Container};
use crate::index::{ClassIndex, Type, OBJECT};
use crate::property_resolver::{resolve_wildcard, Property, PropertyResolver};
use crate::schema::{AdditionalProperties, PathStep, Schema, SchemaType};
use crate::schema_reader::{self, enum_to_schema, read_schema, schema_registration};
use log::{debug, info, warn};

/// Expands `ty` into a schema.
///
/// Returns a reference when the type ended up registered, the inline schema
/// otherwise. Several calls may share one context; they then share component
/// schemas.
pub fn process(ctx: &mut ScanContext, ty: &Type) -> Result<Schema> {
    ctx.scan_stack.push(ty.clone());
    let result = SchemaGenerator::new(ctx, ty).scan_root();
    ctx.scan_stack.pop();
    result
}

/// The placed schema a [`Location`] starts from
#[derive(Debug, Clone, PartialEq)]
enum Base {
    Root,
    Component(String),
}

/// Address of a node inside the root schema or a component body
#[derive(Debug, Clone, PartialEq)]
struct Location {
    base: Base,
    path: Vec<PathStep>,
}

impl Location {
    fn root() -> Self {
        Self {
            base: Base::Root,
            path: Vec::new(),
        }
    }

    fn component(name: &str) -> Self {
        Self {
            base: Base::Component(name.to_string()),
            path: Vec::new(),
        }
    }

    fn join(&self, steps: impl IntoIterator<Item = PathStep>) -> Self {
        let mut path = self.path.clone();
        path.extend(steps);
        Self {
            base: self.base.clone(),
            path,
        }
    }
}

#[derive(Debug)]
enum Placement {
    /// The node already sits in its parent
    Inline(Location),
    /// A reserved registry entry; the seed becomes its body
    Detached(Schema),
}

/// One pending unit of work
#[derive(Debug)]
struct WorkItem<'a> {
    ty: Type,
    placement: Placement,
    /// The member through which the type was reached
    reference: Option<Target<'a>>,
    /// Types of the enclosing items, outermost first
    ancestry: Vec<Type>,
}

/// A nested type left to expand, relative to the schema it was found in
#[derive(Debug, Clone, PartialEq)]
struct Pending {
    ty: Type,
    path: Vec<PathStep>,
}

/// Result of processing a declared type
#[derive(Debug)]
struct TypeOutcome {
    schema: Schema,
    /// The type the schema describes (`List<Pet>` describes `Pet[]`)
    ty: Type,
    pending: Vec<Pending>,
}

impl TypeOutcome {
    fn leaf(ty: Type) -> Self {
        Self {
            schema: classifier::type_schema(&ty),
            ty,
            pending: Vec::new(),
        }
    }
}

/// Walks the data object graph of one root type
pub struct SchemaGenerator<'c, 'a> {
    ctx: &'c mut ScanContext<'a>,
    resolver: PropertyResolver<'a>,
    root_type: Type,
    root: Schema,
    stack: Vec<WorkItem<'a>>,
}

impl<'c, 'a> SchemaGenerator<'c, 'a> {
    pub fn new(ctx: &'c mut ScanContext<'a>, root_type: &Type) -> Self {
        let resolver = PropertyResolver::new(ctx.index, ctx.config, ctx.naming);
        Self {
            ctx,
            resolver,
            root_type: root_type.clone(),
            root: Schema::new(),
            stack: Vec::new(),
        }
    }

    /// Generates the schema of the root type
    pub fn scan_root(mut self) -> Result<Schema> {
        let ty = resolve(None, &self.root_type);
        let index = self.ctx.index;
        let views = self.ctx.views();
        info!("Scanning schema of {}", ty);

        if classifier::is_terminal(&ty) {
            return Ok(classifier::type_schema(&ty));
        }

        if index.contains(&ty) && index.is_enum(&ty) {
            let schema = enum_to_schema(self.ctx, &ty)?;
            return Ok(schema_registration(self.ctx, &ty, schema));
        }

        if !ty.is_array() {
            if let Some(container) = container_of(index, &ty) {
                return self.scan_container(&ty, container);
            }
        }

        let outcome = self.process_type(&ty, None, &[])?;
        self.root = outcome.schema;
        for pending in outcome.pending {
            let location = Location::root().join(pending.path);
            self.push_inline(pending.ty, location, None, &[])?;
        }
        self.run()?;

        if self.ctx.registry.has_schema(&ty, views) {
            return self.ctx.registry.lookup_ref(&ty, views);
        }
        Ok(self.root)
    }

    /// Containers are scanned through their stand-in carrier: the carrier's
    /// single property, bound to the container's arguments, is the schema
    fn scan_container(mut self, ty: &Type, container: Container) -> Result<Schema> {
        let index = self.ctx.index;
        let Some(standin) = index.get(container.standin()) else {
            warn!("Stand-in {} is missing from the index", container.standin());
            return Ok(classifier::type_schema(ty));
        };

        let ancestor = index
            .resolve_parameterized_ancestor(ty, container.interface())
            .unwrap_or_else(|| ty.raw());
        let leaf = if ancestor.arguments().is_empty() {
            Type::class(standin.name.clone())
        } else {
            Type::parameterized(standin.name.clone(), ancestor.arguments().to_vec())
        };
        debug!("Scanning container {} as {}", ty, leaf);

        let properties = self.resolver.fields_of(standin, &leaf, None, false);
        let Some(property) = properties.values().next() else {
            return Ok(classifier::type_schema(ty));
        };

        self.root = Schema::of_type(SchemaType::Object);
        self.process_field(&Location::root(), property, &[])?;
        self.run()?;

        let mut schema = self
            .root
            .properties
            .take()
            .and_then(|properties| properties.into_values().next())
            .unwrap_or_default();
        if index.is_a(ty, known::SET) && schema.is_type(SchemaType::Array) {
            schema.unique_items = Some(true);
        }
        Ok(schema)
    }

    fn run(&mut self) -> Result<()> {
        while let Some(item) = self.stack.pop() {
            self.expand(item)?;
        }
        Ok(())
    }

    fn expand(&mut self, item: WorkItem<'a>) -> Result<()> {
        let WorkItem {
            ty,
            placement,
            reference,
            mut ancestry,
        } = item;
        let index = self.ctx.index;
        let views = self.ctx.views();

        if self.ctx.registry.has_schema(&ty, views) {
            debug!("{} is already registered", ty);
            if let Placement::Inline(location) = &placement {
                let reference = self.ctx.registry.lookup_ref(&ty, views)?;
                *self.node_mut(location)? = reference;
            }
            return Ok(());
        }

        debug!("Expanding {}", ty);
        let (inline, current) = match placement {
            Placement::Inline(location) => {
                let current = std::mem::take(self.node_mut(&location)?);
                (Some(location), current)
            }
            Placement::Detached(seed) => (None, seed),
        };

        let mut schema = self.read_klass(&ty, current)?;

        if schema.is_ref() {
            let schema = schema.into_reference();
            match &inline {
                Some(location) => *self.node_mut(location)? = schema,
                None => {
                    self.ctx.registry.register(index, &ty, views, schema);
                }
            }
            return Ok(());
        }

        if schema.schema_type.is_none() {
            schema.schema_type = Some(SchemaType::Object);
        }

        let location = match inline {
            Some(location) if !self.is_registrable(&ty, &schema) => {
                *self.node_mut(&location)? = schema;
                location
            }
            inline => {
                let reference = self.ctx.registry.register(index, &ty, views, schema);
                let name = reference.ref_name().unwrap_or_default().to_string();
                if let Some(location) = inline {
                    *self.node_mut(&location)? = reference;
                }
                Location::component(&name)
            }
        };

        if !self.node_mut(&location)?.is_type(SchemaType::Object) {
            return Ok(());
        }

        let Some(class) = index.class_of(&ty) else {
            debug!("Type {} is not in the index", ty);
            return Ok(());
        };

        ancestry.push(ty.clone());
        let mut fields_location = location.clone();
        let mut own_only = false;
        let mode = self.ctx.config.auto_inheritance;

        if mode != AutoInheritance::None {
            let parent = self.resolver.inherited_parent(class, &ty);
            let parent_ref = match parent {
                Some(parent) => self.parent_reference(&parent, reference, &ancestry),
                None => None,
            };

            if let Some(parent_ref) = parent_ref {
                let node = self.node_mut(&location)?;
                match mode {
                    AutoInheritance::ParentOnly => {
                        node.add_all_of(parent_ref);
                        own_only = true;
                    }
                    AutoInheritance::Both => {
                        let inner = std::mem::take(node);
                        *node = Schema {
                            all_of: Some(vec![parent_ref, inner]),
                            ..Schema::default()
                        };
                        fields_location = location.join([PathStep::AllOf(1)]);
                    }
                    AutoInheritance::None => {}
                }
            }
        }

        let properties = if own_only {
            self.resolver.get_own_fields(&ty, reference)
        } else {
            self.resolver.get_all_fields(&ty, reference)
        };

        for property in properties.values().filter(|p| !p.is_ignored()) {
            self.process_field(&fields_location, property, &ancestry)?;
        }

        Ok(())
    }

    /// Reads the class-level shape of a type over its current body
    fn read_klass(&mut self, ty: &Type, schema: Schema) -> Result<Schema> {
        let index = self.ctx.index;
        let Some(class) = index.class_of(ty) else {
            return Ok(schema);
        };

        if class.is_enum() {
            return enum_to_schema(self.ctx, ty);
        }

        let Some(annotation) = class.annotation(annotations::SCHEMA) else {
            return Ok(schema);
        };

        self.ctx.scan_stack.push(ty.clone());
        let read = read_schema(self.ctx, annotation, schema.clone());
        self.ctx.scan_stack.pop();

        Ok(read?.unwrap_or(schema))
    }

    fn is_registrable(&self, ty: &Type, schema: &Schema) -> bool {
        let registry = &self.ctx.registry;
        !registry.is_disabled() && registry.is_registration_supported(self.ctx.index, ty, schema)
    }

    /// Reserves the parent of an auto-inheriting class, queueing its
    /// expansion when the reservation is new
    fn parent_reference(
        &mut self,
        parent: &Type,
        reference: Option<Target<'a>>,
        ancestry: &[Type],
    ) -> Option<Schema> {
        let index = self.ctx.index;
        let views = self.ctx.views();
        let seed = classifier::type_schema(parent);

        let existing = self.ctx.registry.has_ref(parent, views);
        let parent_ref = self
            .ctx
            .registry
            .register_reference(index, parent, views, seed.clone());

        if !parent_ref.is_ref() {
            debug!("Parent {} cannot be referenced, flattening its properties", parent);
            return None;
        }

        if !existing {
            self.stack.push(WorkItem {
                ty: parent.clone(),
                placement: Placement::Detached(seed),
                reference,
                ancestry: ancestry.to_vec(),
            });
        }
        Some(parent_ref)
    }

    /// Builds the schema of one property and adds it to the parent node
    fn process_field(
        &mut self,
        parent: &Location,
        property: &Property<'a>,
        ancestry: &[Type],
    ) -> Result<()> {
        let name = property.name();
        let target = property.target();
        let annotation = target.schema();

        if annotation.map_or(false, schema_reader::is_hidden) {
            return Ok(());
        }

        let index = self.ctx.index;
        let views = self.ctx.views();
        let declared = resolve(Some(property), property.unresolved_type());
        let optional = declared.name() == known::OPTIONAL;
        let implementation = annotation.and_then(|a| a.class_value("implementation"));
        debug!("Processing property {} of type {}", name, declared);

        let mut required = Vec::new();
        if annotation.and_then(|a| a.bool("required")) == Some(true) {
            required.push(name.clone());
        }

        let explicit_ref = annotation.map_or(false, |a| a.string("ref").is_some());
        let outcome = match implementation {
            Some(_) => None,
            None if explicit_ref => None,
            None => Some(self.process_type(&declared, Some(property), ancestry)?),
        };

        let mut registration = None;
        let mut inline_pending = Vec::new();

        if let Some(outcome) = &outcome {
            let registration_type = if optional {
                outcome.ty.clone()
            } else {
                declared.clone()
            };
            let existing = self.ctx.registry.has_ref(&registration_type, views);
            let registered = if outcome.schema.is_type(SchemaType::Array) {
                self.ctx.registry.check_registration(
                    index,
                    &registration_type,
                    views,
                    outcome.schema.clone(),
                )
            } else {
                self.ctx.registry.register_reference(
                    index,
                    &registration_type,
                    views,
                    outcome.schema.clone(),
                )
            };

            if !registered.is_ref() {
                inline_pending = outcome.pending.clone();
            } else if !existing {
                self.fill_reservation(&registration_type, &registered, outcome, target, ancestry)?;
                registration = Some(registered);
            } else {
                registration = Some(registered);
            }
        }

        let type_schema = outcome.map(|o| o.schema);

        let mut field_schema = match annotation {
            Some(annotation) => {
                let defaults = match (&type_schema, &implementation) {
                    (Some(type_schema), _) => type_attributes(type_schema),
                    (None, Some(_)) if is_array_annotation(annotation) => Schema::new(),
                    (None, Some(implementation)) => classifier::type_schema(implementation),
                    (None, None) => Schema::new(),
                };
                match read_schema(self.ctx, annotation, defaults)? {
                    Some(schema) => schema,
                    None => return Ok(()),
                }
            }
            None => type_schema.clone().unwrap_or_default(),
        };

        for constraint_target in property.constraint_targets() {
            constraints::apply_bean_validation(
                constraint_target,
                &mut field_schema,
                &name,
                &mut |target: &Target, property: &str| {
                    let explicit = target.schema().and_then(|s| s.bool("required"));
                    if explicit.is_none() {
                        required.push(property.to_string());
                    }
                },
            );
            constraints::apply_json_binding(constraint_target, &mut field_schema);
        }
        constraints::apply_access(property, &mut field_schema);
        if optional {
            constraints::mark_nullable(&mut field_schema);
        }

        let property_schema = match (registration, type_schema) {
            _ if field_schema.is_ref() => field_schema.into_reference(),
            (Some(reference), Some(type_schema)) => {
                if field_schema.overrides(&type_schema) {
                    field_schema.clear_matching_defaults(&type_schema);
                    Schema {
                        all_of: Some(vec![reference, field_schema]),
                        ..Schema::default()
                    }
                } else {
                    reference
                }
            }
            (None, Some(mut type_schema)) if annotation.is_some() => {
                type_schema.merge_from(field_schema);
                type_schema
            }
            _ => field_schema,
        };

        let node = self.node_mut(parent)?;
        node.add_property(name.clone(), property_schema);
        for name in &required {
            node.add_required(name);
        }

        let property_location = parent.join([PathStep::Property(name)]);
        for pending in inline_pending {
            let location = property_location.join(pending.path);
            self.push_inline(pending.ty, location, Some(target), ancestry)?;
        }

        Ok(())
    }

    /// Gives a freshly reserved registry entry its content: either a queued
    /// expansion of the whole type, or the processed body right away with its
    /// nested types expanded in place
    fn fill_reservation(
        &mut self,
        ty: &Type,
        reference: &Schema,
        outcome: &TypeOutcome,
        target: Target<'a>,
        ancestry: &[Type],
    ) -> Result<()> {
        let index = self.ctx.index;
        let views = self.ctx.views();
        let whole = outcome.pending.iter().any(|p| p.path.is_empty());

        if whole && !self.ctx.registry.has_schema(ty, views) {
            self.stack.push(WorkItem {
                ty: ty.clone(),
                placement: Placement::Detached(outcome.schema.clone()),
                reference: Some(target),
                ancestry: ancestry.to_vec(),
            });
            return Ok(());
        }

        if !self.ctx.registry.has_schema(ty, views) {
            self.ctx
                .registry
                .register(index, ty, views, outcome.schema.clone());
        }

        let Some(name) = reference.ref_name() else {
            return Ok(());
        };
        let component = Location::component(name);
        for pending in outcome.pending.iter().filter(|p| !p.path.is_empty()) {
            let location = component.join(pending.path.iter().cloned());
            self.push_inline(pending.ty.clone(), location, Some(target), ancestry)?;
        }
        Ok(())
    }

    /// Maps a declared type to its schema, collecting nested types that still
    /// need expanding
    fn process_type(
        &mut self,
        ty: &Type,
        property: Option<&Property<'a>>,
        ancestry: &[Type],
    ) -> Result<TypeOutcome> {
        let ty = resolve(property, ty);
        let index = self.ctx.index;
        let mut pending = Vec::new();

        if classifier::is_terminal(&ty) {
            return Ok(TypeOutcome::leaf(ty));
        }

        if ty.is_array() {
            let mut element = &ty;
            let mut dimensions = 0;
            while let Type::Array(component) = element {
                if classifier::is_terminal(element) {
                    break;
                }
                element = component.as_ref();
                dimensions += 1;
            }
            let element = element.clone();

            let path = vec![PathStep::Items; dimensions];
            let mut items = self.slot(&element, path, property, ancestry, &mut pending)?;
            for _ in 1..dimensions {
                items = array_of(items);
            }
            return Ok(TypeOutcome {
                schema: array_of(items),
                ty: Type::array_of(element),
                pending,
            });
        }

        if ty.name() == known::OPTIONAL {
            let inner = ty.arguments().first().cloned().unwrap_or_else(Type::object);
            return self.process_type(&inner, property, ancestry);
        }

        if index.contains(&ty) && index.is_enum(&ty) {
            let schema = enum_to_schema(self.ctx, &ty)?;
            return Ok(TypeOutcome {
                schema,
                ty: Type::class(known::STRING),
                pending,
            });
        }

        match container_of(index, &ty) {
            Some(Container::Map) => {
                let mut schema = Schema::of_type(SchemaType::Object);
                let value = index
                    .resolve_parameterized_ancestor(&ty, known::MAP)
                    .and_then(|map| map.arguments().get(1).cloned())
                    .filter(|value| !matches!(value, Type::TypeVariable { .. }));

                if let Some(value) = value {
                    let path = vec![PathStep::AdditionalProperties];
                    let values = self.slot(&value, path, property, ancestry, &mut pending)?;
                    schema.additional_properties = Some(AdditionalProperties::Schema(Box::new(values)));
                }
                return Ok(TypeOutcome { schema, ty, pending });
            }
            Some(container) => {
                let element = index
                    .resolve_parameterized_ancestor(&ty, container.interface())
                    .and_then(|ancestor| ancestor.arguments().first().cloned())
                    .filter(|element| !matches!(element, Type::TypeVariable { .. }))
                    .unwrap_or_else(Type::object);

                let path = vec![PathStep::Items];
                let items = self.slot(&element, path, property, ancestry, &mut pending)?;
                let mut schema = array_of(items);
                if index.is_a(&ty, known::SET) {
                    schema.unique_items = Some(true);
                }
                return Ok(TypeOutcome {
                    schema,
                    ty: Type::array_of(element),
                    pending,
                });
            }
            None => {}
        }

        if index.contains(&ty) && classifier::classify(&ty).is_structured() {
            pending.push(Pending {
                ty: ty.clone(),
                path: Vec::new(),
            });
            return Ok(TypeOutcome {
                schema: classifier::type_schema(&ty),
                ty,
                pending,
            });
        }

        if ty.name() != OBJECT {
            debug!("Type {} is not in the index", ty);
        }
        Ok(TypeOutcome::leaf(ty))
    }

    /// Schema of a type nested in a container or array.
    ///
    /// Registrable classes are reserved right away and answered with a
    /// reference; others are left pending at `path`.
    fn slot(
        &mut self,
        ty: &Type,
        path: Vec<PathStep>,
        property: Option<&Property<'a>>,
        ancestry: &[Type],
        pending: &mut Vec<Pending>,
    ) -> Result<Schema> {
        let ty = resolve(property, ty);
        let index = self.ctx.index;
        let views = self.ctx.views();

        if classifier::is_terminal(&ty) {
            return Ok(classifier::type_schema(&ty));
        }

        if index.contains(&ty) && index.is_enum(&ty) {
            let schema = enum_to_schema(self.ctx, &ty)?;
            return Ok(self.ctx.registry.check_registration(index, &ty, views, schema));
        }

        if is_expandable(index, &ty) {
            let seed = classifier::type_schema(&ty);
            let existing = self.ctx.registry.has_ref(&ty, views);
            let reference = self
                .ctx
                .registry
                .register_reference(index, &ty, views, seed.clone());

            if !reference.is_ref() {
                pending.push(Pending { ty, path });
                return Ok(seed);
            }
            if !existing {
                self.stack.push(WorkItem {
                    ty,
                    placement: Placement::Detached(seed),
                    reference: property.map(Property::target),
                    ancestry: ancestry.to_vec(),
                });
            }
            return Ok(reference);
        }

        let outcome = self.process_type(&ty, property, ancestry)?;
        pending.extend(outcome.pending.into_iter().map(|p| Pending {
            ty: p.ty,
            path: path.iter().cloned().chain(p.path).collect(),
        }));
        Ok(outcome.schema)
    }

    /// Queues an inline expansion unless the type already encloses the node
    fn push_inline(
        &mut self,
        ty: Type,
        location: Location,
        reference: Option<Target<'a>>,
        ancestry: &[Type],
    ) -> Result<()> {
        if ancestry.iter().any(|a| same_type(a, &ty)) {
            debug!("Cyclic reference to {}", ty);
            let node = self.node_mut(&location)?;
            if node.description.is_none() {
                node.description = Some(format!("Cyclic reference to {}", ty.name()));
            }
            return Ok(());
        }

        self.stack.push(WorkItem {
            ty,
            placement: Placement::Inline(location),
            reference,
            ancestry: ancestry.to_vec(),
        });
        Ok(())
    }

    fn node_mut(&mut self, location: &Location) -> Result<&mut Schema> {
        let Self {
            ctx,
            root,
            root_type,
            ..
        } = self;

        let base = match &location.base {
            Base::Root => Some(root),
            Base::Component(name) => ctx.registry.definition_mut(name),
        };

        match base.and_then(|schema| schema.at_mut(&location.path)) {
            Some(node) => Ok(node),
            None => Err(Error::Fatal {
                root: root_type.to_string(),
                message: format!("no schema node at {:?}", location),
            }),
        }
    }
}

/// Resolves generics against the property's hierarchy; unbound variables
/// become their first bound, wildcards their upper bound
fn resolve(property: Option<&Property>, ty: &Type) -> Type {
    let resolved = match property {
        Some(property) => property.resolve(ty),
        None => resolve_wildcard(ty),
    };
    match resolved {
        Type::TypeVariable { bounds, .. } => bounds.into_iter().next().unwrap_or_else(Type::object),
        wildcard @ Type::Wildcard { .. } => resolve_wildcard(&wildcard),
        other => other,
    }
}

fn container_of(index: &ClassIndex, ty: &Type) -> Option<Container> {
    Container::ALL
        .into_iter()
        .find(|container| index.is_a(ty, container.interface()))
}

/// Indexed object types expanded through their properties
fn is_expandable(index: &ClassIndex, ty: &Type) -> bool {
    index.contains(ty)
        && ty.name() != known::OPTIONAL
        && classifier::classify(ty).is_structured()
        && container_of(index, ty).is_none()
}

/// Same class, and the same arguments when both sides carry them
fn same_type(a: &Type, b: &Type) -> bool {
    if a.name() != b.name() {
        return false;
    }
    !(a.is_parameterized() && b.is_parameterized()) || a.arguments() == b.arguments()
}

fn array_of(items: Schema) -> Schema {
    Schema {
        items: Some(Box::new(items)),
        ..Schema::of_type(SchemaType::Array)
    }
}

/// The type-derived attributes a member annotation is read over
fn type_attributes(schema: &Schema) -> Schema {
    Schema {
        schema_type: schema.schema_type,
        format: schema.format.clone(),
        pattern: schema.pattern.clone(),
        example: schema.example.clone(),
        ..Schema::default()
    }
}

fn is_array_annotation(annotation: &crate::index::Annotation) -> bool {
    annotation.string("type").and_then(SchemaType::parse) == Some(SchemaType::Array)
}
