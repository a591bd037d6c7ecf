//! Schema Reference Registry.
//!
//! Maps [`TypeKey`]s to unique component names and owns the component schema
//! bodies of one scan. A key may be registered with a body, or only reserved
//! as a placeholder while its type is still being expanded; either way callers
//! receive a `$ref` node pointing at the component name.

use crate::annotations;
use crate::classifier;
use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::extension::ValueParser;
use crate::index::{known, local_name, ClassIndex, Type, OBJECT};
use crate::schema::{Schema, SchemaType};
use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};
use std::collections::BTreeSet;

/// Normalized identity of a type for deduplication.
///
/// Equality covers the type structure and the active view set; annotations are
/// never part of a [`Type`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub ty: Type,
    pub views: BTreeSet<String>,
}

impl TypeKey {
    pub fn new(ty: Type, views: &[String]) -> Self {
        Self {
            ty,
            views: views.iter().cloned().collect(),
        }
    }

    /// Structural name: local name followed by the names of the type arguments
    pub fn default_name(&self) -> String {
        let mut name = self.ty.local_name();

        match &self.ty {
            Type::Parameterized { arguments, .. } => append_argument_names(&mut name, arguments),
            Type::Wildcard { .. } => name = wildcard_name(&self.ty),
            Type::Array(_) => {
                name = format!("{}Array", self.ty.element().local_name());
            }
            _ => {}
        }

        name
    }

    /// `_<View>` for every active view
    pub fn view_suffix(&self) -> String {
        self.views
            .iter()
            .map(|view| format!("_{}", local_name(view)))
            .collect()
    }
}

fn append_argument_names(name: &mut String, arguments: &[Type]) {
    for argument in arguments {
        match argument {
            Type::Parameterized { arguments, .. } => {
                name.push_str(&argument.local_name());
                append_argument_names(name, arguments);
            }
            Type::Wildcard { .. } => name.push_str(&wildcard_name(argument)),
            other => name.push_str(&other.local_name()),
        }
    }
}

fn wildcard_name(wildcard: &Type) -> String {
    match wildcard {
        Type::Wildcard {
            super_bound: Some(bound),
            ..
        } => format!("Super{}", bound.local_name()),
        Type::Wildcard {
            extends: Some(bound),
            ..
        } if bound.name() != OBJECT => format!("Extends{}", bound.local_name()),
        other => other.local_name(),
    }
}

/// Hook for applications that register their own schemas before a scan
pub trait CustomSchemaRegistry {
    /// Name under which the configuration selects this registry
    fn name(&self) -> &str;

    fn register_schemas(&self, index: &ClassIndex, registry: &mut SchemaRegistry);
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    registered: bool,
}

/// Registry of generated component schemas for one scan
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    entries: IndexMap<TypeKey, Entry>,
    names: IndexSet<String>,
    definitions: IndexMap<String, Schema>,
    disabled: bool,
    array_references: bool,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    ///
    /// `reserved` lists component names already present in the document; they
    /// are never handed out.
    pub fn new(config: &ScanConfig, reserved: impl IntoIterator<Item = String>) -> Self {
        Self {
            entries: IndexMap::new(),
            names: reserved.into_iter().collect(),
            definitions: IndexMap::new(),
            disabled: !config.schema_references_enable,
            array_references: config.array_references_enable,
        }
    }

    /// Registers the schema overrides supplied by the configuration.
    ///
    /// Invalid signatures and unparsable schemas are logged and skipped.
    pub fn register_config_schemas(
        &mut self,
        index: &ClassIndex,
        config: &ScanConfig,
        parser: &dyn ValueParser,
    ) {
        for (signature, json) in &config.schemas {
            let ty = match Type::parse(signature) {
                Ok(ty) => ty,
                Err(e) => {
                    warn!("Configured schema type is invalid: {}", e);
                    continue;
                }
            };

            let Some(schema) = parser.parse_schema(json) else {
                warn!("Unable to parse configured schema for {}", signature);
                continue;
            };

            self.register_key(index, TypeKey::new(ty, &[]), schema, None);
            info!("Registered configured schema for {}", signature);
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Registers (or replaces) the full schema of a type and returns a reference to it
    pub fn register(
        &mut self,
        index: &ClassIndex,
        ty: &Type,
        views: &[String],
        schema: Schema,
    ) -> Schema {
        let key = TypeKey::new(ty.clone(), views);

        if self.entries.contains_key(&key) {
            // Replacement registration
            self.remove(&key);
        }

        self.register_key(index, key, schema, None)
    }

    /// Registers under an explicit name when it is free
    pub fn register_named(
        &mut self,
        index: &ClassIndex,
        ty: &Type,
        views: &[String],
        schema: Schema,
        name: &str,
    ) -> Schema {
        let key = TypeKey::new(ty.clone(), views);
        if self.entries.contains_key(&key) {
            self.remove(&key);
        }
        self.register_key(index, key, schema, Some(name))
    }

    /// Registers the full schema if the type is eligible.
    ///
    /// Returns the existing reference when the type already has an entry, a new
    /// reference when the schema was registered, and the schema itself otherwise.
    pub fn check_registration(
        &mut self,
        index: &ClassIndex,
        ty: &Type,
        views: &[String],
        schema: Schema,
    ) -> Schema {
        match self.eligible_key(index, ty, views, &schema) {
            Eligibility::Existing(reference) => reference,
            Eligibility::Eligible(key) => self.register_key(index, key, schema, None),
            Eligibility::Ineligible => schema,
        }
    }

    /// Reserves a name for the type if eligible, without storing a body.
    ///
    /// Same return contract as [`check_registration`](Self::check_registration).
    pub fn register_reference(
        &mut self,
        index: &ClassIndex,
        ty: &Type,
        views: &[String],
        schema: Schema,
    ) -> Schema {
        match self.eligible_key(index, ty, views, &schema) {
            Eligibility::Existing(reference) => reference,
            Eligibility::Eligible(key) => self.register_placeholder(index, key),
            Eligibility::Ineligible => schema,
        }
    }

    fn eligible_key(
        &self,
        index: &ClassIndex,
        ty: &Type,
        views: &[String],
        schema: &Schema,
    ) -> Eligibility {
        if !matches!(
            ty,
            Type::Class(_)
                | Type::Parameterized { .. }
                | Type::TypeVariable { .. }
                | Type::Wildcard { .. }
        ) {
            return Eligibility::Ineligible;
        }

        if self.disabled {
            return Eligibility::Ineligible;
        }

        let key = TypeKey::new(ty.clone(), views);

        if let Some(entry) = self.entries.get(&key) {
            return Eligibility::Existing(Schema::reference(&entry.name));
        }

        if !self.is_registration_supported(index, ty, schema) || !index.contains(ty) {
            return Eligibility::Ineligible;
        }

        Eligibility::Eligible(key)
    }

    /// Whether the type may be registered given the schema generated for it
    pub fn is_registration_supported(&self, index: &ClassIndex, ty: &Type, schema: &Schema) -> bool {
        if !allow_registration(index, ty) {
            return false;
        }
        if !self.array_references {
            return !schema.is_type(SchemaType::Array);
        }
        true
    }

    pub fn has_ref(&self, ty: &Type, views: &[String]) -> bool {
        self.entries.contains_key(&TypeKey::new(ty.clone(), views))
    }

    /// Whether a full schema (not just a placeholder) is registered
    pub fn has_schema(&self, ty: &Type, views: &[String]) -> bool {
        if self.disabled {
            return false;
        }
        self.entries
            .get(&TypeKey::new(ty.clone(), views))
            .map_or(false, |e| e.registered)
    }

    pub fn lookup_ref(&self, ty: &Type, views: &[String]) -> Result<Schema> {
        self.try_lookup_ref(ty, views)
            .ok_or_else(|| Error::NotRegistered(ty.to_string()))
    }

    pub fn try_lookup_ref(&self, ty: &Type, views: &[String]) -> Option<Schema> {
        self.entries
            .get(&TypeKey::new(ty.clone(), views))
            .map(|e| Schema::reference(&e.name))
    }

    /// The registered body; `None` inside `Ok` for a placeholder
    pub fn lookup_schema(&self, ty: &Type, views: &[String]) -> Result<Option<&Schema>> {
        let entry = self
            .entries
            .get(&TypeKey::new(ty.clone(), views))
            .ok_or_else(|| Error::NotRegistered(ty.to_string()))?;

        Ok(if entry.registered {
            self.definitions.get(&entry.name)
        } else {
            None
        })
    }

    /// Component name assigned to the type, if any
    pub fn name_of(&self, ty: &Type, views: &[String]) -> Option<&str> {
        self.entries
            .get(&TypeKey::new(ty.clone(), views))
            .map(|e| e.name.as_str())
    }

    pub fn definitions(&self) -> &IndexMap<String, Schema> {
        &self.definitions
    }

    /// Mutable access to a registered body, used while its type is expanded
    pub fn definition_mut(&mut self, name: &str) -> Option<&mut Schema> {
        self.definitions.get_mut(name)
    }

    pub fn into_definitions(self) -> IndexMap<String, Schema> {
        self.definitions
    }

    fn register_placeholder(&mut self, index: &ClassIndex, key: TypeKey) -> Schema {
        let name = self.derive_name(index, &key, None);
        debug!("Reserved schema name {} for {}", name, key.ty);

        self.names.insert(name.clone());
        self.entries.insert(
            key,
            Entry {
                name: name.clone(),
                registered: false,
            },
        );

        Schema::reference(&name)
    }

    fn register_key(
        &mut self,
        index: &ClassIndex,
        key: TypeKey,
        schema: Schema,
        explicit_name: Option<&str>,
    ) -> Schema {
        let name = self.derive_name(index, &key, explicit_name);
        debug!("Registered schema {} for {}", name, key.ty);

        self.names.insert(name.clone());
        self.entries.insert(
            key,
            Entry {
                name: name.clone(),
                registered: true,
            },
        );
        self.definitions.insert(name.clone(), schema);

        Schema::reference(&name)
    }

    fn remove(&mut self, key: &TypeKey) {
        if let Some(entry) = self.entries.shift_remove(key) {
            self.names.shift_remove(&entry.name);
        }
    }

    /// Explicit name, else the class-level `@Schema(name)`, else the default name,
    /// then the view suffix; collisions append 1, 2, ...
    fn derive_name(&self, index: &ClassIndex, key: &TypeKey, explicit_name: Option<&str>) -> String {
        let annotated_name = || {
            index
                .class_of(&key.ty)
                .and_then(|class| class.annotation(annotations::SCHEMA))
                .and_then(|schema| schema.string("name"))
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        };

        let base = explicit_name
            .map(str::to_string)
            .or_else(annotated_name)
            .unwrap_or_else(|| key.default_name());

        let mut name = format!("{}{}", base, key.view_suffix());
        let mut suffix = 1;
        while self.names.contains(&name) {
            name = format!("{}{}", base, suffix);
            suffix += 1;
        }

        name
    }
}

enum Eligibility {
    Existing(Schema),
    Eligible(TypeKey),
    Ineligible,
}

/// Object and array shapes must be indexed, non-opaque, non-JDK types; scalar
/// shapes need something beyond type and format to be worth a component.
pub fn allow_registration(index: &ClassIndex, ty: &Type) -> bool {
    let format = classifier::classify(ty);

    if format.is_structured() {
        return !format.opaque && !known::is_jdk_type(&ty.name()) && index.contains(ty);
    }

    format.attribute_count() > 2
}
