//! Ignore/visibility rules of the serialization libraries.
//!
//! Each handler inspects one member and either decides its visibility or
//! leaves it [`Visibility::Unset`] for the next handler.

use crate::annotations::{self, Target};
use crate::index::{ClassIndex, ClassInfo};
use log::debug;

/// Outcome of a visibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Exposed,
    Ignored,
    Unset,
}

/// How JAXB maps members of a class with `@XmlAccessorType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessType {
    Field,
    Property,
    PublicMember,
    None,
}

impl AccessType {
    fn parse(value: &str) -> Option<Self> {
        let constant = value.rsplit('.').next().unwrap_or(value);
        match constant {
            "FIELD" => Some(AccessType::Field),
            "PROPERTY" => Some(AccessType::Property),
            "PUBLIC_MEMBER" => Some(AccessType::PublicMember),
            "NONE" => Some(AccessType::None),
            _ => None,
        }
    }
}

type Handler<'a> = fn(&IgnoreResolver<'a>, &Target, &str, Option<&Target>) -> Visibility;

/// Decides whether members are ignored
pub struct IgnoreResolver<'a> {
    index: &'a ClassIndex,
    views: &'a [String],
}

impl<'a> IgnoreResolver<'a> {
    pub fn new(index: &'a ClassIndex, views: &'a [String]) -> Self {
        Self { index, views }
    }

    /// Runs the handlers in order; the first decision wins.
    ///
    /// `property` is the bean name of the member and `reference` the member
    /// through which the declaring class was reached, if any.
    pub fn is_ignore(&self, target: &Target, property: &str, reference: Option<&Target>) -> Visibility {
        let handlers: [Handler<'a>; 9] = [
            Self::schema_hidden,
            Self::jsonb_transient,
            Self::json_ignore_properties,
            Self::json_ignore,
            Self::json_ignore_type,
            Self::transient_field,
            Self::xml_transient,
            Self::json_view,
            Self::xml_accessor_type,
        ];

        for handler in handlers {
            let visibility = handler(self, target, property, reference);
            if visibility != Visibility::Unset {
                debug!("{} of {} is {:?}", property, target.declaring_class().name, visibility);
                return visibility;
            }
        }
        Visibility::Unset
    }

    /// A class lower in the hierarchy may ignore a property of its ancestors
    pub fn descendant_visibility(&self, property: &str, descendants: &[&ClassInfo]) -> Visibility {
        for descendant in descendants {
            if let Some(ignored) = descendant.annotation(annotations::JACKSON_IGNORE_PROPERTIES) {
                if lists(ignored.strings("value"), property) {
                    return Visibility::Ignored;
                }
            }
        }
        Visibility::Unset
    }

    fn schema_hidden(&self, target: &Target, _: &str, _: Option<&Target>) -> Visibility {
        match target.schema().and_then(|s| s.bool("hidden")) {
            Some(true) => Visibility::Ignored,
            _ => Visibility::Unset,
        }
    }

    fn jsonb_transient(&self, target: &Target, _: &str, _: Option<&Target>) -> Visibility {
        if target.has_annotation(annotations::JSONB_TRANSIENT) {
            Visibility::Ignored
        } else {
            Visibility::Unset
        }
    }

    fn json_ignore_properties(
        &self,
        target: &Target,
        property: &str,
        reference: Option<&Target>,
    ) -> Visibility {
        let declaring = target.declaring_class();

        let class_level = declaring
            .annotation(annotations::JACKSON_IGNORE_PROPERTIES)
            .or_else(|| {
                self.index
                    .superclass_type(declaring)
                    .and_then(|ty| self.index.class_of(&ty))
                    .and_then(|parent| parent.annotation(annotations::JACKSON_IGNORE_PROPERTIES))
            });

        if let Some(ignored) = class_level {
            if lists(ignored.strings("value"), property) {
                return Visibility::Ignored;
            }
        }

        match reference.and_then(|r| r.annotation(annotations::JACKSON_IGNORE_PROPERTIES)) {
            Some(ignored) if lists(ignored.strings("value"), property) => Visibility::Ignored,
            _ => Visibility::Unset,
        }
    }

    fn json_ignore(&self, target: &Target, _: &str, _: Option<&Target>) -> Visibility {
        match target.annotation(annotations::JACKSON_IGNORE) {
            Some(ignore) if ignore.bool("value").unwrap_or(true) => Visibility::Ignored,
            Some(_) => Visibility::Exposed,
            None => Visibility::Unset,
        }
    }

    fn json_ignore_type(&self, target: &Target, _: &str, _: Option<&Target>) -> Visibility {
        if target.is_class() {
            return Visibility::Unset;
        }
        let value_type = target.value_type();
        match self.index.class_of(&value_type) {
            Some(class) if class.has_annotation(annotations::JACKSON_IGNORE_TYPE) => Visibility::Ignored,
            _ => Visibility::Unset,
        }
    }

    fn transient_field(&self, target: &Target, _: &str, _: Option<&Target>) -> Visibility {
        let Target::Field(_, field) = target else {
            return Visibility::Unset;
        };
        if !field.modifiers.transient {
            return Visibility::Unset;
        }
        match target.schema().and_then(|s| s.bool("hidden")) {
            Some(false) => Visibility::Unset,
            _ => Visibility::Ignored,
        }
    }

    fn xml_transient(&self, target: &Target, _: &str, _: Option<&Target>) -> Visibility {
        if target.has_annotation(annotations::XML_TRANSIENT) {
            Visibility::Ignored
        } else {
            Visibility::Unset
        }
    }

    fn json_view(&self, target: &Target, _: &str, _: Option<&Target>) -> Visibility {
        if self.views.is_empty() {
            return Visibility::Unset;
        }
        let Some(views) = target
            .annotation(annotations::JACKSON_VIEW)
            .and_then(|view| view.types("value"))
        else {
            return Visibility::Unset;
        };

        let active = views.iter().any(|view| {
            self.views
                .iter()
                .any(|active| view.name() == *active || self.index.is_a(view, active))
        });

        if active {
            Visibility::Exposed
        } else {
            Visibility::Ignored
        }
    }

    fn xml_accessor_type(&self, target: &Target, _: &str, _: Option<&Target>) -> Visibility {
        if target.is_class() {
            return Visibility::Unset;
        }

        let annotated = target.has_annotation(annotations::XML_ELEMENT)
            || target.has_annotation(annotations::XML_ATTRIBUTE);
        if annotated {
            return Visibility::Exposed;
        }

        let Some(access) = target
            .declaring_class()
            .annotation(annotations::XML_ACCESSOR_TYPE)
            .and_then(|a| a.string("value"))
            .and_then(AccessType::parse)
        else {
            return Visibility::Unset;
        };

        match access {
            AccessType::Field if target.is_method() => Visibility::Ignored,
            AccessType::Field => Visibility::Exposed,
            AccessType::Property if target.is_field() => Visibility::Ignored,
            AccessType::PublicMember if !target.is_public() => Visibility::Ignored,
            AccessType::None => Visibility::Ignored,
            _ => Visibility::Unset,
        }
    }
}

/// Whether `@Schema(hidden = false)` (or a `@Schema` without `hidden`) is present
pub fn is_unhidden(target: &Target) -> bool {
    target
        .schema()
        .map_or(false, |schema| !schema.bool("hidden").unwrap_or(false))
}

fn lists(values: Option<Vec<String>>, property: &str) -> bool {
    values.map_or(false, |names| names.iter().any(|n| n == property))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Access, Annotation, FieldInfo, MethodInfo, Type};

    fn field(name: &str, annotations: Vec<Annotation>) -> FieldInfo {
        let mut field = FieldInfo::new(name, Type::class("java.lang.String"));
        field.annotations = annotations;
        field
    }

    fn resolver_for(index: &ClassIndex) -> IgnoreResolver<'_> {
        IgnoreResolver::new(index, &[])
    }

    #[test]
    fn test_schema_hidden_and_unhidden() {
        let index = ClassIndex::new(Vec::new());
        let class = ClassInfo::new("com.acme.Pet");
        let hidden = field(
            "secret",
            vec![Annotation::new(annotations::SCHEMA[0]).with("hidden", true)],
        );
        let shown = field(
            "name",
            vec![Annotation::new(annotations::SCHEMA[0]).with("hidden", false)],
        );

        let resolver = resolver_for(&index);
        assert_eq!(
            resolver.is_ignore(&Target::Field(&class, &hidden), "secret", None),
            Visibility::Ignored
        );
        assert!(is_unhidden(&Target::Field(&class, &shown)));
        assert!(!is_unhidden(&Target::Field(&class, &hidden)));
    }

    #[test]
    fn test_json_ignore_value_defaults_to_true() {
        let index = ClassIndex::new(Vec::new());
        let class = ClassInfo::new("com.acme.Pet");
        let ignored = field("a", vec![Annotation::new(annotations::JACKSON_IGNORE[0])]);
        let kept = field(
            "b",
            vec![Annotation::new(annotations::JACKSON_IGNORE[0]).with("value", false)],
        );

        let resolver = resolver_for(&index);
        assert_eq!(
            resolver.is_ignore(&Target::Field(&class, &ignored), "a", None),
            Visibility::Ignored
        );
        assert_eq!(
            resolver.is_ignore(&Target::Field(&class, &kept), "b", None),
            Visibility::Exposed
        );
    }

    #[test]
    fn test_json_ignore_properties_on_class_and_reference() {
        let mut class = ClassInfo::new("com.acme.Pet");
        class.annotations.push(
            Annotation::new(annotations::JACKSON_IGNORE_PROPERTIES[0])
                .with("value", serde_json::json!(["owner"])),
        );
        let index = ClassIndex::new(Vec::new());
        let owner = field("owner", Vec::new());
        let name = field("name", Vec::new());

        let parent = ClassInfo::new("com.acme.Shelter");
        let reference_field = field(
            "pet",
            vec![Annotation::new(annotations::JACKSON_IGNORE_PROPERTIES[0]).with("value", "name")],
        );
        let reference = Target::Field(&parent, &reference_field);

        let resolver = resolver_for(&index);
        assert_eq!(
            resolver.is_ignore(&Target::Field(&class, &owner), "owner", None),
            Visibility::Ignored
        );
        assert_eq!(
            resolver.is_ignore(&Target::Field(&class, &name), "name", None),
            Visibility::Unset
        );
        assert_eq!(
            resolver.is_ignore(&Target::Field(&class, &name), "name", Some(&reference)),
            Visibility::Ignored
        );
    }

    #[test]
    fn test_superclass_ignore_properties() {
        let mut base = ClassInfo::new("com.acme.Base");
        base.annotations.push(
            Annotation::new(annotations::JACKSON_IGNORE_PROPERTIES[0]).with("value", "id"),
        );
        let mut pet = ClassInfo::new("com.acme.Pet");
        pet.super_type = Some(Type::class("com.acme.Base"));
        let index = ClassIndex::new(vec![base]);
        let id = field("id", Vec::new());

        assert_eq!(
            resolver_for(&index).is_ignore(&Target::Field(&pet, &id), "id", None),
            Visibility::Ignored
        );
    }

    #[test]
    fn test_ignore_type_and_transient() {
        let mut secret = ClassInfo::new("com.acme.Secret");
        secret
            .annotations
            .push(Annotation::new(annotations::JACKSON_IGNORE_TYPE[0]));
        let index = ClassIndex::new(vec![secret]);
        let class = ClassInfo::new("com.acme.Pet");

        let secret_field = FieldInfo::new("secret", Type::class("com.acme.Secret"));
        let mut cache = field("cache", Vec::new());
        cache.modifiers.transient = true;

        let resolver = resolver_for(&index);
        assert_eq!(
            resolver.is_ignore(&Target::Field(&class, &secret_field), "secret", None),
            Visibility::Ignored
        );
        assert_eq!(
            resolver.is_ignore(&Target::Field(&class, &cache), "cache", None),
            Visibility::Ignored
        );
    }

    #[test]
    fn test_json_views() {
        let mut internal = ClassInfo::new("com.acme.Views$Internal");
        internal.super_type = Some(Type::class("com.acme.Views$Public"));
        let index = ClassIndex::new(vec![internal, ClassInfo::new("com.acme.Views$Public")]);
        let class = ClassInfo::new("com.acme.Pet");
        let views = vec!["com.acme.Views$Public".to_string()];
        let resolver = IgnoreResolver::new(&index, &views);

        let public = field(
            "name",
            vec![Annotation::new(annotations::JACKSON_VIEW[0]).with("value", "com.acme.Views$Internal")],
        );
        let other = field(
            "audit",
            vec![Annotation::new(annotations::JACKSON_VIEW[0]).with("value", "com.acme.Views$Admin")],
        );
        let plain = field("id", Vec::new());

        assert_eq!(
            resolver.is_ignore(&Target::Field(&class, &public), "name", None),
            Visibility::Exposed
        );
        assert_eq!(
            resolver.is_ignore(&Target::Field(&class, &other), "audit", None),
            Visibility::Ignored
        );
        assert_eq!(
            resolver.is_ignore(&Target::Field(&class, &plain), "id", None),
            Visibility::Unset
        );
    }

    #[test]
    fn test_xml_accessor_type() {
        let index = ClassIndex::new(Vec::new());
        let mut class = ClassInfo::new("com.acme.Pet");
        class.annotations.push(
            Annotation::new(annotations::XML_ACCESSOR_TYPE[0])
                .with("value", "javax.xml.bind.annotation.XmlAccessType.FIELD"),
        );
        let name = field("name", Vec::new());
        let getter = MethodInfo::new("getName", Type::class("java.lang.String"), vec![]);
        let mut element = MethodInfo::new("getAge", Type::class("java.lang.Integer"), vec![]);
        element
            .annotations
            .push(Annotation::new(annotations::XML_ELEMENT[1]));

        let resolver = resolver_for(&index);
        assert_eq!(
            resolver.is_ignore(&Target::Field(&class, &name), "name", None),
            Visibility::Exposed
        );
        assert_eq!(
            resolver.is_ignore(&Target::Method(&class, &getter), "name", None),
            Visibility::Ignored
        );
        assert_eq!(
            resolver.is_ignore(&Target::Method(&class, &element), "age", None),
            Visibility::Exposed
        );

        let mut public_only = ClassInfo::new("com.acme.Owner");
        public_only.annotations.push(
            Annotation::new(annotations::XML_ACCESSOR_TYPE[0]).with("value", "PUBLIC_MEMBER"),
        );
        let mut private = field("secret", Vec::new());
        private.modifiers.access = Access::Private;
        assert_eq!(
            resolver.is_ignore(&Target::Field(&public_only, &private), "secret", None),
            Visibility::Ignored
        );
    }

    #[test]
    fn test_descendant_visibility() {
        let index = ClassIndex::new(Vec::new());
        let mut dog = ClassInfo::new("com.acme.Dog");
        dog.annotations.push(
            Annotation::new(annotations::JACKSON_IGNORE_PROPERTIES[0]).with("value", "legs"),
        );

        let resolver = resolver_for(&index);
        assert_eq!(
            resolver.descendant_visibility("legs", &[&dog]),
            Visibility::Ignored
        );
        assert_eq!(
            resolver.descendant_visibility("name", &[&dog]),
            Visibility::Unset
        );
    }
}
