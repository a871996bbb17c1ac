//! Equality and subtyping of schema types

use std::ptr;

use crate::{
    ast::Type,
    schema::{
        meta::{MetaType, UnionMeta},
        model::{SchemaType, TypeType},
    },
};

/// Whether `a` and `b` denote the same type.
///
/// Wrappers are compared structurally. Named types are equal when they are
/// the same instance or, across schemas, have the same name.
pub fn is_equal_type(a: &TypeType<'_>, b: &TypeType<'_>) -> bool {
    match (a, b) {
        (TypeType::Concrete(a), TypeType::Concrete(b)) => ptr::eq(*a, *b) || a.name() == b.name(),
        (TypeType::List(a), TypeType::List(b)) | (TypeType::NonNull(a), TypeType::NonNull(b)) => {
            is_equal_type(a, b)
        }
        _ => false,
    }
}

/// Whether a value of `maybe_sub` type may be used where `maybe_super` type
/// is expected.
///
/// Unknown types are never related to anything but themselves.
pub fn is_type_sub_type_of(
    schema: &SchemaType,
    maybe_sub: &TypeType<'_>,
    maybe_super: &TypeType<'_>,
) -> bool {
    if is_equal_type(maybe_sub, maybe_super) {
        return true;
    }

    match (maybe_sub, maybe_super) {
        (TypeType::NonNull(sub), TypeType::NonNull(sup)) => is_type_sub_type_of(schema, sub, sup),
        (_, TypeType::NonNull(_)) => false,
        (TypeType::NonNull(sub), sup) => is_type_sub_type_of(schema, sub, sup),
        (TypeType::List(sub), TypeType::List(sup)) => is_type_sub_type_of(schema, sub, sup),
        (TypeType::List(_), _) | (_, TypeType::List(_)) => false,
        (TypeType::Concrete(sub), TypeType::Concrete(sup)) => {
            sup.is_abstract()
                && matches!(sub, MetaType::Object(_) | MetaType::Interface(_))
                && schema.is_possible_type(sup, sub)
        }
    }
}

impl SchemaType {
    /// Types that may be returned where the abstract type `t` is expected:
    /// the members of a union, or the objects implementing an interface.
    ///
    /// Empty for types that are not abstract.
    pub fn possible_types(&self, t: &MetaType) -> Vec<&MetaType> {
        match t {
            MetaType::Union(UnionMeta { of_type_names, .. }) => of_type_names
                .iter()
                .filter_map(|n| self.concrete_type_by_name(n))
                .collect(),
            MetaType::Interface(_) => self
                .concrete_type_list()
                .into_iter()
                .filter(|ct| matches!(ct, MetaType::Object(_)) && self.implements_interface(ct, t))
                .collect(),
            _ => vec![],
        }
    }

    /// Whether `possible_type` is a union member of, or implements,
    /// `abstract_type`.
    ///
    /// Interfaces are matched transitively, through interfaces implementing
    /// interfaces.
    pub fn is_possible_type(&self, abstract_type: &MetaType, possible_type: &MetaType) -> bool {
        match abstract_type {
            MetaType::Union(UnionMeta { of_type_names, .. }) => {
                of_type_names.contains(possible_type.name())
            }
            MetaType::Interface(_) => self.implements_interface(possible_type, abstract_type),
            _ => false,
        }
    }

    /// Whether the object or interface `t` implements `iface`, directly or
    /// through one of the interfaces it implements.
    pub fn implements_interface(&self, t: &MetaType, iface: &MetaType) -> bool {
        let target = iface.name();
        let mut seen = vec![t.name()];
        let mut queue = t.interface_names().iter().collect::<Vec<_>>();
        while let Some(name) = queue.pop() {
            if name == target {
                return true;
            }
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);
            if let Some(next) = self.concrete_type_by_name(name) {
                queue.extend(next.interface_names());
            }
        }
        false
    }

    /// Whether some object type could be both `t1` and `t2`.
    pub fn type_overlap(&self, t1: &MetaType, t2: &MetaType) -> bool {
        if ptr::eq(t1, t2) {
            return true;
        }

        match (t1.is_abstract(), t2.is_abstract()) {
            (true, true) => self
                .possible_types(t1)
                .iter()
                .any(|t| self.is_possible_type(t2, t)),
            (true, false) => self.is_possible_type(t1, t2),
            (false, true) => self.is_possible_type(t2, t1),
            (false, false) => false,
        }
    }

    /// [`is_type_sub_type_of`] over type literals.
    ///
    /// Literals naming types unknown to this schema are only subtypes of
    /// themselves.
    pub fn is_subtype(&self, sub_type: &Type<'_>, super_type: &Type<'_>) -> bool {
        if sub_type == super_type {
            return true;
        }
        match (self.make_type(sub_type), self.make_type(super_type)) {
            (Some(sub), Some(sup)) => is_type_sub_type_of(self, &sub, &sup),
            _ => false,
        }
    }

    /// Whether the type named `sub_type_name` is `super_type_name` or one of
    /// its possible types.
    pub fn is_named_subtype(&self, sub_type_name: &str, super_type_name: &str) -> bool {
        if sub_type_name == super_type_name {
            true
        } else if let (Some(sub_type), Some(super_type)) = (
            self.concrete_type_by_name(sub_type_name),
            self.concrete_type_by_name(super_type_name),
        ) {
            super_type.is_abstract() && self.is_possible_type(super_type, sub_type)
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        ast::Type,
        schema::{
            meta::{Field, InterfaceMeta, ObjectMeta, UnionMeta},
            model::{SchemaConfig, SchemaType, TypeType},
        },
    };

    use super::{is_equal_type, is_type_sub_type_of};

    fn schema() -> SchemaType {
        let name = || Field::new("name", Type::named("String"));
        SchemaType::new(SchemaConfig {
            query: Some("Query".into()),
            types: vec![
                Arc::new(
                    ObjectMeta::new("Query", &[Field::new("node", Type::named("Node"))])
                        .into_meta(),
                ),
                Arc::new(InterfaceMeta::new("Node", &[name()]).into_meta()),
                Arc::new(
                    InterfaceMeta::new("Resource", &[name()])
                        .interfaces(&["Node"])
                        .into_meta(),
                ),
                Arc::new(
                    ObjectMeta::new("Image", &[name()])
                        .interfaces(&["Resource"])
                        .into_meta(),
                ),
                Arc::new(ObjectMeta::new("Video", &[name()]).into_meta()),
                Arc::new(UnionMeta::new("Media", &["Image"]).into_meta()),
            ],
            ..SchemaConfig::default()
        })
    }

    fn ty<'s>(schema: &'s SchemaType, literal: &str) -> TypeType<'s> {
        let parsed = crate::parser::parse_type_source(literal).unwrap();
        schema.make_type(&parsed.item).unwrap()
    }

    #[test]
    fn equality_is_structural() {
        let schema = schema();
        for literal in ["Image", "[Image]", "Image!", "[[Image!]]!"] {
            assert!(is_equal_type(&ty(&schema, literal), &ty(&schema, literal)));
        }
        assert!(!is_equal_type(&ty(&schema, "Image"), &ty(&schema, "Image!")));
        assert!(!is_equal_type(&ty(&schema, "[Image]"), &ty(&schema, "Image")));
        assert!(!is_equal_type(&ty(&schema, "Image"), &ty(&schema, "Video")));
    }

    #[test]
    fn equality_across_schemas_uses_names() {
        let (a, b) = (schema(), schema());
        assert!(is_equal_type(&ty(&a, "[Node!]"), &ty(&b, "[Node!]")));
    }

    #[test]
    fn non_null_is_covariant() {
        let schema = schema();
        let sub = |a, b| is_type_sub_type_of(&schema, &ty(&schema, a), &ty(&schema, b));

        assert!(sub("Image!", "Image"));
        assert!(!sub("Image", "Image!"));
        assert!(sub("Image!", "Node"));
        assert!(sub("Image!", "Node!"));
        assert!(!sub("Image", "Node!"));
    }

    #[test]
    fn lists_are_covariant() {
        let schema = schema();
        let sub = |a, b| is_type_sub_type_of(&schema, &ty(&schema, a), &ty(&schema, b));

        assert!(sub("[Image]", "[Node]"));
        assert!(sub("[Image!]!", "[Image]"));
        assert!(!sub("[Node]", "[Image]"));
        assert!(!sub("Image", "[Image]"));
        assert!(!sub("[Image]", "Image"));
    }

    #[test]
    fn abstract_membership() {
        let schema = schema();
        let sub = |a, b| is_type_sub_type_of(&schema, &ty(&schema, a), &ty(&schema, b));

        assert!(sub("Image", "Media"));
        assert!(!sub("Video", "Media"));
        assert!(sub("Image", "Resource"));
        assert!(sub("Image", "Node"), "interfaces are implemented transitively");
        assert!(sub("Resource", "Node"));
        assert!(!sub("Video", "Node"));
        assert!(!sub("Node", "Image"));
    }

    #[test]
    fn possible_types_and_overlap() {
        let schema = schema();
        let get = |n| schema.concrete_type_by_name(n).unwrap();

        let names = schema
            .possible_types(get("Node"))
            .iter()
            .map(|t| t.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Image"]);
        assert!(schema.type_overlap(get("Media"), get("Node")));
        assert!(!schema.type_overlap(get("Video"), get("Node")));
        assert!(!schema.type_overlap(get("Video"), get("Image")));
    }

    #[test]
    fn literal_subtypes() {
        let schema = schema();
        assert!(schema.is_subtype(&Type::non_null_named("Image"), &Type::named("Node")));
        assert!(schema.is_subtype(&Type::named("Missing"), &Type::named("Missing")));
        assert!(!schema.is_subtype(&Type::named("Missing"), &Type::named("Node")));
    }
}
