use crate::{
    ast::Type,
    introspection::records::{
        IntrospectionDirective, IntrospectionEnumValue, IntrospectionField,
        IntrospectionInputValue, IntrospectionNamedTypeRef, IntrospectionQuery,
        IntrospectionSchema, IntrospectionType, IntrospectionTypeRef,
    },
    schema::{
        meta::{
            Argument, DeprecationStatus, EnumMeta, EnumValue, Field, InputObjectMeta, MetaType,
            UnionMeta,
        },
        model::{DirectiveType, SchemaType},
    },
    types::base::TypeKind,
};

impl SchemaType {
    /// Describes this schema the way a full introspection query would,
    /// deprecated members included.
    ///
    /// Meta fields (`__typename`, `__schema`, `__type`) are not part of the
    /// result.
    pub fn introspect(&self) -> IntrospectionQuery {
        let root = |name: Option<&arcstr::ArcStr>| {
            name.map(|n| IntrospectionNamedTypeRef {
                kind: self.concrete_type_by_name(n).map(MetaType::type_kind),
                name: n.to_string(),
            })
        };

        IntrospectionQuery {
            schema: IntrospectionSchema {
                description: self.description().map(ToString::to_string),
                query_type: root(self.query_type_name()),
                mutation_type: root(self.mutation_type_name()),
                subscription_type: root(self.subscription_type_name()),
                types: self
                    .concrete_type_list()
                    .into_iter()
                    .map(|t| self.introspect_type(t))
                    .collect(),
                directives: self
                    .directive_list()
                    .into_iter()
                    .map(|d| self.introspect_directive(d))
                    .collect(),
            },
        }
    }

    fn introspect_type(&self, t: &MetaType) -> IntrospectionType {
        let mut record = IntrospectionType {
            kind: t.type_kind(),
            name: t.name().to_string(),
            description: t.description().map(ToString::to_string),
            specified_by_url: t.specified_by_url().map(ToString::to_string),
            fields: None,
            interfaces: Some(None),
            possible_types: None,
            enum_values: None,
            input_fields: None,
        };

        match t {
            MetaType::Object(_) | MetaType::Interface(_) => {
                record.fields = Some(t.fields().iter().map(|f| self.introspect_field(f)).collect());
                record.interfaces = Some(Some(
                    t.interface_names()
                        .iter()
                        .map(|n| self.named_ref(n))
                        .collect(),
                ));
                if let MetaType::Interface(_) = t {
                    record.possible_types = Some(
                        self.possible_types(t)
                            .into_iter()
                            .map(|p| self.named_ref(p.name()))
                            .collect(),
                    );
                }
            }
            MetaType::Union(UnionMeta { of_type_names, .. }) => {
                record.possible_types =
                    Some(of_type_names.iter().map(|n| self.named_ref(n)).collect());
            }
            MetaType::Enum(EnumMeta { values, .. }) => {
                record.enum_values = Some(values.iter().map(introspect_enum_value).collect());
            }
            MetaType::InputObject(InputObjectMeta { input_fields, .. }) => {
                record.input_fields = Some(
                    input_fields
                        .iter()
                        .map(|f| self.introspect_input_value(f))
                        .collect(),
                );
            }
            MetaType::Scalar(_) => {}
        }

        record
    }

    fn introspect_field(&self, f: &Field) -> IntrospectionField {
        IntrospectionField {
            name: f.name.to_string(),
            description: f.description.as_ref().map(ToString::to_string),
            args: Some(
                f.arguments
                    .iter()
                    .map(|a| self.introspect_input_value(a))
                    .collect(),
            ),
            field_type: self.type_ref(&f.field_type),
            is_deprecated: f.deprecation_status.is_deprecated(),
            deprecation_reason: deprecation_reason(&f.deprecation_status),
        }
    }

    fn introspect_input_value(&self, a: &Argument) -> IntrospectionInputValue {
        IntrospectionInputValue {
            name: a.name.to_string(),
            description: a.description.as_ref().map(ToString::to_string),
            value_type: self.type_ref(&a.arg_type),
            default_value: a.default_value.as_ref().map(ToString::to_string),
            is_deprecated: a.deprecation_status.is_deprecated(),
            deprecation_reason: deprecation_reason(&a.deprecation_status),
        }
    }

    fn introspect_directive(&self, d: &DirectiveType) -> IntrospectionDirective {
        IntrospectionDirective {
            name: d.name.to_string(),
            description: d.description.as_ref().map(ToString::to_string),
            is_repeatable: d.is_repeatable,
            locations: Some(d.locations.clone()),
            args: Some(
                d.arguments
                    .iter()
                    .map(|a| self.introspect_input_value(a))
                    .collect(),
            ),
        }
    }

    /// Named references to types unknown to this schema are described as
    /// scalars.
    fn named_ref(&self, name: &str) -> IntrospectionTypeRef {
        let kind = self
            .concrete_type_by_name(name)
            .map_or(TypeKind::Scalar, MetaType::type_kind);
        IntrospectionTypeRef::named(kind, name)
    }

    fn type_ref(&self, t: &Type<'_>) -> IntrospectionTypeRef {
        match t {
            Type::Named(n) => self.named_ref(n),
            Type::NonNullNamed(n) => {
                IntrospectionTypeRef::wrapping(TypeKind::NonNull, self.named_ref(n))
            }
            Type::List(inner) => IntrospectionTypeRef::wrapping(TypeKind::List, self.type_ref(inner)),
            Type::NonNullList(inner) => IntrospectionTypeRef::wrapping(
                TypeKind::NonNull,
                IntrospectionTypeRef::wrapping(TypeKind::List, self.type_ref(inner)),
            ),
        }
    }
}

fn introspect_enum_value(v: &EnumValue) -> IntrospectionEnumValue {
    IntrospectionEnumValue {
        name: v.name.to_string(),
        description: v.description.as_ref().map(ToString::to_string),
        is_deprecated: v.deprecation_status.is_deprecated(),
        deprecation_reason: deprecation_reason(&v.deprecation_status),
    }
}

fn deprecation_reason(status: &DeprecationStatus) -> Option<String> {
    status.reason().map(ToString::to_string)
}
