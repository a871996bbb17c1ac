//! Self-consistency checks of a constructed schema

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use fnv::{FnvHashMap, FnvHashSet};

use crate::{
    ast::{OperationType, Type},
    introspection,
    schema::{
        meta::{Argument, EnumMeta, Field, InputObjectMeta, MetaType, UnionMeta},
        model::{DirectiveType, SchemaType},
        relations::{is_equal_type, is_type_sub_type_of},
    },
};

/// Inconsistency found by [`SchemaType::validate()`].
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum SchemaError {
    /// The schema has no query root type.
    #[display("Query root type must be provided.")]
    MissingQueryRoot,

    /// A root operation type is not an object type.
    #[display("{root} root type must be Object type, it cannot be {type_name}.")]
    RootNotObject {
        /// `Query`, `Mutation` or `Subscription`.
        root: &'static str,
        /// Name of the offending type.
        type_name: ArcStr,
    },

    /// A referenced type is not registered in the schema.
    #[display("Unknown type \"{type_name}\" referenced by {referrer}.")]
    UnknownType {
        /// Name of the missing type.
        type_name: String,
        /// What references it, e.g. `Dog.owner`.
        referrer: String,
    },

    /// Two different types are configured with the same name.
    #[display(
        "Schema must contain uniquely named types but contains multiple types named \"{_0}\"."
    )]
    DuplicateTypeName(#[error(not(source))] ArcStr),

    /// A user-defined name starts with `__`.
    #[display(
        "Name \"{_0}\" must not begin with \"__\", which is reserved by GraphQL introspection."
    )]
    ReservedName(#[error(not(source))] ArcStr),

    /// A directive can't be used anywhere.
    #[display("Directive @{_0} must include 1 or more locations.")]
    MissingDirectiveLocations(#[error(not(source))] ArcStr),

    /// An argument or input field has an output-only type.
    #[display("The type of {coordinate} must be Input Type but got: {value_type}.")]
    NonInputType {
        /// Schema coordinate, e.g. `Query.dog(id:)`.
        coordinate: String,
        /// The offending type.
        value_type: String,
    },

    /// A field has an input-only type.
    #[display("The type of {coordinate} must be Output Type but got: {field_type}.")]
    NonOutputType {
        /// Schema coordinate, e.g. `Query.dog`.
        coordinate: String,
        /// The offending type.
        field_type: String,
    },

    /// Two arguments of a field or directive share a name.
    #[display("Argument {_0} can only be defined once.")]
    DuplicateArgument(#[error(not(source))] String),

    /// A non-null argument without default is deprecated.
    #[display("Required argument {_0} cannot be deprecated.")]
    DeprecatedRequiredArgument(#[error(not(source))] String),

    /// A non-null input field without default is deprecated.
    #[display("Required input field {_0} cannot be deprecated.")]
    DeprecatedRequiredInputField(#[error(not(source))] String),

    /// An object or interface without fields.
    #[display("Type {_0} must define one or more fields.")]
    NoFields(#[error(not(source))] ArcStr),

    /// Something other than an interface is listed as implemented.
    #[display("Type {type_name} must only implement Interface types, it cannot implement {iface}.")]
    NonInterfaceImplemented {
        /// The implementing type.
        type_name: ArcStr,
        /// The listed non-interface type.
        iface: ArcStr,
    },

    /// An interface lists itself as implemented.
    #[display("Type {_0} cannot implement itself because it would create a circular reference.")]
    SelfImplementation(#[error(not(source))] ArcStr),

    /// An interface is listed twice.
    #[display("Type {type_name} can only implement {iface} once.")]
    DuplicateInterface {
        /// The implementing type.
        type_name: ArcStr,
        /// The interface listed twice.
        iface: ArcStr,
    },

    /// A field of an implemented interface is missing.
    #[display("Interface field {iface}.{field} expected but {type_name} does not provide it.")]
    MissingInterfaceField {
        /// The interface.
        iface: ArcStr,
        /// Name of the missing field.
        field: ArcStr,
        /// The implementing type.
        type_name: ArcStr,
    },

    /// A field type is not a subtype of the interface field type.
    #[display(
        "Interface field {iface}.{field} expects type {expected} \
         but {type_name}.{field} is type {actual}."
    )]
    InterfaceFieldTypeMismatch {
        /// The interface.
        iface: ArcStr,
        /// Name of the field.
        field: ArcStr,
        /// Type of the interface field.
        expected: String,
        /// The implementing type.
        type_name: ArcStr,
        /// Type of the implementing field.
        actual: String,
    },

    /// An argument of an interface field is missing.
    #[display(
        "Interface field argument {iface}.{field}({arg}:) expected \
         but {type_name}.{field} does not provide it."
    )]
    MissingInterfaceArgument {
        /// The interface.
        iface: ArcStr,
        /// Name of the field.
        field: ArcStr,
        /// Name of the missing argument.
        arg: ArcStr,
        /// The implementing type.
        type_name: ArcStr,
    },

    /// An argument type differs from the interface argument type.
    #[display(
        "Interface field argument {iface}.{field}({arg}:) expects type {expected} \
         but {type_name}.{field}({arg}:) is type {actual}."
    )]
    InterfaceArgumentTypeMismatch {
        /// The interface.
        iface: ArcStr,
        /// Name of the field.
        field: ArcStr,
        /// Name of the argument.
        arg: ArcStr,
        /// Type of the interface argument.
        expected: String,
        /// The implementing type.
        type_name: ArcStr,
        /// Type of the implementing argument.
        actual: String,
    },

    /// An implementing field requires an argument the interface doesn't
    /// know about.
    #[display(
        "Argument \"{type_name}.{field}({arg}:)\" must not be required type \"{arg_type}\" \
         if not provided by the Interface field \"{iface}.{field}\"."
    )]
    ExtraRequiredArgument {
        /// The implementing type.
        type_name: ArcStr,
        /// Name of the field.
        field: ArcStr,
        /// Name of the extra argument.
        arg: ArcStr,
        /// Type of the extra argument.
        arg_type: String,
        /// The interface.
        iface: ArcStr,
    },

    /// An interface implementation chain loops back to the type.
    #[display(
        "Type {type_name} cannot implement {iface} because it would create a circular reference."
    )]
    CircularImplementation {
        /// The implementing type.
        type_name: ArcStr,
        /// The interface implementing the type.
        iface: ArcStr,
    },

    /// An interface of an implemented interface is not listed.
    #[display("Type {type_name} must implement {transitive} because it is implemented by {iface}.")]
    MissingTransitiveInterface {
        /// The implementing type.
        type_name: ArcStr,
        /// The interface that must also be listed.
        transitive: ArcStr,
        /// The listed interface implementing `transitive`.
        iface: ArcStr,
    },

    /// A union without members.
    #[display("Union type {_0} must define one or more member types.")]
    EmptyUnion(#[error(not(source))] ArcStr),

    /// A union lists a member twice.
    #[display("Union type {union_name} can only include type {member} once.")]
    DuplicateUnionMember {
        /// The union.
        union_name: ArcStr,
        /// The member listed twice.
        member: ArcStr,
    },

    /// A union lists a type that is not an object.
    #[display("Union type {union_name} can only include Object types, it cannot include {member}.")]
    NonObjectUnionMember {
        /// The union.
        union_name: ArcStr,
        /// The non-object member.
        member: ArcStr,
    },

    /// An enum without values.
    #[display("Enum type {_0} must define one or more values.")]
    EmptyEnum(#[error(not(source))] ArcStr),

    /// An enum value is named `true`, `false` or `null`.
    #[display("Enum type {enum_name} cannot include value: {value}.")]
    ReservedEnumValue {
        /// The enum.
        enum_name: ArcStr,
        /// The reserved value name.
        value: ArcStr,
    },

    /// An input object without fields.
    #[display("Input Object type {_0} must define one or more fields.")]
    EmptyInputObject(#[error(not(source))] ArcStr),

    /// An input object can't be constructed, because it requires an instance
    /// of itself.
    #[display(
        "Cannot reference Input Object \"{type_name}\" within itself \
         through a series of non-null fields: \"{path}\"."
    )]
    NonNullInputCycle {
        /// The input object.
        type_name: ArcStr,
        /// Dot-separated field names forming the cycle.
        path: String,
    },
}

impl SchemaType {
    /// Checks that this schema is internally consistent.
    ///
    /// Returns every inconsistency found, in a deterministic order. An empty
    /// result means the schema is valid.
    pub fn validate(&self) -> Vec<SchemaError> {
        let mut validator = SchemaValidator {
            schema: self,
            errors: vec![],
            visited_input_types: FnvHashSet::default(),
        };

        for name in self.duplicate_type_names() {
            validator.report(SchemaError::DuplicateTypeName(name.clone()));
        }
        validator.validate_roots();
        for directive in self.directive_list() {
            validator.validate_directive(directive);
        }
        for ty in self.concrete_type_list() {
            validator.validate_type(ty);
        }

        crate::__schema_debug!("schema validation found {} errors", validator.errors.len());

        validator.errors
    }
}

struct SchemaValidator<'s> {
    schema: &'s SchemaType,
    errors: Vec<SchemaError>,
    visited_input_types: FnvHashSet<&'s str>,
}

impl<'s> SchemaValidator<'s> {
    fn report(&mut self, error: SchemaError) {
        self.errors.push(error);
    }

    fn validate_roots(&mut self) {
        if self.schema.query_type_name().is_none() {
            self.report(SchemaError::MissingQueryRoot);
        }

        let roots = [
            (OperationType::Query, self.schema.query_type_name()),
            (OperationType::Mutation, self.schema.mutation_type_name()),
            (OperationType::Subscription, self.schema.subscription_type_name()),
        ];
        for (operation, name) in roots {
            let Some(name) = name else { continue };
            let root = match operation {
                OperationType::Query => "Query",
                OperationType::Mutation => "Mutation",
                OperationType::Subscription => "Subscription",
            };
            match self.schema.concrete_type_by_name(name) {
                None => self.report(SchemaError::UnknownType {
                    type_name: name.to_string(),
                    referrer: format!("{operation} root"),
                }),
                Some(MetaType::Object(_)) => {}
                Some(_) => self.report(SchemaError::RootNotObject {
                    root,
                    type_name: name.clone(),
                }),
            }
        }
    }

    fn validate_name(&mut self, name: &ArcStr) {
        if name.starts_with("__") {
            self.report(SchemaError::ReservedName(name.clone()));
        }
    }

    /// Reports `ty` if it names an unknown type, and returns whether it
    /// resolves.
    fn check_known(&mut self, ty: &Type<'_>, referrer: impl FnOnce() -> String) -> bool {
        let name = ty.innermost_name();
        if self.schema.concrete_type_by_name(name).is_some() {
            return true;
        }
        self.report(SchemaError::UnknownType {
            type_name: name.into(),
            referrer: referrer(),
        });
        false
    }

    fn validate_directive(&mut self, directive: &DirectiveType) {
        self.validate_name(&directive.name);
        if directive.locations.is_empty() {
            self.report(SchemaError::MissingDirectiveLocations(directive.name.clone()));
        }
        let owner = format!("@{}", directive.name);
        self.validate_arguments(&owner, &directive.arguments);
    }

    /// Validates field or directive arguments. `owner` is the coordinate of
    /// the field or directive, e.g. `Query.dog`.
    fn validate_arguments(&mut self, owner: &str, args: &[Argument]) {
        let mut seen = FnvHashSet::default();
        for arg in args {
            let coordinate = format!("{owner}({}:)", arg.name);
            self.validate_name(&arg.name);
            if !seen.insert(&arg.name) {
                self.report(SchemaError::DuplicateArgument(coordinate.clone()));
            }
            if self.check_known(&arg.arg_type, || coordinate.clone())
                && !self.is_input_literal(&arg.arg_type)
            {
                self.report(SchemaError::NonInputType {
                    coordinate: coordinate.clone(),
                    value_type: arg.arg_type.to_string(),
                });
            }
            if arg.is_required() && arg.deprecation_status.is_deprecated() {
                self.report(SchemaError::DeprecatedRequiredArgument(coordinate));
            }
        }
    }

    fn is_input_literal(&self, ty: &Type<'_>) -> bool {
        self.schema
            .concrete_type_by_name(ty.innermost_name())
            .is_some_and(MetaType::is_input)
    }

    fn validate_type(&mut self, ty: &'s MetaType) {
        if introspection::type_by_name(ty.name()).is_none() {
            self.validate_name(ty.name());
        }

        match ty {
            MetaType::Object(_) | MetaType::Interface(_) => {
                self.validate_fields(ty);
                self.validate_interfaces(ty);
            }
            MetaType::Union(u) => self.validate_union(u),
            MetaType::Enum(e) => self.validate_enum(e),
            MetaType::InputObject(i) => {
                self.validate_input_fields(i);
                self.detect_input_cycle(i, &mut vec![], &mut FnvHashMap::default());
            }
            MetaType::Scalar(_) => {}
        }
    }

    fn validate_fields(&mut self, ty: &MetaType) {
        let type_name = ty.name();
        if ty.fields().is_empty() {
            self.report(SchemaError::NoFields(type_name.clone()));
        }
        for field in ty.fields() {
            let coordinate = format!("{type_name}.{}", field.name);
            self.validate_name(&field.name);
            if self.check_known(&field.field_type, || coordinate.clone())
                && !self.is_output_literal(&field.field_type)
            {
                self.report(SchemaError::NonOutputType {
                    coordinate: coordinate.clone(),
                    field_type: field.field_type.to_string(),
                });
            }
            self.validate_arguments(&coordinate, &field.arguments);
        }
    }

    fn is_output_literal(&self, ty: &Type<'_>) -> bool {
        self.schema
            .concrete_type_by_name(ty.innermost_name())
            .is_some_and(MetaType::is_output)
    }

    fn validate_interfaces(&mut self, ty: &MetaType) {
        let type_name = ty.name();
        let mut seen = FnvHashSet::default();
        for iface_name in ty.interface_names() {
            let Some(iface) = self.schema.concrete_type_by_name(iface_name) else {
                self.report(SchemaError::UnknownType {
                    type_name: iface_name.to_string(),
                    referrer: format!("{type_name} interfaces"),
                });
                continue;
            };
            if !matches!(iface, MetaType::Interface(_)) {
                self.report(SchemaError::NonInterfaceImplemented {
                    type_name: type_name.clone(),
                    iface: iface_name.clone(),
                });
                continue;
            }
            if iface_name == type_name {
                self.report(SchemaError::SelfImplementation(type_name.clone()));
                continue;
            }
            if !seen.insert(iface_name) {
                self.report(SchemaError::DuplicateInterface {
                    type_name: type_name.clone(),
                    iface: iface_name.clone(),
                });
                continue;
            }
            self.validate_implements_ancestors(ty, iface);
            self.validate_implements_interface(ty, iface);
        }
    }

    fn validate_implements_ancestors(&mut self, ty: &MetaType, iface: &MetaType) {
        for transitive in iface.interface_names() {
            if !ty.interface_names().contains(transitive) {
                self.report(if transitive == ty.name() {
                    SchemaError::CircularImplementation {
                        type_name: ty.name().clone(),
                        iface: iface.name().clone(),
                    }
                } else {
                    SchemaError::MissingTransitiveInterface {
                        type_name: ty.name().clone(),
                        transitive: transitive.clone(),
                        iface: iface.name().clone(),
                    }
                });
            }
        }
    }

    fn validate_implements_interface(&mut self, ty: &MetaType, iface: &MetaType) {
        for iface_field in iface.fields() {
            let Some(type_field) = ty.field_by_name(&iface_field.name) else {
                self.report(SchemaError::MissingInterfaceField {
                    iface: iface.name().clone(),
                    field: iface_field.name.clone(),
                    type_name: ty.name().clone(),
                });
                continue;
            };

            if let (Some(actual), Some(expected)) = (
                self.schema.make_type(&type_field.field_type),
                self.schema.make_type(&iface_field.field_type),
            ) {
                if !is_type_sub_type_of(self.schema, &actual, &expected) {
                    self.report(SchemaError::InterfaceFieldTypeMismatch {
                        iface: iface.name().clone(),
                        field: iface_field.name.clone(),
                        expected: expected.to_string(),
                        type_name: ty.name().clone(),
                        actual: actual.to_string(),
                    });
                }
            }

            self.validate_interface_arguments(ty, iface, iface_field, type_field);
        }
    }

    fn validate_interface_arguments(
        &mut self,
        ty: &MetaType,
        iface: &MetaType,
        iface_field: &Field,
        type_field: &Field,
    ) {
        for iface_arg in &iface_field.arguments {
            let Some(type_arg) = type_field.argument_by_name(&iface_arg.name) else {
                self.report(SchemaError::MissingInterfaceArgument {
                    iface: iface.name().clone(),
                    field: iface_field.name.clone(),
                    arg: iface_arg.name.clone(),
                    type_name: ty.name().clone(),
                });
                continue;
            };
            if let (Some(expected), Some(actual)) = (
                self.schema.make_type(&iface_arg.arg_type),
                self.schema.make_type(&type_arg.arg_type),
            ) {
                if !is_equal_type(&expected, &actual) {
                    self.report(SchemaError::InterfaceArgumentTypeMismatch {
                        iface: iface.name().clone(),
                        field: iface_field.name.clone(),
                        arg: iface_arg.name.clone(),
                        expected: expected.to_string(),
                        type_name: ty.name().clone(),
                        actual: actual.to_string(),
                    });
                }
            }
        }

        for type_arg in &type_field.arguments {
            if type_arg.is_required() && iface_field.argument_by_name(&type_arg.name).is_none() {
                self.report(SchemaError::ExtraRequiredArgument {
                    type_name: ty.name().clone(),
                    field: type_field.name.clone(),
                    arg: type_arg.name.clone(),
                    arg_type: type_arg.arg_type.to_string(),
                    iface: iface.name().clone(),
                });
            }
        }
    }

    fn validate_union(&mut self, union: &UnionMeta) {
        if union.of_type_names.is_empty() {
            self.report(SchemaError::EmptyUnion(union.name.clone()));
        }
        let mut seen = FnvHashSet::default();
        for member in &union.of_type_names {
            if !seen.insert(member) {
                self.report(SchemaError::DuplicateUnionMember {
                    union_name: union.name.clone(),
                    member: member.clone(),
                });
                continue;
            }
            match self.schema.concrete_type_by_name(member) {
                None => self.report(SchemaError::UnknownType {
                    type_name: member.to_string(),
                    referrer: format!("{} members", union.name),
                }),
                Some(MetaType::Object(_)) => {}
                Some(_) => self.report(SchemaError::NonObjectUnionMember {
                    union_name: union.name.clone(),
                    member: member.clone(),
                }),
            }
        }
    }

    fn validate_enum(&mut self, enum_: &EnumMeta) {
        if enum_.values.is_empty() {
            self.report(SchemaError::EmptyEnum(enum_.name.clone()));
        }
        for value in &enum_.values {
            self.validate_name(&value.name);
            if matches!(value.name.as_str(), "true" | "false" | "null") {
                self.report(SchemaError::ReservedEnumValue {
                    enum_name: enum_.name.clone(),
                    value: value.name.clone(),
                });
            }
        }
    }

    fn validate_input_fields(&mut self, input: &InputObjectMeta) {
        if input.input_fields.is_empty() {
            self.report(SchemaError::EmptyInputObject(input.name.clone()));
        }
        for field in &input.input_fields {
            let coordinate = format!("{}.{}", input.name, field.name);
            self.validate_name(&field.name);
            if self.check_known(&field.arg_type, || coordinate.clone())
                && !self.is_input_literal(&field.arg_type)
            {
                self.report(SchemaError::NonInputType {
                    coordinate: coordinate.clone(),
                    value_type: field.arg_type.to_string(),
                });
            }
            if field.is_required() && field.deprecation_status.is_deprecated() {
                self.report(SchemaError::DeprecatedRequiredInputField(coordinate));
            }
        }
    }

    /// Depth-first search through non-null input object fields. `path` holds
    /// the fields leading to `input`, `path_index` the position in `path`
    /// each input object on it was entered at.
    fn detect_input_cycle(
        &mut self,
        input: &'s InputObjectMeta,
        path: &mut Vec<&'s str>,
        path_index: &mut FnvHashMap<&'s str, usize>,
    ) {
        if !self.visited_input_types.insert(&input.name) {
            return;
        }
        path_index.insert(&input.name, path.len());

        for field in &input.input_fields {
            let Type::NonNullNamed(field_type) = &field.arg_type else {
                continue;
            };
            let Some(MetaType::InputObject(field_input)) =
                self.schema.concrete_type_by_name(field_type)
            else {
                continue;
            };

            path.push(&field.name);
            match path_index.get(field_input.name.as_str()) {
                None => self.detect_input_cycle(field_input, path, path_index),
                Some(&cycle_index) => self.report(SchemaError::NonNullInputCycle {
                    type_name: field_input.name.clone(),
                    path: path[cycle_index..].join("."),
                }),
            }
            path.pop();
        }

        path_index.remove(input.name.as_str());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use crate::{
        ast::Type,
        schema::{
            meta::{
                Argument, EnumMeta, EnumValue, Field, InputObjectMeta, InterfaceMeta, MetaType,
                ObjectMeta, ScalarMeta, UnionMeta,
            },
            model::{DirectiveLocation, DirectiveType, SchemaConfig, SchemaType},
        },
    };

    fn messages(query: Option<&str>, types: Vec<MetaType>) -> Vec<String> {
        SchemaType::new(SchemaConfig {
            query: query.map(Into::into),
            types: types.into_iter().map(Arc::new).collect(),
            ..SchemaConfig::default()
        })
        .validate()
        .into_iter()
        .map(|e| e.to_string())
        .collect()
    }

    fn query_with(field: Field) -> MetaType {
        ObjectMeta::new("Query", &[field]).into_meta()
    }

    #[test]
    fn accepts_consistent_schema() {
        let errors = messages(
            Some("Query"),
            vec![
                query_with(
                    Field::new("pets", Type::named("Pet").wrap_non_null().wrap_list())
                        .argument(Argument::new("kind", Type::named("Kind"))),
                ),
                InterfaceMeta::new("Pet", &[Field::new("name", Type::named("String"))])
                    .into_meta(),
                ObjectMeta::new(
                    "Dog",
                    &[Field::new("name", Type::non_null_named("String"))],
                )
                .interfaces(&["Pet"])
                .into_meta(),
                EnumMeta::new("Kind", &[EnumValue::new("DOG")]).into_meta(),
                ScalarMeta::new("Url").specified_by_url("https://url.spec.whatwg.org").into_meta(),
            ],
        );
        assert_eq!(errors, Vec::<String>::new());
    }

    #[test]
    fn requires_query_root() {
        assert_eq!(
            messages(None, vec![]),
            ["Query root type must be provided."],
        );
        assert_eq!(
            messages(
                Some("Kind"),
                vec![EnumMeta::new("Kind", &[EnumValue::new("A")]).into_meta()],
            ),
            ["Query root type must be Object type, it cannot be Kind."],
        );
    }

    #[test]
    fn reports_unknown_and_misplaced_types() {
        let errors = messages(
            Some("Query"),
            vec![
                query_with(
                    Field::new("find", Type::named("Filter"))
                        .argument(Argument::new("by", Type::named("Missing")))
                        .argument(Argument::new("like", Type::named("Query"))),
                ),
                InputObjectMeta::new("Filter", &[Argument::new("id", Type::named("ID"))])
                    .into_meta(),
            ],
        );
        assert_eq!(
            errors,
            [
                "The type of Query.find must be Output Type but got: Filter.",
                "Unknown type \"Missing\" referenced by Query.find(by:).",
                "The type of Query.find(like:) must be Input Type but got: Query.",
            ],
        );
    }

    #[test]
    fn checks_interface_implementations() {
        let node = InterfaceMeta::new(
            "Node",
            &[Field::new("id", Type::non_null_named("ID"))
                .argument(Argument::new("format", Type::named("String")))],
        )
        .into_meta();
        let named =
            InterfaceMeta::new("Named", &[Field::new("name", Type::named("String"))]).into_meta();
        let user = ObjectMeta::new(
            "User",
            &[
                Field::new("id", Type::named("ID"))
                    .argument(Argument::new("format", Type::named("Int")))
                    .argument(Argument::new("strict", Type::non_null_named("Boolean"))),
            ],
        )
        .interfaces(&["Named", "Node", "Node"])
        .into_meta();

        let errors = messages(
            Some("Query"),
            vec![query_with(Field::new("user", Type::named("User"))), user, named, node],
        );
        assert_eq!(
            errors,
            [
                "Interface field Named.name expected but User does not provide it.",
                "Interface field Node.id expects type ID! but User.id is type ID.",
                "Interface field argument Node.id(format:) expects type String \
                 but User.id(format:) is type Int.",
                "Argument \"User.id(strict:)\" must not be required type \"Boolean!\" \
                 if not provided by the Interface field \"Node.id\".",
                "Type User can only implement Node once.",
            ],
        );
    }

    #[test]
    fn requires_transitive_interfaces() {
        let errors = messages(
            Some("Query"),
            vec![
                query_with(Field::new("image", Type::named("Image"))),
                InterfaceMeta::new("Node", &[Field::new("id", Type::named("ID"))]).into_meta(),
                InterfaceMeta::new("Resource", &[Field::new("id", Type::named("ID"))])
                    .interfaces(&["Node"])
                    .into_meta(),
                ObjectMeta::new("Image", &[Field::new("id", Type::named("ID"))])
                    .interfaces(&["Resource"])
                    .into_meta(),
                InterfaceMeta::new("Loop", &[Field::new("id", Type::named("ID"))])
                    .interfaces(&["Loop"])
                    .into_meta(),
            ],
        );
        assert_eq!(
            errors,
            [
                "Type Image must implement Node because it is implemented by Resource.",
                "Type Loop cannot implement itself because it would create a circular reference.",
            ],
        );
    }

    #[test]
    fn checks_unions_and_enums() {
        let errors = messages(
            Some("Query"),
            vec![
                query_with(Field::new("result", Type::named("Result"))),
                UnionMeta::new("Result", &["Query", "Query", "Flag"]).into_meta(),
                UnionMeta::new("Nothing", &[]).into_meta(),
                EnumMeta::new("Flag", &[EnumValue::new("true")]).into_meta(),
                EnumMeta::new("Empty", &[]).into_meta(),
            ],
        );
        assert_eq!(
            errors,
            [
                "Union type Result can only include type Query once.",
                "Union type Result can only include Object types, it cannot include Flag.",
                "Union type Nothing must define one or more member types.",
                "Enum type Flag cannot include value: true.",
                "Enum type Empty must define one or more values.",
            ],
        );
    }

    #[test]
    fn detects_non_null_input_cycles() {
        let errors = messages(
            Some("Query"),
            vec![
                query_with(
                    Field::new("search", Type::named("Boolean"))
                        .argument(Argument::new("filter", Type::named("Filter"))),
                ),
                InputObjectMeta::new(
                    "Filter",
                    &[
                        Argument::new("and", Type::non_null_named("Other")),
                        Argument::new("self", Type::named("Filter")),
                    ],
                )
                .into_meta(),
                InputObjectMeta::new("Other", &[Argument::new("back", Type::non_null_named("Filter"))])
                    .into_meta(),
            ],
        );
        assert_eq!(
            errors,
            [
                "Cannot reference Input Object \"Filter\" within itself \
                 through a series of non-null fields: \"and.back\".",
            ],
        );
    }

    #[test]
    fn checks_reserved_names_and_deprecations() {
        let errors = messages(
            Some("Query"),
            vec![
                query_with(
                    Field::new("__secret", Type::named("Int")).argument(
                        Argument::new("id", Type::non_null_named("ID")).deprecated(None),
                    ),
                ),
                ObjectMeta::new("__Hidden", &[Field::new("x", Type::named("Int"))]).into_meta(),
            ],
        );
        assert_eq!(
            errors,
            [
                "Name \"__secret\" must not begin with \"__\", \
                 which is reserved by GraphQL introspection.",
                "Required argument Query.__secret(id:) cannot be deprecated.",
                "Name \"__Hidden\" must not begin with \"__\", \
                 which is reserved by GraphQL introspection.",
            ],
        );
    }

    #[test]
    fn checks_directives_and_duplicates() {
        let schema = SchemaType::new(SchemaConfig {
            query: Some("Query".into()),
            types: vec![
                Arc::new(query_with(Field::new("a", Type::named("Int")))),
                Arc::new(ObjectMeta::new("Twice", &[]).into_meta()),
                Arc::new(ObjectMeta::new("Twice", &[]).into_meta()),
            ],
            directives: Some(vec![
                DirectiveType::new("nowhere", &[], &[], false),
                DirectiveType::new(
                    "cached",
                    &[DirectiveLocation::Field],
                    &[Argument::new("ttl", Type::named("Query"))],
                    false,
                ),
            ]),
            ..SchemaConfig::default()
        });
        let errors = schema
            .validate()
            .into_iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>();

        assert_eq!(
            errors,
            [
                "Schema must contain uniquely named types but contains multiple types named \
                 \"Twice\".",
                "Directive @nowhere must include 1 or more locations.",
                "The type of @cached(ttl:) must be Input Type but got: Query.",
                "Type Twice must define one or more fields.",
            ],
        );
    }
}
