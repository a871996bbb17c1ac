//! Reconstruction of a schema out of an introspection result

use std::sync::Arc;

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use fnv::FnvBuildHasher;
use indexmap::IndexMap;
use itertools::Itertools as _;
use serde::Deserialize;

use crate::{
    ast::Type,
    introspection::{
        self, MAX_TYPE_REF_DEPTH,
        records::{
            IntrospectionDirective, IntrospectionEnumValue, IntrospectionField,
            IntrospectionInputValue, IntrospectionNamedTypeRef, IntrospectionQuery,
            IntrospectionSchema, IntrospectionType, IntrospectionTypeRef, name_summary,
        },
    },
    parser::parse_value_source,
    schema::{
        meta::{
            Argument, DeprecationStatus, EnumMeta, EnumValue, Field, InputObjectMeta,
            InterfaceMeta, MetaType, ObjectMeta, ScalarMeta, UnionMeta, builtin_scalar,
        },
        model::{DirectiveType, SchemaConfig, SchemaType},
        validate::SchemaError,
    },
    types::{base::TypeKind, utilities::validate_literal_value},
};

/// Options of [`build_client_schema()`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildClientSchemaOptions {
    /// Trust the introspection result to describe a valid schema, and skip
    /// [`SchemaType::validate()`] on the built one.
    ///
    /// The structural checks of the introspection result are always done.
    pub assume_valid: bool,
}

/// Reason an introspection result can't be turned into a schema.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum IntrospectionError {
    /// The result is not an object with a `__schema` object in it.
    #[display(
        "Invalid or incomplete introspection result. Ensure that you are passing \"data\" \
         property of introspection response and no \"errors\" was returned alongside: {_0}."
    )]
    InvalidRoot(#[error(not(source))] String),

    /// The `__schema` object doesn't have the shape of an introspection
    /// result.
    #[display("Malformed introspection result: {_0}.")]
    Malformed(#[error(not(source))] String),

    /// A type record has a wrapper kind.
    #[display(
        "Invalid or incomplete introspection result. Ensure that a full introspection query is \
         used in order to build a client schema: {_0}."
    )]
    UnknownKind(#[error(not(source))] String),

    /// A section required by the kind of a record is absent.
    #[display("Introspection result missing {section}: {record}.")]
    MissingSection {
        /// Name of the section, e.g. `fields` or `directive locations`.
        section: &'static str,
        /// Abbreviated enclosing record.
        record: String,
    },

    /// A named type reference without a name.
    #[display("Unknown type reference: {_0}.")]
    UnknownTypeReference(#[error(not(source))] String),

    /// A reference to a type that has no record.
    #[display(
        "Invalid or incomplete schema, unknown type: {_0}. Ensure that a full introspection \
         query is used in order to build a client schema."
    )]
    UnknownType(#[error(not(source))] String),

    /// More wrappers than the introspection query asks for, or a wrapper
    /// without `ofType`.
    #[display("Decorated type deeper than introspection query.")]
    TooDeep,

    /// A `NON_NULL` directly wrapping another `NON_NULL`.
    #[display("Expected {_0} to be a GraphQL nullable type.")]
    NullableExpected(#[error(not(source))] String),

    /// A field of an input-only type.
    #[display("Introspection must provide output type for fields, but received: {_0}.")]
    OutputTypeExpected(#[error(not(source))] String),

    /// An argument or input field of an output-only type.
    #[display("Introspection must provide input type for arguments, but received: {_0}.")]
    InputTypeExpected(#[error(not(source))] String),

    /// A root type or union member that is not an object type.
    #[display("Expected {_0} to be a GraphQL Object type.")]
    ObjectTypeExpected(#[error(not(source))] String),

    /// An implemented type that is not an interface.
    #[display("Expected {_0} to be a GraphQL Interface type.")]
    InterfaceTypeExpected(#[error(not(source))] String),

    /// A default value that doesn't parse, or doesn't fit its type.
    #[display("Invalid default value {value} for {coordinate}: {reason}.")]
    InvalidDefaultValue {
        /// Schema coordinate, e.g. `Query.dogs(first:)`.
        coordinate: String,
        /// The literal as given.
        value: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The built schema is not consistent.
    #[display("{}", _0.iter().join("\n"))]
    InvalidSchema(#[error(not(source))] Vec<SchemaError>),
}

/// Builds a schema for a client out of the `data` of a response to the
/// introspection query.
///
/// The schema has no resolvers, only its types and directives. Enum values
/// keep nothing but their names.
///
/// # Errors
///
/// If the introspection result is incomplete or inconsistent. No partial
/// schema is ever returned.
pub fn build_client_schema(
    introspection: &serde_json::Value,
    options: &BuildClientSchemaOptions,
) -> Result<SchemaType, IntrospectionError> {
    let schema = introspection
        .as_object()
        .and_then(|o| o.get("__schema"))
        .filter(|s| s.is_object())
        .ok_or_else(|| IntrospectionError::InvalidRoot(introspection.to_string()))?;
    let schema = IntrospectionSchema::deserialize(schema)
        .map_err(|e| IntrospectionError::Malformed(e.to_string()))?;

    build_client_schema_from_query(
        &IntrospectionQuery { schema },
        options,
    )
}

/// [`build_client_schema()`] out of already deserialized records.
///
/// # Errors
///
/// If the records are incomplete or inconsistent.
pub fn build_client_schema_from_query(
    query: &IntrospectionQuery,
    options: &BuildClientSchemaOptions,
) -> Result<SchemaType, IntrospectionError> {
    crate::__schema_span!("build_client_schema");

    let record = &query.schema;
    crate::__schema_trace!("building client schema out of {} type records", record.types.len());

    let mut builder = ClientSchemaBuilder::new(&record.types);
    let types = builder.build_types()?;

    let root = |r: &Option<IntrospectionNamedTypeRef>| -> Result<Option<ArcStr>, _> {
        let Some(IntrospectionNamedTypeRef { name, .. }) = r else {
            return Ok(None);
        };
        match builder.kind_of(name)? {
            TypeKind::Object => Ok(Some(name.as_str().into())),
            _ => Err(IntrospectionError::ObjectTypeExpected(name.clone())),
        }
    };
    let query_type = root(&record.query_type)?;
    let mutation_type = root(&record.mutation_type)?;
    let subscription_type = root(&record.subscription_type)?;

    let directives = record
        .directives
        .iter()
        .map(|d| builder.build_directive(d))
        .collect::<Result<Vec<_>, _>>()?;

    let schema = SchemaType::new(SchemaConfig {
        description: record.description.as_deref().map(Into::into),
        query: query_type,
        mutation: mutation_type,
        subscription: subscription_type,
        types,
        directives: Some(directives),
        assume_valid: options.assume_valid,
    });

    check_default_values(&schema)?;

    if !options.assume_valid {
        let errors = schema.validate();
        if !errors.is_empty() {
            crate::__schema_debug!("client schema is invalid: {}", errors.len());
            return Err(IntrospectionError::InvalidSchema(errors));
        }
    }

    Ok(schema)
}

/// State of a named type record during building.
enum Slot<'r> {
    Pending(&'r IntrospectionType),
    /// The type is being built, only its kind is known.
    Building(TypeKind),
    Built(Arc<MetaType>),
}

/// Builds named types out of their records.
///
/// Types refer to each other by name, so building one never requires
/// another one to be built: references only look up the kind of the
/// referenced record, which is known in every [`Slot`] state. Cyclic and
/// self-referencing types need no special treatment.
struct ClientSchemaBuilder<'r> {
    slots: IndexMap<&'r str, Slot<'r>, FnvBuildHasher>,
}

impl<'r> ClientSchemaBuilder<'r> {
    fn new(records: &'r [IntrospectionType]) -> Self {
        let mut slots = IndexMap::<_, _, FnvBuildHasher>::default();
        for record in records {
            let name = record.name.as_str();
            let shared = match record.kind {
                TypeKind::Scalar => builtin_scalar(name),
                _ => introspection::type_by_name(name),
            }
            .filter(|t| t.type_kind() == record.kind);

            let slot = match shared {
                Some(t) => Slot::Built(t.clone()),
                None => Slot::Pending(record),
            };
            slots.insert(name, slot);
        }
        Self { slots }
    }

    fn build_types(&mut self) -> Result<Vec<Arc<MetaType>>, IntrospectionError> {
        for idx in 0..self.slots.len() {
            let Some((_, slot)) = self.slots.get_index_mut(idx) else {
                continue;
            };
            let Slot::Pending(record) = *slot else {
                continue;
            };
            *slot = Slot::Building(record.kind);

            let built = Arc::new(self.build_type(record)?);
            if let Some((_, slot)) = self.slots.get_index_mut(idx) {
                *slot = Slot::Built(built);
            }
        }

        Ok(self
            .slots
            .values()
            .filter_map(|s| match s {
                Slot::Built(t) => Some(t.clone()),
                Slot::Pending(_) | Slot::Building(_) => None,
            })
            .collect())
    }

    /// Kind of the named type `name`, whatever the state of its slot.
    fn kind_of(&self, name: &str) -> Result<TypeKind, IntrospectionError> {
        match self.slots.get(name) {
            Some(Slot::Pending(record)) => Ok(record.kind),
            Some(Slot::Building(kind)) => Ok(*kind),
            Some(Slot::Built(t)) => Ok(t.type_kind()),
            None => Err(IntrospectionError::UnknownType(name.into())),
        }
    }

    /// Decodes a type reference, unwrapping `LIST` and `NON_NULL` wrappers
    /// iteratively, and returns it with the kind of the named type inside.
    fn decode(
        &self,
        type_ref: &IntrospectionTypeRef,
    ) -> Result<(Type<'static>, TypeKind), IntrospectionError> {
        let mut wrappers = vec![];
        let mut current = type_ref;
        while !current.kind.is_named() {
            if wrappers.len() == MAX_TYPE_REF_DEPTH {
                return Err(IntrospectionError::TooDeep);
            }
            wrappers.push(current.kind);
            current = current
                .of_type
                .as_deref()
                .ok_or(IntrospectionError::TooDeep)?;
        }

        let name = current
            .name
            .as_deref()
            .ok_or_else(|| IntrospectionError::UnknownTypeReference(current.summary().to_string()))?;
        let kind = self.kind_of(name)?;

        let mut ty = Type::named(name.to_owned());
        for wrapper in wrappers.into_iter().rev() {
            ty = match wrapper {
                TypeKind::NonNull if ty.is_non_null() => {
                    return Err(IntrospectionError::NullableExpected(ty.to_string()));
                }
                TypeKind::NonNull => ty.wrap_non_null(),
                _ => ty.wrap_list(),
            };
        }
        Ok((ty, kind))
    }

    fn output_type(&self, type_ref: &IntrospectionTypeRef) -> Result<Type<'static>, IntrospectionError> {
        let (ty, kind) = self.decode(type_ref)?;
        match kind {
            TypeKind::InputObject => Err(IntrospectionError::OutputTypeExpected(ty.to_string())),
            _ => Ok(ty),
        }
    }

    fn input_type(&self, type_ref: &IntrospectionTypeRef) -> Result<Type<'static>, IntrospectionError> {
        let (ty, kind) = self.decode(type_ref)?;
        match kind {
            TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject => Ok(ty),
            _ => Err(IntrospectionError::InputTypeExpected(ty.to_string())),
        }
    }

    /// Name of a referenced type that must be a named type of the `expected`
    /// kind.
    fn named_of_kind(
        &self,
        type_ref: &IntrospectionTypeRef,
        expected: TypeKind,
    ) -> Result<ArcStr, IntrospectionError> {
        let (ty, kind) = self.decode(type_ref)?;
        match &ty {
            Type::Named(n) if kind == expected => return Ok(n.as_ref().into()),
            _ => {}
        }
        Err(match expected {
            TypeKind::Interface => IntrospectionError::InterfaceTypeExpected(ty.to_string()),
            _ => IntrospectionError::ObjectTypeExpected(ty.to_string()),
        })
    }

    fn build_type(&self, record: &'r IntrospectionType) -> Result<MetaType, IntrospectionError> {
        let missing = |section| IntrospectionError::MissingSection {
            section,
            record: record.summary().to_string(),
        };

        Ok(match record.kind {
            TypeKind::Scalar => MetaType::Scalar(ScalarMeta {
                name: record.name.as_str().into(),
                description: record.description.as_deref().map(Into::into),
                specified_by_url: record.specified_by_url.as_deref().map(Into::into),
            }),
            TypeKind::Object | TypeKind::Interface => {
                let interface_names = self.build_implementations(record)?;
                let fields = record
                    .fields
                    .as_ref()
                    .ok_or_else(|| missing("fields"))?
                    .iter()
                    .map(|f| self.build_field(f))
                    .collect::<Result<Vec<_>, _>>()?;
                let name = record.name.as_str().into();
                let description = record.description.as_deref().map(Into::into);
                if record.kind == TypeKind::Object {
                    MetaType::Object(ObjectMeta {
                        name,
                        description,
                        fields,
                        interface_names,
                    })
                } else {
                    MetaType::Interface(InterfaceMeta {
                        name,
                        description,
                        fields,
                        interface_names,
                    })
                }
            }
            TypeKind::Union => MetaType::Union(UnionMeta {
                name: record.name.as_str().into(),
                description: record.description.as_deref().map(Into::into),
                of_type_names: record
                    .possible_types
                    .as_ref()
                    .ok_or_else(|| missing("possibleTypes"))?
                    .iter()
                    .map(|r| self.named_of_kind(r, TypeKind::Object))
                    .collect::<Result<_, _>>()?,
            }),
            TypeKind::Enum => MetaType::Enum(EnumMeta {
                name: record.name.as_str().into(),
                description: record.description.as_deref().map(Into::into),
                values: record
                    .enum_values
                    .as_ref()
                    .ok_or_else(|| missing("enumValues"))?
                    .iter()
                    .map(build_enum_value)
                    .collect(),
            }),
            TypeKind::InputObject => MetaType::InputObject(InputObjectMeta {
                name: record.name.as_str().into(),
                description: record.description.as_deref().map(Into::into),
                input_fields: record
                    .input_fields
                    .as_ref()
                    .ok_or_else(|| missing("inputFields"))?
                    .iter()
                    .map(|f| self.build_input_value(f))
                    .collect::<Result<_, _>>()?,
            }),
            TypeKind::List | TypeKind::NonNull => {
                return Err(IntrospectionError::UnknownKind(record.summary().to_string()));
            }
        })
    }

    /// Names of the interfaces implemented by an object or interface record.
    ///
    /// `interfaces: null` is only tolerated on INTERFACE records: servers
    /// predating interfaces of interfaces report it there, whereas every
    /// server lists the interfaces of its object types, so a `null` on an
    /// OBJECT record means the introspection result is truncated.
    ///
    /// An interface listing itself is rejected here rather than left to
    /// schema validation, so `assume_valid` doesn't let it through.
    fn build_implementations(
        &self,
        record: &'r IntrospectionType,
    ) -> Result<Vec<ArcStr>, IntrospectionError> {
        let interfaces = match &record.interfaces {
            Some(Some(interfaces)) => interfaces.as_slice(),
            Some(None) if record.kind == TypeKind::Interface => &[],
            _ => {
                return Err(IntrospectionError::MissingSection {
                    section: "interfaces",
                    record: record.summary().to_string(),
                });
            }
        };
        interfaces
            .iter()
            .map(|r| {
                let name = self.named_of_kind(r, TypeKind::Interface)?;
                if record.name == name.as_str() {
                    return Err(IntrospectionError::InterfaceTypeExpected(name.to_string()));
                }
                Ok(name)
            })
            .collect()
    }

    fn build_field(&self, record: &IntrospectionField) -> Result<Field, IntrospectionError> {
        let field_type = self.output_type(&record.field_type)?;
        let arguments = record
            .args
            .as_ref()
            .ok_or_else(|| IntrospectionError::MissingSection {
                section: "field args",
                record: name_summary(&record.name).to_string(),
            })?
            .iter()
            .map(|a| self.build_input_value(a))
            .collect::<Result<_, _>>()?;

        Ok(Field {
            name: record.name.as_str().into(),
            description: record.description.as_deref().map(Into::into),
            arguments,
            field_type,
            deprecation_status: deprecation_status(
                record.is_deprecated,
                record.deprecation_reason.as_deref(),
            ),
        })
    }

    fn build_input_value(
        &self,
        record: &IntrospectionInputValue,
    ) -> Result<Argument, IntrospectionError> {
        let arg_type = self.input_type(&record.value_type)?;
        let default_value = record
            .default_value
            .as_deref()
            .map(|literal| {
                parse_value_source(literal)
                    .map(|v| v.item)
                    .map_err(|e| IntrospectionError::InvalidDefaultValue {
                        coordinate: record.name.clone(),
                        value: literal.into(),
                        reason: e.item.to_string(),
                    })
            })
            .transpose()?;

        Ok(Argument {
            name: record.name.as_str().into(),
            description: record.description.as_deref().map(Into::into),
            arg_type,
            default_value,
            deprecation_status: deprecation_status(
                record.is_deprecated,
                record.deprecation_reason.as_deref(),
            ),
        })
    }

    fn build_directive(
        &self,
        record: &IntrospectionDirective,
    ) -> Result<DirectiveType, IntrospectionError> {
        let missing = |section| IntrospectionError::MissingSection {
            section,
            record: name_summary(&record.name).to_string(),
        };
        let arguments = record
            .args
            .as_ref()
            .ok_or_else(|| missing("directive args"))?
            .iter()
            .map(|a| self.build_input_value(a))
            .collect::<Result<_, _>>()?;
        let locations = record
            .locations
            .clone()
            .ok_or_else(|| missing("directive locations"))?;

        Ok(DirectiveType {
            name: record.name.as_str().into(),
            description: record.description.as_deref().map(Into::into),
            locations,
            arguments,
            is_repeatable: record.is_repeatable,
        })
    }
}

fn build_enum_value(record: &IntrospectionEnumValue) -> EnumValue {
    EnumValue {
        name: record.name.as_str().into(),
        description: record.description.as_deref().map(Into::into),
        deprecation_status: deprecation_status(
            record.is_deprecated,
            record.deprecation_reason.as_deref(),
        ),
    }
}

fn deprecation_status(is_deprecated: bool, reason: Option<&str>) -> DeprecationStatus {
    if is_deprecated || reason.is_some() {
        DeprecationStatus::Deprecated(reason.map(Into::into))
    } else {
        DeprecationStatus::Current
    }
}

/// Checks every parsed default value against the type it's the default of.
fn check_default_values(schema: &SchemaType) -> Result<(), IntrospectionError> {
    for t in schema.concrete_type_list() {
        if t.is_builtin() {
            continue;
        }
        for field in t.fields() {
            for arg in &field.arguments {
                check_default_value(schema, arg, || {
                    format!("{}.{}({}:)", t.name(), field.name, arg.name)
                })?;
            }
        }
        if let MetaType::InputObject(InputObjectMeta { input_fields, .. }) = t {
            for arg in input_fields {
                check_default_value(schema, arg, || format!("{}.{}", t.name(), arg.name))?;
            }
        }
    }
    for directive in schema.directive_list() {
        for arg in &directive.arguments {
            check_default_value(schema, arg, || {
                format!("@{}({}:)", directive.name, arg.name)
            })?;
        }
    }
    Ok(())
}

fn check_default_value(
    schema: &SchemaType,
    arg: &Argument,
    coordinate: impl FnOnce() -> String,
) -> Result<(), IntrospectionError> {
    let Some(value) = &arg.default_value else {
        return Ok(());
    };
    // Unknown types are reported by schema validation.
    let Some(arg_type) = schema.make_type(&arg.arg_type) else {
        return Ok(());
    };
    match validate_literal_value(schema, &arg_type, value) {
        None => Ok(()),
        Some(reason) => Err(IntrospectionError::InvalidDefaultValue {
            coordinate: coordinate(),
            value: value.to_string(),
            reason,
        }),
    }
}
