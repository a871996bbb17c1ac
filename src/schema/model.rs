use std::{fmt, sync::Arc, sync::LazyLock};

use arcstr::ArcStr;
use fnv::{FnvBuildHasher, FnvHashSet};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    ast::{InputValue, OperationType, Type},
    introspection::{self, SCHEMA_FIELD, TYPE_FIELD, TYPENAME_FIELD},
    schema::meta::{
        self, Argument, Field, InputObjectMeta, MetaType, UnionMeta, builtin_scalar,
    },
};

/// Everything a [`SchemaType`] is constructed from.
///
/// Root operation types and interfaces are referenced by name; names resolve
/// against [`SchemaConfig::types`], the built-in scalars and the
/// introspection types.
#[derive(Clone, Debug, Default)]
pub struct SchemaConfig {
    /// Description of the schema itself.
    pub description: Option<ArcStr>,

    /// Name of the query root type.
    pub query: Option<ArcStr>,

    /// Name of the mutation root type.
    pub mutation: Option<ArcStr>,

    /// Name of the subscription root type.
    pub subscription: Option<ArcStr>,

    /// Named types of the schema, in the order they should be registered.
    pub types: Vec<Arc<MetaType>>,

    /// Directives of the schema. `None` means the specified directives
    /// (see [`DirectiveType::specified()`]).
    pub directives: Option<Vec<DirectiveType>>,

    /// Skips [`SchemaType::validate()`] where a caller would otherwise run it.
    pub assume_valid: bool,
}

/// Metadata for a schema
///
/// Immutable once constructed.
#[derive(Debug)]
pub struct SchemaType {
    description: Option<ArcStr>,
    types: IndexMap<ArcStr, Arc<MetaType>, FnvBuildHasher>,
    query_type_name: Option<ArcStr>,
    mutation_type_name: Option<ArcStr>,
    subscription_type_name: Option<ArcStr>,
    directives: IndexMap<ArcStr, DirectiveType, FnvBuildHasher>,
    assume_valid: bool,
    duplicate_type_names: Vec<ArcStr>,
}

static_assertions::assert_impl_all!(SchemaType: Send, Sync);

/// Resolved, possibly wrapped, type of a schema
#[derive(Clone, Debug)]
pub enum TypeType<'a> {
    /// A named type.
    Concrete(&'a MetaType),
    /// Never wraps another [`TypeType::NonNull`].
    NonNull(Box<TypeType<'a>>),
    /// A list of the wrapped type.
    List(Box<TypeType<'a>>),
}

/// Directive metadata
#[derive(Clone, Debug)]
pub struct DirectiveType {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub locations: Vec<DirectiveLocation>,
    #[doc(hidden)]
    pub arguments: Vec<Argument>,
    #[doc(hidden)]
    pub is_repeatable: bool,
}

/// Places of a document a directive can be used at.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

impl SchemaType {
    /// Builds a schema out of the given configuration.
    ///
    /// The type registry is collected by walking type references: every
    /// configured type in order (each followed by the types only it reaches),
    /// then the root types, the directive arguments and the introspection
    /// types. Built-in scalars not referenced by anything are left out.
    ///
    /// Construction never fails. Inconsistencies, like references to unknown
    /// types, are reported by [`SchemaType::validate()`].
    pub fn new(config: SchemaConfig) -> Self {
        let SchemaConfig {
            description,
            query,
            mutation,
            subscription,
            types,
            directives,
            assume_valid,
        } = config;

        let mut available = IndexMap::<ArcStr, Arc<MetaType>, FnvBuildHasher>::default();
        let mut duplicate_type_names = vec![];
        for ty in types {
            let ty = shared_builtin(&ty).unwrap_or(ty);
            let name = ty.name().clone();
            match available.get(&name) {
                Some(existing) if !Arc::ptr_eq(existing, &ty) => {
                    if !duplicate_type_names.contains(&name) {
                        duplicate_type_names.push(name);
                    }
                }
                Some(_) => {}
                None => {
                    available.insert(name, ty);
                }
            }
        }

        let directives = directives
            .unwrap_or_else(DirectiveType::specified)
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect::<IndexMap<_, _, FnvBuildHasher>>();

        let mut collector = Collector {
            available: &available,
            reserved: available.keys().cloned().collect(),
            types: IndexMap::default(),
        };
        for ty in available.values() {
            collector.collect_named(ty);
        }
        for root in [&query, &mutation, &subscription].into_iter().flatten() {
            collector.collect_name(root);
        }
        for directive in directives.values() {
            for arg in &directive.arguments {
                collector.collect_name(arg.arg_type.innermost_name());
            }
        }
        collector.collect_named(introspection::schema_type());

        let mut types = collector.types;
        let unreferenced = {
            let referenced = referenced_type_names(&types, &directives);
            types
                .keys()
                .filter(|n| meta::is_builtin_scalar_name(n) && !referenced.contains(n.as_str()))
                .cloned()
                .collect::<Vec<_>>()
        };
        for name in unreferenced {
            types.shift_remove(&name);
        }

        crate::__schema_trace!("built schema with {} types", types.len());

        Self {
            description,
            types,
            query_type_name: query,
            mutation_type_name: mutation,
            subscription_type_name: subscription,
            directives,
            assume_valid,
            duplicate_type_names,
        }
    }

    /// A schema without any user types and roots, knowing only the
    /// introspection types and the specified directives.
    pub fn standard() -> &'static Self {
        static STANDARD: LazyLock<SchemaType> =
            LazyLock::new(|| SchemaType::new(SchemaConfig::default()));
        &STANDARD
    }

    /// Snapshot of the configuration this schema is equivalent to.
    pub fn to_config(&self) -> SchemaConfig {
        SchemaConfig {
            description: self.description.clone(),
            query: self.query_type_name.clone(),
            mutation: self.mutation_type_name.clone(),
            subscription: self.subscription_type_name.clone(),
            types: self.types.values().cloned().collect(),
            directives: Some(self.directives.values().cloned().collect()),
            assume_valid: self.assume_valid,
        }
    }

    /// Description of the schema itself.
    pub fn description(&self) -> Option<&ArcStr> {
        self.description.as_ref()
    }

    /// Whether the schema was declared valid by its creator, so that its
    /// self-validation can be skipped.
    pub fn assume_valid(&self) -> bool {
        self.assume_valid
    }

    /// Get a type by name.
    pub fn type_by_name(&self, name: &str) -> Option<TypeType<'_>> {
        self.concrete_type_by_name(name).map(TypeType::Concrete)
    }

    /// Get a concrete type by name.
    pub fn concrete_type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name).map(|t| &**t)
    }

    /// Get the shared handle of a type by name.
    pub fn shared_type_by_name(&self, name: &str) -> Option<&Arc<MetaType>> {
        self.types.get(name)
    }

    /// Names of the types that are configured more than once with different
    /// definitions.
    pub(crate) fn duplicate_type_names(&self) -> &[ArcStr] {
        &self.duplicate_type_names
    }

    /// Name of the query root type, as configured.
    pub fn query_type_name(&self) -> Option<&ArcStr> {
        self.query_type_name.as_ref()
    }

    /// Name of the mutation root type, as configured.
    pub fn mutation_type_name(&self) -> Option<&ArcStr> {
        self.mutation_type_name.as_ref()
    }

    /// Name of the subscription root type, as configured.
    pub fn subscription_type_name(&self) -> Option<&ArcStr> {
        self.subscription_type_name.as_ref()
    }

    /// Get the query type from the schema.
    pub fn query_type(&self) -> Option<TypeType<'_>> {
        self.concrete_query_type().map(TypeType::Concrete)
    }

    /// Get the concrete query type from the schema.
    pub fn concrete_query_type(&self) -> Option<&MetaType> {
        self.query_type_name
            .as_ref()
            .and_then(|n| self.concrete_type_by_name(n))
    }

    /// Get the mutation type from the schema.
    pub fn mutation_type(&self) -> Option<TypeType<'_>> {
        self.concrete_mutation_type().map(TypeType::Concrete)
    }

    /// Get the concrete mutation type from the schema.
    pub fn concrete_mutation_type(&self) -> Option<&MetaType> {
        self.mutation_type_name
            .as_ref()
            .and_then(|n| self.concrete_type_by_name(n))
    }

    /// Get the subscription type.
    pub fn subscription_type(&self) -> Option<TypeType<'_>> {
        self.concrete_subscription_type().map(TypeType::Concrete)
    }

    /// Get the concrete subscription type.
    pub fn concrete_subscription_type(&self) -> Option<&MetaType> {
        self.subscription_type_name
            .as_ref()
            .and_then(|n| self.concrete_type_by_name(n))
    }

    /// Root type of the given kind of operations, if the schema has one.
    pub fn root_type(&self, operation: OperationType) -> Option<&MetaType> {
        match operation {
            OperationType::Query => self.concrete_query_type(),
            OperationType::Mutation => self.concrete_mutation_type(),
            OperationType::Subscription => self.concrete_subscription_type(),
        }
    }

    /// Get a list of types.
    pub fn type_list(&self) -> Vec<TypeType<'_>> {
        self.types.values().map(|t| TypeType::Concrete(t)).collect()
    }

    /// Get a list of concrete types, in registration order.
    pub fn concrete_type_list(&self) -> Vec<&MetaType> {
        self.types.values().map(|t| &**t).collect()
    }

    /// Make a type.
    ///
    /// Returns `None` if the type literal names a type unknown to this
    /// schema.
    pub fn make_type(&self, t: &Type<'_>) -> Option<TypeType<'_>> {
        Some(match t {
            Type::NonNullNamed(n) => TypeType::NonNull(Box::new(self.type_by_name(n)?)),
            Type::NonNullList(inner) => {
                TypeType::NonNull(Box::new(TypeType::List(Box::new(self.make_type(inner)?))))
            }
            Type::Named(n) => self.type_by_name(n)?,
            Type::List(inner) => TypeType::List(Box::new(self.make_type(inner)?)),
        })
    }

    /// Get a list of directives.
    pub fn directive_list(&self) -> Vec<&DirectiveType> {
        self.directives.values().collect()
    }

    /// Get directive by name.
    pub fn directive_by_name(&self, name: &str) -> Option<&DirectiveType> {
        self.directives.get(name)
    }

    /// Looks up the field `name` of the composite type `parent`, including
    /// the meta fields: `__typename` on every composite type, `__schema`
    /// and `__type` on the query root.
    pub fn lookup_field<'s>(&'s self, parent: &'s MetaType, name: &str) -> Option<&'s Field> {
        match name {
            "__typename" if parent.is_composite() => Some(&*TYPENAME_FIELD),
            "__schema" if self.is_query_root(parent) => Some(&*SCHEMA_FIELD),
            "__type" if self.is_query_root(parent) => Some(&*TYPE_FIELD),
            _ => parent.field_by_name(name),
        }
    }

    fn is_query_root(&self, t: &MetaType) -> bool {
        self.concrete_query_type()
            .is_some_and(|q| std::ptr::eq(q, t))
    }
}

/// Depth-first collection of the types reachable from the roots of a
/// [`SchemaConfig`].
struct Collector<'c> {
    available: &'c IndexMap<ArcStr, Arc<MetaType>, FnvBuildHasher>,
    /// Configured types, which get registered in configuration order rather
    /// than when first reached.
    reserved: FnvHashSet<ArcStr>,
    types: IndexMap<ArcStr, Arc<MetaType>, FnvBuildHasher>,
}

impl Collector<'_> {
    fn collect_name(&mut self, name: &str) {
        if self.types.contains_key(name) {
            return;
        }
        let found = self
            .available
            .get(name)
            .or_else(|| builtin_scalar(name))
            .or_else(|| introspection::type_by_name(name))
            .cloned();
        if let Some(ty) = found {
            self.collect_named(&ty);
        }
    }

    fn collect_named(&mut self, ty: &Arc<MetaType>) {
        let name = ty.name();
        if self.types.contains_key(name) {
            return;
        }
        self.types.insert(name.clone(), ty.clone());
        self.reserved.remove(name);

        let visit = |collector: &mut Self, name: &str| {
            if !collector.reserved.contains(name) {
                collector.collect_name(name);
            }
        };
        match &**ty {
            MetaType::Union(UnionMeta { of_type_names, .. }) => {
                for member in of_type_names {
                    visit(self, member);
                }
            }
            MetaType::Object(_) | MetaType::Interface(_) => {
                for iface in ty.interface_names() {
                    visit(self, iface);
                }
                for field in ty.fields() {
                    visit(self, field.field_type.innermost_name());
                    for arg in &field.arguments {
                        visit(self, arg.arg_type.innermost_name());
                    }
                }
            }
            MetaType::InputObject(InputObjectMeta { input_fields, .. }) => {
                for field in input_fields {
                    visit(self, field.arg_type.innermost_name());
                }
            }
            MetaType::Scalar(_) | MetaType::Enum(_) => {}
        }
    }
}

/// Replaces a configured built-in scalar or introspection type with the
/// shared instance of it.
fn shared_builtin(ty: &Arc<MetaType>) -> Option<Arc<MetaType>> {
    let name = ty.name();
    let shared = match &**ty {
        MetaType::Scalar(_) => builtin_scalar(name),
        _ => introspection::type_by_name(name),
    }?;
    (shared.type_kind() == ty.type_kind()).then(|| shared.clone())
}

fn referenced_type_names<'t>(
    types: &'t IndexMap<ArcStr, Arc<MetaType>, FnvBuildHasher>,
    directives: &'t IndexMap<ArcStr, DirectiveType, FnvBuildHasher>,
) -> FnvHashSet<&'t str> {
    let mut names = FnvHashSet::default();
    for ty in types.values() {
        match &**ty {
            MetaType::Object(_) | MetaType::Interface(_) => {
                for field in ty.fields() {
                    names.insert(field.field_type.innermost_name());
                    names.extend(field.arguments.iter().map(|a| a.arg_type.innermost_name()));
                }
            }
            MetaType::InputObject(InputObjectMeta { input_fields, .. }) => {
                names.extend(input_fields.iter().map(|a| a.arg_type.innermost_name()));
            }
            MetaType::Union(_) | MetaType::Scalar(_) | MetaType::Enum(_) => {}
        }
    }
    for directive in directives.values() {
        names.extend(
            directive
                .arguments
                .iter()
                .map(|a| a.arg_type.innermost_name()),
        );
    }
    names
}

impl<'a> TypeType<'a> {
    /// The named type, if this type is not wrapped.
    #[inline]
    pub fn to_concrete(&self) -> Option<&'a MetaType> {
        match self {
            Self::Concrete(t) => Some(t),
            _ => None,
        }
    }

    /// The named type inside all the wrappers.
    #[inline]
    pub fn innermost_concrete(&self) -> &'a MetaType {
        match self {
            Self::Concrete(t) => t,
            Self::NonNull(n) | Self::List(n) => n.innermost_concrete(),
        }
    }

    /// Item type of a (possibly non-null) list type.
    #[inline]
    pub fn list_contents(&self) -> Option<&TypeType<'a>> {
        match self {
            Self::List(n) => Some(n),
            Self::NonNull(n) => n.list_contents(),
            Self::Concrete(_) => None,
        }
    }

    /// Whether this type is non-null.
    #[inline]
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// This type without its outermost non-null marker.
    #[inline]
    pub fn nullable(&self) -> &TypeType<'a> {
        match self {
            Self::NonNull(n) => n,
            t => t,
        }
    }

    /// Wraps this type into a non-null type, unless it is non-null already.
    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            t @ Self::NonNull(_) => t,
            t => Self::NonNull(Box::new(t)),
        }
    }

    /// Wraps this type into a list type.
    #[must_use]
    pub fn list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Converts back into a type literal.
    pub fn to_type_literal(&self) -> Type<'static> {
        match self {
            Self::Concrete(t) => t.as_type(),
            Self::List(i) => i.to_type_literal().wrap_list(),
            Self::NonNull(i) => i.to_type_literal().wrap_non_null(),
        }
    }

    /// Whether the named type is an input type.
    pub fn is_input(&self) -> bool {
        self.innermost_concrete().is_input()
    }

    /// Whether the named type is an output type.
    pub fn is_output(&self) -> bool {
        self.innermost_concrete().is_output()
    }
}

impl fmt::Display for TypeType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(t) => f.write_str(t.name()),
            Self::List(i) => write!(f, "[{i}]"),
            Self::NonNull(i) => write!(f, "{i}!"),
        }
    }
}

impl DirectiveType {
    /// Builds a new directive.
    pub fn new(
        name: impl Into<ArcStr>,
        locations: &[DirectiveLocation],
        arguments: &[Argument],
        is_repeatable: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            locations: locations.to_vec(),
            arguments: arguments.to_vec(),
            is_repeatable,
        }
    }

    /// The directives every schema supports unless configured otherwise:
    /// `@include`, `@skip`, `@deprecated` and `@specifiedBy`.
    pub fn specified() -> Vec<Self> {
        vec![
            Self::new_include(),
            Self::new_skip(),
            Self::new_deprecated(),
            Self::new_specified_by(),
        ]
    }

    fn new_include() -> Self {
        Self::new(
            "include",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            &[Argument::new("if", Type::non_null_named("Boolean")).description("Included when true.")],
            false,
        )
        .description(
            "Directs the executor to include this field or fragment only when the `if` argument \
             is true.",
        )
    }

    fn new_skip() -> Self {
        Self::new(
            "skip",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            &[Argument::new("if", Type::non_null_named("Boolean")).description("Skipped when true.")],
            false,
        )
        .description(
            "Directs the executor to skip this field or fragment when the `if` argument is true.",
        )
    }

    fn new_deprecated() -> Self {
        Self::new(
            "deprecated",
            &[
                DirectiveLocation::FieldDefinition,
                DirectiveLocation::ArgumentDefinition,
                DirectiveLocation::InputFieldDefinition,
                DirectiveLocation::EnumValue,
            ],
            &[Argument::new("reason", Type::named("String"))
                .description(
                    "Explains why this element was deprecated, usually also including a \
                     suggestion for how to access supported similar data. Formatted using the \
                     Markdown syntax, as specified by [CommonMark](https://commonmark.org/).",
                )
                .default_value(InputValue::scalar("No longer supported"))],
            false,
        )
        .description("Marks an element of a GraphQL schema as no longer supported.")
    }

    fn new_specified_by() -> Self {
        Self::new(
            "specifiedBy",
            &[DirectiveLocation::Scalar],
            &[Argument::new("url", Type::non_null_named("String"))
                .description("The URL that specifies the behavior of this scalar.")],
            false,
        )
        .description("Exposes a URL that specifies the behavior of this scalar.")
    }

    /// Sets the `description` of this directive.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this is one of the directives returned by
    /// [`DirectiveType::specified()`].
    pub fn is_specified(&self) -> bool {
        matches!(
            self.name.as_str(),
            "include" | "skip" | "deprecated" | "specifiedBy",
        )
    }
}

impl DirectiveLocation {
    /// Parses the name a location is written with in documents and
    /// introspection results, e.g. `FIELD_DEFINITION`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "QUERY" => Self::Query,
            "MUTATION" => Self::Mutation,
            "SUBSCRIPTION" => Self::Subscription,
            "FIELD" => Self::Field,
            "FRAGMENT_DEFINITION" => Self::FragmentDefinition,
            "FRAGMENT_SPREAD" => Self::FragmentSpread,
            "INLINE_FRAGMENT" => Self::InlineFragment,
            "VARIABLE_DEFINITION" => Self::VariableDefinition,
            "SCHEMA" => Self::Schema,
            "SCALAR" => Self::Scalar,
            "OBJECT" => Self::Object,
            "FIELD_DEFINITION" => Self::FieldDefinition,
            "ARGUMENT_DEFINITION" => Self::ArgumentDefinition,
            "INTERFACE" => Self::Interface,
            "UNION" => Self::Union,
            "ENUM" => Self::Enum,
            "ENUM_VALUE" => Self::EnumValue,
            "INPUT_OBJECT" => Self::InputObject,
            "INPUT_FIELD_DEFINITION" => Self::InputFieldDefinition,
            _ => return None,
        })
    }

    /// Whether this location is part of an executable document rather than
    /// of a type system definition.
    pub fn is_executable(&self) -> bool {
        matches!(
            self,
            Self::Query
                | Self::Mutation
                | Self::Subscription
                | Self::Field
                | Self::FragmentDefinition
                | Self::FragmentSpread
                | Self::InlineFragment
                | Self::VariableDefinition,
        )
    }
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
            Self::Field => "field",
            Self::FragmentDefinition => "fragment definition",
            Self::FragmentSpread => "fragment spread",
            Self::InlineFragment => "inline fragment",
            Self::VariableDefinition => "variable definition",
            Self::Schema => "schema",
            Self::Scalar => "scalar",
            Self::Object => "object",
            Self::FieldDefinition => "field definition",
            Self::ArgumentDefinition => "argument definition",
            Self::Interface => "interface",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::EnumValue => "enum value",
            Self::InputObject => "input object",
            Self::InputFieldDefinition => "input field definition",
        })
    }
}
