use std::{borrow::Cow, fmt, slice};

use crate::{parser::Spanning, schema::model::DirectiveLocation, value::ScalarValue};

/// A type literal in the syntax tree
///
/// This enum carries no semantic information and might refer to types that do
/// not exist. A non-null type can never wrap another non-null type.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Type<'a> {
    /// A nullable named type, e.g. `String`
    Named(Cow<'a, str>),
    /// A nullable list type, e.g. `[String]`
    ///
    /// The list itself is what's nullable, the containing type might be non-null.
    List(Box<Type<'a>>),
    /// A non-null named type, e.g. `String!`
    NonNullNamed(Cow<'a, str>),
    /// A non-null list type, e.g. `[String]!`.
    ///
    /// The list itself is what's non-null, the containing type might be null.
    NonNullList(Box<Type<'a>>),
}

impl<'a> Type<'a> {
    /// Nullable named type.
    pub fn named(name: impl Into<Cow<'a, str>>) -> Self {
        Self::Named(name.into())
    }

    /// Non-null named type.
    pub fn non_null_named(name: impl Into<Cow<'a, str>>) -> Self {
        Self::NonNullNamed(name.into())
    }

    /// Wraps this type into a nullable list.
    #[must_use]
    pub fn wrap_list(self) -> Self {
        Self::List(Box::new(self))
    }

    /// Makes this type non-null. Already non-null types are returned as is.
    #[must_use]
    pub fn wrap_non_null(self) -> Self {
        match self {
            Self::Named(n) => Self::NonNullNamed(n),
            Self::List(l) => Self::NonNullList(l),
            t => t,
        }
    }

    /// Strips the outermost non-null marker, if any.
    #[must_use]
    pub fn nullable(&self) -> Self {
        match self {
            Self::NonNullNamed(n) => Self::Named(n.clone()),
            Self::NonNullList(l) => Self::List(l.clone()),
            t => t.clone(),
        }
    }

    /// Get the name of a named type.
    ///
    /// Only applies to named types; lists will return `None`.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(n) | Self::NonNullNamed(n) => Some(n),
            Self::List(..) | Self::NonNullList(..) => None,
        }
    }

    /// Get the innermost name by unpacking lists
    ///
    /// All type literals contain exactly one named type.
    pub fn innermost_name(&self) -> &str {
        match self {
            Self::Named(n) | Self::NonNullNamed(n) => n,
            Self::List(l) | Self::NonNullList(l) => l.innermost_name(),
        }
    }

    /// Item type of a list type.
    pub fn list_item(&self) -> Option<&Self> {
        match self {
            Self::List(l) | Self::NonNullList(l) => Some(l),
            Self::Named(_) | Self::NonNullNamed(_) => None,
        }
    }

    /// Determines if a type only can represent non-null values.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNullNamed(_) | Self::NonNullList(..))
    }

    /// Number of list and non-null wrappers around the named type.
    pub fn wrapping_depth(&self) -> usize {
        match self {
            Self::Named(_) => 0,
            Self::NonNullNamed(_) => 1,
            Self::List(l) => 1 + l.wrapping_depth(),
            Self::NonNullList(l) => 2 + l.wrapping_depth(),
        }
    }

    /// Detaches this type literal from the source it was parsed from.
    pub fn into_static(self) -> Type<'static> {
        match self {
            Self::Named(n) => Type::Named(Cow::Owned(n.into_owned())),
            Self::NonNullNamed(n) => Type::NonNullNamed(Cow::Owned(n.into_owned())),
            Self::List(l) => Type::List(Box::new(l.into_static())),
            Self::NonNullList(l) => Type::NonNullList(Box::new(l.into_static())),
        }
    }
}

impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::NonNullNamed(n) => write!(f, "{n}!"),
            Self::List(t) => write!(f, "[{t}]"),
            Self::NonNullList(t) => write!(f, "[{t}]!"),
        }
    }
}

/// A JSON-like literal value, as written in a document. These are _not_
/// constant and might contain variables.
///
/// Lists and objects variants are _spanned_, i.e. they contain a reference to
/// their position in the source file, if available.
#[derive(Clone, Debug, PartialEq)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum InputValue {
    Null,
    Scalar(ScalarValue),
    Enum(String),
    Variable(String),
    List(Vec<Spanning<InputValue>>),
    Object(Vec<(Spanning<String>, Spanning<InputValue>)>),
}

impl InputValue {
    /// Construct a `null` value.
    pub fn null() -> Self {
        Self::Null
    }

    /// Construct a scalar value
    pub fn scalar<T: Into<ScalarValue>>(v: T) -> Self {
        Self::Scalar(v.into())
    }

    /// Construct an enum value.
    pub fn enum_value<T: AsRef<str>>(s: T) -> Self {
        Self::Enum(s.as_ref().into())
    }

    /// Construct a variable value.
    pub fn variable<T: AsRef<str>>(v: T) -> Self {
        Self::Variable(v.as_ref().into())
    }

    /// Construct a [`Spanning::unlocated`] list.
    pub fn list(l: Vec<Self>) -> Self {
        Self::List(l.into_iter().map(Spanning::unlocated).collect())
    }

    /// Construct a located list.
    pub fn parsed_list(l: Vec<Spanning<Self>>) -> Self {
        Self::List(l)
    }

    /// Construct a [`Spanning::unlocated`] object, keeping the order of the
    /// given fields.
    pub fn object<K: AsRef<str>>(o: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Object(
            o.into_iter()
                .map(|(k, v)| {
                    (
                        Spanning::unlocated(k.as_ref().into()),
                        Spanning::unlocated(v),
                    )
                })
                .collect(),
        )
    }

    /// Construct a located object.
    pub fn parsed_object(o: Vec<(Spanning<String>, Spanning<Self>)>) -> Self {
        Self::Object(o)
    }

    /// Does the value represent a `null`?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Does the value represent a variable?
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// View the underlying enum value, if present.
    pub fn as_enum_value(&self) -> Option<&str> {
        match self {
            Self::Enum(e) => Some(e.as_str()),
            _ => None,
        }
    }

    /// View the underlying scalar value, if present.
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// View the underlying string value, if present.
    pub fn as_string_value(&self) -> Option<&str> {
        self.as_scalar().and_then(ScalarValue::as_str)
    }

    /// Borrows the fields of an object value, in source order.
    pub fn to_object_value(&self) -> Option<Vec<(&str, &Self)>> {
        match self {
            Self::Object(o) => Some(
                o.iter()
                    .map(|(sk, sv)| (sk.item.as_str(), &sv.item))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Borrows the items of a list value.
    pub fn to_list_value(&self) -> Option<Vec<&Self>> {
        match self {
            Self::List(l) => Some(l.iter().map(|s| &s.item).collect()),
            _ => None,
        }
    }

    /// Recursively finds all variables
    pub fn referenced_variables(&self) -> Vec<&str> {
        match self {
            Self::Variable(name) => vec![name.as_str()],
            Self::List(l) => l
                .iter()
                .flat_map(|v| v.item.referenced_variables())
                .collect(),
            Self::Object(o) => o
                .iter()
                .flat_map(|(_, v)| v.item.referenced_variables())
                .collect(),
            _ => vec![],
        }
    }

    /// Compares equality with another [`InputValue`] ignoring any source
    /// position information.
    pub fn unlocated_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Scalar(s1), Self::Scalar(s2)) => s1 == s2,
            (Self::Enum(s1), Self::Enum(s2)) | (Self::Variable(s1), Self::Variable(s2)) => s1 == s2,
            (Self::List(l1), Self::List(l2)) => {
                l1.len() == l2.len()
                    && l1
                        .iter()
                        .zip(l2.iter())
                        .all(|(v1, v2)| v1.item.unlocated_eq(&v2.item))
            }
            (Self::Object(o1), Self::Object(o2)) => {
                o1.len() == o2.len()
                    && o1.iter().all(|(sk1, sv1)| {
                        o2.iter().any(|(sk2, sv2)| {
                            sk1.item == sk2.item && sv1.item.unlocated_eq(&sv2.item)
                        })
                    })
            }
            _ => false,
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Scalar(s) => write!(f, "{s}"),
            Self::Enum(v) => write!(f, "{v}"),
            Self::Variable(v) => write!(f, "${v}"),
            Self::List(v) => {
                write!(f, "[")?;
                for (i, spanning) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    spanning.item.fmt(f)?;
                }
                write!(f, "]")
            }
            Self::Object(o) => {
                write!(f, "{{")?;
                for (i, (k, v)) in o.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: ", k.item)?;
                    v.item.fmt(f)?;
                }
                write!(f, "}}")
            }
        }
    }
}

macro_rules! impl_input_value_from {
    ($($ty:ty),*) => {$(
        impl From<$ty> for InputValue {
            fn from(v: $ty) -> Self {
                Self::scalar(v)
            }
        }
    )*};
}

impl_input_value_from!(i32, f64, bool, String, &str, ScalarValue);

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct VariableDefinition<'a> {
    pub var_type: Spanning<Type<'a>>,
    pub default_value: Option<Spanning<InputValue>>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct Arguments<'a> {
    pub items: Vec<(Spanning<&'a str>, Spanning<InputValue>)>,
}

impl<'a> Arguments<'a> {
    #[expect(missing_docs, reason = "self-explanatory")]
    pub fn iter(&self) -> slice::Iter<'_, (Spanning<&'a str>, Spanning<InputValue>)> {
        self.items.iter()
    }

    #[expect(missing_docs, reason = "self-explanatory")]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[expect(missing_docs, reason = "self-explanatory")]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Value of the first argument named `key`.
    pub fn get(&self, key: &str) -> Option<&Spanning<InputValue>> {
        self.items.iter().find(|(k, _)| k.item == key).map(|(_, v)| v)
    }
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct VariableDefinitions<'a> {
    pub items: Vec<(Spanning<&'a str>, VariableDefinition<'a>)>,
}

impl<'a> VariableDefinitions<'a> {
    #[expect(missing_docs, reason = "self-explanatory")]
    pub fn iter(&self) -> slice::Iter<'_, (Spanning<&'a str>, VariableDefinition<'a>)> {
        self.items.iter()
    }
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct Field<'a> {
    pub alias: Option<Spanning<&'a str>>,
    pub name: Spanning<&'a str>,
    pub arguments: Option<Spanning<Arguments<'a>>>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
    pub selection_set: Option<Vec<Selection<'a>>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct FragmentSpread<'a> {
    pub name: Spanning<&'a str>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct InlineFragment<'a> {
    pub type_condition: Option<Spanning<&'a str>>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
    pub selection_set: Vec<Selection<'a>>,
}

/// Entry in a GraphQL selection set
///
/// This enum represents one of the three variants of a selection that exists
/// in GraphQL: a field, a fragment spread, or an inline fragment. Each of the
/// variants references their location in the query source.
///
/// ```text
/// {
///   field(withArg: 123) { subField }
///   ...fragmentSpread
///   ...on User {
///     inlineFragmentField
///   }
/// }
/// ```
#[derive(Clone, PartialEq, Debug)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum Selection<'a> {
    Field(Spanning<Field<'a>>),
    FragmentSpread(Spanning<FragmentSpread<'a>>),
    InlineFragment(Spanning<InlineFragment<'a>>),
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct Directive<'a> {
    pub name: Spanning<&'a str>,
    pub arguments: Option<Spanning<Arguments<'a>>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        })
    }
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct Operation<'a> {
    pub operation_type: OperationType,
    pub name: Option<Spanning<&'a str>>,
    pub variable_definitions: Option<Spanning<VariableDefinitions<'a>>>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
    pub selection_set: Vec<Selection<'a>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct Fragment<'a> {
    pub name: Spanning<&'a str>,
    pub type_condition: Spanning<&'a str>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
    pub selection_set: Vec<Selection<'a>>,
}

/// `schema { ... }` or `extend schema { ... }`.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct SchemaDefinition<'a> {
    pub extension: bool,
    pub description: Option<Spanning<String>>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
    pub operation_types: Vec<Spanning<OperationTypeDefinition<'a>>>,
}

/// Single `query: Query` entry of a [`SchemaDefinition`].
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct OperationTypeDefinition<'a> {
    pub operation: OperationType,
    pub named_type: Spanning<&'a str>,
}

/// Definition or extension of a named type.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct TypeDefinition<'a> {
    pub extension: bool,
    pub description: Option<Spanning<String>>,
    pub name: Spanning<&'a str>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
    pub kind: TypeDefinitionKind<'a>,
}

/// Kind-specific body of a [`TypeDefinition`].
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub enum TypeDefinitionKind<'a> {
    Scalar,
    Object {
        interfaces: Vec<Spanning<&'a str>>,
        fields: Vec<Spanning<FieldDefinition<'a>>>,
    },
    Interface {
        interfaces: Vec<Spanning<&'a str>>,
        fields: Vec<Spanning<FieldDefinition<'a>>>,
    },
    Union {
        members: Vec<Spanning<&'a str>>,
    },
    Enum {
        values: Vec<Spanning<EnumValueDefinition<'a>>>,
    },
    InputObject {
        fields: Vec<Spanning<InputValueDefinition<'a>>>,
    },
}

impl TypeDefinitionKind<'_> {
    /// Keyword introducing the definition, e.g. `input`.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Object { .. } => "type",
            Self::Interface { .. } => "interface",
            Self::Union { .. } => "union",
            Self::Enum { .. } => "enum",
            Self::InputObject { .. } => "input",
        }
    }
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct FieldDefinition<'a> {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<&'a str>,
    pub arguments: Vec<Spanning<InputValueDefinition<'a>>>,
    pub field_type: Spanning<Type<'a>>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
}

/// Argument or input field definition.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct InputValueDefinition<'a> {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<&'a str>,
    pub value_type: Spanning<Type<'a>>,
    pub default_value: Option<Spanning<InputValue>>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct EnumValueDefinition<'a> {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<&'a str>,
    pub directives: Option<Vec<Spanning<Directive<'a>>>>,
}

/// `directive @name(...) repeatable on A | B`.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub struct DirectiveDefinition<'a> {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<&'a str>,
    pub arguments: Vec<Spanning<InputValueDefinition<'a>>>,
    pub repeatable: bool,
    pub locations: Vec<Spanning<DirectiveLocation>>,
}

/// Top-level definition of a document.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, PartialEq, Debug)]
pub enum Definition<'a> {
    Operation(Spanning<Operation<'a>>),
    Fragment(Spanning<Fragment<'a>>),
    Schema(Spanning<SchemaDefinition<'a>>),
    Type(Spanning<TypeDefinition<'a>>),
    Directive(Spanning<DirectiveDefinition<'a>>),
}

impl Definition<'_> {
    /// Whether this definition can be executed, i.e. is an operation or a
    /// fragment.
    pub fn is_executable(&self) -> bool {
        matches!(self, Self::Operation(_) | Self::Fragment(_))
    }
}

#[doc(hidden)]
pub type Document<'a> = [Definition<'a>];
#[doc(hidden)]
pub type OwnedDocument<'a> = Vec<Definition<'a>>;
