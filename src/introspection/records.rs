//! Wire shape of an introspection result
//!
//! Sections that only some kinds of types carry are optional, so that a
//! malformed result still deserializes and can be reported precisely.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{schema::model::DirectiveLocation, types::base::TypeKind};

/// The `data` of a response to the introspection query.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IntrospectionQuery {
    #[expect(missing_docs, reason = "self-explanatory")]
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

/// Introspection of a whole schema.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[expect(missing_docs, reason = "self-explanatory")]
pub struct IntrospectionSchema {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub query_type: Option<IntrospectionNamedTypeRef>,
    #[serde(default)]
    pub mutation_type: Option<IntrospectionNamedTypeRef>,
    #[serde(default)]
    pub subscription_type: Option<IntrospectionNamedTypeRef>,
    pub types: Vec<IntrospectionType>,
    #[serde(default, deserialize_with = "default_for_null")]
    pub directives: Vec<IntrospectionDirective>,
}

/// Reference to a root operation type.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IntrospectionNamedTypeRef {
    /// Older introspection queries only ask for the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TypeKind>,
    #[expect(missing_docs, reason = "self-explanatory")]
    pub name: String,
}

/// Introspection of a named type.
///
/// Which of the optional sections must be present depends on the `kind`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[expect(missing_docs, reason = "self-explanatory")]
pub struct IntrospectionType {
    pub kind: TypeKind,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "specifiedByURL", alias = "specifiedByUrl")]
    pub specified_by_url: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<IntrospectionField>>,
    /// `None` if absent, `Some(None)` if `null`.
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub interfaces: Option<Option<Vec<IntrospectionTypeRef>>>,
    #[serde(default)]
    pub possible_types: Option<Vec<IntrospectionTypeRef>>,
    #[serde(default)]
    pub enum_values: Option<Vec<IntrospectionEnumValue>>,
    #[serde(default)]
    pub input_fields: Option<Vec<IntrospectionInputValue>>,
}

/// Introspection of a field of an object or an interface.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[expect(missing_docs, reason = "self-explanatory")]
pub struct IntrospectionField {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<IntrospectionInputValue>>,
    #[serde(rename = "type")]
    pub field_type: IntrospectionTypeRef,
    #[serde(default, deserialize_with = "default_for_null")]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

/// Introspection of an argument or of an input field.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[expect(missing_docs, reason = "self-explanatory")]
pub struct IntrospectionInputValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub value_type: IntrospectionTypeRef,
    /// Printed as a GraphQL literal.
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default, deserialize_with = "default_for_null")]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

/// Introspection of an enum value.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[expect(missing_docs, reason = "self-explanatory")]
pub struct IntrospectionEnumValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "default_for_null")]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

/// Introspection of a directive.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[expect(missing_docs, reason = "self-explanatory")]
pub struct IntrospectionDirective {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "default_for_null")]
    pub is_repeatable: bool,
    #[serde(default)]
    pub locations: Option<Vec<DirectiveLocation>>,
    #[serde(default)]
    pub args: Option<Vec<IntrospectionInputValue>>,
}

/// Reference to a possibly wrapped type.
///
/// Named references carry a `name`, `LIST` and `NON_NULL` ones an `ofType`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[expect(missing_docs, reason = "self-explanatory")]
pub struct IntrospectionTypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<IntrospectionTypeRef>>,
}

impl IntrospectionTypeRef {
    /// Reference to the named type `name` of the given `kind`.
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            of_type: None,
        }
    }

    /// Wraps `inner` into a `LIST` or `NON_NULL` reference.
    pub fn wrapping(kind: TypeKind, inner: Self) -> Self {
        Self {
            kind,
            name: None,
            of_type: Some(Box::new(inner)),
        }
    }
}

/// Abbreviated form of a record, used in error messages.
pub(crate) struct Summary<'r> {
    pub(crate) kind: Option<TypeKind>,
    pub(crate) name: Option<&'r str>,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        if let Some(kind) = self.kind {
            write!(f, "kind: \"{kind}\"")?;
            if self.name.is_some() {
                f.write_str(", ")?;
            }
        }
        if let Some(name) = self.name {
            write!(f, "name: \"{name}\"")?;
        }
        f.write_str(" }")
    }
}

impl IntrospectionType {
    pub(crate) fn summary(&self) -> Summary<'_> {
        Summary {
            kind: Some(self.kind),
            name: Some(&self.name),
        }
    }
}

impl IntrospectionTypeRef {
    pub(crate) fn summary(&self) -> Summary<'_> {
        Summary {
            kind: Some(self.kind),
            name: self.name.as_deref(),
        }
    }
}

pub(crate) fn name_summary(name: &str) -> Summary<'_> {
    Summary {
        kind: None,
        name: Some(name),
    }
}

fn default_for_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keeps an explicit `null` apart from an absent field, which `default`
/// turns into `None`.
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::types::base::TypeKind;

    use super::{IntrospectionType, IntrospectionTypeRef, name_summary};

    #[test]
    fn tells_null_interfaces_from_absent_ones() {
        let null: IntrospectionType = serde_json::from_value(json!({
            "kind": "INTERFACE",
            "name": "Node",
            "fields": [],
            "interfaces": null,
        }))
        .unwrap();
        let absent: IntrospectionType = serde_json::from_value(json!({
            "kind": "INTERFACE",
            "name": "Node",
            "fields": [],
        }))
        .unwrap();

        assert_eq!(null.interfaces, Some(None));
        assert_eq!(absent.interfaces, None);
    }

    #[test]
    fn reads_type_refs() {
        let r: IntrospectionTypeRef = serde_json::from_value(json!({
            "kind": "NON_NULL",
            "name": null,
            "ofType": {"kind": "SCALAR", "name": "String", "ofType": null},
        }))
        .unwrap();

        assert_eq!(
            r,
            IntrospectionTypeRef::wrapping(
                TypeKind::NonNull,
                IntrospectionTypeRef::named(TypeKind::Scalar, "String"),
            ),
        );
    }

    #[test]
    fn accepts_both_specified_by_spellings() {
        for key in ["specifiedByURL", "specifiedByUrl"] {
            let t: IntrospectionType = serde_json::from_value(json!({
                "kind": "SCALAR",
                "name": "Url",
                key: "https://url.spec.whatwg.org",
            }))
            .unwrap();
            assert_eq!(t.specified_by_url.as_deref(), Some("https://url.spec.whatwg.org"));
        }
    }

    #[test]
    fn summarizes_records() {
        let t: IntrospectionType =
            serde_json::from_value(json!({"kind": "OBJECT", "name": "Dog"})).unwrap();
        assert_eq!(t.summary().to_string(), r#"{ kind: "OBJECT", name: "Dog" }"#);
        assert_eq!(name_summary("bark").to_string(), r#"{ name: "bark" }"#);
    }
}
