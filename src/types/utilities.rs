use fnv::FnvHashSet;
use itertools::Itertools as _;

use crate::{
    ast::InputValue,
    schema::{
        meta::{Argument, EnumMeta, InputObjectMeta, MetaType},
        model::{SchemaType, TypeType},
    },
    value::ScalarValue,
};

/// Common error messages used in validation and execution of GraphQL operations.
pub(crate) mod error {
    use std::fmt::Display;

    pub(crate) fn non_null(arg_type: impl Display) -> String {
        format!("\"null\" specified for not nullable type \"{arg_type}\"")
    }

    pub(crate) fn enum_value(arg_value: impl Display, arg_type: impl Display) -> String {
        format!("Invalid value \"{arg_value}\" for enum \"{arg_type}\"")
    }

    pub(crate) fn type_value(arg_value: impl Display, arg_type: impl Display) -> String {
        format!("Invalid value \"{arg_value}\" for type \"{arg_type}\"")
    }

    pub(crate) fn not_input_object(arg_type: impl Display) -> String {
        format!("\"{arg_type}\" is not an input object")
    }

    pub(crate) fn field(
        arg_type: impl Display,
        field_name: impl Display,
        error_message: impl Display,
    ) -> String {
        format!("Error on \"{arg_type}\" field \"{field_name}\": {error_message}")
    }

    pub(crate) fn missing_fields(arg_type: impl Display, missing_fields: impl Display) -> String {
        format!("\"{arg_type}\" is missing fields: {missing_fields}")
    }

    pub(crate) fn unknown_field(arg_type: impl Display, field_name: impl Display) -> String {
        format!("Field \"{field_name}\" does not exist on type \"{arg_type}\"")
    }

    pub(crate) fn list_not_literal() -> String {
        "Input lists are not literals".into()
    }
}

/// Returns an error string if the field is invalid
fn validate_object_field(
    schema: &SchemaType,
    object_type: &TypeType<'_>,
    object_fields: &[Argument],
    field_value: &InputValue,
    field_key: &str,
) -> Option<String> {
    let Some(field) = object_fields.iter().find(|f| f.name == field_key) else {
        return Some(error::unknown_field(object_type, field_key));
    };
    // Unknown field types are reported by schema validation.
    let field_type = schema.make_type(&field.arg_type)?;
    validate_literal_value(schema, &field_type, field_value)
        .map(|e| error::field(object_type, field_key, e))
}

/// Returns an error string if the literal `arg_value` can't be coerced into
/// `arg_type`.
///
/// Variables are accepted anywhere; their usage is checked separately.
pub fn validate_literal_value(
    schema: &SchemaType,
    arg_type: &TypeType<'_>,
    arg_value: &InputValue,
) -> Option<String> {
    match arg_type {
        TypeType::NonNull(inner) => {
            if arg_value.is_null() {
                Some(error::non_null(arg_type))
            } else {
                validate_literal_value(schema, inner, arg_value)
            }
        }
        TypeType::List(inner) => match arg_value {
            InputValue::List(items) => items
                .iter()
                .find_map(|i| validate_literal_value(schema, inner, &i.item)),
            v => validate_literal_value(schema, inner, v),
        },
        TypeType::Concrete(t) => {
            // Even though a string can be coerced into an enum, it is not
            // valid as an enum *literal* in a document.
            if let (InputValue::Scalar(_), MetaType::Enum(_)) = (arg_value, t) {
                return Some(error::enum_value(arg_value, arg_type));
            }

            match arg_value {
                InputValue::Null | InputValue::Variable(_) => None,
                v @ (InputValue::Scalar(_) | InputValue::Enum(_)) => {
                    (!is_valid_leaf_literal(t, v)).then(|| error::type_value(arg_value, arg_type))
                }
                InputValue::List(_) => Some(error::list_not_literal()),
                InputValue::Object(obj) => {
                    let MetaType::InputObject(InputObjectMeta { input_fields, .. }) = t else {
                        return Some(error::not_input_object(arg_type));
                    };

                    let mut remaining_required_fields = input_fields
                        .iter()
                        .filter(|f| f.is_required())
                        .map(|f| f.name.as_str())
                        .collect::<FnvHashSet<_>>();

                    let error_message = obj.iter().find_map(|(key, value)| {
                        remaining_required_fields.remove(key.item.as_str());
                        validate_object_field(schema, arg_type, input_fields, &value.item, &key.item)
                    });
                    if error_message.is_some() {
                        return error_message;
                    }

                    if remaining_required_fields.is_empty() {
                        None
                    } else {
                        let missing_fields = input_fields
                            .iter()
                            .filter(|f| remaining_required_fields.contains(f.name.as_str()))
                            .map(|f| format!("\"{}\"", f.name))
                            .join(", ");
                        Some(error::missing_fields(arg_type, missing_fields))
                    }
                }
            }
        }
    }
}

/// Whether a scalar or enum literal is a valid value of the leaf type `t`.
///
/// Custom scalars accept any scalar literal, since their input coercion is
/// unknown here.
fn is_valid_leaf_literal(t: &MetaType, value: &InputValue) -> bool {
    match t {
        MetaType::Enum(EnumMeta { values, .. }) => value
            .as_enum_value()
            .is_some_and(|v| values.iter().any(|ev| ev.name == v)),
        MetaType::Scalar(s) => {
            let Some(scalar) = value.as_scalar() else {
                return false;
            };
            match s.name.as_str() {
                "Int" => matches!(scalar, ScalarValue::Int(_)),
                "Float" => matches!(scalar, ScalarValue::Int(_) | ScalarValue::Float(_)),
                "String" => matches!(scalar, ScalarValue::String(_)),
                "Boolean" => matches!(scalar, ScalarValue::Boolean(_)),
                "ID" => matches!(scalar, ScalarValue::String(_) | ScalarValue::Int(_)),
                _ => true,
            }
        }
        MetaType::Object(_)
        | MetaType::Interface(_)
        | MetaType::Union(_)
        | MetaType::InputObject(_) => false,
    }
}
