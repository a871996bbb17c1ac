use std::fmt;

use fnv::FnvHashSet;
use itertools::Itertools as _;

use crate::{
    ast::{Definition, Document, InputValue, Type},
    parser::SourcePosition,
    schema::{meta::MetaType, model::SchemaType},
    types::utilities::validate_literal_value,
};

/// Query validation error
///
/// An error carries its message and the source positions of the offending
/// nodes only. No path from the document root to those nodes is recorded:
/// the positions identify them, and rules report while walking, before any
/// response path exists.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct RuleError {
    locations: Vec<SourcePosition>,
    message: String,
}

impl RuleError {
    #[doc(hidden)]
    pub fn new(message: &str, locations: &[SourcePosition]) -> Self {
        Self {
            message: message.into(),
            locations: locations.to_vec(),
        }
    }

    /// Access the message for a validation error
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Access the positions of the validation error
    ///
    /// All validation errors contain at least one source position, but some
    /// validators supply extra context through multiple positions.
    pub fn locations(&self) -> &[SourcePosition] {
        &self.locations
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let locations = self.locations.iter().join(", ");
        write!(f, "{}. At {locations}", self.message)
    }
}

impl std::error::Error for RuleError {}

/// Type of a node under visit: the literal as written, and the named type
/// it resolves to in the schema (if any).
struct TypeFrame<'a> {
    literal: Option<Type<'a>>,
    named: Option<&'a MetaType>,
}

impl<'a> TypeFrame<'a> {
    fn resolve(schema: &'a SchemaType, literal: Option<&Type<'a>>) -> Self {
        Self {
            named: literal.and_then(|t| schema.concrete_type_by_name(t.innermost_name())),
            literal: literal.cloned(),
        }
    }
}

/// State of a single validation run, shared by all the rules.
///
/// Tracks the schema context of the node being visited: the type of the
/// current field, the type owning the current selection set and the
/// expected type of the current input value.
pub struct ValidatorContext<'a> {
    #[doc(hidden)]
    pub schema: &'a SchemaType,
    errors: Vec<RuleError>,
    output_types: Vec<TypeFrame<'a>>,
    parent_types: Vec<Option<&'a MetaType>>,
    input_types: Vec<TypeFrame<'a>>,
    fragment_names: FnvHashSet<&'a str>,
}

impl<'a> ValidatorContext<'a> {
    #[doc(hidden)]
    pub fn new(schema: &'a SchemaType, document: &Document<'a>) -> Self {
        let fragment_names = document
            .iter()
            .filter_map(|def| match def {
                Definition::Fragment(f) => Some(f.item.name.item),
                _ => None,
            })
            .collect();

        Self {
            schema,
            errors: Vec::new(),
            output_types: Vec::new(),
            parent_types: Vec::new(),
            input_types: Vec::new(),
            fragment_names,
        }
    }

    #[doc(hidden)]
    pub fn append_errors(&mut self, errors: Vec<RuleError>) {
        self.errors.extend(errors);
    }

    #[doc(hidden)]
    pub fn report_error(&mut self, message: &str, locations: &[SourcePosition]) {
        self.errors.push(RuleError::new(message, locations));
    }

    /// Consumes the context, returning the reported errors ordered by their
    /// locations.
    #[doc(hidden)]
    pub fn into_errors(self) -> Vec<RuleError> {
        let mut errors = self.errors;
        errors.sort();
        errors
    }

    /// Runs `f` with `t` as the type of the current output node (field,
    /// operation or fragment).
    #[doc(hidden)]
    pub fn with_pushed_type<F, R>(&mut self, t: Option<&Type<'a>>, f: F) -> R
    where
        F: FnOnce(&mut ValidatorContext<'a>) -> R,
    {
        let frame = TypeFrame::resolve(self.schema, t);
        self.output_types.push(frame);
        let res = f(self);
        self.output_types.pop();
        res
    }

    /// Runs `f` with the current output type as the owner of the selection
    /// set being entered.
    #[doc(hidden)]
    pub fn with_pushed_parent_type<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut ValidatorContext<'a>) -> R,
    {
        self.parent_types.push(self.current_type());
        let res = f(self);
        self.parent_types.pop();
        res
    }

    /// Runs `f` with `t` as the expected type of the current input value.
    #[doc(hidden)]
    pub fn with_pushed_input_type<F, R>(&mut self, t: Option<&Type<'a>>, f: F) -> R
    where
        F: FnOnce(&mut ValidatorContext<'a>) -> R,
    {
        let frame = TypeFrame::resolve(self.schema, t);
        self.input_types.push(frame);
        let res = f(self);
        self.input_types.pop();
        res
    }

    #[doc(hidden)]
    pub fn current_type(&self) -> Option<&'a MetaType> {
        self.output_types.last().and_then(|f| f.named)
    }

    #[doc(hidden)]
    pub fn current_type_literal(&self) -> Option<&Type<'a>> {
        self.output_types.last()?.literal.as_ref()
    }

    #[doc(hidden)]
    pub fn parent_type(&self) -> Option<&'a MetaType> {
        self.parent_types.last().copied().flatten()
    }

    #[doc(hidden)]
    pub fn current_input_type_literal(&self) -> Option<&Type<'a>> {
        self.input_types.last()?.literal.as_ref()
    }

    /// Why `value` doesn't fit the current input type. Values of unknown
    /// types are not checked.
    #[doc(hidden)]
    pub fn input_value_error(&self, value: &InputValue) -> Option<String> {
        let schema = self.schema;
        let expected = schema.make_type(self.current_input_type_literal()?)?;
        validate_literal_value(schema, &expected, value)
    }

    #[doc(hidden)]
    pub fn is_known_fragment(&self, name: &str) -> bool {
        self.fragment_names.contains(name)
    }
}
