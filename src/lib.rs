#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

#[doc(hidden)]
#[macro_use]
pub mod macros;
pub mod ast;
pub mod introspection;
pub mod parser;
pub mod schema;
pub mod types;
pub mod validation;
mod value;

#[cfg(test)]
mod tests;

// Required by the tracing macros.
#[cfg(feature = "tracing")]
#[doc(hidden)]
pub use tracing;

pub use crate::{
    ast::{Definition, Document, InputValue, Operation, OperationType, OwnedDocument, Type},
    introspection::{
        BuildClientSchemaOptions, IntrospectionError, IntrospectionQuery, build_client_schema,
        build_client_schema_from_query,
    },
    parser::{ParseError, SourcePosition, Span, Spanning, parse_document_source, parse_value_source},
    schema::{
        meta::{self, MetaType},
        model::{DirectiveLocation, DirectiveType, SchemaConfig, SchemaType, TypeType},
        relations::{is_equal_type, is_type_sub_type_of},
        validate::SchemaError,
    },
    types::base::TypeKind,
    validation::{RuleError, ValidationOptions, validate, validate_sdl, validate_with_options},
    value::ScalarValue,
};
