//! Query validation related methods and data structures

mod context;
mod multi_visitor;
pub mod rules;
mod traits;
mod visitor;

#[cfg(test)]
pub(crate) mod test_harness;

use serde::Deserialize;

use crate::{ast::Document, schema::model::SchemaType};

pub use self::{
    context::{RuleError, ValidatorContext},
    multi_visitor::{MultiVisitorCons, MultiVisitorNil},
    rules::{visit_all_rules, visit_sdl_rules},
    traits::Visitor,
    visitor::visit,
};

#[cfg(test)]
pub(crate) use self::test_harness::{
    PET_STORE, expect_fails_rule, expect_fails_rule_with_schema, expect_fails_sdl_rule,
    expect_passes_rule, expect_passes_rule_with_schema, expect_passes_sdl_rule,
};

/// Switches of [`validate_with_options()`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationOptions {
    /// Rejects operations selecting `__schema` or `__type`.
    pub disable_introspection: bool,
}

/// Validates an executable `document` against the `schema`.
///
/// An empty result means the document is safe to execute.
pub fn validate<'a>(schema: &'a SchemaType, document: &'a Document<'a>) -> Vec<RuleError> {
    validate_with_options(schema, document, &ValidationOptions::default())
}

/// Like [`validate()`], with additional rules switched on by `options`.
pub fn validate_with_options<'a>(
    schema: &'a SchemaType,
    document: &'a Document<'a>,
    options: &ValidationOptions,
) -> Vec<RuleError> {
    crate::__schema_span!("validate_document");

    let mut ctx = ValidatorContext::new(schema, document);
    visit_all_rules(&mut ctx, document);
    if options.disable_introspection {
        visit(
            &mut MultiVisitorNil.with(rules::disable_introspection::factory()),
            &mut ctx,
            document,
        );
    }

    let errors = ctx.into_errors();
    crate::__schema_debug!("document validation found {} errors", errors.len());
    errors
}

/// Validates a type system `document` on its own, without a schema to check
/// it against.
///
/// Names are resolved against the document's own definitions, the built-in
/// scalars, the introspection types and the specified directives.
pub fn validate_sdl<'a>(document: &'a Document<'a>) -> Vec<RuleError> {
    crate::__schema_span!("validate_sdl");

    let mut ctx = ValidatorContext::new(SchemaType::standard(), document);
    visit_sdl_rules(&mut ctx, document);

    let errors = ctx.into_errors();
    crate::__schema_debug!("SDL validation found {} errors", errors.len());
    errors
}
