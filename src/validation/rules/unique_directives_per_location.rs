use fnv::{FnvBuildHasher, FnvHashMap};
use indexmap::IndexMap;

use crate::{
    ast::{
        Definition, Directive, Document, EnumValueDefinition, Field, FieldDefinition, Fragment,
        FragmentSpread, InlineFragment, InputValueDefinition, Operation, SchemaDefinition,
        TypeDefinition, VariableDefinition,
    },
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

use super::duplicate_names::NameGroups;

/// Checks that non-repeatable directives are used at most once per
/// location.
///
/// A type and its extensions count as a single location, as do the schema
/// definition and its extensions.
pub struct UniqueDirectivesPerLocation<'a> {
    /// Repeatability of the directives defined by the document.
    defined_directives: FnvHashMap<&'a str, bool>,
    type_directives: IndexMap<&'a str, NameGroups<'a>, FnvBuildHasher>,
    schema_directives: NameGroups<'a>,
}

pub fn factory<'a>() -> UniqueDirectivesPerLocation<'a> {
    UniqueDirectivesPerLocation {
        defined_directives: FnvHashMap::default(),
        type_directives: IndexMap::default(),
        schema_directives: NameGroups::default(),
    }
}

impl<'a> UniqueDirectivesPerLocation<'a> {
    /// Unknown directives are left to the rule checking for them.
    fn is_unique(&self, ctx: &ValidatorContext<'a>, name: &str) -> bool {
        match self.defined_directives.get(name) {
            Some(&repeatable) => !repeatable,
            None => ctx
                .schema
                .directive_by_name(name)
                .is_some_and(|d| !d.is_repeatable),
        }
    }

    fn collect_into(
        &self,
        ctx: &ValidatorContext<'a>,
        groups: &mut NameGroups<'a>,
        directives: &'a Option<Vec<Spanning<Directive<'a>>>>,
    ) {
        for directive in directives.iter().flatten() {
            let name = directive.item.name.item;
            if self.is_unique(ctx, name) {
                groups.insert(name, directive.span.start);
            }
        }
    }

    fn check(
        &self,
        ctx: &mut ValidatorContext<'a>,
        directives: &'a Option<Vec<Spanning<Directive<'a>>>>,
    ) {
        let mut groups = NameGroups::default();
        self.collect_into(ctx, &mut groups, directives);
        groups.report(ctx, error_message);
    }
}

impl<'a> Visitor<'a> for UniqueDirectivesPerLocation<'a> {
    fn enter_document(&mut self, _: &mut ValidatorContext<'a>, doc: &'a Document<'a>) {
        for def in doc {
            if let Definition::Directive(d) = def {
                self.defined_directives
                    .insert(d.item.name.item, d.item.repeatable);
            }
        }
    }

    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document<'a>) {
        self.schema_directives.report(ctx, error_message);
        for groups in self.type_directives.values() {
            groups.report(ctx, error_message);
        }
    }

    fn enter_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation<'a>>,
    ) {
        self.check(ctx, &op.item.directives);
    }

    fn enter_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a Spanning<Fragment<'a>>,
    ) {
        self.check(ctx, &f.item.directives);
    }

    fn enter_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (_, def): &'a (Spanning<&'a str>, VariableDefinition<'a>),
    ) {
        self.check(ctx, &def.directives);
    }

    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field<'a>>) {
        self.check(ctx, &field.item.directives);
    }

    fn enter_fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread<'a>>,
    ) {
        self.check(ctx, &spread.item.directives);
    }

    fn enter_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        frag: &'a Spanning<InlineFragment<'a>>,
    ) {
        self.check(ctx, &frag.item.directives);
    }

    fn enter_schema_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<SchemaDefinition<'a>>,
    ) {
        let mut groups = std::mem::take(&mut self.schema_directives);
        self.collect_into(ctx, &mut groups, &def.item.directives);
        self.schema_directives = groups;
    }

    fn enter_type_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<TypeDefinition<'a>>,
    ) {
        let mut groups = self
            .type_directives
            .swap_remove(def.item.name.item)
            .unwrap_or_default();
        self.collect_into(ctx, &mut groups, &def.item.directives);
        self.type_directives.insert(def.item.name.item, groups);
    }

    fn enter_field_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<FieldDefinition<'a>>,
    ) {
        self.check(ctx, &def.item.directives);
    }

    fn enter_input_value_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<InputValueDefinition<'a>>,
    ) {
        self.check(ctx, &def.item.directives);
    }

    fn enter_enum_value_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<EnumValueDefinition<'a>>,
    ) {
        self.check(ctx, &def.item.directives);
    }
}

fn error_message(directive_name: &str) -> String {
    format!(r#"The directive "@{directive_name}" can only be used once at this location"#)
}
