use std::borrow::Cow;

use crate::{
    ast::{
        Arguments, Definition, Directive, Document, Field, FragmentSpread, InlineFragment,
        InputValue, InputValueDefinition, Selection, Type, TypeDefinition, TypeDefinitionKind,
        VariableDefinitions,
    },
    parser::Spanning,
    schema::meta::Argument,
    validation::{ValidatorContext, Visitor},
};

/// Walks `document` depth-first, calling the `enter_*`/`exit_*` hooks of `v`
/// and keeping the type stacks of `ctx` in sync with the visited node.
#[doc(hidden)]
pub fn visit<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    document: &'a Document<'a>,
) {
    let mut walker = Walker { v };

    walker.v.enter_document(ctx, document);
    for def in document {
        walker.definition(ctx, def);
    }
    walker.v.exit_document(ctx, document);
}

fn named(name: &str) -> Type<'_> {
    Type::NonNullNamed(Cow::Borrowed(name))
}

struct Walker<'w, V> {
    v: &'w mut V,
}

impl<'a, V: Visitor<'a>> Walker<'_, V> {
    fn definition(&mut self, ctx: &mut ValidatorContext<'a>, def: &'a Definition<'a>) {
        let schema = ctx.schema;
        let root = match def {
            Definition::Operation(op) => schema
                .root_type(op.item.operation_type)
                .map(|t| named(t.name().as_str())),
            Definition::Fragment(f) => Some(named(f.item.type_condition.item)),
            Definition::Schema(_) | Definition::Type(_) | Definition::Directive(_) => None,
        };

        ctx.with_pushed_type(root.as_ref(), |ctx| match def {
            Definition::Operation(op) => {
                self.v.enter_operation_definition(ctx, op);
                self.variable_definitions(ctx, &op.item.variable_definitions);
                self.directives(ctx, &op.item.directives);
                self.selection_set(ctx, &op.item.selection_set);
                self.v.exit_operation_definition(ctx, op);
            }
            Definition::Fragment(f) => {
                self.v.enter_fragment_definition(ctx, f);
                self.directives(ctx, &f.item.directives);
                self.selection_set(ctx, &f.item.selection_set);
                self.v.exit_fragment_definition(ctx, f);
            }
            Definition::Schema(s) => {
                self.v.enter_schema_definition(ctx, s);
                self.directives(ctx, &s.item.directives);
                self.v.exit_schema_definition(ctx, s);
            }
            Definition::Type(t) => {
                self.v.enter_type_definition(ctx, t);
                self.type_definition(ctx, t);
                self.v.exit_type_definition(ctx, t);
            }
            Definition::Directive(d) => {
                self.v.enter_directive_definition(ctx, d);
                self.input_value_definitions(ctx, &d.item.arguments);
                self.v.exit_directive_definition(ctx, d);
            }
        });
    }

    fn type_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<TypeDefinition<'a>>,
    ) {
        self.directives(ctx, &def.item.directives);

        match &def.item.kind {
            TypeDefinitionKind::Object { fields, .. }
            | TypeDefinitionKind::Interface { fields, .. } => {
                for field in fields {
                    self.v.enter_field_definition(ctx, field);
                    self.input_value_definitions(ctx, &field.item.arguments);
                    self.directives(ctx, &field.item.directives);
                    self.v.exit_field_definition(ctx, field);
                }
            }
            TypeDefinitionKind::Enum { values } => {
                for value in values {
                    self.v.enter_enum_value_definition(ctx, value);
                    self.directives(ctx, &value.item.directives);
                    self.v.exit_enum_value_definition(ctx, value);
                }
            }
            TypeDefinitionKind::InputObject { fields } => {
                self.input_value_definitions(ctx, fields);
            }
            TypeDefinitionKind::Scalar | TypeDefinitionKind::Union { .. } => {}
        }
    }

    fn input_value_definitions(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        defs: &'a [Spanning<InputValueDefinition<'a>>],
    ) {
        for def in defs {
            self.v.enter_input_value_definition(ctx, def);
            self.directives(ctx, &def.item.directives);
            self.v.exit_input_value_definition(ctx, def);
        }
    }

    fn variable_definitions(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        defs: &'a Option<Spanning<VariableDefinitions<'a>>>,
    ) {
        let Some(defs) = defs else {
            return;
        };
        for def in defs.item.iter() {
            let (_, var) = def;
            ctx.with_pushed_input_type(Some(&var.var_type.item), |ctx| {
                self.v.enter_variable_definition(ctx, def);
                if let Some(default) = &var.default_value {
                    self.input_value(ctx, default);
                }
                self.directives(ctx, &var.directives);
                self.v.exit_variable_definition(ctx, def);
            });
        }
    }

    fn directives(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        directives: &'a Option<Vec<Spanning<Directive<'a>>>>,
    ) {
        let schema = ctx.schema;
        for directive in directives.iter().flatten() {
            let params = schema
                .directive_by_name(directive.item.name.item)
                .map(|d| d.arguments.as_slice());

            self.v.enter_directive(ctx, directive);
            self.arguments(ctx, params, &directive.item.arguments);
            self.v.exit_directive(ctx, directive);
        }
    }

    /// `params` are the schema arguments the `arguments` are matched against,
    /// if the field or directive is known.
    fn arguments(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        params: Option<&'a [Argument]>,
        arguments: &'a Option<Spanning<Arguments<'a>>>,
    ) {
        let Some(arguments) = arguments else {
            return;
        };
        for argument in arguments.item.iter() {
            let expected = params
                .and_then(|ps| ps.iter().find(|p| p.name == argument.0.item))
                .map(|p| &p.arg_type);

            ctx.with_pushed_input_type(expected, |ctx| {
                self.v.enter_argument(ctx, argument);
                self.input_value(ctx, &argument.1);
                self.v.exit_argument(ctx, argument);
            });
        }
    }

    fn selection_set(&mut self, ctx: &mut ValidatorContext<'a>, selections: &'a [Selection<'a>]) {
        ctx.with_pushed_parent_type(|ctx| {
            self.v.enter_selection_set(ctx, selections);
            for selection in selections {
                match selection {
                    Selection::Field(field) => self.field(ctx, field),
                    Selection::FragmentSpread(spread) => self.fragment_spread(ctx, spread),
                    Selection::InlineFragment(inline) => self.inline_fragment(ctx, inline),
                }
            }
            self.v.exit_selection_set(ctx, selections);
        });
    }

    fn field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field<'a>>) {
        let schema = ctx.schema;
        let def = ctx
            .parent_type()
            .and_then(|t| schema.lookup_field(t, field.item.name.item));

        ctx.with_pushed_type(def.map(|f| &f.field_type), |ctx| {
            self.v.enter_field(ctx, field);
            self.arguments(ctx, def.map(|f| f.arguments.as_slice()), &field.item.arguments);
            self.directives(ctx, &field.item.directives);
            if let Some(selections) = &field.item.selection_set {
                self.selection_set(ctx, selections);
            }
            self.v.exit_field(ctx, field);
        });
    }

    fn fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread<'a>>,
    ) {
        self.v.enter_fragment_spread(ctx, spread);
        self.directives(ctx, &spread.item.directives);
        self.v.exit_fragment_spread(ctx, spread);
    }

    /// Without a type condition, an inline fragment keeps the enclosing type.
    fn inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        inline: &'a Spanning<InlineFragment<'a>>,
    ) {
        match inline.item.type_condition {
            Some(cond) => {
                let t = named(cond.item);
                ctx.with_pushed_type(Some(&t), |ctx| self.inline_fragment_body(ctx, inline));
            }
            None => self.inline_fragment_body(ctx, inline),
        }
    }

    fn inline_fragment_body(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        inline: &'a Spanning<InlineFragment<'a>>,
    ) {
        self.v.enter_inline_fragment(ctx, inline);
        self.directives(ctx, &inline.item.directives);
        self.selection_set(ctx, &inline.item.selection_set);
        self.v.exit_inline_fragment(ctx, inline);
    }

    fn input_value(&mut self, ctx: &mut ValidatorContext<'a>, value: &'a Spanning<InputValue>) {
        self.input_value_hook(ctx, value, true);

        match &value.item {
            InputValue::Object(fields) => {
                let schema = ctx.schema;
                for field in fields {
                    let expected = ctx
                        .current_input_type_literal()
                        .and_then(|t| match t {
                            Type::Named(name) | Type::NonNullNamed(name) => {
                                schema.concrete_type_by_name(name)
                            }
                            Type::List(_) | Type::NonNullList(_) => None,
                        })
                        .and_then(|t| t.input_field_by_name(&field.0.item))
                        .map(|f| &f.arg_type);

                    ctx.with_pushed_input_type(expected, |ctx| {
                        self.v.enter_object_field(ctx, field);
                        self.input_value(ctx, &field.1);
                        self.v.exit_object_field(ctx, field);
                    });
                }
            }
            InputValue::List(items) => {
                let item_type = ctx.current_input_type_literal().and_then(|t| match t {
                    Type::List(inner) | Type::NonNullList(inner) => Some((**inner).clone()),
                    Type::Named(_) | Type::NonNullNamed(_) => None,
                });
                ctx.with_pushed_input_type(item_type.as_ref(), |ctx| {
                    for item in items {
                        self.input_value(ctx, item);
                    }
                });
            }
            InputValue::Null
            | InputValue::Scalar(_)
            | InputValue::Enum(_)
            | InputValue::Variable(_) => {}
        }

        self.input_value_hook(ctx, value, false);
    }

    fn input_value_hook(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        value: &'a Spanning<InputValue>,
        entering: bool,
    ) {
        let span = value.span;
        let v = &mut *self.v;

        macro_rules! hook {
            ($enter:ident / $exit:ident, $node:expr) => {{
                let node = Spanning::new(span, $node);
                if entering {
                    v.$enter(ctx, node);
                } else {
                    v.$exit(ctx, node);
                }
            }};
        }

        match &value.item {
            InputValue::Null => hook!(enter_null_value / exit_null_value, ()),
            InputValue::Scalar(s) => hook!(enter_scalar_value / exit_scalar_value, s),
            InputValue::Enum(s) => hook!(enter_enum_value / exit_enum_value, s),
            InputValue::Variable(s) => hook!(enter_variable_value / exit_variable_value, s),
            InputValue::List(l) => hook!(enter_list_value / exit_list_value, l),
            InputValue::Object(o) => hook!(enter_object_value / exit_object_value, o),
        }
    }
}
