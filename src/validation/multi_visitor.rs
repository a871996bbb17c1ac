use crate::{
    ast::{
        Directive, DirectiveDefinition, Document, EnumValueDefinition, Field, FieldDefinition,
        Fragment, FragmentSpread, InlineFragment, InputValue, InputValueDefinition, Operation,
        SchemaDefinition, Selection, TypeDefinition, VariableDefinition,
    },
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
    value::ScalarValue,
};

/// Empty end of a [`MultiVisitorCons`] list.
#[doc(hidden)]
pub struct MultiVisitorNil;

impl MultiVisitorNil {
    #[doc(hidden)]
    pub fn with<V>(self, visitor: V) -> MultiVisitorCons<V, Self> {
        MultiVisitorCons(visitor, self)
    }
}

/// Visitor running `A`, then every visitor of `B`, on each node.
#[doc(hidden)]
pub struct MultiVisitorCons<A, B>(A, B);

impl<A, B> MultiVisitorCons<A, B> {
    #[doc(hidden)]
    pub fn with<V>(self, visitor: V) -> MultiVisitorCons<V, Self> {
        MultiVisitorCons(visitor, self)
    }
}

impl Visitor<'_> for MultiVisitorNil {}

macro_rules! forward {
    ($($enter:ident / $exit:ident: $node:ty;)*) => {
        $(
            fn $enter(&mut self, ctx: &mut ValidatorContext<'a>, node: $node) {
                self.0.$enter(ctx, node);
                self.1.$enter(ctx, node);
            }

            fn $exit(&mut self, ctx: &mut ValidatorContext<'a>, node: $node) {
                self.0.$exit(ctx, node);
                self.1.$exit(ctx, node);
            }
        )*
    };
}

impl<'a, A, B> Visitor<'a> for MultiVisitorCons<A, B>
where
    A: Visitor<'a> + 'a,
    B: Visitor<'a> + 'a,
{
    forward! {
        enter_document / exit_document: &'a Document<'a>;

        enter_operation_definition / exit_operation_definition: &'a Spanning<Operation<'a>>;
        enter_fragment_definition / exit_fragment_definition: &'a Spanning<Fragment<'a>>;
        enter_variable_definition / exit_variable_definition:
            &'a (Spanning<&'a str>, VariableDefinition<'a>);

        enter_schema_definition / exit_schema_definition: &'a Spanning<SchemaDefinition<'a>>;
        enter_type_definition / exit_type_definition: &'a Spanning<TypeDefinition<'a>>;
        enter_field_definition / exit_field_definition: &'a Spanning<FieldDefinition<'a>>;
        enter_input_value_definition / exit_input_value_definition:
            &'a Spanning<InputValueDefinition<'a>>;
        enter_enum_value_definition / exit_enum_value_definition:
            &'a Spanning<EnumValueDefinition<'a>>;
        enter_directive_definition / exit_directive_definition:
            &'a Spanning<DirectiveDefinition<'a>>;

        enter_directive / exit_directive: &'a Spanning<Directive<'a>>;
        enter_argument / exit_argument: &'a (Spanning<&'a str>, Spanning<InputValue>);

        enter_selection_set / exit_selection_set: &'a [Selection<'a>];
        enter_field / exit_field: &'a Spanning<Field<'a>>;
        enter_fragment_spread / exit_fragment_spread: &'a Spanning<FragmentSpread<'a>>;
        enter_inline_fragment / exit_inline_fragment: &'a Spanning<InlineFragment<'a>>;

        enter_null_value / exit_null_value: Spanning<()>;
        enter_scalar_value / exit_scalar_value: Spanning<&'a ScalarValue>;
        enter_enum_value / exit_enum_value: Spanning<&'a String>;
        enter_variable_value / exit_variable_value: Spanning<&'a String>;
        enter_list_value / exit_list_value: Spanning<&'a Vec<Spanning<InputValue>>>;
        enter_object_value / exit_object_value:
            Spanning<&'a Vec<(Spanning<String>, Spanning<InputValue>)>>;
        enter_object_field / exit_object_field: &'a (Spanning<String>, Spanning<InputValue>);
    }
}
