use crate::{
    ast::{Document, Operation},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

#[derive(Default)]
pub struct LoneAnonymousOperation {
    operations: usize,
    anonymous: Vec<SourcePosition>,
}

pub fn factory() -> LoneAnonymousOperation {
    LoneAnonymousOperation::default()
}

impl<'a> Visitor<'a> for LoneAnonymousOperation {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document<'a>) {
        if self.operations < 2 {
            return;
        }
        for &at in &self.anonymous {
            ctx.report_error(ERROR_MESSAGE, &[at]);
        }
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation<'a>>,
    ) {
        self.operations += 1;
        if op.item.name.is_none() {
            self.anonymous.push(op.span.start);
        }
    }
}

const ERROR_MESSAGE: &str = "An anonymous operation must be the only operation in its document";

#[cfg(test)]
mod tests {
    use crate::{
        parser::SourcePosition,
        validation::{
            PET_STORE, RuleError, expect_fails_rule_with_schema, expect_passes_rule_with_schema,
        },
    };

    use super::{ERROR_MESSAGE, factory};

    #[test]
    fn anonymous_operation_alone_with_fragments() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            { pets { ...petId } }
            fragment petId on Pet { id }
            "#,
        );
    }

    #[test]
    fn named_operations_side_by_side() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            query Pets { pets { id } }
            mutation Adopt { adopt(petId: 1) { id } }
            "#,
        );
    }

    #[test]
    fn reports_every_anonymous_operation() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            { pets { id } }
            query Named { node(id: 1) { id } }
            mutation { adopt(petId: 1) { id } }
            "#,
            &[
                RuleError::new(ERROR_MESSAGE, &[SourcePosition::new(13, 1, 12)]),
                RuleError::new(ERROR_MESSAGE, &[SourcePosition::new(88, 3, 12)]),
            ],
        );
    }
}
