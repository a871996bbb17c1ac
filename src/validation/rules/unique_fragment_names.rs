use crate::{
    ast::{Definition, Document},
    validation::{ValidatorContext, Visitor},
};

use super::duplicate_names::NameGroups;

pub struct UniqueFragmentNames;

pub fn factory() -> UniqueFragmentNames {
    UniqueFragmentNames
}

impl<'a> Visitor<'a> for UniqueFragmentNames {
    fn enter_document(&mut self, ctx: &mut ValidatorContext<'a>, doc: &'a Document<'a>) {
        doc.iter()
            .filter_map(|def| match def {
                Definition::Fragment(f) => Some(f.item.name),
                _ => None,
            })
            .collect::<NameGroups<'_>>()
            .report(ctx, error_message);
    }
}

fn error_message(fragment: &str) -> String {
    format!("There can only be one fragment named \"{fragment}\"")
}

#[cfg(test)]
mod tests {
    use crate::{
        parser::SourcePosition,
        validation::{
            PET_STORE, RuleError, expect_fails_rule_with_schema, expect_passes_rule_with_schema,
        },
    };

    use super::{error_message, factory};

    #[test]
    fn fragments_may_share_names_with_operations() {
        expect_passes_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            query petId { pets { ...petId ...dogBarks } }
            fragment petId on Pet { id }
            fragment dogBarks on Dog { barks }
            "#,
        );
    }

    #[test]
    fn groups_every_repeated_name() {
        expect_fails_rule_with_schema(
            &PET_STORE,
            factory,
            r#"
            fragment petBits on Pet { id }
            fragment dogBits on Dog { barks }
            fragment petBits on Pet { name }
            fragment dogBits on Dog { born }
            fragment petBits on Dog { owner { id } }
            "#,
            &[
                RuleError::new(
                    &error_message("petBits"),
                    &[
                        SourcePosition::new(22, 1, 21),
                        SourcePosition::new(111, 3, 21),
                        SourcePosition::new(201, 5, 21),
                    ],
                ),
                RuleError::new(
                    &error_message("dogBits"),
                    &[SourcePosition::new(65, 2, 21), SourcePosition::new(156, 4, 21)],
                ),
            ],
        );
    }
}
