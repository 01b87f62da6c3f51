use crate::{
    ast::{Fragment, InlineFragment, VariableDefinition},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> KnownTypeNames {
    KnownTypeNames
}

pub struct KnownTypeNames;

impl<'a> Visitor<'a> for KnownTypeNames {
    fn enter_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<InlineFragment>,
    ) {
        if let Some(cond) = &fragment.item.type_condition {
            validate_type(ctx, &cond.item, cond.span.start);
        }
    }

    fn enter_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<Fragment>,
    ) {
        let cond = &fragment.item.type_condition;
        validate_type(ctx, &cond.item, cond.span.start);
    }

    fn enter_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a VariableDefinition,
    ) {
        validate_type(
            ctx,
            def.var_type.item.innermost_name(),
            def.var_type.span.start,
        );
    }
}

fn validate_type(ctx: &mut ValidatorContext<'_>, type_name: &str, position: SourcePosition) {
    if ctx.schema.concrete_type_by_name(type_name).is_none() {
        ctx.report_error(&error_message(type_name), &[position]);
    }
}

fn error_message(type_name: &str) -> String {
    format!("Unknown type \"{type_name}\".")
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn known_type_names_are_valid() {
        expect_passes_rule(
            factory,
            "query Foo($var: String, $required: [String!]!) {
               human { pets { ... on Pet { name }, ...PetFields, ... { name } } }
             }
             fragment PetFields on Pet { name }",
        );
    }

    #[test]
    fn unknown_type_names_are_invalid() {
        expect_fails_rule(
            factory,
            "query Foo($var: JumbledUpLetters) { human { pets { ... on Badger { name } } } } fragment PetFields on Peettt { name }",
            &[
                (&error_message("JumbledUpLetters"), &[(1, 17)]),
                (&error_message("Badger"), &[(1, 59)]),
                (&error_message("Peettt"), &[(1, 103)]),
            ],
        );
    }
}
