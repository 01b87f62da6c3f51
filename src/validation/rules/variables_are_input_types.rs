use crate::{
    ast::VariableDefinition,
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> VariablesAreInputTypes {
    VariablesAreInputTypes
}

pub struct VariablesAreInputTypes;

impl<'a> Visitor<'a> for VariablesAreInputTypes {
    fn enter_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a VariableDefinition,
    ) {
        if let Some(t) = ctx
            .schema
            .concrete_type_by_name(def.var_type.item.innermost_name())
        {
            if !t.is_input() {
                ctx.report_error(
                    &error_message(&def.name.item, &def.var_type.item.to_string()),
                    &[def.name.span.start],
                );
            }
        }
    }
}

fn error_message(var_name: &str, type_name: &str) -> String {
    format!("Variable \"${var_name}\" cannot be non-input type \"{type_name}\".")
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn input_types_are_valid() {
        expect_passes_rule(
            factory,
            "query Foo($a: String, $b: [Boolean!]!, $c: ComplexInput) { dog { name } }",
        );
    }

    #[test]
    fn output_types_are_invalid() {
        expect_fails_rule(
            factory,
            "query Foo($a: Dog, $b: [[CatOrDog!]]!, $c: Pet) { dog { name } }",
            &[
                (&error_message("a", "Dog"), &[(1, 11)]),
                (&error_message("b", "[[CatOrDog!]]!"), &[(1, 20)]),
                (&error_message("c", "Pet"), &[(1, 40)]),
            ],
        );
    }
}
