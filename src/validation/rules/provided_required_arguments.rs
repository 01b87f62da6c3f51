use crate::{
    ast::{Directive, Field},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> ProvidedRequiredArguments {
    ProvidedRequiredArguments
}

pub struct ProvidedRequiredArguments;

impl<'a> Visitor<'a> for ProvidedRequiredArguments {
    fn exit_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field>) {
        let Some(field_def) = ctx.current_field() else {
            return;
        };

        let mut missing = Vec::new();
        for arg_def in &field_def.arguments {
            if !arg_def.arg_type.is_non_null() || arg_def.default_value.is_some() {
                continue;
            }
            let provided = field
                .item
                .arguments
                .as_ref()
                .is_some_and(|args| args.item.get(&arg_def.name).is_some());
            if !provided {
                missing.push(field_error_message(
                    &field.item.name.item,
                    &arg_def.name,
                    &arg_def.arg_type.to_string(),
                ));
            }
        }
        for message in missing {
            ctx.report_error(&message, &[field.span.start]);
        }
    }

    fn exit_directive(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        directive: &'a Spanning<Directive>,
    ) {
        let Some(directive_def) = ctx.current_directive() else {
            return;
        };

        let mut missing = Vec::new();
        for arg_def in &directive_def.arguments {
            if !arg_def.arg_type.is_non_null() || arg_def.default_value.is_some() {
                continue;
            }
            let provided = directive
                .item
                .arguments
                .as_ref()
                .is_some_and(|args| args.item.get(&arg_def.name).is_some());
            if !provided {
                missing.push(directive_error_message(
                    &directive.item.name.item,
                    &arg_def.name,
                    &arg_def.arg_type.to_string(),
                ));
            }
        }
        for message in missing {
            ctx.report_error(&message, &[directive.span.start]);
        }
    }
}

fn field_error_message(field_name: &str, arg_name: &str, type_name: &str) -> String {
    format!(
        "Field \"{field_name}\" argument \"{arg_name}\" of type \"{type_name}\" is required, \
         but it was not provided."
    )
}

fn directive_error_message(directive_name: &str, arg_name: &str, type_name: &str) -> String {
    format!(
        "Directive \"@{directive_name}\" argument \"{arg_name}\" of type \"{type_name}\" is \
         required, but it was not provided."
    )
}

#[cfg(test)]
mod tests {
    use super::{directive_error_message, factory, field_error_message};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn arguments_provided() {
        expect_passes_rule(
            factory,
            "{ complicatedArgs { multipleReqs(req1: 1, req2: 2) } }",
        );
    }

    #[test]
    fn optional_arguments_may_be_omitted() {
        expect_passes_rule(factory, "{ complicatedArgs { multipleOpts } }");
    }

    #[test]
    fn missing_required_argument() {
        expect_fails_rule(
            factory,
            "{ complicatedArgs { multipleReqs(req2: 2) } }",
            &[(
                &field_error_message("multipleReqs", "req1", "Int!"),
                &[(1, 21)],
            )],
        );
    }

    #[test]
    fn missing_directive_argument() {
        expect_fails_rule(
            factory,
            "{ dog @include { name } }",
            &[(
                &directive_error_message("include", "if", "Boolean!"),
                &[(1, 7)],
            )],
        );
    }
}
