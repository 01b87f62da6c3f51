use crate::{
    ast::InputValue,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> KnownArgumentNames {
    KnownArgumentNames
}

pub struct KnownArgumentNames;

impl<'a> Visitor<'a> for KnownArgumentNames {
    fn enter_argument(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (arg_name, _): &'a (Spanning<String>, Spanning<InputValue>),
    ) {
        if ctx.in_directive() {
            let Some(directive) = ctx.current_directive() else {
                // Unknown directive: reported by KnownDirectives.
                return;
            };
            if !directive.arguments.iter().any(|a| a.name == arg_name.item) {
                let directive_name = directive.name.clone();
                ctx.report_error(
                    &directive_error_message(&arg_name.item, &directive_name),
                    &[arg_name.span.start],
                );
            }
        } else {
            let (Some(field), Some(parent)) = (ctx.current_field(), ctx.parent_type()) else {
                // Unknown field: reported by FieldsOnCorrectType.
                return;
            };
            if !field.arguments.iter().any(|a| a.name == arg_name.item) {
                let field_name = field.name.clone();
                let parent_name = parent.name().clone();
                ctx.report_error(
                    &field_error_message(&arg_name.item, &field_name, &parent_name),
                    &[arg_name.span.start],
                );
            }
        }
    }
}

fn field_error_message(arg_name: &str, field_name: &str, type_name: &str) -> String {
    format!("Unknown argument \"{arg_name}\" on field \"{type_name}.{field_name}\".")
}

fn directive_error_message(arg_name: &str, directive_name: &str) -> String {
    format!("Unknown argument \"{arg_name}\" on directive \"@{directive_name}\".")
}

#[cfg(test)]
mod tests {
    use super::{directive_error_message, factory, field_error_message};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn known_args_on_fields_and_directives() {
        expect_passes_rule(
            factory,
            "fragment argOnRequiredArg on Dog { doesKnowCommand(dogCommand: SIT) @skip(if: false) }",
        );
    }

    #[test]
    fn unknown_arg_on_field() {
        expect_fails_rule(
            factory,
            "fragment invalidArgName on Dog { doesKnowCommand(unknown: true) }",
            &[(
                &field_error_message("unknown", "doesKnowCommand", "Dog"),
                &[(1, 50)],
            )],
        );
    }

    #[test]
    fn unknown_arg_on_directive() {
        expect_fails_rule(
            factory,
            "{ dog { name @skip(unless: true) } }",
            &[(&directive_error_message("unless", "skip"), &[(1, 20)])],
        );
    }
}
