use crate::{
    ast::{Directive, Field, Fragment, FragmentSpread, InlineFragment, Operation, OperationType,
        VariableDefinition,
    },
    parser::Spanning,
    schema::model::DirectiveLocation,
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> KnownDirectives {
    KnownDirectives {
        location_stack: Vec::new(),
    }
}

pub struct KnownDirectives {
    location_stack: Vec<DirectiveLocation>,
}

impl<'a> Visitor<'a> for KnownDirectives {
    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        self.location_stack.push(match op.item.operation_type {
            OperationType::Query => DirectiveLocation::Query,
            OperationType::Mutation => DirectiveLocation::Mutation,
            OperationType::Subscription => DirectiveLocation::Subscription,
        });
    }

    fn exit_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Operation>,
    ) {
        self.location_stack.pop();
    }

    fn enter_field(&mut self, _: &mut ValidatorContext<'a>, _: &'a Spanning<Field>) {
        self.location_stack.push(DirectiveLocation::Field);
    }

    fn exit_field(&mut self, _: &mut ValidatorContext<'a>, _: &'a Spanning<Field>) {
        self.location_stack.pop();
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Fragment>,
    ) {
        self.location_stack
            .push(DirectiveLocation::FragmentDefinition);
    }

    fn exit_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Fragment>,
    ) {
        self.location_stack.pop();
    }

    fn enter_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<FragmentSpread>,
    ) {
        self.location_stack.push(DirectiveLocation::FragmentSpread);
    }

    fn exit_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<FragmentSpread>,
    ) {
        self.location_stack.pop();
    }

    fn enter_inline_fragment(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<InlineFragment>,
    ) {
        self.location_stack.push(DirectiveLocation::InlineFragment);
    }

    fn exit_inline_fragment(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<InlineFragment>,
    ) {
        self.location_stack.pop();
    }

    fn enter_variable_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a VariableDefinition,
    ) {
        self.location_stack
            .push(DirectiveLocation::VariableDefinition);
    }

    fn exit_variable_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a VariableDefinition,
    ) {
        self.location_stack.pop();
    }

    fn enter_directive(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        directive: &'a Spanning<Directive>,
    ) {
        let directive_name = &directive.item.name.item;

        match ctx.schema.directive_by_name(directive_name) {
            Some(directive_type) => {
                if let Some(location) = self.location_stack.last() {
                    if !directive_type.locations.contains(location) {
                        ctx.report_error(
                            &misplaced_error_message(directive_name, location),
                            &[directive.span.start],
                        );
                    }
                }
            }
            None => {
                ctx.report_error(
                    &unknown_error_message(directive_name),
                    &[directive.span.start],
                );
            }
        }
    }
}

fn unknown_error_message(directive_name: &str) -> String {
    format!("Unknown directive \"@{directive_name}\".")
}

fn misplaced_error_message(directive_name: &str, location: &DirectiveLocation) -> String {
    format!("Directive \"@{directive_name}\" may not be used on the {location}.")
}

#[cfg(test)]
mod tests {
    use super::{factory, misplaced_error_message, unknown_error_message};

    use crate::{
        schema::model::DirectiveLocation,
        validation::test_harness::{expect_fails_rule, expect_passes_rule},
    };

    #[test]
    fn no_directives() {
        expect_passes_rule(factory, "{ human { name } }");
    }

    #[test]
    fn known_directives_in_valid_locations() {
        expect_passes_rule(
            factory,
            "{ human @skip(if: false) { name ... on Human @include(if: true) { iq } } }",
        );
    }

    #[test]
    fn unknown_directive() {
        expect_fails_rule(
            factory,
            "{ human @unknown(directive: \"value\") { name } }",
            &[(&unknown_error_message("unknown"), &[(1, 9)])],
        );
    }

    #[test]
    fn misplaced_directive() {
        expect_fails_rule(
            factory,
            "query Foo @include(if: true) { human { name } }",
            &[(
                &misplaced_error_message("include", &DirectiveLocation::Query),
                &[(1, 11)],
            )],
        );
    }
}
