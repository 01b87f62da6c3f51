use crate::{
    ast::FragmentSpread,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> KnownFragmentNames {
    KnownFragmentNames
}

pub struct KnownFragmentNames;

impl<'a> Visitor<'a> for KnownFragmentNames {
    fn enter_fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread>,
    ) {
        let name = &spread.item.name;

        if !ctx.is_known_fragment(&name.item) {
            ctx.report_error(&error_message(&name.item), &[name.span.start]);
        }
    }
}

fn error_message(name: &str) -> String {
    format!("Unknown fragment \"{name}\".")
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn known_fragment_names_are_valid() {
        expect_passes_rule(
            factory,
            "{ human { ...HumanFields } } fragment HumanFields on Human { name }",
        );
    }

    #[test]
    fn unknown_fragment_names_are_invalid() {
        expect_fails_rule(
            factory,
            "{ human { ...UnknownFragment1 ...UnknownFragment2 } }",
            &[
                (&error_message("UnknownFragment1"), &[(1, 14)]),
                (&error_message("UnknownFragment2"), &[(1, 34)]),
            ],
        );
    }
}
