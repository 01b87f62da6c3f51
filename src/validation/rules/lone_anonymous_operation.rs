use crate::{
    ast::{Definition, Document, Operation},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> LoneAnonymousOperation {
    LoneAnonymousOperation { operation_count: 0 }
}

pub struct LoneAnonymousOperation {
    operation_count: usize,
}

impl<'a> Visitor<'a> for LoneAnonymousOperation {
    fn enter_document(&mut self, _: &mut ValidatorContext<'a>, doc: &'a Document) {
        self.operation_count = doc
            .definitions
            .iter()
            .filter(|d| matches!(d, Definition::Operation(_)))
            .count();
    }

    fn enter_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        if op.item.name.is_none() && self.operation_count > 1 {
            ctx.report_error(error_message(), &[op.span.start]);
        }
    }
}

fn error_message() -> &'static str {
    "This anonymous operation must be the only defined operation."
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn no_operations() {
        expect_passes_rule(factory, "fragment fragA on Dog { name }");
    }

    #[test]
    fn one_anon_operation() {
        expect_passes_rule(factory, "{ dog { name } }");
    }

    #[test]
    fn multiple_named_operations() {
        expect_passes_rule(factory, "query Foo { dog { name } } query Bar { dog { name } }");
    }

    #[test]
    fn anon_operation_with_another_operation() {
        expect_fails_rule(
            factory,
            "{ dog { name } } query Foo { dog { name } }",
            &[(error_message(), &[(1, 1)])],
        );
    }

    #[test]
    fn multiple_anon_operations() {
        expect_fails_rule(
            factory,
            "{ dog { name } } { human { name } }",
            &[
                (error_message(), &[(1, 1)]),
                (error_message(), &[(1, 18)]),
            ],
        );
    }
}
