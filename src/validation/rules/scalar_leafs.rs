use crate::{
    ast::Field,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> ScalarLeafs {
    ScalarLeafs
}

pub struct ScalarLeafs;

impl<'a> Visitor<'a> for ScalarLeafs {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field>) {
        let Some(t) = ctx.current_type() else {
            return;
        };

        let field_name = &field.item.name.item;
        let type_name = t.name().clone();

        if t.is_leaf() && field.item.selection_set.is_some() {
            ctx.report_error(
                &no_allowed_error_message(field_name, &type_name),
                &[field.span.start],
            );
        } else if !t.is_leaf() && field.item.selection_set.is_none() {
            ctx.report_error(
                &required_error_message(field_name, &type_name),
                &[field.span.start],
            );
        }
    }
}

fn no_allowed_error_message(field_name: &str, type_name: &str) -> String {
    format!(
        "Field \"{field_name}\" must not have a selection since type \"{type_name}\" has no \
         subfields."
    )
}

fn required_error_message(field_name: &str, type_name: &str) -> String {
    format!(
        "Field \"{field_name}\" of type \"{type_name}\" must have a selection of subfields. Did \
         you mean \"{field_name} {{ ... }}\"?"
    )
}

#[cfg(test)]
mod tests {
    use super::{factory, no_allowed_error_message, required_error_message};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn valid_scalar_selection() {
        expect_passes_rule(factory, "fragment scalarSelection on Dog { barks }");
    }

    #[test]
    fn object_without_subselection_fails() {
        expect_fails_rule(
            factory,
            "query directQueryOnObjectWithoutSubFields { human }",
            &[(&required_error_message("human", "Human"), &[(1, 45)])],
        );
    }

    #[test]
    fn interface_without_subselection_fails() {
        expect_fails_rule(
            factory,
            "{ human { pets } }",
            &[(&required_error_message("pets", "Pet"), &[(1, 11)])],
        );
    }

    #[test]
    fn scalar_with_subselection_fails() {
        expect_fails_rule(
            factory,
            "fragment scalarSelectionsNotAllowed on Dog { barks { sinceWhen } }",
            &[(&no_allowed_error_message("barks", "Boolean"), &[(1, 46)])],
        );
    }
}
