use crate::{
    ast::Field,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> FieldsOnCorrectType {
    FieldsOnCorrectType
}

pub struct FieldsOnCorrectType;

impl<'a> Visitor<'a> for FieldsOnCorrectType {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field>) {
        {
            let Some(parent_type) = ctx.parent_type() else {
                return;
            };

            let field_name = &field.item.name.item;

            if ctx.schema.lookup_field(parent_type, field_name).is_none() {
                let type_name = parent_type.name().clone();
                ctx.report_error(
                    &error_message(field_name, &type_name),
                    &[field.item.name.span.start],
                );
            }
        }
    }
}

fn error_message(field_name: &str, type_name: &str) -> String {
    format!("Cannot query field \"{field_name}\" on type \"{type_name}\".")
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn fields_on_object_interface_and_union() {
        expect_passes_rule(factory, "fragment objectFieldSelection on Dog { __typename name }");
        expect_passes_rule(factory, "fragment interfaceFieldSelection on Pet { __typename name }");
        expect_passes_rule(factory, "fragment unionSelection on CatOrDog { __typename }");
    }

    #[test]
    fn meta_fields_on_query_root() {
        expect_passes_rule(factory, "{ __schema { queryType { name } } __type(name: \"Dog\") { name } }");
    }

    #[test]
    fn unknown_field_on_object() {
        expect_fails_rule(
            factory,
            "fragment fieldNotDefined on Dog { meowVolume }",
            &[(&error_message("meowVolume", "Dog"), &[(1, 35)])],
        );
    }

    #[test]
    fn field_on_union_is_rejected() {
        expect_fails_rule(
            factory,
            "fragment directFieldSelectionOnUnion on CatOrDog { name }",
            &[(&error_message("name", "CatOrDog"), &[(1, 52)])],
        );
    }

    #[test]
    fn unknown_deeply_nested_field() {
        expect_fails_rule(
            factory,
            "{ human { pets { unknown_field } } }",
            &[(&error_message("unknown_field", "Pet"), &[(1, 18)])],
        );
    }
}
