use std::collections::HashSet;

use crate::{
    ast::{InputValue, Type},
    parser::{SourcePosition, Spanning},
    schema::meta::MetaType,
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> ValuesOfCorrectType {
    ValuesOfCorrectType
}

pub struct ValuesOfCorrectType;

impl ValuesOfCorrectType {
    /// Checks a non-composite literal against the current expected input
    /// type; composite shapes are handled by the dedicated hooks.
    fn check_leaf_literal(
        &self,
        ctx: &mut ValidatorContext<'_>,
        literal: &InputValue,
        position: SourcePosition,
    ) {
        let Some(meta) = ctx.current_input_type() else {
            return;
        };

        match meta {
            MetaType::Scalar(scalar) => {
                if let Err(e) = (scalar.parse_literal_fn)(literal) {
                    let type_name = expected_type_name(ctx);
                    ctx.report_error(
                        &bad_value_message(&type_name, &literal.to_string(), Some(e.message())),
                        &[position],
                    );
                }
            }
            MetaType::Enum(e) => match literal {
                InputValue::Enum(name) => {
                    if e.value_by_name(name).is_none() {
                        let enum_name = e.name.clone();
                        ctx.report_error(
                            &unknown_enum_value_message(name, &enum_name),
                            &[position],
                        );
                    }
                }
                other => {
                    let enum_name = e.name.clone();
                    ctx.report_error(
                        &non_enum_value_message(&enum_name, &other.to_string()),
                        &[position],
                    );
                }
            },
            MetaType::InputObject(io) => {
                let type_name = io.name.clone();
                ctx.report_error(
                    &bad_value_message(&type_name, &literal.to_string(), None),
                    &[position],
                );
            }
            // Output types here are reported by VariablesAreInputTypes /
            // KnownArgumentNames.
            _ => {}
        }
    }
}

impl<'a> Visitor<'a> for ValuesOfCorrectType {
    fn enter_null_value(&mut self, ctx: &mut ValidatorContext<'a>, value: Spanning<()>) {
        if let Some(t) = ctx.current_input_type_literal() {
            if t.is_non_null() {
                let type_name = t.to_string();
                ctx.report_error(
                    &bad_null_message(&type_name),
                    &[value.span.start],
                );
            }
        }
    }

    fn enter_int_value(&mut self, ctx: &mut ValidatorContext<'a>, value: Spanning<i32>) {
        self.check_leaf_literal(ctx, &InputValue::Int(value.item), value.span.start);
    }

    fn enter_float_value(&mut self, ctx: &mut ValidatorContext<'a>, value: Spanning<f64>) {
        self.check_leaf_literal(ctx, &InputValue::Float(value.item), value.span.start);
    }

    fn enter_string_value(&mut self, ctx: &mut ValidatorContext<'a>, value: Spanning<&'a str>) {
        self.check_leaf_literal(
            ctx,
            &InputValue::String(value.item.into()),
            value.span.start,
        );
    }

    fn enter_boolean_value(&mut self, ctx: &mut ValidatorContext<'a>, value: Spanning<bool>) {
        self.check_leaf_literal(ctx, &InputValue::Boolean(value.item), value.span.start);
    }

    fn enter_enum_value(&mut self, ctx: &mut ValidatorContext<'a>, value: Spanning<&'a str>) {
        self.check_leaf_literal(ctx, &InputValue::Enum(value.item.into()), value.span.start);
    }

    fn enter_list_value(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        value: Spanning<&'a Vec<Spanning<InputValue>>>,
    ) {
        // Single values coerce into list positions, but a list literal never
        // coerces into a non-list position.
        if ctx.current_input_type().is_none() {
            return;
        }
        let expects_list = ctx
            .current_input_type_literal()
            .is_some_and(|t| matches!(t, Type::List(_) | Type::NonNullList(_)));
        if !expects_list {
            let type_name = expected_type_name(ctx);
            ctx.report_error(
                &bad_value_message(
                    &type_name,
                    &InputValue::List(value.item.clone()).to_string(),
                    None,
                ),
                &[value.span.start],
            );
        }
    }

    fn enter_object_value(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        object: Spanning<&'a Vec<(Spanning<String>, Spanning<InputValue>)>>,
    ) {
        let Some(meta) = ctx.current_input_type() else {
            return;
        };

        let MetaType::InputObject(io) = meta else {
            if meta.is_input() {
                let type_name = expected_type_name(ctx);
                ctx.report_error(
                    &bad_value_message(&type_name, "an object", None),
                    &[object.span.start],
                );
            }
            return;
        };

        let Ok(input_fields) = io.input_fields() else {
            return;
        };

        let provided: HashSet<&str> = object
            .item
            .iter()
            .map(|(k, _)| k.item.as_str())
            .collect();

        // Unknown keys.
        for (key, _) in object.item {
            if !input_fields.contains_key(key.item.as_str()) {
                let type_name = io.name.clone();
                ctx.report_error(
                    &unknown_field_message(&key.item, &type_name),
                    &[key.span.start],
                );
            }
        }

        // Missing required fields.
        for (field_name, field) in input_fields {
            if field.arg_type.is_non_null()
                && field.default_value.is_none()
                && !provided.contains(field_name.as_str())
            {
                let type_name = io.name.clone();
                let field_type = field.arg_type.to_string();
                ctx.report_error(
                    &missing_field_message(&type_name, field_name, &field_type),
                    &[object.span.start],
                );
            }
        }

        if io.one_of {
            let non_null_count = object
                .item
                .iter()
                .filter(|(_, v)| !v.item.is_null())
                .count();
            if object.item.len() != 1 || non_null_count != 1 {
                let type_name = io.name.clone();
                ctx.report_error(&one_of_message(&type_name), &[object.span.start]);
            }
        }
    }
}

fn expected_type_name(ctx: &ValidatorContext<'_>) -> String {
    ctx.current_input_type_literal()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "unknown".into())
}

fn bad_value_message(type_name: &str, value: &str, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("Expected value of type \"{type_name}\", found {value}; {detail}"),
        None => format!("Expected value of type \"{type_name}\", found {value}."),
    }
}

fn bad_null_message(type_name: &str) -> String {
    format!("Expected value of type \"{type_name}\", found null.")
}

fn unknown_enum_value_message(value: &str, enum_name: &str) -> String {
    format!("Value \"{value}\" does not exist in \"{enum_name}\" enum.")
}

fn non_enum_value_message(enum_name: &str, value: &str) -> String {
    format!("Enum \"{enum_name}\" cannot represent non-enum value: {value}.")
}

fn unknown_field_message(field_name: &str, type_name: &str) -> String {
    format!("Field \"{field_name}\" is not defined by type \"{type_name}\".")
}

fn missing_field_message(type_name: &str, field_name: &str, field_type: &str) -> String {
    format!(
        "Field \"{type_name}.{field_name}\" of required type \"{field_type}\" was not provided."
    )
}

fn one_of_message(type_name: &str) -> String {
    format!("Exactly one key must be specified for OneOf type \"{type_name}\".")
}

#[cfg(test)]
mod tests {
    use super::{
        bad_null_message, factory, missing_field_message, non_enum_value_message, one_of_message,
        unknown_enum_value_message, unknown_field_message,
    };

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn good_literal_values() {
        expect_passes_rule(
            factory,
            "{ complicatedArgs {
               intArgField(intArg: 2)
               stringArgField(stringArg: \"foo\")
               booleanArgField(booleanArg: true)
               floatArgField(floatArg: 1.1)
               enumArgField(enumArg: BROWN)
               stringListArgField(stringListArg: [\"one\", \"two\"])
               complexArgField(complexArg: { requiredField: true, intField: 4 })
             } }",
        );
    }

    #[test]
    fn single_value_coerces_into_list_position() {
        expect_passes_rule(
            factory,
            "{ complicatedArgs { stringListArgField(stringListArg: \"one\") } }",
        );
    }

    #[test]
    fn int_into_string_fails() {
        expect_fails_rule(
            factory,
            "{ complicatedArgs { stringArgField(stringArg: 1) } }",
            &[(
                "Expected value of type \"String\", found 1; String cannot represent a non-string value: 1",
                &[(1, 47)],
            )],
        );
    }

    #[test]
    fn string_into_enum_fails() {
        expect_fails_rule(
            factory,
            "{ complicatedArgs { enumArgField(enumArg: \"BROWN\") } }",
            &[(
                &non_enum_value_message("FurColor", "\"BROWN\""),
                &[(1, 43)],
            )],
        );
    }

    #[test]
    fn unknown_enum_value_fails() {
        expect_fails_rule(
            factory,
            "{ complicatedArgs { enumArgField(enumArg: PURPLE) } }",
            &[(
                &unknown_enum_value_message("PURPLE", "FurColor"),
                &[(1, 43)],
            )],
        );
    }

    #[test]
    fn null_into_non_null_fails() {
        expect_fails_rule(
            factory,
            "{ complicatedArgs { nonNullIntArgField(nonNullIntArg: null) } }",
            &[(&bad_null_message("Int!"), &[(1, 55)])],
        );
    }

    #[test]
    fn unknown_input_object_field_fails() {
        expect_fails_rule(
            factory,
            "{ complicatedArgs { complexArgField(complexArg: { requiredField: true, unknownField: 1 }) } }",
            &[(
                &unknown_field_message("unknownField", "ComplexInput"),
                &[(1, 72)],
            )],
        );
    }

    #[test]
    fn missing_required_input_object_field_fails() {
        expect_fails_rule(
            factory,
            "{ complicatedArgs { complexArgField(complexArg: { intField: 4 }) } }",
            &[(
                &missing_field_message("ComplexInput", "requiredField", "Boolean!"),
                &[(1, 49)],
            )],
        );
    }

    #[test]
    fn one_of_with_two_keys_fails() {
        expect_fails_rule(
            factory,
            "{ complicatedArgs { oneOfArgField(oneOfArg: { stringField: \"abc\", intField: 1 }) } }",
            &[(&one_of_message("OneOfInput"), &[(1, 45)])],
        );
    }

    #[test]
    fn one_of_with_null_key_fails() {
        expect_fails_rule(
            factory,
            "{ complicatedArgs { oneOfArgField(oneOfArg: { stringField: null }) } }",
            &[(&one_of_message("OneOfInput"), &[(1, 45)])],
        );
    }
}
