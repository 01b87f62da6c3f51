use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::{
    ast::Type,
    executor::ExecutionResult,
    schema::{
        meta::{Argument, Field, InputObjectMeta, ObjectMeta},
        model::Schema,
    },
    value::{Value, Variables},
};

fn named(name: &str) -> Type {
    Type::Named(name.into())
}

fn non_null(name: &str) -> Type {
    Type::NonNullNamed(name.into())
}

/// A schema echoing its inputs back as strings, so coercion outcomes are
/// observable.
fn echo_schema() -> Arc<Schema> {
    let test_input = InputObjectMeta::new(
        "TestInput",
        vec![
            Argument::new("mandatory", non_null("Int")),
            Argument::new("optional", named("String")),
            Argument::new("withDefault", named("Int")).default_value(Value::Int(42)),
        ],
    );

    let one_of_input = InputObjectMeta::new(
        "TestInputObject",
        vec![
            Argument::new("a", named("String")),
            Argument::new("b", named("Int")),
        ],
    )
    .one_of();

    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("echoInt", named("String"))
                .argument(Argument::new("value", named("Int")))
                .resolve_with(|params| {
                    Ok(Value::String(format!(
                        "{}",
                        params.args.get_value("value").unwrap_or(&Value::Undefined),
                    )))
                }),
            Field::new("echoList", named("String"))
                .argument(Argument::new(
                    "values",
                    Type::List(Box::new(named("Int"))),
                ))
                .resolve_with(|params| {
                    Ok(Value::String(format!(
                        "{}",
                        params.args.get_value("values").unwrap_or(&Value::Undefined),
                    )))
                }),
            Field::new("echoInput", named("String"))
                .argument(Argument::new("input", named("TestInput")))
                .resolve_with(|params| {
                    Ok(Value::String(format!(
                        "{}",
                        params.args.get_value("input").unwrap_or(&Value::Undefined),
                    )))
                }),
            Field::new("echoOneOf", named("String"))
                .argument(Argument::new("input", named("TestInputObject")))
                .resolve_with(|params| {
                    Ok(Value::String(format!(
                        "{}",
                        params.args.get_value("input").unwrap_or(&Value::Undefined),
                    )))
                }),
        ],
    );

    Schema::build()
        .query(query)
        .register(test_input.into_meta())
        .register(one_of_input.into_meta())
        .finish()
        .unwrap()
}

async fn run(query: &str, variables: Variables) -> ExecutionResult {
    let schema = echo_schema();
    crate::graphql(&schema, query, &Value::Null, &(), &variables, None).await
}

#[tokio::test]
async fn int_variable_passes_through() {
    let result = run(
        "query Q($value: Int) { echoInt(value: $value) }",
        graphql_vars! {"value": 5},
    )
    .await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(result.data, Some(graphql_value!({"echoInt": "5"})));
}

#[tokio::test]
async fn string_for_int_variable_is_rejected() {
    let result = run(
        "query Q($value: Int) { echoInt(value: $value) }",
        graphql_vars! {"value": "five"},
    )
    .await;

    assert_eq!(result.data, None);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0]
        .message
        .starts_with("Variable \"$value\" got invalid value."));
}

#[tokio::test]
async fn missing_required_variable_is_rejected() {
    let result = run(
        "query Q($value: Int!) { echoInt(value: $value) }",
        Variables::new(),
    )
    .await;

    assert_eq!(result.data, None);
    assert_eq!(
        result.errors[0].message,
        "Variable \"$value\" of required type \"Int!\" was not provided.",
    );
}

#[tokio::test]
async fn variable_default_applies_when_absent() {
    let result = run(
        "query Q($value: Int = 7) { echoInt(value: $value) }",
        Variables::new(),
    )
    .await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(result.data, Some(graphql_value!({"echoInt": "7"})));
}

#[tokio::test]
async fn single_value_coerces_to_a_list() {
    let result = run(
        "query Q($values: [Int]) { echoList(values: $values) }",
        graphql_vars! {"values": 6},
    )
    .await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(result.data, Some(graphql_value!({"echoList": "[6]"})));
}

#[tokio::test]
async fn input_object_defaults_and_unknown_fields() {
    let ok = run(
        "query Q($input: TestInput) { echoInput(input: $input) }",
        graphql_vars! {"input": {"mandatory": 1}},
    )
    .await;
    assert_eq!(ok.errors, vec![]);
    assert_eq!(
        ok.data,
        Some(graphql_value!({"echoInput": "{\"mandatory\": 1, \"withDefault\": 42}"})),
    );

    let unknown = run(
        "query Q($input: TestInput) { echoInput(input: $input) }",
        graphql_vars! {"input": {"mandatory": 1, "bogus": 2}},
    )
    .await;
    assert_eq!(unknown.data, None);
    assert!(unknown.errors[0].message.contains("Unknown field"));

    let missing = run(
        "query Q($input: TestInput) { echoInput(input: $input) }",
        graphql_vars! {"input": {"optional": "x"}},
    )
    .await;
    assert_eq!(missing.data, None);
    assert!(missing.errors[0]
        .message
        .contains("In field \"mandatory\": Expected \"Int!\", found null"));
}

#[tokio::test]
async fn one_of_with_exactly_one_key_passes() {
    let result = run(
        "query Q($input: TestInputObject) { echoOneOf(input: $input) }",
        graphql_vars! {"input": {"a": "abc"}},
    )
    .await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(
        result.data,
        Some(graphql_value!({"echoOneOf": "{\"a\": \"abc\"}"})),
    );
}

#[tokio::test]
async fn one_of_with_two_keys_is_rejected() {
    let result = run(
        "query Q($input: TestInputObject) { echoOneOf(input: $input) }",
        graphql_vars! {"input": {"a": "abc", "b": 123}},
    )
    .await;

    assert_eq!(result.data, None);
    assert_eq!(result.errors.len(), 1);
    assert!(
        result.errors[0].message.contains(
            "Exactly one key must be specified for OneOf type \"TestInputObject\"",
        ),
        "unexpected message: {}",
        result.errors[0].message,
    );
}

#[tokio::test]
async fn one_of_with_null_member_is_rejected() {
    let result = run(
        "query Q($input: TestInputObject) { echoOneOf(input: $input) }",
        graphql_vars! {"input": {"a": "abc", "b": null}},
    )
    .await;

    assert_eq!(result.data, None);
    assert!(result.errors[0].message.contains(
        "Exactly one key must be specified for OneOf type \"TestInputObject\"",
    ));
}

#[tokio::test]
async fn literal_arguments_coerce_like_variables() {
    let result = run(
        "{ first: echoInput(input: {mandatory: 3, optional: \"hi\"}) }",
        Variables::new(),
    )
    .await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(
        result.data,
        Some(graphql_value!({
            "first": "{\"mandatory\": 3, \"optional\": \"hi\", \"withDefault\": 42}",
        })),
    );
}
