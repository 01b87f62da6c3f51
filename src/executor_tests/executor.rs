use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::{
    ast::Type,
    error::PathSegment,
    executor::ExecutionResult,
    schema::{
        meta::{Argument, Field, ObjectMeta},
        model::{Schema, SchemaError},
    },
    value::{Value, Variables},
};

fn named(name: &str) -> Type {
    Type::Named(name.into())
}

fn non_null(name: &str) -> Type {
    Type::NonNullNamed(name.into())
}

async fn run(
    schema: &Schema,
    query: &str,
    root_value: &Value,
    context: &(dyn std::any::Any + Send + Sync),
) -> ExecutionResult {
    crate::graphql(schema, query, root_value, context, &Variables::new(), None).await
}

fn hello_world_schema() -> Result<Arc<Schema>, SchemaError> {
    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("hello", named("String"))
                .resolve_with(|_| Ok(Value::from("world"))),
        ],
    );
    Schema::build().query(query).finish()
}

#[tokio::test]
async fn hello_world() {
    let schema = hello_world_schema().unwrap();
    let result = run(&schema, "{ hello }", &Value::Null, &()).await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(result.data, Some(graphql_value!({"hello": "world"})));
}

#[tokio::test]
async fn default_resolver_reads_source_properties() {
    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("a", named("String")),
            Field::new("missing", named("String")),
        ],
    );
    let schema = Schema::build().query(query).finish().unwrap();

    let root = graphql_value!({"a": "from the root", "ignored": 1});
    let result = run(&schema, "{ a missing }", &root, &()).await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(
        result.data,
        Some(graphql_value!({"a": "from the root", "missing": null})),
    );
}

fn non_null_chain_schema() -> Arc<Schema> {
    let a = ObjectMeta::new(
        "A",
        vec![
            Field::new("b", non_null("String"))
                .resolve_with(|_| Err("boom".into())),
        ],
    );
    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("a", non_null("A"))
                .resolve_with(|_| Ok(graphql_value!({}))),
        ],
    );
    Schema::build()
        .query(query)
        .register(a.into_meta())
        .finish()
        .unwrap()
}

#[tokio::test]
async fn non_null_failure_propagates_to_the_root() {
    let schema = non_null_chain_schema();
    let result = run(&schema, "{ a { b } }", &Value::Null, &()).await;

    assert_eq!(result.data, Some(Value::Null));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].message, "boom");
    assert_eq!(
        result.errors[0].path,
        vec![PathSegment::Key("a".into()), PathSegment::Key("b".into())],
    );
}

#[tokio::test]
async fn nullable_parent_absorbs_non_null_failure() {
    let a = ObjectMeta::new(
        "A",
        vec![
            Field::new("b", non_null("String"))
                .resolve_with(|_| Err("boom".into())),
        ],
    );
    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("a", named("A")).resolve_with(|_| Ok(graphql_value!({}))),
        ],
    );
    let schema = Schema::build()
        .query(query)
        .register(a.into_meta())
        .finish()
        .unwrap();

    let result = run(&schema, "{ a { b } }", &Value::Null, &()).await;

    assert_eq!(result.data, Some(graphql_value!({"a": null})));
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test]
async fn error_inside_list_of_non_null_nulls_the_list() {
    let item = ObjectMeta::new(
        "Item",
        vec![Field::new("value", non_null("Int")).resolve_with(|params| {
            let v = params
                .source
                .as_object_value()
                .and_then(|o| o.get_field_value("value"))
                .cloned()
                .unwrap_or(Value::Undefined);
            if v.is_null_or_undefined() {
                Err("no value".into())
            } else {
                Ok(v)
            }
        })],
    );
    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new(
                "items",
                Type::List(Box::new(non_null("Item"))),
            )
            .resolve_with(|_| {
                Ok(graphql_value!([{"value": 1}, {}, {"value": 3}]))
            }),
        ],
    );
    let schema = Schema::build()
        .query(query)
        .register(item.into_meta())
        .finish()
        .unwrap();

    let result = run(&schema, "{ items { value } }", &Value::Null, &()).await;

    assert_eq!(result.data, Some(graphql_value!({"items": null})));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].path,
        vec![
            PathSegment::Key("items".into()),
            PathSegment::Index(1),
            PathSegment::Key("value".into()),
        ],
    );
}

struct Counter(AtomicI32);

fn counter_schema() -> Arc<Schema> {
    let query = ObjectMeta::new(
        "Query",
        vec![Field::new("read", named("Int")).resolve_with(|params| {
            let counter = params.context_as::<Counter>().ok_or("no counter")?;
            Ok(Value::Int(counter.0.load(Ordering::SeqCst)))
        })],
    );
    let mutation = ObjectMeta::new(
        "Mutation",
        vec![
            Field::new("incr", named("Int")).resolve_with(|params| {
                let counter = params.context_as::<Counter>().ok_or("no counter")?;
                Ok(Value::Int(counter.0.fetch_add(1, Ordering::SeqCst) + 1))
            }),
            Field::new("read", named("Int")).resolve_with(|params| {
                let counter = params.context_as::<Counter>().ok_or("no counter")?;
                Ok(Value::Int(counter.0.load(Ordering::SeqCst)))
            }),
        ],
    );
    Schema::build()
        .query(query)
        .mutation(mutation)
        .finish()
        .unwrap()
}

#[tokio::test]
async fn mutations_run_serially_in_document_order() {
    let schema = counter_schema();
    let counter = Counter(AtomicI32::new(0));

    let result = run(
        &schema,
        "mutation { first: incr second: incr third: read }",
        &Value::Null,
        &counter,
    )
    .await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(
        result.data,
        Some(graphql_value!({"first": 1, "second": 2, "third": 2})),
    );

    // The response keys keep document order.
    let json = serde_json::to_string(&result).unwrap();
    assert_eq!(json, r#"{"data":{"first":1,"second":2,"third":2}}"#);
}

#[tokio::test]
async fn skip_and_include_directives() {
    let schema = hello_world_schema().unwrap();

    let result = crate::graphql(
        &schema,
        "query Q($yes: Boolean!, $no: Boolean!) {
           a: hello @skip(if: $no)
           b: hello @skip(if: $yes)
           c: hello @include(if: $yes)
           d: hello @include(if: $no)
         }",
        &Value::Null,
        &(),
        &graphql_vars! {"yes": true, "no": false},
        None,
    )
    .await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(
        result.data,
        Some(graphql_value!({"a": "world", "c": "world"})),
    );
}

#[tokio::test]
async fn merges_fields_selected_twice() {
    let schema = hello_world_schema().unwrap();
    let result = run(&schema, "{ hello hello }", &Value::Null, &()).await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(result.data, Some(graphql_value!({"hello": "world"})));
}

#[tokio::test]
async fn selecting_an_unnamed_operation_among_many_fails() {
    let schema = hello_world_schema().unwrap();
    let result = crate::executor::execute(
        &schema,
        &crate::parse("query A { hello } query B { hello }").unwrap(),
        &Variables::new(),
        &Value::Null,
        &(),
        None,
    )
    .await;

    assert_eq!(result.data, None);
    assert_eq!(
        result.errors[0].message,
        "Must provide operation name if query contains multiple operations.",
    );
}

#[tokio::test]
async fn arguments_reach_the_resolver() {
    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("add", named("Int"))
                .argument(Argument::new("a", non_null("Int")))
                .argument(
                    Argument::new("b", named("Int")).default_value(Value::Int(10)),
                )
                .resolve_with(|params| {
                    let a: i32 = params.args.get("a")?;
                    let b: i32 = params.args.get("b")?;
                    Ok(Value::Int(a + b))
                }),
        ],
    );
    let schema = Schema::build().query(query).finish().unwrap();

    let result = run(&schema, "{ sum: add(a: 2, b: 3) dflt: add(a: 2) }", &Value::Null, &()).await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(result.data, Some(graphql_value!({"sum": 5, "dflt": 12})));
}

#[tokio::test]
async fn syntax_errors_surface_with_a_location() {
    let schema = hello_world_schema().unwrap();
    let result = run(&schema, "{ hello", &Value::Null, &()).await;

    assert_eq!(result.data, None);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.starts_with("Syntax Error"));
    assert_eq!(result.errors[0].locations.len(), 1);
}
