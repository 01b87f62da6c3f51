use pretty_assertions::assert_eq;

use crate::{
    tests::fixtures::starwars::schema::{schema, Database},
    value::{Value, Variables},
};

async fn run(query: &str) -> crate::ExecutionResult {
    let schema = schema().expect("star wars schema builds");
    let database = Database::new();
    crate::graphql(
        &schema,
        query,
        &Value::Null,
        &database,
        &Variables::new(),
        None,
    )
    .await
}

#[tokio::test]
async fn schema_meta_field_names_the_roots() {
    let result = run("{ __schema { queryType { name } mutationType { name } } }").await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(
        result.data,
        Some(graphql_value!({
            "__schema": {"queryType": {"name": "Query"}, "mutationType": null},
        })),
    );
}

#[tokio::test]
async fn type_meta_field_describes_a_type() {
    let result = run(
        "{ __type(name: \"Droid\") {
           kind
           name
           description
           interfaces { name }
         } }",
    )
    .await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(
        result.data,
        Some(graphql_value!({
            "__type": {
                "kind": "OBJECT",
                "name": "Droid",
                "description": "A mechanical creature in the Star Wars universe.",
                "interfaces": [{"name": "Character"}],
            },
        })),
    );
}

#[tokio::test]
async fn unknown_type_resolves_to_null() {
    let result = run("{ __type(name: \"Nonexistent\") { name } }").await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(result.data, Some(graphql_value!({"__type": null})));
}

#[tokio::test]
async fn field_types_unwrap_through_of_type() {
    let result = run(
        "{ __type(name: \"Character\") {
           fields {
             name
             type { kind name ofType { kind name } }
           }
         } }",
    )
    .await;

    assert_eq!(result.errors, vec![]);

    let data = result.data.expect("data is present");
    let fields = data
        .as_object_value()
        .and_then(|o| o.get_field_value("__type"))
        .and_then(Value::as_object_value)
        .and_then(|o| o.get_field_value("fields"))
        .and_then(Value::as_list_value)
        .expect("fields is a list");

    let id = fields
        .iter()
        .filter_map(Value::as_object_value)
        .find(|f| f.get_field_value("name") == Some(&Value::from("id")))
        .expect("id field is listed");
    assert_eq!(
        id.get_field_value("type"),
        Some(&graphql_value!({
            "kind": "NON_NULL",
            "name": null,
            "ofType": {"kind": "SCALAR", "name": "String"},
        })),
    );

    let friends = fields
        .iter()
        .filter_map(Value::as_object_value)
        .find(|f| f.get_field_value("name") == Some(&Value::from("friends")))
        .expect("friends field is listed");
    assert_eq!(
        friends.get_field_value("type"),
        Some(&graphql_value!({
            "kind": "LIST",
            "name": null,
            "ofType": {"kind": "INTERFACE", "name": "Character"},
        })),
    );
}

#[tokio::test]
async fn enum_values_are_listed() {
    let result = run("{ __type(name: \"Episode\") { enumValues { name } } }").await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(
        result.data,
        Some(graphql_value!({
            "__type": {
                "enumValues": [{"name": "NEWHOPE"}, {"name": "EMPIRE"}, {"name": "JEDI"}],
            },
        })),
    );
}

#[tokio::test]
async fn possible_types_of_an_interface() {
    let result = run("{ __type(name: \"Character\") { possibleTypes { name } } }").await;

    assert_eq!(result.errors, vec![]);
    assert_eq!(
        result.data,
        Some(graphql_value!({
            "__type": {"possibleTypes": [{"name": "Droid"}, {"name": "Human"}]},
        })),
    );
}

#[tokio::test]
async fn directives_are_listed() {
    let result = run("{ __schema { directives { name } } }").await;

    assert_eq!(result.errors, vec![]);

    let data = result.data.expect("data is present");
    let names: Vec<_> = data
        .as_object_value()
        .and_then(|o| o.get_field_value("__schema"))
        .and_then(Value::as_object_value)
        .and_then(|o| o.get_field_value("directives"))
        .and_then(Value::as_list_value)
        .expect("directives is a list")
        .iter()
        .filter_map(Value::as_object_value)
        .filter_map(|d| d.get_field_value("name"))
        .filter_map(Value::as_string_value)
        .collect();

    assert!(names.contains(&"skip"));
    assert!(names.contains(&"include"));
    assert!(names.contains(&"deprecated"));
}
