//! Shared fixtures for the per-rule test suites: a canonical test schema and
//! the `expect_passes_rule` / `expect_fails_rule` assertions.

use std::sync::{Arc, OnceLock};

use pretty_assertions::assert_eq;

use crate::{
    ast::{Document, Type},
    error::GraphQLError,
    parser::{parse, SourceLocation},
    schema::{
        meta::{
            Argument, EnumMeta, EnumValue, Field, InputObjectMeta, InterfaceMeta,
            ObjectMeta, UnionMeta,
        },
        model::Schema,
    },
    validation::{visit, ValidatorContext, Visitor},
    value::Value,
};

fn named(name: &str) -> Type {
    Type::Named(name.into())
}

fn non_null(name: &str) -> Type {
    Type::NonNullNamed(name.into())
}

fn list_of(name: &str) -> Type {
    Type::List(Box::new(named(name)))
}

fn name_field() -> Field {
    Field::new("name", named("String"))
        .argument(Argument::new("surname", named("Boolean")))
}

fn build_test_schema() -> Arc<Schema> {
    let being = InterfaceMeta::new("Being", vec![name_field()]);
    let pet = InterfaceMeta::new("Pet", vec![name_field()]);
    let canine = InterfaceMeta::new("Canine", vec![name_field()]);
    let intelligent = InterfaceMeta::new("Intelligent", vec![Field::new("iq", named("Int"))]);

    let dog_command = EnumMeta::new(
        "DogCommand",
        vec![
            EnumValue::new("SIT"),
            EnumValue::new("HEEL"),
            EnumValue::new("DOWN"),
        ],
    );

    let fur_color = EnumMeta::new(
        "FurColor",
        vec![
            EnumValue::new("BROWN"),
            EnumValue::new("BLACK"),
            EnumValue::new("TAN"),
            EnumValue::new("SPOTTED"),
            EnumValue::new("NO_FUR").deprecated(Some("testing")),
        ],
    );

    let dog = ObjectMeta::new(
        "Dog",
        vec![
            name_field(),
            Field::new("nickname", named("String")),
            Field::new("barkVolume", named("Int")),
            Field::new("barks", named("Boolean")),
            Field::new("doesKnowCommand", named("Boolean"))
                .argument(Argument::new("dogCommand", named("DogCommand"))),
            Field::new("isHousetrained", named("Boolean")).argument(
                Argument::new("atOtherHomes", named("Boolean"))
                    .default_value(Value::Boolean(true)),
            ),
            Field::new("isAtLocation", named("Boolean"))
                .argument(Argument::new("x", named("Int")))
                .argument(Argument::new("y", named("Int"))),
        ],
    )
    .interfaces(&["Being", "Pet", "Canine"]);

    let cat = ObjectMeta::new(
        "Cat",
        vec![
            name_field(),
            Field::new("nickname", named("String")),
            Field::new("meows", named("Boolean")),
            Field::new("meowVolume", named("Int")),
            Field::new("furColor", named("FurColor")),
        ],
    )
    .interfaces(&["Being", "Pet"]);

    let human = ObjectMeta::new(
        "Human",
        vec![
            name_field(),
            Field::new("pets", list_of("Pet")),
            Field::new("relatives", list_of("Human")),
            Field::new("iq", named("Int")),
        ],
    )
    .interfaces(&["Being", "Intelligent"]);

    let alien = ObjectMeta::new(
        "Alien",
        vec![
            name_field(),
            Field::new("iq", named("Int")),
            Field::new("numEyes", named("Int")),
        ],
    )
    .interfaces(&["Being", "Intelligent"]);

    let cat_or_dog = UnionMeta::new("CatOrDog", &["Cat", "Dog"]);
    let dog_or_human = UnionMeta::new("DogOrHuman", &["Dog", "Human"]);
    let human_or_alien = UnionMeta::new("HumanOrAlien", &["Human", "Alien"]);

    let complex_input = InputObjectMeta::new(
        "ComplexInput",
        vec![
            Argument::new("requiredField", non_null("Boolean")),
            Argument::new("intField", named("Int")),
            Argument::new("stringField", named("String")),
            Argument::new("booleanField", named("Boolean")),
            Argument::new("stringListField", list_of("String")),
        ],
    );

    let one_of_input = InputObjectMeta::new(
        "OneOfInput",
        vec![
            Argument::new("stringField", named("String")),
            Argument::new("intField", named("Int")),
        ],
    )
    .one_of();

    let complicated_args = ObjectMeta::new(
        "ComplicatedArgs",
        vec![
            Field::new("intArgField", named("String"))
                .argument(Argument::new("intArg", named("Int"))),
            Field::new("nonNullIntArgField", named("String"))
                .argument(Argument::new("nonNullIntArg", non_null("Int"))),
            Field::new("stringArgField", named("String"))
                .argument(Argument::new("stringArg", named("String"))),
            Field::new("booleanArgField", named("String"))
                .argument(Argument::new("booleanArg", named("Boolean"))),
            Field::new("enumArgField", named("String"))
                .argument(Argument::new("enumArg", named("FurColor"))),
            Field::new("floatArgField", named("String"))
                .argument(Argument::new("floatArg", named("Float"))),
            Field::new("idArgField", named("String"))
                .argument(Argument::new("idArg", named("ID"))),
            Field::new("stringListArgField", named("String"))
                .argument(Argument::new("stringListArg", list_of("String"))),
            Field::new("complexArgField", named("String"))
                .argument(Argument::new("complexArg", named("ComplexInput"))),
            Field::new("oneOfArgField", named("String"))
                .argument(Argument::new("oneOfArg", named("OneOfInput"))),
            Field::new("multipleReqs", named("String"))
                .argument(Argument::new("req1", non_null("Int")))
                .argument(Argument::new("req2", non_null("Int"))),
            Field::new("multipleOpts", named("String"))
                .argument(Argument::new("opt1", named("Int")).default_value(Value::Int(0)))
                .argument(Argument::new("opt2", named("Int")).default_value(Value::Int(0))),
            Field::new("multipleOptAndReq", named("String"))
                .argument(Argument::new("req1", non_null("Int")))
                .argument(Argument::new("req2", non_null("Int")))
                .argument(Argument::new("opt1", named("Int")).default_value(Value::Int(0)))
                .argument(Argument::new("opt2", named("Int")).default_value(Value::Int(0))),
        ],
    );

    let query_root = ObjectMeta::new(
        "QueryRoot",
        vec![
            Field::new("human", named("Human")).argument(Argument::new("id", named("ID"))),
            Field::new("alien", named("Alien")),
            Field::new("dog", named("Dog")),
            Field::new("cat", named("Cat")),
            Field::new("pet", named("Pet")),
            Field::new("being", named("Being")),
            Field::new("catOrDog", named("CatOrDog")),
            Field::new("dogOrHuman", named("DogOrHuman")),
            Field::new("humanOrAlien", named("HumanOrAlien")),
            Field::new("complicatedArgs", named("ComplicatedArgs")),
            Field::new("deprecatedField", named("String")).deprecated(Some("use another field")),
        ],
    );

    let mutation_root = ObjectMeta::new(
        "MutationRoot",
        vec![
            Field::new("testInput", named("String"))
                .argument(Argument::new("input", named("ComplexInput"))),
        ],
    );

    let subscription_root = ObjectMeta::new(
        "SubscriptionRoot",
        vec![
            Field::new("newMessage", named("String")),
            Field::new("disallowedSecondRootField", named("String")),
        ],
    );

    Schema::build()
        .query(query_root)
        .mutation(mutation_root)
        .subscription(subscription_root)
        .register(being.into_meta())
        .register(pet.into_meta())
        .register(canine.into_meta())
        .register(intelligent.into_meta())
        .register(dog_command.into_meta())
        .register(fur_color.into_meta())
        .register(dog.into_meta())
        .register(cat.into_meta())
        .register(human.into_meta())
        .register(alien.into_meta())
        .register(cat_or_dog.into_meta())
        .register(dog_or_human.into_meta())
        .register(human_or_alien.into_meta())
        .register(complex_input.into_meta())
        .register(one_of_input.into_meta())
        .register(complicated_args.into_meta())
        .finish()
        .expect("test schema is valid")
}

/// The canonical test schema, shared by every rule's tests.
pub(crate) fn test_schema() -> &'static Schema {
    static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();
    SCHEMA.get_or_init(build_test_schema).as_ref()
}

/// Parses a test query, handing out a `'static` document so rule visitors
/// (which borrow the tree) unify with the shared schema's lifetime.
fn parse_static(q: &str) -> &'static Document {
    Box::leak(Box::new(parse(q).expect("test query parses")))
}

fn validate_single_rule<V, F>(factory: F, q: &str) -> Vec<GraphQLError>
where
    V: Visitor<'static>,
    F: FnOnce() -> V,
{
    let schema = test_schema();
    let doc = parse_static(q);
    let mut ctx = ValidatorContext::new(schema, doc);
    let mut visitor = factory();
    visit(&mut visitor, &mut ctx, doc);
    ctx.into_errors()
}

pub(crate) fn expect_passes_rule<V, F>(factory: F, q: &str)
where
    V: Visitor<'static>,
    F: FnOnce() -> V,
{
    let errors = validate_single_rule(factory, q);
    assert_eq!(errors, Vec::<GraphQLError>::new(), "expected no errors for {q}");
}

/// Asserts that the rule rejects `q` with exactly the `expected` errors;
/// positions are one-based `(line, column)` pairs.
pub(crate) fn expect_fails_rule<V, F>(
    factory: F,
    q: &str,
    expected: &[(&str, &[(usize, usize)])],
) where
    V: Visitor<'static>,
    F: FnOnce() -> V,
{
    let errors = validate_single_rule(factory, q);
    assert!(!errors.is_empty(), "expected errors for {q}");

    let mut expected: Vec<(String, Vec<SourceLocation>)> = expected
        .iter()
        .map(|(message, positions)| {
            (
                (*message).to_owned(),
                positions
                    .iter()
                    .map(|&(line, column)| SourceLocation { line, column })
                    .collect(),
            )
        })
        .collect();
    expected.sort_by(|a, b| {
        (a.1.first().map(|l| (l.line, l.column)), &a.0)
            .cmp(&(b.1.first().map(|l| (l.line, l.column)), &b.0))
    });

    let actual: Vec<(String, Vec<SourceLocation>)> = errors
        .into_iter()
        .map(|e| (e.message, e.locations))
        .collect();

    assert_eq!(actual, expected, "for query {q}");
}
