use crate::{
    ast::{Definition, InputValue, OperationType, Selection, Type, TypeSystemDefinition},
    parser::{parse, ParseError, SourcePosition},
};

#[test]
fn errors_on_empty_document() {
    let err = parse("").unwrap_err();
    assert_eq!(err.item, ParseError::UnexpectedEndOfFile);
}

#[test]
fn errors_on_garbage_definition() {
    let err = parse("nonsense").unwrap_err();
    assert_eq!(err.item, ParseError::UnexpectedToken("nonsense".into()));

    let err = parse("{ foo ").unwrap_err();
    assert_eq!(err.item, ParseError::UnexpectedEndOfFile);
}

#[test]
fn parses_anonymous_shorthand() {
    let doc = parse("{ node { id } }").unwrap();
    assert_eq!(doc.definitions.len(), 1);

    let op = doc.operations().next().unwrap();
    assert_eq!(op.item.operation_type, OperationType::Query);
    assert!(op.item.name.is_none());
    assert_eq!(op.item.selection_set.len(), 1);
}

#[test]
fn parses_named_operations() {
    let doc = parse(
        r#"
        query Q { a }
        mutation M { b }
        subscription S { c }
        "#,
    )
    .unwrap();

    let names: Vec<_> = doc
        .operations()
        .map(|op| {
            (
                op.item.operation_type,
                op.item.name.as_ref().unwrap().item.clone(),
            )
        })
        .collect();
    assert_eq!(
        names,
        [
            (OperationType::Query, "Q".into()),
            (OperationType::Mutation, "M".into()),
            (OperationType::Subscription, "S".into()),
        ]
    );
}

#[test]
fn parses_aliases_arguments_and_directives() {
    let doc = parse(r#"{ renamed: node(id: 4, opts: {flag: true}) @skip(if: $cond) { id } }"#)
        .unwrap();

    let op = doc.operations().next().unwrap();
    let Selection::Field(field) = &op.item.selection_set[0] else {
        panic!("expected a field");
    };

    assert_eq!(field.item.alias.as_ref().unwrap().item, "renamed");
    assert_eq!(field.item.name.item, "node");
    assert_eq!(field.item.response_key(), "renamed");

    let args = field.item.arguments.as_ref().unwrap();
    assert_eq!(args.item.len(), 2);
    assert_eq!(args.item.get("id").unwrap().item, InputValue::Int(4));

    let directives = field.item.directives.as_ref().unwrap();
    assert_eq!(directives[0].item.name.item, "skip");
    assert_eq!(
        directives[0]
            .item
            .arguments
            .as_ref()
            .unwrap()
            .item
            .get("if")
            .unwrap()
            .item,
        InputValue::Variable("cond".into())
    );
}

#[test]
fn parses_variable_definitions() {
    let doc = parse(r#"query Q($id: ID!, $limit: Int = 10, $tags: [String]) { node }"#).unwrap();

    let op = doc.operations().next().unwrap();
    let defs = &op.item.variable_definitions.as_ref().unwrap().item;
    let items: Vec<_> = defs.iter().collect();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].name.item, "id");
    assert_eq!(items[0].var_type.item, Type::NonNullNamed("ID".into()));
    assert!(items[0].default_value.is_none());

    assert_eq!(items[1].var_type.item, Type::Named("Int".into()));
    assert_eq!(
        items[1].default_value.as_ref().unwrap().item,
        InputValue::Int(10)
    );

    assert_eq!(
        items[2].var_type.item,
        Type::List(Box::new(Type::Named("String".into())))
    );
}

#[test]
fn parses_fragments_and_spreads() {
    let doc = parse(
        r#"
        query { ...frag ... on User { name } ... { inline } }
        fragment frag on User @cached { id }
        "#,
    )
    .unwrap();

    let op = doc.operations().next().unwrap();
    match &op.item.selection_set[..] {
        [
            Selection::FragmentSpread(spread),
            Selection::InlineFragment(typed),
            Selection::InlineFragment(untyped),
        ] => {
            assert_eq!(spread.item.name.item, "frag");
            assert_eq!(typed.item.type_condition.as_ref().unwrap().item, "User");
            assert!(untyped.item.type_condition.is_none());
        }
        other => panic!("unexpected selections: {other:?}"),
    }

    let frag = doc.fragments().next().unwrap();
    assert_eq!(frag.item.name.item, "frag");
    assert_eq!(frag.item.type_condition.item, "User");
    assert!(frag.item.directives.is_some());
}

#[test]
fn rejects_fragment_named_on() {
    let err = parse("fragment on on User { id }").unwrap_err();
    assert_eq!(err.item, ParseError::UnexpectedToken("on".into()));
}

#[test]
fn node_locations_cover_their_source() {
    let source = "{ node }";
    let doc = parse(source).unwrap();

    let op = doc.operations().next().unwrap();
    assert_eq!(op.span.start, SourcePosition::new(0, 0, 0));
    assert_eq!(op.span.end, SourcePosition::new(8, 0, 8));

    let Selection::Field(field) = &op.item.selection_set[0] else {
        panic!("expected a field");
    };
    assert_eq!(field.span.start, SourcePosition::new(2, 0, 2));
    assert_eq!(field.span.end, SourcePosition::new(6, 0, 6));
    assert!(field.span.end.index() <= source.len());
}

#[test]
fn parses_type_system_definitions() {
    let doc = parse(
        r#"
        "The root."
        type Query implements Node & Extra @tagged {
            "Fetches a thing"
            thing(id: ID!, limit: Int = 10): Thing!
        }

        schema { query: Query mutation: Mutation }

        scalar DateTime

        interface Node { id: ID! }

        union Pet = Dog | Cat

        enum Episode { NEWHOPE EMPIRE JEDI }

        input Point { x: Float y: Float }

        directive @cached(ttl: Int) repeatable on FIELD | FRAGMENT_SPREAD
        "#,
    )
    .unwrap();

    let kinds: Vec<&str> = doc
        .definitions
        .iter()
        .map(|d| match d {
            Definition::TypeSystem(ts) => match &ts.item {
                TypeSystemDefinition::Object(_) => "object",
                TypeSystemDefinition::Schema(_) => "schema",
                TypeSystemDefinition::Scalar(_) => "scalar",
                TypeSystemDefinition::Interface(_) => "interface",
                TypeSystemDefinition::Union(_) => "union",
                TypeSystemDefinition::Enum(_) => "enum",
                TypeSystemDefinition::InputObject(_) => "input",
                TypeSystemDefinition::Directive(_) => "directive",
            },
            _ => "executable",
        })
        .collect();
    assert_eq!(
        kinds,
        [
            "object",
            "schema",
            "scalar",
            "interface",
            "union",
            "enum",
            "input",
            "directive",
        ]
    );

    let Definition::TypeSystem(first) = &doc.definitions[0] else {
        panic!("expected a type-system definition");
    };
    let TypeSystemDefinition::Object(obj) = &first.item else {
        panic!("expected an object definition");
    };
    assert_eq!(obj.description.as_ref().unwrap().item, "The root.");
    assert_eq!(obj.name.item, "Query");
    assert_eq!(
        obj.interfaces.iter().map(|i| &i.item).collect::<Vec<_>>(),
        ["Node", "Extra"]
    );
    assert_eq!(obj.fields.len(), 1);

    let field = &obj.fields[0].item;
    assert_eq!(field.name.item, "thing");
    assert_eq!(field.description.as_ref().unwrap().item, "Fetches a thing");
    assert_eq!(field.arguments.len(), 2);
    assert_eq!(field.field_type.item, Type::NonNullNamed("Thing".into()));

    let Definition::TypeSystem(last) = doc.definitions.last().unwrap() else {
        panic!("expected a type-system definition");
    };
    let TypeSystemDefinition::Directive(directive) = &last.item else {
        panic!("expected a directive definition");
    };
    assert!(directive.repeatable);
    assert_eq!(
        directive.locations.iter().map(|l| &l.item).collect::<Vec<_>>(),
        ["FIELD", "FRAGMENT_SPREAD"]
    );
}

#[test]
fn parse_is_deterministic() {
    let source = "query Q($a: Int) { f(x: $a) @skip(if: false) { ...g } } fragment g on T { h }";
    assert_eq!(parse(source).unwrap(), parse(source).unwrap());
}
