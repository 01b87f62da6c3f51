//! SDL rule: field names within one type definition must be unique.

use std::collections::hash_map::{Entry, HashMap};

use crate::{
    ast::{Definition, Document, FieldDefinition, InputValueDefinition, TypeSystemDefinition},
    error::GraphQLError,
    parser::{SourcePosition, Spanning},
};

pub(crate) fn check(doc: &Document, errors: &mut Vec<GraphQLError>) {
    for def in &doc.definitions {
        let Definition::TypeSystem(ts) = def else {
            continue;
        };

        match &ts.item {
            TypeSystemDefinition::Object(d) => {
                check_fields(&d.name.item, &d.fields, errors);
            }
            TypeSystemDefinition::Interface(d) => {
                check_fields(&d.name.item, &d.fields, errors);
            }
            TypeSystemDefinition::InputObject(d) => {
                check_input_fields(&d.name.item, &d.fields, errors);
            }
            _ => {}
        }
    }
}

fn check_fields(
    type_name: &str,
    fields: &[Spanning<FieldDefinition>],
    errors: &mut Vec<GraphQLError>,
) {
    let mut known: HashMap<&str, SourcePosition> = HashMap::new();
    for field in fields {
        register(type_name, &field.item.name, &mut known, errors);
    }
}

fn check_input_fields(
    type_name: &str,
    fields: &[Spanning<InputValueDefinition>],
    errors: &mut Vec<GraphQLError>,
) {
    let mut known: HashMap<&str, SourcePosition> = HashMap::new();
    for field in fields {
        register(type_name, &field.item.name, &mut known, errors);
    }
}

fn register<'a>(
    type_name: &str,
    name: &'a Spanning<String>,
    known: &mut HashMap<&'a str, SourcePosition>,
    errors: &mut Vec<GraphQLError>,
) {
    match known.entry(name.item.as_str()) {
        Entry::Occupied(e) => {
            errors.push(GraphQLError::new(
                error_message(type_name, &name.item),
                &[*e.get(), name.span.start],
            ));
        }
        Entry::Vacant(e) => {
            e.insert(name.span.start);
        }
    }
}

fn error_message(type_name: &str, field_name: &str) -> String {
    format!("Field \"{type_name}.{field_name}\" can only be defined once.")
}

#[cfg(test)]
mod tests {
    use super::error_message;

    use crate::{parser::parse, validation::validate_sdl};

    #[test]
    fn distinct_field_names_pass() {
        let doc = parse("type Foo { a: String b: Int } input Bar { x: Int y: Int }").unwrap();
        assert!(validate_sdl(&doc).is_empty());
    }

    #[test]
    fn duplicate_object_field_names_fail() {
        let doc = parse("type Foo { a: String a: Int }").unwrap();
        let errors = validate_sdl(&doc);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, error_message("Foo", "a"));
    }

    #[test]
    fn duplicate_input_field_names_fail() {
        let doc = parse("input Bar { x: Int x: String }").unwrap();
        let errors = validate_sdl(&doc);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, error_message("Bar", "x"));
    }
}
