//! SDL rule: type names in a type-definition document must be unique.

use std::collections::hash_map::{Entry, HashMap};

use crate::{
    ast::{Definition, Document},
    error::GraphQLError,
    parser::SourcePosition,
};

pub(crate) fn check(doc: &Document, errors: &mut Vec<GraphQLError>) {
    let mut known: HashMap<&str, SourcePosition> = HashMap::new();

    for def in &doc.definitions {
        let Definition::TypeSystem(ts) = def else {
            continue;
        };
        let Some(name) = ts.item.type_name() else {
            continue;
        };

        match known.entry(name.item.as_str()) {
            Entry::Occupied(e) => {
                errors.push(GraphQLError::new(
                    error_message(&name.item),
                    &[*e.get(), name.span.start],
                ));
            }
            Entry::Vacant(e) => {
                e.insert(name.span.start);
            }
        }
    }
}

fn error_message(type_name: &str) -> String {
    format!("There can be only one type named \"{type_name}\".")
}
