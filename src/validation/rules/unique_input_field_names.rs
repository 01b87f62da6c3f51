use std::collections::hash_map::{Entry, HashMap};

use crate::{
    ast::InputValue,
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> UniqueInputFieldNames {
    UniqueInputFieldNames
}

pub struct UniqueInputFieldNames;

impl<'a> Visitor<'a> for UniqueInputFieldNames {
    fn enter_object_value(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        object: Spanning<&'a Vec<(Spanning<String>, Spanning<InputValue>)>>,
    ) {
        let mut known_names: HashMap<&str, SourcePosition> = HashMap::new();
        for (name, _) in object.item {
            match known_names.entry(name.item.as_str()) {
                Entry::Occupied(e) => {
                    ctx.report_error(&error_message(&name.item), &[*e.get(), name.span.start]);
                }
                Entry::Vacant(e) => {
                    e.insert(name.span.start);
                }
            }
        }
    }
}

fn error_message(field_name: &str) -> String {
    format!("There can be only one input field named \"{field_name}\".")
}
