use std::collections::hash_map::{Entry, HashMap};

use crate::{
    ast::{Operation, VariableDefinition},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub fn factory<'a>() -> UniqueVariableNames<'a> {
    UniqueVariableNames {
        names: HashMap::new(),
    }
}

pub struct UniqueVariableNames<'a> {
    names: HashMap<&'a str, SourcePosition>,
}

impl<'a> Visitor<'a> for UniqueVariableNames<'a> {
    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Operation>,
    ) {
        self.names.clear();
    }

    fn enter_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a VariableDefinition,
    ) {
        let name = &def.name;
        match self.names.entry(name.item.as_str()) {
            Entry::Occupied(e) => {
                ctx.report_error(&error_message(&name.item), &[*e.get(), name.span.start]);
            }
            Entry::Vacant(e) => {
                e.insert(name.span.start);
            }
        }
    }
}

fn error_message(name: &str) -> String {
    format!("There can be only one variable named \"${name}\".")
}
