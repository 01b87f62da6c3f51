use std::collections::hash_map::{Entry, HashMap};

use crate::{
    ast::Operation,
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub fn factory<'a>() -> UniqueOperationNames<'a> {
    UniqueOperationNames {
        names: HashMap::new(),
    }
}

pub struct UniqueOperationNames<'a> {
    names: HashMap<&'a str, SourcePosition>,
}

impl<'a> Visitor<'a> for UniqueOperationNames<'a> {
    fn enter_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        let Some(op_name) = &op.item.name else {
            return;
        };

        match self.names.entry(op_name.item.as_str()) {
            Entry::Occupied(e) => {
                ctx.report_error(
                    &error_message(op_name.item.as_str()),
                    &[*e.get(), op_name.span.start],
                );
            }
            Entry::Vacant(e) => {
                e.insert(op_name.span.start);
            }
        }
    }
}

fn error_message(op_name: &str) -> String {
    format!("There can be only one operation named \"{op_name}\".")
}
