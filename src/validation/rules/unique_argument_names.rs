use std::collections::hash_map::{Entry, HashMap};

use crate::{
    ast::{Directive, Field},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub fn factory<'a>() -> UniqueArgumentNames<'a> {
    UniqueArgumentNames {
        known_names: HashMap::new(),
    }
}

pub struct UniqueArgumentNames<'a> {
    known_names: HashMap<&'a str, SourcePosition>,
}

impl<'a> Visitor<'a> for UniqueArgumentNames<'a> {
    fn enter_directive(&mut self, _: &mut ValidatorContext<'a>, _: &'a Spanning<Directive>) {
        self.known_names.clear();
    }

    fn enter_field(&mut self, _: &mut ValidatorContext<'a>, _: &'a Spanning<Field>) {
        self.known_names.clear();
    }

    fn enter_argument(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (arg_name, _): &'a (Spanning<String>, Spanning<crate::ast::InputValue>),
    ) {
        match self.known_names.entry(arg_name.item.as_str()) {
            Entry::Occupied(e) => {
                ctx.report_error(
                    &error_message(&arg_name.item),
                    &[*e.get(), arg_name.span.start],
                );
            }
            Entry::Vacant(e) => {
                e.insert(arg_name.span.start);
            }
        }
    }
}

fn error_message(arg_name: &str) -> String {
    format!("There can be only one argument named \"{arg_name}\".")
}
