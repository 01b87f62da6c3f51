//! An optional rule: rejects queries using schema introspection. Not part of
//! the default set; compose it with [`visit`](crate::validation::visit) when
//! introspection should be refused.

use crate::{
    ast::Field,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> NoSchemaIntrospection {
    NoSchemaIntrospection
}

pub struct NoSchemaIntrospection;

impl<'a> Visitor<'a> for NoSchemaIntrospection {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field>) {
        let name = &field.item.name.item;
        if name == "__schema" || name == "__type" {
            ctx.report_error(&error_message(name), &[field.span.start]);
        }
    }
}

fn error_message(field_name: &str) -> String {
    format!(
        "GraphQL introspection has been disabled, but the requested query contained the field \
         \"{field_name}\"."
    )
}
