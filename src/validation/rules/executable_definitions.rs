use crate::{
    ast::TypeSystemDefinition,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> ExecutableDefinitions {
    ExecutableDefinitions
}

pub struct ExecutableDefinitions;

impl<'a> Visitor<'a> for ExecutableDefinitions {
    fn enter_type_system_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a Spanning<TypeSystemDefinition>,
    ) {
        let message = match def.item.type_name() {
            Some(name) => error_message(&name.item),
            None => "The schema definition is not executable.".into(),
        };
        ctx.report_error(&message, &[def.span.start]);
    }
}

fn error_message(name: &str) -> String {
    format!("The \"{name}\" definition is not executable.")
}
