//! An optional rule: rejects any use of deprecated fields, arguments or enum
//! values. Not part of the default set.

use crate::{
    ast::{Field, InputValue},
    parser::Spanning,
    schema::meta::MetaType,
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> NoDeprecated {
    NoDeprecated
}

pub struct NoDeprecated;

impl<'a> Visitor<'a> for NoDeprecated {
    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field>) {
        let (Some(field_def), Some(parent)) = (ctx.current_field(), ctx.parent_type()) else {
            return;
        };

        if let Some(reason) = field_def.deprecation_status.reason().or_else(|| {
            field_def
                .deprecation_status
                .is_deprecated()
                .then_some("No longer supported")
        }) {
            let parent_name = parent.name().clone();
            ctx.report_error(
                &field_error_message(&parent_name, &field.item.name.item, reason),
                &[field.span.start],
            );
        }
    }

    fn enter_argument(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        (arg_name, _): &'a (Spanning<String>, Spanning<InputValue>),
    ) {
        let Some(field_def) = (!ctx.in_directive()).then(|| ctx.current_field()).flatten()
        else {
            return;
        };

        let Some(arg_def) = field_def
            .arguments
            .iter()
            .find(|a| a.name == arg_name.item)
        else {
            return;
        };

        if arg_def.deprecation_status.is_deprecated() {
            let field_name = field_def.name.clone();
            let reason = arg_def
                .deprecation_status
                .reason()
                .unwrap_or("No longer supported")
                .to_owned();
            ctx.report_error(
                &argument_error_message(&arg_name.item, &field_name, &reason),
                &[arg_name.span.start],
            );
        }
    }

    fn enter_enum_value(&mut self, ctx: &mut ValidatorContext<'a>, value: Spanning<&'a str>) {
        let Some(MetaType::Enum(enum_meta)) = ctx.current_input_type() else {
            return;
        };

        if let Some(enum_value) = enum_meta.value_by_name(value.item) {
            if enum_value.deprecation_status.is_deprecated() {
                let enum_name = enum_meta.name.clone();
                let reason = enum_value
                    .deprecation_status
                    .reason()
                    .unwrap_or("No longer supported")
                    .to_owned();
                ctx.report_error(
                    &enum_value_error_message(value.item, &enum_name, &reason),
                    &[value.span.start],
                );
            }
        }
    }
}

fn field_error_message(type_name: &str, field_name: &str, reason: &str) -> String {
    format!("The field {type_name}.{field_name} is deprecated. {reason}")
}

fn argument_error_message(arg_name: &str, field_name: &str, reason: &str) -> String {
    format!("Field \"{field_name}\" argument \"{arg_name}\" is deprecated. {reason}")
}

fn enum_value_error_message(value_name: &str, enum_name: &str, reason: &str) -> String {
    format!("The enum value \"{enum_name}.{value_name}\" is deprecated. {reason}")
}
