use crate::{
    ast::{Fragment, InlineFragment},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> FragmentsOnCompositeTypes {
    FragmentsOnCompositeTypes
}

pub struct FragmentsOnCompositeTypes;

impl<'a> Visitor<'a> for FragmentsOnCompositeTypes {
    fn enter_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a Spanning<Fragment>,
    ) {
        if let Some(current_type) = ctx.current_type() {
            if !current_type.is_composite() {
                let type_name = current_type.name().clone();
                ctx.report_error(
                    &error_message(Some(f.item.name.item.as_str()), &type_name),
                    &[f.item.type_condition.span.start],
                );
            }
        }
    }

    fn enter_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a Spanning<InlineFragment>,
    ) {
        if let Some(cond) = &f.item.type_condition {
            if let Some(current_type) = ctx.current_type() {
                if !current_type.is_composite() {
                    let type_name = current_type.name().clone();
                    ctx.report_error(&error_message(None, &type_name), &[cond.span.start]);
                }
            }
        }
    }
}

fn error_message(fragment_name: Option<&str>, on_type: &str) -> String {
    match fragment_name {
        Some(name) => {
            format!("Fragment \"{name}\" cannot condition on non composite type \"{on_type}\".")
        }
        None => format!("Fragment cannot condition on non composite type \"{on_type}\"."),
    }
}
