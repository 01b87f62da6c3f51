use std::collections::HashMap;

use crate::{
    ast::{Document, FragmentSpread, InlineFragment},
    parser::Spanning,
    schema::meta::MetaType,
    validation::{ValidatorContext, Visitor},
};

pub fn factory<'a>() -> PossibleFragmentSpreads<'a> {
    PossibleFragmentSpreads {
        fragment_types: HashMap::new(),
    }
}

pub struct PossibleFragmentSpreads<'a> {
    fragment_types: HashMap<&'a str, &'a str>,
}

impl<'a> Visitor<'a> for PossibleFragmentSpreads<'a> {
    fn enter_document(&mut self, _: &mut ValidatorContext<'a>, doc: &'a Document) {
        self.fragment_types = doc
            .fragments()
            .map(|f| {
                (
                    f.item.name.item.as_str(),
                    f.item.type_condition.item.as_str(),
                )
            })
            .collect();
    }

    fn enter_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<InlineFragment>,
    ) {
        let (Some(fragment_type), Some(parent_type)) = (ctx.current_type(), ctx.parent_type())
        else {
            return;
        };

        if fragment_type.is_composite()
            && parent_type.is_composite()
            && !ctx.schema.type_overlap(parent_type, fragment_type)
        {
            let (parent_name, fragment_name) =
                (parent_type.name().clone(), fragment_type.name().clone());
            ctx.report_error(
                &inline_error_message(&parent_name, &fragment_name),
                &[fragment.span.start],
            );
        }
    }

    fn enter_fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread>,
    ) {
        let Some(parent_type) = ctx.parent_type() else {
            return;
        };
        let Some(fragment_type) = self
            .fragment_types
            .get(spread.item.name.item.as_str())
            .and_then(|name| ctx.schema.concrete_type_by_name(name))
        else {
            return;
        };

        if is_incompatible(ctx, parent_type, fragment_type) {
            let (parent_name, fragment_name) =
                (parent_type.name().clone(), fragment_type.name().clone());
            ctx.report_error(
                &spread_error_message(&spread.item.name.item, &parent_name, &fragment_name),
                &[spread.span.start],
            );
        }
    }
}

fn is_incompatible(
    ctx: &ValidatorContext<'_>,
    parent_type: &MetaType,
    fragment_type: &MetaType,
) -> bool {
    fragment_type.is_composite()
        && parent_type.is_composite()
        && !ctx.schema.type_overlap(parent_type, fragment_type)
}

fn inline_error_message(parent_type_name: &str, fragment_type_name: &str) -> String {
    format!(
        "Fragment cannot be spread here as objects of type \"{parent_type_name}\" can never \
         be of type \"{fragment_type_name}\"."
    )
}

fn spread_error_message(
    fragment_name: &str,
    parent_type_name: &str,
    fragment_type_name: &str,
) -> String {
    format!(
        "Fragment \"{fragment_name}\" cannot be spread here as objects of type \
         \"{parent_type_name}\" can never be of type \"{fragment_type_name}\"."
    )
}
