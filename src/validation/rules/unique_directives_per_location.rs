use std::collections::hash_map::{Entry, HashMap};

use crate::{
    ast::{Directive, Field, Fragment, FragmentSpread, InlineFragment, Operation,
        VariableDefinition,
    },
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub fn factory() -> UniqueDirectivesPerLocation {
    UniqueDirectivesPerLocation
}

pub struct UniqueDirectivesPerLocation;

impl UniqueDirectivesPerLocation {
    fn check_directives(
        &self,
        ctx: &mut ValidatorContext<'_>,
        directives: &Option<Vec<Spanning<Directive>>>,
    ) {
        let Some(directives) = directives else {
            return;
        };

        let mut seen: HashMap<&str, SourcePosition> = HashMap::new();
        for directive in directives {
            let name = directive.item.name.item.as_str();

            let repeatable = ctx
                .schema
                .directive_by_name(name)
                .is_some_and(|d| d.is_repeatable);
            if repeatable {
                continue;
            }

            match seen.entry(name) {
                Entry::Occupied(e) => {
                    ctx.report_error(
                        &error_message(name),
                        &[*e.get(), directive.span.start],
                    );
                }
                Entry::Vacant(e) => {
                    e.insert(directive.span.start);
                }
            }
        }
    }
}

impl<'a> Visitor<'a> for UniqueDirectivesPerLocation {
    fn enter_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        self.check_directives(ctx, &op.item.directives);
    }

    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a>, field: &'a Spanning<Field>) {
        self.check_directives(ctx, &field.item.directives);
    }

    fn enter_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a Spanning<Fragment>,
    ) {
        self.check_directives(ctx, &f.item.directives);
    }

    fn enter_fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread>,
    ) {
        self.check_directives(ctx, &spread.item.directives);
    }

    fn enter_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        f: &'a Spanning<InlineFragment>,
    ) {
        self.check_directives(ctx, &f.item.directives);
    }

    fn enter_variable_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        def: &'a VariableDefinition,
    ) {
        self.check_directives(ctx, &def.directives);
    }
}

fn error_message(directive_name: &str) -> String {
    format!("The directive \"@{directive_name}\" can only be used once at this location.")
}
