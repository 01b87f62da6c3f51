use std::collections::hash_map::{Entry, HashMap};

use crate::{
    ast::Fragment,
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub fn factory<'a>() -> UniqueFragmentNames<'a> {
    UniqueFragmentNames {
        names: HashMap::new(),
    }
}

pub struct UniqueFragmentNames<'a> {
    names: HashMap<&'a str, SourcePosition>,
}

impl<'a> Visitor<'a> for UniqueFragmentNames<'a> {
    fn enter_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<Fragment>,
    ) {
        let name = &fragment.item.name;
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
    format!("There can be only one fragment named \"{name}\".")
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn unique_fragments() {
        expect_passes_rule(
            factory,
            "fragment fragA on Dog { name } fragment fragB on Dog { nickname }",
        );
    }

    #[test]
    fn duplicate_fragments() {
        expect_fails_rule(
            factory,
            "fragment fragA on Dog { name } fragment fragA on Dog { nickname }",
            &[(&error_message("fragA"), &[(1, 10), (1, 41)])],
        );
    }
}
