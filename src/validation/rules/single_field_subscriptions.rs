use std::collections::HashMap;

use crate::{
    ast::{Document, Operation, OperationType, Selection},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub fn factory<'a>() -> SingleFieldSubscriptions<'a> {
    SingleFieldSubscriptions {
        fragments: HashMap::new(),
    }
}

pub struct SingleFieldSubscriptions<'a> {
    fragments: HashMap<&'a str, &'a [Selection]>,
}

impl<'a> SingleFieldSubscriptions<'a> {
    /// Collects the response keys a selection set resolves to, expanding
    /// fragments; stops growing `keys` beyond what error reporting needs.
    fn collect_keys(
        &self,
        selection_set: &'a [Selection],
        visited: &mut Vec<&'a str>,
        keys: &mut Vec<(&'a str, SourcePosition)>,
    ) {
        for selection in selection_set {
            match selection {
                Selection::Field(field) => {
                    let key = field.item.response_key();
                    if !keys.iter().any(|(k, _)| *k == key) {
                        keys.push((key, field.span.start));
                    }
                }
                Selection::InlineFragment(f) => {
                    self.collect_keys(&f.item.selection_set, visited, keys);
                }
                Selection::FragmentSpread(spread) => {
                    let name = spread.item.name.item.as_str();
                    if visited.contains(&name) {
                        continue;
                    }
                    visited.push(name);
                    if let Some(&selection_set) = self.fragments.get(name) {
                        self.collect_keys(selection_set, visited, keys);
                    }
                }
            }
        }
    }
}

impl<'a> Visitor<'a> for SingleFieldSubscriptions<'a> {
    fn enter_document(&mut self, _: &mut ValidatorContext<'a>, doc: &'a Document) {
        self.fragments = doc
            .fragments()
            .map(|f| (f.item.name.item.as_str(), &f.item.selection_set[..]))
            .collect();
    }

    fn enter_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        if op.item.operation_type != OperationType::Subscription {
            return;
        }

        let mut keys = Vec::new();
        self.collect_keys(&op.item.selection_set, &mut Vec::new(), &mut keys);

        if keys.len() > 1 {
            let name = op.item.name.as_ref().map(|n| n.item.as_str());
            let extra_positions: Vec<_> = keys[1..].iter().map(|(_, pos)| *pos).collect();
            ctx.report_error(&error_message(name), &extra_positions);
        }
    }
}

fn error_message(operation_name: Option<&str>) -> String {
    match operation_name {
        Some(name) => {
            format!("Subscription \"{name}\" must select only one top level field.")
        }
        None => "Anonymous Subscription must select only one top level field.".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn valid_single_field_subscription() {
        expect_passes_rule(factory, "subscription ImportantEmails { newMessage }");
    }

    #[test]
    fn queries_are_unconstrained() {
        expect_passes_rule(factory, "{ dog { name } human { name } }");
    }

    #[test]
    fn multiple_root_fields_fail() {
        expect_fails_rule(
            factory,
            "subscription ImportantEmails { newMessage disallowedSecondRootField }",
            &[(&error_message(Some("ImportantEmails")), &[(1, 43)])],
        );
    }

    #[test]
    fn multiple_root_fields_via_fragment_fail() {
        expect_fails_rule(
            factory,
            "subscription Boom { ...multipleSubscriptions } fragment multipleSubscriptions on SubscriptionRoot { newMessage disallowedSecondRootField }",
            &[(&error_message(Some("Boom")), &[(1, 112)])],
        );
    }
}
