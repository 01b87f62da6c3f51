use std::collections::{HashMap, HashSet};

use crate::{
    ast::{Document, Fragment, FragmentSpread, Operation},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub fn factory<'a>() -> NoUnusedFragments<'a> {
    NoUnusedFragments {
        current_scope: None,
        spreads: HashMap::new(),
        defined_fragments: Vec::new(),
    }
}

#[derive(Clone, Eq, Hash, PartialEq)]
enum Scope<'a> {
    Operation,
    Fragment(&'a str),
}

pub struct NoUnusedFragments<'a> {
    current_scope: Option<Scope<'a>>,
    spreads: HashMap<Scope<'a>, Vec<&'a str>>,
    defined_fragments: Vec<(&'a str, SourcePosition)>,
}

impl<'a> NoUnusedFragments<'a> {
    fn reachable_from(&self, scope: &Scope<'a>, reachable: &mut HashSet<&'a str>) {
        if let Scope::Fragment(name) = scope {
            if !reachable.insert(name) {
                return;
            }
        }

        if let Some(spreads) = self.spreads.get(scope) {
            for spread in spreads {
                self.reachable_from(&Scope::Fragment(spread), reachable);
            }
        }
    }
}

impl<'a> Visitor<'a> for NoUnusedFragments<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document) {
        let mut reachable = HashSet::new();
        self.reachable_from(&Scope::Operation, &mut reachable);

        for (fragment_name, position) in &self.defined_fragments {
            if !reachable.contains(fragment_name) {
                ctx.report_error(&error_message(fragment_name), &[*position]);
            }
        }
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a Spanning<Operation>,
    ) {
        self.current_scope = Some(Scope::Operation);
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<Fragment>,
    ) {
        let name = fragment.item.name.item.as_str();
        self.current_scope = Some(Scope::Fragment(name));
        self.defined_fragments
            .push((name, fragment.span.start));
    }

    fn enter_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread>,
    ) {
        if let Some(scope) = &self.current_scope {
            self.spreads
                .entry(scope.clone())
                .or_default()
                .push(&spread.item.name.item);
        }
    }
}

fn error_message(fragment_name: &str) -> String {
    format!("Fragment \"{fragment_name}\" is never used.")
}
