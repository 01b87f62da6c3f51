use std::collections::{HashMap, HashSet};

use crate::{
    ast::{Document, Fragment, FragmentSpread},
    error::GraphQLError,
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub fn factory<'a>() -> NoFragmentCycles<'a> {
    NoFragmentCycles {
        current_fragment: None,
        spreads: HashMap::new(),
        fragment_order: Vec::new(),
    }
}

pub struct NoFragmentCycles<'a> {
    current_fragment: Option<&'a str>,
    spreads: HashMap<&'a str, Vec<(&'a str, SourcePosition)>>,
    fragment_order: Vec<&'a str>,
}

impl<'a> Visitor<'a> for NoFragmentCycles<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document) {
        debug_assert!(self.current_fragment.is_none());

        let mut detector = CycleDetector {
            visited: HashSet::new(),
            spreads: &self.spreads,
            errors: Vec::new(),
        };

        for frag in &self.fragment_order {
            if !detector.visited.contains(frag) {
                detector.detect_from(frag);
            }
        }

        ctx.append_errors(detector.errors);
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<Fragment>,
    ) {
        debug_assert!(self.current_fragment.is_none());

        let fragment_name = fragment.item.name.item.as_str();
        self.current_fragment = Some(fragment_name);
        self.fragment_order.push(fragment_name);
    }

    fn exit_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<Fragment>,
    ) {
        debug_assert_eq!(
            Some(fragment.item.name.item.as_str()),
            self.current_fragment
        );
        self.current_fragment = None;
    }

    fn enter_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        spread: &'a Spanning<FragmentSpread>,
    ) {
        if let Some(current_fragment) = self.current_fragment {
            self.spreads
                .entry(current_fragment)
                .or_default()
                .push((spread.item.name.item.as_str(), spread.span.start));
        }
    }
}

type CycleDetectorState<'a> = (
    &'a str,
    Vec<(&'a str, SourcePosition)>,
    HashMap<&'a str, usize>,
);

struct CycleDetector<'a> {
    visited: HashSet<&'a str>,
    spreads: &'a HashMap<&'a str, Vec<(&'a str, SourcePosition)>>,
    errors: Vec<GraphQLError>,
}

impl<'a> CycleDetector<'a> {
    fn detect_from(&mut self, from: &'a str) {
        let mut to_visit = Vec::new();
        to_visit.push((from, Vec::new(), HashMap::new()));

        while let Some((from, path, path_indices)) = to_visit.pop() {
            to_visit.extend(self.detect_from_inner(from, path, path_indices));
        }
    }

    /// One step of the iterative depth-first search. Called only from
    /// [`Self::detect_from`]; the recursion lives on the heap instead of the
    /// call stack.
    fn detect_from_inner(
        &mut self,
        from: &'a str,
        path: Vec<(&'a str, SourcePosition)>,
        mut path_indices: HashMap<&'a str, usize>,
    ) -> Vec<CycleDetectorState<'a>> {
        self.visited.insert(from);

        if !self.spreads.contains_key(from) {
            return Vec::new();
        }

        path_indices.insert(from, path.len());

        let mut to_visit = Vec::new();
        for &(name, position) in &self.spreads[from] {
            let index = path_indices.get(name).copied();

            if let Some(index) = index {
                let err_pos = if index < path.len() {
                    path[index].1
                } else {
                    position
                };

                self.errors
                    .push(GraphQLError::new(error_message(name), &[err_pos]));
            } else {
                let mut path = path.clone();
                path.push((name, position));
                to_visit.push((name, path, path_indices.clone()));
            }
        }

        to_visit
    }
}

fn error_message(frag_name: &str) -> String {
    format!("Cannot spread fragment \"{frag_name}\" within itself.")
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn single_reference_is_valid() {
        expect_passes_rule(
            factory,
            "fragment fragA on Dog { ...fragB } fragment fragB on Dog { name }",
        );
    }

    #[test]
    fn spreading_twice_is_not_circular() {
        expect_passes_rule(
            factory,
            "fragment fragA on Dog { ...fragB ...fragB } fragment fragB on Dog { name }",
        );
    }

    #[test]
    fn does_not_false_positive_on_unknown_fragment() {
        expect_passes_rule(factory, "fragment nameFragment on Pet { ...UnknownFragment }");
    }

    #[test]
    fn no_spreading_itself_directly() {
        expect_fails_rule(
            factory,
            "fragment fragA on Dog { ...fragA }",
            &[(&error_message("fragA"), &[(1, 25)])],
        );
    }

    #[test]
    fn no_spreading_itself_indirectly() {
        expect_fails_rule(
            factory,
            "fragment fragA on Dog { ...fragB } fragment fragB on Dog { ...fragA }",
            &[(&error_message("fragA"), &[(1, 25)])],
        );
    }

    #[test]
    fn no_spreading_itself_deeply_two_paths() {
        expect_fails_rule(
            factory,
            "fragment fragA on Dog { ...fragB ...fragC } fragment fragB on Dog { ...fragA } fragment fragC on Dog { ...fragA }",
            &[
                (&error_message("fragA"), &[(1, 25)]),
                (&error_message("fragA"), &[(1, 34)]),
            ],
        );
    }
}
