use std::collections::{HashMap, HashSet};

use crate::{
    ast::{Document, Fragment, FragmentSpread, Operation, VariableDefinition},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub fn factory<'a>() -> NoUnusedVariables<'a> {
    NoUnusedVariables {
        defined_variables: HashMap::new(),
        used_variables: HashMap::new(),
        current_scope: None,
        spreads: HashMap::new(),
    }
}

#[derive(Clone, Eq, Hash, PartialEq)]
enum Scope<'a> {
    Operation(Option<&'a str>),
    Fragment(&'a str),
}

pub struct NoUnusedVariables<'a> {
    defined_variables: HashMap<Option<&'a str>, Vec<(&'a str, SourcePosition)>>,
    used_variables: HashMap<Scope<'a>, Vec<&'a str>>,
    current_scope: Option<Scope<'a>>,
    spreads: HashMap<Scope<'a>, Vec<&'a str>>,
}

impl<'a> NoUnusedVariables<'a> {
    fn collect_used(
        &self,
        scope: &Scope<'a>,
        used: &mut HashSet<&'a str>,
        visited: &mut HashSet<Scope<'a>>,
    ) {
        if !visited.insert(scope.clone()) {
            return;
        }

        if let Some(used_here) = self.used_variables.get(scope) {
            used.extend(used_here.iter().copied());
        }

        if let Some(spreads) = self.spreads.get(scope) {
            for spread in spreads {
                self.collect_used(&Scope::Fragment(spread), used, visited);
            }
        }
    }
}

impl<'a> Visitor<'a> for NoUnusedVariables<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document) {
        for (op_name, def_vars) in &self.defined_variables {
            let mut used = HashSet::new();
            self.collect_used(
                &Scope::Operation(*op_name),
                &mut used,
                &mut HashSet::new(),
            );

            for (var, position) in def_vars {
                if !used.contains(var) {
                    ctx.report_error(&error_message(var, *op_name), &[*position]);
                }
            }
        }
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        let name = op.item.name.as_ref().map(|n| n.item.as_str());
        self.current_scope = Some(Scope::Operation(name));
        self.defined_variables.entry(name).or_default();
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<Fragment>,
    ) {
        self.current_scope = Some(Scope::Fragment(&fragment.item.name.item));
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

    fn enter_variable_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        def: &'a VariableDefinition,
    ) {
        if let Some(Scope::Operation(name)) = &self.current_scope {
            if let Some(defs) = self.defined_variables.get_mut(name) {
                defs.push((&def.name.item, def.name.span.start));
            }
        }
    }

    fn enter_variable_value(&mut self, _: &mut ValidatorContext<'a>, var: Spanning<&'a str>) {
        if let Some(scope) = &self.current_scope {
            self.used_variables
                .entry(scope.clone())
                .or_default()
                .push(var.item);
        }
    }
}

fn error_message(var_name: &str, op_name: Option<&str>) -> String {
    match op_name {
        Some(op_name) => {
            format!("Variable \"${var_name}\" is never used in operation \"{op_name}\".")
        }
        None => format!("Variable \"${var_name}\" is never used."),
    }
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn uses_all_variables() {
        expect_passes_rule(
            factory,
            "query Foo($a: Int, $b: Int) { complicatedArgs { multipleReqs(req1: $a, req2: $b) } }",
        );
    }

    #[test]
    fn uses_variable_via_fragment() {
        expect_passes_rule(
            factory,
            "query Foo($a: Int) { complicatedArgs { ...IntArg } } fragment IntArg on ComplicatedArgs { intArgField(intArg: $a) }",
        );
    }

    #[test]
    fn variable_never_used() {
        expect_fails_rule(
            factory,
            "query Foo($a: Int, $b: Int) { complicatedArgs { intArgField(intArg: $a) } }",
            &[(&error_message("b", Some("Foo")), &[(1, 20)])],
        );
    }
}
