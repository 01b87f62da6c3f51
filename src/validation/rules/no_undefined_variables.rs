use std::collections::{HashMap, HashSet};

use crate::{
    ast::{Document, Fragment, FragmentSpread, Operation, VariableDefinition},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

pub fn factory<'a>() -> NoUndefinedVariables<'a> {
    NoUndefinedVariables {
        defined_variables: HashMap::new(),
        used_variables: HashMap::new(),
        current_scope: None,
        spreads: HashMap::new(),
    }
}

#[derive(Clone, Eq, Hash, PartialEq)]
enum Scope<'a> {
    Operation(Option<&'a str>, SourcePosition),
    Fragment(&'a str),
}

pub struct NoUndefinedVariables<'a> {
    defined_variables: HashMap<Option<&'a str>, HashSet<&'a str>>,
    used_variables: HashMap<Scope<'a>, Vec<(&'a str, SourcePosition)>>,
    current_scope: Option<Scope<'a>>,
    spreads: HashMap<Scope<'a>, Vec<&'a str>>,
}

impl<'a> NoUndefinedVariables<'a> {
    fn find_undefined_vars(
        &self,
        scope: &Scope<'a>,
        defined: &HashSet<&'a str>,
        undefined: &mut Vec<(&'a str, SourcePosition)>,
        visited: &mut HashSet<Scope<'a>>,
    ) {
        if !visited.insert(scope.clone()) {
            return;
        }

        if let Some(used) = self.used_variables.get(scope) {
            for &(var, position) in used {
                if !defined.contains(var) {
                    undefined.push((var, position));
                }
            }
        }

        if let Some(spreads) = self.spreads.get(scope) {
            for spread in spreads {
                self.find_undefined_vars(
                    &Scope::Fragment(spread),
                    defined,
                    undefined,
                    visited,
                );
            }
        }
    }
}

impl<'a> Visitor<'a> for NoUndefinedVariables<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document) {
        let empty = HashSet::new();
        let scopes: Vec<_> = self
            .used_variables
            .keys()
            .chain(self.spreads.keys())
            .filter(|s| matches!(s, Scope::Operation(..)))
            .cloned()
            .collect();

        for scope in scopes {
            let Scope::Operation(op_name, op_position) = &scope else {
                continue;
            };
            let defined = self.defined_variables.get(op_name).unwrap_or(&empty);

            let mut undefined = Vec::new();
            self.find_undefined_vars(&scope, defined, &mut undefined, &mut HashSet::new());

            for (var, position) in undefined {
                ctx.report_error(&error_message(var, *op_name), &[position, *op_position]);
            }
        }
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        let name = op.item.name.as_ref().map(|n| n.item.as_str());
        self.current_scope = Some(Scope::Operation(name, op.span.start));
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
        if let Some(Scope::Operation(name, _)) = &self.current_scope {
            if let Some(defs) = self.defined_variables.get_mut(name) {
                defs.insert(&def.name.item);
            }
        }
    }

    fn enter_variable_value(&mut self, _: &mut ValidatorContext<'a>, var: Spanning<&'a str>) {
        if let Some(scope) = &self.current_scope {
            self.used_variables
                .entry(scope.clone())
                .or_default()
                .push((var.item, var.span.start));
        }
    }
}

fn error_message(var_name: &str, op_name: Option<&str>) -> String {
    match op_name {
        Some(op_name) => {
            format!("Variable \"${var_name}\" is not defined by operation \"{op_name}\".")
        }
        None => format!("Variable \"${var_name}\" is not defined."),
    }
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn all_variables_defined() {
        expect_passes_rule(
            factory,
            "query Foo($a: Int, $b: Int) { complicatedArgs { isAtLocation: multipleReqs(req1: $a, req2: $b) } }",
        );
    }

    #[test]
    fn variable_defined_in_fragment_user() {
        expect_passes_rule(
            factory,
            "query Foo($a: Int) { complicatedArgs { ...IntArg } } fragment IntArg on ComplicatedArgs { intArgField(intArg: $a) }",
        );
    }

    #[test]
    fn undefined_variable() {
        expect_fails_rule(
            factory,
            "query Foo($a: Int) { complicatedArgs { intArgField(intArg: $undefined) } }",
            &[(&error_message("undefined", Some("Foo")), &[(1, 60), (1, 1)])],
        );
    }

    #[test]
    fn undefined_variable_used_inside_fragment() {
        expect_fails_rule(
            factory,
            "query Foo { complicatedArgs { ...IntArg } } fragment IntArg on ComplicatedArgs { intArgField(intArg: $missing) }",
            &[(&error_message("missing", Some("Foo")), &[(1, 102), (1, 1)])],
        );
    }
}
