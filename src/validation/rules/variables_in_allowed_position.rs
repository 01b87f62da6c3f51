use std::collections::{HashMap, HashSet};

use crate::{
    ast::{Document, Fragment, FragmentSpread, Operation, Type, VariableDefinition},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

pub fn factory<'a>() -> VariablesInAllowedPosition<'a> {
    VariablesInAllowedPosition {
        spreads: HashMap::new(),
        variable_usages: HashMap::new(),
        variable_defs: HashMap::new(),
        current_scope: None,
    }
}

#[derive(Clone, Eq, Hash, PartialEq)]
enum Scope<'a> {
    Operation(Option<&'a str>),
    Fragment(&'a str),
}

pub struct VariablesInAllowedPosition<'a> {
    spreads: HashMap<Scope<'a>, HashSet<&'a str>>,
    variable_usages: HashMap<Scope<'a>, Vec<(Spanning<&'a str>, Type)>>,
    variable_defs: HashMap<Scope<'a>, Vec<&'a VariableDefinition>>,
    current_scope: Option<Scope<'a>>,
}

impl<'a> VariablesInAllowedPosition<'a> {
    fn collect_incorrect_usages(
        &self,
        from: &Scope<'a>,
        var_defs: &[&'a VariableDefinition],
        ctx: &mut ValidatorContext<'a>,
        visited: &mut HashSet<Scope<'a>>,
    ) {
        if !visited.insert(from.clone()) {
            return;
        }

        if let Some(usages) = self.variable_usages.get(from) {
            for (var_name, expected_type) in usages {
                let Some(var_def) = var_defs.iter().find(|d| d.name.item == var_name.item)
                else {
                    continue;
                };

                // A default value lets a nullable variable flow into a
                // non-null position.
                let effective_type = if var_def.default_value.is_some()
                    && !var_def.var_type.item.is_non_null()
                    && expected_type.is_non_null()
                {
                    expected_type.clone().into_nullable()
                } else {
                    expected_type.clone()
                };

                if !ctx
                    .schema
                    .is_subtype(&var_def.var_type.item, &effective_type)
                {
                    ctx.report_error(
                        &error_message(
                            var_name.item,
                            &var_def.var_type.item.to_string(),
                            &expected_type.to_string(),
                        ),
                        &[var_def.name.span.start, var_name.span.start],
                    );
                }
            }
        }

        if let Some(spreads) = self.spreads.get(from) {
            for spread in spreads {
                self.collect_incorrect_usages(&Scope::Fragment(spread), var_defs, ctx, visited);
            }
        }
    }
}

impl<'a> Visitor<'a> for VariablesInAllowedPosition<'a> {
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a>, _: &'a Document) {
        for (op_scope, var_defs) in &self.variable_defs {
            self.collect_incorrect_usages(op_scope, var_defs, ctx, &mut HashSet::new());
        }
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        fragment: &'a Spanning<Fragment>,
    ) {
        self.current_scope = Some(Scope::Fragment(&fragment.item.name.item));
    }

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        op: &'a Spanning<Operation>,
    ) {
        self.current_scope = Some(Scope::Operation(
            op.item.name.as_ref().map(|n| n.item.as_str()),
        ));
    }

    fn enter_variable_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        def: &'a VariableDefinition,
    ) {
        if let Some(scope) = &self.current_scope {
            self.variable_defs
                .entry(scope.clone())
                .or_default()
                .push(def);
        }
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
                .insert(&spread.item.name.item);
        }
    }

    fn enter_variable_value(&mut self, ctx: &mut ValidatorContext<'a>, var: Spanning<&'a str>) {
        if let (Some(scope), Some(input_type)) =
            (&self.current_scope, ctx.current_input_type_literal())
        {
            self.variable_usages
                .entry(scope.clone())
                .or_default()
                .push((var, input_type.clone()));
        }
    }
}

fn error_message(var_name: &str, type_name: &str, expected_type_name: &str) -> String {
    format!(
        "Variable \"${var_name}\" of type \"{type_name}\" used in position expecting type \
         \"{expected_type_name}\"."
    )
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn exact_type_match() {
        expect_passes_rule(
            factory,
            "query Query($intArg: Int) { complicatedArgs { intArgField(intArg: $intArg) } }",
        );
    }

    #[test]
    fn non_null_flows_into_nullable() {
        expect_passes_rule(
            factory,
            "query Query($intArg: Int!) { complicatedArgs { intArgField(intArg: $intArg) } }",
        );
    }

    #[test]
    fn nullable_with_default_flows_into_non_null() {
        expect_passes_rule(
            factory,
            "query Query($intArg: Int = 1) { complicatedArgs { nonNullIntArgField(nonNullIntArg: $intArg) } }",
        );
    }

    #[test]
    fn int_into_non_null_int_fails() {
        expect_fails_rule(
            factory,
            "query Query($intArg: Int) { complicatedArgs { nonNullIntArgField(nonNullIntArg: $intArg) } }",
            &[(
                &error_message("intArg", "Int", "Int!"),
                &[(1, 13), (1, 81)],
            )],
        );
    }

    #[test]
    fn incompatible_type_through_fragment_fails() {
        expect_fails_rule(
            factory,
            "query Query($strArg: String) { complicatedArgs { ...IntFrag } } fragment IntFrag on ComplicatedArgs { intArgField(intArg: $strArg) }",
            &[(
                &error_message("strArg", "String", "Int"),
                &[(1, 13), (1, 123)],
            )],
        );
    }
}
