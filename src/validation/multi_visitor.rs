use crate::{
    ast::{
        Directive, Document, Field, Fragment, FragmentSpread, InlineFragment, InputValue,
        Operation, Selection, TypeSystemDefinition, VariableDefinition,
    },
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

/// The empty tail of a [`MultiVisitorCons`] chain.
pub struct MultiVisitorNil;

impl MultiVisitorNil {
    pub fn with<V>(self, visitor: V) -> MultiVisitorCons<V, Self> {
        MultiVisitorCons(visitor, self)
    }
}

/// Composes rule visitors into one visitor, so a rule set traverses the
/// document a single time.
pub struct MultiVisitorCons<A, B>(A, B);

impl<A, B> MultiVisitorCons<A, B> {
    pub fn with<V>(self, visitor: V) -> MultiVisitorCons<V, Self> {
        MultiVisitorCons(visitor, self)
    }
}

impl<'a> Visitor<'a> for MultiVisitorNil {}

macro_rules! forward {
    ($name:ident, $Ty:ty) => {
        fn $name(&mut self, ctx: &mut ValidatorContext<'a>, node: $Ty) {
            self.0.$name(ctx, node);
            self.1.$name(ctx, node);
        }
    };
}

impl<'a, A, B> Visitor<'a> for MultiVisitorCons<A, B>
where
    A: Visitor<'a> + 'a,
    B: Visitor<'a> + 'a,
{
    forward!(enter_document, &'a Document);
    forward!(exit_document, &'a Document);

    forward!(enter_operation_definition, &'a Spanning<Operation>);
    forward!(exit_operation_definition, &'a Spanning<Operation>);

    forward!(enter_fragment_definition, &'a Spanning<Fragment>);
    forward!(exit_fragment_definition, &'a Spanning<Fragment>);

    forward!(enter_type_system_definition, &'a Spanning<TypeSystemDefinition>);
    forward!(exit_type_system_definition, &'a Spanning<TypeSystemDefinition>);

    forward!(enter_variable_definition, &'a VariableDefinition);
    forward!(exit_variable_definition, &'a VariableDefinition);

    forward!(enter_directive, &'a Spanning<Directive>);
    forward!(exit_directive, &'a Spanning<Directive>);

    forward!(enter_argument, &'a (Spanning<String>, Spanning<InputValue>));
    forward!(exit_argument, &'a (Spanning<String>, Spanning<InputValue>));

    forward!(enter_selection_set, &'a [Selection]);
    forward!(exit_selection_set, &'a [Selection]);

    forward!(enter_field, &'a Spanning<Field>);
    forward!(exit_field, &'a Spanning<Field>);

    forward!(enter_fragment_spread, &'a Spanning<FragmentSpread>);
    forward!(exit_fragment_spread, &'a Spanning<FragmentSpread>);

    forward!(enter_inline_fragment, &'a Spanning<InlineFragment>);
    forward!(exit_inline_fragment, &'a Spanning<InlineFragment>);

    forward!(enter_null_value, Spanning<()>);
    forward!(exit_null_value, Spanning<()>);

    forward!(enter_int_value, Spanning<i32>);
    forward!(exit_int_value, Spanning<i32>);

    forward!(enter_float_value, Spanning<f64>);
    forward!(exit_float_value, Spanning<f64>);

    forward!(enter_string_value, Spanning<&'a str>);
    forward!(exit_string_value, Spanning<&'a str>);

    forward!(enter_boolean_value, Spanning<bool>);
    forward!(exit_boolean_value, Spanning<bool>);

    forward!(enter_enum_value, Spanning<&'a str>);
    forward!(exit_enum_value, Spanning<&'a str>);

    forward!(enter_variable_value, Spanning<&'a str>);
    forward!(exit_variable_value, Spanning<&'a str>);

    forward!(enter_list_value, Spanning<&'a Vec<Spanning<InputValue>>>);
    forward!(exit_list_value, Spanning<&'a Vec<Spanning<InputValue>>>);

    forward!(
        enter_object_value,
        Spanning<&'a Vec<(Spanning<String>, Spanning<InputValue>)>>
    );
    forward!(
        exit_object_value,
        Spanning<&'a Vec<(Spanning<String>, Spanning<InputValue>)>>
    );

    forward!(enter_object_field, &'a (Spanning<String>, Spanning<InputValue>));
    forward!(exit_object_field, &'a (Spanning<String>, Spanning<InputValue>));
}
