//! Definitions of the validation rules.

mod executable_definitions;
mod fields_on_correct_type;
mod fragments_on_composite_types;
mod known_argument_names;
mod known_directives;
mod known_fragment_names;
mod known_type_names;
mod lone_anonymous_operation;
pub mod no_deprecated;
mod no_fragment_cycles;
pub mod no_schema_introspection;
mod no_undefined_variables;
mod no_unused_fragments;
mod no_unused_variables;
mod overlapping_fields_can_be_merged;
mod possible_fragment_spreads;
mod provided_required_arguments;
mod scalar_leafs;
mod single_field_subscriptions;
mod unique_argument_names;
mod unique_directives_per_location;
mod unique_field_definition_names;
mod unique_fragment_names;
mod unique_input_field_names;
mod unique_operation_names;
mod unique_type_names;
mod unique_variable_names;
mod values_of_correct_type;
mod variables_are_input_types;
mod variables_in_allowed_position;

use crate::{
    ast::Document,
    error::GraphQLError,
    validation::{visit, MultiVisitorNil, ValidatorContext},
};

/// Runs the complete default rule set over `doc`, collecting errors into
/// `ctx`.
///
/// All rules compose into a single visitor, so the tree is walked once. Rules
/// that depend on fragment reachability analyze on `exit_document` instead of
/// chasing spreads mid-walk, which keeps a document with fragment cycles from
/// stalling any of them.
pub fn visit_all_rules<'a>(ctx: &mut ValidatorContext<'a>, doc: &'a Document) {
    let mut visitor = MultiVisitorNil
        .with(self::executable_definitions::factory())
        .with(self::fields_on_correct_type::factory())
        .with(self::fragments_on_composite_types::factory())
        .with(self::known_argument_names::factory())
        .with(self::known_directives::factory())
        .with(self::known_fragment_names::factory())
        .with(self::known_type_names::factory())
        .with(self::lone_anonymous_operation::factory())
        .with(self::no_fragment_cycles::factory())
        .with(self::no_undefined_variables::factory())
        .with(self::no_unused_fragments::factory())
        .with(self::no_unused_variables::factory())
        .with(self::overlapping_fields_can_be_merged::factory())
        .with(self::possible_fragment_spreads::factory())
        .with(self::provided_required_arguments::factory())
        .with(self::scalar_leafs::factory())
        .with(self::single_field_subscriptions::factory())
        .with(self::unique_argument_names::factory())
        .with(self::unique_directives_per_location::factory())
        .with(self::unique_fragment_names::factory())
        .with(self::unique_input_field_names::factory())
        .with(self::unique_operation_names::factory())
        .with(self::unique_variable_names::factory())
        .with(self::values_of_correct_type::factory())
        .with(self::variables_are_input_types::factory())
        .with(self::variables_in_allowed_position::factory());

    visit(&mut visitor, ctx, doc);
}

/// Validates a type-definition (SDL) document.
///
/// These rules run without a schema: they check the definitions against each
/// other.
pub fn validate_sdl(doc: &Document) -> Vec<GraphQLError> {
    let mut errors = Vec::new();
    self::unique_type_names::check(doc, &mut errors);
    self::unique_field_definition_names::check(doc, &mut errors);
    errors
}
