//! Query validation: a rule suite driven over one shared traversal.

mod context;
mod multi_visitor;
pub mod rules;
mod traits;
mod visitor;

#[cfg(test)]
pub(crate) mod test_harness;

pub use self::{
    context::ValidatorContext,
    multi_visitor::{MultiVisitorCons, MultiVisitorNil},
    rules::{validate_sdl, visit_all_rules},
    traits::Visitor,
    visitor::visit,
};

use crate::{ast::Document, error::GraphQLError, schema::model::Schema};

/// Validates a request document against a schema with the complete default
/// rule set.
///
/// Never panics on user input; every failure is collected and returned, each
/// with at least one source position. Running validation twice on the same
/// inputs yields identical errors.
pub fn validate(schema: &Schema, document: &Document) -> Vec<GraphQLError> {
    let mut ctx = ValidatorContext::new(schema, document);
    visit_all_rules(&mut ctx, document);
    ctx.into_errors()
}
