//! A GraphQL query execution engine.
//!
//! The crate covers the full request pipeline: lexing and parsing a request
//! document into a located AST, validating it against a schema with the
//! standard rule suite, and executing it against user-supplied resolvers,
//! including subscription streams.
//!
//! Schemas are runtime values: named types registered with a
//! [`SchemaBuilder`], fields carrying resolver closures, and lazy field
//! thunks so mutually recursive types can reference each other by name.
//!
//! ```rust
//! use graphql::{
//!     graphql_value, meta::{Field, ObjectMeta}, ast::Type, Schema, Value, Variables,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let query = ObjectMeta::new(
//!     "Query",
//!     vec![
//!         Field::new("hello", Type::Named("String".into()))
//!             .resolve_with(|_| Ok(Value::from("world"))),
//!     ],
//! );
//! let schema = Schema::build().query(query).finish()?;
//!
//! let result = graphql::graphql(
//!     &schema,
//!     "{ hello }",
//!     &Value::Null,
//!     &(),
//!     &Variables::new(),
//!     None,
//! )
//! .await;
//!
//! assert_eq!(result.data, Some(graphql_value!({"hello": "world"})));
//! assert!(result.errors.is_empty());
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod value;

pub mod ast;
mod error;
pub mod executor;
pub mod parser;
pub mod schema;
pub mod validation;

#[cfg(test)]
mod executor_tests;
#[cfg(test)]
mod tests;

use std::{any::Any, sync::Arc};

pub use crate::{
    error::{GraphQLError, PathSegment},
    executor::{
        execute, subscribe, Arguments, ExecutionResult, FieldError, FieldResult, ResolveInfo,
        ResolverParams, ResponsePath, SubscriptionStream,
    },
    parser::{
        parse, parse_type, parse_value, ParseError, Source, SourceLocation, SourcePosition, Span,
        Spanning,
    },
    schema::{
        meta,
        model::{DirectiveLocation, DirectiveType, Schema, SchemaBuilder, SchemaError},
    },
    validation::{validate, validate_sdl},
    value::{FromValue, Object, Value, Variables},
};

use crate::ast::Document;

/// The combined pipeline: parse, validate, execute.
///
/// Failures in the early phases land in the returned
/// [`ExecutionResult::errors`] with `data` absent; execution failures
/// accumulate alongside the partial `data` they left behind.
pub async fn graphql(
    schema: &Schema,
    request: &str,
    root_value: &Value,
    context_value: &(dyn Any + Send + Sync),
    variables: &Variables,
    operation_name: Option<&str>,
) -> ExecutionResult {
    let document = match parse_request(request) {
        Ok(document) => document,
        Err(result) => return result,
    };

    let errors = validate(schema, &document);
    if !errors.is_empty() {
        return ExecutionResult::from_errors(errors);
    }

    execute(
        schema,
        &document,
        variables,
        root_value,
        context_value,
        operation_name,
    )
    .await
}

/// The combined subscription pipeline: parse, validate, then resolve the
/// source event stream.
///
/// On success the stream lazily executes the operation once per published
/// event; dropping it cancels the subscription. Failures before the stream
/// exists are returned as a ready-to-serialize [`ExecutionResult`].
pub async fn graphql_subscribe(
    schema: Arc<Schema>,
    request: &str,
    root_value: Value,
    context_value: Arc<dyn Any + Send + Sync>,
    variables: Variables,
    operation_name: Option<String>,
) -> Result<SubscriptionStream, ExecutionResult> {
    let document = match parse_request(request) {
        Ok(document) => document,
        Err(result) => return Err(result),
    };

    let errors = validate(&schema, &document);
    if !errors.is_empty() {
        return Err(ExecutionResult::from_errors(errors));
    }

    subscribe(
        schema,
        Arc::new(document),
        variables,
        root_value,
        context_value,
        operation_name,
    )
    .await
    .map_err(ExecutionResult::from_errors)
}

fn parse_request(request: &str) -> Result<Document, ExecutionResult> {
    let source = Source::new(request);
    parse(source.body()).map_err(|e| {
        ExecutionResult::from_errors(vec![GraphQLError::from_parse_error(&e, source.name())])
    })
}
