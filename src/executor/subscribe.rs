//! Subscription execution: build the source event stream, then map each
//! event through normal field execution.

use std::{any::Any, collections::HashSet, sync::Arc};

use futures::{stream::BoxStream, StreamExt as _};
use indexmap::IndexMap;

use crate::{
    ast::{Document, OperationType},
    error::GraphQLError,
    executor::{
        collect_fields, execute, get_operation, values, ExecutionContext,
        ExecutionResult, ResolveInfo, ResolverParams, ResponsePath,
    },
    schema::{meta::ValueStream, model::Schema},
    value::{Value, Variables},
};

/// A lazily executing stream of per-event results.
///
/// Dropping the stream cancels the subscription and tears down the source
/// resolver's stream.
pub type SubscriptionStream = BoxStream<'static, ExecutionResult>;

/// Resolves a subscription operation into a stream of [`ExecutionResult`]s.
///
/// The operation's root field is resolved once through its `subscribe`
/// resolver to obtain the source event stream; each emitted event then runs
/// through the normal execution pipeline with the event as the root value.
///
/// A failure before the stream exists (operation selection, variable
/// coercion, the subscribe resolver itself) is returned as `Err`; failures of
/// individual events surface on that event's [`ExecutionResult`] while the
/// stream continues.
pub async fn subscribe(
    schema: Arc<Schema>,
    document: Arc<Document>,
    variables: Variables,
    root_value: Value,
    context_value: Arc<dyn Any + Send + Sync>,
    operation_name: Option<String>,
) -> Result<SubscriptionStream, Vec<GraphQLError>> {
    let source_stream = create_source_event_stream(
        &schema,
        &document,
        &variables,
        &root_value,
        context_value.as_ref(),
        operation_name.as_deref(),
    )
    .await?;

    Ok(map_source_to_response(
        source_stream,
        schema,
        document,
        variables,
        context_value,
        operation_name,
    ))
}

async fn create_source_event_stream(
    schema: &Schema,
    document: &Document,
    variables: &Variables,
    root_value: &Value,
    context_value: &(dyn Any + Send + Sync),
    operation_name: Option<&str>,
) -> Result<ValueStream, Vec<GraphQLError>> {
    let operation = get_operation(document, operation_name).map_err(|e| vec![e])?;

    if operation.item.operation_type != OperationType::Subscription {
        return Err(vec![GraphQLError::new(
            "Operation is not a subscription.",
            &[operation.span.start],
        )]);
    }

    let coerced = values::coerce_variable_values(schema, &operation.item, variables)?;

    let Some(subscription_type) = schema.subscription_type() else {
        return Err(vec![GraphQLError::new(
            "Schema is not configured for subscriptions.",
            &[operation.span.start],
        )]);
    };

    let ctx = ExecutionContext::new(
        schema,
        document,
        operation,
        root_value,
        context_value,
        coerced,
    );

    let mut groups = IndexMap::new();
    collect_fields(
        &ctx,
        subscription_type,
        &operation.item.selection_set,
        &mut HashSet::new(),
        &mut groups,
    );

    // A subscription has exactly one root field (enforced by validation);
    // the first group is that field.
    let Some((response_key, nodes)) = groups.first() else {
        return Err(vec![GraphQLError::new(
            "Subscription operation must select a field.",
            &[operation.span.start],
        )]);
    };
    let node = nodes[0];
    let field_name = node.item.name.item.as_str();

    let Some(field_def) = ctx.schema.lookup_field(subscription_type, field_name) else {
        return Err(vec![GraphQLError::new(
            format!(
                "The subscription field \"{field_name}\" is not defined.",
            ),
            &[node.span.start],
        )]);
    };

    let Some(subscribe_resolver) = &field_def.subscribe else {
        return Err(vec![GraphQLError::new(
            format!(
                "Subscription field \"{field_name}\" has no subscribe resolver.",
            ),
            &[node.span.start],
        )]);
    };

    let args = values::coerce_argument_values(
        ctx.schema,
        field_def,
        &node.item,
        node.span.start,
        &ctx.variable_values,
    )
    .map_err(|e| vec![e])?;

    let path = Arc::new(ResponsePath::Root).child_key(response_key);
    let info = ResolveInfo {
        field_name,
        field_nodes: nodes,
        return_type: &field_def.field_type,
        parent_type: subscription_type.name().as_str(),
        path: &path,
        schema: ctx.schema,
        fragments: &ctx.fragments,
        root_value: ctx.root_value,
        operation: ctx.operation,
        variable_values: &ctx.variable_values,
    };

    let params = ResolverParams {
        source: ctx.root_value,
        args: &args,
        context: ctx.context_value,
        info,
    };

    subscribe_resolver(params).await.map_err(|field_error| {
        vec![super::located_field_error(
            field_error,
            node.span.start,
            &path,
        )]
    })
}

fn map_source_to_response(
    source_stream: ValueStream,
    schema: Arc<Schema>,
    document: Arc<Document>,
    variables: Variables,
    context_value: Arc<dyn Any + Send + Sync>,
    operation_name: Option<String>,
) -> SubscriptionStream {
    source_stream
        .then(move |event| {
            let schema = Arc::clone(&schema);
            let document = Arc::clone(&document);
            let variables = variables.clone();
            let context_value = Arc::clone(&context_value);
            let operation_name = operation_name.clone();

            async move {
                match event {
                    Ok(event_value) => {
                        execute(
                            &schema,
                            &document,
                            &variables,
                            &event_value,
                            context_value.as_ref(),
                            operation_name.as_deref(),
                        )
                        .await
                    }
                    Err(field_error) => ExecutionResult::from_errors(vec![GraphQLError::new(
                        field_error.message().to_owned(),
                        &[],
                    )]),
                }
            }
        })
        .boxed()
}
