//! Resolution of a request document against a schema and resolvers.

mod subscribe;
pub(crate) mod values;

use std::{
    any::Any,
    collections::HashSet,
    fmt,
    sync::{Arc, RwLock},
};

use fnv::FnvHashMap;
use futures::{future::BoxFuture, stream::FuturesOrdered, StreamExt as _};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::{
    ast::{
        Definition, Directive, Document, Fragment, InputValue, Operation, OperationType,
        Selection, Type,
    },
    error::{GraphQLError, PathSegment},
    parser::{SourcePosition, Spanning},
    schema::{
        meta::{Field as FieldMeta, MetaType},
        model::Schema,
    },
    value::{FromValue, Value, Variables},
};

pub use self::subscribe::{subscribe, SubscriptionStream};
pub use self::values::{coerce_argument_values, coerce_variable_values};

/// Error type for errors that occur during field resolution.
///
/// Field errors are represented by a human-readable error message and an
/// optional [`Value`] with additional information, serialized into the
/// error's `"extensions"`.
///
/// They can be converted from any type that implements [`fmt::Display`],
/// which makes error chaining with the `?` operator a breeze:
///
/// ```rust
/// # use graphql::FieldError;
/// fn get_string(data: Vec<u8>) -> Result<String, FieldError> {
///     let s = String::from_utf8(data)?;
///     Ok(s)
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    message: String,
    extensions: Value,
}

impl<T: fmt::Display> From<T> for FieldError {
    fn from(e: T) -> Self {
        Self {
            message: e.to_string(),
            extensions: Value::Null,
        }
    }
}

impl FieldError {
    /// Constructs a new [`FieldError`] with additional data.
    #[must_use]
    pub fn new<T: fmt::Display>(e: T, extensions: Value) -> Self {
        Self {
            message: e.to_string(),
            extensions,
        }
    }

    /// Returns the `"message"` of this [`FieldError`].
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the `"extensions"` of this [`FieldError`].
    ///
    /// If there are none, [`Value::Null`] is returned.
    #[must_use]
    pub fn extensions(&self) -> &Value {
        &self.extensions
    }
}

/// The result of resolving the value of a field of type `T`.
pub type FieldResult<T> = Result<T, FieldError>;

/// Coerced argument values handed to a resolver.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments {
    items: IndexMap<String, Value>,
}

impl Arguments {
    pub(crate) fn new(items: IndexMap<String, Value>) -> Self {
        Self { items }
    }

    /// The raw coerced value of an argument, if provided.
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.items.get(name)
    }

    /// Decodes an argument through [`FromValue`].
    ///
    /// Absent arguments decode from [`Value::Undefined`], so `Option<T>`
    /// targets read them as [`None`].
    pub fn get<T: FromValue>(&self, name: &str) -> FieldResult<T> {
        T::from_value(self.items.get(name).unwrap_or(&Value::Undefined))
    }

    /// Iterates over the provided arguments in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.items.iter()
    }
}

/// The response path from the root of `data` down to one field.
#[derive(Clone, Debug)]
pub enum ResponsePath {
    Root,
    Key(String, Arc<ResponsePath>),
    Index(usize, Arc<ResponsePath>),
}

impl ResponsePath {
    fn child_key(self: &Arc<Self>, key: &str) -> Arc<Self> {
        Arc::new(ResponsePath::Key(key.into(), Arc::clone(self)))
    }

    fn child_index(self: &Arc<Self>, index: usize) -> Arc<Self> {
        Arc::new(ResponsePath::Index(index, Arc::clone(self)))
    }

    /// Flattens this path into segments, root first.
    pub fn to_segments(&self) -> Vec<PathSegment> {
        let mut acc = Vec::new();
        self.collect_segments(&mut acc);
        acc
    }

    fn collect_segments(&self, acc: &mut Vec<PathSegment>) {
        match self {
            ResponsePath::Root => {}
            ResponsePath::Key(key, parent) => {
                parent.collect_segments(acc);
                acc.push(PathSegment::Key(key.clone()));
            }
            ResponsePath::Index(index, parent) => {
                parent.collect_segments(acc);
                acc.push(PathSegment::Index(*index));
            }
        }
    }
}

/// Everything a resolver may want to know about the field being resolved.
pub struct ResolveInfo<'a> {
    /// The field's name in the schema.
    pub field_name: &'a str,
    /// The AST nodes that selected this field (more than one when merged
    /// through fragments).
    pub field_nodes: &'a [&'a Spanning<crate::ast::Field>],
    /// The field's declared return type.
    pub return_type: &'a Type,
    /// The name of the type the field is declared on.
    pub parent_type: &'a str,
    /// The response path of this field.
    pub path: &'a ResponsePath,
    /// The schema being executed.
    pub schema: &'a Schema,
    /// The fragment definitions of the request document, by name.
    pub fragments: &'a FnvHashMap<&'a str, &'a Spanning<Fragment>>,
    /// The root value execution started from.
    pub root_value: &'a Value,
    /// The operation being executed.
    pub operation: &'a Spanning<Operation>,
    /// The coerced variable values of this request.
    pub variable_values: &'a Variables,
}

/// The bundle of values handed to a resolver invocation.
pub struct ResolverParams<'a> {
    /// The parent object's resolved value.
    pub source: &'a Value,
    /// The coerced argument values.
    pub args: &'a Arguments,
    /// The opaque per-request context value.
    pub context: &'a (dyn Any + Send + Sync),
    /// Field and request metadata.
    pub info: ResolveInfo<'a>,
}

impl ResolverParams<'_> {
    /// Downcasts the context value.
    pub fn context_as<T: 'static>(&self) -> Option<&T> {
        self.context.downcast_ref()
    }
}

/// The outcome of executing one request: the data tree and any collected
/// errors.
///
/// `data` is [`None`] when execution never began (syntax, validation or
/// variable-coercion failure); it serializes as an absent key. An empty
/// `errors` list is omitted from serialization as well.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionResult {
    pub data: Option<Value>,
    pub errors: Vec<GraphQLError>,
}

impl ExecutionResult {
    /// A result for a request that failed before execution began.
    pub fn from_errors(errors: Vec<GraphQLError>) -> Self {
        Self { data: None, errors }
    }

    /// Whether this result carries no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Serialize for ExecutionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(data) = &self.data {
            map.serialize_entry("data", data)?;
        }
        if !self.errors.is_empty() {
            map.serialize_entry("errors", &self.errors)?;
        }
        map.end()
    }
}

/// Transient state for one request.
pub(crate) struct ExecutionContext<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) fragments: FnvHashMap<&'a str, &'a Spanning<Fragment>>,
    pub(crate) root_value: &'a Value,
    pub(crate) context_value: &'a (dyn Any + Send + Sync),
    pub(crate) operation: &'a Spanning<Operation>,
    pub(crate) variable_values: Variables,
    errors: RwLock<Vec<GraphQLError>>,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn new(
        schema: &'a Schema,
        document: &'a Document,
        operation: &'a Spanning<Operation>,
        root_value: &'a Value,
        context_value: &'a (dyn Any + Send + Sync),
        variable_values: Variables,
    ) -> Self {
        let fragments = document
            .definitions
            .iter()
            .filter_map(|def| match def {
                Definition::Fragment(f) => Some((f.item.name.item.as_str(), f)),
                _ => None,
            })
            .collect();

        Self {
            schema,
            fragments,
            root_value,
            context_value,
            operation,
            variable_values,
            errors: RwLock::new(Vec::new()),
        }
    }

    /// Appends an error to the shared, append-only error sink.
    pub(crate) fn push_error(&self, error: GraphQLError) {
        self.errors.write().unwrap().push(error);
    }

    pub(crate) fn into_errors(self) -> Vec<GraphQLError> {
        self.errors.into_inner().unwrap()
    }
}

/// Selects the operation to execute from a parsed document.
pub fn get_operation<'b>(
    document: &'b Document,
    operation_name: Option<&str>,
) -> Result<&'b Spanning<Operation>, GraphQLError> {
    let mut operation = None;
    for op in document.operations() {
        match operation_name {
            None => {
                if operation.is_some() {
                    return Err(GraphQLError::new(
                        "Must provide operation name if query contains multiple operations.",
                        &[],
                    ));
                }
                operation = Some(op);
            }
            Some(name) => {
                if op.item.name.as_ref().map(|n| n.item.as_str()) == Some(name) {
                    operation = Some(op);
                }
            }
        }
    }

    operation.ok_or_else(|| match operation_name {
        Some(name) => GraphQLError::new(format!("Unknown operation named \"{name}\"."), &[]),
        None => GraphQLError::new("Must provide an operation.", &[]),
    })
}

/// Executes a request document against a schema.
///
/// `document` is expected to have passed [`validate`](crate::validate);
/// executing an unvalidated document is safe but produces
/// implementation-defined errors instead of validation messages.
pub async fn execute(
    schema: &Schema,
    document: &Document,
    variables: &Variables,
    root_value: &Value,
    context_value: &(dyn Any + Send + Sync),
    operation_name: Option<&str>,
) -> ExecutionResult {
    let operation = match get_operation(document, operation_name) {
        Ok(op) => op,
        Err(e) => return ExecutionResult::from_errors(vec![e]),
    };

    let coerced = match values::coerce_variable_values(schema, &operation.item, variables) {
        Ok(vars) => vars,
        Err(errors) => return ExecutionResult::from_errors(errors),
    };

    let ctx = ExecutionContext::new(
        schema,
        document,
        operation,
        root_value,
        context_value,
        coerced,
    );

    execute_operation(ctx).await
}

async fn execute_operation(ctx: ExecutionContext<'_>) -> ExecutionResult {
    let operation = &ctx.operation.item;

    let root_type = match operation.operation_type {
        OperationType::Query => Some(ctx.schema.query_type()),
        OperationType::Mutation => ctx.schema.mutation_type(),
        OperationType::Subscription => ctx.schema.subscription_type(),
    };
    let Some(root_type) = root_type else {
        let error = GraphQLError::new(
            format!(
                "Schema is not configured for {}s.",
                operation.operation_type,
            ),
            &[ctx.operation.span.start],
        );
        return ExecutionResult::from_errors(vec![error]);
    };

    let serial = operation.operation_type == OperationType::Mutation;
    let path = Arc::new(ResponsePath::Root);

    let mut groups = IndexMap::new();
    collect_fields(
        &ctx,
        root_type,
        &operation.selection_set,
        &mut HashSet::new(),
        &mut groups,
    );

    let data = match execute_fields(&ctx, root_type, ctx.root_value, &groups, &path, serial).await
    {
        Ok(value) => value,
        Err(error) => {
            ctx.push_error(error);
            Value::Null
        }
    };

    ExecutionResult {
        data: Some(data),
        errors: ctx.into_errors(),
    }
}

/// One response-keyed group of field nodes, in first-occurrence order.
pub(crate) type FieldGroups<'a> = IndexMap<String, Vec<&'a Spanning<crate::ast::Field>>>;

/// Walks a selection set, expanding fragments whose type condition matches
/// `runtime_type` and grouping included fields by response key.
pub(crate) fn collect_fields<'a>(
    ctx: &ExecutionContext<'a>,
    runtime_type: &MetaType,
    selection_set: &'a [Selection],
    visited_fragments: &mut HashSet<&'a str>,
    groups: &mut FieldGroups<'a>,
) {
    for selection in selection_set {
        match selection {
            Selection::Field(field) => {
                if is_excluded(&field.item.directives, &ctx.variable_values) {
                    continue;
                }
                groups
                    .entry(field.item.response_key().to_owned())
                    .or_default()
                    .push(field);
            }
            Selection::InlineFragment(fragment) => {
                if is_excluded(&fragment.item.directives, &ctx.variable_values) {
                    continue;
                }
                let applies = match &fragment.item.type_condition {
                    Some(cond) => does_fragment_condition_match(ctx, &cond.item, runtime_type),
                    None => true,
                };
                if applies {
                    collect_fields(
                        ctx,
                        runtime_type,
                        &fragment.item.selection_set,
                        visited_fragments,
                        groups,
                    );
                }
            }
            Selection::FragmentSpread(spread) => {
                if is_excluded(&spread.item.directives, &ctx.variable_values) {
                    continue;
                }
                let name = spread.item.name.item.as_str();
                if !visited_fragments.insert(name) {
                    continue;
                }
                let Some(&fragment) = ctx.fragments.get(name) else {
                    continue;
                };
                if does_fragment_condition_match(
                    ctx,
                    &fragment.item.type_condition.item,
                    runtime_type,
                ) {
                    collect_fields(
                        ctx,
                        runtime_type,
                        &fragment.item.selection_set,
                        visited_fragments,
                        groups,
                    );
                }
            }
        }
    }
}

fn does_fragment_condition_match(
    ctx: &ExecutionContext<'_>,
    condition: &str,
    runtime_type: &MetaType,
) -> bool {
    if condition == runtime_type.name().as_str() {
        return true;
    }
    match ctx.schema.concrete_type_by_name(condition) {
        Some(conditional_type) if conditional_type.is_abstract() => {
            ctx.schema.is_possible_type(conditional_type, runtime_type)
        }
        _ => false,
    }
}

/// Whether `@skip`/`@include` exclude the selection under the current
/// variable values.
pub(crate) fn is_excluded(
    directives: &Option<Vec<Spanning<Directive>>>,
    variables: &Variables,
) -> bool {
    let Some(directives) = directives else {
        return false;
    };

    for directive in directives {
        let condition = directive
            .item
            .arguments
            .as_ref()
            .and_then(|args| args.item.get("if"))
            .and_then(|v| directive_condition(&v.item, variables));

        match directive.item.name.item.as_str() {
            "skip" => {
                if condition == Some(true) {
                    return true;
                }
            }
            "include" => {
                if condition != Some(true) {
                    return true;
                }
            }
            _ => {}
        }
    }

    false
}

fn directive_condition(value: &InputValue, variables: &Variables) -> Option<bool> {
    match value {
        InputValue::Boolean(b) => Some(*b),
        InputValue::Variable(name) => variables.get(name).and_then(Value::as_boolean),
        _ => None,
    }
}

async fn execute_fields<'a>(
    ctx: &ExecutionContext<'a>,
    parent_type: &MetaType,
    source: &Value,
    groups: &FieldGroups<'a>,
    path: &Arc<ResponsePath>,
    serial: bool,
) -> Result<Value, GraphQLError> {
    let mut object = crate::value::Object::with_capacity(groups.len());

    if serial {
        for (response_key, nodes) in groups {
            let outcome = execute_field(ctx, parent_type, source, response_key, nodes, path).await;
            merge_field_outcome(ctx, &mut object, response_key, outcome)?;
        }
    } else {
        let mut results = FuturesOrdered::new();
        for (response_key, nodes) in groups {
            results.push_back(async move {
                (
                    response_key,
                    execute_field(ctx, parent_type, source, response_key, nodes, path).await,
                )
            });
        }

        while let Some((response_key, outcome)) = results.next().await {
            merge_field_outcome(ctx, &mut object, response_key, outcome)?;
        }
    }

    Ok(Value::Object(object))
}

enum FieldOutcome {
    /// No such field in the schema: the response key is omitted.
    Skip,
    Value(Value),
}

/// Folds one resolved field into the response object.
///
/// A failed nullable field records its error and lands as `null`; a failed
/// non-`null` field propagates its still-unrecorded error upwards, nulling
/// out the enclosing object.
fn merge_field_outcome(
    ctx: &ExecutionContext<'_>,
    object: &mut crate::value::Object,
    response_key: &str,
    outcome: Result<FieldOutcome, (GraphQLError, bool)>,
) -> Result<(), GraphQLError> {
    match outcome {
        Ok(FieldOutcome::Skip) => Ok(()),
        Ok(FieldOutcome::Value(v)) => {
            object.add_field(response_key, v);
            Ok(())
        }
        Err((error, non_null)) => {
            if non_null {
                Err(error)
            } else {
                ctx.push_error(error);
                object.add_field(response_key, Value::Null);
                Ok(())
            }
        }
    }
}

async fn execute_field<'a>(
    ctx: &ExecutionContext<'a>,
    parent_type: &MetaType,
    source: &Value,
    response_key: &str,
    nodes: &[&'a Spanning<crate::ast::Field>],
    parent_path: &Arc<ResponsePath>,
) -> Result<FieldOutcome, (GraphQLError, bool)> {
    let node = nodes[0];
    let field_name = node.item.name.item.as_str();

    let Some(field_def) = ctx.schema.lookup_field(parent_type, field_name) else {
        return Ok(FieldOutcome::Skip);
    };

    let path = parent_path.child_key(response_key);
    let non_null = field_def.field_type.is_non_null();

    let propagate = |error: GraphQLError| (error, non_null);

    let args = values::coerce_argument_values(
        ctx.schema,
        field_def,
        &node.item,
        node.span.start,
        &ctx.variable_values,
    )
    .map_err(|e| propagate(e.at_path(path.to_segments())))?;

    let info = ResolveInfo {
        field_name,
        field_nodes: nodes,
        return_type: &field_def.field_type,
        parent_type: parent_type.name().as_str(),
        path: &path,
        schema: ctx.schema,
        fragments: &ctx.fragments,
        root_value: ctx.root_value,
        operation: ctx.operation,
        variable_values: &ctx.variable_values,
    };

    let resolved = match &field_def.resolve {
        Some(resolver) => {
            let params = ResolverParams {
                source,
                args: &args,
                context: ctx.context_value,
                info,
            };
            resolver(params).await
        }
        None => Ok(default_resolve_field(source, field_name)),
    };

    let value = match resolved {
        Ok(value) => value,
        Err(field_error) => {
            return Err(propagate(located_field_error(
                field_error,
                node.span.start,
                &path,
            )));
        }
    };

    let completed = complete_value(
        ctx,
        field_def,
        &field_def.field_type,
        nodes,
        parent_type.name().as_str(),
        path.clone(),
        value,
    )
    .await
    .map_err(propagate)?;

    Ok(FieldOutcome::Value(completed))
}

/// The default resolver: property access on the source object by field name.
///
/// Anything that is not an object, or an object without the property,
/// resolves to [`Value::Undefined`].
fn default_resolve_field(source: &Value, field_name: &str) -> Value {
    source
        .as_object_value()
        .and_then(|o| o.get_field_value(field_name))
        .cloned()
        .unwrap_or(Value::Undefined)
}

fn located_field_error(
    error: FieldError,
    position: SourcePosition,
    path: &ResponsePath,
) -> GraphQLError {
    let FieldError {
        message,
        extensions,
    } = error;
    GraphQLError::new(message, &[position])
        .at_path(path.to_segments())
        .with_extensions(extensions)
}

fn complete_value<'a, 'e>(
    ctx: &'e ExecutionContext<'a>,
    field_def: &'e FieldMeta,
    return_type: &'e Type,
    nodes: &'e [&'a Spanning<crate::ast::Field>],
    parent_type_name: &'e str,
    path: Arc<ResponsePath>,
    value: Value,
) -> BoxFuture<'e, Result<Value, GraphQLError>>
where
    'a: 'e,
{
    Box::pin(async move {
        let position = nodes[0].span.start;

        if return_type.is_non_null() {
            let inner = return_type.clone().into_nullable();
            let completed = complete_value(
                ctx,
                field_def,
                &inner,
                nodes,
                parent_type_name,
                path.clone(),
                value,
            )
            .await?;
            return if completed.is_null_or_undefined() {
                Err(GraphQLError::new(
                    format!(
                        "Cannot return null for non-nullable field {parent_type_name}.{}.",
                        field_def.name,
                    ),
                    &[position],
                )
                .at_path(path.to_segments()))
            } else {
                Ok(completed)
            };
        }

        if value.is_null_or_undefined() {
            return Ok(Value::Null);
        }

        match return_type {
            Type::List(inner_type) => {
                let Value::List(items) = value else {
                    return Err(GraphQLError::new(
                        format!(
                            "Expected a list, but did not find one for field {parent_type_name}.{}.",
                            field_def.name,
                        ),
                        &[position],
                    )
                    .at_path(path.to_segments()));
                };

                let inner_non_null = inner_type.is_non_null();
                let mut completed_items = Vec::with_capacity(items.len());

                for (index, item) in items.into_iter().enumerate() {
                    let item_path = path.child_index(index);
                    match complete_value(
                        ctx,
                        field_def,
                        inner_type,
                        nodes,
                        parent_type_name,
                        item_path,
                        item,
                    )
                    .await
                    {
                        Ok(v) => completed_items.push(v),
                        Err(e) if inner_non_null => return Err(e),
                        Err(e) => {
                            ctx.push_error(e);
                            completed_items.push(Value::Null);
                        }
                    }
                }

                Ok(Value::List(completed_items))
            }

            Type::Named(name) => {
                let Some(meta) = ctx.schema.concrete_type_by_name(name) else {
                    return Err(GraphQLError::new(
                        format!("Unknown type \"{name}\"."),
                        &[position],
                    )
                    .at_path(path.to_segments()));
                };

                match meta {
                    MetaType::Scalar(scalar) => (scalar.serialize_fn)(&value)
                        .map_err(|e| located_field_error(e, position, &path)),

                    MetaType::Enum(e) => {
                        let name_matches = value
                            .as_string_value()
                            .is_some_and(|name| e.value_by_name(name).is_some());
                        if name_matches {
                            Ok(value)
                        } else {
                            Err(GraphQLError::new(
                                format!("Enum \"{}\" cannot represent value: {value}", e.name),
                                &[position],
                            )
                            .at_path(path.to_segments()))
                        }
                    }

                    MetaType::Object(_) => {
                        complete_object_value(ctx, meta, nodes, path, value).await
                    }

                    MetaType::Interface(_) | MetaType::Union(_) => {
                        let runtime_type_name = resolve_abstract_type(ctx.schema, meta, &value);

                        let resolved = runtime_type_name
                            .as_ref()
                            .and_then(|n| ctx.schema.concrete_type_by_name(n));
                        let Some(runtime_meta) = resolved else {
                            return Err(GraphQLError::new(
                                format!(
                                    "Abstract type \"{}\" must resolve to an Object type at \
                                     runtime for field {parent_type_name}.{}.",
                                    meta.name(),
                                    field_def.name,
                                ),
                                &[position],
                            )
                            .at_path(path.to_segments()));
                        };

                        if !matches!(runtime_meta, MetaType::Object(_)) {
                            return Err(GraphQLError::new(
                                format!(
                                    "Abstract type \"{}\" resolved to non-object type \"{}\".",
                                    meta.name(),
                                    runtime_meta.name(),
                                ),
                                &[position],
                            )
                            .at_path(path.to_segments()));
                        }

                        if !ctx.schema.is_possible_type(meta, runtime_meta) {
                            return Err(GraphQLError::new(
                                format!(
                                    "Runtime Object type \"{}\" is not a possible type for \"{}\".",
                                    runtime_meta.name(),
                                    meta.name(),
                                ),
                                &[position],
                            )
                            .at_path(path.to_segments()));
                        }

                        complete_object_value(ctx, runtime_meta, nodes, path, value).await
                    }

                    MetaType::InputObject(io) => Err(GraphQLError::new(
                        format!("Input object type \"{}\" cannot be resolved.", io.name),
                        &[position],
                    )
                    .at_path(path.to_segments())),
                }
            }

            // Non-null wrappers were peeled off above.
            Type::NonNullNamed(_) | Type::NonNullList(_) => unreachable!(),
        }
    })
}

/// Picks the concrete object type for a value of an abstract type:
/// `resolve_type` when provided, otherwise the first possible type whose
/// `is_type_of` accepts the value.
fn resolve_abstract_type(
    schema: &Schema,
    meta: &MetaType,
    value: &Value,
) -> Option<arcstr::ArcStr> {
    let resolve_type = match meta {
        MetaType::Interface(i) => i.resolve_type.as_ref(),
        MetaType::Union(u) => u.resolve_type.as_ref(),
        _ => None,
    };
    if let Some(resolve_type) = resolve_type {
        return resolve_type(value);
    }

    schema.possible_types(meta).into_iter().find_map(|t| match t {
        MetaType::Object(o) => o
            .is_type_of
            .as_ref()
            .and_then(|pred| pred(value).then(|| o.name.clone())),
        _ => None,
    })
}

async fn complete_object_value<'a>(
    ctx: &ExecutionContext<'a>,
    object_meta: &MetaType,
    nodes: &[&'a Spanning<crate::ast::Field>],
    path: Arc<ResponsePath>,
    value: Value,
) -> Result<Value, GraphQLError> {
    let mut groups = IndexMap::new();
    let mut visited = HashSet::new();
    for &node in nodes {
        if let Some(selection_set) = &node.item.selection_set {
            collect_fields(ctx, object_meta, selection_set, &mut visited, &mut groups);
        }
    }

    execute_fields(ctx, object_meta, &value, &groups, &path, false).await
}
