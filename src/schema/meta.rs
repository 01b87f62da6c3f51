//! Types used to describe a GraphQL schema.

use std::{
    fmt,
    sync::{Arc, Mutex, OnceLock},
};

use arcstr::ArcStr;
use futures::{future::BoxFuture, stream::BoxStream};
use indexmap::IndexMap;

use crate::{
    ast::{InputValue, Type},
    executor::{FieldError, FieldResult, ResolverParams},
    value::Value,
};

/// A resolver: produces a field's value from `(source, args, context, info)`.
pub type ResolveFn =
    Arc<dyn for<'a> Fn(ResolverParams<'a>) -> BoxFuture<'a, FieldResult<Value>> + Send + Sync>;

/// The stream of application events produced by a subscription root field.
pub type ValueStream = BoxStream<'static, FieldResult<Value>>;

/// A subscribe resolver: produces the source event stream for a subscription
/// root field.
pub type SubscribeFn =
    Arc<dyn for<'a> Fn(ResolverParams<'a>) -> BoxFuture<'a, FieldResult<ValueStream>> + Send + Sync>;

/// Decides whether a runtime value belongs to an object type.
pub type IsTypeOfFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Resolves the concrete object type name for a value of an abstract type.
pub type ResolveTypeFn = Arc<dyn Fn(&Value) -> Option<ArcStr> + Send + Sync>;

/// Coerces a variable value into a scalar's internal value.
pub type ParseValueFn = Arc<dyn Fn(&Value) -> FieldResult<Value> + Send + Sync>;

/// Coerces a literal into a scalar's internal value.
pub type ParseLiteralFn = Arc<dyn Fn(&InputValue) -> FieldResult<Value> + Send + Sync>;

/// Converts a scalar's internal value into its response form.
pub type SerializeFn = Arc<dyn Fn(&Value) -> FieldResult<Value> + Send + Sync>;

/// Whether an item is deprecated, with context.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum DeprecationStatus {
    /// The field/variant is not deprecated.
    #[default]
    Current,
    /// The field/variant is deprecated, with an optional reason.
    Deprecated(Option<ArcStr>),
}

impl DeprecationStatus {
    /// If this deprecation status indicates the item is deprecated.
    pub fn is_deprecated(&self) -> bool {
        matches!(self, DeprecationStatus::Deprecated(_))
    }

    /// An optional reason for the deprecation, or none if `Current`.
    pub fn reason(&self) -> Option<&str> {
        match self {
            DeprecationStatus::Current => None,
            DeprecationStatus::Deprecated(rsn) => rsn.as_deref(),
        }
    }
}

/// Kind of a schema type, as introspection reports it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl TypeKind {
    /// The introspection spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object => "OBJECT",
            TypeKind::Interface => "INTERFACE",
            TypeKind::Union => "UNION",
            TypeKind::Enum => "ENUM",
            TypeKind::InputObject => "INPUT_OBJECT",
            TypeKind::List => "LIST",
            TypeKind::NonNull => "NON_NULL",
        }
    }
}

/// Signals that a field thunk re-entered itself during its own evaluation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ThunkCycleError;

/// A once-initialized cell holding a lazily produced value.
///
/// The first [`get`](Thunk::get) evaluates the thunk and caches the result;
/// later calls return the cached value. Re-entrant access during evaluation
/// is reported as [`ThunkCycleError`] instead of deadlocking. Duplicate cache
/// stores from a racing first call are ignored, keeping initialization
/// idempotent.
pub(crate) struct Thunk<T> {
    cache: OnceLock<T>,
    init: Mutex<Option<Box<dyn FnOnce() -> T + Send + Sync>>>,
}

impl<T> Thunk<T> {
    /// Wraps an already-evaluated value.
    pub(crate) fn new(value: T) -> Self {
        let cache = OnceLock::new();
        let _ = cache.set(value);
        Self {
            cache,
            init: Mutex::new(None),
        }
    }

    /// Wraps a deferred computation.
    pub(crate) fn lazy(f: impl FnOnce() -> T + Send + Sync + 'static) -> Self {
        Self {
            cache: OnceLock::new(),
            init: Mutex::new(Some(Box::new(f))),
        }
    }

    pub(crate) fn get(&self) -> Result<&T, ThunkCycleError> {
        if let Some(v) = self.cache.get() {
            return Ok(v);
        }

        let thunk = self.init.lock().unwrap().take();
        match thunk {
            Some(f) => {
                let value = f();
                let _ = self.cache.set(value);
                Ok(self.cache.get().expect("thunk cache was just set"))
            }
            // The thunk is gone but the cache is still empty: we are inside
            // its own evaluation.
            None => self.cache.get().ok_or(ThunkCycleError),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Thunk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cache.get() {
            Some(v) => f.debug_tuple("Thunk").field(v).finish(),
            None => f.write_str("Thunk(<unevaluated>)"),
        }
    }
}

/// Metadata for a field of an object or interface type.
#[derive(Clone)]
pub struct Field {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub field_type: Type,
    pub arguments: Vec<Argument>,
    pub deprecation_status: DeprecationStatus,
    pub(crate) resolve: Option<ResolveFn>,
    pub(crate) subscribe: Option<SubscribeFn>,
}

impl Field {
    /// Builds a new [`Field`] of the given type with the given `name`.
    pub fn new(name: impl Into<ArcStr>, field_type: Type) -> Self {
        Self {
            name: name.into(),
            description: None,
            field_type,
            arguments: Vec::new(),
            deprecation_status: DeprecationStatus::Current,
            resolve: None,
            subscribe: None,
        }
    }

    /// Sets the `description` of this [`Field`].
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an `argument` to this [`Field`].
    ///
    /// Arguments are unordered and can't contain duplicates by name.
    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Sets this [`Field`] as deprecated with an optional `reason`.
    #[must_use]
    pub fn deprecated(mut self, reason: Option<&str>) -> Self {
        self.deprecation_status = DeprecationStatus::Deprecated(reason.map(Into::into));
        self
    }

    /// Attaches the resolver invoked when this field is executed.
    ///
    /// Without one, the default property-access resolver reads the field's
    /// name out of the source object.
    #[must_use]
    pub fn resolve<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(ResolverParams<'a>) -> BoxFuture<'a, FieldResult<Value>>
            + Send
            + Sync
            + 'static,
    {
        self.resolve = Some(Arc::new(f));
        self
    }

    /// Attaches a resolver returning an already-available value.
    #[must_use]
    pub fn resolve_with<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(ResolverParams<'a>) -> FieldResult<Value> + Send + Sync + 'static,
    {
        let resolve: ResolveFn = Arc::new(move |params| {
            let res = f(params);
            Box::pin(async move { res })
        });
        self.resolve = Some(resolve);
        self
    }

    /// Attaches the subscribe resolver producing this subscription field's
    /// source event stream.
    #[must_use]
    pub fn subscribe<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(ResolverParams<'a>) -> BoxFuture<'a, FieldResult<ValueStream>>
            + Send
            + Sync
            + 'static,
    {
        self.subscribe = Some(Arc::new(f));
        self
    }

    /// Attaches a subscribe resolver producing its stream without
    /// suspending.
    #[must_use]
    pub fn subscribe_with<F>(mut self, f: F) -> Self
    where
        F: for<'a> Fn(ResolverParams<'a>) -> FieldResult<ValueStream> + Send + Sync + 'static,
    {
        let subscribe: SubscribeFn = Arc::new(move |params| {
            let res = f(params);
            Box::pin(async move { res })
        });
        self.subscribe = Some(subscribe);
        self
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("arguments", &self.arguments)
            .field("deprecation_status", &self.deprecation_status)
            .finish_non_exhaustive()
    }
}

/// Metadata for an argument to a field, or for an input object's field.
#[derive(Clone, Debug)]
pub struct Argument {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub arg_type: Type,
    pub default_value: Option<Value>,
    pub deprecation_status: DeprecationStatus,
}

impl Argument {
    /// Builds a new [`Argument`] of the given type with the given `name`.
    pub fn new(name: impl Into<ArcStr>, arg_type: Type) -> Self {
        Self {
            name: name.into(),
            description: None,
            arg_type,
            default_value: None,
            deprecation_status: DeprecationStatus::Current,
        }
    }

    /// Sets the `description` of this [`Argument`].
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the default value taken when the argument is not provided.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Sets this [`Argument`] as deprecated with an optional `reason`.
    #[must_use]
    pub fn deprecated(mut self, reason: Option<&str>) -> Self {
        self.deprecation_status = DeprecationStatus::Deprecated(reason.map(Into::into));
        self
    }
}

/// Metadata for a single value in an enum.
#[derive(Clone, Debug)]
pub struct EnumValue {
    /// The name of the enum value.
    ///
    /// This is the string literal representation of the enum in responses.
    pub name: ArcStr,
    /// The optional description of the enum value.
    pub description: Option<ArcStr>,
    /// Whether the value is deprecated, with an optional reason.
    pub deprecation_status: DeprecationStatus,
}

impl EnumValue {
    /// Constructs a new [`EnumValue`] with the provided `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            deprecation_status: DeprecationStatus::Current,
        }
    }

    /// Sets the `description` of this [`EnumValue`].
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets this [`EnumValue`] as deprecated with an optional `reason`.
    #[must_use]
    pub fn deprecated(mut self, reason: Option<&str>) -> Self {
        self.deprecation_status = DeprecationStatus::Deprecated(reason.map(Into::into));
        self
    }
}

/// Scalar type metadata.
pub struct ScalarMeta {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub specified_by_url: Option<ArcStr>,
    pub(crate) parse_value_fn: ParseValueFn,
    pub(crate) parse_literal_fn: ParseLiteralFn,
    pub(crate) serialize_fn: SerializeFn,
}

impl ScalarMeta {
    /// Builds a new [`ScalarMeta`] type with the specified `name`.
    ///
    /// The default parse functions accept any non-composite value unchanged;
    /// the default serializer is the identity.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            specified_by_url: None,
            parse_value_fn: Arc::new(|v| Ok(v.clone())),
            parse_literal_fn: Arc::new(default_parse_literal),
            serialize_fn: Arc::new(|v| Ok(v.clone())),
        }
    }

    /// Sets the `description` of this [`ScalarMeta`] type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the [specification URL][0] for this [`ScalarMeta`] type.
    ///
    /// [0]: https://spec.graphql.org/October2021#sec--specifiedBy
    #[must_use]
    pub fn specified_by_url(mut self, url: impl Into<ArcStr>) -> Self {
        self.specified_by_url = Some(url.into());
        self
    }

    /// Sets the function coercing a variable value into this scalar.
    #[must_use]
    pub fn parse_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> FieldResult<Value> + Send + Sync + 'static,
    {
        self.parse_value_fn = Arc::new(f);
        self
    }

    /// Sets the function coercing a literal into this scalar.
    #[must_use]
    pub fn parse_literal<F>(mut self, f: F) -> Self
    where
        F: Fn(&InputValue) -> FieldResult<Value> + Send + Sync + 'static,
    {
        self.parse_literal_fn = Arc::new(f);
        self
    }

    /// Sets the function converting this scalar's internal value into its
    /// response form.
    #[must_use]
    pub fn serialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> FieldResult<Value> + Send + Sync + 'static,
    {
        self.serialize_fn = Arc::new(f);
        self
    }

    /// Wraps this [`ScalarMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Scalar(self)
    }
}

fn default_parse_literal(literal: &InputValue) -> FieldResult<Value> {
    match literal {
        InputValue::Null => Ok(Value::Null),
        InputValue::Int(i) => Ok(Value::Int(*i)),
        InputValue::Float(f) => Ok(Value::Float(*f)),
        InputValue::String(s) => Ok(Value::String(s.clone())),
        InputValue::Boolean(b) => Ok(Value::Boolean(*b)),
        InputValue::Enum(e) => Err(FieldError::from(format!("Unexpected enum value: {e}"))),
        InputValue::Variable(v) => Err(FieldError::from(format!("Unexpected variable: ${v}"))),
        InputValue::List(_) => Err(FieldError::from("Unexpected list literal")),
        InputValue::Object(_) => Err(FieldError::from("Unexpected object literal")),
    }
}

/// Object type metadata.
pub struct ObjectMeta {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub interface_names: Vec<ArcStr>,
    pub(crate) fields: Thunk<IndexMap<String, Field>>,
    pub(crate) is_type_of: Option<IsTypeOfFn>,
}

impl ObjectMeta {
    /// Builds a new [`ObjectMeta`] type with the specified `name` and eager
    /// `fields`.
    pub fn new(name: impl Into<ArcStr>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            description: None,
            interface_names: Vec::new(),
            fields: Thunk::new(index_fields(fields)),
            is_type_of: None,
        }
    }

    /// Builds a new [`ObjectMeta`] type whose fields are produced lazily.
    ///
    /// The thunk runs on first access (during schema construction), which
    /// lets cyclic types reference each other without forward declarations.
    pub fn with_fields_thunk(
        name: impl Into<ArcStr>,
        fields: impl FnOnce() -> Vec<Field> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            interface_names: Vec::new(),
            fields: Thunk::lazy(move || index_fields(fields())),
            is_type_of: None,
        }
    }

    /// Sets the `description` of this [`ObjectMeta`] type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the `interfaces` this [`ObjectMeta`] type implements.
    #[must_use]
    pub fn interfaces(mut self, interfaces: &[&str]) -> Self {
        self.interface_names = interfaces.iter().map(|n| (*n).into()).collect();
        self
    }

    /// Sets the predicate deciding whether a runtime value is of this type.
    ///
    /// Consulted during abstract-type resolution when the interface or union
    /// has no `resolve_type` of its own.
    #[must_use]
    pub fn is_type_of<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.is_type_of = Some(Arc::new(f));
        self
    }

    /// Wraps this [`ObjectMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Object(self)
    }

    pub(crate) fn fields(&self) -> Result<&IndexMap<String, Field>, ThunkCycleError> {
        self.fields.get()
    }
}

/// Interface type metadata.
pub struct InterfaceMeta {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub interface_names: Vec<ArcStr>,
    pub(crate) fields: Thunk<IndexMap<String, Field>>,
    pub(crate) resolve_type: Option<ResolveTypeFn>,
}

impl InterfaceMeta {
    /// Builds a new [`InterfaceMeta`] type with the specified `name` and
    /// eager `fields`.
    pub fn new(name: impl Into<ArcStr>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            description: None,
            interface_names: Vec::new(),
            fields: Thunk::new(index_fields(fields)),
            resolve_type: None,
        }
    }

    /// Builds a new [`InterfaceMeta`] type whose fields are produced lazily.
    pub fn with_fields_thunk(
        name: impl Into<ArcStr>,
        fields: impl FnOnce() -> Vec<Field> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            interface_names: Vec::new(),
            fields: Thunk::lazy(move || index_fields(fields())),
            resolve_type: None,
        }
    }

    /// Sets the `description` of this [`InterfaceMeta`] type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the `interfaces` this interface itself implements.
    #[must_use]
    pub fn interfaces(mut self, interfaces: &[&str]) -> Self {
        self.interface_names = interfaces.iter().map(|n| (*n).into()).collect();
        self
    }

    /// Sets the function resolving the concrete object type of a value.
    #[must_use]
    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Option<ArcStr> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }

    /// Wraps this [`InterfaceMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Interface(self)
    }

    pub(crate) fn fields(&self) -> Result<&IndexMap<String, Field>, ThunkCycleError> {
        self.fields.get()
    }
}

/// Union type metadata.
pub struct UnionMeta {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub of_type_names: Vec<ArcStr>,
    pub(crate) resolve_type: Option<ResolveTypeFn>,
}

impl UnionMeta {
    /// Builds a new [`UnionMeta`] type of the given member type names.
    pub fn new(name: impl Into<ArcStr>, of_types: &[&str]) -> Self {
        Self {
            name: name.into(),
            description: None,
            of_type_names: of_types.iter().map(|n| (*n).into()).collect(),
            resolve_type: None,
        }
    }

    /// Sets the `description` of this [`UnionMeta`] type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the function resolving the concrete object type of a value.
    #[must_use]
    pub fn resolve_type<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Option<ArcStr> + Send + Sync + 'static,
    {
        self.resolve_type = Some(Arc::new(f));
        self
    }

    /// Wraps this [`UnionMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Union(self)
    }
}

/// Enum type metadata.
#[derive(Debug)]
pub struct EnumMeta {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub values: Vec<EnumValue>,
}

impl EnumMeta {
    /// Builds a new [`EnumMeta`] type with the specified `name` and possible
    /// `values`.
    pub fn new(name: impl Into<ArcStr>, values: Vec<EnumValue>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values,
        }
    }

    /// Sets the `description` of this [`EnumMeta`] type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Looks up a value of this enum by name.
    pub fn value_by_name(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }

    /// Wraps this [`EnumMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Enum(self)
    }
}

/// Input object metadata.
pub struct InputObjectMeta {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub one_of: bool,
    pub(crate) input_fields: Thunk<IndexMap<String, Argument>>,
}

impl InputObjectMeta {
    /// Builds a new [`InputObjectMeta`] type with the specified `name` and
    /// eager `input_fields`.
    pub fn new(name: impl Into<ArcStr>, input_fields: Vec<Argument>) -> Self {
        Self {
            name: name.into(),
            description: None,
            one_of: false,
            input_fields: Thunk::new(index_arguments(input_fields)),
        }
    }

    /// Builds a new [`InputObjectMeta`] type whose fields are produced
    /// lazily.
    pub fn with_fields_thunk(
        name: impl Into<ArcStr>,
        input_fields: impl FnOnce() -> Vec<Argument> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            one_of: false,
            input_fields: Thunk::lazy(move || index_arguments(input_fields())),
        }
    }

    /// Sets the `description` of this [`InputObjectMeta`] type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks this input object as `OneOf`: exactly one field may be provided,
    /// and it must not be `null`.
    #[must_use]
    pub fn one_of(mut self) -> Self {
        self.one_of = true;
        self
    }

    /// Wraps this [`InputObjectMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::InputObject(self)
    }

    pub(crate) fn input_fields(&self) -> Result<&IndexMap<String, Argument>, ThunkCycleError> {
        self.input_fields.get()
    }
}

fn index_fields(fields: Vec<Field>) -> IndexMap<String, Field> {
    fields
        .into_iter()
        .map(|f| (f.name.to_string(), f))
        .collect()
}

fn index_arguments(args: Vec<Argument>) -> IndexMap<String, Argument> {
    args.into_iter().map(|a| (a.name.to_string(), a)).collect()
}

/// Generic type metadata.
#[derive(Debug)]
pub enum MetaType {
    Scalar(ScalarMeta),
    Object(ObjectMeta),
    Interface(InterfaceMeta),
    Union(UnionMeta),
    Enum(EnumMeta),
    InputObject(InputObjectMeta),
}

impl MetaType {
    /// The name of the type.
    pub fn name(&self) -> &ArcStr {
        match self {
            MetaType::Scalar(ScalarMeta { name, .. })
            | MetaType::Object(ObjectMeta { name, .. })
            | MetaType::Interface(InterfaceMeta { name, .. })
            | MetaType::Union(UnionMeta { name, .. })
            | MetaType::Enum(EnumMeta { name, .. })
            | MetaType::InputObject(InputObjectMeta { name, .. }) => name,
        }
    }

    /// The description of the type, if any.
    pub fn description(&self) -> Option<&ArcStr> {
        match self {
            MetaType::Scalar(ScalarMeta { description, .. })
            | MetaType::Object(ObjectMeta { description, .. })
            | MetaType::Interface(InterfaceMeta { description, .. })
            | MetaType::Union(UnionMeta { description, .. })
            | MetaType::Enum(EnumMeta { description, .. })
            | MetaType::InputObject(InputObjectMeta { description, .. }) => description.as_ref(),
        }
    }

    /// The introspection kind of this type.
    pub fn type_kind(&self) -> TypeKind {
        match self {
            MetaType::Scalar(_) => TypeKind::Scalar,
            MetaType::Object(_) => TypeKind::Object,
            MetaType::Interface(_) => TypeKind::Interface,
            MetaType::Union(_) => TypeKind::Union,
            MetaType::Enum(_) => TypeKind::Enum,
            MetaType::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// Accesses a field's metadata given its name.
    ///
    /// Only objects and interfaces have fields; this always returns [`None`]
    /// for other types.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        match self {
            MetaType::Object(o) => o.fields().ok()?.get(name),
            MetaType::Interface(i) => i.fields().ok()?.get(name),
            _ => None,
        }
    }

    /// Accesses an input field's metadata given its name.
    ///
    /// Only input objects have input fields; this always returns [`None`]
    /// for other types.
    pub fn input_field_by_name(&self, name: &str) -> Option<&Argument> {
        match self {
            MetaType::InputObject(io) => io.input_fields().ok()?.get(name),
            _ => None,
        }
    }

    /// The fields of this type in declaration order, if it has output fields.
    pub fn fields(&self) -> Option<impl Iterator<Item = &Field>> {
        match self {
            MetaType::Object(o) => Some(o.fields().ok()?.values()),
            MetaType::Interface(i) => Some(i.fields().ok()?.values()),
            _ => None,
        }
    }

    /// Returns true if the type is a composite type.
    ///
    /// Objects, interfaces, and unions are composite.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            MetaType::Object(_) | MetaType::Interface(_) | MetaType::Union(_)
        )
    }

    /// Returns true if the type can occur in leaf positions in queries.
    ///
    /// Only enums and scalars are leaf types.
    pub fn is_leaf(&self) -> bool {
        matches!(self, MetaType::Enum(_) | MetaType::Scalar(_))
    }

    /// Returns true if the type is abstract.
    ///
    /// Only interfaces and unions are abstract types.
    pub fn is_abstract(&self) -> bool {
        matches!(self, MetaType::Interface(_) | MetaType::Union(_))
    }

    /// Returns true if the type can be used in input positions, e.g.
    /// arguments or variables.
    ///
    /// Only scalars, enums, and input objects are input types.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            MetaType::Scalar(_) | MetaType::Enum(_) | MetaType::InputObject(_)
        )
    }

    /// Returns true if the type is built in to GraphQL.
    pub fn is_builtin(&self) -> bool {
        let name = self.name();
        // "used exclusively by GraphQL's introspection system"
        name.starts_with("__")
            || name == "Boolean"
            || name == "String"
            || name == "Int"
            || name == "Float"
            || name == "ID"
    }
}

impl fmt::Debug for ScalarMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarMeta")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ObjectMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectMeta")
            .field("name", &self.name)
            .field("interface_names", &self.interface_names)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for InterfaceMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceMeta")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for UnionMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionMeta")
            .field("name", &self.name)
            .field("of_type_names", &self.of_type_names)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for InputObjectMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputObjectMeta")
            .field("name", &self.name)
            .field("one_of", &self.one_of)
            .field("input_fields", &self.input_fields)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod thunk_tests {
    use super::{Thunk, ThunkCycleError};

    #[test]
    fn evaluates_once_and_caches() {
        let thunk = Thunk::lazy(|| vec![1, 2, 3]);
        assert_eq!(thunk.get(), Ok(&vec![1, 2, 3]));
        assert_eq!(thunk.get(), Ok(&vec![1, 2, 3]));
    }

    #[test]
    fn pre_evaluated_values_pass_through() {
        let thunk = Thunk::new("ready");
        assert_eq!(thunk.get(), Ok(&"ready"));
    }

    #[test]
    fn reentrant_evaluation_is_an_error() {
        // A thunk that reads itself during its own evaluation.
        use std::sync::Arc;

        struct SelfRef(std::sync::OnceLock<Arc<Thunk<i32>>>);
        let holder = Arc::new(SelfRef(std::sync::OnceLock::new()));

        let h = Arc::clone(&holder);
        let thunk = Arc::new(Thunk::lazy(move || {
            let inner = h.0.get().expect("holder is initialized before `get`");
            assert_eq!(inner.get(), Err(ThunkCycleError));
            42
        }));
        holder.0.set(Arc::clone(&thunk)).expect("set once");

        // The cycle is reported inside, evaluation itself still completes.
        assert_eq!(thunk.get(), Ok(&42));
    }
}
