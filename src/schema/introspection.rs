//! The introspection schema: `__Schema`, `__Type` and friends, plus the
//! `__schema`/`__type`/`__typename` meta fields.
//!
//! Field, argument, enum-value and directive descriptions are materialized
//! eagerly into plain response objects the default resolver can walk. Type
//! references are the cyclic part, so they travel as their type-literal
//! spelling (e.g. `"[Droid!]"`) and the `__Type` resolvers instantiate them
//! back through the parser on demand.

use arcstr::ArcStr;

use crate::{
    ast::Type,
    executor::{FieldError, FieldResult, ResolverParams},
    parser::parse_type,
    schema::{
        meta::{
            Argument, EnumMeta, EnumValue, Field, MetaType, ObjectMeta, TypeKind,
        },
        model::{DirectiveType, Schema},
    },
    value::{Object, Value},
};

fn string_type() -> Type {
    Type::Named("String".into())
}

fn non_null(name: &str) -> Type {
    Type::NonNullNamed(name.into())
}

fn non_null_list_of(name: &str) -> Type {
    Type::NonNullList(Box::new(Type::NonNullNamed(name.into())))
}

fn list_of_non_null(name: &str) -> Type {
    Type::List(Box::new(Type::NonNullNamed(name.into())))
}

fn include_deprecated_argument() -> Argument {
    Argument::new("includeDeprecated", Type::Named("Boolean".into()))
        .default_value(Value::Boolean(false))
}

/// A type reference, encoded for transport between introspection resolvers.
fn type_ref(t: &Type) -> Value {
    Value::String(t.to_string())
}

fn named_type_ref(name: &str) -> Value {
    Value::String(name.into())
}

/// Decodes the marker produced by [`type_ref`].
fn source_type(params: &ResolverParams<'_>) -> FieldResult<Type> {
    let marker = params
        .source
        .as_string_value()
        .ok_or_else(|| FieldError::from("Invalid __Type reference"))?;
    parse_type(marker)
        .map(|t| t.item)
        .map_err(|e| FieldError::from(format!("Invalid __Type reference: {e}")))
}

/// The meta types every schema registers.
pub(crate) fn meta_types() -> Vec<MetaType> {
    vec![
        schema_type().into_meta(),
        type_type().into_meta(),
        field_type().into_meta(),
        input_value_type().into_meta(),
        enum_value_type().into_meta(),
        directive_type().into_meta(),
        type_kind_enum().into_meta(),
        directive_location_enum().into_meta(),
    ]
}

/// The `__schema` meta field on the query root.
pub(crate) fn schema_meta_field() -> Field {
    Field::new("__schema", non_null("__Schema"))
        .description("Access the current type schema of this server.")
        .resolve_with(|_| Ok(Value::Object(Object::new())))
}

/// The `__type(name:)` meta field on the query root.
pub(crate) fn type_meta_field() -> Field {
    Field::new("__type", Type::Named("__Type".into()))
        .description("Request the type information of a single type.")
        .argument(Argument::new("name", non_null("String")))
        .resolve_with(|params| {
            let name: String = params.args.get("name")?;
            Ok(match params.info.schema.concrete_type_by_name(&name) {
                Some(t) => named_type_ref(t.name()),
                None => Value::Null,
            })
        })
}

/// The `__typename` meta field available on every composite type.
pub(crate) fn typename_meta_field() -> Field {
    Field::new("__typename", non_null("String"))
        .description("The name of the current Object type at runtime.")
        .resolve_with(|params| Ok(Value::String(params.info.parent_type.into())))
}

fn schema_type() -> ObjectMeta {
    ObjectMeta::new(
        "__Schema",
        vec![
            Field::new("description", string_type()).resolve_with(|_| Ok(Value::Null)),
            Field::new("types", non_null_list_of("__Type"))
                .description("A list of all types supported by this server.")
                .resolve_with(|params| {
                    let mut types: Vec<_> = params
                        .info
                        .schema
                        .concrete_type_list()
                        .into_iter()
                        .map(|t| t.name().clone())
                        .collect();
                    types.sort();
                    Ok(Value::List(
                        types.iter().map(|n| named_type_ref(n)).collect(),
                    ))
                }),
            Field::new("queryType", non_null("__Type"))
                .description("The type that query operations will be rooted at.")
                .resolve_with(|params| {
                    Ok(named_type_ref(params.info.schema.query_type().name()))
                }),
            Field::new("mutationType", Type::Named("__Type".into()))
                .description(
                    "If this server supports mutation, the type that mutation operations will \
                     be rooted at.",
                )
                .resolve_with(|params| {
                    Ok(match params.info.schema.mutation_type() {
                        Some(t) => named_type_ref(t.name()),
                        None => Value::Null,
                    })
                }),
            Field::new("subscriptionType", Type::Named("__Type".into()))
                .description(
                    "If this server supports subscription, the type that subscription \
                     operations will be rooted at.",
                )
                .resolve_with(|params| {
                    Ok(match params.info.schema.subscription_type() {
                        Some(t) => named_type_ref(t.name()),
                        None => Value::Null,
                    })
                }),
            Field::new("directives", non_null_list_of("__Directive"))
                .description("A list of all directives supported by this server.")
                .resolve_with(|params| {
                    Ok(Value::List(
                        params
                            .info
                            .schema
                            .directive_list()
                            .iter()
                            .map(directive_to_value)
                            .collect(),
                    ))
                }),
        ],
    )
}

fn type_type() -> ObjectMeta {
    ObjectMeta::new(
        "__Type",
        vec![
            Field::new("kind", non_null("__TypeKind")).resolve_with(|params| {
                let t = source_type(&params)?;
                Ok(Value::String(
                    match t {
                        Type::NonNullNamed(_) | Type::NonNullList(_) => TypeKind::NonNull,
                        Type::List(_) => TypeKind::List,
                        Type::Named(name) => {
                            named_meta(&params, &name)?.type_kind()
                        }
                    }
                    .as_str()
                    .into(),
                ))
            }),
            Field::new("name", string_type()).resolve_with(|params| {
                Ok(match source_type(&params)? {
                    Type::Named(name) => Value::String(name.as_str().into()),
                    _ => Value::Null,
                })
            }),
            Field::new("description", string_type()).resolve_with(|params| {
                Ok(match source_type(&params)? {
                    Type::Named(name) => named_meta(&params, &name)?
                        .description()
                        .map(|d| Value::String(d.as_str().into()))
                        .unwrap_or(Value::Null),
                    _ => Value::Null,
                })
            }),
            Field::new("specifiedByURL", string_type()).resolve_with(|params| {
                Ok(match source_type(&params)? {
                    Type::Named(name) => match named_meta(&params, &name)? {
                        MetaType::Scalar(s) => s
                            .specified_by_url
                            .as_ref()
                            .map(|u| Value::String(u.as_str().into()))
                            .unwrap_or(Value::Null),
                        _ => Value::Null,
                    },
                    _ => Value::Null,
                })
            }),
            Field::new("fields", list_of_non_null("__Field"))
                .argument(include_deprecated_argument())
                .resolve_with(|params| {
                    let include_deprecated =
                        params.args.get::<Option<bool>>("includeDeprecated")?.unwrap_or(false);
                    let Type::Named(name) = source_type(&params)? else {
                        return Ok(Value::Null);
                    };
                    let meta = named_meta(&params, &name)?;
                    match meta.fields() {
                        Some(fields) => Ok(Value::List(
                            fields
                                .filter(|f| {
                                    include_deprecated || !f.deprecation_status.is_deprecated()
                                })
                                .map(|f| field_to_value(&params, f))
                                .collect(),
                        )),
                        None => Ok(Value::Null),
                    }
                }),
            Field::new("interfaces", list_of_non_null("__Type")).resolve_with(|params| {
                let Type::Named(name) = source_type(&params)? else {
                    return Ok(Value::Null);
                };
                let interface_names = match named_meta(&params, &name)? {
                    MetaType::Object(o) => &o.interface_names,
                    MetaType::Interface(i) => &i.interface_names,
                    _ => return Ok(Value::Null),
                };
                Ok(Value::List(
                    interface_names.iter().map(|n| named_type_ref(n)).collect(),
                ))
            }),
            Field::new("possibleTypes", list_of_non_null("__Type")).resolve_with(|params| {
                let Type::Named(name) = source_type(&params)? else {
                    return Ok(Value::Null);
                };
                let meta = named_meta(&params, &name)?;
                if !meta.is_abstract() {
                    return Ok(Value::Null);
                }
                let mut possible: Vec<_> = params
                    .info
                    .schema
                    .possible_types(meta)
                    .into_iter()
                    .map(|t| t.name().clone())
                    .collect();
                possible.sort();
                Ok(Value::List(
                    possible.iter().map(|n| named_type_ref(n)).collect(),
                ))
            }),
            Field::new("enumValues", list_of_non_null("__EnumValue"))
                .argument(include_deprecated_argument())
                .resolve_with(|params| {
                    let include_deprecated =
                        params.args.get::<Option<bool>>("includeDeprecated")?.unwrap_or(false);
                    let Type::Named(name) = source_type(&params)? else {
                        return Ok(Value::Null);
                    };
                    match named_meta(&params, &name)? {
                        MetaType::Enum(e) => Ok(Value::List(
                            e.values
                                .iter()
                                .filter(|v| {
                                    include_deprecated || !v.deprecation_status.is_deprecated()
                                })
                                .map(enum_value_to_value)
                                .collect(),
                        )),
                        _ => Ok(Value::Null),
                    }
                }),
            Field::new("inputFields", list_of_non_null("__InputValue"))
                .argument(include_deprecated_argument())
                .resolve_with(|params| {
                    let include_deprecated =
                        params.args.get::<Option<bool>>("includeDeprecated")?.unwrap_or(false);
                    let Type::Named(name) = source_type(&params)? else {
                        return Ok(Value::Null);
                    };
                    match named_meta(&params, &name)? {
                        MetaType::InputObject(io) => {
                            let fields = io
                                .input_fields()
                                .map_err(|_| FieldError::from("input fields unavailable"))?;
                            Ok(Value::List(
                                fields
                                    .values()
                                    .filter(|a| {
                                        include_deprecated
                                            || !a.deprecation_status.is_deprecated()
                                    })
                                    .map(|a| input_value_to_value(&params, a))
                                    .collect(),
                            ))
                        }
                        _ => Ok(Value::Null),
                    }
                }),
            Field::new("ofType", Type::Named("__Type".into())).resolve_with(|params| {
                Ok(match source_type(&params)? {
                    Type::Named(_) => Value::Null,
                    Type::List(inner) => type_ref(&inner),
                    t @ Type::NonNullNamed(_) | t @ Type::NonNullList(_) => {
                        type_ref(&t.into_nullable())
                    }
                })
            }),
            Field::new("isOneOf", Type::Named("Boolean".into())).resolve_with(|params| {
                Ok(match source_type(&params)? {
                    Type::Named(name) => match named_meta(&params, &name)? {
                        MetaType::InputObject(io) => Value::Boolean(io.one_of),
                        _ => Value::Null,
                    },
                    _ => Value::Null,
                })
            }),
        ],
    )
}

fn named_meta<'a>(params: &ResolverParams<'a>, name: &ArcStr) -> FieldResult<&'a MetaType> {
    params
        .info
        .schema
        .concrete_type_by_name(name)
        .ok_or_else(|| FieldError::from(format!("Unknown type \"{name}\"")))
}

fn field_type() -> ObjectMeta {
    ObjectMeta::new(
        "__Field",
        vec![
            Field::new("name", non_null("String")),
            Field::new("description", string_type()),
            Field::new("args", non_null_list_of("__InputValue"))
                .argument(include_deprecated_argument())
                .resolve_with(|params| {
                    let include_deprecated =
                        params.args.get::<Option<bool>>("includeDeprecated")?.unwrap_or(false);
                    let args = params
                        .source
                        .as_object_value()
                        .and_then(|o| o.get_field_value("args"))
                        .and_then(Value::as_list_value)
                        .unwrap_or(&[]);
                    Ok(Value::List(
                        args.iter()
                            .filter(|a| {
                                include_deprecated
                                    || a.as_object_value()
                                        .and_then(|o| o.get_field_value("isDeprecated"))
                                        .and_then(Value::as_boolean)
                                        != Some(true)
                            })
                            .cloned()
                            .collect(),
                    ))
                }),
            Field::new("type", non_null("__Type")),
            Field::new("isDeprecated", non_null("Boolean")),
            Field::new("deprecationReason", string_type()),
        ],
    )
}

fn input_value_type() -> ObjectMeta {
    ObjectMeta::new(
        "__InputValue",
        vec![
            Field::new("name", non_null("String")),
            Field::new("description", string_type()),
            Field::new("type", non_null("__Type")),
            Field::new("defaultValue", string_type()).description(
                "A GraphQL-formatted string representing the default value for this input value.",
            ),
            Field::new("isDeprecated", non_null("Boolean")),
            Field::new("deprecationReason", string_type()),
        ],
    )
}

fn enum_value_type() -> ObjectMeta {
    ObjectMeta::new(
        "__EnumValue",
        vec![
            Field::new("name", non_null("String")),
            Field::new("description", string_type()),
            Field::new("isDeprecated", non_null("Boolean")),
            Field::new("deprecationReason", string_type()),
        ],
    )
}

fn directive_type() -> ObjectMeta {
    ObjectMeta::new(
        "__Directive",
        vec![
            Field::new("name", non_null("String")),
            Field::new("description", string_type()),
            Field::new("isRepeatable", non_null("Boolean")),
            Field::new("locations", non_null_list_of("__DirectiveLocation")),
            Field::new("args", non_null_list_of("__InputValue"))
                .argument(include_deprecated_argument()),
        ],
    )
}

fn type_kind_enum() -> EnumMeta {
    EnumMeta::new(
        "__TypeKind",
        vec![
            EnumValue::new("SCALAR"),
            EnumValue::new("OBJECT"),
            EnumValue::new("INTERFACE"),
            EnumValue::new("UNION"),
            EnumValue::new("ENUM"),
            EnumValue::new("INPUT_OBJECT"),
            EnumValue::new("LIST"),
            EnumValue::new("NON_NULL"),
        ],
    )
    .description("An enum describing what kind of type a given `__Type` is.")
}

fn directive_location_enum() -> EnumMeta {
    EnumMeta::new(
        "__DirectiveLocation",
        vec![
            EnumValue::new("QUERY"),
            EnumValue::new("MUTATION"),
            EnumValue::new("SUBSCRIPTION"),
            EnumValue::new("FIELD"),
            EnumValue::new("FRAGMENT_DEFINITION"),
            EnumValue::new("FRAGMENT_SPREAD"),
            EnumValue::new("INLINE_FRAGMENT"),
            EnumValue::new("VARIABLE_DEFINITION"),
            EnumValue::new("FIELD_DEFINITION"),
            EnumValue::new("ARGUMENT_DEFINITION"),
            EnumValue::new("INPUT_FIELD_DEFINITION"),
            EnumValue::new("ENUM_VALUE"),
        ],
    )
    .description("A Directive can be adjacent to many parts of the GraphQL language.")
}

fn field_to_value(params: &ResolverParams<'_>, field: &Field) -> Value {
    let mut out = Object::new();
    out.add_field("name", Value::from(field.name.clone()));
    out.add_field(
        "description",
        field
            .description
            .as_ref()
            .map(|d| Value::String(d.as_str().into()))
            .unwrap_or(Value::Null),
    );
    out.add_field(
        "args",
        Value::List(
            field
                .arguments
                .iter()
                .map(|a| input_value_to_value(params, a))
                .collect(),
        ),
    );
    out.add_field("type", type_ref(&field.field_type));
    out.add_field(
        "isDeprecated",
        Value::Boolean(field.deprecation_status.is_deprecated()),
    );
    out.add_field(
        "deprecationReason",
        field
            .deprecation_status
            .reason()
            .map(Value::from)
            .unwrap_or(Value::Null),
    );
    Value::Object(out)
}

fn input_value_to_value(params: &ResolverParams<'_>, arg: &Argument) -> Value {
    let mut out = Object::new();
    out.add_field("name", Value::from(arg.name.clone()));
    out.add_field(
        "description",
        arg.description
            .as_ref()
            .map(|d| Value::String(d.as_str().into()))
            .unwrap_or(Value::Null),
    );
    out.add_field("type", type_ref(&arg.arg_type));
    out.add_field(
        "defaultValue",
        arg.default_value
            .as_ref()
            .map(|v| Value::String(print_value(params.info.schema, v, &arg.arg_type)))
            .unwrap_or(Value::Null),
    );
    out.add_field(
        "isDeprecated",
        Value::Boolean(arg.deprecation_status.is_deprecated()),
    );
    out.add_field(
        "deprecationReason",
        arg.deprecation_status
            .reason()
            .map(Value::from)
            .unwrap_or(Value::Null),
    );
    Value::Object(out)
}

fn enum_value_to_value(value: &EnumValue) -> Value {
    let mut out = Object::new();
    out.add_field("name", Value::from(value.name.clone()));
    out.add_field(
        "description",
        value
            .description
            .as_ref()
            .map(|d| Value::String(d.as_str().into()))
            .unwrap_or(Value::Null),
    );
    out.add_field(
        "isDeprecated",
        Value::Boolean(value.deprecation_status.is_deprecated()),
    );
    out.add_field(
        "deprecationReason",
        value
            .deprecation_status
            .reason()
            .map(Value::from)
            .unwrap_or(Value::Null),
    );
    Value::Object(out)
}

fn directive_to_value(directive: &DirectiveType) -> Value {
    let mut out = Object::new();
    out.add_field("name", Value::from(directive.name.clone()));
    out.add_field(
        "description",
        directive
            .description
            .as_ref()
            .map(|d| Value::String(d.as_str().into()))
            .unwrap_or(Value::Null),
    );
    out.add_field("isRepeatable", Value::Boolean(directive.is_repeatable));
    out.add_field(
        "locations",
        Value::List(
            directive
                .locations
                .iter()
                .map(|l| Value::String(l.as_str().into()))
                .collect(),
        ),
    );
    out.add_field(
        "args",
        Value::List(
            directive
                .arguments
                .iter()
                .map(directive_argument_to_value)
                .collect(),
        ),
    );
    Value::Object(out)
}

// Directive arguments never need schema-aware printing beyond scalars.
fn directive_argument_to_value(arg: &Argument) -> Value {
    let mut out = Object::new();
    out.add_field("name", Value::from(arg.name.clone()));
    out.add_field(
        "description",
        arg.description
            .as_ref()
            .map(|d| Value::String(d.as_str().into()))
            .unwrap_or(Value::Null),
    );
    out.add_field("type", type_ref(&arg.arg_type));
    out.add_field(
        "defaultValue",
        arg.default_value
            .as_ref()
            .map(|v| Value::String(print_plain_value(v)))
            .unwrap_or(Value::Null),
    );
    out.add_field(
        "isDeprecated",
        Value::Boolean(arg.deprecation_status.is_deprecated()),
    );
    out.add_field(
        "deprecationReason",
        arg.deprecation_status
            .reason()
            .map(Value::from)
            .unwrap_or(Value::Null),
    );
    Value::Object(out)
}

/// Prints an internal value in GraphQL literal syntax, rendering values of
/// enum type as bare names.
fn print_value(schema: &Schema, value: &Value, of_type: &Type) -> String {
    let is_enum = matches!(
        schema.concrete_type_by_name(of_type.innermost_name()),
        Some(MetaType::Enum(_)),
    );
    match value {
        Value::String(s) if is_enum => s.clone(),
        Value::List(items) => {
            let inner = of_type.list_inner().unwrap_or(of_type);
            let printed: Vec<_> = items
                .iter()
                .map(|i| print_value(schema, i, inner))
                .collect();
            format!("[{}]", printed.join(", "))
        }
        Value::Object(obj) => {
            let printed: Vec<_> = obj
                .iter()
                .map(|(k, v)| format!("{k}: {}", print_plain_value(v)))
                .collect();
            format!("{{{}}}", printed.join(", "))
        }
        v => print_plain_value(v),
    }
}

fn print_plain_value(value: &Value) -> String {
    match value {
        Value::Object(obj) => {
            let printed: Vec<_> = obj
                .iter()
                .map(|(k, v)| format!("{k}: {}", print_plain_value(v)))
                .collect();
            format!("{{{}}}", printed.join(", "))
        }
        Value::List(items) => {
            let printed: Vec<_> = items.iter().map(print_plain_value).collect();
            format!("[{}]", printed.join(", "))
        }
        v => v.to_string(),
    }
}
