//! Coercion of request inputs into internal values.
//!
//! Two paths share the coercion rules: variable values arrive as runtime
//! [`Value`]s and are coerced when execution starts; argument values are AST
//! literals (possibly referencing variables) and are coerced per field.

use std::fmt;

use indexmap::IndexMap;

use crate::{
    ast::{Field as FieldNode, InputValue, Operation, Type, VariableDefinition},
    error::GraphQLError,
    executor::Arguments,
    parser::{SourcePosition, Spanning},
    schema::{
        meta::{EnumMeta, Field as FieldMeta, InputObjectMeta, MetaType, ScalarMeta},
        model::Schema,
    },
    value::{Object, Value, Variables},
};

/// Where inside a variable's value the coercion failure happened; rendered
/// into the error message.
#[derive(Debug)]
enum Path<'a> {
    Root,
    ArrayElement(usize, &'a Path<'a>),
    ObjectField(&'a str, &'a Path<'a>),
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Root => Ok(()),
            Path::ArrayElement(idx, prev) => write!(f, "{prev}In element #{idx}: "),
            Path::ObjectField(name, prev) => write!(f, "{prev}In field \"{name}\": "),
        }
    }
}

/// Coerces the request's variable values against the operation's variable
/// definitions.
///
/// All failures are collected; on any failure the request is rejected before
/// field resolution.
pub fn coerce_variable_values(
    schema: &Schema,
    operation: &Operation,
    values: &Variables,
) -> Result<Variables, Vec<GraphQLError>> {
    let mut coerced = Variables::new();
    let mut errors = Vec::new();

    let Some(var_defs) = &operation.variable_definitions else {
        return Ok(coerced);
    };

    for def in var_defs.item.iter() {
        let name = def.name.item.as_str();
        let var_type = &def.var_type.item;

        let raw_type_name = var_type.innermost_name();
        match schema.concrete_type_by_name(raw_type_name) {
            Some(t) if t.is_input() => {}
            _ => {
                errors.push(GraphQLError::new(
                    format!(
                        "Variable \"${name}\" expected value of type \"{var_type}\" which \
                         cannot be used as an input type.",
                    ),
                    &[def.name.span.start],
                ));
                continue;
            }
        }

        match values.get(name) {
            // Provided, including an explicit null: the default never
            // overrides what the caller sent.
            Some(value) if !value.is_undefined() => {
                if value.is_null() && var_type.is_non_null() {
                    errors.push(GraphQLError::new(
                        format!(
                            "Variable \"${name}\" of non-null type \"{var_type}\" must not \
                             be null.",
                        ),
                        &[def.name.span.start],
                    ));
                    continue;
                }
                match coerce_input_value(schema, value, var_type, &Path::Root) {
                    Ok(coerced_value) => {
                        coerced.insert(name.to_owned(), coerced_value);
                    }
                    Err(detail) => {
                        errors.push(GraphQLError::new(
                            format!("Variable \"${name}\" got invalid value. {detail}."),
                            &[def.name.span.start],
                        ));
                    }
                }
            }
            _ => {
                if let Some(default) = &def.default_value {
                    match coerce_input_literal(schema, default, var_type, &Variables::new()) {
                        Ok(v) => {
                            coerced.insert(name.to_owned(), v);
                        }
                        Err(e) => errors.push(e),
                    }
                } else if var_type.is_non_null() {
                    errors.push(not_provided_error(name, var_type, def));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(coerced)
    } else {
        Err(errors)
    }
}

fn not_provided_error(name: &str, var_type: &Type, def: &VariableDefinition) -> GraphQLError {
    GraphQLError::new(
        format!("Variable \"${name}\" of required type \"{var_type}\" was not provided."),
        &[def.name.span.start],
    )
}

/// Coerces one runtime value against an input type, returning the internal
/// value or a human-readable failure detail.
fn coerce_input_value(
    schema: &Schema,
    value: &Value,
    expected: &Type,
    path: &Path<'_>,
) -> Result<Value, String> {
    match expected {
        Type::NonNullNamed(_) | Type::NonNullList(_) => {
            if value.is_null_or_undefined() {
                Err(format!("{path}Expected \"{expected}\", found null"))
            } else {
                coerce_input_value(schema, value, &expected.clone().into_nullable(), path)
            }
        }

        Type::List(inner) => {
            if value.is_null_or_undefined() {
                return Ok(Value::Null);
            }
            match value.as_list_value() {
                Some(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        out.push(coerce_input_value(
                            schema,
                            item,
                            inner,
                            &Path::ArrayElement(i, path),
                        )?);
                    }
                    Ok(Value::List(out))
                }
                // A single value coerces to a single-element list.
                None => Ok(Value::List(vec![coerce_input_value(
                    schema, value, inner, path,
                )?])),
            }
        }

        Type::Named(name) => {
            if value.is_null_or_undefined() {
                return Ok(Value::Null);
            }

            match schema.concrete_type_by_name(name) {
                Some(MetaType::Scalar(sm)) => coerce_scalar_value(sm, value, path),
                Some(MetaType::Enum(em)) => coerce_enum_value(em, value, path),
                Some(MetaType::InputObject(iom)) => {
                    coerce_input_object_value(schema, iom, value, path)
                }
                _ => Err(format!("{path}Unknown input type \"{name}\"")),
            }
        }
    }
}

fn coerce_scalar_value(
    meta: &ScalarMeta,
    value: &Value,
    path: &Path<'_>,
) -> Result<Value, String> {
    (meta.parse_value_fn)(value).map_err(|e| format!("{path}{}", e.message()))
}

fn coerce_enum_value(meta: &EnumMeta, value: &Value, path: &Path<'_>) -> Result<Value, String> {
    match value.as_string_value() {
        Some(name) => {
            if meta.value_by_name(name).is_some() {
                Ok(Value::String(name.into()))
            } else {
                Err(format!("{path}Invalid value for enum \"{}\"", meta.name))
            }
        }
        None => Err(format!(
            "{path}Expected \"{}\", found not a string",
            meta.name,
        )),
    }
}

fn coerce_input_object_value(
    schema: &Schema,
    meta: &InputObjectMeta,
    value: &Value,
    path: &Path<'_>,
) -> Result<Value, String> {
    let Some(obj) = value.as_object_value() else {
        return Err(format!(
            "{path}Expected \"{}\", found not an object",
            meta.name,
        ));
    };

    let input_fields = meta
        .input_fields()
        .map_err(|_| format!("{path}Fields of \"{}\" are not initialized", meta.name))?;

    for key in obj.keys() {
        if !input_fields.contains_key(key.as_str()) {
            return Err(format!(
                "{}Unknown field",
                Path::ObjectField(key.as_str(), path),
            ));
        }
    }

    let mut out = Object::new();
    for (field_name, field) in input_fields {
        match obj.get_field_value(field_name) {
            Some(field_value) if !field_value.is_undefined() => {
                let coerced = coerce_input_value(
                    schema,
                    field_value,
                    &field.arg_type,
                    &Path::ObjectField(field_name.as_str(), path),
                )?;
                out.add_field(field_name.clone(), coerced);
            }
            _ => {
                if let Some(default) = &field.default_value {
                    out.add_field(field_name.clone(), default.clone());
                } else if field.arg_type.is_non_null() {
                    return Err(format!(
                        "{}Expected \"{}\", found null",
                        Path::ObjectField(field_name.as_str(), path),
                        field.arg_type,
                    ));
                }
            }
        }
    }

    if meta.one_of {
        check_one_of(&meta.name, &out)?;
    }

    Ok(Value::Object(out))
}

/// A `OneOf` input object must carry exactly one key, and that key must not
/// be `null`.
fn check_one_of(type_name: &str, coerced: &Object) -> Result<(), String> {
    let provided = coerced.field_count();
    let non_null = coerced.iter().filter(|(_, v)| !v.is_null()).count();

    if provided == 1 && non_null == 1 {
        Ok(())
    } else {
        Err(format!(
            "Exactly one key must be specified for OneOf type \"{type_name}\"",
        ))
    }
}

/// Coerces a field's argument literals into runtime values.
///
/// Variables referenced by the literals are substituted from the
/// already-coerced variable values.
pub fn coerce_argument_values(
    schema: &Schema,
    field_def: &FieldMeta,
    node: &FieldNode,
    position: SourcePosition,
    variables: &Variables,
) -> Result<Arguments, GraphQLError> {
    let mut coerced = IndexMap::new();

    for arg_def in &field_def.arguments {
        let name = arg_def.name.as_str();
        let provided = node
            .arguments
            .as_ref()
            .and_then(|args| args.item.get(name));

        match provided {
            // An absent variable behaves exactly like an absent argument:
            // the default applies before non-null checks.
            Some(literal) if !is_missing_variable(literal, variables) => {
                let value =
                    coerce_input_literal(schema, literal, &arg_def.arg_type, variables)?;
                if value.is_undefined() {
                    apply_argument_default(&mut coerced, arg_def, position)?;
                } else {
                    coerced.insert(name.to_owned(), value);
                }
            }
            _ => apply_argument_default(&mut coerced, arg_def, position)?,
        }
    }

    Ok(Arguments::new(coerced))
}

fn is_missing_variable(literal: &Spanning<InputValue>, variables: &Variables) -> bool {
    match &literal.item {
        InputValue::Variable(name) => !variables.contains_key(name.as_str()),
        _ => false,
    }
}

fn apply_argument_default(
    coerced: &mut IndexMap<String, Value>,
    arg_def: &crate::schema::meta::Argument,
    position: SourcePosition,
) -> Result<(), GraphQLError> {
    if let Some(default) = &arg_def.default_value {
        coerced.insert(arg_def.name.to_string(), default.clone());
        Ok(())
    } else if arg_def.arg_type.is_non_null() {
        Err(GraphQLError::new(
            format!(
                "Argument \"{}\" of required type \"{}\" was not provided.",
                arg_def.name, arg_def.arg_type,
            ),
            &[position],
        ))
    } else {
        Ok(())
    }
}

/// Coerces an AST literal against an input type.
///
/// Returns [`Value::Undefined`] for a variable reference that has no value,
/// so callers can fall back to defaults.
pub(crate) fn coerce_input_literal(
    schema: &Schema,
    literal: &Spanning<InputValue>,
    expected: &Type,
    variables: &Variables,
) -> Result<Value, GraphQLError> {
    let position = literal.span.start;
    let located = |message: String| GraphQLError::new(message, &[position]);

    if let InputValue::Variable(var_name) = &literal.item {
        // Variables were coerced up front; their values substitute directly.
        return match variables.get(var_name.as_str()) {
            Some(v) => {
                if v.is_null() && expected.is_non_null() {
                    Err(located(format!(
                        "Expected value of type \"{expected}\", found null variable \"${var_name}\".",
                    )))
                } else {
                    Ok(v.clone())
                }
            }
            None => {
                if expected.is_non_null() {
                    Err(located(format!(
                        "Expected value of type \"{expected}\", but variable \"${var_name}\" \
                         was not provided.",
                    )))
                } else {
                    Ok(Value::Undefined)
                }
            }
        };
    }

    match expected {
        Type::NonNullNamed(_) | Type::NonNullList(_) => {
            if literal.item.is_null() {
                Err(located(format!(
                    "Expected value of type \"{expected}\", found null.",
                )))
            } else {
                coerce_input_literal(
                    schema,
                    literal,
                    &expected.clone().into_nullable(),
                    variables,
                )
            }
        }

        Type::List(inner) => match &literal.item {
            InputValue::Null => Ok(Value::Null),
            InputValue::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let coerced = coerce_input_literal(schema, item, inner, variables)?;
                    // A list element with a missing variable has no default
                    // to fall back to; it becomes an explicit null.
                    out.push(if coerced.is_undefined() {
                        Value::Null
                    } else {
                        coerced
                    });
                }
                Ok(Value::List(out))
            }
            // A single literal coerces to a single-element list.
            _ => Ok(Value::List(vec![coerce_input_literal(
                schema, literal, inner, variables,
            )?])),
        },

        Type::Named(name) => {
            if literal.item.is_null() {
                return Ok(Value::Null);
            }

            match schema.concrete_type_by_name(name) {
                Some(MetaType::Scalar(sm)) => (sm.parse_literal_fn)(&literal.item)
                    .map_err(|e| located(e.message().to_owned())),

                Some(MetaType::Enum(em)) => match &literal.item {
                    InputValue::Enum(value_name) => {
                        if em.value_by_name(value_name).is_some() {
                            Ok(Value::String(value_name.clone()))
                        } else {
                            Err(located(format!(
                                "Value \"{value_name}\" does not exist in \"{}\" enum.",
                                em.name,
                            )))
                        }
                    }
                    other => Err(located(format!(
                        "Enum \"{}\" cannot represent non-enum value: {other}.",
                        em.name,
                    ))),
                },

                Some(MetaType::InputObject(iom)) => {
                    coerce_input_object_literal(schema, iom, literal, variables)
                }

                _ => Err(located(format!("Unknown input type \"{name}\"."))),
            }
        }
    }
}

fn coerce_input_object_literal(
    schema: &Schema,
    meta: &InputObjectMeta,
    literal: &Spanning<InputValue>,
    variables: &Variables,
) -> Result<Value, GraphQLError> {
    let position = literal.span.start;
    let located = |message: String| GraphQLError::new(message, &[position]);

    let InputValue::Object(entries) = &literal.item else {
        return Err(located(format!(
            "Expected value of type \"{}\", found {}.",
            meta.name, literal.item,
        )));
    };

    let input_fields = meta
        .input_fields()
        .map_err(|_| located(format!("Fields of \"{}\" are not initialized.", meta.name)))?;

    for (key, _) in entries {
        if !input_fields.contains_key(key.item.as_str()) {
            return Err(GraphQLError::new(
                format!(
                    "Field \"{}\" is not defined by type \"{}\".",
                    key.item, meta.name,
                ),
                &[key.span.start],
            ));
        }
    }

    let mut out = Object::new();
    for (field_name, field) in input_fields {
        let provided = entries
            .iter()
            .find(|(k, _)| k.item.as_str() == field_name)
            .map(|(_, v)| v);

        match provided {
            Some(value_literal) if !is_missing_variable(value_literal, variables) => {
                let coerced =
                    coerce_input_literal(schema, value_literal, &field.arg_type, variables)?;
                if coerced.is_undefined() {
                    apply_input_field_default(&mut out, field_name, field, position)?;
                } else {
                    out.add_field(field_name.clone(), coerced);
                }
            }
            _ => apply_input_field_default(&mut out, field_name, field, position)?,
        }
    }

    if meta.one_of {
        check_one_of(&meta.name, &out).map_err(located)?;
    }

    Ok(Value::Object(out))
}

fn apply_input_field_default(
    out: &mut Object,
    field_name: &str,
    field: &crate::schema::meta::Argument,
    position: SourcePosition,
) -> Result<(), GraphQLError> {
    if let Some(default) = &field.default_value {
        out.add_field(field_name.to_owned(), default.clone());
        Ok(())
    } else if field.arg_type.is_non_null() {
        Err(GraphQLError::new(
            format!(
                "Field \"{field_name}\" of required type \"{}\" was not provided.",
                field.arg_type,
            ),
            &[position],
        ))
    } else {
        Ok(())
    }
}
