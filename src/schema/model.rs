use std::{fmt, sync::Arc};

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use fnv::FnvHashMap;

use crate::{
    ast::Type,
    schema::{
        introspection,
        meta::{Argument, Field, InterfaceMeta, MetaType, ObjectMeta, ScalarMeta, UnionMeta},
    },
    value::Value,
};

/// Error raised while assembling a [`Schema`].
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum SchemaError {
    /// A schema must define a query root type.
    #[display("Schema must define a query root type")]
    MissingQueryType,

    /// Two types with the same name were registered.
    #[display("Duplicate type \"{_0}\"")]
    DuplicateType(#[error(not(source))] ArcStr),

    /// A type or field name does not match `[_A-Za-z][_0-9A-Za-z]*`.
    #[display("Invalid name \"{_0}\"")]
    InvalidName(#[error(not(source))] ArcStr),

    /// A field, argument, interface or union member references a type that
    /// was never registered.
    #[display("Type \"{name}\" referenced by \"{referenced_by}\" is not defined")]
    UnknownType {
        name: ArcStr,
        referenced_by: ArcStr,
    },

    /// A field thunk referred back to itself during its own evaluation.
    #[display("Fields of type \"{_0}\" cannot be resolved while they are being constructed")]
    ThunkCycle(#[error(not(source))] ArcStr),

    /// An output position references an input-only type or vice versa.
    #[display("Type \"{name}\" cannot be used in {position} position")]
    InvalidTypePosition {
        name: ArcStr,
        position: &'static str,
    },

    /// An object declares an interface it does not correctly implement.
    #[display("Type \"{object}\" does not correctly implement interface \"{interface}\": {detail}")]
    InterfaceImplementation {
        object: ArcStr,
        interface: ArcStr,
        detail: String,
    },

    /// Two directives with the same name were registered.
    #[display("Duplicate directive \"@{_0}\"")]
    DuplicateDirective(#[error(not(source))] ArcStr),
}

/// Where a directive may legally appear.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    FieldDefinition,
    ArgumentDefinition,
    InputFieldDefinition,
    EnumValue,
}

impl DirectiveLocation {
    /// The introspection spelling of this location.
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveLocation::Query => "QUERY",
            DirectiveLocation::Mutation => "MUTATION",
            DirectiveLocation::Subscription => "SUBSCRIPTION",
            DirectiveLocation::Field => "FIELD",
            DirectiveLocation::FragmentDefinition => "FRAGMENT_DEFINITION",
            DirectiveLocation::FragmentSpread => "FRAGMENT_SPREAD",
            DirectiveLocation::InlineFragment => "INLINE_FRAGMENT",
            DirectiveLocation::VariableDefinition => "VARIABLE_DEFINITION",
            DirectiveLocation::FieldDefinition => "FIELD_DEFINITION",
            DirectiveLocation::ArgumentDefinition => "ARGUMENT_DEFINITION",
            DirectiveLocation::InputFieldDefinition => "INPUT_FIELD_DEFINITION",
            DirectiveLocation::EnumValue => "ENUM_VALUE",
        }
    }
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DirectiveLocation::Query => "query",
            DirectiveLocation::Mutation => "mutation",
            DirectiveLocation::Subscription => "subscription",
            DirectiveLocation::Field => "field",
            DirectiveLocation::FragmentDefinition => "fragment definition",
            DirectiveLocation::FragmentSpread => "fragment spread",
            DirectiveLocation::InlineFragment => "inline fragment",
            DirectiveLocation::VariableDefinition => "variable definition",
            DirectiveLocation::FieldDefinition => "field definition",
            DirectiveLocation::ArgumentDefinition => "argument definition",
            DirectiveLocation::InputFieldDefinition => "input field definition",
            DirectiveLocation::EnumValue => "enum value",
        })
    }
}

/// A directive the schema understands.
#[derive(Clone, Debug)]
pub struct DirectiveType {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub locations: Vec<DirectiveLocation>,
    pub arguments: Vec<Argument>,
    pub is_repeatable: bool,
}

impl DirectiveType {
    /// Builds a new directive available at the given `locations`.
    pub fn new(name: impl Into<ArcStr>, locations: &[DirectiveLocation]) -> Self {
        Self {
            name: name.into(),
            description: None,
            locations: locations.to_vec(),
            arguments: Vec::new(),
            is_repeatable: false,
        }
    }

    /// Sets the `description` of this directive.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an `argument` to this directive.
    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Marks this directive repeatable per location.
    #[must_use]
    pub fn repeatable(mut self) -> Self {
        self.is_repeatable = true;
        self
    }

    fn skip() -> Self {
        Self::new(
            "skip",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
        )
        .description("Directs the executor to skip this field or fragment when the `if` argument is true.")
        .argument(Argument::new(
            "if",
            Type::NonNullNamed("Boolean".into()),
        ))
    }

    fn include() -> Self {
        Self::new(
            "include",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
        )
        .description(
            "Directs the executor to include this field or fragment only when the `if` argument is true.",
        )
        .argument(Argument::new(
            "if",
            Type::NonNullNamed("Boolean".into()),
        ))
    }

    fn deprecated() -> Self {
        Self::new(
            "deprecated",
            &[
                DirectiveLocation::FieldDefinition,
                DirectiveLocation::ArgumentDefinition,
                DirectiveLocation::InputFieldDefinition,
                DirectiveLocation::EnumValue,
            ],
        )
        .description("Marks an element of a GraphQL schema as no longer supported.")
        .argument(
            Argument::new("reason", Type::Named("String".into()))
                .default_value(Value::from("No longer supported")),
        )
    }
}

/// A GraphQL schema: the named types, the root operation types, and the
/// directives.
///
/// The registry maps names to type definitions; fields refer to types by
/// name, which is what lets mutually recursive types exist without owning
/// references to each other.
pub struct Schema {
    types: FnvHashMap<ArcStr, MetaType>,
    query_type_name: ArcStr,
    mutation_type_name: Option<ArcStr>,
    subscription_type_name: Option<ArcStr>,
    directives: Vec<DirectiveType>,
    implementations: FnvHashMap<ArcStr, Vec<ArcStr>>,
    meta_schema_field: Field,
    meta_type_field: Field,
    meta_typename_field: Field,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("query_type_name", &self.query_type_name)
            .field("mutation_type_name", &self.mutation_type_name)
            .field("subscription_type_name", &self.subscription_type_name)
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Schema {
    /// Starts assembling a schema.
    pub fn build() -> SchemaBuilder {
        SchemaBuilder {
            query: None,
            mutation: None,
            subscription: None,
            types: Vec::new(),
            directives: Vec::new(),
        }
    }

    /// Looks a type definition up by name.
    pub fn concrete_type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    /// The query root type.
    pub fn query_type(&self) -> &MetaType {
        self.types
            .get(&self.query_type_name)
            .expect("query type is registered at construction")
    }

    /// The mutation root type, if the schema has one.
    pub fn mutation_type(&self) -> Option<&MetaType> {
        self.mutation_type_name.as_ref().map(|name| {
            self.types
                .get(name)
                .expect("mutation type is registered at construction")
        })
    }

    /// The subscription root type, if the schema has one.
    pub fn subscription_type(&self) -> Option<&MetaType> {
        self.subscription_type_name.as_ref().map(|name| {
            self.types
                .get(name)
                .expect("subscription type is registered at construction")
        })
    }

    /// All registered types, in no particular order.
    pub fn concrete_type_list(&self) -> Vec<&MetaType> {
        self.types.values().collect()
    }

    /// All directives this schema understands.
    pub fn directive_list(&self) -> &[DirectiveType] {
        &self.directives
    }

    /// Looks a directive up by name.
    pub fn directive_by_name(&self, name: &str) -> Option<&DirectiveType> {
        self.directives.iter().find(|d| d.name == name)
    }

    /// Looks up a field on a composite type, including the meta fields.
    ///
    /// `__typename` exists on every composite type; `__schema` and `__type`
    /// only on the query root.
    pub fn lookup_field<'a>(&'a self, parent: &'a MetaType, name: &str) -> Option<&'a Field> {
        if name == "__typename" && parent.is_composite() {
            return Some(&self.meta_typename_field);
        }
        if parent.name() == &self.query_type_name {
            if name == "__schema" {
                return Some(&self.meta_schema_field);
            }
            if name == "__type" {
                return Some(&self.meta_type_field);
            }
        }
        parent.field_by_name(name)
    }

    /// The object types a value of the given abstract type may turn out to
    /// be.
    pub fn possible_types(&self, t: &MetaType) -> Vec<&MetaType> {
        match t {
            MetaType::Union(UnionMeta { of_type_names, .. }) => of_type_names
                .iter()
                .filter_map(|n| self.concrete_type_by_name(n))
                .collect(),
            MetaType::Interface(InterfaceMeta { name, .. }) => self
                .implementations
                .get(name)
                .map(|impls| {
                    impls
                        .iter()
                        .filter_map(|n| self.concrete_type_by_name(n))
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Whether `possible_type` can occur where `abstract_type` is expected.
    pub fn is_possible_type(&self, abstract_type: &MetaType, possible_type: &MetaType) -> bool {
        self.possible_types(abstract_type)
            .into_iter()
            .any(|t| std::ptr::eq(t, possible_type))
    }

    /// Whether values of two composite types can overlap at runtime.
    pub fn type_overlap(&self, t1: &MetaType, t2: &MetaType) -> bool {
        if std::ptr::eq(t1, t2) {
            return true;
        }

        match (t1.is_abstract(), t2.is_abstract()) {
            (true, true) => self
                .possible_types(t1)
                .iter()
                .any(|t| self.is_possible_type(t2, t)),
            (true, false) => self.is_possible_type(t1, t2),
            (false, true) => self.is_possible_type(t2, t1),
            (false, false) => false,
        }
    }

    /// Whether `sub_type` is usable where `super_type` is expected,
    /// considering nullability and list wrapping.
    pub fn is_subtype(&self, sub_type: &Type, super_type: &Type) -> bool {
        use crate::ast::Type::*;

        if super_type == sub_type {
            return true;
        }

        match (super_type, sub_type) {
            (NonNullNamed(super_name), NonNullNamed(sub_name))
            | (Named(super_name), Named(sub_name))
            | (Named(super_name), NonNullNamed(sub_name)) => {
                self.is_named_subtype(sub_name, super_name)
            }
            (NonNullList(super_inner), NonNullList(sub_inner))
            | (List(super_inner), List(sub_inner))
            | (List(super_inner), NonNullList(sub_inner)) => {
                self.is_subtype(sub_inner, super_inner)
            }
            _ => false,
        }
    }

    /// Named-type subtyping: equality, or abstract-type membership.
    pub fn is_named_subtype(&self, sub_type_name: &str, super_type_name: &str) -> bool {
        if sub_type_name == super_type_name {
            true
        } else if let (Some(sub_type), Some(super_type)) = (
            self.concrete_type_by_name(sub_type_name),
            self.concrete_type_by_name(super_type_name),
        ) {
            super_type.is_abstract() && self.is_possible_type(super_type, sub_type)
        } else {
            false
        }
    }
}

/// Collects root types, additional named types and directives, then verifies
/// and assembles them into a [`Schema`].
pub struct SchemaBuilder {
    query: Option<ObjectMeta>,
    mutation: Option<ObjectMeta>,
    subscription: Option<ObjectMeta>,
    types: Vec<MetaType>,
    directives: Vec<DirectiveType>,
}

impl SchemaBuilder {
    /// Sets the query root type.
    #[must_use]
    pub fn query(mut self, query: ObjectMeta) -> Self {
        self.query = Some(query);
        self
    }

    /// Sets the mutation root type.
    #[must_use]
    pub fn mutation(mut self, mutation: ObjectMeta) -> Self {
        self.mutation = Some(mutation);
        self
    }

    /// Sets the subscription root type.
    #[must_use]
    pub fn subscription(mut self, subscription: ObjectMeta) -> Self {
        self.subscription = Some(subscription);
        self
    }

    /// Registers an additional named type.
    ///
    /// Every type referenced by name from a field, argument, interface list
    /// or union must be registered (or be a built-in scalar).
    #[must_use]
    pub fn register(mut self, meta: MetaType) -> Self {
        self.types.push(meta);
        self
    }

    /// Registers a custom directive.
    #[must_use]
    pub fn directive(mut self, directive: DirectiveType) -> Self {
        self.directives.push(directive);
        self
    }

    /// Verifies the collected definitions and produces the [`Schema`].
    ///
    /// This forces every field thunk, checks that each referenced type is
    /// registered, that interface implementations are complete and covariant,
    /// and that input/output positions only use input/output types.
    pub fn finish(self) -> Result<Arc<Schema>, SchemaError> {
        let query = self.query.ok_or(SchemaError::MissingQueryType)?;

        let query_type_name = query.name.clone();
        let mutation_type_name = self.mutation.as_ref().map(|m| m.name.clone());
        let subscription_type_name = self.subscription.as_ref().map(|s| s.name.clone());

        let mut types = FnvHashMap::default();

        for scalar in builtin_scalars() {
            types.insert(scalar.name().clone(), scalar);
        }
        for meta in introspection::meta_types() {
            types.insert(meta.name().clone(), meta);
        }

        let user_types = self
            .types
            .into_iter()
            .chain([MetaType::Object(query)])
            .chain(self.mutation.map(MetaType::Object))
            .chain(self.subscription.map(MetaType::Object));

        for meta in user_types {
            let name = meta.name().clone();
            if !is_valid_name(&name) {
                return Err(SchemaError::InvalidName(name));
            }
            if types.insert(name.clone(), meta).is_some() {
                return Err(SchemaError::DuplicateType(name));
            }
        }

        let mut directives = vec![
            DirectiveType::skip(),
            DirectiveType::include(),
            DirectiveType::deprecated(),
        ];
        for directive in self.directives {
            if directives.iter().any(|d| d.name == directive.name) {
                return Err(SchemaError::DuplicateDirective(directive.name));
            }
            directives.push(directive);
        }

        let mut schema = Schema {
            types,
            query_type_name,
            mutation_type_name,
            subscription_type_name,
            directives,
            implementations: FnvHashMap::default(),
            meta_schema_field: introspection::schema_meta_field(),
            meta_type_field: introspection::type_meta_field(),
            meta_typename_field: introspection::typename_meta_field(),
        };

        force_thunks_and_check_references(&schema)?;
        schema.implementations = collect_implementations(&schema);
        check_interface_implementations(&schema)?;

        Ok(Arc::new(schema))
    }
}

/// Whether `name` is a spec-legal GraphQL name.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn builtin_scalars() -> Vec<MetaType> {
    use crate::executor::FieldError;
    use crate::value::Value;

    let int = ScalarMeta::new("Int")
        .description(
            "The `Int` scalar type represents non-fractional signed whole numeric values.",
        )
        .parse_value(|v| match v {
            Value::Int(i) => Ok(Value::Int(*i)),
            Value::Float(f) if f.fract() == 0.0 && *f >= f64::from(i32::MIN) && *f <= f64::from(i32::MAX) => {
                Ok(Value::Int(*f as i32))
            }
            v => Err(FieldError::from(format!("Int cannot represent non-integer value: {v}"))),
        })
        .parse_literal(|l| match l {
            crate::ast::InputValue::Int(i) => Ok(Value::Int(*i)),
            l => Err(FieldError::from(format!("Int cannot represent non-integer value: {l}"))),
        })
        .serialize(|v| match v {
            Value::Int(i) => Ok(Value::Int(*i)),
            Value::Boolean(b) => Ok(Value::Int(i32::from(*b))),
            Value::Float(f) if f.fract() == 0.0 => Ok(Value::Int(*f as i32)),
            v => Err(FieldError::from(format!("Int cannot represent value: {v}"))),
        });

    let float = ScalarMeta::new("Float")
        .description(
            "The `Float` scalar type represents signed double-precision fractional values.",
        )
        .parse_value(|v| match v.as_float() {
            Some(f) => Ok(Value::Float(f)),
            None => Err(FieldError::from(format!("Float cannot represent non-numeric value: {v}"))),
        })
        .parse_literal(|l| match l {
            crate::ast::InputValue::Int(i) => Ok(Value::Float(f64::from(*i))),
            crate::ast::InputValue::Float(f) => Ok(Value::Float(*f)),
            l => Err(FieldError::from(format!("Float cannot represent non-numeric value: {l}"))),
        })
        .serialize(|v| match v.as_float() {
            Some(f) => Ok(Value::Float(f)),
            None => Err(FieldError::from(format!("Float cannot represent value: {v}"))),
        });

    let string = ScalarMeta::new("String")
        .description(
            "The `String` scalar type represents textual data, represented as UTF-8 character sequences.",
        )
        .parse_value(|v| match v {
            Value::String(s) => Ok(Value::String(s.clone())),
            v => Err(FieldError::from(format!("String cannot represent a non-string value: {v}"))),
        })
        .parse_literal(|l| match l {
            crate::ast::InputValue::String(s) => Ok(Value::String(s.clone())),
            l => Err(FieldError::from(format!("String cannot represent a non-string value: {l}"))),
        })
        .serialize(|v| match v {
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Boolean(b) => Ok(Value::String(b.to_string())),
            Value::Int(i) => Ok(Value::String(i.to_string())),
            Value::Float(f) => Ok(Value::String(f.to_string())),
            v => Err(FieldError::from(format!("String cannot represent value: {v}"))),
        });

    let boolean = ScalarMeta::new("Boolean")
        .description("The `Boolean` scalar type represents `true` or `false`.")
        .parse_value(|v| match v {
            Value::Boolean(b) => Ok(Value::Boolean(*b)),
            v => Err(FieldError::from(format!("Boolean cannot represent a non-boolean value: {v}"))),
        })
        .parse_literal(|l| match l {
            crate::ast::InputValue::Boolean(b) => Ok(Value::Boolean(*b)),
            l => Err(FieldError::from(format!("Boolean cannot represent a non-boolean value: {l}"))),
        })
        .serialize(|v| match v {
            Value::Boolean(b) => Ok(Value::Boolean(*b)),
            v => Err(FieldError::from(format!("Boolean cannot represent value: {v}"))),
        });

    let id = ScalarMeta::new("ID")
        .description(
            "The `ID` scalar type represents a unique identifier, often used to refetch an object or as key for a cache.",
        )
        .parse_value(|v| match v {
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Int(i) => Ok(Value::String(i.to_string())),
            v => Err(FieldError::from(format!("ID cannot represent value: {v}"))),
        })
        .parse_literal(|l| match l {
            crate::ast::InputValue::String(s) => Ok(Value::String(s.clone())),
            crate::ast::InputValue::Int(i) => Ok(Value::String(i.to_string())),
            l => Err(FieldError::from(format!("ID cannot represent value: {l}"))),
        })
        .serialize(|v| match v {
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Int(i) => Ok(Value::String(i.to_string())),
            v => Err(FieldError::from(format!("ID cannot represent value: {v}"))),
        });

    vec![
        int.into_meta(),
        float.into_meta(),
        string.into_meta(),
        boolean.into_meta(),
        id.into_meta(),
    ]
}

fn force_thunks_and_check_references(schema: &Schema) -> Result<(), SchemaError> {
    let mut referenced: Vec<(ArcStr, ArcStr, &'static str)> = Vec::new();

    for meta in schema.types.values() {
        let type_name = meta.name().clone();
        match meta {
            MetaType::Object(o) => {
                for name in &o.interface_names {
                    referenced.push((name.clone(), type_name.clone(), "output"));
                }
                let fields = o
                    .fields()
                    .map_err(|_| SchemaError::ThunkCycle(type_name.clone()))?;
                collect_field_references(fields.values(), &type_name, &mut referenced)?;
            }
            MetaType::Interface(i) => {
                for name in &i.interface_names {
                    referenced.push((name.clone(), type_name.clone(), "output"));
                }
                let fields = i
                    .fields()
                    .map_err(|_| SchemaError::ThunkCycle(type_name.clone()))?;
                collect_field_references(fields.values(), &type_name, &mut referenced)?;
            }
            MetaType::Union(u) => {
                for name in &u.of_type_names {
                    referenced.push((name.clone(), type_name.clone(), "output"));
                }
            }
            MetaType::InputObject(io) => {
                let fields = io
                    .input_fields()
                    .map_err(|_| SchemaError::ThunkCycle(type_name.clone()))?;
                for field in fields.values() {
                    if !is_valid_name(&field.name) {
                        return Err(SchemaError::InvalidName(field.name.clone()));
                    }
                    referenced.push((
                        field.arg_type.innermost_name().into(),
                        type_name.clone(),
                        "input",
                    ));
                }
            }
            MetaType::Scalar(_) | MetaType::Enum(_) => {}
        }
    }

    for (name, referenced_by, position) in referenced {
        let Some(target) = schema.concrete_type_by_name(&name) else {
            return Err(SchemaError::UnknownType {
                name,
                referenced_by,
            });
        };
        match position {
            "input" if !target.is_input() => {
                return Err(SchemaError::InvalidTypePosition {
                    name,
                    position: "input",
                });
            }
            "output" if matches!(target, MetaType::InputObject(_)) => {
                return Err(SchemaError::InvalidTypePosition {
                    name,
                    position: "output",
                });
            }
            _ => {}
        }
    }

    Ok(())
}

fn collect_field_references<'a>(
    fields: impl Iterator<Item = &'a Field>,
    type_name: &ArcStr,
    referenced: &mut Vec<(ArcStr, ArcStr, &'static str)>,
) -> Result<(), SchemaError> {
    for field in fields {
        if !is_valid_name(&field.name) {
            return Err(SchemaError::InvalidName(field.name.clone()));
        }
        referenced.push((
            field.field_type.innermost_name().into(),
            type_name.clone(),
            "output",
        ));
        for arg in &field.arguments {
            if !is_valid_name(&arg.name) {
                return Err(SchemaError::InvalidName(arg.name.clone()));
            }
            referenced.push((
                arg.arg_type.innermost_name().into(),
                type_name.clone(),
                "input",
            ));
        }
    }
    Ok(())
}

fn collect_implementations(schema: &Schema) -> FnvHashMap<ArcStr, Vec<ArcStr>> {
    let mut implementations: FnvHashMap<ArcStr, Vec<ArcStr>> = FnvHashMap::default();

    for meta in schema.types.values() {
        if let MetaType::Object(o) = meta {
            for interface in &o.interface_names {
                implementations
                    .entry(interface.clone())
                    .or_default()
                    .push(o.name.clone());
            }
        }
    }

    implementations
}

fn check_interface_implementations(schema: &Schema) -> Result<(), SchemaError> {
    for meta in schema.types.values() {
        let MetaType::Object(object) = meta else {
            continue;
        };

        for interface_name in &object.interface_names {
            let interface = match schema.concrete_type_by_name(interface_name) {
                Some(MetaType::Interface(i)) => i,
                Some(_) => {
                    return Err(SchemaError::InterfaceImplementation {
                        object: object.name.clone(),
                        interface: interface_name.clone(),
                        detail: "not an interface type".into(),
                    });
                }
                None => {
                    return Err(SchemaError::UnknownType {
                        name: interface_name.clone(),
                        referenced_by: object.name.clone(),
                    });
                }
            };

            let interface_fields = interface
                .fields()
                .map_err(|_| SchemaError::ThunkCycle(interface.name.clone()))?;
            let object_fields = object
                .fields()
                .map_err(|_| SchemaError::ThunkCycle(object.name.clone()))?;

            for (field_name, interface_field) in interface_fields {
                let Some(object_field) = object_fields.get(field_name) else {
                    return Err(SchemaError::InterfaceImplementation {
                        object: object.name.clone(),
                        interface: interface_name.clone(),
                        detail: format!("missing field \"{field_name}\""),
                    });
                };

                if !schema.is_subtype(&object_field.field_type, &interface_field.field_type) {
                    return Err(SchemaError::InterfaceImplementation {
                        object: object.name.clone(),
                        interface: interface_name.clone(),
                        detail: format!(
                            "field \"{field_name}\" of type \"{}\" is not a subtype of \"{}\"",
                            object_field.field_type, interface_field.field_type,
                        ),
                    });
                }

                for interface_arg in &interface_field.arguments {
                    let matching = object_field
                        .arguments
                        .iter()
                        .find(|a| a.name == interface_arg.name);
                    match matching {
                        Some(object_arg) if object_arg.arg_type == interface_arg.arg_type => {}
                        _ => {
                            return Err(SchemaError::InterfaceImplementation {
                                object: object.name.clone(),
                                interface: interface_name.clone(),
                                detail: format!(
                                    "argument \"{}\" of field \"{field_name}\" must be declared with type \"{}\"",
                                    interface_arg.name, interface_arg.arg_type,
                                ),
                            });
                        }
                    }
                }

                for object_arg in &object_field.arguments {
                    let declared_on_interface = interface_field
                        .arguments
                        .iter()
                        .any(|a| a.name == object_arg.name);
                    if !declared_on_interface
                        && object_arg.arg_type.is_non_null()
                        && object_arg.default_value.is_none()
                    {
                        return Err(SchemaError::InterfaceImplementation {
                            object: object.name.clone(),
                            interface: interface_name.clone(),
                            detail: format!(
                                "additional argument \"{}\" of field \"{field_name}\" must be nullable or have a default",
                                object_arg.name,
                            ),
                        });
                    }
                }
            }
        }
    }

    Ok(())
}
