//! Abstract syntax tree for request documents.
//!
//! Nodes are owned values so a parsed [`Document`] can outlive its source
//! text (subscription streams hold on to their document). Every node that can
//! be reported in an error carries a [`Span`] via [`Spanning`].

pub mod visit;

use std::{fmt, slice};

use arcstr::ArcStr;

use crate::parser::{Span, Spanning};

/// Type literal in a syntax tree.
///
/// Carries no semantic information and might refer to types that don't exist.
/// Non-`null`-of-non-`null` is unrepresentable by construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Type {
    /// A `null`able named type, e.g. `String`.
    Named(ArcStr),
    /// A `null`able list type, e.g. `[String]`.
    List(Box<Type>),
    /// A non-`null` named type, e.g. `String!`.
    NonNullNamed(ArcStr),
    /// A non-`null` list type, e.g. `[String]!`.
    NonNullList(Box<Type>),
}

impl Type {
    /// Returns the name of this type by unpacking all list wrappers.
    ///
    /// All type literals contain exactly one name.
    pub fn innermost_name(&self) -> &str {
        match self {
            Type::Named(n) | Type::NonNullNamed(n) => n,
            Type::List(l) | Type::NonNullList(l) => l.innermost_name(),
        }
    }

    /// Indicates whether this type can not be `null`.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNullNamed(_) | Type::NonNullList(_))
    }

    /// Strips an outer non-`null` wrapper, if there is one.
    pub fn into_nullable(self) -> Self {
        match self {
            Type::NonNullNamed(n) => Type::Named(n),
            Type::NonNullList(l) => Type::List(l),
            t => t,
        }
    }

    /// Borrows the inner type of a list wrapper, if this is a list.
    pub fn list_inner(&self) -> Option<&Type> {
        match self {
            Type::List(l) | Type::NonNullList(l) => Some(l),
            _ => None,
        }
    }

    /// Wraps this type in a `null`able list.
    #[must_use]
    pub fn wrap_list(self) -> Self {
        Type::List(Box::new(self))
    }

    /// Makes this type non-`null`.
    #[must_use]
    pub fn wrap_non_null(self) -> Self {
        match self {
            Type::Named(n) => Type::NonNullNamed(n),
            Type::List(l) => Type::NonNullList(l),
            t => t,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Named(n) => write!(f, "{n}"),
            Type::List(t) => write!(f, "[{t}]"),
            Type::NonNullNamed(n) => write!(f, "{n}!"),
            Type::NonNullList(t) => write!(f, "[{t}]!"),
        }
    }
}

/// A literal value as it occurs in a request document.
///
/// Unlike the runtime [`Value`](crate::Value), literals can contain enum
/// names and variable references, and lists and objects are _spanned_: they
/// keep the source position of each element.
#[derive(Clone, Debug, PartialEq)]
pub enum InputValue {
    Null,
    Int(i32),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    Variable(String),
    List(Vec<Spanning<InputValue>>),
    Object(Vec<(Spanning<String>, Spanning<InputValue>)>),
}

impl InputValue {
    /// Does this literal represent an explicit `null`?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Does this literal represent a variable reference?
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    /// Views the underlying enum name, if present.
    pub fn as_enum_value(&self) -> Option<&str> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Recursively collects all referenced variable names.
    pub fn referenced_variables(&self) -> Vec<&str> {
        match self {
            Self::Variable(name) => vec![name.as_str()],
            Self::List(l) => l
                .iter()
                .flat_map(|v| v.item.referenced_variables())
                .collect(),
            Self::Object(o) => o
                .iter()
                .flat_map(|(_, v)| v.item.referenced_variables())
                .collect(),
            _ => vec![],
        }
    }

    /// Compares equality with another literal ignoring source positions.
    pub fn unlocated_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Int(i1), Self::Int(i2)) => i1 == i2,
            (Self::Float(f1), Self::Float(f2)) => f1 == f2,
            (Self::Boolean(b1), Self::Boolean(b2)) => b1 == b2,
            (Self::String(s1), Self::String(s2))
            | (Self::Enum(s1), Self::Enum(s2))
            | (Self::Variable(s1), Self::Variable(s2)) => s1 == s2,
            (Self::List(l1), Self::List(l2)) => {
                l1.len() == l2.len()
                    && l1
                        .iter()
                        .zip(l2.iter())
                        .all(|(v1, v2)| v1.item.unlocated_eq(&v2.item))
            }
            (Self::Object(o1), Self::Object(o2)) => {
                o1.len() == o2.len()
                    && o1.iter().all(|(k1, v1)| {
                        o2.iter()
                            .any(|(k2, v2)| k1.item == k2.item && v1.item.unlocated_eq(&v2.item))
                    })
            }
            _ => false,
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Enum(v) => write!(f, "{v}"),
            Self::Variable(v) => write!(f, "${v}"),
            Self::List(v) => {
                write!(f, "[")?;
                for (i, spanning) in v.iter().enumerate() {
                    spanning.item.fmt(f)?;
                    if i < v.len() - 1 {
                        write!(f, ", ")?;
                    }
                }
                write!(f, "]")
            }
            Self::Object(o) => {
                write!(f, "{{")?;
                for (i, (k, v)) in o.iter().enumerate() {
                    write!(f, "{}: ", k.item)?;
                    v.item.fmt(f)?;
                    if i < o.len() - 1 {
                        write!(f, ", ")?;
                    }
                }
                write!(f, "}}")
            }
        }
    }
}

/// The arguments of a field or directive.
#[derive(Clone, Debug, PartialEq)]
pub struct Arguments {
    pub items: Vec<(Spanning<String>, Spanning<InputValue>)>,
}

impl Arguments {
    pub fn iter(&self) -> slice::Iter<'_, (Spanning<String>, Spanning<InputValue>)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Spanning<InputValue>> {
        self.items
            .iter()
            .find(|(k, _)| k.item == key)
            .map(|(_, v)| v)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    pub name: Spanning<String>,
    pub arguments: Option<Spanning<Arguments>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition {
    pub name: Spanning<String>,
    pub var_type: Spanning<Type>,
    pub default_value: Option<Spanning<InputValue>>,
    pub directives: Option<Vec<Spanning<Directive>>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinitions {
    pub items: Vec<VariableDefinition>,
}

impl VariableDefinitions {
    pub fn iter(&self) -> slice::Iter<'_, VariableDefinition> {
        self.items.iter()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub alias: Option<Spanning<String>>,
    pub name: Spanning<String>,
    pub arguments: Option<Spanning<Arguments>>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub selection_set: Option<Vec<Selection>>,
}

impl Field {
    /// The alias if present, otherwise the field name: the key this field
    /// takes in the response object.
    pub fn response_key(&self) -> &str {
        self.alias
            .as_ref()
            .map(|a| a.item.as_str())
            .unwrap_or(&self.name.item)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FragmentSpread {
    pub name: Spanning<String>,
    pub directives: Option<Vec<Spanning<Directive>>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InlineFragment {
    pub type_condition: Option<Spanning<String>>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub selection_set: Vec<Selection>,
}

/// Entry in a selection set: a field, a fragment spread, or an inline
/// fragment.
///
/// ```text
/// {
///   field(withArg: 123) { subField }
///   ...fragmentSpread
///   ... on User {
///     inlineFragmentField
///   }
/// }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    Field(Spanning<Field>),
    FragmentSpread(Spanning<FragmentSpread>),
    InlineFragment(Spanning<InlineFragment>),
}

impl Selection {
    /// The span of whichever node this selection is.
    pub fn span(&self) -> &Span {
        match self {
            Selection::Field(f) => &f.span,
            Selection::FragmentSpread(s) => &s.span,
            Selection::InlineFragment(f) => &f.span,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub operation_type: OperationType,
    pub name: Option<Spanning<String>>,
    pub variable_definitions: Option<Spanning<VariableDefinitions>>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub selection_set: Vec<Selection>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    pub name: Spanning<String>,
    pub type_condition: Spanning<String>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub selection_set: Vec<Selection>,
}

/// A top-level definition in a request document.
#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    Operation(Spanning<Operation>),
    Fragment(Spanning<Fragment>),
    TypeSystem(Spanning<TypeSystemDefinition>),
}

/// A parsed request document: the list of its definitions.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

impl Document {
    /// Iterates over the operation definitions of this document.
    pub fn operations(&self) -> impl Iterator<Item = &Spanning<Operation>> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Operation(op) => Some(op),
            _ => None,
        })
    }

    /// Iterates over the fragment definitions of this document.
    pub fn fragments(&self) -> impl Iterator<Item = &Spanning<Fragment>> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Fragment(f) => Some(f),
            _ => None,
        })
    }
}

/// A type-system definition.
///
/// The engine parses these so a type-definition document can be validated
/// (and so executable validation can reject them); it does not build schemas
/// from them.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeSystemDefinition {
    Schema(SchemaDefinition),
    Scalar(ScalarTypeDefinition),
    Object(ObjectTypeDefinition),
    Interface(InterfaceTypeDefinition),
    Union(UnionTypeDefinition),
    Enum(EnumTypeDefinition),
    InputObject(InputObjectTypeDefinition),
    Directive(DirectiveDefinition),
}

impl TypeSystemDefinition {
    /// The defined type's name, if this defines a type.
    pub fn type_name(&self) -> Option<&Spanning<String>> {
        match self {
            TypeSystemDefinition::Scalar(d) => Some(&d.name),
            TypeSystemDefinition::Object(d) => Some(&d.name),
            TypeSystemDefinition::Interface(d) => Some(&d.name),
            TypeSystemDefinition::Union(d) => Some(&d.name),
            TypeSystemDefinition::Enum(d) => Some(&d.name),
            TypeSystemDefinition::InputObject(d) => Some(&d.name),
            TypeSystemDefinition::Schema(_) | TypeSystemDefinition::Directive(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RootOperationTypeDefinition {
    pub operation: OperationType,
    pub named_type: Spanning<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SchemaDefinition {
    pub description: Option<Spanning<String>>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub operation_types: Vec<Spanning<RootOperationTypeDefinition>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScalarTypeDefinition {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<String>,
    pub directives: Option<Vec<Spanning<Directive>>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputValueDefinition {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<String>,
    pub value_type: Spanning<Type>,
    pub default_value: Option<Spanning<InputValue>>,
    pub directives: Option<Vec<Spanning<Directive>>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDefinition {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<String>,
    pub arguments: Vec<Spanning<InputValueDefinition>>,
    pub field_type: Spanning<Type>,
    pub directives: Option<Vec<Spanning<Directive>>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectTypeDefinition {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<String>,
    pub interfaces: Vec<Spanning<String>>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub fields: Vec<Spanning<FieldDefinition>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceTypeDefinition {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<String>,
    pub interfaces: Vec<Spanning<String>>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub fields: Vec<Spanning<FieldDefinition>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnionTypeDefinition {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<String>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub members: Vec<Spanning<String>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumValueDefinition {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<String>,
    pub directives: Option<Vec<Spanning<Directive>>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumTypeDefinition {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<String>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub values: Vec<Spanning<EnumValueDefinition>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputObjectTypeDefinition {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<String>,
    pub directives: Option<Vec<Spanning<Directive>>>,
    pub fields: Vec<Spanning<InputValueDefinition>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveDefinition {
    pub description: Option<Spanning<String>>,
    pub name: Spanning<String>,
    pub arguments: Vec<Spanning<InputValueDefinition>>,
    pub repeatable: bool,
    pub locations: Vec<Spanning<String>>,
}
