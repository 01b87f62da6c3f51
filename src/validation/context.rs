use std::collections::HashSet;

use crate::{
    ast::{Definition, Document, Type},
    error::GraphQLError,
    parser::SourcePosition,
    schema::{
        meta::{Field as FieldMeta, MetaType},
        model::{DirectiveType, Schema},
    },
};

/// Shared state for one validation run: the error sink plus the type-info
/// stacks the walk maintains (current output type, parent type, input type,
/// field definition and directive).
pub struct ValidatorContext<'a> {
    pub schema: &'a Schema,
    errors: Vec<GraphQLError>,
    type_stack: Vec<Option<&'a MetaType>>,
    type_literal_stack: Vec<Option<Type>>,
    input_type_stack: Vec<Option<&'a MetaType>>,
    input_type_literal_stack: Vec<Option<Type>>,
    parent_type_stack: Vec<Option<&'a MetaType>>,
    field_stack: Vec<Option<&'a FieldMeta>>,
    directive_stack: Vec<Option<&'a DirectiveType>>,
    fragment_names: HashSet<&'a str>,
}

impl<'a> ValidatorContext<'a> {
    #[doc(hidden)]
    pub fn new(schema: &'a Schema, document: &'a Document) -> Self {
        Self {
            errors: Vec::new(),
            schema,
            type_stack: Vec::new(),
            type_literal_stack: Vec::new(),
            parent_type_stack: Vec::new(),
            input_type_stack: Vec::new(),
            input_type_literal_stack: Vec::new(),
            field_stack: Vec::new(),
            directive_stack: Vec::new(),
            fragment_names: document
                .definitions
                .iter()
                .filter_map(|def| match def {
                    Definition::Fragment(frag) => Some(frag.item.name.item.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    #[doc(hidden)]
    pub fn append_errors(&mut self, mut errors: Vec<GraphQLError>) {
        self.errors.append(&mut errors);
    }

    #[doc(hidden)]
    pub fn report_error(&mut self, message: &str, locations: &[SourcePosition]) {
        self.errors.push(GraphQLError::new(message, locations));
    }

    #[doc(hidden)]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Finishes the run, sorting errors by position for determinism.
    #[doc(hidden)]
    pub fn into_errors(mut self) -> Vec<GraphQLError> {
        self.errors.sort_by(|a, b| {
            let key = |e: &GraphQLError| {
                (
                    e.locations.first().map(|l| (l.line, l.column)),
                    e.message.clone(),
                )
            };
            key(a).cmp(&key(b))
        });
        self.errors
    }

    pub(crate) fn push_type(&mut self, t: Option<Type>) {
        match &t {
            Some(t) => self
                .type_stack
                .push(self.schema.concrete_type_by_name(t.innermost_name())),
            None => self.type_stack.push(None),
        }
        self.type_literal_stack.push(t);
    }

    pub(crate) fn pop_type(&mut self) {
        self.type_literal_stack.pop();
        self.type_stack.pop();
    }

    pub(crate) fn push_parent_type(&mut self) {
        self.parent_type_stack
            .push(*self.type_stack.last().unwrap_or(&None));
    }

    pub(crate) fn pop_parent_type(&mut self) {
        self.parent_type_stack.pop();
    }

    pub(crate) fn push_input_type(&mut self, t: Option<Type>) {
        match &t {
            Some(t) => self
                .input_type_stack
                .push(self.schema.concrete_type_by_name(t.innermost_name())),
            None => self.input_type_stack.push(None),
        }
        self.input_type_literal_stack.push(t);
    }

    pub(crate) fn pop_input_type(&mut self) {
        self.input_type_literal_stack.pop();
        self.input_type_stack.pop();
    }

    pub(crate) fn push_field(&mut self, f: Option<&'a FieldMeta>) {
        self.field_stack.push(f);
    }

    pub(crate) fn pop_field(&mut self) {
        self.field_stack.pop();
    }

    pub(crate) fn push_directive(&mut self, d: Option<&'a DirectiveType>) {
        self.directive_stack.push(d);
    }

    pub(crate) fn pop_directive(&mut self) {
        self.directive_stack.pop();
    }

    /// The type of the field or fragment currently entered, if known.
    pub fn current_type(&self) -> Option<&'a MetaType> {
        *self.type_stack.last().unwrap_or(&None)
    }

    /// The type literal of the field or fragment currently entered.
    pub fn current_type_literal(&self) -> Option<&Type> {
        match self.type_literal_stack.last() {
            Some(Some(t)) => Some(t),
            _ => None,
        }
    }

    /// The composite type the current selection set is read from.
    pub fn parent_type(&self) -> Option<&'a MetaType> {
        *self.parent_type_stack.last().unwrap_or(&None)
    }

    /// The named type behind the current input position.
    pub fn current_input_type(&self) -> Option<&'a MetaType> {
        *self.input_type_stack.last().unwrap_or(&None)
    }

    /// The type literal of the current input position.
    pub fn current_input_type_literal(&self) -> Option<&Type> {
        match self.input_type_literal_stack.last() {
            Some(Some(t)) => Some(t),
            _ => None,
        }
    }

    /// The definition of the field currently entered, if it resolved.
    pub fn current_field(&self) -> Option<&'a FieldMeta> {
        *self.field_stack.last().unwrap_or(&None)
    }

    /// The directive currently entered, if any and known.
    pub fn current_directive(&self) -> Option<&'a DirectiveType> {
        *self.directive_stack.last().unwrap_or(&None)
    }

    /// Whether the walk is inside a directive's argument list.
    pub fn in_directive(&self) -> bool {
        !self.directive_stack.is_empty()
    }

    /// Whether the document defines a fragment with this name.
    pub fn is_known_fragment(&self, name: &str) -> bool {
        self.fragment_names.contains(name)
    }
}
