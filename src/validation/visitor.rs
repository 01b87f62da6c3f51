//! The schema-aware validation walk.
//!
//! Layered on the generic [`ast::visit`](crate::ast::visit) traversal: each
//! node entered pushes the type information the rules observe through the
//! [`ValidatorContext`], and pops it again on the way out, so one pass over
//! the document serves an arbitrary composition of rules.

use crate::{
    ast::{
        visit::{self, Control, DocumentVisitor, Node, PathSegment},
        Document, InputValue, OperationType, Type,
    },
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

/// Walks `document`, driving `visitor` with type info maintained in `ctx`.
pub fn visit<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    document: &'a Document,
) {
    let mut walk = RuleWalk { visitor: v, ctx };
    visit::visit(document, &mut walk);
}

struct RuleWalk<'a, 'w, V> {
    visitor: &'w mut V,
    ctx: &'w mut ValidatorContext<'a>,
}

impl<'a, V: Visitor<'a>> RuleWalk<'a, '_, V> {
    fn root_type_literal(&self, operation_type: OperationType) -> Option<Type> {
        let meta = match operation_type {
            OperationType::Query => Some(self.ctx.schema.query_type()),
            OperationType::Mutation => self.ctx.schema.mutation_type(),
            OperationType::Subscription => self.ctx.schema.subscription_type(),
        };
        meta.map(|m| Type::NonNullNamed(m.name().clone()))
    }
}

impl<'a, V: Visitor<'a>> DocumentVisitor<'a> for RuleWalk<'a, '_, V> {
    fn enter(&mut self, node: Node<'a>, _: &[PathSegment], _: &[Node<'a>]) -> Control {
        match node {
            Node::Document(doc) => self.visitor.enter_document(self.ctx, doc),

            Node::Operation(op) => {
                let t = self.root_type_literal(op.item.operation_type);
                self.ctx.push_type(t);
                self.visitor.enter_operation_definition(self.ctx, op);
            }

            Node::Fragment(fragment) => {
                self.ctx.push_type(Some(Type::NonNullNamed(
                    fragment.item.type_condition.item.as_str().into(),
                )));
                self.visitor.enter_fragment_definition(self.ctx, fragment);
            }

            Node::TypeSystem(def) => {
                self.visitor.enter_type_system_definition(self.ctx, def);
            }

            Node::VariableDefinition(def) => {
                self.ctx.push_input_type(Some(def.var_type.item.clone()));
                self.visitor.enter_variable_definition(self.ctx, def);
            }

            Node::SelectionSet(selection_set) => {
                self.ctx.push_parent_type();
                self.visitor.enter_selection_set(self.ctx, selection_set);
            }

            Node::Field(field) => {
                let meta_field = self.ctx.parent_type().and_then(|t| {
                    self.ctx.schema.lookup_field(t, &field.item.name.item)
                });
                self.ctx.push_type(meta_field.map(|f| f.field_type.clone()));
                self.ctx.push_field(meta_field);
                self.visitor.enter_field(self.ctx, field);
            }

            Node::FragmentSpread(spread) => {
                self.visitor.enter_fragment_spread(self.ctx, spread);
            }

            Node::InlineFragment(fragment) => {
                if let Some(cond) = &fragment.item.type_condition {
                    self.ctx
                        .push_type(Some(Type::NonNullNamed(cond.item.as_str().into())));
                }
                self.visitor.enter_inline_fragment(self.ctx, fragment);
            }

            Node::Directive(directive) => {
                let meta = self.ctx.schema.directive_by_name(&directive.item.name.item);
                self.ctx.push_directive(meta);
                self.visitor.enter_directive(self.ctx, directive);
            }

            Node::Argument(argument) => {
                let arg_type = if self.ctx.in_directive() {
                    self.ctx.current_directive().and_then(|d| {
                        d.arguments
                            .iter()
                            .find(|a| a.name == argument.0.item)
                            .map(|a| a.arg_type.clone())
                    })
                } else {
                    self.ctx.current_field().and_then(|f| {
                        f.arguments
                            .iter()
                            .find(|a| a.name == argument.0.item)
                            .map(|a| a.arg_type.clone())
                    })
                };
                self.ctx.push_input_type(arg_type);
                self.visitor.enter_argument(self.ctx, argument);
            }

            Node::ObjectField(field) => {
                let field_type = self
                    .ctx
                    .current_input_type()
                    .and_then(|t| t.input_field_by_name(&field.0.item))
                    .map(|f| f.arg_type.clone());
                self.ctx.push_input_type(field_type);
                self.visitor.enter_object_field(self.ctx, field);
            }

            Node::InputValue(value) => {
                enter_input_value(self.visitor, self.ctx, value);
                if let InputValue::List(_) = &value.item {
                    // Elements are validated against the list's item type.
                    let inner = self
                        .ctx
                        .current_input_type_literal()
                        .and_then(|t| t.list_inner().cloned());
                    self.ctx.push_input_type(inner);
                }
            }

            Node::Type(_) => {}
        }

        Control::Continue
    }

    fn leave(&mut self, node: Node<'a>, _: &[PathSegment], _: &[Node<'a>]) -> Control {
        match node {
            Node::Document(doc) => self.visitor.exit_document(self.ctx, doc),

            Node::Operation(op) => {
                self.visitor.exit_operation_definition(self.ctx, op);
                self.ctx.pop_type();
            }

            Node::Fragment(fragment) => {
                self.visitor.exit_fragment_definition(self.ctx, fragment);
                self.ctx.pop_type();
            }

            Node::TypeSystem(def) => {
                self.visitor.exit_type_system_definition(self.ctx, def);
            }

            Node::VariableDefinition(def) => {
                self.visitor.exit_variable_definition(self.ctx, def);
                self.ctx.pop_input_type();
            }

            Node::SelectionSet(selection_set) => {
                self.visitor.exit_selection_set(self.ctx, selection_set);
                self.ctx.pop_parent_type();
            }

            Node::Field(field) => {
                self.visitor.exit_field(self.ctx, field);
                self.ctx.pop_field();
                self.ctx.pop_type();
            }

            Node::FragmentSpread(spread) => {
                self.visitor.exit_fragment_spread(self.ctx, spread);
            }

            Node::InlineFragment(fragment) => {
                self.visitor.exit_inline_fragment(self.ctx, fragment);
                if fragment.item.type_condition.is_some() {
                    self.ctx.pop_type();
                }
            }

            Node::Directive(directive) => {
                self.visitor.exit_directive(self.ctx, directive);
                self.ctx.pop_directive();
            }

            Node::Argument(argument) => {
                self.visitor.exit_argument(self.ctx, argument);
                self.ctx.pop_input_type();
            }

            Node::ObjectField(field) => {
                self.visitor.exit_object_field(self.ctx, field);
                self.ctx.pop_input_type();
            }

            Node::InputValue(value) => {
                if let InputValue::List(_) = &value.item {
                    self.ctx.pop_input_type();
                }
                exit_input_value(self.visitor, self.ctx, value);
            }

            Node::Type(_) => {}
        }

        Control::Continue
    }
}

fn enter_input_value<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    value: &'a Spanning<InputValue>,
) {
    let span = value.span;

    match &value.item {
        InputValue::Null => v.enter_null_value(ctx, Spanning::new(span, ())),
        InputValue::Int(i) => v.enter_int_value(ctx, Spanning::new(span, *i)),
        InputValue::Float(f) => v.enter_float_value(ctx, Spanning::new(span, *f)),
        InputValue::String(s) => v.enter_string_value(ctx, Spanning::new(span, s.as_str())),
        InputValue::Boolean(b) => v.enter_boolean_value(ctx, Spanning::new(span, *b)),
        InputValue::Enum(e) => v.enter_enum_value(ctx, Spanning::new(span, e.as_str())),
        InputValue::Variable(name) => {
            v.enter_variable_value(ctx, Spanning::new(span, name.as_str()))
        }
        InputValue::List(l) => v.enter_list_value(ctx, Spanning::new(span, l)),
        InputValue::Object(o) => v.enter_object_value(ctx, Spanning::new(span, o)),
    }
}

fn exit_input_value<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    value: &'a Spanning<InputValue>,
) {
    let span = value.span;

    match &value.item {
        InputValue::Null => v.exit_null_value(ctx, Spanning::new(span, ())),
        InputValue::Int(i) => v.exit_int_value(ctx, Spanning::new(span, *i)),
        InputValue::Float(f) => v.exit_float_value(ctx, Spanning::new(span, *f)),
        InputValue::String(s) => v.exit_string_value(ctx, Spanning::new(span, s.as_str())),
        InputValue::Boolean(b) => v.exit_boolean_value(ctx, Spanning::new(span, *b)),
        InputValue::Enum(e) => v.exit_enum_value(ctx, Spanning::new(span, e.as_str())),
        InputValue::Variable(name) => {
            v.exit_variable_value(ctx, Spanning::new(span, name.as_str()))
        }
        InputValue::List(l) => v.exit_list_value(ctx, Spanning::new(span, l)),
        InputValue::Object(o) => v.exit_object_value(ctx, Spanning::new(span, o)),
    }
}
