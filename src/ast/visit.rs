//! Generic traversal over request documents.
//!
//! [`visit`] drives enter/leave callbacks depth-first over a borrowed
//! [`Node`] view of the tree; the callback controls descent per node
//! ([`Control::Continue`], [`Control::Skip`]) or aborts the whole walk
//! ([`Control::Break`]). The schema-aware validation walk is layered on top
//! of this, so each composed rule set traverses the document once.
//!
//! [`transform`] is the editing counterpart: it consumes a [`Document`] and
//! rebuilds it, applying per-node edits on the way out. The input tree is
//! moved, never mutated in place.

use crate::{
    ast::{
        Arguments, Definition, Directive, Document, Field, Fragment, FragmentSpread,
        InlineFragment, InputValue, Operation, Selection, Type, TypeSystemDefinition,
        VariableDefinition,
    },
    parser::Spanning,
};

/// A borrowed view of any node the traversal can stop at.
#[derive(Clone, Copy, Debug)]
pub enum Node<'a> {
    Document(&'a Document),
    Operation(&'a Spanning<Operation>),
    Fragment(&'a Spanning<Fragment>),
    TypeSystem(&'a Spanning<TypeSystemDefinition>),
    VariableDefinition(&'a VariableDefinition),
    SelectionSet(&'a [Selection]),
    Field(&'a Spanning<Field>),
    FragmentSpread(&'a Spanning<FragmentSpread>),
    InlineFragment(&'a Spanning<InlineFragment>),
    Directive(&'a Spanning<Directive>),
    Argument(&'a (Spanning<String>, Spanning<InputValue>)),
    InputValue(&'a Spanning<InputValue>),
    ObjectField(&'a (Spanning<String>, Spanning<InputValue>)),
    Type(&'a Spanning<Type>),
}

/// One step on the path from the document root to the current node: either a
/// struct field name or an index into a list of children.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathSegment {
    Key(&'static str),
    Index(usize),
}

/// Traversal control returned from [`DocumentVisitor::enter`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Control {
    /// Descend into the node's children.
    Continue,
    /// Don't visit this node's children (nor its leave callback).
    Skip,
    /// Abort the traversal entirely.
    Break,
}

/// Enter/leave callbacks for [`visit`].
///
/// The lifetime ties borrowed node views handed to the callbacks to the
/// visited document, so a visitor may retain references into the tree.
pub trait DocumentVisitor<'a> {
    fn enter(&mut self, node: Node<'a>, path: &[PathSegment], ancestors: &[Node<'a>]) -> Control {
        let _ = (node, path, ancestors);
        Control::Continue
    }

    fn leave(&mut self, node: Node<'a>, path: &[PathSegment], ancestors: &[Node<'a>]) -> Control {
        let _ = (node, path, ancestors);
        Control::Continue
    }
}

/// Walks `document` depth-first, invoking `visitor` on every node.
pub fn visit<'a, V: DocumentVisitor<'a>>(document: &'a Document, visitor: &mut V) {
    let mut walk = Walk {
        visitor,
        path: Vec::new(),
        ancestors: Vec::new(),
        broken: false,
    };
    walk.document(document);
}

struct Walk<'a, 'v, V> {
    visitor: &'v mut V,
    path: Vec<PathSegment>,
    ancestors: Vec<Node<'a>>,
    broken: bool,
}

impl<'a, V: DocumentVisitor<'a>> Walk<'a, '_, V> {
    fn node(&mut self, node: Node<'a>, children: impl FnOnce(&mut Self)) {
        if self.broken {
            return;
        }

        match self.visitor.enter(node, &self.path, &self.ancestors) {
            Control::Break => {
                self.broken = true;
                return;
            }
            Control::Skip => return,
            Control::Continue => {}
        }

        self.ancestors.push(node);
        children(self);
        self.ancestors.pop();

        if self.broken {
            return;
        }

        if self.visitor.leave(node, &self.path, &self.ancestors) == Control::Break {
            self.broken = true;
        }
    }

    fn keyed(&mut self, key: &'static str, f: impl FnOnce(&mut Self)) {
        self.path.push(PathSegment::Key(key));
        f(self);
        self.path.pop();
    }

    fn indexed(&mut self, index: usize, f: impl FnOnce(&mut Self)) {
        self.path.push(PathSegment::Index(index));
        f(self);
        self.path.pop();
    }

    fn document(&mut self, doc: &'a Document) {
        self.node(Node::Document(doc), |w| {
            w.keyed("definitions", |w| {
                for (i, def) in doc.definitions.iter().enumerate() {
                    w.indexed(i, |w| w.definition(def));
                }
            });
        });
    }

    fn definition(&mut self, def: &'a Definition) {
        match def {
            Definition::Operation(op) => self.operation(op),
            Definition::Fragment(f) => self.fragment(f),
            Definition::TypeSystem(d) => {
                // Type-system definitions are leaves to this walk; rules that
                // care about them inspect the node directly.
                self.node(Node::TypeSystem(d), |_| {});
            }
        }
    }

    fn operation(&mut self, op: &'a Spanning<Operation>) {
        self.node(Node::Operation(op), |w| {
            if let Some(defs) = &op.item.variable_definitions {
                w.keyed("variableDefinitions", |w| {
                    for (i, def) in defs.item.iter().enumerate() {
                        w.indexed(i, |w| w.variable_definition(def));
                    }
                });
            }
            w.directives(&op.item.directives);
            w.keyed("selectionSet", |w| {
                w.selection_set(&op.item.selection_set);
            });
        });
    }

    fn fragment(&mut self, fragment: &'a Spanning<Fragment>) {
        self.node(Node::Fragment(fragment), |w| {
            w.directives(&fragment.item.directives);
            w.keyed("selectionSet", |w| {
                w.selection_set(&fragment.item.selection_set);
            });
        });
    }

    fn variable_definition(&mut self, def: &'a VariableDefinition) {
        self.node(Node::VariableDefinition(def), |w| {
            w.keyed("type", |w| {
                w.node(Node::Type(&def.var_type), |_| {});
            });
            if let Some(default) = &def.default_value {
                w.keyed("defaultValue", |w| w.input_value(default));
            }
            w.directives(&def.directives);
        });
    }

    fn directives(&mut self, directives: &'a Option<Vec<Spanning<Directive>>>) {
        if let Some(directives) = directives {
            self.keyed("directives", |w| {
                for (i, directive) in directives.iter().enumerate() {
                    w.indexed(i, |w| w.directive(directive));
                }
            });
        }
    }

    fn directive(&mut self, directive: &'a Spanning<Directive>) {
        self.node(Node::Directive(directive), |w| {
            w.arguments(&directive.item.arguments);
        });
    }

    fn arguments(&mut self, arguments: &'a Option<Spanning<Arguments>>) {
        if let Some(arguments) = arguments {
            self.keyed("arguments", |w| {
                for (i, argument) in arguments.item.iter().enumerate() {
                    w.indexed(i, |w| {
                        w.node(Node::Argument(argument), |w| {
                            w.keyed("value", |w| w.input_value(&argument.1));
                        });
                    });
                }
            });
        }
    }

    fn selection_set(&mut self, selection_set: &'a [Selection]) {
        self.node(Node::SelectionSet(selection_set), |w| {
            for (i, selection) in selection_set.iter().enumerate() {
                w.indexed(i, |w| w.selection(selection));
            }
        });
    }

    fn selection(&mut self, selection: &'a Selection) {
        match selection {
            Selection::Field(f) => self.field(f),
            Selection::FragmentSpread(s) => self.fragment_spread(s),
            Selection::InlineFragment(f) => self.inline_fragment(f),
        }
    }

    fn field(&mut self, field: &'a Spanning<Field>) {
        self.node(Node::Field(field), |w| {
            w.arguments(&field.item.arguments);
            w.directives(&field.item.directives);
            if let Some(selection_set) = &field.item.selection_set {
                w.keyed("selectionSet", |w| w.selection_set(selection_set));
            }
        });
    }

    fn fragment_spread(&mut self, spread: &'a Spanning<FragmentSpread>) {
        self.node(Node::FragmentSpread(spread), |w| {
            w.directives(&spread.item.directives);
        });
    }

    fn inline_fragment(&mut self, fragment: &'a Spanning<InlineFragment>) {
        self.node(Node::InlineFragment(fragment), |w| {
            w.directives(&fragment.item.directives);
            w.keyed("selectionSet", |w| {
                w.selection_set(&fragment.item.selection_set);
            });
        });
    }

    fn input_value(&mut self, value: &'a Spanning<InputValue>) {
        self.node(Node::InputValue(value), |w| {
            match &value.item {
                InputValue::List(items) => {
                    for (i, item) in items.iter().enumerate() {
                        w.indexed(i, |w| w.input_value(item));
                    }
                }
                InputValue::Object(fields) => {
                    for (i, field) in fields.iter().enumerate() {
                        w.indexed(i, |w| {
                            w.node(Node::ObjectField(field), |w| {
                                w.keyed("value", |w| w.input_value(&field.1));
                            });
                        });
                    }
                }
                _ => {}
            };
        });
    }
}

/// The outcome of a [`DocumentTransformer`] hook for one node.
pub enum Edit<T> {
    /// Keep the node as handed in (children already rebuilt).
    Keep(T),
    /// Put a different node in this slot.
    Replace(T),
    /// Delete this node. Only honoured in list positions and optional slots;
    /// a removed mandatory child keeps its rebuilt value.
    Remove,
}

impl<T> Edit<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Edit::Keep(v) | Edit::Replace(v) => Some(v),
            Edit::Remove => None,
        }
    }
}

/// Rewriting hooks for [`transform`]. Each hook receives the node with its
/// children already transformed and decides what lands in the parent's slot.
pub trait DocumentTransformer {
    fn transform_definition(&mut self, def: Definition) -> Edit<Definition> {
        Edit::Keep(def)
    }

    fn transform_selection(&mut self, selection: Selection) -> Edit<Selection> {
        Edit::Keep(selection)
    }

    fn transform_field(&mut self, field: Spanning<Field>) -> Edit<Spanning<Field>> {
        Edit::Keep(field)
    }

    fn transform_directive(&mut self, directive: Spanning<Directive>) -> Edit<Spanning<Directive>> {
        Edit::Keep(directive)
    }

    fn transform_argument(
        &mut self,
        argument: (Spanning<String>, Spanning<InputValue>),
    ) -> Edit<(Spanning<String>, Spanning<InputValue>)> {
        Edit::Keep(argument)
    }

    fn transform_input_value(&mut self, value: Spanning<InputValue>) -> Edit<Spanning<InputValue>> {
        Edit::Keep(value)
    }

    fn transform_variable_definition(
        &mut self,
        def: VariableDefinition,
    ) -> Edit<VariableDefinition> {
        Edit::Keep(def)
    }
}

/// Rebuilds `document` by running every node through `transformer`,
/// innermost nodes first.
pub fn transform<T: DocumentTransformer>(document: Document, transformer: &mut T) -> Document {
    Document {
        definitions: document
            .definitions
            .into_iter()
            .filter_map(|def| {
                let def = match def {
                    Definition::Operation(op) => Definition::Operation(op.map(|op| {
                        let Operation {
                            operation_type,
                            name,
                            variable_definitions,
                            directives,
                            selection_set,
                        } = op;
                        Operation {
                            operation_type,
                            name,
                            variable_definitions: variable_definitions.map(|defs| {
                                defs.map(|defs| crate::ast::VariableDefinitions {
                                    items: defs
                                        .items
                                        .into_iter()
                                        .filter_map(|d| {
                                            transform_variable_definition(d, transformer)
                                                .into_option()
                                        })
                                        .collect(),
                                })
                            }),
                            directives: transform_directives(directives, transformer),
                            selection_set: transform_selection_set(selection_set, transformer),
                        }
                    })),
                    Definition::Fragment(f) => Definition::Fragment(f.map(|f| {
                        let Fragment {
                            name,
                            type_condition,
                            directives,
                            selection_set,
                        } = f;
                        Fragment {
                            name,
                            type_condition,
                            directives: transform_directives(directives, transformer),
                            selection_set: transform_selection_set(selection_set, transformer),
                        }
                    })),
                    def @ Definition::TypeSystem(_) => def,
                };
                transformer.transform_definition(def).into_option()
            })
            .collect(),
    }
}

fn transform_variable_definition<T: DocumentTransformer>(
    def: VariableDefinition,
    transformer: &mut T,
) -> Edit<VariableDefinition> {
    let VariableDefinition {
        name,
        var_type,
        default_value,
        directives,
    } = def;
    let def = VariableDefinition {
        name,
        var_type,
        default_value: default_value
            .and_then(|v| transform_input_value(v, transformer).into_option()),
        directives: transform_directives(directives, transformer),
    };
    transformer.transform_variable_definition(def)
}

fn transform_selection_set<T: DocumentTransformer>(
    selection_set: Vec<Selection>,
    transformer: &mut T,
) -> Vec<Selection> {
    selection_set
        .into_iter()
        .filter_map(|selection| {
            let selection = match selection {
                Selection::Field(f) => {
                    let f = f.map(|f| {
                        let Field {
                            alias,
                            name,
                            arguments,
                            directives,
                            selection_set,
                        } = f;
                        Field {
                            alias,
                            name,
                            arguments: transform_arguments(arguments, transformer),
                            directives: transform_directives(directives, transformer),
                            selection_set: selection_set
                                .map(|s| transform_selection_set(s, transformer)),
                        }
                    });
                    match transformer.transform_field(f) {
                        Edit::Keep(f) | Edit::Replace(f) => Selection::Field(f),
                        Edit::Remove => return None,
                    }
                }
                Selection::FragmentSpread(s) => Selection::FragmentSpread(s.map(|s| {
                    let FragmentSpread { name, directives } = s;
                    FragmentSpread {
                        name,
                        directives: transform_directives(directives, transformer),
                    }
                })),
                Selection::InlineFragment(f) => Selection::InlineFragment(f.map(|f| {
                    let InlineFragment {
                        type_condition,
                        directives,
                        selection_set,
                    } = f;
                    InlineFragment {
                        type_condition,
                        directives: transform_directives(directives, transformer),
                        selection_set: transform_selection_set(selection_set, transformer),
                    }
                })),
            };
            transformer.transform_selection(selection).into_option()
        })
        .collect()
}

fn transform_directives<T: DocumentTransformer>(
    directives: Option<Vec<Spanning<Directive>>>,
    transformer: &mut T,
) -> Option<Vec<Spanning<Directive>>> {
    directives.map(|directives| {
        directives
            .into_iter()
            .filter_map(|d| {
                let d = d.map(|d| {
                    let Directive { name, arguments } = d;
                    Directive {
                        name,
                        arguments: transform_arguments(arguments, transformer),
                    }
                });
                transformer.transform_directive(d).into_option()
            })
            .collect()
    })
}

fn transform_arguments<T: DocumentTransformer>(
    arguments: Option<Spanning<Arguments>>,
    transformer: &mut T,
) -> Option<Spanning<Arguments>> {
    arguments.map(|arguments| {
        arguments.map(|arguments| Arguments {
            items: arguments
                .items
                .into_iter()
                .filter_map(|(name, value)| {
                    let value = transform_input_value(value, transformer).into_option()?;
                    transformer.transform_argument((name, value)).into_option()
                })
                .collect(),
        })
    })
}

fn transform_input_value<T: DocumentTransformer>(
    value: Spanning<InputValue>,
    transformer: &mut T,
) -> Edit<Spanning<InputValue>> {
    let value = value.map(|value| match value {
        InputValue::List(items) => InputValue::List(
            items
                .into_iter()
                .filter_map(|item| transform_input_value(item, transformer).into_option())
                .collect(),
        ),
        InputValue::Object(fields) => InputValue::Object(
            fields
                .into_iter()
                .filter_map(|(k, v)| {
                    transform_input_value(v, transformer)
                        .into_option()
                        .map(|v| (k, v))
                })
                .collect(),
        ),
        v => v,
    });
    transformer.transform_input_value(value)
}

#[cfg(test)]
mod tests {
    use super::{
        visit, transform, Control, DocumentTransformer, DocumentVisitor, Edit, Node, PathSegment,
    };
    use crate::{
        ast::{Field, Selection},
        parser::{parse, Spanning},
    };

    struct Collector {
        fields: Vec<String>,
        skip_inside: Option<&'static str>,
        break_at: Option<&'static str>,
    }

    impl Collector {
        fn new() -> Self {
            Self {
                fields: Vec::new(),
                skip_inside: None,
                break_at: None,
            }
        }
    }

    impl<'a> DocumentVisitor<'a> for Collector {
        fn enter(&mut self, node: Node<'a>, _: &[PathSegment], _: &[Node<'a>]) -> Control {
            if let Node::Field(f) = node {
                self.fields.push(f.item.name.item.clone());
                if Some(f.item.name.item.as_str()) == self.break_at {
                    return Control::Break;
                }
                if Some(f.item.name.item.as_str()) == self.skip_inside {
                    return Control::Skip;
                }
            }
            Control::Continue
        }
    }

    #[test]
    fn visits_fields_in_document_order() {
        let doc = parse("{ a b { c d } e }").unwrap();
        let mut collector = Collector::new();
        visit(&doc, &mut collector);
        assert_eq!(collector.fields, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn skip_prunes_a_subtree() {
        let doc = parse("{ a b { c d } e }").unwrap();
        let mut collector = Collector::new();
        collector.skip_inside = Some("b");
        visit(&doc, &mut collector);
        assert_eq!(collector.fields, ["a", "b", "e"]);
    }

    #[test]
    fn break_aborts_the_walk() {
        let doc = parse("{ a b { c d } e }").unwrap();
        let mut collector = Collector::new();
        collector.break_at = Some("c");
        visit(&doc, &mut collector);
        assert_eq!(collector.fields, ["a", "b", "c"]);
    }

    #[test]
    fn ancestors_and_path_reflect_position() {
        struct PathCheck {
            deepest: usize,
        }

        impl<'a> DocumentVisitor<'a> for PathCheck {
            fn enter(
                &mut self,
                node: Node<'a>,
                path: &[PathSegment],
                ancestors: &[Node<'a>],
            ) -> Control {
                if let Node::Field(_) = node {
                    assert!(matches!(path.last(), Some(PathSegment::Index(_))));
                    assert!(matches!(ancestors.last(), Some(Node::SelectionSet(_))));
                    self.deepest = self.deepest.max(ancestors.len());
                }
                Control::Continue
            }
        }

        let doc = parse("{ a { b { c } } }").unwrap();
        let mut check = PathCheck { deepest: 0 };
        visit(&doc, &mut check);
        // document → selection set → field, three levels deep for `c`.
        assert!(check.deepest >= 7);
    }

    struct DropField(&'static str);

    impl DocumentTransformer for DropField {
        fn transform_field(&mut self, field: Spanning<Field>) -> Edit<Spanning<Field>> {
            if field.item.name.item == self.0 {
                Edit::Remove
            } else {
                Edit::Keep(field)
            }
        }
    }

    #[test]
    fn transform_removes_and_keeps_nodes() {
        let doc = parse("{ a secret b { secret c } }").unwrap();
        let rewritten = transform(doc, &mut DropField("secret"));

        let mut collector = Collector::new();
        visit(&rewritten, &mut collector);
        assert_eq!(collector.fields, ["a", "b", "c"]);
    }

    struct AliasEverything;

    impl DocumentTransformer for AliasEverything {
        fn transform_field(&mut self, field: Spanning<Field>) -> Edit<Spanning<Field>> {
            let alias = field.item.name.clone().map(|n| format!("{n}_aliased"));
            Edit::Replace(field.map(|f| Field {
                alias: Some(alias),
                ..f
            }))
        }
    }

    #[test]
    fn transform_replaces_nodes_bottom_up() {
        let doc = parse("{ a }").unwrap();
        let rewritten = transform(doc, &mut AliasEverything);

        let op = rewritten.operations().next().unwrap();
        match &op.item.selection_set[0] {
            Selection::Field(f) => {
                assert_eq!(f.item.alias.as_ref().unwrap().item, "a_aliased");
            }
            _ => unreachable!(),
        }
    }
}
