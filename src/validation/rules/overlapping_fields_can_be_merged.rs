use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::{
    ast::{Arguments, Document, Field, Fragment, Selection, Type},
    parser::{SourcePosition, Spanning},
    schema::meta::{Field as FieldMeta, MetaType},
    validation::{ValidatorContext, Visitor},
};

pub fn factory<'a>() -> OverlappingFieldsCanBeMerged<'a> {
    OverlappingFieldsCanBeMerged {
        fragments: HashMap::new(),
        reported: HashSet::new(),
    }
}

pub struct OverlappingFieldsCanBeMerged<'a> {
    fragments: HashMap<&'a str, &'a Spanning<Fragment>>,
    reported: HashSet<(String, SourcePosition)>,
}

/// One field occurrence: where it was selected from, the AST node, its
/// definition if known, and the fragment spread it arrived through (if any).
struct FieldEntry<'a> {
    parent_type: Option<&'a MetaType>,
    node: &'a Spanning<Field>,
    definition: Option<&'a FieldMeta>,
    origin: Option<&'a str>,
}

type FieldMap<'a> = IndexMap<&'a str, Vec<FieldEntry<'a>>>;

struct Conflict {
    key: String,
    reason: String,
    positions: Vec<SourcePosition>,
}

impl<'a> Visitor<'a> for OverlappingFieldsCanBeMerged<'a> {
    fn enter_document(&mut self, _: &mut ValidatorContext<'a>, doc: &'a Document) {
        self.fragments = doc
            .fragments()
            .map(|f| (f.item.name.item.as_str(), f))
            .collect();
    }

    fn enter_selection_set(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        selection_set: &'a [Selection],
    ) {
        let parent_type = ctx.parent_type();

        let mut map = FieldMap::new();
        self.collect_fields(
            ctx,
            parent_type,
            selection_set,
            None,
            &mut HashSet::new(),
            &mut map,
        );

        let mut conflicts = Vec::new();
        find_conflicts_in_map(ctx, &map, false, &mut conflicts);

        for conflict in conflicts {
            let message = error_message(&conflict.key, &conflict.reason);
            let dedup_key = (
                message.clone(),
                conflict
                    .positions
                    .first()
                    .copied()
                    .unwrap_or_else(SourcePosition::new_origin),
            );
            if self.reported.insert(dedup_key) {
                ctx.report_error(&message, &conflict.positions);
            }
        }
    }
}

impl<'a> OverlappingFieldsCanBeMerged<'a> {
    fn collect_fields(
        &self,
        ctx: &ValidatorContext<'a>,
        parent_type: Option<&'a MetaType>,
        selection_set: &'a [Selection],
        origin: Option<&'a str>,
        visited_fragments: &mut HashSet<&'a str>,
        map: &mut FieldMap<'a>,
    ) {
        for selection in selection_set {
            match selection {
                Selection::Field(field) => {
                    let definition = parent_type
                        .and_then(|t| ctx.schema.lookup_field(t, &field.item.name.item));
                    map.entry(field.item.response_key())
                        .or_default()
                        .push(FieldEntry {
                            parent_type,
                            node: field,
                            definition,
                            origin,
                        });
                }
                Selection::InlineFragment(inline) => {
                    let fragment_type = inline
                        .item
                        .type_condition
                        .as_ref()
                        .and_then(|cond| ctx.schema.concrete_type_by_name(&cond.item))
                        .or(parent_type);
                    self.collect_fields(
                        ctx,
                        fragment_type,
                        &inline.item.selection_set,
                        origin,
                        visited_fragments,
                        map,
                    );
                }
                Selection::FragmentSpread(spread) => {
                    let name = spread.item.name.item.as_str();
                    if !visited_fragments.insert(name) {
                        continue;
                    }
                    if let Some(&fragment) = self.fragments.get(name) {
                        let fragment_type = ctx
                            .schema
                            .concrete_type_by_name(&fragment.item.type_condition.item);
                        self.collect_fields(
                            ctx,
                            fragment_type,
                            &fragment.item.selection_set,
                            origin.or(Some(name)),
                            visited_fragments,
                            map,
                        );
                    }
                }
            }
        }
    }
}

fn find_conflicts_in_map(
    ctx: &ValidatorContext<'_>,
    map: &FieldMap<'_>,
    parents_mutually_exclusive: bool,
    conflicts: &mut Vec<Conflict>,
) {
    for (response_key, entries) in map {
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                let a = &entries[i];
                let b = &entries[j];

                // Conflicts wholly inside one fragment are reported when that
                // fragment's own selection set is visited.
                if a.origin.is_some() && a.origin == b.origin {
                    continue;
                }

                if let Some(reason) =
                    find_conflict(ctx, a, b, parents_mutually_exclusive)
                {
                    conflicts.push(Conflict {
                        key: (*response_key).to_owned(),
                        reason,
                        positions: vec![a.node.span.start, b.node.span.start],
                    });
                }
            }
        }
    }
}

fn find_conflict(
    ctx: &ValidatorContext<'_>,
    a: &FieldEntry<'_>,
    b: &FieldEntry<'_>,
    parents_mutually_exclusive: bool,
) -> Option<String> {
    // Fields on two different concrete object types can never both apply to
    // the same runtime value, so diverging names or arguments are fine.
    let mutually_exclusive = parents_mutually_exclusive
        || match (a.parent_type, b.parent_type) {
            (Some(ta), Some(tb)) => {
                !std::ptr::eq(ta, tb)
                    && matches!(ta, MetaType::Object(_))
                    && matches!(tb, MetaType::Object(_))
            }
            _ => false,
        };

    if !mutually_exclusive {
        let name_a = &a.node.item.name.item;
        let name_b = &b.node.item.name.item;
        if name_a != name_b {
            return Some(format!("\"{name_a}\" and \"{name_b}\" are different fields"));
        }

        if !same_arguments(&a.node.item.arguments, &b.node.item.arguments) {
            return Some("they have differing arguments".into());
        }
    }

    if let (Some(da), Some(db)) = (a.definition, b.definition) {
        if types_conflict(ctx, &da.field_type, &db.field_type) {
            return Some(format!(
                "they return conflicting types \"{}\" and \"{}\"",
                da.field_type, db.field_type,
            ));
        }
    }

    // Merge and compare the sub-selections.
    let (Some(sa), Some(sb)) = (
        a.node.item.selection_set.as_deref(),
        b.node.item.selection_set.as_deref(),
    ) else {
        return None;
    };

    let type_of = |entry: &FieldEntry<'_>| {
        entry
            .definition
            .and_then(|d| ctx.schema.concrete_type_by_name(d.field_type.innermost_name()))
    };

    let mut merged = FieldMap::new();
    // Sub-entries keep no origin: both sides already passed the same-origin
    // filter above.
    collect_plain(ctx, type_of(a), sa, &mut merged);
    collect_plain(ctx, type_of(b), sb, &mut merged);

    let mut sub_conflicts = Vec::new();
    find_conflicts_in_map(ctx, &merged, mutually_exclusive, &mut sub_conflicts);

    sub_conflicts
        .into_iter()
        .next()
        .map(|c| format!("subfields \"{}\" conflict because {}", c.key, c.reason))
}

/// Collects without fragment expansion; fragment-borne subfield conflicts
/// surface when the fragment's own selection sets are visited.
fn collect_plain<'a>(
    ctx: &ValidatorContext<'a>,
    parent_type: Option<&'a MetaType>,
    selection_set: &'a [Selection],
    map: &mut FieldMap<'a>,
) {
    for selection in selection_set {
        match selection {
            Selection::Field(field) => {
                let definition =
                    parent_type.and_then(|t| ctx.schema.lookup_field(t, &field.item.name.item));
                map.entry(field.item.response_key())
                    .or_default()
                    .push(FieldEntry {
                        parent_type,
                        node: field,
                        definition,
                        origin: None,
                    });
            }
            Selection::InlineFragment(inline) => {
                let fragment_type = inline
                    .item
                    .type_condition
                    .as_ref()
                    .and_then(|cond| ctx.schema.concrete_type_by_name(&cond.item))
                    .or(parent_type);
                collect_plain(ctx, fragment_type, &inline.item.selection_set, map);
            }
            Selection::FragmentSpread(_) => {}
        }
    }
}

fn same_arguments(a: &Option<Spanning<Arguments>>, b: &Option<Spanning<Arguments>>) -> bool {
    let empty = Vec::new();
    let items_a = a.as_ref().map(|a| &a.item.items).unwrap_or(&empty);
    let items_b = b.as_ref().map(|b| &b.item.items).unwrap_or(&empty);

    if items_a.len() != items_b.len() {
        return false;
    }

    items_a.iter().all(|(name_a, value_a)| {
        items_b
            .iter()
            .find(|(name_b, _)| name_a.item == name_b.item)
            .is_some_and(|(_, value_b)| value_a.item.unlocated_eq(&value_b.item))
    })
}

/// Whether two return types can never produce the same response shape.
fn types_conflict(ctx: &ValidatorContext<'_>, t1: &Type, t2: &Type) -> bool {
    match (t1, t2) {
        (Type::List(i1), Type::List(i2)) | (Type::NonNullList(i1), Type::NonNullList(i2)) => {
            types_conflict(ctx, i1, i2)
        }
        (Type::Named(n1), Type::Named(n2)) | (Type::NonNullNamed(n1), Type::NonNullNamed(n2)) => {
            let leaf = ctx
                .schema
                .concrete_type_by_name(n1)
                .map(MetaType::is_leaf)
                .unwrap_or(false)
                || ctx
                    .schema
                    .concrete_type_by_name(n2)
                    .map(MetaType::is_leaf)
                    .unwrap_or(false);
            leaf && n1 != n2
        }
        // Differing list or non-null wrapping never merges.
        _ => true,
    }
}

fn error_message(response_key: &str, reason: &str) -> String {
    format!(
        "Fields \"{response_key}\" conflict because {reason}. Use different aliases on the \
         fields to fetch both if this was not intentional."
    )
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::validation::test_harness::{expect_fails_rule, expect_passes_rule};

    #[test]
    fn unique_fields() {
        expect_passes_rule(
            factory,
            "fragment uniqueFields on Dog { name nickname }",
        );
    }

    #[test]
    fn identical_fields_and_args_merge() {
        expect_passes_rule(
            factory,
            "fragment mergeIdenticalFields on Dog { doesKnowCommand(dogCommand: SIT) doesKnowCommand(dogCommand: SIT) }",
        );
    }

    #[test]
    fn different_args_with_different_aliases_merge() {
        expect_passes_rule(
            factory,
            "fragment differentArgsWithDifferentAliases on Dog { knowsSit: doesKnowCommand(dogCommand: SIT) knowsDown: doesKnowCommand(dogCommand: DOWN) }",
        );
    }

    #[test]
    fn same_aliases_on_different_fields_fail() {
        expect_fails_rule(
            factory,
            "fragment sameAliasesWithDifferentFieldTargets on Dog { fido: name fido: nickname }",
            &[(
                &error_message("fido", "\"name\" and \"nickname\" are different fields"),
                &[(1, 56), (1, 67)],
            )],
        );
    }

    #[test]
    fn different_args_on_same_field_fail() {
        expect_fails_rule(
            factory,
            "fragment conflictingArgs on Dog { doesKnowCommand(dogCommand: SIT) doesKnowCommand(dogCommand: HEEL) }",
            &[(
                &error_message("doesKnowCommand", "they have differing arguments"),
                &[(1, 35), (1, 68)],
            )],
        );
    }

    #[test]
    fn same_field_on_mutually_exclusive_objects_merges() {
        expect_passes_rule(
            factory,
            "fragment safeDifferingFields on Pet { ... on Dog { volume: barkVolume } ... on Cat { volume: meowVolume } }",
        );
    }

    #[test]
    fn conflicting_return_types_through_interface_fail() {
        expect_fails_rule(
            factory,
            "fragment conflict on Pet { ... on Dog { someValue: barks } ... on Cat { someValue: meowVolume } }",
            &[(
                &error_message(
                    "someValue",
                    "they return conflicting types \"Boolean\" and \"Int\"",
                ),
                &[(1, 41), (1, 73)],
            )],
        );
    }

    #[test]
    fn deep_conflict_in_subfields_fails() {
        expect_fails_rule(
            factory,
            "{ human { relatives { x: name } relatives { x: iq } } }",
            &[(
                &error_message(
                    "relatives",
                    "subfields \"x\" conflict because \"name\" and \"iq\" are different fields",
                ),
                &[(1, 11), (1, 33)],
            )],
        );
    }
}
