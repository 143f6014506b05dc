//! Recursive, identity-aware merging of document trees.
//!
//! The four entry points call each other:
//!
//! - [`merge_documents`] merges every top-level key of a changes mapping
//!   through [`merge_value`].
//! - [`merge_value`] dispatches on the shape of the incoming node and hands
//!   non-empty sequences to [`merge_sequences`].
//! - [`merge_sequences`] correlates elements by an identity field, using
//!   [`find_in_sequence`], and merges matched elements back through
//!   [`merge_value`].
//!
//! Merging never fails. Every combination of shapes resolves to some result.
//!
//! # Deletion
//!
//! Two conventions remove data instead of overriding it:
//!
//! - the string `"null"` as a changes value nulls the key it is merged into;
//! - a sequence element patch whose `value` field is an explicit null removes
//!   the matching element.

use crate::types::{Mapping, Node, Scalar};
use serde_json::Value;

/// String value that nulls the key it is merged into.
pub const NULL_SENTINEL: &str = "null";

/// Field of a sequence element patch that, when null, removes the matched element.
pub const ELEMENT_DELETE_FIELD: &str = "value";

/// Identity field used when the first changes element carries no override.
pub const DEFAULT_IDENTITY_FIELD: &str = "name";

/// Identity field overrides, checked in order; a later present field wins.
const IDENTITY_OVERRIDES: [&str; 2] = ["id", "key"];

/// Merge a changes mapping into a source mapping.
///
/// Keys only present in `source` are left untouched. `source` is consumed and
/// the merged mapping returned; `changes` is never modified.
pub fn merge_documents(mut source: Mapping, changes: &Mapping) -> Mapping {
    tracing::debug!(
        source_keys = source.len(),
        change_keys = changes.len(),
        "Merging document"
    );
    merge_entries(&mut source, changes);
    source
}

/// Merge each entry of `incoming` into `target` in place.
fn merge_entries(target: &mut Mapping, incoming: &Mapping) {
    for (key, value) in incoming {
        let existing = target.get_mut(key).map(std::mem::take);
        let merged = merge_value(existing, value);
        if merged.is_null() && value.as_str() == Some(NULL_SENTINEL) {
            tracing::debug!(key = %key, "Nulling key by sentinel");
        }
        // insert on an existing key keeps its position
        target.insert(key.clone(), merged);
    }
}

/// Merge one incoming value into an existing one.
///
/// `None` and `Some(Node::Null)` both mean there is nothing to merge against,
/// and the incoming value is adopted verbatim (including the `"null"` string).
/// Otherwise, by the shape of `incoming`:
///
/// - sequence: full replace when either side is empty or `existing` is not a
///   sequence, else element reconciliation via [`merge_sequences`];
/// - the string `"null"`: `Node::Null`;
/// - any other scalar: `incoming`;
/// - mapping: field-wise merge into `existing`, which is replaced by an empty
///   mapping first if it is not one;
/// - null: `Node::Null`.
pub fn merge_value(existing: Option<Node>, incoming: &Node) -> Node {
    let existing = match existing {
        None | Some(Node::Null) => return incoming.clone(),
        Some(node) => node,
    };

    match incoming {
        Node::Sequence(changes) => {
            let source = match existing {
                Node::Sequence(items) => items,
                _ => Vec::new(),
            };
            if source.is_empty() || changes.is_empty() {
                return incoming.clone();
            }
            Node::Sequence(merge_sequences(source, changes))
        }
        Node::Scalar(Scalar::String(s)) if s == NULL_SENTINEL => Node::Null,
        Node::Scalar(_) => incoming.clone(),
        Node::Mapping(changes) => {
            let mut target = match existing {
                Node::Mapping(entries) => entries,
                _ => Mapping::new(),
            };
            merge_entries(&mut target, changes);
            Node::Mapping(target)
        }
        Node::Null => Node::Null,
    }
}

/// Reconcile a sequence of mappings against a sequence of element patches.
///
/// The identity field is chosen from the first element of `changes` only (see
/// [`identity_field`]). Each change is then applied in order against the
/// current state of `source`:
///
/// - matched and carrying `value: null`: the matched element is removed;
/// - matched otherwise: the matched element is merged with the change;
/// - unmatched: the change is appended.
///
/// Earlier changes are visible to later ones: a removal shifts positions, and
/// an appended element can be matched by a later change with the same identity.
///
/// If the first change is not a mapping the sequence is replaced by `changes`.
pub fn merge_sequences(mut source: Vec<Node>, changes: &[Node]) -> Vec<Node> {
    let Some(first) = changes.first() else {
        return Vec::new();
    };
    if !first.is_mapping() {
        return changes.to_vec();
    }

    let field = identity_field(first);
    tracing::trace!(
        identity = field,
        source_len = source.len(),
        changes_len = changes.len(),
        "Reconciling sequence"
    );

    for change in changes {
        let position = identity_text(change.get(field))
            .and_then(|id| find_in_sequence(field, &id, &source).map(|(position, _)| position));

        match position {
            Some(position)
                if matches!(change.get(ELEMENT_DELETE_FIELD), Some(Node::Null)) =>
            {
                tracing::debug!(identity = field, position, "Removing sequence element");
                source.remove(position);
            }
            Some(position) => {
                let element = std::mem::take(&mut source[position]);
                source[position] = merge_value(Some(element), change);
            }
            None => source.push(change.clone()),
        }
    }

    source
}

/// Choose the identity field for a sequence from its first change.
///
/// Defaults to `name`; `id` overrides it when present, and `key` overrides
/// both. Presence counts even when the field's value is null.
pub fn identity_field(first: &Node) -> &'static str {
    IDENTITY_OVERRIDES
        .into_iter()
        .rfind(|field| first.get(field).is_some())
        .unwrap_or(DEFAULT_IDENTITY_FIELD)
}

/// Render an identity value as the text that source elements are compared to.
///
/// Returns `None` when the value is missing or null: such a change has no
/// identity and is always appended.
pub fn identity_text(value: Option<&Node>) -> Option<String> {
    match value? {
        Node::Null => None,
        Node::Scalar(Scalar::String(s)) => Some(s.clone()),
        Node::Scalar(Scalar::Number(n)) => Some(n.to_string()),
        Node::Scalar(Scalar::Bool(b)) => Some(b.to_string()),
        node @ (Node::Mapping(_) | Node::Sequence(_)) => Some(Value::from(node.clone()).to_string()),
    }
}

/// Find the first element of `source` whose `field` is the string `id`.
///
/// Only string fields can match: an element storing `7` never matches the
/// id `"7"`. Elements that are not mappings never match.
pub fn find_in_sequence<'a>(field: &str, id: &str, source: &'a [Node]) -> Option<(usize, &'a Node)> {
    source
        .iter()
        .enumerate()
        .find(|(_, element)| element.get(field).and_then(Node::as_str) == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::parse_document;

    fn node(text: &str) -> Node {
        parse_document(text).expect("parse failed")
    }

    fn seq(text: &str) -> Vec<Node> {
        match node(text) {
            Node::Sequence(items) => items,
            other => panic!("expected a sequence, got {}", other.kind_name()),
        }
    }

    fn mapping(text: &str) -> Mapping {
        match node(text) {
            Node::Mapping(entries) => entries,
            other => panic!("expected a mapping, got {}", other.kind_name()),
        }
    }

    // =========== merge_value ===========

    #[test]
    fn test_absent_existing_adopts_incoming() {
        let incoming = node("{a: 1, b: [x]}");
        assert_eq!(merge_value(None, &incoming), incoming);
        assert_eq!(merge_value(Some(Node::Null), &incoming), incoming);
    }

    #[test]
    fn test_sentinel_against_absent_is_kept_verbatim() {
        let incoming = Node::from("null");
        assert_eq!(merge_value(None, &incoming), Node::from("null"));
    }

    #[test]
    fn test_sentinel_nulls_any_existing_shape() {
        let incoming = Node::from("null");
        for existing in [node("x"), node("3"), node("[1, 2]"), node("{a: 1}")] {
            assert_eq!(merge_value(Some(existing), &incoming), Node::Null);
        }
    }

    #[test]
    fn test_scalar_overrides_any_existing_shape() {
        let incoming = Node::from(false);
        for existing in [node("x"), node("[1, 2]"), node("{a: 1}")] {
            assert_eq!(merge_value(Some(existing), &incoming), Node::from(false));
        }
    }

    #[test]
    fn test_explicit_null_incoming_nulls_existing() {
        assert_eq!(merge_value(Some(node("{a: 1}")), &Node::Null), Node::Null);
    }

    #[test]
    fn test_empty_incoming_sequence_replaces() {
        let merged = merge_value(Some(node("[{name: a}]")), &Node::Sequence(vec![]));
        assert_eq!(merged, Node::Sequence(vec![]));
    }

    #[test]
    fn test_empty_existing_sequence_is_replaced() {
        let incoming = node("[{name: a}]");
        assert_eq!(merge_value(Some(node("[]")), &incoming), incoming);
    }

    #[test]
    fn test_sequence_over_non_sequence_replaces() {
        let incoming = node("[{name: a}]");
        assert_eq!(merge_value(Some(node("{name: a}")), &incoming), incoming);
        assert_eq!(merge_value(Some(node("text")), &incoming), incoming);
    }

    #[test]
    fn test_mapping_over_scalar_discards_scalar() {
        let merged = merge_value(Some(node("text")), &node("{a: 1}"));
        assert_eq!(merged, node("{a: 1}"));
    }

    #[test]
    fn test_mapping_over_sequence_discards_sequence() {
        let merged = merge_value(Some(node("[1, 2]")), &node("{a: 1}"));
        assert_eq!(merged, node("{a: 1}"));
    }

    #[test]
    fn test_nested_mapping_merge() {
        let existing = node("{labels: {app: web, tier: front}, name: x}");
        let merged = merge_value(Some(existing), &node("{labels: {tier: back, team: ops}}"));
        assert_eq!(
            merged,
            node("{labels: {app: web, tier: back, team: ops}, name: x}")
        );
    }

    #[test]
    fn test_nested_sentinel_keeps_key_as_null() {
        let merged = merge_value(Some(node("{a: 1, b: 2}")), &node("{a: \"null\"}"));
        let entries = merged.as_mapping().unwrap();

        assert_eq!(entries.get("a"), Some(&Node::Null));
        assert_eq!(entries.get("b"), Some(&Node::from(2)));
    }

    #[test]
    fn test_merge_keeps_existing_key_order() {
        let merged = merge_documents(mapping("{a: 1, b: 2, c: 3}"), &mapping("{b: 9, d: 4}"));
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c", "d"]);
    }

    // =========== merge_sequences ===========

    #[test]
    fn test_upsert_by_name() {
        let merged = merge_sequences(
            seq("[{name: a, v: 1}, {name: b, v: 2}]"),
            &seq("[{name: b, v: 9}, {name: c, v: 3}]"),
        );
        assert_eq!(merged, seq("[{name: a, v: 1}, {name: b, v: 9}, {name: c, v: 3}]"));
    }

    #[test]
    fn test_delete_by_null_value_field() {
        let merged = merge_sequences(
            seq("[{name: a, v: 1}, {name: b, v: 2}]"),
            &seq("[{name: a, value: null}]"),
        );
        assert_eq!(merged, seq("[{name: b, v: 2}]"));
    }

    #[test]
    fn test_non_null_value_field_merges() {
        let merged = merge_sequences(
            seq("[{name: A, value: '1'}]"),
            &seq("[{name: A, value: '2'}]"),
        );
        assert_eq!(merged, seq("[{name: A, value: '2'}]"));
    }

    #[test]
    fn test_unmatched_delete_is_appended() {
        let merged = merge_sequences(seq("[{name: a}]"), &seq("[{name: z, value: null}]"));
        assert_eq!(merged, seq("[{name: a}, {name: z, value: null}]"));
    }

    #[test]
    fn test_non_mapping_first_change_replaces() {
        let merged = merge_sequences(seq("[{name: a}]"), &seq("[x, y]"));
        assert_eq!(merged, seq("[x, y]"));
    }

    #[test]
    fn test_later_non_mapping_change_is_appended() {
        let merged = merge_sequences(seq("[{name: a, v: 1}]"), &seq("[{name: a, v: 2}, loose]"));
        assert_eq!(merged, seq("[{name: a, v: 2}, loose]"));
    }

    #[test]
    fn test_change_without_identity_is_appended() {
        let merged = merge_sequences(seq("[{name: a}]"), &seq("[{image: x}]"));
        assert_eq!(merged, seq("[{name: a}, {image: x}]"));
    }

    #[test]
    fn test_matched_element_merges_recursively() {
        let merged = merge_sequences(
            seq("[{name: app, env: [{name: A, value: '1'}, {name: B, value: '2'}]}]"),
            &seq("[{name: app, env: [{name: B, value: null}, {name: C, value: '3'}]}]"),
        );
        assert_eq!(
            merged,
            seq("[{name: app, env: [{name: A, value: '1'}, {name: C, value: '3'}]}]")
        );
    }

    #[test]
    fn test_changes_apply_against_current_state() {
        // removing `a` first shifts `b` to position 0 before the second change
        let merged = merge_sequences(
            seq("[{name: a}, {name: b, v: 1}]"),
            &seq("[{name: a, value: null}, {name: b, v: 2}]"),
        );
        assert_eq!(merged, seq("[{name: b, v: 2}]"));
    }

    #[test]
    fn test_duplicate_change_merges_into_appended_element() {
        let merged = merge_sequences(
            seq("[{name: a}]"),
            &seq("[{name: c, v: 1}, {name: c, w: 2}]"),
        );
        assert_eq!(merged, seq("[{name: a}, {name: c, v: 1, w: 2}]"));
    }

    #[test]
    fn test_duplicate_source_identity_hits_first_only() {
        let merged = merge_sequences(seq("[{name: a, v: 1}, {name: a, v: 2}]"), &seq("[{name: a, v: 9}]"));
        assert_eq!(merged, seq("[{name: a, v: 9}, {name: a, v: 2}]"));
    }

    // =========== identity_field ===========

    #[test]
    fn test_identity_defaults_to_name() {
        assert_eq!(identity_field(&node("{name: a, image: x}")), "name");
        assert_eq!(identity_field(&node("{image: x}")), "name");
    }

    #[test]
    fn test_identity_id_overrides_name() {
        assert_eq!(identity_field(&node("{name: a, id: '1'}")), "id");
    }

    #[test]
    fn test_identity_key_overrides_id() {
        assert_eq!(identity_field(&node("{id: '1', key: k}")), "key");
        assert_eq!(identity_field(&node("{key: k}")), "key");
    }

    #[test]
    fn test_identity_presence_counts_null() {
        assert_eq!(identity_field(&node("{name: a, id: null}")), "id");
    }

    #[test]
    fn test_identity_uses_first_element_only() {
        // the second change has an `id`, but `name` was chosen from the first
        let merged = merge_sequences(
            seq("[{name: a, id: '1', v: 0}]"),
            &seq("[{name: b}, {id: '1', v: 5}]"),
        );
        assert_eq!(merged, seq("[{name: a, id: '1', v: 0}, {name: b}, {id: '1', v: 5}]"));
    }

    #[test]
    fn test_key_precedence_drives_matching() {
        let merged = merge_sequences(
            seq("[{key: k1, id: x, v: 1}]"),
            &seq("[{key: k1, id: y, v: 2}]"),
        );
        assert_eq!(merged, seq("[{key: k1, id: y, v: 2}]"));
    }

    // =========== identity_text / find_in_sequence ===========

    #[test]
    fn test_identity_text_renders_scalars() {
        assert_eq!(identity_text(Some(&Node::from("a"))), Some("a".to_string()));
        assert_eq!(identity_text(Some(&Node::from(7))), Some("7".to_string()));
        assert_eq!(identity_text(Some(&Node::from(true))), Some("true".to_string()));
        assert_eq!(identity_text(Some(&node("[1, 2]"))), Some("[1,2]".to_string()));
        assert_eq!(identity_text(Some(&Node::Null)), None);
        assert_eq!(identity_text(None), None);
    }

    #[test]
    fn test_find_returns_first_match() {
        let source = seq("[{name: a}, {name: b}, {name: b, v: 2}]");
        let (position, element) = find_in_sequence("name", "b", &source).unwrap();

        assert_eq!(position, 1);
        assert_eq!(element, &node("{name: b}"));
    }

    #[test]
    fn test_find_not_found() {
        let source = seq("[{name: a}]");
        assert!(find_in_sequence("name", "z", &source).is_none());
        assert!(find_in_sequence("id", "a", &source).is_none());
    }

    #[test]
    fn test_find_never_matches_non_string_identity() {
        let source = seq("[{id: 7}, {id: true}]");
        assert!(find_in_sequence("id", "7", &source).is_none());
        assert!(find_in_sequence("id", "true", &source).is_none());
    }

    #[test]
    fn test_find_skips_non_mapping_elements() {
        let source = seq("[b, {name: b}]");
        assert_eq!(find_in_sequence("name", "b", &source).map(|(p, _)| p), Some(1));
    }

    #[test]
    fn test_numeric_identity_mismatch_appends() {
        let merged = merge_sequences(seq("[{id: 1, v: a}]"), &seq("[{id: '1', v: b}]"));
        assert_eq!(merged, seq("[{id: 1, v: a}, {id: '1', v: b}]"));
    }

    #[test]
    fn test_numeric_identity_on_both_sides_still_appends() {
        // the change's 1 renders as "1", which never equals the stored number
        let merged = merge_sequences(seq("[{id: 1, v: a}]"), &seq("[{id: 1, v: b}]"));
        assert_eq!(merged, seq("[{id: 1, v: a}, {id: 1, v: b}]"));
    }
}
