// Flat form data -> nested document.
//
// Two passes, as the form front end expects:
// - `rebuild_object` assembles a tree from dotted PathKeys, choosing List vs
//   Map for each new container.
// - `rebuild_array` turns containers whose keys are all numeric into Lists.
// `form_to_document` runs both with one set of options.
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::coerce::coerce;
use crate::path::{is_numeric_segment, list_index, split_key};

/// How an intermediate container picks between List and Map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContainerPolicy {
    /// Decide once, when the container is created, from the segment that
    /// follows it: numeric means List. Later keys never change the choice.
    #[default]
    Lookahead,
    /// Collect every container as a Map, then turn it into a List only if it
    /// is non-empty and every key is a List index (see [`list_index`]).
    /// Independent of input order.
    Promote,
}

/// Which containers `rebuild_array` inspects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArrayNormalization {
    /// Only the outermost container.
    #[default]
    Root,
    /// Every container, children before parents.
    Recursive,
}

#[derive(Clone, Copy, Debug)]
pub struct RebuildOpts {
    pub containers: ContainerPolicy,
    pub arrays: ArrayNormalization,
    /// When false every leaf stays a string.
    pub coerce_scalars: bool,
}

impl Default for RebuildOpts {
    fn default() -> Self {
        Self {
            containers: ContainerPolicy::Lookahead,
            arrays: ArrayNormalization::Root,
            coerce_scalars: true,
        }
    }
}

/// Owned flat form data: `(PathKey, RawValue)` pairs in submission order.
pub type FlatMapping = Vec<(String, String)>;

enum Node {
    Leaf(Value),
    Map(IndexMap<String, Node>),
    List(IndexMap<String, Node>),
}

/// Rebuild a full document from flat form data.
pub fn form_to_document<I, K, V>(pairs: I, opts: &RebuildOpts) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    rebuild_array(rebuild_object(pairs, opts), opts.arrays)
}

/// Assemble a Map from dotted PathKeys. The first write to a leaf wins; pairs
/// that conflict with the structure already built are dropped with a warning.
pub fn rebuild_object<I, K, V>(pairs: I, opts: &RebuildOpts) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut root: IndexMap<String, Node> = IndexMap::new();
    let mut count = 0usize;
    for (key, raw) in pairs {
        let key = key.as_ref();
        let segments = split_key(key);
        insert(&mut root, false, &segments, raw.as_ref(), key, opts);
        count += 1;
    }
    debug!(pairs = count, top_level = root.len(), "assembled object");
    let promote = opts.containers == ContainerPolicy::Promote;
    Value::Object(
        root.into_iter()
            .map(|(k, n)| (k, into_value(n, promote)))
            .collect(),
    )
}

fn insert(
    children: &mut IndexMap<String, Node>,
    in_list: bool,
    segments: &[&str],
    raw: &str,
    key: &str,
    opts: &RebuildOpts,
) {
    let Some((&seg, rest)) = segments.split_first() else {
        return;
    };
    if in_list && list_index(seg).is_none() {
        warn!(key, segment = seg, "segment is not a list index, pair dropped");
        return;
    }
    if rest.is_empty() {
        match children.entry(seg.to_string()) {
            Entry::Vacant(slot) => {
                let leaf = if opts.coerce_scalars {
                    coerce(raw)
                } else {
                    Value::String(raw.to_string())
                };
                slot.insert(Node::Leaf(leaf));
            }
            Entry::Occupied(slot) => match slot.get() {
                Node::Leaf(_) => debug!(key, "duplicate leaf, first value kept"),
                _ => warn!(key, "leaf collides with a container, pair dropped"),
            },
        }
        return;
    }
    let child = children
        .entry(seg.to_string())
        .or_insert_with(|| match opts.containers {
            ContainerPolicy::Lookahead if is_numeric_segment(rest[0]) => {
                Node::List(IndexMap::new())
            }
            _ => Node::Map(IndexMap::new()),
        });
    match child {
        Node::Map(map) => insert(map, false, rest, raw, key, opts),
        Node::List(list) => insert(list, true, rest, raw, key, opts),
        Node::Leaf(_) => warn!(key, segment = seg, "path runs through a scalar, pair dropped"),
    }
}

fn into_value(node: Node, promote: bool) -> Value {
    match node {
        Node::Leaf(v) => v,
        Node::List(items) => indexed_array(items, promote),
        Node::Map(map) => {
            if promote && !map.is_empty() && map.keys().all(|k| list_index(k).is_some()) {
                indexed_array(map, promote)
            } else {
                Value::Object(
                    map.into_iter()
                        .map(|(k, n)| (k, into_value(n, promote)))
                        .collect(),
                )
            }
        }
    }
}

// Every child sits at the index its key names; gaps are padded with null.
// Keys here have already passed `list_index`.
fn indexed_array(items: IndexMap<String, Node>, promote: bool) -> Value {
    let mut slots: Vec<Value> = Vec::new();
    for (k, n) in items {
        let Some(i) = list_index(&k) else {
            continue;
        };
        if slots.len() <= i {
            slots.resize(i + 1, Value::Null);
        }
        slots[i] = into_value(n, promote);
    }
    Value::Array(slots)
}

/// Convert numeric-keyed Maps into Lists.
///
/// A Map becomes a List only when it has at least one key and every key is a
/// numeric segment; elements keep key insertion order, they are not sorted.
/// Lists, scalars and other Maps pass through. With
/// [`ArrayNormalization::Root`] only `value` itself is inspected.
pub fn rebuild_array(value: Value, mode: ArrayNormalization) -> Value {
    match mode {
        ArrayNormalization::Root => normalize_container(value),
        ArrayNormalization::Recursive => normalize_deep(value),
    }
}

fn normalize_container(value: Value) -> Value {
    match value {
        Value::Object(map) if !map.is_empty() && map.keys().all(|k| is_numeric_segment(k)) => {
            Value::Array(map.into_iter().map(|(_, v)| v).collect())
        }
        other => other,
    }
}

fn normalize_deep(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let map: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, normalize_deep(v)))
                .collect();
            normalize_container(Value::Object(map))
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_deep).collect()),
        other => other,
    }
}
