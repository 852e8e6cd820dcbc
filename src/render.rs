//! Pure value renderer: (Value, depth) -> RenderNode.
//!
//! The backend decides the shape of every section, so nothing here assumes a
//! schema. Each JSON shape maps to one node kind, and collections are capped:
//!
//! | Shape    | Node          | Cap                                   |
//! |----------|---------------|---------------------------------------|
//! | null     | `Placeholder` | -                                     |
//! | bool     | `Flag`        | -                                     |
//! | number   | `Number`      | 5 fractional digits                   |
//! | string   | `Text`        | -                                     |
//! | array    | `Sequence`    | 5 items, then `Omitted(n)`            |
//! | object   | `Mapping`     | 10 entries, remainder dropped silently |
//!
//! Rendering never fails. Anything that does not fit a shape degrades to its
//! string form.

use serde_json::{Map, Number, Value};

/// Items shown from a sequence before the `+N more` marker.
pub const MAX_SEQUENCE_ITEMS: usize = 5;
/// Entries shown from a mapping. The rest are dropped without a marker.
pub const MAX_MAPPING_ENTRIES: usize = 10;
/// Fractional digits for every number (price levels).
pub const NUMBER_PRECISION: usize = 5;

pub const PLACEHOLDER_LABEL: &str = "—";
pub const EMPTY_LABEL: &str = "(empty)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    /// Null or missing value.
    Placeholder,
    Flag(bool),
    /// Number already formatted to fixed point.
    Number(String),
    Text(String),
    /// Empty sequence.
    Empty,
    /// A mapping inside a sequence, collapsed to one line.
    Compact(String),
    /// Count of sequence items past the cap.
    Omitted(usize),
    Sequence {
        depth: usize,
        items: Vec<RenderNode>,
    },
    Mapping {
        depth: usize,
        entries: Vec<(String, RenderNode)>,
    },
}

impl RenderNode {
    pub fn is_leaf(&self) -> bool {
        !matches!(self, RenderNode::Sequence { .. } | RenderNode::Mapping { .. })
    }

    /// One-line label for leaves. Containers have no label of their own.
    pub fn label(&self) -> Option<String> {
        match self {
            RenderNode::Placeholder => Some(PLACEHOLDER_LABEL.to_string()),
            RenderNode::Flag(b) => Some(flag_label(*b).to_string()),
            RenderNode::Number(s) | RenderNode::Text(s) | RenderNode::Compact(s) => {
                Some(s.clone())
            }
            RenderNode::Empty => Some(EMPTY_LABEL.to_string()),
            RenderNode::Omitted(n) => Some(format!("+{} more", n)),
            RenderNode::Sequence { .. } | RenderNode::Mapping { .. } => None,
        }
    }

    /// Total node count including self.
    pub fn node_count(&self) -> usize {
        match self {
            RenderNode::Sequence { items, .. } => {
                1 + items.iter().map(RenderNode::node_count).sum::<usize>()
            }
            RenderNode::Mapping { entries, .. } => {
                1 + entries.iter().map(|(_, n)| n.node_count()).sum::<usize>()
            }
            _ => 1,
        }
    }
}

pub fn flag_label(b: bool) -> &'static str {
    if b {
        "Yes"
    } else {
        "No"
    }
}

/// Render a value found at `depth` in the tree.
pub fn render(value: &Value, depth: usize) -> RenderNode {
    match value {
        Value::Null => RenderNode::Placeholder,
        Value::Bool(b) => RenderNode::Flag(*b),
        Value::Number(n) => match format_number(n) {
            Some(s) => RenderNode::Number(s),
            None => RenderNode::Text(n.to_string()),
        },
        Value::String(s) => RenderNode::Text(s.clone()),
        Value::Array(items) => render_sequence(items, depth),
        Value::Object(map) => render_mapping(map, depth),
    }
}

/// Render a slot that may not exist at all. A missing value looks like null.
pub fn render_slot(value: Option<&Value>, depth: usize) -> RenderNode {
    match value {
        Some(v) => render(v, depth),
        None => RenderNode::Placeholder,
    }
}

/// Fixed-point with [`NUMBER_PRECISION`] digits, or `None` when the number has
/// no finite `f64` form.
pub fn format_number(n: &Number) -> Option<String> {
    let f = n.as_f64().filter(|f| f.is_finite())?;
    // -0.0 would print a sign
    let f = if f == 0.0 { 0.0 } else { f };
    Some(format!("{:.*}", NUMBER_PRECISION, f))
}

fn render_sequence(items: &[Value], depth: usize) -> RenderNode {
    if items.is_empty() {
        return RenderNode::Empty;
    }
    let mut out: Vec<RenderNode> = items
        .iter()
        .take(MAX_SEQUENCE_ITEMS)
        .map(|item| match item {
            Value::Object(map) => RenderNode::Compact(compact_mapping(map)),
            other => render(other, depth + 1),
        })
        .collect();
    if items.len() > MAX_SEQUENCE_ITEMS {
        out.push(RenderNode::Omitted(items.len() - MAX_SEQUENCE_ITEMS));
    }
    RenderNode::Sequence { depth, items: out }
}

fn render_mapping(map: &Map<String, Value>, depth: usize) -> RenderNode {
    let entries = map
        .iter()
        .take(MAX_MAPPING_ENTRIES)
        .map(|(k, v)| (k.clone(), render(v, depth + 1)))
        .collect();
    RenderNode::Mapping { depth, entries }
}

/// `key: value, key: value` in insertion order. Nested containers are
/// abbreviated so the line stays short. An empty mapping is `{}`.
pub fn compact_mapping(map: &Map<String, Value>) -> String {
    if map.is_empty() {
        return "{}".to_string();
    }
    map.iter()
        .take(MAX_MAPPING_ENTRIES)
        .map(|(k, v)| format!("{}: {}", k, compact_scalar(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn compact_scalar(value: &Value) -> String {
    match value {
        Value::Null => PLACEHOLDER_LABEL.to_string(),
        Value::Bool(b) => flag_label(*b).to_string(),
        Value::Number(n) => format_number(n).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(map) => format!("{{{} keys}}", map.len()),
    }
}
