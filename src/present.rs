//! Plain-text presentation of render trees for the terminal explorer.

use crate::controller::{ExplorerView, SectionView};
use crate::render::RenderNode;

const INDENT: &str = "  ";
const OPEN_MARK: &str = "[-]";
const CLOSED_MARK: &str = "[+]";

/// Lines for one node. `indent` is the nesting level of the first line.
pub fn node_lines(node: &RenderNode, indent: usize) -> Vec<String> {
    let mut out = Vec::new();
    push_node(node, indent, &mut out);
    out
}

fn push_node(node: &RenderNode, indent: usize, out: &mut Vec<String>) {
    let pad = INDENT.repeat(indent);
    match node {
        RenderNode::Mapping { entries, .. } => {
            for (key, value) in entries {
                match value.label() {
                    Some(label) => out.push(format!("{}{}: {}", pad, key, label)),
                    None => {
                        out.push(format!("{}{}:", pad, key));
                        push_node(value, indent + 1, out);
                    }
                }
            }
        }
        RenderNode::Sequence { items, .. } => {
            for item in items {
                match item.label() {
                    Some(label) => out.push(format!("{}- {}", pad, label)),
                    None => {
                        out.push(format!("{}-", pad));
                        push_node(item, indent + 1, out);
                    }
                }
            }
        }
        leaf => {
            if let Some(label) = leaf.label() {
                out.push(format!("{}{}", pad, label));
            }
        }
    }
}

pub fn section_lines(section: &SectionView) -> Vec<String> {
    let mark = if section.open { OPEN_MARK } else { CLOSED_MARK };
    let mut out = vec![format!("{} {}", mark, section.name)];
    if let Some(body) = &section.body {
        push_node(body, 1, &mut out);
    }
    out
}

pub fn view_lines(view: &ExplorerView) -> Vec<String> {
    match view {
        ExplorerView::Closed => vec!["facts explorer closed (type `open`)".to_string()],
        ExplorerView::Loading => vec!["loading facts...".to_string()],
        ExplorerView::Failed { error } => vec![
            format!("error: {}", error),
            "type `refresh` to retry".to_string(),
        ],
        ExplorerView::Empty { message } => vec![message.clone()],
        ExplorerView::Ready { sections } if sections.is_empty() => {
            vec!["facts document has no sections".to_string()]
        }
        ExplorerView::Ready { sections } => sections.iter().flat_map(section_lines).collect(),
    }
}

pub fn view_text(view: &ExplorerView) -> String {
    view_lines(view).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;
    use serde_json::json;

    #[test]
    fn test_mapping_with_nested_sequence() {
        let node = render(
            &json!({"trend": "bullish", "swings": [1.1, {"px": 1.2}], "sweeps": []}),
            0,
        );
        assert_eq!(
            node_lines(&node, 0),
            vec![
                "trend: bullish",
                "swings:",
                "  - 1.10000",
                "  - px: 1.20000",
                "sweeps: (empty)",
            ]
        );
    }

    #[test]
    fn test_sequence_of_sequences() {
        let node = render(&json!([[true, null]]), 0);
        assert_eq!(node_lines(&node, 1), vec!["  -", "    - Yes", "    - —"]);
    }

    #[test]
    fn test_section_headers() {
        let open = SectionView {
            name: "session".into(),
            open: true,
            body: Some(render(&json!({"kz": "London"}), 0)),
        };
        let closed = SectionView {
            name: "levels".into(),
            open: false,
            body: None,
        };
        let text = view_text(&ExplorerView::Ready {
            sections: vec![open, closed],
        });
        assert_eq!(text, "[-] session\n  kz: London\n[+] levels");
    }

    #[test]
    fn test_failure_keeps_error_text() {
        let lines = view_lines(&ExplorerView::Failed {
            error: "GET http://x/api/facts: HTTP 500".into(),
        });
        assert_eq!(lines[0], "error: GET http://x/api/facts: HTTP 500");
    }
}
