//! Minimal rich-text document support.
//!
//! The v3 API takes and returns comment bodies as a `doc` node tree rather
//! than plain strings. We only ever write a single paragraph, but reading has
//! to cope with whatever the web editor produced.

use serde::{Deserialize, Serialize};

/// A rich-text node. The root node has type `doc` and a `version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,
}

impl Node {
    /// Wraps `text` as `doc -> paragraph -> text`.
    ///
    /// An empty string yields an empty paragraph; the service rejects empty
    /// text nodes.
    pub fn document(text: &str) -> Self {
        let content = if text.is_empty() {
            Vec::new()
        } else {
            vec![Self {
                kind: "text".to_string(),
                version: None,
                text: Some(text.to_string()),
                content: Vec::new(),
            }]
        };
        Self {
            kind: "doc".to_string(),
            version: Some(1),
            text: None,
            content: vec![Self {
                kind: "paragraph".to_string(),
                version: None,
                text: None,
                content,
            }],
        }
    }

    /// Concatenates every text node in document order.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.content {
            child.collect_text(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn document_has_doc_paragraph_text_shape() {
        let doc = serde_json::to_value(Node::document("Fixed the bug")).unwrap();
        assert_eq!(
            doc,
            json!({
                "type": "doc",
                "version": 1,
                "content": [{
                    "type": "paragraph",
                    "content": [{"type": "text", "text": "Fixed the bug"}]
                }]
            })
        );
    }

    #[test]
    fn empty_text_makes_empty_paragraph() {
        let doc = serde_json::to_value(Node::document("")).unwrap();
        assert_eq!(doc["content"][0], json!({"type": "paragraph"}));
    }

    #[test]
    fn plain_text_walks_nested_nodes_in_order() {
        let doc: Node = serde_json::from_value(json!({
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "paragraph", "content": [
                    {"type": "text", "text": "Reviewed "},
                    {"type": "text", "text": "PR", "marks": [{"type": "strong"}]}
                ]},
                {"type": "bulletList", "content": [
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": " and tests"}]}
                    ]}
                ]},
                {"type": "rule"}
            ]
        }))
        .unwrap();
        assert_eq!(doc.plain_text(), "Reviewed PR and tests");
    }

    #[test]
    fn document_round_trips_to_original_text() {
        assert_eq!(Node::document("hello").plain_text(), "hello");
    }
}
