//! Rich-text DOM flattening.
//!
//! # Responsibilities
//! - Transform the upstream's recursive description DOM into a flat,
//!   document-ordered sequence of renderable blocks and images
//! - Collapse nested block tags into their outermost block
//! - Resolve inline styling and anchors into per-span annotations
//!
//! # Design Decisions
//! - Pure recursive walk; context (styles, link, block nesting) is
//!   passed down by value, never shared across sibling subtrees
//! - Images are pushed straight to the output at their traversal
//!   point, so they interleave with blocks instead of nesting in them
//! - Spans only reach the output through a block boundary; text that
//!   never meets a block tag is dropped
//! - Style sets keep insertion order (outermost tag first) and do not
//!   repeat a style under nested identical markers

pub mod node;

pub use node::{AttrValue, DomNode};

use serde::{Deserialize, Serialize};

/// Inline styling applied to a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Italic,
    Bold,
}

impl Style {
    /// Style contributed by an inline tag, if any.
    fn for_tag(tag: &str) -> Option<Self> {
        match tag {
            "i" | "em" => Some(Style::Italic),
            "b" | "strong" => Some(Style::Bold),
            _ => None,
        }
    }
}

/// A run of text sharing one style set and one link target.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Span {
    pub text: String,
    pub styles: Vec<Style>,
    pub link: Option<String>,
}

impl Span {
    fn new(text: &str, styles: &[Style], link: Option<&str>) -> Self {
        Self {
            text: text.to_string(),
            styles: styles.to_vec(),
            link: link.map(str::to_string),
        }
    }

    /// The span emitted for a line-break tag: a literal newline with
    /// all inherited context discarded.
    fn line_break() -> Self {
        Self {
            text: "\n".to_string(),
            styles: Vec::new(),
            link: None,
        }
    }
}

/// One item of the flattened output: a top-level block or an image.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlatNode {
    Paragraph {
        spans: Vec<Span>,
    },
    Blockquote {
        spans: Vec<Span>,
    },
    Image {
        url: String,
        alt: String,
        width: u32,
        height: u32,
    },
}

/// Flatten a description DOM into blocks and images in document order.
///
/// Deterministic: the same input always yields the same sequence.
/// Spans returned by the root walk have no enclosing block and are
/// discarded.
pub fn flatten(root: Option<&DomNode>) -> Vec<FlatNode> {
    let mut out = Vec::new();
    if let Some(node) = root {
        walk(node, &[], None, false, &mut out);
    }
    out
}

/// Depth-first walk.
///
/// Returns the spans this subtree contributes to its nearest enclosing
/// block; emits blocks and images onto `out` as they close. `in_block`
/// records whether an ancestor block tag is already collecting spans.
fn walk(
    node: &DomNode,
    styles: &[Style],
    link: Option<&str>,
    in_block: bool,
    out: &mut Vec<FlatNode>,
) -> Vec<Span> {
    let (tag, attributes, children) = match node {
        DomNode::Text(text) => return vec![Span::new(text, styles, link)],
        DomNode::Element { tag, attributes, children } => (tag.as_str(), attributes, children),
    };

    match tag {
        "br" => vec![Span::line_break()],

        "img" => {
            let get_str = |key: &str| {
                attributes
                    .get(key)
                    .and_then(AttrValue::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            let get_dim = |key: &str| attributes.get(key).and_then(AttrValue::as_u32).unwrap_or(0);
            out.push(FlatNode::Image {
                url: get_str("src"),
                alt: get_str("alt"),
                width: get_dim("width"),
                height: get_dim("height"),
            });
            Vec::new()
        }

        "i" | "em" | "b" | "strong" | "a" => {
            let mut styles = styles.to_vec();
            if let Some(style) = Style::for_tag(tag) {
                if !styles.contains(&style) {
                    styles.push(style);
                }
            }
            // Nearest anchor wins: an own href shadows any inherited one.
            let link = attributes
                .get("href")
                .and_then(AttrValue::as_str)
                .or(link);

            let mut spans = Vec::new();
            for child in children {
                spans.extend(walk(child, &styles, link, true, out));
            }
            spans
        }

        "p" | "blockquote" => {
            let mut spans = Vec::new();
            for child in children {
                spans.extend(walk(child, styles, link, true, out));
            }

            if in_block {
                // Nested block: absorbed by the enclosing block.
                return spans;
            }
            if !spans.is_empty() {
                out.push(match tag {
                    "p" => FlatNode::Paragraph { spans },
                    _ => FlatNode::Blockquote { spans },
                });
            }
            Vec::new()
        }

        // Unrecognized tags (including the upstream's "root" wrapper)
        // are transparent.
        _ => {
            let mut spans = Vec::new();
            for child in children {
                spans.extend(walk(child, styles, link, in_block, out));
            }
            spans
        }
    }
}
