//! Atlassian Document Format (ADF) subset.
//!
//! Jira Cloud stores descriptions and comment bodies as ADF documents:
//! a tree of typed block nodes whose leaves are text runs carrying
//! formatting marks. This module models the subset the bridge produces
//! (paragraphs, headings, bullet/ordered lists, code blocks; strong, em,
//! strike, code, and link marks) and serializes it to the exact wire
//! shape the REST API accepts.
//!
//! Conversion from the markdown dialect happens in two layers:
//! [`tokenize`] scans a single line into marked text runs, and
//! [`convert`] structures the full text into a [`Document`].

mod convert;
mod inline;

pub use convert::convert;
pub use inline::tokenize;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A leaf content unit: a piece of text plus the marks applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    /// The literal text of the run.
    pub text: String,
    /// Formatting marks; empty for plain text.
    pub marks: Vec<Mark>,
}

impl TextRun {
    /// A run with no marks.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// A run carrying a single mark.
    #[must_use]
    pub fn marked(text: impl Into<String>, mark: Mark) -> Self {
        Self {
            text: text.into(),
            marks: vec![mark],
        }
    }
}

// Wire shape: {"type":"text","text":…} with "marks" omitted when empty.
impl Serialize for TextRun {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "text")?;
        map.serialize_entry("text", &self.text)?;
        if !self.marks.is_empty() {
            map.serialize_entry("marks", &self.marks)?;
        }
        map.end()
    }
}

/// A formatting mark attached to a [`TextRun`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Mark {
    /// Bold.
    Strong,
    /// Italic.
    Em,
    /// Strikethrough.
    Strike,
    /// Inline code.
    Code,
    /// A hyperlink; the run's text is the label.
    Link {
        /// Link attributes.
        attrs: LinkAttrs,
    },
}

impl Mark {
    /// A link mark pointing at `href`.
    #[must_use]
    pub fn link(href: impl Into<String>) -> Self {
        Self::Link {
            attrs: LinkAttrs { href: href.into() },
        }
    }
}

/// Attributes of a link mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkAttrs {
    /// The link target.
    pub href: String,
}

/// A top-level structural unit of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockNode {
    /// A plain paragraph of inline runs.
    Paragraph {
        /// The paragraph's inline content.
        content: Vec<TextRun>,
    },
    /// A heading, levels 1 through 6.
    Heading {
        /// Heading depth, 1..=6.
        level: u8,
        /// The heading's inline content.
        content: Vec<TextRun>,
    },
    /// An unordered list; each item is an implicit paragraph of runs.
    BulletList {
        /// The list items, in order.
        items: Vec<Vec<TextRun>>,
    },
    /// An ordered list; numbering is positional, not stored.
    OrderedList {
        /// The list items, in order.
        items: Vec<Vec<TextRun>>,
    },
    /// A fenced code block; marks are never applied inside.
    CodeBlock {
        /// Language tag from the opening fence, if any.
        language: Option<String>,
        /// The raw code, lines joined with newlines.
        code: String,
    },
}

impl Serialize for BlockNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Self::Paragraph { content } => {
                map.serialize_entry("type", "paragraph")?;
                map.serialize_entry("content", content)?;
            }
            Self::Heading { level, content } => {
                map.serialize_entry("type", "heading")?;
                map.serialize_entry("attrs", &LevelAttrs { level: *level })?;
                map.serialize_entry("content", content)?;
            }
            Self::BulletList { items } => {
                map.serialize_entry("type", "bulletList")?;
                map.serialize_entry("content", &ListItems(items))?;
            }
            Self::OrderedList { items } => {
                map.serialize_entry("type", "orderedList")?;
                map.serialize_entry("content", &ListItems(items))?;
            }
            Self::CodeBlock { language, code } => {
                map.serialize_entry("type", "codeBlock")?;
                if let Some(language) = language {
                    map.serialize_entry("attrs", &LanguageAttrs { language })?;
                }
                map.serialize_entry("content", &[CodeText(code)])?;
            }
        }
        map.end()
    }
}

/// An ordered sequence of block nodes; never empty.
///
/// Serializes to `{"type":"doc","version":1,"content":[…]}`, the value
/// Jira expects in `description` and comment `body` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The document's blocks, in source order.
    pub content: Vec<BlockNode>,
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", "doc")?;
        map.serialize_entry("version", &1)?;
        map.serialize_entry("content", &self.content)?;
        map.end()
    }
}

/// Flatten an ADF value returned by the server into plain text.
///
/// Walks the tree collecting `text` fields; top-level blocks and list
/// items are joined with newlines. Used when rendering issue
/// descriptions for tool responses, where the full tree would be noise.
#[must_use]
pub fn plain_text(value: &serde_json::Value) -> String {
    fn collect(value: &serde_json::Value, out: &mut String) {
        if let Some(text) = value.get("text").and_then(serde_json::Value::as_str) {
            out.push_str(text);
        }
        if let Some(children) = value.get("content").and_then(serde_json::Value::as_array) {
            // List items are separate lines, not one run-on string.
            let is_list = value
                .get("type")
                .and_then(serde_json::Value::as_str)
                .is_some_and(|t| t == "bulletList" || t == "orderedList");
            for (i, child) in children.iter().enumerate() {
                if is_list && i > 0 {
                    out.push('\n');
                }
                collect(child, out);
            }
        }
    }

    let blocks = value
        .get("content")
        .and_then(serde_json::Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let mut lines = Vec::with_capacity(blocks.len());
    for block in blocks {
        let mut line = String::new();
        collect(block, &mut line);
        lines.push(line);
    }
    lines.join("\n")
}

#[derive(Serialize)]
struct LevelAttrs {
    level: u8,
}

#[derive(Serialize)]
struct LanguageAttrs<'a> {
    language: &'a str,
}

struct ListItems<'a>(&'a [Vec<TextRun>]);

impl Serialize for ListItems<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in self.0 {
            seq.serialize_element(&ListItem(item))?;
        }
        seq.end()
    }
}

// {"type":"listItem","content":[{"type":"paragraph","content":[…]}]}
struct ListItem<'a>(&'a [TextRun]);

impl Serialize for ListItem<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "listItem")?;
        map.serialize_entry("content", &[ItemParagraph(self.0)])?;
        map.end()
    }
}

struct ItemParagraph<'a>(&'a [TextRun]);

impl Serialize for ItemParagraph<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "paragraph")?;
        map.serialize_entry("content", &self.0)?;
        map.end()
    }
}

// The single text child of a codeBlock, with no marks.
struct CodeText<'a>(&'a str);

impl Serialize for CodeText<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "text")?;
        map.serialize_entry("text", self.0)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_run_omits_empty_marks() {
        let run = TextRun::plain("hello");
        assert_eq!(
            serde_json::to_value(&run).unwrap(),
            json!({"type": "text", "text": "hello"})
        );
    }

    #[test]
    fn test_mark_wire_shapes() {
        assert_eq!(
            serde_json::to_value(Mark::Strong).unwrap(),
            json!({"type": "strong"})
        );
        assert_eq!(
            serde_json::to_value(Mark::link("https://example.com")).unwrap(),
            json!({"type": "link", "attrs": {"href": "https://example.com"}})
        );
    }

    #[test]
    fn test_heading_serializes_level_attr() {
        let block = BlockNode::Heading {
            level: 2,
            content: vec![TextRun::plain("Title")],
        };
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "type": "heading",
                "attrs": {"level": 2},
                "content": [{"type": "text", "text": "Title"}]
            })
        );
    }

    #[test]
    fn test_list_items_wrap_implicit_paragraphs() {
        let block = BlockNode::BulletList {
            items: vec![vec![TextRun::plain("a")], vec![TextRun::plain("b")]],
        };
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "type": "bulletList",
                "content": [
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "a"}]}
                    ]},
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "b"}]}
                    ]},
                ]
            })
        );
    }

    #[test]
    fn test_code_block_without_language_omits_attrs() {
        let block = BlockNode::CodeBlock {
            language: None,
            code: "x = 1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "type": "codeBlock",
                "content": [{"type": "text", "text": "x = 1"}]
            })
        );
    }

    #[test]
    fn test_code_block_with_language() {
        let block = BlockNode::CodeBlock {
            language: Some("rust".to_string()),
            code: "fn main() {}".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "type": "codeBlock",
                "attrs": {"language": "rust"},
                "content": [{"type": "text", "text": "fn main() {}"}]
            })
        );
    }

    #[test]
    fn test_document_envelope() {
        let doc = Document {
            content: vec![BlockNode::Paragraph {
                content: vec![TextRun::plain("body")],
            }],
        };
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "type": "doc",
                "version": 1,
                "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "body"}]}
                ]
            })
        );
    }

    #[test]
    fn test_plain_text_flattens_blocks() {
        let doc = serde_json::to_value(convert("# Title\n\nSome **bold** body")).unwrap();
        assert_eq!(plain_text(&doc), "Title\nSome bold body");
    }

    #[test]
    fn test_plain_text_separates_list_items() {
        let doc = serde_json::to_value(convert("- a\n- b\n\n1. one\n2. two")).unwrap();
        assert_eq!(plain_text(&doc), "a\nb\none\ntwo");
    }

    #[test]
    fn test_plain_text_on_non_adf_value() {
        assert_eq!(plain_text(&json!("just a string")), "");
        assert_eq!(plain_text(&json!({"content": []})), "");
    }
}
