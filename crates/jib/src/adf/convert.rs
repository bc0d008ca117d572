//! Block structurer.
//!
//! Consumes the source text line by line, classifying each line and
//! threading block-level state (open code fence, pending code lines)
//! through the scan. Adjacent list lines of the same kind merge into
//! the previous list block; everything else starts a fresh block.

use std::sync::OnceLock;

use regex::Regex;

use super::inline::tokenize;
use super::{BlockNode, Document};

fn heading_pattern() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("heading pattern is valid"))
}

fn ordered_pattern() -> &'static Regex {
    static ORDERED: OnceLock<Regex> = OnceLock::new();
    ORDERED.get_or_init(|| Regex::new(r"^\d+\.\s+(.*)$").expect("ordered pattern is valid"))
}

/// Convert markup text into an ADF [`Document`].
///
/// Never fails for any input. Empty input (or input that reduces to zero
/// blocks) produces a document holding exactly one empty paragraph.
#[must_use]
pub fn convert(text: &str) -> Document {
    let mut state = BlockState::default();
    for line in text.lines() {
        state.step(line);
    }
    state.finish()
}

/// Accumulator state for one conversion; owned by the call, discarded after.
#[derive(Default)]
struct BlockState {
    blocks: Vec<BlockNode>,
    in_code_block: bool,
    code_buffer: Vec<String>,
    code_language: String,
}

enum ListKind {
    Bullet,
    Ordered,
}

impl BlockState {
    fn step(&mut self, line: &str) {
        let trimmed = line.trim();

        // Fence lines toggle code-block state and contribute to nothing else.
        if let Some(rest) = trimmed.strip_prefix("```") {
            if self.in_code_block {
                self.flush_code();
            } else {
                self.in_code_block = true;
                self.code_language = rest.trim().to_string();
                self.code_buffer.clear();
            }
            return;
        }

        if self.in_code_block {
            // Raw line, verbatim; no inline tokenization inside a fence.
            self.code_buffer.push(line.to_string());
            return;
        }

        if trimmed.is_empty() {
            // Blank lines emit nothing and never close an open list; the
            // next non-blank line decides continuation.
            return;
        }

        if let Some(caps) = heading_pattern().captures(trimmed) {
            let level = caps
                .get(1)
                .map_or(1, |m| u8::try_from(m.as_str().len()).unwrap_or(6));
            let content = caps.get(2).map_or("", |m| m.as_str());
            self.blocks.push(BlockNode::Heading {
                level,
                content: tokenize(content),
            });
            return;
        }

        if let Some(content) = bullet_content(trimmed) {
            self.push_list_item(&ListKind::Bullet, content);
            return;
        }

        if let Some(caps) = ordered_pattern().captures(trimmed) {
            // The marker digits are discarded; list position is positional.
            let content = caps.get(1).map_or("", |m| m.as_str());
            self.push_list_item(&ListKind::Ordered, content);
            return;
        }

        self.blocks.push(BlockNode::Paragraph {
            content: tokenize(line),
        });
    }

    fn push_list_item(&mut self, kind: &ListKind, content: &str) {
        let item = tokenize(content);
        // Merge only when the immediately preceding emitted block is a
        // list of the same kind; anything in between starts a new list.
        match (kind, self.blocks.last_mut()) {
            (ListKind::Bullet, Some(BlockNode::BulletList { items }))
            | (ListKind::Ordered, Some(BlockNode::OrderedList { items })) => items.push(item),
            (ListKind::Bullet, _) => self.blocks.push(BlockNode::BulletList { items: vec![item] }),
            (ListKind::Ordered, _) => {
                self.blocks.push(BlockNode::OrderedList { items: vec![item] });
            }
        }
    }

    fn flush_code(&mut self) {
        let language = if self.code_language.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.code_language))
        };
        self.blocks.push(BlockNode::CodeBlock {
            language,
            code: self.code_buffer.join("\n"),
        });
        self.code_buffer.clear();
        self.code_language.clear();
        self.in_code_block = false;
    }

    fn finish(mut self) -> Document {
        // An unterminated fence is not an error: flush what was buffered.
        if self.in_code_block {
            self.flush_code();
        }
        if self.blocks.is_empty() {
            self.blocks.push(BlockNode::Paragraph {
                content: Vec::new(),
            });
        }
        Document {
            content: self.blocks,
        }
    }
}

// `•` is multi-byte, so the marker+space prefix is stripped char-wise.
fn bullet_content(trimmed: &str) -> Option<&str> {
    let mut chars = trimmed.chars();
    if !matches!(chars.next()?, '-' | '*' | '•') {
        return None;
    }
    if !chars.next()?.is_whitespace() {
        return None;
    }
    Some(chars.as_str())
}

#[cfg(test)]
mod tests {
    use super::super::{Mark, TextRun};
    use super::*;
    use rstest::rstest;

    fn paragraph(text: &str) -> BlockNode {
        BlockNode::Paragraph {
            content: vec![TextRun::plain(text)],
        }
    }

    #[test]
    fn test_empty_input_is_one_empty_paragraph() {
        let doc = convert("");
        assert_eq!(
            doc.content,
            vec![BlockNode::Paragraph {
                content: Vec::new()
            }]
        );
    }

    #[test]
    fn test_blank_only_input_is_one_empty_paragraph() {
        let doc = convert("\n\n   \n");
        assert_eq!(
            doc.content,
            vec![BlockNode::Paragraph {
                content: Vec::new()
            }]
        );
    }

    #[test]
    fn test_single_paragraph() {
        assert_eq!(convert("hello world").content, vec![paragraph("hello world")]);
    }

    #[test]
    fn test_heading_then_paragraph_blank_line_emits_nothing() {
        let doc = convert("# Title\n\nBody");
        assert_eq!(
            doc.content,
            vec![
                BlockNode::Heading {
                    level: 1,
                    content: vec![TextRun::plain("Title")],
                },
                paragraph("Body"),
            ]
        );
    }

    #[rstest]
    #[case::h1("# x", 1)]
    #[case::h3("### x", 3)]
    #[case::h6("###### x", 6)]
    fn test_heading_levels(#[case] input: &str, #[case] level: u8) {
        assert_eq!(
            convert(input).content,
            vec![BlockNode::Heading {
                level,
                content: vec![TextRun::plain("x")],
            }]
        );
    }

    #[test]
    fn test_seven_hashes_is_a_paragraph() {
        assert_eq!(convert("####### x").content, vec![paragraph("####### x")]);
    }

    #[test]
    fn test_hash_without_space_is_a_paragraph() {
        assert_eq!(convert("#tag").content, vec![paragraph("#tag")]);
    }

    #[test]
    fn test_bullet_items_merge() {
        let doc = convert("- a\n- b");
        assert_eq!(
            doc.content,
            vec![BlockNode::BulletList {
                items: vec![vec![TextRun::plain("a")], vec![TextRun::plain("b")]],
            }]
        );
    }

    #[rstest]
    #[case::dash("- item")]
    #[case::asterisk("* item")]
    #[case::unicode_bullet("• item")]
    fn test_bullet_markers(#[case] input: &str) {
        assert_eq!(
            convert(input).content,
            vec![BlockNode::BulletList {
                items: vec![vec![TextRun::plain("item")]],
            }]
        );
    }

    #[test]
    fn test_ordered_items_merge_and_discard_markers() {
        let doc = convert("1. first\n7. second");
        assert_eq!(
            doc.content,
            vec![BlockNode::OrderedList {
                items: vec![vec![TextRun::plain("first")], vec![TextRun::plain("second")]],
            }]
        );
    }

    #[test]
    fn test_blank_line_does_not_close_a_list() {
        let doc = convert("- a\n\n- b");
        assert_eq!(
            doc.content,
            vec![BlockNode::BulletList {
                items: vec![vec![TextRun::plain("a")], vec![TextRun::plain("b")]],
            }]
        );
    }

    #[test]
    fn test_intervening_block_starts_a_new_list() {
        let doc = convert("- a\ntext\n- b");
        assert_eq!(
            doc.content,
            vec![
                BlockNode::BulletList {
                    items: vec![vec![TextRun::plain("a")]],
                },
                paragraph("text"),
                BlockNode::BulletList {
                    items: vec![vec![TextRun::plain("b")]],
                },
            ]
        );
    }

    #[test]
    fn test_bullet_and_ordered_stay_separate() {
        let doc = convert("- a\n1. b");
        assert_eq!(
            doc.content,
            vec![
                BlockNode::BulletList {
                    items: vec![vec![TextRun::plain("a")]],
                },
                BlockNode::OrderedList {
                    items: vec![vec![TextRun::plain("b")]],
                },
            ]
        );
    }

    #[test]
    fn test_code_block_with_language() {
        let doc = convert("```js\ncode()\n```");
        assert_eq!(
            doc.content,
            vec![BlockNode::CodeBlock {
                language: Some("js".to_string()),
                code: "code()".to_string(),
            }]
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let doc = convert("```\nx\ny\n```");
        assert_eq!(
            doc.content,
            vec![BlockNode::CodeBlock {
                language: None,
                code: "x\ny".to_string(),
            }]
        );
    }

    #[test]
    fn test_unterminated_fence_flushes() {
        let doc = convert("```\nx");
        assert_eq!(
            doc.content,
            vec![BlockNode::CodeBlock {
                language: None,
                code: "x".to_string(),
            }]
        );
    }

    #[test]
    fn test_markup_inside_code_block_stays_raw() {
        let doc = convert("```\n**not bold**\n- not a list\n```");
        assert_eq!(
            doc.content,
            vec![BlockNode::CodeBlock {
                language: None,
                code: "**not bold**\n- not a list".to_string(),
            }]
        );
    }

    #[test]
    fn test_blank_lines_inside_code_block_are_kept() {
        let doc = convert("```\na\n\nb\n```");
        assert_eq!(
            doc.content,
            vec![BlockNode::CodeBlock {
                language: None,
                code: "a\n\nb".to_string(),
            }]
        );
    }

    #[test]
    fn test_consecutive_fences_reset_state() {
        let doc = convert("```js\na\n```\n```\nb\n```");
        assert_eq!(
            doc.content,
            vec![
                BlockNode::CodeBlock {
                    language: Some("js".to_string()),
                    code: "a".to_string(),
                },
                BlockNode::CodeBlock {
                    language: None,
                    code: "b".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_list_item_inline_markup() {
        let doc = convert("- **bold** item");
        assert_eq!(
            doc.content,
            vec![BlockNode::BulletList {
                items: vec![vec![
                    TextRun::marked("bold", Mark::Strong),
                    TextRun::plain(" item"),
                ]],
            }]
        );
    }

    #[test]
    fn test_heading_inline_markup() {
        let doc = convert("## The `frob` call");
        assert_eq!(
            doc.content,
            vec![BlockNode::Heading {
                level: 2,
                content: vec![
                    TextRun::plain("The "),
                    TextRun::marked("frob", Mark::Code),
                    TextRun::plain(" call"),
                ],
            }]
        );
    }

    #[test]
    fn test_paragraph_line_is_not_trimmed() {
        assert_eq!(convert("  indented").content, vec![paragraph("  indented")]);
    }
}
