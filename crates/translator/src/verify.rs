//! Checks that translation left fenced code blocks untouched.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};

/// Contents of every fenced code block, in document order
pub fn fenced_code_blocks(markdown: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) => {
                current = Some(String::new());
            }
            Event::Text(text) => {
                if let Some(block) = current.as_mut() {
                    block.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
            }
            _ => {}
        }
    }

    blocks
}

/// Describe the first difference between the code blocks of two documents.
///
/// `None` when every block is byte-identical.
pub fn code_block_mismatch(source: &str, translated: &str) -> Option<String> {
    let expected = fenced_code_blocks(source);
    let actual = fenced_code_blocks(translated);

    if expected.len() != actual.len() {
        return Some(format!(
            "source has {} code block(s), translation has {}",
            expected.len(),
            actual.len()
        ));
    }

    expected
        .iter()
        .zip(&actual)
        .position(|(a, b)| a != b)
        .map(|i| format!("code block {} differs from the source", i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "# Title\n\nSome `inline` text.\n\n```rust\nfn main() {}\n```\n\n    indented\n\n~~~\nplain\n~~~\n";

    #[test]
    fn test_collects_fenced_blocks_only() {
        assert_eq!(
            fenced_code_blocks(SOURCE),
            vec!["fn main() {}\n".to_string(), "plain\n".to_string()]
        );
    }

    #[test]
    fn test_identical_blocks_pass() {
        let translated = SOURCE.replace("Title", "タイトル").replace("Some", "いくつかの");
        assert_eq!(code_block_mismatch(SOURCE, &translated), None);
    }

    #[test]
    fn test_changed_block_is_reported() {
        let translated = SOURCE.replace("fn main() {}", "fn メイン() {}");
        assert_eq!(
            code_block_mismatch(SOURCE, &translated).as_deref(),
            Some("code block 1 differs from the source")
        );
    }

    #[test]
    fn test_dropped_block_is_reported() {
        let translated = "# Title\n\n```rust\nfn main() {}\n```\n";
        assert!(
            code_block_mismatch(SOURCE, translated)
                .unwrap()
                .contains("source has 2 code block(s), translation has 1")
        );
    }
}
