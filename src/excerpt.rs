//! Short plain-text previews of markdown bodies.

use regex::Regex;
use std::sync::LazyLock;

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap());
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());
static BLOCKQUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^>\s?").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]*)`").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Removes images, heading and blockquote markers, emphasis and code spans,
/// then collapses whitespace.
pub fn strip_markdown(body: &str) -> String {
    let text = IMAGE_RE.replace_all(body, "");
    let text = HEADING_RE.replace_all(&text, "");
    let text = BLOCKQUOTE_RE.replace_all(&text, "");
    let text = BOLD_RE.replace_all(&text, "${1}");
    let text = ITALIC_RE.replace_all(&text, "${1}");
    let text = CODE_RE.replace_all(&text, "${1}");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Splits after `.`, `!` or `?` wherever whitespace follows.
///
/// Punctuation stays with its sentence; the whitespace run is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            sentences.push(&text[start..idx]);
            let mut end = idx + c.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = next_idx + next.len_utf8();
                chars.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(c);
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// First `max_sentences` sentences of the cleaned body, space separated.
pub fn derive_excerpt(body: &str, max_sentences: usize) -> String {
    let cleaned = strip_markdown(body);
    if cleaned.is_empty() {
        return String::new();
    }
    split_sentences(&cleaned)
        .into_iter()
        .take(max_sentences)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sentences() {
        let body = "First sentence here. Second one too. Third ignored.";
        assert_eq!(
            derive_excerpt(body, 2),
            "First sentence here. Second one too."
        );
        assert_eq!(derive_excerpt(body, 1), "First sentence here.");
    }

    #[test]
    fn test_image_and_bold() {
        let body = "![alt](./img.png)\nSome **bold** text.";
        assert_eq!(derive_excerpt(body, 2), "Some bold text.");
    }

    #[test]
    fn test_strip_markdown() {
        let body = "## Heading\n\n> quoted *words* and `code`\n>tight\n\n###### Six";
        assert_eq!(
            strip_markdown(body),
            "Heading quoted words and code tight Six"
        );
    }

    #[test]
    fn test_heading_needs_space() {
        assert_eq!(strip_markdown("#hashtag stays"), "#hashtag stays");
        assert_eq!(strip_markdown("####### seven"), "####### seven");
    }

    #[test]
    fn test_emphasis_does_not_cross_lines() {
        assert_eq!(strip_markdown("a *b\nc* d"), "a *b c* d");
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(derive_excerpt("", 2), "");
        assert_eq!(derive_excerpt("   \n\t", 2), "");
        assert_eq!(derive_excerpt("![only](img.png)", 1), "");
    }

    #[test]
    fn test_no_terminal_punctuation() {
        assert_eq!(
            derive_excerpt("just some words\nwithout an end", 2),
            "just some words without an end"
        );
    }

    #[test]
    fn test_fewer_sentences_than_requested() {
        assert_eq!(derive_excerpt("Only one!", 2), "Only one!");
    }

    #[test]
    fn test_zero_sentences() {
        assert_eq!(derive_excerpt("One. Two.", 0), "");
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("Wait! Really?  Yes.\nok"),
            vec!["Wait!", "Really?", "Yes.", "ok"]
        );
        assert_eq!(split_sentences("v1.2 is out"), vec!["v1.2 is out"]);
        assert_eq!(split_sentences("end. "), vec!["end."]);
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn test_excerpt_is_idempotent() {
        let body = "# Title\n\nHello there. How are you? Fine.";
        let once = derive_excerpt(body, 2);
        assert_eq!(once, "Title Hello there. How are you?");
        assert_eq!(derive_excerpt(&once, 2), once);
    }
}
