// Metadata tag extraction
//
// Examples carry their page title and navigation category in doc-comment
// tags such as `@title PBR Base` and `@category Material`. This is a narrow
// text search, not a comment parser.

use crate::error::{Error, Result};

/// Tag holding the page title
pub const TITLE_TAG: &str = "title";
/// Tag holding the navigation category
pub const CATEGORY_TAG: &str = "category";

/// Required metadata of one example
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub category: String,
}

/// Extract title and category from an example's text.
///
/// `file` only names the example in the error when a tag is missing.
pub fn extract(file: &str, text: &str) -> Result<Metadata> {
    let title = find_tag(text, TITLE_TAG).ok_or_else(|| Error::missing_metadata(file, TITLE_TAG))?;
    let category =
        find_tag(text, CATEGORY_TAG).ok_or_else(|| Error::missing_metadata(file, CATEGORY_TAG))?;

    Ok(Metadata { title, category })
}

/// Find the value of the first usable `@<tag>` marker.
///
/// The marker must be followed by whitespace. The value runs to the end of
/// its line and stops after the last word character on it, so trailing
/// punctuation such as a closing `*/` is dropped.
pub fn find_tag(text: &str, tag: &str) -> Option<String> {
    let marker = format!("@{}", tag);

    for (idx, _) in text.match_indices(marker.as_str()) {
        let rest = &text[idx + marker.len()..];
        let value_start = rest.trim_start();
        if value_start.len() == rest.len() {
            // `@titles`, `@title:` and friends
            continue;
        }

        let line_end = value_start
            .find(is_line_terminator)
            .unwrap_or(value_start.len());
        let line = &value_start[..line_end];

        if let Some((pos, ch)) = line.char_indices().rev().find(|&(_, c)| is_word_char(c)) {
            let value = line[..pos + ch.len_utf8()].trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    None
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;

    const PBR_BASE: &str = "/**\n * @title PBR Base\n * @category Material\n */\nimport { WebGLEngine } from \"@galacean/engine\";\n";

    #[test]
    fn test_extract_doc_comment() {
        let meta = extract("pbr-base.ts", PBR_BASE).unwrap();
        assert_eq!(meta.title, "PBR Base");
        assert_eq!(meta.category, "Material");
    }

    #[test]
    fn test_extract_missing_category() {
        let err = extract("c.ts", "/** @title Baz */").unwrap_err();
        match err {
            Error::MissingMetadata { file, field } => {
                assert_eq!(file, "c.ts");
                assert_eq!(field, CATEGORY_TAG);
            }
            other => panic!("Expected MissingMetadata, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_missing_title() {
        let err = extract("d.ts", "// @category Basic\n").unwrap_err();
        assert!(matches!(err, Error::MissingMetadata { field: TITLE_TAG, .. }));
    }

    #[test]
    fn test_value_stops_at_last_word_boundary() {
        assert_eq!(find_tag("/** @title Foo Bar */", "title"), Some("Foo Bar".to_string()));
        assert_eq!(find_tag("// @title Foo!!!\n", "title"), Some("Foo".to_string()));
        assert_eq!(find_tag("@title Foo   \r\n", "title"), Some("Foo".to_string()));
    }

    #[test]
    fn test_value_keeps_inner_punctuation() {
        assert_eq!(
            find_tag(" * @title Physics - Raycast (basic)\n", "title"),
            Some("Physics - Raycast (basic".to_string())
        );
    }

    #[test]
    fn test_first_match_wins() {
        let text = "@title First\n@title Second\n";
        assert_eq!(find_tag(text, "title"), Some("First".to_string()));
    }

    #[test]
    fn test_marker_needs_whitespace() {
        assert_eq!(find_tag("@titles Nope\n", "title"), None);
        assert_eq!(find_tag("@title:Nope\n", "title"), None);
        assert_eq!(find_tag("@titles Nope\n@title Yes\n", "title"), Some("Yes".to_string()));
    }

    #[test]
    fn test_marker_without_value_falls_through() {
        assert_eq!(find_tag("@title !!!\n@title Real\n", "title"), Some("Real".to_string()));
        assert_eq!(find_tag("@title", "title"), None);
    }

    #[test]
    fn test_value_on_following_line() {
        assert_eq!(find_tag("@title\n  Next Line\n", "title"), Some("Next Line".to_string()));
    }

    #[test]
    fn test_non_ascii_value() {
        assert_eq!(find_tag(" * @title 多相机\n", "title"), Some("多相机".to_string()));
    }
}
