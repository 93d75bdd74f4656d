//! Line-local document helpers.
//!
//! The structural engine lives in tsgen-resolve; this module covers the two
//! purely textual jobs the host keeps for itself: probing a cursor line for
//! the target declaration's name, and splicing a generated artifact back
//! into the original document.

use once_cell::sync::Lazy;
use regex::Regex;

/// `interface X` / `type X` headers. The probe is intentionally line-local;
/// structural resolution happens later against the parsed file.
static DECLARATION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:interface|type)\s+([A-Za-z_$][A-Za-z0-9_$]*)").unwrap());

/// Probe one 1-based line for a record declaration header.
pub fn declaration_name_at_line(text: &str, line: u32) -> Option<String> {
    let index = line.checked_sub(1)? as usize;
    let content = text.lines().nth(index)?;
    DECLARATION_HEADER
        .captures(content)
        .map(|captures| captures[1].to_string())
}

/// Splice `artifact` into `text` after the declaration ending at byte offset
/// `decl_end`, separated from the declaration by one blank line. The
/// insertion lands after the declaration's final line, so a trailing comment
/// on the closing-brace line stays attached to the declaration.
pub fn insert_after_declaration(text: &str, decl_end: usize, artifact: &str) -> String {
    let decl_end = decl_end.min(text.len());
    let line_end = text[decl_end..].find('\n').map(|offset| decl_end + offset + 1);

    let mut out = String::with_capacity(text.len() + artifact.len() + 2);
    match line_end {
        Some(boundary) => {
            out.push_str(&text[..boundary]);
            out.push('\n');
            out.push_str(artifact);
            let tail = &text[boundary..];
            if !tail.is_empty() && !tail.starts_with('\n') {
                out.push('\n');
            }
            out.push_str(tail);
        }
        None => {
            // The declaration closes the document without a trailing newline.
            out.push_str(text);
            out.push_str("\n\n");
            out.push_str(artifact);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_finds_interface_on_line() {
        let text = "import { A } from './a';\n\nexport interface PostProfile {\n    id: string;\n}\n";
        assert_eq!(
            declaration_name_at_line(text, 3),
            Some("PostProfile".to_string())
        );
    }

    #[test]
    fn test_probe_finds_type_alias() {
        let text = "export type _CardModel = Pick<Card, 'id'>;\n";
        assert_eq!(
            declaration_name_at_line(text, 1),
            Some("_CardModel".to_string())
        );
    }

    #[test]
    fn test_probe_misses_return_none() {
        let text = "const x = 1;\ninterface P { a: string; }\n";
        assert_eq!(declaration_name_at_line(text, 1), None);
        assert_eq!(declaration_name_at_line(text, 0), None);
        assert_eq!(declaration_name_at_line(text, 99), None);
    }

    #[test]
    fn test_insert_between_declarations() {
        let text = "interface Post {\n    id: string;\n}\nconst after = 1;\n";
        let decl_end = text.find('}').unwrap() + 1;
        let updated = insert_after_declaration(text, decl_end, "export class PostImpl {\n}\n");
        assert_eq!(
            updated,
            "interface Post {\n    id: string;\n}\n\nexport class PostImpl {\n}\n\nconst after = 1;\n"
        );
    }

    #[test]
    fn test_insert_at_end_without_trailing_newline() {
        let text = "interface Post {\n    id: string;\n}";
        let updated = insert_after_declaration(text, text.len(), "function createPost() {}\n");
        assert_eq!(
            updated,
            "interface Post {\n    id: string;\n}\n\nfunction createPost() {}\n"
        );
    }

    #[test]
    fn test_insert_after_alias_semicolon() {
        let text = "type P = { a: string };\n\ntype Q = { b: string };\n";
        let decl_end = text.find(';').unwrap() + 1;
        let updated = insert_after_declaration(text, decl_end, "artifact\n");
        assert_eq!(
            updated,
            "type P = { a: string };\n\nartifact\n\ntype Q = { b: string };\n"
        );
    }

    #[test]
    fn test_insert_keeps_trailing_comment_with_declaration() {
        let text = "interface P {\n} // end of P\nrest\n";
        let decl_end = text.find('}').unwrap() + 1;
        let updated = insert_after_declaration(text, decl_end, "artifact\n");
        assert_eq!(updated, "interface P {\n} // end of P\n\nartifact\n\nrest\n");
    }
}
