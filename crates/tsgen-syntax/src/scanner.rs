//! Tokenizer for the declaration subset.
//!
//! The scanner produces a flat token stream over the whole source text. It
//! knows nothing about declarations; it only classifies identifiers, string
//! literals, numbers, and the punctuation the declaration parser cares about.
//! Comments and whitespace are skipped. Characters outside the subset become
//! `Unknown` tokens so the parser can step over arbitrary program text
//! (function bodies, expressions) without ever failing.

use tsgen_common::Span;

/// Token kinds produced by the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    /// Identifier or keyword (keywords are classified by the parser)
    Identifier,
    /// `'...'`, `"..."`, or `` `...` `` literal
    StringLiteral,
    /// Numeric literal
    NumericLiteral,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    LessThan,
    GreaterThan,
    Comma,
    Semicolon,
    Colon,
    Question,
    Dot,
    Pipe,
    Ampersand,
    Equals,
    /// `=>` (scanned as one token so `>` depth tracking stays balanced)
    Arrow,
    /// Any character the subset does not classify
    Unknown,
    EndOfFile,
}

/// A single token: kind plus the byte span of its text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: Span,
}

impl Token {
    /// Slice this token's text out of the source.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }
}

/// Scan the whole source into a token vector, terminated by `EndOfFile`.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token();
        let done = token.kind == SyntaxKind::EndOfFile;
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

/// Unquote a string-literal token and process the simple escapes.
///
/// Handles `\'`, `\"`, `` \` `` and `\\`; other escapes are kept verbatim.
pub fn string_value(token: &Token, source: &str) -> String {
    let raw = token.text(source);
    let inner = raw
        .strip_prefix(['\'', '"', '`'])
        .unwrap_or(raw)
        .strip_suffix(['\'', '"', '`'])
        .unwrap_or(raw);
    if !inner.contains('\\') {
        return inner.to_string();
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(next @ ('\'' | '"' | '`' | '\\')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_trivia();
        let start = self.pos;
        let Some(byte) = self.peek() else {
            return self.token(SyntaxKind::EndOfFile, start);
        };

        let kind = match byte {
            b'{' => self.single(SyntaxKind::OpenBrace),
            b'}' => self.single(SyntaxKind::CloseBrace),
            b'(' => self.single(SyntaxKind::OpenParen),
            b')' => self.single(SyntaxKind::CloseParen),
            b'[' => self.single(SyntaxKind::OpenBracket),
            b']' => self.single(SyntaxKind::CloseBracket),
            b'<' => self.single(SyntaxKind::LessThan),
            b'>' => self.single(SyntaxKind::GreaterThan),
            b',' => self.single(SyntaxKind::Comma),
            b';' => self.single(SyntaxKind::Semicolon),
            b':' => self.single(SyntaxKind::Colon),
            b'?' => self.single(SyntaxKind::Question),
            b'.' => self.single(SyntaxKind::Dot),
            b'|' => self.single(SyntaxKind::Pipe),
            b'&' => self.single(SyntaxKind::Ampersand),
            b'=' => {
                self.pos += 1;
                if self.peek() == Some(b'>') {
                    self.pos += 1;
                    SyntaxKind::Arrow
                } else {
                    SyntaxKind::Equals
                }
            }
            b'\'' | b'"' | b'`' => {
                self.scan_string(byte);
                SyntaxKind::StringLiteral
            }
            b'0'..=b'9' => {
                self.scan_number();
                SyntaxKind::NumericLiteral
            }
            _ if is_identifier_start(self.current_char()) => {
                self.scan_identifier();
                SyntaxKind::Identifier
            }
            _ => {
                self.bump_char();
                SyntaxKind::Unknown
            }
        };
        self.token(kind, start)
    }

    fn token(&self, kind: SyntaxKind, start: usize) -> Token {
        Token {
            kind,
            span: Span::new(start as u32, self.pos as u32),
        }
    }

    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn current_char(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    fn bump_char(&mut self) {
        let ch = self.current_char();
        self.pos += ch.len_utf8().max(1);
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => self.pos += 1,
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(byte) = self.peek() {
                        if byte == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.pos += 2;
                    while let Some(byte) = self.peek() {
                        if byte == b'*' && self.peek_at(1) == Some(b'/') {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    /// Scan a quoted string. Unterminated strings end at the line break (or
    /// EOF for template literals) so a typo never swallows the rest of the
    /// file.
    fn scan_string(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(byte) = self.peek() {
            match byte {
                b'\\' => {
                    self.pos += 1;
                    if self.peek().is_some() {
                        self.bump_char();
                    }
                }
                b'\n' if quote != b'`' => break,
                _ if byte == quote => {
                    self.pos += 1;
                    break;
                }
                _ => self.bump_char(),
            }
        }
    }

    fn scan_number(&mut self) {
        while let Some(byte) = self.peek() {
            match byte {
                b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' | b'x' | b'X' | b'o' | b'O' | b'_'
                | b'.' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn scan_identifier(&mut self) {
        while self.pos < self.bytes.len() {
            let ch = self.current_char();
            if is_identifier_part(ch) {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        tokenize(source).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_scans_declaration_punctuation() {
        assert_eq!(
            kinds("interface X { a?: string; }"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Identifier,
                SyntaxKind::OpenBrace,
                SyntaxKind::Identifier,
                SyntaxKind::Question,
                SyntaxKind::Colon,
                SyntaxKind::Identifier,
                SyntaxKind::Semicolon,
                SyntaxKind::CloseBrace,
                SyntaxKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_arrow_is_one_token() {
        assert_eq!(
            kinds("() => void"),
            vec![
                SyntaxKind::OpenParen,
                SyntaxKind::CloseParen,
                SyntaxKind::Arrow,
                SyntaxKind::Identifier,
                SyntaxKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_comments_are_trivia() {
        assert_eq!(
            kinds("a // line\n/* block\nmore */ b"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Identifier,
                SyntaxKind::EndOfFile
            ]
        );
    }

    #[test]
    fn test_string_values() {
        let source = r#"'abc' "d\"e" `tpl`"#;
        let tokens = tokenize(source);
        assert_eq!(string_value(&tokens[0], source), "abc");
        assert_eq!(string_value(&tokens[1], source), "d\"e");
        assert_eq!(string_value(&tokens[2], source), "tpl");
    }

    #[test]
    fn test_unterminated_string_stops_at_line_end() {
        let tokens = tokenize("'oops\nnext");
        assert_eq!(tokens[0].kind, SyntaxKind::StringLiteral);
        assert_eq!(tokens[1].kind, SyntaxKind::Identifier);
        assert_eq!(tokens[1].text("'oops\nnext"), "next");
    }

    #[test]
    fn test_unknown_character_is_single_token() {
        assert_eq!(
            kinds("a @ b"),
            vec![
                SyntaxKind::Identifier,
                SyntaxKind::Unknown,
                SyntaxKind::Identifier,
                SyntaxKind::EndOfFile
            ]
        );
    }

    #[test]
    fn test_non_ascii_identifier_stays_one_token() {
        let source = "interface Pöst {}";
        let tokens = tokenize(source);
        assert_eq!(tokens[1].kind, SyntaxKind::Identifier);
        assert_eq!(tokens[1].text(source), "Pöst");
    }
}
