//! Declaration-level parser.
//!
//! Parses one source file into its `SourceFile` view: import specifiers and
//! record-like declarations. Everything else - classes, functions, statements,
//! expression bodies - is stepped over by token, with brace depth tracking so
//! only top-level declarations are recognized. The parser never fails: a
//! malformed region degrades to opaque text or is skipped, and whatever was
//! readable is kept.

use crate::ast::{
    DeclKind, ImportDecl, ModifierFlags, PropertySig, RecordDecl, SourceFile, TypeNode,
};
use crate::scanner::{self, SyntaxKind, Token};
use std::path::PathBuf;
use tracing::trace;
use tsgen_common::Span;

/// Parse source text into its declaration-level view.
pub fn parse_source(path: impl Into<PathBuf>, text: String) -> SourceFile {
    let (imports, declarations) = {
        let tokens = scanner::tokenize(&text);
        let mut parser = Parser::new(&text, tokens);
        parser.parse_file();
        (parser.imports, parser.declarations)
    };
    SourceFile {
        path: path.into(),
        text,
        imports,
        declarations,
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    imports: Vec<ImportDecl>,
    declarations: Vec<RecordDecl>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: Vec<Token>) -> Parser<'a> {
        Parser {
            source,
            tokens,
            pos: 0,
            imports: Vec::new(),
            declarations: Vec::new(),
        }
    }

    // =========================================================================
    // Token access
    // =========================================================================

    fn current(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self, offset: usize) -> SyntaxKind {
        self.tokens[(self.pos + offset).min(self.tokens.len() - 1)].kind
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current().kind == kind
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.at(SyntaxKind::Identifier) && self.current().text(self.source) == keyword
    }

    fn token_text_is(&self, text: &str) -> bool {
        self.current().text(self.source) == text
    }

    fn bump(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// End offset of the most recently consumed token.
    fn prev_end(&self) -> u32 {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    // =========================================================================
    // File loop
    // =========================================================================

    fn parse_file(&mut self) {
        let mut brace_depth = 0u32;
        while !self.at(SyntaxKind::EndOfFile) {
            if brace_depth == 0 {
                if self.at_keyword("import") {
                    self.parse_import();
                    continue;
                }
                if (self.at_keyword("export")
                    || self.at_keyword("declare")
                    || self.at_keyword("interface")
                    || self.at_keyword("type"))
                    && self.try_parse_declaration()
                {
                    continue;
                }
            }
            match self.current().kind {
                SyntaxKind::OpenBrace => brace_depth += 1,
                SyntaxKind::CloseBrace => brace_depth = brace_depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
        }
    }

    /// Recognize `export? declare? (interface | type) Name ...` at top level,
    /// or an `export ... from '...'` re-export that contributes an import
    /// specifier. Returns false without consuming anything otherwise.
    fn try_parse_declaration(&mut self) -> bool {
        let start_pos = self.pos;
        let start_offset = self.current().span.start;
        let mut flags = ModifierFlags::default();
        loop {
            if self.at_keyword("export") {
                flags |= ModifierFlags::EXPORT;
                self.bump();
            } else if self.at_keyword("declare") {
                flags |= ModifierFlags::DECLARE;
                self.bump();
            } else {
                break;
            }
        }
        if self.at_keyword("interface") && self.peek_kind(1) == SyntaxKind::Identifier {
            self.parse_interface(flags, start_offset);
            return true;
        }
        if self.at_keyword("type")
            && self.peek_kind(1) == SyntaxKind::Identifier
            && matches!(
                self.peek_kind(2),
                SyntaxKind::Equals | SyntaxKind::LessThan
            )
        {
            self.parse_type_alias(flags, start_offset);
            return true;
        }
        self.pos = start_pos;
        if self.at_keyword("export") {
            return self.try_parse_reexport();
        }
        false
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn parse_import(&mut self) {
        self.bump(); // `import`

        // Side-effect import: `import './styles.css'`
        if self.at(SyntaxKind::StringLiteral) {
            self.record_import();
            self.eat(SyntaxKind::Semicolon);
            return;
        }

        // `import type { ... }` - the modifier is transparent here
        if self.at_keyword("type")
            && matches!(self.peek_kind(1), SyntaxKind::OpenBrace | SyntaxKind::Identifier)
        {
            self.bump();
        }

        // Walk the import clause until `from '...'` or the statement ends.
        loop {
            if self.at_keyword("from") && self.peek_kind(1) == SyntaxKind::StringLiteral {
                self.bump();
                self.record_import();
                self.eat(SyntaxKind::Semicolon);
                return;
            }
            match self.current().kind {
                SyntaxKind::OpenBrace => self.skip_balanced(SyntaxKind::OpenBrace, SyntaxKind::CloseBrace),
                SyntaxKind::Semicolon => {
                    self.bump();
                    return;
                }
                SyntaxKind::EndOfFile => return,
                SyntaxKind::Identifier if self.at_statement_keyword() => return,
                _ => self.bump(),
            }
        }
    }

    /// `export * from '...'` / `export { a, b as c } from '...'`.
    fn try_parse_reexport(&mut self) -> bool {
        let start_pos = self.pos;
        self.bump(); // `export`

        let clause_ok = if self.token_text_is("*") {
            self.bump();
            if self.at_keyword("as") {
                self.bump();
                self.eat(SyntaxKind::Identifier);
            }
            true
        } else if self.at(SyntaxKind::OpenBrace) {
            self.skip_balanced(SyntaxKind::OpenBrace, SyntaxKind::CloseBrace);
            true
        } else {
            false
        };

        if clause_ok && self.at_keyword("from") && self.peek_kind(1) == SyntaxKind::StringLiteral {
            self.bump();
            self.record_import();
            self.eat(SyntaxKind::Semicolon);
            return true;
        }
        self.pos = start_pos;
        false
    }

    fn record_import(&mut self) {
        let token = self.current();
        self.imports.push(ImportDecl {
            specifier: scanner::string_value(&token, self.source),
            span: token.span,
        });
        self.bump();
    }

    fn at_statement_keyword(&self) -> bool {
        matches!(
            self.current().text(self.source),
            "import"
                | "export"
                | "interface"
                | "class"
                | "function"
                | "const"
                | "let"
                | "var"
                | "enum"
                | "declare"
        )
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_interface(&mut self, modifiers: ModifierFlags, start: u32) {
        self.bump(); // `interface`
        let name = self.current().text(self.source).to_string();
        self.bump();

        let mut has_type_params = false;
        if self.at(SyntaxKind::LessThan) {
            has_type_params = true;
            self.skip_balanced(SyntaxKind::LessThan, SyntaxKind::GreaterThan);
        }

        let mut heritage = Vec::new();
        if self.at_keyword("extends") {
            self.bump();
            loop {
                heritage.push(self.parse_type());
                if !self.eat(SyntaxKind::Comma) {
                    break;
                }
            }
        }

        let mut members = Vec::new();
        let mut end = self.prev_end();
        if self.at(SyntaxKind::OpenBrace) {
            let (parsed, body_end) = self.parse_object_members();
            members = parsed;
            end = body_end;
        } else {
            trace!(name = %name, "interface without a body; recording empty member list");
        }

        self.declarations.push(RecordDecl {
            name,
            kind: DeclKind::Interface,
            modifiers,
            members,
            heritage,
            alias_type: None,
            has_type_params,
            span: Span::new(start, end),
        });
    }

    fn parse_type_alias(&mut self, modifiers: ModifierFlags, start: u32) {
        self.bump(); // `type`
        let name = self.current().text(self.source).to_string();
        self.bump();

        let mut has_type_params = false;
        if self.at(SyntaxKind::LessThan) {
            has_type_params = true;
            self.skip_balanced(SyntaxKind::LessThan, SyntaxKind::GreaterThan);
        }

        if !self.eat(SyntaxKind::Equals) {
            // `type X` with no `=` is not a record alias; leave the rest to
            // the file loop.
            return;
        }
        let alias_type = self.parse_type();
        self.eat(SyntaxKind::Semicolon);

        self.declarations.push(RecordDecl {
            name,
            kind: DeclKind::TypeAlias,
            modifiers,
            members: Vec::new(),
            heritage: Vec::new(),
            alias_type: Some(alias_type),
            has_type_params,
            span: Span::new(start, self.prev_end()),
        });
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Parse `{ member; member; ... }`; current token must be `{`. Returns the
    /// members and the end offset of the closing brace (or EOF).
    fn parse_object_members(&mut self) -> (Vec<PropertySig>, u32) {
        self.bump(); // `{`
        let mut members = Vec::new();
        loop {
            while self.eat(SyntaxKind::Semicolon) || self.eat(SyntaxKind::Comma) {}
            if self.at(SyntaxKind::CloseBrace) {
                let end = self.current().span.end;
                self.bump();
                return (members, end);
            }
            if self.at(SyntaxKind::EndOfFile) {
                trace!("unterminated body; keeping members parsed so far");
                return (members, self.current().span.end);
            }
            if let Some(member) = self.parse_member() {
                members.push(member);
            }
        }
    }

    /// Parse one member. Returns None for non-property members (methods,
    /// index/call signatures, computed keys), which are skipped whole.
    fn parse_member(&mut self) -> Option<PropertySig> {
        let start = self.current().span.start;

        let mut is_readonly = false;
        if self.at_keyword("readonly")
            && matches!(
                self.peek_kind(1),
                SyntaxKind::Identifier
                    | SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::OpenBracket
            )
        {
            is_readonly = true;
            self.bump();
        }

        let name = match self.current().kind {
            SyntaxKind::Identifier | SyntaxKind::NumericLiteral => {
                let text = self.current().text(self.source).to_string();
                self.bump();
                text
            }
            SyntaxKind::StringLiteral => {
                let token = self.current();
                let value = scanner::string_value(&token, self.source);
                self.bump();
                value
            }
            _ => {
                // Index signature, computed key, or stray tokens.
                self.skip_member_tail();
                self.eat_separator();
                return None;
            }
        };

        // Method signatures are not fields.
        if matches!(self.current().kind, SyntaxKind::OpenParen | SyntaxKind::LessThan) {
            trace!(member = %name, "skipping non-property member");
            self.skip_member_tail();
            self.eat_separator();
            return None;
        }

        let is_optional = self.eat(SyntaxKind::Question);
        let mut type_node = None;
        if self.eat(SyntaxKind::Colon) {
            let mut node = self.parse_type();
            // If the type did not consume up to the member boundary (e.g. a
            // conditional type), widen it to opaque text covering the rest.
            if !self.at_member_boundary() {
                let widen_from = node.span().start;
                self.skip_member_tail();
                node = TypeNode::Opaque {
                    span: Span::new(widen_from, self.prev_end()),
                };
            }
            type_node = Some(node);
        } else if !self.at_member_boundary() {
            self.skip_member_tail();
        }

        Some(PropertySig {
            name,
            type_node,
            is_optional,
            is_readonly,
            span: Span::new(start, self.prev_end()),
        })
    }

    fn at_member_boundary(&self) -> bool {
        matches!(
            self.current().kind,
            SyntaxKind::Semicolon
                | SyntaxKind::Comma
                | SyntaxKind::CloseBrace
                | SyntaxKind::EndOfFile
        )
    }

    fn eat_separator(&mut self) {
        if !self.eat(SyntaxKind::Semicolon) {
            self.eat(SyntaxKind::Comma);
        }
    }

    /// Skip to the end of the current member: stops before a separator or the
    /// body's closing brace, balancing nested brackets along the way.
    fn skip_member_tail(&mut self) {
        let mut brace = 0usize;
        let mut paren = 0usize;
        let mut bracket = 0usize;
        let mut angle = 0usize;
        loop {
            match self.current().kind {
                SyntaxKind::EndOfFile => return,
                SyntaxKind::OpenBrace => brace += 1,
                SyntaxKind::CloseBrace => {
                    if brace == 0 {
                        return;
                    }
                    brace -= 1;
                }
                SyntaxKind::OpenParen => paren += 1,
                SyntaxKind::CloseParen => paren = paren.saturating_sub(1),
                SyntaxKind::OpenBracket => bracket += 1,
                SyntaxKind::CloseBracket => bracket = bracket.saturating_sub(1),
                SyntaxKind::LessThan => angle += 1,
                SyntaxKind::GreaterThan => angle = angle.saturating_sub(1),
                SyntaxKind::Semicolon | SyntaxKind::Comma
                    if brace == 0 && paren == 0 && bracket == 0 && angle == 0 =>
                {
                    return;
                }
                _ => {}
            }
            self.bump();
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type(&mut self) -> TypeNode {
        // Permit the leading `|` of a multiline union.
        self.eat(SyntaxKind::Pipe);
        let start = self.current().span.start;
        let first = self.parse_intersection_or_higher();
        if !self.at(SyntaxKind::Pipe) {
            return first;
        }
        let mut members = vec![first];
        while self.eat(SyntaxKind::Pipe) {
            members.push(self.parse_intersection_or_higher());
        }
        TypeNode::Union {
            members,
            span: Span::new(start, self.prev_end()),
        }
    }

    fn parse_intersection_or_higher(&mut self) -> TypeNode {
        let start = self.current().span.start;
        let first = self.parse_postfix();
        if !self.at(SyntaxKind::Ampersand) {
            return first;
        }
        // Intersections are not modeled structurally.
        while self.eat(SyntaxKind::Ampersand) {
            let _ = self.parse_postfix();
        }
        TypeNode::Opaque {
            span: Span::new(start, self.prev_end()),
        }
    }

    fn parse_postfix(&mut self) -> TypeNode {
        let start = self.current().span.start;
        let mut node = self.parse_primary();
        loop {
            if self.at(SyntaxKind::OpenBracket) && self.peek_kind(1) == SyntaxKind::CloseBracket {
                self.bump();
                self.bump();
                node = TypeNode::Array {
                    element: Box::new(node),
                    span: Span::new(start, self.prev_end()),
                };
            } else if self.at(SyntaxKind::OpenBracket) {
                // Indexed access `T['k']` - opaque.
                self.skip_balanced(SyntaxKind::OpenBracket, SyntaxKind::CloseBracket);
                node = TypeNode::Opaque {
                    span: Span::new(start, self.prev_end()),
                };
            } else {
                return node;
            }
        }
    }

    fn parse_primary(&mut self) -> TypeNode {
        let token = self.current();
        match token.kind {
            SyntaxKind::Identifier => {
                let start = token.span.start;
                let name = self.parse_entity_name();
                let mut type_args = Vec::new();
                if self.at(SyntaxKind::LessThan) {
                    type_args = self.parse_type_arguments();
                }
                TypeNode::Reference {
                    name,
                    type_args,
                    span: Span::new(start, self.prev_end()),
                }
            }
            SyntaxKind::StringLiteral => {
                let value = scanner::string_value(&token, self.source);
                self.bump();
                TypeNode::StringLiteral {
                    value,
                    span: token.span,
                }
            }
            SyntaxKind::NumericLiteral => {
                self.bump();
                TypeNode::Opaque { span: token.span }
            }
            SyntaxKind::OpenBrace => {
                let start = token.span.start;
                let (members, end) = self.parse_object_members();
                TypeNode::ObjectLiteral {
                    members,
                    span: Span::new(start, end),
                }
            }
            SyntaxKind::OpenParen => self.parse_paren_or_function_type(),
            _ => self.parse_opaque_run(token.span.start),
        }
    }

    fn parse_entity_name(&mut self) -> String {
        let mut name = self.current().text(self.source).to_string();
        self.bump();
        while self.at(SyntaxKind::Dot) && self.peek_kind(1) == SyntaxKind::Identifier {
            self.bump();
            name.push('.');
            name.push_str(self.current().text(self.source));
            self.bump();
        }
        name
    }

    fn parse_type_arguments(&mut self) -> Vec<TypeNode> {
        self.bump(); // `<`
        let mut args = Vec::new();
        while !self.at(SyntaxKind::GreaterThan) && !self.at(SyntaxKind::EndOfFile) {
            let before = self.pos;
            args.push(self.parse_type());
            if !self.eat(SyntaxKind::Comma) && self.pos == before {
                // Malformed argument made no progress; drop the stray token.
                self.bump();
            }
        }
        self.eat(SyntaxKind::GreaterThan);
        args
    }

    /// `(...)` in type position: a parenthesized type keeps its inner
    /// structure; a function type is captured opaquely.
    fn parse_paren_or_function_type(&mut self) -> TypeNode {
        let start = self.current().span.start;
        let reset = self.pos;
        self.bump(); // `(`
        let inner = self.parse_type();
        if self.eat(SyntaxKind::CloseParen) {
            if self.at(SyntaxKind::Arrow) {
                self.bump();
                let _ = self.parse_type();
                return TypeNode::Opaque {
                    span: Span::new(start, self.prev_end()),
                };
            }
            return inner;
        }
        // Function-type parameter list (or worse); rewind and capture whole.
        self.pos = reset;
        self.skip_balanced(SyntaxKind::OpenParen, SyntaxKind::CloseParen);
        if self.eat(SyntaxKind::Arrow) {
            let _ = self.parse_type();
        }
        TypeNode::Opaque {
            span: Span::new(start, self.prev_end()),
        }
    }

    /// Consume a run of tokens that no structured rule claimed, up to the
    /// nearest type delimiter. Yields `Error` when the run is empty (a type
    /// was expected but a delimiter was already present).
    fn parse_opaque_run(&mut self, start: u32) -> TypeNode {
        let mut brace = 0usize;
        let mut paren = 0usize;
        let mut bracket = 0usize;
        let mut angle = 0usize;
        let mut consumed = false;
        loop {
            let balanced = brace == 0 && paren == 0 && bracket == 0 && angle == 0;
            match self.current().kind {
                SyntaxKind::EndOfFile => break,
                SyntaxKind::OpenBrace => brace += 1,
                SyntaxKind::CloseBrace => {
                    if brace == 0 {
                        break;
                    }
                    brace -= 1;
                }
                SyntaxKind::OpenParen => paren += 1,
                SyntaxKind::CloseParen => {
                    if paren == 0 {
                        break;
                    }
                    paren -= 1;
                }
                SyntaxKind::OpenBracket => bracket += 1,
                SyntaxKind::CloseBracket => {
                    if bracket == 0 {
                        break;
                    }
                    bracket -= 1;
                }
                SyntaxKind::LessThan => angle += 1,
                SyntaxKind::GreaterThan => {
                    if angle == 0 {
                        break;
                    }
                    angle -= 1;
                }
                SyntaxKind::Comma
                | SyntaxKind::Semicolon
                | SyntaxKind::Pipe
                | SyntaxKind::Ampersand
                | SyntaxKind::Equals
                    if balanced =>
                {
                    break;
                }
                _ => {}
            }
            self.bump();
            consumed = true;
        }
        if !consumed {
            return TypeNode::Error {
                span: Span::empty(start),
            };
        }
        TypeNode::Opaque {
            span: Span::new(start, self.prev_end()),
        }
    }

    /// Skip a balanced `open ... close` group; current token must be `open`.
    fn skip_balanced(&mut self, open: SyntaxKind, close: SyntaxKind) {
        let mut depth = 0usize;
        while !self.at(SyntaxKind::EndOfFile) {
            let kind = self.current().kind;
            self.bump();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
        }
    }
}
