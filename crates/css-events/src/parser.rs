//! Recursive descent walker that turns tokens into structural events.

use crate::error::{ParseError, ParseErrorKind};
use crate::event::{
    BlockEvent, BlockKind, ImportEvent, PartKind, PropertyEvent, PropertyName, PropertyValue,
    StylesheetEvent, ValuePart,
};
use crate::lexer::{unquote, unwrap_url, Lexer, Token, TokenKind};
use crate::position::{LineIndex, Position, Span};
use crate::ParseResult;
use smol_str::SmolStr;
use text_size::TextSize;

/// The event parser.
pub struct Parser<'src> {
    /// The source being parsed.
    source: &'src str,
    /// Tokens, always terminated by `Eof`.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Offset to line/column conversion.
    line_index: LineIndex<'src>,
    /// Events emitted so far.
    events: Vec<StylesheetEvent>,
    /// Errors collected during parsing.
    errors: Vec<ParseError>,
    /// EOF token for when we're past the end
    eof_token: Token,
}

impl<'src> Parser<'src> {
    /// Creates a new parser.
    pub fn new(source: &'src str) -> Self {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        let eof_token = Token {
            kind: TokenKind::Eof,
            span: Span::empty(TextSize::from(source.len() as u32)),
        };
        Self {
            source,
            tokens,
            pos: 0,
            line_index: LineIndex::new(source),
            events: Vec::new(),
            errors: Vec::new(),
            eof_token,
        }
    }

    /// Walks the whole stylesheet.
    pub fn parse(mut self) -> ParseResult {
        self.parse_rule_list(false);
        ParseResult {
            events: self.events,
            errors: self.errors,
        }
    }

    // === Token helpers ===

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof_token)
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn text(&self, span: Span) -> &'src str {
        self.source
            .get(span.start_index()..span.end_index())
            .unwrap_or_default()
    }

    fn current_text(&self) -> &'src str {
        self.text(self.current().span)
    }

    fn current_position(&self) -> Position {
        self.line_index.position(self.current().span.start)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Records an error at the current token.
    fn error(&mut self, kind: ParseErrorKind) {
        let span = self.current().span;
        let position = self.line_index.position(span.start);
        self.errors.push(ParseError::new(kind, span, position));
    }

    fn unexpected(&mut self, expected: &str) {
        let found = if self.check(TokenKind::Eof) {
            TokenKind::Eof.name().to_string()
        } else {
            format!("'{}'", self.current_text())
        };
        self.error(ParseErrorKind::UnexpectedToken {
            expected: expected.to_string(),
            found,
        });
    }

    // === Recovery ===

    /// Skips to the end of the current declaration or statement. A `;` is
    /// consumed, a `}` is left for the enclosing block.
    fn skip_declaration(&mut self) {
        loop {
            match self.current_kind() {
                TokenKind::Eof | TokenKind::RBrace => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::LBrace => {
                    self.skip_block();
                    return;
                }
                _ => self.advance(),
            }
        }
    }

    /// Skips a balanced `{ ... }` starting at the current `{`.
    fn skip_block(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.current_kind() {
                TokenKind::Eof => return,
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    // === Blocks ===

    /// Collects the tokens before a `{` (selectors, media queries, names).
    fn collect_prelude(&mut self) -> String {
        let start = self.current().span;
        let mut end = None;
        while !matches!(
            self.current_kind(),
            TokenKind::LBrace | TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
        ) {
            end = Some(self.current().span);
            self.advance();
        }
        match end {
            Some(end) => self.text(start.cover(end)).to_string(),
            None => String::new(),
        }
    }

    /// Consumes the `{` that opens a block. On failure the statement is
    /// skipped and no events are emitted.
    fn open_block(&mut self) -> bool {
        if self.check(TokenKind::LBrace) {
            self.advance();
            return true;
        }
        self.unexpected("'{'");
        if self.check(TokenKind::Semicolon) {
            self.advance();
        }
        false
    }

    fn start_block(&mut self, kind: BlockKind, prelude: String, position: Position) {
        self.events.push(StylesheetEvent::StartBlock(BlockEvent {
            kind,
            prelude,
            position,
        }));
    }

    /// Consumes the closing `}` and emits the end event. The end event is
    /// emitted even when the input ends first.
    fn close_block(&mut self, kind: BlockKind) {
        let position = self.current_position();
        if self.check(TokenKind::RBrace) {
            self.advance();
        } else {
            self.error(ParseErrorKind::UnexpectedEof {
                expected: "'}'".to_string(),
            });
        }
        self.events.push(StylesheetEvent::EndBlock(BlockEvent {
            kind,
            prelude: String::new(),
            position,
        }));
    }

    /// Parses rules until `}` (when nested) or the end of input.
    fn parse_rule_list(&mut self, nested: bool) {
        loop {
            match self.current_kind() {
                TokenKind::Eof => return,
                TokenKind::RBrace if nested => return,
                TokenKind::RBrace => {
                    self.unexpected("a rule");
                    self.advance();
                }
                TokenKind::Semicolon => self.advance(),
                TokenKind::AtKeyword => self.parse_at_rule(),
                _ => self.parse_style_rule(),
            }
        }
    }

    fn parse_style_rule(&mut self) {
        let position = self.current_position();
        let prelude = self.collect_prelude();
        if !self.open_block() {
            return;
        }
        self.start_block(BlockKind::Rule, prelude, position);
        self.parse_declarations(false);
        self.close_block(BlockKind::Rule);
    }

    fn parse_at_rule(&mut self) {
        let position = self.current_position();
        let keyword = self.current_text().to_ascii_lowercase();

        match keyword.as_str() {
            "@import" => self.parse_import(position),
            "@charset" | "@namespace" => {
                self.advance();
                self.skip_declaration();
            }
            "@font-face" => self.parse_declaration_block(BlockKind::FontFace, position, false),
            "@page" => self.parse_declaration_block(BlockKind::Page, position, true),
            "@viewport" | "@-ms-viewport" => {
                self.parse_declaration_block(BlockKind::Viewport, position, false)
            }
            "@media" => self.parse_nested_rules(BlockKind::Media, position),
            "@supports" => self.parse_nested_rules(BlockKind::Supports, position),
            "@document" | "@-moz-document" => {
                self.parse_nested_rules(BlockKind::Document, position)
            }
            name if is_keyframes_keyword(name) => self.parse_keyframes(position),
            _ => {
                self.error(ParseErrorKind::UnknownAtRule { name: keyword });
                self.advance();
                self.skip_declaration();
            }
        }
    }

    fn parse_import(&mut self, position: Position) {
        self.advance();

        let uri = match self.current_kind() {
            TokenKind::Url => unwrap_url(self.current_text()),
            TokenKind::String => unquote(self.current_text()),
            _ => {
                self.error(ParseErrorKind::MissingImportTarget);
                self.skip_declaration();
                return;
            }
        };
        self.advance();

        let mut media = Vec::new();
        let mut query: Option<Span> = None;
        loop {
            match self.current_kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                TokenKind::Eof | TokenKind::RBrace | TokenKind::LBrace => {
                    self.unexpected("';'");
                    break;
                }
                TokenKind::Comma => {
                    if let Some(span) = query.take() {
                        media.push(self.text(span).to_string());
                    }
                    self.advance();
                }
                _ => {
                    let span = self.current().span;
                    query = Some(query.map_or(span, |q| q.cover(span)));
                    self.advance();
                }
            }
        }
        if let Some(span) = query {
            media.push(self.text(span).to_string());
        }

        self.events.push(StylesheetEvent::Import(ImportEvent {
            uri,
            media,
            position,
        }));
    }

    /// `@font-face`, `@page` and `@viewport`: an at-rule whose body is a
    /// declaration list.
    fn parse_declaration_block(&mut self, kind: BlockKind, position: Position, margins: bool) {
        self.advance();
        let prelude = self.collect_prelude();
        if !self.open_block() {
            return;
        }
        self.start_block(kind, prelude, position);
        self.parse_declarations(margins);
        self.close_block(kind);
    }

    /// `@media`, `@supports` and `@document`: an at-rule whose body is a
    /// rule list.
    fn parse_nested_rules(&mut self, kind: BlockKind, position: Position) {
        self.advance();
        let prelude = self.collect_prelude();
        if !self.open_block() {
            return;
        }
        self.start_block(kind, prelude, position);
        self.parse_rule_list(true);
        self.close_block(kind);
    }

    fn parse_keyframes(&mut self, position: Position) {
        self.advance();
        let name = self.collect_prelude();
        if !self.open_block() {
            return;
        }
        self.start_block(BlockKind::Keyframes, name, position);

        loop {
            match self.current_kind() {
                TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::Semicolon => self.advance(),
                _ => {
                    let position = self.current_position();
                    let selectors = self.collect_prelude();
                    if self.open_block() {
                        self.start_block(BlockKind::KeyframeRule, selectors, position);
                        self.parse_declarations(false);
                        self.close_block(BlockKind::KeyframeRule);
                    }
                }
            }
        }

        self.close_block(BlockKind::Keyframes);
    }

    // === Declarations ===

    /// Parses declarations until `}` or the end of input. Inside `@page`,
    /// at-rules are margin boxes.
    fn parse_declarations(&mut self, margins: bool) {
        loop {
            match self.current_kind() {
                TokenKind::RBrace | TokenKind::Eof => return,
                TokenKind::Semicolon => self.advance(),
                TokenKind::AtKeyword if margins => {
                    let position = self.current_position();
                    let name = self.current_text().to_string();
                    self.advance();
                    if !self.open_block() {
                        continue;
                    }
                    self.start_block(BlockKind::PageMargin, name, position);
                    self.parse_declarations(false);
                    self.close_block(BlockKind::PageMargin);
                }
                TokenKind::AtKeyword => {
                    let name = self.current_text().to_string();
                    self.error(ParseErrorKind::UnknownAtRule { name });
                    self.advance();
                    self.skip_declaration();
                }
                TokenKind::Ident | TokenKind::Star => self.parse_declaration(),
                _ => {
                    self.unexpected("a property name");
                    self.skip_declaration();
                }
            }
        }
    }

    fn parse_declaration(&mut self) {
        let position = self.current_position();

        // `*zoom: 1` star hack
        let mut hack = None;
        if self.check(TokenKind::Star) {
            hack = Some('*');
            self.advance();
            if !self.check(TokenKind::Ident) {
                self.unexpected("a property name");
                self.skip_declaration();
                return;
            }
        }
        let mut name = self.current_text();
        // `_zoom: 1` underscore hack
        if hack.is_none() {
            if let Some(stripped) = name.strip_prefix('_') {
                hack = Some('_');
                name = stripped;
            }
        }
        let name = SmolStr::new(name);
        self.advance();

        if !self.check(TokenKind::Colon) {
            self.unexpected("':'");
            self.skip_declaration();
            return;
        }
        self.advance();

        let Some((value, important)) = self.parse_value() else {
            return;
        };

        if value.parts.is_empty() {
            self.error(ParseErrorKind::EmptyValue {
                property: name.to_string(),
            });
        } else {
            self.events.push(StylesheetEvent::Property(PropertyEvent {
                property: PropertyName {
                    text: name,
                    hack,
                    position,
                },
                value,
                important,
            }));
        }

        if self.check(TokenKind::Semicolon) {
            self.advance();
        }
    }

    /// Parses a declaration value up to `;` or `}`. Returns `None` when the
    /// "value" turned out to be a nested block, which is skipped.
    fn parse_value(&mut self) -> Option<(PropertyValue, bool)> {
        let mut parts = Vec::new();
        let mut important = false;
        let mut covered: Option<Span> = None;

        loop {
            let token = *self.current();
            let span = match token.kind {
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::LBrace => {
                    self.unexpected("';'");
                    self.skip_block();
                    return None;
                }
                TokenKind::Bang => {
                    self.advance();
                    if self.check(TokenKind::Ident)
                        && self.current_text().eq_ignore_ascii_case("important")
                    {
                        important = true;
                        self.advance();
                    } else {
                        self.unexpected("'important'");
                    }
                    continue;
                }
                TokenKind::Function | TokenKind::LParen => {
                    let span = self.skip_group();
                    let kind = if token.kind == TokenKind::Function {
                        PartKind::Function
                    } else {
                        PartKind::Unknown
                    };
                    parts.push(self.value_part(kind, span, None));
                    span
                }
                TokenKind::Url => {
                    let uri = unwrap_url(self.text(token.span));
                    parts.push(self.value_part(PartKind::Uri, token.span, Some(uri)));
                    self.advance();
                    token.span
                }
                kind => {
                    let part_kind = match kind {
                        TokenKind::Ident => PartKind::Identifier,
                        TokenKind::String => PartKind::String,
                        TokenKind::Number => PartKind::Number,
                        TokenKind::Hash => PartKind::Color,
                        TokenKind::Comma | TokenKind::Slash => PartKind::Operator,
                        _ => PartKind::Unknown,
                    };
                    parts.push(self.value_part(part_kind, token.span, None));
                    self.advance();
                    token.span
                }
            };
            covered = Some(covered.map_or(span, |c| c.cover(span)));
        }

        let text = covered
            .map(|span| self.text(span).to_string())
            .unwrap_or_default();
        Some((PropertyValue { text, parts }, important))
    }

    /// Consumes a parenthesised group starting at a `(` or function token
    /// and returns its span. Stops early at `;`, `}` or the end of input.
    fn skip_group(&mut self) -> Span {
        let start = self.current().span;
        let mut end = start;
        let mut depth = 0usize;
        loop {
            match self.current_kind() {
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => break,
                TokenKind::Function | TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            end = self.current().span;
            self.advance();
            if depth == 0 {
                break;
            }
        }
        start.cover(end)
    }

    fn value_part(&self, kind: PartKind, span: Span, uri: Option<String>) -> ValuePart {
        ValuePart {
            kind,
            text: self.text(span).to_string(),
            position: self.line_index.position(span.start),
            uri,
        }
    }
}

/// `@keyframes` and its vendor-prefixed spellings.
fn is_keyframes_keyword(keyword: &str) -> bool {
    matches!(
        keyword,
        "@keyframes" | "@-webkit-keyframes" | "@-moz-keyframes" | "@-o-keyframes" | "@-ms-keyframes"
    )
}
