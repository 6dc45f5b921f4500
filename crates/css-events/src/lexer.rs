//! CSS lexer using logos.
//!
//! The lexer is deliberately coarse: it recognises the tokens the event
//! parser needs to find block boundaries, declarations and URL literals.
//! Whitespace and comments are skipped.

use crate::position::Span;
use logos::Logos;

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token in the source.
    pub span: Span,
}

/// Token kinds for CSS syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos)]
#[logos(skip r"([ \t\r\n\f]+|/\*([^*]|\*+[^*/])*\*+/)")]
pub enum TokenKind {
    // === Punctuation ===
    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `[`
    #[token("[")]
    LBracket,

    /// `]`
    #[token("]")]
    RBracket,

    /// `:`
    #[token(":")]
    Colon,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `,`
    #[token(",")]
    Comma,

    /// `!`
    #[token("!")]
    Bang,

    /// `/`
    #[token("/")]
    Slash,

    /// `>`
    #[token(">")]
    Gt,

    /// `+`
    #[token("+")]
    Plus,

    /// `~`
    #[token("~")]
    Tilde,

    /// `*`
    #[token("*")]
    Star,

    /// `.`
    #[token(".")]
    Dot,

    /// `=`
    #[token("=")]
    Eq,

    // === Words ===
    /// `@media`, `@font-face`, `@-webkit-keyframes`, ...
    #[regex(r"@-?[a-zA-Z_][a-zA-Z0-9_-]*")]
    AtKeyword,

    /// A complete `url(...)` literal, quoted or not.
    #[regex(r#"[uU][rR][lL]\([ \t\r\n\f]*("([^"\\\n]|\\.)*"|'([^'\\\n]|\\.)*'|([^)"'\\ \t\r\n\f]|\\.)*)[ \t\r\n\f]*\)"#)]
    Url,

    /// A function name including its opening parenthesis, e.g. `format(`.
    #[regex(r"-?-?[a-zA-Z_][a-zA-Z0-9_-]*\(")]
    Function,

    /// An identifier.
    #[regex(r"-?-?[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    /// `#fff`, `#main`
    #[regex(r"#[a-zA-Z0-9_-]+")]
    Hash,

    /// A number with an optional unit or percent sign.
    #[regex(r"[+-]?([0-9]+(\.[0-9]+)?|\.[0-9]+)([a-zA-Z]+|%)?")]
    Number,

    /// A quoted string.
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    String,

    // === Special ===
    /// Anything the lexer does not recognise.
    Error,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns a human-readable name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Bang => "'!'",
            TokenKind::Slash => "'/'",
            TokenKind::Gt => "'>'",
            TokenKind::Plus => "'+'",
            TokenKind::Tilde => "'~'",
            TokenKind::Star => "'*'",
            TokenKind::Dot => "'.'",
            TokenKind::Eq => "'='",
            TokenKind::AtKeyword => "at-keyword",
            TokenKind::Url => "url",
            TokenKind::Function => "function",
            TokenKind::Ident => "identifier",
            TokenKind::Hash => "hash",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Error => "unknown character",
            TokenKind::Eof => "end of file",
        }
    }
}

/// A lexer that yields [`Token`]s and a final [`TokenKind::Eof`].
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            finished: false,
        }
    }

    /// Returns the source string being lexed.
    pub fn source(&self) -> &'src str {
        self.source
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(kind)) => Some(Token {
                kind,
                span: Span::from(self.inner.span()),
            }),
            Some(Err(())) => Some(Token {
                kind: TokenKind::Error,
                span: Span::from(self.inner.span()),
            }),
            None => {
                self.finished = true;
                Some(Token {
                    kind: TokenKind::Eof,
                    span: Span::empty(text_size::TextSize::from(self.source.len() as u32)),
                })
            }
        }
    }
}

/// Extracts the target of a `url(...)` token: strips the function wrapper,
/// surrounding whitespace and quotes, and resolves backslash escapes.
pub fn unwrap_url(text: &str) -> String {
    let inner = text
        .get(4..text.len().saturating_sub(1))
        .unwrap_or_default()
        .trim_matches(|c: char| matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0c'));
    unquote(inner)
}

/// Strips matching quotes from a string token and resolves backslash escapes.
/// Unquoted input is only unescaped.
pub fn unquote(text: &str) -> String {
    let body = match text.chars().next() {
        Some(quote @ ('"' | '\'')) if text.len() >= 2 && text.ends_with(quote) => {
            &text[1..text.len() - 1]
        }
        _ => text,
    };

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokenize(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Eof)
            .collect()
    }

    #[test]
    fn test_simple_rule() {
        assert_eq!(
            tokenize(".x { color: red; }"),
            vec![
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::LBrace,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            tokenize("/* a * b */ a /**/ b"),
            vec![TokenKind::Ident, TokenKind::Ident]
        );
    }

    #[test]
    fn test_url_forms() {
        assert_eq!(tokenize("url(a.png)"), vec![TokenKind::Url]);
        assert_eq!(tokenize("url( 'a b.png' )"), vec![TokenKind::Url]);
        assert_eq!(tokenize(r#"URL("a.png")"#), vec![TokenKind::Url]);
    }

    #[test]
    fn test_function_and_string() {
        assert_eq!(
            tokenize("format('woff')"),
            vec![TokenKind::Function, TokenKind::String, TokenKind::RParen]
        );
    }

    #[test]
    fn test_at_keyword_and_numbers() {
        assert_eq!(
            tokenize("@-webkit-keyframes spin { 50% { } }"),
            vec![
                TokenKind::AtKeyword,
                TokenKind::Ident,
                TokenKind::LBrace,
                TokenKind::Number,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_hash() {
        assert_eq!(
            tokenize("#main #fff"),
            vec![TokenKind::Hash, TokenKind::Hash]
        );
    }

    #[test]
    fn test_unwrap_url() {
        assert_eq!(unwrap_url("url(a.png)"), "a.png");
        assert_eq!(unwrap_url("url( \"a b.png\" )"), "a b.png");
        assert_eq!(unwrap_url("url('it\\'s.png')"), "it's.png");
        assert_eq!(unwrap_url("url()"), "");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"a.css\""), "a.css");
        assert_eq!(unquote("'a.css'"), "a.css");
        assert_eq!(unquote("plain"), "plain");
    }
}
