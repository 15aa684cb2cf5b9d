//! Lexer for Go source text.
//!
//! Produces tokens with byte spans into the original source, including
//! automatic semicolon insertion. Comments and whitespace are skipped but
//! never altered, since the rewriter splices edits into the original text.
//! Token classification is only as fine as import parsing and delimiter
//! balancing need.

use std::str::Chars;

/// Kinds of tokens the import parser distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident,
    /// Integer, floating-point or imaginary literal.
    Number,
    /// Rune literal (`'x'`).
    Rune,
    /// Interpreted string literal (`"..."`).
    String,
    /// Raw string literal (`` `...` ``).
    RawString,
    /// `++` or `--`.
    IncDec,
    /// Any other operator or punctuation character.
    Operator,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBrack,
    /// `]`
    RBrack,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// Explicit `;` or one inserted at a line end.
    Semicolon,
    /// End of input.
    Eof,
}

/// A token with its byte span in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// What was scanned.
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character. Equal to `start` for
    /// inserted semicolons and end of input.
    pub end: usize,
}

/// A lexical error at a byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Where the offending construct starts.
    pub offset: usize,
    /// What went wrong.
    pub message: String,
}

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Returns `true` if `word` is a reserved Go keyword.
#[must_use]
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// The lexer for Go source code.
pub struct Lexer<'src> {
    source: &'src str,
    chars: Chars<'src>,
    pos: usize,
    /// Whether a newline after the previous token inserts a semicolon.
    prev_ends_statement: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer over `source`, skipping a leading byte order mark.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer =
            Self { source, chars: source.chars(), pos: 0, prev_ends_statement: false };
        if lexer.peek() == Some('\u{feff}') {
            lexer.advance();
        }
        lexer
    }

    /// Returns the source text covered by `token`.
    #[must_use]
    pub fn text(&self, token: Token) -> &'src str {
        &self.source[token.start..token.end]
    }

    /// Returns the next token.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] for unterminated literals or comments and for
    /// characters that cannot start a token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if let Some(offset) = self.skip_whitespace_and_comments()? {
            return Ok(self.emit(TokenKind::Semicolon, offset, offset));
        }

        let start = self.pos;
        let Some(c) = self.peek() else {
            if self.prev_ends_statement {
                return Ok(self.emit(TokenKind::Semicolon, start, start));
            }
            return Ok(Token { kind: TokenKind::Eof, start, end: start });
        };

        let kind = self.scan_token(c, start)?;
        Ok(self.emit(kind, start, self.pos))
    }

    fn emit(&mut self, kind: TokenKind, start: usize, end: usize) -> Token {
        self.prev_ends_statement = match kind {
            TokenKind::Ident => {
                let word = &self.source[start..end];
                !is_keyword(word)
                    || matches!(word, "break" | "continue" | "fallthrough" | "return")
            }
            TokenKind::Number
            | TokenKind::Rune
            | TokenKind::String
            | TokenKind::RawString
            | TokenKind::IncDec
            | TokenKind::RParen
            | TokenKind::RBrack
            | TokenKind::RBrace => true,
            _ => false,
        };
        Token { kind, start, end }
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips trivia. Returns the offset of an inserted semicolon when a line
    /// end terminates a statement.
    fn skip_whitespace_and_comments(&mut self) -> Result<Option<usize>, LexError> {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r') => {
                    self.advance();
                }
                Some('\n') => {
                    let offset = self.pos;
                    self.advance();
                    if self.prev_ends_statement {
                        return Ok(Some(offset));
                    }
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_next() == Some('*') => {
                    let offset = self.pos;
                    let had_newline = self.skip_block_comment()?;
                    if had_newline && self.prev_ends_statement {
                        return Ok(Some(offset));
                    }
                }
                _ => return Ok(None),
            }
        }
    }

    /// Skips a `/* ... */` comment. Go block comments do not nest.
    fn skip_block_comment(&mut self) -> Result<bool, LexError> {
        let start = self.pos;
        self.advance();
        self.advance();
        let mut had_newline = false;
        loop {
            match self.advance() {
                None => {
                    return Err(LexError { offset: start, message: "comment not terminated".into() })
                }
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return Ok(had_newline);
                }
                Some('\n') => had_newline = true,
                Some(_) => {}
            }
        }
    }

    fn scan_token(&mut self, c: char, start: usize) -> Result<TokenKind, LexError> {
        if is_ident_start(c) {
            while self.peek().is_some_and(is_ident_continue) {
                self.advance();
            }
            return Ok(TokenKind::Ident);
        }
        if c.is_ascii_digit() || (c == '.' && self.peek_next().is_some_and(|n| n.is_ascii_digit()))
        {
            self.scan_number();
            return Ok(TokenKind::Number);
        }

        self.advance();
        let kind = match c {
            '"' => self.scan_string(start)?,
            '`' => self.scan_raw_string(start)?,
            '\'' => self.scan_rune(start)?,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBrack,
            ']' => TokenKind::RBrack,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ';' => TokenKind::Semicolon,
            '+' | '-' if self.peek() == Some(c) => {
                self.advance();
                TokenKind::IncDec
            }
            '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '<' | '>' | '=' | '!' | '~' | ':'
            | ',' | '.' => TokenKind::Operator,
            other => {
                return Err(LexError {
                    offset: start,
                    message: format!("invalid character {other:?}"),
                })
            }
        };
        Ok(kind)
    }

    /// Scans a numeric literal loosely: digits, letters, `_`, `.` and signed
    /// exponents. Numeric validity does not affect import rewriting.
    fn scan_number(&mut self) {
        let start = self.pos;
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let is_hex = self.source[start..self.pos].starts_with("0x")
                || self.source[start..self.pos].starts_with("0X");
            let exponent = if is_hex { matches!(prev, 'p' | 'P') } else { matches!(prev, 'e' | 'E') };
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || (exponent && matches!(c, '+' | '-'))
            {
                prev = c;
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Scans the rest of a `"..."` literal. Escapes are checked when decoded.
    fn scan_string(&mut self, start: usize) -> Result<TokenKind, LexError> {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexError {
                        offset: start,
                        message: "string literal not terminated".into(),
                    })
                }
                Some('"') => {
                    self.advance();
                    return Ok(TokenKind::String);
                }
                Some('\\') => {
                    self.advance();
                    if matches!(self.peek(), None | Some('\n')) {
                        continue;
                    }
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn scan_raw_string(&mut self, start: usize) -> Result<TokenKind, LexError> {
        loop {
            match self.advance() {
                None => {
                    return Err(LexError {
                        offset: start,
                        message: "raw string literal not terminated".into(),
                    })
                }
                Some('`') => return Ok(TokenKind::RawString),
                Some(_) => {}
            }
        }
    }

    fn scan_rune(&mut self, start: usize) -> Result<TokenKind, LexError> {
        if self.peek() == Some('\'') {
            self.advance();
            return Err(LexError { offset: start, message: "empty rune literal".into() });
        }
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexError {
                        offset: start,
                        message: "rune literal not terminated".into(),
                    })
                }
                Some('\'') => {
                    self.advance();
                    return Ok(TokenKind::Rune);
                }
                Some('\\') => {
                    self.advance();
                    if matches!(self.peek(), None | Some('\n')) {
                        continue;
                    }
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
