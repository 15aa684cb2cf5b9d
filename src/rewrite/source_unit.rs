//! Parsing of a Go file's package clause and import declarations.
//!
//! ```text
//! SourceFile  = PackageClause ";" { ImportDecl ";" } { TopLevelDecl ";" } .
//! ImportDecl  = "import" ( ImportSpec | "(" { ImportSpec ";" } ")" ) .
//! ImportSpec  = [ "." | "_" | PackageName ] ImportPath .
//! ```
//!
//! Declarations after the imports are checked for balanced delimiters and a
//! declaration keyword at the top level here. The whole file is then run
//! through the Go grammar in [`super::grammar`], which rejects anything else
//! that is not valid Go.

use std::ops::Range;

use super::grammar;
use super::lexer::{is_keyword, LexError, Lexer, Token, TokenKind};
use super::literal;
use super::RewriteError;

/// One `[name] "path"` element of an import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec<'src> {
    /// Local name, `.` or `_`, if given.
    pub name: Option<&'src str>,
    /// The path literal exactly as written, quotes included.
    pub literal: &'src str,
    /// Byte span of `literal` in the source.
    pub span: Range<usize>,
}

impl ImportSpec<'_> {
    /// Decodes the import path.
    ///
    /// # Errors
    ///
    /// Returns a message if the literal cannot be decoded or is empty.
    pub fn path(&self) -> Result<String, String> {
        let path = literal::unquote(self.literal)?;
        if path.is_empty() {
            return Err("empty import path".into());
        }
        Ok(path)
    }
}

/// A parsed Go source file, borrowing from its text.
#[derive(Debug, Clone)]
pub struct SourceUnit<'src> {
    source: &'src str,
    package: &'src str,
    imports: Vec<ImportSpec<'src>>,
}

impl<'src> SourceUnit<'src> {
    /// Parses `source`.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Syntax`] if the text is not valid Go, or
    /// [`RewriteError::Literal`] if the grammar rejects an import literal
    /// that also fails to decode.
    pub fn parse(source: &'src str) -> Result<Self, RewriteError> {
        let mut parser = Parser::new(source)?;
        let package = parser.package_clause()?;
        let imports = parser.import_decls()?;
        parser.top_level_decls()?;
        let unit = Self { source, package, imports };

        if let Err(err) = grammar::check(source) {
            // Imports precede every declaration, so an undecodable literal is
            // the earliest problem in the file.
            for spec in &unit.imports {
                if let Err(message) = spec.path() {
                    return Err(unit.literal_error(spec, message));
                }
            }
            let (line, column) = line_column(source, err.span.start);
            return Err(RewriteError::Syntax { line, column, message: err.message });
        }
        Ok(unit)
    }

    /// The source text this unit was parsed from.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Name declared by the package clause.
    #[must_use]
    pub fn package_name(&self) -> &'src str {
        self.package
    }

    /// Import specs in source order.
    #[must_use]
    pub fn imports(&self) -> &[ImportSpec<'src>] {
        &self.imports
    }

    /// Builds a literal error positioned at `spec`.
    #[must_use]
    pub fn literal_error(&self, spec: &ImportSpec<'_>, message: String) -> RewriteError {
        let (line, column) = line_column(self.source, spec.span.start);
        RewriteError::Literal { line, column, literal: spec.literal.to_string(), message }
    }
}

/// Converts a byte offset to a 1-based `(line, column)` pair.
#[must_use]
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    (line, before.len() - line_start + 1)
}

struct Parser<'src> {
    source: &'src str,
    lexer: Lexer<'src>,
    current: Token,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Result<Self, RewriteError> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token().map_err(|e| lex_error(source, &e))?;
        Ok(Self { source, lexer, current })
    }

    fn bump(&mut self) -> Result<Token, RewriteError> {
        let next = self.lexer.next_token().map_err(|e| lex_error(self.source, &e))?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn text(&self, token: Token) -> &'src str {
        self.lexer.text(token)
    }

    fn at_word(&self, word: &str) -> bool {
        self.current.kind == TokenKind::Ident && self.text(self.current) == word
    }

    fn error_at(&self, token: Token, message: impl Into<String>) -> RewriteError {
        let (line, column) = line_column(self.source, token.start);
        RewriteError::Syntax { line, column, message: message.into() }
    }

    fn expected(&self, what: &str) -> RewriteError {
        let found = match self.current.kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Semicolon if self.current.start == self.current.end => "newline".to_string(),
            _ => format!("`{}`", self.text(self.current)),
        };
        self.error_at(self.current, format!("expected {what}, found {found}"))
    }

    fn expect_semicolon(&mut self, context: &str) -> Result<(), RewriteError> {
        match self.current.kind {
            TokenKind::Semicolon => {
                self.bump()?;
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.expected(&format!("`;` after {context}"))),
        }
    }

    fn package_clause(&mut self) -> Result<&'src str, RewriteError> {
        if !self.at_word("package") {
            return Err(self.expected("`package` clause"));
        }
        self.bump()?;
        let name = self.current;
        let text = self.text(name);
        if name.kind != TokenKind::Ident || is_keyword(text) {
            return Err(self.expected("package name"));
        }
        if text == "_" {
            return Err(self.error_at(name, "invalid package name _"));
        }
        self.bump()?;
        self.expect_semicolon("package clause")?;
        Ok(text)
    }

    fn import_decls(&mut self) -> Result<Vec<ImportSpec<'src>>, RewriteError> {
        let mut imports = Vec::new();
        while self.at_word("import") {
            self.bump()?;
            if self.current.kind == TokenKind::LParen {
                self.bump()?;
                loop {
                    match self.current.kind {
                        TokenKind::RParen => {
                            self.bump()?;
                            break;
                        }
                        TokenKind::Eof => return Err(self.expected("`)`")),
                        _ => {}
                    }
                    imports.push(self.import_spec()?);
                    match self.current.kind {
                        TokenKind::Semicolon => {
                            self.bump()?;
                        }
                        TokenKind::RParen => {}
                        _ => return Err(self.expected("`;` or `)` after import spec")),
                    }
                }
            } else {
                imports.push(self.import_spec()?);
            }
            self.expect_semicolon("import declaration")?;
        }
        Ok(imports)
    }

    fn import_spec(&mut self) -> Result<ImportSpec<'src>, RewriteError> {
        let mut name = None;
        let text = self.text(self.current);
        let is_name = match self.current.kind {
            TokenKind::Ident => !is_keyword(text),
            TokenKind::Operator => text == ".",
            _ => false,
        };
        if is_name {
            name = Some(text);
            self.bump()?;
        }
        if !matches!(self.current.kind, TokenKind::String | TokenKind::RawString) {
            return Err(self.expected("import path"));
        }
        let token = self.bump()?;
        Ok(ImportSpec { name, literal: self.text(token), span: token.start..token.end })
    }

    /// Walks the remaining declarations, checking delimiters and that every
    /// top-level declaration starts with a declaration keyword.
    fn top_level_decls(&mut self) -> Result<(), RewriteError> {
        let mut open: Vec<Token> = Vec::new();
        let mut at_decl_start = true;
        let mut previous: Option<TokenKind> = None;
        loop {
            let token = self.current;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon if open.is_empty() => at_decl_start = true,
                TokenKind::Ident if open.is_empty() && !at_decl_start => {
                    let word = self.text(token);
                    let starts_decl = matches!(word, "var" | "const" | "type" | "import" | "package")
                        || (word == "func" && previous == Some(TokenKind::RBrace));
                    if starts_decl {
                        return Err(self.error_at(
                            token,
                            format!("unexpected `{word}` after top level declaration"),
                        ));
                    }
                }
                _ if open.is_empty() && at_decl_start => {
                    let word = self.text(token);
                    if token.kind == TokenKind::Ident && word == "import" {
                        return Err(self.error_at(
                            token,
                            "imports must appear before other declarations",
                        ));
                    }
                    if token.kind != TokenKind::Ident
                        || !matches!(word, "func" | "var" | "const" | "type")
                    {
                        return Err(self.error_at(
                            token,
                            "non-declaration statement outside function body",
                        ));
                    }
                    at_decl_start = false;
                }
                _ => {}
            }
            match token.kind {
                TokenKind::LParen | TokenKind::LBrack | TokenKind::LBrace => open.push(token),
                TokenKind::RParen | TokenKind::RBrack | TokenKind::RBrace => {
                    let expected = match token.kind {
                        TokenKind::RParen => TokenKind::LParen,
                        TokenKind::RBrack => TokenKind::LBrack,
                        _ => TokenKind::LBrace,
                    };
                    match open.pop() {
                        Some(opener) if opener.kind == expected => {}
                        _ => {
                            return Err(self.error_at(
                                token,
                                format!("unexpected `{}`", self.text(token)),
                            ))
                        }
                    }
                }
                _ => {}
            }
            previous = Some(token.kind);
            self.bump()?;
        }
        if let Some(opener) = open.last() {
            return Err(self.error_at(*opener, format!("unclosed `{}`", self.text(*opener))));
        }
        Ok(())
    }
}

fn lex_error(source: &str, err: &LexError) -> RewriteError {
    let (line, column) = line_column(source, err.offset);
    RewriteError::Syntax { line, column, message: err.message.clone() }
}
