//! Build constraint lines in Go file headers.
//!
//! Two syntaxes are understood:
//!
//! ```text
//! //go:build linux && (amd64 || arm64) && !cgo
//! // +build linux,amd64 linux,arm64
//! ```
//!
//! In a `+build` line spaces separate alternatives and commas join
//! requirements; several `+build` lines must all hold. When a file has a
//! `//go:build` line its `+build` lines are ignored.

use thiserror::Error;

/// A malformed build constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// The expression after `//go:build` or `// +build` does not parse.
    #[error("line {line}: invalid build constraint: {message}")]
    Syntax {
        /// 1-based line of the constraint comment.
        line: usize,
        /// What was wrong.
        message: String,
    },
    /// More than one `//go:build` line in the header.
    #[error("line {line}: multiple //go:build comments")]
    Duplicate {
        /// 1-based line of the second comment.
        line: usize,
    },
}

/// Boolean expression over build tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A single tag such as `linux` or `go1.21`.
    Tag(String),
    /// `!x`
    Not(Box<Expr>),
    /// `x && y`
    And(Box<Expr>, Box<Expr>),
    /// `x || y`
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluates the expression, asking `has_tag` about each tag.
    pub fn eval(&self, has_tag: &impl Fn(&str) -> bool) -> bool {
        match self {
            Expr::Tag(tag) => has_tag(tag),
            Expr::Not(inner) => !inner.eval(has_tag),
            Expr::And(lhs, rhs) => lhs.eval(has_tag) && rhs.eval(has_tag),
            Expr::Or(lhs, rhs) => lhs.eval(has_tag) || rhs.eval(has_tag),
        }
    }

    fn and(lhs: Expr, rhs: Expr) -> Expr {
        Expr::And(Box::new(lhs), Box::new(rhs))
    }

    fn or(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Or(Box::new(lhs), Box::new(rhs))
    }
}

/// Finds and parses the build constraint of a Go source file.
///
/// Only the header counts: the leading run of blank lines and comments
/// before the first line of code. `+build` lines must also be followed by
/// a blank line somewhere in the header.
///
/// # Errors
///
/// Returns an error for a malformed expression or duplicate `//go:build`.
pub fn parse_header(source: &str) -> Result<Option<Expr>, ConstraintError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut go_build: Option<(usize, &str)> = None;
    let mut plus_build: Vec<(usize, &str)> = Vec::new();
    let mut plus_before_blank = 0;
    let mut in_block = false;

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let mut line = raw.trim();
        if in_block {
            match line.find("*/") {
                Some(end) => {
                    in_block = false;
                    line = line[end + 2..].trim_start();
                    if line.is_empty() || line.starts_with("//") {
                        continue;
                    }
                    break;
                }
                None => continue,
            }
        }
        if line.is_empty() {
            plus_before_blank = plus_build.len();
            continue;
        }
        if let Some(rest) = line.strip_prefix("/*") {
            match rest.find("*/") {
                Some(end) if rest[end + 2..].trim().is_empty() => continue,
                Some(_) => break,
                None => {
                    in_block = true;
                    continue;
                }
            }
        }
        let Some(comment) = line.strip_prefix("//") else {
            break;
        };
        if let Some(expr) = directive(comment, "go:build") {
            if go_build.is_some() {
                return Err(ConstraintError::Duplicate { line: line_no });
            }
            go_build = Some((line_no, expr));
        } else if let Some(expr) = directive(comment.trim_start(), "+build") {
            plus_build.push((line_no, expr));
        }
    }

    if let Some((line, text)) = go_build {
        return parse_go_build(text)
            .map(Some)
            .map_err(|message| ConstraintError::Syntax { line, message });
    }

    let mut combined: Option<Expr> = None;
    for &(line, text) in &plus_build[..plus_before_blank] {
        let expr = parse_plus_build(text).map_err(|message| ConstraintError::Syntax { line, message })?;
        combined = Some(match combined {
            Some(prev) => Expr::and(prev, expr),
            None => expr,
        });
    }
    Ok(combined)
}

/// Returns the text after `name` if `comment` is that directive.
fn directive<'a>(comment: &'a str, name: &str) -> Option<&'a str> {
    let rest = comment.strip_prefix(name)?;
    if rest.is_empty() || rest.starts_with([' ', '\t']) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Parses the expression of a `//go:build` line.
///
/// ```text
/// or   = and { "||" and } .
/// and  = not { "&&" not } .
/// not  = "!" not | "(" or ")" | tag .
/// ```
///
/// # Errors
///
/// Returns a message describing the first unexpected token.
pub fn parse_go_build(text: &str) -> Result<Expr, String> {
    let tokens = tokenize(text)?;
    let mut parser = ExprParser { tokens, pos: 0 };
    let expr = parser.or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(format!("unexpected {}", token.describe())),
    }
}

/// Parses one `// +build` line: space-separated alternatives, each a
/// comma-separated list of optionally negated tags.
///
/// # Errors
///
/// Returns a message naming the malformed term.
pub fn parse_plus_build(text: &str) -> Result<Expr, String> {
    let mut alternatives: Option<Expr> = None;
    for term in text.split_whitespace() {
        let mut conjunction: Option<Expr> = None;
        for atom in term.split(',') {
            let (negated, tag) = match atom.strip_prefix('!') {
                Some(tag) => (true, tag),
                None => (false, atom),
            };
            if !is_tag(tag) {
                return Err(format!("bad term `{term}`"));
            }
            let mut expr = Expr::Tag(tag.to_string());
            if negated {
                expr = Expr::Not(Box::new(expr));
            }
            conjunction = Some(match conjunction {
                Some(prev) => Expr::and(prev, expr),
                None => expr,
            });
        }
        if let Some(expr) = conjunction {
            alternatives = Some(match alternatives {
                Some(prev) => Expr::or(prev, expr),
                None => expr,
            });
        }
    }
    alternatives.ok_or_else(|| "empty +build line".to_string())
}

fn is_tag(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ExprToken {
    Tag(String),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

impl ExprToken {
    fn describe(&self) -> String {
        match self {
            ExprToken::Tag(tag) => format!("tag `{tag}`"),
            ExprToken::Not => "`!`".into(),
            ExprToken::And => "`&&`".into(),
            ExprToken::Or => "`||`".into(),
            ExprToken::LParen => "`(`".into(),
            ExprToken::RParen => "`)`".into(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<ExprToken>, String> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            ' ' | '\t' => {}
            '!' => tokens.push(ExprToken::Not),
            '(' => tokens.push(ExprToken::LParen),
            ')' => tokens.push(ExprToken::RParen),
            '&' | '|' => {
                if chars.next_if(|&(_, next)| next == c).is_none() {
                    return Err(format!("expected `{c}{c}`"));
                }
                tokens.push(if c == '&' { ExprToken::And } else { ExprToken::Or });
            }
            c if c.is_alphanumeric() || c == '_' || c == '.' => {
                let mut end = start + c.len_utf8();
                while let Some((i, next)) =
                    chars.next_if(|&(_, next)| next.is_alphanumeric() || next == '_' || next == '.')
                {
                    end = i + next.len_utf8();
                }
                tokens.push(ExprToken::Tag(text[start..end].to_string()));
            }
            other => return Err(format!("unexpected character `{other}`")),
        }
    }
    Ok(tokens)
}

struct ExprParser {
    tokens: Vec<ExprToken>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&ExprToken> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &ExprToken) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Expr, String> {
        let mut expr = self.and()?;
        while self.eat(&ExprToken::Or) {
            expr = Expr::or(expr, self.and()?);
        }
        Ok(expr)
    }

    fn and(&mut self) -> Result<Expr, String> {
        let mut expr = self.not()?;
        while self.eat(&ExprToken::And) {
            expr = Expr::and(expr, self.not()?);
        }
        Ok(expr)
    }

    fn not(&mut self) -> Result<Expr, String> {
        let Some(token) = self.tokens.get(self.pos).cloned() else {
            return Err("unexpected end of expression".into());
        };
        self.pos += 1;
        match token {
            ExprToken::Not => Ok(Expr::Not(Box::new(self.not()?))),
            ExprToken::LParen => {
                let inner = self.or()?;
                if !self.eat(&ExprToken::RParen) {
                    return Err("missing `)`".into());
                }
                Ok(inner)
            }
            ExprToken::Tag(tag) => Ok(Expr::Tag(tag)),
            other => Err(format!("unexpected {}", other.describe())),
        }
    }
}
