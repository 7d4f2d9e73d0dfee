use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Unexpected end of input (line {0})")]
    UnexpectedEof(usize),
    #[error("Unterminated string starting on line {0}")]
    UnterminatedString(usize),
    #[error("Unexpected ')' on line {0}")]
    UnexpectedClose(usize),
    #[error("Trailing content after root expression on line {0}")]
    TrailingContent(usize),
}

/// A node of a KiCad S-expression document.
///
/// Bare tokens and quoted strings are kept apart: only symbols can label a
/// list, so `("footprint" ...)` is not a footprint node.
#[derive(Debug, Clone, PartialEq)]
pub enum SExp {
    Symbol(String),
    Str(String),
    List(Vec<SExp>),
}

impl SExp {
    /// Text of a symbol or string atom.
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            SExp::Symbol(s) | SExp::Str(s) => Some(s),
            SExp::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SExp]> {
        match self {
            SExp::List(items) => Some(items),
            _ => None,
        }
    }

    /// Leading symbol of a list, e.g. `footprint` for `(footprint ...)`.
    pub fn tag(&self) -> Option<&str> {
        match self.as_list()?.first()? {
            SExp::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Elements after the leading label. Empty for atoms.
    pub fn children(&self) -> &[SExp] {
        match self {
            SExp::List(items) if !items.is_empty() => &items[1..],
            _ => &[],
        }
    }

    /// Immediate children labelled `tag`, in document order.
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a SExp> + 'a {
        self.children()
            .iter()
            .filter(move |child| child.tag() == Some(tag))
    }

    /// First immediate child labelled `tag`.
    pub fn first_tagged(&self, tag: &str) -> Option<&SExp> {
        self.children().iter().find(|child| child.tag() == Some(tag))
    }
}

impl fmt::Display for SExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SExp::Symbol(s) => write!(f, "{}", s),
            SExp::Str(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            SExp::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

pub struct SExpParser {
    input: Vec<char>,
    pos: usize,
    line: usize,
}

impl SExpParser {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    /// Parse exactly one root expression.
    pub fn parse(&mut self) -> Result<SExp, ParseError> {
        let root = self.parse_sexp()?;
        self.skip_whitespace();
        if !self.is_eof() {
            return Err(ParseError::TrailingContent(self.line));
        }
        Ok(root)
    }

    fn parse_sexp(&mut self) -> Result<SExp, ParseError> {
        self.skip_whitespace();

        match self.peek() {
            None => Err(ParseError::UnexpectedEof(self.line)),
            Some('(') => self.parse_list(),
            Some(')') => Err(ParseError::UnexpectedClose(self.line)),
            Some('"') => self.parse_string(),
            Some(_) => Ok(self.parse_symbol()),
        }
    }

    fn parse_list(&mut self) -> Result<SExp, ParseError> {
        self.advance();
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(ParseError::UnexpectedEof(self.line)),
                Some(')') => {
                    self.advance();
                    break;
                }
                Some(_) => items.push(self.parse_sexp()?),
            }
        }

        Ok(SExp::List(items))
    }

    fn parse_string(&mut self) -> Result<SExp, ParseError> {
        let start_line = self.line;
        self.advance();
        let mut s = String::new();

        loop {
            let ch = self
                .advance()
                .ok_or(ParseError::UnterminatedString(start_line))?;
            match ch {
                '"' => break,
                '\\' => {
                    let escaped = self
                        .advance()
                        .ok_or(ParseError::UnterminatedString(start_line))?;
                    s.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
                other => s.push(other),
            }
        }

        Ok(SExp::Str(s))
    }

    fn parse_symbol(&mut self) -> SExp {
        let mut s = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || ch == '(' || ch == ')' || ch == '"' {
                break;
            }
            s.push(ch);
            self.advance();
        }

        SExp::Symbol(s)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}
