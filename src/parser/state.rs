//! # Parser State Management
//!
//! Infrastructure for the recursive-descent parser:
//!
//! - **ParseState** - token stream position with backtracking support
//! - **ParseError** - structured parse failures with expected/found info
//! - **Parser trait** - the interface every parser implements
//!
//! Alternatives are tried by saving the position, attempting a parse,
//! and restoring on failure:
//!
//! ```text
//! let pos = state.position();
//! match parser.parse(state) {
//!     Ok(result) => result,
//!     Err(_) => {
//!         state.restore(pos);
//!         alternative.parse(state)
//!     }
//! }
//! ```
//!
//! Because the deepest failure is usually the interesting one, the state
//! tracks the error at the furthest position reached; the driver prefers
//! it over whatever shallow error the topmost alternative produced.

use lachs::Span;

use crate::lexer::Token;

/// Structured parse error with context information.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Option<Box<Span>>,
    pub expected: Vec<String>,
    pub found: Option<String>,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            span: None,
            expected: vec![],
            found: None,
        }
    }

    /// Add an expected token/construct, for "expected A or B" messages.
    pub fn expected(mut self, what: impl Into<String>) -> Self {
        self.expected.push(what.into());
        self
    }

    pub fn found(mut self, what: impl Into<String>) -> Self {
        self.found = Some(what.into());
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(Box::new(span));
        self
    }

    /// Merge expected tokens from another error, used when combining
    /// alternatives that both failed at the same position.
    pub fn merge_expected(mut self, other: &ParseError) -> Self {
        for exp in &other.expected {
            if !self.expected.contains(exp) {
                self.expected.push(exp.clone());
            }
        }
        self
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = if !self.expected.is_empty() {
            let expected_str = if self.expected.len() == 1 {
                self.expected[0].clone()
            } else {
                let (last, rest) = self.expected.split_last().unwrap();
                format!("{} or {}", rest.join(", "), last)
            };
            match &self.found {
                Some(found) => format!("expected {}, found {}", expected_str, found),
                None => format!("expected {}", expected_str),
            }
        } else {
            self.message.clone()
        };

        if let Some(span) = &self.span {
            write!(f, "{}", span.to_string(&msg))
        } else {
            write!(f, "Parse error: {}", msg)
        }
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parser state: token stream, position, and furthest-error tracking.
pub struct ParseState {
    tokens: Vec<Token>,
    /// Index of the next token to consume.
    index: usize,
    /// Error at the furthest position reached during parsing.
    furthest_error: Option<(usize, ParseError)>,
}

impl ParseState {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            furthest_error: None,
        }
    }

    /// Consume and return the next token.
    pub fn advance(&mut self) -> Option<Token> {
        if self.has_next() {
            let token = self.tokens[self.index].clone();
            self.index += 1;
            Some(token)
        } else {
            None
        }
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    /// Restore the parser to a previous position (backtracking).
    pub fn restore(&mut self, position: usize) {
        self.index = position;
    }

    /// Record an error, keeping the one at the furthest position.
    /// Errors at the same position have their expected sets merged.
    pub fn record_error(&mut self, error: ParseError) {
        match &self.furthest_error {
            Some((pos, _)) if *pos > self.index => {}
            Some((pos, existing)) if *pos == self.index => {
                let merged = existing.clone().merge_expected(&error);
                self.furthest_error = Some((self.index, merged));
            }
            _ => {
                self.furthest_error = Some((self.index, error));
            }
        }
    }

    pub fn furthest_error(&self) -> Option<&ParseError> {
        self.furthest_error.as_ref().map(|(_, e)| e)
    }

    /// Create an error at the current position with span info.
    pub fn error_here(&self, message: impl Into<String>) -> ParseError {
        let msg = message.into();
        match self.peek() {
            Some(tok) => ParseError::new(&msg).at(tok.pos()).found(tok.describe()),
            None => ParseError::new(msg).found("end of input".to_string()),
        }
    }
}

/// Generic parser trait, implemented by every grammar production and by
/// plain functions of the right signature.
pub trait Parser<T>: Sized {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T>;
}

impl<T, F: Fn(&mut ParseState) -> ParseResult<T>> Parser<T> for F {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        self(state)
    }
}
