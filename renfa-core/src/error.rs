//! Error types for NFA construction
//!
//! This module provides error handling using the `thiserror` crate.
//! Errors are categorized by their source: lexing, parsing, or building
//! the automaton graph.

use crate::nfa::StateId;
use thiserror::Error;

/// The main error type for turning a pattern into an automaton
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegexError {
    /// Errors that occur during lexing/tokenization
    #[error("lexer error at position {position}: {kind}")]
    Lexer {
        /// Position (in characters) where the error occurred
        position: usize,
        /// The specific kind of lexer error
        kind: LexerErrorKind,
    },

    /// Errors that occur during parsing
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A construction step failed while building the automaton
    #[error("failed to build {step}: {source}")]
    Build {
        /// The construction step that failed (e.g. `union`, `range 'z'-'a'`)
        step: String,
        /// What went wrong inside the construction engine
        source: NfaError,
    },
}

/// Specific kinds of lexer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerErrorKind {
    /// Encountered a character that cannot start a token here
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    /// Unclosed character class (e.g., `[abc` without `]`)
    #[error("unclosed character class")]
    UnclosedCharacterClass,

    /// Escape of a character that has no escaped meaning
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    /// A backslash with nothing after it
    #[error("trailing backslash")]
    TrailingBackslash,
}

/// Errors that occur during parsing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unexpected token encountered
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What was expected
        expected: String,
        /// What was actually found
        found: String,
    },

    /// Unexpected end of input
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// `[]` with no items
    #[error("empty character class")]
    EmptyCharacterClass,

    /// Groups and quantifiers nested past the parser's limit
    #[error("pattern nests deeper than {limit} levels")]
    NestingTooDeep {
        /// The nesting limit in force
        limit: usize,
    },
}

/// Errors raised by the construction engine itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NfaError {
    /// The arena could not grow
    #[error("could not allocate {requested} more {what} (limit: {limit:?})")]
    AllocationFailure {
        /// What was being allocated (`"states"` or `"transitions"`)
        what: &'static str,
        /// How many the operation needed
        requested: usize,
        /// The session's configured state limit, if the limit was the cause
        limit: Option<usize>,
    },

    /// Character range whose lower bound is above its upper bound
    #[error("invalid range {lo:?}-{hi:?}: lower bound is greater than upper bound")]
    InvalidRange {
        /// Lower bound as given
        lo: char,
        /// Upper bound as given
        hi: char,
    },

    /// A fragment handle that does not describe a live fragment of this session
    #[error("malformed fragment (start: {start}, accept: {accept})")]
    MalformedFragment {
        /// The fragment's start handle
        start: StateId,
        /// The fragment's accept handle
        accept: StateId,
    },

    /// A transition endpoint that is not a state of this session
    #[error("unknown state {0}")]
    UnknownState(StateId),
}

/// Result type alias for pattern operations
pub type Result<T> = std::result::Result<T, RegexError>;
