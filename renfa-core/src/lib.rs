//! Renfa Core Library
//!
//! Builds epsilon-NFAs from regular expressions with Thompson's construction
//! and exposes the resulting graph for traversal and Graphviz export.
//!
//! ```
//! let automaton = renfa_core::compile("a(b|c)*").unwrap();
//! assert_eq!(automaton.state_count(), 10);
//! assert!(automaton.to_dot().starts_with("digraph NFA {"));
//! ```
//!
//! The construction engine can also be driven directly:
//!
//! ```
//! use renfa_core::Nfa;
//!
//! let mut nfa = Nfa::new();
//! let a = nfa.literal('a').unwrap();
//! let b = nfa.literal('b').unwrap();
//! let ab = nfa.concat(a, b).unwrap();
//! assert_eq!(ab.state_count(), 4);
//! ```

pub mod ast;
pub mod compiler;
pub mod dot;
pub mod error;
pub mod lexer;
pub mod nfa;
pub mod parser;
pub mod thompson;
pub mod traverse;

pub use ast::{ClassItem, Expr, Quantifier};
pub use compiler::{Automaton, Compiler};
pub use error::{LexerErrorKind, NfaError, ParseError, RegexError, Result};
pub use lexer::{Lexer, Token};
pub use nfa::{Config, Nfa, State, StateId, Symbol, Transition};
pub use parser::{NEST_LIMIT, Parser, parse};
pub use thompson::{ANY_ALPHABET_LEN, Fragment, any_alphabet};
pub use traverse::Bfs;

/// Compile a pattern into an automaton with the default configuration
pub fn compile(pattern: &str) -> Result<Automaton> {
    compile_with(pattern, Config::new())
}

/// Compile a pattern into an automaton with the given configuration
pub fn compile_with(pattern: &str, config: Config) -> Result<Automaton> {
    let expr = parse(pattern)?;
    Compiler::new(config).compile(&expr)
}
