//! Abstract Syntax Tree (AST) for regex patterns
//!
//! This module defines the AST the parser produces and the compiler walks.
//! It covers exactly the constructs Thompson's construction handles here:
//! - Literals, the `.` wildcard, character classes with ranges
//! - Quantifiers (`*`, `+`, `?`)
//! - Groups and alternation (`|`)

use std::fmt;

/// An expression in the AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Empty expression (matches empty string)
    Empty,

    /// A literal character
    Literal(char),

    /// Any character (dot)
    Any,

    /// A sequence of expressions (concatenation)
    Sequence(Vec<Expr>),

    /// Alternation (e.g., a|b|c)
    Alternation(Vec<Expr>),

    /// A character class such as `[abc]` or `[a-z0-9]`
    CharacterClass(Vec<ClassItem>),

    /// Quantified expression (e.g., a*, a+, a?)
    Quantified {
        /// The expression being quantified
        expr: Box<Expr>,
        /// The quantifier
        quantifier: Quantifier,
    },

    /// A parenthesized group: (...)
    Group(Box<Expr>),
}

/// An item in a character class
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClassItem {
    /// A single character
    Char(char),
    /// A character range (e.g., a-z), bounds inclusive
    Range(char, char),
}

/// A quantifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// Zero or more (*)
    ZeroOrMore,
    /// One or more (+)
    OneOrMore,
    /// Zero or one (?)
    Optional,
}

impl Expr {
    /// Create an empty expression
    pub fn empty() -> Self {
        Expr::Empty
    }

    /// Create a literal expression
    pub fn literal(c: char) -> Self {
        Expr::Literal(c)
    }

    /// Create an Any expression (.)
    pub fn any() -> Self {
        Expr::Any
    }

    /// Create a sequence from a vector of expressions
    pub fn sequence(mut exprs: Vec<Expr>) -> Self {
        match exprs.len() {
            0 => Expr::Empty,
            1 => exprs.remove(0),
            _ => Expr::Sequence(exprs),
        }
    }

    /// Create an alternation from a vector of expressions
    pub fn alternation(mut exprs: Vec<Expr>) -> Self {
        match exprs.len() {
            0 => Expr::Empty,
            1 => exprs.remove(0),
            _ => Expr::Alternation(exprs),
        }
    }

    /// Create a character class
    pub fn char_class(items: Vec<ClassItem>) -> Self {
        Expr::CharacterClass(items)
    }

    /// Create a quantified expression
    pub fn quantified(expr: Expr, quantifier: Quantifier) -> Self {
        Expr::Quantified {
            expr: Box::new(expr),
            quantifier,
        }
    }

    /// Create a group
    pub fn group(expr: Expr) -> Self {
        Expr::Group(Box::new(expr))
    }

    /// Convert the AST back to pattern syntax
    pub fn to_regex_string(&self) -> String {
        match self {
            Expr::Empty => String::new(),
            Expr::Literal(c) => escape(*c, META),
            Expr::Any => ".".to_string(),
            Expr::Sequence(exprs) => exprs
                .iter()
                .map(|e| match e {
                    Expr::Alternation(_) => format!("({})", e.to_regex_string()),
                    _ => e.to_regex_string(),
                })
                .collect(),
            Expr::Alternation(exprs) => {
                let parts: Vec<_> = exprs.iter().map(|e| e.to_regex_string()).collect();
                parts.join("|")
            }
            Expr::CharacterClass(items) => {
                let mut result = String::from("[");
                for item in items {
                    match item {
                        ClassItem::Char(c) => result.push_str(&escape(*c, CLASS_META)),
                        ClassItem::Range(lo, hi) => {
                            result.push_str(&escape(*lo, CLASS_META));
                            result.push('-');
                            result.push_str(&escape(*hi, CLASS_META));
                        }
                    }
                }
                result.push(']');
                result
            }
            Expr::Quantified { expr, quantifier } => {
                let needs_parens = matches!(
                    expr.as_ref(),
                    Expr::Empty | Expr::Sequence(_) | Expr::Alternation(_)
                );
                let expr_str = if needs_parens {
                    format!("({})", expr.to_regex_string())
                } else {
                    expr.to_regex_string()
                };
                format!("{}{}", expr_str, quantifier)
            }
            Expr::Group(expr) => format!("({})", expr.to_regex_string()),
        }
    }
}

/// Characters that need a backslash outside a class
const META: &[char] = &['\\', '|', '*', '+', '?', '.', '(', ')', '[', ']'];

/// Characters that need a backslash inside a class
const CLASS_META: &[char] = &['\\', '[', ']', '-'];

fn escape(c: char, meta: &[char]) -> String {
    match c {
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        '\r' => "\\r".to_string(),
        c if meta.contains(&c) => format!("\\{}", c),
        c => c.to_string(),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_regex_string())
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Quantifier::ZeroOrMore => "*",
            Quantifier::OneOrMore => "+",
            Quantifier::Optional => "?",
        };
        f.write_str(s)
    }
}
