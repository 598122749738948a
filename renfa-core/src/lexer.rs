//! Lexer for tokenizing regex patterns
//!
//! This module provides a tokenizer that converts regex pattern strings
//! into a stream of tokens for parsing. Escapes are resolved here, so the
//! parser only ever sees [`Token::Literal`] for escaped characters.

use crate::error::{LexerErrorKind, RegexError};
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// A token in a regex pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Left bracket `[` (start of character class)
    LeftBracket,
    /// Right bracket `]` (end of character class)
    RightBracket,
    /// Dash `-` between two class items; a literal outside classes
    Dash,
    /// Pipe `|` (alternation)
    Pipe,
    /// Dot `.` (any character)
    Dot,
    /// Star `*` (zero or more)
    Star,
    /// Plus `+` (one or more)
    Plus,
    /// Question `?` (optional)
    Question,
    /// A literal character, escaped or not
    Literal(char),
    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftParen => write!(f, "`(`"),
            Token::RightParen => write!(f, "`)`"),
            Token::LeftBracket => write!(f, "`[`"),
            Token::RightBracket => write!(f, "`]`"),
            Token::Dash => write!(f, "`-`"),
            Token::Pipe => write!(f, "`|`"),
            Token::Dot => write!(f, "`.`"),
            Token::Star => write!(f, "`*`"),
            Token::Plus => write!(f, "`+`"),
            Token::Question => write!(f, "`?`"),
            Token::Literal(c) => write!(f, "literal {:?}", c),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

/// Lexer for tokenizing regex patterns
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Number of characters consumed so far
    position: usize,
    /// Whether we're currently inside a character class
    in_char_class: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input string
    pub fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            position: 0,
            in_char_class: false,
        }
    }

    /// Character position of the next unread character
    pub fn position(&self) -> usize {
        self.position
    }

    /// Consume one character
    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += 1;
        Some(c)
    }

    fn error(&self, position: usize, kind: LexerErrorKind) -> RegexError {
        RegexError::Lexer { position, kind }
    }

    /// Read an escape sequence (the backslash at `start` was already consumed)
    fn read_escape(&mut self, start: usize) -> Result<Token, RegexError> {
        match self.advance() {
            Some('n') => Ok(Token::Literal('\n')),
            Some('t') => Ok(Token::Literal('\t')),
            Some('r') => Ok(Token::Literal('\r')),
            Some(c @ ('\\' | '|' | '*' | '+' | '?' | '.' | '(' | ')' | '[' | ']' | '-')) => {
                Ok(Token::Literal(c))
            }
            Some(c) => Err(self.error(start, LexerErrorKind::InvalidEscape(c))),
            None => Err(self.error(start, LexerErrorKind::TrailingBackslash)),
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token, RegexError> {
        let start = self.position;
        let Some(c) = self.advance() else {
            if self.in_char_class {
                return Err(self.error(start, LexerErrorKind::UnclosedCharacterClass));
            }
            return Ok(Token::Eof);
        };

        if c == '\\' {
            return self.read_escape(start);
        }

        if self.in_char_class {
            return Ok(match c {
                ']' => {
                    self.in_char_class = false;
                    Token::RightBracket
                }
                '-' => Token::Dash,
                c => Token::Literal(c),
            });
        }

        let token = match c {
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '[' => {
                self.in_char_class = true;
                Token::LeftBracket
            }
            ']' => return Err(self.error(start, LexerErrorKind::UnexpectedChar(']'))),
            '|' => Token::Pipe,
            '.' => Token::Dot,
            '*' => Token::Star,
            '+' => Token::Plus,
            '?' => Token::Question,
            c => Token::Literal(c),
        };
        Ok(token)
    }

    /// Tokenize the entire input and return a vector of tokens
    pub fn tokenize(&mut self) -> Result<Vec<Token>, RegexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            tokens.push(token);
            if token == Token::Eof {
                break;
            }
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize().unwrap()
    }

    fn lex_err(input: &str) -> RegexError {
        Lexer::new(input).tokenize().unwrap_err()
    }

    #[test]
    fn test_literal_sequence() {
        assert_eq!(
            lex("abc"),
            vec![
                Token::Literal('a'),
                Token::Literal('b'),
                Token::Literal('c'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(lex(""), vec![Token::Eof]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            lex("(a|b)*.+?"),
            vec![
                Token::LeftParen,
                Token::Literal('a'),
                Token::Pipe,
                Token::Literal('b'),
                Token::RightParen,
                Token::Star,
                Token::Dot,
                Token::Plus,
                Token::Question,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_dash_is_literal_outside_class() {
        assert_eq!(lex("a-b")[1], Token::Literal('-'));
    }

    #[test]
    fn test_character_class() {
        assert_eq!(
            lex("[a-z.*]"),
            vec![
                Token::LeftBracket,
                Token::Literal('a'),
                Token::Dash,
                Token::Literal('z'),
                Token::Literal('.'),
                Token::Literal('*'),
                Token::RightBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            lex(r"\n\t\r\*\\\[\-"),
            vec![
                Token::Literal('\n'),
                Token::Literal('\t'),
                Token::Literal('\r'),
                Token::Literal('*'),
                Token::Literal('\\'),
                Token::Literal('['),
                Token::Literal('-'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_escaped_dash_in_class() {
        assert_eq!(
            lex(r"[\-]"),
            vec![
                Token::LeftBracket,
                Token::Literal('-'),
                Token::RightBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_invalid_escape() {
        assert_eq!(
            lex_err(r"ab\q"),
            RegexError::Lexer {
                position: 2,
                kind: LexerErrorKind::InvalidEscape('q'),
            }
        );
    }

    #[test]
    fn test_trailing_backslash() {
        assert_eq!(
            lex_err("a\\"),
            RegexError::Lexer {
                position: 1,
                kind: LexerErrorKind::TrailingBackslash,
            }
        );
    }

    #[test]
    fn test_unclosed_class() {
        assert_eq!(
            lex_err("[abc"),
            RegexError::Lexer {
                position: 4,
                kind: LexerErrorKind::UnclosedCharacterClass,
            }
        );
    }

    #[test]
    fn test_stray_right_bracket() {
        assert_eq!(
            lex_err("a]"),
            RegexError::Lexer {
                position: 1,
                kind: LexerErrorKind::UnexpectedChar(']'),
            }
        );
    }

    #[test]
    fn test_unicode_positions_count_chars() {
        let mut lexer = Lexer::new("éx");
        assert_eq!(lexer.next_token().unwrap(), Token::Literal('é'));
        assert_eq!(lexer.position(), 1);
    }
}
