//! Parser for regex patterns
//!
//! This module provides a recursive descent parser that converts
//! tokens into an Abstract Syntax Tree (AST).
//!
//! Grammar (in order of precedence, lowest to highest):
//!   regex       := alternation EOF
//!   alternation := sequence ( '|' sequence )*
//!   sequence    := quantified*
//!   quantified  := atom ( '*' | '+' | '?' )*
//!   atom        := literal | '.' | '(' alternation ')' | char_class
//!   char_class  := '[' class_item+ ']'
//!   class_item  := char ( '-' char )?

use crate::ast::{ClassItem, Expr, Quantifier};
use crate::error::{ParseError, RegexError};
use crate::lexer::{Lexer, Token};

/// Default limit on how deeply groups and quantifiers may nest
pub const NEST_LIMIT: usize = 250;

/// Parser for regex patterns
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
    /// Groups currently open
    depth: usize,
    nest_limit: usize,
}

/// A parsed expression and how many levels of nesting it holds
type Parsed = (Expr, usize);

impl<'a> Parser<'a> {
    /// Create a new parser for the given input string
    pub fn new(input: &'a str) -> Result<Self, RegexError> {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            depth: 0,
            nest_limit: NEST_LIMIT,
        })
    }

    /// Set how deeply groups and quantifiers may nest before parsing fails
    /// with [`ParseError::NestingTooDeep`]
    pub fn nest_limit(mut self, limit: usize) -> Self {
        self.nest_limit = limit;
        self
    }

    /// Advance to the next token
    fn advance(&mut self) -> Result<(), RegexError> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    /// Expect a specific token, error if not found
    fn expect(&mut self, expected: Token) -> Result<(), RegexError> {
        if self.current_token == expected {
            self.advance()
        } else if self.current_token == Token::Eof {
            Err(ParseError::UnexpectedEof.into())
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> RegexError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.current_token.to_string(),
        }
        .into()
    }

    fn check_nesting(&self, height: usize) -> Result<(), RegexError> {
        if height > self.nest_limit {
            return Err(ParseError::NestingTooDeep {
                limit: self.nest_limit,
            }
            .into());
        }
        Ok(())
    }

    /// Parse the entire input and return the AST
    pub fn parse(&mut self) -> Result<Expr, RegexError> {
        let (expr, _) = self.parse_alternation()?;

        // Ensure we've consumed all tokens
        if self.current_token != Token::Eof {
            return Err(self.unexpected("EOF"));
        }

        Ok(expr)
    }

    /// Parse alternation (lowest precedence)
    /// alternation := sequence ( '|' sequence )*
    fn parse_alternation(&mut self) -> Result<Parsed, RegexError> {
        let (first, mut height) = self.parse_sequence()?;
        let mut alternatives = vec![first];

        while self.current_token == Token::Pipe {
            self.advance()?; // consume '|'
            let (expr, h) = self.parse_sequence()?;
            alternatives.push(expr);
            height = height.max(h);
        }

        if alternatives.len() > 1 {
            height += 1;
        }
        Ok((Expr::alternation(alternatives), height))
    }

    /// Parse a sequence (concatenation)
    /// sequence := quantified*
    fn parse_sequence(&mut self) -> Result<Parsed, RegexError> {
        let mut expressions = Vec::new();
        let mut height = 0;

        while !matches!(
            self.current_token,
            Token::Eof | Token::RightParen | Token::Pipe
        ) {
            let (expr, h) = self.parse_quantified()?;
            expressions.push(expr);
            height = height.max(h);
        }

        if expressions.len() > 1 {
            height += 1;
        }
        Ok((Expr::sequence(expressions), height))
    }

    /// Parse an atom followed by any number of quantifiers
    /// quantified := atom ( '*' | '+' | '?' )*
    fn parse_quantified(&mut self) -> Result<Parsed, RegexError> {
        let (mut expr, mut height) = self.parse_atom()?;

        loop {
            let quantifier = match self.current_token {
                Token::Star => Quantifier::ZeroOrMore,
                Token::Plus => Quantifier::OneOrMore,
                Token::Question => Quantifier::Optional,
                _ => break,
            };
            height += 1;
            self.check_nesting(height)?;
            self.advance()?;
            expr = Expr::quantified(expr, quantifier);
        }

        Ok((expr, height))
    }

    /// Parse an atomic expression
    /// atom := literal | '.' | '(' alternation ')' | char_class
    fn parse_atom(&mut self) -> Result<Parsed, RegexError> {
        match self.current_token {
            Token::Literal(c) => {
                self.advance()?;
                Ok((Expr::Literal(c), 0))
            }
            Token::Dot => {
                self.advance()?;
                Ok((Expr::Any, 0))
            }
            Token::LeftParen => {
                // Checked on the way down so the recursion itself stays bounded
                self.depth += 1;
                self.check_nesting(self.depth)?;
                self.advance()?; // consume '('
                let (inner, height) = self.parse_alternation()?;
                self.expect(Token::RightParen)?;
                self.depth -= 1;

                let height = height + 1;
                self.check_nesting(height)?;
                Ok((Expr::group(inner), height))
            }
            Token::LeftBracket => Ok((self.parse_char_class()?, 0)),
            Token::Eof => Err(ParseError::UnexpectedEof.into()),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Parse a character class
    /// char_class := '[' class_item+ ']'
    fn parse_char_class(&mut self) -> Result<Expr, RegexError> {
        self.expect(Token::LeftBracket)?;

        let mut items = Vec::new();
        while self.current_token != Token::RightBracket {
            self.parse_class_item(&mut items)?;
        }

        if items.is_empty() {
            return Err(ParseError::EmptyCharacterClass.into());
        }

        self.expect(Token::RightBracket)?;
        Ok(Expr::char_class(items))
    }

    /// Parse an item in a character class
    /// class_item := char ( '-' char )?
    fn parse_class_item(&mut self, items: &mut Vec<ClassItem>) -> Result<(), RegexError> {
        let start = match self.current_token {
            Token::Literal(c) => c,
            // A leading dash is just a dash
            Token::Dash => '-',
            _ => return Err(self.unexpected("character")),
        };
        self.advance()?;

        if self.current_token != Token::Dash {
            items.push(ClassItem::Char(start));
            return Ok(());
        }
        self.advance()?; // consume '-'

        match self.current_token {
            Token::Literal(end) => {
                self.advance()?;
                items.push(ClassItem::Range(start, end));
            }
            // Trailing dash as in `[a-]`: both are plain characters
            Token::RightBracket => {
                items.push(ClassItem::Char(start));
                items.push(ClassItem::Char('-'));
            }
            _ => return Err(self.unexpected("character")),
        }
        Ok(())
    }
}

/// Parse a regex pattern string into an AST
pub fn parse(input: &str) -> Result<Expr, RegexError> {
    Parser::new(input)?.parse()
}
