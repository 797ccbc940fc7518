//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, token helpers, error recovery, and the main parse
//! entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, recovery, and coordination
//! - `declarations`: declaration specifiers, declarators, struct/enum bodies
//! - `expressions`: constant expressions with precedence climbing
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.
//!
//! # Error recovery
//!
//! Errors inside one declarator are recorded, the declarator's slot is left
//! empty, and parsing resumes at the next `,` or `;`. Errors elsewhere in a
//! declaration skip the rest of the statement. Only lexer errors and running
//! out of input while recovering stop the parse.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

/// Parser error type
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        ParseError {
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for C declarations
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    /// Identifiers that name a type in the current translation unit
    pub(crate) typedef_names: FxHashSet<String>,
    /// Enumeration constants seen so far, for folding array bounds
    pub(crate) enum_constants: FxHashMap<String, i64>,
    pub(crate) diagnostics: Vec<ParseError>,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            typedef_names: FxHashSet::default(),
            enum_constants: FxHashMap::default(),
            diagnostics: Vec::new(),
        })
    }

    /// Treat `name` as a typedef name before parsing starts.
    ///
    /// Headers are not read, so types such as `size_t` or `FILE` are unknown
    /// unless declared this way.
    pub fn declare_typedef(&mut self, name: impl Into<String>) {
        self.typedef_names.insert(name.into());
    }

    pub fn is_typedef_name(&self, name: &str) -> bool {
        self.typedef_names.contains(name)
    }

    /// Value of an enumeration constant declared so far
    pub fn enum_constant(&self, name: &str) -> Option<i64> {
        self.enum_constants.get(name).copied()
    }

    /// Parse the whole input
    pub fn parse_translation_unit(&mut self) -> Result<TranslationUnit, ParseError> {
        let mut unit = TranslationUnit::new();

        while !self.is_at_end() {
            match self.parse_external_declaration() {
                Ok(Some(item)) => unit.items.push(item),
                Ok(None) => {}
                Err(err) => {
                    if self.is_at_end() {
                        return Err(err);
                    }
                    self.diagnostics.push(err);
                    self.skip_statement()?;
                }
            }
        }

        unit.diagnostics = std::mem::take(&mut self.diagnostics);
        Ok(unit)
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    /// Error reporting what was expected at the current token
    pub(crate) fn error_expected(&self, what: &str) -> ParseError {
        ParseError::new(
            format!("Expected {}, found {}", what, self.peek()),
            self.current_location(),
        )
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(
                format!("{}, found {}", message, self.peek()),
                self.current_location(),
            ))
        }
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBrace(self.current_location()),
            &format!("Expected '}}' {ctx}"),
        )
    }

    pub(crate) fn expect_rbracket(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBracket(self.current_location()),
            &format!("Expected ']' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<(String, SourceLocation), ParseError> {
        if let Token::Ident(name, loc) = self.peek_token() {
            self.advance();
            Ok((name, loc))
        } else {
            Err(self.error_expected("identifier"))
        }
    }

    // ===== Error recovery =====

    /// True at a `,` or `;`, where one declarator ends.
    pub(crate) fn at_declarator_end(&self) -> bool {
        matches!(self.peek(), Token::Comma(_) | Token::Semicolon(_))
    }

    /// Skip the rest of a malformed declarator.
    ///
    /// Stops before a `,` or `;` at nesting depth zero, or before a closing
    /// bracket that was opened outside the declarator.
    pub(crate) fn skip_declarator(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                Token::Eof(loc) => {
                    return Err(ParseError::new(
                        "Unexpected end of file while skipping a malformed declarator",
                        *loc,
                    ));
                }
                Token::Comma(_) | Token::Semicolon(_) if depth == 0 => return Ok(()),
                Token::RParen(_) | Token::RBracket(_) | Token::RBrace(_) if depth == 0 => {
                    return Ok(());
                }
                Token::LParen(_) | Token::LBracket(_) | Token::LBrace(_) => depth += 1,
                Token::RParen(_) | Token::RBracket(_) | Token::RBrace(_) => depth -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip past the end of the current statement.
    ///
    /// Consumes up to and including a `;` at depth zero, or a brace block that
    /// closes back to depth zero (a function body). Always consumes at least
    /// one token.
    pub(crate) fn skip_statement(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            let token = self.peek_token();
            if let Token::Eof(loc) = token {
                return Err(ParseError::new(
                    "Unexpected end of file while skipping a malformed declaration",
                    loc,
                ));
            }
            self.advance();
            match token {
                Token::Semicolon(_) if depth == 0 => return Ok(()),
                Token::LParen(_) | Token::LBracket(_) | Token::LBrace(_) => depth += 1,
                Token::RBrace(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 && !self.check(&Token::Semicolon(self.current_location())) {
                        return Ok(());
                    }
                }
                Token::RParen(_) | Token::RBracket(_) => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
    }

    /// Skip a struct member after an error: past its `;`, or up to the `}`
    /// that closes the member list.
    pub(crate) fn skip_member(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                Token::Eof(loc) => {
                    return Err(ParseError::new(
                        "Unexpected end of file in struct or union body",
                        *loc,
                    ));
                }
                Token::RBrace(_) if depth == 0 => return Ok(()),
                Token::Semicolon(_) if depth == 0 => {
                    self.advance();
                    return Ok(());
                }
                Token::LParen(_) | Token::LBracket(_) | Token::LBrace(_) => depth += 1,
                Token::RParen(_) | Token::RBracket(_) | Token::RBrace(_) => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip a `{ ... }` block, returning the location of its closing brace.
    pub(crate) fn skip_braced_block(&mut self) -> Result<SourceLocation, ParseError> {
        let open = self.current_location();
        self.expect_token(&Token::LBrace(open), "Expected '{'")?;
        let mut depth = 1usize;
        loop {
            match self.advance().clone() {
                Token::LBrace(_) => depth += 1,
                Token::RBrace(loc) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(loc);
                    }
                }
                Token::Eof(_) => {
                    return Err(ParseError::new("Unterminated function body", open));
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> TranslationUnit {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_translation_unit().unwrap()
    }

    fn names(decl: &SimpleDeclaration) -> Vec<String> {
        decl.declarators()
            .map(|d| d.name.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_parse_declarator_list() {
        let unit = parse("int a, *b, c[3];");

        assert_eq!(unit.items.len(), 1);
        assert!(unit.diagnostics.is_empty());
        let decl = &unit.items[0].declaration;
        assert_eq!(decl.specifier().unwrap().base, BaseType::Int);
        assert_eq!(names(decl), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_type_only_declaration() {
        let unit = parse("struct Point { int x; int y; };");

        assert_eq!(unit.items.len(), 1);
        let decl = &unit.items[0].declaration;
        assert!(decl.declarators().next().is_none());
        match &decl.specifier().unwrap().base {
            BaseType::Record { tag, members, .. } => {
                assert_eq!(tag.as_deref(), Some("Point"));
                assert_eq!(members.as_ref().unwrap().len(), 2);
            }
            other => panic!("Expected struct, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_definition_skips_body() {
        let unit = parse("int main(void) { int x = 1; if (x) { return 2; } return 0; }\nint y;");

        assert_eq!(unit.items.len(), 2);
        assert_eq!(unit.items[0].kind, ExternalKind::FunctionDefinition);
        assert_eq!(names(&unit.items[0].declaration), vec!["main"]);
        assert_eq!(unit.items[1].kind, ExternalKind::Declaration);
        assert_eq!(unit.items[1].span.start.line, 2);
    }

    #[test]
    fn test_recovery_leaves_tombstone_out_of_view() {
        let unit = parse("int a, [4], b;");

        assert_eq!(unit.diagnostics.len(), 1);
        let decl = &unit.items[0].declaration;
        assert_eq!(names(decl), vec!["a", "b"]);
        assert_eq!(decl.tombstones(), 0);
    }

    #[test]
    fn test_recovery_skips_bad_statement() {
        let unit = parse("unknown_t x;\nint y;");

        assert_eq!(unit.diagnostics.len(), 1);
        assert_eq!(unit.diagnostics[0].location.line, 1);
        assert_eq!(unit.items.len(), 1);
        assert_eq!(names(&unit.items[0].declaration), vec!["y"]);
    }

    #[test]
    fn test_declared_typedef() {
        let mut parser = Parser::new("size_t n;").unwrap();
        parser.declare_typedef("size_t");
        let unit = parser.parse_translation_unit().unwrap();

        assert!(unit.diagnostics.is_empty());
        assert_eq!(
            unit.items[0].declaration.specifier().unwrap().base,
            BaseType::TypedefName("size_t".to_string())
        );
    }

    #[test]
    fn test_missing_semicolon_at_eof_is_fatal() {
        let mut parser = Parser::new("int x").unwrap();
        assert!(parser.parse_translation_unit().is_err());
    }

    #[test]
    fn test_lex_error_is_fatal() {
        assert!(Parser::new("int @x;").is_err());
    }
}
