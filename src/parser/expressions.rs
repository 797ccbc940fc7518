//! Constant expression parsing
//!
//! Array bounds, bit-field widths, enumerator values and initializers are
//! parsed here using precedence climbing for binary operators and recursive
//! descent for the rest.
//!
//! # Supported Expressions
//!
//! - Literals: integers, characters, strings (adjacent strings concatenate)
//! - Identifiers (enum constants, addresses of objects)
//! - Binary operators: `| ^ & << >> + - * / %`
//! - Unary operators: `-`, `+`, `!`, `~`, `&`, `*`
//! - `sizeof(type)` and `sizeof expr`
//! - Parenthesized sub-expressions
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

fn binary_operator(token: &Token) -> Option<BinOp> {
    let op = match token {
        Token::Pipe(_) => BinOp::BitOr,
        Token::Caret(_) => BinOp::BitXor,
        Token::Amp(_) => BinOp::BitAnd,
        Token::LtLt(_) => BinOp::Shl,
        Token::GtGt(_) => BinOp::Shr,
        Token::Plus(_) => BinOp::Add,
        Token::Minus(_) => BinOp::Sub,
        Token::Star(_) => BinOp::Mul,
        Token::Slash(_) => BinOp::Div,
        Token::Percent(_) => BinOp::Mod,
        _ => return None,
    };
    Some(op)
}

impl Parser {
    /// Parse constant expression (top-level entry point)
    pub(crate) fn parse_constant_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(1)
    }

    /// Precedence climbing over left-associative binary operators
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(op) = binary_operator(self.peek()) {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            let location = self.current_location();
            self.advance();
            let right = self.parse_binary(precedence + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }

        Ok(left)
    }

    /// Parse unary: -x, +x, !x, ~x, &x, *x, sizeof
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        let op = match self.peek() {
            Token::Minus(_) => Some(UnOp::Neg),
            Token::Bang(_) => Some(UnOp::Not),
            Token::Tilde(_) => Some(UnOp::BitNot),
            Token::Amp(_) => Some(UnOp::AddrOf),
            Token::Star(_) => Some(UnOp::Deref),
            Token::Plus(_) => {
                // unary plus changes nothing
                self.advance();
                return self.parse_unary();
            }
            Token::Sizeof(_) => {
                self.advance();
                return self.parse_sizeof(location);
            }
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
                location,
            });
        }

        self.parse_primary()
    }

    fn parse_sizeof(&mut self, location: SourceLocation) -> Result<Expr, ParseError> {
        let is_type = matches!(self.peek(), Token::LParen(_))
            && self.peek_ahead(1).is_some_and(|token| self.is_type_start(token));

        if is_type {
            self.advance(); // '('
            let (specifier, declarator) = self.parse_type_name()?;
            self.expect_rparen("after type name in sizeof")?;
            return Ok(Expr::SizeofType {
                specifier: Box::new(specifier),
                declarator: Box::new(declarator),
                location,
            });
        }

        let expr = self.parse_unary()?;
        Ok(Expr::SizeofExpr {
            expr: Box::new(expr),
            location,
        })
    }

    /// Parse primary: literal, identifier, parenthesized expression
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek_token() {
            Token::IntLiteral(n, loc) => {
                self.advance();
                Ok(Expr::IntLiteral(n, loc))
            }
            Token::FloatLiteral(s, loc) => {
                self.advance();
                Ok(Expr::FloatLiteral(s, loc))
            }
            Token::CharLiteral(c, loc) => {
                self.advance();
                Ok(Expr::CharLiteral(c, loc))
            }
            Token::StringLiteral(s, loc) => {
                self.advance();
                let mut text = s;
                while let Token::StringLiteral(next, _) = self.peek_token() {
                    text.push_str(&next);
                    self.advance();
                }
                Ok(Expr::StringLiteral(text, loc))
            }
            Token::Ident(name, loc) => {
                self.advance();
                Ok(Expr::Identifier(name, loc))
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_constant_expression()?;
                self.expect_rparen("after expression")?;
                Ok(expr)
            }
            _ => Err(self.error_expected("expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(source: &str) -> Expr {
        let mut parser = Parser::new(source).unwrap();
        let expr = parser.parse_constant_expression().unwrap();
        assert!(parser.is_at_end(), "trailing input in {:?}", source);
        expr
    }

    fn fold(source: &str) -> Option<i64> {
        expr(source).fold(&|_: &str| None)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(fold("1 + 2 * 3"), Some(7));
        assert_eq!(fold("(1 + 2) * 3"), Some(9));
        assert_eq!(fold("1 << 2 + 1"), Some(8));
        assert_eq!(fold("6 & 3 | 8"), Some(10));
        assert_eq!(fold("10 - 4 - 3"), Some(3));
    }

    #[test]
    fn test_unary() {
        assert_eq!(fold("-4 + +2"), Some(-2));
        assert_eq!(fold("~0"), Some(-1));
        assert_eq!(fold("!5"), Some(0));
    }

    #[test]
    fn test_fold_failures() {
        assert_eq!(fold("1 / 0"), None);
        assert_eq!(fold("N * 2"), None);
        assert_eq!(fold("sizeof(int)"), None);
        assert_eq!(fold("\"text\""), None);
        assert_eq!(fold("1.5 * 2"), None);
        assert_eq!(fold("18446744073709551615u"), None);
        assert_eq!(fold("9223372036854775807"), Some(i64::MAX));
    }

    #[test]
    fn test_floating_operand() {
        match expr("-2.5e3") {
            Expr::Unary { operand, .. } => {
                assert!(matches!(*operand, Expr::FloatLiteral(ref s, _) if s == "2.5e3"));
            }
            other => panic!("Expected negated float, got {:?}", other),
        }
    }

    #[test]
    fn test_fold_with_lookup() {
        let e = expr("N * 2 + 1");
        assert_eq!(e.fold(&|name: &str| (name == "N").then_some(20)), Some(41));
    }

    #[test]
    fn test_sizeof_forms() {
        assert!(matches!(expr("sizeof(char *)"), Expr::SizeofType { .. }));
        assert!(matches!(expr("sizeof (x)"), Expr::SizeofExpr { .. }));
        assert!(matches!(expr("sizeof x"), Expr::SizeofExpr { .. }));
    }

    #[test]
    fn test_string_concatenation() {
        match expr(r#""ab" "cd""#) {
            Expr::StringLiteral(s, _) => assert_eq!(s, "abcd"),
            other => panic!("Expected string literal, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_operand() {
        let mut parser = Parser::new("1 +").unwrap();
        assert!(parser.parse_constant_expression().is_err());
    }
}
