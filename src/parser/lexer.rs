//! Lexer (tokenizer) for C declarations
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Preprocessor lines are skipped, not interpreted: `declview` looks at source
//! as written, so macros stay unexpanded.

use super::ast::SourceLocation;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(u64, SourceLocation),
    /// Floating constants keep their spelling, suffix included.
    FloatLiteral(String, SourceLocation),
    CharLiteral(i64, SourceLocation),
    StringLiteral(String, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Storage classes
    Typedef(SourceLocation),
    Extern(SourceLocation),
    Static(SourceLocation),
    Auto(SourceLocation),
    Register(SourceLocation),

    // Qualifiers
    Const(SourceLocation),
    Volatile(SourceLocation),

    // Type specifiers
    Void(SourceLocation),
    Bool(SourceLocation),
    Char(SourceLocation),
    Short(SourceLocation),
    Int(SourceLocation),
    Long(SourceLocation),
    Float(SourceLocation),
    Double(SourceLocation),
    Signed(SourceLocation),
    Unsigned(SourceLocation),
    Struct(SourceLocation),
    Union(SourceLocation),
    Enum(SourceLocation),

    Sizeof(SourceLocation),

    // Operators
    Plus(SourceLocation),    // +
    Minus(SourceLocation),   // -
    Star(SourceLocation),    // *
    Slash(SourceLocation),   // /
    Percent(SourceLocation), // %
    Amp(SourceLocation),     // &
    Pipe(SourceLocation),    // |
    Caret(SourceLocation),   // ^
    Tilde(SourceLocation),   // ~
    Bang(SourceLocation),    // !
    LtLt(SourceLocation),    // <<
    GtGt(SourceLocation),    // >>
    Eq(SourceLocation),      // =

    // Punctuation
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    LBrace(SourceLocation),    // {
    RBrace(SourceLocation),    // }
    LBracket(SourceLocation),  // [
    RBracket(SourceLocation),  // ]
    Semicolon(SourceLocation), // ;
    Comma(SourceLocation),     // ,
    Colon(SourceLocation),     // :
    Ellipsis(SourceLocation),  // ...

    /// Any other operator character. Only legal inside skipped function bodies.
    Other(char, SourceLocation),

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, loc)
            | Token::FloatLiteral(_, loc)
            | Token::CharLiteral(_, loc)
            | Token::StringLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::Other(_, loc) => *loc,
            Token::Typedef(loc)
            | Token::Extern(loc)
            | Token::Static(loc)
            | Token::Auto(loc)
            | Token::Register(loc)
            | Token::Const(loc)
            | Token::Volatile(loc)
            | Token::Void(loc)
            | Token::Bool(loc)
            | Token::Char(loc)
            | Token::Short(loc)
            | Token::Int(loc)
            | Token::Long(loc)
            | Token::Float(loc)
            | Token::Double(loc)
            | Token::Signed(loc)
            | Token::Unsigned(loc)
            | Token::Struct(loc)
            | Token::Union(loc)
            | Token::Enum(loc)
            | Token::Sizeof(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::Percent(loc)
            | Token::Amp(loc)
            | Token::Pipe(loc)
            | Token::Caret(loc)
            | Token::Tilde(loc)
            | Token::Bang(loc)
            | Token::LtLt(loc)
            | Token::GtGt(loc)
            | Token::Eq(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::Semicolon(loc)
            | Token::Comma(loc)
            | Token::Colon(loc)
            | Token::Ellipsis(loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n, _) => write!(f, "int literal {}", n),
            Token::FloatLiteral(s, _) => write!(f, "float literal {}", s),
            Token::CharLiteral(c, _) => match u8::try_from(*c) {
                Ok(byte) if byte.is_ascii_graphic() || byte == b' ' => {
                    write!(f, "char literal '{}'", byte as char)
                }
                _ => write!(f, "char literal {}", c),
            },
            Token::StringLiteral(s, _) => write!(f, "string literal \"{}\"", s),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Typedef(_) => write!(f, "'typedef'"),
            Token::Extern(_) => write!(f, "'extern'"),
            Token::Static(_) => write!(f, "'static'"),
            Token::Auto(_) => write!(f, "'auto'"),
            Token::Register(_) => write!(f, "'register'"),
            Token::Const(_) => write!(f, "'const'"),
            Token::Volatile(_) => write!(f, "'volatile'"),
            Token::Void(_) => write!(f, "'void'"),
            Token::Bool(_) => write!(f, "'_Bool'"),
            Token::Char(_) => write!(f, "'char'"),
            Token::Short(_) => write!(f, "'short'"),
            Token::Int(_) => write!(f, "'int'"),
            Token::Long(_) => write!(f, "'long'"),
            Token::Float(_) => write!(f, "'float'"),
            Token::Double(_) => write!(f, "'double'"),
            Token::Signed(_) => write!(f, "'signed'"),
            Token::Unsigned(_) => write!(f, "'unsigned'"),
            Token::Struct(_) => write!(f, "'struct'"),
            Token::Union(_) => write!(f, "'union'"),
            Token::Enum(_) => write!(f, "'enum'"),
            Token::Sizeof(_) => write!(f, "'sizeof'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::Percent(_) => write!(f, "'%'"),
            Token::Amp(_) => write!(f, "'&'"),
            Token::Pipe(_) => write!(f, "'|'"),
            Token::Caret(_) => write!(f, "'^'"),
            Token::Tilde(_) => write!(f, "'~'"),
            Token::Bang(_) => write!(f, "'!'"),
            Token::LtLt(_) => write!(f, "'<<'"),
            Token::GtGt(_) => write!(f, "'>>'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Colon(_) => write!(f, "':'"),
            Token::Ellipsis(_) => write!(f, "'...'"),
            Token::Other(c, _) => write!(f, "'{}'", c),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// Lexer error type
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Lexer for C source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            // Directives are only recognized at the start of a line
            if self.peek() == Some('#') && self.at_line_start() {
                self.skip_preprocessor_directive();
                continue;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            '"' => self.string_literal(loc),
            '\'' => self.char_literal(loc),
            '0'..='9' => self.number_literal(ch, loc),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword(ch, loc)),

            '<' if self.peek() == Some('<') => {
                self.advance();
                Ok(Token::LtLt(loc))
            }
            '>' if self.peek() == Some('>') => {
                self.advance();
                Ok(Token::GtGt(loc))
            }
            '.' if self.peek() == Some('.') && self.peek_ahead(1) == Some('.') => {
                self.advance();
                self.advance();
                Ok(Token::Ellipsis(loc))
            }
            '=' if self.peek() == Some('=') => {
                self.advance();
                Ok(Token::Other('=', loc))
            }

            '+' => Ok(Token::Plus(loc)),
            '-' => Ok(Token::Minus(loc)),
            '*' => Ok(Token::Star(loc)),
            '/' => Ok(Token::Slash(loc)),
            '%' => Ok(Token::Percent(loc)),
            '&' => Ok(Token::Amp(loc)),
            '|' => Ok(Token::Pipe(loc)),
            '^' => Ok(Token::Caret(loc)),
            '~' => Ok(Token::Tilde(loc)),
            '!' => Ok(Token::Bang(loc)),
            '=' => Ok(Token::Eq(loc)),
            '(' => Ok(Token::LParen(loc)),
            ')' => Ok(Token::RParen(loc)),
            '{' => Ok(Token::LBrace(loc)),
            '}' => Ok(Token::RBrace(loc)),
            '[' => Ok(Token::LBracket(loc)),
            ']' => Ok(Token::RBracket(loc)),
            ';' => Ok(Token::Semicolon(loc)),
            ',' => Ok(Token::Comma(loc)),
            ':' => Ok(Token::Colon(loc)),
            '<' | '>' | '.' | '?' | '#' => Ok(Token::Other(ch, loc)),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Parse string literal
    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.advance(); // consume closing quote
                    return Ok(Token::StringLiteral(string, loc));
                }
                '\n' => break,
                '\\' => {
                    self.advance();
                    let value = self.escape_sequence()?;
                    string.push(char::from_u32(value as u32).unwrap_or('\u{fffd}'));
                }
                _ => {
                    string.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Parse character literal
    fn char_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file in character literal".to_string(),
            location: self.current_location(),
        })?;

        let value = match ch {
            '\\' => self.escape_sequence()?,
            '\'' | '\n' => {
                return Err(LexError {
                    message: "Empty character literal".to_string(),
                    location: loc,
                });
            }
            _ => ch as i64,
        };

        if self.advance() != Some('\'') {
            return Err(LexError {
                message: "Expected closing quote in character literal".to_string(),
                location: self.current_location(),
            });
        }

        Ok(Token::CharLiteral(value, loc))
    }

    /// Decode the escape sequence after a backslash
    fn escape_sequence(&mut self) -> Result<i64, LexError> {
        let escaped = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file in escape sequence".to_string(),
            location: self.current_location(),
        })?;

        let value = match escaped {
            'n' => '\n' as i64,
            't' => '\t' as i64,
            'r' => '\r' as i64,
            'a' => 0x07,
            'b' => 0x08,
            'f' => 0x0c,
            'v' => 0x0b,
            '\\' => '\\' as i64,
            '\'' => '\'' as i64,
            '"' => '"' as i64,
            '?' => '?' as i64,
            'x' => {
                let mut digits = String::new();
                while let Some(c) = self.peek().filter(|c| c.is_ascii_hexdigit()) {
                    digits.push(c);
                    self.advance();
                }
                i64::from_str_radix(&digits, 16).map_err(|_| LexError {
                    message: format!("Invalid hex escape sequence: \\x{}", digits),
                    location: self.current_location(),
                })?
            }
            '0'..='7' => {
                let mut value = escaped as i64 - '0' as i64;
                for _ in 0..2 {
                    match self.peek() {
                        Some(c @ '0'..='7') => {
                            value = value * 8 + (c as i64 - '0' as i64);
                            self.advance();
                        }
                        _ => break,
                    }
                }
                value
            }
            _ => {
                return Err(LexError {
                    message: format!("Unknown escape sequence: \\{}", escaped),
                    location: self.current_location(),
                });
            }
        };

        Ok(value)
    }

    /// Parse a numeric constant.
    ///
    /// Integers are decimal, octal (`017`) or hex (`0x1f`), up to `u64::MAX`;
    /// `u` and `l` suffixes are accepted and ignored. Anything with a
    /// fraction or exponent (`1.5`, `.5`, `1e-3`, `0x1p4`) lexes as a
    /// [`Token::FloatLiteral`] carrying its spelling.
    fn number_literal(&mut self, first: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut spelling = String::from(first);

        if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            spelling.extend(self.advance());
            let digits = self.take_digits(16);
            spelling.push_str(&digits);

            if matches!(self.peek(), Some('.' | 'p' | 'P')) {
                if self.peek() == Some('.') {
                    spelling.extend(self.advance());
                    spelling.push_str(&self.take_digits(16));
                }
                if !matches!(self.peek(), Some('p' | 'P')) {
                    return Err(LexError {
                        message: "Hexadecimal floating constant requires an exponent".to_string(),
                        location: loc,
                    });
                }
                self.exponent(&mut spelling, loc)?;
                return self.float_literal(spelling, loc);
            }

            if digits.is_empty() {
                return Err(LexError {
                    message: format!("Missing digits in integer literal {}", spelling),
                    location: loc,
                });
            }
            self.integer_suffix(first, loc)?;
            return Self::integer_value(&digits, 16, loc);
        }

        spelling.push_str(&self.take_digits(10));
        let mut is_float = first == '.';
        if !is_float && self.peek() == Some('.') {
            is_float = true;
            spelling.extend(self.advance());
            spelling.push_str(&self.take_digits(10));
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.exponent(&mut spelling, loc)?;
        }
        if is_float {
            return self.float_literal(spelling, loc);
        }

        self.integer_suffix(first, loc)?;
        if spelling.len() > 1 && first == '0' {
            return Self::integer_value(&spelling[1..], 8, loc);
        }
        Self::integer_value(&spelling, 10, loc)
    }

    /// Consume digits of the given radix
    fn take_digits(&mut self, radix: u32) -> String {
        let mut digits = String::new();
        while let Some(ch) = self.peek().filter(|c| c.is_digit(radix)) {
            digits.push(ch);
            self.advance();
        }
        digits
    }

    /// Consume an exponent marker, optional sign and its digits
    fn exponent(&mut self, spelling: &mut String, loc: SourceLocation) -> Result<(), LexError> {
        spelling.extend(self.advance());
        if matches!(self.peek(), Some('+' | '-')) {
            spelling.extend(self.advance());
        }
        let digits = self.take_digits(10);
        if digits.is_empty() {
            return Err(LexError {
                message: format!("Exponent has no digits in {}", spelling),
                location: loc,
            });
        }
        spelling.push_str(&digits);
        Ok(())
    }

    fn float_literal(&mut self, mut spelling: String, loc: SourceLocation) -> Result<Token, LexError> {
        if matches!(self.peek(), Some('f' | 'F' | 'l' | 'L')) {
            spelling.extend(self.advance());
        }
        if matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '.' || c == '_') {
            return Err(LexError {
                message: format!("Invalid floating constant starting with {}", spelling),
                location: loc,
            });
        }
        Ok(Token::FloatLiteral(spelling, loc))
    }

    /// Skip `u`/`l` suffixes and reject anything glued on after them
    fn integer_suffix(&mut self, first: char, loc: SourceLocation) -> Result<(), LexError> {
        while matches!(self.peek(), Some('u' | 'U' | 'l' | 'L')) {
            self.advance();
        }
        if matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '.' || c == '_') {
            return Err(LexError {
                message: format!("Invalid integer literal starting with '{}'", first),
                location: loc,
            });
        }
        Ok(())
    }

    fn integer_value(digits: &str, radix: u32, loc: SourceLocation) -> Result<Token, LexError> {
        let value = u64::from_str_radix(digits, radix).map_err(|_| LexError {
            message: format!("Invalid integer literal: {}", digits),
            location: loc,
        })?;
        Ok(Token::IntLiteral(value, loc))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "typedef" => Token::Typedef(loc),
            "extern" => Token::Extern(loc),
            "static" => Token::Static(loc),
            "auto" => Token::Auto(loc),
            "register" => Token::Register(loc),
            "const" => Token::Const(loc),
            "volatile" => Token::Volatile(loc),
            "void" => Token::Void(loc),
            "_Bool" => Token::Bool(loc),
            "char" => Token::Char(loc),
            "short" => Token::Short(loc),
            "int" => Token::Int(loc),
            "long" => Token::Long(loc),
            "float" => Token::Float(loc),
            "double" => Token::Double(loc),
            "signed" => Token::Signed(loc),
            "unsigned" => Token::Unsigned(loc),
            "struct" => Token::Struct(loc),
            "union" => Token::Union(loc),
            "enum" => Token::Enum(loc),
            "sizeof" => Token::Sizeof(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    /// Skip a preprocessor directive, honouring backslash line continuations
    fn skip_preprocessor_directive(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\\' && self.peek() == Some('\n') {
                self.advance();
                continue;
            }
            if ch == '\n' {
                break;
            }
        }
    }

    /// True when only whitespace precedes the cursor on the current line
    fn at_line_start(&self) -> bool {
        self.input[..self.position]
            .iter()
            .rev()
            .take_while(|&&c| c != '\n')
            .all(|c| c.is_whitespace())
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_tokens() {
        let mut lexer = Lexer::new("static const int *p, a[3];");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Static(_)));
        assert!(matches!(tokens[1], Token::Const(_)));
        assert!(matches!(tokens[2], Token::Int(_)));
        assert!(matches!(tokens[3], Token::Star(_)));
        assert!(matches!(tokens[4], Token::Ident(ref s, _) if s == "p"));
        assert!(matches!(tokens[5], Token::Comma(_)));
        assert!(matches!(tokens[6], Token::Ident(ref s, _) if s == "a"));
        assert!(matches!(tokens[7], Token::LBracket(_)));
        assert!(matches!(tokens[8], Token::IntLiteral(3, _)));
        assert!(matches!(tokens[9], Token::RBracket(_)));
        assert!(matches!(tokens[10], Token::Semicolon(_)));
        assert!(matches!(tokens[11], Token::Eof(_)));
    }

    #[test]
    fn test_locations() {
        let mut lexer = Lexer::new("int x;\n  char y;");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0].location(), SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location(), SourceLocation::new(1, 5));
        assert_eq!(tokens[3].location(), SourceLocation::new(2, 3));
        assert_eq!(tokens[4].location(), SourceLocation::new(2, 8));
    }

    #[test]
    fn test_integer_literals() {
        let mut lexer = Lexer::new("42 0x1F 017 0 10UL");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::IntLiteral(42, _)));
        assert!(matches!(tokens[1], Token::IntLiteral(31, _)));
        assert!(matches!(tokens[2], Token::IntLiteral(15, _)));
        assert!(matches!(tokens[3], Token::IntLiteral(0, _)));
        assert!(matches!(tokens[4], Token::IntLiteral(10, _)));
    }

    #[test]
    fn test_invalid_integer_literal() {
        let mut lexer = Lexer::new("int a[12abc];");
        assert!(lexer.tokenize().is_err());

        let mut lexer = Lexer::new("int a[09];");
        assert!(lexer.tokenize().is_err());
    }

    #[test]
    fn test_unsigned_max_literal() {
        let mut lexer = Lexer::new("0xFFFFFFFFFFFFFFFFull 18446744073709551615u");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0], Token::IntLiteral(u64::MAX, SourceLocation::new(1, 1)));
        assert!(matches!(tokens[1], Token::IntLiteral(u64::MAX, _)));

        let mut lexer = Lexer::new("0x10000000000000000");
        assert!(lexer.tokenize().is_err());
    }

    #[test]
    fn test_float_literals() {
        let mut lexer = Lexer::new("1.5 .5 1e10 2.0f 1. 6.02E+23L 0x1.8p1");
        let tokens = lexer.tokenize().unwrap();
        let spellings: Vec<&str> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::FloatLiteral(s, _) => Some(s.as_str()),
                _ => None,
            })
            .collect();

        assert_eq!(spellings, ["1.5", ".5", "1e10", "2.0f", "1.", "6.02E+23L", "0x1.8p1"]);
        assert_eq!(tokens[1].location(), SourceLocation::new(1, 5));
        assert!(matches!(tokens[7], Token::Eof(_)));
    }

    #[test]
    fn test_invalid_float_literals() {
        for source in ["1e", "1.5x", "0x1.8", "2.0ff"] {
            let mut lexer = Lexer::new(source);
            assert!(lexer.tokenize().is_err(), "{} should not lex", source);
        }
    }

    #[test]
    fn test_member_access_dot_is_not_a_number() {
        let mut lexer = Lexer::new("s.x");
        let tokens = lexer.tokenize().unwrap();
        assert!(matches!(tokens[1], Token::Other('.', _)));
    }

    #[test]
    fn test_char_literals() {
        let mut lexer = Lexer::new(r"'a' '\n' '\x41' '\0'");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::CharLiteral(97, _)));
        assert!(matches!(tokens[1], Token::CharLiteral(10, _)));
        assert!(matches!(tokens[2], Token::CharLiteral(65, _)));
        assert!(matches!(tokens[3], Token::CharLiteral(0, _)));
    }

    #[test]
    fn test_string_literal() {
        let mut lexer = Lexer::new(r#""hello\nworld""#);
        let tokens = lexer.tokenize().unwrap();

        match &tokens[0] {
            Token::StringLiteral(s, _) => assert_eq!(s, "hello\nworld"),
            _ => panic!("Expected string literal"),
        }
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("char *s = \"abc;\nint x;");
        let err = lexer.tokenize().unwrap_err();
        assert_eq!(err.location, SourceLocation::new(1, 11));
    }

    #[test]
    fn test_comments() {
        let mut lexer = Lexer::new("int x; // comment\nint y; /* block\ncomment */ int z;");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Int(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[2], Token::Semicolon(_)));
        assert!(matches!(tokens[3], Token::Int(_)));
        assert!(matches!(tokens[4], Token::Ident(ref s, _) if s == "y"));
        assert!(matches!(tokens[5], Token::Semicolon(_)));
        assert!(matches!(tokens[6], Token::Int(_)));
        assert!(matches!(tokens[7], Token::Ident(ref s, _) if s == "z"));
    }

    #[test]
    fn test_unterminated_comment() {
        let mut lexer = Lexer::new("int x; /* never closed");
        assert!(lexer.tokenize().is_err());
    }

    #[test]
    fn test_preprocessor_skip() {
        let mut lexer = Lexer::new("#include <stdio.h>\n#define MAX \\\n  10\nint x;");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Int(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "x"));
    }

    #[test]
    fn test_ellipsis_and_shifts() {
        let mut lexer = Lexer::new("(int, ...) 1 << 4 >> 2");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[3], Token::Ellipsis(_)));
        assert!(matches!(tokens[6], Token::LtLt(_)));
        assert!(matches!(tokens[8], Token::GtGt(_)));
    }

    #[test]
    fn test_body_operators_are_tokenized() {
        let mut lexer = Lexer::new("{ if (a < b && c == d) return x.y; }");
        assert!(lexer.tokenize().is_ok());
    }
}
