//! Declaration parsing implementation
//!
//! This module handles the declaration grammar of C:
//!
//! - Declaration specifiers: storage class, qualifiers, base type
//! - Struct, union and enum specifiers, with or without a body
//! - Declarators: pointers, parentheses, arrays, function parameter lists
//! - Init-declarator lists, bit-fields and initializers
//!
//! # Grammar
//!
//! ```text
//! declaration      ::= decl_specifier (init_declarator ("," init_declarator)*)? ";"
//! function_def     ::= decl_specifier declarator "{" ... "}"
//! init_declarator  ::= declarator (":" const_expr)? ("=" initializer)?
//! declarator       ::= pointer* direct_declarator
//! pointer          ::= "*" ("const" | "volatile")*
//! direct_declarator::= (identifier | "(" declarator ")")? suffix*
//! suffix           ::= "[" const_expr? "]" | "(" parameter_list? ")"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

/// Where a declarator appears; decides which parts are required or allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeclaratorContext {
    /// File scope: named, may be initialized or followed by a function body
    File,
    /// Struct or union member: named unless it is an unnamed bit-field
    Member,
    /// Function parameter: the name is optional
    Parameter,
    /// `sizeof(type)`: never named
    TypeName,
}

/// How a declarator list ended
enum ListEnd {
    Semicolon(SourceLocation),
    /// Function definition; location of the body's closing brace
    Body(SourceLocation),
}

/// Type keywords seen in one specifier, resolved once the specifier ends
#[derive(Debug, Default)]
struct TypeKeywords {
    void: u8,
    bool: u8,
    char: u8,
    short: u8,
    int: u8,
    long: u8,
    float: u8,
    double: u8,
    signed: u8,
    unsigned: u8,
    first: Option<SourceLocation>,
}

impl TypeKeywords {
    fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    fn add(&mut self, token: &Token) {
        let counter = match token {
            Token::Void(_) => &mut self.void,
            Token::Bool(_) => &mut self.bool,
            Token::Char(_) => &mut self.char,
            Token::Short(_) => &mut self.short,
            Token::Int(_) => &mut self.int,
            Token::Long(_) => &mut self.long,
            Token::Float(_) => &mut self.float,
            Token::Double(_) => &mut self.double,
            Token::Signed(_) => &mut self.signed,
            Token::Unsigned(_) => &mut self.unsigned,
            _ => return,
        };
        *counter = counter.saturating_add(1);
        self.first.get_or_insert(token.location());
    }

    /// Map the keyword multiset to a base type, rejecting illegal combinations
    fn resolve(&self) -> Result<Option<BaseType>, ParseError> {
        let Some(location) = self.first else {
            return Ok(None);
        };
        let err = |message: String| Err(ParseError::new(message, location));

        for (count, name) in [
            (self.void, "void"),
            (self.bool, "_Bool"),
            (self.char, "char"),
            (self.short, "short"),
            (self.int, "int"),
            (self.float, "float"),
            (self.double, "double"),
            (self.signed, "signed"),
            (self.unsigned, "unsigned"),
        ] {
            if count > 1 {
                return err(format!("Duplicate '{}' in declaration specifiers", name));
            }
        }
        if self.long > 2 {
            return err("'long long long' is too long".to_string());
        }
        if self.signed > 0 && self.unsigned > 0 {
            return err("Both 'signed' and 'unsigned' in declaration specifiers".to_string());
        }

        let sign = self.signed + self.unsigned;
        let unsigned = self.unsigned > 0;
        let others = |allowed: u8| {
            self.void + self.bool + self.char + self.short + self.int + self.long + self.float
                + self.double
                + sign
                - allowed
                > 0
        };

        let base = if self.void > 0 {
            if others(self.void) {
                return err("'void' cannot be combined with other type specifiers".to_string());
            }
            BaseType::Void
        } else if self.bool > 0 {
            if others(self.bool) {
                return err("'_Bool' cannot be combined with other type specifiers".to_string());
            }
            BaseType::Bool
        } else if self.float > 0 {
            if others(self.float) {
                return err("'float' cannot be combined with other type specifiers".to_string());
            }
            BaseType::Float
        } else if self.double > 0 {
            if others(self.double + self.long) || self.long > 1 {
                return err("Invalid type specifiers combined with 'double'".to_string());
            }
            if self.long == 1 {
                BaseType::LongDouble
            } else {
                BaseType::Double
            }
        } else if self.char > 0 {
            if others(self.char + sign) {
                return err("Invalid type specifiers combined with 'char'".to_string());
            }
            match (self.signed > 0, unsigned) {
                (true, _) => BaseType::SignedChar,
                (_, true) => BaseType::UnsignedChar,
                _ => BaseType::Char,
            }
        } else if self.short > 0 {
            if self.long > 0 {
                return err("Both 'short' and 'long' in declaration specifiers".to_string());
            }
            if unsigned {
                BaseType::UnsignedShort
            } else {
                BaseType::Short
            }
        } else {
            match (self.long, unsigned) {
                (0, false) => BaseType::Int,
                (0, true) => BaseType::UnsignedInt,
                (1, false) => BaseType::Long,
                (1, true) => BaseType::UnsignedLong,
                (_, false) => BaseType::LongLong,
                (_, true) => BaseType::UnsignedLongLong,
            }
        };

        Ok(Some(base))
    }
}

impl Parser {
    /// Parse one file-scope declaration or function definition.
    ///
    /// Returns `Ok(None)` for a stray `;`.
    pub(crate) fn parse_external_declaration(
        &mut self,
    ) -> Result<Option<ExternalDeclaration>, ParseError> {
        let start = self.current_location();
        if self.match_token(&Token::Semicolon(start)) {
            return Ok(None);
        }

        let specifier = self.parse_decl_specifier()?;
        let mut declaration = SimpleDeclaration::with_specifier(specifier);

        let (kind, end) = match self.parse_declarator_list(&mut declaration, DeclaratorContext::File)? {
            ListEnd::Semicolon(end) => (ExternalKind::Declaration, end),
            ListEnd::Body(end) => (ExternalKind::FunctionDefinition, end),
        };

        Ok(Some(ExternalDeclaration {
            kind,
            declaration,
            span: Span::new(start, end),
        }))
    }

    /// Parse the comma-separated declarators after a specifier, up to and
    /// including the terminating `;`, appending each one to `declaration` in
    /// source order.
    fn parse_declarator_list(
        &mut self,
        declaration: &mut SimpleDeclaration,
        ctx: DeclaratorContext,
    ) -> Result<ListEnd, ParseError> {
        let semicolon = self.current_location();
        if self.match_token(&Token::Semicolon(semicolon)) {
            return Ok(ListEnd::Semicolon(semicolon));
        }

        let is_typedef = declaration.specifier().is_some_and(DeclSpecifier::is_typedef);
        let mut first = true;

        loop {
            match self.parse_init_declarator(ctx, is_typedef) {
                Ok(declarator) => {
                    if first
                        && ctx == DeclaratorContext::File
                        && declarator.is_function()
                        && self.check(&Token::LBrace(self.current_location()))
                    {
                        let end = self.skip_braced_block()?;
                        declaration.add_declarator(declarator);
                        return Ok(ListEnd::Body(end));
                    }
                    if is_typedef {
                        if let Some(name) = &declarator.name {
                            self.typedef_names.insert(name.clone());
                        }
                    }
                    declaration.add_declarator(declarator);
                }
                Err(err) => {
                    self.diagnostics.push(err);
                    declaration.add_slot(None);
                    self.skip_declarator()?;
                }
            }
            first = false;

            if !self.at_declarator_end() {
                let err = self.error_expected("',' or ';' after declarator");
                if self.is_at_end() {
                    return Err(err);
                }
                self.diagnostics.push(err);
                self.skip_declarator()?;
                if !self.at_declarator_end() {
                    return Err(self.error_expected("';' to end the declaration"));
                }
            }

            if self.match_token(&Token::Comma(self.current_location())) {
                continue;
            }

            let end = self.current_location();
            self.advance(); // ';'
            declaration.compact();
            return Ok(ListEnd::Semicolon(end));
        }
    }

    /// Parse declaration specifiers: `static const unsigned long`, `struct S`, ...
    pub(crate) fn parse_decl_specifier(&mut self) -> Result<DeclSpecifier, ParseError> {
        let location = self.current_location();
        let mut storage = None;
        let mut qualifiers = TypeQualifiers::default();
        let mut keywords = TypeKeywords::default();
        let mut base: Option<BaseType> = None;

        loop {
            let token = self.peek_token();
            let class = match token {
                Token::Typedef(_) => Some(StorageClass::Typedef),
                Token::Extern(_) => Some(StorageClass::Extern),
                Token::Static(_) => Some(StorageClass::Static),
                Token::Auto(_) => Some(StorageClass::Auto),
                Token::Register(_) => Some(StorageClass::Register),
                _ => None,
            };
            if let Some(class) = class {
                if storage.is_some() {
                    return Err(ParseError::new(
                        "Multiple storage classes in declaration specifiers",
                        token.location(),
                    ));
                }
                storage = Some(class);
                self.advance();
                continue;
            }

            match token {
                Token::Const(_) => {
                    qualifiers.is_const = true;
                    self.advance();
                }
                Token::Volatile(_) => {
                    qualifiers.is_volatile = true;
                    self.advance();
                }
                Token::Void(_)
                | Token::Bool(_)
                | Token::Char(_)
                | Token::Short(_)
                | Token::Int(_)
                | Token::Long(_)
                | Token::Float(_)
                | Token::Double(_)
                | Token::Signed(_)
                | Token::Unsigned(_) => {
                    if let Some(existing) = &base {
                        return Err(ParseError::new(
                            format!("Cannot combine {} with '{}'", token, existing.name()),
                            token.location(),
                        ));
                    }
                    keywords.add(&token);
                    self.advance();
                }
                Token::Struct(_) | Token::Union(_) | Token::Enum(_) => {
                    if base.is_some() || !keywords.is_empty() {
                        return Err(ParseError::new(
                            format!("Cannot combine {} with other type specifiers", token),
                            token.location(),
                        ));
                    }
                    self.advance();
                    base = Some(match token {
                        Token::Struct(_) => self.parse_record_specifier(RecordKind::Struct)?,
                        Token::Union(_) => self.parse_record_specifier(RecordKind::Union)?,
                        _ => self.parse_enum_specifier()?,
                    });
                }
                Token::Ident(ref name, _)
                    if base.is_none() && keywords.is_empty() && self.is_typedef_name(name) =>
                {
                    base = Some(BaseType::TypedefName(name.clone()));
                    self.advance();
                }
                _ => break,
            }
        }

        let base = match (base, keywords.resolve()?) {
            (Some(base), _) | (None, Some(base)) => base,
            (None, None) => {
                if storage.is_some() || !qualifiers.is_empty() {
                    return Err(self.error_expected("type specifier"));
                }
                return Err(self.error_expected("declaration specifier"));
            }
        };

        Ok(DeclSpecifier {
            storage,
            qualifiers,
            base,
            location,
        })
    }

    /// After `struct` / `union`: optional tag, optional member list
    fn parse_record_specifier(&mut self, kind: RecordKind) -> Result<BaseType, ParseError> {
        let tag = match self.peek_token() {
            Token::Ident(name, _) => {
                self.advance();
                Some(name)
            }
            _ => None,
        };

        if !self.match_token(&Token::LBrace(self.current_location())) {
            if tag.is_none() {
                return Err(self.error_expected(&format!("tag or '{{' after '{}'", kind.keyword())));
            }
            return Ok(BaseType::Record {
                kind,
                tag,
                members: None,
            });
        }

        let mut members = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) {
            if self.is_at_end() {
                return Err(self.error_expected(&format!("'}}' to close {} body", kind.keyword())));
            }
            match self.parse_member_declaration() {
                Ok(member) => members.push(member),
                Err(err) => {
                    if self.is_at_end() {
                        return Err(err);
                    }
                    self.diagnostics.push(err);
                    self.skip_member()?;
                }
            }
        }
        self.expect_rbrace(&format!("after {} members", kind.keyword()))?;

        Ok(BaseType::Record {
            kind,
            tag,
            members: Some(members),
        })
    }

    fn parse_member_declaration(&mut self) -> Result<SimpleDeclaration, ParseError> {
        let specifier = self.parse_decl_specifier()?;
        if specifier.storage.is_some() {
            return Err(ParseError::new(
                "Storage class not allowed on a struct or union member",
                specifier.location,
            ));
        }
        let mut member = SimpleDeclaration::with_specifier(specifier);
        self.parse_declarator_list(&mut member, DeclaratorContext::Member)?;
        Ok(member)
    }

    /// After `enum`: optional tag, optional enumerator list
    fn parse_enum_specifier(&mut self) -> Result<BaseType, ParseError> {
        let tag = match self.peek_token() {
            Token::Ident(name, _) => {
                self.advance();
                Some(name)
            }
            _ => None,
        };

        if !self.match_token(&Token::LBrace(self.current_location())) {
            if tag.is_none() {
                return Err(self.error_expected("tag or '{' after 'enum'"));
            }
            return Ok(BaseType::Enum {
                tag,
                enumerators: None,
            });
        }

        let mut enumerators = Vec::new();
        let mut next_value = Some(0i64);
        loop {
            if self.check(&Token::RBrace(self.current_location())) && !enumerators.is_empty() {
                break; // trailing comma
            }
            let (name, location) = self.expect_identifier()?;
            let value = if self.match_token(&Token::Eq(self.current_location())) {
                Some(self.parse_constant_expression()?)
            } else {
                None
            };

            let resolved = match &value {
                Some(expr) => expr.fold(&|name: &str| self.enum_constants.get(name).copied()),
                None => next_value,
            };
            if let Some(v) = resolved {
                self.enum_constants.insert(name.clone(), v);
            }
            next_value = resolved.and_then(|v| v.checked_add(1));

            enumerators.push(Enumerator {
                name,
                value,
                resolved,
                location,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }
        self.expect_rbrace("after enumerators")?;

        Ok(BaseType::Enum {
            tag,
            enumerators: Some(enumerators),
        })
    }

    /// Declarator plus optional bit-width and initializer
    fn parse_init_declarator(
        &mut self,
        ctx: DeclaratorContext,
        is_typedef: bool,
    ) -> Result<Declarator, ParseError> {
        let mut declarator = self.parse_declarator(ctx)?;

        if ctx == DeclaratorContext::Member && self.match_token(&Token::Colon(self.current_location())) {
            declarator.bit_width = Some(self.parse_constant_expression()?);
        }

        if declarator.name.is_none() && declarator.bit_width.is_none() {
            return Err(ParseError::new(
                format!("Expected identifier in declarator, found {}", self.peek()),
                declarator.location,
            ));
        }

        let eq = self.current_location();
        if self.check(&Token::Eq(eq)) {
            if ctx != DeclaratorContext::File {
                return Err(ParseError::new("Initializer not allowed here", eq));
            }
            if is_typedef {
                return Err(ParseError::new("A typedef cannot have an initializer", eq));
            }
            if declarator.is_function() {
                return Err(ParseError::new("A function declaration cannot have an initializer", eq));
            }
            self.advance();
            declarator.initializer = Some(self.parse_initializer()?);
        }

        Ok(declarator)
    }

    fn parse_initializer(&mut self) -> Result<Initializer, ParseError> {
        if !self.match_token(&Token::LBrace(self.current_location())) {
            return Ok(Initializer::Expr(self.parse_constant_expression()?));
        }

        let mut items = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) {
            items.push(self.parse_initializer()?);
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }
        self.expect_rbrace("to close initializer list")?;
        Ok(Initializer::List(items))
    }

    /// Parse a (possibly abstract) declarator.
    pub(crate) fn parse_declarator(&mut self, ctx: DeclaratorContext) -> Result<Declarator, ParseError> {
        let start = self.current_location();

        // Pointer prefixes, outermost first
        let mut pointers = Vec::new();
        while self.match_token(&Token::Star(self.current_location())) {
            pointers.push(self.parse_pointer_qualifiers());
        }

        let (name, location, inner) = if self.starts_nested_declarator() {
            self.advance(); // '('
            let inner = self.parse_declarator(ctx)?;
            self.expect_rparen("to close parenthesized declarator")?;
            (inner.name, inner.location, inner.derived)
        } else {
            match self.peek_token() {
                Token::Ident(name, loc) if ctx != DeclaratorContext::TypeName => {
                    self.advance();
                    (Some(name), loc, Vec::new())
                }
                _ => (None, start, Vec::new()),
            }
        };

        let mut suffixes = Vec::new();
        loop {
            if self.match_token(&Token::LBracket(self.current_location())) {
                if self.match_token(&Token::RBracket(self.current_location())) {
                    suffixes.push(DerivedType::Array(None));
                } else {
                    let size = self.parse_constant_expression()?;
                    self.expect_rbracket("after array size")?;
                    suffixes.push(DerivedType::Array(Some(size)));
                }
            } else if self.match_token(&Token::LParen(self.current_location())) {
                suffixes.push(self.parse_parameter_list()?);
            } else {
                break;
            }
        }

        let mut derived = inner;
        derived.extend(suffixes);
        derived.extend(pointers.into_iter().rev().map(DerivedType::Pointer));
        Self::validate_derivations(&derived, location)?;

        Ok(Declarator {
            name,
            derived,
            bit_width: None,
            initializer: None,
            location,
        })
    }

    fn parse_pointer_qualifiers(&mut self) -> TypeQualifiers {
        let mut qualifiers = TypeQualifiers::default();
        loop {
            match self.peek() {
                Token::Const(_) => qualifiers.is_const = true,
                Token::Volatile(_) => qualifiers.is_volatile = true,
                _ => return qualifiers,
            }
            self.advance();
        }
    }

    /// Whether a `(` at the cursor opens a nested declarator rather than a
    /// parameter list: `(*fp)` vs `(int)`.
    fn starts_nested_declarator(&self) -> bool {
        if !matches!(self.peek(), Token::LParen(_)) {
            return false;
        }
        match self.peek_ahead(1) {
            Some(Token::Star(_)) | Some(Token::LParen(_)) => true,
            Some(Token::Ident(name, _)) => !self.is_typedef_name(name),
            _ => false,
        }
    }

    /// After `(`: `)`, `void)`, or parameter declarations with optional `...`
    fn parse_parameter_list(&mut self) -> Result<DerivedType, ParseError> {
        if self.match_token(&Token::RParen(self.current_location())) {
            return Ok(DerivedType::Function {
                params: Vec::new(),
                variadic: false,
                prototype: false,
            });
        }

        if matches!(self.peek(), Token::Void(_)) && matches!(self.peek_ahead(1), Some(Token::RParen(_))) {
            self.advance();
            self.advance();
            return Ok(DerivedType::Function {
                params: Vec::new(),
                variadic: false,
                prototype: true,
            });
        }

        let mut params = Vec::new();
        let mut variadic = false;
        loop {
            let ellipsis = self.current_location();
            if self.match_token(&Token::Ellipsis(ellipsis)) {
                if params.is_empty() {
                    return Err(ParseError::new("'...' must follow a named parameter", ellipsis));
                }
                variadic = true;
                break;
            }

            let specifier = self.parse_decl_specifier()?;
            if matches!(specifier.storage, Some(class) if class != StorageClass::Register) {
                return Err(ParseError::new(
                    "Only 'register' is allowed on a parameter",
                    specifier.location,
                ));
            }
            let declarator = self.parse_declarator(DeclaratorContext::Parameter)?;
            params.push(ParameterDeclaration {
                specifier,
                declarator,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }
        self.expect_rparen("after parameters")?;

        Ok(DerivedType::Function {
            params,
            variadic,
            prototype: true,
        })
    }

    /// Reject functions returning arrays or functions, and arrays of functions
    fn validate_derivations(derived: &[DerivedType], location: SourceLocation) -> Result<(), ParseError> {
        for pair in derived.windows(2) {
            let message = match (&pair[0], &pair[1]) {
                (DerivedType::Function { .. }, DerivedType::Function { .. }) => {
                    "Function cannot return a function"
                }
                (DerivedType::Function { .. }, DerivedType::Array(_)) => {
                    "Function cannot return an array"
                }
                (DerivedType::Array(_), DerivedType::Function { .. }) => {
                    "Array elements cannot be functions"
                }
                _ => continue,
            };
            return Err(ParseError::new(message, location));
        }
        Ok(())
    }

    /// `sizeof(type-name)` operand: specifier plus abstract declarator
    pub(crate) fn parse_type_name(&mut self) -> Result<(DeclSpecifier, Declarator), ParseError> {
        let specifier = self.parse_decl_specifier()?;
        if specifier.storage.is_some() {
            return Err(ParseError::new(
                "Storage class not allowed in a type name",
                specifier.location,
            ));
        }
        let declarator = self.parse_declarator(DeclaratorContext::TypeName)?;
        Ok((specifier, declarator))
    }

    /// Whether `token` can begin a type name
    pub(crate) fn is_type_start(&self, token: &Token) -> bool {
        match token {
            Token::Const(_)
            | Token::Volatile(_)
            | Token::Void(_)
            | Token::Bool(_)
            | Token::Char(_)
            | Token::Short(_)
            | Token::Int(_)
            | Token::Long(_)
            | Token::Float(_)
            | Token::Double(_)
            | Token::Signed(_)
            | Token::Unsigned(_)
            | Token::Struct(_)
            | Token::Union(_)
            | Token::Enum(_) => true,
            Token::Ident(name, _) => self.is_typedef_name(name),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str) -> SimpleDeclaration {
        let mut parser = Parser::new(source).unwrap();
        let unit = parser.parse_translation_unit().unwrap();
        assert!(unit.diagnostics.is_empty(), "{:?}", unit.diagnostics);
        unit.items.into_iter().next().unwrap().declaration
    }

    fn first_declarator(decl: &SimpleDeclaration) -> &Declarator {
        decl.declarators().next().unwrap()
    }

    #[test]
    fn test_integer_specifier_combinations() {
        let cases = [
            ("unsigned x;", BaseType::UnsignedInt),
            ("long int x;", BaseType::Long),
            ("unsigned long long x;", BaseType::UnsignedLongLong),
            ("short unsigned int x;", BaseType::UnsignedShort),
            ("signed char x;", BaseType::SignedChar),
            ("long double x;", BaseType::LongDouble),
            ("_Bool x;", BaseType::Bool),
        ];
        for (source, expected) in cases {
            let decl = parse_one(source);
            assert_eq!(decl.specifier().unwrap().base, expected, "{}", source);
        }
    }

    #[test]
    fn test_invalid_specifier_combinations() {
        for source in [
            "short long x;",
            "signed unsigned x;",
            "void int x;",
            "long long long x;",
            "static extern int x;",
            "char double x;",
        ] {
            let mut parser = Parser::new(source).unwrap();
            let unit = parser.parse_translation_unit().unwrap();
            assert_eq!(unit.diagnostics.len(), 1, "{}", source);
            assert!(unit.items.is_empty(), "{}", source);
        }
    }

    #[test]
    fn test_keyword_counts_saturate() {
        let mut keywords = TypeKeywords::default();
        let token = Token::Long(SourceLocation::new(1, 1));
        for _ in 0..300 {
            keywords.add(&token);
        }
        assert_eq!(keywords.long, u8::MAX);
        assert!(keywords.resolve().is_err());
    }

    #[test]
    fn test_storage_and_qualifiers() {
        let decl = parse_one("static const volatile int x;");
        let spec = decl.specifier().unwrap();
        assert_eq!(spec.storage, Some(StorageClass::Static));
        assert!(spec.qualifiers.is_const);
        assert!(spec.qualifiers.is_volatile);
    }

    #[test]
    fn test_pointer_to_array_vs_array_of_pointers() {
        let decl = parse_one("int *a[3], (*b)[3];");
        let decls: Vec<_> = decl.declarators().collect();

        assert!(matches!(
            decls[0].derived.as_slice(),
            [DerivedType::Array(Some(_)), DerivedType::Pointer(_)]
        ));
        assert!(matches!(
            decls[1].derived.as_slice(),
            [DerivedType::Pointer(_), DerivedType::Array(Some(_))]
        ));
    }

    #[test]
    fn test_qualified_pointers_order() {
        let decl = parse_one("char *const *p;");
        let d = first_declarator(&decl);
        match d.derived.as_slice() {
            [DerivedType::Pointer(outer), DerivedType::Pointer(inner)] => {
                assert!(!outer.is_const);
                assert!(inner.is_const);
            }
            other => panic!("Unexpected derivation {:?}", other),
        }
    }

    #[test]
    fn test_function_pointer_parameters() {
        let decl = parse_one("void (*signal(int sig, void (*handler)(int)))(int);");
        let d = first_declarator(&decl);
        assert_eq!(d.name.as_deref(), Some("signal"));
        match d.derived.as_slice() {
            [DerivedType::Function { params, .. }, DerivedType::Pointer(_), DerivedType::Function { .. }] => {
                assert_eq!(params.len(), 2);
                assert_eq!(params[1].declarator.name.as_deref(), Some("handler"));
            }
            other => panic!("Unexpected derivation {:?}", other),
        }
    }

    #[test]
    fn test_abstract_parameters_and_variadic() {
        let decl = parse_one("int printf(const char *, ...);");
        match first_declarator(&decl).derived.as_slice() {
            [DerivedType::Function {
                params, variadic, ..
            }] => {
                assert!(*variadic);
                assert_eq!(params.len(), 1);
                assert!(params[0].declarator.name.is_none());
                assert!(params[0].specifier.qualifiers.is_const);
            }
            other => panic!("Unexpected derivation {:?}", other),
        }
    }

    #[test]
    fn test_old_style_and_void_parameter_lists() {
        let decl = parse_one("int f(), g(void);");
        let decls: Vec<_> = decl.declarators().collect();
        assert!(matches!(
            decls[0].derived[0],
            DerivedType::Function {
                prototype: false,
                ..
            }
        ));
        assert!(matches!(
            decls[1].derived[0],
            DerivedType::Function {
                prototype: true,
                ..
            }
        ));
    }

    #[test]
    fn test_typedef_names_become_types() {
        let mut parser = Parser::new("typedef unsigned long size_t, *size_ptr;\nsize_t n;\nsize_ptr p;").unwrap();
        let unit = parser.parse_translation_unit().unwrap();

        assert!(unit.diagnostics.is_empty());
        assert_eq!(unit.items.len(), 3);
        assert!(parser.is_typedef_name("size_ptr"));
        assert_eq!(
            unit.items[2].declaration.specifier().unwrap().base,
            BaseType::TypedefName("size_ptr".to_string())
        );
    }

    #[test]
    fn test_enum_constants_are_numbered() {
        let mut parser = Parser::new("enum color { RED, GREEN = 5, BLUE };\nint table[BLUE];").unwrap();
        let unit = parser.parse_translation_unit().unwrap();

        assert!(unit.diagnostics.is_empty());
        assert_eq!(parser.enum_constant("RED"), Some(0));
        assert_eq!(parser.enum_constant("BLUE"), Some(6));
        match &unit.items[0].declaration.specifier().unwrap().base {
            BaseType::Enum { enumerators, .. } => {
                let resolved: Vec<_> = enumerators.as_ref().unwrap().iter().map(|e| e.resolved).collect();
                assert_eq!(resolved, vec![Some(0), Some(5), Some(6)]);
            }
            other => panic!("Expected enum, got {:?}", other),
        }
    }

    #[test]
    fn test_bit_fields_and_nested_records() {
        let decl = parse_one("struct flags { unsigned a : 1, : 3, b : 4; struct { int x; } inner; };");
        let members = match &decl.specifier().unwrap().base {
            BaseType::Record { members, .. } => members.clone().unwrap(),
            other => panic!("Expected struct, got {:?}", other),
        };

        assert_eq!(members.len(), 2);
        let bits: Vec<_> = members[0].declarators().map(|d| d.name.clone()).collect();
        assert_eq!(bits, vec![Some("a".to_string()), None, Some("b".to_string())]);
        assert!(members[0].declarators().all(|d| d.bit_width.is_some()));
    }

    #[test]
    fn test_bad_member_is_recovered() {
        let mut parser = Parser::new("struct s { int a; int [; long b; };").unwrap();
        let unit = parser.parse_translation_unit().unwrap();

        assert_eq!(unit.diagnostics.len(), 1);
        match &unit.items[0].declaration.specifier().unwrap().base {
            BaseType::Record { members, .. } => assert_eq!(members.as_ref().unwrap().len(), 3),
            other => panic!("Expected struct, got {:?}", other),
        }
    }

    #[test]
    fn test_initializers() {
        let decl = parse_one("int a = -1, b[] = { 1, 2, 3, }, c = 'x';");
        let decls: Vec<_> = decl.declarators().collect();

        assert!(matches!(decls[0].initializer, Some(Initializer::Expr(Expr::Unary { .. }))));
        match &decls[1].initializer {
            Some(Initializer::List(items)) => assert_eq!(items.len(), 3),
            other => panic!("Expected initializer list, got {:?}", other),
        }
        assert!(matches!(decls[2].initializer, Some(Initializer::Expr(Expr::CharLiteral(120, _)))));
    }

    #[test]
    fn test_typedef_initializer_rejected() {
        let mut parser = Parser::new("typedef int T = 3;").unwrap();
        let unit = parser.parse_translation_unit().unwrap();
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.items[0].declaration.is_empty());
    }

    #[test]
    fn test_invalid_derivations() {
        for source in ["int f()();", "int f()[3];", "int a[3]();"] {
            let mut parser = Parser::new(source).unwrap();
            let unit = parser.parse_translation_unit().unwrap();
            assert_eq!(unit.diagnostics.len(), 1, "{}", source);
        }
    }

    #[test]
    fn test_several_bad_declarators_in_one_list() {
        let mut parser = Parser::new("int a, 1, b, (, c;").unwrap();
        let unit = parser.parse_translation_unit().unwrap();

        assert_eq!(unit.diagnostics.len(), 2);
        let names: Vec<_> = unit.items[0]
            .declaration
            .declarators()
            .map(|d| d.name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
