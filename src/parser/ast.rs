// AST (Abstract Syntax Tree) definitions for C declarations

use super::node::DeclarationNode;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Range of source text covered by a construct, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl Span {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Span { start, end }
    }

    /// Whether the span covers any part of the given 1-based line
    pub fn contains_line(&self, line: usize) -> bool {
        self.start.line <= line && line <= self.end.line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Typedef,
    Extern,
    Static,
    Auto,
    Register,
}

impl StorageClass {
    pub fn keyword(self) -> &'static str {
        match self {
            StorageClass::Typedef => "typedef",
            StorageClass::Extern => "extern",
            StorageClass::Static => "static",
            StorageClass::Auto => "auto",
            StorageClass::Register => "register",
        }
    }
}

/// `const` / `volatile` qualifiers attached to a specifier or a pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeQualifiers {
    pub is_const: bool,
    pub is_volatile: bool,
}

impl TypeQualifiers {
    pub fn is_empty(&self) -> bool {
        !self.is_const && !self.is_volatile
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Struct,
    Union,
}

impl RecordKind {
    pub fn keyword(self) -> &'static str {
        match self {
            RecordKind::Struct => "struct",
            RecordKind::Union => "union",
        }
    }
}

/// Enum constant with its resolved value
#[derive(Debug, Clone, PartialEq)]
pub struct Enumerator {
    pub name: String,
    pub value: Option<Expr>,
    /// Value after applying C's implicit numbering, when it could be folded
    pub resolved: Option<i64>,
    pub location: SourceLocation,
}

/// Base types
#[derive(Debug, Clone, PartialEq)]
pub enum BaseType {
    Void,
    Bool,
    Char,
    SignedChar,
    UnsignedChar,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Float,
    Double,
    LongDouble,
    Record {
        kind: RecordKind,
        tag: Option<String>,
        members: Option<Vec<SimpleDeclaration>>, // None for a forward reference
    },
    Enum {
        tag: Option<String>,
        enumerators: Option<Vec<Enumerator>>,
    },
    TypedefName(String),
}

impl BaseType {
    /// Spelling used in diagnostics and explanations
    pub fn name(&self) -> String {
        match self {
            BaseType::Void => "void".to_string(),
            BaseType::Bool => "_Bool".to_string(),
            BaseType::Char => "char".to_string(),
            BaseType::SignedChar => "signed char".to_string(),
            BaseType::UnsignedChar => "unsigned char".to_string(),
            BaseType::Short => "short".to_string(),
            BaseType::UnsignedShort => "unsigned short".to_string(),
            BaseType::Int => "int".to_string(),
            BaseType::UnsignedInt => "unsigned int".to_string(),
            BaseType::Long => "long".to_string(),
            BaseType::UnsignedLong => "unsigned long".to_string(),
            BaseType::LongLong => "long long".to_string(),
            BaseType::UnsignedLongLong => "unsigned long long".to_string(),
            BaseType::Float => "float".to_string(),
            BaseType::Double => "double".to_string(),
            BaseType::LongDouble => "long double".to_string(),
            BaseType::Record { kind, tag, .. } => match tag {
                Some(tag) => format!("{} {}", kind.keyword(), tag),
                None => format!("anonymous {}", kind.keyword()),
            },
            BaseType::Enum { tag, .. } => match tag {
                Some(tag) => format!("enum {}", tag),
                None => "anonymous enum".to_string(),
            },
            BaseType::TypedefName(name) => name.clone(),
        }
    }
}

/// The shared part of a declaration: storage class, qualifiers and base type
#[derive(Debug, Clone, PartialEq)]
pub struct DeclSpecifier {
    pub storage: Option<StorageClass>,
    pub qualifiers: TypeQualifiers,
    pub base: BaseType,
    pub location: SourceLocation,
}

impl DeclSpecifier {
    pub fn new(base: BaseType, location: SourceLocation) -> Self {
        DeclSpecifier {
            storage: None,
            qualifiers: TypeQualifiers::default(),
            base,
            location,
        }
    }

    pub fn is_typedef(&self) -> bool {
        self.storage == Some(StorageClass::Typedef)
    }
}

/// One parameter of a function declarator
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDeclaration {
    pub specifier: DeclSpecifier,
    pub declarator: Declarator,
}

/// Type derivation applied by a declarator, e.g. the `*` in `*p`
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedType {
    Pointer(TypeQualifiers),
    Array(Option<Expr>), // None for `[]`
    Function {
        params: Vec<ParameterDeclaration>,
        variadic: bool,
        prototype: bool, // false for `()`, true for `(void)` and named parameters
    },
}

/// A single declarator: `*p`, `a[3]`, `(*fp)(int)`, `x = 4`
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    /// None for abstract declarators in parameter lists
    pub name: Option<String>,
    /// Derivations, from the identifier outward: `*a[3]` is
    /// `[Array(3), Pointer]`, "array of 3 pointers"
    pub derived: Vec<DerivedType>,
    pub bit_width: Option<Expr>,
    pub initializer: Option<Initializer>,
    pub location: SourceLocation,
}

impl Declarator {
    pub fn new(name: Option<String>, location: SourceLocation) -> Self {
        Declarator {
            name,
            derived: Vec::new(),
            bit_width: None,
            initializer: None,
            location,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.derived.first(), Some(DerivedType::Function { .. }))
    }
}

/// Binary operators allowed in constant expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
}

impl BinOp {
    /// Binding power, higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::BitOr => 1,
            BinOp::BitXor => 2,
            BinOp::BitAnd => 3,
            BinOp::Shl | BinOp::Shr => 4,
            BinOp::Add | BinOp::Sub => 5,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 6,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,    // -x
    Not,    // !x
    BitNot, // ~x
    AddrOf, // &x
    Deref,  // *x
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
            UnOp::BitNot => "~",
            UnOp::AddrOf => "&",
            UnOp::Deref => "*",
        }
    }
}

/// Constant expressions (array bounds, bit widths, enum values, initializers)
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLiteral(u64, SourceLocation),
    /// Spelling as written; floating values are never folded
    FloatLiteral(String, SourceLocation),
    CharLiteral(i64, SourceLocation),
    StringLiteral(String, SourceLocation),
    Identifier(String, SourceLocation),
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    /// `sizeof(type)`; never folded, type sizes are target-specific
    SizeofType {
        specifier: Box<DeclSpecifier>,
        declarator: Box<Declarator>,
        location: SourceLocation,
    },
    SizeofExpr {
        expr: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::IntLiteral(_, loc)
            | Expr::FloatLiteral(_, loc)
            | Expr::CharLiteral(_, loc)
            | Expr::StringLiteral(_, loc)
            | Expr::Identifier(_, loc) => *loc,
            Expr::Unary { location, .. }
            | Expr::Binary { location, .. }
            | Expr::SizeofType { location, .. }
            | Expr::SizeofExpr { location, .. } => *location,
        }
    }

    /// Evaluate an integer constant expression.
    ///
    /// Identifiers are resolved through `lookup` (enum constants). Returns
    /// `None` when a value is unknown, on division by zero, or on overflow.
    pub fn fold(&self, lookup: &dyn Fn(&str) -> Option<i64>) -> Option<i64> {
        match self {
            Expr::IntLiteral(n, _) => i64::try_from(*n).ok(),
            Expr::CharLiteral(n, _) => Some(*n),
            Expr::FloatLiteral(..)
            | Expr::StringLiteral(..)
            | Expr::SizeofType { .. }
            | Expr::SizeofExpr { .. } => None,
            Expr::Identifier(name, _) => lookup(name),
            Expr::Unary { op, operand, .. } => {
                let value = operand.fold(lookup)?;
                match op {
                    UnOp::Neg => value.checked_neg(),
                    UnOp::Not => Some((value == 0) as i64),
                    UnOp::BitNot => Some(!value),
                    UnOp::AddrOf | UnOp::Deref => None,
                }
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                let l = left.fold(lookup)?;
                let r = right.fold(lookup)?;
                match op {
                    BinOp::Add => l.checked_add(r),
                    BinOp::Sub => l.checked_sub(r),
                    BinOp::Mul => l.checked_mul(r),
                    BinOp::Div => l.checked_div(r),
                    BinOp::Mod => l.checked_rem(r),
                    BinOp::Shl => u32::try_from(r).ok().and_then(|r| l.checked_shl(r)),
                    BinOp::Shr => u32::try_from(r).ok().and_then(|r| l.checked_shr(r)),
                    BinOp::BitAnd => Some(l & r),
                    BinOp::BitOr => Some(l | r),
                    BinOp::BitXor => Some(l ^ r),
                }
            }
        }
    }
}

/// Right-hand side of `= ...` in an init-declarator
#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    Expr(Expr),
    List(Vec<Initializer>),
}

/// `int a, *b, c[3];`: one specifier shared by a list of declarators
pub type SimpleDeclaration = DeclarationNode<DeclSpecifier, Declarator>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalKind {
    Declaration,
    /// Declaration followed by a body. The body is skipped, only its extent
    /// is kept in [`ExternalDeclaration::span`].
    FunctionDefinition,
}

/// A file-scope declaration together with the source it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalDeclaration {
    pub kind: ExternalKind,
    pub declaration: SimpleDeclaration,
    pub span: Span,
}

/// Top-level result of parsing a source file
#[derive(Debug, Clone, Default)]
pub struct TranslationUnit {
    pub items: Vec<ExternalDeclaration>,
    /// Errors the parser recovered from
    pub diagnostics: Vec<super::parse::ParseError>,
}

impl TranslationUnit {
    pub fn new() -> Self {
        TranslationUnit::default()
    }

    /// Every declaration at file scope, in source order
    pub fn declarations(&self) -> impl Iterator<Item = &SimpleDeclaration> {
        self.items.iter().map(|item| &item.declaration)
    }

    /// The item whose span covers `line`, if any
    pub fn item_at_line(&self, line: usize) -> Option<usize> {
        self.items.iter().position(|item| item.span.contains_line(line))
    }
}
