//! English explanations and C renderings of parsed declarations
//!
//! Explanations follow the cdecl phrasing: `int *a[3];` reads as
//! "declare a as array 3 of pointer to int". Array bounds and bit-field
//! widths are folded to numbers when every identifier in them is a known
//! enum constant, otherwise they are shown as written.
//!
//! Only the public read surface of a declaration node is used here
//! (`specifier()` and `declarators()`), so tombstoned declarators left by
//! error recovery never show up.

use crate::parser::ast::*;
use rustc_hash::FxHashMap;

/// Produces explanations, resolving enum constants seen in a translation unit
#[derive(Debug, Clone, Default)]
pub struct Explainer {
    constants: FxHashMap<String, i64>,
}

impl Explainer {
    pub fn new() -> Self {
        Explainer::default()
    }

    /// Explainer that knows every enum constant declared in `unit`,
    /// including enums nested inside struct and union members
    pub fn for_unit(unit: &TranslationUnit) -> Self {
        let mut explainer = Explainer::new();
        for decl in unit.declarations() {
            if let Some(spec) = decl.specifier() {
                explainer.collect_constants(spec);
            }
        }
        explainer
    }

    /// Add a constant the unit does not declare itself, such as a macro value
    pub fn with_constant(mut self, name: impl Into<String>, value: i64) -> Self {
        self.constants.insert(name.into(), value);
        self
    }

    pub fn constant(&self, name: &str) -> Option<i64> {
        self.constants.get(name).copied()
    }

    fn collect_constants(&mut self, spec: &DeclSpecifier) {
        match &spec.base {
            BaseType::Enum {
                enumerators: Some(enumerators),
                ..
            } => {
                for enumerator in enumerators {
                    if let Some(value) = enumerator.resolved {
                        self.constants.insert(enumerator.name.clone(), value);
                    }
                }
            }
            BaseType::Record {
                members: Some(members),
                ..
            } => {
                for member in members {
                    if let Some(member_spec) = member.specifier() {
                        self.collect_constants(member_spec);
                    }
                }
            }
            _ => {}
        }
    }

    /// One sentence per live declarator. A declaration without declarators
    /// (`struct point { int x; };`) yields a single sentence for its specifier.
    pub fn explain_declaration(&self, decl: &SimpleDeclaration) -> Vec<String> {
        self.explain_with_verb(decl, "declare")
    }

    /// Like [`Explainer::explain_declaration`], but function definitions
    /// read "define" instead of "declare"
    pub fn explain_item(&self, item: &ExternalDeclaration) -> Vec<String> {
        match item.kind {
            ExternalKind::Declaration => self.explain_declaration(&item.declaration),
            ExternalKind::FunctionDefinition => self.explain_with_verb(&item.declaration, "define"),
        }
    }

    fn explain_with_verb(&self, decl: &SimpleDeclaration, verb: &str) -> Vec<String> {
        let Some(spec) = decl.specifier() else {
            return Vec::new();
        };

        if decl.is_empty() {
            return vec![format!("{} {}", verb, describe_specifier(spec))];
        }

        decl.declarators()
            .map(|declarator| self.sentence(verb, spec, declarator))
            .collect()
    }

    fn sentence(&self, verb: &str, spec: &DeclSpecifier, declarator: &Declarator) -> String {
        let name = declarator.name.as_deref().unwrap_or("<unnamed>");

        let mut ty = String::new();
        if let Some(width) = &declarator.bit_width {
            ty.push_str(&format!("bit-field {} of ", self.constant_text(width)));
        }
        ty.push_str(&self.describe_type(spec, &declarator.derived));

        let mut sentence = match spec.storage {
            Some(StorageClass::Typedef) => format!("{} {} as type alias for {}", verb, name, ty),
            Some(storage) => format!("{} {} as {} {}", verb, name, storage.keyword(), ty),
            None => format!("{} {} as {}", verb, name, ty),
        };

        if let Some(initializer) = &declarator.initializer {
            sentence.push_str(", initialized to ");
            sentence.push_str(&initializer_to_c(initializer));
        }

        sentence
    }

    /// Describe the type built by applying `derived` to the specifier,
    /// e.g. "pointer to function (int) returning void"
    pub fn describe_type(&self, spec: &DeclSpecifier, derived: &[DerivedType]) -> String {
        let mut out = String::new();

        for derivation in derived {
            match derivation {
                DerivedType::Pointer(qualifiers) => {
                    if !qualifiers.is_empty() {
                        out.push_str(&qualifiers_text(qualifiers));
                        out.push(' ');
                    }
                    out.push_str("pointer to ");
                }
                DerivedType::Array(Some(bound)) => {
                    out.push_str(&format!("array {} of ", self.constant_text(bound)));
                }
                DerivedType::Array(None) => out.push_str("array of "),
                DerivedType::Function {
                    params,
                    variadic,
                    prototype,
                } => {
                    out.push_str("function ");
                    if *prototype {
                        out.push_str(&format!("({}) ", self.describe_params(params, *variadic)));
                    }
                    out.push_str("returning ");
                }
            }
        }

        out.push_str(&type_name_text(spec));
        out
    }

    fn describe_params(&self, params: &[ParameterDeclaration], variadic: bool) -> String {
        if params.is_empty() && !variadic {
            return "void".to_string();
        }

        let mut parts: Vec<String> = params
            .iter()
            .map(|param| {
                let ty = self.describe_type(&param.specifier, &param.declarator.derived);
                match &param.declarator.name {
                    Some(name) => format!("{} as {}", name, ty),
                    None => ty,
                }
            })
            .collect();
        if variadic {
            parts.push("...".to_string());
        }
        parts.join(", ")
    }

    fn constant_text(&self, expr: &Expr) -> String {
        match expr.fold(&|name: &str| self.constant(name)) {
            Some(value) => value.to_string(),
            None => expr_to_c(expr),
        }
    }
}

/// Explain a declaration without any enum constants in scope
pub fn explain_declaration(decl: &SimpleDeclaration) -> Vec<String> {
    Explainer::new().explain_declaration(decl)
}

/// Storage class, qualifiers and base type in words, e.g. "static const unsigned long"
pub fn describe_specifier(spec: &DeclSpecifier) -> String {
    match spec.storage {
        Some(storage) => format!("{} {}", storage.keyword(), type_name_text(spec)),
        None => type_name_text(spec),
    }
}

fn qualifiers_text(qualifiers: &TypeQualifiers) -> String {
    match (qualifiers.is_const, qualifiers.is_volatile) {
        (true, true) => "const volatile".to_string(),
        (true, false) => "const".to_string(),
        (false, true) => "volatile".to_string(),
        (false, false) => String::new(),
    }
}

fn type_name_text(spec: &DeclSpecifier) -> String {
    if spec.qualifiers.is_empty() {
        spec.base.name()
    } else {
        format!("{} {}", qualifiers_text(&spec.qualifiers), spec.base.name())
    }
}

/// Render a specifier as C source. Bodies of struct, union and enum
/// definitions are elided as `{ ... }`.
pub fn specifier_to_c(spec: &DeclSpecifier) -> String {
    let mut parts = Vec::new();
    if let Some(storage) = spec.storage {
        parts.push(storage.keyword().to_string());
    }
    if !spec.qualifiers.is_empty() {
        parts.push(qualifiers_text(&spec.qualifiers));
    }

    let base = match &spec.base {
        BaseType::Record { kind, tag, members } => {
            tagged_to_c(kind.keyword(), tag.as_deref(), members.is_some())
        }
        BaseType::Enum { tag, enumerators } => {
            tagged_to_c("enum", tag.as_deref(), enumerators.is_some())
        }
        other => other.name(),
    };
    parts.push(base);
    parts.join(" ")
}

fn tagged_to_c(keyword: &str, tag: Option<&str>, has_body: bool) -> String {
    let mut text = keyword.to_string();
    if let Some(tag) = tag {
        text.push(' ');
        text.push_str(tag);
    }
    if has_body {
        text.push_str(" { ... }");
    }
    text
}

/// Render a declarator as C source: `*const p`, `(*fp)(int)`, `a[3] = {1, 2}`
pub fn declarator_to_c(declarator: &Declarator) -> String {
    let mut text = declarator.name.clone().unwrap_or_default();
    let mut after_pointer = false;

    for derivation in &declarator.derived {
        match derivation {
            DerivedType::Pointer(qualifiers) => {
                let mut prefix = String::from("*");
                if !qualifiers.is_empty() {
                    prefix.push_str(&qualifiers_text(qualifiers));
                    if !text.is_empty() {
                        prefix.push(' ');
                    }
                }
                text = prefix + &text;
                after_pointer = true;
            }
            DerivedType::Array(bound) => {
                if after_pointer {
                    text = format!("({})", text);
                }
                let bound = bound.as_ref().map(expr_to_c).unwrap_or_default();
                text = format!("{}[{}]", text, bound);
                after_pointer = false;
            }
            DerivedType::Function {
                params,
                variadic,
                prototype,
            } => {
                if after_pointer {
                    text = format!("({})", text);
                }
                text = format!("{}({})", text, params_to_c(params, *variadic, *prototype));
                after_pointer = false;
            }
        }
    }

    if let Some(width) = &declarator.bit_width {
        text.push_str(" : ");
        text.push_str(&expr_to_c(width));
    }
    if let Some(initializer) = &declarator.initializer {
        text.push_str(" = ");
        text.push_str(&initializer_to_c(initializer));
    }
    text
}

fn params_to_c(params: &[ParameterDeclaration], variadic: bool, prototype: bool) -> String {
    if !prototype {
        return String::new();
    }
    if params.is_empty() && !variadic {
        return "void".to_string();
    }

    let mut parts: Vec<String> = params
        .iter()
        .map(|param| type_to_c(&param.specifier, &param.declarator))
        .collect();
    if variadic {
        parts.push("...".to_string());
    }
    parts.join(", ")
}

fn type_to_c(spec: &DeclSpecifier, declarator: &Declarator) -> String {
    let declarator = declarator_to_c(declarator);
    if declarator.is_empty() {
        specifier_to_c(spec)
    } else {
        format!("{} {}", specifier_to_c(spec), declarator)
    }
}

/// Render a whole declaration as one line of C: `static int a, *b;`
pub fn declaration_to_c(decl: &SimpleDeclaration) -> String {
    let declarators: Vec<String> = decl.declarators().map(declarator_to_c).collect();
    let specifier = decl.specifier().map(specifier_to_c).unwrap_or_default();

    if declarators.is_empty() {
        format!("{};", specifier)
    } else if specifier.is_empty() {
        format!("{};", declarators.join(", "))
    } else {
        format!("{} {};", specifier, declarators.join(", "))
    }
}

pub fn initializer_to_c(initializer: &Initializer) -> String {
    match initializer {
        Initializer::Expr(expr) => expr_to_c(expr),
        Initializer::List(items) => {
            let items: Vec<String> = items.iter().map(initializer_to_c).collect();
            format!("{{{}}}", items.join(", "))
        }
    }
}

/// Render a constant expression with the minimum parentheses needed
pub fn expr_to_c(expr: &Expr) -> String {
    match expr {
        Expr::IntLiteral(n, _) => n.to_string(),
        Expr::FloatLiteral(s, _) => s.clone(),
        Expr::CharLiteral(c, _) => char_literal_to_c(*c),
        Expr::StringLiteral(s, _) => string_literal_to_c(s),
        Expr::Identifier(name, _) => name.clone(),
        Expr::Unary { op, operand, .. } => {
            let inner = match operand.as_ref() {
                Expr::Binary { .. } => format!("({})", expr_to_c(operand)),
                other => expr_to_c(other),
            };
            // keep `- -x` from turning into `--x`
            if inner.starts_with(op.symbol()) {
                format!("{} {}", op.symbol(), inner)
            } else {
                format!("{}{}", op.symbol(), inner)
            }
        }
        Expr::Binary {
            op, left, right, ..
        } => {
            let precedence = op.precedence();
            format!(
                "{} {} {}",
                operand_to_c(left, precedence, false),
                op.symbol(),
                operand_to_c(right, precedence, true)
            )
        }
        Expr::SizeofType {
            specifier,
            declarator,
            ..
        } => format!("sizeof({})", type_to_c(specifier, declarator)),
        Expr::SizeofExpr { expr, .. } => match expr.as_ref() {
            Expr::Binary { .. } => format!("sizeof ({})", expr_to_c(expr)),
            other => format!("sizeof {}", expr_to_c(other)),
        },
    }
}

fn operand_to_c(expr: &Expr, parent: u8, right_side: bool) -> String {
    if let Expr::Binary { op, .. } = expr {
        let precedence = op.precedence();
        if precedence < parent || (right_side && precedence == parent) {
            return format!("({})", expr_to_c(expr));
        }
    }
    expr_to_c(expr)
}

fn escape_char(c: char, quote: char, out: &mut String) {
    match c {
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        '\0' => out.push_str("\\0"),
        '\\' => out.push_str("\\\\"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_ascii_graphic() || c == ' ' => out.push(c),
        c => out.push_str(&format!("\\x{:02x}", c as u32)),
    }
}

fn char_literal_to_c(value: i64) -> String {
    match u8::try_from(value) {
        Ok(byte) => {
            let mut text = String::from("'");
            escape_char(byte as char, '\'', &mut text);
            text.push('\'');
            text
        }
        Err(_) => value.to_string(),
    }
}

fn string_literal_to_c(value: &str) -> String {
    let mut text = String::from("\"");
    for c in value.chars() {
        escape_char(c, '"', &mut text);
    }
    text.push('"');
    text
}
