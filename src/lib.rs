//! # Introduction
//!
//! declview parses the declarations of a C source file and explains them.
//! Every file-scope declaration becomes a [`parser::ast::SimpleDeclaration`]:
//! one shared specifier (`static const int`) and a growable list of
//! declarators (`*p`, `a[3]`, `(*fp)(int)`). The result can be dumped as
//! English sentences or browsed in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → TranslationUnit → Explain → stdout / TUI
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds declaration nodes, recovering
//!    from malformed declarators by leaving a tombstone in their slot.
//! 2. [`explain`]: turns declarations back into C text and into cdecl-style
//!    English ("declare p as pointer to const char").
//! 3. [`ui`]: ratatui-based browser; not part of the stable library API.
//!
//! ## Supported C subset
//!
//! Storage classes, `const`/`volatile`, every integer and floating base type,
//! structs, unions, enums, typedef names, pointers, arrays, function
//! declarators with prototypes, bit-fields and constant initializers.
//! Function bodies are skipped, not parsed.

pub mod explain;
pub mod parser;
pub mod ui;
