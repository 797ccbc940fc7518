//! C declaration parser
//!
//! This module transforms C source text into declaration nodes:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser entry point, helpers and error recovery
//! - [`ast`]: Specifier, declarator and expression definitions
//! - [`node`]: [`node::DeclarationNode`], the specifier + declarator-list container
//!
//! # Supported C Subset
//!
//! File-scope declarations of C99 without the preprocessor:
//! - Storage classes, `const`/`volatile`, every arithmetic base type
//! - `struct`/`union`/`enum` specifiers, bit-fields, typedef names
//! - Pointer, array and function declarators, nested to any depth
//! - Constant-expression initializers and initializer lists
//! - Function definitions, with their bodies skipped
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod node;
pub mod parse;
