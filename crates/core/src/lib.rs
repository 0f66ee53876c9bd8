//! astgen-core: front end of the astgen class generator.
//!
//! Provides the pipeline from a textual definitions file to a stream of
//! parsed constructs: a table-driven tokenizer, a recursive-descent
//! parser, and the definition-AST the parser produces. Generation is a
//! separate concern -- the parser reports completed constructs to a
//! caller-supplied [`ParseHandler`] as it goes.
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`Tokenizer`] -- streaming, character-class-driven tokenizer
//! - [`parse()`] -- run the parser over a source string
//! - [`ParseHandler`] -- callbacks for commands and definitions
//! - [`SyntaxError`] -- lexical/syntactic error type
//! - AST types: [`Definition`], [`NodeDef`], [`FieldDef`], [`TypeExpr`]

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{Definition, FieldDef, NodeDef, TypeExpr};
pub use error::SyntaxError;
pub use lexer::{Spanned, Token, Tokenizer};
pub use parser::{parse, ParseHandler};
