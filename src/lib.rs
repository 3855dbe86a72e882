//! A language-neutral semantic model of a C++ translation unit, and the
//! converter that builds one from a front-end AST.
//!
//! [`context::CodeModel`] is the object graph: namespaces, records,
//! functions, templates, and the type system that ties them together.
//! [`converter::Converter`] walks a [`converter::Frontend`] implementation
//! and populates a `CodeModel` from it. [`source_model`] is an optional,
//! separate overlay for tooling that needs to round-trip to source text.

pub mod context;
pub mod converter;
pub mod cv;
pub mod error;
pub mod function;
pub mod ids;
pub mod record;
pub mod source_model;
pub mod template;
pub mod types;
pub mod value;

pub use context::CodeModel;
pub use converter::{Converter, ConverterConfig, Frontend};
pub use error::{ConversionError, Diagnostic};
