//! Error and diagnostic taxonomy (§7).
//!
//! Invariant violations (missing parent context, mismatched entity kind
//! when patching a forward reference, a corrupted use/user edge) are
//! programming errors: they `panic!`/`debug_assert!` at the violation
//! site the way `cs_context_collection.rs` and `cs_type_tag.rs` do
//! throughout (`panic!("Currently filling type {tag:?}...")`).
//! Everything recoverable, an unsupported front-end construct, or a
//! redefinition of an already-complete declaration, is a [`Diagnostic`]
//! pushed onto the converter's log; the rest of the translation unit
//! still converts.

use thiserror::Error;

/// Top-level error a [`crate::converter::Converter::convert`] call can
/// return. Only raised for the one case §7 says aborts conversion
/// outright: an internal inconsistency detected outside a
/// `debug_assertions` build.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("internal inconsistency: {detail}")]
    InternalInconsistency { detail: String },
}

/// A non-fatal issue recorded while converting a single declaration.
/// The declaration that produced it is left partially populated
/// (incomplete record, function with no parameters) per §7's "no
/// recovery is attempted inside a single declaration".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A front-end construct this converter does not handle.
    UnsupportedConstruct {
        /// Identity of the offending front-end node, as the front-end
        /// chooses to render it (debug string, file:line, etc).
        node: String,
        detail: String,
    },
    /// A second definition of an already-complete record or non-inline
    /// function. The pre-existing entity is kept.
    Redefinition { name: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnsupportedConstruct { node, detail } => {
                write!(f, "unsupported construct at {node}: {detail}")
            }
            Diagnostic::Redefinition { name } => write!(f, "redefinition of {name}"),
        }
    }
}
