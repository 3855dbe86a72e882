//! Converter configuration (§6 "Configuration options", §4.10 [ADDED]).

/// What to do with a front-end builtin tag the converter does not
/// recognise (§6 `builtin_set`: "unknown tags either fail or map to an
/// unknown builtin sentinel per caller choice").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuiltinPolicy {
    /// Record an `unsupported_construct` diagnostic and fall back to
    /// `BuiltinKind::Unknown` (§7).
    #[default]
    Reject,
    /// Map straight to `BuiltinKind::Unknown`, no diagnostic.
    MapToUnknown,
}

#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Include compiler-synthesised declarations (default off).
    pub include_implicit: bool,
    /// Record function bodies as opaque AST nodes in the source model
    /// (default off; only meaningful once the source-model overlay is
    /// attached, see `source_model.rs`).
    pub include_function_bodies: bool,
    pub builtin_policy: BuiltinPolicy,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            include_implicit: false,
            include_function_bodies: false,
            builtin_policy: BuiltinPolicy::default(),
        }
    }
}
