//! The front-end oracle trait (§6), the capability list the converter
//! needs from whatever produced the C++ AST, rendered as a Rust trait
//! instead of the original's clang-specific `ast_converter` methods
//! (`original_source/include/cm/cxx/clang/ast_converter.hpp`).

use crate::cv::CvQualifiers;
use crate::function::{RefQualifier, StorageFlags};
use crate::record::{Access, RecordKind};
use crate::types::{ArrayExtent, BuiltinKind};
use crate::value::{SourceLocation, Value};

/// Declaration shape dispatched by `convert_decl` (§4.6 dispatch table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Namespace,
    Record,
    Typedef,
    Function,
    Variable,
    Field,
    ClassTemplate,
    ClassTemplatePartialSpecialisation,
    ClassTemplateSpecialisation,
    FunctionTemplate,
    FunctionTemplateInstantiation,
    LinkageSpec,
    /// Friends, using-directives, static_assert, and anything else the
    /// converter does not surface (§4.6 "Others").
    Other,
}

#[derive(Debug, Clone, Copy)]
pub struct BaseDesc<Ty> {
    pub ty: Ty,
    pub access: Access,
    pub is_virtual: bool,
}

#[derive(Debug, Clone)]
pub struct ParamDesc<Ty> {
    pub name: String,
    pub ty: Ty,
    pub location: Option<SourceLocation>,
    pub has_default_arg: bool,
}

/// One entry of a template's own parameter list (§3 "Template parameter").
/// Carries the parameter's own declaration id so the converter can
/// register it in the decl-map, a later type node may reference this
/// same parameter via [`FrontendTypeKind::TypeTemplateParameter`].
#[derive(Debug, Clone)]
pub enum TemplateParamDesc<Decl, Ty> {
    Type { decl: Decl, name: String },
    Value { decl: Decl, name: String, ty: Ty },
}

/// One entry of a template argument list (§3 "Template argument").
#[derive(Debug, Clone)]
pub enum TemplateArgDesc<Ty> {
    Type(Ty),
    Value(Value),
}

/// The structural shape of a front-end type node, everything
/// `convert_type` needs to peel one level and recurse (§4.5, §6 "for a
/// type: the kind enumeration above plus its structural children").
/// Mirrors the flat `ResolvedTypeData` enum (`data/type_resolver.rs`),
/// which plays the identical role of handing the converter "one node's
/// shape" without committing to a concrete AST library.
#[derive(Debug, Clone)]
pub enum FrontendTypeKind<Ty, Decl> {
    Builtin(BuiltinKind),
    /// A builtin tag outside the recognised set, carrying its spelling
    /// for diagnostics (§4.5 "Unknown builtin tags fail with
    /// `unsupported_builtin`").
    UnknownBuiltin(String),
    Pointer(Ty),
    LValueReference(Ty),
    RValueReference(Ty),
    Array { element: Ty, extent: ArrayExtent },
    Function { return_type: Ty, parameters: Vec<Ty>, is_variadic: bool },
    Record(Decl),
    Typedef(Decl),
    TypeTemplateParameter(Decl),
    TemplateSpecialization { primary_template: Decl, args: Vec<TemplateArgDesc<Ty>> },
    DependentName { scope: Ty, name: String },
    Decltype(String),
    /// `struct X`, `typename T::U`, unwrapped to the underlying type by
    /// the converter; elaboration spelling is source-model-only (§4.5
    /// edge cases).
    Elaborated(Ty),
}

/// The front-end capability list of §6, as a trait the converter is
/// generic over rather than a dynamic interface, there is exactly one
/// concrete front-end per embedding application, so monomorphised
/// dispatch is preferred over the vtable plumbing the C++ original's
/// clang-specific `ast_converter` needed.
pub trait Frontend {
    /// Opaque handle to a front-end declaration. Two handles compare
    /// equal iff they denote the same declaration; redeclarations of the
    /// same entity are *not* required to compare equal to each other.
    /// Use [`Frontend::canonical_decl`] for that.
    type DeclId: Copy + Eq + std::hash::Hash + std::fmt::Debug;
    /// Opaque handle to a front-end (qualified) type node.
    type TypeId: Copy + std::fmt::Debug;

    fn top_level_decls(&self) -> Vec<Self::DeclId>;

    fn decl_kind(&self, decl: Self::DeclId) -> DeclKind;
    fn decl_name(&self, decl: Self::DeclId) -> String;
    fn decl_location(&self, decl: Self::DeclId) -> Option<SourceLocation>;
    /// The front-end's chosen unique representative among all
    /// redeclarations of `decl` (GLOSSARY "Canonical declaration").
    fn canonical_decl(&self, decl: Self::DeclId) -> Self::DeclId;
    /// Whether this declaration was synthesised by the compiler rather
    /// than written by the user (§6 `include_implicit`).
    fn decl_is_implicit(&self, decl: Self::DeclId) -> bool;

    fn namespace_members(&self, decl: Self::DeclId) -> Vec<Self::DeclId>;
    /// Members nested directly under a `extern "C"`/`extern "C++"`
    /// linkage-specification block (§4.6 "transparent; recurse").
    fn linkage_spec_members(&self, decl: Self::DeclId) -> Vec<Self::DeclId>;

    fn record_kind(&self, decl: Self::DeclId) -> RecordKind;
    fn record_is_complete(&self, decl: Self::DeclId) -> bool;
    fn record_is_anonymous(&self, decl: Self::DeclId) -> bool;
    fn record_bases(&self, decl: Self::DeclId) -> Vec<BaseDesc<Self::TypeId>>;
    fn record_members(&self, decl: Self::DeclId) -> Vec<Self::DeclId>;
    /// Members of an anonymous union/struct member that should be
    /// additionally promoted into the enclosing record (§4.7, §9 Open
    /// Question 3, trusted verbatim rather than re-derived).
    fn anon_members_to_promote(&self, decl: Self::DeclId) -> Vec<Self::DeclId>;

    fn typedef_aliased_type(&self, decl: Self::DeclId) -> Self::TypeId;

    fn function_return_type(&self, decl: Self::DeclId) -> Self::TypeId;
    fn function_parameters(&self, decl: Self::DeclId) -> Vec<ParamDesc<Self::TypeId>>;
    fn function_is_variadic(&self, decl: Self::DeclId) -> bool;
    fn function_storage(&self, decl: Self::DeclId) -> StorageFlags;
    /// `this`'s cv-qualifiers and ref-qualifier, for methods only.
    fn function_this(&self, decl: Self::DeclId) -> Option<(CvQualifiers, RefQualifier)>;

    fn variable_type(&self, decl: Self::DeclId) -> Self::TypeId;
    fn variable_storage(&self, decl: Self::DeclId) -> StorageFlags;
    fn field_type(&self, decl: Self::DeclId) -> Self::TypeId;
    fn field_promoted_from_anonymous(&self, decl: Self::DeclId) -> bool;

    fn template_parameters(&self, decl: Self::DeclId) -> Vec<TemplateParamDesc<Self::DeclId, Self::TypeId>>;
    fn template_is_variadic(&self, decl: Self::DeclId) -> bool;
    /// The primary template a (partial or full) specialisation or
    /// implicit instantiation specialises.
    fn specialisation_primary_template(&self, decl: Self::DeclId) -> Self::DeclId;
    fn specialisation_arguments(&self, decl: Self::DeclId) -> Vec<TemplateArgDesc<Self::TypeId>>;
    /// Own parameter list of a partial specialisation (§4.6 "populate its
    /// own parameters and argument list").
    fn partial_specialisation_parameters(&self, decl: Self::DeclId) -> Vec<TemplateParamDesc<Self::DeclId, Self::TypeId>>;

    fn type_kind(&self, ty: Self::TypeId) -> FrontendTypeKind<Self::TypeId, Self::DeclId>;
    fn type_cv(&self, ty: Self::TypeId) -> CvQualifiers;
}

#[cfg(test)]
pub mod fake;
