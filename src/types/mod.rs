//! Type hierarchy (component B, §3) and the record/typedef/template
//! linkage between the type system and the declaration graph.

pub mod intern;

use crate::cv::QualifiedType;
use crate::ids::{EntityRef, Id};
use crate::record::Record;
use crate::template::{Substitution, TemplateParameter};
use crate::value::SourceLocation;

/// The closed enumeration of builtin scalar types (§3 "Builtin").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    Void,
    Bool,
    SChar,
    UChar,
    Char8,
    Char16,
    Char32,
    WChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Float,
    Double,
    LongDouble,
    NullptrT,
    /// Sentinel for a front-end builtin tag outside the recognised set,
    /// used only when the caller's [`crate::converter::BuiltinPolicy`] is
    /// `MapToUnknown` rather than `Reject` (§6 `builtin_set`).
    Unknown,
}

/// Either a fixed element count or the "array extent depends on a
/// template parameter" marker (§3 "Array").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayExtent {
    Fixed(u64),
    Dependent,
}

/// Shape of a function type: return type, ordered parameter types, and
/// the variadic flag (§3 "Function type").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionTypeSig {
    pub return_type: QualifiedType,
    pub parameters: Vec<QualifiedType>,
    pub is_variadic: bool,
}

/// A named alias for a qualified type (§3 "Typedef type").
#[derive(Debug, Clone)]
pub struct Typedef {
    pub parent: EntityRef,
    pub name: String,
    pub aliased: QualifiedType,
    pub location: Option<SourceLocation>,
}

/// `T::name`, a name that can only be resolved once `T` is substituted
/// (§3 "Dependent name type").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependentName {
    pub scope: QualifiedType,
    pub name: String,
}

/// Every type variant named in §3. Builtins and the composite kinds
/// (pointer/reference/array/function) are interned structurally
/// (§4.2); record, typedef, template-parameter, and template-
/// specialisation types are identified by the declaration or
/// template+argument list that backs them instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Builtin(BuiltinKind),
    Pointer(QualifiedType),
    LValueReference(QualifiedType),
    RValueReference(QualifiedType),
    Array {
        element: QualifiedType,
        extent: ArrayExtent,
    },
    Function(FunctionTypeSig),
    /// Backed by a record declaration. Also covers concrete class-
    /// template instantiations and full specialisations, since those
    /// *are* records once their arguments are concrete (§4.3).
    Record(Id<Record>),
    Typedef(Id<Typedef>),
    /// A reference to a type template parameter entity.
    TypeTemplateParameter(Id<TemplateParameter>),
    /// A dependent template substitution: at least one argument mentions
    /// an in-scope template parameter, so it cannot yet be realised as a
    /// concrete record (§4.3, §4.5).
    TemplateSpecialization(Id<Substitution>),
    DependentName(DependentName),
    /// An opaque expression token for `decltype(...)`-shaped nodes. The
    /// source-model layer may resolve this further; the code model treats
    /// it as dependent (§4.5 edge cases, §9 Open Question 1).
    Decltype(String),
}

/// A type entity. Every type belongs to exactly one context except for
/// interned composites, whose logical "owner" is the [`crate::context::CodeModel`]
/// itself (its interning tables are the closest thing to a parent for a
/// structurally-deduplicated type).
#[derive(Debug, Clone)]
pub struct Type {
    pub parent: EntityRef,
    pub kind: TypeKind,
}

impl Type {
    pub fn new(parent: EntityRef, kind: TypeKind) -> Self {
        Type { parent, kind }
    }
}
