//! Record (class/struct/union) component (F, §3, §4.7).

use crate::context::ContextData;
use crate::cv::QualifiedType;
use crate::ids::{EntityRef, Id};
use crate::template::Substitution;
use crate::value::SourceLocation;

/// class / struct / union tag (§3 "Record").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Class,
    Struct,
    Union,
}

/// Access specifier of a base class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Public,
    Protected,
    Private,
}

/// One entry of a record's base-class list (§3 "Record").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaseSpecifier {
    pub base: QualifiedType,
    pub access: Access,
    pub is_virtual: bool,
}

/// A data member (§3 "Field").
#[derive(Debug, Clone)]
pub struct Field {
    pub parent: Id<Record>,
    pub name: String,
    pub ty: QualifiedType,
    pub location: Option<SourceLocation>,
    /// Set when this field was promoted into its enclosing record from an
    /// anonymous union/struct member, per the front-end's own flag (§4.7,
    /// §9 Open Question 3).
    pub promoted_from_anonymous: bool,
}

/// A class/struct/union context. A record may be a forward declaration
/// (`ctx` empty, `is_complete` false), invariant 5 (§3): non-empty
/// context iff complete. Fields, methods, nested records, and nested
/// typedefs are all children of the record's [`ContextData`] (§4.7); a
/// method is still fundamentally a [`crate::function::Function`] whose
/// `enclosing_record` points back here (§4.8).
#[derive(Debug, Clone)]
pub struct Record {
    pub parent: EntityRef,
    /// Empty for an anonymous record/union (§3 "Named entity", name may
    /// be empty for anonymous records).
    pub name: String,
    pub kind: RecordKind,
    pub is_complete: bool,
    pub is_anonymous: bool,
    pub bases: Vec<BaseSpecifier>,
    pub ctx: ContextData,
    pub location: Option<SourceLocation>,
    /// Set when this record is the product of substituting a class
    /// template (instantiation or full specialisation). `None` for an
    /// ordinary, non-template record. See DESIGN.md Open Question
    /// resolution #5 (has-a instead of is-a).
    pub generated_by: Option<Id<Substitution>>,
}

impl Record {
    pub fn new_forward_decl(parent: EntityRef, name: String, kind: RecordKind) -> Self {
        let is_anonymous = name.is_empty();
        Record {
            parent,
            name,
            kind,
            is_complete: false,
            is_anonymous,
            bases: Vec::new(),
            ctx: ContextData::default(),
            location: None,
            generated_by: None,
        }
    }
}
