//! cv-qualifier bits and the qualified-type pair (§3 "Qualified type").

use bitflags::bitflags;

use crate::ids::Id;
use crate::types::Type;

bitflags! {
    /// const/volatile qualifier bits. Mirrors the flag-set idiom
    /// (`CSMethodFlags`, `CsParamFlags` in `generate/cs_members.rs`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
    pub struct CvQualifiers: u8 {
        const CONST = 0b01;
        const VOLATILE = 0b10;
    }
}

/// A type together with its cv-qualifier bits. Equality and hashing use
/// structural identity of the underlying type entity plus the qualifier
/// bits (§3, §4.2), nothing about the pointee/element type is compared
/// recursively, since the type entity itself is already the canonical,
/// interned identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualifiedType {
    pub ty: Id<Type>,
    pub cv: CvQualifiers,
}

impl QualifiedType {
    pub fn new(ty: Id<Type>, cv: CvQualifiers) -> Self {
        QualifiedType { ty, cv }
    }

    pub fn unqualified(ty: Id<Type>) -> Self {
        QualifiedType {
            ty,
            cv: CvQualifiers::empty(),
        }
    }

    pub fn is_const(&self) -> bool {
        self.cv.contains(CvQualifiers::CONST)
    }

    pub fn is_volatile(&self) -> bool {
        self.cv.contains(CvQualifiers::VOLATILE)
    }
}
