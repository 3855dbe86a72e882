//! Function & variable declarations (component G, §3, §4.8).

use bitflags::bitflags;

use crate::cv::{CvQualifiers, QualifiedType};
use crate::ids::{EntityRef, Id};
use crate::record::Record;
use crate::value::SourceLocation;

bitflags! {
    /// Storage/linkage flags shared by functions and variables, the same
    /// flag-set idiom `CSMethodFlags` uses (`generate/cs_members.rs`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StorageFlags: u16 {
        const INLINE    = 1 << 0;
        const STATIC    = 1 << 1;
        const EXTERN    = 1 << 2;
        const CONSTEXPR = 1 << 3;
        const VIRTUAL   = 1 << 4;
    }
}

/// ref-qualifier on a method's implicit `this` (`void f() &`, `void f() &&`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefQualifier {
    #[default]
    None,
    LValue,
    RValue,
}

/// A named, positional function parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub ty: QualifiedType,
    pub location: Option<SourceLocation>,
    pub has_default_arg: bool,
}

/// A free function or method (§3 "Function").
#[derive(Debug, Clone)]
pub struct Function {
    pub parent: EntityRef,
    pub name: String,
    pub return_type: QualifiedType,
    pub parameters: Vec<Parameter>,
    pub is_variadic: bool,
    pub storage: StorageFlags,
    pub location: Option<SourceLocation>,

    /// Present for methods; `this`'s cv-qualifiers and ref-qualifier,
    /// plus the virtuality flag folded into `storage` (§3, §4.8).
    pub enclosing_record: Option<Id<Record>>,
    pub this_cv: CvQualifiers,
    pub this_ref: RefQualifier,
}

impl Function {
    pub fn is_method(&self) -> bool {
        self.enclosing_record.is_some()
    }

    pub fn is_virtual(&self) -> bool {
        self.storage.contains(StorageFlags::VIRTUAL)
    }

    /// Patches parameter names/locations in a second pass keyed by
    /// positional index (§4.8: "because the front-end may provide richer
    /// name information on the defining declaration than on earlier
    /// redeclarations"). Lengths must already match; that shape is
    /// established once, by `convert_function_ret_type_and_params`.
    pub fn update_parameter_names(&mut self, names_and_locs: &[(String, Option<SourceLocation>)]) {
        debug_assert_eq!(
            self.parameters.len(),
            names_and_locs.len(),
            "parameter count mismatch while patching names"
        );
        for (param, (name, loc)) in self.parameters.iter_mut().zip(names_and_locs) {
            if !name.is_empty() {
                param.name = name.clone();
            }
            if loc.is_some() {
                param.location = loc.clone();
            }
        }
    }
}

/// A variable declaration (§3 "Variable").
#[derive(Debug, Clone)]
pub struct Variable {
    pub parent: EntityRef,
    pub name: String,
    pub ty: QualifiedType,
    pub storage: StorageFlags,
    pub location: Option<SourceLocation>,
}
