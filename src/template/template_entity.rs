//! The template itself (§3 "Template", §4.3).

use crate::context::ContextData;
use crate::function::Function;
use crate::ids::{EntityRef, Id};
use crate::record::Record;

/// Which kind of declaration substituting this template produces: a
/// class template produces records, a function template produces
/// functions (§3 "A template is either a class template ... or a
/// function template").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePrimary {
    /// The un-substituted primary record pattern, e.g. the `struct V { T*
    /// p; }` shell for `template<class T> struct V { T* p; }` (§4.6:
    /// "store primary record shell as the templated record").
    Class(Id<Record>),
    Function(Id<Function>),
}

impl TemplatePrimary {
    pub fn as_entity_ref(self) -> EntityRef {
        match self {
            TemplatePrimary::Class(id) => EntityRef::Record(id),
            TemplatePrimary::Function(id) => EntityRef::Function(id),
        }
    }
}

/// A named entity that is both a context (holding its parameters) and a
/// templated entity (§3 "Template"). Its substitutions are reached as use
/// edges (`CodeModel::users_of(EntityRef::Template(id))`), not as
/// `ctx` children; `ctx` holds only this template's own parameters.
#[derive(Debug, Clone)]
pub struct Template {
    pub parent: EntityRef,
    pub name: String,
    pub ctx: ContextData,
    pub is_variadic: bool,
    pub primary: TemplatePrimary,
}

impl Template {
    pub fn new(parent: EntityRef, name: String, primary: TemplatePrimary) -> Self {
        Template {
            parent,
            name,
            ctx: ContextData::default(),
            is_variadic: false,
            primary,
        }
    }
}
