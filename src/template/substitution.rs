//! Template substitutions (§3 "Template substitution", §4.3).

use crate::context::ContextData;
use crate::ids::{EntityRef, Id};
use crate::template::{Template, TemplateArgument};

/// The four substitution shapes named in §3:
/// - `Instantiation`: concrete arguments, produced from an explicit or
///   implicit instantiation.
/// - `FullSpecialisation`: behaves like an instantiation but was
///   authored separately by the programmer.
/// - `PartialSpecialisation`: itself a templated entity with its own
///   parameter list; matching it against an instantiation is delegated to
///   the front-end (§4.3, §9 Open Question 2).
/// - `DependentInstantiation`: at least one argument mentions a template
///   parameter in the enclosing scope.
#[derive(Debug, Clone)]
pub enum SubstitutionKind {
    Instantiation { produced: EntityRef },
    FullSpecialisation { produced: EntityRef },
    PartialSpecialisation { own_params: ContextData, is_variadic: bool },
    DependentInstantiation,
}

/// Binds a template to a list of template arguments (§3 "Template
/// substitution"). `parent` is the same context the owning template
/// itself lives in, and the substitution is registered as a child of
/// that context like any other entity (§4.1); the template itself is
/// reached separately, through the `template` use edge, matching the
/// original C++'s `context_entity{templ->ctx()}`.
#[derive(Debug, Clone)]
pub struct Substitution {
    pub parent: EntityRef,
    pub template: Id<Template>,
    pub args: Vec<TemplateArgument>,
    pub kind: SubstitutionKind,
}

impl Substitution {
    /// True for `Instantiation`/`FullSpecialisation`/`DependentInstantiation`,
    /// the substitutions counted by the uniqueness invariant (§3.4).
    /// `PartialSpecialisation` is excluded since more than one partial
    /// specialisation legitimately matches overlapping argument shapes.
    pub fn is_non_partial(&self) -> bool {
        !matches!(self.kind, SubstitutionKind::PartialSpecialisation { .. })
    }

    pub fn produced(&self) -> Option<EntityRef> {
        match self.kind {
            SubstitutionKind::Instantiation { produced } => Some(produced),
            SubstitutionKind::FullSpecialisation { produced } => Some(produced),
            _ => None,
        }
    }

    /// True for a substitution whose record/function is backed by
    /// concrete arguments only, conventionally a template's "arguments
    /// are all concrete" test (§4.5).
    pub fn is_concrete(&self) -> bool {
        !matches!(self.kind, SubstitutionKind::DependentInstantiation)
            && !matches!(self.kind, SubstitutionKind::PartialSpecialisation { .. })
    }

    /// Returns this substitution's own arguments compared element-wise
    /// against `other_args` (§4.3 `find_substitution`, original C++
    /// `args_equal`).
    pub fn args_equal(&self, other_args: &[TemplateArgument]) -> bool {
        self.args.as_slice() == other_args
    }
}
