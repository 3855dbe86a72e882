//! Template arguments (§3 "Template argument").
//!
//! The C++ original (`template_argument.hpp`/`template_argument_desc.hpp`)
//! splits this into an owned `template_argument` object (with a back
//! pointer to its substitution) and a separate, cheaply-copyable
//! `template_argument_desc` used purely for equality comparisons, because
//! C++ needed a const/non-const pair of description types to forward
//! through generic code. Rust's ownership model makes that split
//! unnecessary: a `TemplateArgument` is plain, `Clone`+`Eq` data, used
//! both as the bound argument stored on a [`super::Substitution`] and as
//! the description passed to `find_substitution`.

use crate::cv::QualifiedType;
use crate::value::Value;

/// Either a type argument (which may itself be a parameter-type, for a
/// partial specialisation's own argument list) or a value argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateArgument {
    Type(QualifiedType),
    Value(Value),
}

impl TemplateArgument {
    pub fn is_type(&self) -> bool {
        matches!(self, TemplateArgument::Type(_))
    }

    pub fn as_type(&self) -> Option<QualifiedType> {
        match self {
            TemplateArgument::Type(qt) => Some(*qt),
            TemplateArgument::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            TemplateArgument::Value(v) => Some(v),
            TemplateArgument::Type(_) => None,
        }
    }
}

impl From<QualifiedType> for TemplateArgument {
    fn from(qt: QualifiedType) -> Self {
        TemplateArgument::Type(qt)
    }
}

impl From<Value> for TemplateArgument {
    fn from(v: Value) -> Self {
        TemplateArgument::Value(v)
    }
}

/// True when any argument in the list mentions an in-scope template
/// parameter, i.e. is not yet concrete (§3 "Dependent", §4.5).
pub fn args_are_dependent(args: &[TemplateArgument], is_parameter_type: impl Fn(QualifiedType) -> bool) -> bool {
    args.iter().any(|arg| match arg {
        TemplateArgument::Type(qt) => is_parameter_type(*qt),
        TemplateArgument::Value(_) => false,
    })
}
