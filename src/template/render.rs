//! Textual rendering of a template substitution, and a narrow inverse
//! parser for that same rendering (§8 round-trip law). Grounded in the
//! original's `template_substitution::print_desc`/`template_argument::
//! print_desc` (original_source `template_substitution.hpp`,
//! `template_argument.hpp`), which write `name<arg, arg, ...>` to an
//! `ostream`; here that becomes an owned `String`; and since nothing in
//! the original reads its own rendering back, `parse_rendered_args` is a
//! byproduct of the Rust-specific testable property, not a translated
//! original_source method.

use crate::context::CodeModel;
use crate::cv::QualifiedType;
use crate::ids::Id;
use crate::template::{Substitution, TemplateArgument};
use crate::types::{BuiltinKind, Type, TypeKind};

impl BuiltinKind {
    /// The spelling `render_type` and `parse_type_spelling` agree on.
    pub fn spelling(self) -> &'static str {
        use BuiltinKind::*;
        match self {
            Void => "void",
            Bool => "bool",
            SChar => "signed char",
            UChar => "unsigned char",
            Char8 => "char8_t",
            Char16 => "char16_t",
            Char32 => "char32_t",
            WChar => "wchar_t",
            Short => "short",
            UShort => "unsigned short",
            Int => "int",
            UInt => "unsigned int",
            Long => "long",
            ULong => "unsigned long",
            LongLong => "long long",
            ULongLong => "unsigned long long",
            Float => "float",
            Double => "double",
            LongDouble => "long double",
            NullptrT => "nullptr_t",
            Unknown => "<unknown>",
        }
    }

    fn all() -> [BuiltinKind; 20] {
        use BuiltinKind::*;
        [
            Void, Bool, SChar, UChar, Char8, Char16, Char32, WChar, Short, UShort, Int, UInt, Long, ULong, LongLong,
            ULongLong, Float, Double, LongDouble, NullptrT,
        ]
    }
}

impl CodeModel {
    /// Renders a qualified type as a C++-ish spelling: builtins by name,
    /// pointers by appending `*`, records and template parameters by their
    /// own name. Anything else (references, arrays, dependent names) has
    /// no agreed spelling here and renders as `<unrenderable>`; this is a
    /// diagnostic aid and a round-trip fixture, not a general pretty-printer.
    pub fn render_type(&self, qt: QualifiedType) -> String {
        let spelling = self.render_type_kind(qt.ty);
        if qt.is_const() {
            format!("const {spelling}")
        } else {
            spelling
        }
    }

    fn render_type_kind(&self, ty: Id<Type>) -> String {
        match &self.types.get(ty).kind {
            TypeKind::Builtin(k) => k.spelling().to_string(),
            TypeKind::Pointer(inner) => format!("{}*", self.render_type(*inner)),
            TypeKind::Record(r) => self.records.get(*r).name.clone(),
            TypeKind::TypeTemplateParameter(p) => self.template_parameters.get(*p).name.clone(),
            _ => "<unrenderable>".to_string(),
        }
    }

    /// `TemplateName<arg, arg, ...>`, mirroring `template_substitution::
    /// print_desc`.
    pub fn render_substitution(&self, subst: Id<Substitution>) -> String {
        let s = self.substitutions.get(subst);
        let name = self.templates.get(s.template).name.clone();
        let args = s.args.iter().map(|a| self.render_argument(a)).collect::<Vec<_>>().join(", ");
        format!("{name}<{args}>")
    }

    fn render_argument(&self, arg: &TemplateArgument) -> String {
        match arg {
            TemplateArgument::Type(qt) => self.render_type(*qt),
            TemplateArgument::Value(v) => v.rendering().to_string(),
        }
    }

    /// Recovers the argument list from a [`CodeModel::render_substitution`]
    /// rendering, recognising only the builtin/pointer spellings that
    /// renderer itself produces. Not a general parser: a record or
    /// template-parameter spelling is ambiguous without the enclosing
    /// scope to resolve it against, so those come back as `None`.
    pub fn parse_rendered_args(&mut self, rendering: &str) -> Option<Vec<TemplateArgument>> {
        let open = rendering.find('<')?;
        let close = rendering.rfind('>')?;
        if close <= open {
            return None;
        }
        let inner = &rendering[open + 1..close];
        if inner.is_empty() {
            return Some(Vec::new());
        }
        inner
            .split(", ")
            .map(|part| self.parse_type_spelling(part).map(TemplateArgument::Type))
            .collect()
    }

    fn parse_type_spelling(&mut self, spelling: &str) -> Option<QualifiedType> {
        let spelling = spelling.trim();
        if let Some(inner) = spelling.strip_suffix('*') {
            let pointee = self.parse_type_spelling(inner)?;
            return Some(QualifiedType::unqualified(self.get_or_create_pointer(pointee)));
        }
        for kind in BuiltinKind::all() {
            if kind.spelling() == spelling {
                return Some(QualifiedType::unqualified(self.builtin(kind)));
            }
        }
        None
    }
}
