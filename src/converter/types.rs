//! Converter, types (component H, §4.5 `convert_type`).

use crate::cv::QualifiedType;
use crate::error::Diagnostic;
use crate::ids::{EntityRef, Id};
use crate::template::{args_are_dependent, TemplateArgument};
use crate::types::{BuiltinKind, DependentName, FunctionTypeSig, Type, TypeKind};

use super::config::BuiltinPolicy;
use super::frontend::{Frontend, FrontendTypeKind, TemplateArgDesc};
use super::Converter;

impl<'f, F: Frontend> Converter<'f, F> {
    /// Peels one level of structure off a front-end qualified type and
    /// recurses, interning composite kinds and resolving
    /// declaration-identified kinds through the decl-map (§4.5).
    pub fn convert_type(&mut self, fty: F::TypeId) -> QualifiedType {
        let cv = self.frontend.type_cv(fty);
        let ty = self.convert_type_kind(fty);
        QualifiedType::new(ty, cv)
    }

    fn convert_type_kind(&mut self, fty: F::TypeId) -> Id<Type> {
        match self.frontend.type_kind(fty) {
            FrontendTypeKind::Builtin(kind) => self.model.builtin(kind),
            FrontendTypeKind::UnknownBuiltin(spelling) => self.convert_unknown_builtin(spelling),
            FrontendTypeKind::Pointer(inner) => {
                let qt = self.convert_type(inner);
                self.model.get_or_create_pointer(qt)
            }
            FrontendTypeKind::LValueReference(inner) => {
                let qt = self.convert_type(inner);
                self.model.get_or_create_lvalue_reference(qt)
            }
            FrontendTypeKind::RValueReference(inner) => {
                let qt = self.convert_type(inner);
                self.model.get_or_create_rvalue_reference(qt)
            }
            FrontendTypeKind::Array { element, extent } => {
                let qt = self.convert_type(element);
                self.model.get_or_create_array(qt, extent)
            }
            FrontendTypeKind::Function {
                return_type,
                parameters,
                is_variadic,
            } => {
                let return_type = self.convert_type(return_type);
                let parameters = parameters.into_iter().map(|p| self.convert_type(p)).collect();
                self.model.get_or_create_function_type(FunctionTypeSig {
                    return_type,
                    parameters,
                    is_variadic,
                })
            }
            FrontendTypeKind::Record(decl) => self.convert_record_type(decl),
            FrontendTypeKind::Typedef(decl) => self.convert_typedef_type(decl),
            FrontendTypeKind::TypeTemplateParameter(decl) => self.convert_type_template_param_type(decl),
            FrontendTypeKind::TemplateSpecialization { primary_template, args } => {
                self.convert_template_spec_type(primary_template, args)
            }
            FrontendTypeKind::DependentName { scope, name } => {
                let scope = self.convert_type(scope);
                self.model
                    .types
                    .alloc(Type::new(self.current_context, TypeKind::DependentName(DependentName { scope, name })))
            }
            FrontendTypeKind::Decltype(token) => self
                .model
                .types
                .alloc(Type::new(self.current_context, TypeKind::Decltype(token))),
            // Elaboration is unwrapped here; its spelling is recorded at
            // the source-model layer only (§4.5 edge cases).
            FrontendTypeKind::Elaborated(inner) => self.convert_type_kind(inner),
        }
    }

    fn convert_unknown_builtin(&mut self, spelling: String) -> Id<Type> {
        match self.config.builtin_policy {
            BuiltinPolicy::Reject => {
                self.push_diagnostic(Diagnostic::UnsupportedConstruct {
                    node: spelling,
                    detail: "unrecognised builtin type tag".to_string(),
                });
                self.model.builtin(BuiltinKind::Unknown)
            }
            BuiltinPolicy::MapToUnknown => self.model.builtin(BuiltinKind::Unknown),
        }
    }

    /// Converts clang record type to code model type. Creates new empty
    /// record if needed (§4.5).
    fn convert_record_type(&mut self, decl: F::DeclId) -> Id<Type> {
        match self.get_or_create_record(decl) {
            Some(rec_id) => self.type_for_record(rec_id),
            None => {
                debug_assert!(false, "decl-map entity kind mismatch for record type");
                self.model.builtin(BuiltinKind::Unknown)
            }
        }
    }

    pub(crate) fn type_for_record(&mut self, rec_id: Id<crate::record::Record>) -> Id<Type> {
        if let Some(t) = self.record_types.get(&rec_id) {
            return *t;
        }
        let t = self
            .model
            .types
            .alloc(Type::new(EntityRef::Record(rec_id), TypeKind::Record(rec_id)));
        self.record_types.insert(rec_id, t);
        t
    }

    fn convert_typedef_type(&mut self, decl: F::DeclId) -> Id<Type> {
        let td_id = match self.existing_entity(decl) {
            Some(EntityRef::Typedef(t)) => t,
            Some(_) => {
                debug_assert!(false, "decl-map entity kind mismatch for typedef type");
                return self.model.builtin(BuiltinKind::Unknown);
            }
            None => {
                let canon = self.frontend.canonical_decl(decl);
                let aliased_fty = self.frontend.typedef_aliased_type(canon);
                let aliased = self.convert_type(aliased_fty);
                let name = self.frontend.decl_name(canon);
                let location = self.frontend.decl_location(canon);
                let td = self.model.typedefs.alloc(crate::types::Typedef {
                    parent: self.current_context,
                    name,
                    aliased,
                    location,
                });
                self.register_entity(canon, td);
                td
            }
        };
        self.type_for_typedef(td_id)
    }

    fn type_for_typedef(&mut self, td_id: Id<crate::types::Typedef>) -> Id<Type> {
        if let Some(t) = self.typedef_types.get(&td_id) {
            return *t;
        }
        let t = self
            .model
            .types
            .alloc(Type::new(EntityRef::Typedef(td_id), TypeKind::Typedef(td_id)));
        self.typedef_types.insert(td_id, t);
        t
    }

    fn convert_type_template_param_type(&mut self, decl: F::DeclId) -> Id<Type> {
        let param_id = match self.existing_entity(decl) {
            Some(EntityRef::TemplateParameter(p)) => p,
            _ => {
                // A template parameter's declaration is always visited as
                // part of its owning template's parameter list before any
                // type referencing it (§4.6 `convert_template_params` runs
                // first), absence here means the front-end broke that
                // ordering guarantee.
                debug_assert!(false, "type template parameter referenced before its template was converted");
                return self.model.builtin(BuiltinKind::Unknown);
            }
        };
        self.type_for_template_parameter(param_id)
    }

    pub(crate) fn type_for_template_parameter(&mut self, param_id: Id<crate::template::TemplateParameter>) -> Id<Type> {
        if let Some(t) = self.param_types.get(&param_id) {
            return *t;
        }
        let t = self.model.types.alloc(Type::new(
            EntityRef::TemplateParameter(param_id),
            TypeKind::TypeTemplateParameter(param_id),
        ));
        self.param_types.insert(param_id, t);
        t
    }

    fn convert_template_spec_type(
        &mut self,
        primary_decl: F::DeclId,
        args: Vec<TemplateArgDesc<F::TypeId>>,
    ) -> Id<Type> {
        let template_id = match self.existing_entity(primary_decl) {
            Some(EntityRef::Template(t)) => t,
            _ => {
                debug_assert!(false, "template specialisation references an unconverted template");
                return self.model.builtin(BuiltinKind::Unknown);
            }
        };

        let converted_args: Vec<TemplateArgument> = args
            .into_iter()
            .map(|a| match a {
                TemplateArgDesc::Type(t) => TemplateArgument::Type(self.convert_type(t)),
                TemplateArgDesc::Value(v) => TemplateArgument::Value(v),
            })
            .collect();

        let is_dependent = args_are_dependent(&converted_args, |qt| self.type_mentions_parameter(qt));

        if is_dependent {
            let subst = self.model.create_dependent_instantiation(template_id, converted_args);
            return self.type_for_substitution(subst);
        }

        let subst = self.model.find_or_create_instantiation(template_id, converted_args);
        match self.model.substitutions.get(subst).produced() {
            Some(EntityRef::Record(rec)) => self.type_for_record(rec),
            Some(EntityRef::Function(_)) => {
                debug_assert!(false, "a function template instantiation never appears as a type node");
                self.model.builtin(BuiltinKind::Unknown)
            }
            _ => self.type_for_substitution(subst),
        }
    }

    /// Whether `qt` mentions an in-scope template parameter anywhere in
    /// its structure, not just at the top level (§3/§4.5 "dependent"):
    /// recurses through pointer/reference/array element types and a
    /// function type's return/parameter types.
    fn type_mentions_parameter(&self, qt: QualifiedType) -> bool {
        match &self.model.types.get(qt.ty).kind {
            TypeKind::TypeTemplateParameter(_) => true,
            TypeKind::Pointer(inner) | TypeKind::LValueReference(inner) | TypeKind::RValueReference(inner) => {
                self.type_mentions_parameter(*inner)
            }
            TypeKind::Array { element, .. } => self.type_mentions_parameter(*element),
            TypeKind::Function(sig) => {
                self.type_mentions_parameter(sig.return_type) || sig.parameters.iter().any(|p| self.type_mentions_parameter(*p))
            }
            _ => false,
        }
    }

    fn type_for_substitution(&mut self, subst: Id<crate::template::Substitution>) -> Id<Type> {
        if let Some(t) = self.subst_types.get(&subst) {
            return *t;
        }
        let t = self
            .model
            .types
            .alloc(Type::new(EntityRef::Substitution(subst), TypeKind::TemplateSpecialization(subst)));
        self.subst_types.insert(subst, t);
        t
    }
}
