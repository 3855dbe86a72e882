//! Converter, declarations (component H/I, §4.6 `convert_decl` and its
//! per-kind handlers).

use itertools::Itertools;

use crate::context::Namespace;
use crate::error::{ConversionError, Diagnostic};
use crate::function::{Function, Parameter, Variable};
use crate::ids::{EntityRef, Id};
use crate::record::{BaseSpecifier, Field, Record};
use crate::template::{Template, TemplateArgument};
use crate::types::Typedef;
use crate::value::SourceLocation;

use super::context_swap::ContextSwap;
use super::frontend::{DeclKind, Frontend, TemplateArgDesc, TemplateParamDesc};
use super::Converter;

impl<'f, F: Frontend> Converter<'f, F> {
    /// Dispatches on declaration kind (§4.6). Implicit declarations are
    /// skipped unless `config.include_implicit` is set.
    pub fn convert_decl(&mut self, decl: F::DeclId) -> Result<(), ConversionError> {
        if self.frontend.decl_is_implicit(decl) && !self.config.include_implicit {
            return Ok(());
        }
        match self.frontend.decl_kind(decl) {
            DeclKind::Namespace => self.convert_ns(decl),
            DeclKind::Record => self.convert_record(decl),
            DeclKind::Typedef => {
                self.convert_typedef(decl);
                Ok(())
            }
            DeclKind::Function => {
                self.convert_function(decl);
                Ok(())
            }
            DeclKind::Variable => {
                self.convert_variable(decl);
                Ok(())
            }
            DeclKind::Field => {
                self.convert_field(decl);
                Ok(())
            }
            DeclKind::ClassTemplate => self.convert_template_class(decl),
            DeclKind::ClassTemplatePartialSpecialisation => {
                self.convert_template_partial_specialisation(decl);
                Ok(())
            }
            DeclKind::ClassTemplateSpecialisation => self.convert_template_class_spec(decl),
            DeclKind::FunctionTemplate => self.convert_function_template(decl),
            DeclKind::FunctionTemplateInstantiation => self.convert_template_function_inst(decl),
            // Transparent: members of a linkage-specification block belong
            // to the enclosing context, not a context of their own (§4.6).
            DeclKind::LinkageSpec => {
                for member in self.frontend.linkage_spec_members(decl) {
                    self.convert_decl(member)?;
                }
                Ok(())
            }
            DeclKind::Other => Ok(()),
        }
    }

    /// Pushes `child` into whichever context `current_context` denotes.
    /// Every decl-kind creation path funnels through here so a context's
    /// child list and name index (§4.1) stay in sync regardless of what
    /// kind of thing is being added.
    fn push_into_current_context(&mut self, name: &str, child: EntityRef) {
        self.model.push_child(self.current_context, Some(name), child);
    }

    fn convert_ns(&mut self, decl: F::DeclId) -> Result<(), ConversionError> {
        let canon = self.frontend.canonical_decl(decl);
        let ns_id = match self.existing_entity(canon) {
            Some(EntityRef::Namespace(id)) => id,
            Some(_) => {
                debug_assert!(false, "decl-map entity kind mismatch for namespace");
                return Ok(());
            }
            None => {
                let name = self.frontend.decl_name(canon);
                let ns = self
                    .model
                    .namespaces
                    .alloc(Namespace::new(self.current_context, name.clone()));
                self.push_into_current_context(&name, EntityRef::Namespace(ns));
                self.register_entity(canon, ns);
                ns
            }
        };

        let members = self.frontend.namespace_members(canon);
        let mut swap = ContextSwap::enter(&mut *self, EntityRef::Namespace(ns_id), Some(canon));
        for member in members {
            swap.converter().convert_decl(member)?;
        }
        Ok(())
    }

    fn convert_record(&mut self, decl: F::DeclId) -> Result<(), ConversionError> {
        let canon = self.frontend.canonical_decl(decl);
        let was_new = self.existing_entity(canon).is_none();
        let rec_id = match self.get_or_create_record(canon) {
            Some(r) => r,
            None => {
                debug_assert!(false, "decl-map entity kind mismatch for record");
                return Ok(());
            }
        };
        if was_new {
            let name = self.frontend.decl_name(canon);
            self.push_into_current_context(&name, EntityRef::Record(rec_id));
            self.model.records.get_mut(rec_id).location = self.frontend.decl_location(canon);
        }

        if self.frontend.record_is_complete(canon) {
            let already_complete = self.model.records.get(rec_id).is_complete;
            if already_complete && self.filled_records.contains(&canon) {
                // Same already-filled canonical declaration visited again
                // (§4.6 idempotence): a no-op, not a redefinition.
            } else if already_complete {
                let name = self.frontend.decl_name(canon);
                self.push_diagnostic(Diagnostic::Redefinition { name });
            } else {
                self.fill_record_contents(rec_id, canon)?;
                self.filled_records.insert(canon);
            }
        }
        Ok(())
    }

    /// Populates an existing (forward-declared) record from `canon`'s
    /// definition: kind, anonymity, bases, then its members under a swapped
    /// context, then anonymous-member promotion (§4.7).
    fn fill_record_contents(&mut self, rec_id: Id<Record>, canon: F::DeclId) -> Result<(), ConversionError> {
        let kind = self.frontend.record_kind(canon);
        let is_anonymous = self.frontend.record_is_anonymous(canon);
        let base_descs = self.frontend.record_bases(canon);
        let bases: Vec<BaseSpecifier> = base_descs
            .into_iter()
            .map(|b| BaseSpecifier {
                base: self.convert_type(b.ty),
                access: b.access,
                is_virtual: b.is_virtual,
            })
            .collect_vec();
        {
            let rec = self.model.records.get_mut(rec_id);
            rec.kind = kind;
            rec.is_anonymous = is_anonymous;
            rec.bases = bases;
            rec.is_complete = true;
        }

        let members = self.frontend.record_members(canon);
        let mut swap = ContextSwap::enter(&mut *self, EntityRef::Record(rec_id), Some(canon));
        for member in members {
            swap.converter().convert_decl(member)?;
        }
        drop(swap);

        for member_decl in self.frontend.anon_members_to_promote(canon) {
            self.promote_anonymous_member(rec_id, member_decl);
        }
        Ok(())
    }

    /// Re-exposes a field already converted as a child of an anonymous
    /// union/struct's own context as an additional child of `enclosing`
    /// (§4.7, §9 Open Question 3), the field keeps its original parent, it
    /// simply becomes reachable from two contexts.
    fn promote_anonymous_member(&mut self, enclosing: Id<Record>, member_decl: F::DeclId) {
        let field_id = match self.existing_entity(member_decl) {
            Some(EntityRef::Field(f)) => f,
            _ => {
                debug_assert!(false, "anonymous member promoted before being converted");
                return;
            }
        };
        self.model.fields.get_mut(field_id).promoted_from_anonymous = true;
        let name = self.model.fields.get(field_id).name.clone();
        self.model
            .records
            .get_mut(enclosing)
            .ctx
            .push(Some(&name), EntityRef::Field(field_id));
    }

    fn convert_typedef(&mut self, decl: F::DeclId) {
        let canon = self.frontend.canonical_decl(decl);
        if self.existing_entity(canon).is_some() {
            return;
        }
        let aliased_fty = self.frontend.typedef_aliased_type(canon);
        let aliased = self.convert_type(aliased_fty);
        let name = self.frontend.decl_name(canon);
        let location = self.frontend.decl_location(canon);
        let td = self.model.typedefs.alloc(Typedef {
            parent: self.current_context,
            name: name.clone(),
            aliased,
            location,
        });
        self.push_into_current_context(&name, EntityRef::Typedef(td));
        self.register_entity(canon, td);
    }

    /// Allocates a function shape (return type, parameter types, arity,
    /// storage, this-qualifiers) from `canon` and links it into the model.
    /// Names/locations are deliberately left to
    /// [`Function::update_parameter_names`] rather than trusted here, see
    /// [`Converter::convert_function`].
    fn create_function_shape(&mut self, canon: F::DeclId) -> Id<Function> {
        let name = self.frontend.decl_name(canon);
        let return_fty = self.frontend.function_return_type(canon);
        let return_type = self.convert_type(return_fty);
        let param_descs = self.frontend.function_parameters(canon);
        let parameters: Vec<Parameter> = param_descs
            .into_iter()
            .map(|p| Parameter {
                name: p.name,
                ty: self.convert_type(p.ty),
                location: p.location,
                has_default_arg: p.has_default_arg,
            })
            .collect_vec();
        let is_variadic = self.frontend.function_is_variadic(canon);
        let storage = self.frontend.function_storage(canon);
        let (this_cv, this_ref) = self.frontend.function_this(canon).unwrap_or_default();
        let location = self.frontend.decl_location(canon);
        let enclosing_record = match self.current_context {
            EntityRef::Record(r) => Some(r),
            _ => None,
        };

        let func = self.model.functions.alloc(Function {
            parent: self.current_context,
            name: name.clone(),
            return_type,
            parameters,
            is_variadic,
            storage,
            location,
            enclosing_record,
            this_cv,
            this_ref,
        });
        self.push_into_current_context(&name, EntityRef::Function(func));
        self.register_entity(canon, func);
        func
    }

    /// Establishes a function's shape once, on first visit; on every visit
    /// (first included) re-queries parameter names/locations from `decl`
    /// itself, not its canonical redeclaration, and patches them by
    /// position (§4.8: later redeclarations may carry richer name
    /// information than the one that first introduced the function).
    fn convert_function(&mut self, decl: F::DeclId) {
        let canon = self.frontend.canonical_decl(decl);
        let func_id = match self.existing_entity(canon) {
            Some(EntityRef::Function(f)) => f,
            Some(_) => {
                debug_assert!(false, "decl-map entity kind mismatch for function");
                return;
            }
            None => self.create_function_shape(canon),
        };

        let param_descs = self.frontend.function_parameters(decl);
        let names_and_locs: Vec<(String, Option<SourceLocation>)> =
            param_descs.into_iter().map(|p| (p.name, p.location)).collect();
        self.model.functions.get_mut(func_id).update_parameter_names(&names_and_locs);
    }

    fn convert_variable(&mut self, decl: F::DeclId) {
        let canon = self.frontend.canonical_decl(decl);
        if self.existing_entity(canon).is_some() {
            return;
        }
        let name = self.frontend.decl_name(canon);
        let fty = self.frontend.variable_type(canon);
        let ty = self.convert_type(fty);
        let storage = self.frontend.variable_storage(canon);
        let location = self.frontend.decl_location(canon);
        let var = self.model.variables.alloc(Variable {
            parent: self.current_context,
            name: name.clone(),
            ty,
            storage,
            location,
        });
        self.push_into_current_context(&name, EntityRef::Variable(var));
        self.register_entity(canon, var);
    }

    fn convert_field(&mut self, decl: F::DeclId) {
        let canon = self.frontend.canonical_decl(decl);
        if self.existing_entity(canon).is_some() {
            return;
        }
        let rec_id = match self.current_context {
            EntityRef::Record(r) => r,
            _ => {
                debug_assert!(false, "field declared outside a record context");
                return;
            }
        };
        let name = self.frontend.decl_name(canon);
        let fty = self.frontend.field_type(canon);
        let ty = self.convert_type(fty);
        let location = self.frontend.decl_location(canon);
        let promoted_from_anonymous = self.frontend.field_promoted_from_anonymous(canon);
        let field = self.model.fields.alloc(Field {
            parent: rec_id,
            name: name.clone(),
            ty,
            location,
            promoted_from_anonymous,
        });
        self.push_into_current_context(&name, EntityRef::Field(field));
        self.register_entity(canon, field);
    }

    fn convert_template_class(&mut self, decl: F::DeclId) -> Result<(), ConversionError> {
        let canon = self.frontend.canonical_decl(decl);
        let template_id = match self.existing_entity(canon) {
            Some(EntityRef::Template(t)) => t,
            Some(_) => {
                debug_assert!(false, "decl-map entity kind mismatch for class template");
                return Ok(());
            }
            None => {
                let name = self.frontend.decl_name(canon);
                let template_id = self.model.create_class_template(self.current_context, name.clone());
                self.push_into_current_context(&name, EntityRef::Template(template_id));
                self.register_entity(canon, template_id);
                self.convert_template_params(template_id, canon);
                template_id
            }
        };

        if let Some(rec_id) = self.model.template_primary_record(template_id) {
            if self.frontend.record_is_complete(canon) && !self.model.records.get(rec_id).is_complete {
                self.fill_record_contents(rec_id, canon)?;
            }
        }
        Ok(())
    }

    /// Converts a template's own parameter list, registering each
    /// parameter's front-end declaration so a later type node referencing
    /// it (`FrontendTypeKind::TypeTemplateParameter`) resolves correctly.
    fn convert_template_params(&mut self, template_id: Id<Template>, canon: F::DeclId) {
        for param in self.frontend.template_parameters(canon) {
            match param {
                TemplateParamDesc::Type { decl, name } => {
                    let p = self.model.add_type_template_param(template_id, name);
                    self.register_entity(decl, p);
                }
                TemplateParamDesc::Value { decl, name, ty } => {
                    let qt = self.convert_type(ty);
                    let p = self.model.add_value_template_param(template_id, name, qt);
                    self.register_entity(decl, p);
                }
            }
        }
        if self.frontend.template_is_variadic(canon) {
            self.model.templates.get_mut(template_id).is_variadic = true;
        }
    }

    fn convert_template_partial_specialisation(&mut self, decl: F::DeclId) {
        let canon = self.frontend.canonical_decl(decl);
        if self.existing_entity(canon).is_some() {
            return;
        }
        let primary_decl = self.frontend.specialisation_primary_template(canon);
        let template_id = match self.existing_entity(primary_decl) {
            Some(EntityRef::Template(t)) => t,
            _ => {
                debug_assert!(false, "partial specialisation references an unconverted primary template");
                return;
            }
        };

        let arg_descs = self.frontend.specialisation_arguments(canon);
        let args: Vec<TemplateArgument> = arg_descs
            .into_iter()
            .map(|a| match a {
                TemplateArgDesc::Type(t) => TemplateArgument::Type(self.convert_type(t)),
                TemplateArgDesc::Value(v) => TemplateArgument::Value(v),
            })
            .collect_vec();

        let subst = self.model.create_partial_specialisation(template_id, args);
        self.register_entity(canon, subst);

        for param in self.frontend.partial_specialisation_parameters(canon) {
            match param {
                TemplateParamDesc::Type { decl, name } => {
                    let p = self.model.add_partial_spec_type_param(subst, name);
                    self.register_entity(decl, p);
                }
                TemplateParamDesc::Value { decl, name, ty } => {
                    let qt = self.convert_type(ty);
                    let p = self.model.add_partial_spec_value_param(subst, name, qt);
                    self.register_entity(decl, p);
                }
            }
        }
    }

    /// A full specialisation or an implicit instantiation encountered
    /// directly as a declaration (as opposed to first discovered through a
    /// type reference, §4.5's `convert_template_spec_type`) shares the
    /// same find-or-create substitution logic either way.
    fn convert_template_class_spec(&mut self, decl: F::DeclId) -> Result<(), ConversionError> {
        let canon = self.frontend.canonical_decl(decl);
        let subst = if let Some(EntityRef::Substitution(s)) = self.existing_entity(canon) {
            s
        } else {
            let primary_decl = self.frontend.specialisation_primary_template(canon);
            let template_id = match self.existing_entity(primary_decl) {
                Some(EntityRef::Template(t)) => t,
                _ => {
                    debug_assert!(false, "template specialisation references an unconverted primary template");
                    return Ok(());
                }
            };
            let arg_descs = self.frontend.specialisation_arguments(canon);
            let args: Vec<TemplateArgument> = arg_descs
                .into_iter()
                .map(|a| match a {
                    TemplateArgDesc::Type(t) => TemplateArgument::Type(self.convert_type(t)),
                    TemplateArgDesc::Value(v) => TemplateArgument::Value(v),
                })
                .collect();
            let s = match self.model.find_non_partial_substitution(template_id, &args) {
                Some(existing) => existing,
                None => self.model.create_full_specialisation(template_id, args),
            };
            self.register_entity(canon, s);
            s
        };

        if let Some(EntityRef::Record(rec_id)) = self.model.substitutions.get(subst).produced() {
            if self.frontend.record_is_complete(canon) && !self.model.records.get(rec_id).is_complete {
                self.fill_record_contents(rec_id, canon)?;
            }
        }
        Ok(())
    }

    fn convert_function_template(&mut self, decl: F::DeclId) -> Result<(), ConversionError> {
        let canon = self.frontend.canonical_decl(decl);
        if self.existing_entity(canon).is_some() {
            return Ok(());
        }
        let name = self.frontend.decl_name(canon);
        let template_id = self.model.create_function_template(self.current_context, name.clone());
        self.push_into_current_context(&name, EntityRef::Template(template_id));
        self.register_entity(canon, template_id);
        self.convert_template_params(template_id, canon);

        if let Some(primary_func) = self.model.template_primary_function(template_id) {
            let return_fty = self.frontend.function_return_type(canon);
            let return_type = self.convert_type(return_fty);
            let param_descs = self.frontend.function_parameters(canon);
            let parameters: Vec<Parameter> = param_descs
                .into_iter()
                .map(|p| Parameter {
                    name: p.name,
                    ty: self.convert_type(p.ty),
                    location: p.location,
                    has_default_arg: p.has_default_arg,
                })
                .collect();
            let is_variadic = self.frontend.function_is_variadic(canon);
            let storage = self.frontend.function_storage(canon);
            let location = self.frontend.decl_location(canon);

            let primary = self.model.functions.get_mut(primary_func);
            primary.return_type = return_type;
            primary.parameters = parameters;
            primary.is_variadic = is_variadic;
            primary.storage = storage;
            primary.location = location;
        }
        Ok(())
    }

    fn convert_template_function_inst(&mut self, decl: F::DeclId) -> Result<(), ConversionError> {
        let canon = self.frontend.canonical_decl(decl);
        let (subst, is_first_visit) = if let Some(EntityRef::Substitution(s)) = self.existing_entity(canon) {
            (s, false)
        } else {
            let primary_decl = self.frontend.specialisation_primary_template(canon);
            let template_id = match self.existing_entity(primary_decl) {
                Some(EntityRef::Template(t)) => t,
                _ => {
                    debug_assert!(
                        false,
                        "function template instantiation references an unconverted primary template"
                    );
                    return Ok(());
                }
            };
            let arg_descs = self.frontend.specialisation_arguments(canon);
            let args: Vec<TemplateArgument> = arg_descs
                .into_iter()
                .map(|a| match a {
                    TemplateArgDesc::Type(t) => TemplateArgument::Type(self.convert_type(t)),
                    TemplateArgDesc::Value(v) => TemplateArgument::Value(v),
                })
                .collect();
            let s = self.model.find_or_create_instantiation(template_id, args);
            self.register_entity(canon, s);
            (s, true)
        };

        let func_id = match self.model.substitutions.get(subst).produced() {
            Some(EntityRef::Function(f)) => f,
            _ => return Ok(()),
        };

        // Shape (types, arity, storage) is established once, from the
        // canonical declaration, a fresh instantiation's produced function
        // otherwise starts as the void/no-params shell `new_produced_entity`
        // allocates (§4.3).
        if is_first_visit {
            let return_fty = self.frontend.function_return_type(canon);
            let return_type = self.convert_type(return_fty);
            let param_descs = self.frontend.function_parameters(canon);
            let parameters: Vec<Parameter> = param_descs
                .into_iter()
                .map(|p| Parameter {
                    name: p.name,
                    ty: self.convert_type(p.ty),
                    location: p.location,
                    has_default_arg: p.has_default_arg,
                })
                .collect();
            let is_variadic = self.frontend.function_is_variadic(canon);
            let storage = self.frontend.function_storage(canon);
            let f = self.model.functions.get_mut(func_id);
            f.return_type = return_type;
            f.parameters = parameters;
            f.is_variadic = is_variadic;
            f.storage = storage;
            f.parent = self.current_context;
        }

        // Names/locations are re-patched from this specific redeclaration on
        // every visit, as in `convert_function` (§4.8).
        let param_descs = self.frontend.function_parameters(decl);
        let names_and_locs: Vec<(String, Option<SourceLocation>)> =
            param_descs.into_iter().map(|p| (p.name, p.location)).collect();
        self.model.functions.get_mut(func_id).update_parameter_names(&names_and_locs);
        Ok(())
    }
}
