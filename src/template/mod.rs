//! Template machinery (component E, §3, §4.3): parameters, arguments,
//! substitutions, and the template entity itself.

mod argument;
mod parameter;
pub mod render;
mod substitution;
mod template_entity;

pub use argument::{args_are_dependent, TemplateArgument};
pub use parameter::{TemplateParameter, TemplateParameterKind};
pub use substitution::{Substitution, SubstitutionKind};
pub use template_entity::{Template, TemplatePrimary};

use crate::context::{CodeModel, ContextData};
use crate::cv::QualifiedType;
use crate::function::Function;
use crate::ids::{EntityRef, Id};
use crate::record::{Record, RecordKind};
use crate::types::BuiltinKind;

impl CodeModel {
    // ---- template & parameter creation (§4.6 "Class template" / "Function template") ----

    pub fn create_class_template(&mut self, parent: EntityRef, name: String) -> Id<Template> {
        let primary_record = self
            .records
            .alloc(Record::new_forward_decl(parent, name.clone(), RecordKind::Struct));
        self.templates
            .alloc(Template::new(parent, name, TemplatePrimary::Class(primary_record)))
    }

    pub fn create_function_template(&mut self, parent: EntityRef, name: String) -> Id<Template> {
        let void = self.builtin(BuiltinKind::Void);
        let primary_function = self.functions.alloc(Function {
            parent,
            name: name.clone(),
            return_type: QualifiedType::unqualified(void),
            parameters: Vec::new(),
            is_variadic: false,
            storage: Default::default(),
            location: None,
            enclosing_record: None,
            this_cv: Default::default(),
            this_ref: Default::default(),
        });
        self.templates
            .alloc(Template::new(parent, name, TemplatePrimary::Function(primary_function)))
    }

    pub fn add_type_template_param(&mut self, template: Id<Template>, name: String) -> Id<TemplateParameter> {
        let param = self.template_parameters.alloc(TemplateParameter {
            parent: EntityRef::Template(template),
            name: name.clone(),
            kind: TemplateParameterKind::Type,
        });
        self.templates
            .get_mut(template)
            .ctx
            .push(Some(&name), EntityRef::TemplateParameter(param));
        param
    }

    pub fn add_value_template_param(
        &mut self,
        template: Id<Template>,
        name: String,
        ty: QualifiedType,
    ) -> Id<TemplateParameter> {
        let param = self.template_parameters.alloc(TemplateParameter {
            parent: EntityRef::Template(template),
            name: name.clone(),
            kind: TemplateParameterKind::Value { ty },
        });
        self.templates
            .get_mut(template)
            .ctx
            .push(Some(&name), EntityRef::TemplateParameter(param));
        param
    }

    /// The record entity backing a class template's primary pattern
    /// (§4.6 "store primary record shell as the templated record").
    pub fn template_primary_record(&self, template: Id<Template>) -> Option<Id<Record>> {
        match self.templates.get(template).primary {
            TemplatePrimary::Class(r) => Some(r),
            TemplatePrimary::Function(_) => None,
        }
    }

    pub fn template_primary_function(&self, template: Id<Template>) -> Option<Id<Function>> {
        match self.templates.get(template).primary {
            TemplatePrimary::Function(f) => Some(f),
            TemplatePrimary::Class(_) => None,
        }
    }

    // ---- substitution algebra (§4.3) ----

    /// Scans every substitution of `template` (partial and non-partial)
    /// for one whose argument list equals `args`, linear, as §4.3
    /// prescribes ("repositories observed have O(tens) of specialisations
    /// per template so no secondary index is required").
    pub fn find_substitution(&self, template: Id<Template>, args: &[TemplateArgument]) -> Option<Id<Substitution>> {
        self.users_of(EntityRef::Template(template))
            .iter()
            .find_map(|r| match r {
                EntityRef::Substitution(sid) if self.substitutions.get(*sid).args_equal(args) => Some(*sid),
                _ => None,
            })
    }

    /// As [`CodeModel::find_substitution`], but only considers
    /// instantiation/full-specialisation/dependent-instantiation kinds,
    /// the ones invariant 4 (§3) bounds to at most one.
    pub fn find_non_partial_substitution(
        &self,
        template: Id<Template>,
        args: &[TemplateArgument],
    ) -> Option<Id<Substitution>> {
        self.find_substitution(template, args)
            .filter(|sid| self.substitutions.get(*sid).is_non_partial())
    }

    fn new_produced_entity(&mut self, template: Id<Template>, parent: EntityRef) -> EntityRef {
        match self.templates.get(template).primary {
            TemplatePrimary::Class(_) => {
                let rec = self
                    .records
                    .alloc(Record::new_forward_decl(parent, String::new(), RecordKind::Struct));
                EntityRef::Record(rec)
            }
            TemplatePrimary::Function(_) => {
                let void = self.builtin(BuiltinKind::Void);
                let func = self.functions.alloc(Function {
                    parent,
                    name: self.templates.get(template).name.clone(),
                    return_type: QualifiedType::unqualified(void),
                    parameters: Vec::new(),
                    is_variadic: false,
                    storage: Default::default(),
                    location: None,
                    enclosing_record: None,
                    this_cv: Default::default(),
                    this_ref: Default::default(),
                });
                EntityRef::Function(func)
            }
        }
    }

    fn link_substitution_to_produced(&mut self, subst: Id<Substitution>, produced: EntityRef) {
        if let EntityRef::Record(rid) = produced {
            self.records.get_mut(rid).generated_by = Some(subst);
        }
    }

    /// Creates an instantiation from concrete arguments. Requires
    /// `find_non_partial_substitution(template, &args)` to be `None`
    /// (§4.3), checked with `debug_assert!`, matching the original's
    /// `assert!(find_substitution(args...) == nullptr)`.
    pub fn create_instantiation(&mut self, template: Id<Template>, args: Vec<TemplateArgument>) -> Id<Substitution> {
        debug_assert!(
            self.find_non_partial_substitution(template, &args).is_none(),
            "template substitution with same arguments already exists"
        );
        let parent = self.templates.get(template).parent;
        let produced = self.new_produced_entity(template, parent);
        let subst = self.substitutions.alloc(Substitution {
            parent,
            template,
            args,
            kind: SubstitutionKind::Instantiation { produced },
        });
        self.push_child(parent, None, EntityRef::Substitution(subst));
        self.add_use(EntityRef::Substitution(subst), EntityRef::Template(template));
        self.link_substitution_to_produced(subst, produced);
        subst
    }

    /// `find_substitution(args)` then `create_instantiation(args)` on
    /// miss, the type-converter's entry point (§4.5: "If all arguments
    /// are concrete, call `find_or_create_instantiation` on the
    /// template").
    pub fn find_or_create_instantiation(&mut self, template: Id<Template>, args: Vec<TemplateArgument>) -> Id<Substitution> {
        if let Some(existing) = self.find_non_partial_substitution(template, &args) {
            return existing;
        }
        self.create_instantiation(template, args)
    }

    pub fn create_full_specialisation(&mut self, template: Id<Template>, args: Vec<TemplateArgument>) -> Id<Substitution> {
        debug_assert!(
            self.find_non_partial_substitution(template, &args).is_none(),
            "template substitution with same arguments already exists"
        );
        let parent = self.templates.get(template).parent;
        let produced = self.new_produced_entity(template, parent);
        let subst = self.substitutions.alloc(Substitution {
            parent,
            template,
            args,
            kind: SubstitutionKind::FullSpecialisation { produced },
        });
        self.push_child(parent, None, EntityRef::Substitution(subst));
        self.add_use(EntityRef::Substitution(subst), EntityRef::Template(template));
        self.link_substitution_to_produced(subst, produced);
        subst
    }

    /// Creates a dependent instantiation: at least one argument mentions
    /// an in-scope template parameter, so no record/function is produced
    /// (§3, §4.5).
    pub fn create_dependent_instantiation(&mut self, template: Id<Template>, args: Vec<TemplateArgument>) -> Id<Substitution> {
        let parent = self.templates.get(template).parent;
        let subst = self.substitutions.alloc(Substitution {
            parent,
            template,
            args,
            kind: SubstitutionKind::DependentInstantiation,
        });
        self.push_child(parent, None, EntityRef::Substitution(subst));
        self.add_use(EntityRef::Substitution(subst), EntityRef::Template(template));
        subst
    }

    /// Creates a partial specialisation nested under `template`, with its
    /// own parameter list (populated by the caller through
    /// [`CodeModel::add_partial_spec_type_param`]/`..._value_param`) and an
    /// argument list that may reference those parameters (§4.3, §4.6).
    pub fn create_partial_specialisation(&mut self, template: Id<Template>, args: Vec<TemplateArgument>) -> Id<Substitution> {
        let parent = self.templates.get(template).parent;
        let subst = self.substitutions.alloc(Substitution {
            parent,
            template,
            args,
            kind: SubstitutionKind::PartialSpecialisation {
                own_params: ContextData::default(),
                is_variadic: false,
            },
        });
        self.push_child(parent, None, EntityRef::Substitution(subst));
        self.add_use(EntityRef::Substitution(subst), EntityRef::Template(template));
        subst
    }

    pub fn add_partial_spec_type_param(&mut self, subst: Id<Substitution>, name: String) -> Id<TemplateParameter> {
        self.add_partial_spec_param(
            subst,
            TemplateParameter {
                parent: EntityRef::Substitution(subst),
                name: name.clone(),
                kind: TemplateParameterKind::Type,
            },
            &name,
        )
    }

    pub fn add_partial_spec_value_param(
        &mut self,
        subst: Id<Substitution>,
        name: String,
        ty: QualifiedType,
    ) -> Id<TemplateParameter> {
        self.add_partial_spec_param(
            subst,
            TemplateParameter {
                parent: EntityRef::Substitution(subst),
                name: name.clone(),
                kind: TemplateParameterKind::Value { ty },
            },
            &name,
        )
    }

    fn add_partial_spec_param(&mut self, subst: Id<Substitution>, param: TemplateParameter, name: &str) -> Id<TemplateParameter> {
        let param_id = self.template_parameters.alloc(param);
        let s = self.substitutions.get_mut(subst);
        match &mut s.kind {
            SubstitutionKind::PartialSpecialisation { own_params, .. } => {
                own_params.push(Some(name), EntityRef::TemplateParameter(param_id));
            }
            _ => panic!("add_partial_spec_param called on a non-partial-specialisation substitution"),
        }
        param_id
    }
}
