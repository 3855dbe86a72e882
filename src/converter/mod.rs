//! The AST-to-model converter (components H/I, §4.4–§4.9).

pub mod config;
pub mod context_swap;
pub mod decls;
pub mod frontend;
pub mod types;

pub use config::{BuiltinPolicy, ConverterConfig};
pub use context_swap::ContextSwap;
pub use frontend::{DeclKind, Frontend};

#[cfg(test)]
pub use frontend::fake as testing;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::context::CodeModel;
use crate::error::{ConversionError, Diagnostic};
use crate::ids::{EntityRef, Id};
use crate::record::Record;
use crate::template::{Substitution, Template, TemplateParameter};
use crate::types::Typedef;

/// Walks a front-end AST and materialises a [`CodeModel`] (§4.4).
///
/// Holds the three things the original's `ast_converter` keeps as
/// members: a reference to the model being built, the current
/// code-model/front-end context pair (moved in lock-step by
/// [`ContextSwap`]), and the canonical-declaration map.
pub struct Converter<'f, F: Frontend> {
    pub model: CodeModel,
    frontend: &'f F,
    config: ConverterConfig,

    current_context: EntityRef,
    current_decl_context: Option<F::DeclId>,

    /// `front_end_canonical_decl → code_model_entity` (§4.4, §4.6).
    decls: FxHashMap<F::DeclId, EntityRef>,

    /// Canonical declarations of records already run through
    /// `fill_record_contents` by `convert_record`, distinguishes an
    /// idempotent re-visit of the same already-complete declaration
    /// (§4.6, a no-op) from a genuine second definition reported by the
    /// front-end under the same canonical declaration (a `Redefinition`
    /// diagnostic).
    filled_records: FxHashSet<F::DeclId>,

    /// Caches the single `Type` entity that stands for "the type of this
    /// record/typedef/template parameter/substitution", record/typedef/
    /// parameter types are identified by backing declaration rather than
    /// structurally (§4.2), so each one still needs exactly one `Id<Type>`
    /// to hand back on repeat reference.
    record_types: FxHashMap<Id<Record>, Id<crate::types::Type>>,
    typedef_types: FxHashMap<Id<Typedef>, Id<crate::types::Type>>,
    param_types: FxHashMap<Id<TemplateParameter>, Id<crate::types::Type>>,
    subst_types: FxHashMap<Id<Substitution>, Id<crate::types::Type>>,

    diagnostics: Vec<Diagnostic>,
}

impl<'f, F: Frontend> Converter<'f, F> {
    pub fn new(model: CodeModel, frontend: &'f F) -> Self {
        let current_context = EntityRef::Namespace(model.global_namespace());
        Converter {
            model,
            frontend,
            config: ConverterConfig::default(),
            current_context,
            current_decl_context: None,
            decls: FxHashMap::default(),
            filled_records: FxHashSet::default(),
            record_types: FxHashMap::default(),
            typedef_types: FxHashMap::default(),
            param_types: FxHashMap::default(),
            subst_types: FxHashMap::default(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_config(model: CodeModel, frontend: &'f F, config: ConverterConfig) -> Self {
        let mut conv = Converter::new(model, frontend);
        conv.config = config;
        conv
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        log::debug!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Entity already registered for `decl`'s canonical declaration, if
    /// any (§4.4 "detect revisits and patch forward declarations").
    pub(crate) fn existing_entity(&self, decl: F::DeclId) -> Option<EntityRef> {
        self.decls.get(&self.frontend.canonical_decl(decl)).copied()
    }

    pub(crate) fn register_entity(&mut self, decl: F::DeclId, entity: impl Into<EntityRef>) {
        self.decls.insert(self.frontend.canonical_decl(decl), entity.into());
    }

    /// Finds the record entity already registered for `decl`, or
    /// materialises a fresh forward declaration and registers it; the
    /// one record-creation path shared by `convert_type`'s record-type
    /// case (§4.5) and `convert_decl`'s `RecordDecl` case (§4.6), so a
    /// record seen first as a field type and later as its own
    /// declaration resolves to the same entity. Returns `None` only on a
    /// decl-map kind mismatch (an already-registered non-record entity
    /// under this canonical declaration).
    pub(crate) fn get_or_create_record(&mut self, decl: F::DeclId) -> Option<Id<Record>> {
        match self.existing_entity(decl) {
            Some(EntityRef::Record(r)) => Some(r),
            Some(_) => None,
            None => {
                let canon = self.frontend.canonical_decl(decl);
                let name = self.frontend.decl_name(canon);
                let kind = self.frontend.record_kind(canon);
                let rec = self
                    .model
                    .records
                    .alloc(Record::new_forward_decl(self.current_context, name, kind));
                self.register_entity(canon, rec);
                Some(rec)
            }
        }
    }

    /// Seeds the current context to the global namespace and dispatches
    /// over the translation unit's top-level declarations (§4.4
    /// `convert(ast_context)`).
    pub fn convert(&mut self) -> Result<(), ConversionError> {
        self.current_context = EntityRef::Namespace(self.model.global_namespace());
        self.current_decl_context = None;
        let top_level = self.frontend.top_level_decls();
        log::info!("converting {} top-level declarations", top_level.len());
        for decl in top_level {
            self.convert_decl(decl)?;
        }
        Ok(())
    }
}
