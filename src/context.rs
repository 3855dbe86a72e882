//! Context (component D) and the code model root (component C/D, §3, §4.1).
//!
//! Mirrors `TypeContext`/`TypeContextCollection`
//! (`generate/context.rs`, `generate/cs_context_collection.rs`): a context
//! owns a flat, insertion-ordered collection of children and a name
//! index, and the collection as a whole (`CodeModel` here,
//! `TypeContextCollection` there) is the thing that actually owns storage
//! and answers "does this declaration already have an entity" queries.

use rustc_hash::FxHashMap;

use crate::cv::QualifiedType;
use crate::function::{Function, Variable};
use crate::ids::{Arena, EntityRef, Id};
use crate::record::{Field, Record};
use crate::template::{Substitution, Template, TemplateParameter};
use crate::types::intern::{self, InternKeyInput, TypeInternTables};
use crate::types::{ArrayExtent, BuiltinKind, FunctionTypeSig, Type, TypeKind, Typedef};

/// The insertion-ordered child list and name index shared by every entity
/// kind that is also a context: [`Namespace`], [`Record`], [`Template`],
/// and a partial specialisation (§4.1: "Ordering of children is insertion
/// order ... Lookup returns the first child whose name equals the
/// query").
#[derive(Debug, Clone, Default)]
pub struct ContextData {
    pub children: Vec<EntityRef>,
    by_name: FxHashMap<String, Vec<EntityRef>>,
}

impl ContextData {
    pub fn push(&mut self, name: Option<&str>, child: EntityRef) {
        self.children.push(child);
        if let Some(name) = name {
            if !name.is_empty() {
                self.by_name.entry(name.to_string()).or_default().push(child);
            }
        }
    }

    /// First child whose name equals `name` (§4.1: name collisions within
    /// a context are a programming error for namespaces but allowed for
    /// overloaded functions; this always returns the first).
    pub fn lookup_named(&self, name: &str) -> Option<EntityRef> {
        self.by_name.get(name).and_then(|v| v.first().copied())
    }

    /// All children sharing `name`, for overload resolution call sites
    /// that need every candidate rather than just the first.
    pub fn lookup_named_overloads(&self, name: &str) -> &[EntityRef] {
        self.by_name.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn entities_of_kind<T: EntityKind>(&self) -> impl Iterator<Item = Id<T>> + '_ {
        self.children.iter().filter_map(|r| T::unwrap(*r))
    }
}

/// Maps an entity kind to its [`EntityRef`] variant, giving
/// `ContextData::entities_of_kind<T>()` a uniform way to filter the
/// child list regardless of kind; the Rust rendering of §4.1's
/// `entities_of_kind<Kind>()` template member.
pub trait EntityKind: Sized {
    fn wrap(id: Id<Self>) -> EntityRef;
    fn unwrap(r: EntityRef) -> Option<Id<Self>>;
}

macro_rules! impl_entity_kind {
    ($ty:ty, $variant:ident) => {
        impl EntityKind for $ty {
            fn wrap(id: Id<Self>) -> EntityRef {
                EntityRef::$variant(id)
            }
            fn unwrap(r: EntityRef) -> Option<Id<Self>> {
                match r {
                    EntityRef::$variant(id) => Some(id),
                    _ => None,
                }
            }
        }
    };
}

impl_entity_kind!(Namespace, Namespace);
impl_entity_kind!(Record, Record);
impl_entity_kind!(Field, Field);
impl_entity_kind!(Function, Function);
impl_entity_kind!(Variable, Variable);
impl_entity_kind!(Typedef, Typedef);
impl_entity_kind!(Template, Template);
impl_entity_kind!(TemplateParameter, TemplateParameter);
impl_entity_kind!(Substitution, Substitution);
impl_entity_kind!(Type, Type);

/// A namespace-like container (§3 "Context"). The code model owns exactly
/// one anonymous global namespace; every other namespace nests under it
/// or another namespace.
#[derive(Debug, Clone)]
pub struct Namespace {
    pub parent: EntityRef,
    pub name: String,
    pub ctx: ContextData,
}

impl Namespace {
    pub fn new(parent: EntityRef, name: String) -> Self {
        Namespace {
            parent,
            name,
            ctx: ContextData::default(),
        }
    }
}

/// The distinguished root context (§3 "Code model"): owns a single
/// anonymous global namespace, the type-interning tables, and every
/// entity arena. Every inter-entity reference outside of this struct is a
/// non-owning [`Id`]/[`EntityRef`]; dropping the model drops the whole
/// graph at once (§9 "cyclic ownership").
#[derive(Debug)]
pub struct CodeModel {
    pub namespaces: Arena<Namespace>,
    pub records: Arena<Record>,
    pub fields: Arena<Field>,
    pub functions: Arena<Function>,
    pub variables: Arena<Variable>,
    pub typedefs: Arena<Typedef>,
    pub templates: Arena<Template>,
    pub template_parameters: Arena<TemplateParameter>,
    pub substitutions: Arena<Substitution>,
    pub types: Arena<Type>,

    intern: TypeInternTables,

    /// Reverse use/user edges (§3 invariant 2, §4.1). `uses(x)` is
    /// maintained inline on each entity that has uses; `users` is the one
    /// centrally-maintained table, populated by [`CodeModel::add_use`]
    /// every time something registers a use edge.
    users: FxHashMap<EntityRef, Vec<EntityRef>>,

    global_namespace: Id<Namespace>,
}

impl CodeModel {
    pub fn new() -> Self {
        let mut namespaces = Arena::default();
        // The global namespace is its own parent's placeholder: it is the
        // one entity with no real parent (invariant 1's stated exception).
        // We still need *some* EntityRef to store; it points at itself,
        // and callers must not walk `parent()` past the global namespace.
        let global_id = namespaces.alloc(Namespace::new(EntityRef::Namespace(Id::root_placeholder()), String::new()));

        let mut model = CodeModel {
            namespaces,
            records: Arena::default(),
            fields: Arena::default(),
            functions: Arena::default(),
            variables: Arena::default(),
            typedefs: Arena::default(),
            templates: Arena::default(),
            template_parameters: Arena::default(),
            substitutions: Arena::default(),
            types: Arena::default(),
            intern: TypeInternTables::default(),
            users: FxHashMap::default(),
            global_namespace: global_id,
        };
        model.register_builtins();
        model
    }

    pub fn global_namespace(&self) -> Id<Namespace> {
        self.global_namespace
    }

    fn register_builtins(&mut self) {
        use BuiltinKind::*;
        let root = EntityRef::Namespace(self.global_namespace);
        for kind in [
            Void, Bool, SChar, UChar, Char8, Char16, Char32, WChar, Short, UShort, Int, UInt,
            Long, ULong, LongLong, ULongLong, Float, Double, LongDouble, NullptrT, Unknown,
        ] {
            let id = self.types.alloc(Type::new(root, TypeKind::Builtin(kind)));
            self.intern.register_builtin(kind, id);
        }
    }

    /// Retrieves the interned type entity for a builtin tag (§4.2:
    /// "Builtin types are created once during model initialisation and
    /// retrieved by enum tag").
    pub fn builtin(&self, kind: BuiltinKind) -> Id<Type> {
        self.intern
            .builtin(kind)
            .expect("every BuiltinKind is registered during CodeModel::new")
    }

    /// Registers a use edge: `user` refers to `used`. Maintains both
    /// sides together, the central correctness lever invariant 2 depends
    /// on (§3, §4.1).
    pub fn add_use(&mut self, user: impl Into<EntityRef>, used: impl Into<EntityRef>) {
        self.users.entry(used.into()).or_default().push(user.into());
    }

    pub fn users_of(&self, used: impl Into<EntityRef>) -> &[EntityRef] {
        self.users.get(&used.into()).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Pushes `child` into whichever context `parent` denotes (§4.1).
    /// Every context-owned entity funnels through here so a context's
    /// child list and name index stay in sync regardless of what kind of
    /// thing is being added or where in the model it's created from.
    pub fn push_child(&mut self, parent: EntityRef, name: Option<&str>, child: EntityRef) {
        match parent {
            EntityRef::Namespace(id) => self.namespaces.get_mut(id).ctx.push(name, child),
            EntityRef::Record(id) => self.records.get_mut(id).ctx.push(name, child),
            EntityRef::Template(id) => self.templates.get_mut(id).ctx.push(name, child),
            _ => debug_assert!(false, "context does not accept children"),
        }
    }

    // ---- structural type interning (§4.2) ----

    pub fn get_or_create_pointer(&mut self, pointee: QualifiedType) -> Id<Type> {
        let parent = EntityRef::Type(pointee.ty);
        intern::get_or_create(&mut self.intern, &mut self.types, parent, InternKeyInput::Pointer(pointee))
    }

    pub fn get_or_create_lvalue_reference(&mut self, referent: QualifiedType) -> Id<Type> {
        let parent = EntityRef::Type(referent.ty);
        intern::get_or_create(
            &mut self.intern,
            &mut self.types,
            parent,
            InternKeyInput::LValueReference(referent),
        )
    }

    pub fn get_or_create_rvalue_reference(&mut self, referent: QualifiedType) -> Id<Type> {
        let parent = EntityRef::Type(referent.ty);
        intern::get_or_create(
            &mut self.intern,
            &mut self.types,
            parent,
            InternKeyInput::RValueReference(referent),
        )
    }

    pub fn get_or_create_array(&mut self, element: QualifiedType, extent: ArrayExtent) -> Id<Type> {
        let parent = EntityRef::Type(element.ty);
        intern::get_or_create(
            &mut self.intern,
            &mut self.types,
            parent,
            InternKeyInput::Array { element, extent },
        )
    }

    pub fn get_or_create_function_type(&mut self, sig: FunctionTypeSig) -> Id<Type> {
        let parent = EntityRef::Type(sig.return_type.ty);
        intern::get_or_create(&mut self.intern, &mut self.types, parent, InternKeyInput::Function(sig))
    }
}

impl Default for CodeModel {
    fn default() -> Self {
        Self::new()
    }
}
