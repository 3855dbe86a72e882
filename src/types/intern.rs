//! Structural interning tables for composite types (§4.2).
//!
//! "The code model holds a set of tables, one per composite kind
//! (pointer, lvalue-ref, rvalue-ref, array, function-type) ... `get_or_create`
//! looks up the key; on miss, it creates a new type entity ... Builtin
//! types are created once during model initialisation and retrieved by
//! enum tag." Mirrors the way `TypeContextCollection`'s alias maps
//! deduplicate generated types, just keyed structurally
//! instead of by declaration index.

use rustc_hash::FxHashMap;

use crate::cv::QualifiedType;
use crate::ids::{EntityRef, Id};
use crate::types::{ArrayExtent, BuiltinKind, FunctionTypeSig, Type, TypeKind};

/// Structural keys for the interned composite kinds, used to deduplicate
/// without re-deriving `Eq`/`Hash` for all of [`TypeKind`] (record/typedef/
/// template-parameter/template-specialisation types are deliberately not
/// interned this way, see §4.2).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum InternKey {
    Pointer(QualifiedType),
    LValueReference(QualifiedType),
    RValueReference(QualifiedType),
    Array {
        element: QualifiedType,
        extent: ArrayExtent,
    },
    Function(FunctionTypeSig),
}

/// Owns the per-composite-kind tables plus the builtin retrieval table.
/// Embedded in [`crate::context::CodeModel`].
#[derive(Debug, Default)]
pub struct TypeInternTables {
    composites: FxHashMap<InternKey, Id<Type>>,
    builtins: FxHashMap<BuiltinKind, Id<Type>>,
}

impl TypeInternTables {
    /// Looks up an already-interned composite type. `None` on miss;
    /// callers pair this with [`TypeInternTables::insert_composite`]
    /// rather than getting a combined get-or-create here, since creating
    /// the `Type` entity requires the arena, which this table doesn't own.
    fn lookup(&self, key: &InternKey) -> Option<Id<Type>> {
        self.composites.get(key).copied()
    }

    fn insert(&mut self, key: InternKey, id: Id<Type>) {
        let prev = self.composites.insert(key, id);
        debug_assert!(prev.is_none(), "interning the same structural key twice");
    }

    pub fn builtin(&self, kind: BuiltinKind) -> Option<Id<Type>> {
        self.builtins.get(&kind).copied()
    }

    pub fn register_builtin(&mut self, kind: BuiltinKind, id: Id<Type>) {
        let prev = self.builtins.insert(kind, id);
        debug_assert!(prev.is_none(), "registering the same builtin tag twice");
    }
}

/// Helper threaded through `CodeModel::get_or_create_*` below; kept free
/// of `CodeModel` so the borrow on `types` and on the intern table can be
/// split independently by the caller.
pub(crate) fn get_or_create(
    tables: &mut TypeInternTables,
    arena: &mut crate::ids::Arena<Type>,
    parent: EntityRef,
    kind_key: InternKeyInput,
) -> Id<Type> {
    let (key, kind) = match kind_key {
        InternKeyInput::Pointer(qt) => (InternKey::Pointer(qt), TypeKind::Pointer(qt)),
        InternKeyInput::LValueReference(qt) => (
            InternKey::LValueReference(qt),
            TypeKind::LValueReference(qt),
        ),
        InternKeyInput::RValueReference(qt) => (
            InternKey::RValueReference(qt),
            TypeKind::RValueReference(qt),
        ),
        InternKeyInput::Array { element, extent } => (
            InternKey::Array { element, extent },
            TypeKind::Array { element, extent },
        ),
        InternKeyInput::Function(sig) => (InternKey::Function(sig.clone()), TypeKind::Function(sig)),
    };

    if let Some(existing) = tables.lookup(&key) {
        return existing;
    }

    let id = arena.alloc(Type::new(parent, kind));
    tables.insert(key, id);
    id
}

/// Input to [`get_or_create`]; kept separate from [`InternKey`] because
/// building the key and building the `Type` payload share almost all of
/// their data and we don't want to construct it twice.
pub(crate) enum InternKeyInput {
    Pointer(QualifiedType),
    LValueReference(QualifiedType),
    RValueReference(QualifiedType),
    Array {
        element: QualifiedType,
        extent: ArrayExtent,
    },
    Function(FunctionTypeSig),
}

// Interning is exercised end-to-end against `CodeModel` in
// `context.rs`'s tests (pointer/reference/array/function-type dedup) and
// in `converter/types.rs`'s "pointer interning" scenario test, since
// building a `Type` here requires a parent `EntityRef` that only
// `CodeModel` can hand out meaningfully.
