//! The scoped context-swap guard (§4.4, §5, §9 "Scoped context swap").
//!
//! Grounded directly in the original's `ast_converter::context_setter`
//! (`original_source/include/cm/cxx/clang/ast_converter.hpp`): a
//! constructor that stashes the converter's current code-model context and
//! front-end declaration context and installs new ones, paired with a
//! destructor that restores the old pair unconditionally, including when
//! unwinding out of a failed declaration, which is the "central
//! correctness lever" §5 calls out by name.

use super::{Converter, Frontend};
use crate::ids::EntityRef;

/// Borrows a [`Converter`] for the duration of one nested scope, swapping
/// in `new_context`/`new_decl_context` and restoring the previous pair on
/// drop. Never implements `Clone`/`Copy`: exactly one swap may be active
/// against a given converter borrow at a time; the same restriction the
/// original enforces by deleting `context_setter`'s copy and move
/// constructors.
pub struct ContextSwap<'c, 'f, F: Frontend> {
    conv: &'c mut Converter<'f, F>,
    old_context: EntityRef,
    old_decl_context: Option<F::DeclId>,
}

impl<'c, 'f, F: Frontend> ContextSwap<'c, 'f, F> {
    pub fn enter(
        conv: &'c mut Converter<'f, F>,
        new_context: EntityRef,
        new_decl_context: Option<F::DeclId>,
    ) -> Self {
        let old_context = conv.current_context;
        let old_decl_context = conv.current_decl_context;
        conv.current_context = new_context;
        conv.current_decl_context = new_decl_context;
        ContextSwap {
            conv,
            old_context,
            old_decl_context,
        }
    }

    pub fn converter(&mut self) -> &mut Converter<'f, F> {
        self.conv
    }
}

impl<'c, 'f, F: Frontend> Drop for ContextSwap<'c, 'f, F> {
    fn drop(&mut self) {
        self.conv.current_context = self.old_context;
        self.conv.current_decl_context = self.old_decl_context;
    }
}
