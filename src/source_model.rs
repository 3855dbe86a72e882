//! Source model overlay (component J, §4.9, interface only).
//!
//! A parallel, optional tree of AST nodes recording, for each declaration
//! or type reference the converter visited, the lexical range and
//! nested-name-specifier spelling the front-end reported, with a
//! back-pointer to the code-model entity it annotates. Produced by a
//! separate pass that runs after [`crate::converter::Converter::convert`];
//! it adds no invariants of its own and the code model never reads it back
//! (§4.9, §5).

use rustc_hash::FxHashMap;

use crate::ids::EntityRef;
use crate::value::SourceLocation;

/// One recorded AST node.
#[derive(Debug, Clone)]
pub struct SourceNode {
    pub entity: EntityRef,
    pub range: (SourceLocation, SourceLocation),
    pub nested_name_spelling: String,
}

/// Insertion-ordered list of [`SourceNode`]s plus an index from code-model
/// entity back to every node that annotates it; a declaration visited
/// through several redeclarations gets one node per lexical site it was
/// seen at.
#[derive(Debug, Default)]
pub struct SourceModel {
    nodes: Vec<SourceNode>,
    by_entity: FxHashMap<EntityRef, Vec<usize>>,
}

impl SourceModel {
    pub fn new() -> Self {
        SourceModel::default()
    }

    pub fn record(&mut self, entity: EntityRef, range: (SourceLocation, SourceLocation), nested_name_spelling: String) {
        let index = self.nodes.len();
        self.nodes.push(SourceNode {
            entity,
            range,
            nested_name_spelling,
        });
        self.by_entity.entry(entity).or_default().push(index);
    }

    pub fn nodes_for(&self, entity: EntityRef) -> impl Iterator<Item = &SourceNode> {
        self.by_entity.get(&entity).into_iter().flatten().map(move |&i| &self.nodes[i])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
