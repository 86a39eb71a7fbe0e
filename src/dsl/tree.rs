//! The Dsl Element Tree: elements of one parse, indexed by logical scope.

use super::builder::TreeBuilder;
use super::element::{BlockElement, DslElement, ElementId, PropertyElement};
use crate::base::ScopePath;
use crate::parser::SyntaxNode;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::debug;

/// Typed overlay of one syntax tree.
///
/// Elements are stored in document order. Dotted statements are indexed
/// under the scope their path reaches, so every lookup is by logical scope
/// no matter how the source spells it.
#[derive(Debug, Clone)]
pub struct ElementTree {
    root: SyntaxNode,
    elements: Vec<DslElement>,
    /// scope → property name → occurrences in document order
    properties: FxHashMap<ScopePath, IndexMap<SmolStr, Vec<ElementId>>>,
    /// scope → textual blocks opening exactly that scope
    blocks: FxHashMap<ScopePath, Vec<ElementId>>,
    /// scope → logical child block names in first-appearance order
    children: FxHashMap<ScopePath, Vec<SmolStr>>,
    unresolved: Vec<ElementId>,
}

impl ElementTree {
    /// Classify every statement below `root`.
    pub fn build(root: SyntaxNode) -> Self {
        let elements = TreeBuilder::new().build(&root);
        let mut tree = Self {
            root,
            elements: Vec::new(),
            properties: FxHashMap::default(),
            blocks: FxHashMap::default(),
            children: FxHashMap::default(),
            unresolved: Vec::new(),
        };
        for (index, element) in elements.iter().enumerate() {
            tree.index_element(ElementId(index as u32), element);
        }
        tree.elements = elements;
        debug!(
            "[ELEMENT_TREE] built {} elements, {} scopes, {} unresolved",
            tree.elements.len(),
            tree.children.len() + 1,
            tree.unresolved.len()
        );
        tree
    }

    fn index_element(&mut self, id: ElementId, element: &DslElement) {
        match element {
            DslElement::Block(block) => {
                self.register_scope(&block.scope);
                self.blocks.entry(block.scope.clone()).or_default().push(id);
            }
            DslElement::Property(property) => {
                self.register_scope(&property.scope);
                self.properties
                    .entry(property.scope.clone())
                    .or_default()
                    .entry(property.name.clone())
                    .or_default()
                    .push(id);
            }
            DslElement::Unresolved(_) => self.unresolved.push(id),
        }
    }

    /// Record every segment of `scope` as a logical child of its prefix.
    fn register_scope(&mut self, scope: &ScopePath) {
        let segments = scope.segments();
        for depth in 0..segments.len() {
            let parent = ScopePath::new(segments[..depth].iter().cloned());
            let names = self.children.entry(parent).or_default();
            if !names.contains(&segments[depth]) {
                names.push(segments[depth].clone());
            }
        }
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&DslElement> {
        self.elements.get(id.index())
    }

    pub fn property(&self, id: ElementId) -> Option<&PropertyElement> {
        self.get(id).and_then(DslElement::as_property)
    }

    pub fn block(&self, id: ElementId) -> Option<&BlockElement> {
        self.get(id).and_then(DslElement::as_block)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &DslElement)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i as u32), e))
    }

    /// Every statement targeting `name` in `scope`, in document order.
    pub fn occurrences(&self, scope: &ScopePath, name: &str) -> &[ElementId] {
        self.properties
            .get(scope)
            .and_then(|names| names.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Names of the properties written in `scope`, in first-appearance order.
    pub fn property_names(&self, scope: &ScopePath) -> impl Iterator<Item = &SmolStr> + '_ {
        self.properties
            .get(scope)
            .into_iter()
            .flat_map(|names| names.keys())
    }

    /// Textual blocks that open exactly `scope`, in document order.
    pub fn blocks_at(&self, scope: &ScopePath) -> &[ElementId] {
        self.blocks.get(scope).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Logical child blocks of `scope`, however they are spelled.
    pub fn child_blocks(&self, scope: &ScopePath) -> &[SmolStr] {
        self.children.get(scope).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether anything in the document targets `scope` or a scope below it.
    pub fn has_scope(&self, scope: &ScopePath) -> bool {
        match (scope.parent(), scope.name()) {
            (Some(parent), Some(name)) => self.child_blocks(&parent).contains(name),
            _ => true,
        }
    }

    /// Statements that could not be classified.
    pub fn unresolved(&self) -> &[ElementId] {
        &self.unresolved
    }
}
