//! Document lifecycle.
//!
//! ```text
//!          write            reset_state
//!  Clean ────────→ Dirty ───────────────→ Clean
//!                    │ apply_changes
//!                    ↓
//!                 Applied ──reparse──→ Clean (generation + 1)
//! ```
//!
//! A document whose text fails to parse is `Failed`: reads report missing,
//! writes and apply fail with [`DslError::Parse`]. `reparse` is the way out.

use crate::base::{PropertyPath, ScopePath};
use crate::dsl::ElementTree;
use crate::edit::{ApplyEngine, ApplyReport, OperationLog, PendingOp};
use crate::error::{DslError, ParseError};
use crate::model::{
    AndroidModel, BlockHandle, PluginsModel, PropertyHandle, PropertyValue, Schema, plugins,
    resolve,
};
use crate::options::DocumentOptions;
use crate::parser::{self, render};
use smol_str::SmolStr;
use tracing::debug;
use uuid::Uuid;

/// Where a document is in its edit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentState {
    /// No pending ops; the tree reflects the last parse.
    Clean,
    /// Pending ops are buffered.
    Dirty,
    /// Edits were applied; handles still belong to the old generation.
    Applied,
    /// The last parse failed.
    Failed,
}

#[derive(Debug, Clone)]
enum Parsed {
    Tree(ElementTree),
    Failed(ParseError),
}

/// A build script with its element tree and pending edits
#[derive(Debug, Clone)]
pub struct Document {
    id: Uuid,
    generation: u64,
    options: DocumentOptions,
    schema: Schema,
    /// The persisted text the next reparse reads.
    text: String,
    parsed: Parsed,
    /// State to return to once the log is empty.
    settled: DocumentState,
    log: OperationLog,
}

impl Document {
    /// Parse `text` with default options. A fatal syntax error yields a
    /// `Failed` document rather than an error.
    pub fn parse(text: impl Into<String>) -> Self {
        Self::parse_with_options(text, DocumentOptions::default())
    }

    pub fn parse_with_options(text: impl Into<String>, options: DocumentOptions) -> Self {
        let text = text.into();
        let parsed = parse_text(&text);
        let settled = settled_state(&parsed);
        Self {
            id: Uuid::new_v4(),
            generation: 0,
            options,
            schema: Schema::default(),
            text,
            parsed,
            settled,
            log: OperationLog::new(),
        }
    }

    /// Parse `text`, failing on a fatal syntax error.
    pub fn try_parse(text: impl Into<String>) -> Result<Self, ParseError> {
        let doc = Self::parse(text);
        match doc.parsed {
            Parsed::Failed(error) => Err(error),
            Parsed::Tree(_) => Ok(doc),
        }
    }

    /// Replace the property registry.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> DocumentState {
        if self.log.is_empty() {
            self.settled
        } else {
            DocumentState::Dirty
        }
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The persisted text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text of the current tree; empty for a failed document.
    pub fn render(&self) -> String {
        match &self.parsed {
            Parsed::Tree(tree) => render(tree.root()),
            Parsed::Failed(_) => String::new(),
        }
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        match &self.parsed {
            Parsed::Failed(error) => Some(error),
            Parsed::Tree(_) => None,
        }
    }

    pub fn element_tree(&self) -> Option<&ElementTree> {
        match &self.parsed {
            Parsed::Tree(tree) => Some(tree),
            Parsed::Failed(_) => None,
        }
    }

    pub fn pending_ops(&self) -> &[PendingOp] {
        self.log.ops()
    }

    // ------------------------------------------------------------------------
    // Handles
    // ------------------------------------------------------------------------

    /// The document root as a block.
    pub fn root(&self) -> BlockHandle {
        BlockHandle::new(self.id, self.generation, ScopePath::root())
    }

    pub fn block(&self, scope: impl Into<ScopePath>) -> BlockHandle {
        BlockHandle::new(self.id, self.generation, scope.into())
    }

    /// Handle for a dotted property path (`"android.buildToolsVersion"`).
    pub fn property(&self, dotted: &str) -> Option<PropertyHandle> {
        let path = PropertyPath::parse(dotted)?;
        Some(self.property_at(path))
    }

    pub fn property_at(&self, path: PropertyPath) -> PropertyHandle {
        PropertyHandle::new(self.id, self.generation, path)
    }

    pub fn android(&self) -> AndroidModel {
        AndroidModel::new(self.block("android"))
    }

    pub fn plugins(&self) -> PluginsModel {
        PluginsModel::new(self.root())
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Write the pending ops into the tree and the persisted text.
    ///
    /// The element tree is rebuilt from the edited syntax tree; the
    /// generation is unchanged until [`reparse`](Self::reparse).
    pub fn apply_changes(&mut self) -> Result<ApplyReport, DslError> {
        let tree = self.tree()?;
        let ops = self.log.ops();
        let (root, report) = ApplyEngine::new(tree, &self.schema, &self.options).run(ops);
        self.text = render(&root);
        self.parsed = Parsed::Tree(ElementTree::build(root));
        self.log.clear();
        self.settled = DocumentState::Applied;
        debug!(
            "[DOCUMENT] applied {} ops to generation {}",
            report.applied_count, self.generation
        );
        Ok(report)
    }

    /// [`apply_changes`](Self::apply_changes) followed by
    /// [`reparse`](Self::reparse).
    pub fn apply_changes_and_reparse(&mut self) -> Result<ApplyReport, DslError> {
        let report = self.apply_changes()?;
        self.reparse()?;
        Ok(report)
    }

    /// Discard every pending op. The source is never touched before apply.
    pub fn reset_state(&mut self) {
        if !self.log.is_empty() {
            debug!("[DOCUMENT] discarding {} pending ops", self.log.len());
        }
        self.log.clear();
    }

    /// Parse the persisted text again. Every handle issued so far becomes
    /// stale.
    pub fn reparse(&mut self) -> Result<(), DslError> {
        self.generation += 1;
        self.log.clear();
        self.parsed = parse_text(&self.text);
        self.settled = settled_state(&self.parsed);
        debug!("[DOCUMENT] reparsed as generation {}", self.generation);
        match &self.parsed {
            Parsed::Tree(_) => Ok(()),
            Parsed::Failed(error) => Err(error.clone().into()),
        }
    }

    /// Replace the persisted text, as when the file is rewritten outside
    /// the model. Takes effect on the next [`reparse`](Self::reparse).
    pub fn set_persisted_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    // ------------------------------------------------------------------------
    // Used by handles
    // ------------------------------------------------------------------------

    pub(crate) fn check_handle(&self, id: Uuid, generation: u64) -> Result<(), DslError> {
        if id == self.id && generation == self.generation {
            Ok(())
        } else {
            Err(DslError::StaleHandle {
                expected: generation,
                found: self.generation,
            })
        }
    }

    pub(crate) fn push_op(&mut self, op: PendingOp) -> Result<(), DslError> {
        self.tree()?;
        self.log.push(op);
        Ok(())
    }

    pub(crate) fn resolve_property(&self, path: &PropertyPath) -> PropertyValue {
        let Parsed::Tree(tree) = &self.parsed else {
            return PropertyValue::Missing;
        };
        let ops = self.log.ops();
        let kind = resolve::kind_for(&self.schema, tree, ops, path);
        resolve::resolve_pending(tree, ops, path, kind)
    }

    pub(crate) fn block_exists(&self, scope: &ScopePath) -> bool {
        match &self.parsed {
            Parsed::Tree(tree) => resolve::block_exists(&self.schema, tree, self.log.ops(), scope),
            Parsed::Failed(_) => false,
        }
    }

    pub(crate) fn block_in_source(&self, scope: &ScopePath) -> bool {
        match &self.parsed {
            Parsed::Tree(tree) => resolve::scope_in_source(&self.schema, tree, scope),
            Parsed::Failed(_) => false,
        }
    }

    pub(crate) fn child_blocks(&self, scope: &ScopePath) -> Vec<SmolStr> {
        match &self.parsed {
            Parsed::Tree(tree) => resolve::child_blocks(&self.schema, tree, self.log.ops(), scope),
            Parsed::Failed(_) => Vec::new(),
        }
    }

    pub(crate) fn applied_plugins(&self) -> Vec<SmolStr> {
        match &self.parsed {
            Parsed::Tree(tree) => plugins::applied_plugins(tree, self.log.ops()),
            Parsed::Failed(_) => Vec::new(),
        }
    }

    fn tree(&self) -> Result<&ElementTree, DslError> {
        match &self.parsed {
            Parsed::Tree(tree) => Ok(tree),
            Parsed::Failed(error) => Err(error.clone().into()),
        }
    }
}

fn parse_text(text: &str) -> Parsed {
    let parse = parser::parse(text);
    if let Some(error) = parse.fatal_error() {
        let error = ParseError::from_syntax_error(error, text);
        debug!("[DOCUMENT] parse failed: {error}");
        return Parsed::Failed(error);
    }
    if !parse.errors.is_empty() {
        debug!("[DOCUMENT] {} recoverable syntax errors", parse.errors.len());
    }
    Parsed::Tree(ElementTree::build(parse.syntax()))
}

fn settled_state(parsed: &Parsed) -> DocumentState {
    match parsed {
        Parsed::Tree(_) => DocumentState::Clean,
        Parsed::Failed(_) => DocumentState::Failed,
    }
}
