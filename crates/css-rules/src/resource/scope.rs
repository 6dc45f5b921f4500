//! Per-block buffering of resource references.
//!
//! Only one block is collected at a time: the tracked kinds do not nest in
//! the supported grammar, so opening a block replaces whatever was open.

use super::reference::ResourceReference;
use css_events::BlockKind;

/// Block kinds whose boundaries scope reference collection.
pub const TRACKED_BLOCKS: &[BlockKind] = &[
    BlockKind::Rule,
    BlockKind::FontFace,
    BlockKind::Page,
    BlockKind::PageMargin,
    BlockKind::Keyframes,
];

/// Returns true if the block kind scopes reference collection.
pub fn is_tracked(kind: BlockKind) -> bool {
    TRACKED_BLOCKS.contains(&kind)
}

/// The references collected for one block instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMatchSet {
    kind: BlockKind,
    references: Vec<ResourceReference>,
}

impl PendingMatchSet {
    fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            references: Vec::new(),
        }
    }

    /// The kind of block that opened the set.
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// References in the order they were found.
    pub fn references(&self) -> &[ResourceReference] {
        &self.references
    }

    /// Number of references.
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Returns true if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// What the buffer is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeState {
    /// No block open; references are ignored.
    Idle,
    /// Collecting for a block of this kind.
    Collecting(BlockKind),
}

/// Single-slot buffer of pending references.
#[derive(Debug, Default)]
pub struct ScopeBuffer {
    open: Option<PendingMatchSet>,
}

impl ScopeBuffer {
    /// An idle buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> ScopeState {
        match &self.open {
            Some(set) => ScopeState::Collecting(set.kind),
            None => ScopeState::Idle,
        }
    }

    /// Starts collecting for a new block. Returns the set that was open
    /// before, which is discarded without evaluation.
    pub fn open(&mut self, kind: BlockKind) -> Option<PendingMatchSet> {
        self.open.replace(PendingMatchSet::new(kind))
    }

    /// Appends references to the open set. Returns false, dropping the
    /// references, when no set is open.
    pub fn collect(&mut self, references: impl IntoIterator<Item = ResourceReference>) -> bool {
        match &mut self.open {
            Some(set) => {
                set.references.extend(references);
                true
            }
            None => false,
        }
    }

    /// Takes the open set if it was opened by a block of `kind`. Any other
    /// end event leaves the buffer untouched.
    pub fn close(&mut self, kind: BlockKind) -> Option<PendingMatchSet> {
        if self.open.as_ref().is_some_and(|set| set.kind == kind) {
            self.open.take()
        } else {
            None
        }
    }
}
