//! The workspace: arena of blocks, variables, colour wheel, flyout flag.
//!
//! The workspace owns every definition and reference object (arena style);
//! the engine's registry is a pure query over this collection and keeps no
//! cache to invalidate. All operations here are synchronous; a rename
//! cascade reads and writes through this struct with no interleaving.

use brick_identity::BlockId;

use crate::block::{Block, BlockBody};
use crate::class_def::ClassDef;
use crate::colour::ColourWheel;
use crate::reference::{ReferenceBlock, ReferenceKind};
use crate::variables::VariableStore;

#[derive(Debug, Default, Clone)]
pub struct Workspace {
    blocks: Vec<Block>,
    flyout: bool,
    pub variables: VariableStore,
    colours: ColourWheel,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// A flyout palette: a read-only preview workspace. Definitions shown
    /// here are not live and are exempt from name disambiguation.
    pub fn flyout() -> Self {
        Self {
            flyout: true,
            ..Self::default()
        }
    }

    pub fn is_flyout(&self) -> bool {
        self.flyout
    }

    // =========================================================================
    // Block creation and removal
    // =========================================================================

    fn push_block(&mut self, shadow: bool, body: BlockBody) -> BlockId {
        let id = BlockId::new(self.blocks.len() as u32);
        self.blocks.push(Block { id, shadow, body });
        id
    }

    /// Create a class-definition block. The hue tag comes off the colour
    /// wheel here and never changes afterwards.
    pub fn add_class_def(&mut self, name: impl Into<String>) -> BlockId {
        let hue = self.colours.next_hue();
        self.push_block(false, BlockBody::ClassDef(ClassDef::new(name, hue)))
    }

    pub fn add_reference(&mut self, kind: ReferenceKind) -> BlockId {
        self.push_block(false, BlockBody::Reference(ReferenceBlock::new(kind)))
    }

    pub fn add_shadow_reference(&mut self, kind: ReferenceKind) -> BlockId {
        self.push_block(true, BlockBody::Reference(ReferenceBlock::new(kind)))
    }

    /// Tombstone a block, detaching its connections first. Dependent sites
    /// are not deleted; they notice the dangling name on their next
    /// refresh. Returns false if the id was unknown or already deleted.
    pub fn remove_block(&mut self, id: BlockId) -> bool {
        let Some(block) = self.blocks.get(id.index() as usize) else {
            return false;
        };
        if block.is_deleted() {
            return false;
        }
        if block.reference().is_some() {
            self.disconnect_output(id);
            self.disconnect_prev(id);
            self.disconnect_next(id);
            let sockets = self
                .reference(id)
                .map(|site| site.shape.args.len())
                .unwrap_or(0);
            for i in 0..sockets {
                self.disconnect_arg(id, i);
            }
        }
        tracing::debug!(?id, "tombstoning block");
        self.blocks[id.index() as usize].body = BlockBody::Deleted;
        true
    }

    // =========================================================================
    // Lookup and traversal
    // =========================================================================

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks
            .get(id.index() as usize)
            .filter(|b| !b.is_deleted())
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks
            .get_mut(id.index() as usize)
            .filter(|b| !b.is_deleted())
    }

    pub fn class_def(&self, id: BlockId) -> Option<&ClassDef> {
        self.block(id).and_then(Block::class_def)
    }

    pub fn class_def_mut(&mut self, id: BlockId) -> Option<&mut ClassDef> {
        self.block_mut(id).and_then(Block::class_def_mut)
    }

    pub fn reference(&self, id: BlockId) -> Option<&ReferenceBlock> {
        self.block(id).and_then(Block::reference)
    }

    pub fn reference_mut(&mut self, id: BlockId) -> Option<&mut ReferenceBlock> {
        self.block_mut(id).and_then(Block::reference_mut)
    }

    /// Every live block in traversal (arena) order. The order is stable
    /// across renames and deletions; callers must not assume anything more
    /// than that.
    pub fn all_blocks(&self, include_shadow: bool) -> impl Iterator<Item = &Block> {
        self.blocks
            .iter()
            .filter(move |b| !b.is_deleted() && (include_shadow || !b.shadow))
    }

    pub fn all_block_ids(&self, include_shadow: bool) -> Vec<BlockId> {
        self.all_blocks(include_shadow).map(|b| b.id).collect()
    }

    // =========================================================================
    // Connections
    //
    // Every disconnect clears both directions in the same call, so no
    // cascade can observe a half-broken connection.
    // =========================================================================

    /// Plug `child`'s output into `parent`'s value socket `index`.
    /// Whatever either end was connected to beforehand is detached first.
    pub fn connect_value(&mut self, parent: BlockId, index: usize, child: BlockId) -> bool {
        let parent_ok = self
            .reference(parent)
            .is_some_and(|site| index < site.shape.args.len());
        let child_ok = self.reference(child).is_some_and(|site| site.shape.has_output);
        if !parent_ok || !child_ok {
            return false;
        }
        self.disconnect_arg(parent, index);
        self.disconnect_output(child);
        self.reference_mut(parent)
            .expect("parent checked above")
            .shape
            .args[index]
            .connected = Some(child);
        self.reference_mut(child)
            .expect("child checked above")
            .shape
            .output = Some(parent);
        true
    }

    /// Stack `below` under `above` (statement connection).
    pub fn connect_statement(&mut self, above: BlockId, below: BlockId) -> bool {
        let above_ok = self.reference(above).is_some_and(|s| s.shape.has_statement);
        let below_ok = self.reference(below).is_some_and(|s| s.shape.has_statement);
        if !above_ok || !below_ok {
            return false;
        }
        self.disconnect_next(above);
        self.disconnect_prev(below);
        self.reference_mut(above).expect("checked above").shape.next = Some(below);
        self.reference_mut(below).expect("checked above").shape.prev = Some(above);
        true
    }

    pub fn disconnect_output(&mut self, site: BlockId) {
        let Some(parent) = self
            .reference_mut(site)
            .and_then(|s| s.shape.output.take())
        else {
            return;
        };
        tracing::trace!(?site, ?parent, "disconnecting output");
        if let Some(parent_site) = self.reference_mut(parent) {
            for socket in &mut parent_site.shape.args {
                if socket.connected == Some(site) {
                    socket.connected = None;
                }
            }
        }
    }

    pub fn disconnect_prev(&mut self, site: BlockId) {
        let Some(peer) = self.reference_mut(site).and_then(|s| s.shape.prev.take()) else {
            return;
        };
        tracing::trace!(?site, ?peer, "disconnecting previous");
        if let Some(peer_site) = self.reference_mut(peer)
            && peer_site.shape.next == Some(site)
        {
            peer_site.shape.next = None;
        }
    }

    pub fn disconnect_next(&mut self, site: BlockId) {
        let Some(peer) = self.reference_mut(site).and_then(|s| s.shape.next.take()) else {
            return;
        };
        tracing::trace!(?site, ?peer, "disconnecting next");
        if let Some(peer_site) = self.reference_mut(peer)
            && peer_site.shape.prev == Some(site)
        {
            peer_site.shape.prev = None;
        }
    }

    pub fn disconnect_arg(&mut self, site: BlockId, index: usize) {
        let Some(child) = self
            .reference_mut(site)
            .and_then(|s| s.shape.args.get_mut(index))
            .and_then(|socket| socket.connected.take())
        else {
            return;
        };
        tracing::trace!(?site, index, ?child, "disconnecting value socket");
        if let Some(child_site) = self.reference_mut(child)
            && child_site.shape.output == Some(site)
        {
            child_site.shape.output = None;
        }
    }

    // =========================================================================
    // Shape flips
    // =========================================================================

    /// Make the site expression-valued: output capability, no previous or
    /// next. Existing statement connections are detached, in both
    /// directions, before the capability changes.
    pub fn set_expression_shape(&mut self, site: BlockId) {
        self.disconnect_prev(site);
        self.disconnect_next(site);
        if let Some(s) = self.reference_mut(site) {
            s.shape.has_statement = false;
            s.shape.has_output = true;
        }
    }

    /// Make the site statement-valued: previous/next capability, no
    /// output. An existing output connection is detached, in both
    /// directions, before the capability changes.
    pub fn set_statement_shape(&mut self, site: BlockId) {
        self.disconnect_output(site);
        if let Some(s) = self.reference_mut(site) {
            s.shape.has_output = false;
            s.shape.has_statement = true;
        }
    }
}
