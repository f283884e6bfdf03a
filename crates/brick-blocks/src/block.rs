//! The block arena entry: a tagged union over the node variants.
//!
//! Capability dispatch is by variant, not attribute probing: a block either
//! is a class definition, is a reference site, or is a tombstone. The
//! accessor pairs below are the `Definable`/`Referencing` capability
//! checks used throughout the engine.

use brick_identity::BlockId;

use crate::class_def::ClassDef;
use crate::reference::ReferenceBlock;

#[derive(Debug, Clone, PartialEq)]
pub enum BlockBody {
    ClassDef(ClassDef),
    Reference(ReferenceBlock),
    /// Deleted slot. Ids are never reused, so traversal order stays stable
    /// across deletions.
    Deleted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    /// Shadow blocks are placeholder children rendered by the host; they
    /// participate in rename walks but not in definition queries.
    pub shadow: bool,
    pub body: BlockBody,
}

impl Block {
    pub fn class_def(&self) -> Option<&ClassDef> {
        match &self.body {
            BlockBody::ClassDef(def) => Some(def),
            _ => None,
        }
    }

    pub fn class_def_mut(&mut self) -> Option<&mut ClassDef> {
        match &mut self.body {
            BlockBody::ClassDef(def) => Some(def),
            _ => None,
        }
    }

    pub fn reference(&self) -> Option<&ReferenceBlock> {
        match &self.body {
            BlockBody::Reference(site) => Some(site),
            _ => None,
        }
    }

    pub fn reference_mut(&mut self) -> Option<&mut ReferenceBlock> {
        match &mut self.body {
            BlockBody::Reference(site) => Some(site),
            _ => None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self.body, BlockBody::Deleted)
    }
}
