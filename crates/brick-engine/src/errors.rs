//! Engine API errors (E3xxx).
//!
//! Only programmer misuse of the engine surface lands here. The recoverable
//! conditions of the domain (name collisions, dangling references,
//! structural mismatches) are resolved silently and never become errors.

use brick_identity::BlockId;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum EngineError {
    #[error("unknown block {id:?}")]
    #[diagnostic(code(E3001))]
    UnknownBlock { id: BlockId },

    #[error("block {id:?} is not a class definition")]
    #[diagnostic(code(E3002))]
    NotAClassDefinition { id: BlockId },

    #[error("block {id:?} is not a reference site")]
    #[diagnostic(code(E3003))]
    NotAReferenceSite { id: BlockId },

    #[error("class '{class}' has no method at index {index}")]
    #[diagnostic(code(E3004))]
    NoSuchMethod { class: String, index: usize },
}
