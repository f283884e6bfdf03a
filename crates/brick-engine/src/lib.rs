//! Brick engine: name resolution and dependency propagation for
//! user-defined classes in a block workspace.
//!
//! The engine is stateless: every query is a fresh scan over the
//! workspace's definition collection, and every mutation runs as one
//! synchronous cascade inside the caller's change notification. Undo
//! boundaries belong to the caller.

pub mod errors;
pub mod flyout;
pub mod index;
pub mod legal_name;
pub mod propagate;
pub mod registry;
pub mod tracker;

pub use errors::EngineError;
pub use flyout::{FlyoutEntry, flyout_contents};
pub use index::{MemberSnapshot, find_attributes, find_constructor, find_methods, find_reference_sites};
pub use legal_name::{find_legal_name, trim_name};
pub use propagate::{mutate_callers, rename_class, rename_method};
pub use registry::{Exclude, all_class_names, all_method_names, is_name_used, lookup_class, lookup_method};
pub use tracker::{bind_class, poll, update_site};
