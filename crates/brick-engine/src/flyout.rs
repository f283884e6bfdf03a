//! Flyout population: the ordered template list for the creation palette.

use brick_blocks::Workspace;

use crate::registry::all_class_names;

/// One template node in the creation palette. Entries are templates for
/// the host to render, not live blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum FlyoutEntry {
    /// Declare a new class.
    ClassDefinition,
    /// Read a class-typed variable.
    InstanceGetter,
    /// Call a method or read an attribute on an instance.
    MemberAccess,
    /// Instantiate a class.
    ConstructorCall,
    /// A template pre-bound to one currently-declared user class.
    UserClass { class_name: String },
}

/// The system-defined constructs, followed by one entry per declared user
/// class in registry (traversal) order.
pub fn flyout_contents(ws: &Workspace) -> Vec<FlyoutEntry> {
    let mut entries = vec![
        FlyoutEntry::ClassDefinition,
        FlyoutEntry::InstanceGetter,
        FlyoutEntry::MemberAccess,
        FlyoutEntry::ConstructorCall,
    ];
    entries.extend(
        all_class_names(ws)
            .into_iter()
            .map(|class_name| FlyoutEntry::UserClass { class_name }),
    );
    entries
}
