//! Dependency index: who depends on a class, and what the class offers.
//!
//! Like the registry, these are pure scans over the workspace. Absence of
//! a class is not an error here; queries on a missing name return empty
//! results and the caller decides what that means.

use brick_blocks::{ClassDef, ConstructorDef, MethodDef, NameMatcher, Workspace};
use brick_identity::BlockId;

/// Every reference site bound to `class_name`, in workspace traversal
/// order. The order is stable, nothing more; callers must not assume
/// alphabetical or creation order.
pub fn find_reference_sites(
    ws: &Workspace,
    class_name: &str,
    matcher: &dyn NameMatcher,
) -> Vec<BlockId> {
    ws.all_blocks(true)
        .filter(|block| {
            block.reference().is_some_and(|site| {
                site.class_name
                    .as_deref()
                    .is_some_and(|name| matcher.eq(name, class_name))
            })
        })
        .map(|block| block.id)
        .collect()
}

fn class_by_name<'ws>(
    ws: &'ws Workspace,
    class_name: &str,
    matcher: &dyn NameMatcher,
) -> Option<&'ws ClassDef> {
    ws.all_blocks(false)
        .find_map(|block| block.class_def().filter(|def| matcher.eq(&def.name, class_name)))
}

/// Attribute names of the class, or empty if the class does not exist.
pub fn find_attributes(ws: &Workspace, class_name: &str, matcher: &dyn NameMatcher) -> Vec<String> {
    class_by_name(ws, class_name, matcher)
        .map(|def| def.attributes.clone())
        .unwrap_or_default()
}

/// Method descriptors of the class, or empty if the class does not exist.
pub fn find_methods(ws: &Workspace, class_name: &str, matcher: &dyn NameMatcher) -> Vec<MethodDef> {
    class_by_name(ws, class_name, matcher)
        .map(|def| def.methods.clone())
        .unwrap_or_default()
}

/// The class's constructor signature, if the class exists and declares one.
pub fn find_constructor(
    ws: &Workspace,
    class_name: &str,
    matcher: &dyn NameMatcher,
) -> Option<ConstructorDef> {
    class_by_name(ws, class_name, matcher).and_then(|def| def.constructor.clone())
}

/// An owned copy of one class's member surface, taken at the start of a
/// cascade. Dependent sites are then mutated against this snapshot, so no
/// query borrow is held across a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSnapshot {
    pub attributes: Vec<String>,
    pub methods: Vec<MethodDef>,
    pub constructor: Option<ConstructorDef>,
}

impl MemberSnapshot {
    /// `None` when the class does not currently resolve - the dangling
    /// case, which callers recover from rather than report.
    pub fn fetch(ws: &Workspace, class_name: &str, matcher: &dyn NameMatcher) -> Option<Self> {
        let def = class_by_name(ws, class_name, matcher)?;
        Some(Self {
            attributes: def.attributes.clone(),
            methods: def.methods.clone(),
            constructor: def.constructor.clone(),
        })
    }

    pub fn method(&self, name: &str, matcher: &dyn NameMatcher) -> Option<&MethodDef> {
        self.methods.iter().find(|m| matcher.eq(&m.name, name))
    }

    pub fn has_attribute(&self, name: &str, matcher: &dyn NameMatcher) -> bool {
        self.attributes.iter().any(|a| matcher.eq(a, name))
    }
}
