//! Reference sites: blocks that consume a class by name.

use brick_identity::BlockId;
use smallvec::SmallVec;

use crate::naming::NameMatcher;

/// What flavour of consumer this site is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Reads a class-typed variable; always expression-shaped.
    InstanceGetter,
    /// Calls a method or reads an attribute, selected from a dropdown.
    MemberAccess,
    /// Instantiates the class; expression-shaped, sockets follow the
    /// constructor signature.
    ConstructorCall,
}

/// Whether a dropdown entry names an attribute or a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Attribute,
    Method,
}

/// The site's currently selected member, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberBinding {
    Unset,
    Attribute(String),
    Method(String),
}

impl MemberBinding {
    pub fn name(&self) -> Option<&str> {
        match self {
            MemberBinding::Unset => None,
            MemberBinding::Attribute(name) | MemberBinding::Method(name) => Some(name),
        }
    }

    pub fn kind(&self) -> Option<MemberKind> {
        match self {
            MemberBinding::Unset => None,
            MemberBinding::Attribute(_) => Some(MemberKind::Attribute),
            MemberBinding::Method(_) => Some(MemberKind::Method),
        }
    }
}

/// Binding lifecycle of a reference site.
///
/// `Unbound` → `BoundUnresolved` when the site learns a class name;
/// `BoundUnresolved` → `BoundResolved` the first time the member list is
/// successfully fetched. Later refreshes re-enter the resolved state; a
/// dangling class drops the site back to `Unbound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Unbound,
    BoundUnresolved,
    BoundResolved,
}

/// One entry of a site's materialized member dropdown. `value` is the real
/// identifier; `label` is what the user sees (methods carry a `()` marker).
#[derive(Debug, Clone, PartialEq)]
pub struct MemberOption {
    pub label: String,
    pub value: String,
    pub kind: MemberKind,
}

/// A value-input socket on a call site, one per argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSocket {
    pub name: String,
    pub connected: Option<BlockId>,
}

/// The materialized connection shape of a site.
///
/// Expression form: `has_output` with no previous/next capability.
/// Statement form: the reverse. The `Option` peers record live
/// connections; a capability may be present while unconnected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SiteShape {
    pub has_output: bool,
    pub has_statement: bool,
    pub output: Option<BlockId>,
    pub prev: Option<BlockId>,
    pub next: Option<BlockId>,
    pub args: SmallVec<[ArgSocket; 4]>,
}

impl SiteShape {
    pub fn expression() -> Self {
        Self {
            has_output: true,
            ..Self::default()
        }
    }

    pub fn statement() -> Self {
        Self {
            has_statement: true,
            ..Self::default()
        }
    }
}

/// A block that refers to a class by name.
///
/// Sites point at definitions by name, never by id: a rename must visit
/// every site, and a deleted definition leaves the site dangling until its
/// next refresh notices and clears the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceBlock {
    pub kind: ReferenceKind,
    pub class_name: Option<String>,
    /// Last name the class was known under, recorded during renames for
    /// sites that are still rebinding.
    pub previous_class_name: Option<String>,
    pub member: MemberBinding,
    /// Set the first time the site successfully resolves a live class.
    /// Before that, binding is relaxed: a missing class is tolerated.
    pub finalized: bool,
    pub binding: BindingState,
    /// Member counts observed at the last refresh; `None` until the first
    /// refresh so it never short-circuits.
    pub last_counts: Option<(usize, usize)>,
    /// The materialized dropdown.
    pub options: Vec<MemberOption>,
    /// Bumped whenever `options` is rebuilt. Lets tests observe the
    /// refresh short-circuit.
    pub options_generation: u64,
    pub shape: SiteShape,
}

impl ReferenceBlock {
    pub fn new(kind: ReferenceKind) -> Self {
        let shape = match kind {
            // Getters and constructor calls produce a value.
            ReferenceKind::InstanceGetter | ReferenceKind::ConstructorCall => {
                SiteShape::expression()
            }
            // Member-access sites start as statements until a returning
            // member is selected.
            ReferenceKind::MemberAccess => SiteShape::statement(),
        };
        Self {
            kind,
            class_name: None,
            previous_class_name: None,
            member: MemberBinding::Unset,
            finalized: false,
            binding: BindingState::Unbound,
            last_counts: None,
            options: Vec::new(),
            options_generation: 0,
            shape,
        }
    }

    // =========================================================================
    // Capabilities consumed by the change propagator
    // =========================================================================

    /// Class-rename capability: rebind if this site points at `old`, and
    /// remember the old name. Unfinalized sites record the old name even
    /// when they don't match, so a relaxed rebind can still find the class
    /// under either name.
    pub fn rename_class(&mut self, old: &str, new: &str, matcher: &dyn NameMatcher) {
        if self
            .class_name
            .as_deref()
            .is_some_and(|name| matcher.eq(name, old))
        {
            self.class_name = Some(new.to_string());
            self.previous_class_name = Some(old.to_string());
        } else if !self.finalized {
            self.previous_class_name = Some(old.to_string());
        }
    }

    /// Method-rename capability: rebind the selected member if it is the
    /// renamed method.
    pub fn rename_procedure(&mut self, old: &str, new: &str, matcher: &dyn NameMatcher) {
        if let MemberBinding::Method(name) = &self.member
            && matcher.eq(name, old)
        {
            self.member = MemberBinding::Method(new.to_string());
        }
    }

    /// Record the name a class was previously known under.
    pub fn set_old_name(&mut self, old: &str) {
        self.previous_class_name = Some(old.to_string());
    }
}
