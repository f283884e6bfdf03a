//! Member signature tracker: keeps each reference site's dropdown and
//! connection shape consistent with the class it is bound to.
//!
//! A site moves `Unbound` → `BoundUnresolved` when it learns a class name,
//! and `BoundUnresolved` → `BoundResolved` on its first successful member
//! fetch. After that every relevant change re-runs the refresh below; a
//! class that stops resolving drops the site back to `Unbound` with an
//! empty dropdown, and the block itself is never deleted on the site's
//! behalf.

use std::cmp::Ordering;

use brick_blocks::{
    ArgSocket, BindingState, MemberBinding, MemberKind, MemberOption, NameMatcher, ReferenceBlock,
    ReferenceKind, Workspace,
};
use brick_identity::BlockId;

use crate::errors::EngineError;
use crate::index::MemberSnapshot;

fn require_site<'ws>(ws: &'ws Workspace, site: BlockId) -> Result<&'ws ReferenceBlock, EngineError> {
    ws.block(site)
        .ok_or(EngineError::UnknownBlock { id: site })?
        .reference()
        .ok_or(EngineError::NotAReferenceSite { id: site })
}

/// The site's variable acquired a type: record the class name and move out
/// of `Unbound`. Resolution happens on the next [`poll`] or cascade.
pub fn bind_class(
    ws: &mut Workspace,
    site: BlockId,
    class_name: impl Into<String>,
) -> Result<(), EngineError> {
    require_site(ws, site)?;
    let r = ws
        .reference_mut(site)
        .expect("site validated above");
    r.class_name = Some(class_name.into());
    if r.binding == BindingState::Unbound {
        r.binding = BindingState::BoundUnresolved;
    }
    Ok(())
}

/// Periodic re-evaluation. Before finalization the binding is relaxed: a
/// class that does not exist yet is tolerated and the site keeps waiting.
/// After finalization a vanished class is the dangling case and the site
/// is cleared. Returns whether the site currently resolves.
pub fn poll(ws: &mut Workspace, site: BlockId, matcher: &dyn NameMatcher) -> Result<bool, EngineError> {
    let (class_name, binding, finalized) = {
        let r = require_site(ws, site)?;
        (r.class_name.clone(), r.binding, r.finalized)
    };
    let Some(name) = class_name else {
        return Ok(false);
    };
    if binding == BindingState::Unbound {
        ws.reference_mut(site)
            .expect("site validated above")
            .binding = BindingState::BoundUnresolved;
    }
    match MemberSnapshot::fetch(ws, &name, matcher) {
        Some(snapshot) => {
            update_site(ws, site, Some(&snapshot), None, matcher)?;
            Ok(true)
        }
        None => {
            if finalized {
                update_site(ws, site, None, None, matcher)?;
            } else {
                tracing::trace!(?site, class = %name, "class not live yet; relaxed binding keeps waiting");
            }
            Ok(false)
        }
    }
}

/// The refresh: re-derive the site's dropdown and shape from `snapshot`.
///
/// `snapshot` is `None` when the bound class no longer resolves; `rename`
/// carries the `(old, new)` pair when a member rename triggered this
/// update. Pre-existing connections that a shape change would invalidate
/// are detached, in both directions, before the shape changes.
pub fn update_site(
    ws: &mut Workspace,
    site: BlockId,
    snapshot: Option<&MemberSnapshot>,
    rename: Option<(&str, &str)>,
    matcher: &dyn NameMatcher,
) -> Result<(), EngineError> {
    let (kind, member, last_counts) = {
        let r = require_site(ws, site)?;
        (r.kind, r.member.clone(), r.last_counts)
    };

    let Some(snapshot) = snapshot else {
        // Dangling: definition deleted, or renamed on a path this site
        // missed. Clear the selection and fall back to the unbound,
        // empty-dropdown display.
        tracing::debug!(?site, "bound class no longer resolves; clearing site");
        let r = ws.reference_mut(site).expect("site validated above");
        r.member = MemberBinding::Unset;
        r.options.clear();
        r.options_generation += 1;
        r.last_counts = None;
        r.binding = BindingState::Unbound;
        return Ok(());
    };

    match kind {
        ReferenceKind::InstanceGetter => {
            let r = ws.reference_mut(site).expect("site validated above");
            r.binding = BindingState::BoundResolved;
            r.finalized = true;
            ws.set_expression_shape(site);
            return Ok(());
        }
        ReferenceKind::ConstructorCall => {
            // Sockets follow the constructor signature; no member dropdown.
            let params = snapshot
                .constructor
                .as_ref()
                .map(|c| c.params.as_slice())
                .unwrap_or(&[]);
            let params = params.to_vec();
            reconcile_args(ws, site, &params);
            ws.set_expression_shape(site);
            let r = ws.reference_mut(site).expect("site validated above");
            r.binding = BindingState::BoundResolved;
            r.finalized = true;
            return Ok(());
        }
        ReferenceKind::MemberAccess => {}
    }

    let method_count = snapshot.methods.len();
    let attr_count = snapshot.attributes.len();

    // Skip the dropdown rebuild when neither count changed and no rename
    // happened (no flicker). Signature and shape reconciliation below
    // still runs: a return-type toggle or a parameter change leaves both
    // counts untouched.
    let skip_rebuild = last_counts == Some((method_count, attr_count)) && rename.is_none();

    let member = if skip_rebuild {
        tracing::trace!(?site, "member surface counts unchanged, keeping dropdown");
        member
    } else {
        // Translate the selection through the rename map.
        let mut member = member;
        if let Some((old, new)) = rename
            && let MemberBinding::Method(name) = &member
            && matcher.eq(name, old)
        {
            member = MemberBinding::Method(new.to_string());
        }

        // Re-derive the selection against the current member surface. A
        // name that vanished from attribute ∪ method clears the selection
        // rather than guessing a replacement; a name whose kind changed
        // follows the definition.
        let member = match member {
            MemberBinding::Unset => MemberBinding::Unset,
            MemberBinding::Attribute(name) | MemberBinding::Method(name) => {
                if snapshot.method(&name, matcher).is_some() {
                    MemberBinding::Method(name)
                } else if snapshot.has_attribute(&name, matcher) {
                    MemberBinding::Attribute(name)
                } else {
                    tracing::debug!(?site, member = %name, "selected member vanished; clearing selection");
                    MemberBinding::Unset
                }
            }
        };

        // Rebuild the dropdown: current selection first, then attributes
        // as bare names, then methods with the `()` marker. The underlying
        // value is always the real identifier.
        let mut options = Vec::with_capacity(1 + attr_count + method_count);
        match &member {
            MemberBinding::Attribute(name) => options.push(MemberOption {
                label: name.clone(),
                value: name.clone(),
                kind: MemberKind::Attribute,
            }),
            MemberBinding::Method(name) => options.push(MemberOption {
                label: format!("{name}()"),
                value: name.clone(),
                kind: MemberKind::Method,
            }),
            MemberBinding::Unset => {}
        }
        for attr in &snapshot.attributes {
            options.push(MemberOption {
                label: attr.clone(),
                value: attr.clone(),
                kind: MemberKind::Attribute,
            });
        }
        for method in &snapshot.methods {
            options.push(MemberOption {
                label: format!("{}()", method.name),
                value: method.name.clone(),
                kind: MemberKind::Method,
            });
        }

        let r = ws.reference_mut(site).expect("site validated above");
        r.member = member.clone();
        r.options = options;
        r.options_generation += 1;
        member
    };

    {
        let r = ws.reference_mut(site).expect("site validated above");
        r.last_counts = Some((method_count, attr_count));
        r.binding = BindingState::BoundResolved;
        r.finalized = true;
    }

    // Reconcile the materialized shape with the selected member.
    match &member {
        MemberBinding::Method(name) => {
            // On the rebuild path membership was just established; on the
            // skip path a definition swapped behind unchanged counts may
            // not resolve, and then there is nothing to reconcile against.
            if let Some(sig) = snapshot.method(name, matcher).cloned() {
                let params: Vec<String> = sig.params.to_vec();
                reconcile_args(ws, site, &params);
                if sig.has_return {
                    ws.set_expression_shape(site);
                } else {
                    ws.set_statement_shape(site);
                }
            }
        }
        MemberBinding::Attribute(_) => {
            // Attribute access takes no arguments and always yields a value.
            reconcile_args(ws, site, &[]);
            ws.set_expression_shape(site);
        }
        MemberBinding::Unset => {}
    }

    Ok(())
}

/// Add or remove trailing sockets one at a time until the counts match,
/// then rename mismatched slots in place. Sockets whose name already
/// matches keep whatever is connected to them.
fn reconcile_args(ws: &mut Workspace, site: BlockId, params: &[String]) {
    loop {
        let current = ws.reference(site).map(|s| s.shape.args.len()).unwrap_or(0);
        match current.cmp(&params.len()) {
            Ordering::Less => {
                let name = params[current].clone();
                if let Some(s) = ws.reference_mut(site) {
                    s.shape.args.push(ArgSocket {
                        name,
                        connected: None,
                    });
                }
            }
            Ordering::Greater => {
                ws.disconnect_arg(site, current - 1);
                if let Some(s) = ws.reference_mut(site) {
                    s.shape.args.pop();
                }
            }
            Ordering::Equal => break,
        }
    }
    for (i, param) in params.iter().enumerate() {
        let mismatched = ws
            .reference(site)
            .is_some_and(|s| s.shape.args[i].name != *param);
        if mismatched {
            ws.disconnect_arg(site, i);
            if let Some(s) = ws.reference_mut(site) {
                s.shape.args[i].name = param.clone();
            }
        }
    }
}
