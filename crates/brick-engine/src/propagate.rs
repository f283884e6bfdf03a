//! Change propagation: renames and structural mutations, pushed to every
//! dependent in one synchronous cascade.
//!
//! Each operation resolves the new legal name first, rewrites the
//! definition, then walks the workspace notifying dependents in traversal
//! order. Each dependent runs to completion before the next begins; the
//! caller wraps the whole cascade in its own undo boundary.

use brick_blocks::{NameMatcher, Workspace};
use brick_identity::{BlockId, DefKind};

use crate::errors::EngineError;
use crate::index::{MemberSnapshot, find_reference_sites};
use crate::legal_name::{find_legal_name, trim_name};
use crate::registry::Exclude;
use crate::tracker::update_site;

fn class_name_of(ws: &Workspace, def: BlockId) -> Result<String, EngineError> {
    ws.block(def)
        .ok_or(EngineError::UnknownBlock { id: def })?
        .class_def()
        .map(|c| c.name.clone())
        .ok_or(EngineError::NotAClassDefinition { id: def })
}

/// Rename the class defined by `def` to (a legal form of) `proposed`.
///
/// Returns the legal name actually applied, so the editing field can
/// display the corrected value when the proposal collided. Proposing the
/// class's current name is a no-op for every dependent.
pub fn rename_class(
    ws: &mut Workspace,
    def: BlockId,
    proposed: &str,
    matcher: &dyn NameMatcher,
) -> Result<String, EngineError> {
    let old = class_name_of(ws, def)?;
    let trimmed = trim_name(proposed).to_string();
    let legal = find_legal_name(&trimmed, ws, Exclude::Class(def), DefKind::Class, matcher);

    if !matcher.eq(&old, &trimmed) && !matcher.eq(&old, &legal) {
        tracing::debug!(%old, %legal, "renaming class across workspace");
        for id in ws.all_block_ids(true) {
            if let Some(site) = ws.reference_mut(id) {
                site.rename_class(&old, &legal, matcher);
            }
        }
        ws.variables.rename_type(&old, &legal, matcher);
    }

    ws.class_def_mut(def)
        .expect("definition validated above")
        .name = legal.clone();
    Ok(legal)
}

/// Rename method `index` of the class defined by `def`.
///
/// Same shape as [`rename_class`], but dependents are notified through
/// their method-rename capability and then refreshed with the rename map,
/// so their dropdowns translate the selection. Variables are not touched;
/// no variable is typed by a method.
pub fn rename_method(
    ws: &mut Workspace,
    def: BlockId,
    index: usize,
    proposed: &str,
    matcher: &dyn NameMatcher,
) -> Result<String, EngineError> {
    let class_name = class_name_of(ws, def)?;
    let old = ws
        .class_def(def)
        .expect("definition validated above")
        .methods
        .get(index)
        .map(|m| m.name.clone())
        .ok_or_else(|| EngineError::NoSuchMethod {
            class: class_name.clone(),
            index,
        })?;

    let trimmed = trim_name(proposed).to_string();
    let legal = find_legal_name(
        &trimmed,
        ws,
        Exclude::Method { block: def, index },
        DefKind::Method,
        matcher,
    );

    if !matcher.eq(&old, &trimmed) && !matcher.eq(&old, &legal) {
        tracing::debug!(%old, %legal, class = %class_name, "renaming method across workspace");
        for id in ws.all_block_ids(true) {
            if let Some(site) = ws.reference_mut(id) {
                site.rename_procedure(&old, &legal, matcher);
            }
        }
        ws.class_def_mut(def)
            .expect("definition validated above")
            .methods[index]
            .name = legal.clone();

        // Refresh dependents with the rename map so dropdowns translate.
        let snapshot = MemberSnapshot::fetch(ws, &class_name, matcher);
        for site in find_reference_sites(ws, &class_name, matcher) {
            update_site(ws, site, snapshot.as_ref(), Some((&old, &legal)), matcher)?;
        }
    } else {
        ws.class_def_mut(def)
            .expect("definition validated above")
            .methods[index]
            .name = legal.clone();
    }
    Ok(legal)
}

/// The class definition's shape changed without a name change (method or
/// attribute added or removed, return type toggled, constructor edited):
/// refresh every site bound to it. No name resolution happens here.
pub fn mutate_callers(
    ws: &mut Workspace,
    def: BlockId,
    matcher: &dyn NameMatcher,
) -> Result<(), EngineError> {
    let class_name = class_name_of(ws, def)?;
    let snapshot = MemberSnapshot::fetch(ws, &class_name, matcher);
    let sites = find_reference_sites(ws, &class_name, matcher);
    tracing::debug!(class = %class_name, dependents = sites.len(), "propagating structural change");
    for site in sites {
        update_site(ws, site, snapshot.as_ref(), None, matcher)?;
    }
    Ok(())
}
