//! Legal-name resolution: turn a proposed name into one that collides with
//! nothing else of its kind.
//!
//! Collisions are never surfaced as errors; the resolver silently corrects
//! the name and the editing field displays the corrected value.

use brick_blocks::{NameMatcher, Workspace};
use brick_identity::DefKind;

use crate::registry::{Exclude, is_name_used};

/// Strip leading and trailing whitespace, including the non-breaking space
/// that rich-text editors like to paste in.
pub fn trim_name(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{a0}')
}

/// Resolve `proposed` to a collision-free name for a definition of `kind`.
///
/// Inside a flyout the proposal is returned trimmed but otherwise
/// unchanged: palette templates are not live definitions and may share
/// display names.
///
/// Termination: each collision strictly increases the numeric suffix, and
/// the set of taken names is finite.
pub fn find_legal_name(
    proposed: &str,
    ws: &Workspace,
    exclude: Exclude,
    kind: DefKind,
    matcher: &dyn NameMatcher,
) -> String {
    let trimmed = trim_name(proposed);
    if ws.is_flyout() {
        return trimmed.to_string();
    }
    let mut candidate = trimmed.to_string();
    while is_name_used(&candidate, ws, exclude, kind, matcher) {
        candidate = bump_suffix(&candidate);
    }
    if candidate != trimmed {
        tracing::debug!(proposed = trimmed, legal = %candidate, "name collision corrected");
    }
    candidate
}

/// `Car` becomes `Car2`; `Car2` becomes `Car3`. A suffix too large to
/// parse falls back to appending a fresh `2`.
fn bump_suffix(name: &str) -> String {
    let digits = name
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    let split = name.len() - digits;
    if digits == 0 {
        return format!("{name}2");
    }
    match name[split..].parse::<u64>() {
        Ok(n) => format!("{}{}", &name[..split], n + 1),
        Err(_) => format!("{name}2"),
    }
}
