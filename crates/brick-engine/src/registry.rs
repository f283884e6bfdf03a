//! Name registry: the authoritative view of which class and method names
//! currently exist in a workspace.
//!
//! Every query is a full scan over the definition blocks. Workspaces are
//! tens to low hundreds of blocks, and a stateless scan cannot hold a
//! stale cache, so correctness wins over speed here.

use brick_blocks::{ClassDef, MethodDef, NameMatcher, Workspace};
use brick_identity::{BlockId, DefKind};

/// Which definition a name check should ignore: the one currently being
/// renamed. A definition never collides with itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclude {
    None,
    Class(BlockId),
    Method { block: BlockId, index: usize },
}

/// Find the class definition with the given name, if any.
pub fn lookup_class<'ws>(
    ws: &'ws Workspace,
    name: &str,
    matcher: &dyn NameMatcher,
) -> Option<(BlockId, &'ws ClassDef)> {
    tracing::trace!(name, "scanning workspace for class");
    ws.all_blocks(false).find_map(|block| {
        block
            .class_def()
            .filter(|def| matcher.eq(&def.name, name))
            .map(|def| (block.id, def))
    })
}

/// Find the method definition with the given name, if any. Method names
/// are unique across the whole workspace, not per class.
pub fn lookup_method<'ws>(
    ws: &'ws Workspace,
    name: &str,
    matcher: &dyn NameMatcher,
) -> Option<(BlockId, &'ws MethodDef)> {
    tracing::trace!(name, "scanning workspace for method");
    ws.all_blocks(false).find_map(|block| {
        let def = block.class_def()?;
        def.methods
            .iter()
            .find(|m| matcher.eq(&m.name, name))
            .map(|m| (block.id, m))
    })
}

/// All class names in traversal order.
pub fn all_class_names(ws: &Workspace) -> Vec<String> {
    ws.all_blocks(false)
        .filter_map(|block| block.class_def().map(|def| def.name.clone()))
        .collect()
}

/// All method names, across every class, in traversal order.
pub fn all_method_names(ws: &Workspace) -> Vec<String> {
    ws.all_blocks(false)
        .filter_map(|block| block.class_def())
        .flat_map(|def| def.methods.iter().map(|m| m.name.clone()))
        .collect()
}

/// Is `candidate` already taken by some *other* definition of `kind`?
pub fn is_name_used(
    candidate: &str,
    ws: &Workspace,
    exclude: Exclude,
    kind: DefKind,
    matcher: &dyn NameMatcher,
) -> bool {
    for block in ws.all_blocks(false) {
        let Some(def) = block.class_def() else {
            continue;
        };
        match kind {
            DefKind::Class => {
                if exclude == Exclude::Class(block.id) {
                    continue;
                }
                if matcher.eq(&def.name, candidate) {
                    return true;
                }
            }
            DefKind::Method => {
                for (i, method) in def.methods.iter().enumerate() {
                    if let Exclude::Method { block: b, index } = exclude
                        && b == block.id
                        && index == i
                    {
                        continue;
                    }
                    if matcher.eq(&method.name, candidate) {
                        return true;
                    }
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use brick_blocks::{ExactMatcher, MethodDef};

    fn sample_workspace() -> (Workspace, BlockId, BlockId) {
        let mut ws = Workspace::new();
        let animal = ws.add_class_def("Animal");
        let car = ws.add_class_def("Car");
        ws.class_def_mut(animal)
            .unwrap()
            .methods
            .push(MethodDef::new("speak", &[], false));
        ws.class_def_mut(car)
            .unwrap()
            .methods
            .push(MethodDef::new("drive", &["speed"], true));
        (ws, animal, car)
    }

    #[test]
    fn lookup_class_finds_by_name() {
        let (ws, animal, _) = sample_workspace();
        let (id, def) = lookup_class(&ws, "Animal", &ExactMatcher).unwrap();
        assert_eq!(id, animal);
        assert_eq!(def.name, "Animal");
        assert!(lookup_class(&ws, "Plane", &ExactMatcher).is_none());
    }

    #[test]
    fn lookup_method_searches_every_class() {
        let (ws, _, car) = sample_workspace();
        let (id, def) = lookup_method(&ws, "drive", &ExactMatcher).unwrap();
        assert_eq!(id, car);
        assert!(def.has_return);
    }

    #[test]
    fn name_sets_follow_traversal_order() {
        let (ws, _, _) = sample_workspace();
        assert_eq!(all_class_names(&ws), vec!["Animal", "Car"]);
        assert_eq!(all_method_names(&ws), vec!["speak", "drive"]);
    }

    #[test]
    fn is_name_used_skips_the_excluded_definition() {
        let (ws, animal, car) = sample_workspace();
        assert!(is_name_used("Animal", &ws, Exclude::None, DefKind::Class, &ExactMatcher));
        assert!(!is_name_used(
            "Animal",
            &ws,
            Exclude::Class(animal),
            DefKind::Class,
            &ExactMatcher
        ));
        assert!(is_name_used(
            "Animal",
            &ws,
            Exclude::Class(car),
            DefKind::Class,
            &ExactMatcher
        ));
    }

    #[test]
    fn method_names_are_workspace_unique() {
        // Two unrelated classes may not both declare "speak"; the check
        // sees right through class boundaries.
        let (ws, _, car) = sample_workspace();
        assert!(is_name_used(
            "speak",
            &ws,
            Exclude::Method { block: car, index: 0 },
            DefKind::Method,
            &ExactMatcher
        ));
    }

    #[test]
    fn deleted_definitions_vanish_from_the_registry() {
        let (mut ws, animal, _) = sample_workspace();
        ws.remove_block(animal);
        assert!(lookup_class(&ws, "Animal", &ExactMatcher).is_none());
        assert_eq!(all_class_names(&ws), vec!["Car"]);
    }
}
