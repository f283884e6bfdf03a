//! End-to-end cascades: a workspace with live definitions and dependents,
//! driven through renames, structural mutations, and deletion.

use brick_blocks::{
    ArgSocket, BindingState, ExactMatcher, MemberBinding, MethodDef, ReferenceKind, Workspace,
};
use brick_engine::{
    bind_class, find_reference_sites, flyout_contents, mutate_callers, poll, rename_class,
    rename_method, FlyoutEntry,
};

const M: ExactMatcher = ExactMatcher;

/// One class, three dependents, a typed variable; rename with a collision.
#[test]
fn class_rename_cascade_reaches_sites_and_variables() {
    let mut ws = Workspace::new();
    let cat = ws.add_class_def("Cat");
    ws.add_class_def("Dog2");
    ws.variables.declare("pet", "Cat");

    let sites: Vec<_> = (0..3)
        .map(|_| {
            let site = ws.add_reference(ReferenceKind::MemberAccess);
            bind_class(&mut ws, site, "Cat").unwrap();
            site
        })
        .collect();

    // "Dog2" is taken, so proposing "Dog2" lands on "Dog3" everywhere.
    let legal = rename_class(&mut ws, cat, "Dog2", &M).unwrap();
    assert_eq!(legal, "Dog3");
    assert_eq!(ws.class_def(cat).unwrap().name, "Dog3");
    for site in &sites {
        assert_eq!(
            ws.reference(*site).unwrap().class_name.as_deref(),
            Some("Dog3")
        );
    }
    assert!(find_reference_sites(&ws, "Cat", &M).is_empty());
    assert_eq!(find_reference_sites(&ws, "Dog3", &M), sites);
    assert_eq!(
        ws.variables.by_name("pet").map(|v| v.type_name.as_str()),
        Some("Dog3")
    );
}

/// The §8 return-toggle scenario: "speak" gains a return value and every
/// dependent flips from statement to expression in one cascade.
#[test]
fn return_toggle_flips_every_dependent_without_dangling() {
    let mut ws = Workspace::new();
    let animal = ws.add_class_def("Animal");
    ws.class_def_mut(animal)
        .unwrap()
        .methods
        .push(MethodDef::new("speak", &[], false));

    let site = ws.add_reference(ReferenceKind::MemberAccess);
    bind_class(&mut ws, site, "Animal").unwrap();
    ws.reference_mut(site).unwrap().member = MemberBinding::Method("speak".to_string());
    assert!(poll(&mut ws, site, &M).unwrap());

    // Statement form, stacked between two neighbours.
    let above = ws.add_reference(ReferenceKind::MemberAccess);
    let below = ws.add_reference(ReferenceKind::MemberAccess);
    assert!(ws.connect_statement(above, site));
    assert!(ws.connect_statement(site, below));

    ws.class_def_mut(animal)
        .unwrap()
        .method_mut("speak")
        .unwrap()
        .has_return = true;
    mutate_callers(&mut ws, animal, &M).unwrap();

    let shape = &ws.reference(site).unwrap().shape;
    assert!(shape.has_output && !shape.has_statement);
    assert!(shape.prev.is_none() && shape.next.is_none());
    assert!(ws.reference(above).unwrap().shape.next.is_none());
    assert!(ws.reference(below).unwrap().shape.prev.is_none());
}

/// Method rename mid-flight: bound dropdowns translate, and the old name
/// resolves nowhere afterwards.
#[test]
fn method_rename_translates_dropdowns() {
    let mut ws = Workspace::new();
    let animal = ws.add_class_def("Animal");
    ws.class_def_mut(animal)
        .unwrap()
        .methods
        .push(MethodDef::new("speak", &["volume"], false));

    let site = ws.add_reference(ReferenceKind::MemberAccess);
    bind_class(&mut ws, site, "Animal").unwrap();
    ws.reference_mut(site).unwrap().member = MemberBinding::Method("speak".to_string());
    assert!(poll(&mut ws, site, &M).unwrap());

    let legal = rename_method(&mut ws, animal, 0, "  shout ", &M).unwrap();
    assert_eq!(legal, "shout");

    let r = ws.reference(site).unwrap();
    assert_eq!(r.member, MemberBinding::Method("shout".to_string()));
    assert_eq!(r.options[0].label, "shout()");
    assert_eq!(r.shape.args.len(), 1);
    assert!(brick_engine::lookup_method(&ws, "speak", &M).is_none());
}

/// The §8 argument-count scenario: a third parameter appears and the site
/// grows one socket, preserving what was already connected.
#[test]
fn signature_growth_preserves_connections() {
    let mut ws = Workspace::new();
    let animal = ws.add_class_def("Animal");
    ws.class_def_mut(animal)
        .unwrap()
        .methods
        .push(MethodDef::new("eat", &["food", "amount"], true));

    let site = ws.add_reference(ReferenceKind::MemberAccess);
    bind_class(&mut ws, site, "Animal").unwrap();
    ws.reference_mut(site).unwrap().member = MemberBinding::Method("eat".to_string());
    assert!(poll(&mut ws, site, &M).unwrap());

    let first = ws.add_reference(ReferenceKind::ConstructorCall);
    let second = ws.add_reference(ReferenceKind::ConstructorCall);
    assert!(ws.connect_value(site, 0, first));
    assert!(ws.connect_value(site, 1, second));

    ws.class_def_mut(animal)
        .unwrap()
        .method_mut("eat")
        .unwrap()
        .params
        .push("utensil".to_string());
    mutate_callers(&mut ws, animal, &M).unwrap();

    let shape = &ws.reference(site).unwrap().shape;
    assert_eq!(shape.args.len(), 3);
    assert_eq!(shape.args[0].connected, Some(first));
    assert_eq!(shape.args[1].connected, Some(second));
    assert_eq!(shape.args[2].name, "utensil");
    assert!(shape.args[2].connected.is_none());
}

/// Deleting a definition leaves dependents alive; their next poll clears
/// the selection and drops back to the unbound display.
#[test]
fn deletion_leaves_dependents_dangling_then_recovered() {
    let mut ws = Workspace::new();
    let animal = ws.add_class_def("Animal");
    ws.class_def_mut(animal)
        .unwrap()
        .attributes
        .push("age".to_string());

    let site = ws.add_reference(ReferenceKind::MemberAccess);
    bind_class(&mut ws, site, "Animal").unwrap();
    ws.reference_mut(site).unwrap().member = MemberBinding::Attribute("age".to_string());
    assert!(poll(&mut ws, site, &M).unwrap());

    assert!(ws.remove_block(animal));
    assert!(ws.block(site).is_some(), "dependents are never auto-deleted");

    assert!(!poll(&mut ws, site, &M).unwrap());
    let r = ws.reference(site).unwrap();
    assert_eq!(r.binding, BindingState::Unbound);
    assert_eq!(r.member, MemberBinding::Unset);
    assert!(r.options.is_empty());
}

/// A site created before its class exists resolves once the class appears,
/// even if the class was renamed in between.
#[test]
fn late_binding_survives_an_interleaved_rename() {
    let mut ws = Workspace::new();
    let site = ws.add_reference(ReferenceKind::MemberAccess);
    bind_class(&mut ws, site, "Robot").unwrap();
    assert!(!poll(&mut ws, site, &M).unwrap());

    let robot = ws.add_class_def("Robot");
    ws.class_def_mut(robot)
        .unwrap()
        .methods
        .push(MethodDef::new("boot", &[], false));

    // The unresolved site is still rebound by the cascade.
    rename_class(&mut ws, robot, "Droid", &M).unwrap();
    assert_eq!(
        ws.reference(site).unwrap().class_name.as_deref(),
        Some("Droid")
    );
    assert!(poll(&mut ws, site, &M).unwrap());
    assert_eq!(ws.reference(site).unwrap().binding, BindingState::BoundResolved);
}

/// Statement sites feeding value sockets across a shape flip: the flip
/// detaches the stale connection on both ends before changing capability.
#[test]
fn shape_flip_back_and_forth_keeps_the_graph_consistent() {
    let mut ws = Workspace::new();
    let animal = ws.add_class_def("Animal");
    ws.class_def_mut(animal)
        .unwrap()
        .methods
        .push(MethodDef::new("eat", &["food"], true));

    let site = ws.add_reference(ReferenceKind::MemberAccess);
    bind_class(&mut ws, site, "Animal").unwrap();
    ws.reference_mut(site).unwrap().member = MemberBinding::Method("eat".to_string());
    assert!(poll(&mut ws, site, &M).unwrap());

    let parent = ws.add_reference(ReferenceKind::MemberAccess);
    ws.reference_mut(parent).unwrap().shape.args.push(ArgSocket {
        name: "value".to_string(),
        connected: None,
    });
    assert!(ws.connect_value(parent, 0, site));

    // Toggle off: output detaches both ways, site becomes a statement.
    ws.class_def_mut(animal)
        .unwrap()
        .method_mut("eat")
        .unwrap()
        .has_return = false;
    mutate_callers(&mut ws, animal, &M).unwrap();
    assert!(ws.reference(parent).unwrap().shape.args[0].connected.is_none());
    assert!(ws.reference(site).unwrap().shape.has_statement);

    // Toggle back on: a clean expression again.
    ws.class_def_mut(animal)
        .unwrap()
        .method_mut("eat")
        .unwrap()
        .has_return = true;
    mutate_callers(&mut ws, animal, &M).unwrap();
    let shape = &ws.reference(site).unwrap().shape;
    assert!(shape.has_output && !shape.has_statement);
    assert!(shape.output.is_none());
}

/// The palette offers the system constructs plus the live classes, and
/// flyout workspaces skip disambiguation entirely.
#[test]
fn flyout_reflects_declared_classes() {
    let mut ws = Workspace::new();
    ws.add_class_def("Animal");
    let entries = flyout_contents(&ws);
    assert!(entries.contains(&FlyoutEntry::UserClass {
        class_name: "Animal".to_string()
    }));

    let mut palette = Workspace::flyout();
    let template = palette.add_class_def("Animal");
    // Same display name as the live class; templates are exempt.
    let legal = rename_class(&mut palette, template, "Animal", &M).unwrap();
    assert_eq!(legal, "Animal");
}
