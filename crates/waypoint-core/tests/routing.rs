//! Traversal-order tests for deeplink routing.

use waypoint_core::{Coordinator, Flow, Hierarchy, NodeError, NodeId};
use waypoint_testing::{Probe, VisitTrace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Mid,
    DeepLeft,
    Deep,
    Unsupported,
}

/// The reference fifteen-node tree:
///
/// ```text
///                     ___ c0 ___
///                    /          \
///                  c01          c02
///                 /   \       /     \
///               c011  c012  c021    c022
///              /    \              /    \
///          c0111    c0112      c0221     c0222
///         /     \                        /
///    c01111     c01112              c02221
///   /
/// c011111
/// ```
///
/// `c0111` accepts [`Target::Mid`], `c011111` accepts [`Target::DeepLeft`],
/// `c02221` accepts [`Target::Deep`].
struct Fixture {
    hierarchy: Hierarchy<Target>,
    trace: VisitTrace,
    c0: NodeId,
    c01: NodeId,
    c02: NodeId,
    c011: NodeId,
    c012: NodeId,
    c021: NodeId,
    c022: NodeId,
    c0111: NodeId,
    c0112: NodeId,
    c0221: NodeId,
    c0222: NodeId,
    c01111: NodeId,
    c01112: NodeId,
    c011111: NodeId,
    c02221: NodeId,
}

impl Fixture {
    fn build() -> Self {
        let trace = VisitTrace::new();
        let mut hierarchy = Hierarchy::new();
        let c0 = hierarchy.insert(Probe::declining(&trace));
        let c01 = hierarchy.insert(Probe::declining(&trace));
        let c02 = hierarchy.insert(Probe::declining(&trace));
        let c011 = hierarchy.insert(Probe::declining(&trace));
        let c012 = hierarchy.insert(Probe::declining(&trace));
        let c021 = hierarchy.insert(Probe::declining(&trace));
        let c022 = hierarchy.insert(Probe::declining(&trace));
        let c0111 = hierarchy.insert(Probe::accepting(&trace, Target::Mid));
        let c0112 = hierarchy.insert(Probe::declining(&trace));
        let c0221 = hierarchy.insert(Probe::declining(&trace));
        let c0222 = hierarchy.insert(Probe::declining(&trace));
        let c01111 = hierarchy.insert(Probe::declining(&trace));
        let c01112 = hierarchy.insert(Probe::declining(&trace));
        let c011111 = hierarchy.insert(Probe::accepting(&trace, Target::DeepLeft));
        let c02221 = hierarchy.insert(Probe::accepting(&trace, Target::Deep));

        for (parent, child) in [
            (c0, c01),
            (c0, c02),
            (c01, c011),
            (c01, c012),
            (c02, c021),
            (c02, c022),
            (c022, c0221),
            (c022, c0222),
            (c0222, c02221),
            (c011, c0111),
            (c011, c0112),
            (c0111, c01111),
            (c0111, c01112),
            (c01111, c011111),
        ] {
            hierarchy.add_child(parent, child).unwrap();
        }

        Self {
            hierarchy,
            trace,
            c0,
            c01,
            c02,
            c011,
            c012,
            c021,
            c022,
            c0111,
            c0112,
            c0221,
            c0222,
            c01111,
            c01112,
            c011111,
            c02221,
        }
    }
}

#[test]
fn open_from_root_descends_then_escalates() {
    let mut fx = Fixture::build();
    assert_eq!(fx.hierarchy.open(fx.c0, &Target::Deep), Ok(true));
    // exact pre-order descent with backtracking through interior nodes,
    // stopping the moment the acceptor answers
    assert_eq!(
        fx.trace.visits(),
        vec![
            fx.c0, fx.c01, fx.c011, fx.c0111, fx.c01111, fx.c011111, fx.c01111, fx.c0111,
            fx.c01112, fx.c0111, fx.c011, fx.c0112, fx.c011, fx.c01, fx.c012, fx.c01, fx.c0,
            fx.c02, fx.c021, fx.c02, fx.c022, fx.c0221, fx.c022, fx.c0222, fx.c02221,
        ]
    );
    assert_eq!(fx.trace.len(), 25);
}

#[test]
fn open_from_interior_node_skips_the_searched_branch_on_escalation() {
    let mut fx = Fixture::build();
    assert_eq!(fx.hierarchy.open(fx.c0112, &Target::Deep), Ok(true));
    assert_eq!(
        fx.trace.visits(),
        vec![
            fx.c0112, fx.c011, fx.c0111, fx.c01111, fx.c011111, fx.c01111, fx.c0111, fx.c01112,
            fx.c0111, fx.c011, fx.c01, fx.c012, fx.c01, fx.c0, fx.c02, fx.c021, fx.c02, fx.c022,
            fx.c0221, fx.c022, fx.c0222, fx.c02221,
        ]
    );
    assert_eq!(fx.trace.len(), 22);
}

#[test]
fn near_match_stops_immediately() {
    let mut fx = Fixture::build();
    assert_eq!(fx.hierarchy.open(fx.c0112, &Target::Mid), Ok(true));
    assert_eq!(fx.trace.visits(), vec![fx.c0112, fx.c011, fx.c0111]);
    // nothing below or beside the acceptor was visited
    assert!(!fx.trace.visits().contains(&fx.c011111));
    assert!(!fx.trace.visits().contains(&fx.c01));
    assert!(!fx.trace.visits().contains(&fx.c02));
}

#[test]
fn deep_left_target_found_without_touching_the_right_subtree() {
    let mut fx = Fixture::build();
    assert_eq!(fx.hierarchy.open(fx.c0, &Target::DeepLeft), Ok(true));
    assert_eq!(
        fx.trace.visits(),
        vec![fx.c0, fx.c01, fx.c011, fx.c0111, fx.c01111, fx.c011111]
    );
}

#[test]
fn unsupported_deeplink_reports_failure() {
    let mut fx = Fixture::build();
    assert_eq!(fx.hierarchy.open(fx.c0, &Target::Unsupported), Ok(false));
    // every node was asked at least once before giving up
    for id in [fx.c0, fx.c012, fx.c021, fx.c0112, fx.c01112, fx.c0221, fx.c02221] {
        assert!(fx.trace.visits().contains(&id));
    }
}

#[test]
fn ignored_parent_stops_escalation() {
    let mut fx = Fixture::build();
    let ignore = [fx.c011];
    assert_eq!(
        fx.hierarchy.open_ignoring(fx.c0112, &Target::Mid, &ignore),
        Ok(false)
    );
    // only the starting node itself was asked
    assert_eq!(fx.trace.visits(), vec![fx.c0112]);
}

#[test]
fn ignored_children_are_not_descended_into() {
    let mut fx = Fixture::build();
    let ignore = [fx.c01];
    assert_eq!(
        fx.hierarchy.open_ignoring(fx.c0, &Target::Deep, &ignore),
        Ok(true)
    );
    assert_eq!(
        fx.trace.visits(),
        vec![fx.c0, fx.c02, fx.c021, fx.c02, fx.c022, fx.c0221, fx.c022, fx.c0222, fx.c02221]
    );
}

#[test]
fn open_from_unknown_node_is_an_error() {
    let mut fx = Fixture::build();
    assert_eq!(
        fx.hierarchy.open(999, &Target::Deep),
        Err(NodeError::Missing { id: 999 })
    );
}

#[test]
fn accepting_hook_may_mutate_the_tree() {
    struct Greedy;

    impl Coordinator<Target> for Greedy {
        fn did_open(&mut self, deeplink: &Target, flow: &mut Flow<'_, Target>) -> bool {
            if *deeplink != Target::Deep {
                return false;
            }
            flow.run(Greedy).expect("child flow starts");
            true
        }
    }

    let mut hierarchy = Hierarchy::new();
    let root = hierarchy.insert(Greedy);
    assert_eq!(hierarchy.open(root, &Target::Deep), Ok(true));
    assert_eq!(hierarchy.children(root).len(), 1);
}
