//! Testing utilities for exercising coordinator trees.
//!
//! [`Probe`] is a coordinator that records every routing visit into a shared
//! [`VisitTrace`], so tests can assert the exact traversal order of a
//! search, not just its outcome.

use std::cell::RefCell;
use std::rc::Rc;

use waypoint_core::{Coordinator, Flow, NodeId};

/// Shared, clonable record of which nodes a search visited, in order.
/// Clones observe the same underlying trace.
#[derive(Clone, Default)]
pub struct VisitTrace {
    visits: Rc<RefCell<Vec<NodeId>>>,
}

impl VisitTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, id: NodeId) {
        self.visits.borrow_mut().push(id);
    }

    /// Snapshot of the visits recorded so far.
    pub fn visits(&self) -> Vec<NodeId> {
        self.visits.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.visits.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.visits.borrow_mut().clear();
    }
}

/// Coordinator that records every `did_open` visit and optionally accepts a
/// single configured deeplink value.
pub struct Probe<D> {
    trace: VisitTrace,
    accepts: Option<D>,
}

impl<D> Probe<D> {
    /// A probe that records visits but never accepts anything.
    pub fn declining(trace: &VisitTrace) -> Self {
        Self {
            trace: trace.clone(),
            accepts: None,
        }
    }

    /// A probe that records visits and accepts exactly `deeplink`.
    pub fn accepting(trace: &VisitTrace, deeplink: D) -> Self {
        Self {
            trace: trace.clone(),
            accepts: Some(deeplink),
        }
    }
}

impl<D: PartialEq + 'static> Coordinator<D> for Probe<D> {
    fn did_open(&mut self, deeplink: &D, flow: &mut Flow<'_, D>) -> bool {
        self.trace.record(flow.id());
        self.accepts.as_ref() == Some(deeplink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_clones_share_state() {
        let trace = VisitTrace::new();
        let alias = trace.clone();
        trace.record(3);
        alias.record(7);
        assert_eq!(trace.visits(), vec![3, 7]);
        trace.clear();
        assert!(alias.is_empty());
    }
}
