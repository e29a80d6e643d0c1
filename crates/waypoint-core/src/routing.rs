//! Deeplink routing over a coordinator hierarchy.
//!
//! The search is depth-first from the starting node, then escalates to the
//! parent with the just-searched branch excluded, until either some
//! coordinator claims the deeplink or the reachable tree is exhausted. A
//! node is always asked before its descendants and before its parent, and
//! the first acceptance stops the walk immediately; later siblings and
//! their subtrees are never visited.

use crate::hierarchy::Hierarchy;
use crate::{NodeError, NodeId};

impl<D: 'static> Hierarchy<D> {
    /// Routes `deeplink` starting at `from`, searching the whole reachable
    /// tree. Returns `Ok(true)` when some coordinator accepted it;
    /// `Ok(false)` is the normal "nobody handles this" outcome and the
    /// caller decides the fallback.
    pub fn open(&mut self, from: NodeId, deeplink: &D) -> Result<bool, NodeError> {
        self.open_ignoring(from, deeplink, &[])
    }

    /// [`Hierarchy::open`] with an explicit exclusion set. Nodes in `ignore`
    /// are neither asked nor descended into, except for `from` itself,
    /// which is always asked first. Used internally for parent escalation
    /// and exposed for callers that need to skip known branches.
    pub fn open_ignoring(
        &mut self,
        from: NodeId,
        deeplink: &D,
        ignore: &[NodeId],
    ) -> Result<bool, NodeError> {
        if !self.contains(from) {
            return Err(NodeError::Missing { id: from });
        }
        Ok(self.search(from, deeplink, ignore))
    }

    fn search(&mut self, node: NodeId, deeplink: &D, ignore: &[NodeId]) -> bool {
        if self.dispatch(node, deeplink) {
            return true;
        }

        // children in insertion order; snapshot so an accepting hook may
        // mutate the tree without upsetting the walk
        let children = self.children(node).to_vec();
        for child in children {
            if ignore.contains(&child) || !self.contains(child) {
                continue;
            }
            // the full algorithm runs in the child, so a failed descent
            // comes back up through this node before moving on
            if self.search(child, deeplink, ignore) {
                return true;
            }
        }

        if let Some(parent) = self.parent(node) {
            if !ignore.contains(&parent) && self.contains(parent) {
                let mut widened = Vec::with_capacity(ignore.len() + 1);
                widened.push(node);
                widened.extend_from_slice(ignore);
                return self.search(parent, deeplink, &widened);
            }
        }

        false
    }

    fn dispatch(&mut self, id: NodeId, deeplink: &D) -> bool {
        self.with_taken(id, |coordinator, flow| coordinator.did_open(deeplink, flow))
            .unwrap_or(false)
    }
}
