#![doc = r"Coordinator hierarchy and deeplink routing for Waypoint.

A [`Hierarchy`] owns a tree of coordinators, each responsible for one slice
of an application's navigation state. Coordinators are plain values
implementing [`Coordinator`]; the hierarchy hands out [`NodeId`] handles and
keeps the parent/child topology consistent. Deeplinks are routed with
[`Hierarchy::open`], which walks the tree depth-first from the starting node
and escalates towards the root until some coordinator claims the request."]

mod hierarchy;
mod routing;

pub use hierarchy::{Flow, FlowState, Hierarchy};

use std::any::Any;
use std::fmt;

/// Handle to a node in a [`Hierarchy`]. Ids are allocated monotonically and
/// never reused, so a `NodeId` identifies the same node for the lifetime of
/// the hierarchy that issued it.
pub type NodeId = usize;

/// Per-node behavior attached to a hierarchy node.
///
/// Both hooks receive a [`Flow`] context that identifies the node and grants
/// mutable access to the hierarchy, so a coordinator can attach and run child
/// flows from inside a hook.
pub trait Coordinator<D: 'static>: Any {
    /// Called once when the flow becomes active.
    fn start(&mut self, _flow: &mut Flow<'_, D>) {}

    /// Asked by the router whether this coordinator claims `deeplink`. A
    /// claiming implementation performs its own side effect (typically
    /// instructing a navigator collaborator) and returns `true`. The default
    /// declines so the search continues elsewhere.
    fn did_open(&mut self, _deeplink: &D, _flow: &mut Flow<'_, D>) -> bool {
        false
    }
}

impl<D: 'static> dyn Coordinator<D> {
    pub fn as_any(&self) -> &dyn Any {
        self
    }

    pub fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Error produced by hierarchy operations handed an unusable node id.
///
/// Redundant mutations (re-adding a child, removing from an empty node) are
/// deliberately not errors; see the individual [`Hierarchy`] methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeError {
    /// The id does not (or no longer does) name a node in this hierarchy.
    Missing { id: NodeId },
    /// A typed access found a coordinator of a different concrete type.
    TypeMismatch { id: NodeId, expected: &'static str },
    /// The attachment would make a node its own ancestor.
    WouldCycle { id: NodeId },
    /// The node's flow already finished; finished is terminal.
    Finished { id: NodeId },
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::Missing { id } => write!(f, "node {id} missing"),
            NodeError::TypeMismatch { id, expected } => {
                write!(f, "node {id} type mismatch; expected {expected}")
            }
            NodeError::WouldCycle { id } => {
                write!(f, "attaching node {id} would create a cycle")
            }
            NodeError::Finished { id } => write!(f, "node {id} already finished"),
        }
    }
}

impl std::error::Error for NodeError {}
