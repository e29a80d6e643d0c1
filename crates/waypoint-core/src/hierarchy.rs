//! Node storage and tree operations for coordinator hierarchies.
//!
//! Nodes live in an arena indexed by [`NodeId`]; the child list of a node is
//! an ordered `Vec<NodeId>` of owning edges and the parent back-reference is
//! a plain index, so detached subtrees never keep their former ancestors
//! alive. Every mutation goes through `&mut Hierarchy`, which is what makes
//! the single-threaded model hold: an operation always runs to completion
//! before the next one can begin.

use std::any::type_name;

use crate::{Coordinator, NodeError, NodeId};

/// Lifecycle stage of a node's flow. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Unstarted,
    Running,
    Finished,
}

/// Action fired when a flow finishes. It receives the hierarchy so a parent
/// can resume by starting its next child flow.
type FinishAction<D> = Box<dyn FnOnce(&mut Hierarchy<D>)>;

pub(crate) struct Slot<D: 'static> {
    /// Taken out of the slot while one of the coordinator's hooks runs, so
    /// the hook can mutate the tree through its [`Flow`] context.
    pub(crate) coordinator: Option<Box<dyn Coordinator<D>>>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) state: FlowState,
    pub(crate) after_finish: Option<FinishAction<D>>,
}

/// Tree of coordinators, owner of every node.
pub struct Hierarchy<D: 'static> {
    slots: Vec<Option<Slot<D>>>,
}

impl<D: 'static> Default for Hierarchy<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: 'static> Hierarchy<D> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Adds a coordinator as a new detached node and returns its handle.
    pub fn insert(&mut self, coordinator: impl Coordinator<D>) -> NodeId {
        let id = self.slots.len();
        self.slots.push(Some(Slot {
            coordinator: Some(Box::new(coordinator)),
            children: Vec::new(),
            parent: None,
            state: FlowState::Unstarted,
            after_finish: None,
        }));
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|slot| slot.parent)
    }

    /// Direct children in insertion order. Unknown ids have no children.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map(|slot| slot.children.as_slice()).unwrap_or(&[])
    }

    pub fn state(&self, id: NodeId) -> Option<FlowState> {
        self.slot(id).map(|slot| slot.state)
    }

    // === Tree operations ===

    /// Makes `child` the last child of `parent`.
    ///
    /// Re-adding an existing child is a no-op. A child that currently sits
    /// under a different parent is unlinked from it first, so a node never
    /// has two parents. Attaching a node to itself or to one of its own
    /// descendants fails with [`NodeError::WouldCycle`].
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), NodeError> {
        let Some(parent_slot) = self.slot(parent) else {
            return Err(NodeError::Missing { id: parent });
        };
        if parent_slot.children.contains(&child) {
            return Ok(());
        }
        if self.slot(child).is_none() {
            return Err(NodeError::Missing { id: child });
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(NodeError::WouldCycle { id: child });
        }
        if let Some(previous) = self.parent(child) {
            self.unlink(previous, child);
        }
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.push(child);
        }
        if let Some(slot) = self.slot_mut(child) {
            slot.parent = Some(parent);
        }
        Ok(())
    }

    /// [`Hierarchy::add_child`] spelled from the child's side; returns the
    /// child id so construction can be chained.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<NodeId, NodeError> {
        self.add_child(parent, child)?;
        Ok(child)
    }

    /// Detaches `child` from `parent`.
    ///
    /// A no-op when `parent` currently has no children. Otherwise the
    /// target's whole subtree is taken apart first (every descendant edge
    /// severed, deepest first) and the target is then unlinked from
    /// `parent`; a target that was never a child of `parent` still has its
    /// subtree taken apart. The nodes themselves stay in the hierarchy and
    /// can be re-attached or [`Hierarchy::release`]d.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), NodeError> {
        if self.slot(parent).is_none() {
            return Err(NodeError::Missing { id: parent });
        }
        if self.slot(child).is_none() {
            return Err(NodeError::Missing { id: child });
        }
        if self.children(parent).is_empty() {
            return Ok(());
        }
        self.sever_descendants(child);
        self.unlink(parent, child);
        Ok(())
    }

    /// Detaches this node from its parent, if it has one.
    pub fn remove_from_parent(&mut self, id: NodeId) -> Result<(), NodeError> {
        if self.slot(id).is_none() {
            return Err(NodeError::Missing { id });
        }
        match self.parent(id) {
            Some(parent) => self.remove_child(parent, id),
            None => Ok(()),
        }
    }

    /// Detaches every current child of `id`.
    pub fn remove_all_children(&mut self, id: NodeId) -> Result<(), NodeError> {
        if self.slot(id).is_none() {
            return Err(NodeError::Missing { id });
        }
        let children = self.children(id).to_vec();
        for child in children {
            self.remove_child(id, child)?;
        }
        Ok(())
    }

    /// Drops `id` and its entire subtree from the hierarchy, unlinking from
    /// the parent first. Handles into the released subtree become
    /// [`NodeError::Missing`].
    pub fn release(&mut self, id: NodeId) -> Result<(), NodeError> {
        if self.slot(id).is_none() {
            return Err(NodeError::Missing { id });
        }
        if let Some(parent) = self.parent(id) {
            self.unlink(parent, id);
        }
        self.drop_subtree(id);
        Ok(())
    }

    /// First direct child (insertion order) whose coordinator is a `T`.
    pub fn child_of_type<T: Coordinator<D>>(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).iter().copied().find(|&child| {
            self.slot(child)
                .and_then(|slot| slot.coordinator.as_deref())
                .is_some_and(|coordinator| coordinator.as_any().is::<T>())
        })
    }

    pub fn has_child_of_type<T: Coordinator<D>>(&self, id: NodeId) -> bool {
        self.child_of_type::<T>(id).is_some()
    }

    /// Runs `f` against the node's coordinator downcast to `T`.
    pub fn with_coordinator<T, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, NodeError>
    where
        T: Coordinator<D>,
    {
        let slot = self.slot_mut(id).ok_or(NodeError::Missing { id })?;
        let coordinator = slot
            .coordinator
            .as_deref_mut()
            .ok_or(NodeError::Missing { id })?;
        let typed = coordinator
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(NodeError::TypeMismatch {
                id,
                expected: type_name::<T>(),
            })?;
        Ok(f(typed))
    }

    // === Lifecycle ===

    /// Transitions the node to `Running` and runs its `start` hook. Starting
    /// an already running node is a no-op; a finished node cannot restart.
    pub fn start(&mut self, id: NodeId) -> Result<(), NodeError> {
        let state = self.state(id).ok_or(NodeError::Missing { id })?;
        match state {
            FlowState::Finished => Err(NodeError::Finished { id }),
            FlowState::Running => Ok(()),
            FlowState::Unstarted => {
                if let Some(slot) = self.slot_mut(id) {
                    slot.state = FlowState::Running;
                }
                self.with_taken(id, |coordinator, flow| coordinator.start(flow));
                Ok(())
            }
        }
    }

    /// Installs the action fired when this flow finishes. Last set wins.
    pub fn on_finish(
        &mut self,
        id: NodeId,
        action: impl FnOnce(&mut Hierarchy<D>) + 'static,
    ) -> Result<(), NodeError> {
        let slot = self.slot_mut(id).ok_or(NodeError::Missing { id })?;
        slot.after_finish = Some(Box::new(action));
        Ok(())
    }

    /// [`Hierarchy::on_finish`] followed by [`Hierarchy::start`], for
    /// parents that want to resume when the child flow completes.
    pub fn start_with(
        &mut self,
        id: NodeId,
        action: impl FnOnce(&mut Hierarchy<D>) + 'static,
    ) -> Result<(), NodeError> {
        self.on_finish(id, action)?;
        self.start(id)
    }

    /// Ends the node's flow: fires the registered finish action (at most
    /// once; `Finished` is terminal and a second call is a no-op), then
    /// detaches the node from its parent.
    pub fn finish(&mut self, id: NodeId) -> Result<(), NodeError> {
        let slot = self.slot_mut(id).ok_or(NodeError::Missing { id })?;
        if slot.state == FlowState::Finished {
            return Ok(());
        }
        slot.state = FlowState::Finished;
        let action = slot.after_finish.take();
        if let Some(action) = action {
            action(self);
        }
        if self.slot(id).is_none() {
            // the finish action released the node; nothing left to detach
            return Ok(());
        }
        self.remove_from_parent(id)
    }

    /// Inserts `coordinator`, attaches it under `parent` and starts it.
    pub fn run(
        &mut self,
        parent: NodeId,
        coordinator: impl Coordinator<D>,
    ) -> Result<NodeId, NodeError> {
        if self.slot(parent).is_none() {
            return Err(NodeError::Missing { id: parent });
        }
        let child = self.insert(coordinator);
        self.add_child(parent, child)?;
        self.start(child)?;
        Ok(child)
    }

    /// [`Hierarchy::run`] with a finish action, so the caller resumes
    /// exactly when the child flow calls finish.
    pub fn run_with(
        &mut self,
        parent: NodeId,
        coordinator: impl Coordinator<D>,
        after_finish: impl FnOnce(&mut Hierarchy<D>) + 'static,
    ) -> Result<NodeId, NodeError> {
        if self.slot(parent).is_none() {
            return Err(NodeError::Missing { id: parent });
        }
        let child = self.insert(coordinator);
        self.add_child(parent, child)?;
        self.on_finish(child, after_finish)?;
        self.start(child)?;
        Ok(child)
    }

    // === Internals ===

    pub(crate) fn slot(&self, id: NodeId) -> Option<&Slot<D>> {
        self.slots.get(id).and_then(|slot| slot.as_ref())
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot<D>> {
        self.slots.get_mut(id).and_then(|slot| slot.as_mut())
    }

    /// Moves the coordinator out of its slot, runs `f` with a [`Flow`]
    /// context, and puts it back afterwards. The hook is free to mutate the
    /// tree while it runs; if it released its own node the coordinator is
    /// simply dropped.
    pub(crate) fn with_taken<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Coordinator<D>, &mut Flow<'_, D>) -> R,
    ) -> Option<R> {
        let mut coordinator = self.slot_mut(id)?.coordinator.take()?;
        let result = {
            let mut flow = Flow { hierarchy: self, id };
            f(coordinator.as_mut(), &mut flow)
        };
        if let Some(slot) = self.slot_mut(id) {
            if slot.coordinator.is_none() {
                slot.coordinator = Some(coordinator);
            }
        }
        Some(result)
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Removes the parent→child edge (first occurrence only) and clears the
    /// child's back-reference if it still points at `parent`.
    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        if let Some(slot) = self.slot_mut(parent) {
            if let Some(index) = slot.children.iter().position(|&c| c == child) {
                slot.children.remove(index);
            }
        }
        if let Some(slot) = self.slot_mut(child) {
            if slot.parent == Some(parent) {
                slot.parent = None;
            }
        }
    }

    /// Severs every edge inside the subtree rooted at `id`, deepest first.
    fn sever_descendants(&mut self, id: NodeId) {
        let children = match self.slot(id) {
            Some(slot) => slot.children.clone(),
            None => return,
        };
        for child in children {
            if child == id {
                continue;
            }
            self.sever_descendants(child);
            self.unlink(id, child);
        }
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let children = match self.slot(id) {
            Some(slot) => slot.children.clone(),
            None => return,
        };
        for child in children {
            self.drop_subtree(child);
        }
        self.slots[id] = None;
    }
}

/// Context handed to coordinator hooks: the node's own id plus mutable
/// access to the hierarchy it lives in.
pub struct Flow<'a, D: 'static> {
    pub(crate) hierarchy: &'a mut Hierarchy<D>,
    pub(crate) id: NodeId,
}

impl<'a, D: 'static> Flow<'a, D> {
    /// Id of the node whose hook is running.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn hierarchy(&mut self) -> &mut Hierarchy<D> {
        self.hierarchy
    }

    /// Starts a child flow under this node.
    pub fn run(&mut self, coordinator: impl Coordinator<D>) -> Result<NodeId, NodeError> {
        self.hierarchy.run(self.id, coordinator)
    }

    /// Starts a child flow and resumes through `after_finish` when it ends.
    pub fn run_with(
        &mut self,
        coordinator: impl Coordinator<D>,
        after_finish: impl FnOnce(&mut Hierarchy<D>) + 'static,
    ) -> Result<NodeId, NodeError> {
        self.hierarchy.run_with(self.id, coordinator, after_finish)
    }

    /// Ends this node's own flow.
    pub fn finish(&mut self) -> Result<(), NodeError> {
        self.hierarchy.finish(self.id)
    }
}
