//! The window-level root slot.

use crate::{Cleanup, Presenting, RootControllable, Screen};

/// Root-settable presenter: holds the single screen the application is
/// rooted in, plus a chain of overlays presented above it. This is the
/// collaborator an app-level coordinator drives; flow-level coordinators
/// drive a [`crate::StackNavigator`] instead.
pub struct Launcher<V: Screen> {
    root: Option<V>,
    root_cleanup: Option<Cleanup>,
    presented: Vec<V>,
}

impl<V: Screen> Launcher<V> {
    pub fn new() -> Self {
        Self {
            root: None,
            root_cleanup: None,
            presented: Vec::new(),
        }
    }

    /// Overlays currently presented above the root, bottom to top.
    pub fn presented(&self) -> &[V] {
        &self.presented
    }
}

impl<V: Screen> Default for Launcher<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Screen> RootControllable<V> for Launcher<V> {
    fn root(&self) -> Option<&V> {
        self.root.as_ref()
    }

    fn set_root(&mut self, screen: V, cleanup: Option<Cleanup>) {
        if let Some(previous) = self.root_cleanup.take() {
            previous();
        }
        self.root = Some(screen);
        self.root_cleanup = cleanup;
    }
}

impl<V: Screen> Presenting<V> for Launcher<V> {
    /// Presents above the topmost overlay, or above the root if nothing is
    /// presented yet. Ignored while no root is installed.
    fn present(&mut self, screen: V, _animated: bool, completion: Option<Box<dyn FnOnce()>>) {
        if self.root.is_none() {
            log::debug!("present without a root is ignored");
            return;
        }
        self.presented.push(screen);
        if let Some(completion) = completion {
            completion();
        }
    }

    fn dismiss(&mut self, _animated: bool, completion: Option<Box<dyn FnOnce()>>) {
        self.presented.clear();
        if let Some(completion) = completion {
            completion();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Window {
        id: u64,
    }

    impl Screen for Window {
        fn screen_id(&self) -> u64 {
            self.id
        }
    }

    #[test]
    fn replacing_the_root_fires_the_previous_cleanup_once() {
        let count = Rc::new(Cell::new(0));
        let mut launcher = Launcher::new();
        let observed = Rc::clone(&count);
        launcher.set_root(
            Window { id: 1 },
            Some(Box::new(move || observed.set(observed.get() + 1))),
        );
        assert_eq!(count.get(), 0);

        launcher.set_root(Window { id: 2 }, None);
        assert_eq!(count.get(), 1);

        // the fired cleanup was cleared, not re-armed
        launcher.set_root(Window { id: 3 }, None);
        assert_eq!(count.get(), 1);
        assert_eq!(launcher.root().map(|w| w.id), Some(3));
    }

    #[test]
    fn present_requires_a_root() {
        let mut launcher = Launcher::new();
        let done = Rc::new(Cell::new(false));
        let observed = Rc::clone(&done);
        launcher.present(
            Window { id: 10 },
            true,
            Some(Box::new(move || observed.set(true))),
        );
        // ignored entirely: no overlay, no completion
        assert!(!done.get());

        launcher.set_root(Window { id: 1 }, None);
        let observed = Rc::clone(&done);
        launcher.present(
            Window { id: 10 },
            true,
            Some(Box::new(move || observed.set(true))),
        );
        assert!(done.get());
    }

    #[test]
    fn dismiss_clears_the_overlay_chain() {
        let mut launcher = Launcher::new();
        launcher.set_root(Window { id: 1 }, None);
        launcher.present(Window { id: 10 }, true, None);
        launcher.present(Window { id: 11 }, true, None);

        assert_eq!(launcher.presented().len(), 2);

        let done = Rc::new(Cell::new(false));
        let observed = Rc::clone(&done);
        launcher.dismiss(true, Some(Box::new(move || observed.set(true))));
        assert!(done.get());
        assert!(launcher.presented().is_empty());

        // presenting again starts a fresh chain above the root
        launcher.present(Window { id: 12 }, true, None);
        assert_eq!(launcher.presented().len(), 1);
        assert_eq!(launcher.root().map(|w| w.id), Some(1));
    }
}
