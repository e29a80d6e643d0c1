//! The canonical screen stack and its completion registry.

use indexmap::IndexMap;

use crate::{Cleanup, NavigationError, Navigating, Presenting, PushSpec, RootControllable,
            Screen, ScreenId};

struct StackEntry<V> {
    screen: V,
    hide_chrome: bool,
}

/// Owns one navigation stack: ordered entries, an overlay chain, and the
/// registry mapping on-stack screens to their pending cleanup actions.
///
/// Invariant: a cleanup exists in the registry if and only if its screen
/// is currently on the stack. Every removal path funnels through
/// `run_completion`, which fires and clears in one step.
pub struct StackNavigator<V: Screen> {
    entries: Vec<StackEntry<V>>,
    completions: IndexMap<ScreenId, Cleanup>,
    presented: Vec<V>,
    chrome_hidden: bool,
}

impl<V: Screen> StackNavigator<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            completions: IndexMap::new(),
            presented: Vec::new(),
            chrome_hidden: false,
        }
    }

    /// Overlays currently presented above the stack, bottom to top.
    pub fn presented(&self) -> &[V] {
        &self.presented
    }

    /// Host hook: the user interactively removed `target` (e.g. an edge
    /// swipe). Drops the entry and fires its cleanup; unknown targets are
    /// ignored.
    pub fn popped_by_host(&mut self, target: ScreenId) {
        let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.screen.screen_id() == target)
        else {
            return;
        };
        self.entries.remove(index);
        self.run_completion(target);
    }

    /// Host hook: the whole navigator was dismissed interactively (e.g. a
    /// sheet swipe-down). Everything on the stack is gone for good, so all
    /// pending cleanups fire.
    pub fn dismissed_by_host(&mut self) {
        self.run_all_completions();
    }

    fn run_completion(&mut self, id: ScreenId) {
        if let Some(cleanup) = self.completions.shift_remove(&id) {
            cleanup();
        }
    }

    /// Fires every pending cleanup in stack order, topmost first.
    fn run_all_completions(&mut self) {
        let ids: Vec<ScreenId> = self
            .entries
            .iter()
            .rev()
            .map(|entry| entry.screen.screen_id())
            .collect();
        for id in ids {
            self.run_completion(id);
        }
    }
}

impl<V: Screen> Default for StackNavigator<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Screen> RootControllable<V> for StackNavigator<V> {
    fn root(&self) -> Option<&V> {
        self.entries.first().map(|entry| &entry.screen)
    }

    fn set_root(&mut self, screen: V, cleanup: Option<Cleanup>) {
        self.run_all_completions();
        self.entries.clear();
        let id = screen.screen_id();
        self.entries.push(StackEntry {
            screen,
            hide_chrome: false,
        });
        if let Some(cleanup) = cleanup {
            self.completions.insert(id, cleanup);
        }
    }
}

impl<V: Screen> Presenting<V> for StackNavigator<V> {
    fn present(&mut self, screen: V, _animated: bool, completion: Option<Box<dyn FnOnce()>>) {
        self.presented.push(screen);
        if let Some(completion) = completion {
            completion();
        }
    }

    fn dismiss(&mut self, _animated: bool, completion: Option<Box<dyn FnOnce()>>) {
        if self.presented.is_empty() {
            // no overlay means the navigator itself is being dismissed, so
            // its stack content is going away for good
            log::debug!(
                "dismissing navigator with {} pending cleanups",
                self.completions.len()
            );
            self.run_all_completions();
        } else {
            self.presented.clear();
        }
        if let Some(completion) = completion {
            completion();
        }
    }
}

impl<V: Screen> Navigating<V> for StackNavigator<V> {
    fn push(
        &mut self,
        screen: V,
        spec: PushSpec,
        after_pop: Option<Cleanup>,
    ) -> Result<(), NavigationError> {
        if screen.is_container() {
            log::error!("rejected pushing a container screen onto the stack");
            return Err(NavigationError::ContainerPush);
        }
        if let Some(cleanup) = after_pop {
            self.completions.insert(screen.screen_id(), cleanup);
        }
        self.entries.push(StackEntry {
            screen,
            hide_chrome: spec.hide_chrome,
        });
        Ok(())
    }

    fn replace_last(&mut self, screen: V, spec: PushSpec) -> Result<(), NavigationError> {
        if screen.is_container() {
            log::error!("rejected replacing the top entry with a container screen");
            return Err(NavigationError::ContainerPush);
        }
        // the replaced entry's pending cleanup moves to the replacement
        // instead of firing
        let transferred = self
            .entries
            .pop()
            .and_then(|last| self.completions.shift_remove(&last.screen.screen_id()));
        self.push(screen, spec, transferred)
    }

    fn pop(&mut self, _animated: bool) {
        // the root entry cannot be popped, only replaced or dismissed
        if self.entries.len() <= 1 {
            return;
        }
        let Some(entry) = self.entries.pop() else {
            return;
        };
        self.run_completion(entry.screen.screen_id());
    }

    fn pop_to_root(&mut self, _animated: bool) {
        while self.entries.len() > 1 {
            if let Some(entry) = self.entries.pop() {
                self.run_completion(entry.screen.screen_id());
            }
        }
    }

    fn pop_to(&mut self, target: ScreenId, _animated: bool) {
        let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.screen.screen_id() == target)
        else {
            return;
        };
        while self.entries.len() > index + 1 {
            if let Some(entry) = self.entries.pop() {
                self.run_completion(entry.screen.screen_id());
            }
        }
    }

    fn append(
        &mut self,
        screens: Vec<V>,
        _animated: bool,
        after_pop: Option<Cleanup>,
    ) -> Result<(), NavigationError> {
        let Some(first) = screens.first() else {
            return Ok(());
        };
        if screens.iter().any(|screen| screen.is_container()) {
            log::error!("rejected appending a container screen to the stack");
            return Err(NavigationError::ContainerPush);
        }
        if let Some(cleanup) = after_pop {
            self.completions.insert(first.screen_id(), cleanup);
        }
        self.entries.extend(screens.into_iter().map(|screen| StackEntry {
            screen,
            hide_chrome: false,
        }));
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn top(&self) -> Option<&V> {
        self.entries.last().map(|entry| &entry.screen)
    }

    fn chrome_hidden(&self) -> bool {
        self.chrome_hidden || self.entries.last().is_some_and(|entry| entry.hide_chrome)
    }

    fn set_chrome_hidden(&mut self, hidden: bool) {
        self.chrome_hidden = hidden;
    }
}

impl<V: Screen> Drop for StackNavigator<V> {
    fn drop(&mut self) {
        if !self.completions.is_empty() {
            log::debug!(
                "navigator dropped with {} cleanups never fired",
                self.completions.len()
            );
        }
    }
}
