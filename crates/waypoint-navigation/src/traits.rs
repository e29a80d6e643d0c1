//! Capability contracts the coordinator layer depends on.
//!
//! Coordinators hold these as trait objects so concrete collaborators can
//! be swapped out in tests.

use crate::{Cleanup, NavigationError, Screen, ScreenId};

/// Something that can hold one root screen, with a cleanup action fired
/// when the root content is replaced.
pub trait RootControllable<V: Screen> {
    fn root(&self) -> Option<&V>;

    /// Installs a new root. Any cleanup tied to the previous root-level
    /// content runs (and is cleared) first, then the screen is installed
    /// and `cleanup` is keyed to it.
    fn set_root(&mut self, screen: V, cleanup: Option<Cleanup>);
}

/// Present and dismiss overlays above the current content.
pub trait Presenting<V: Screen> {
    fn present(&mut self, screen: V, animated: bool, completion: Option<Box<dyn FnOnce()>>);

    fn dismiss(&mut self, animated: bool, completion: Option<Box<dyn FnOnce()>>);
}

/// Options for pushing a screen onto a stack.
#[derive(Clone, Copy, Debug)]
pub struct PushSpec {
    pub animated: bool,
    /// Hide surrounding chrome (bars, tabs) while this entry is on top.
    pub hide_chrome: bool,
}

impl Default for PushSpec {
    fn default() -> Self {
        Self {
            animated: true,
            hide_chrome: false,
        }
    }
}

/// A screen stack with per-entry cleanup actions.
///
/// Every cleanup registered through `after_pop` or
/// [`RootControllable::set_root`] fires exactly once, on whichever removal
/// path actually takes its entry off the stack: an explicit pop, a
/// programmatic replacement, or a host-reported interactive removal. It
/// never fires for an entry still on the stack.
pub trait Navigating<V: Screen>: RootControllable<V> + Presenting<V> {
    fn push(&mut self, screen: V, spec: PushSpec, after_pop: Option<Cleanup>)
        -> Result<(), NavigationError>;

    /// Swaps the top entry for `screen`. A pending cleanup on the replaced
    /// entry transfers to the replacement instead of firing.
    fn replace_last(&mut self, screen: V, spec: PushSpec) -> Result<(), NavigationError>;

    fn pop(&mut self, animated: bool);

    fn pop_to_root(&mut self, animated: bool);

    /// Pops until `target` is on top. Unknown targets are a no-op.
    fn pop_to(&mut self, target: ScreenId, animated: bool);

    /// Appends several entries at once; an `after_pop` cleanup is keyed to
    /// the first appended screen.
    fn append(
        &mut self,
        screens: Vec<V>,
        animated: bool,
        after_pop: Option<Cleanup>,
    ) -> Result<(), NavigationError>;

    fn is_empty(&self) -> bool;

    fn top(&self) -> Option<&V>;

    /// Whether chrome is currently suppressed, either navigator-wide or by
    /// the top entry's push options.
    fn chrome_hidden(&self) -> bool;

    fn set_chrome_hidden(&mut self, hidden: bool);
}
