#![doc = r"Screen-stack collaborators consumed by Waypoint coordinators.

Coordinators decide *where* the application goes; the types in this crate
own *what is currently on screen*: a root slot with an overlay chain
([`Launcher`]) and a navigation stack with per-entry cleanup actions
([`StackNavigator`]). Both are headless: the host UI layer renders the
screens and reports interactive removals back through the `*_by_host`
hooks."]

mod launcher;
mod navigator;
mod screen;
mod traits;

pub use launcher::Launcher;
pub use navigator::StackNavigator;
pub use screen::{Screen, ScreenId};
pub use traits::{Navigating, Presenting, PushSpec, RootControllable};

use std::fmt;

/// Zero-argument action tied to a stack entry or root, guaranteed to run
/// exactly once when that content permanently leaves the screen.
pub type Cleanup = Box<dyn FnOnce()>;

/// Misuse of a navigation collaborator. These are programmer errors; they
/// are surfaced as recoverable values instead of aborting, and the
/// offending operation is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    /// A container screen was pushed onto a navigation stack; containers
    /// host their own stack and cannot nest.
    ContainerPush,
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::ContainerPush => {
                write!(f, "a container screen cannot be pushed onto a navigation stack")
            }
        }
    }
}

impl std::error::Error for NavigationError {}
