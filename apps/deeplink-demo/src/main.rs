//! Console walkthrough of a small coordinator tree driving real screen
//! collaborators: an app coordinator that owns the launcher, an orders flow
//! on a shared stack navigator, and a profile flow started on demand and
//! resumed from when it finishes.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use waypoint_core::{Coordinator, Flow, Hierarchy};
use waypoint_navigation::{
    Launcher, Navigating, PushSpec, RootControllable, Screen, ScreenId, StackNavigator,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Deeplink {
    Orders,
    OrderDetail(u32),
    Profile,
}

struct Page {
    id: ScreenId,
    title: String,
}

impl Page {
    fn new(title: impl Into<String>) -> Self {
        Self {
            id: next_screen_id(),
            title: title.into(),
        }
    }
}

impl Screen for Page {
    fn screen_id(&self) -> ScreenId {
        self.id
    }
}

static NEXT_SCREEN_ID: AtomicU64 = AtomicU64::new(1);

fn next_screen_id() -> ScreenId {
    NEXT_SCREEN_ID.fetch_add(1, Ordering::Relaxed)
}

type SharedNavigator = Rc<RefCell<StackNavigator<Page>>>;

struct AppCoordinator {
    launcher: Rc<RefCell<Launcher<Page>>>,
    navigator: SharedNavigator,
}

impl Coordinator<Deeplink> for AppCoordinator {
    fn start(&mut self, flow: &mut Flow<'_, Deeplink>) {
        self.launcher.borrow_mut().set_root(Page::new("home"), None);
        let navigator = Rc::clone(&self.navigator);
        if let Err(err) = flow.run(OrdersCoordinator { navigator }) {
            log::error!("could not start the orders flow: {err}");
        }
    }

    fn did_open(&mut self, deeplink: &Deeplink, flow: &mut Flow<'_, Deeplink>) -> bool {
        if *deeplink != Deeplink::Profile {
            return false;
        }
        let id = flow.id();
        if flow.hierarchy().has_child_of_type::<ProfileCoordinator>(id) {
            return true;
        }
        let navigator = Rc::clone(&self.navigator);
        let resumed = Rc::clone(&self.navigator);
        let started = flow.run_with(ProfileCoordinator { navigator }, move |_| {
            // the profile flow is done; take its screen down with it
            resumed.borrow_mut().pop(true);
            log::info!("profile flow finished, back to orders");
        });
        match started {
            Ok(_) => true,
            Err(err) => {
                log::error!("could not start the profile flow: {err}");
                false
            }
        }
    }
}

struct OrdersCoordinator {
    navigator: SharedNavigator,
}

impl Coordinator<Deeplink> for OrdersCoordinator {
    fn start(&mut self, _flow: &mut Flow<'_, Deeplink>) {
        self.navigator.borrow_mut().set_root(Page::new("orders"), None);
    }

    fn did_open(&mut self, deeplink: &Deeplink, _flow: &mut Flow<'_, Deeplink>) -> bool {
        match deeplink {
            Deeplink::Orders => {
                self.navigator.borrow_mut().pop_to_root(true);
                true
            }
            Deeplink::OrderDetail(order) => {
                let order = *order;
                let page = Page::new(format!("order #{order}"));
                let pushed = self.navigator.borrow_mut().push(
                    page,
                    PushSpec::default(),
                    Some(Box::new(move || {
                        log::info!("order #{order} detail left the stack");
                    })),
                );
                if let Err(err) = pushed {
                    log::error!("could not show order #{order}: {err}");
                    return false;
                }
                true
            }
            Deeplink::Profile => false,
        }
    }
}

struct ProfileCoordinator {
    navigator: SharedNavigator,
}

impl Coordinator<Deeplink> for ProfileCoordinator {
    fn start(&mut self, _flow: &mut Flow<'_, Deeplink>) {
        let pushed = self.navigator.borrow_mut().push(
            Page::new("profile"),
            PushSpec {
                hide_chrome: true,
                ..PushSpec::default()
            },
            Some(Box::new(|| log::info!("profile screen left the stack"))),
        );
        if let Err(err) = pushed {
            log::error!("could not show the profile screen: {err}");
        }
    }
}

fn main() {
    env_logger::init();

    let launcher = Rc::new(RefCell::new(Launcher::new()));
    let navigator: SharedNavigator = Rc::new(RefCell::new(StackNavigator::new()));

    let mut hierarchy = Hierarchy::new();
    let app = hierarchy.insert(AppCoordinator {
        launcher: Rc::clone(&launcher),
        navigator: Rc::clone(&navigator),
    });
    hierarchy.start(app).expect("app flow starts");

    for deeplink in [Deeplink::OrderDetail(42), Deeplink::Profile] {
        let handled = hierarchy.open(app, &deeplink).expect("app node exists");
        println!(
            "{deeplink:?} -> {}",
            if handled { "handled" } else { "unhandled" }
        );
    }

    // the profile flow finishing detaches its node and pops its screen
    if let Some(profile) = hierarchy.child_of_type::<ProfileCoordinator>(app) {
        hierarchy.finish(profile).expect("profile node exists");
    }

    let handled = hierarchy
        .open(app, &Deeplink::Orders)
        .expect("app node exists");
    println!(
        "{:?} -> {}",
        Deeplink::Orders,
        if handled { "handled" } else { "unhandled" }
    );

    let navigator = navigator.borrow();
    println!(
        "stack top: {:?}, chrome hidden: {}",
        navigator.top().map(|page| page.title.as_str()),
        navigator.chrome_hidden()
    );
}
