//! In-memory collaborators and a virtual-time harness.
//!
//! Every fake appends a short line to a shared [`EventLog`], so tests can assert the exact
//! order of renderer, route and viewport calls.

use std::{
    cell::{Cell, RefCell},
    ops::Deref,
    rc::Rc,
    time::Duration,
};

use futures::executor::LocalPool;

use crate::{
    route::{RoutePort, SlidePath},
    utils::timer::VirtualClock,
    NavigationController, PlatformError, Ports, Presentation, Slide, SlideRenderer, Timings,
    Viewport,
};

#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.borrow_mut().push(event.into());
    }
    /// Returns and clears the recorded events.
    pub fn take(&self) -> Vec<String> {
        self.0.borrow_mut().drain(..).collect()
    }
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// Router that only remembers the last replaced path.
pub struct MemoryRoute {
    log: EventLog,
    current: Cell<Option<SlidePath>>,
}

impl MemoryRoute {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            current: Cell::new(None),
        }
    }
    pub fn current(&self) -> Option<SlidePath> {
        self.current.get()
    }
    pub fn current_path(&self) -> Option<String> {
        self.current().map(|p| p.to_string())
    }
}

impl RoutePort for MemoryRoute {
    fn replace(&self, path: &SlidePath) {
        self.log.push(format!("route {path}"));
        self.current.set(Some(*path));
    }
}

pub struct RecordingRenderer {
    log: EventLog,
}

impl RecordingRenderer {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl SlideRenderer for RecordingRenderer {
    fn show(&self, slide: &Slide) {
        self.log.push(format!("show {}", slide.id));
    }
    fn hide(&self, slide: &Slide) {
        self.log.push(format!("hide {}", slide.id));
    }
}

/// Viewport with a fullscreen flag that can be told to refuse requests.
pub struct MemoryViewport {
    log: EventLog,
    fullscreen: Cell<bool>,
    refusal: RefCell<Option<PlatformError>>,
}

impl MemoryViewport {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            fullscreen: Cell::new(false),
            refusal: RefCell::new(None),
        }
    }
    /// Makes every later fullscreen request fail with `error`.
    pub fn refuse_with(&self, error: PlatformError) {
        *self.refusal.borrow_mut() = Some(error);
    }
}

impl Viewport for MemoryViewport {
    fn is_fullscreen(&self) -> bool {
        self.fullscreen.get()
    }
    fn request_fullscreen(&self) -> Result<(), PlatformError> {
        if let Some(e) = self.refusal.borrow().clone() {
            return Err(e);
        }
        self.fullscreen.set(true);
        self.log.push("fullscreen enter");
        Ok(())
    }
    fn exit_fullscreen(&self) -> Result<(), PlatformError> {
        self.fullscreen.set(false);
        self.log.push("fullscreen exit");
        Ok(())
    }
    fn scroll_to_top(&self) {
        self.log.push("scroll top");
    }
    fn scroll_thumbnail_into_view(&self, id: &str) {
        self.log.push(format!("thumbnail {id}"));
    }
}

/// A controller wired to in-memory collaborators, a [`LocalPool`] and a [`VirtualClock`].
///
/// Dereferences to the controller. The controller is shared so listeners can hold a
/// [`Weak`](std::rc::Weak) reference to it and call back in.
pub struct Harness {
    pub controller: Rc<NavigationController>,
    pub clock: VirtualClock,
    pub route: Rc<MemoryRoute>,
    pub viewport: Rc<MemoryViewport>,
    pub log: EventLog,
    pool: LocalPool,
}

impl Harness {
    /// Deck of `total` numbered slides, default timings, no initial route.
    pub fn new(total: usize) -> Self {
        Self::with_options(Presentation::numbered(total), Timings::default(), None)
    }

    /// Deck of `total` numbered slides opened at `path`.
    pub fn at(total: usize, path: &str) -> Self {
        Self::with_options(Presentation::numbered(total), Timings::default(), Some(path))
    }

    pub fn with_options(presentation: Presentation, timings: Timings, path: Option<&str>) -> Self {
        let log = EventLog::default();
        let pool = LocalPool::new();
        let clock = VirtualClock::new();
        let route = Rc::new(MemoryRoute::new(log.clone()));
        let viewport = Rc::new(MemoryViewport::new(log.clone()));
        let ports = Ports {
            slides: Rc::new(presentation),
            route: route.clone(),
            renderer: Rc::new(RecordingRenderer::new(log.clone())),
            viewport: viewport.clone(),
            clock: Rc::new(clock.clone()),
            spawner: Rc::new(pool.spawner()),
        };
        let controller = match NavigationController::new(ports, timings, path) {
            Ok(controller) => Rc::new(controller),
            Err(e) => panic!("a Presentation is never empty: {e}"),
        };
        Self {
            controller,
            clock,
            route,
            viewport,
            log,
            pool,
        }
    }

    /// Runs every continuation that is ready at the current virtual time.
    pub fn run(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Moves virtual time forward by `duration`, running continuations at each deadline on
    /// the way.
    pub fn advance(&mut self, duration: Duration) {
        let target = self.clock.now() + duration;
        self.run();
        while let Some(deadline) = self.clock.next_deadline().filter(|d| *d <= target) {
            self.clock.advance_to(deadline);
            self.run();
        }
        self.clock.advance_to(target);
        self.run();
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Lets a transition started now run to completion.
    pub fn settle(&mut self) {
        let total = self.controller.timings().transition_total();
        self.advance(total);
    }

    /// Returns and clears the collaborator calls recorded so far.
    pub fn take_log(&self) -> Vec<String> {
        self.log.take()
    }

    pub fn route_path(&self) -> Option<String> {
        self.route.current_path()
    }
}

impl Deref for Harness {
    type Target = NavigationController;
    fn deref(&self) -> &Self::Target {
        &self.controller
    }
}
